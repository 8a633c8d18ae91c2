use agora_types::{OrgId, ProposalId};
use thiserror::Error;

/// Errors that can occur in governance operations.
///
/// Every rejected precondition maps to its own variant; there is no generic
/// boolean failure path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Invalid proposal parameters: {0}")]
    InvalidProposalParameters(String),

    #[error("Invalid voting period: {requested}s is below the minimum of {minimum}s")]
    InvalidVotingPeriod { requested: u64, minimum: u64 },

    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrgId),

    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("Only the proposer may modify this proposal")]
    UnauthorizedProposalAccess,

    #[error("Insufficient voting power: {0}")]
    InsufficientVotingPower(String),

    #[error("Voting is not active for this proposal")]
    VotingNotActive,

    #[error("Voting period has not ended")]
    VotingNotEnded,

    #[error("Already voted on this proposal")]
    AlreadyVoted,

    #[error("Proposal did not pass")]
    ProposalNotPassed,

    #[error("Proposal is not queued for execution")]
    ProposalNotQueued,

    #[error("Proposal is already queued")]
    AlreadyQueued,

    #[error("Timelock not elapsed: {remaining}s remaining")]
    TimelockNotElapsed { remaining: u64 },

    #[error("Proposal already executed")]
    AlreadyExecuted,

    #[error("Proposal already cancelled")]
    AlreadyCancelled,

    #[error("Invalid delegation: {0}")]
    InvalidDelegation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}
