//! Agora Governance - proposal and voting engine for member organizations.
//!
//! This crate provides:
//! - Proposal lifecycle management with timelocked execution
//! - Relative, supermajority and quadratic vote tabulation
//! - Democratic, token-weighted and reputation-weighted power models
//! - Conviction voting with read-time decay
//! - Split delegation with conservation of base power

pub mod conviction;
pub mod delegation;
pub mod engine;
pub mod error;
pub mod params;
pub mod power;
pub mod proposal;

pub use conviction::{apply_conviction, calculate_conviction_multiplier};
pub use delegation::{Delegation, DelegationLedger};
pub use engine::{GovernanceEngine, ProposalDraft, ProposalResult};
pub use error::GovernanceError;
pub use params::{Organization, VotingParameters, MIN_VOTING_PERIOD};
pub use power::{
    BalanceProvider, DispatchOutcome, ExecutionTarget, MembershipProvider, ReputationProvider,
};
pub use proposal::{
    Proposal, ProposalState, ProposalType, ProposalUpdate, Vote, VoteChoice, VotingPowerModel,
    VotingType,
};
