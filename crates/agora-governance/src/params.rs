//! Per-organization voting configuration.

use crate::error::GovernanceError;
use agora_types::{Address, Duration};

/// Shortest voting period an organization may configure (1 hour).
pub const MIN_VOTING_PERIOD: Duration = 3_600;

/// Basis-point denominator used throughout tally math.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Share of decisive (For + Against) votes a supermajority proposal needs
/// (66.67%).
pub const SUPERMAJORITY_BPS: u128 = 6_667;

/// Voting configuration for a single organization, mutable by its admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingParameters {
    /// Seconds between proposal creation and the start of voting
    pub voting_delay: Duration,
    /// Length of the voting window in seconds
    pub voting_period: Duration,
    /// Timelock between queueing and execution, in seconds
    pub execution_delay: Duration,
    /// Minimum participation for a result to count (basis points of
    /// aggregate member power)
    pub quorum_bps: u16,
    /// Share of aggregate power a proposer must hold to create a proposal
    /// (basis points, 0 disables the gate)
    pub proposal_threshold_bps: u16,
    /// Whether voters and proposers must be organization members
    pub require_membership: bool,
}

impl Default for VotingParameters {
    fn default() -> Self {
        Self {
            voting_delay: 86_400,         // 1 day
            voting_period: 7 * 86_400,    // 1 week
            execution_delay: 2 * 86_400,  // 2 days
            quorum_bps: 1_000,            // 10%
            proposal_threshold_bps: 0,
            require_membership: true,
        }
    }
}

impl VotingParameters {
    /// Validate the full parameter set.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.voting_period < MIN_VOTING_PERIOD {
            return Err(GovernanceError::InvalidVotingPeriod {
                requested: self.voting_period,
                minimum: MIN_VOTING_PERIOD,
            });
        }
        if self.quorum_bps > BPS_DENOMINATOR as u16 {
            return Err(GovernanceError::InvalidProposalParameters(format!(
                "quorum {} exceeds 10000 bps",
                self.quorum_bps
            )));
        }
        if self.proposal_threshold_bps > BPS_DENOMINATOR as u16 {
            return Err(GovernanceError::InvalidProposalParameters(format!(
                "proposal threshold {} exceeds 10000 bps",
                self.proposal_threshold_bps
            )));
        }
        Ok(())
    }
}

/// A registered organization: its admin, voting configuration and the
/// running proposal counter. Mutated only through engine operations.
#[derive(Debug, Clone)]
pub struct Organization {
    /// Admin account, may change parameters and emergency-cancel
    pub admin: Address,
    /// Current voting configuration
    pub params: VotingParameters,
    /// Number of proposals ever created under this organization
    pub proposal_count: u64,
}

impl Organization {
    pub fn new(admin: Address, params: VotingParameters) -> Self {
        Self {
            admin,
            params,
            proposal_count: 0,
        }
    }
}
