//! Proposal and vote records, plus the store that owns them.
//!
//! Lifecycle: Pending -> Active -> Succeeded/Defeated -> Queued -> Executed,
//! with Cancelled reachable from any non-executed state. Pending and Active
//! are projections of the external clock against the voting window; the
//! stored state only advances on explicit transitions (queue, execute,
//! cancel).

use std::collections::HashMap;

use agora_types::{Address, OrgId, ProposalId, Timestamp};

use crate::error::GovernanceError;

/// Where a proposal is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalState {
    /// Created, voting window not yet open
    Pending,
    /// Voting window is open
    Active,
    /// Voting ended and the result passed
    Succeeded,
    /// Voting ended and the result failed
    Defeated,
    /// Passed and waiting out the timelock
    Queued,
    /// Payload dispatched to the execution target
    Executed,
    /// Withdrawn by the proposer or an admin
    Cancelled,
}

impl ProposalState {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalState::Executed | ProposalState::Defeated | ProposalState::Cancelled
        )
    }
}

/// Opaque category tag carried by a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalType {
    /// Plain signalling proposal
    Simple,
    /// Treasury action
    Treasury,
    /// Parameter change
    Parameter,
    /// Application-defined category
    Custom(u8),
}

/// How tallies are compared when computing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotingType {
    /// For > Against, abstentions excluded
    Relative,
    /// For must reach a supermajority of decisive votes
    Supermajority,
    /// Tallies accumulate sqrt(power); comparison as Relative
    Quadratic,
}

/// How a voter's weight is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotingPowerModel {
    /// Flat weight of 1 per member
    Democratic,
    /// External balance, adjusted for delegation
    Weighted,
    /// Weighted, scaled by a reputation multiplier capped at 3x
    ReputationWeighted,
}

/// A voter's position on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    For,
    Against,
    Abstain,
}

/// A cast vote. Immutable once recorded; re-voting is rejected, never
/// overwritten.
#[derive(Debug, Clone)]
pub struct Vote {
    pub proposal_id: ProposalId,
    pub voter: Address,
    pub choice: VoteChoice,
    /// Weight counted into the tally, snapshotted at cast time. Later
    /// balance, reputation or delegation changes never alter it.
    pub voting_power: u128,
    /// Conviction lock in seconds; 0 for a plain vote
    pub conviction_lock: u64,
    pub reason: String,
    pub cast_at: Timestamp,
}

/// A governance proposal.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub id: ProposalId,
    pub org: OrgId,
    pub proposer: Address,
    pub title: String,
    pub description: String,
    pub metadata_uri: String,
    pub proposal_type: ProposalType,
    pub voting_type: VotingType,
    pub power_model: VotingPowerModel,
    pub created_at: Timestamp,
    pub voting_starts: Timestamp,
    pub voting_ends: Timestamp,
    /// Opaque action descriptor handed to the execution target
    pub execution_payload: Vec<u8>,
    pub execution_target: Option<Address>,
    pub votes_for: u128,
    pub votes_against: u128,
    pub votes_abstain: u128,
    pub total_power_cast: u128,
    pub state: ProposalState,
    pub cancelled: bool,
    pub executed: bool,
    pub queued_at: Option<Timestamp>,
}

impl Proposal {
    /// Whether the voting window is open at `now`.
    ///
    /// The window is half-open: a vote at exactly `voting_starts` counts,
    /// a vote at exactly `voting_ends` does not.
    pub fn voting_open(&self, now: Timestamp) -> bool {
        if self.cancelled || !matches!(self.state, ProposalState::Pending | ProposalState::Active)
        {
            return false;
        }
        now >= self.voting_starts && now < self.voting_ends
    }

    /// Clock-only projection of Pending/Active; states that were advanced
    /// explicitly (Queued, Executed, Cancelled, ...) are returned as stored.
    pub fn phase(&self, now: Timestamp) -> ProposalState {
        if self.cancelled {
            return ProposalState::Cancelled;
        }
        match self.state {
            ProposalState::Pending | ProposalState::Active => {
                if now < self.voting_starts {
                    ProposalState::Pending
                } else if now < self.voting_ends {
                    ProposalState::Active
                } else {
                    // Ended but not evaluated; caller resolves via the result
                    self.state
                }
            }
            other => other,
        }
    }

    fn record_vote(&mut self, choice: VoteChoice, power: u128) {
        match choice {
            VoteChoice::For => self.votes_for = self.votes_for.saturating_add(power),
            VoteChoice::Against => self.votes_against = self.votes_against.saturating_add(power),
            VoteChoice::Abstain => self.votes_abstain = self.votes_abstain.saturating_add(power),
        }
        self.total_power_cast = self.total_power_cast.saturating_add(power);
    }
}

/// Fields a proposer may edit while the proposal is still pending.
#[derive(Debug, Clone, Default)]
pub struct ProposalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata_uri: Option<String>,
}

/// Owns all proposal and vote records and enforces the state machine.
#[derive(Debug, Default)]
pub struct ProposalStore {
    proposals: HashMap<ProposalId, Proposal>,
    votes: HashMap<(ProposalId, Address), Vote>,
    by_org: HashMap<OrgId, Vec<ProposalId>>,
    next_id: u64,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new proposal, assigning the next id.
    pub fn insert(&mut self, mut proposal: Proposal) -> ProposalId {
        self.next_id += 1;
        let id = ProposalId::new(self.next_id);
        proposal.id = id;
        self.by_org.entry(proposal.org).or_default().push(id);
        self.proposals.insert(id, proposal);
        id
    }

    pub fn get(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, GovernanceError> {
        self.proposals
            .get_mut(&id)
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    pub fn vote(&self, id: ProposalId, voter: Address) -> Option<&Vote> {
        self.votes.get(&(id, voter))
    }

    pub fn has_voted(&self, id: ProposalId, voter: Address) -> bool {
        self.votes.contains_key(&(id, voter))
    }

    /// Record a vote and fold its weight into the tallies.
    ///
    /// The engine resolves the weight; this enforces the window, the state
    /// guard and the one-vote-per-voter rule, and applies both updates as a
    /// single step so tallies and vote records never diverge.
    pub fn record_vote(&mut self, vote: Vote, now: Timestamp) -> Result<(), GovernanceError> {
        let key = (vote.proposal_id, vote.voter);
        let proposal = self
            .proposals
            .get_mut(&vote.proposal_id)
            .ok_or(GovernanceError::ProposalNotFound(vote.proposal_id))?;

        if !proposal.voting_open(now) {
            return Err(GovernanceError::VotingNotActive);
        }
        if self.votes.contains_key(&key) {
            return Err(GovernanceError::AlreadyVoted);
        }

        proposal.record_vote(vote.choice, vote.voting_power);
        if proposal.state == ProposalState::Pending {
            proposal.state = ProposalState::Active;
        }
        self.votes.insert(key, vote);
        Ok(())
    }

    /// Edit a pending proposal. Only the proposer, only before the window
    /// opens.
    pub fn update(
        &mut self,
        id: ProposalId,
        caller: Address,
        update: ProposalUpdate,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let proposal = self.get_mut(id)?;
        if proposal.proposer != caller {
            return Err(GovernanceError::UnauthorizedProposalAccess);
        }
        if proposal.phase(now) != ProposalState::Pending {
            return Err(GovernanceError::UnauthorizedProposalAccess);
        }
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(GovernanceError::InvalidProposalParameters(
                    "title must not be empty".to_string(),
                ));
            }
            proposal.title = title;
        }
        if let Some(description) = update.description {
            proposal.description = description;
        }
        if let Some(uri) = update.metadata_uri {
            proposal.metadata_uri = uri;
        }
        Ok(())
    }

    /// Cancel a proposal. `check_proposer` is false for admin emergency
    /// cancellation; the state rule is the same either way.
    pub fn cancel(
        &mut self,
        id: ProposalId,
        caller: Address,
        check_proposer: bool,
    ) -> Result<(), GovernanceError> {
        let proposal = self.get_mut(id)?;
        if check_proposer && proposal.proposer != caller {
            return Err(GovernanceError::UnauthorizedProposalAccess);
        }
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted);
        }
        if proposal.cancelled {
            return Err(GovernanceError::AlreadyCancelled);
        }
        proposal.cancelled = true;
        proposal.state = ProposalState::Cancelled;
        Ok(())
    }

    pub fn by_org(&self, org: OrgId) -> Vec<&Proposal> {
        self.by_org
            .get(&org)
            .map(|ids| ids.iter().filter_map(|id| self.proposals.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }
}
