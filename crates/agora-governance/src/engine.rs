//! The governance engine.
//!
//! Root object of the subsystem: owns organizations, the proposal store and
//! the delegation ledger, and consults the injected collaborators (balance,
//! reputation, membership, execution target). All mutating operations are
//! atomic with respect to each other; time is always an explicit `now`
//! argument and is assumed monotonically non-decreasing across calls.

use std::collections::HashMap;

use agora_types::{Address, Duration, OrgId, ProposalId, Timestamp};

use crate::conviction::{apply_conviction, decayed_weight};
use crate::delegation::{Delegation, DelegationLedger};
use crate::error::GovernanceError;
use crate::params::{Organization, VotingParameters, BPS_DENOMINATOR, MIN_VOTING_PERIOD, SUPERMAJORITY_BPS};
use crate::power::{
    aggregate_power, integer_sqrt, resolve_power, BalanceProvider, DispatchOutcome,
    ExecutionTarget, MembershipProvider, ReputationProvider,
};
use crate::proposal::{
    Proposal, ProposalState, ProposalStore, ProposalType, ProposalUpdate, Vote, VoteChoice,
    VotingPowerModel, VotingType,
};

/// Everything a caller supplies when creating a proposal.
#[derive(Debug, Clone)]
pub struct ProposalDraft {
    pub title: String,
    pub description: String,
    pub metadata_uri: String,
    pub proposal_type: ProposalType,
    pub voting_type: VotingType,
    pub power_model: VotingPowerModel,
    pub execution_payload: Vec<u8>,
    pub execution_target: Option<Address>,
    /// Overrides the organization's voting period; still bounded below by
    /// the global minimum
    pub voting_period_override: Option<Duration>,
}

impl Default for ProposalDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            metadata_uri: String::new(),
            proposal_type: ProposalType::Simple,
            voting_type: VotingType::Relative,
            power_model: VotingPowerModel::Democratic,
            execution_payload: Vec::new(),
            execution_target: None,
            voting_period_override: None,
        }
    }
}

/// Outcome of evaluating a proposal's tallies, computed without mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalResult {
    pub passed: bool,
    pub votes_for: u128,
    pub votes_against: u128,
    pub votes_abstain: u128,
    pub total_power_cast: u128,
    /// Quorum target derived from the *current* aggregate member power; it
    /// moves if total power changes during the voting window.
    pub quorum_required: u128,
    pub quorum_reached: bool,
}

/// Orchestrates the proposal lifecycle, vote tabulation, delegation and
/// timelocked execution for all registered organizations.
pub struct GovernanceEngine<M, B, R, X> {
    organizations: HashMap<OrgId, Organization>,
    next_org_id: u64,
    store: ProposalStore,
    delegations: DelegationLedger,
    membership: M,
    balances: B,
    reputation: R,
    executor: X,
}

impl<M, B, R, X> GovernanceEngine<M, B, R, X>
where
    M: MembershipProvider,
    B: BalanceProvider,
    R: ReputationProvider,
    X: ExecutionTarget,
{
    pub fn new(membership: M, balances: B, reputation: R, executor: X) -> Self {
        Self {
            organizations: HashMap::new(),
            next_org_id: 0,
            store: ProposalStore::new(),
            delegations: DelegationLedger::new(),
            membership,
            balances,
            reputation,
            executor,
        }
    }

    // ---- organizations & parameters ----

    /// Register an organization with its admin and voting configuration.
    pub fn register_organization(
        &mut self,
        admin: Address,
        params: VotingParameters,
    ) -> Result<OrgId, GovernanceError> {
        params.validate()?;
        self.next_org_id += 1;
        let id = OrgId::new(self.next_org_id);
        self.organizations.insert(id, Organization::new(admin, params));
        tracing::info!("Registered organization {} (admin {})", id, admin);
        Ok(id)
    }

    pub fn organization(&self, org: OrgId) -> Result<&Organization, GovernanceError> {
        self.organizations
            .get(&org)
            .ok_or(GovernanceError::OrganizationNotFound(org))
    }

    /// Replace an organization's voting parameters. Admin only.
    pub fn set_voting_parameters(
        &mut self,
        org: OrgId,
        caller: Address,
        params: VotingParameters,
    ) -> Result<(), GovernanceError> {
        let organization = self
            .organizations
            .get_mut(&org)
            .ok_or(GovernanceError::OrganizationNotFound(org))?;
        if organization.admin != caller {
            return Err(GovernanceError::Unauthorized(
                "only the organization admin may change voting parameters".to_string(),
            ));
        }
        params.validate()?;
        organization.params = params;
        tracing::info!("Updated voting parameters for organization {}", org);
        Ok(())
    }

    pub fn voting_parameters(&self, org: OrgId) -> Result<&VotingParameters, GovernanceError> {
        Ok(&self.organization(org)?.params)
    }

    pub fn default_voting_parameters() -> VotingParameters {
        VotingParameters::default()
    }

    // ---- proposal lifecycle ----

    /// Create a proposal in the Pending state. The voting window derives
    /// from the organization's delay and period (or the draft's override).
    pub fn create_proposal(
        &mut self,
        org: OrgId,
        proposer: Address,
        draft: ProposalDraft,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        let (voting_delay, default_period, require_membership, threshold_bps) = {
            let organization = self.organization(org)?;
            (
                organization.params.voting_delay,
                organization.params.voting_period,
                organization.params.require_membership,
                organization.params.proposal_threshold_bps,
            )
        };

        if draft.title.trim().is_empty() {
            return Err(GovernanceError::InvalidProposalParameters(
                "title must not be empty".to_string(),
            ));
        }
        let period = draft.voting_period_override.unwrap_or(default_period);
        if period < MIN_VOTING_PERIOD {
            return Err(GovernanceError::InvalidVotingPeriod {
                requested: period,
                minimum: MIN_VOTING_PERIOD,
            });
        }

        if require_membership && !self.membership.is_member(org, proposer) {
            return Err(GovernanceError::InsufficientVotingPower(
                "proposer is not a member".to_string(),
            ));
        }
        let proposer_power = self.member_power(org, proposer, draft.power_model);
        if require_membership && proposer_power == 0 {
            return Err(GovernanceError::InsufficientVotingPower(
                "proposer has no voting power".to_string(),
            ));
        }
        if threshold_bps > 0 {
            let aggregate = self.org_power(org, draft.power_model);
            if proposer_power.saturating_mul(BPS_DENOMINATOR)
                < aggregate.saturating_mul(threshold_bps as u128)
            {
                return Err(GovernanceError::InsufficientVotingPower(format!(
                    "proposer power {} is below the {} bps proposal threshold",
                    proposer_power, threshold_bps
                )));
            }
        }

        let voting_starts = now.saturating_add(voting_delay);
        let proposal = Proposal {
            id: ProposalId::new(0), // assigned by the store
            org,
            proposer,
            title: draft.title,
            description: draft.description,
            metadata_uri: draft.metadata_uri,
            proposal_type: draft.proposal_type,
            voting_type: draft.voting_type,
            power_model: draft.power_model,
            created_at: now,
            voting_starts,
            voting_ends: voting_starts.saturating_add(period),
            execution_payload: draft.execution_payload,
            execution_target: draft.execution_target,
            votes_for: 0,
            votes_against: 0,
            votes_abstain: 0,
            total_power_cast: 0,
            state: ProposalState::Pending,
            cancelled: false,
            executed: false,
            queued_at: None,
        };
        let id = self.store.insert(proposal);

        // Counter mutation happens in the same operation as the insert
        if let Some(organization) = self.organizations.get_mut(&org) {
            organization.proposal_count += 1;
        }

        tracing::info!("Created proposal {} in organization {}", id, org);
        Ok(id)
    }

    /// Edit a pending proposal's descriptive fields. Proposer only.
    pub fn update_proposal(
        &mut self,
        id: ProposalId,
        caller: Address,
        update: ProposalUpdate,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.store.update(id, caller, update, now)
    }

    /// Cancel a proposal as its proposer.
    pub fn cancel_proposal(
        &mut self,
        id: ProposalId,
        caller: Address,
    ) -> Result<(), GovernanceError> {
        self.store.cancel(id, caller, true)?;
        tracing::info!("Proposal {} cancelled by proposer", id);
        Ok(())
    }

    /// Cancel a proposal as the organization admin, bypassing the proposer
    /// check. The state rule is unchanged: an executed proposal cannot be
    /// cancelled.
    pub fn emergency_cancel(
        &mut self,
        id: ProposalId,
        caller: Address,
    ) -> Result<(), GovernanceError> {
        let org = self.store.get(id)?.org;
        if self.organization(org)?.admin != caller {
            return Err(GovernanceError::Unauthorized(
                "only the organization admin may emergency-cancel".to_string(),
            ));
        }
        self.store.cancel(id, caller, false)?;
        tracing::warn!("Proposal {} emergency-cancelled by admin", id);
        Ok(())
    }

    // ---- voting ----

    /// Cast a vote with no conviction lock.
    pub fn cast_vote(
        &mut self,
        id: ProposalId,
        voter: Address,
        choice: VoteChoice,
        reason: String,
        now: Timestamp,
    ) -> Result<u128, GovernanceError> {
        self.cast(id, voter, choice, 0, reason, now)
    }

    /// Cast a vote whose weight is boosted by a conviction lock.
    pub fn cast_vote_with_conviction(
        &mut self,
        id: ProposalId,
        voter: Address,
        choice: VoteChoice,
        lock_secs: Duration,
        reason: String,
        now: Timestamp,
    ) -> Result<u128, GovernanceError> {
        self.cast(id, voter, choice, lock_secs, reason, now)
    }

    fn cast(
        &mut self,
        id: ProposalId,
        voter: Address,
        choice: VoteChoice,
        lock_secs: Duration,
        reason: String,
        now: Timestamp,
    ) -> Result<u128, GovernanceError> {
        let (org, power_model, voting_type, open) = {
            let proposal = self.store.get(id)?;
            (
                proposal.org,
                proposal.power_model,
                proposal.voting_type,
                proposal.voting_open(now),
            )
        };
        if !open {
            return Err(GovernanceError::VotingNotActive);
        }

        let require_membership = self.organization(org)?.params.require_membership;
        if require_membership && !self.membership.is_member(org, voter) {
            return Err(GovernanceError::InsufficientVotingPower(
                "voter is not a member".to_string(),
            ));
        }
        let base = self.member_power(org, voter, power_model);
        // Without a membership requirement a zero-weight vote is admissible:
        // it records the position and adds nothing to the tallies
        if require_membership && base == 0 {
            return Err(GovernanceError::InsufficientVotingPower(
                "voter has no voting power".to_string(),
            ));
        }

        let boosted = if lock_secs > 0 {
            apply_conviction(base, lock_secs)
        } else {
            base
        };
        // Quadratic tallies accumulate the square root of the weight
        let counted = match voting_type {
            VotingType::Quadratic => integer_sqrt(boosted),
            _ => boosted,
        };

        self.store.record_vote(
            Vote {
                proposal_id: id,
                voter,
                choice,
                voting_power: counted,
                conviction_lock: lock_secs,
                reason,
                cast_at: now,
            },
            now,
        )?;
        tracing::debug!(
            "Vote on proposal {}: {:?} with weight {} (lock {}s)",
            id,
            choice,
            counted,
            lock_secs
        );
        Ok(counted)
    }

    /// The currently effective weight of a conviction vote as its lock
    /// elapses. A pure projection: the stored vote and the tallies are
    /// untouched. Returns 0 if the voter never voted.
    pub fn apply_conviction_decay(
        &self,
        id: ProposalId,
        voter: Address,
        now: Timestamp,
    ) -> Result<u128, GovernanceError> {
        self.store.get(id)?;
        Ok(self
            .store
            .vote(id, voter)
            .map(|vote| decayed_weight(vote, now))
            .unwrap_or(0))
    }

    // ---- delegation ----

    /// Delegate part of the caller's voting power to another member.
    pub fn delegate_voting_power(
        &mut self,
        org: OrgId,
        delegator: Address,
        delegatee: Address,
        amount: u128,
    ) -> Result<(), GovernanceError> {
        self.organization(org)?;
        let base = self.balances.balance_of(org, delegator);
        self.delegations
            .delegate(org, delegator, delegatee, amount, base)?;
        tracing::info!(
            "Delegation in organization {}: {} -> {} ({})",
            org,
            delegator,
            delegatee,
            amount
        );
        Ok(())
    }

    /// Reduce or remove a delegation.
    pub fn undelegate_voting_power(
        &mut self,
        org: OrgId,
        delegator: Address,
        delegatee: Address,
        amount: u128,
    ) -> Result<(), GovernanceError> {
        self.organization(org)?;
        self.delegations
            .undelegate(org, delegator, delegatee, amount)?;
        tracing::info!(
            "Undelegation in organization {}: {} -> {} ({})",
            org,
            delegator,
            delegatee,
            amount
        );
        Ok(())
    }

    pub fn delegations(&self, org: OrgId, delegator: Address) -> Vec<Delegation> {
        self.delegations.delegations_of(org, delegator)
    }

    /// Total power currently delegated *to* a member.
    pub fn delegated_voting_power(&self, org: OrgId, member: Address) -> u128 {
        self.delegations.delegated_to(org, member)
    }

    // ---- results, queueing, execution ----

    /// Evaluate a proposal's tallies against its voting type and the
    /// organization's quorum. Never mutates state.
    pub fn proposal_result(&self, id: ProposalId) -> Result<ProposalResult, GovernanceError> {
        let proposal = self.store.get(id)?;
        let organization = self.organization(proposal.org)?;

        let aggregate = self.org_power(proposal.org, proposal.power_model);
        let quorum_required =
            aggregate.saturating_mul(organization.params.quorum_bps as u128) / BPS_DENOMINATOR;
        let quorum_reached = proposal.total_power_cast >= quorum_required;

        let tallies_pass = match proposal.voting_type {
            // Quadratic tallies were already sqrt-accumulated at cast time;
            // the comparison is the same as Relative
            VotingType::Relative | VotingType::Quadratic => {
                proposal.votes_for > proposal.votes_against
            }
            VotingType::Supermajority => {
                let decisive = proposal.votes_for.saturating_add(proposal.votes_against);
                decisive > 0
                    && proposal.votes_for.saturating_mul(BPS_DENOMINATOR)
                        >= decisive.saturating_mul(SUPERMAJORITY_BPS)
            }
        };

        Ok(ProposalResult {
            passed: !proposal.cancelled && quorum_reached && tallies_pass,
            votes_for: proposal.votes_for,
            votes_against: proposal.votes_against,
            votes_abstain: proposal.votes_abstain,
            total_power_cast: proposal.total_power_cast,
            quorum_required,
            quorum_reached,
        })
    }

    /// Queue a passed proposal for timelocked execution. Callable by
    /// anyone once the voting window has closed.
    pub fn queue_proposal(&mut self, id: ProposalId, now: Timestamp) -> Result<(), GovernanceError> {
        {
            let proposal = self.store.get(id)?;
            if proposal.cancelled {
                return Err(GovernanceError::ProposalNotPassed);
            }
            match proposal.state {
                ProposalState::Queued => return Err(GovernanceError::AlreadyQueued),
                ProposalState::Executed => return Err(GovernanceError::AlreadyExecuted),
                // A recorded defeat is terminal; later aggregate-power drift
                // must not flip the result
                ProposalState::Defeated => return Err(GovernanceError::ProposalNotPassed),
                _ => {}
            }
            if now < proposal.voting_ends {
                return Err(GovernanceError::VotingNotEnded);
            }
        }

        let result = self.proposal_result(id)?;
        let proposal = self.store.get_mut(id)?;
        if !result.passed {
            proposal.state = ProposalState::Defeated;
            return Err(GovernanceError::ProposalNotPassed);
        }

        proposal.state = ProposalState::Queued;
        proposal.queued_at = Some(now);
        tracing::info!("Proposal {} queued at {}", id, now);
        Ok(())
    }

    /// Dispatch a queued proposal's payload to the execution target once
    /// the timelock has elapsed. Dispatches exactly once per proposal; a
    /// collaborator failure leaves the proposal queued and retryable.
    pub fn execute_proposal(
        &mut self,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<DispatchOutcome, GovernanceError> {
        let (org, target, payload, queued_at) = {
            let proposal = self.store.get(id)?;
            if proposal.executed {
                return Err(GovernanceError::AlreadyExecuted);
            }
            if proposal.state != ProposalState::Queued {
                return Err(GovernanceError::ProposalNotQueued);
            }
            let queued_at = proposal.queued_at.ok_or(GovernanceError::ProposalNotQueued)?;
            (
                proposal.org,
                proposal.execution_target,
                proposal.execution_payload.clone(),
                queued_at,
            )
        };

        let delay = self.organization(org)?.params.execution_delay;
        let ready_at = queued_at.saturating_add(delay);
        if now < ready_at {
            return Err(GovernanceError::TimelockNotElapsed {
                remaining: ready_at - now,
            });
        }

        let outcome = self.executor.dispatch(target, &payload);
        if !outcome.success {
            tracing::warn!("Dispatch for proposal {} failed; proposal remains queued", id);
            return Err(GovernanceError::ExecutionFailed(
                "execution target rejected the dispatch".to_string(),
            ));
        }

        let proposal = self.store.get_mut(id)?;
        proposal.executed = true;
        proposal.state = ProposalState::Executed;
        tracing::info!("Proposal {} executed at {}", id, now);
        Ok(outcome)
    }

    /// Simulate the dispatch without committing any state change.
    pub fn preview_execution(&self, id: ProposalId) -> Result<DispatchOutcome, GovernanceError> {
        let proposal = self.store.get(id)?;
        Ok(self
            .executor
            .simulate(proposal.execution_target, &proposal.execution_payload))
    }

    /// Estimated cost of dispatching, in target-defined units.
    pub fn estimate_execution_cost(&self, id: ProposalId) -> Result<u64, GovernanceError> {
        let proposal = self.store.get(id)?;
        Ok(self
            .executor
            .estimate_cost(proposal.execution_target, &proposal.execution_payload))
    }

    // ---- views ----

    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.store.get(id)
    }

    pub fn vote(&self, id: ProposalId, voter: Address) -> Option<&Vote> {
        self.store.vote(id, voter)
    }

    /// Effective state at `now`. Pending/Active are clock projections; a
    /// closed, unevaluated window resolves to Succeeded or Defeated from
    /// the current result.
    pub fn proposal_state(
        &self,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self.store.get(id)?;
        if !proposal.cancelled
            && matches!(
                proposal.state,
                ProposalState::Pending | ProposalState::Active
            )
            && now >= proposal.voting_ends
        {
            let result = self.proposal_result(id)?;
            return Ok(if result.passed {
                ProposalState::Succeeded
            } else {
                ProposalState::Defeated
            });
        }
        Ok(proposal.phase(now))
    }

    pub fn proposals_by_organization(&self, org: OrgId) -> Vec<&Proposal> {
        self.store.by_org(org)
    }

    /// Proposals of an organization whose effective state at `now` matches.
    pub fn proposals_by_state(
        &self,
        org: OrgId,
        state: ProposalState,
        now: Timestamp,
    ) -> Vec<&Proposal> {
        self.store
            .by_org(org)
            .into_iter()
            .filter(|p| self.proposal_state(p.id, now) == Ok(state))
            .collect()
    }

    pub fn proposal_count(&self, org: OrgId) -> Result<u64, GovernanceError> {
        Ok(self.organization(org)?.proposal_count)
    }

    /// A member's resolved voting weight under the given model, right now.
    pub fn voting_power(&self, org: OrgId, member: Address, model: VotingPowerModel) -> u128 {
        self.member_power(org, member, model)
    }

    /// Whether `voter` could cast a vote on this proposal at `now`.
    pub fn can_vote(
        &self,
        id: ProposalId,
        voter: Address,
        now: Timestamp,
    ) -> Result<bool, GovernanceError> {
        let proposal = self.store.get(id)?;
        if !proposal.voting_open(now) || self.store.has_voted(id, voter) {
            return Ok(false);
        }
        let organization = self.organization(proposal.org)?;
        if !organization.params.require_membership {
            return Ok(true);
        }
        if !self.membership.is_member(proposal.org, voter) {
            return Ok(false);
        }
        Ok(self.member_power(proposal.org, voter, proposal.power_model) > 0)
    }

    /// Structural validation of a draft against an organization's
    /// configuration, without creating anything.
    pub fn validate_proposal_parameters(
        &self,
        org: OrgId,
        draft: &ProposalDraft,
    ) -> Result<(), GovernanceError> {
        let organization = self.organization(org)?;
        if draft.title.trim().is_empty() {
            return Err(GovernanceError::InvalidProposalParameters(
                "title must not be empty".to_string(),
            ));
        }
        let period = draft
            .voting_period_override
            .unwrap_or(organization.params.voting_period);
        if period < MIN_VOTING_PERIOD {
            return Err(GovernanceError::InvalidVotingPeriod {
                requested: period,
                minimum: MIN_VOTING_PERIOD,
            });
        }
        Ok(())
    }

    // ---- internals ----

    fn member_power(&self, org: OrgId, member: Address, model: VotingPowerModel) -> u128 {
        resolve_power(
            org,
            member,
            model,
            &self.balances,
            &self.reputation,
            &self.delegations,
        )
    }

    fn org_power(&self, org: OrgId, model: VotingPowerModel) -> u128 {
        aggregate_power(
            org,
            model,
            &self.membership,
            &self.balances,
            &self.reputation,
            &self.delegations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    const DAY: u64 = 86_400;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        Address::from_bytes(bytes)
    }

    struct TestMembers(Vec<Address>);

    impl MembershipProvider for TestMembers {
        fn is_member(&self, _org: OrgId, member: Address) -> bool {
            self.0.contains(&member)
        }
        fn members(&self, _org: OrgId) -> Vec<Address> {
            self.0.clone()
        }
    }

    struct TestBalances(HashMap<Address, u128>);

    impl BalanceProvider for TestBalances {
        fn balance_of(&self, _org: OrgId, member: Address) -> u128 {
            self.0.get(&member).copied().unwrap_or(0)
        }
    }

    struct TestReputation(HashMap<Address, u32>);

    impl ReputationProvider for TestReputation {
        fn multiplier(&self, _org: OrgId, member: Address) -> u32 {
            self.0.get(&member).copied().unwrap_or(1_000)
        }
    }

    #[derive(Default)]
    struct TestExecutor {
        fail: bool,
        dispatches: Cell<u32>,
        simulations: Cell<u32>,
    }

    impl ExecutionTarget for TestExecutor {
        fn dispatch(&mut self, _target: Option<Address>, payload: &[u8]) -> DispatchOutcome {
            self.dispatches.set(self.dispatches.get() + 1);
            DispatchOutcome {
                success: !self.fail,
                return_data: payload.to_vec(),
            }
        }
        fn simulate(&self, _target: Option<Address>, payload: &[u8]) -> DispatchOutcome {
            self.simulations.set(self.simulations.get() + 1);
            DispatchOutcome {
                success: !self.fail,
                return_data: payload.to_vec(),
            }
        }
        fn estimate_cost(&self, _target: Option<Address>, payload: &[u8]) -> u64 {
            21_000 + payload.len() as u64
        }
    }

    type TestEngine = GovernanceEngine<TestMembers, TestBalances, TestReputation, TestExecutor>;

    const ADMIN: u8 = 9;

    fn test_params() -> VotingParameters {
        VotingParameters {
            voting_delay: 100,
            voting_period: 7 * DAY,
            execution_delay: 2 * DAY,
            quorum_bps: 1_000,
            proposal_threshold_bps: 0,
            require_membership: true,
        }
    }

    /// Three members (1, 2, 3) with 100 balance each, neutral reputation.
    fn engine() -> (TestEngine, OrgId) {
        let members = TestMembers(vec![addr(1), addr(2), addr(3)]);
        let balances = TestBalances(HashMap::from([
            (addr(1), 100),
            (addr(2), 100),
            (addr(3), 100),
        ]));
        let mut engine = GovernanceEngine::new(
            members,
            balances,
            TestReputation(HashMap::new()),
            TestExecutor::default(),
        );
        let org = engine
            .register_organization(addr(ADMIN), test_params())
            .unwrap();
        (engine, org)
    }

    fn draft(model: VotingPowerModel, voting_type: VotingType) -> ProposalDraft {
        ProposalDraft {
            title: "Fund the thing".to_string(),
            description: "Pay for the thing".to_string(),
            power_model: model,
            voting_type,
            execution_payload: vec![0xde, 0xad],
            execution_target: Some(addr(200)),
            ..Default::default()
        }
    }

    /// Create a proposal at t=0 and return (id, voting_starts, voting_ends).
    fn open_proposal(
        engine: &mut TestEngine,
        org: OrgId,
        model: VotingPowerModel,
        voting_type: VotingType,
    ) -> (ProposalId, u64, u64) {
        let id = engine
            .create_proposal(org, addr(1), draft(model, voting_type), 0)
            .unwrap();
        let p = engine.proposal(id).unwrap();
        (id, p.voting_starts, p.voting_ends)
    }

    #[test]
    fn create_proposal_basics() {
        let (mut engine, org) = engine();
        let id = engine
            .create_proposal(
                org,
                addr(1),
                draft(VotingPowerModel::Democratic, VotingType::Relative),
                1_000,
            )
            .unwrap();

        let p = engine.proposal(id).unwrap();
        assert_eq!(p.state, ProposalState::Pending);
        assert_eq!(p.voting_starts, 1_100);
        assert_eq!(p.voting_ends, 1_100 + 7 * DAY);
        assert_eq!(engine.proposal_count(org).unwrap(), 1);
    }

    #[test]
    fn create_proposal_rejections() {
        let (mut engine, org) = engine();

        let err = engine
            .create_proposal(
                org,
                addr(1),
                ProposalDraft {
                    title: "  ".to_string(),
                    ..Default::default()
                },
                0,
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidProposalParameters(_)));

        let err = engine
            .create_proposal(
                org,
                addr(1),
                ProposalDraft {
                    title: "Quick one".to_string(),
                    voting_period_override: Some(MIN_VOTING_PERIOD - 1),
                    ..Default::default()
                },
                0,
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidVotingPeriod { .. }));

        // Non-member proposer under require_membership
        let err = engine
            .create_proposal(
                org,
                addr(50),
                draft(VotingPowerModel::Democratic, VotingType::Relative),
                0,
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InsufficientVotingPower(_)));

        // Unknown organization
        let err = engine
            .create_proposal(
                OrgId::new(99),
                addr(1),
                draft(VotingPowerModel::Democratic, VotingType::Relative),
                0,
            )
            .unwrap_err();
        assert_eq!(err, GovernanceError::OrganizationNotFound(OrgId::new(99)));
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let (mut engine, org) = engine();
        let id = engine
            .create_proposal(
                org,
                addr(1),
                draft(VotingPowerModel::Weighted, VotingType::Relative),
                u64::MAX,
            )
            .unwrap();

        // The window saturates to an empty one at the end of time
        let p = engine.proposal(id).unwrap();
        assert_eq!(p.voting_starts, u64::MAX);
        assert_eq!(p.voting_ends, u64::MAX);
        assert!(!p.voting_open(u64::MAX));
    }

    #[test]
    fn proposal_threshold_gates_creation() {
        let (mut engine, org) = engine();
        let mut params = test_params();
        params.proposal_threshold_bps = 5_000; // 50% of 300 = 150
        engine.set_voting_parameters(org, addr(ADMIN), params).unwrap();

        // Each member holds 100 of 300 (33%), below 50%
        let err = engine
            .create_proposal(
                org,
                addr(1),
                draft(VotingPowerModel::Weighted, VotingType::Relative),
                0,
            )
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InsufficientVotingPower(_)));

        // Delegation pushes addr(1) over the threshold
        engine.delegate_voting_power(org, addr(2), addr(1), 100).unwrap();
        engine
            .create_proposal(
                org,
                addr(1),
                draft(VotingPowerModel::Weighted, VotingType::Relative),
                0,
            )
            .unwrap();
    }

    #[test]
    fn voting_window_boundaries() {
        let (mut engine, org) = engine();
        let (id, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Democratic, VotingType::Relative);

        // Before the window
        let err = engine
            .cast_vote(id, addr(1), VoteChoice::For, String::new(), starts - 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::VotingNotActive);

        // Exactly at voting_starts: counts
        engine
            .cast_vote(id, addr(1), VoteChoice::For, String::new(), starts)
            .unwrap();

        // Exactly at voting_ends: rejected
        let err = engine
            .cast_vote(id, addr(2), VoteChoice::For, String::new(), ends)
            .unwrap_err();
        assert_eq!(err, GovernanceError::VotingNotActive);
    }

    #[test]
    fn one_vote_per_voter() {
        let (mut engine, org) = engine();
        let (id, starts, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Democratic, VotingType::Relative);

        engine
            .cast_vote(id, addr(1), VoteChoice::For, String::new(), starts)
            .unwrap();
        let err = engine
            .cast_vote(id, addr(1), VoteChoice::Against, String::new(), starts + 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyVoted);

        // Original vote survives untouched
        let vote = engine.vote(id, addr(1)).unwrap();
        assert_eq!(vote.choice, VoteChoice::For);
        assert_eq!(vote.voting_power, 1);
    }

    #[test]
    fn nonmember_and_zero_power_votes_rejected() {
        let (mut engine, org) = engine();
        let (id, starts, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);

        let err = engine
            .cast_vote(id, addr(50), VoteChoice::For, String::new(), starts)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InsufficientVotingPower(_)));

        // A member who delegated everything away has zero usable weight
        engine.delegate_voting_power(org, addr(1), addr(2), 100).unwrap();
        let err = engine
            .cast_vote(id, addr(1), VoteChoice::For, String::new(), starts)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InsufficientVotingPower(_)));
    }

    #[test]
    fn zero_weight_vote_admissible_without_membership_requirement() {
        let (mut engine, org) = engine();
        let mut params = test_params();
        params.require_membership = false;
        engine.set_voting_parameters(org, addr(ADMIN), params).unwrap();

        let (id, starts, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);

        // A non-member with no balance may record a position
        assert!(engine.can_vote(id, addr(50), starts).unwrap());
        let counted = engine
            .cast_vote(id, addr(50), VoteChoice::For, String::new(), starts)
            .unwrap();
        assert_eq!(counted, 0);

        // The vote exists but moves no tallies
        assert!(engine.vote(id, addr(50)).is_some());
        let p = engine.proposal(id).unwrap();
        assert_eq!(p.votes_for, 0);
        assert_eq!(p.total_power_cast, 0);
    }

    #[test]
    fn scenario_relative_with_quorum() {
        // 10% quorum, weighted voting, 3 members of 100 each
        let (mut engine, org) = engine();
        let (id, starts, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);

        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(2), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(3), VoteChoice::Against, String::new(), starts).unwrap();

        let result = engine.proposal_result(id).unwrap();
        assert_eq!(result.quorum_required, 30); // 10% of 300
        assert!(result.quorum_reached);
        assert_eq!(result.votes_for, 200);
        assert_eq!(result.votes_against, 100);
        assert!(result.passed);
    }

    #[test]
    fn quorum_failure_defeats() {
        let (mut engine, org) = engine();
        let mut params = test_params();
        params.quorum_bps = 9_000; // 90% of 300 = 270
        engine.set_voting_parameters(org, addr(ADMIN), params).unwrap();

        let (id, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);
        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();

        let result = engine.proposal_result(id).unwrap();
        assert!(!result.quorum_reached);
        assert!(!result.passed);

        let err = engine.queue_proposal(id, ends + 1).unwrap_err();
        assert_eq!(err, GovernanceError::ProposalNotPassed);
        assert_eq!(
            engine.proposal_state(id, ends + 1).unwrap(),
            ProposalState::Defeated
        );
    }

    #[test]
    fn recorded_defeat_is_terminal() {
        // 10 democratic members, 50% quorum: 2 votes cannot reach it
        let members = TestMembers((1..=10).map(addr).collect());
        let mut engine = GovernanceEngine::new(
            members,
            TestBalances(HashMap::new()),
            TestReputation(HashMap::new()),
            TestExecutor::default(),
        );
        let mut params = test_params();
        params.quorum_bps = 5_000;
        let org = engine.register_organization(addr(ADMIN), params).unwrap();

        let (id, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Democratic, VotingType::Relative);
        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(2), VoteChoice::For, String::new(), starts).unwrap();

        let err = engine.queue_proposal(id, ends).unwrap_err();
        assert_eq!(err, GovernanceError::ProposalNotPassed);
        assert_eq!(engine.proposal(id).unwrap().state, ProposalState::Defeated);

        // Shrinking the roster to 3 would put the 2 cast votes over quorum,
        // but the recorded defeat stands
        engine.membership.0.truncate(3);
        assert!(engine.proposal_result(id).unwrap().quorum_reached);

        let err = engine.queue_proposal(id, ends + 1).unwrap_err();
        assert_eq!(err, GovernanceError::ProposalNotPassed);
        assert_eq!(engine.proposal(id).unwrap().state, ProposalState::Defeated);
    }

    #[test]
    fn scenario_supermajority() {
        // Four democratic members, 3 For / 1 Against = 75% of decisive votes
        let members = TestMembers(vec![addr(1), addr(2), addr(3), addr(4)]);
        let balances = TestBalances(HashMap::new());
        let mut engine = GovernanceEngine::new(
            members,
            balances,
            TestReputation(HashMap::new()),
            TestExecutor::default(),
        );
        let org = engine
            .register_organization(addr(ADMIN), test_params())
            .unwrap();

        let (id, starts, _) = open_proposal(
            &mut engine,
            org,
            VotingPowerModel::Democratic,
            VotingType::Supermajority,
        );
        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(2), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(3), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(4), VoteChoice::Against, String::new(), starts).unwrap();

        assert!(engine.proposal_result(id).unwrap().passed);
    }

    #[test]
    fn supermajority_boundary() {
        // 2 For / 1 Against = 66.66%, just under the 66.67% bar
        let (mut engine, org) = engine();
        let (id, starts, _) = open_proposal(
            &mut engine,
            org,
            VotingPowerModel::Democratic,
            VotingType::Supermajority,
        );
        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(2), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(3), VoteChoice::Against, String::new(), starts).unwrap();

        assert!(!engine.proposal_result(id).unwrap().passed);
    }

    #[test]
    fn quadratic_tallies_accumulate_roots() {
        let members = TestMembers(vec![addr(1), addr(2)]);
        let balances = TestBalances(HashMap::from([(addr(1), 10_000), (addr(2), 100)]));
        let mut engine = GovernanceEngine::new(
            members,
            balances,
            TestReputation(HashMap::new()),
            TestExecutor::default(),
        );
        let org = engine
            .register_organization(addr(ADMIN), test_params())
            .unwrap();

        let (id, starts, _) = open_proposal(
            &mut engine,
            org,
            VotingPowerModel::Weighted,
            VotingType::Quadratic,
        );
        let counted = engine
            .cast_vote(id, addr(1), VoteChoice::For, String::new(), starts)
            .unwrap();
        assert_eq!(counted, 100); // sqrt(10000)
        engine.cast_vote(id, addr(2), VoteChoice::Against, String::new(), starts).unwrap();

        let p = engine.proposal(id).unwrap();
        assert_eq!(p.votes_for, 100);
        assert_eq!(p.votes_against, 10); // sqrt(100)
        assert!(engine.proposal_result(id).unwrap().passed);
    }

    #[test]
    fn conviction_vote_and_decay() {
        let (mut engine, org) = engine();
        let (id, starts, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);

        // 1-day lock: 100 * 1.1 = 110
        let counted = engine
            .cast_vote_with_conviction(id, addr(1), VoteChoice::For, DAY, String::new(), starts)
            .unwrap();
        assert_eq!(counted, 110);
        assert_eq!(engine.proposal(id).unwrap().votes_for, 110);

        // Projection decays to base after the lock elapses, tallies untouched
        let projected = engine
            .apply_conviction_decay(id, addr(1), starts + DAY)
            .unwrap();
        assert_eq!(projected, 100);
        assert_eq!(engine.proposal(id).unwrap().votes_for, 110);
        assert_eq!(engine.vote(id, addr(1)).unwrap().voting_power, 110);

        // Callable for voters with no lock (plain vote) and for non-voters
        engine
            .cast_vote(id, addr(2), VoteChoice::Against, String::new(), starts)
            .unwrap();
        assert_eq!(
            engine.apply_conviction_decay(id, addr(2), starts + DAY).unwrap(),
            100
        );
        assert_eq!(engine.apply_conviction_decay(id, addr(3), starts).unwrap(), 0);
    }

    #[test]
    fn reputation_weighted_power() {
        let members = TestMembers(vec![addr(1)]);
        let balances = TestBalances(HashMap::from([(addr(1), 100)]));
        let reputation = TestReputation(HashMap::from([(addr(1), 2_000)]));
        let engine = GovernanceEngine::new(
            members,
            balances,
            reputation,
            TestExecutor::default(),
        );
        assert_eq!(
            engine.voting_power(OrgId::new(1), addr(1), VotingPowerModel::ReputationWeighted),
            200
        );
    }

    #[test]
    fn timelock_scenario() {
        let (mut engine, org) = engine();
        let (id, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);
        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        engine.cast_vote(id, addr(2), VoteChoice::For, String::new(), starts).unwrap();

        // Cannot queue during the window
        let err = engine.queue_proposal(id, ends - 1).unwrap_err();
        assert_eq!(err, GovernanceError::VotingNotEnded);

        let t0 = ends + 10;
        engine.queue_proposal(id, t0).unwrap();
        assert_eq!(engine.proposal(id).unwrap().state, ProposalState::Queued);
        assert_eq!(engine.proposal(id).unwrap().queued_at, Some(t0));

        let err = engine.queue_proposal(id, t0 + 1).unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyQueued);

        // One day in: timelock (2 days) not elapsed
        let err = engine.execute_proposal(id, t0 + DAY).unwrap_err();
        assert_eq!(err, GovernanceError::TimelockNotElapsed { remaining: DAY });

        // Just past the timelock: executes exactly once
        let outcome = engine.execute_proposal(id, t0 + 2 * DAY + 1).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.return_data, vec![0xde, 0xad]);

        let p = engine.proposal(id).unwrap();
        assert!(p.executed);
        assert_eq!(p.state, ProposalState::Executed);
        assert_eq!(engine.executor.dispatches.get(), 1);

        let err = engine.execute_proposal(id, t0 + 3 * DAY).unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyExecuted);
        assert_eq!(engine.executor.dispatches.get(), 1);
    }

    #[test]
    fn execute_requires_queued_state() {
        let (mut engine, org) = engine();
        let (id, _, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);
        let err = engine.execute_proposal(id, 10 * DAY).unwrap_err();
        assert_eq!(err, GovernanceError::ProposalNotQueued);
    }

    #[test]
    fn failed_dispatch_leaves_proposal_queued() {
        let (mut engine, org) = engine();
        let (id, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);
        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        engine.queue_proposal(id, ends).unwrap();

        engine.executor.fail = true;
        let err = engine.execute_proposal(id, ends + 2 * DAY).unwrap_err();
        assert!(matches!(err, GovernanceError::ExecutionFailed(_)));

        let p = engine.proposal(id).unwrap();
        assert!(!p.executed);
        assert_eq!(p.state, ProposalState::Queued);

        // Retry succeeds once the collaborator recovers
        engine.executor.fail = false;
        engine.execute_proposal(id, ends + 2 * DAY + 5).unwrap();
        assert!(engine.proposal(id).unwrap().executed);
    }

    #[test]
    fn preview_has_no_side_effects() {
        let (mut engine, org) = engine();
        let (id, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);
        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        engine.queue_proposal(id, ends).unwrap();

        for _ in 0..3 {
            let outcome = engine.preview_execution(id).unwrap();
            assert!(outcome.success);
        }

        let p = engine.proposal(id).unwrap();
        assert!(!p.executed);
        assert_eq!(p.state, ProposalState::Queued);
        assert_eq!(engine.executor.dispatches.get(), 0);
        assert_eq!(engine.executor.simulations.get(), 3);
    }

    #[test]
    fn estimate_execution_cost_is_a_pure_read() {
        let (mut engine, org) = engine();
        let (id, _, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);
        assert_eq!(engine.estimate_execution_cost(id).unwrap(), 21_002);
        assert_eq!(engine.executor.dispatches.get(), 0);
    }

    #[test]
    fn cancelled_proposal_is_not_votable() {
        let (mut engine, org) = engine();
        let (id, starts, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Democratic, VotingType::Relative);

        engine.cancel_proposal(id, addr(1)).unwrap();
        assert_eq!(
            engine.proposal_state(id, starts).unwrap(),
            ProposalState::Cancelled
        );

        let err = engine
            .cast_vote(id, addr(2), VoteChoice::For, String::new(), starts)
            .unwrap_err();
        assert_eq!(err, GovernanceError::VotingNotActive);
    }

    #[test]
    fn emergency_cancel_is_admin_only() {
        let (mut engine, org) = engine();
        let (id, _, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Democratic, VotingType::Relative);

        let err = engine.emergency_cancel(id, addr(2)).unwrap_err();
        assert!(matches!(err, GovernanceError::Unauthorized(_)));

        engine.emergency_cancel(id, addr(ADMIN)).unwrap();
        assert!(engine.proposal(id).unwrap().cancelled);

        // Same state rule as a normal cancel: no double-cancel
        let err = engine.emergency_cancel(id, addr(ADMIN)).unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyCancelled);
    }

    #[test]
    fn update_proposal_delegates_to_store_rules() {
        let (mut engine, org) = engine();
        let (id, _, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Democratic, VotingType::Relative);

        engine
            .update_proposal(
                id,
                addr(1),
                ProposalUpdate {
                    description: Some("Clarified".to_string()),
                    ..Default::default()
                },
                50,
            )
            .unwrap();
        assert_eq!(engine.proposal(id).unwrap().description, "Clarified");

        let err = engine
            .update_proposal(id, addr(2), ProposalUpdate::default(), 50)
            .unwrap_err();
        assert_eq!(err, GovernanceError::UnauthorizedProposalAccess);
    }

    #[test]
    fn delegation_views() {
        let (mut engine, org) = engine();
        engine.delegate_voting_power(org, addr(1), addr(2), 40).unwrap();
        engine.delegate_voting_power(org, addr(1), addr(3), 10).unwrap();

        assert_eq!(engine.delegated_voting_power(org, addr(2)), 40);
        assert_eq!(engine.delegations(org, addr(1)).len(), 2);
        assert_eq!(
            engine.voting_power(org, addr(1), VotingPowerModel::Weighted),
            50
        );
        assert_eq!(
            engine.voting_power(org, addr(2), VotingPowerModel::Weighted),
            140
        );

        // Over-undelegation is rejected by the ledger
        let err = engine
            .undelegate_voting_power(org, addr(1), addr(2), 41)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidDelegation(_)));

        // Delegation to an unknown organization is rejected up front
        let err = engine
            .delegate_voting_power(OrgId::new(42), addr(1), addr(2), 1)
            .unwrap_err();
        assert_eq!(err, GovernanceError::OrganizationNotFound(OrgId::new(42)));
    }

    #[test]
    fn parameter_administration() {
        let (mut engine, org) = engine();

        let err = engine
            .set_voting_parameters(org, addr(1), test_params())
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Unauthorized(_)));

        let mut params = test_params();
        params.quorum_bps = 2_500;
        engine.set_voting_parameters(org, addr(ADMIN), params).unwrap();
        assert_eq!(engine.voting_parameters(org).unwrap().quorum_bps, 2_500);

        // Invalid parameters are rejected even for the admin
        let mut params = test_params();
        params.voting_period = 10;
        let err = engine
            .set_voting_parameters(org, addr(ADMIN), params)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::InvalidVotingPeriod { .. }));

        assert_eq!(
            TestEngine::default_voting_parameters(),
            VotingParameters::default()
        );
    }

    #[test]
    fn state_views() {
        let (mut engine, org) = engine();
        let (id1, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);
        let (id2, _, _) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);

        assert_eq!(engine.proposals_by_organization(org).len(), 2);
        assert_eq!(
            engine.proposals_by_state(org, ProposalState::Pending, 0).len(),
            2
        );
        assert_eq!(
            engine.proposals_by_state(org, ProposalState::Active, starts).len(),
            2
        );

        engine.cast_vote(id1, addr(1), VoteChoice::For, String::new(), starts).unwrap();

        // After the window: id1 succeeded, id2 defeated (no votes)
        let succeeded = engine.proposals_by_state(org, ProposalState::Succeeded, ends);
        assert_eq!(succeeded.len(), 1);
        assert_eq!(succeeded[0].id, id1);
        let defeated = engine.proposals_by_state(org, ProposalState::Defeated, ends);
        assert_eq!(defeated.len(), 1);
        assert_eq!(defeated[0].id, id2);
    }

    #[test]
    fn can_vote_view() {
        let (mut engine, org) = engine();
        let (id, starts, ends) =
            open_proposal(&mut engine, org, VotingPowerModel::Weighted, VotingType::Relative);

        assert!(!engine.can_vote(id, addr(1), starts - 1).unwrap());
        assert!(engine.can_vote(id, addr(1), starts).unwrap());
        assert!(!engine.can_vote(id, addr(50), starts).unwrap()); // non-member
        assert!(!engine.can_vote(id, addr(1), ends).unwrap());

        engine.cast_vote(id, addr(1), VoteChoice::For, String::new(), starts).unwrap();
        assert!(!engine.can_vote(id, addr(1), starts + 1).unwrap());

        assert!(engine.can_vote(ProposalId::new(99), addr(1), starts).is_err());
    }

    #[test]
    fn validate_draft_without_creating() {
        let (engine, org) = engine();
        assert!(engine
            .validate_proposal_parameters(
                org,
                &draft(VotingPowerModel::Democratic, VotingType::Relative)
            )
            .is_ok());
        assert!(engine
            .validate_proposal_parameters(org, &ProposalDraft::default())
            .is_err());
        assert_eq!(engine.proposal_count(org).unwrap(), 0);
    }
}
