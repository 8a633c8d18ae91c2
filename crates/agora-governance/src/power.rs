//! Voting-power resolution and collaborator interfaces.
//!
//! Balances, reputation scores, membership and the execution target live
//! outside the engine; they are injected behind these traits and consulted
//! at well-defined points (vote casting, result computation, dispatch).

use agora_types::{Address, OrgId};

use crate::delegation::DelegationLedger;
use crate::proposal::VotingPowerModel;

/// Reputation multiplier value meaning 1.0x (per-mille scale).
pub const NEUTRAL_REPUTATION: u32 = 1_000;

/// ReputationWeighted power is capped at this multiple of the base weight.
pub const REPUTATION_CAP_FACTOR: u128 = 3;

/// Token/stake balances per organization.
pub trait BalanceProvider {
    fn balance_of(&self, org: OrgId, member: Address) -> u128;
}

/// Reputation scores, expressed per-mille (1000 = neutral).
pub trait ReputationProvider {
    fn multiplier(&self, org: OrgId, member: Address) -> u32;
}

/// Organization membership registry.
pub trait MembershipProvider {
    fn is_member(&self, org: OrgId, member: Address) -> bool;

    /// All current members; the quorum denominator is the sum of their
    /// resolved power at evaluation time.
    fn members(&self, org: OrgId) -> Vec<Address>;
}

/// Result of dispatching (or simulating) an execution payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub return_data: Vec<u8>,
}

/// Receives queued proposals' payloads after the timelock.
pub trait ExecutionTarget {
    /// Dispatch for real. Called at most once per proposal; a failure
    /// leaves the proposal queued and retryable.
    fn dispatch(&mut self, target: Option<Address>, payload: &[u8]) -> DispatchOutcome;

    /// Simulate a dispatch with no observable side effects.
    fn simulate(&self, target: Option<Address>, payload: &[u8]) -> DispatchOutcome;

    /// Estimated cost of dispatching, in target-defined units.
    fn estimate_cost(&self, target: Option<Address>, payload: &[u8]) -> u64;
}

/// Resolve a member's voting weight under the given model.
///
/// Weighted power is the external balance minus anything delegated away
/// plus anything delegated in. ReputationWeighted scales that by the
/// reputation multiplier and caps the result at 3x base to bound
/// plutocratic dominance.
pub fn resolve_power<B, R>(
    org: OrgId,
    member: Address,
    model: VotingPowerModel,
    balances: &B,
    reputation: &R,
    delegations: &DelegationLedger,
) -> u128
where
    B: BalanceProvider,
    R: ReputationProvider,
{
    match model {
        VotingPowerModel::Democratic => 1,
        VotingPowerModel::Weighted => weighted_power(org, member, balances, delegations),
        VotingPowerModel::ReputationWeighted => {
            let base = weighted_power(org, member, balances, delegations);
            let multiplier = reputation.multiplier(org, member) as u128;
            let scaled = base
                .saturating_mul(multiplier)
                .checked_div(NEUTRAL_REPUTATION as u128)
                .unwrap_or(0);
            scaled.min(base.saturating_mul(REPUTATION_CAP_FACTOR))
        }
    }
}

fn weighted_power<B: BalanceProvider>(
    org: OrgId,
    member: Address,
    balances: &B,
    delegations: &DelegationLedger,
) -> u128 {
    balances
        .balance_of(org, member)
        .saturating_sub(delegations.delegated_away(org, member))
        .saturating_add(delegations.delegated_to(org, member))
}

/// Sum of all members' resolved power at this instant.
///
/// This is the quorum denominator. It is deliberately *not* a snapshot:
/// balance or membership changes during the voting window move the quorum
/// target with them.
pub fn aggregate_power<M, B, R>(
    org: OrgId,
    model: VotingPowerModel,
    membership: &M,
    balances: &B,
    reputation: &R,
    delegations: &DelegationLedger,
) -> u128
where
    M: MembershipProvider,
    B: BalanceProvider,
    R: ReputationProvider,
{
    membership
        .members(org)
        .into_iter()
        .fold(0u128, |acc, member| {
            acc.saturating_add(resolve_power(
                org,
                member,
                model,
                balances,
                reputation,
                delegations,
            ))
        })
}

/// Integer square root using Newton's method. Returns floor(sqrt(n)).
///
/// Quadratic voting accumulates sqrt(power) into the tallies at cast time.
pub fn integer_sqrt(n: u128) -> u128 {
    if n <= 1 {
        return n;
    }

    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
