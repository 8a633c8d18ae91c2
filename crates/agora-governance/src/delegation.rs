//! Delegation bookkeeping.
//!
//! A delegator may split delegations across several delegatees, but the sum
//! of active delegations never exceeds their own base power. Delegation
//! moves the *usage* of power, not ownership: the delegator's usable weight
//! drops by the delegated amount and the delegatee's rises by it, for as
//! long as the entry exists.

use std::collections::HashMap;

use agora_types::{Address, OrgId};

use crate::error::GovernanceError;

/// One active delegation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub org: OrgId,
    pub delegator: Address,
    pub delegatee: Address,
    pub amount: u128,
}

/// Tracks delegated amounts between members, per organization.
///
/// Forward entries and the per-member totals are updated together in every
/// operation; no partial update is observable.
#[derive(Debug, Default)]
pub struct DelegationLedger {
    entries: HashMap<(OrgId, Address, Address), u128>,
    /// Total a member has delegated away
    outgoing: HashMap<(OrgId, Address), u128>,
    /// Total delegated to a member
    incoming: HashMap<(OrgId, Address), u128>,
}

impl DelegationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or increase a delegation.
    ///
    /// `delegator_base` is the delegator's own base power as reported by the
    /// balance collaborator; the sum of their active delegations may never
    /// exceed it.
    pub fn delegate(
        &mut self,
        org: OrgId,
        delegator: Address,
        delegatee: Address,
        amount: u128,
        delegator_base: u128,
    ) -> Result<(), GovernanceError> {
        if delegatee.is_zero() {
            return Err(GovernanceError::InvalidDelegation(
                "delegatee must not be the zero address".to_string(),
            ));
        }
        if delegatee == delegator {
            return Err(GovernanceError::InvalidDelegation(
                "self-delegation is not allowed".to_string(),
            ));
        }
        if amount == 0 {
            return Err(GovernanceError::InvalidDelegation(
                "amount must be non-zero".to_string(),
            ));
        }

        let already_out = self.delegated_away(org, delegator);
        if already_out.saturating_add(amount) > delegator_base {
            return Err(GovernanceError::InvalidDelegation(format!(
                "delegating {} would exceed base power {} (already delegated {})",
                amount, delegator_base, already_out
            )));
        }

        *self.entries.entry((org, delegator, delegatee)).or_insert(0) += amount;
        *self.outgoing.entry((org, delegator)).or_insert(0) += amount;
        *self.incoming.entry((org, delegatee)).or_insert(0) += amount;
        Ok(())
    }

    /// Reduce or remove a delegation. `amount` must not exceed what is
    /// currently delegated to that delegatee.
    pub fn undelegate(
        &mut self,
        org: OrgId,
        delegator: Address,
        delegatee: Address,
        amount: u128,
    ) -> Result<(), GovernanceError> {
        if amount == 0 {
            return Err(GovernanceError::InvalidDelegation(
                "amount must be non-zero".to_string(),
            ));
        }
        let key = (org, delegator, delegatee);
        let current = self.entries.get(&key).copied().unwrap_or(0);
        if amount > current {
            return Err(GovernanceError::InvalidDelegation(format!(
                "cannot undelegate {}: only {} delegated",
                amount, current
            )));
        }

        let remaining = current - amount;
        if remaining == 0 {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, remaining);
        }
        Self::decrease(&mut self.outgoing, (org, delegator), amount);
        Self::decrease(&mut self.incoming, (org, delegatee), amount);
        Ok(())
    }

    fn decrease(totals: &mut HashMap<(OrgId, Address), u128>, key: (OrgId, Address), by: u128) {
        if let Some(total) = totals.get_mut(&key) {
            *total = total.saturating_sub(by);
            if *total == 0 {
                totals.remove(&key);
            }
        }
    }

    /// Total the member has delegated away.
    pub fn delegated_away(&self, org: OrgId, member: Address) -> u128 {
        self.outgoing.get(&(org, member)).copied().unwrap_or(0)
    }

    /// Total delegated to the member.
    pub fn delegated_to(&self, org: OrgId, member: Address) -> u128 {
        self.incoming.get(&(org, member)).copied().unwrap_or(0)
    }

    /// All active delegations made by a member.
    pub fn delegations_of(&self, org: OrgId, delegator: Address) -> Vec<Delegation> {
        let mut out: Vec<Delegation> = self
            .entries
            .iter()
            .filter(|((o, d, _), _)| *o == org && *d == delegator)
            .map(|((o, d, e), amount)| Delegation {
                org: *o,
                delegator: *d,
                delegatee: *e,
                amount: *amount,
            })
            .collect();
        out.sort_by_key(|d| d.delegatee);
        out
    }
}
