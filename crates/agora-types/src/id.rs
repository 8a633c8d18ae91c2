use derive_more::{Display, From, Into};

/// Identifier of a registered organization.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into,
)]
pub struct OrgId(pub u64);

/// Globally unique proposal identifier.
///
/// Proposals are logically scoped to an organization; the id itself is a
/// single monotonic counter so lookups never need the org as part of the key.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into,
)]
pub struct ProposalId(pub u64);

impl OrgId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl ProposalId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}
