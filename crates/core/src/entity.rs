//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stock records are replaced wholesale on every change; the identifier is the
/// only thing that stays the same between two versions of a record.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// True when `other` is a version of the same record.
    fn same_identity(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
