//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Products and customers are identified by their business code, which never
/// changes after creation.
pub trait Entity {
    /// Identifier (the unique business code).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
