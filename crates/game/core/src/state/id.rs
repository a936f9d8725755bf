use std::fmt;

/// Unique identifier for a live creature in the host world.
///
/// The id is a lookup handle only: holding one never keeps a creature alive,
/// and every use must re-check liveness through [`World`](crate::env::World).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
