//! Markers: the singleton self marker, the replaceable provider set, and
//! selection reporting.

pub mod registry;
pub mod site;

pub use registry::{MarkerRegistry, USER_MARKER_ID};
pub use site::ProviderSite;

/// Who a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// The "you are here" marker; at most one per surface.
    UserLocation,
    /// A car-wash site marker; one per provider record.
    Provider,
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerKind::UserLocation => write!(f, "user"),
            MarkerKind::Provider => write!(f, "provider"),
        }
    }
}
