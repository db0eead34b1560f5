//! URL handling module for Deadlink
//!
//! This module provides link resolution, fragment stripping, internal/external
//! classification against the seed origin, and host extraction for report names.

mod domain;
mod normalize;
mod origin;

// Re-export main functions
pub use domain::{extract_host, report_file_name};
pub use normalize::{resolve, strip_fragment, NormalizedUrl};
pub use origin::{classify, seed_origin, OriginPolicy, Scope};

/// Where a link points relative to the seed origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkOrigin {
    /// Same origin as the seed
    Internal,
    /// Anything else
    External,
}

impl LinkOrigin {
    /// Returns true for internal links
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }

    /// Returns true for external links
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External)
    }
}

impl std::fmt::Display for LinkOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
        }
    }
}
