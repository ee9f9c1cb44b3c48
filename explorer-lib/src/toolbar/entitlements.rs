//! Feature gating for toolbar affordances

use std::collections::HashSet;

/// Answers whether a named feature is enabled for the current user.
///
/// The toolbar only uses this to decide whether a gated facet is shown and
/// editable; it carries no other meaning.
pub trait Entitlements: Send + Sync {
    /// Returns `true` if `feature` is enabled.
    fn is_enabled(&self, feature: &str) -> bool;
}

/// Enables every feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Entitlements for AllowAll {
    fn is_enabled(&self, _feature: &str) -> bool {
        true
    }
}

/// Enables exactly the listed features.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    enabled: HashSet<String>,
}

impl FeatureSet {
    /// Creates a feature set from names.
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: features.into_iter().map(Into::into).collect(),
        }
    }
}

impl Entitlements for FeatureSet {
    fn is_enabled(&self, feature: &str) -> bool {
        self.enabled.contains(feature)
    }
}
