//! Version range matching against catalog version keys

use crate::version::segment::{is_gt, is_ok};

/// Trait for picking a catalog version that satisfies a requested range
pub trait VersionMatcher: Send + Sync {
    /// Find the best catalog version satisfying `requested`
    ///
    /// Only called after an exact key lookup missed.
    fn find_best_version<'a>(
        &self,
        requested: &str,
        candidates: &mut dyn Iterator<Item = &'a str>,
    ) -> Option<&'a str>;
}

/// Three-segment wildcard matcher
///
/// Supports:
/// - `2.1.x`, `2.1.*` - any patch of 2.1
/// - `2.x`, `2.*` - any minor and patch of 2
/// - `2.1`, `2` - treated as `2.1.x`, `2.x`
///
/// Among all satisfying versions the greatest one wins; on equal versions
/// the one seen first in catalog order is kept.
pub struct SegmentMatcher;

impl SegmentMatcher {
    /// Turn an exact-looking request into "any patch" of it
    fn normalize(requested: &str) -> String {
        if requested.contains(".x") || requested.contains(".*") {
            requested.to_string()
        } else {
            format!("{requested}.x")
        }
    }
}

impl VersionMatcher for SegmentMatcher {
    fn find_best_version<'a>(
        &self,
        requested: &str,
        candidates: &mut dyn Iterator<Item = &'a str>,
    ) -> Option<&'a str> {
        let requested = Self::normalize(requested);

        candidates
            .filter(|key| key.starts_with(|c: char| c.is_ascii_digit()))
            .filter(|key| is_ok(&requested, key))
            .fold(None, |best, key| match best {
                Some(current) if !is_gt(key, current) => Some(current),
                _ => Some(key),
            })
    }
}
