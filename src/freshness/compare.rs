//! Freshness decision procedure
//!
//! [`decide`] is called repeatedly with whatever registry info has been
//! fetched so far. It either asks for the next lookup or returns a verdict:
//!
//! ```text
//! NeedLatest ──> NeedCurrent ──> Decided
//!      └────────────────────────────┘ (digest equal, or tag is `latest`)
//! ```
//!
//! GHCR starts at `NeedCurrent`, since its version list answers the question
//! directly.

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::freshness::types::Verdict;
use crate::reference::{ImageReference, LATEST_TAG};
use crate::registry::{ComparisonStrategy, ImageInfo, Platform, PlatformDigest};

/// Next step of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Fetch info for the `latest` tag
    NeedLatest,
    /// Fetch info for the container's own tag
    NeedCurrent,
    /// Done
    Decided(Verdict),
}

/// Everything known about one container so far
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    pub strategy: ComparisonStrategy,
    pub reference: &'a ImageReference,
    /// Every repository digest recorded for the local image
    pub recorded_digests: &'a [String],
    pub platform: &'a Platform,
    pub latest: Option<&'a ImageInfo>,
    pub current: Option<&'a ImageInfo>,
}

/// Advance the decision procedure.
///
/// Fails with `ArchitectureMismatch` when either side of a Docker Hub
/// comparison has no entry for the container's platform.
pub fn decide(comparison: &Comparison<'_>) -> ImgfreshResult<Decision> {
    match comparison.strategy {
        ComparisonStrategy::PlatformDigests => decide_by_platform(comparison),
        ComparisonStrategy::TagMembership => Ok(decide_by_tags(comparison)),
    }
}

fn decide_by_platform(c: &Comparison<'_>) -> ImgfreshResult<Decision> {
    let Some(latest) = c.latest else {
        return Ok(Decision::NeedLatest);
    };

    // A recorded digest may be the manifest list or this platform's manifest
    let latest_platform = latest.platform_digest(c.platform);
    if c.recorded_digests.iter().any(|recorded| {
        (!latest.digest.is_empty() && *recorded == latest.digest)
            || latest_platform == Some(recorded.as_str())
    }) {
        return Ok(Decision::Decided(Verdict::Yes));
    }

    // Nothing else to compare against
    if c.reference.is_latest() {
        return Ok(Decision::Decided(Verdict::No));
    }

    let Some(current) = c.current else {
        return Ok(Decision::NeedCurrent);
    };

    let current_entry = platform_entry(c, current, "current")?;
    let latest_entry = platform_entry(c, latest, LATEST_TAG)?;

    // With a known variant, both sides must resolve to it or neither may
    if let Some(ref variant) = c.platform.variant {
        let exact = |entry: &PlatformDigest| entry.variant.as_deref() == Some(variant.as_str());
        match (exact(current_entry), exact(latest_entry)) {
            (true, false) => return Err(mismatch(c, LATEST_TAG)),
            (false, true) => return Err(mismatch(c, "current")),
            _ => {}
        }
    }

    let verdict = if current_entry.digest == latest_entry.digest {
        Verdict::Yes
    } else {
        Verdict::No
    };
    Ok(Decision::Decided(verdict))
}

fn platform_entry<'i>(
    c: &Comparison<'_>,
    info: &'i ImageInfo,
    side: &'static str,
) -> ImgfreshResult<&'i PlatformDigest> {
    info.platform_entry(c.platform).ok_or_else(|| mismatch(c, side))
}

fn mismatch(c: &Comparison<'_>, side: &'static str) -> ImgfreshError {
    ImgfreshError::ArchitectureMismatch {
        image: c.reference.to_string(),
        platform: c.platform.to_string(),
        side,
    }
}

fn decide_by_tags(c: &Comparison<'_>) -> Decision {
    match c.current {
        None => Decision::NeedCurrent,
        Some(current) if current.has_tag(LATEST_TAG) => Decision::Decided(Verdict::Yes),
        Some(_) => Decision::Decided(Verdict::No),
    }
}
