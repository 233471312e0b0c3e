//! Per-run freshness checker
//!
//! Owns the run cache and the result list. Containers are checked one at a
//! time; every failure becomes an `unknown` verdict and the run moves on.

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::freshness::compare::{decide, Comparison, Decision};
use crate::freshness::types::{CheckResult, ContainerObservation, Verdict};
use crate::reference::{ImageReference, LATEST_TAG};
use crate::registry::{ComparisonStrategy, ImageInfo, Registry, RunCache};
use tracing::{debug, error, warn};

/// State for one check run
pub struct FreshnessChecker {
    registry: Registry,
    cache: RunCache,
    results: Vec<CheckResult>,
}

impl FreshnessChecker {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            cache: RunCache::new(),
            results: Vec::new(),
        }
    }

    /// Check one container and record its result
    pub fn check(&mut self, observation: &ContainerObservation) -> Verdict {
        let reference = observation.reference();

        let verdict = match self.evaluate(observation) {
            Ok(verdict) => verdict,
            Err(e) if e.is_per_container() => {
                warn!("Unable to check {} ({}): {}", observation.name, reference, e);
                Verdict::Unknown
            }
            Err(e) => {
                error!("Unexpected failure checking {} ({}): {}", observation.name, reference, e);
                Verdict::Unknown
            }
        };

        debug!("{:>10} {} {}", format!("[{}]", verdict), observation.name, reference);
        self.results.push(CheckResult {
            container: observation.name.clone(),
            image: reference.to_string(),
            verdict,
        });
        verdict
    }

    /// Check every container in order and return the results so far
    pub fn run(&mut self, observations: &[ContainerObservation]) -> &[CheckResult] {
        for observation in observations {
            self.check(observation);
        }
        self.results()
    }

    /// Results so far, in check order
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<CheckResult> {
        self.results
    }

    /// Number of distinct registry lookups made so far
    pub fn lookups(&self) -> usize {
        self.cache.len()
    }

    fn evaluate(&mut self, observation: &ContainerObservation) -> ImgfreshResult<Verdict> {
        let reference = observation.reference();
        let recorded_digests = observation.recorded_digests.as_slice();
        if recorded_digests.is_empty() {
            return Err(ImgfreshError::MissingDigest {
                image: reference.to_string(),
            });
        }

        let strategy = self.registry.resolver_for(&reference).strategy();
        let mut latest: Option<ImageInfo> = None;
        let mut current: Option<ImageInfo> = None;

        loop {
            let decision = decide(&Comparison {
                strategy,
                reference: &reference,
                recorded_digests,
                platform: &observation.platform,
                latest: latest.as_ref(),
                current: current.as_ref(),
            })?;

            match decision {
                Decision::Decided(verdict) => return Ok(verdict),
                Decision::NeedLatest => {
                    let latest_ref = reference.with_tag(LATEST_TAG);
                    latest = Some(self.registry.resolve(&mut self.cache, &latest_ref, None)?);
                }
                Decision::NeedCurrent => {
                    current = Some(self.resolve_current(strategy, &reference, recorded_digests)?);
                }
            }
        }
    }

    /// Look up the container's own tag.
    ///
    /// Docker Hub ignores the digest, so one lookup is enough. GHCR selects
    /// the version by digest: each recorded digest is tried until one carries
    /// `latest`, else the first version found is used.
    fn resolve_current(
        &mut self,
        strategy: ComparisonStrategy,
        reference: &ImageReference,
        recorded_digests: &[String],
    ) -> ImgfreshResult<ImageInfo> {
        let candidates = match strategy {
            ComparisonStrategy::TagMembership => recorded_digests,
            ComparisonStrategy::PlatformDigests => recorded_digests.get(..1).unwrap_or_default(),
        };

        let mut found: Option<ImageInfo> = None;
        let mut first_error: Option<ImgfreshError> = None;

        for digest in candidates {
            match self.registry.resolve(&mut self.cache, reference, Some(digest)) {
                Ok(info) if info.has_tag(LATEST_TAG) => return Ok(info),
                Ok(info) => {
                    found.get_or_insert(info);
                }
                Err(e) => {
                    debug!("No version for {} at {}: {}", reference, digest, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match (found, first_error) {
            (Some(info), _) => Ok(info),
            (None, Some(e)) => Err(e),
            (None, None) => Err(ImgfreshError::MissingDigest {
                image: reference.to_string(),
            }),
        }
    }
}
