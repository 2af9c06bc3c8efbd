//! Highest-Version Resolver
//!
//! Discovers the latest published version under a name prefix by issuing
//! bounded queries. Each round asks for the greatest name whose next
//! component lies strictly between the current bound and the far future;
//! a validated answer extends the caller's name and raises the bound, and
//! the loop only ends when a round comes back empty, negative, or unusable.
//! The extra round after every discovery catches a version published while
//! the previous answer was in flight.

use crate::config::ResolverConfig;
use crate::error::{FetchError, VersionError};
use crate::fetch::ContentFetcher;
use crate::flags::VersioningFlags;
use crate::name::Name;
use crate::stamp::VersionStamp;
use crate::template::TemplateBuilder;
use crate::types::LOW_VERSION;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Whether the caller's name gained a version component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOutcome {
    NotExtended,
    Extended,
}

/// Why the last round ended the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Nothing answered the round.
    NoContent,
    /// The responder said there is no such content.
    Nack,
    /// The answer's name is too short to carry a version component.
    MissingComponent,
    /// The component after the prefix is not a version stamp.
    NotVersion,
    Timeout,
    /// The fetcher could not parse what came back.
    Malformed,
    /// The discovered component cannot bound a query.
    InvalidBound,
    /// The answer is not later than the current bound.
    Stale,
}

/// Result of one `resolve_version` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: ResolveOutcome,
    pub rounds: usize,
    pub stop: StopReason,
    /// The highest version found, which is now the name's last component.
    pub version: Option<VersionStamp>,
}

impl Resolution {
    pub fn is_extended(&self) -> bool {
        self.outcome == ResolveOutcome::Extended
    }
}

pub struct VersionResolver<F> {
    fetcher: F,
    round_timeout: Duration,
}

impl<F: ContentFetcher> VersionResolver<F> {
    pub fn new(fetcher: F, config: &ResolverConfig) -> Self {
        Self::with_timeout(fetcher, config.round_timeout())
    }

    pub fn with_timeout(fetcher: F, round_timeout: Duration) -> Self {
        Self {
            fetcher,
            round_timeout,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn round_timeout(&self) -> Duration {
        self.round_timeout
    }

    /// Extend `name` in place with the highest version that can be found.
    ///
    /// Only `VersioningFlags::HIGHEST` is supported. The timeout applies to
    /// each round, so a call may take several timeouts in total.
    pub async fn resolve_version(
        &self,
        name: &mut Name,
        flags: VersioningFlags,
    ) -> Result<Resolution, VersionError> {
        self.resolve_version_with_timeout(name, flags, self.round_timeout)
            .await
    }

    pub async fn resolve_version_with_timeout(
        &self,
        name: &mut Name,
        flags: VersioningFlags,
        round_timeout: Duration,
    ) -> Result<Resolution, VersionError> {
        if flags != VersioningFlags::HIGHEST {
            return Err(VersionError::InvalidArgument(format!(
                "only HIGHEST discovery is supported, got {:?}",
                flags
            )));
        }
        let index = name.split()?;
        let n = index.len();

        let mut builder = TemplateBuilder::new();
        let mut bound = LOW_VERSION.to_vec();
        let mut prefix_components = None;
        let mut found: Option<VersionStamp> = None;
        let mut rounds = 0;

        let stop = loop {
            let template = match builder.build_for_bound(&bound) {
                Ok(template) => template,
                Err(e) => {
                    warn!(bound = %hex::encode(&bound), error = %e, "Cannot bound next round");
                    break StopReason::InvalidBound;
                }
            };
            rounds += 1;
            debug!(name = %name, round = rounds, bound = %hex::encode(&bound), "Resolving version");

            let fetched = tokio::time::timeout(
                round_timeout,
                self.fetcher
                    .fetch(name, prefix_components, template, round_timeout),
            )
            .await;
            let object = match fetched {
                Err(_) | Ok(Err(FetchError::Timeout(_))) => break StopReason::Timeout,
                Ok(Err(FetchError::Malformed(reason))) => {
                    warn!(name = %name, round = rounds, reason = %reason, "Malformed response");
                    break StopReason::Malformed;
                }
                Ok(Err(e @ FetchError::Transport(_))) => return Err(e.into()),
                Ok(Ok(None)) => break StopReason::NoContent,
                Ok(Ok(Some(object))) => object,
            };
            if object.is_nack() {
                break StopReason::Nack;
            }

            let returned = object.name();
            let Ok(returned_index) = returned.split() else {
                break StopReason::Malformed;
            };
            let Some(component) = returned.component(&returned_index, n) else {
                break StopReason::MissingComponent;
            };
            let Some(stamp) = VersionStamp::decode(component) else {
                break StopReason::NotVersion;
            };
            if VersionStamp::decode(&bound).is_some_and(|floor| stamp <= floor) {
                warn!(name = %name, round = rounds, version = %stamp, "Answer ignored the bound");
                break StopReason::Stale;
            }

            name.truncate_to(&index, n)?;
            name.append(component);
            debug!(name = %name, round = rounds, version = %stamp, "Found version");
            found = Some(stamp);
            bound = component.to_vec();
            prefix_components = Some(n);
        };

        let outcome = if found.is_some() {
            ResolveOutcome::Extended
        } else {
            ResolveOutcome::NotExtended
        };
        info!(
            name = %name,
            rounds,
            outcome = ?outcome,
            stop = ?stop,
            "Version resolution finished"
        );
        Ok(Resolution {
            outcome,
            rounds,
            stop,
            version: found,
        })
    }
}
