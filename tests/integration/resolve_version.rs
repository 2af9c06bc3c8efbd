use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ccnv::store::{ContentStore, MemoryContentStore};
use ccnv::{
    ContentFetcher, ContentObject, FetchError, InterestTemplate, Name, ResolveOutcome,
    StopReason, VersionError, VersionResolver, VersionStamp, VersioningFlags,
};
use parking_lot::Mutex;

use crate::integration::support::{name, segment, stamp, with_version};

const ROUND: Duration = Duration::from_millis(500);

type Scripted = Result<Option<ContentObject>, FetchError>;

/// Fetcher that plays back canned answers, then reports no content.
struct ScriptedFetcher {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<usize>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl ContentFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        _name: &Name,
        _prefix_components: Option<usize>,
        _template: &InterestTemplate,
        _timeout: Duration,
    ) -> Result<Option<ContentObject>, FetchError> {
        *self.calls.lock() += 1;
        self.responses.lock().pop_front().unwrap_or(Ok(None))
    }
}

/// Fetcher that answers the first round from a store and then hangs.
struct StallsAfterFirst {
    store: MemoryContentStore,
    calls: Mutex<usize>,
}

#[async_trait]
impl ContentFetcher for StallsAfterFirst {
    async fn fetch(
        &self,
        name: &Name,
        prefix_components: Option<usize>,
        template: &InterestTemplate,
        timeout: Duration,
    ) -> Result<Option<ContentObject>, FetchError> {
        let call = {
            let mut calls = self.calls.lock();
            *calls += 1;
            *calls
        };
        if call > 1 {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.store
            .fetch(name, prefix_components, template, timeout)
            .await
    }
}

/// Store-backed fetcher that publishes a newer version right after the
/// first answer goes out.
struct PublishesDuringSearch {
    store: MemoryContentStore,
    late: Mutex<Option<ContentObject>>,
}

#[async_trait]
impl ContentFetcher for PublishesDuringSearch {
    async fn fetch(
        &self,
        name: &Name,
        prefix_components: Option<usize>,
        template: &InterestTemplate,
        timeout: Duration,
    ) -> Result<Option<ContentObject>, FetchError> {
        let answer = self
            .store
            .fetch(name, prefix_components, template, timeout)
            .await;
        if let Some(late) = self.late.lock().take() {
            self.store
                .insert(late)
                .map_err(|e| FetchError::Transport(e.to_string()))?;
        }
        answer
    }
}

#[tokio::test]
async fn no_published_versions_takes_one_round() {
    let prefix = name(&["parc", "doc"]);
    let store = MemoryContentStore::from_objects([segment(&name(&["other"]), &stamp(0))]).unwrap();
    let resolver = VersionResolver::with_timeout(store, ROUND);

    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();

    assert_eq!(resolution.outcome, ResolveOutcome::NotExtended);
    assert_eq!(resolution.rounds, 1);
    assert_eq!(resolution.stop, StopReason::NoContent);
    assert_eq!(resolution.version, None);
    assert_eq!(working.as_bytes(), prefix.as_bytes());
}

#[tokio::test]
async fn single_version_is_found_in_two_rounds() {
    let prefix = name(&["parc", "doc"]);
    let va = stamp(10);
    let store = MemoryContentStore::from_objects([segment(&prefix, &va)]).unwrap();
    let resolver = VersionResolver::with_timeout(store, ROUND);

    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();

    assert!(resolution.is_extended());
    assert_eq!(resolution.rounds, 2);
    assert_eq!(resolution.stop, StopReason::NoContent);
    assert_eq!(resolution.version, VersionStamp::decode(&va));
    assert_eq!(working, with_version(&prefix, &va));
}

#[tokio::test]
async fn highest_of_many_versions_wins() {
    let prefix = name(&["parc", "doc"]);
    let store = MemoryContentStore::from_objects(
        [30, 10, 50, 20, 40]
            .into_iter()
            .map(|offset| segment(&prefix, &stamp(offset))),
    )
    .unwrap();
    let resolver = VersionResolver::with_timeout(store, ROUND);

    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();

    // The store answers with the greatest version at once.
    assert_eq!(resolution.rounds, 2);
    assert_eq!(working, with_version(&prefix, &stamp(50)));
}

#[tokio::test]
async fn increasing_answers_take_one_extra_round() {
    let prefix = name(&["a"]);
    let k = 4;
    let responses = (1..=k)
        .map(|i| Ok(Some(segment(&prefix, &stamp(i)))))
        .collect();
    let resolver = VersionResolver::with_timeout(ScriptedFetcher::new(responses), ROUND);

    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();

    assert_eq!(resolution.rounds, k as usize + 1);
    assert_eq!(resolver.fetcher().calls(), k as usize + 1);
    assert_eq!(working, with_version(&prefix, &stamp(k)));
    assert_eq!(working.component_count().unwrap(), 2);
}

#[tokio::test]
async fn nack_ends_search_and_keeps_progress() {
    let prefix = name(&["a"]);
    let resolver = VersionResolver::with_timeout(
        ScriptedFetcher::new(vec![
            Ok(Some(segment(&prefix, &stamp(5)))),
            Ok(Some(ContentObject::nack(prefix.clone()))),
        ]),
        ROUND,
    );

    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.outcome, ResolveOutcome::Extended);
    assert_eq!(resolution.stop, StopReason::Nack);
    assert_eq!(working, with_version(&prefix, &stamp(5)));
}

#[tokio::test]
async fn nack_first_is_not_extended() {
    let prefix = name(&["a"]);
    let resolver = VersionResolver::with_timeout(
        ScriptedFetcher::new(vec![Ok(Some(ContentObject::nack(prefix.clone())))]),
        ROUND,
    );
    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.outcome, ResolveOutcome::NotExtended);
    assert_eq!(resolution.stop, StopReason::Nack);
    assert_eq!(resolution.rounds, 1);
    assert_eq!(working, prefix);
}

#[tokio::test]
async fn answer_without_version_component_stops() {
    let prefix = name(&["a", "b"]);
    let resolver = VersionResolver::with_timeout(
        ScriptedFetcher::new(vec![
            Ok(Some(segment(&prefix, &stamp(1)))),
            // Too short to carry a component at position n
            Ok(Some(ContentObject::data(name(&["a"]), Vec::new()))),
        ]),
        ROUND,
    );
    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.stop, StopReason::MissingComponent);
    assert!(resolution.is_extended());
    assert_eq!(working, with_version(&prefix, &stamp(1)));
}

#[tokio::test]
async fn round_timeout_keeps_partial_progress() {
    let prefix = name(&["slow"]);
    let fetcher = StallsAfterFirst {
        store: MemoryContentStore::from_objects([segment(&prefix, &stamp(7))]).unwrap(),
        calls: Mutex::new(0),
    };
    let resolver = VersionResolver::with_timeout(fetcher, Duration::from_millis(50));

    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.stop, StopReason::Timeout);
    assert_eq!(resolution.rounds, 2);
    assert_eq!(working, with_version(&prefix, &stamp(7)));
}

#[tokio::test]
async fn fetcher_timeout_and_malformed_are_stop_reasons() {
    let prefix = name(&["a"]);

    let resolver = VersionResolver::with_timeout(
        ScriptedFetcher::new(vec![Err(FetchError::Timeout(ROUND))]),
        ROUND,
    );
    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.stop, StopReason::Timeout);
    assert_eq!(working, prefix);

    let resolver = VersionResolver::with_timeout(
        ScriptedFetcher::new(vec![
            Ok(Some(segment(&prefix, &stamp(3)))),
            Err(FetchError::Malformed("bad signature block".into())),
        ]),
        ROUND,
    );
    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.stop, StopReason::Malformed);
    assert_eq!(working, with_version(&prefix, &stamp(3)));
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    let resolver = VersionResolver::with_timeout(
        ScriptedFetcher::new(vec![Err(FetchError::Transport("connection reset".into()))]),
        ROUND,
    );
    let mut working = name(&["a"]);
    let err = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap_err();
    assert!(matches!(err, VersionError::FetchError(FetchError::Transport(_))));
}

#[tokio::test]
async fn only_highest_mode_is_supported() {
    let resolver = VersionResolver::with_timeout(ScriptedFetcher::new(vec![]), ROUND);
    for flags in [
        VersioningFlags::LOWEST,
        VersioningFlags::NEXT,
        VersioningFlags::PREV,
        VersioningFlags::HIGH,
        VersioningFlags::HIGHEST | VersioningFlags::NOW,
    ] {
        let mut working = name(&["a"]);
        let err = resolver
            .resolve_version(&mut working, flags)
            .await
            .unwrap_err();
        assert!(matches!(err, VersionError::InvalidArgument(_)));
        assert_eq!(working, name(&["a"]));
    }
    assert_eq!(resolver.fetcher().calls(), 0);
}

#[tokio::test]
async fn version_published_mid_search_is_found() {
    let prefix = name(&["live"]);
    let fetcher = PublishesDuringSearch {
        store: MemoryContentStore::from_objects([segment(&prefix, &stamp(1))]).unwrap(),
        late: Mutex::new(Some(segment(&prefix, &stamp(2)))),
    };
    let resolver = VersionResolver::with_timeout(fetcher, ROUND);

    let mut working = prefix.clone();
    let resolution = resolver
        .resolve_version(&mut working, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.rounds, 3);
    assert_eq!(working, with_version(&prefix, &stamp(2)));
}

#[tokio::test]
async fn versioned_name_is_treated_as_prefix() {
    // A version already in the caller's name is part of the prefix, so
    // only deeper names under it are candidates.
    let prefix = name(&["doc"]);
    let store = Arc::new(
        MemoryContentStore::from_objects([segment(&prefix, &stamp(1)), segment(&prefix, &stamp(9))])
            .unwrap(),
    );
    let resolver = VersionResolver::with_timeout(Arc::clone(&store), ROUND);

    let mut stale = with_version(&prefix, &stamp(1));
    let resolution = resolver
        .resolve_version(&mut stale, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(resolution.outcome, ResolveOutcome::NotExtended);
    assert_eq!(stale, with_version(&prefix, &stamp(1)));

    let mut fresh = prefix.clone();
    resolver
        .resolve_version(&mut fresh, VersioningFlags::HIGHEST)
        .await
        .unwrap();
    assert_eq!(fresh, with_version(&prefix, &stamp(9)));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn concurrent_resolutions_share_a_store() {
    let store = Arc::new(
        MemoryContentStore::from_objects([
            segment(&name(&["x"]), &stamp(1)),
            segment(&name(&["x"]), &stamp(2)),
            segment(&name(&["y"]), &stamp(3)),
        ])
        .unwrap(),
    );
    let resolver = VersionResolver::with_timeout(store, ROUND);

    let mut x = name(&["x"]);
    let mut y = name(&["y"]);
    let (rx, ry) = tokio::join!(
        resolver.resolve_version(&mut x, VersioningFlags::HIGHEST),
        resolver.resolve_version(&mut y, VersioningFlags::HIGHEST),
    );
    assert!(rx.unwrap().is_extended());
    assert!(ry.unwrap().is_extended());
    assert_eq!(x, with_version(&name(&["x"]), &stamp(2)));
    assert_eq!(y, with_version(&name(&["y"]), &stamp(3)));
}
