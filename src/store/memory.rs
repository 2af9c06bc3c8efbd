//! In-memory content store.

use super::ContentStore;
use crate::content::ContentObject;
use crate::error::{FetchError, VersionError};
use crate::fetch::ContentFetcher;
use crate::name::{canonical_name_cmp, Name};
use crate::template::{InterestTemplate, OrderDirection, OrderField};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

struct StoredObject {
    arrival: u64,
    object: ContentObject,
}

#[derive(Default)]
struct Inner {
    objects: Vec<StoredObject>,
    by_name: HashMap<Name, usize>,
    next_arrival: u64,
}

/// Content store backed by a vector in arrival order.
#[derive(Default)]
pub struct MemoryContentStore {
    inner: RwLock<Inner>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from `objects`, in order.
    pub fn from_objects<I>(objects: I) -> Result<Self, VersionError>
    where
        I: IntoIterator<Item = ContentObject>,
    {
        let store = Self::new();
        for object in objects {
            store.insert(object)?;
        }
        Ok(store)
    }
}

/// A candidate that passed the prefix and exclusion checks.
struct Candidate<'a> {
    arrival: u64,
    suffix: Vec<&'a [u8]>,
    object: &'a ContentObject,
}

impl ContentStore for MemoryContentStore {
    fn insert(&self, object: ContentObject) -> Result<(), VersionError> {
        // Framing is checked once here so lookups can rely on it.
        object.name().split()?;
        let mut inner = self.inner.write();
        if let Some(&slot) = inner.by_name.get(object.name()) {
            if inner.objects[slot].object == object {
                return Ok(());
            }
            return Err(VersionError::StoreError(format!(
                "{} is already stored with different content",
                object.name()
            )));
        }
        let arrival = inner.next_arrival;
        inner.next_arrival += 1;
        let slot = inner.objects.len();
        inner.by_name.insert(object.name().clone(), slot);
        debug!(name = %object.name(), arrival, "Stored content object");
        inner.objects.push(StoredObject { arrival, object });
        Ok(())
    }

    fn get(&self, name: &Name) -> Result<Option<ContentObject>, VersionError> {
        let inner = self.inner.read();
        Ok(inner
            .by_name
            .get(name)
            .map(|&slot| inner.objects[slot].object.clone()))
    }

    fn len(&self) -> usize {
        self.inner.read().objects.len()
    }

    fn lookup(
        &self,
        prefix: &Name,
        template: &InterestTemplate,
    ) -> Result<Option<ContentObject>, VersionError> {
        if !template.answer_origin().allows_existing() {
            return Ok(None);
        }
        let prefix_components = prefix.components()?;
        let n = prefix_components.len();

        let inner = self.inner.read();
        let mut candidates = Vec::new();
        for stored in &inner.objects {
            let components = stored.object.name().components()?;
            if components.len() < n || components[..n] != prefix_components[..] {
                continue;
            }
            if let Some(next) = components.get(n) {
                if !template.admits(next) {
                    continue;
                }
            }
            candidates.push(Candidate {
                arrival: stored.arrival,
                suffix: components[n..].to_vec(),
                object: &stored.object,
            });
        }

        let order = template.order_preference();
        let by_order = |a: &Candidate<'_>, b: &Candidate<'_>| -> Ordering {
            match order.map(|o| o.field) {
                Some(OrderField::NameHierarchy) => canonical_name_cmp(&a.suffix, &b.suffix),
                _ => a.arrival.cmp(&b.arrival),
            }
        };
        let chosen = match order {
            Some(o) if o.field != OrderField::Unspecified && o.direction == OrderDirection::FromRight => {
                candidates.into_iter().max_by(by_order)
            }
            _ => candidates.into_iter().min_by(by_order),
        };
        if let Some(candidate) = &chosen {
            debug!(prefix = %prefix, name = %candidate.object.name(), "Answered interest");
        }
        Ok(chosen.map(|c| c.object.clone()))
    }
}

#[async_trait]
impl ContentFetcher for MemoryContentStore {
    async fn fetch(
        &self,
        name: &Name,
        prefix_components: Option<usize>,
        template: &InterestTemplate,
        _timeout: Duration,
    ) -> Result<Option<ContentObject>, FetchError> {
        let prefix = match prefix_components {
            Some(k) => name
                .prefix(k)
                .map_err(|e| FetchError::Malformed(e.to_string()))?,
            None => name.clone(),
        };
        self.lookup(&prefix, template)
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}
