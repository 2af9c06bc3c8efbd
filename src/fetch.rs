//! Content retrieval seam.
//!
//! Version discovery only needs one operation from the network: express an
//! interest for a name shaped by a template and wait, up to a timeout, for
//! at most one content object.

use crate::content::ContentObject;
use crate::error::FetchError;
use crate::name::Name;
use crate::template::InterestTemplate;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch one object matching `name` and `template`.
    ///
    /// When `prefix_components` is set, only that many leading components of
    /// `name` form the interest name. `Ok(None)` means nothing answered.
    async fn fetch(
        &self,
        name: &Name,
        prefix_components: Option<usize>,
        template: &InterestTemplate,
        timeout: Duration,
    ) -> Result<Option<ContentObject>, FetchError>;
}

#[async_trait]
impl<T: ContentFetcher + ?Sized> ContentFetcher for Arc<T> {
    async fn fetch(
        &self,
        name: &Name,
        prefix_components: Option<usize>,
        template: &InterestTemplate,
        timeout: Duration,
    ) -> Result<Option<ContentObject>, FetchError> {
        (**self)
            .fetch(name, prefix_components, template, timeout)
            .await
    }
}
