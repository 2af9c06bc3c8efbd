//! Content Store
//!
//! Holds immutable content objects by name and answers interests against
//! them. The in-memory store doubles as a `ContentFetcher`, so discovery can
//! run without a network.

pub mod memory;

pub use memory::MemoryContentStore;

use crate::content::ContentObject;
use crate::error::VersionError;
use crate::name::Name;
use crate::template::InterestTemplate;

/// Content Store interface
pub trait ContentStore {
    /// Store an object. Re-inserting an identical object is a no-op.
    fn insert(&self, object: ContentObject) -> Result<(), VersionError>;
    fn get(&self, name: &Name) -> Result<Option<ContentObject>, VersionError>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Best object under `prefix` admitted by `template`, if any.
    fn lookup(
        &self,
        prefix: &Name,
        template: &InterestTemplate,
    ) -> Result<Option<ContentObject>, VersionError>;
}
