//! ccnv: Version Stamps for Content-Centric Names
//!
//! Encodes and compares version components, edits encoded names in place,
//! creates new versions, and discovers the highest published version of a
//! name by issuing bounded, narrowing interests.

pub mod bloom;
pub mod coding;
pub mod config;
pub mod content;
pub mod create;
pub mod error;
pub mod fetch;
pub mod flags;
pub mod logging;
pub mod name;
pub mod resolver;
pub mod stamp;
pub mod store;
pub mod template;
pub mod tooling;
pub mod types;

pub use content::{ContentObject, ContentType};
pub use create::create_version;
pub use error::{CodingError, FetchError, VersionError};
pub use fetch::ContentFetcher;
pub use flags::VersioningFlags;
pub use name::Name;
pub use resolver::{Resolution, ResolveOutcome, StopReason, VersionResolver};
pub use stamp::{VersionStamp, VersionTime};
pub use template::{InterestTemplate, TemplateBuilder};
