//! Version creation: stamp a name with a new version component.

use crate::error::VersionError;
use crate::flags::VersioningFlags;
use crate::name::{Name, Replacement};
use crate::stamp::{VersionStamp, VersionTime};
use tracing::debug;

const CREATE_FLAGS: VersioningFlags = VersioningFlags::REPLACE
    .union(VersioningFlags::HIGH)
    .union(VersioningFlags::NOW);

/// Extend `name` with a version stamp for `time`.
///
/// `REPLACE` overwrites a trailing version component instead of appending
/// after it; combined with `HIGH` the overwrite must move strictly forward
/// in time or the call fails with `NonMonotonic`. `NOW` ignores `time` and
/// uses the wall clock. The name is left untouched on every error.
pub fn create_version(
    name: &mut Name,
    flags: VersioningFlags,
    time: VersionTime,
) -> Result<(), VersionError> {
    if !flags.is_subset_of(CREATE_FLAGS) {
        return Err(VersionError::InvalidArgument(format!(
            "unsupported flags for version creation: {:?}",
            flags
        )));
    }
    let time = if flags.contains(VersioningFlags::NOW) {
        VersionTime::Now
    } else {
        time
    };
    let stamp = VersionStamp::resolve(time)?;
    let component = stamp.encode();

    if flags.contains(VersioningFlags::REPLACE) {
        let index = name.split()?;
        if !index.is_empty() {
            let require_greater = flags.contains(VersioningFlags::HIGH);
            if name.replace_last_if_version(&index, &component, require_greater)?
                == Replacement::Replaced
            {
                debug!(name = %name, version = %stamp, "Replaced version");
                return Ok(());
            }
        }
    }
    name.append(&component);
    debug!(name = %name, version = %stamp, "Appended version");
    Ok(())
}
