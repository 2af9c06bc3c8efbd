//! Version Stamps
//!
//! A version component is the marker byte `0xFD` followed by a big-endian,
//! unsigned fixed-point timestamp with 1/4096 s resolution. The encoder drops
//! high-order zero bytes (keeping at least two value bytes), so later times
//! never encode shorter than earlier ones. Ordering is always decided on the
//! decoded tick value, never on the raw bytes.

use crate::error::VersionError;
use crate::types::{
    MAX_TICKS, MIN_ENCODED_STAMP_BYTES, STAMP_VALUE_BYTES, TICKS_PER_SECOND, VERSION_MARKER,
};
use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Ordering;
use std::fmt;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Time source for a new stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTime {
    /// Current wall-clock time.
    Now,
    /// Explicit seconds since the epoch plus nanoseconds.
    At { secs: i64, nanos: u32 },
}

/// A decoded version stamp, in ticks of 1/4096 s since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionStamp {
    ticks: u64,
}

impl VersionStamp {
    pub fn from_ticks(ticks: u64) -> Result<Self, VersionError> {
        if ticks > MAX_TICKS {
            return Err(VersionError::InvalidArgument(format!(
                "tick value {:#x} does not fit in six bytes",
                ticks
            )));
        }
        Ok(Self { ticks })
    }

    /// Stamp for an explicit time. `secs` must be positive and `nanos`
    /// below one second; sub-tick precision is rounded to the nearest tick.
    pub fn from_time(secs: i64, nanos: u32) -> Result<Self, VersionError> {
        if secs <= 0 {
            return Err(VersionError::InvalidArgument(format!(
                "version time must be after the epoch, got {} s",
                secs
            )));
        }
        if u64::from(nanos) >= NANOS_PER_SECOND {
            return Err(VersionError::InvalidArgument(format!(
                "nanoseconds out of range: {}",
                nanos
            )));
        }
        let whole = (secs as u64)
            .checked_mul(TICKS_PER_SECOND)
            .ok_or_else(|| VersionError::InvalidArgument(format!("{} s is too far out", secs)))?;
        let frac = (u64::from(nanos) * TICKS_PER_SECOND + NANOS_PER_SECOND / 2) / NANOS_PER_SECOND;
        let ticks = whole
            .checked_add(frac)
            .ok_or_else(|| VersionError::InvalidArgument(format!("{} s is too far out", secs)))?;
        Self::from_ticks(ticks)
    }

    pub fn now() -> Result<Self, VersionError> {
        let now = Utc::now();
        Self::from_time(now.timestamp(), now.timestamp_subsec_nanos())
    }

    pub fn resolve(time: VersionTime) -> Result<Self, VersionError> {
        match time {
            VersionTime::Now => Self::now(),
            VersionTime::At { secs, nanos } => Self::from_time(secs, nanos),
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn seconds(&self) -> u64 {
        self.ticks / TICKS_PER_SECOND
    }

    /// Sub-second part, truncated to whole nanoseconds.
    pub fn subsec_nanos(&self) -> u32 {
        ((self.ticks % TICKS_PER_SECOND) * NANOS_PER_SECOND / TICKS_PER_SECOND) as u32
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.seconds()).ok()?;
        Utc.timestamp_opt(secs, self.subsec_nanos()).single()
    }

    /// Encoded component: marker plus minimal big-endian value bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut len = MIN_ENCODED_STAMP_BYTES;
        let mut rest = self.ticks >> (8 * MIN_ENCODED_STAMP_BYTES);
        while len < *STAMP_VALUE_BYTES.end() && rest != 0 {
            len += 1;
            rest >>= 8;
        }
        let bytes = self.ticks.to_be_bytes();
        let mut component = Vec::with_capacity(len + 1);
        component.push(VERSION_MARKER);
        component.extend_from_slice(&bytes[bytes.len() - len..]);
        component
    }

    /// Decode a component, or `None` if it is not a version component.
    pub fn decode(component: &[u8]) -> Option<Self> {
        let (&marker, value) = component.split_first()?;
        if marker != VERSION_MARKER || !STAMP_VALUE_BYTES.contains(&value.len()) {
            return None;
        }
        let ticks = value
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
        Some(Self { ticks })
    }
}

impl fmt::Display for VersionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "ticks:{:#x}", self.ticks),
        }
    }
}

/// Encode a stamp for `time`.
pub fn encode(time: VersionTime) -> Result<Vec<u8>, VersionError> {
    Ok(VersionStamp::resolve(time)?.encode())
}

pub fn decode(component: &[u8]) -> Option<VersionStamp> {
    VersionStamp::decode(component)
}

/// Order two version components by the time they encode.
pub fn compare(a: &[u8], b: &[u8]) -> Result<Ordering, VersionError> {
    let not_version = |c: &[u8]| {
        VersionError::InvalidArgument(format!("not a version component: {}", hex::encode(c)))
    };
    let a = VersionStamp::decode(a).ok_or_else(|| not_version(a))?;
    let b = VersionStamp::decode(b).ok_or_else(|| not_version(b))?;
    Ok(a.cmp(&b))
}
