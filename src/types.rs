//! Core types and wire constants for versioned content names.

/// Marker byte that opens every version component.
pub const VERSION_MARKER: u8 = 0xFD;

/// Fixed-point resolution of a version stamp (1/4096 s).
pub const TICKS_PER_SECOND: u64 = 4096;

/// Fewest value bytes the encoder writes after the marker.
pub const MIN_ENCODED_STAMP_BYTES: usize = 2;

/// Value bytes accepted after the marker when decoding.
pub const STAMP_VALUE_BYTES: std::ops::RangeInclusive<usize> = 1..=6;

/// Largest tick value that fits in six value bytes.
pub const MAX_TICKS: u64 = (1 << 48) - 1;

/// Bound sizes (marker included) accepted when building a query template.
pub const BOUND_SIZE_WINDOW: std::ops::RangeInclusive<usize> = 3..=16;

/// Lower bound used for the first resolution round.
///
/// Valid as a stamp, and ordered above every shorter stamp, but below
/// anything a clock running today would produce.
pub const LOW_VERSION: [u8; 7] = [VERSION_MARKER, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// A distant future version stamp; nothing real is ever ordered above it.
pub const FUTURE_VERSION: [u8; 7] = [VERSION_MARKER, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

/// Byte offsets delimiting the components of an encoded name.
pub type Offset = usize;
