//! Names
//!
//! A `Name` owns a ccnb-encoded Name element and keeps it well-framed: every
//! edit either completes and re-closes the element, or leaves the buffer
//! exactly as it was. Offsets from `split` let callers address components
//! without re-parsing.

pub mod uri;

use crate::coding::{self, dtag, Decoder, Token, TokenType};
use crate::error::{CodingError, VersionError};
use crate::stamp::VersionStamp;
use crate::types::Offset;
use std::cmp::Ordering;
use std::fmt;

/// Component boundaries of an encoded name.
///
/// Holds one offset per component (the start of its Component element) plus
/// the offset of the Name closer, so component `i` spans
/// `offsets[i]..offsets[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentIndex {
    offsets: Vec<Offset>,
}

impl ComponentIndex {
    /// Number of components.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// Byte range of component element `i`.
    pub fn element_range(&self, i: usize) -> Option<std::ops::Range<Offset>> {
        if i >= self.len() {
            return None;
        }
        Some(self.offsets[i]..self.offsets[i + 1])
    }
}

/// Outcome of `replace_last_if_version` when it does not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// The trailing version component was overwritten.
    Replaced,
    /// The name does not end in a version component; nothing changed.
    NotVersioned,
}

/// An encoded, always well-framed name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name {
    buf: Vec<u8>,
}

impl Default for Name {
    fn default() -> Self {
        Self::new()
    }
}

impl Name {
    /// The empty name (`/`).
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(8);
        coding::append_tt(&mut buf, dtag::NAME, TokenType::Dtag);
        coding::append_closer(&mut buf);
        Self { buf }
    }

    pub fn from_components<I, C>(components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let mut name = Self::new();
        for component in components {
            name.append(component.as_ref());
        }
        name
    }

    /// Adopt an encoded Name element, validating its framing.
    pub fn from_ccnb(bytes: &[u8]) -> Result<Self, CodingError> {
        let (_, end) = split_encoded(bytes)?;
        if end != bytes.len() {
            return Err(CodingError::TrailingBytes(end));
        }
        Ok(Self {
            buf: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Locate every component.
    pub fn split(&self) -> Result<ComponentIndex, CodingError> {
        split_encoded(&self.buf).map(|(index, _)| index)
    }

    pub fn component_count(&self) -> Result<usize, CodingError> {
        Ok(self.split()?.len())
    }

    /// Value of component `i`, using offsets from `split`.
    pub fn component(&self, index: &ComponentIndex, i: usize) -> Option<&[u8]> {
        let range = index.element_range(i)?;
        Decoder::new(self.buf.get(range)?)
            .read_tagged_blob(dtag::COMPONENT)
            .ok()
    }

    pub fn components(&self) -> Result<Vec<&[u8]>, CodingError> {
        let index = self.split()?;
        (0..index.len())
            .map(|i| {
                self.component(&index, i)
                    .ok_or(CodingError::Truncated(index.offsets[i]))
            })
            .collect()
    }

    pub fn last_component(&self) -> Result<Option<&[u8]>, CodingError> {
        let index = self.split()?;
        Ok(match index.len() {
            0 => None,
            n => self.component(&index, n - 1),
        })
    }

    /// Drop every component after the first `k`.
    pub fn truncate_to(&mut self, index: &ComponentIndex, k: usize) -> Result<usize, VersionError> {
        let cut = *index.offsets.get(k).ok_or_else(|| {
            VersionError::InvalidArgument(format!(
                "cannot keep {} of {} components",
                k,
                index.len()
            ))
        })?;
        if cut >= self.buf.len() {
            return Err(VersionError::InvalidArgument(
                "component index does not describe this name".to_string(),
            ));
        }
        self.buf.truncate(cut);
        coding::append_closer(&mut self.buf);
        Ok(k)
    }

    /// Append one component and re-close the name.
    pub fn append(&mut self, component: &[u8]) {
        self.buf.pop();
        coding::append_tagged_blob(&mut self.buf, dtag::COMPONENT, component);
        coding::append_closer(&mut self.buf);
    }

    /// A new name holding the first `k` components.
    pub fn prefix(&self, k: usize) -> Result<Name, VersionError> {
        let index = self.split()?;
        let mut prefix = self.clone();
        prefix.truncate_to(&index, k.min(index.len()))?;
        Ok(prefix)
    }

    /// Whether every component of `prefix` leads this name.
    pub fn starts_with(&self, prefix: &Name) -> bool {
        match (self.components(), prefix.components()) {
            (Ok(mine), Ok(theirs)) => mine.len() >= theirs.len() && mine[..theirs.len()] == theirs[..],
            _ => false,
        }
    }

    /// Overwrite the trailing component with `new_component` when the name
    /// currently ends in a version component.
    ///
    /// With `require_greater`, the replacement only happens when the new
    /// stamp is strictly later than the old one; otherwise the call fails
    /// with `NonMonotonic` and the buffer is untouched.
    pub fn replace_last_if_version(
        &mut self,
        index: &ComponentIndex,
        new_component: &[u8],
        require_greater: bool,
    ) -> Result<Replacement, VersionError> {
        let new_stamp = VersionStamp::decode(new_component).ok_or_else(|| {
            VersionError::InvalidArgument("replacement is not a version component".to_string())
        })?;
        let n = index.len();
        if n == 0 {
            return Ok(Replacement::NotVersioned);
        }
        let old_start = index.offsets[n - 1];
        let old_end = index.offsets[n];
        if old_end + 1 != self.buf.len() {
            return Err(VersionError::InvalidArgument(
                "component index does not describe this name".to_string(),
            ));
        }
        let Some(old_stamp) = self.component(index, n - 1).and_then(VersionStamp::decode) else {
            return Ok(Replacement::NotVersioned);
        };
        if require_greater && new_stamp <= old_stamp {
            return Err(VersionError::NonMonotonic);
        }

        // Encode the new element past the old one, then slide it down over
        // the old element. The two ranges may overlap.
        self.buf.pop();
        let staged = self.buf.len();
        coding::append_tagged_blob(&mut self.buf, dtag::COMPONENT, new_component);
        let staged_len = self.buf.len() - staged;
        self.buf.copy_within(staged.., old_start);
        self.buf.truncate(old_start + staged_len);
        coding::append_closer(&mut self.buf);
        Ok(Replacement::Replaced)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.components() {
            Ok(components) => f.write_str(&uri::to_uri(&components)),
            Err(_) => write!(f, "<malformed {}>", hex::encode(&self.buf)),
        }
    }
}

/// Canonical component order: shorter components first, then bytewise.
pub fn canonical_cmp(a: &[u8], b: &[u8]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Canonical name order: componentwise, a proper prefix sorting first.
pub fn canonical_name_cmp(a: &[&[u8]], b: &[&[u8]]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match canonical_cmp(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Parse a Name element at the start of `bytes`; returns the index and the
/// offset just past the Name closer.
pub(crate) fn split_encoded(bytes: &[u8]) -> Result<(ComponentIndex, Offset), CodingError> {
    let mut decoder = Decoder::new(bytes);
    decoder.expect_open(dtag::NAME)?;
    let mut offsets = Vec::new();
    loop {
        let start = decoder.position();
        match decoder.peek_dtag() {
            Some(dtag::COMPONENT) => {
                offsets.push(start);
                decoder.read_tagged_blob(dtag::COMPONENT)?;
            }
            _ => match decoder.next_token()? {
                Token::Close => {
                    offsets.push(start);
                    return Ok((ComponentIndex { offsets }, decoder.position()));
                }
                _ => {
                    return Err(CodingError::UnexpectedToken {
                        offset: start,
                        expected: "component or name close",
                    })
                }
            },
        }
    }
}
