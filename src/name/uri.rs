//! ccnx URI form of names: `/a/b/%FD%04...`, unreserved bytes literal and
//! everything else percent-encoded.

use super::Name;
use crate::error::CodingError;

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Render components as a URI path.
pub fn to_uri(components: &[&[u8]]) -> String {
    if components.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for component in components {
        out.push('/');
        // A component made only of dots gets three extra, so it cannot be
        // mistaken for a relative path step.
        if component.iter().all(|b| *b == b'.') {
            out.push_str("...");
        }
        for byte in component.iter() {
            if is_unreserved(*byte) {
                out.push(*byte as char);
            } else {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    out
}

fn decode_component(text: &str) -> Result<Vec<u8>, CodingError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = text
                .get(i + 1..i + 3)
                .ok_or_else(|| CodingError::InvalidUri(format!("truncated escape in {:?}", text)))?;
            let value = Some(hex)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| CodingError::InvalidUri(format!("bad escape %{} in {:?}", hex, text)))?;
            out.push(value);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    if !out.is_empty() && out.iter().all(|b| *b == b'.') {
        if out.len() < 3 {
            return Err(CodingError::InvalidUri(format!(
                "relative step {:?} is not a component",
                text
            )));
        }
        out.truncate(out.len() - 3);
    }
    Ok(out)
}

/// Parse `/a/b/c` (an optional `ccnx:` scheme is accepted).
pub fn parse(uri: &str) -> Result<Name, CodingError> {
    let path = uri.strip_prefix("ccnx:").unwrap_or(uri);
    let path = path
        .strip_prefix('/')
        .ok_or_else(|| CodingError::InvalidUri(format!("{:?} is not absolute", uri)))?;
    let mut name = Name::new();
    if path.is_empty() {
        return Ok(name);
    }
    for part in path.trim_end_matches('/').split('/') {
        name.append(&decode_component(part)?);
    }
    Ok(name)
}

impl std::str::FromStr for Name {
    type Err = CodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
