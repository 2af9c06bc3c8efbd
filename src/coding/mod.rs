//! ccnb Coding
//!
//! Minimal binary tag/length/value encoding for names, interests and content
//! objects. Every token is a header carrying a numeric value and a 3-bit type;
//! structured elements are opened with a dictionary tag and closed with a
//! single zero byte.

pub mod decoder;

pub use decoder::{Decoder, Token};

/// Byte that closes an open element.
pub const CLOSER: u8 = 0x00;

/// Dictionary tags used by this crate.
pub mod dtag {
    pub const NAME: u64 = 14;
    pub const COMPONENT: u64 = 15;
    pub const CONTENT: u64 = 19;
    pub const INTEREST: u64 = 26;
    pub const TYPE: u64 = 40;
    pub const EXCLUDE: u64 = 43;
    pub const BLOOM: u64 = 44;
    pub const ANSWER_ORIGIN_KIND: u64 = 47;
    pub const ORDER_PREFERENCE: u64 = 50;
    pub const CONTENT_OBJECT: u64 = 64;
}

/// Token type carried in the low three bits of a header's final byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TokenType {
    Ext = 0,
    Tag = 1,
    Dtag = 2,
    Attr = 3,
    Dattr = 4,
    Blob = 5,
    Udata = 6,
}

impl TokenType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TokenType::Ext),
            1 => Some(TokenType::Tag),
            2 => Some(TokenType::Dtag),
            3 => Some(TokenType::Attr),
            4 => Some(TokenType::Dattr),
            5 => Some(TokenType::Blob),
            6 => Some(TokenType::Udata),
            _ => None,
        }
    }
}

/// Append a token header.
///
/// The value is written most significant group first, 7 bits per byte with
/// the high bit clear; the final byte holds the low 4 bits of the value, the
/// type, and the high bit set.
pub fn append_tt(buf: &mut Vec<u8>, value: u64, tt: TokenType) {
    let mut scratch = [0u8; 10];
    let mut i = scratch.len() - 1;
    scratch[i] = 0x80 | (((value & 0x0F) as u8) << 3) | tt as u8;
    let mut rest = value >> 4;
    while rest != 0 {
        i -= 1;
        scratch[i] = (rest & 0x7F) as u8;
        rest >>= 7;
    }
    buf.extend_from_slice(&scratch[i..]);
}

pub fn append_closer(buf: &mut Vec<u8>) {
    buf.push(CLOSER);
}

/// Append `<dtag>BLOB</dtag>`.
pub fn append_tagged_blob(buf: &mut Vec<u8>, tag: u64, data: &[u8]) {
    append_tt(buf, tag, TokenType::Dtag);
    append_tt(buf, data.len() as u64, TokenType::Blob);
    buf.extend_from_slice(data);
    append_closer(buf);
}

/// Append `<dtag>UDATA</dtag>`.
pub fn append_tagged_udata(buf: &mut Vec<u8>, tag: u64, text: &str) {
    append_tt(buf, tag, TokenType::Dtag);
    append_tt(buf, text.len() as u64, TokenType::Udata);
    buf.extend_from_slice(text.as_bytes());
    append_closer(buf);
}
