//! Content Objects
//!
//! The parsed form of a fetch response: the full name the responder
//! answered with, its content type, and the payload.

use crate::coding::{self, dtag, Decoder, TokenType};
use crate::error::CodingError;
use crate::name::Name;
use serde::{Deserialize, Serialize};

/// Content type codes carried in SignedInfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Data,
    Encrypted,
    Gone,
    Key,
    Link,
    /// Explicit "no such content" answer.
    Nack,
}

impl ContentType {
    pub fn code(&self) -> u32 {
        match self {
            ContentType::Data => 0x0C04C0,
            ContentType::Encrypted => 0x10D091,
            ContentType::Gone => 0x18E344,
            ContentType::Key => 0x28463F,
            ContentType::Link => 0x2C834A,
            ContentType::Nack => 0x34008A,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x0C04C0 => Some(ContentType::Data),
            0x10D091 => Some(ContentType::Encrypted),
            0x18E344 => Some(ContentType::Gone),
            0x28463F => Some(ContentType::Key),
            0x2C834A => Some(ContentType::Link),
            0x34008A => Some(ContentType::Nack),
            _ => None,
        }
    }
}

/// A content object as handed back by a fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentObject {
    name: Name,
    content_type: ContentType,
    content: Vec<u8>,
}

impl ContentObject {
    pub fn new(name: Name, content_type: ContentType, content: Vec<u8>) -> Self {
        Self {
            name,
            content_type,
            content,
        }
    }

    pub fn data(name: Name, content: impl Into<Vec<u8>>) -> Self {
        Self::new(name, ContentType::Data, content.into())
    }

    pub fn nack(name: Name) -> Self {
        Self::new(name, ContentType::Nack, Vec::new())
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn is_nack(&self) -> bool {
        self.content_type == ContentType::Nack
    }

    /// Unsigned ccnb ContentObject: Name, Type, Content.
    pub fn to_ccnb(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.name.as_bytes().len() + self.content.len() + 16);
        coding::append_tt(&mut buf, dtag::CONTENT_OBJECT, TokenType::Dtag);
        buf.extend_from_slice(self.name.as_bytes());
        coding::append_tagged_blob(&mut buf, dtag::TYPE, &self.content_type.code().to_be_bytes()[1..]);
        coding::append_tagged_blob(&mut buf, dtag::CONTENT, &self.content);
        coding::append_closer(&mut buf);
        buf
    }

    /// Parse an unsigned ccnb ContentObject. A missing Type means DATA.
    pub fn from_ccnb(bytes: &[u8]) -> Result<Self, CodingError> {
        let mut decoder = Decoder::new(bytes);
        decoder.expect_open(dtag::CONTENT_OBJECT)?;
        let name_start = decoder.position();
        decoder.skip_element()?;
        let name = Name::from_ccnb(&bytes[name_start..decoder.position()])?;

        let content_type = if decoder.peek_dtag() == Some(dtag::TYPE) {
            let offset = decoder.position();
            let raw = decoder.read_tagged_blob(dtag::TYPE)?;
            let code = match raw {
                [a, b, c] => u32::from_be_bytes([0, *a, *b, *c]),
                _ => {
                    return Err(CodingError::UnexpectedToken {
                        offset,
                        expected: "3-byte content type",
                    })
                }
            };
            ContentType::from_code(code).ok_or(CodingError::UnexpectedToken {
                offset,
                expected: "known content type",
            })?
        } else {
            ContentType::Data
        };

        let content = decoder.read_tagged_blob(dtag::CONTENT)?.to_vec();
        decoder.expect_close()?;
        if !decoder.is_at_end() {
            return Err(CodingError::TrailingBytes(decoder.position()));
        }
        Ok(Self::new(name, content_type, content))
    }
}
