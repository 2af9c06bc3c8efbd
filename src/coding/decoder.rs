//! Token reader for ccnb-encoded buffers.

use super::{TokenType, CLOSER};
use crate::error::CodingError;

/// A decoded token. Blob and udata tokens borrow their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Open(u64),
    Blob(&'a [u8]),
    Udata(&'a [u8]),
    Close,
}

/// Forward-only cursor over an encoded buffer.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn read_header(&mut self) -> Result<(TokenType, u64), CodingError> {
        let start = self.pos;
        let mut value: u64 = 0;
        loop {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or(CodingError::Truncated(self.pos))?;
            self.pos += 1;
            if byte & 0x80 != 0 {
                if value > (u64::MAX >> 4) {
                    return Err(CodingError::Overflow(start));
                }
                value = (value << 4) | u64::from((byte >> 3) & 0x0F);
                let tt = byte & 0x07;
                let tt = TokenType::from_u8(tt)
                    .ok_or(CodingError::UnsupportedToken { offset: start, tt })?;
                return Ok((tt, value));
            }
            if value > (u64::MAX >> 7) {
                return Err(CodingError::Overflow(start));
            }
            value = (value << 7) | u64::from(byte);
        }
    }

    fn take(&mut self, len: u64) -> Result<&'a [u8], CodingError> {
        let len = usize::try_from(len).map_err(|_| CodingError::Overflow(self.pos))?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(CodingError::Truncated(self.buf.len()))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>, CodingError> {
        match self.buf.get(self.pos) {
            None => return Err(CodingError::Truncated(self.pos)),
            Some(&CLOSER) => {
                self.pos += 1;
                return Ok(Token::Close);
            }
            Some(_) => {}
        }
        let start = self.pos;
        match self.read_header()? {
            (TokenType::Dtag, tag) => Ok(Token::Open(tag)),
            (TokenType::Blob, len) => Ok(Token::Blob(self.take(len)?)),
            (TokenType::Udata, len) => Ok(Token::Udata(self.take(len)?)),
            (tt, _) => Err(CodingError::UnsupportedToken {
                offset: start,
                tt: tt as u8,
            }),
        }
    }

    /// Dictionary tag of the next token, if it opens an element.
    pub fn peek_dtag(&self) -> Option<u64> {
        match self.clone().next_token() {
            Ok(Token::Open(tag)) => Some(tag),
            _ => None,
        }
    }

    pub fn expect_open(&mut self, tag: u64) -> Result<(), CodingError> {
        let offset = self.pos;
        match self.next_token()? {
            Token::Open(found) if found == tag => Ok(()),
            _ => Err(CodingError::UnexpectedToken {
                offset,
                expected: "element open",
            }),
        }
    }

    pub fn expect_close(&mut self) -> Result<(), CodingError> {
        let offset = self.pos;
        match self.next_token()? {
            Token::Close => Ok(()),
            _ => Err(CodingError::UnexpectedToken {
                offset,
                expected: "element close",
            }),
        }
    }

    /// Read `<tag>BLOB</tag>`. An element with no blob yields an empty slice.
    pub fn read_tagged_blob(&mut self, tag: u64) -> Result<&'a [u8], CodingError> {
        self.expect_open(tag)?;
        let offset = self.pos;
        match self.next_token()? {
            Token::Close => Ok(&[]),
            Token::Blob(data) => {
                self.expect_close()?;
                Ok(data)
            }
            _ => Err(CodingError::UnexpectedToken {
                offset,
                expected: "blob",
            }),
        }
    }

    /// Read `<tag>UDATA</tag>` as UTF-8 text.
    pub fn read_tagged_udata(&mut self, tag: u64) -> Result<&'a str, CodingError> {
        self.expect_open(tag)?;
        let offset = self.pos;
        let text = match self.next_token()? {
            Token::Udata(data) => data,
            _ => {
                return Err(CodingError::UnexpectedToken {
                    offset,
                    expected: "udata",
                })
            }
        };
        self.expect_close()?;
        std::str::from_utf8(text).map_err(|_| CodingError::UnexpectedToken {
            offset,
            expected: "utf-8 udata",
        })
    }

    /// Skip one complete element (or a lone blob/udata token).
    pub fn skip_element(&mut self) -> Result<(), CodingError> {
        let mut depth = 0usize;
        loop {
            match self.next_token()? {
                Token::Open(_) => depth += 1,
                Token::Close => {
                    depth = depth.checked_sub(1).ok_or(CodingError::UnexpectedToken {
                        offset: self.pos - 1,
                        expected: "element",
                    })?;
                }
                Token::Blob(_) | Token::Udata(_) => {}
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }
}
