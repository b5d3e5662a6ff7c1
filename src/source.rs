//! The parser's input cursor.
//!
//! [`CharSource`] exposes one character of lookahead over either a borrowed
//! string or a streaming reader. Streams are pulled in 1 KiB chunks and a
//! partial UTF-8 sequence at a chunk boundary is carried into the next
//! refill, so multi-byte characters never split. The end of input is a
//! sentinel (`current()` returns `None`), never a panic.

use std::io::{self, Read};

use crate::error::JsonError;

const CHUNK_SIZE: usize = 1024;

enum Feed<'a> {
    Text(std::str::Chars<'a>),
    Stream(StreamFeed<'a>),
}

struct StreamFeed<'a> {
    reader: Box<dyn Read + 'a>,
    decoded: String,
    pos: usize,
    carry: Vec<u8>,
    done: bool,
}

impl StreamFeed<'_> {
    fn next_char(&mut self) -> Result<Option<char>, JsonError> {
        loop {
            if let Some(c) = self.decoded[self.pos..].chars().next() {
                self.pos += c.len_utf8();
                return Ok(Some(c));
            }
            if self.done {
                return Ok(None);
            }
            self.refill()?;
        }
    }

    fn refill(&mut self) -> Result<(), JsonError> {
        let mut chunk = [0_u8; CHUNK_SIZE];
        let read = self.reader.read(&mut chunk)?;
        if read == 0 {
            self.done = true;
            if !self.carry.is_empty() {
                return Err(invalid_utf8());
            }
            return Ok(());
        }

        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(&chunk[..read]);
        match std::str::from_utf8(&bytes) {
            Ok(text) => self.decoded = text.to_owned(),
            Err(error) => {
                if error.error_len().is_some() {
                    return Err(invalid_utf8());
                }
                // An incomplete tail sequence waits for the next chunk.
                let valid = error.valid_up_to();
                self.carry = bytes[valid..].to_vec();
                self.decoded = String::from_utf8_lossy(&bytes[..valid]).into_owned();
            }
        }
        self.pos = 0;
        Ok(())
    }
}

fn invalid_utf8() -> JsonError {
    JsonError::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        "input is not valid UTF-8",
    ))
}

/// A character cursor with one token of lookahead.
pub struct CharSource<'a> {
    feed: Feed<'a>,
    look: Option<char>,
}

impl<'a> CharSource<'a> {
    /// A cursor over an in-memory string.
    pub fn from_str(text: &'a str) -> Self {
        let mut chars = text.chars();
        let look = chars.next();
        Self {
            feed: Feed::Text(chars),
            look,
        }
    }

    /// A cursor over a streaming reader.
    pub fn from_reader(reader: impl Read + 'a) -> Result<Self, JsonError> {
        let mut feed = StreamFeed {
            reader: Box::new(reader),
            decoded: String::new(),
            pos: 0,
            carry: Vec::new(),
            done: false,
        };
        let look = feed.next_char()?;
        Ok(Self {
            feed: Feed::Stream(feed),
            look,
        })
    }

    /// The character at the cursor, `None` at the end of input.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.look
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.look.is_none()
    }

    /// Moves the cursor one character forward.
    pub fn advance(&mut self) -> Result<(), JsonError> {
        self.look = match &mut self.feed {
            Feed::Text(chars) => chars.next(),
            Feed::Stream(stream) => stream.next_char()?,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CharSource;

    #[test]
    fn walks_a_string_to_the_sentinel() {
        let mut source = CharSource::from_str("ab");
        assert_eq!(source.current(), Some('a'));
        source.advance().unwrap();
        assert_eq!(source.current(), Some('b'));
        source.advance().unwrap();
        assert!(source.at_end());
        // Advancing past the end stays at the sentinel.
        source.advance().unwrap();
        assert!(source.at_end());
    }

    #[test]
    fn stream_and_string_agree() {
        let text = "{\"k\": [1, 2]}";
        let mut a = CharSource::from_str(text);
        let mut b = CharSource::from_reader(text.as_bytes()).unwrap();
        loop {
            assert_eq!(a.current(), b.current());
            if a.at_end() {
                break;
            }
            a.advance().unwrap();
            b.advance().unwrap();
        }
    }

    #[test]
    fn multibyte_chars_survive_chunk_boundaries() {
        // 1023 ASCII bytes followed by a three-byte character straddling
        // the 1024-byte chunk edge.
        let mut text = "a".repeat(1023);
        text.push('\u{20AC}');
        text.push('z');
        let mut source = CharSource::from_reader(text.as_bytes()).unwrap();
        let mut collected = String::new();
        while let Some(c) = source.current() {
            collected.push(c);
            source.advance().unwrap();
        }
        assert_eq!(collected, text);
    }

    #[test]
    fn truncated_utf8_is_an_error() {
        // The first two bytes of a three-byte sequence, then EOF.
        let bytes: &[u8] = &[0xE2, 0x82];
        assert!(CharSource::from_reader(bytes).is_err());
    }
}
