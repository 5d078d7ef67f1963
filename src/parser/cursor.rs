//! Sequential token reads over the raw SIF byte stream.
//!
//! The header mixes space-delimited ASCII numbers, whole text lines and raw
//! binary runs. `TokenCursor` exposes one primitive per encoding and keeps an
//! exact byte position so the decoder can probe ahead and rewind.

use crate::error::CursorError;
use winnow::{
    Parser,
    error::ContextError,
    token::{take, take_till, take_while},
};

/// Longest token accepted by [`TokenCursor::read_int`].
pub const MAX_INT_TOKEN: usize = 32;
/// Longest token accepted by [`TokenCursor::read_float`].
pub const MAX_FLOAT_TOKEN: usize = 64;

const SPACE: u8 = b' ';
const NEWLINE: u8 = b'\n';

type Input<'a> = &'a [u8];

/// Forward reader over a SIF byte stream that remembers where it started.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    origin: Input<'a>,
    input: Input<'a>,
}

impl<'a> TokenCursor<'a> {
    /// Starts at byte 0 of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            origin: data,
            input: data,
        }
    }

    /// Absolute byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.origin.len() - self.input.len()
    }

    /// Moves the cursor to `position`, clamped to the end of the stream.
    pub fn seek(&mut self, position: usize) {
        let position = position.min(self.origin.len());
        self.input = &self.origin[position..];
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.input.is_empty()
    }

    /// Runs `parser` on the remaining input, restoring it on failure.
    fn run<O>(
        &mut self,
        wanted: &'static str,
        mut parser: impl Parser<Input<'a>, O, ContextError>,
    ) -> Result<O, CursorError> {
        let checkpoint = self.input;
        parser.parse_next(&mut self.input).map_err(|_| {
            self.input = checkpoint;
            CursorError::UnexpectedEof {
                offset: self.origin.len() - checkpoint.len(),
                wanted,
            }
        })
    }

    /// Reads bytes up to `delimiter` or a newline, at most `max_len` of them.
    ///
    /// Leading delimiters and newlines are skipped. The terminator that ends
    /// the token is consumed; when the token stops because `max_len` was hit,
    /// the next byte stays unread. A non-empty token cut short by the end of
    /// the stream is still returned.
    pub fn read_token_until(
        &mut self,
        delimiter: u8,
        max_len: usize,
    ) -> Result<&'a [u8], CursorError> {
        let is_terminator = move |b: u8| b == delimiter || b == NEWLINE;
        let start = self.input;
        self.run("token", take_while(0.., is_terminator))?;
        let token = self.run("token", take_till(0..=max_len, is_terminator))?;
        if token.is_empty() {
            self.input = start;
            return Err(CursorError::UnexpectedEof {
                offset: self.origin.len() - start.len(),
                wanted: "token",
            });
        }
        if self.input.first().is_some_and(|&b| is_terminator(b)) {
            self.input = &self.input[1..];
        }
        Ok(token)
    }

    /// Reads one space-terminated integer; `-1` when missing or unparsable.
    pub fn read_int(&mut self) -> i32 {
        self.read_token_until(SPACE, MAX_INT_TOKEN)
            .ok()
            .and_then(parse_ascii::<i32>)
            .unwrap_or(-1)
    }

    /// Reads one space-terminated float; `NaN` when missing or unparsable.
    pub fn read_float(&mut self) -> f64 {
        self.read_token_until(SPACE, MAX_FLOAT_TOKEN)
            .ok()
            .and_then(parse_ascii::<f64>)
            .unwrap_or(f64::NAN)
    }

    /// Reads and discards `count` integer tokens.
    pub fn skip_ints(&mut self, count: usize) {
        for _ in 0..count {
            self.read_int();
        }
    }

    /// Advances past spaces, carriage returns and newlines.
    pub fn skip_whitespace_and_newlines(&mut self) {
        // take_while(0..) on a complete slice cannot fail
        let _ = self.run("whitespace", take_while(0.., (b' ', b'\r', b'\n')));
    }

    /// Advances `count` bytes unconditionally, stopping at the end of input.
    pub fn skip_bytes(&mut self, count: usize) {
        let count = count.min(self.input.len());
        self.input = &self.input[count..];
    }

    /// Reads exactly `count` raw bytes.
    pub fn read_fixed_binary(&mut self, count: usize) -> Result<&'a [u8], CursorError> {
        self.run("binary block", take(count))
    }

    /// Reads the rest of the current line without its `\n` or trailing `\r`.
    pub fn read_line(&mut self) -> Result<&'a [u8], CursorError> {
        if self.input.is_empty() {
            return Err(CursorError::UnexpectedEof {
                offset: self.position(),
                wanted: "line",
            });
        }
        let line = self.run("line", take_till(0.., NEWLINE))?;
        if !self.input.is_empty() {
            self.input = &self.input[1..];
        }
        Ok(line.strip_suffix(b"\r").unwrap_or(line))
    }

    /// Consumes everything through the next newline.
    pub fn discard_line(&mut self) -> Result<(), CursorError> {
        self.read_line().map(|_| ())
    }

    /// Discards `count` lines, failing on the first one that is missing.
    pub fn discard_lines(&mut self, count: usize) -> Result<(), CursorError> {
        (0..count).try_for_each(|_| self.discard_line())
    }
}

/// Parses a trimmed ASCII number, `None` on any invalid byte.
pub fn parse_ascii<T: std::str::FromStr>(bytes: &[u8]) -> Option<T> {
    std::str::from_utf8(bytes).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_skip_leading_delimiters_and_consume_terminator() {
        let mut cursor = TokenCursor::new(b"  \n65567 0 1\n");
        assert_eq!(cursor.read_token_until(b' ', 32), Ok(&b"65567"[..]));
        assert_eq!(cursor.position(), 9);
        assert_eq!(cursor.read_int(), 0);
        assert_eq!(cursor.read_int(), 1);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn exhausted_token_keeps_following_byte() {
        let mut cursor = TokenCursor::new(b"123456 x");
        assert_eq!(cursor.read_token_until(b' ', 4), Ok(&b"1234"[..]));
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read_token_until(b' ', 4), Ok(&b"56"[..]));
    }

    #[test]
    fn trailing_token_without_terminator_is_returned() {
        let mut cursor = TokenCursor::new(b"42");
        assert_eq!(cursor.read_int(), 42);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.read_int(), -1);
    }

    #[test]
    fn parse_failures_become_sentinels() {
        let mut cursor = TokenCursor::new(b"abc 1.5x ");
        assert_eq!(cursor.read_int(), -1);
        assert!(cursor.read_float().is_nan());
        assert!(cursor.read_float().is_nan());
    }

    #[test]
    fn failed_token_read_leaves_cursor_in_place() {
        let mut cursor = TokenCursor::new(b"  \n \n");
        let err = cursor.read_token_until(b' ', 32).unwrap_err();
        assert_eq!(
            err,
            CursorError::UnexpectedEof {
                offset: 0,
                wanted: "token"
            }
        );
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn lines_strip_carriage_return() {
        let mut cursor = TokenCursor::new(b"DU420_BEX2\r\nnext\nlast");
        assert_eq!(cursor.read_line(), Ok(&b"DU420_BEX2"[..]));
        cursor.discard_line().unwrap();
        assert_eq!(cursor.read_line(), Ok(&b"last"[..]));
        assert!(cursor.read_line().is_err());
    }

    #[test]
    fn fixed_binary_requires_full_length() {
        let mut cursor = TokenCursor::new(b"\x00\x01\x02");
        assert!(cursor.read_fixed_binary(4).is_err());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_fixed_binary(2), Ok(&b"\x00\x01"[..]));
    }

    #[test]
    fn whitespace_and_byte_skips() {
        let mut cursor = TokenCursor::new(b" \r\n  x0123456789");
        cursor.skip_whitespace_and_newlines();
        assert_eq!(cursor.position(), 5);
        cursor.skip_bytes(3);
        assert_eq!(cursor.read_int(), 23456789);
        cursor.skip_bytes(100);
        assert!(cursor.is_at_end());
        cursor.seek(1);
        assert_eq!(cursor.remaining(), 15);
    }
}
