//! Word lexer for option files.
//!
//! Converts a byte stream into words, one per call. Words are delimited by
//! whitespace or by matching `"`/`'` quotes; `#` starts a comment that runs
//! to end of line; backslash escapes the next character and understands the
//! usual named, octal and hex escape forms. Uses memchr to skip comment
//! bodies. Not a persistent iterator: the lexer is re-entered at the
//! current stream position for every word.

use std::io::{self, BufRead, ErrorKind};

use memchr::memchr;
use pppopt_types::limits::MAX_WORD_LEN;

/// One word produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The decoded word text.
    pub text: String,
    /// Whether a newline was crossed while skipping leading whitespace
    /// and comments. Consumers use this only for diagnostics.
    pub newline: bool,
    /// The raw word exceeded [`MAX_WORD_LEN`] and was truncated. The
    /// caller warns and continues; this is never fatal.
    pub truncated: bool,
}

/// Streaming word lexer over any buffered reader.
pub struct WordLexer<R> {
    inner: R,
    pushback: Option<u8>,
}

impl<R: BufRead> WordLexer<R> {
    /// Create a lexer reading from `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: None,
        }
    }

    /// Produce the next word.
    ///
    /// Returns `Ok(Some(word))` for a word (possibly empty, e.g. `""`),
    /// `Ok(None)` for clean end of input with no word accumulated, and
    /// `Err` for a stream-read error, which callers treat as fatal,
    /// distinct from clean end of input.
    pub fn next_word(&mut self) -> io::Result<Option<Word>> {
        let mut buf: Vec<u8> = Vec::new();
        let mut len = 0usize;
        let mut escape = false;
        let mut newline = false;

        // Skip whitespace and comments. An escaped character, even an
        // escaped space or `#`, starts a word.
        let mut c = loop {
            let Some(ch) = self.getc()? else {
                break None;
            };
            if ch == b'\n' {
                if escape {
                    escape = false;
                } else {
                    newline = true;
                }
                continue;
            }
            if escape {
                break Some(ch);
            }
            if ch == b'\\' {
                escape = true;
                continue;
            }
            if ch == b'#' {
                self.skip_comment()?;
                continue;
            }
            if !ch.is_ascii_whitespace() {
                break Some(ch);
            }
        };

        // An unescaped quote opens a quoted word; remember the delimiter.
        let quote = match c {
            Some(q @ (b'"' | b'\'')) if !escape => {
                c = self.getc()?;
                Some(q)
            }
            _ => None,
        };

        // Accumulate characters until the end of the word.
        while let Some(ch) = c {
            if escape {
                escape = false;
                if ch == b'\n' {
                    // Line continuation.
                    c = self.getc()?;
                    continue;
                }

                let mut consumed_ahead = false;
                let value: u8 = match ch {
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b's' => b' ',
                    b't' => b'\t',
                    _ if is_octal(ch) => {
                        let mut v: u32 = 0;
                        let mut cur = Some(ch);
                        let mut n = 0;
                        while n < 3 && matches!(cur, Some(d) if is_octal(d)) {
                            v = (v << 3) + u32::from(cur.unwrap_or(0) - b'0');
                            cur = self.getc()?;
                            n += 1;
                        }
                        c = cur;
                        consumed_ahead = true;
                        v as u8
                    }
                    b'x' => {
                        let mut v: u32 = 0;
                        let mut cur = self.getc()?;
                        let mut n = 0;
                        while n < 2 && matches!(cur, Some(d) if d.is_ascii_hexdigit()) {
                            let d = (cur.unwrap_or(0) as char).to_digit(16).unwrap_or(0);
                            v = (v << 4) + d;
                            cur = self.getc()?;
                            n += 1;
                        }
                        c = cur;
                        consumed_ahead = true;
                        v as u8
                    }
                    other => other,
                };

                push_limited(&mut buf, &mut len, value);
                if !consumed_ahead {
                    c = self.getc()?;
                }
                continue;
            }

            // Unescaped: check for the end of the word.
            if let Some(q) = quote {
                if ch == q {
                    break;
                }
            } else if ch.is_ascii_whitespace() || ch == b'#' {
                self.pushback = Some(ch);
                break;
            }

            if ch == b'\\' {
                escape = true;
                c = self.getc()?;
                continue;
            }

            push_limited(&mut buf, &mut len, ch);
            c = self.getc()?;
        }

        // Clean end of input with nothing accumulated: no word. A quoted
        // or escaped word that hit EOF keeps whatever it gathered.
        if c.is_none() && len == 0 {
            return Ok(None);
        }

        Ok(Some(Word {
            text: String::from_utf8_lossy(&buf).into_owned(),
            newline,
            truncated: len >= MAX_WORD_LEN,
        }))
    }

    /// Read one byte, honoring the one-byte pushback slot.
    fn getc(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pushback.take() {
            return Ok(Some(b));
        }
        loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(chunk) => {
                    let b = chunk[0];
                    self.inner.consume(1);
                    return Ok(Some(b));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Consume up to, but not including, the next newline.
    fn skip_comment(&mut self) -> io::Result<()> {
        loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(()),
                Ok(chunk) => match memchr(b'\n', chunk) {
                    Some(i) => {
                        self.inner.consume(i);
                        return Ok(());
                    }
                    None => {
                        let n = chunk.len();
                        self.inner.consume(n);
                    }
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

const fn is_octal(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

/// Append a byte unless the word is already at capacity; the length
/// counter keeps growing so the caller can detect truncation.
fn push_limited(buf: &mut Vec<u8>, len: &mut usize, b: u8) {
    if *len < MAX_WORD_LEN - 1 {
        buf.push(b);
    }
    *len += 1;
}
