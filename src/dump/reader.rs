// src/dump/reader.rs

//! Streaming reader for the recipe dump
//!
//! The dump is a single JSON object whose `queries` array can hold tens of
//! thousands of recipes. Rather than parsing the document as a whole, the
//! reader walks the top-level object byte by byte and only ever buffers the
//! raw text of one `queries` element, which is then handed to `serde_json`.
//!
//! Other top-level members are skipped without being buffered, except
//! `version`, which may appear before or after `queries`. When it follows
//! the array it only becomes known once iteration has finished.

use crate::dump::format::QueryDump;
use crate::error::{Error, Result};
use std::io::BufRead;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Inside the `queries` array; `first` until an element has been read
    Queries { first: bool },
    Done,
    Failed,
}

/// What the member scan stopped on
enum Member {
    Queries,
    End,
}

/// Pull-based iterator over the `queries` of a dump
///
/// Yields one fully materialized [`QueryDump`] per array element. The
/// sequence is finite and cannot be restarted; after the first error the
/// iterator is fused and yields nothing more.
pub struct DumpReader<R> {
    reader: R,
    version: Option<String>,
    state: State,
    seen_queries: bool,
    queries_read: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> DumpReader<R> {
    /// Start reading a dump, consuming everything up to the first query
    ///
    /// Fails if the input is not an object or has no `queries` array.
    pub fn new(reader: R) -> Result<Self> {
        let mut this = Self {
            reader,
            version: None,
            state: State::Done,
            seen_queries: false,
            queries_read: 0,
            buf: Vec::new(),
        };

        skip_whitespace(&mut this.reader)?;
        expect_byte(&mut this.reader, b'{', "start of dump object")?;
        match this.scan_members(true)? {
            Member::Queries => this.state = State::Queries { first: true },
            Member::End => {
                return Err(Error::MalformedDump(
                    "dump has no \"queries\" array".to_string(),
                ));
            }
        }
        Ok(this)
    }

    /// The dump's `version`, if it has been seen yet
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Number of queries yielded so far
    pub fn queries_read(&self) -> usize {
        self.queries_read
    }

    /// Give back the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Walk object members until `queries` or the closing brace
    fn scan_members(&mut self, mut first: bool) -> Result<Member> {
        loop {
            skip_whitespace(&mut self.reader)?;
            if peek_byte(&mut self.reader)? == Some(b'}') {
                self.reader.consume(1);
                return Ok(Member::End);
            }
            if !first {
                expect_byte(&mut self.reader, b',', "',' or '}' after member")?;
            }
            first = false;

            let key = read_key(&mut self.reader, &mut self.buf)?;
            skip_whitespace(&mut self.reader)?;
            expect_byte(&mut self.reader, b':', "':' after key")?;

            match key.as_str() {
                "version" => {
                    capture_value(&mut self.reader, Some(&mut self.buf))?;
                    let version: String = serde_json::from_slice(&self.buf).map_err(|e| {
                        Error::MalformedDump(format!("\"version\" is not a string: {}", e))
                    })?;
                    debug!("Dump version {}", version);
                    self.version = Some(version);
                }
                "queries" => {
                    if self.seen_queries {
                        return Err(Error::MalformedDump(
                            "duplicate \"queries\" member".to_string(),
                        ));
                    }
                    self.seen_queries = true;
                    skip_whitespace(&mut self.reader)?;
                    expect_byte(&mut self.reader, b'[', "'[' opening \"queries\"")?;
                    return Ok(Member::Queries);
                }
                _ => capture_value(&mut self.reader, None)?,
            }
        }
    }

    fn next_query(&mut self, first: bool) -> Result<Option<QueryDump>> {
        skip_whitespace(&mut self.reader)?;
        if peek_byte(&mut self.reader)? == Some(b']') {
            self.reader.consume(1);
            self.finish_document()?;
            return Ok(None);
        }
        if !first {
            expect_byte(&mut self.reader, b',', "',' or ']' between queries")?;
        }

        capture_value(&mut self.reader, Some(&mut self.buf))?;
        let query = serde_json::from_slice::<QueryDump>(&self.buf).map_err(|e| {
            Error::MalformedDump(format!("query {}: {}", self.queries_read, e))
        })?;
        self.queries_read += 1;
        Ok(Some(query))
    }

    /// Read the members after `queries` and make sure nothing trails the object
    fn finish_document(&mut self) -> Result<()> {
        if let Member::Queries = self.scan_members(false)? {
            return Err(Error::MalformedDump(
                "duplicate \"queries\" member".to_string(),
            ));
        }
        skip_whitespace(&mut self.reader)?;
        if peek_byte(&mut self.reader)?.is_some() {
            return Err(Error::MalformedDump(
                "unexpected data after dump object".to_string(),
            ));
        }
        debug!("Finished dump after {} queries", self.queries_read);
        Ok(())
    }
}

impl<R: BufRead> Iterator for DumpReader<R> {
    type Item = Result<QueryDump>;

    fn next(&mut self) -> Option<Self::Item> {
        let State::Queries { first } = self.state else {
            return None;
        };

        match self.next_query(first) {
            Ok(Some(query)) => {
                self.state = State::Queries { first: false };
                Some(Ok(query))
            }
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(e) => {
                self.state = State::Failed;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for DumpReader<R> {}

fn unexpected_end(what: &str) -> Error {
    Error::MalformedDump(format!("unexpected end of dump, expected {}", what))
}

fn peek_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

fn skip_whitespace<R: BufRead>(reader: &mut R) -> Result<()> {
    loop {
        let (skipped, exhausted) = {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            let n = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            (n, n == buf.len())
        };
        reader.consume(skipped);
        if !exhausted {
            return Ok(());
        }
    }
}

fn expect_byte<R: BufRead>(reader: &mut R, expected: u8, what: &str) -> Result<()> {
    match peek_byte(reader)? {
        Some(b) if b == expected => {
            reader.consume(1);
            Ok(())
        }
        Some(b) => Err(Error::MalformedDump(format!(
            "expected {}, found '{}'",
            what,
            char::from(b).escape_default()
        ))),
        None => Err(unexpected_end(what)),
    }
}

fn read_key<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<String> {
    skip_whitespace(reader)?;
    match peek_byte(reader)? {
        Some(b'"') => {}
        Some(b) => {
            return Err(Error::MalformedDump(format!(
                "expected object key, found '{}'",
                char::from(b).escape_default()
            )));
        }
        None => return Err(unexpected_end("object key")),
    }
    capture_value(reader, Some(buf))?;
    serde_json::from_slice(buf).map_err(|e| Error::MalformedDump(format!("bad object key: {}", e)))
}

/// Bracket and string tracking across buffer refills
#[derive(Debug, Default)]
struct Scanner {
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl Scanner {
    /// Feed a chunk; returns how many bytes belong to the value and whether
    /// the value ended within them
    fn feed(&mut self, chunk: &[u8]) -> (usize, bool) {
        for (i, &b) in chunk.iter().enumerate() {
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if b == b'\\' {
                    self.escaped = true;
                } else if b == b'"' {
                    self.in_string = false;
                    if self.depth == 0 {
                        return (i + 1, true);
                    }
                }
                continue;
            }

            match b {
                b'"' => self.in_string = true,
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        return (i + 1, true);
                    }
                }
                _ => {}
            }
        }
        (chunk.len(), false)
    }
}

/// Consume one JSON value, copying its raw bytes into `out` when given
///
/// Containers and strings are consumed through their closing byte. Scalars
/// run up to the next delimiter, which is left in the reader.
fn capture_value<R: BufRead>(reader: &mut R, mut out: Option<&mut Vec<u8>>) -> Result<()> {
    if let Some(out) = out.as_deref_mut() {
        out.clear();
    }
    skip_whitespace(reader)?;

    let first = peek_byte(reader)?.ok_or_else(|| unexpected_end("a value"))?;
    if !matches!(first, b'{' | b'[' | b'"') {
        return capture_scalar(reader, out);
    }

    let mut scanner = Scanner::default();
    loop {
        let (used, done) = {
            let chunk = reader.fill_buf()?;
            if chunk.is_empty() {
                return Err(unexpected_end("end of value"));
            }
            let (used, done) = scanner.feed(chunk);
            if let Some(out) = out.as_deref_mut() {
                out.extend_from_slice(&chunk[..used]);
            }
            (used, done)
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}

fn capture_scalar<R: BufRead>(reader: &mut R, mut out: Option<&mut Vec<u8>>) -> Result<()> {
    loop {
        let (used, done) = {
            let chunk = reader.fill_buf()?;
            if chunk.is_empty() {
                return Ok(());
            }
            let used = chunk
                .iter()
                .position(|b| matches!(b, b',' | b'}' | b']') || b.is_ascii_whitespace())
                .unwrap_or(chunk.len());
            if let Some(out) = out.as_deref_mut() {
                out.extend_from_slice(&chunk[..used]);
            }
            (used, used < chunk.len())
        };
        reader.consume(used);
        if done {
            return Ok(());
        }
    }
}
