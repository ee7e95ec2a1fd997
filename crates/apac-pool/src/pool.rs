//! In-memory number pool and its backing file.
//!
//! File format: one caption line, then one `{base12}-{digit}` line per
//! number, front of the file = next number to allocate. Files written by
//! older tools may be UTF-8 or Windows-1252 and may carry bare 13-digit
//! lines; both are accepted on load. Writes are always Windows-1252 in the
//! `base-digit` shape.

use std::borrow::Cow;
use std::collections::{HashSet, VecDeque};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use apac_model::AuthorizationNumber;
use apac_model::ids::AUTHORIZATION_DIGITS;
use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::{debug, info, warn};

use crate::error::{PoolError, Result};

/// Caption written on the first line of every pool file.
pub const POOL_HEADER: &str = "NUMERAÇÃO APAC";

/// Ordered pool of unused authorization numbers.
///
/// Not safe for concurrent runs against the same file; a single batch owns
/// the pool for its whole lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberPool {
    numbers: VecDeque<AuthorizationNumber>,
}

impl NumberPool {
    pub fn new(numbers: impl IntoIterator<Item = AuthorizationNumber>) -> Self {
        Self {
            numbers: numbers.into_iter().collect(),
        }
    }

    /// Load the pool from `path`.
    ///
    /// Malformed and duplicate lines are skipped with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| PoolError::io("read", path, e))?;
        let pool = Self::parse(&decode_pool_text(&bytes));
        info!(path = %path.display(), available = pool.len(), "number pool loaded");
        Ok(pool)
    }

    /// Parse pool file text. The first line is the caption and is ignored.
    pub fn parse(text: &str) -> Self {
        let mut seen = HashSet::new();
        let mut numbers = VecDeque::new();
        for (idx, raw) in text.lines().enumerate().skip(1) {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some(number) = parse_pool_line(line) else {
                warn!(line = idx + 1, content = line, "skipping malformed pool line");
                continue;
            };
            if !seen.insert(number.clone()) {
                warn!(line = idx + 1, number = %number, "skipping duplicate pool number");
                continue;
            }
            numbers.push_back(number);
        }
        Self { numbers }
    }

    /// Take the next number. `None` means the pool is exhausted.
    ///
    /// Returns the number and how many remain after it.
    pub fn consume(&mut self) -> Option<(AuthorizationNumber, usize)> {
        let number = self.numbers.pop_front()?;
        debug!(number = %number, remaining = self.numbers.len(), "number consumed");
        Some((number, self.numbers.len()))
    }

    /// Put `number` back at the front so it is handed out next.
    pub fn give_back(&mut self, number: AuthorizationNumber) {
        debug!(number = %number, "number returned to pool");
        self.numbers.push_front(number);
    }

    pub fn peek(&self) -> Option<&AuthorizationNumber> {
        self.numbers.front()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorizationNumber> {
        self.numbers.iter()
    }

    /// Encoded file contents: caption, then one `base-digit` line per number.
    pub fn to_file_bytes(&self) -> Vec<u8> {
        let (header, _, _) = WINDOWS_1252.encode(POOL_HEADER);
        let mut bytes = Vec::with_capacity(header.len() + 1 + self.numbers.len() * 15);
        bytes.extend_from_slice(&header);
        bytes.push(b'\n');
        for number in &self.numbers {
            bytes.extend_from_slice(number.to_pool_line().as_bytes());
            bytes.push(b'\n');
        }
        bytes
    }

    /// Replace the file at `path` with the pool's current contents.
    ///
    /// The new contents are staged in a sibling file and renamed into place.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let bytes = self.to_file_bytes();
        let temp_path = staging_path(path);

        if let Err(err) = stage(&temp_path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
        if let Err(source) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(PoolError::AtomicWriteFailed {
                temp_path,
                target_path: path.to_path_buf(),
                source,
            });
        }

        info!(path = %path.display(), remaining = self.len(), "number pool saved");
        Ok(())
    }
}

fn stage(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| PoolError::io("create", temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| PoolError::io("write", temp_path, e))?;
    file.sync_all()
        .map_err(|e| PoolError::io("sync", temp_path, e))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Decode pool bytes as UTF-8, falling back to Windows-1252.
fn decode_pool_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text,
        None => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

/// Parse one number line: `{12 digits}-{1 digit}`, or a bare run of at
/// least 13 digits of which the first 13 are kept.
fn parse_pool_line(line: &str) -> Option<AuthorizationNumber> {
    if let Some((base, digit)) = line.split_once('-') {
        return AuthorizationNumber::from_parts(base, digit).ok();
    }
    if line.len() >= AUTHORIZATION_DIGITS && line.bytes().all(|b| b.is_ascii_digit()) {
        return AuthorizationNumber::new(&line[..AUTHORIZATION_DIGITS]).ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: &str) -> AuthorizationNumber {
        AuthorizationNumber::new(value).unwrap()
    }

    #[test]
    fn test_parse_line_shapes() {
        assert_eq!(parse_pool_line("352570409959-9"), Some(number("3525704099599")));
        assert_eq!(parse_pool_line("35257040996001"), Some(number("3525704099600")));
        assert_eq!(parse_pool_line("3525704099-9"), None);
        assert_eq!(parse_pool_line("352570409959-"), None);
        assert_eq!(parse_pool_line("352570409959"), None);
        assert_eq!(parse_pool_line("35257040995A9"), None);
    }

    #[test]
    fn test_parse_skips_header_and_bad_lines() {
        let text = "NUMERAÇÃO APAC\n352570409959-9\n\ngarbage\n352570409960-0\n352570409959-9\n";
        let pool = NumberPool::parse(text);
        let numbers: Vec<_> = pool.iter().map(AuthorizationNumber::as_str).collect();
        assert_eq!(numbers, ["3525704099599", "3525704099600"]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let pool = NumberPool::parse("HEADER\r\n352570409959-9\r\n");
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_consume_then_give_back_restores_pool() {
        let mut pool = NumberPool::new([number("3525704099599"), number("3525704099600")]);
        let before = pool.clone();
        let (taken, remaining) = pool.consume().unwrap();
        assert_eq!(remaining, 1);
        pool.give_back(taken);
        assert_eq!(pool, before);
    }

    #[test]
    fn test_consume_empty_is_none() {
        let mut pool = NumberPool::default();
        assert!(pool.consume().is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_decode_latin1_header() {
        let mut bytes = WINDOWS_1252.encode(POOL_HEADER).0.into_owned();
        bytes.extend_from_slice(b"\n352570409959-9\n");
        let text = decode_pool_text(&bytes);
        assert!(text.starts_with(POOL_HEADER));
        assert_eq!(NumberPool::parse(&text).len(), 1);
    }

    #[test]
    fn test_file_bytes_layout() {
        let pool = NumberPool::new([number("3525704099599")]);
        let bytes = pool.to_file_bytes();
        // Ç and Ã are single bytes in Windows-1252.
        assert_eq!(&bytes[..15], b"NUMERA\xC7\xC3O APAC\n");
        assert_eq!(&bytes[15..], b"352570409959-9\n");
    }
}
