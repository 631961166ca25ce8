// +-----------------------------------------------------------------------------------------------+
// | Copyright 2016 Sean Kerr                                                                      |
// |                                                                                               |
// | Licensed under the Apache License, Version 2.0 (the "License");                               |
// | you may not use this file except in compliance with the License.                              |
// | You may obtain a copy of the License at                                                       |
// |                                                                                               |
// |  http://www.apache.org/licenses/LICENSE-2.0                                                   |
// |                                                                                               |
// | Unless required by applicable law or agreed to in writing, software                           |
// | distributed under the License is distributed on an "AS IS" BASIS,                             |
// | WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.                      |
// | See the License for the specific language governing permissions and                           |
// | limitations under the License.                                                                |
// +-----------------------------------------------------------------------------------------------+

//! A growable, length-prefixed byte string with case-sensitive and
//! ASCII-case-insensitive comparison helpers.
//!
//! `ByteString` exists because header field values, raw URLs and multipart
//! boundaries are not guaranteed to be valid UTF-8, and every comparison a
//! parser runs against them needs to pick case sensitivity explicitly rather
//! than relying on `str`'s locale-agnostic-but-always-sensitive `==`.

use std::fmt;
use std::ops::Deref;

/// An owned, growable byte string.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct ByteString {
    data: Vec<u8>
}

impl ByteString {
    /// Creates an empty byte string.
    pub fn new() -> ByteString {
        ByteString{ data: Vec::new() }
    }

    /// Creates an empty byte string with room for at least `capacity` bytes
    /// before it needs to reallocate.
    pub fn with_capacity(capacity: usize) -> ByteString {
        ByteString{ data: Vec::with_capacity(capacity) }
    }

    /// Appends `bytes` to the end of this byte string.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Appends a single byte to the end of this byte string.
    pub fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Removes the last byte, if any.
    ///
    /// Mirrors `bstr_chop`: chopping an empty string is a no-op, not an
    /// error.
    pub fn chop(&mut self) {
        self.data.pop();
    }

    /// Returns the number of bytes in this byte string.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this byte string holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns the index of the first occurrence of `byte`, if any.
    pub fn index_of_byte(&self, byte: u8) -> Option<usize> {
        self.data.iter().position(|&b| b == byte)
    }

    /// Returns the index of the last occurrence of `byte`, if any.
    pub fn last_index_of_byte(&self, byte: u8) -> Option<usize> {
        self.data.iter().rposition(|&b| b == byte)
    }

    /// Returns `true` if this byte string starts with `needle`, compared
    /// byte-for-byte.
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.data.starts_with(needle)
    }

    /// Returns `true` if this byte string starts with `needle`, compared
    /// ASCII-case-insensitively.
    pub fn starts_with_nocase(&self, needle: &[u8]) -> bool {
        if needle.len() > self.data.len() {
            return false;
        }

        self.data[..needle.len()].eq_ignore_ascii_case(needle)
    }

    /// Returns the index of the first occurrence of `needle`, compared
    /// byte-for-byte, or `None` if it does not occur.
    ///
    /// Grounded on `bstr_index_of_mem`: a plain quadratic scan is used
    /// rather than Knuth-Morris-Pratt, since boundaries and header names are
    /// short.
    pub fn index_of(&self, needle: &[u8]) -> Option<usize> {
        index_of_impl(&self.data, needle, false)
    }

    /// Returns the index of the first occurrence of `needle`, compared
    /// ASCII-case-insensitively, or `None` if it does not occur.
    pub fn index_of_nocase(&self, needle: &[u8]) -> Option<usize> {
        index_of_impl(&self.data, needle, true)
    }

    /// Compares this byte string to `other`, byte-for-byte.
    pub fn cmp_nocase(&self, other: &[u8]) -> bool {
        self.data.eq_ignore_ascii_case(other)
    }

    /// Returns a lower-cased copy of this byte string. Only ASCII letters
    /// are folded; other bytes pass through unchanged.
    pub fn to_lowercase(&self) -> ByteString {
        let mut out = Vec::with_capacity(self.data.len());
        out.extend(self.data.iter().map(|b| b.to_ascii_lowercase()));
        ByteString{ data: out }
    }
}

fn index_of_impl(haystack: &[u8], needle: &[u8], nocase: bool) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return if needle.is_empty() { Some(0) } else { None };
    }

    'outer: for start in 0..=(haystack.len() - needle.len()) {
        for (offset, &n) in needle.iter().enumerate() {
            let h = haystack[start + offset];

            let matches = if nocase {
                h.eq_ignore_ascii_case(&n)
            } else {
                h == n
            };

            if !matches {
                continue 'outer;
            }
        }

        return Some(start);
    }

    None
}

impl Deref for ByteString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(data: Vec<u8>) -> ByteString {
        ByteString{ data: data }
    }
}

impl<'a> From<&'a [u8]> for ByteString {
    fn from(data: &'a [u8]) -> ByteString {
        ByteString{ data: data.to_vec() }
    }
}

impl<'a> From<&'a str> for ByteString {
    fn from(data: &'a str) -> ByteString {
        ByteString{ data: data.as_bytes().to_vec() }
    }
}

impl fmt::Debug for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match std::str::from_utf8(&self.data) {
            Ok(s)  => write!(f, "ByteString({:?})", s),
            Err(_) => write!(f, "ByteString({:?})", self.data)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_with_is_case_sensitive() {
        let b = ByteString::from("Content-Type");

        assert!(b.starts_with(b"Content"));
        assert!(!b.starts_with(b"content"));
        assert!(b.starts_with_nocase(b"content"));
    }

    #[test]
    fn index_of_finds_needle() {
        let b = ByteString::from("--boundary-42--");

        assert_eq!(b.index_of(b"boundary"), Some(2));
        assert_eq!(b.index_of(b"BOUNDARY"), None);
        assert_eq!(b.index_of_nocase(b"BOUNDARY"), Some(2));
        assert_eq!(b.index_of(b"nope"), None);
    }

    #[test]
    fn chop_removes_last_byte() {
        let mut b = ByteString::from("abc");

        b.chop();

        assert_eq!(b.as_slice(), b"ab");
    }

    #[test]
    fn chop_on_empty_is_noop() {
        let mut b = ByteString::new();

        b.chop();

        assert!(b.is_empty());
    }

    #[test]
    fn cmp_nocase_matches_regardless_of_case() {
        let b = ByteString::from("Keep-Alive");

        assert!(b.cmp_nocase(b"keep-alive"));
        assert!(!b.cmp_nocase(b"close"));
    }
}
