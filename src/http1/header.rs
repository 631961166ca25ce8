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

//! Shared folded-header-line accumulation.
//!
//! Request headers, response headers, multipart part headers and chunk
//! trailers all parse the same wire shape: `name: value CRLF`, optionally
//! continued by a line starting with a space or tab (folding). This module
//! owns that accumulation so the three parsers that need it do not each
//! reimplement it.

use byte::{is_header_field, is_quoted_header_field, is_token};
use collections::HeaderMap;
use http1::error::ParserError;

/// Where a [`HeaderAccumulator`] currently is within one header line.
#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Name,
    StripValue,
    Value,
    QuotedValue,
    EscapedValue,
    Cr,
    Lf,
    Cr2,
    Lf2
}

/// Accumulates folded header lines into a [`HeaderMap`], byte by byte,
/// across any number of calls to [`HeaderAccumulator::parse`].
pub struct HeaderAccumulator {
    state: State,
    name: Vec<u8>,
    value: Vec<u8>,
    folding: bool,
    finished: bool,
    field_limit: usize
}

/// What happened after feeding one slice of bytes to the accumulator.
pub enum HeaderOutcome {
    /// More data is needed; the byte offset consumed is returned.
    Continue(usize),

    /// The blank line terminating the header block was reached; the byte
    /// offset consumed (including the terminating CRLF) is returned.
    Finished(usize)
}

impl HeaderAccumulator {
    pub fn new(field_limit: usize) -> HeaderAccumulator {
        HeaderAccumulator{
            state: State::Name,
            name: Vec::new(),
            value: Vec::new(),
            folding: false,
            finished: false,
            field_limit: field_limit
        }
    }

    /// Feeds bytes into the accumulator, adding completed `name: value`
    /// pairs to `headers` as they are found.
    ///
    /// Returns the outcome of the call: either "keep feeding me" with the
    /// number of bytes consumed, or "the header block is complete" with the
    /// number of bytes consumed (which includes the blank-line terminator).
    pub fn parse(&mut self, data: &[u8], headers: &mut HeaderMap) -> Result<HeaderOutcome, ParserError> {
        let mut i = 0;

        while i < data.len() {
            let byte = data[i];

            match self.state {
                State::Name => {
                    if byte == b'\r' {
                        // Blank line: end of header block.
                        self.state = State::Lf2;
                        i += 1;
                        continue;
                    }

                    if self.name.is_empty() && (byte == b' ' || byte == b'\t') {
                        // Folded continuation of the previous value.
                        self.folding = true;
                        self.state   = State::StripValue;
                        i += 1;
                        continue;
                    }

                    if byte == b':' {
                        self.state = State::StripValue;
                        i += 1;
                        continue;
                    }

                    if !is_token(byte) {
                        return Err(ParserError::HeaderName(byte));
                    }

                    self.name.push(byte.to_ascii_lowercase());

                    if self.name.len() > self.field_limit {
                        return Err(ParserError::FieldLimit);
                    }

                    i += 1;
                }
                State::StripValue => {
                    if byte == b' ' || byte == b'\t' {
                        i += 1;
                        continue;
                    }

                    self.state = State::Value;
                }
                State::Value => {
                    if byte == b'\r' {
                        self.state = State::Cr;
                        i += 1;
                        continue;
                    }

                    if byte == b'"' {
                        self.value.push(byte);
                        self.state = State::QuotedValue;
                        i += 1;
                        continue;
                    }

                    if !is_header_field(byte) {
                        return Err(ParserError::HeaderValue(byte));
                    }

                    self.value.push(byte);

                    if self.value.len() > self.field_limit {
                        return Err(ParserError::FieldLimit);
                    }

                    i += 1;
                }
                State::QuotedValue => {
                    if byte == b'\\' {
                        self.state = State::EscapedValue;
                        i += 1;
                        continue;
                    }

                    if byte == b'"' {
                        self.value.push(byte);
                        self.state = State::Value;
                        i += 1;
                        continue;
                    }

                    if !is_quoted_header_field(byte) {
                        return Err(ParserError::HeaderValue(byte));
                    }

                    self.value.push(byte);
                    i += 1;
                }
                State::EscapedValue => {
                    self.value.push(byte);
                    self.state = State::QuotedValue;
                    i += 1;
                }
                State::Cr => {
                    if byte != b'\n' {
                        return Err(ParserError::HeaderValue(byte));
                    }

                    self.state = State::Lf;
                    i += 1;
                }
                State::Lf => {
                    self.commit_field(headers);

                    // Peek: is the next line a folded continuation?
                    self.state = State::Name;
                    i += 0; // re-enter the loop on State::Name with the same byte
                    continue;
                }
                State::Cr2 => {
                    if byte != b'\n' {
                        return Err(ParserError::HeaderValue(byte));
                    }

                    i += 1;
                    self.finished = true;

                    return Ok(HeaderOutcome::Finished(i));
                }
                State::Lf2 => {
                    if byte != b'\n' {
                        return Err(ParserError::HeaderValue(byte));
                    }

                    i += 1;
                    self.finished = true;

                    return Ok(HeaderOutcome::Finished(i));
                }
            }
        }

        Ok(HeaderOutcome::Continue(i))
    }

    /// `true` once the terminating blank line has been consumed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn commit_field(&mut self, headers: &mut HeaderMap) {
        if self.folding {
            // Join onto the most recently added value with ", ", matching
            // the fold-join behavior shared with multipart part headers.
            headers.extend_last_value(&self.value);
            self.folding = false;
        } else if !self.name.is_empty() {
            headers.add(std::mem::take(&mut self.name).into(), std::mem::take(&mut self.value).into());
        }

        self.name.clear();
        self.value.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_simple_headers() {
        let mut acc = HeaderAccumulator::new(8192);
        let mut headers = HeaderMap::new();

        let outcome = acc.parse(b"Host: example.com\r\nX-Test: 1\r\n\r\n", &mut headers).unwrap();

        match outcome {
            HeaderOutcome::Finished(_) => {}
            _ => panic!("expected Finished")
        }

        assert_eq!(headers.get(b"host").unwrap().as_slice(), b"example.com");
        assert_eq!(headers.get(b"x-test").unwrap().as_slice(), b"1");
    }

    #[test]
    fn splits_across_calls() {
        let mut acc = HeaderAccumulator::new(8192);
        let mut headers = HeaderMap::new();

        acc.parse(b"Host: exam", &mut headers).unwrap();
        let outcome = acc.parse(b"ple.com\r\n\r\n", &mut headers).unwrap();

        match outcome {
            HeaderOutcome::Finished(_) => {}
            _ => panic!("expected Finished")
        }

        assert_eq!(headers.get(b"host").unwrap().as_slice(), b"example.com");
    }

    #[test]
    fn folded_continuation_joins_with_comma_space() {
        let mut acc = HeaderAccumulator::new(8192);
        let mut headers = HeaderMap::new();

        acc.parse(b"X-Multi: one\r\n two\r\n\r\n", &mut headers).unwrap();

        assert_eq!(headers.get(b"x-multi").unwrap().as_slice(), b"one, two");
    }

    #[test]
    fn rejects_invalid_header_name_byte() {
        let mut acc = HeaderAccumulator::new(8192);
        let mut headers = HeaderMap::new();

        let err = acc.parse(b"Bad Name: x\r\n\r\n", &mut headers).unwrap_err();

        assert_eq!(err, ParserError::HeaderName(b' '));
    }

    #[test]
    fn enforces_field_limit() {
        let mut acc = HeaderAccumulator::new(4);
        let mut headers = HeaderMap::new();

        let err = acc.parse(b"Too-Long: x\r\n\r\n", &mut headers).unwrap_err();

        assert_eq!(err, ParserError::FieldLimit);
    }
}
