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

//! Response stream parsing: status line, headers, interim (1xx) responses,
//! and body framing.
//!
//! A [`ResponseParser`] correlates its output with the transaction list a
//! [`super::request::RequestParser`] is filling in: it always answers for
//! the oldest transaction that has not yet seen a final response, which is
//! what makes pipelined responses line up with the requests that caused
//! them.

use bstr::ByteString;
use config::Config;
use flate2::write::{DeflateDecoder, GzDecoder};
use http1::error::ParserError;
use http1::header::{HeaderAccumulator, HeaderOutcome};
use http1::hook_point::HookSet;
use http1::transaction::{BodyLength, Method, Progress, Protocol, Transaction};
use http1::StreamResult;

use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Idle,
    Line,
    Headers,
    BodyIdentity,
    BodyChunkSize,
    BodyChunkExtension,
    BodyChunkData,
    BodyChunkCrlf,
    BodyTrailer,
    TunnelPassthrough,
    Complete
}

enum Decompressor {
    None,
    Gzip(Box<GzDecoder<Vec<u8>>>),
    Deflate(Box<DeflateDecoder<Vec<u8>>>)
}

impl Decompressor {
    /// Pushes one chunk of wire bytes through the decoder and returns
    /// whatever decompressed bytes that produced. Decoder errors (corrupt
    /// stream) degrade to passing the raw chunk through rather than
    /// aborting the whole response; a body callback seeing garbage is
    /// preferable to losing the rest of the response.
    fn feed(&mut self, chunk: &[u8]) -> Vec<u8> {
        match self {
            Decompressor::None => chunk.to_vec(),
            Decompressor::Gzip(decoder) => {
                if decoder.write_all(chunk).is_err() {
                    warn!("gzip decompression failed, passing body bytes through raw");
                    return chunk.to_vec();
                }

                let _ = decoder.flush();
                std::mem::take(decoder.get_mut())
            }
            Decompressor::Deflate(decoder) => {
                if decoder.write_all(chunk).is_err() {
                    warn!("deflate decompression failed, passing body bytes through raw");
                    return chunk.to_vec();
                }

                let _ = decoder.flush();
                std::mem::take(decoder.get_mut())
            }
        }
    }
}

/// Streaming HTTP/1.x response parser.
///
/// Mirrors [`super::request::RequestParser`]'s shape, but tracks which
/// transaction it is currently answering for separately from which
/// transaction the request side is filling in: `next_index` only advances
/// once a final (non-interim) response completes.
pub struct ResponseParser {
    state: State,
    current: Option<usize>,
    next_index: usize,
    line_buf: Vec<u8>,
    header_acc: Option<HeaderAccumulator>,
    remaining: u64,
    chunk_remaining: u64,
    chunk_size_buf: Vec<u8>,
    decompressor: Decompressor,
    close_delimited: bool,
    field_limit: usize,
    dead: bool
}

impl ResponseParser {
    pub fn new(config: &Config) -> ResponseParser {
        ResponseParser{
            state: State::Idle,
            current: None,
            next_index: 0,
            line_buf: Vec::new(),
            header_acc: None,
            remaining: 0,
            chunk_remaining: 0,
            chunk_size_buf: Vec::new(),
            decompressor: Decompressor::None,
            close_delimited: false,
            field_limit: config.field_limit,
            dead: false
        }
    }

    /// Feeds one chunk of response-stream bytes, answering for the oldest
    /// transaction in `transactions` that has not yet completed its
    /// response. Panics if called before the corresponding request has been
    /// parsed (there would be nothing to correlate the response with).
    pub fn feed(&mut self, data: &[u8], transactions: &mut Vec<Transaction>, hooks: &mut HookSet,
                config: &Config) -> StreamResult {
        if self.dead {
            return StreamResult::Error(ParserError::Dead);
        }

        let mut pos = 0;

        loop {
            match self.state {
                State::Idle => {
                    if self.next_index >= transactions.len() {
                        // The request side has not produced a transaction for
                        // us to answer yet.
                        return StreamResult::DataOther(pos);
                    }

                    let index = self.next_index;
                    self.current = Some(index);
                    self.reset_for_new_response();

                    let txn = &mut transactions[index];
                    txn.response_progress = Progress::Line;
                    HookSet::fire(&mut hooks.response_start, txn);

                    self.state = State::Line;
                }
                State::Line => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    match self.consume_status_line(&data[pos..]) {
                        StatusLineOutcome::Complete(consumed) => {
                            pos += consumed;

                            let txn = self.txn_mut(transactions);

                            if let Err(e) = finish_status_line(txn, &self.line_buf) {
                                self.dead = true;
                                return StreamResult::Error(e);
                            }

                            HookSet::fire(&mut hooks.response_line, txn);

                            self.line_buf.clear();
                            txn.response_progress = Progress::Headers;
                            self.header_acc = Some(HeaderAccumulator::new(self.field_limit));
                            self.state = State::Headers;
                        }
                        StatusLineOutcome::Http09(consumed) => {
                            pos += consumed;

                            let sniffed = std::mem::take(&mut self.line_buf);
                            let txn = self.txn_mut(transactions);

                            txn.response_protocol = Protocol::Http09;
                            txn.response_progress = Progress::Body;
                            txn.response_body_length = BodyLength::Identity(u64::MAX);
                            txn.response_entity_length += sniffed.len() as u64;

                            self.remaining = u64::MAX;
                            self.close_delimited = true;

                            deliver_body_data(txn, hooks, &sniffed, &mut self.decompressor);

                            self.state = State::BodyIdentity;
                        }
                        StatusLineOutcome::NeedMore(consumed) => {
                            pos += consumed;
                            return StreamResult::Data(pos);
                        }
                        StatusLineOutcome::Error(e) => {
                            self.dead = true;
                            return StreamResult::Error(e);
                        }
                    }
                }
                State::Headers => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    let txn = self.txn_mut(transactions);
                    let acc = self.header_acc.as_mut().expect("header accumulator present in State::Headers");

                    match acc.parse(&data[pos..], &mut txn.response_headers) {
                        Ok(HeaderOutcome::Continue(consumed)) => {
                            pos += consumed;
                            return StreamResult::Data(pos);
                        }
                        Ok(HeaderOutcome::Finished(consumed)) => {
                            pos += consumed;
                            self.header_acc = None;

                            HookSet::fire(&mut hooks.response_headers, txn);

                            if is_interim(txn.response_status_code) {
                                // Consume and wait for the final response on
                                // the same transaction; an interim response
                                // never advances `next_index`.
                                txn.response_headers.clear();
                                self.state = State::Line;
                                continue;
                            }

                            if let Err(e) = frame_response_body(txn) {
                                self.dead = true;
                                return StreamResult::Error(e);
                            }

                            self.setup_decompressor(txn, config);
                            self.begin_body(txn);
                        }
                        Err(e) => {
                            self.dead = true;
                            return StreamResult::Error(e);
                        }
                    }
                }
                State::BodyIdentity => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    if self.remaining == 0 {
                        let txn = self.txn_mut(transactions);
                        self.finish_body(txn, hooks);
                        continue;
                    }

                    let available = (data.len() - pos) as u64;
                    let take = available.min(self.remaining);
                    let chunk = &data[pos..pos + take as usize];

                    pos += take as usize;
                    self.remaining -= take;

                    let txn = self.txn_mut(transactions);
                    txn.response_entity_length += take;
                    deliver_body_data(txn, hooks, chunk, &mut self.decompressor);

                    if self.remaining == 0 {
                        let txn = self.txn_mut(transactions);
                        self.finish_body(txn, hooks);
                    }

                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }
                }
                State::BodyChunkSize => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    match self.consume_chunk_size(&data[pos..]) {
                        Ok(Some(consumed)) => {
                            pos += consumed;
                        }
                        Ok(None) => {
                            return StreamResult::Data(data.len());
                        }
                        Err(e) => {
                            self.dead = true;
                            return StreamResult::Error(e);
                        }
                    }
                }
                State::BodyChunkExtension => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    match self.skip_chunk_extension(&data[pos..]) {
                        Some(consumed) => pos += consumed,
                        None => return StreamResult::Data(data.len())
                    }
                }
                State::BodyChunkData => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    if self.chunk_remaining == 0 {
                        let txn = self.txn_mut(transactions);
                        txn.response_progress = Progress::Trailer;
                        self.header_acc = Some(HeaderAccumulator::new(self.field_limit));
                        self.state = State::BodyTrailer;
                        continue;
                    }

                    let available = (data.len() - pos) as u64;
                    let take = available.min(self.chunk_remaining);
                    let chunk = &data[pos..pos + take as usize];

                    pos += take as usize;
                    self.chunk_remaining -= take;

                    let txn = self.txn_mut(transactions);
                    txn.response_entity_length += take;
                    deliver_body_data(txn, hooks, chunk, &mut self.decompressor);

                    if self.chunk_remaining == 0 {
                        self.state = State::BodyChunkCrlf;
                    }
                }
                State::BodyChunkCrlf => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    let byte = data[pos];
                    pos += 1;

                    match byte {
                        b'\r' => {}
                        b'\n' => self.state = State::BodyChunkSize,
                        _ => {
                            self.dead = true;
                            return StreamResult::Error(ParserError::CrlfSequence(byte));
                        }
                    }
                }
                State::BodyTrailer => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    let txn = self.txn_mut(transactions);
                    let acc = self.header_acc.as_mut().expect("header accumulator present in State::BodyTrailer");

                    match acc.parse(&data[pos..], &mut txn.response_trailers) {
                        Ok(HeaderOutcome::Continue(consumed)) => {
                            pos += consumed;
                            return StreamResult::Data(pos);
                        }
                        Ok(HeaderOutcome::Finished(consumed)) => {
                            pos += consumed;
                            self.header_acc = None;

                            if !txn.response_trailers.is_empty() {
                                HookSet::fire(&mut hooks.response_trailer, txn);
                            }

                            self.finish_body(txn, hooks);
                        }
                        Err(e) => {
                            self.dead = true;
                            return StreamResult::Error(e);
                        }
                    }
                }
                State::TunnelPassthrough => {
                    return StreamResult::Stop(pos);
                }
                State::Complete => {
                    self.next_index += 1;
                    self.state = State::Idle;

                    if pos >= data.len() {
                        return StreamResult::Ok(pos);
                    }
                }
            }
        }
    }

    /// Call when the connection closes. A response framed as
    /// close-delimited (no `Content-Length`, not chunked) is only complete
    /// once this is observed.
    pub fn notify_close(&mut self, transactions: &mut Vec<Transaction>, hooks: &mut HookSet) {
        if self.close_delimited && self.state == State::BodyIdentity {
            let txn = self.txn_mut(transactions);
            self.finish_body(txn, hooks);
        }
    }

    fn reset_for_new_response(&mut self) {
        self.line_buf.clear();
        self.header_acc = None;
        self.remaining = 0;
        self.chunk_remaining = 0;
        self.chunk_size_buf.clear();
        self.decompressor = Decompressor::None;
        self.close_delimited = false;
    }

    fn txn_mut<'a>(&self, transactions: &'a mut Vec<Transaction>) -> &'a mut Transaction {
        let index = self.current.expect("a transaction is active while the response parser is not Idle");
        &mut transactions[index]
    }

    fn consume_status_line(&mut self, data: &[u8]) -> StatusLineOutcome {
        for (i, &byte) in data.iter().enumerate() {
            if byte == b'\n' {
                if self.line_buf.last() == Some(&b'\r') {
                    self.line_buf.pop();
                }

                return StatusLineOutcome::Complete(i + 1);
            }

            self.line_buf.push(byte);

            if self.line_buf.len() == 5 && !self.line_buf.eq_ignore_ascii_case(b"HTTP/") {
                return StatusLineOutcome::Http09(i + 1);
            }

            if self.line_buf.len() > self.field_limit {
                return StatusLineOutcome::Error(ParserError::FieldLimit);
            }
        }

        StatusLineOutcome::NeedMore(data.len())
    }

    fn consume_chunk_size(&mut self, data: &[u8]) -> Result<Option<usize>, ParserError> {
        for (i, &byte) in data.iter().enumerate() {
            match byte {
                b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => {
                    self.chunk_size_buf.push(byte);

                    if self.chunk_size_buf.len() > 16 {
                        return Err(ParserError::ChunkLengthOverflow);
                    }
                }
                b';' => {
                    self.chunk_remaining = parse_hex(&self.chunk_size_buf)?;
                    self.chunk_size_buf.clear();
                    self.state = State::BodyChunkExtension;
                    return Ok(Some(i + 1));
                }
                b'\r' => {
                    self.chunk_remaining = parse_hex(&self.chunk_size_buf)?;
                    self.chunk_size_buf.clear();
                }
                b'\n' => {
                    if !self.chunk_size_buf.is_empty() {
                        self.chunk_remaining = parse_hex(&self.chunk_size_buf)?;
                        self.chunk_size_buf.clear();
                    }

                    self.state = State::BodyChunkData;
                    return Ok(Some(i + 1));
                }
                _ => return Err(ParserError::ChunkLength(byte))
            }
        }

        Ok(None)
    }

    fn skip_chunk_extension(&mut self, data: &[u8]) -> Option<usize> {
        for (i, &byte) in data.iter().enumerate() {
            if byte == b'\r' {
                continue;
            }

            if byte == b'\n' {
                self.state = State::BodyChunkData;
                return Some(i + 1);
            }
        }

        None
    }

    fn setup_decompressor(&mut self, txn: &Transaction, config: &Config) {
        if !config.decompress_responses {
            return;
        }

        let encoding = match txn.response_headers.get(b"content-encoding") {
            Some(value) => value,
            None => return
        };

        if encoding.cmp_nocase(b"gzip") {
            self.decompressor = Decompressor::Gzip(Box::new(GzDecoder::new(Vec::new())));
        } else if encoding.cmp_nocase(b"deflate") {
            self.decompressor = Decompressor::Deflate(Box::new(DeflateDecoder::new(Vec::new())));
        }
    }

    fn begin_body(&mut self, txn: &mut Transaction) {
        if is_tunnel_established(txn) {
            txn.response_progress = Progress::Complete;
            self.state = State::TunnelPassthrough;
            return;
        }

        match txn.response_body_length {
            BodyLength::None => {
                txn.response_progress = Progress::Complete;
                self.state = State::Complete;
            }
            BodyLength::Identity(len) => {
                self.remaining = len;
                self.close_delimited = len == u64::MAX;
                txn.response_progress = Progress::Body;
                self.state = State::BodyIdentity;

                if len == 0 {
                    self.state = State::Complete;
                    txn.response_progress = Progress::Complete;
                }
            }
            BodyLength::Chunked => {
                txn.response_progress = Progress::Body;
                self.state = State::BodyChunkSize;
            }
        }
    }

    fn finish_body(&mut self, txn: &mut Transaction, hooks: &mut HookSet) {
        txn.response_progress = Progress::Complete;
        HookSet::fire(&mut hooks.response_complete, txn);

        if txn.is_complete() {
            HookSet::fire(&mut hooks.transaction_complete, txn);
        }

        self.state = State::Complete;
    }
}

enum StatusLineOutcome {
    Complete(usize),
    Http09(usize),
    NeedMore(usize),
    Error(ParserError)
}

fn is_interim(status_code: u16) -> bool {
    (100..200).contains(&status_code)
}

fn is_tunnel_established(txn: &Transaction) -> bool {
    txn.request_method == Method::Connect && (200..300).contains(&txn.response_status_code)
}

fn deliver_body_data(txn: &mut Transaction, hooks: &mut HookSet, chunk: &[u8], decompressor: &mut Decompressor) {
    let decoded = decompressor.feed(chunk);

    txn.data_chunk.clear();
    txn.data_chunk.extend_from_slice(&decoded);
    HookSet::fire(&mut hooks.response_body_data, txn);
    txn.data_chunk.clear();
}

fn parse_hex(digits: &[u8]) -> Result<u64, ParserError> {
    if digits.is_empty() {
        return Err(ParserError::ChunkLength(0));
    }

    let mut value: u64 = 0;

    for &byte in digits {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(ParserError::ChunkLength(byte))
        };

        value = value.checked_mul(16).ok_or(ParserError::ChunkLengthOverflow)?;
        value = value.checked_add(digit as u64).ok_or(ParserError::ChunkLengthOverflow)?;
    }

    Ok(value)
}

/// Splits a status line into protocol, status code and reason phrase, and
/// records them on `txn`. The reason phrase is whatever remains after the
/// second space; it may contain further spaces and may be empty.
fn finish_status_line(txn: &mut Transaction, line: &[u8]) -> Result<(), ParserError> {
    txn.response_status_line = ByteString::from(line);

    let first_sp = line.iter().position(|&b| b == b' ').ok_or(ParserError::Status(line.first().copied().unwrap_or(0)))?;
    let protocol_token = &line[..first_sp];

    txn.response_protocol = parse_protocol(protocol_token)?;

    let rest = &line[first_sp + 1..];
    let second_sp = rest.iter().position(|&b| b == b' ').unwrap_or(rest.len());
    let code_token = &rest[..second_sp];

    if code_token.len() != 3 || !code_token.iter().all(|b| b.is_ascii_digit()) {
        return Err(ParserError::StatusCode(code_token.first().copied().unwrap_or(0)));
    }

    let code = (code_token[0] - b'0') as u16 * 100 + (code_token[1] - b'0') as u16 * 10 + (code_token[2] - b'0') as u16;

    txn.response_status_code = code;

    Ok(())
}

fn parse_protocol(token: &[u8]) -> Result<Protocol, ParserError> {
    if token.len() != 8 || !token[..5].eq_ignore_ascii_case(b"HTTP/") {
        return Err(ParserError::Version(token.first().copied().unwrap_or(0)));
    }

    let major = token[5];
    let dot = token[6];
    let minor = token[7];

    if !major.is_ascii_digit() || dot != b'.' || !minor.is_ascii_digit() {
        return Err(ParserError::Version(major));
    }

    Ok(Protocol::Version(major - b'0', minor - b'0'))
}

/// Determines body framing for a final (non-interim) response, given the
/// method of the request it answers.
fn frame_response_body(txn: &mut Transaction) -> Result<(), ParserError> {
    if txn.request_method == Method::Head || txn.response_status_code == 204 || txn.response_status_code == 304 {
        txn.response_body_length = BodyLength::None;
        return Ok(());
    }

    let transfer_encoding = txn.response_headers.get(b"transfer-encoding").map(|v| v.as_slice().to_vec());
    let content_length = txn.response_headers.get(b"content-length").map(|v| v.as_slice().to_vec());

    let chunked = transfer_encoding.as_ref().map_or(false, |te| is_chunked_coding(te));

    if chunked {
        txn.response_body_length = BodyLength::Chunked;
        return Ok(());
    }

    if let Some(raw) = content_length {
        match parse_content_length(&raw) {
            Some(len) => {
                txn.response_body_length = BodyLength::Identity(len);
            }
            None => {
                error!("unparsable Content-Length on response {}", txn.index);
                return Err(ParserError::InvalidContentLength);
            }
        }

        return Ok(());
    }

    // Neither chunked nor a valid Content-Length: the body runs until the
    // connection closes. `u64::MAX` is the sentinel `begin_body` recognizes
    // as "unbounded", matching `BodyLength::Identity`'s documented
    // response-only connection-closure case.
    txn.response_body_length = BodyLength::Identity(u64::MAX);

    Ok(())
}

fn is_chunked_coding(value: &[u8]) -> bool {
    match value.rsplit(|&b| b == b',').next() {
        Some(last) => trim_ascii_whitespace(last).eq_ignore_ascii_case(b"chunked"),
        None => false
    }
}

fn trim_ascii_whitespace(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(value.len());
    let end = value.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);

    &value[start..end]
}

fn parse_content_length(raw: &[u8]) -> Option<u64> {
    if raw.is_empty() || !raw.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }

    std::str::from_utf8(raw).ok()?.parse::<u64>().ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use http1::request::RequestParser;

    fn seed_request(transactions: &mut Vec<Transaction>, hooks: &mut HookSet, config: &Config, method: &[u8]) {
        let mut request_parser = RequestParser::new(config);
        let mut line = Vec::new();

        line.extend_from_slice(method);
        line.extend_from_slice(b" / HTTP/1.1\r\nHost: a\r\n\r\n");

        request_parser.feed(&line, transactions, hooks, config);
    }

    #[test]
    fn parses_simple_response_with_identity_body() {
        let config = Config::new();
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        seed_request(&mut transactions, &mut hooks, &config, b"GET");

        let mut parser = ResponseParser::new(&config);
        let input = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";

        parser.feed(input, &mut transactions, &mut hooks, &config);

        let txn = &transactions[0];
        assert_eq!(txn.response_status_code, 200);
        assert_eq!(txn.response_body_length, BodyLength::Identity(5));
        assert_eq!(txn.response_entity_length, 5);
        assert_eq!(txn.response_progress, Progress::Complete);
    }

    #[test]
    fn head_response_has_no_body_even_with_content_length() {
        let config = Config::new();
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        seed_request(&mut transactions, &mut hooks, &config, b"HEAD");

        let mut parser = ResponseParser::new(&config);
        let input = b"HTTP/1.1 200 OK\r\nContent-Length: 12345\r\n\r\n";

        parser.feed(input, &mut transactions, &mut hooks, &config);

        let txn = &transactions[0];
        assert_eq!(txn.response_body_length, BodyLength::None);
        assert_eq!(txn.response_progress, Progress::Complete);
    }

    #[test]
    fn interim_1xx_is_consumed_and_final_response_follows() {
        let config = Config::new();
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        seed_request(&mut transactions, &mut hooks, &config, b"GET");

        let mut parser = ResponseParser::new(&config);
        let input = concat!(
            "HTTP/1.1 100 Continue\r\n",
            "\r\n",
            "HTTP/1.1 200 OK\r\n",
            "Content-Length: 2\r\n",
            "\r\n",
            "hi"
        );

        parser.feed(input.as_bytes(), &mut transactions, &mut hooks, &config);

        let txn = &transactions[0];
        assert_eq!(txn.response_status_code, 200);
        assert_eq!(txn.response_progress, Progress::Complete);
    }

    #[test]
    fn close_delimited_body_completes_on_notify_close() {
        let config = Config::new();
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        seed_request(&mut transactions, &mut hooks, &config, b"GET");

        let mut parser = ResponseParser::new(&config);
        let input = b"HTTP/1.1 200 OK\r\n\r\nhello world";

        parser.feed(input, &mut transactions, &mut hooks, &config);

        assert_eq!(transactions[0].response_progress, Progress::Body);

        parser.notify_close(&mut transactions, &mut hooks);

        assert_eq!(transactions[0].response_progress, Progress::Complete);
    }

    #[test]
    fn pipelined_responses_answer_transactions_in_order() {
        let config = Config::new();
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        seed_request(&mut transactions, &mut hooks, &config, b"GET");
        seed_request(&mut transactions, &mut hooks, &config, b"GET");

        let mut parser = ResponseParser::new(&config);
        let input = concat!(
            "HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\na",
            "HTTP/1.1 404 Not Found\r\nContent-Length: 1\r\n\r\nb"
        );

        parser.feed(input.as_bytes(), &mut transactions, &mut hooks, &config);

        assert_eq!(transactions[0].response_status_code, 200);
        assert_eq!(transactions[1].response_status_code, 404);
    }

    #[test]
    fn connect_tunnel_response_stops_further_framing() {
        let config = Config::new();
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        seed_request(&mut transactions, &mut hooks, &config, b"CONNECT");

        let mut parser = ResponseParser::new(&config);
        let input = b"HTTP/1.1 200 Connection Established\r\n\r\n";

        let result = parser.feed(input, &mut transactions, &mut hooks, &config);

        assert!(matches!(result, StreamResult::Stop(_)));
        assert_eq!(transactions[0].response_progress, Progress::Complete);
    }
}
