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

//! Request stream parsing: request line, headers, and body framing.
//!
//! A [`RequestParser`] is fed successive chunks of one connection's request
//! stream and drives each [`Transaction`] it creates through
//! `Progress::Line -> Headers -> Body -> Trailer -> Complete`, firing the
//! matching [`HookSet`] points along the way. It never looks at the response
//! side; `Connection` is responsible for noticing when a new request arrived
//! before the prior response finished and marking the transaction
//! `PIPELINED`.

use bstr::ByteString;
use byte::is_token;
use config::Config;
use http1::error::ParserError;
use http1::header::{HeaderAccumulator, HeaderOutcome};
use http1::hook_point::HookSet;
use http1::multipart::{self, MultipartParser};
use http1::transaction::{BodyLength, Method, Progress, Protocol, Transaction, TransactionFlags};
use http1::StreamResult;
use path;

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

/// Streaming HTTP/1.x request parser.
///
/// Holds no reference to the `Connection` it belongs to; the caller supplies
/// the transaction list and hook set on every call, which keeps this type
/// (and `ResponseParser`) independently testable.
pub struct RequestParser {
    state: State,
    current: Option<usize>,
    line_buf: Vec<u8>,
    header_acc: Option<HeaderAccumulator>,
    remaining: u64,
    chunk_remaining: u64,
    chunk_size_buf: Vec<u8>,
    multipart: Option<MultipartParser>,
    field_limit: usize,
    dead: bool
}

impl RequestParser {
    pub fn new(config: &Config) -> RequestParser {
        RequestParser{
            state: State::Idle,
            current: None,
            line_buf: Vec::new(),
            header_acc: None,
            remaining: 0,
            chunk_remaining: 0,
            chunk_size_buf: Vec::new(),
            multipart: None,
            field_limit: config.field_limit,
            dead: false
        }
    }

    /// Feeds one chunk of request-stream bytes. The transaction the bytes
    /// belong to is either the one most recently created by this parser, or
    /// a freshly pushed one if the prior request completed (or none exists
    /// yet).
    ///
    /// Once an error has been returned, the parser is dead: every subsequent
    /// call returns `ParserError::Dead` without looking at `data` again.
    pub fn feed(&mut self, data: &[u8], transactions: &mut Vec<Transaction>, hooks: &mut HookSet,
                config: &Config) -> StreamResult {
        if self.dead {
            return StreamResult::Error(ParserError::Dead);
        }

        let mut pos = 0;

        loop {
            match self.state {
                State::Idle => {
                    let index = transactions.len();
                    transactions.push(Transaction::new(index));
                    self.current = Some(index);
                    self.reset_for_new_request();

                    let txn = &mut transactions[index];
                    txn.request_progress = Progress::Line;
                    HookSet::fire(&mut hooks.request_start, txn);

                    self.state = State::Line;
                }
                State::Line => {
                    if pos >= data.len() {
                        return StreamResult::Data(pos);
                    }

                    match self.consume_line(&data[pos..]) {
                        Ok(Some((consumed, bare_lf))) => {
                            pos += consumed;

                            let txn = self.txn_mut(transactions);

                            if let Err(e) = finish_request_line(txn, &self.line_buf, config) {
                                self.dead = true;
                                return StreamResult::Error(e);
                            }

                            if bare_lf {
                                debug!("bare LF request line terminator, request {}", txn.index);
                                txn.flags.insert(TransactionFlags::NON_CANONICAL_EOL);
                            }

                            HookSet::fire(&mut hooks.request_line, txn);

                            if !txn.request_uri_normalized.is_empty() {
                                HookSet::fire(&mut hooks.request_uri_normalize, txn);
                            }

                            self.line_buf.clear();

                            if txn.request_protocol == Protocol::Unknown {
                                // HTTP/0.9: no headers, no body, nothing else to read.
                                txn.flags.insert(TransactionFlags::HTTP_0_9_EXTRA);
                                txn.request_progress = Progress::Complete;
                                HookSet::fire(&mut hooks.request_complete, txn);
                                self.state = State::Complete;
                            } else {
                                txn.request_progress = Progress::Headers;
                                self.header_acc = Some(HeaderAccumulator::new(self.field_limit));
                                self.state = State::Headers;
                            }
                        }
                        Ok(None) => {
                            pos = data.len();
                            return StreamResult::Data(pos);
                        }
                        Err(e) => {
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

                    match acc.parse(&data[pos..], &mut txn.request_headers) {
                        Ok(HeaderOutcome::Continue(consumed)) => {
                            pos += consumed;
                            return StreamResult::Data(pos);
                        }
                        Ok(HeaderOutcome::Finished(consumed)) => {
                            pos += consumed;
                            self.header_acc = None;

                            if let Err(e) = frame_request_body(txn) {
                                self.dead = true;
                                return StreamResult::Error(e);
                            }

                            resolve_host(txn, config);

                            HookSet::fire(&mut hooks.request_headers, txn);

                            self.begin_body(txn, config);
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
                    txn.request_entity_length += take;
                    deliver_body_data(txn, hooks, chunk, &mut self.multipart);

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
                        // Zero-length chunk: move straight to trailers.
                        let txn = self.txn_mut(transactions);
                        txn.request_progress = Progress::Trailer;
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
                    txn.request_entity_length += take;
                    deliver_body_data(txn, hooks, chunk, &mut self.multipart);

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

                    match acc.parse(&data[pos..], &mut txn.request_trailers) {
                        Ok(HeaderOutcome::Continue(consumed)) => {
                            pos += consumed;
                            return StreamResult::Data(pos);
                        }
                        Ok(HeaderOutcome::Finished(consumed)) => {
                            pos += consumed;
                            self.header_acc = None;

                            if !txn.request_trailers.is_empty() {
                                HookSet::fire(&mut hooks.request_trailer, txn);
                            }

                            txn.request_progress = Progress::Complete;
                            HookSet::fire(&mut hooks.request_complete, txn);
                            self.state = State::Complete;
                        }
                        Err(e) => {
                            self.dead = true;
                            return StreamResult::Error(e);
                        }
                    }
                }
                State::TunnelPassthrough => {
                    // A CONNECT request has no body framing of its own; once
                    // the tunnel is established the connection hands bytes
                    // through untouched on both directions.
                    return StreamResult::Stop(pos);
                }
                State::Complete => {
                    self.state = State::Idle;

                    if pos >= data.len() {
                        return StreamResult::Ok(pos);
                    }
                }
            }
        }
    }

    fn reset_for_new_request(&mut self) {
        self.line_buf.clear();
        self.header_acc = None;
        self.remaining = 0;
        self.chunk_remaining = 0;
        self.chunk_size_buf.clear();
        self.multipart = None;
    }

    fn txn_mut<'a>(&self, transactions: &'a mut Vec<Transaction>) -> &'a mut Transaction {
        let index = self.current.expect("a transaction is active while the request parser is not Idle");
        &mut transactions[index]
    }

    /// Appends bytes to `line_buf` until an LF is found. Returns the number
    /// of input bytes consumed and whether the terminator was a bare LF
    /// (the caller marks the transaction `NON_CANONICAL_EOL` in that case).
    fn consume_line(&mut self, data: &[u8]) -> Result<Option<(usize, bool)>, ParserError> {
        for (i, &byte) in data.iter().enumerate() {
            if byte == b'\n' {
                let bare_lf = self.line_buf.last() != Some(&b'\r');

                if !bare_lf {
                    self.line_buf.pop();
                }

                return Ok(Some((i + 1, bare_lf)));
            }

            self.line_buf.push(byte);

            if self.line_buf.len() > self.field_limit {
                return Err(ParserError::FieldLimit);
            }
        }

        Ok(None)
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
                    // A bare LF with no preceding CR still terminates the
                    // chunk-size line; parse whatever digits were buffered.
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

    /// Chunk extensions (`;name=value` pairs after the length) are skipped
    /// without interpretation, per the framing rules: a parser must never
    /// let their content change how many bytes of body follow.
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

    fn begin_body(&mut self, txn: &mut Transaction, config: &Config) {
        if txn.request_method == Method::Connect {
            txn.request_progress = Progress::Complete;
            self.state = State::TunnelPassthrough;
            return;
        }

        match txn.request_body_length {
            BodyLength::None => {
                txn.request_progress = Progress::Complete;
                self.state = State::Complete;
            }
            BodyLength::Identity(len) => {
                self.remaining = len;
                self.maybe_start_multipart(txn, config);
                txn.request_progress = Progress::Body;
                self.state = State::BodyIdentity;

                if len == 0 {
                    self.state = State::Complete;
                    txn.request_progress = Progress::Complete;
                }
            }
            BodyLength::Chunked => {
                self.maybe_start_multipart(txn, config);
                txn.request_progress = Progress::Body;
                self.state = State::BodyChunkSize;
            }
        }
    }

    fn maybe_start_multipart(&mut self, txn: &Transaction, config: &Config) {
        if let Some(content_type) = txn.request_headers.get(b"content-type") {
            if content_type.starts_with_nocase(b"multipart/form-data") {
                if let Some(boundary) = multipart::extract_boundary(content_type.as_slice()) {
                    self.multipart = Some(MultipartParser::new(boundary, config));
                }
            }
        }
    }

    fn finish_body(&mut self, txn: &mut Transaction, hooks: &mut HookSet) {
        if let Some(parser) = self.multipart.take() {
            txn.multipart = Some(parser.finish());
        }

        txn.request_progress = Progress::Complete;
        HookSet::fire(&mut hooks.request_complete, txn);
        self.state = State::Complete;
    }
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

fn deliver_body_data(txn: &mut Transaction, hooks: &mut HookSet, chunk: &[u8],
                      multipart: &mut Option<MultipartParser>) {
    if let Some(parser) = multipart.as_mut() {
        let _ = parser.write(chunk);
    }

    txn.data_chunk.clear();
    txn.data_chunk.extend_from_slice(chunk);
    HookSet::fire(&mut hooks.request_body_data, txn);
    txn.data_chunk.clear();
}

/// Splits a request line into method, request-target and (if present)
/// protocol tokens, validates each, and records them on `txn`.
fn finish_request_line(txn: &mut Transaction, line: &[u8], config: &Config) -> Result<(), ParserError> {
    txn.request_line = ByteString::from(line);

    let first_sp = match line.iter().position(|&b| b == b' ') {
        Some(i) => i,
        None => return Err(ParserError::Method(line.first().copied().unwrap_or(0)))
    };

    let method = &line[..first_sp];

    for &byte in method {
        if !is_token(byte) {
            return Err(ParserError::Method(byte));
        }
    }

    txn.request_method_raw = ByteString::from(method);
    txn.request_method = Method::from_bytes(method);

    let rest = &line[first_sp + 1..];

    let (uri, protocol) = match rest.iter().position(|&b| b == b' ') {
        Some(second_sp) => (&rest[..second_sp], Some(&rest[second_sp + 1..])),
        None => (rest, None)
    };

    if uri.is_empty() {
        return Err(ParserError::Url(0));
    }

    txn.request_uri_raw = ByteString::from(uri);

    let normalized = rewrite_empty_authority(uri);
    let decoded = path::decode(&normalized, config);

    txn.request_uri_normalized = ByteString::from(decoded.path);
    txn.path_flags = decoded.flags;
    txn.path_status = decoded.status;

    match protocol {
        None => {
            txn.request_protocol = Protocol::Unknown;
        }
        Some(token) => {
            txn.request_protocol = parse_protocol(token)?;
        }
    }

    Ok(())
}

/// `http:///path` and `https:///path` (an empty authority between the
/// scheme and the path) are rewritten to the bare path form, matching how
/// most origin servers treat the degenerate authority-less absolute-URI.
fn rewrite_empty_authority(uri: &[u8]) -> Vec<u8> {
    for prefix in [&b"http:///"[..], &b"https:///"[..]] {
        if uri.starts_with(prefix) {
            let mut out = Vec::with_capacity(uri.len() - prefix.len() + 1);
            out.push(b'/');
            out.extend_from_slice(&uri[prefix.len()..]);
            return out;
        }
    }

    uri.to_vec()
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

/// Determines body framing for the request that just finished its headers,
/// per the precedence a conforming parser must apply: a `chunked`
/// `Transfer-Encoding` always wins; its coexistence with `Content-Length` is
/// a smuggling signal that must still resolve to chunked framing (never to
/// whichever the last intermediary trusted); an un-parseable `Content-Length`
/// is fatal, not just a flag.
fn frame_request_body(txn: &mut Transaction) -> Result<(), ParserError> {
    let transfer_encoding = txn.request_headers.get(b"transfer-encoding").map(|v| v.as_slice().to_vec());
    let content_length = txn.request_headers.get(b"content-length").map(|v| v.as_slice().to_vec());

    let chunked = transfer_encoding.as_ref().map_or(false, |te| is_chunked_coding(te));

    if let Some(te) = &transfer_encoding {
        if !chunked && !te.is_empty() {
            txn.flags.insert(TransactionFlags::REQUEST_INVALID_T_E);
        }
    }

    if chunked && content_length.is_some() {
        warn!("chunked Transfer-Encoding with a Content-Length present, request {}", txn.index);
        txn.flags.insert(TransactionFlags::REQUEST_SMUGGLING);
    }

    if txn.request_headers.count(b"content-length") > 1 {
        warn!("repeated Content-Length header, request {}", txn.index);
        txn.flags.insert(TransactionFlags::REQUEST_SMUGGLING);
    }

    if chunked {
        txn.request_body_length = BodyLength::Chunked;
        return Ok(());
    }

    if let Some(raw) = content_length {
        match parse_content_length(&raw) {
            Some(len) => {
                txn.request_body_length = BodyLength::Identity(len);
            }
            None => {
                txn.flags.insert(TransactionFlags::REQUEST_INVALID_C_L);
                error!("unparsable Content-Length on request {}", txn.index);
                return Err(ParserError::InvalidContentLength);
            }
        }

        return Ok(());
    }

    txn.request_body_length = BodyLength::None;

    Ok(())
}

fn is_chunked_coding(value: &[u8]) -> bool {
    // The last coding applied is the one nearest the end of a
    // comma-separated list; only a `Transfer-Encoding` that ends in
    // `chunked` describes a framing a recipient can actually decode.
    match value.rsplit(|&b| b == b',').next() {
        Some(last) => {
            let trimmed = trim_ascii_whitespace(last);
            trimmed.eq_ignore_ascii_case(b"chunked")
        }
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

/// Resolves and cross-checks `Host` against the request-target's authority
/// (when the target is absolute-form), recording the ambiguity flags a
/// downstream proxy needs to reject a request smuggling attempt.
fn resolve_host(txn: &mut Transaction, config: &Config) {
    let header_host = txn.request_headers.get(b"host").map(|v| v.as_slice().to_vec());
    let uri_authority = extract_authority(txn.request_uri_raw.as_slice());

    match (&header_host, &uri_authority) {
        (Some(h), Some(u)) => {
            if !h.eq_ignore_ascii_case(u) {
                debug!("Host header disagrees with request-target authority, request {}", txn.index);
                txn.flags.insert(TransactionFlags::HOST_AMBIGUOUS);
            }

            txn.request_host = Some(ByteString::from(h.clone()));
        }
        (Some(h), None) => {
            txn.request_host = Some(ByteString::from(h.clone()));
        }
        (None, Some(u)) => {
            txn.request_host = Some(ByteString::from(u.clone()));
        }
        (None, None) => {
            if let Protocol::Version(major, minor) = txn.request_protocol {
                if major >= 1 && minor >= 1 {
                    txn.flags.insert(TransactionFlags::HOST_MISSING);
                }
            }
        }
    }

    if config.strict_host_validation {
        if let Some(host) = txn.request_host.clone() {
            if !is_valid_hostname(host.as_slice()) {
                if header_host.is_some() {
                    txn.flags.insert(TransactionFlags::HOSTH_INVALID);
                } else {
                    txn.flags.insert(TransactionFlags::HOSTU_INVALID);
                }
            }
        }
    }
}

fn extract_authority(uri: &[u8]) -> Option<Vec<u8>> {
    let after_scheme = if uri.starts_with(b"http://") {
        &uri[7..]
    } else if uri.starts_with(b"https://") {
        &uri[8..]
    } else if uri.starts_with(b"//") {
        &uri[2..]
    } else {
        return None;
    };

    let end = after_scheme.iter().position(|&b| b == b'/' || b == b'?' || b == b'#').unwrap_or(after_scheme.len());

    Some(after_scheme[..end].to_vec())
}

fn is_valid_hostname(host: &[u8]) -> bool {
    if host.is_empty() {
        return false;
    }

    // Strip a trailing `:port`, if present and numeric.
    let name = match host.iter().rposition(|&b| b == b':') {
        Some(i) if host[i + 1..].iter().all(|b| b.is_ascii_digit()) && i + 1 < host.len() => &host[..i],
        _ => host
    };

    if name.is_empty() {
        return false;
    }

    name.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.' || b == b'[' || b == b']' || b == b':')
}

#[cfg(test)]
mod test {
    use super::*;
    use http1::hook_point::HookSet;

    fn run(parser: &mut RequestParser, transactions: &mut Vec<Transaction>, hooks: &mut HookSet,
           config: &Config, input: &[u8]) -> StreamResult {
        parser.feed(input, transactions, hooks, config)
    }

    #[test]
    fn parses_simple_get_request() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";

        run(&mut parser, &mut transactions, &mut hooks, &config, input);

        assert_eq!(transactions.len(), 1);

        let txn = &transactions[0];
        assert_eq!(txn.request_method, Method::Get);
        assert_eq!(txn.request_uri_normalized.as_slice(), b"/index.html");
        assert_eq!(txn.request_protocol, Protocol::Version(1, 1));
        assert_eq!(txn.request_progress, Progress::Complete);
        assert_eq!(txn.request_host.as_ref().unwrap().as_slice(), b"example.com");
    }

    #[test]
    fn http_0_9_request_skips_headers_and_body() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        run(&mut parser, &mut transactions, &mut hooks, &config, b"GET /\r\n");

        let txn = &transactions[0];
        assert_eq!(txn.request_protocol, Protocol::Unknown);
        assert!(txn.flags.contains(TransactionFlags::HTTP_0_9_EXTRA));
        assert_eq!(txn.request_progress, Progress::Complete);
    }

    #[test]
    fn identity_body_is_consumed_fully() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = b"POST /submit HTTP/1.1\r\nHost: a\r\nContent-Length: 5\r\n\r\nhello";

        run(&mut parser, &mut transactions, &mut hooks, &config, input);

        let txn = &transactions[0];
        assert_eq!(txn.request_body_length, BodyLength::Identity(5));
        assert_eq!(txn.request_entity_length, 5);
        assert_eq!(txn.request_progress, Progress::Complete);
    }

    #[test]
    fn chunked_body_with_trailer_completes() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = concat!(
            "POST /submit HTTP/1.1\r\n",
            "Host: a\r\n",
            "Transfer-Encoding: chunked\r\n",
            "\r\n",
            "5\r\n",
            "hello\r\n",
            "0\r\n",
            "X-Trailer: done\r\n",
            "\r\n"
        );

        run(&mut parser, &mut transactions, &mut hooks, &config, input.as_bytes());

        let txn = &transactions[0];
        assert_eq!(txn.request_body_length, BodyLength::Chunked);
        assert_eq!(txn.request_entity_length, 5);
        assert_eq!(txn.request_progress, Progress::Complete);
        assert_eq!(txn.request_trailers.get(b"x-trailer").unwrap().as_slice(), b"done");
    }

    #[test]
    fn transfer_encoding_and_content_length_flags_smuggling() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = concat!(
            "POST /submit HTTP/1.1\r\n",
            "Host: a\r\n",
            "Transfer-Encoding: chunked\r\n",
            "Content-Length: 5\r\n",
            "\r\n",
            "0\r\n\r\n"
        );

        run(&mut parser, &mut transactions, &mut hooks, &config, input.as_bytes());

        let txn = &transactions[0];
        assert!(txn.flags.contains(TransactionFlags::REQUEST_SMUGGLING));
        assert_eq!(txn.request_body_length, BodyLength::Chunked);
    }

    #[test]
    fn invalid_content_length_is_fatal() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = b"POST /submit HTTP/1.1\r\nHost: a\r\nContent-Length: abc\r\n\r\n";

        match run(&mut parser, &mut transactions, &mut hooks, &config, input) {
            StreamResult::Error(ParserError::InvalidContentLength) => {}
            other => panic!("expected InvalidContentLength error, got {:?}", other)
        }

        assert!(transactions[0].flags.contains(TransactionFlags::REQUEST_INVALID_C_L));
    }

    #[test]
    fn pipelined_requests_are_parsed_in_order() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = concat!(
            "GET /a HTTP/1.1\r\nHost: a\r\n\r\n",
            "GET /b HTTP/1.1\r\nHost: a\r\n\r\n"
        );

        run(&mut parser, &mut transactions, &mut hooks, &config, input.as_bytes());

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].request_uri_normalized.as_slice(), b"/a");
        assert_eq!(transactions[1].request_uri_normalized.as_slice(), b"/b");
    }

    #[test]
    fn empty_authority_absolute_uri_is_rewritten() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = b"GET http:///foo HTTP/1.1\r\nHost: a\r\n\r\n";

        run(&mut parser, &mut transactions, &mut hooks, &config, input);

        assert_eq!(transactions[0].request_uri_normalized.as_slice(), b"/foo");
    }

    #[test]
    fn split_across_many_small_chunks() {
        let config = Config::new();
        let mut parser = RequestParser::new(&config);
        let mut transactions = Vec::new();
        let mut hooks = HookSet::new();

        let input = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";

        for byte in input {
            run(&mut parser, &mut transactions, &mut hooks, &config, &[*byte]);
        }

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].request_progress, Progress::Complete);
        assert_eq!(transactions[0].request_uri_normalized.as_slice(), b"/index.html");
    }
}
