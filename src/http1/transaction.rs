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

//! A single request/response pair, and every observation recorded about it.

use bstr::ByteString;
use collections::HeaderMap;
use http1::multipart::MultipartBody;
use path::PathFlags;

/// Recognized request methods. `Extension` carries any token not in this
/// list verbatim (the method byte string is always kept alongside this
/// code, so no information is lost by the classification).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Unknown,
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
    Extension
}

impl Method {
    /// Classifies a method token. Case-sensitive: HTTP methods are tokens,
    /// and tokens are case-sensitive.
    pub fn from_bytes(bytes: &[u8]) -> Method {
        match bytes {
            b"GET"     => Method::Get,
            b"HEAD"    => Method::Head,
            b"POST"    => Method::Post,
            b"PUT"     => Method::Put,
            b"DELETE"  => Method::Delete,
            b"CONNECT" => Method::Connect,
            b"OPTIONS" => Method::Options,
            b"TRACE"   => Method::Trace,
            b"PATCH"   => Method::Patch,
            b""        => Method::Unknown,
            _          => Method::Extension
        }
    }
}

/// `HTTP/X.Y`, or `Unknown` when the protocol token did not match that
/// shape (including HTTP/0.9, which has no protocol token at all).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    Unknown,
    Http09,
    Version(u8, u8)
}

/// How a message body is framed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyLength {
    /// No body is present.
    None,

    /// A body of exactly this many bytes, from `Content-Length` or
    /// (responses only) inferred from connection closure.
    Identity(u64),

    /// Chunked transfer coding.
    Chunked
}

/// Per-direction parsing progress. Must advance monotonically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Progress {
    NotStarted,
    Line,
    Headers,
    Body,
    Trailer,
    Complete
}

/// Authentication artifacts extracted from an `Authorization` header, when
/// recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthType {
    None,
    Basic,
    Digest,
    Unrecognized
}

bitflags! {
    /// Deviations observed while parsing one transaction.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TransactionFlags: u32 {
        /// This request arrived before the prior response on the same
        /// connection finished (pipelining).
        const PIPELINED            = 1 << 0;

        /// The request or status line arrived split across more than one
        /// input chunk.
        const MULTI_PACKET_HEAD    = 1 << 1;

        /// The URI authority and the `Host` header disagree.
        const HOST_AMBIGUOUS       = 1 << 2;

        /// Neither a URI authority nor a `Host` header was present on an
        /// HTTP/1.1 message.
        const HOST_MISSING         = 1 << 3;

        /// The `Host` header failed hostname validation.
        const HOSTH_INVALID        = 1 << 4;

        /// The URI authority failed hostname validation.
        const HOSTU_INVALID        = 1 << 5;

        /// Transfer-Encoding and Content-Length were both present and
        /// disagreed about framing.
        const REQUEST_SMUGGLING    = 1 << 6;

        /// Content-Length was present but not a valid non-negative integer.
        const REQUEST_INVALID_C_L  = 1 << 7;

        /// Transfer-Encoding named a coding other than (or in addition to,
        /// in the wrong position) `chunked`.
        const REQUEST_INVALID_T_E  = 1 << 8;

        /// The request line carried no protocol token (HTTP/0.9).
        const HTTP_0_9_EXTRA       = 1 << 9;

        /// A non-canonical line terminator (bare CR or bare LF) was used
        /// somewhere in this transaction.
        const NON_CANONICAL_EOL    = 1 << 10;
    }
}

/// One request/response pair on a connection.
pub struct Transaction {
    pub index: usize,

    pub request_progress: Progress,
    pub response_progress: Progress,

    pub request_method: Method,
    pub request_method_raw: ByteString,
    pub request_line: ByteString,
    pub request_uri_raw: ByteString,
    pub request_uri_normalized: ByteString,
    pub request_protocol: Protocol,
    pub request_headers: HeaderMap,
    pub request_host: Option<ByteString>,
    pub request_port: Option<u16>,
    pub request_body_length: BodyLength,
    pub request_entity_length: u64,
    pub request_trailers: HeaderMap,

    pub auth_type: AuthType,
    pub auth_username: Option<ByteString>,
    pub auth_password: Option<ByteString>,

    pub response_status_code: u16,
    pub response_status_line: ByteString,
    pub response_protocol: Protocol,
    pub response_headers: HeaderMap,
    pub response_body_length: BodyLength,
    pub response_entity_length: u64,
    pub response_trailers: HeaderMap,

    pub path_flags: PathFlags,
    pub path_status: u16,

    pub flags: TransactionFlags,

    pub multipart: Option<MultipartBody>,

    /// Holds whatever raw chunk is currently being announced to observers;
    /// valid only for the duration of a `*_header_data`/`*_body_data` hook
    /// firing.
    pub data_chunk: Vec<u8>
}

impl Transaction {
    pub fn new(index: usize) -> Transaction {
        Transaction{
            index: index,
            request_progress: Progress::NotStarted,
            response_progress: Progress::NotStarted,
            request_method: Method::Unknown,
            request_method_raw: ByteString::new(),
            request_line: ByteString::new(),
            request_uri_raw: ByteString::new(),
            request_uri_normalized: ByteString::new(),
            request_protocol: Protocol::Unknown,
            request_headers: HeaderMap::new(),
            request_host: None,
            request_port: None,
            request_body_length: BodyLength::None,
            request_entity_length: 0,
            request_trailers: HeaderMap::new(),
            auth_type: AuthType::None,
            auth_username: None,
            auth_password: None,
            response_status_code: 0,
            response_status_line: ByteString::new(),
            response_protocol: Protocol::Unknown,
            response_headers: HeaderMap::new(),
            response_body_length: BodyLength::None,
            response_entity_length: 0,
            response_trailers: HeaderMap::new(),
            path_flags: PathFlags::empty(),
            path_status: 0,
            flags: TransactionFlags::empty(),
            multipart: None,
            data_chunk: Vec::new()
        }
    }

    /// `true` once both directions have reached `Complete`.
    pub fn is_complete(&self) -> bool {
        self.request_progress == Progress::Complete && self.response_progress == Progress::Complete
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn method_classification_is_case_sensitive() {
        assert_eq!(Method::from_bytes(b"GET"), Method::Get);
        assert_eq!(Method::from_bytes(b"get"), Method::Extension);
        assert_eq!(Method::from_bytes(b"CONNECT"), Method::Connect);
        assert_eq!(Method::from_bytes(b"WIBBLE"), Method::Extension);
    }

    #[test]
    fn new_transaction_starts_not_started() {
        let txn = Transaction::new(0);

        assert_eq!(txn.request_progress, Progress::NotStarted);
        assert_eq!(txn.response_progress, Progress::NotStarted);
        assert!(!txn.is_complete());
    }

    #[test]
    fn progress_ordering_is_monotonic() {
        assert!(Progress::Line < Progress::Headers);
        assert!(Progress::Headers < Progress::Body);
        assert!(Progress::Body < Progress::Trailer);
        assert!(Progress::Trailer < Progress::Complete);
    }
}
