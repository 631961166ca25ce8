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

use std::fmt;

/// Every way a stream parser can refuse to continue.
///
/// These fall into the four kinds a caller needs to distinguish: a
/// recoverable deviation tied to one offending byte (`Method`, `Url`,
/// `HeaderName`, ...), a framing failure where two signals about the body's
/// length disagree (`RequestSmuggling`, `InvalidContentLength`), a resource
/// ceiling (`FieldLimit`), and unconditional failure (`Dead`, raised once a
/// parser has already reported an error and is fed more data).
#[derive(Clone, Copy, PartialEq)]
pub enum ParserError {
    /// Invalid chunk extension name on byte `u8`.
    ChunkExtensionName(u8),

    /// Invalid chunk extension value on byte `u8`.
    ChunkExtensionValue(u8),

    /// Invalid chunk length on byte `u8`.
    ChunkLength(u8),

    /// Chunk length would overflow `u64`.
    ChunkLengthOverflow,

    /// Invalid CRLF sequence on byte `u8`.
    CrlfSequence(u8),

    /// Parsing has already failed; no further data will be accepted.
    Dead,

    /// A buffered field (header line, request line, chunk extension) grew
    /// past the configured limit.
    FieldLimit,

    /// Invalid header name on byte `u8`.
    HeaderName(u8),

    /// Invalid header value on byte `u8`.
    HeaderValue(u8),

    /// Both `Transfer-Encoding` and `Content-Length` were present and
    /// disagreed about how the body is framed.
    InvalidContentLength,

    /// Invalid request method on byte `u8`.
    Method(u8),

    /// Invalid multipart data.
    Multipart(u8),

    /// Invalid multipart boundary.
    MultipartBoundary(u8),

    /// Two or more `Transfer-Encoding`/`Content-Length` signals could be
    /// interpreted differently by two intermediaries; body framing is
    /// ambiguous and must not be trusted.
    RequestSmuggling,

    /// Invalid status reason phrase on byte `u8`.
    Status(u8),

    /// Invalid status code on byte `u8`.
    StatusCode(u8),

    /// Invalid URL character on byte `u8`.
    Url(u8),

    /// Invalid URL encoded name on byte `u8`.
    UrlEncodedName(u8),

    /// Invalid URL encoded value on byte `u8`.
    UrlEncodedValue(u8),

    /// Invalid HTTP version on byte `u8`.
    Version(u8)
}

impl ParserError {
    fn format(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParserError::ChunkExtensionName(byte) => {
                write!(formatter, "<ParserError::ChunkExtensionName: {}>", byte)
            },
            ParserError::ChunkExtensionValue(byte) => {
                write!(formatter, "<ParserError::ChunkExtensionValue: {}>", byte)
            },
            ParserError::ChunkLength(byte) => {
                write!(formatter, "<ParserError::ChunkLength: {}>", byte)
            },
            ParserError::ChunkLengthOverflow => {
                write!(formatter, "<ParserError::ChunkLengthOverflow>")
            },
            ParserError::CrlfSequence(byte) => {
                write!(formatter, "<ParserError::CrlfSequence: {}>", byte)
            },
            ParserError::Dead => {
                write!(formatter, "<ParserError::Dead>")
            },
            ParserError::FieldLimit => {
                write!(formatter, "<ParserError::FieldLimit>")
            },
            ParserError::HeaderName(byte) => {
                write!(formatter, "<ParserError::HeaderName: {}>", byte)
            },
            ParserError::HeaderValue(byte) => {
                write!(formatter, "<ParserError::HeaderValue: {}>", byte)
            },
            ParserError::InvalidContentLength => {
                write!(formatter, "<ParserError::InvalidContentLength>")
            },
            ParserError::Method(byte) => {
                write!(formatter, "<ParserError::Method: {}>", byte)
            },
            ParserError::Multipart(byte) => {
                write!(formatter, "<ParserError::Multipart: {}>", byte)
            },
            ParserError::MultipartBoundary(byte) => {
                write!(formatter, "<ParserError::MultipartBoundary: {}>", byte)
            },
            ParserError::RequestSmuggling => {
                write!(formatter, "<ParserError::RequestSmuggling>")
            },
            ParserError::Status(byte) => {
                write!(formatter, "<ParserError::Status: {}>", byte)
            },
            ParserError::StatusCode(byte) => {
                write!(formatter, "<ParserError::StatusCode: {}>", byte)
            },
            ParserError::Url(byte) => {
                write!(formatter, "<ParserError::Url: {}>", byte)
            },
            ParserError::UrlEncodedName(byte) => {
                write!(formatter, "<ParserError::UrlEncodedName: {}>", byte)
            },
            ParserError::UrlEncodedValue(byte) => {
                write!(formatter, "<ParserError::UrlEncodedValue: {}>", byte)
            },
            ParserError::Version(byte) => {
                write!(formatter, "<ParserError::Version: {}>", byte)
            }
        }
    }
}

impl fmt::Debug for ParserError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.format(formatter)
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.format(formatter)
    }
}

impl std::error::Error for ParserError {}
