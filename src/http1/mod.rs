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

//! HTTP/1.x message parsing: request and response stream parsers, the
//! transaction/connection model that ties them together, and the
//! multipart/form-data body parser.

pub mod connection;
pub mod error;
pub mod header;
pub mod hook_point;
pub mod multipart;
pub mod request;
pub mod response;
pub mod transaction;

pub use self::connection::Connection;
pub use self::error::ParserError;
pub use self::transaction::{Method, Progress, Transaction};

/// The result of feeding one chunk of bytes to a direction's parser.
///
/// Mirrors the suspension points a cooperative, resumable parser can reach:
/// it either made progress and wants more (`Data`), cannot proceed without
/// the other direction being observed first (`DataOther`), hit unrecoverable
/// corruption (`Error`), or the caller asked it to stop (`Stop`).
#[derive(Debug)]
pub enum StreamResult {
    /// The supplied bytes were fully consumed without completing or
    /// suspending; parsing can continue immediately with more bytes from
    /// the same direction.
    Ok(usize),

    /// The buffer was exhausted mid-token; the caller should supply more
    /// bytes for this direction.
    Data(usize),

    /// This direction cannot proceed until the other direction produces
    /// more data (for example: the request body cannot be framed until a
    /// response to `Expect: 100-continue` is seen).
    DataOther(usize),

    /// Unrecoverable corruption; no further input will be accepted on this
    /// direction.
    Error(ParserError),

    /// The caller requested a graceful halt.
    Stop(usize)
}
