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

#![crate_name = "htp_box"]

//! A high-assurance HTTP/1.x message parser.
//!
//! This crate decomposes into the pieces a host gateway needs to turn a raw
//! byte stream into a normalized, attack-resistant view of an HTTP
//! transaction: a resumable request/response parser (`http1`), a path/URI
//! normalizer (`path`), a streaming multipart/form-data parser
//! (`http1::multipart`), plus the supporting byte string, container, hook
//! and base64 primitives the parsers are built from.

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate log;

extern crate flate2;
extern crate rand;

pub mod base64;
pub mod bstr;
pub mod byte;
pub mod collections;
pub mod config;
pub mod hooks;
pub mod http1;
pub mod path;

/// Crate major version.
pub const VERSION_MAJOR: &'static str = env!("CARGO_PKG_VERSION_MAJOR");

/// Crate minor version.
pub const VERSION_MINOR: &'static str = env!("CARGO_PKG_VERSION_MINOR");

/// Crate patch version.
pub const VERSION_PATCH: &'static str = env!("CARGO_PKG_VERSION_PATCH");
