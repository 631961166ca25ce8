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

//! Streaming `multipart/form-data` parser.
//!
//! Driven byte by byte against the pattern `CRLF -- <boundary>` (the first
//! occurrence treats the implicit start of the body as the leading CRLF).
//! Unlike the request/response parsers, this one is not resumed through a
//! suspend/resume driver loop from the caller: [`MultipartParser::write`] is
//! called with successive body chunks and drives the state machine itself,
//! matching `htp_mpartp_parse` in spirit.

use bstr::ByteString;
use collections::HeaderMap;
use config::Config;
use http1::error::ParserError;
use http1::header::{HeaderAccumulator, HeaderOutcome};

use rand::distributions::Alphanumeric;
use rand::Rng;

use std::fs::File;
use std::io::Write;

/// What kind of content a part carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartType {
    Preamble,
    Text,
    File,
    Epilogue,
    Unknown
}

/// One part of a multipart body.
pub struct Part {
    pub part_type: PartType,
    pub name: Option<ByteString>,
    pub value: Option<ByteString>,
    pub filename: Option<ByteString>,
    pub content_type: Option<ByteString>,
    pub file_path: Option<String>,
    pub headers: HeaderMap,
    pub length: u64,
    body: Vec<u8>,
    file_handle: Option<File>
}

impl Part {
    fn new(part_type: PartType) -> Part {
        Part{
            part_type: part_type,
            name: None,
            value: None,
            filename: None,
            content_type: None,
            file_path: None,
            headers: HeaderMap::new(),
            length: 0,
            body: Vec::new(),
            file_handle: None
        }
    }
}

bitflags! {
    /// Observations recorded on a multipart body.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MultipartFlags: u32 {
        /// At least one boundary was preceded by CRLF.
        const CRLF_SEEN               = 1 << 0;

        /// At least one boundary was preceded by a bare LF.
        const LF_SEEN                 = 1 << 1;

        /// Bytes preceded the first boundary.
        const PREAMBLE_PRESENT        = 1 << 2;

        /// Bytes followed the last boundary.
        const EPILOGUE_PRESENT        = 1 << 3;

        /// The terminating `--boundary--` was observed.
        const LAST_BOUNDARY_SEEN      = 1 << 4;

        /// A boundary line was followed by linear whitespace before its
        /// terminator.
        const BOUNDARY_TRAILING_LWS   = 1 << 5;

        /// A boundary line was followed by non-whitespace garbage before
        /// its terminator.
        const BOUNDARY_TRAILING_NON_LWS = 1 << 6;

        /// The stream ended before a terminating boundary was seen.
        const PART_INCOMPLETE         = 1 << 7;

        /// A part declared a `Content-Disposition` with a repeated
        /// parameter name, joined per the header-folding rule.
        const REPEATED                = 1 << 8;
    }
}

/// A fully or partially parsed multipart body.
pub struct MultipartBody {
    pub boundary: ByteString,
    pub flags: MultipartFlags,
    pub parts: Vec<Part>,
    pub files_extracted: usize
}

impl MultipartBody {
    fn new(boundary: ByteString) -> MultipartBody {
        MultipartBody{ boundary: boundary, flags: MultipartFlags::empty(), parts: Vec::new(), files_extracted: 0 }
    }
}

/// Generates a 6-character mkstemp-style unique suffix from the OS RNG, so
/// extracted file names aren't a guessable sequence.
fn unique_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}

/// Extracts the boundary value from a `Content-Type: multipart/form-data;
/// boundary=...` header value. Returns `None` if no `boundary` parameter is
/// present or its value is malformed.
pub fn extract_boundary(content_type: &[u8]) -> Option<Vec<u8>> {
    let semi = content_type.iter().position(|&b| b == b';')?;
    let rest = &content_type[semi + 1..];
    let mut i = 0;

    while i < rest.len() && (rest[i] == b' ' || rest[i] == b'\t') {
        i += 1;
    }

    let param = &rest[i..];

    if param.len() < 8 || !param[..8].eq_ignore_ascii_case(b"boundary") {
        return None;
    }

    let mut j = 8;

    while j < param.len() && (param[j] == b' ' || param[j] == b'\t') {
        j += 1;
    }

    if j >= param.len() || param[j] != b'=' {
        return None;
    }

    j += 1;

    while j < param.len() && (param[j] == b' ' || param[j] == b'\t') {
        j += 1;
    }

    if j >= param.len() {
        return None;
    }

    if param[j] == b'"' {
        let mut value = Vec::new();
        let mut k = j + 1;

        while k < param.len() && param[k] != b'"' {
            value.push(param[k]);
            k += 1;
        }

        if k >= param.len() {
            return None;
        }

        Some(value)
    } else {
        let mut value = Vec::new();
        let mut k = j;

        while k < param.len() && is_bare_boundary_char(param[k]) {
            value.push(param[k]);
            k += 1;
        }

        if value.is_empty() {
            return None;
        }

        Some(value)
    }
}

fn is_bare_boundary_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'\'' | b'(' | b')' | b'+' | b'_' | b',' | b'-' | b'.' | b'/' | b':' | b'=' | b'?')
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Data,
    Boundary,
    BoundaryIsLast1,
    BoundaryIsLast2,
    BoundaryEatLf
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Headers,
    Data
}

/// Streaming multipart/form-data parser.
pub struct MultipartParser {
    state: State,
    phase: Phase,
    body: MultipartBody,
    match_pattern: Vec<u8>,
    match_pos: usize,
    seen_first_boundary: bool,
    finished: bool,
    header_acc: HeaderAccumulator,
    field_limit: usize,
    file_config_enabled: bool,
    file_size_limit: u64,
    file_directory: String,
    file_limit_count: usize
}

impl MultipartParser {
    pub fn new(boundary: Vec<u8>, config: &Config) -> MultipartParser {
        let mut pattern = Vec::with_capacity(boundary.len() + 4);

        pattern.extend_from_slice(b"\r\n--");
        pattern.extend_from_slice(&boundary);

        MultipartParser{
            state: State::Data,
            phase: Phase::Data,
            body: MultipartBody::new(ByteString::from(boundary)),
            match_pattern: pattern,
            match_pos: 2, // the implicit start of body counts as the leading CRLF
            seen_first_boundary: false,
            finished: false,
            header_acc: HeaderAccumulator::new(config.field_limit),
            field_limit: config.field_limit,
            file_config_enabled: config.multipart_file.enabled,
            file_size_limit: config.multipart_file.size_limit,
            file_directory: config.multipart_file.directory.clone(),
            file_limit_count: config.multipart_file.limit_count
        }
    }

    /// Feeds one chunk of request body bytes to the parser.
    pub fn write(&mut self, data: &[u8]) -> Result<(), ParserError> {
        if self.body.parts.is_empty() {
            self.body.parts.push(Part::new(PartType::Preamble));
        }

        let mut i = 0;

        while i < data.len() {
            let byte = data[i];

            match self.state {
                State::Data => {
                    if byte == self.match_pattern[self.match_pos] {
                        self.match_pos += 1;
                        i += 1;

                        if self.match_pos == self.match_pattern.len() {
                            self.finish_current_part();
                            self.seen_first_boundary = true;
                            self.state = State::BoundaryIsLast1;
                            self.match_pos = 0;
                        } else {
                            self.state = State::Boundary;
                        }

                        continue;
                    }

                    // Mismatch: flush anything tentatively matched plus this byte.
                    self.flush_mismatch(byte);
                    i += 1;
                }
                State::Boundary => {
                    if byte == self.match_pattern[self.match_pos] {
                        self.match_pos += 1;
                        i += 1;

                        if self.match_pos == self.match_pattern.len() {
                            self.finish_current_part();
                            self.seen_first_boundary = true;
                            self.state = State::BoundaryIsLast1;
                            self.match_pos = 0;
                        }

                        continue;
                    }

                    self.state = State::Data;
                    self.flush_mismatch(byte);
                    i += 1;
                }
                State::BoundaryIsLast1 => {
                    if byte == b'-' {
                        self.state = State::BoundaryIsLast2;
                        i += 1;
                        continue;
                    }

                    self.state = State::BoundaryEatLf;
                }
                State::BoundaryIsLast2 => {
                    if byte == b'-' {
                        self.body.flags.insert(MultipartFlags::LAST_BOUNDARY_SEEN);
                        i += 1;
                    }

                    self.state = State::BoundaryEatLf;
                }
                State::BoundaryEatLf => {
                    if byte == b' ' || byte == b'\t' {
                        self.body.flags.insert(MultipartFlags::BOUNDARY_TRAILING_LWS);
                        i += 1;
                        continue;
                    }

                    if byte == b'\r' {
                        i += 1;
                        continue;
                    }

                    if byte == b'\n' {
                        self.body.flags.insert(MultipartFlags::CRLF_SEEN);
                        i += 1;

                        if self.body.flags.contains(MultipartFlags::LAST_BOUNDARY_SEEN) {
                            self.finished = true;
                            // Remaining bytes (if any) belong to the epilogue.
                            if i < data.len() {
                                let mut epilogue = Part::new(PartType::Epilogue);
                                epilogue.body.extend_from_slice(&data[i..]);
                                epilogue.length = epilogue.body.len() as u64;
                                self.body.flags.insert(MultipartFlags::EPILOGUE_PRESENT);
                                self.body.parts.push(epilogue);
                            }
                            return Ok(());
                        }

                        self.start_new_part();
                        self.state = State::Data;
                        self.match_pos = 0;
                        continue;
                    }

                    self.body.flags.insert(MultipartFlags::BOUNDARY_TRAILING_NON_LWS);
                    i += 1;
                }
            }
        }

        Ok(())
    }

    /// Call once the body stream has ended. If no terminating boundary was
    /// seen, flags the body incomplete but keeps whatever parts were
    /// parsed. Consumes the parser; there is nothing left to feed it once a
    /// body has finished.
    pub fn finish(mut self) -> MultipartBody {
        if !self.finished {
            warn!("multipart body ended without a terminating boundary");
            self.body.flags.insert(MultipartFlags::PART_INCOMPLETE);
        }

        self.body
    }

    pub fn body(&self) -> &MultipartBody {
        &self.body
    }

    /// A tentative boundary match failed partway through. Writes the bytes
    /// consumed so far by the failed attempt back into the current part's
    /// body, followed by the byte that broke the match, and resets matching
    /// to start fresh.
    fn flush_mismatch(&mut self, byte: u8) {
        let floor = self.match_floor();
        let consumed: Vec<u8> = self.match_pattern[floor..self.match_pos].to_vec();

        self.push_bytes(&consumed);
        self.push_bytes(&[byte]);
        self.match_pos = floor;
    }

    fn match_floor(&self) -> usize {
        if self.seen_first_boundary { 0 } else { 2 }
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        match self.phase {
            Phase::Headers => {
                let mut headers = HeaderMap::new();

                if let Some(part) = self.body.parts.last_mut() {
                    headers = std::mem::replace(&mut part.headers, HeaderMap::new());
                }

                match self.header_acc.parse(bytes, &mut headers) {
                    Ok(HeaderOutcome::Finished(_)) => {
                        self.phase = Phase::Data;
                        self.apply_content_disposition(&headers);
                    }
                    _ => {}
                }

                if let Some(part) = self.body.parts.last_mut() {
                    part.headers = headers;
                }
            }
            Phase::Data => {
                if let Some(part) = self.body.parts.last_mut() {
                    part.length += bytes.len() as u64;

                    if part.part_type == PartType::File && self.file_config_enabled {
                        if let Some(handle) = part.file_handle.as_mut() {
                            if part.length <= self.file_size_limit {
                                let _ = handle.write_all(bytes);
                            }
                        }
                    } else {
                        part.body.extend_from_slice(bytes);
                    }
                }
            }
        }
    }

    fn apply_content_disposition(&mut self, headers: &HeaderMap) {
        let disposition = match headers.get(b"content-disposition") {
            Some(value) => value.as_slice().to_vec(),
            None => return
        };

        if !disposition.starts_with(b"form-data") {
            return;
        }

        let (name, filename) = parse_content_disposition_params(&disposition);

        let part_type = if filename.is_some() { PartType::File } else { PartType::Text };

        if let Some(part) = self.body.parts.last_mut() {
            part.part_type = part_type;
            part.name = name.map(ByteString::from);

            if let Some(fname) = filename {
                part.filename = Some(ByteString::from(fname));

                if self.file_config_enabled && self.body.files_extracted < self.file_limit_count {
                    let path = format!("{}/libhtp-multipart-file-{}", self.file_directory, unique_suffix());

                    if let Ok(handle) = File::create(&path) {
                        part.file_handle = Some(handle);
                        part.file_path = Some(path);
                        self.body.files_extracted += 1;
                    }
                }
            }
        }
    }

    fn start_new_part(&mut self) {
        self.phase = Phase::Headers;
        self.header_acc = HeaderAccumulator::new(self.field_limit);

        self.body.parts.push(Part::new(PartType::Unknown));
    }

    fn finish_current_part(&mut self) {
        if let Some(part) = self.body.parts.last_mut() {
            if part.part_type == PartType::Text || part.part_type == PartType::Unknown {
                part.value = Some(ByteString::from(part.body.clone()));
            }

            if let Some(handle) = part.file_handle.as_mut() {
                let _ = handle.flush();
            }
        }

        if let Some(first) = self.body.parts.first() {
            if first.part_type == PartType::Preamble && first.body.is_empty() {
                self.body.parts.remove(0);
            } else if first.part_type == PartType::Preamble {
                self.body.flags.insert(MultipartFlags::PREAMBLE_PRESENT);
            }
        }
    }
}

/// Splits out the `name` and `filename` parameters of a `Content-Disposition:
/// form-data; name="..."; filename="..."` value.
fn parse_content_disposition_params(value: &[u8]) -> (Option<Vec<u8>>, Option<Vec<u8>>) {
    let mut name = None;
    let mut filename = None;
    let mut i = 0;

    while i < value.len() {
        if value[i] != b';' {
            i += 1;
            continue;
        }

        i += 1;

        while i < value.len() && (value[i] == b' ' || value[i] == b'\t') {
            i += 1;
        }

        let start = i;

        while i < value.len() && value[i] != b'=' && value[i] != b';' {
            i += 1;
        }

        let param_name = &value[start..i];

        if i >= value.len() || value[i] != b'=' {
            continue;
        }

        i += 1;

        let param_value = if i < value.len() && value[i] == b'"' {
            i += 1;

            let mut out = Vec::new();

            while i < value.len() && value[i] != b'"' {
                if value[i] == b'\\' && i + 1 < value.len() {
                    i += 1;
                }

                out.push(value[i]);
                i += 1;
            }

            if i < value.len() {
                i += 1; // closing quote
            }

            out
        } else {
            let start = i;

            while i < value.len() && value[i] != b';' {
                i += 1;
            }

            value[start..i].to_vec()
        };

        if param_name.eq_ignore_ascii_case(b"name") {
            name = Some(param_value);
        } else if param_name.eq_ignore_ascii_case(b"filename") {
            filename = Some(param_value);
        }
    }

    (name, filename)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_bare_boundary() {
        let ct = b"multipart/form-data; boundary=----WebKitFormBoundaryXYZ";

        assert_eq!(extract_boundary(ct).unwrap(), b"----WebKitFormBoundaryXYZ".to_vec());
    }

    #[test]
    fn extracts_quoted_boundary() {
        let ct = b"multipart/form-data; boundary=\"abc 123\"";

        assert_eq!(extract_boundary(ct).unwrap(), b"abc 123".to_vec());
    }

    #[test]
    fn no_boundary_returns_none() {
        assert!(extract_boundary(b"multipart/form-data").is_none());
    }

    #[test]
    fn parses_two_text_parts() {
        let config = Config::new();
        let boundary = b"BOUNDARY".to_vec();
        let mut parser = MultipartParser::new(boundary, &config);

        let body = concat!(
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"field1\"\r\n",
            "\r\n",
            "value1\r\n",
            "--BOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"field2\"\r\n",
            "\r\n",
            "value2\r\n",
            "--BOUNDARY--\r\n"
        );

        // The implicit start-of-body counts as the leading CRLF, so the
        // stream begins at `--BOUNDARY`, matching `match_pos` starting at 2.
        parser.write(&body.as_bytes()[2..]).unwrap();

        let result = parser.finish();

        assert!(result.flags.contains(MultipartFlags::LAST_BOUNDARY_SEEN));

        let text_parts: Vec<_> = result.parts.iter().filter(|p| p.part_type == PartType::Text).collect();

        assert_eq!(text_parts.len(), 2);
        assert_eq!(text_parts[0].name.as_ref().unwrap().as_slice(), b"field1");
        assert_eq!(text_parts[0].value.as_ref().unwrap().as_slice(), b"value1");
        assert_eq!(text_parts[1].name.as_ref().unwrap().as_slice(), b"field2");
        assert_eq!(text_parts[1].value.as_ref().unwrap().as_slice(), b"value2");
    }

    #[test]
    fn truncated_stream_flags_incomplete() {
        let config = Config::new();
        let mut parser = MultipartParser::new(b"BOUNDARY".to_vec(), &config);

        parser.write(b"--BOUNDARY\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nhalf").unwrap();

        let result = parser.finish();

        assert!(result.flags.contains(MultipartFlags::PART_INCOMPLETE));
    }

    fn file_part(boundary: &[u8], name: &str, filename: &str, body: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{n}\"; filename=\"{f}\"\r\n\r\n{v}\r\n",
            b = std::str::from_utf8(boundary).unwrap(), n = name, f = filename, v = body
        )
    }

    #[test]
    fn extracted_file_uses_mandated_template() {
        let mut config = Config::new();
        config.multipart_file.enabled = true;
        config.multipart_file.directory = std::env::temp_dir().to_string_lossy().into_owned();

        let mut parser = MultipartParser::new(b"BOUNDARY".to_vec(), &config);
        let body = format!("{}--BOUNDARY--\r\n", file_part(b"BOUNDARY", "upload", "a.txt", "contents"));

        parser.write(&body.as_bytes()[2..]).unwrap();

        let result = parser.finish();
        let file_part = result.parts.iter().find(|p| p.part_type == PartType::File).unwrap();
        let path = file_part.file_path.as_ref().unwrap();

        assert!(path.contains("libhtp-multipart-file-"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn file_extraction_respects_configured_limit_count() {
        let mut config = Config::new();
        config.multipart_file.enabled = true;
        config.multipart_file.directory = std::env::temp_dir().to_string_lossy().into_owned();
        config.multipart_file.limit_count = 1;

        let mut parser = MultipartParser::new(b"BOUNDARY".to_vec(), &config);
        let body = format!(
            "{}{}--BOUNDARY--\r\n",
            file_part(b"BOUNDARY", "one", "a.txt", "aaa"),
            file_part(b"BOUNDARY", "two", "b.txt", "bbb")
        );

        parser.write(&body.as_bytes()[2..]).unwrap();

        let result = parser.finish();
        let file_parts: Vec<_> = result.parts.iter().filter(|p| p.part_type == PartType::File).collect();

        assert_eq!(file_parts.len(), 2);
        assert!(file_parts[0].file_path.is_some());
        assert!(file_parts[1].file_path.is_none());

        std::fs::remove_file(file_parts[0].file_path.as_ref().unwrap()).ok();
    }
}
