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

//! Tunable parser behavior.
//!
//! Every knob a caller can legitimately want to flip lives on one `Config`
//! value, rather than scattered through constructor arguments, so a host
//! gateway can build one template configuration and clone a
//! connection-specific copy from it per connection handled.

/// How a decoder should react when it encounters a `%` not followed by two
/// hex digits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InvalidPercentPolicy {
    /// Leave the `%` and following bytes untouched.
    Preserve,

    /// Drop the invalid escape entirely.
    Remove,

    /// Emit `?` (0x3F) in place of the escape and consume up to two invalid
    /// digits.
    ProcessInvalid
}

/// What to do when a raw or percent-decoded NUL byte is found in a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NulBytePolicy {
    /// Leave the NUL byte in the output.
    LeaveInPlace,

    /// Truncate the path at the first NUL byte.
    Terminate,

    /// Leave the byte in place but demand a status response.
    DemandStatus
}

/// What to do when a C0 control character (other than an accepted
/// terminator) is found in a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCharPolicy {
    /// Leave the path unchanged.
    Ignore,

    /// Leave the path unchanged but demand a status response.
    DemandStatus
}

/// How backslash characters in a URL path should be treated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeparatorPolicy {
    /// Leave backslashes alone.
    Preserve,

    /// Treat `\` the same as `/`.
    TreatAsSlash
}

/// How repeated path separators should be handled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DuplicateSeparatorPolicy {
    /// Keep every separator.
    Preserve,

    /// Collapse runs of separators into one.
    Compress
}

/// How malformed/overlong UTF-8 in a decoded path should be handled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Utf8Policy {
    /// Do not attempt UTF-8 aware decoding at all.
    Disabled,

    /// Decode valid UTF-8 sequences; pass invalid bytes through unchanged.
    BestEffort,

    /// Reject input containing invalid or overlong UTF-8 sequences.
    Strict
}

/// File-extraction behavior for multipart file parts.
#[derive(Clone, Debug)]
pub struct MultipartFileConfig {
    /// Extract file parts to disk rather than buffering them in memory.
    pub enabled: bool,

    /// Maximum number of bytes to write per extracted file; exceeding this
    /// aborts extraction for that part (it does not abort the parse).
    pub size_limit: u64,

    /// Directory extracted files are written under.
    pub directory: String,

    /// Maximum number of files a single body may extract to disk; once
    /// reached, later file parts are buffered like any other part instead.
    pub limit_count: usize
}

impl Default for MultipartFileConfig {
    fn default() -> MultipartFileConfig {
        MultipartFileConfig{
            enabled:     false,
            size_limit:  10 * 1024 * 1024,
            directory:   std::env::temp_dir().to_string_lossy().into_owned(),
            limit_count: 64
        }
    }
}

/// Complete parser configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Accept and decode `%uHHHH` (IIS-style) escapes in path/query data.
    pub decode_u_encoding: bool,

    /// How to react to a malformed `%` escape.
    pub invalid_percent_policy: InvalidPercentPolicy,

    /// The status (0, 400, or 404) recorded when an invalid escape is
    /// encountered, regardless of `invalid_percent_policy`.
    pub invalid_encoding_status: u16,

    /// The status (0, 400, or 404) recorded whenever a `%u` escape decodes
    /// successfully.
    pub u_encoding_status: u16,

    /// Apply the best-fit single-byte mapping table to decoded bytes above
    /// 0x7f (IIS/Apache compatibility mode), instead of passing them through.
    pub best_fit_decoding: bool,

    /// How backslashes in a path are treated.
    pub separator_policy: SeparatorPolicy,

    /// How consecutive path separators are treated.
    pub duplicate_separator_policy: DuplicateSeparatorPolicy,

    /// How a decoded path's UTF-8 validity is handled.
    pub utf8_policy: Utf8Policy,

    /// Normalize fullwidth Unicode forms (U+FF00-FFEF) to their ASCII
    /// equivalents before further decoding.
    pub normalize_fullwidth: bool,

    /// What to do with a raw NUL byte found in a path.
    pub raw_nul_policy: NulBytePolicy,

    /// What to do with a NUL byte produced by percent/`%u` decoding.
    pub encoded_nul_policy: NulBytePolicy,

    /// The status (0, 400, or 404) recorded when a NUL policy demands one.
    pub nul_status: u16,

    /// What to do with other C0 control characters found in a path.
    pub control_char_policy: ControlCharPolicy,

    /// The status (0, 400, or 404) recorded when the control character
    /// policy demands one.
    pub control_char_status: u16,

    /// Lower-case decoded path segments for comparison purposes.
    pub case_fold_path: bool,

    /// Require the `Host` header (or authority-form request target) to be a
    /// syntactically valid hostname or IP literal.
    pub strict_host_validation: bool,

    /// Attempt to transparently inflate `gzip`/`deflate` response bodies
    /// before running body callbacks.
    pub decompress_responses: bool,

    /// The hard ceiling on a single buffered header or request/status line.
    pub field_limit: usize,

    /// Multipart file-extraction behavior.
    pub multipart_file: MultipartFileConfig
}

impl Config {
    /// Creates a configuration with conservative, widely-compatible
    /// defaults.
    pub fn new() -> Config {
        Config{
            decode_u_encoding:         false,
            invalid_percent_policy:    InvalidPercentPolicy::Preserve,
            invalid_encoding_status:   0,
            u_encoding_status:         0,
            best_fit_decoding:         false,
            separator_policy:          SeparatorPolicy::Preserve,
            duplicate_separator_policy: DuplicateSeparatorPolicy::Preserve,
            utf8_policy:               Utf8Policy::BestEffort,
            normalize_fullwidth:       false,
            raw_nul_policy:            NulBytePolicy::LeaveInPlace,
            encoded_nul_policy:        NulBytePolicy::LeaveInPlace,
            nul_status:                0,
            control_char_policy:       ControlCharPolicy::Ignore,
            control_char_status:       0,
            case_fold_path:            false,
            strict_host_validation:    false,
            decompress_responses:      true,
            field_limit:               18 * 1024,
            multipart_file:            MultipartFileConfig::default()
        }
    }

    /// A configuration matching common IIS deployments: `%u` escapes,
    /// best-fit mapping, backslash-as-separator and fullwidth normalization
    /// are all enabled, mirroring the attack surface these decoders exist
    /// to close.
    pub fn iis_compatible() -> Config {
        let mut config = Config::new();

        config.decode_u_encoding          = true;
        config.best_fit_decoding          = true;
        config.separator_policy           = SeparatorPolicy::TreatAsSlash;
        config.duplicate_separator_policy = DuplicateSeparatorPolicy::Compress;
        config.normalize_fullwidth        = true;

        config
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let config = Config::new();

        assert!(!config.decode_u_encoding);
        assert!(!config.best_fit_decoding);
        assert_eq!(config.separator_policy, SeparatorPolicy::Preserve);
    }

    #[test]
    fn iis_compatible_enables_decoding_extensions() {
        let config = Config::iis_compatible();

        assert!(config.decode_u_encoding);
        assert!(config.best_fit_decoding);
        assert_eq!(config.separator_policy, SeparatorPolicy::TreatAsSlash);
        assert_eq!(config.duplicate_separator_policy, DuplicateSeparatorPolicy::Compress);
    }

    #[test]
    fn clone_is_independent() {
        let mut a = Config::new();
        let b = a.clone();

        a.decode_u_encoding = true;

        assert!(!b.decode_u_encoding);
    }
}
