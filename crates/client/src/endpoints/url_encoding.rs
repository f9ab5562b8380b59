//! URL encoding utilities for constructing safe API paths.
//!
//! Dashboard ids, metric keys, SLO ids and problem ids are interpolated into
//! request paths. Without percent-encoding, a stored id such as `a/b` or `x?y`
//! would change the path or add a query parameter.
//!
//! # Example
//!
//! ```
//! use dynatrace_client::endpoints::url_encoding::encode_path_segment;
//!
//! assert_eq!(encode_path_segment("builtin:service.response.time"), "builtin:service.response.time");
//! assert_eq!(encode_path_segment("a/b"), "a%2Fb");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Characters that must be percent-encoded in URL path segments.
///
/// Colons and dots stay readable since metric keys are made of them.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'#')
    .add(b'+')
    .add(b',')
    .add(b';')
    .add(b'[')
    .add(b']');

/// Percent-encode a string for safe use as a URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}
