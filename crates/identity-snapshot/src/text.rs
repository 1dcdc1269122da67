//! Text safety checks shared by snapshot validation.
//!
//! "Safe" text is fully printable: it contains no control characters,
//! including tabs and carriage returns. Plain spaces are allowed.

use url::Url;

/// Return true if `s` contains no control characters.
pub fn is_safe(s: &str) -> bool {
    !s.chars().any(char::is_control)
}

/// Return true if `s` contains no embedded line break.
pub fn is_single_line(s: &str) -> bool {
    !s.contains('\n')
}

/// Return true if `s` parses as an absolute URL with a host.
///
/// Relative references and host-less schemes (`mailto:`, `data:`)
/// are rejected.
pub fn is_valid_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}
