//! HTTP cache validation module
//!
//! Provides `Last-Modified` dates and conditional request handling.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a file timestamp as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date header value, `None` if malformed
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Check if the client's `If-Modified-Since` covers the file's modification time
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no `ETag`
/// is ever sent, its presence always disables the check. Sub-second precision
/// is dropped because HTTP dates carry whole seconds.
///
/// # Returns
/// Returns true if the copy is still valid (should return 304), false otherwise
pub fn check_not_modified(
    if_modified_since: Option<&str>,
    if_none_match: Option<&str>,
    modified: SystemTime,
) -> bool {
    if if_none_match.is_some() {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(format_http_date(at(784_111_777)), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_check_not_modified() {
        let header = format_http_date(at(1_000_000));
        assert!(check_not_modified(Some(&header), None, at(1_000_000)));
        assert!(check_not_modified(Some(&header), None, at(999_000)));
        assert!(!check_not_modified(Some(&header), None, at(1_000_001)));
    }

    #[test]
    fn test_sub_second_mtime_is_truncated() {
        let header = format_http_date(at(1_000_000));
        let modified = at(1_000_000) + Duration::from_millis(750);
        assert!(check_not_modified(Some(&header), None, modified));
    }

    #[test]
    fn test_check_skipped() {
        let header = format_http_date(at(1_000_000));
        assert!(!check_not_modified(None, None, at(1)));
        assert!(!check_not_modified(Some("garbage"), None, at(1)));
        assert!(!check_not_modified(Some(&header), Some("\"abc\""), at(1)));
    }
}
