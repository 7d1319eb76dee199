//! HTTP Range request parsing
//!
//! Single-range `bytes=` parsing for the static responder, per RFC 7233.

/// Parsed Range request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    /// Start byte position
    pub start: usize,
    /// End byte position, `None` means until end of file
    pub end: Option<usize>,
}

impl RangeRequest {
    /// Actual end position for the given file size
    #[inline]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }
}

/// Range header parse result
#[derive(Debug)]
pub enum RangeParseResult {
    /// Valid single range
    Valid(RangeRequest),
    /// Start beyond the file, answered with 416
    NotSatisfiable,
    /// No Range header, non-bytes unit, multi-range, or malformed:
    /// serve the full body
    None,
}

/// Parse a Range header against the file size.
///
/// Handles `bytes=start-end`, `bytes=start-` (open-ended), and
/// `bytes=-suffix` (last N bytes). Multi-range requests are not supported
/// and fall back to the full body.
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };

    if spec.contains(',') {
        return RangeParseResult::None;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix form: "-500" means the last 500 bytes
    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeParseResult::None;
        };
        if suffix == 0 || file_size == 0 {
            return RangeParseResult::NotSatisfiable;
        }
        return RangeParseResult::Valid(RangeRequest {
            start: file_size.saturating_sub(suffix),
            end: Some(file_size - 1),
        });
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeParseResult::None;
    };
    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None // open-ended
    } else {
        match end_str.parse::<usize>() {
            Ok(e) if e >= start => Some(e.min(file_size - 1)),
            Ok(_) => return RangeParseResult::NotSatisfiable,
            Err(_) => return RangeParseResult::None,
        }
    };

    RangeParseResult::Valid(RangeRequest { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_length(range: &RangeRequest, file_size: usize) -> usize {
        range.end_position(file_size).saturating_sub(range.start) + 1
    }

    #[test]
    fn no_header() {
        assert!(matches!(
            parse_range_header(None, 100),
            RangeParseResult::None
        ));
    }

    #[test]
    fn standard_range() {
        match parse_range_header(Some("bytes=0-9"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(9));
                assert_eq!(content_length(&r, 100), 10);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn open_ended_range() {
        match parse_range_header(Some("bytes=50-"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 50);
                assert_eq!(r.end, None);
                assert_eq!(r.end_position(100), 99);
                assert_eq!(content_length(&r, 100), 50);
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn suffix_range() {
        match parse_range_header(Some("bytes=-20"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 80);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn oversized_suffix_is_whole_file() {
        match parse_range_header(Some("bytes=-500"), 100) {
            RangeParseResult::Valid(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("Expected Valid"),
        }
    }

    #[test]
    fn start_beyond_file_is_not_satisfiable() {
        assert!(matches!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeParseResult::NotSatisfiable
        ));
    }

    #[test]
    fn inverted_range_is_not_satisfiable() {
        assert!(matches!(
            parse_range_header(Some("bytes=9-3"), 100),
            RangeParseResult::NotSatisfiable
        ));
    }

    #[test]
    fn empty_file_suffix_is_not_satisfiable() {
        assert!(matches!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeParseResult::NotSatisfiable
        ));
    }

    #[test]
    fn malformed_is_ignored() {
        assert!(matches!(
            parse_range_header(Some("bytes=a-b"), 100),
            RangeParseResult::None
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeParseResult::None
        ));
        assert!(matches!(
            parse_range_header(Some("items=0-9"), 100),
            RangeParseResult::None
        ));
    }
}
