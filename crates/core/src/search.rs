//! Search term handling and list clamping helpers.

/// Default result limit for scoped search endpoints.
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;
/// Maximum result limit a caller may request.
pub const MAX_SEARCH_LIMIT: i64 = 100;
/// Minimum query length for typeahead suggestions.
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;

/// Build an `ILIKE` pattern from a raw query, escaping the SQL wildcard
/// characters so user input matches literally.
///
/// Returns `None` for blank queries.
pub fn like_pattern(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    let escaped = trimmed
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

/// Clamp a caller-supplied limit into `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_and_trims() {
        assert_eq!(like_pattern("  cricket  "), Some("%cricket%".to_string()));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), Some("%50\\%\\_off%".to_string()));
    }

    #[test]
    fn test_like_pattern_rejects_blank() {
        assert_eq!(like_pattern("   "), None);
        assert_eq!(like_pattern(""), None);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 10, 100), 10);
        assert_eq!(clamp_limit(Some(50), 10, 100), 50);
        assert_eq!(clamp_limit(Some(0), 10, 100), 1);
        assert_eq!(clamp_limit(Some(500), 10, 100), 100);
    }
}
