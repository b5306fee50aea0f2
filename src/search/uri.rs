/// Canonical `lbry://` URIs for search results
pub const PROTOCOL: &str = "lbry://";

/// Characters that may not appear in a claim or channel name
const INVALID_NAME_CHARS: &[char] = &[
    '=', '&', '#', ':', '$', '@', '%', '?', ';', '/', '\\', '"', '<', '>', '{', '}', '|', '^',
    '~', '[', ']', '`',
];

const MAX_CLAIM_ID_LEN: usize = 40;

fn is_name_valid(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || INVALID_NAME_CHARS.contains(&c))
}

fn is_claim_id_valid(claim_id: &str) -> bool {
    !claim_id.is_empty()
        && claim_id.len() <= MAX_CLAIM_ID_LEN
        && claim_id.chars().all(|c| c.is_ascii_hexdigit())
}

/// Build a URI from a search hit name: `@name` is a channel, anything else
/// a stream
pub fn build_uri(name: &str, claim_id: &str) -> String {
    format!("{}{}#{}", PROTOCOL, name, claim_id)
}

/// Check a `lbry://name#claimid` or `lbry://@channel#claimid` URI
pub fn is_uri_valid(uri: &str) -> bool {
    let Some(rest) = uri.strip_prefix(PROTOCOL) else {
        return false;
    };
    let (name, claim_id) = match rest.split_once('#') {
        Some((name, id)) => (name, Some(id)),
        None => (rest, None),
    };
    let name = name.strip_prefix('@').unwrap_or(name);

    is_name_valid(name) && claim_id.map(is_claim_id_valid).unwrap_or(true)
}

/// Endpoint with exactly one trailing slash
pub fn normalize_search_endpoint(endpoint: &str) -> String {
    format!("{}/", endpoint.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_validate() {
        let channel = build_uri("@creator", "abc123");
        assert_eq!(channel, "lbry://@creator#abc123");
        assert!(is_uri_valid(&channel));

        let stream = build_uri("my-video", "0f");
        assert_eq!(stream, "lbry://my-video#0f");
        assert!(is_uri_valid(&stream));
    }

    #[test]
    fn test_invalid_uris() {
        assert!(!is_uri_valid("lbry://bad name#abc"));
        assert!(!is_uri_valid("lbry://name#not-hex"));
        assert!(!is_uri_valid("lbry://#abc"));
        assert!(!is_uri_valid("https://name#abc"));
        assert!(!is_uri_valid("lbry://@#abc"));
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        assert_eq!(normalize_search_endpoint("https://s.io/search"), "https://s.io/search/");
        assert_eq!(normalize_search_endpoint("https://s.io/search///"), "https://s.io/search/");
    }
}
