//! OAuth redirect parsing.
//!
//! The provider redirects to a URL carrying a `code` query parameter. The
//! terminal client receives that URL by paste (or `--auth-code`), so this
//! accepts a full URL, a bare query string, or the bare code itself.

/// Extract the OAuth `code` from pasted input. Returns `None` when no code
/// is present (including an empty `code=` value).
pub fn parse_auth_code(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None if input.contains('=') => input,
        // No query syntax at all: treat the whole paste as the code.
        None => return Some(input.to_string()),
    };

    for kv in query.split('&') {
        let mut it = kv.splitn(2, '=');
        let k = it.next().unwrap_or_default().trim();
        let v = it.next().unwrap_or_default();
        if k.eq_ignore_ascii_case("code") {
            let v = urlencoding::decode(v)
                .unwrap_or_else(|_| v.into())
                .to_string();
            if v.is_empty() {
                return None;
            }
            return Some(v);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_code_from_full_url() {
        assert_eq!(
            parse_auth_code("https://faucet.example.org/?code=abc123&state=s1"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn extracts_code_from_bare_query() {
        assert_eq!(
            parse_auth_code("state=s1&code=xyz"),
            Some("xyz".to_string())
        );
    }

    #[test]
    fn bare_input_is_the_code() {
        assert_eq!(parse_auth_code("  abc123 "), Some("abc123".to_string()));
    }

    #[test]
    fn missing_or_empty_code_is_none() {
        assert_eq!(parse_auth_code(""), None);
        assert_eq!(parse_auth_code("https://x.example/?state=s1"), None);
        assert_eq!(parse_auth_code("https://x.example/?code="), None);
    }

    #[test]
    fn decodes_percent_encoding() {
        assert_eq!(
            parse_auth_code("code=a%2Fb"),
            Some("a/b".to_string())
        );
    }
}
