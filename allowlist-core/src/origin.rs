use ipnet::IpNet;
use thiserror::Error;

/// Raised when one or more origin tokens fail CIDR validation.
///
/// Carries every offending token from a run, not just the first, so the
/// operator can fix the whole input in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid origin tokens: {}", .tokens.join(", "))]
pub struct OriginError {
    pub tokens: Vec<String>,
}

/// Split a raw origin string into normalized CIDR tokens.
///
/// Commas and whitespace are both accepted as delimiters and may be mixed.
/// Tokens are trimmed, empty tokens dropped, and a bare address is widened
/// to a host route (`/32`, or `/128` for IPv6). Input order is preserved and
/// duplicates are kept; downstream steps must tolerate reprocessing them.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.replace(',', " ")
        .split_whitespace()
        .map(normalize_origin)
        .collect()
}

/// Normalize one token to carry an explicit prefix length.
///
/// Tokens already containing `/` pass through unchanged; comparison is
/// string-exact afterwards, so no further canonicalization is applied.
pub fn normalize_origin(token: &str) -> String {
    if token.contains('/') {
        token.to_string()
    } else if token.contains(':') {
        format!("{token}/128")
    } else {
        format!("{token}/32")
    }
}

/// Accept a token iff it parses as `<ip>/<prefix>` with an in-range prefix.
///
/// Permissive about host bits: `203.0.113.5/24` is accepted even though the
/// address is not the network base.
pub fn validate_cidr(token: &str) -> bool {
    token.parse::<IpNet>().is_ok()
}

/// Validate both origin lists up front, collecting every invalid token.
///
/// Fails closed: any invalid token in either list aborts the run before a
/// backend is contacted.
pub fn validate_origin_lists(retiring: &[String], incoming: &[String]) -> Result<(), OriginError> {
    let tokens: Vec<String> = retiring
        .iter()
        .chain(incoming.iter())
        .filter(|token| !validate_cidr(token))
        .cloned()
        .collect();
    if tokens.is_empty() {
        Ok(())
    } else {
        Err(OriginError { tokens })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_splits_on_commas_and_whitespace_mixed() {
        let parsed = parse_origin_list("1.2.3.4, 5.6.7.8\t9.10.11.12,13.14.15.16");
        assert_eq!(
            parsed,
            vec![
                "1.2.3.4/32",
                "5.6.7.8/32",
                "9.10.11.12/32",
                "13.14.15.16/32"
            ]
        );
    }

    #[test]
    fn parse_matches_uniform_delimiter_split() {
        let mixed = parse_origin_list("1.1.1.1, 2.2.2.2 3.3.3.3");
        let commas = parse_origin_list("1.1.1.1,2.2.2.2,3.3.3.3");
        let spaces = parse_origin_list("1.1.1.1 2.2.2.2 3.3.3.3");
        assert_eq!(mixed, commas);
        assert_eq!(mixed, spaces);
    }

    #[test]
    fn parse_drops_empty_tokens_and_keeps_order_and_duplicates() {
        let parsed = parse_origin_list(" ,, 9.9.9.9 , 9.9.9.9,  ");
        assert_eq!(parsed, vec!["9.9.9.9/32", "9.9.9.9/32"]);
        assert_eq!(parse_origin_list(""), Vec::<String>::new());
    }

    #[test]
    fn normalize_appends_host_prefix_to_bare_addresses() {
        assert_eq!(normalize_origin("203.0.113.5"), "203.0.113.5/32");
        assert_eq!(normalize_origin("2001:db8::1"), "2001:db8::1/128");
    }

    #[test]
    fn normalize_is_identity_for_prefixed_tokens() {
        assert_eq!(normalize_origin("10.0.0.0/8"), "10.0.0.0/8");
        assert_eq!(normalize_origin("2001:db8::/64"), "2001:db8::/64");
    }

    #[test]
    fn validate_accepts_non_network_aligned_addresses() {
        assert!(validate_cidr("203.0.113.5/24"));
        assert!(validate_cidr("203.0.113.5/32"));
        assert!(validate_cidr("2001:db8::1/64"));
    }

    #[test]
    fn validate_rejects_malformed_tokens() {
        assert!(!validate_cidr("203.0.113.5"));
        assert!(!validate_cidr("203.0.113.5/33"));
        assert!(!validate_cidr("not-an-ip/32"));
        assert!(!validate_cidr("203.0.113/32"));
        assert!(!validate_cidr(""));
    }

    #[test]
    fn list_validation_reports_all_invalid_tokens_at_once() {
        let retiring = vec!["1.2.3.4/32".to_string(), "bogus/32".to_string()];
        let incoming = vec!["5.6.7.8/99".to_string()];
        let err = validate_origin_lists(&retiring, &incoming).unwrap_err();
        assert_eq!(err.tokens, vec!["bogus/32", "5.6.7.8/99"]);
        assert!(err.to_string().contains("bogus/32"));
        assert!(err.to_string().contains("5.6.7.8/99"));
    }
}
