use serde::{Deserialize, Serialize};

/// One (origin, description) entry attached to an ingress rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginGrant {
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A stateful-backend ingress rule: protocol, port range, and its grants.
///
/// `from_port`/`to_port` of `None` mean "any port". A single origin may
/// appear in several rules with different protocol/port combinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<u16>,
    pub grants: Vec<OriginGrant>,
}

impl IngressRule {
    /// Exact normalized-CIDR match against any grant on this rule.
    ///
    /// Equality is textual: differently written but numerically equivalent
    /// CIDRs are distinct origins.
    pub fn matches_origin(&self, cidr: &str) -> bool {
        self.grants.iter().any(|grant| grant.cidr == cidr)
    }

    /// Port range label for terminal output, `all` when unbounded.
    pub fn port_label(&self) -> String {
        match (self.from_port, self.to_port) {
            (Some(from), Some(to)) => format!("{from}-{to}"),
            (Some(from), None) => format!("{from}-"),
            (None, Some(to)) => format!("-{to}"),
            (None, None) => "all".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(protocol: &str, port: u16, cidrs: &[&str]) -> IngressRule {
        IngressRule {
            protocol: protocol.to_string(),
            from_port: Some(port),
            to_port: Some(port),
            grants: cidrs
                .iter()
                .map(|cidr| OriginGrant {
                    cidr: cidr.to_string(),
                    description: None,
                })
                .collect(),
        }
    }

    #[test]
    fn matches_origin_is_string_exact() {
        let r = rule("tcp", 22, &["203.0.113.5/32", "10.0.0.0/8"]);
        assert!(r.matches_origin("203.0.113.5/32"));
        assert!(r.matches_origin("10.0.0.0/8"));
        // numerically equal but textually different
        assert!(!r.matches_origin("010.0.0.0/8"));
        assert!(!r.matches_origin("203.0.113.5"));
    }

    #[test]
    fn port_label_handles_unbounded_ranges() {
        assert_eq!(rule("tcp", 22, &[]).port_label(), "22-22");
        let any = IngressRule {
            protocol: "-1".to_string(),
            from_port: None,
            to_port: None,
            grants: vec![],
        };
        assert_eq!(any.port_label(), "all");
    }
}
