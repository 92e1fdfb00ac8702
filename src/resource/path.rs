//! Resource addressing
//!
//! Paths are relative to the versioned API root. Identifiers are opaque:
//! they are percent-encoded as single path segments and never validated.
//! The dot segments `.` and `..` are encoded too, so URL resolution cannot
//! collapse them.

/// Collection root for load balancers
pub const LOAD_BALANCERS: &str = "/load-balancers";

/// Nested collection name for forwarding rules
pub const FORWARDING_RULES: &str = "forwarding-rules";

/// `/load-balancers`
pub fn load_balancers() -> String {
    LOAD_BALANCERS.to_string()
}

/// `/load-balancers/{id}`
pub fn load_balancer(id: &str) -> String {
    format!("{}/{}", LOAD_BALANCERS, segment(id))
}

/// `/load-balancers/{id}/forwarding-rules`
pub fn forwarding_rules(id: &str) -> String {
    format!("{}/{}", load_balancer(id), FORWARDING_RULES)
}

/// `/load-balancers/{id}/forwarding-rules/{rule_id}`
pub fn forwarding_rule(id: &str, rule_id: &str) -> String {
    format!("{}/{}", forwarding_rules(id), segment(rule_id))
}

fn segment(id: &str) -> String {
    match id {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => urlencoding::encode(id).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path() {
        assert_eq!(load_balancers(), "/load-balancers");
    }

    #[test]
    fn test_single_resource_path() {
        assert_eq!(load_balancer("lb-123"), "/load-balancers/lb-123");
    }

    #[test]
    fn test_nested_paths() {
        assert_eq!(
            forwarding_rules("lb-123"),
            "/load-balancers/lb-123/forwarding-rules"
        );
        assert_eq!(
            forwarding_rule("lb-123", "r1"),
            "/load-balancers/lb-123/forwarding-rules/r1"
        );
    }

    #[test]
    fn test_identifiers_stay_single_segments() {
        assert_eq!(load_balancer("a/b"), "/load-balancers/a%2Fb");
        assert_eq!(load_balancer("lb 1"), "/load-balancers/lb%201");
        // Empty ids are passed through; the server decides what they mean
        assert_eq!(load_balancer(""), "/load-balancers/");
    }

    #[test]
    fn test_dot_segments_are_encoded() {
        assert_eq!(load_balancer("."), "/load-balancers/%2E");
        assert_eq!(load_balancer(".."), "/load-balancers/%2E%2E");
        assert_eq!(
            forwarding_rule("lb-1", ".."),
            "/load-balancers/lb-1/forwarding-rules/%2E%2E"
        );
        // Only whole dot segments are special
        assert_eq!(load_balancer("..."), "/load-balancers/...");
        assert_eq!(load_balancer("a.b"), "/load-balancers/a.b");
    }
}
