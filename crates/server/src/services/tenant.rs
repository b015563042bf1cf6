//! Hostname to store subdomain extraction.
//!
//! Each published store is addressable as `{subdomain}.{base_domain}`. The
//! extractor turns an incoming `Host` header into the store subdomain, or
//! `None` when the request targets the platform itself. Local development
//! hosts always yield `None`; the path-based `/store/{subdomain}` route is
//! the contract that works without wildcard DNS.

/// First labels that can never be a store on the platform's own domain.
const RESERVED_PLATFORM_LABELS: &[&str] = &["www", "shoplark"];

/// First labels that can never be a store on a custom domain.
const RESERVED_CUSTOM_LABELS: &[&str] = &["www", "api", "admin"];

/// Extract the store subdomain from a request hostname.
///
/// Returns `None` for loopback hosts, the bare base domain, reserved labels,
/// platform preview domains, and anything that does not look like a
/// subdomain.
#[must_use]
pub fn extract_subdomain(hostname: &str, base_domain: &str) -> Option<String> {
    let host = hostname.split(':').next().unwrap_or("").to_ascii_lowercase();

    if host.is_empty() || host == "localhost" || host == "127.0.0.1" || host == "[::1]" {
        return None;
    }
    // Preview deployments get platform-generated hostnames, never stores.
    if host.ends_with(".fly.dev") {
        return None;
    }
    if host == base_domain {
        return None;
    }

    if let Some(label) = host.strip_suffix(&format!(".{base_domain}")) {
        if label.is_empty() || label.contains('.') || RESERVED_PLATFORM_LABELS.contains(&label) {
            return None;
        }
        if is_valid_label(label) {
            return Some(label.to_owned());
        }
        return None;
    }

    // Custom domains: {sub}.{domain}.{tld} or deeper.
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 3 {
        let first = labels[0];
        if is_valid_label(first) && !RESERVED_CUSTOM_LABELS.contains(&first) {
            return Some(first.to_owned());
        }
    }

    None
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "shoplark.app";

    #[test]
    fn test_platform_subdomain() {
        assert_eq!(
            extract_subdomain("alpine.shoplark.app", BASE),
            Some("alpine".to_owned())
        );
        assert_eq!(
            extract_subdomain("my-store2.shoplark.app", BASE),
            Some("my-store2".to_owned())
        );
    }

    #[test]
    fn test_port_is_stripped() {
        assert_eq!(
            extract_subdomain("alpine.shoplark.app:4000", BASE),
            Some("alpine".to_owned())
        );
    }

    #[test]
    fn test_hostname_is_lowercased() {
        assert_eq!(
            extract_subdomain("Alpine.Shoplark.App", BASE),
            Some("alpine".to_owned())
        );
    }

    #[test]
    fn test_loopback_hosts() {
        assert_eq!(extract_subdomain("localhost", BASE), None);
        assert_eq!(extract_subdomain("localhost:3000", BASE), None);
        assert_eq!(extract_subdomain("127.0.0.1:4000", BASE), None);
    }

    #[test]
    fn test_bare_base_domain() {
        assert_eq!(extract_subdomain("shoplark.app", BASE), None);
    }

    #[test]
    fn test_reserved_platform_labels() {
        assert_eq!(extract_subdomain("www.shoplark.app", BASE), None);
        assert_eq!(extract_subdomain("shoplark.shoplark.app", BASE), None);
    }

    #[test]
    fn test_nested_label_rejected() {
        assert_eq!(extract_subdomain("a.b.shoplark.app", BASE), None);
    }

    #[test]
    fn test_preview_domains_excluded() {
        assert_eq!(extract_subdomain("shoplark-staging.fly.dev", BASE), None);
    }

    #[test]
    fn test_custom_domain_subdomain() {
        assert_eq!(
            extract_subdomain("alpine.example.com", BASE),
            Some("alpine".to_owned())
        );
    }

    #[test]
    fn test_custom_domain_reserved_labels() {
        assert_eq!(extract_subdomain("www.example.com", BASE), None);
        assert_eq!(extract_subdomain("api.example.com", BASE), None);
        assert_eq!(extract_subdomain("admin.example.com", BASE), None);
    }

    #[test]
    fn test_two_label_custom_domain_rejected() {
        assert_eq!(extract_subdomain("example.com", BASE), None);
    }

    #[test]
    fn test_invalid_label_characters() {
        assert_eq!(extract_subdomain("Bad_Label.example.com", BASE), None);
    }
}
