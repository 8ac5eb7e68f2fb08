// tests/property/url_property_test.rs

//! Property-based tests for URL fragment normalization

use davgate::core::Manager;
use davgate::core::url::{WEBDAV_SUFFIX, mount_fragment, normalize_url_fragment};
use proptest::prelude::*;

fn arb_fragment() -> impl Strategy<Value = String> {
    "/?([a-z0-9_-]{1,8}(/[a-z0-9_-]{1,8}){0,3})?/?"
}

proptest! {
    #[test]
    fn test_normalize_shape(url in arb_fragment()) {
        let normalized = normalize_url_fragment(&url);
        prop_assert!(normalized.starts_with('/'));
        prop_assert!(normalized == "/" || !normalized.ends_with('/'));
        prop_assert!(!normalized.starts_with("//"));
    }

    #[test]
    fn test_normalize_is_idempotent(url in arb_fragment()) {
        let once = normalize_url_fragment(&url);
        prop_assert_eq!(normalize_url_fragment(&once), once);
    }

    #[test]
    fn test_slash_variants_normalize_alike(body in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,3}") {
        let expected = normalize_url_fragment(&body);
        for variant in [format!("/{body}"), format!("{body}/"), format!("/{body}/")] {
            prop_assert_eq!(normalize_url_fragment(&variant), expected.clone());
        }
    }

    #[test]
    fn test_webdav_url_composition(prefix in arb_fragment(), base in arb_fragment()) {
        let mut manager = Manager::new(".");
        manager.set_prefix_url(&prefix);
        manager.set_base_url(&base);

        let expected = format!("{}{}{}", mount_fragment(&prefix), mount_fragment(&base), WEBDAV_SUFFIX);
        prop_assert_eq!(manager.webdav_url(), expected);
        prop_assert!(!manager.webdav_url().contains("//"));
    }
}
