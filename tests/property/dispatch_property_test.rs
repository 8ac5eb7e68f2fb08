// tests/property/dispatch_property_test.rs

//! Property-based tests for request dispatch
//! Tests that denied requests never reach the filesystem

use crate::test_helpers::TestContext;
use davgate::core::acl::parsed_rules::Rule;
use davgate::core::handler::{DavMethod, DavRequest, DispatchOutcome};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32, // Each case touches a fresh temporary directory
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_denied_writes_never_touch_disk(
        denied in "/[a-z]{1,8}",
        names in prop::collection::vec("[a-z0-9]{1,8}", 1..=10),
        method_index in 0usize..4
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let mut ctx = TestContext::new();
            ctx.manager.add_rule("", Rule::prefix(denied.clone(), false)).unwrap();

            for name in &names {
                let path = format!("{denied}/{name}");
                let method = match method_index {
                    0 => DavMethod::Put,
                    1 => DavMethod::Mkcol,
                    2 => DavMethod::Delete,
                    _ => DavMethod::Copy { destination: "/elsewhere".to_string() },
                };
                let request = DavRequest::new(method, path).with_body("data");
                let outcome = ctx.dispatch(request).await.unwrap();
                assert_eq!(outcome, DispatchOutcome::Forbidden);
            }
            assert_eq!(ctx.fs_writes(), 0);
        });
    }

    #[test]
    fn test_written_files_read_back_for_allowed_paths(
        files in prop::collection::hash_map("[a-z]{1,8}", "[ -~]{0,64}", 1..=10)
    ) {
        tokio_test::block_on(async {
            let ctx = TestContext::new();
            for (name, contents) in &files {
                let request = DavRequest::new(DavMethod::Put, format!("/{name}"))
                    .with_body(contents.clone().into_bytes());
                assert!(!ctx.dispatch(request).await.unwrap().is_forbidden());
            }
            for (name, contents) in &files {
                assert_eq!(ctx.read_disk(name).as_deref(), Some(contents.as_str()));
            }
            assert_eq!(ctx.fs_writes(), files.len());
        });
    }
}
