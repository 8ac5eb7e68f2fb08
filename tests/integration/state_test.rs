// tests/integration/state_test.rs

//! Tests for the lock-guarded shared gateway state.

use super::test_helpers::TestContext;
use davgate::core::acl::parsed_rules::Rule;
use davgate::core::handler::{DavMethod, DavRequest, DispatchOutcome};
use davgate::core::state::GateState;
use std::sync::Arc;

#[tokio::test]
async fn test_reconfigure_is_visible_to_later_requests() {
    let ctx = TestContext::new();
    ctx.seed("/report.txt", "numbers");
    let state = GateState::new(ctx.manager);

    let request = DavRequest::new(DavMethod::Get, "/report.txt");
    assert!(matches!(
        state.dispatch(&request).await.unwrap(),
        DispatchOutcome::Allowed(_)
    ));

    state
        .reconfigure(|manager| manager.add_rule("", Rule::prefix("/report", false)))
        .await
        .unwrap();

    assert_eq!(
        state.dispatch(&request).await.unwrap(),
        DispatchOutcome::Forbidden
    );
}

#[tokio::test]
async fn test_concurrent_dispatch_from_many_tasks() {
    let ctx = TestContext::new();
    for i in 0..8 {
        ctx.seed(&format!("/f{i}.txt"), "x");
    }
    let dir = ctx.dir;
    let state = GateState::new(ctx.manager);

    let mut handles = Vec::new();
    for i in 0..8 {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move {
            let request = DavRequest::new(DavMethod::Get, format!("/f{i}.txt"));
            state.dispatch(&request).await
        }));
    }
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert!(matches!(outcome, DispatchOutcome::Allowed(_)));
    }
    drop(dir);
}

#[tokio::test]
async fn test_reconfigure_urls() {
    let ctx = TestContext::new();
    let state = GateState::new(ctx.manager);

    state
        .reconfigure(|manager| {
            manager.set_prefix_url("/files");
            manager.set_base_url("dav");
        })
        .await;

    assert_eq!(state.webdav_url().await, "/files/dav/api/webdav");
    assert_eq!(state.read().await.root_url(), "/files/dav");
}
