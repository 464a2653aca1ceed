//! Page loading, search and stale-response handling.

mod common;

use std::time::Duration;

use common::{TestContext, reqres_first_page, user_json};
use roster_business::{ListStatus, RefreshOutcome};

#[tokio::test]
async fn test_window_matches_server_page() {
    let ctx = TestContext::signed_in("token").await;
    ctx.mock_users_page(
        2,
        6,
        12,
        vec![user_json(7, "Michael", "Lawson"), user_json(8, "Lindsay", "Ferguson")],
        None,
    )
    .await;

    let outcome = ctx.console.list().set_window(2, 6).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Applied);

    let window = ctx.console.list().window().unwrap();
    assert_eq!(window.page, 2);
    assert_eq!(window.page_size, 6);
    assert_eq!(window.total_count, 12);
    assert_eq!(window.total_pages, 2);
    assert!(window.items.len() <= 6);
    assert!(window.has_previous());
    assert!(!window.has_next());
    assert_eq!(
        window.summary().to_string(),
        "Showing 7 to 12 of 12 users"
    );
}

#[tokio::test]
async fn test_same_window_twice_fetches_once() {
    let ctx = TestContext::signed_in("token").await;
    ctx.mock_users_page(1, 10, 6, reqres_first_page(), None).await;

    assert_eq!(
        ctx.console.list().set_window(1, 10).await.unwrap(),
        RefreshOutcome::Applied
    );
    assert_eq!(
        ctx.console.list().set_window(1, 10).await.unwrap(),
        RefreshOutcome::Unchanged
    );
    assert_eq!(ctx.requests_with_method("GET").await.len(), 1);
}

#[tokio::test]
async fn test_search_persists_across_pages() {
    let ctx = TestContext::signed_in("token").await;
    ctx.mock_users_page(1, 6, 12, reqres_first_page(), None).await;
    ctx.mock_users_page(
        2,
        6,
        12,
        vec![
            user_json(7, "Michael", "Lawson"),
            user_json(8, "Lindsay", "Ferguson"),
            user_json(9, "Tobias", "Funke"),
        ],
        None,
    )
    .await;

    let list = ctx.console.list();
    list.set_window(1, 6).await.unwrap();
    list.set_search("WONG");
    let visible = list.visible_users();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, 3);

    list.set_search("ferg");
    list.next_page().await.unwrap();
    assert_eq!(list.page(), 2);
    assert_eq!(list.search(), "ferg");
    let ids: Vec<u64> = list.visible_users().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![8]);

    // searching never hits the network
    assert_eq!(ctx.requests_with_method("GET").await.len(), 2);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_window() {
    let ctx = TestContext::signed_in("token").await;
    ctx.load_first_page(reqres_first_page()).await;
    ctx.mock_users_error(2, 500).await;
    ctx.console.notices().drain();

    let err = ctx.console.list().set_page(2).await.unwrap_err();
    assert_eq!(err.message(), "API returned status: 500");

    let list = ctx.console.list();
    assert_eq!(
        list.status(),
        ListStatus::Failed("API returned status: 500".to_owned())
    );
    let window = list.window().expect("previous window kept");
    assert_eq!(window.page, 1);
    assert_eq!(window.items.len(), 6);

    let notices = ctx.console.notices().drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Failed to fetch users");
    // failure never signs the user out
    assert!(ctx.console.is_authenticated());
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let ctx = TestContext::signed_in("token").await;
    ctx.mock_users_page_delayed(
        2,
        10,
        30,
        vec![user_json(11, "Slow", "Page")],
        None,
        Duration::from_millis(400),
    )
    .await;
    ctx.mock_users_page(3, 10, 30, vec![user_json(21, "Fast", "Page")], None)
        .await;

    let list = ctx.console.list();
    let slow = list.set_page(2);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        list.set_page(3).await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow.unwrap(), RefreshOutcome::Superseded);
    assert_eq!(fast.unwrap(), RefreshOutcome::Applied);

    let window = list.window().unwrap();
    assert_eq!(window.page, 3);
    assert_eq!(window.items[0].id, 21);
    assert_eq!(list.status(), ListStatus::Loaded);
}

#[tokio::test]
async fn test_previous_page_stops_at_first() {
    let ctx = TestContext::signed_in("token").await;
    ctx.load_first_page(reqres_first_page()).await;

    assert_eq!(
        ctx.console.list().previous_page().await.unwrap(),
        RefreshOutcome::Unchanged
    );
    // a single page has no next page either
    assert_eq!(
        ctx.console.list().next_page().await.unwrap(),
        RefreshOutcome::Unchanged
    );
}

#[tokio::test]
async fn test_empty_directory_is_loaded_not_failed() {
    let ctx = TestContext::signed_in("token").await;
    ctx.mock_users_page(1, 10, 0, Vec::new(), None).await;
    ctx.console.notices().drain();

    let outcome = ctx.console.list().set_window(1, 10).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Applied);

    let list = ctx.console.list();
    assert_eq!(list.status(), ListStatus::Loaded);
    let window = list.window().unwrap();
    assert_eq!(window.total_count, 0);
    assert!(window.items.is_empty());
    assert!(!window.has_next());
    assert_eq!(window.summary().to_string(), "Showing 0 to 0 of 0 users");
    assert!(list.visible_users().is_empty());
    assert!(ctx.console.notices().drain().is_empty());
}

#[tokio::test]
async fn test_page_past_the_end_is_shown_as_returned() {
    let ctx = TestContext::signed_in("token").await;
    ctx.mock_users_page(5, 6, 12, Vec::new(), None).await;

    let outcome = ctx.console.list().set_window(5, 6).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Applied);

    let list = ctx.console.list();
    assert_eq!(list.status(), ListStatus::Loaded);
    let window = list.window().unwrap();
    assert_eq!(window.page, 5);
    assert_eq!(window.total_count, 12);
    assert!(window.items.is_empty());
    assert!(window.has_previous());
    assert!(!window.has_next());
    assert_eq!(window.summary().to_string(), "Showing 0 to 0 of 12 users");
}
