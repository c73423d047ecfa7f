//! Basket tests: get-or-create caching, duplicate guard, reconciliation.

#![allow(clippy::unwrap_used)]

use hopeflow_client::{ApiError, HopeFlow};
use hopeflow_integration_tests::TestContext;

async fn logged_in(ctx: &TestContext) -> &HopeFlow {
    ctx.state.seed_user("donor@example.com", "hunter2", "Donor");
    ctx.hopeflow
        .session()
        .login("donor@example.com", "hunter2")
        .await
        .unwrap();
    &ctx.hopeflow
}

#[tokio::test]
async fn test_get_or_create_hits_server_once() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;

    let first = client.baskets().get_or_create().await.unwrap();
    let second = client.baskets().get_or_create().await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(
        ctx.state.get_or_create_calls(),
        1,
        "second call must be served from cache"
    );

    // An explicit clear forces the next call back to the server
    client.baskets().clear();
    let third = client.baskets().get_or_create().await.unwrap();
    assert_eq!(third.id, first.id);
    assert_eq!(ctx.state.get_or_create_calls(), 2);
}

#[tokio::test]
async fn test_get_or_create_requires_login() {
    let ctx = TestContext::new().await;

    let err = ctx.hopeflow.baskets().get_or_create().await.unwrap_err();
    assert!(matches!(err, ApiError::NotLoggedIn));
}

#[tokio::test]
async fn test_add_item_returns_refreshed_lines() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;
    let seller = ctx.state.seed_user("seller@example.com", "pw", "Seller");
    let listing = ctx.state.seed_listing(seller.id, "Winter coat", 2500);

    let lines = client.baskets().add_item(listing.id).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].item.listing_id, listing.id);
    assert_eq!(lines[0].listing.title, "Winter coat");
    assert!(client.baskets().contains(listing.id));
}

#[tokio::test]
async fn test_add_item_rejects_duplicate_locally() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;
    let seller = ctx.state.seed_user("seller@example.com", "pw", "Seller");
    let listing = ctx.state.seed_listing(seller.id, "Lamp", 500);

    client.baskets().add_item(listing.id).await.unwrap();
    let err = client.baskets().add_item(listing.id).await.unwrap_err();

    assert!(matches!(err, ApiError::DuplicateItem(id) if id == listing.id));

    // The duplicate never reached the server
    let basket = client.baskets().get_or_create().await.unwrap();
    assert_eq!(ctx.state.basket_item_count(basket.id), 1);
}

#[tokio::test]
async fn test_remove_item_drops_line_without_refetch() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;
    let seller = ctx.state.seed_user("seller@example.com", "pw", "Seller");
    let coat = ctx.state.seed_listing(seller.id, "Coat", 2500);
    let lamp = ctx.state.seed_listing(seller.id, "Lamp", 500);

    client.baskets().add_item(coat.id).await.unwrap();
    let lines = client.baskets().add_item(lamp.id).await.unwrap();
    let coat_item = lines
        .iter()
        .find(|line| line.item.listing_id == coat.id)
        .unwrap()
        .item
        .id;

    client.baskets().remove_item(coat_item).await.unwrap();

    let remaining = client.baskets().items();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].item.listing_id, lamp.id);
    assert!(!client.baskets().contains(coat.id));

    let basket = client.baskets().get_or_create().await.unwrap();
    assert_eq!(ctx.state.basket_item_count(basket.id), 1);
}

#[tokio::test]
async fn test_refresh_drops_lines_with_missing_listings() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;
    let seller = ctx.state.seed_user("seller@example.com", "pw", "Seller");
    let coat = ctx.state.seed_listing(seller.id, "Coat", 2500);
    let lamp = ctx.state.seed_listing(seller.id, "Lamp", 500);

    client.baskets().add_item(coat.id).await.unwrap();
    client.baskets().add_item(lamp.id).await.unwrap();

    // The lamp disappears server-side while still referenced by the basket
    ctx.state.remove_listing(lamp.id);

    let lines = client.baskets().refresh().await.unwrap();

    assert_eq!(lines.len(), 1, "unresolvable line must be dropped");
    assert_eq!(lines[0].item.listing_id, coat.id);
    assert!(!client.baskets().contains(lamp.id));

    // The server still holds both items; only the local view shrank
    let basket = client.baskets().get_or_create().await.unwrap();
    assert_eq!(ctx.state.basket_item_count(basket.id), 2);
}

#[tokio::test]
async fn test_logout_clears_basket_cache() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;
    let seller = ctx.state.seed_user("seller@example.com", "pw", "Seller");
    let listing = ctx.state.seed_listing(seller.id, "Coat", 2500);

    client.baskets().add_item(listing.id).await.unwrap();
    assert!(client.baskets().contains(listing.id));

    client.session().logout().unwrap();

    assert!(client.baskets().items().is_empty());
    assert!(!client.baskets().contains(listing.id));
}
