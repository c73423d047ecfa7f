//! Listing tests: browsing, CRUD, the single-listing cache, and photos.

#![allow(clippy::unwrap_used)]

use hopeflow_client::{ApiError, HopeFlow, ListingDraft, ListingFilter};
use hopeflow_core::{CategoryId, CharityId, CurrencyCode, Price};
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

fn draft(title: &str, cents: i64) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: format!("{title} in good condition"),
        price: Price::from_minor_units(cents, CurrencyCode::USD),
        category_id: CategoryId::new(1),
        charity_id: CharityId::new(1),
    }
}

#[tokio::test]
async fn test_list_is_browsable_without_login() {
    let ctx = TestContext::new().await;
    let seller = ctx.state.seed_user("seller@example.com", "pw", "Seller");
    ctx.state.seed_listing(seller.id, "Coat", 2500);
    ctx.state.seed_listing(seller.id, "Lamp", 500);

    let listings = ctx
        .hopeflow
        .listings()
        .list(ListingFilter::all())
        .await
        .unwrap();

    assert_eq!(listings.len(), 2);
}

#[tokio::test]
async fn test_list_filters_by_seller() {
    let ctx = TestContext::new().await;
    let alice = ctx.state.seed_user("alice@example.com", "pw", "Alice");
    let bob = ctx.state.seed_user("bob@example.com", "pw", "Bob");
    let coat = ctx.state.seed_listing(alice.id, "Coat", 2500);
    ctx.state.seed_listing(bob.id, "Lamp", 500);

    let listings = ctx
        .hopeflow
        .listings()
        .list(ListingFilter::by_seller(alice.id))
        .await
        .unwrap();

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, coat.id);
}

#[tokio::test]
async fn test_get_unknown_listing_is_not_found() {
    let ctx = TestContext::new().await;

    let err = ctx
        .hopeflow
        .listings()
        .get(hopeflow_core::ListingId::new(999))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 404, .. }));
}

#[tokio::test]
async fn test_get_serves_cached_listing() {
    let ctx = TestContext::new().await;
    let seller = ctx.state.seed_user("seller@example.com", "pw", "Seller");
    let listing = ctx.state.seed_listing(seller.id, "Coat", 2500);

    let first = ctx.hopeflow.listings().get(listing.id).await.unwrap();
    assert_eq!(first.title, "Coat");

    // Gone server-side, but the cached entry still answers
    ctx.state.remove_listing(listing.id);
    let second = ctx.hopeflow.listings().get(listing.id).await.unwrap();
    assert_eq!(second.title, "Coat");
}

#[tokio::test]
async fn test_create_requires_login() {
    let ctx = TestContext::new().await;

    let err = ctx
        .hopeflow
        .listings()
        .create(&draft("Coat", 2500))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotLoggedIn));
}

#[tokio::test]
async fn test_create_assigns_seller_and_defaults() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;
    let user = client.session().current_user().unwrap();

    let listing = client.listings().create(&draft("Coat", 2500)).await.unwrap();

    assert_eq!(listing.user_id, user.id);
    assert_eq!(listing.price.display(), "$25.00");
    assert!(listing.availability.is_purchasable());
    assert!(listing.images.is_empty());
}

#[tokio::test]
async fn test_update_invalidates_cached_listing() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;

    let listing = client.listings().create(&draft("Coat", 2500)).await.unwrap();

    // Warm the cache
    client.listings().get(listing.id).await.unwrap();

    let updated = client
        .listings()
        .update(listing.id, &draft("Winter coat", 3000))
        .await
        .unwrap();
    assert_eq!(updated.title, "Winter coat");

    let fetched = client.listings().get(listing.id).await.unwrap();
    assert_eq!(fetched.title, "Winter coat", "stale cache entry served");
    assert_eq!(fetched.price.display(), "$30.00");
}

#[tokio::test]
async fn test_delete_invalidates_cached_listing() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;

    let listing = client.listings().create(&draft("Coat", 2500)).await.unwrap();
    client.listings().get(listing.id).await.unwrap();

    client.listings().delete(listing.id).await.unwrap();

    let err = client.listings().get(listing.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 404, .. }));
}

#[tokio::test]
async fn test_upload_photo_and_list_photos() {
    let ctx = TestContext::new().await;
    let client = logged_in(&ctx).await;

    let listing = client.listings().create(&draft("Coat", 2500)).await.unwrap();

    let photo = client
        .listings()
        .upload_photo(listing.id, "coat.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
        .await
        .unwrap();
    assert_eq!(photo.listing_id, listing.id);
    assert!(photo.url.ends_with("coat.jpg"));

    let photos = client.listings().photos(listing.id).await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id, photo.id);
}

#[tokio::test]
async fn test_charities_listed_without_login() {
    let ctx = TestContext::new().await;
    ctx.state.seed_charity("Shelter Fund", "Emergency housing");
    ctx.state.seed_charity("Food Bank", "Meals for families");

    let charities = ctx.hopeflow.charities().list().await.unwrap();

    assert_eq!(charities.len(), 2);
    assert!(charities.iter().any(|c| c.name == "Shelter Fund"));
}
