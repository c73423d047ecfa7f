//! Favorites commands: list, add, remove.

#![allow(clippy::print_stdout)]

use hopeflow_client::HopeFlow;
use hopeflow_core::ListingId;

/// List favorited listings.
///
/// # Errors
///
/// Returns an error if no session can be restored or on any API failure.
pub async fn list(client: &HopeFlow) -> Result<(), Box<dyn std::error::Error>> {
    restore_session(client).await?;

    let ids = client.favorites().fetch().await?;
    if ids.is_empty() {
        println!("No favorites");
        return Ok(());
    }

    for id in ids {
        match client.listings().get(id).await {
            Ok(listing) => println!("{:>6}  {}", listing.id, listing.title),
            // A favorite can outlive its listing; show the bare ID
            Err(_) => println!("{id:>6}  (listing unavailable)"),
        }
    }
    Ok(())
}

/// Favorite a listing.
///
/// # Errors
///
/// Returns an error if no session can be restored or on any API failure.
pub async fn add(client: &HopeFlow, listing_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    restore_session(client).await?;

    client.favorites().add(ListingId::new(listing_id)).await?;
    println!("Favorited listing {listing_id}");
    Ok(())
}

/// Unfavorite a listing.
///
/// # Errors
///
/// Returns an error if no session can be restored or on any API failure.
pub async fn remove(client: &HopeFlow, listing_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    restore_session(client).await?;

    client.favorites().remove(ListingId::new(listing_id)).await?;
    println!("Unfavorited listing {listing_id}");
    Ok(())
}

async fn restore_session(client: &HopeFlow) -> Result<(), Box<dyn std::error::Error>> {
    if client.session().restore().await?.is_none() {
        return Err("not logged in; run `hope-cli auth login` first".into());
    }
    Ok(())
}
