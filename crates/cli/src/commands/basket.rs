//! Basket commands: show, add, remove.

#![allow(clippy::print_stdout)]

use hopeflow_client::HopeFlow;
use hopeflow_core::{BasketItemId, ListingId};

/// Show the basket contents (refreshed from the server).
///
/// # Errors
///
/// Returns an error if no session can be restored or on any API failure.
pub async fn show(client: &HopeFlow) -> Result<(), Box<dyn std::error::Error>> {
    restore_session(client).await?;

    let lines = client.baskets().refresh().await?;
    if lines.is_empty() {
        println!("Basket is empty");
        return Ok(());
    }

    for line in &lines {
        println!(
            "item {:>6}  listing {:>6}  {:<40}  {:>10}",
            line.item.id,
            line.listing.id,
            line.listing.title,
            line.listing.price.display(),
        );
    }
    println!("{} item(s)", lines.len());
    Ok(())
}

/// Add a listing to the basket.
///
/// # Errors
///
/// Returns an error if the listing is already in the basket, no session can
/// be restored, or on any API failure.
pub async fn add(client: &HopeFlow, listing_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    restore_session(client).await?;

    let lines = client.baskets().add_item(ListingId::new(listing_id)).await?;
    println!("Added listing {listing_id}; basket now has {} item(s)", lines.len());
    Ok(())
}

/// Remove a line item from the basket.
///
/// # Errors
///
/// Returns an error if no session can be restored or on any API failure.
pub async fn remove(client: &HopeFlow, item_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    restore_session(client).await?;

    client.baskets().remove_item(BasketItemId::new(item_id)).await?;
    println!("Removed item {item_id}");
    Ok(())
}

async fn restore_session(client: &HopeFlow) -> Result<(), Box<dyn std::error::Error>> {
    if client.session().restore().await?.is_none() {
        return Err("not logged in; run `hope-cli auth login` first".into());
    }
    Ok(())
}
