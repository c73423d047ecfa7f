//! Listing commands: list, show, create, photos.

#![allow(clippy::print_stdout)]

use rust_decimal::Decimal;

use hopeflow_client::{HopeFlow, ListingDraft, ListingFilter};
use hopeflow_core::{CategoryId, CharityId, CurrencyCode, ListingId, Price, UserId};

/// List listings, optionally filtered by seller or purchaser.
///
/// # Errors
///
/// Returns an error on any API failure.
pub async fn list(
    client: &HopeFlow,
    seller: Option<i64>,
    purchased_by: Option<i64>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Attach the session if one is persisted so the server can personalize
    let _ = client.session().restore().await?;

    let filter = ListingFilter {
        user_id: seller.map(UserId::new),
        purchased_by: purchased_by.map(UserId::new),
    };

    let listings = client.listings().list(filter).await?;
    if listings.is_empty() {
        println!("No listings found");
        return Ok(());
    }

    for listing in listings {
        println!(
            "{:>6}  {:<40}  {:>10}  {:?}",
            listing.id,
            listing.title,
            listing.price.display(),
            listing.availability,
        );
    }
    Ok(())
}

/// Show one listing in full.
///
/// # Errors
///
/// Returns an error for an unknown listing ID or any API failure.
pub async fn show(client: &HopeFlow, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let _ = client.session().restore().await?;

    let listing = client.listings().get(ListingId::new(id)).await?;
    println!("#{} {}", listing.id, listing.title);
    println!("Price:        {}", listing.price.display());
    println!("Availability: {:?}", listing.availability);
    println!("Seller:       user {}", listing.user_id);
    println!("Charity:      {}", listing.charity_id);
    if !listing.description.is_empty() {
        println!("\n{}", listing.description);
    }
    for image in &listing.images {
        println!("Image: {image}");
    }
    Ok(())
}

/// Create a listing.
///
/// # Errors
///
/// Returns an error for an unparsable price, a missing session, or any API
/// failure.
pub async fn create(
    client: &HopeFlow,
    title: &str,
    description: &str,
    price: &str,
    category: i64,
    charity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let _ = client.session().restore().await?;

    let amount: Decimal = price.parse()?;
    let draft = ListingDraft {
        title: title.to_string(),
        description: description.to_string(),
        price: Price::new(amount, CurrencyCode::USD),
        category_id: CategoryId::new(category),
        charity_id: CharityId::new(charity),
    };

    let listing = client.listings().create(&draft).await?;
    println!("Created listing #{}: {}", listing.id, listing.title);
    Ok(())
}

/// List the photos attached to a listing.
///
/// # Errors
///
/// Returns an error on any API failure.
pub async fn photos(client: &HopeFlow, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let _ = client.session().restore().await?;

    let photos = client.listings().photos(ListingId::new(id)).await?;
    if photos.is_empty() {
        println!("No photos");
        return Ok(());
    }
    for photo in photos {
        println!("{:>6}  {}", photo.id, photo.url);
    }
    Ok(())
}
