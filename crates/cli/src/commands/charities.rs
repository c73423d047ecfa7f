//! Charity commands.

#![allow(clippy::print_stdout)]

use hopeflow_client::HopeFlow;

/// List all charities.
///
/// # Errors
///
/// Returns an error on any API failure.
pub async fn list(client: &HopeFlow) -> Result<(), Box<dyn std::error::Error>> {
    let charities = client.charities().list().await?;
    if charities.is_empty() {
        println!("No charities");
        return Ok(());
    }

    for charity in charities {
        println!("{:>6}  {:<30}  {}", charity.id, charity.name, charity.description);
    }
    Ok(())
}
