//! TORA interest rate example.
//!
//! Prints the available policy rate series and recent observations of one
//! series, rendered the way an orchestrating agent receives them.
//!
//! Requires RIKSBANK_CLIENT_ID and RIKSBANK_CLIENT_SECRET.
//!
//! Run with: cargo run --example interest_rates -- REPO

use riksbank_rs::api::InterestRatesQuery;
use riksbank_rs::models::{response_json, InterestRateTypeFilter};
use riksbank_rs::RiksbankClient;

#[tokio::main]
async fn main() -> riksbank_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let series = std::env::args().nth(1).unwrap_or_else(|| "REPO".to_string());
    let client = RiksbankClient::from_env()?;
    let rates = client.interest_rates();

    match rates.types(&InterestRateTypeFilter::new().category("policy")).await {
        Ok(types) => {
            println!("Found {} policy series:", types.count);
            for t in &types.items {
                println!(
                    "  - {} ({}) {} .. {}",
                    t.id, t.name, t.date_range.from, t.date_range.to
                );
            }
        }
        Err(info) => eprintln!("Could not list series: {}", info),
    }

    let query = InterestRatesQuery::new()
        .interest_rate_id(series.as_str())
        .limit(Some(10));
    let observations = rates.list(&query).await;

    let rendered = response_json(&observations);
    println!(
        "{}",
        serde_json::to_string_pretty(&rendered).unwrap_or_else(|_| rendered.to_string())
    );

    Ok(())
}
