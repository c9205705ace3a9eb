//! SWEA calendar example.
//!
//! Lists the calendar days of a month with weekday and quarter, then checks
//! a few single dates and finds the next business days.
//!
//! Requires RIKSBANK_CLIENT_ID and RIKSBANK_CLIENT_SECRET.
//!
//! Run with: cargo run --example calendar_days -- 2023-12-01 2023-12-31

use riksbank_rs::api::CalendarDaysQuery;
use riksbank_rs::RiksbankClient;

#[tokio::main]
async fn main() -> riksbank_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let from = args.next().unwrap_or_else(|| "2023-12-01".to_string());
    let to = args.next().unwrap_or_else(|| "2023-12-31".to_string());

    let client = RiksbankClient::from_env()?;
    let calendar = client.calendar();

    println!("Calendar days {} .. {}", from, to);
    match calendar
        .calendar_days(&CalendarDaysQuery::new(from.as_str()).to_date(to.as_str()))
        .await
    {
        Ok(days) => {
            for day in &days.items {
                println!(
                    "  {} {:<9} Q{} {}",
                    day.date.as_deref().unwrap_or("?"),
                    day.weekday.as_deref().unwrap_or("-"),
                    day.quarter.unwrap_or_default(),
                    if day.is_business_day() { "open" } else { "closed" },
                );
            }
            println!("{} day(s)", days.count);
        }
        Err(info) => {
            eprintln!("Calendar lookup failed: {}", info);
            return Ok(());
        }
    }

    for date in ["2023-12-24", "2023-12-27"] {
        match calendar.is_business_day(date).await {
            Ok(open) => println!("{} business day: {}", date, open),
            Err(info) => eprintln!("{} lookup failed: {}", date, info),
        }
    }

    match calendar.next_business_days(to.as_str(), 3).await {
        Ok(next) => {
            let dates: Vec<_> = next.items.iter().filter_map(|d| d.date.as_deref()).collect();
            println!("Next business days after {}: {}", to, dates.join(", "));
        }
        Err(info) => eprintln!("Next business days failed: {}", info),
    }

    Ok(())
}
