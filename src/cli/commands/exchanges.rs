//! List exchanges command.

use anyhow::Result;
use stockchart_calendar::ExchangeCalendars;

pub fn run() -> Result<()> {
    let calendars = ExchangeCalendars::new();

    println!("Supported Exchanges");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for exchange in calendars.exchanges() {
        println!(
            "  {:<6} {:<28} {:02}:{:02}-{:02}:{:02} {}",
            exchange.code,
            exchange.name,
            exchange.open.0,
            exchange.open.1,
            exchange.close.0,
            exchange.close.1,
            exchange.timezone
        );
        if !exchange.aliases.is_empty() {
            println!("         aliases: {}", exchange.aliases.join(", "));
        }
    }

    println!();
    println!("Use --exchange <code> to select an exchange.");

    Ok(())
}
