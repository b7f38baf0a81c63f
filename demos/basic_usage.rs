// ============================================================================
// Basic Usage Example
// ============================================================================

use bourse::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() -> Result<(), MarketError> {
    #[cfg(feature = "logging")]
    let _ = bourse::init_logging("bourse=debug");

    println!("=== Bourse Example ===\n");

    let pound = Currency::new("pound", "pounds", 2, "£%d")?;
    let gold = Currency::new("gold", "gold", 0, "%d gold")?;

    let (handler, events) = ChannelEventHandler::unbounded();
    let market = MarketBuilder::new(Marketed::Currency(gold.clone()), pound.clone())
        .build(Arc::new(handler))?;

    println!("Created market {}\n", market.label());

    // Sellers each hold 5 gold and ask increasing prices
    println!("Adding offers...");
    let mut sellers = Vec::new();
    for i in 0i64..5 {
        let seller = Agent::shared(format!("seller_{}", i));
        seller.give(&gold, Decimal::from(5));
        market.add_offer(MarketOffer::new(
            seller.clone(),
            pound.clone(),
            Decimal::from(5),
            Decimal::new(1000 + i * 25, 2),
        )?)?;
        sellers.push(seller);
    }

    // Buyers bid decreasing prices; the last one cannot afford its bid
    println!("Adding bids...");
    let mut buyers = Vec::new();
    for i in 0i64..5 {
        let buyer = Agent::shared(format!("buyer_{}", i));
        buyer.give(&pound, Decimal::from(if i == 4 { 10 } else { 100 }));
        market.add_bid(MarketBid::new(
            buyer.clone(),
            pound.clone(),
            Decimal::from(4),
            Decimal::new(1100 - i * 25, 2),
        )?)?;
        buyers.push(buyer);
    }

    print_book(&market.depth(5), &pound);

    println!("\n=== Matching Pass ===");
    for transaction in market.update() {
        println!(
            "  {} {} at {} each: {}",
            transaction.quantity(),
            gold.plural(),
            transaction
                .unit_price()
                .map(|price| pound.format(price))
                .unwrap_or_default(),
            transaction.state()
        );
    }

    print_book(&market.depth(5), &pound);

    println!("\n=== Balances ===");
    for agent in buyers.iter().chain(sellers.iter()) {
        println!(
            "  {}: {}, {}",
            agent.name(),
            pound.format(agent.balance(&pound)),
            gold.format(agent.balance(&gold))
        );
    }

    let evicted = events
        .try_iter()
        .filter(|event| matches!(event, MarketEvent::BidEvicted { .. }))
        .count();
    println!("\nBids evicted for insolvency: {}", evicted);

    Ok(())
}

fn print_book(snapshot: &BookSnapshot, currency: &Currency) {
    println!("\n=== Book {} ===", snapshot.label);

    println!("Bids:");
    for (price, qty) in &snapshot.bids {
        println!("  {} @ {}", qty, currency.format(*price));
    }

    println!("Offers:");
    for (price, qty) in &snapshot.offers {
        println!("  {} @ {}", qty, currency.format(*price));
    }

    if let Some(spread) = snapshot.spread {
        println!("Spread: {}", currency.format(spread));
    }
}
