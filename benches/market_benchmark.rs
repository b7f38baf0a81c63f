// ============================================================================
// Market Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Submission - Adding bids and offers to the book
// 2. Matching Pass - Full update() over books of different sizes
// 3. Book Queries - Sorted copies and depth snapshots
// ============================================================================

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use bourse::prelude::*;
use rust_decimal::Decimal;
use std::hint::black_box;
use std::sync::Arc;

fn pound() -> Currency {
    Currency::new("pound", "pounds", 2, "£%d").unwrap()
}

fn gold() -> Currency {
    Currency::new("gold", "gold", 0, "%dg").unwrap()
}

fn market() -> DefaultMarket {
    MarketBuilder::new(Marketed::Currency(gold()), pound())
        .build(Arc::new(NoOpEventHandler))
        .unwrap()
}

/// Market with `depth` bids and `depth` offers, every bid crossing every
/// offer, and all parties able to settle
fn crossed_market(depth: i64) -> DefaultMarket {
    let market = market();
    for i in 0..depth {
        let buyer = Agent::shared(format!("buyer_{}", i));
        buyer.give(&pound(), Decimal::from(1_000_000));
        market
            .add_bid(
                MarketBid::new(buyer, pound(), Decimal::from(10), Decimal::from(200 - i % 50))
                    .unwrap(),
            )
            .unwrap();

        let seller = Agent::shared(format!("seller_{}", i));
        seller.give(&gold(), Decimal::from(10));
        market
            .add_offer(
                MarketOffer::new(seller, pound(), Decimal::from(10), Decimal::from(100 + i % 50))
                    .unwrap(),
            )
            .unwrap();
    }
    market
}

// ============================================================================
// Submission Benchmarks
// ============================================================================

fn benchmark_submission(c: &mut Criterion) {
    let market = market();
    let buyer: Holder = Arc::new(Agent::new("buyer"));

    c.bench_function("add_bid", |b| {
        b.iter(|| {
            let bid =
                MarketBid::new(Arc::clone(&buyer), pound(), Decimal::ONE, Decimal::from(5)).unwrap();
            market.add_bid(black_box(bid)).unwrap();
        });
    });
}

// ============================================================================
// Matching Pass Benchmarks
// ============================================================================

fn benchmark_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");

    for depth in [10_i64, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("crossed", depth), depth, |b, &depth| {
            b.iter_batched(
                || crossed_market(depth),
                |market| black_box(market.update()),
                BatchSize::LargeInput,
            );
        });
    }

    // Nothing crosses: cost of eviction check and sorting alone
    group.bench_function("idle_1000", |b| {
        let market = market();
        for i in 0..1_000_i64 {
            let buyer = Agent::shared("buyer");
            buyer.give(&pound(), Decimal::from(1_000));
            market
                .add_bid(MarketBid::new(buyer, pound(), Decimal::ONE, Decimal::from(1 + i % 10)).unwrap())
                .unwrap();
            let seller = Agent::shared("seller");
            market
                .add_offer(MarketOffer::new(seller, pound(), Decimal::ONE, Decimal::from(50 + i % 10)).unwrap())
                .unwrap();
        }
        b.iter(|| black_box(market.update()));
    });

    group.finish();
}

// ============================================================================
// Book Query Benchmarks
// ============================================================================

fn benchmark_queries(c: &mut Criterion) {
    let market = market();
    for i in 0..1_000_i64 {
        let holder = Agent::shared("trader");
        market
            .add_bid(MarketBid::new(holder, pound(), Decimal::ONE, Decimal::new(i, 1)).unwrap())
            .unwrap();
    }

    c.bench_function("bids_snapshot_1000", |b| b.iter(|| black_box(market.bids())));
    c.bench_function("depth_10", |b| b.iter(|| black_box(market.depth(10))));
}

criterion_group!(benches, benchmark_submission, benchmark_update, benchmark_queries);
criterion_main!(benches);
