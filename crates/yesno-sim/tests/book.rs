//! Ledger behaviour under concurrent writers and full market lifecycles.

use std::thread;

use yesno_amm::FeeRate;
use yesno_core::{Outcome, TradeKind};
use yesno_sim::{MarketBook, MarketConfig, SimConfig, Simulator};

fn rel_close(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs()).max(1.0)
}

fn market(name: &str, creator: &str, liquidity: f64, p: f64) -> MarketConfig {
    MarketConfig {
        name: name.to_string(),
        question: format!("{name}?"),
        description: None,
        creator: creator.to_string(),
        initial_liquidity: liquidity,
        initial_yes_probability: p,
    }
}

#[test]
fn test_concurrent_buys_conserve_shares_and_invariant() {
    const TRADERS: usize = 8;
    const TRADES_EACH: usize = 50;

    let book = MarketBook::new(FeeRate::DEFAULT);
    book.open_account("house", 100_000.0).unwrap();
    for i in 0..TRADERS {
        book.open_account(&format!("t{i}"), 10_000.0).unwrap();
    }
    let genesis = book
        .create_market(&market("race", "house", 50_000.0, 0.4))
        .unwrap();

    thread::scope(|s| {
        for i in 0..TRADERS {
            let book = &book;
            s.spawn(move || {
                let name = format!("t{i}");
                for j in 0..TRADES_EACH {
                    let kind = if (i + j) % 2 == 0 {
                        TradeKind::BuyYes
                    } else {
                        TradeKind::BuyNo
                    };
                    book.trade(&name, "race", kind, 10.0 + j as f64).unwrap();
                }
            });
        }
    });

    let after = book.market_snapshot("race").unwrap();
    assert!(rel_close(after.k, genesis.k, 1e-9), "k {} -> {}", genesis.k, after.k);

    let mut yes_held = 0.0;
    let mut no_held = 0.0;
    let mut spent = 0.0;
    for i in 0..TRADERS {
        let snap = book.account_snapshot(&format!("t{i}")).unwrap();
        let pos = snap.positions["race"].position;
        yes_held += pos.yes_shares;
        no_held += pos.no_shares;
        spent += 10_000.0 - snap.balance;
    }

    let expected_spent: f64 = (0..TRADES_EACH).map(|j| 10.0 + j as f64).sum::<f64>() * TRADERS as f64;
    assert!(rel_close(spent, expected_spent, 1e-12));

    // A buy adds its net USDC to the opposite pool and takes the shares out
    // of its own pool, so pool + held shares on the bought side is unchanged
    // and the opposite side grows by the net deposit.
    let keep = 1.0 - FeeRate::DEFAULT.rate();
    let (mut yes_in, mut no_in) = (0.0, 0.0);
    for i in 0..TRADERS {
        for j in 0..TRADES_EACH {
            let amount = 10.0 + j as f64;
            if (i + j) % 2 == 0 {
                no_in += amount * keep;
            } else {
                yes_in += amount * keep;
            }
        }
    }
    assert!(rel_close(after.yes_pool + yes_held, genesis.yes_pool + yes_in, 1e-9));
    assert!(rel_close(after.no_pool + no_held, genesis.no_pool + no_in, 1e-9));
}

#[test]
fn test_lifecycle_pays_out_winning_side() {
    let book = MarketBook::new(FeeRate::ZERO);
    book.open_account("house", 1_000.0).unwrap();
    book.open_account("yes", 500.0).unwrap();
    book.open_account("no", 500.0).unwrap();
    book.create_market(&market("coin", "house", 1_000.0, 0.5))
        .unwrap();

    let y = book.trade("yes", "coin", TradeKind::BuyYes, 200.0).unwrap();
    let n = book.trade("no", "coin", TradeKind::BuyNo, 200.0).unwrap();
    assert!(y.shares_change > 0.0 && n.shares_change > 0.0);

    book.resolve("coin", Outcome::No).unwrap();

    assert_eq!(book.redeem("yes", "coin").unwrap(), 0.0);
    assert_eq!(book.redeem("no", "coin").unwrap(), n.shares_change);
    let house = book.redeem("house", "coin").unwrap();

    // Every NO share in existence redeems: the seeded NO pool plus the
    // deposit the YES buyer pushed into it.
    let paid = n.shares_change + house;
    assert!(rel_close(paid, 500.0 + 200.0, 1e-9), "paid {paid}");

    let snap = book.market_snapshot("coin").unwrap();
    assert_eq!(snap.lp_supply, 0.0);

    // Redeeming again pays nothing.
    assert_eq!(book.redeem("no", "coin").unwrap(), 0.0);
}

#[test]
fn test_account_value_marks_to_market() {
    let book = MarketBook::new(FeeRate::DEFAULT);
    book.open_account("house", 10_000.0).unwrap();
    book.open_account("alice", 1_000.0).unwrap();
    book.create_market(&market("rain", "house", 10_000.0, 0.5))
        .unwrap();

    let record = book.trade("alice", "rain", TradeKind::BuyYes, 100.0).unwrap();
    let snap = book.account_snapshot("alice").unwrap();
    let price = book.market_snapshot("rain").unwrap().yes_price;

    let expected = 900.0 + record.shares_change * price;
    assert!(rel_close(snap.total_value, expected, 1e-12));
    assert!(rel_close(snap.positions["rain"].value, record.shares_change * price, 1e-12));
}

/// Maker seeds the market and buys YES; two other LPs come and go with a
/// trade in between, leaving the maker as the only LP.
fn churned_market() -> MarketBook {
    let book = MarketBook::new(FeeRate::DEFAULT);
    book.open_account("maker", 20_000.0).unwrap();
    book.open_account("alice", 1_000.0).unwrap();
    book.open_account("bob", 1_000.0).unwrap();
    book.open_account("carol", 1_000.0).unwrap();
    book.create_market(&market("churn", "maker", 10_000.0, 0.5))
        .unwrap();

    book.trade("maker", "churn", TradeKind::BuyYes, 123.456).unwrap();
    let a = book.add_liquidity("alice", "churn", 87.05).unwrap();
    book.trade("carol", "churn", TradeKind::BuyNo, 77.7).unwrap();
    let b = book.add_liquidity("bob", "churn", 2.56).unwrap();
    book.remove_liquidity("alice", "churn", a.lp_tokens_received)
        .unwrap();
    book.remove_liquidity("bob", "churn", b.lp_tokens_received)
        .unwrap();
    book
}

#[test]
fn test_last_lp_withdraws_full_balance_after_churn() {
    let book = churned_market();
    let held = book.account_snapshot("maker").unwrap().positions["churn"]
        .position
        .lp_tokens;
    assert_eq!(held, 10_000.0);

    book.remove_liquidity("maker", "churn", held).unwrap();

    let snap = book.market_snapshot("churn").unwrap();
    assert_eq!(snap.lp_supply, 0.0);
    assert_eq!(snap.yes_pool, 0.0);
    assert_eq!(snap.no_pool, 0.0);
    let maker = book.account_snapshot("maker").unwrap();
    assert_eq!(maker.positions["churn"].position.lp_tokens, 0.0);
}

#[test]
fn test_last_lp_redeems_after_churn() {
    let book = churned_market();
    book.resolve("churn", Outcome::Yes).unwrap();

    let before = book.account_snapshot("maker").unwrap();
    let shares = before.positions["churn"].position.yes_shares;
    let yes_pool = book.market_snapshot("churn").unwrap().yes_pool;
    assert!(shares > 0.0);

    let paid = book.redeem("maker", "churn").unwrap();
    assert!(rel_close(paid, shares + yes_pool, 1e-12));

    let after = book.account_snapshot("maker").unwrap();
    assert!(rel_close(after.balance, before.balance + paid, 1e-12));
    assert!(after.positions["churn"].position.is_empty());
    assert_eq!(book.market_snapshot("churn").unwrap().lp_supply, 0.0);
}

#[test]
fn test_default_scenario_runs() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
    let config = SimConfig::from_file(path).unwrap();
    let steps = config.steps.len();

    let report = Simulator::new(config).unwrap().run().unwrap();
    assert_eq!(report.steps.len(), steps);
    assert_eq!(report.rejected, 1);
    assert!(report
        .markets
        .iter()
        .any(|m| m.name == "rain-tomorrow" && m.resolution == Some(Outcome::No)));
}
