//! Transactional property tests for the transfer and purchase engines.
//!
//! These run against a real RocksDB store in a temp directory, the same way
//! the service uses it. No mocks, so the lock and commit paths are the ones
//! exercised in production.

use std::sync::Arc;

use tempfile::TempDir;

use coin_shop_core::{Account, AccountId, NewAccount, STARTING_BALANCE};
use coin_shop_engine::{AccountService, EngineError, PurchaseEngine, TransferEngine};
use coin_shop_store::RocksStore;

struct Shop {
    _dir: TempDir,
    store: Arc<RocksStore>,
    transfers: TransferEngine,
    purchases: PurchaseEngine,
    accounts: AccountService,
}

fn shop() -> Shop {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(RocksStore::open(dir.path()).unwrap());
    store.ensure_default_catalog().unwrap();
    Shop {
        transfers: TransferEngine::new(Arc::clone(&store)),
        purchases: PurchaseEngine::new(Arc::clone(&store)),
        accounts: AccountService::new(Arc::clone(&store)),
        store,
        _dir: dir,
    }
}

/// Create an account directly through the store, skipping bcrypt.
async fn create_account(store: &RocksStore, username: &str) -> Account {
    let mut uow = store.begin_unit_of_work();
    let account = store
        .create_account(
            &mut uow,
            NewAccount {
                username: username.into(),
                password_hash: "test-hash".into(),
            },
        )
        .await
        .unwrap();
    store.commit(uow).unwrap();
    account
}

/// Force an account's balance to an exact value.
async fn set_balance(store: &RocksStore, id: AccountId, balance: i64) {
    let mut uow = store.begin_unit_of_work();
    let mut account = store.get_account_for_update(&mut uow, id).await.unwrap();
    account.balance = balance;
    store.update_account(&mut uow, &account).unwrap();
    store.commit(uow).unwrap();
}

fn balance(store: &RocksStore, id: AccountId) -> i64 {
    store.get_account(id).unwrap().unwrap().balance
}

fn total(store: &RocksStore, ids: &[AccountId]) -> i64 {
    ids.iter().map(|id| balance(store, *id)).sum()
}

// ============================================================================
// Transfer: sequential behavior
// ============================================================================

#[tokio::test]
async fn transfer_moves_coins_and_appends_one_record() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;
    let b = create_account(&shop.store, "b").await;

    let record = shop.transfers.transfer(a.id, b.id, 300).await.unwrap();
    assert_eq!(record.sender_id, a.id);
    assert_eq!(record.recipient_id, b.id);
    assert_eq!(record.amount, 300);

    assert_eq!(balance(&shop.store, a.id), 700);
    assert_eq!(balance(&shop.store, b.id), 1300);

    let sent = shop.transfers.sent(a.id).unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, record.id);

    let received = shop.transfers.received(b.id).unwrap();
    assert_eq!(received.len(), 1);

    // A second transfer the sender can no longer cover fails and changes
    // nothing.
    let err = shop.transfers.transfer(a.id, b.id, 800).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientCoins {
            balance: 700,
            required: 800
        }
    ));
    assert_eq!(balance(&shop.store, a.id), 700);
    assert_eq!(balance(&shop.store, b.id), 1300);
    assert_eq!(shop.transfers.sent(a.id).unwrap().len(), 1);
}

#[tokio::test]
async fn failed_transfer_is_idempotent() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;
    let b = create_account(&shop.store, "b").await;
    set_balance(&shop.store, a.id, 100).await;

    for _ in 0..2 {
        let err = shop.transfers.transfer(a.id, b.id, 500).await.unwrap_err();
        assert!(matches!(err, EngineError::InsufficientCoins { .. }));
        assert_eq!(balance(&shop.store, a.id), 100);
        assert_eq!(balance(&shop.store, b.id), STARTING_BALANCE);
        assert!(shop.transfers.sent(a.id).unwrap().is_empty());
    }
}

#[tokio::test]
async fn transfer_rejects_non_positive_amounts() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;
    let b = create_account(&shop.store, "b").await;

    for amount in [0, -1, -500] {
        let err = shop.transfers.transfer(a.id, b.id, amount).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount));
    }
    assert_eq!(balance(&shop.store, a.id), STARTING_BALANCE);
    assert!(shop.transfers.sent(a.id).unwrap().is_empty());
}

#[tokio::test]
async fn transfer_rejects_self_transfer() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;

    let err = shop.transfers.transfer(a.id, a.id, 10).await.unwrap_err();
    assert!(matches!(err, EngineError::SelfTransfer));
    assert_eq!(balance(&shop.store, a.id), STARTING_BALANCE);
    assert!(shop.transfers.sent(a.id).unwrap().is_empty());
}

#[tokio::test]
async fn transfer_involving_unknown_account_leaves_no_trace() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;
    let ghost = AccountId::new(9999);

    let err = shop.transfers.transfer(a.id, ghost, 100).await.unwrap_err();
    assert!(matches!(err, EngineError::AccountNotFound { .. }));

    let err = shop.transfers.transfer(ghost, a.id, 100).await.unwrap_err();
    assert!(matches!(err, EngineError::AccountNotFound { .. }));

    assert_eq!(balance(&shop.store, a.id), STARTING_BALANCE);
    assert!(shop.transfers.sent(a.id).unwrap().is_empty());
    assert!(shop.transfers.received(a.id).unwrap().is_empty());
}

#[tokio::test]
async fn coins_are_conserved_across_mixed_outcomes() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;
    let b = create_account(&shop.store, "b").await;
    let c = create_account(&shop.store, "c").await;
    let ids = [a.id, b.id, c.id];
    let supply = total(&shop.store, &ids);

    shop.transfers.transfer(a.id, b.id, 400).await.unwrap();
    shop.transfers.transfer(b.id, c.id, 900).await.unwrap();
    shop.transfers.transfer(c.id, a.id, 150).await.unwrap();
    // a = 750 here; this one must fail.
    let _ = shop.transfers.transfer(a.id, c.id, 5000).await.unwrap_err();
    shop.transfers.transfer(c.id, b.id, 1).await.unwrap();

    assert_eq!(total(&shop.store, &ids), supply);
    for id in ids {
        assert!(balance(&shop.store, id) >= 0);
    }
}

// ============================================================================
// Transfer: concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_disjoint_transfers_all_commit() {
    let shop = shop();

    let mut pairs = Vec::new();
    for i in 0..8 {
        let sender = create_account(&shop.store, &format!("sender-{i}")).await;
        let recipient = create_account(&shop.store, &format!("recipient-{i}")).await;
        pairs.push((sender.id, recipient.id, 50 + i64::from(i) * 10));
    }

    let tasks: Vec<_> = pairs
        .iter()
        .map(|&(sender, recipient, amount)| {
            let transfers = shop.transfers.clone();
            tokio::spawn(async move { transfers.transfer(sender, recipient, amount).await })
        })
        .collect();

    for task in futures::future::join_all(tasks).await {
        task.unwrap().unwrap();
    }

    // Disjoint pairs interleave freely; the outcome must equal the
    // sequential result regardless of ordering.
    for (sender, recipient, amount) in pairs {
        assert_eq!(balance(&shop.store, sender), STARTING_BALANCE - amount);
        assert_eq!(balance(&shop.store, recipient), STARTING_BALANCE + amount);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_same_sender_race_has_exactly_one_winner() {
    let shop = shop();
    let sender = create_account(&shop.store, "sender").await;
    let b = create_account(&shop.store, "b").await;
    let c = create_account(&shop.store, "c").await;
    let ids = [sender.id, b.id, c.id];

    // Only one 700-coin debit fits into a 1000-coin balance.
    let tasks = [b.id, c.id].map(|recipient| {
        let transfers = shop.transfers.clone();
        let sender = sender.id;
        tokio::spawn(async move { transfers.transfer(sender, recipient, 700).await })
    });

    let mut successes = 0;
    let mut insufficient = 0;
    for task in futures::future::join_all(tasks).await {
        match task.unwrap() {
            Ok(_) => successes += 1,
            Err(EngineError::InsufficientCoins { .. }) => insufficient += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(insufficient, 1);
    assert_eq!(balance(&shop.store, sender.id), 300);
    assert_eq!(total(&shop.store, &ids), 3 * STARTING_BALANCE);
}

#[tokio::test(flavor = "multi_thread")]
async fn opposing_transfers_do_not_deadlock() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;
    let b = create_account(&shop.store, "b").await;

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let forward = shop.transfers.clone();
        let (from, to) = (a.id, b.id);
        tasks.push(tokio::spawn(async move { forward.transfer(from, to, 5).await }));

        let backward = shop.transfers.clone();
        let (from, to) = (b.id, a.id);
        tasks.push(tokio::spawn(async move { backward.transfer(from, to, 3).await }));
    }

    for task in futures::future::join_all(tasks).await {
        task.unwrap().unwrap();
    }

    assert_eq!(balance(&shop.store, a.id), STARTING_BALANCE - 10 * 5 + 10 * 3);
    assert_eq!(balance(&shop.store, b.id), STARTING_BALANCE + 10 * 5 - 10 * 3);
}

// ============================================================================
// Purchase
// ============================================================================

#[tokio::test]
async fn purchase_debits_buyer_and_records_price_snapshot() {
    let shop = shop();
    let buyer = create_account(&shop.store, "buyer").await;
    set_balance(&shop.store, buyer.id, 150).await;

    let record = shop.purchases.purchase(buyer.id, "book").await.unwrap();
    assert_eq!(record.buyer_id, buyer.id);
    assert_eq!(record.item, "book");
    assert_eq!(record.price, 50);

    assert_eq!(balance(&shop.store, buyer.id), 100);

    let purchases = shop.purchases.purchases(buyer.id).unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].id, record.id);
}

#[tokio::test]
async fn purchase_with_insufficient_coins_writes_nothing() {
    let shop = shop();
    let buyer = create_account(&shop.store, "buyer").await;
    set_balance(&shop.store, buyer.id, 150).await;

    let err = shop
        .purchases
        .purchase(buyer.id, "powerbank")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientCoins {
            balance: 150,
            required: 200
        }
    ));

    assert_eq!(balance(&shop.store, buyer.id), 150);
    assert!(shop.purchases.purchases(buyer.id).unwrap().is_empty());
}

#[tokio::test]
async fn purchase_of_unknown_item_fails_before_touching_accounts() {
    let shop = shop();
    let buyer = create_account(&shop.store, "buyer").await;

    let err = shop
        .purchases
        .purchase(buyer.id, "yacht")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ItemNotFound { .. }));
    assert_eq!(balance(&shop.store, buyer.id), STARTING_BALANCE);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_purchases_serialize_on_the_buyer() {
    let shop = shop();
    let buyer = create_account(&shop.store, "buyer").await;
    set_balance(&shop.store, buyer.id, 100).await;

    // Two 80-coin t-shirts against 100 coins: exactly one fits.
    let tasks = [(); 2].map(|()| {
        let purchases = shop.purchases.clone();
        let buyer = buyer.id;
        tokio::spawn(async move { purchases.purchase(buyer, "t-shirt").await })
    });

    let mut successes = 0;
    for task in futures::future::join_all(tasks).await {
        match task.unwrap() {
            Ok(_) => successes += 1,
            Err(EngineError::InsufficientCoins { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(balance(&shop.store, buyer.id), 20);
    assert_eq!(shop.purchases.purchases(buyer.id).unwrap().len(), 1);
}

// ============================================================================
// Account lifecycle
// ============================================================================

#[tokio::test]
async fn login_auto_registers_and_then_authenticates() {
    let shop = shop();

    let account = shop.accounts.login("dave", "hunter2").await.unwrap();
    assert_eq!(account.balance, STARTING_BALANCE);

    let again = shop.accounts.login("dave", "hunter2").await.unwrap();
    assert_eq!(again.id, account.id);

    let err = shop.accounts.login("dave", "wrong").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidCredentials));
}

#[tokio::test]
async fn resolve_username_finds_only_existing_accounts() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;

    let resolved = shop.accounts.resolve_username("a").unwrap();
    assert_eq!(resolved.id, a.id);

    let err = shop.accounts.resolve_username("nobody").unwrap_err();
    assert!(matches!(err, EngineError::AccountNotFound { .. }));
}

#[tokio::test]
async fn balance_read_reports_committed_state() {
    let shop = shop();
    let a = create_account(&shop.store, "a").await;
    let b = create_account(&shop.store, "b").await;

    shop.transfers.transfer(a.id, b.id, 250).await.unwrap();

    assert_eq!(shop.accounts.balance(a.id).unwrap(), 750);
    assert_eq!(shop.accounts.balance(b.id).unwrap(), 1250);

    let err = shop.accounts.balance(AccountId::new(777)).unwrap_err();
    assert!(matches!(err, EngineError::AccountNotFound { .. }));
}
