//! Merchandise catalog and purchase integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn merch_list_contains_the_default_catalog() {
    let harness = TestHarness::new();
    let token = harness.login("alice", "secret").await;

    let response = harness
        .server
        .get("/api/merch/list")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 10);

    let cup = items.iter().find(|i| i["name"] == "cup").unwrap();
    assert_eq!(cup["price"], 20);
}

#[tokio::test]
async fn buying_an_item_debits_the_balance_and_records_it() {
    let harness = TestHarness::new();
    let token = harness.login("alice", "secret").await;

    let response = harness
        .server
        .get("/api/buy/cup")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    response.assert_status_ok();

    assert_eq!(harness.balance(&token).await, 980);

    let response = harness
        .server
        .get("/api/info")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let purchases = body["purchases"].as_array().unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0]["item"], "cup");
    assert_eq!(purchases[0]["price"], 20);
}

#[tokio::test]
async fn buying_an_unknown_item_is_not_found() {
    let harness = TestHarness::new();
    let token = harness.login("alice", "secret").await;

    let response = harness
        .server
        .get("/api/buy/yacht")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;

    response.assert_status_not_found();
    assert_eq!(harness.balance(&token).await, 1000);
}

#[tokio::test]
async fn buying_beyond_the_balance_is_rejected() {
    let harness = TestHarness::new();
    let token = harness.login("alice", "secret").await;

    // Two pink hoodies drain the full starting balance.
    for _ in 0..2 {
        harness
            .server
            .get("/api/buy/pink-hoody")
            .add_header("authorization", TestHarness::bearer(&token))
            .await
            .assert_status_ok();
    }
    assert_eq!(harness.balance(&token).await, 0);

    let response = harness
        .server
        .get("/api/buy/pink-hoody")
        .add_header("authorization", TestHarness::bearer(&token))
        .await;
    response.assert_status_bad_request();

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_coins");
    assert_eq!(harness.balance(&token).await, 0);
}
