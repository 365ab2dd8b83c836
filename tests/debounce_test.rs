mod common;

use common::*;
use rust_decimal_macros::dec;
use sell_flow::application::quote_refresher::RefreshOutcome;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_rapid_changes_coalesce_into_one_request() {
    let h = harness(StubQuoteService::returning(sample_quote())).await;

    fill_form(&h.flow, "1").await;
    for amount in ["10", "100"] {
        tokio::time::sleep(Duration::from_millis(100)).await;
        h.flow.set_amount(amount).await;
    }
    settle().await;

    let requests = h.quotes.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount, dec!(100));
}

#[tokio::test(start_paused = true)]
async fn test_no_request_before_quiet_period() {
    let h = harness(StubQuoteService::returning(sample_quote())).await;

    fill_form(&h.flow, "100").await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(h.quotes.request_count(), 0);

    // Typing again restarts the timer.
    h.flow.set_amount("150").await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(h.quotes.request_count(), 0);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.quotes.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_separate_bursts_each_request() {
    let h = harness(StubQuoteService::returning(sample_quote())).await;

    fill_form(&h.flow, "100").await;
    settle().await;
    h.flow.set_amount("150").await;
    settle().await;

    let amounts: Vec<_> = h.quotes.requests().into_iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![dec!(100), dec!(150)]);
}

#[tokio::test(start_paused = true)]
async fn test_stale_quote_does_not_overwrite_newer_one() {
    let mut slow = sample_quote();
    slow.payment_request = "pay:first".to_string();
    let mut fast = sample_quote();
    fast.payment_request = "pay:second".to_string();

    let quotes = StubQuoteService::returning(sample_quote())
        .script(Duration::from_secs(2), StubResponse::Quote(slow))
        .script(Duration::ZERO, StubResponse::Quote(fast));
    let h = harness(quotes).await;

    fill_form(&h.flow, "100").await;
    settle().await;
    assert!(h.flow.view().await.loading);

    h.flow.set_amount("200").await;
    settle().await;

    let view = h.flow.view().await;
    assert_eq!(
        view.payment_information.unwrap().payment_request,
        "pay:second"
    );
    assert!(!view.loading);

    // The first request resolves now and must be dropped.
    tokio::time::sleep(Duration::from_secs(2)).await;
    let view = h.flow.view().await;
    assert_eq!(h.quotes.request_count(), 2);
    assert_eq!(
        view.payment_information.unwrap().payment_request,
        "pay:second"
    );
    assert!(!view.loading);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_now_skips_debounce() {
    let h = harness(StubQuoteService::returning(sample_quote())).await;

    fill_form(&h.flow, "100").await;
    assert_eq!(h.flow.refresh_now().await, RefreshOutcome::Applied);
    assert_eq!(h.quotes.request_count(), 1);
    assert!(h.flow.view().await.payment_information.is_some());

    h.flow.set_amount("").await;
    assert_eq!(h.flow.refresh_now().await, RefreshOutcome::Incomplete);
    assert_eq!(h.flow.view().await.payment_information, None);
}
