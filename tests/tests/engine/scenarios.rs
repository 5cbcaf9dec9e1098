use crate::helpers::{payload, MockService, TOPIC};
use anyhow::Result;
use futures::FutureExt;
use selium_publisher::errors::AdmissionLimit;
use selium_publisher::prelude::*;
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[tokio::test]
async fn count_threshold_sends_one_ordered_batch() -> Result<()> {
    let service = MockService::new().shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(3, 1000, Duration::from_secs(60)))
        .with_transport(service.clone())
        .build()?;

    let handles = vec![
        publisher.publish("first").await,
        publisher.publish("second").await,
        publisher.publish("third").await,
    ];

    for (handle, expected) in handles.into_iter().zip(["first", "second", "third"]) {
        assert_eq!(handle.await?, format!("id-{expected}"));
    }

    let batches = service.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].iter().map(payload).collect::<Vec<_>>(),
        vec!["first", "second", "third"]
    );

    publisher.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn delay_threshold_flushes_partial_batch() -> Result<()> {
    let service = MockService::new().shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(100, 1000, Duration::from_millis(50)))
        .with_transport(service.clone())
        .build()?;

    let handle = publisher.publish("lonely").await;

    sleep(Duration::from_millis(40)).await;
    assert_eq!(service.calls(), 0);

    sleep(Duration::from_millis(20)).await;
    assert_eq!(service.calls(), 1);
    assert_eq!(service.batches()[0].len(), 1);
    assert_eq!(handle.await?, "id-lonely");

    publisher.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn fail_fast_admission_rejects_second_message() -> Result<()> {
    let service = MockService::new()
        .latency(Duration::from_millis(200))
        .shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(1, 1000, Duration::from_secs(60)))
        .with_flow_control(
            FlowControlSettings::new()
                .max_outstanding_element_count(1)
                .limit_exceeded_behavior(LimitExceededBehavior::FailFast),
        )
        .with_transport(service)
        .build()?;

    let first = publisher.publish("a").await;
    let second = publisher.publish("b").await;

    let rejected = second.now_or_never().expect("rejection is immediate");
    assert_eq!(
        rejected,
        Err(PublishError::AdmissionRejected(AdmissionLimit::ElementCount))
    );
    assert_eq!(first.await?, "id-a");

    publisher.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn retryable_failures_are_retried_until_success() -> Result<()> {
    let service = MockService::new()
        .fail_times(2, TransportError::unavailable("try again"))
        .shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(1, 1000, Duration::from_secs(60)))
        .with_transport(service.clone())
        .build()?;

    let handle = publisher.publish("persistent").await;

    assert_eq!(handle.await?, "id-persistent");
    assert_eq!(service.calls(), 3);

    let stats = publisher.stats();
    assert_eq!(stats.retries, 2);
    assert_eq!(stats.send_attempts, 3);
    assert_eq!(stats.messages_published, 1);

    publisher.shutdown().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn persistent_failures_exhaust_retry_budget() -> Result<()> {
    let budget = Duration::from_millis(200);
    let unavailable = TransportError::unavailable("service down");
    let service = MockService::new().always_fail(unavailable.clone()).shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(1, 1000, Duration::from_secs(60)))
        .with_retry_settings(
            RetrySettings::new()
                .with_total_timeout(budget)
                .with_initial_rpc_timeout(Duration::from_millis(50)),
        )
        .with_transport(service.clone())
        .build()?;

    let started = Instant::now();
    let result = publisher.publish("doomed").await.await;

    assert!(started.elapsed() >= budget);

    match result {
        Err(PublishError::RetryBudgetExhausted {
            attempts,
            budget: reported,
            last_error,
        }) => {
            assert_eq!(reported, budget);
            assert_eq!(last_error, unavailable);
            assert_eq!(attempts as usize, service.calls());
        }
        other => panic!("expected retry budget exhaustion, got {other:?}"),
    }

    let stats = publisher.stats();
    assert_eq!(stats.batches_failed, 1);
    assert_eq!(stats.messages_failed, 1);
    assert_eq!(stats.outstanding_elements, 0);

    publisher.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn shutdown_sends_accumulating_message_then_rejects() -> Result<()> {
    let service = MockService::new().shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(100, 1000, Duration::from_secs(60)))
        .with_transport(service.clone())
        .build()?;

    let handle = publisher.publish("last words").await;
    publisher.shutdown().await;

    assert_eq!(service.calls(), 1);
    let result = handle.now_or_never().expect("resolved before shutdown returns");
    assert_eq!(result?, "id-last words");

    let late = publisher.publish("too late").await;
    assert_eq!(late.await, Err(PublishError::EngineShutdown));
    assert_eq!(service.calls(), 1);

    Ok(())
}
