use crate::helpers::{payload, MockService, POISON, TOPIC};
use anyhow::Result;
use futures::future::join_all;
use rand::prelude::*;
use selium_publisher::prelude::*;
use selium_publisher::TransportErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_publishers_respect_batch_thresholds() -> Result<()> {
    let (count, bytes, messages) = {
        let mut rng = rand::thread_rng();
        (rng.gen_range(2..20), rng.gen_range(64..256), rng.gen_range(100..400))
    };

    let service = MockService::new().shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(count, bytes, Duration::from_millis(5)))
        .with_transport(service.clone())
        .build()?;

    let tasks = (0..4).map(|worker| {
        let publisher = publisher.clone();

        tokio::spawn(async move {
            let mut handles = Vec::new();

            for i in 0..messages {
                let message = format!("{worker}-{i}");
                handles.push((message.clone(), publisher.publish(message).await));
            }

            for (message, handle) in handles {
                assert_eq!(handle.await.unwrap(), format!("id-{message}"));
            }
        })
    });

    for result in join_all(tasks).await {
        result?;
    }

    publisher.shutdown().await;

    let batches = service.batches();
    let total: usize = batches.iter().map(Vec::len).sum();
    assert_eq!(total, 4 * messages);

    for batch in batches {
        let size: usize = batch.iter().map(Message::size).sum();
        assert!(!batch.is_empty());
        assert!(batch.len() <= count);
        assert!(size <= bytes);
    }

    let stats = publisher.stats();
    assert_eq!(stats.messages_published, 4 * messages as u64);
    assert_eq!(stats.outstanding_elements, 0);
    assert_eq!(stats.outstanding_bytes, 0);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn outstanding_work_stays_within_ceilings() -> Result<()> {
    const MAX_ELEMENTS: usize = 5;
    const MAX_BYTES: usize = 40;

    let service = MockService::new()
        .latency(Duration::from_millis(2))
        .shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(2, 1000, Duration::from_millis(1)))
        .with_flow_control(
            FlowControlSettings::new()
                .max_outstanding_element_count(MAX_ELEMENTS)
                .max_outstanding_request_bytes(MAX_BYTES),
        )
        .with_transport(service)
        .build()?;

    let done = Arc::new(AtomicBool::new(false));

    let monitor = tokio::spawn({
        let publisher = publisher.clone();
        let done = done.clone();

        async move {
            while !done.load(Ordering::Relaxed) {
                let stats = publisher.stats();
                assert!(stats.outstanding_elements <= MAX_ELEMENTS as u64);
                assert!(stats.outstanding_bytes <= MAX_BYTES as u64);
                tokio::task::yield_now().await;
            }
        }
    });

    let tasks = (0..4).map(|worker| {
        let publisher = publisher.clone();

        tokio::spawn(async move {
            let mut handles = Vec::new();

            for i in 0..25 {
                handles.push(publisher.publish(format!("w{worker}-{i:02}")).await);
            }

            join_all(handles).await
        })
    });

    for result in join_all(tasks).await {
        assert!(result?.into_iter().all(|result| result.is_ok()));
    }

    done.store(true, Ordering::Relaxed);
    monitor.await?;

    let stats = publisher.stats();
    assert_eq!(stats.messages_published, 100);
    assert_eq!(stats.outstanding_elements, 0);
    assert_eq!(stats.outstanding_bytes, 0);

    publisher.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn batch_failure_does_not_leak_into_other_batches() -> Result<()> {
    let service = MockService::new().shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(2, 1000, Duration::from_secs(60)))
        .with_transport(service.clone())
        .build()?;

    let doomed = publisher.publish("innocent").await;
    let poison = publisher.publish(POISON).await;
    let fine = publisher.publish("fine").await;
    let also_fine = publisher.publish("also fine").await;

    for handle in [doomed, poison] {
        match handle.await {
            Err(PublishError::TerminalSendFailure(err)) => {
                assert_eq!(err.kind(), TransportErrorKind::InvalidArgument);
            }
            other => panic!("expected a terminal failure, got {other:?}"),
        }
    }

    assert_eq!(fine.await?, "id-fine");
    assert_eq!(also_fine.await?, "id-also fine");

    let stats = publisher.stats();
    assert_eq!(stats.batches_failed, 1);
    assert_eq!(stats.batches_sent, 1);
    assert_eq!(stats.retries, 0);

    publisher.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn ids_follow_submission_order_within_each_batch() -> Result<()> {
    let service = MockService::new().shared();
    let publisher = selium_publisher::builder(TOPIC)
        .with_batching(BatchConfig::new(10, 10_000, Duration::from_millis(1)))
        .with_transport(service.clone())
        .build()?;

    let mut handles = Vec::new();
    for i in 0..55 {
        handles.push((i, publisher.publish(format!("m{i}")).await));
    }

    for (i, handle) in handles {
        assert_eq!(handle.await?, format!("id-m{i}"));
    }

    publisher.shutdown().await;

    let batches = service.batches();
    assert_eq!(batches.iter().map(Vec::len).sum::<usize>(), 55);

    for batch in batches {
        let positions = batch
            .iter()
            .map(|message| payload(message)[1..].parse::<usize>())
            .collect::<Result<Vec<_>, _>>()?;

        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    Ok(())
}
