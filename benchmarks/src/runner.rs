use crate::{args::Args, results::BenchmarkResults, service::SimulatedService};
use anyhow::Result;
use futures::future::join_all;
use selium_publisher::batching::BatchConfig;
use selium_publisher::flow_control::FlowControlSettings;
use selium_publisher::{Message, Publisher};
use std::time::{Duration, Instant};

const TOPIC: &str = "projects/acmeco/topics/stocks";

fn generate_message(message_size: usize) -> String {
    (0..message_size)
        .map(|i| (i % 25 + 97) as u8 as char)
        .collect()
}

/// Spreads `total` messages over the publishers, handing the remainder to the first one.
fn split_messages(total: u64, publishers: u64) -> Vec<u64> {
    let publishers = publishers.max(1);
    let share = total / publishers;
    let remainder = total % publishers;

    (0..publishers)
        .map(|i| if i == 0 { share + remainder } else { share })
        .collect()
}

pub struct BenchmarkRunner {
    publisher: Publisher,
}

impl BenchmarkRunner {
    pub fn init(args: &Args) -> Result<Self> {
        let service = SimulatedService::new(
            Duration::from_millis(args.service_latency_ms),
            args.failure_rate,
        );

        let mut flow_control = FlowControlSettings::new();

        if let Some(max) = args.max_outstanding_messages {
            flow_control = flow_control.max_outstanding_element_count(max);
        }

        let publisher = selium_publisher::builder(TOPIC)
            .with_batching(BatchConfig::from(args.batching))
            .with_flow_control(flow_control)
            .with_transport(service)
            .build()?;

        Ok(Self { publisher })
    }

    pub async fn run(self, args: Args) -> Result<BenchmarkResults> {
        let mut tasks = Vec::with_capacity(args.num_of_publishers.max(1) as usize);
        let message = Message::new(generate_message(args.message_size as usize));
        let start = Instant::now();

        for count in split_messages(args.num_of_messages, args.num_of_publishers) {
            let publisher = self.publisher.clone();
            let message = message.clone();

            let handle = tokio::spawn(async move {
                let mut handles = Vec::with_capacity(count as usize);

                for _ in 0..count {
                    handles.push(publisher.publish(message.clone()).await);
                }

                join_all(handles)
                    .await
                    .into_iter()
                    .filter(Result::is_err)
                    .count() as u64
            });

            tasks.push(handle);
        }

        let mut failed = 0;

        for result in join_all(tasks).await {
            failed += result?;
        }

        self.publisher.shutdown().await;
        let elapsed = start.elapsed();

        Ok(BenchmarkResults::calculate(
            elapsed,
            message.size(),
            failed,
            self.publisher.stats(),
            args,
        ))
    }
}
