use clap::{Parser, ValueEnum};
use selium_publisher::batching::BatchConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BatchingPreset {
    HighThroughput,
    Balanced,
    LowLatency,
}

impl From<BatchingPreset> for BatchConfig {
    fn from(preset: BatchingPreset) -> Self {
        match preset {
            BatchingPreset::HighThroughput => BatchConfig::high_throughput(),
            BatchingPreset::Balanced => BatchConfig::balanced(),
            BatchingPreset::LowLatency => BatchConfig::low_latency(),
        }
    }
}

#[derive(Debug, Parser)]
pub struct Args {
    /// The number of messages to publish
    #[arg(long, default_value_t = 1_000_000)]
    pub num_of_messages: u64,

    /// The number of tasks publishing concurrently through the same publisher
    #[arg(long, default_value_t = 10)]
    pub num_of_publishers: u64,

    /// Size (in bytes) of the message payload
    #[arg(long, default_value_t = 32)]
    pub message_size: u64,

    /// The batching thresholds to publish with
    #[arg(long, value_enum, default_value_t = BatchingPreset::HighThroughput)]
    pub batching: BatchingPreset,

    /// Simulated round-trip time (in milliseconds) of every batch sent
    #[arg(long, default_value_t = 1)]
    pub service_latency_ms: u64,

    /// Probability that the simulated service fails a batch with a retryable error
    #[arg(long, default_value_t = 0.0)]
    pub failure_rate: f64,

    /// Ceiling on outstanding messages; publishers block once it is reached
    #[arg(long)]
    pub max_outstanding_messages: Option<usize>,
}
