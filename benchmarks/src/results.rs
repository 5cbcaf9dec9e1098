use crate::args::Args;
use num_format::{Locale, ToFormattedString};
use selium_publisher::StatsSnapshot;
use std::{fmt::Display, time::Duration};

#[derive(Debug)]
pub struct BenchmarkResults {
    duration: Duration,
    args: Args,
    stats: StatsSnapshot,
    failed: u64,
    total_mb_transferred: f64,
    avg_throughput: f64,
    avg_latency: f64,
    avg_batch_size: f64,
}

impl BenchmarkResults {
    pub fn calculate(
        duration: Duration,
        message_size: usize,
        failed: u64,
        stats: StatsSnapshot,
        args: Args,
    ) -> Self {
        let total_bytes_transferred = stats.messages_published * message_size as u64;
        let total_mb_transferred = total_bytes_transferred as f64 / 1024.0 / 1024.0;
        let avg_throughput = total_mb_transferred / duration.as_secs_f64();
        let avg_latency = duration.as_nanos() as f64 / args.num_of_messages.max(1) as f64;
        let avg_batch_size = stats.messages_published as f64 / stats.batches_sent.max(1) as f64;

        Self {
            duration,
            args,
            stats,
            failed,
            total_mb_transferred,
            avg_throughput,
            avg_latency,
            avg_batch_size,
        }
    }
}

impl Display for BenchmarkResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = format!("{:.4} Secs", self.duration.as_secs_f64());
        let total_transferred = format!("{:.2} MB", self.total_mb_transferred);
        let avg_throughput = format!("{:.2} MB/s", self.avg_throughput);
        let avg_latency = format!("{:.2} ns", self.avg_latency);
        let avg_batch_size = format!("{:.2} msgs", self.avg_batch_size);

        let summary = format!(
            "
Benchmark Results
---------------------
Number of Messages: {}
Number of Publishers: {}
Batches Sent: {}
Retries: {}
Failed Messages: {}",
            self.args.num_of_messages.to_formatted_string(&Locale::en),
            self.args.num_of_publishers.to_formatted_string(&Locale::en),
            self.stats.batches_sent.to_formatted_string(&Locale::en),
            self.stats.retries.to_formatted_string(&Locale::en),
            self.failed.to_formatted_string(&Locale::en),
        );

        let header = format!(
            "| {: <20} | {: <20} | {: <20} | {: <20} | {: <20} |",
            "Duration", "Total Transferred", "Avg. Throughput", "Avg. Latency", "Avg. Batch Size"
        );

        let body = format!(
            "| {: <20} | {: <20} | {: <20} | {: <20} | {: <20} |",
            duration, total_transferred, avg_throughput, avg_latency, avg_batch_size
        );

        write!(f, "{summary}\n\n{header}\n{body}\n")
    }
}
