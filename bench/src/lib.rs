//! Benchmark utilities for the event aggregator.
//!
//! - **Microbenchmarks**: subscribe, unsubscribe and publish fan-out in isolation
//! - **Churn**: a seeded mix of subscriptions, removals and publishes
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p aggregator_bench
//!
//! # Run a specific benchmark group
//! cargo bench -p aggregator_bench -- publish
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports.

pub mod churn;
pub mod events;
