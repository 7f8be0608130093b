//! Common types for the `generate` command.
//!
//! This crate holds the CLI arguments shared by every store backend and
//! turns them into a validated [`PipelineConfig`](bulk_pipeline::PipelineConfig).

pub mod args;

pub use args::GenerateArgs;
