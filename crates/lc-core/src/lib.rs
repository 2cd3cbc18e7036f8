//! lootcycle core library
//!
//! Reconstructs kill cycles from a hunting chat log and analyzes their
//! return distribution:
//! - Line classification into typed events
//! - Kill cycle accumulation with scrap bonus attribution
//! - Efficiency/looter normalization
//! - Return summary and tier segmentation
//! - Whole-log aggregate counters and a loot simulator
//!
//! The binary entry point is in `main.rs`.

pub mod aggregate;
pub mod analysis;
pub mod cycle;
pub mod dataset;
pub mod events;
pub mod exit_codes;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod simulate;

pub use cycle::{KillCycle, KillCycleAccumulator};
pub use dataset::Dataset;
