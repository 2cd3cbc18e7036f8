//! Analysis over a completed dataset.

pub mod segment;
pub mod summary;

pub use segment::{DistributionGroup, DistributionSegmenter, GroupKind, Segmentation};
pub use summary::{summarize, ReturnBand, Summary};
