//! Domain logic - pure version rules independent of git operations

pub mod tag;
pub mod version;

pub use tag::{parse_version, parse_versions, TagSet};
pub use version::{Segment, Version};
