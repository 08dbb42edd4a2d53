pub mod tag;

pub use tag::{NewTag, Tag, TagChanges, TagFilter, TagResponse};
