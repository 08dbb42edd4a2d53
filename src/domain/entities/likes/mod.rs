pub mod like;

pub use like::{Like, LikeChanges, LikeFilter, LikeResponse, NewLike};
