pub mod event;

pub use event::{DomainEvent, EventKind};
