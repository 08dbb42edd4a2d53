//! # Domain Models Module

pub mod auth;
pub mod events;
pub mod token;
