//! Shared utilities

pub mod log_sampler;
pub mod time;
