//! Tracing initialization shared by the watchpost binaries.

mod tracing;

pub use crate::tracing::init_tracing;
