//! CLI command implementations.

pub mod audio;
pub mod common;
pub mod event;
pub mod info;
pub mod plots;
pub mod psd;
pub mod shift;
pub mod whiten;
