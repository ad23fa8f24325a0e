//! Subscout - concurrent subtitle search and download engine
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod engine;
pub mod provider;
pub mod ranking;
pub mod scanner;
pub mod scheduler;
pub mod subtitle;
pub mod video;

pub use engine::{EngineOptions, SubtitleEngine};
pub use provider::{ProviderRegistry, SubtitleProvider};
pub use subtitle::Subtitle;
pub use video::{Video, VideoKind};
