//! Subscout-Common: shared types, constants, and utilities.
//!
//! This crate provides common functionality used across subscout:
//!
//! - **Error Handling**: the unified error type and result alias
//! - **Language Codes**: validated ISO-639-1 language codes
//! - **Path Utilities**: functions to detect file types by extension
//!
//! # Examples
//!
//! ```
//! use subscout_common::{Error, LanguageCode, Result};
//! use subscout_common::paths::is_video_file;
//! use std::path::Path;
//!
//! // Parse and validate a language code
//! let lang: LanguageCode = "en".parse().unwrap();
//! assert_eq!(lang.as_str(), "en");
//!
//! // Check file types
//! assert!(is_video_file(Path::new("movie.mkv")));
//!
//! // Use common error types
//! fn example() -> Result<()> {
//!     Err(Error::invalid_language("xx"))
//! }
//! ```

pub mod error;
pub mod language;
pub mod paths;

pub use error::{Error, Result};
pub use language::LanguageCode;
