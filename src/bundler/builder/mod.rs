//! Packaging orchestration and artifact checksums.
//!
//! - [`checksum`] - SHA-256 of artifacts, in-process and via an external utility
//! - [`orchestrator`] - The [`Bundler`] that packages all platforms concurrently
//! - [`tool_detection`] - `PATH` lookups for the external tools a run needs

pub mod checksum;
mod orchestrator;
pub mod tool_detection;

pub use orchestrator::Bundler;
