//! Configuration structures for release runs.
//!
//! Settings are built once from the manifest and command line and then
//! shared read-only by the packaging and publishing steps.

mod builder;
mod core;
mod package;
mod publish;

pub use builder::SettingsBuilder;
pub use core::{Archiver, Settings};
pub use package::PackageSettings;
pub use publish::{
    ChecksumSettings, DEFAULT_TAP, FormulaSettings, TapSettings,
};
