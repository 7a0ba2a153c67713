//! Command execution functions for release operations.
//!
//! [`release`] packages the archives and hands off to [`publish_formula`]
//! when publishing was requested.

mod publish;
mod release;

pub use publish::{authenticated_remote, commit_message, publish_formula};
pub use release::release;
