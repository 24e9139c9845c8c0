//! # Trellis Core Kernel
//!
//! The `kernel` module holds the [`Runtime`](runtime::Runtime), the object
//! that owns the constructor registry and creates instances, together with
//! the pieces every other module leans on.
//!
//! ## Key Components:
//!
//! - **Runtime**: constructor declaration, global asset registration and
//!   instance creation, in the `runtime` submodule.
//! - **Configuration**: [`RuntimeConfig`](config::RuntimeConfig) toggles
//!   diagnostics and performance marks.
//! - **Diagnostics**: usage warnings and component name validation.
//! - **Constants**: option key names and display names.
//! - **Error Handling**: [`Error`](error::Error) and the `Result` alias.
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod runtime;

pub use config::{RuntimeConfig, WarnHandler};
pub use error::{Error, Result};
pub use runtime::Runtime;
