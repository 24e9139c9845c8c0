//! # Trellis Core Kernel Errors
//!
//! Defines the error type shared by every Trellis subsystem.
//!
//! This module includes [`Error`], the primary enum covering failures that can
//! surface while resolving constructor options, running lifecycle hooks,
//! rendering, or loading component definitions from disk. Errors raised by
//! collaborators during instance initialization are propagated unchanged.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::constructor::ConstructorId;
use crate::definition::error::DefinitionError;
use crate::options::LifecycleHook;

/// Error type for the Trellis runtime
#[derive(Debug, ThisError)]
pub enum Error {
    /// A constructor handle that the option store does not know about.
    #[error("Constructor {0} is not registered in the option store")]
    UnknownConstructor(ConstructorId),

    /// A lifecycle hook returned an error.
    #[error("Lifecycle hook '{hook}' failed on {component}: {message}")]
    HookFailed {
        hook: LifecycleHook,
        component: String,
        message: String,
    },

    /// A method was invoked that the instance's options do not declare.
    #[error("Method '{name}' is not defined on {component}")]
    MethodNotFound { name: String, component: String },

    /// The render function of an instance failed.
    #[error("Render failed for {component}: {message}")]
    RenderFailed { component: String, message: String },

    /// Loading or converting a component definition failed.
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
