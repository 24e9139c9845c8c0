//! # Trellis Core
//!
//! Component instantiation for a tree-structured UI runtime: constructor
//! option resolution, option merging and the instance initialization
//! sequence.
//!
//! - [`kernel`]: the [`Runtime`], configuration, diagnostics and errors.
//! - [`options`]: option objects and merge strategies.
//! - [`constructor`]: the constructor registry and option resolution.
//! - [`instance`]: instances and their initialization.
//! - [`definition`]: loading component definitions from JSON, YAML or TOML.
pub mod constructor;
pub mod definition;
pub mod instance;
pub mod kernel;
pub mod options;

pub use constructor::{ConstructorId, OptionStore};
pub use instance::{
    ComponentVNodeOptions, DefaultSubsystems, Instance, InstanceConfig, InternalDescriptor, RenderProxy, Subsystems,
    VNode,
};
pub use kernel::{Error, Result, Runtime, RuntimeConfig};
pub use options::{Asset, AssetKind, HookFn, LifecycleHook, OptionValue, Options, merge_options};

#[cfg(test)]
mod tests;
