use serde_json::Value;

use crate::instance::VNode;
use crate::options::{Callable, HookFn, LifecycleHook, RenderFn, callable, render_fn};

/// Turns the labels named in a definition file into callbacks.
///
/// Definition files cannot carry code; each hook, method or watcher entry is
/// a label the binder maps to behaviour.
pub trait HookBinder {
    fn hook(&self, stage: LifecycleHook, label: &str) -> HookFn;

    fn method(&self, name: &str) -> Callable;

    fn watcher(&self, key: &str, label: &str) -> Callable;

    /// Render function for a `template` string, if the binder provides one.
    fn render(&self, template: &str) -> Option<RenderFn> {
        let _ = template;
        None
    }
}

/// Binder whose callbacks only log that they ran.
///
/// Methods echo their arguments back as an array. Templates render to a
/// single text node holding the template source.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBinder;

impl HookBinder for LoggingBinder {
    fn hook(&self, stage: LifecycleHook, label: &str) -> HookFn {
        let name = label.to_string();
        HookFn::new(label, move |vm| {
            log::info!("{} {} hook '{}'", vm.display_name(), stage, name);
            Ok(())
        })
    }

    fn method(&self, name: &str) -> Callable {
        let name = name.to_string();
        callable(move |vm, args| {
            log::info!("{} method '{}' called with {} argument(s)", vm.display_name(), name, args.len());
            Ok(Value::Array(args.to_vec()))
        })
    }

    fn watcher(&self, key: &str, label: &str) -> Callable {
        let key = key.to_string();
        let label = label.to_string();
        callable(move |vm, args| {
            log::info!(
                "{} watcher '{}' saw '{}' change: {:?}",
                vm.display_name(),
                label,
                key,
                args
            );
            Ok(Value::Null)
        })
    }

    fn render(&self, template: &str) -> Option<RenderFn> {
        let template = template.to_string();
        Some(render_fn(move |_| Ok(VNode::text(template.clone()))))
    }
}
