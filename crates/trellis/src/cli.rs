use std::path::Path;
use std::rc::Rc;

use serde_json::Value;
use trellis_core::definition::{HookBinder, load_definition};
use trellis_core::instance::{ComponentVNodeOptions, Instance, Subsystems, VNode, defaults};
use trellis_core::options::{Callable, HookFn, LifecycleHook, OptionValue, RenderFn, callable, render_fn};
use trellis_core::{ConstructorId, Result, Runtime};

/// Collaborator set that prints every call before running the default
/// behaviour.
#[derive(Debug, Default)]
pub struct TracingSubsystems;

impl TracingSubsystems {
    fn trace(vm: &Instance, step: &str) {
        println!("[{}#{}] {}", vm.display_name(), vm.uid(), step);
    }
}

impl Subsystems for TracingSubsystems {
    fn init_proxy(&self, vm: &Rc<Instance>) -> Result<()> {
        Self::trace(vm, "initProxy");
        vm.set_render_proxy(trellis_core::RenderProxy::Guarded);
        Ok(())
    }

    fn init_lifecycle(&self, vm: &Rc<Instance>) -> Result<()> {
        Self::trace(vm, "initLifecycle");
        defaults::init_lifecycle(vm)
    }

    fn init_events(&self, vm: &Rc<Instance>) -> Result<()> {
        Self::trace(vm, "initEvents");
        defaults::init_events(vm)
    }

    fn init_render(&self, vm: &Rc<Instance>) -> Result<()> {
        Self::trace(vm, "initRender");
        defaults::init_render(vm)
    }

    fn call_hook(&self, vm: &Rc<Instance>, hook: LifecycleHook) -> Result<()> {
        Self::trace(vm, hook.as_str());
        defaults::call_hook(vm, hook)
    }

    fn init_injections(&self, vm: &Rc<Instance>) -> Result<()> {
        Self::trace(vm, "initInjections");
        defaults::init_injections(vm)
    }

    fn init_state(&self, vm: &Rc<Instance>) -> Result<()> {
        Self::trace(vm, "initState");
        defaults::init_state(vm)
    }

    fn init_provide(&self, vm: &Rc<Instance>) -> Result<()> {
        Self::trace(vm, "initProvide");
        defaults::init_provide(vm)
    }

    fn mount(&self, vm: &Rc<Instance>, target: &str) -> Result<()> {
        Self::trace(vm, &format!("mount {}", target));
        self.call_hook(vm, LifecycleHook::BeforeMount)?;
        defaults::render(vm)?;
        vm.set_mount_target(Some(target));
        vm.set_mounted(true);
        self.call_hook(vm, LifecycleHook::Mounted)
    }
}

/// Binds definition labels to callbacks that print what they were asked to
/// do.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintingBinder;

impl HookBinder for PrintingBinder {
    fn hook(&self, stage: LifecycleHook, label: &str) -> HookFn {
        let name = label.to_string();
        HookFn::new(label, move |vm| {
            println!("[{}#{}]   hook {}: {}", vm.display_name(), vm.uid(), stage, name);
            Ok(())
        })
    }

    fn method(&self, name: &str) -> Callable {
        let name = name.to_string();
        callable(move |vm, args| {
            println!("[{}#{}]   method {}({})", vm.display_name(), vm.uid(), name, args.len());
            Ok(Value::Null)
        })
    }

    fn watcher(&self, key: &str, label: &str) -> Callable {
        let key = key.to_string();
        let label = label.to_string();
        callable(move |vm, args| {
            println!("[{}#{}]   watch {} -> {}: {:?}", vm.display_name(), vm.uid(), key, label, args);
            Ok(Value::Null)
        })
    }

    fn render(&self, template: &str) -> Option<RenderFn> {
        let template = template.to_string();
        Some(render_fn(move |_| Ok(VNode::text(template.clone()))))
    }
}

/// Load `file` and declare it as a constructor extending the base.
fn declare(runtime: &Runtime, file: &Path) -> Result<ConstructorId> {
    let definition = load_definition(file)?;
    let options = definition.to_options(&PrintingBinder)?;
    runtime.extend(runtime.base(), options)
}

/// `trellis init`
pub fn run_init(runtime: &Runtime, file: &Path, children: bool) -> Result<()> {
    let ctor = declare(runtime, file)?;
    let root = runtime.new_instance(ctor, trellis_core::InstanceConfig::empty())?;
    print_summary(&root);

    if children {
        let Some(registry) = root.options().components() else {
            return Ok(());
        };
        let own_name = root.options().name();
        let mut names = registry.keys();
        names.sort();
        for name in names {
            if own_name.as_deref() == Some(name.as_str()) {
                continue;
            }
            let Some(child_ctor) = runtime.component_constructor(&root, &name)? else {
                continue;
            };
            let vnode = Rc::new(VNode::component(ComponentVNodeOptions::new(child_ctor).with_tag(name.as_str())));
            let child = runtime.create_component_instance(&root, vnode)?;
            if let Some(target) = root.mount_target() {
                runtime.mount(&child, &target)?;
            }
            print_summary(&child);
        }
    }
    Ok(())
}

/// `trellis resolve`
pub fn run_resolve(runtime: &Runtime, file: &Path) -> Result<()> {
    let ctor = declare(runtime, file)?;
    let options = runtime.store().resolve(ctor)?;
    println!("{} {}", ctor, options.name().unwrap_or_else(|| "(anonymous)".to_string()));
    let mut keys = options.keys();
    keys.sort();
    for key in keys {
        if let Some(value) = options.get(&key) {
            println!("  {}: {}", key, describe(&value));
        }
    }
    Ok(())
}

fn print_summary(vm: &Instance) {
    println!("instance {} uid={} ctor={}", vm.display_name(), vm.uid(), vm.constructor());
    println!("  state: {}", vm.state());
    match vm.mount_target() {
        Some(target) => println!("  mounted: {}", target),
        None => println!("  mounted: no"),
    }
    if let Some(parent) = vm.parent() {
        println!("  parent: {}#{}", parent.display_name(), parent.uid());
    }
}

fn describe(value: &OptionValue) -> String {
    match value {
        OptionValue::Value(value) => value.to_string(),
        OptionValue::Hooks(hooks) => {
            let labels: Vec<&str> = hooks.iter().map(HookFn::label).collect();
            format!("{} hook(s) [{}]", hooks.len(), labels.join(", "))
        }
        OptionValue::Assets(registry) => format!("[{}]", registry.keys().join(", ")),
        OptionValue::Functions(functions) => {
            format!("[{}]", functions.keys().cloned().collect::<Vec<_>>().join(", "))
        }
        OptionValue::Watch(watch) => format!("[{}]", watch.keys().cloned().collect::<Vec<_>>().join(", ")),
        OptionValue::Constructor(id) => id.to_string(),
        other => other.kind().to_string(),
    }
}
