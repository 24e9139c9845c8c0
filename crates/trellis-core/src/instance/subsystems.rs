use std::rc::Rc;

use crate::instance::{Instance, RenderProxy, defaults};
use crate::kernel::error::Result;
use crate::options::LifecycleHook;

/// The collaborators invoked while an instance initializes.
///
/// Every method has a default implementation. Implementors override the
/// steps they need to observe or replace and may call into [`defaults`] for
/// the rest. An error returned from any step aborts initialization and is
/// handed to the caller unchanged.
pub trait Subsystems {
    /// Install the guarded render proxy. Only called with diagnostics on.
    fn init_proxy(&self, vm: &Rc<Instance>) -> Result<()> {
        vm.set_render_proxy(RenderProxy::Guarded);
        Ok(())
    }

    fn init_lifecycle(&self, vm: &Rc<Instance>) -> Result<()> {
        defaults::init_lifecycle(vm)
    }

    fn init_events(&self, vm: &Rc<Instance>) -> Result<()> {
        defaults::init_events(vm)
    }

    fn init_render(&self, vm: &Rc<Instance>) -> Result<()> {
        defaults::init_render(vm)
    }

    fn call_hook(&self, vm: &Rc<Instance>, hook: LifecycleHook) -> Result<()> {
        defaults::call_hook(vm, hook)
    }

    fn init_injections(&self, vm: &Rc<Instance>) -> Result<()> {
        defaults::init_injections(vm)
    }

    fn init_state(&self, vm: &Rc<Instance>) -> Result<()> {
        defaults::init_state(vm)
    }

    fn init_provide(&self, vm: &Rc<Instance>) -> Result<()> {
        defaults::init_provide(vm)
    }

    /// Attach `vm` to `target`.
    fn mount(&self, vm: &Rc<Instance>, target: &str) -> Result<()> {
        self.call_hook(vm, LifecycleHook::BeforeMount)?;
        defaults::render(vm)?;
        vm.set_mount_target(Some(target));
        vm.set_mounted(true);
        self.call_hook(vm, LifecycleHook::Mounted)
    }
}

/// Collaborators with every step left at its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSubsystems;

impl Subsystems for DefaultSubsystems {}
