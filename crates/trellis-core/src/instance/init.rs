//! Instance initialization.
//!
//! [`initialize`] drives a new instance through a fixed sequence: identity,
//! option setup, render proxy, self-reference, then the collaborator steps in
//! [`InitStep::SEQUENCE`] order, and finally an optional auto-mount.

use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::constructor::ConstructorId;
use crate::instance::internal::{InternalDescriptor, build_internal};
use crate::instance::{Instance, RenderProxy, Subsystems};
use crate::kernel::Runtime;
use crate::kernel::error::Result;
use crate::options::{LifecycleHook, Options, merge_options};

/// What an instance is created from.
#[derive(Debug, Clone)]
pub enum InstanceConfig {
    /// Created by user code, optionally with extra options merged over the
    /// constructor's.
    Root(Option<Rc<Options>>),
    /// Created by the runtime for a component placeholder.
    Internal(InternalDescriptor),
}

impl InstanceConfig {
    pub fn empty() -> Self {
        InstanceConfig::Root(None)
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, InstanceConfig::Internal(_))
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Rc<Options>> for InstanceConfig {
    fn from(options: Rc<Options>) -> Self {
        InstanceConfig::Root(Some(options))
    }
}

impl From<Options> for InstanceConfig {
    fn from(options: Options) -> Self {
        InstanceConfig::Root(Some(Rc::new(options)))
    }
}

impl From<InternalDescriptor> for InstanceConfig {
    fn from(descriptor: InternalDescriptor) -> Self {
        InstanceConfig::Internal(descriptor)
    }
}

/// A collaborator step of the initialization sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitStep {
    InitLifecycle,
    InitEvents,
    InitRender,
    BeforeCreate,
    InitInjections,
    InitState,
    InitProvide,
    Created,
}

impl InitStep {
    /// Collaborator steps in the order every instance runs them.
    pub const SEQUENCE: [InitStep; 8] = [
        InitStep::InitLifecycle,
        InitStep::InitEvents,
        InitStep::InitRender,
        InitStep::BeforeCreate,
        InitStep::InitInjections,
        InitStep::InitState,
        InitStep::InitProvide,
        InitStep::Created,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InitStep::InitLifecycle => "initLifecycle",
            InitStep::InitEvents => "initEvents",
            InitStep::InitRender => "initRender",
            InitStep::BeforeCreate => "beforeCreate",
            InitStep::InitInjections => "initInjections",
            InitStep::InitState => "initState",
            InitStep::InitProvide => "initProvide",
            InitStep::Created => "created",
        }
    }

    /// Hand `vm` to the collaborator responsible for this step.
    pub fn run(self, subsystems: &dyn Subsystems, vm: &Rc<Instance>) -> Result<()> {
        match self {
            InitStep::InitLifecycle => subsystems.init_lifecycle(vm),
            InitStep::InitEvents => subsystems.init_events(vm),
            InitStep::InitRender => subsystems.init_render(vm),
            InitStep::BeforeCreate => subsystems.call_hook(vm, LifecycleHook::BeforeCreate),
            InitStep::InitInjections => subsystems.init_injections(vm),
            InitStep::InitState => subsystems.init_state(vm),
            InitStep::InitProvide => subsystems.init_provide(vm),
            InitStep::Created => subsystems.call_hook(vm, LifecycleHook::Created),
        }
    }
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where `initialize` is, for step logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Proxy,
    Step(InitStep),
    Mount,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Proxy => f.write_str("initProxy"),
            Phase::Step(step) => fmt::Display::fmt(step, f),
            Phase::Mount => f.write_str("mount"),
        }
    }
}

/// Create and initialize an instance of `ctor`.
pub(crate) fn initialize(runtime: &Runtime, ctor: ConstructorId, config: InstanceConfig) -> Result<Rc<Instance>> {
    let settings = runtime.config();
    let vm = Rc::new(Instance::new(runtime.next_uid(), ctor));
    let started = (settings.diagnostics && settings.performance).then(Instant::now);
    log::debug!("Initializing instance {} of {}", vm.uid(), ctor);

    let options = match config {
        InstanceConfig::Internal(descriptor) => build_internal(runtime.store(), &vm, descriptor)?,
        InstanceConfig::Root(raw) => {
            let resolved = runtime.store().resolve(ctor)?;
            let raw = raw.unwrap_or_else(|| Rc::new(Options::new()));
            merge_options(&resolved, &raw, Some(vm.as_ref()))
        }
    };
    vm.set_options(options);

    let subsystems = runtime.subsystems();
    if settings.diagnostics {
        run_phase(&vm, Phase::Proxy, || subsystems.init_proxy(&vm))?;
    } else {
        vm.set_render_proxy(RenderProxy::Passthrough);
    }
    vm.expose_self();

    for step in InitStep::SEQUENCE {
        run_phase(&vm, Phase::Step(step), || step.run(subsystems, &vm))?;
    }

    if let Some(started) = started {
        log::info!("{} init: {:?}", vm.display_name(), started.elapsed());
    }

    if let Some(target) = vm.options().el() {
        run_phase(&vm, Phase::Mount, || subsystems.mount(&vm, &target))?;
    }
    Ok(vm)
}

fn run_phase(vm: &Instance, phase: Phase, f: impl FnOnce() -> Result<()>) -> Result<()> {
    log::trace!("{} [uid {}] {}", vm.display_name(), vm.uid(), phase);
    f().inspect_err(|e| log::error!("{} failed during {}: {}", vm.display_name(), phase, e))
}
