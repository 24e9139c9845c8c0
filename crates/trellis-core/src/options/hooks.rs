use std::fmt;
use std::rc::Rc;

use crate::instance::Instance;
use crate::kernel::error::Result;

/// Named lifecycle stages an instance passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    BeforeDestroy,
    Destroyed,
    Activated,
    Deactivated,
    ErrorCaptured,
    ServerPrefetch,
}

impl LifecycleHook {
    /// Every lifecycle stage, in declaration order.
    pub const ALL: [LifecycleHook; 12] = [
        LifecycleHook::BeforeCreate,
        LifecycleHook::Created,
        LifecycleHook::BeforeMount,
        LifecycleHook::Mounted,
        LifecycleHook::BeforeUpdate,
        LifecycleHook::Updated,
        LifecycleHook::BeforeDestroy,
        LifecycleHook::Destroyed,
        LifecycleHook::Activated,
        LifecycleHook::Deactivated,
        LifecycleHook::ErrorCaptured,
        LifecycleHook::ServerPrefetch,
    ];

    /// The option key under which hooks for this stage are stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleHook::BeforeCreate => "beforeCreate",
            LifecycleHook::Created => "created",
            LifecycleHook::BeforeMount => "beforeMount",
            LifecycleHook::Mounted => "mounted",
            LifecycleHook::BeforeUpdate => "beforeUpdate",
            LifecycleHook::Updated => "updated",
            LifecycleHook::BeforeDestroy => "beforeDestroy",
            LifecycleHook::Destroyed => "destroyed",
            LifecycleHook::Activated => "activated",
            LifecycleHook::Deactivated => "deactivated",
            LifecycleHook::ErrorCaptured => "errorCaptured",
            LifecycleHook::ServerPrefetch => "serverPrefetch",
        }
    }

    /// Parse an option key back into a stage.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|hook| hook.as_str() == key)
    }

    /// Name of the event emitted after this stage's hooks ran.
    pub fn event_name(&self) -> String {
        format!("hook:{}", self.as_str())
    }
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type HookCallback = dyn Fn(&Rc<Instance>) -> Result<()>;

/// A single lifecycle hook callback with a label used in logs and traces.
#[derive(Clone)]
pub struct HookFn {
    label: Rc<str>,
    callback: Rc<HookCallback>,
}

impl HookFn {
    pub fn new<F>(label: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Rc<Instance>) -> Result<()> + 'static,
    {
        Self {
            label: Rc::from(label.into()),
            callback: Rc::new(callback),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the hook against `vm`.
    pub fn call(&self, vm: &Rc<Instance>) -> Result<()> {
        (self.callback)(vm)
    }

    /// Whether both handles refer to the same callback.
    pub fn ptr_eq(&self, other: &HookFn) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.callback), Rc::as_ptr(&other.callback))
    }
}

impl fmt::Debug for HookFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HookFn").field(&self.label).finish()
    }
}

/// Ordered hook callbacks registered for one lifecycle stage.
pub type HookList = Rc<[HookFn]>;

/// An empty hook list.
pub fn empty_hooks() -> HookList {
    Rc::from(Vec::new())
}
