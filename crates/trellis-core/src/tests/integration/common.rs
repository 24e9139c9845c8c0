#![cfg(test)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::kernel::{Runtime, RuntimeConfig};
use crate::options::{HookFn, LifecycleHook, Options};

pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Development runtime whose warnings land in the returned journal.
pub fn warning_runtime() -> (Runtime, Journal) {
    let warnings = journal();
    let sink = warnings.clone();
    let config = RuntimeConfig::development().with_warn_handler(move |msg| sink.borrow_mut().push(msg.to_string()));
    (Runtime::new(config), warnings)
}

/// Hook that appends `<label>` to `journal` when it runs.
pub fn recording_hook(journal: &Journal, label: &str) -> HookFn {
    let journal = journal.clone();
    let entry = label.to_string();
    HookFn::new(label, move |_| {
        journal.borrow_mut().push(entry.clone());
        Ok(())
    })
}

/// Options whose `hook` appends `label` to `journal`.
pub fn options_with_hook(journal: &Journal, hook: LifecycleHook, label: &str) -> Options {
    Options::new().with_hook(hook, recording_hook(journal, label))
}
