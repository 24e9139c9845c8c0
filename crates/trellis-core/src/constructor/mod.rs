//! # Constructors and the Option Store
//!
//! Every component type is represented by a [`ConstructorId`]. The
//! [`OptionStore`](store::OptionStore) owns one [`ConstructorRecord`] per
//! constructor: its effective options plus the bookkeeping the resolver needs
//! to notice that an ancestor's options changed identity.
//!
//! Asset registries refer to constructors by id, so a constructor can list
//! itself as a component without creating a reference cycle.
pub mod resolve;
pub mod store;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::options::{OptionValue, Options};

pub use store::OptionStore;

/// Handle to a constructor registered in an [`OptionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstructorId(pub(crate) u32);

impl ConstructorId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ConstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctor#{}", self.0)
    }
}

/// Cached option state of one constructor.
#[derive(Debug)]
pub struct ConstructorRecord {
    pub(crate) id: ConstructorId,
    /// The constructor this one was extended from (`super`).
    pub(crate) parent: Option<ConstructorId>,
    /// Current effective options.
    pub(crate) options: Rc<Options>,
    /// Parent's effective options at the last resolution.
    pub(crate) super_options: Option<Rc<Options>>,
    /// Definition supplied when the constructor was declared.
    pub(crate) extend_options: Rc<Options>,
    /// Shallow snapshot of `options` taken right after the last resolution.
    pub(crate) sealed_options: BTreeMap<String, OptionValue>,
}

impl ConstructorRecord {
    pub(crate) fn base(id: ConstructorId, options: Rc<Options>) -> Self {
        let sealed_options = options.snapshot();
        Self {
            id,
            parent: None,
            extend_options: Rc::new(Options::new()),
            options,
            super_options: None,
            sealed_options,
        }
    }

    pub fn id(&self) -> ConstructorId {
        self.id
    }

    pub fn parent(&self) -> Option<ConstructorId> {
        self.parent
    }

    pub fn options(&self) -> &Rc<Options> {
        &self.options
    }

    pub fn super_options(&self) -> Option<&Rc<Options>> {
        self.super_options.as_ref()
    }

    pub fn extend_options(&self) -> &Rc<Options> {
        &self.extend_options
    }

    pub fn sealed_options(&self) -> &BTreeMap<String, OptionValue> {
        &self.sealed_options
    }

    /// Re-take the sealed snapshot from the current options.
    pub(crate) fn seal(&mut self) {
        self.sealed_options = self.options.snapshot();
    }
}
