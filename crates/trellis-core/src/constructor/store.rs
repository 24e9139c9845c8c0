use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::constructor::{ConstructorId, ConstructorRecord};
use crate::kernel::constants::keys;
use crate::kernel::error::{Error, Result};
use crate::options::{Asset, AssetKind, AssetRegistry, OptionValue, Options, merge_options};

/// Per-constructor cache of resolved options.
///
/// The store is created with a base constructor whose options carry empty
/// component/directive/filter registries and the `_base` marker. Every other
/// constructor is declared through [`OptionStore::extend`]. Records are never
/// removed.
#[derive(Debug)]
pub struct OptionStore {
    records: RefCell<Vec<ConstructorRecord>>,
    /// (parent, definition address) -> constructor declared from that pair.
    extend_cache: RefCell<HashMap<(ConstructorId, usize), ConstructorId>>,
}

impl OptionStore {
    /// Create a store holding only the base constructor.
    pub fn new() -> Self {
        let base = ConstructorId(0);
        let options = Options::new();
        for kind in AssetKind::ALL {
            options.set(kind.key(), OptionValue::Assets(Rc::new(AssetRegistry::new())));
        }
        options.set(keys::BASE, OptionValue::Constructor(base));
        Self {
            records: RefCell::new(vec![ConstructorRecord::base(base, Rc::new(options))]),
            extend_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The root of every constructor chain.
    pub fn base(&self) -> ConstructorId {
        ConstructorId(0)
    }

    /// Number of declared constructors, including the base.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn contains(&self, id: ConstructorId) -> bool {
        id.index() < self.len()
    }

    /// Run `f` against the record for `id`.
    pub fn with_record<T>(&self, id: ConstructorId, f: impl FnOnce(&ConstructorRecord) -> T) -> Result<T> {
        let records = self.records.borrow();
        let record = records.get(id.index()).ok_or(Error::UnknownConstructor(id))?;
        Ok(f(record))
    }

    pub(crate) fn with_record_mut<T>(
        &self,
        id: ConstructorId,
        f: impl FnOnce(&mut ConstructorRecord) -> T,
    ) -> Result<T> {
        let mut records = self.records.borrow_mut();
        let record = records.get_mut(id.index()).ok_or(Error::UnknownConstructor(id))?;
        Ok(f(record))
    }

    /// Current options of `id`, without checking ancestors for changes.
    ///
    /// The returned object is the live cache entry: setting a field on it is a
    /// late modification that the next re-resolution preserves.
    pub fn options(&self, id: ConstructorId) -> Result<Rc<Options>> {
        self.with_record(id, |record| record.options.clone())
    }

    pub fn parent(&self, id: ConstructorId) -> Result<Option<ConstructorId>> {
        self.with_record(id, |record| record.parent)
    }

    pub fn super_options(&self, id: ConstructorId) -> Result<Option<Rc<Options>>> {
        self.with_record(id, |record| record.super_options.clone())
    }

    pub fn extend_options(&self, id: ConstructorId) -> Result<Rc<Options>> {
        self.with_record(id, |record| record.extend_options.clone())
    }

    /// Replace the options of `id` with a new object.
    ///
    /// Descendants notice the identity change on their next resolution. The
    /// sealed snapshot is left alone, so fields that differ from it are carried
    /// over as late modifications when `id` itself is re-resolved.
    pub fn replace_options(&self, id: ConstructorId, options: Rc<Options>) -> Result<()> {
        self.with_record_mut(id, |record| record.options = options)
    }

    /// Declare a constructor extending `parent` with `definition`.
    ///
    /// Extending the same definition object from the same parent twice returns
    /// the constructor created the first time.
    pub fn extend(&self, parent: ConstructorId, definition: Rc<Options>) -> Result<ConstructorId> {
        let cache_key = (parent, Rc::as_ptr(&definition) as usize);
        if let Some(existing) = self.extend_cache.borrow().get(&cache_key) {
            log::trace!("Reusing {} for repeated extend of {}", existing, parent);
            return Ok(*existing);
        }

        let super_options = self.resolve(parent)?;
        let options = merge_options(&super_options, &definition, None);
        let id = ConstructorId(self.len() as u32);
        if let Some(name) = options.name() {
            register_self(&options, &name, id);
        }

        let mut record = ConstructorRecord {
            id,
            parent: Some(parent),
            options,
            super_options: Some(super_options),
            extend_options: definition,
            sealed_options: Default::default(),
        };
        record.seal();
        self.records.borrow_mut().push(record);
        self.extend_cache.borrow_mut().insert(cache_key, id);
        log::debug!("Declared {} extending {}", id, parent);
        Ok(id)
    }

    /// Register `asset` under `name` in the `kind` registry of `id`'s options.
    ///
    /// The registry is amended in place, so descendants whose registries fall
    /// back to it see the entry without re-resolution.
    pub fn register_asset(&self, id: ConstructorId, kind: AssetKind, name: &str, asset: Asset) -> Result<()> {
        let options = self.options(id)?;
        let registry = match options.assets(kind) {
            Some(registry) => registry,
            None => {
                let registry = Rc::new(AssetRegistry::new());
                options.set(kind.key(), OptionValue::Assets(registry.clone()));
                registry
            }
        };
        registry.set(name, asset);
        Ok(())
    }
}

impl Default for OptionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Make a named constructor resolvable from its own component registry.
pub(crate) fn register_self(options: &Options, name: &str, id: ConstructorId) {
    let registry = match options.components() {
        Some(registry) => registry,
        None => {
            let registry = Rc::new(AssetRegistry::new());
            options.set(keys::COMPONENTS, OptionValue::Assets(registry.clone()));
            registry
        }
    };
    registry.set(name, Asset::Constructor(id));
}
