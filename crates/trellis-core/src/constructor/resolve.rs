//! Constructor option resolution.
//!
//! Resolution walks the constructor chain up to the base. A constructor whose
//! recorded `super_options` is still the very object its parent resolves to
//! returns its cached options untouched. Otherwise its options are rebuilt
//! from the new parent options and its original definition, carrying over any
//! fields that were changed on the cached options after they were sealed.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::constructor::store::register_self;
use crate::constructor::{ConstructorId, ConstructorRecord, OptionStore};
use crate::kernel::error::Result;
use crate::options::{OptionValue, Options, merge_options};

impl OptionStore {
    /// Effective options of `id`, rebuilding them if an ancestor changed.
    pub fn resolve(&self, id: ConstructorId) -> Result<Rc<Options>> {
        let (parent, current) = self.with_record(id, |record| (record.parent, record.options.clone()))?;
        let Some(parent) = parent else {
            return Ok(current);
        };

        let super_options = self.resolve(parent)?;
        let unchanged = self.with_record(id, |record| {
            record
                .super_options
                .as_ref()
                .is_some_and(|cached| Rc::ptr_eq(cached, &super_options))
        })?;
        if unchanged {
            log::trace!("Options of {} are current", id);
            return Ok(current);
        }

        log::debug!("Options of {} changed upstream, re-resolving", id);
        let extend_options = self.with_record_mut(id, |record| {
            record.super_options = Some(super_options.clone());
            if let Some(modified) = modified_options(record) {
                log::debug!(
                    "Carrying {} late modification(s) of {} into its definition: {:?}",
                    modified.len(),
                    id,
                    modified.keys().collect::<Vec<_>>()
                );
                for (key, value) in modified {
                    record.extend_options.set(key, value);
                }
            }
            record.extend_options.clone()
        })?;

        let options = merge_options(&super_options, &extend_options, None);
        if let Some(name) = options.name() {
            register_self(&options, &name, id);
        }
        self.with_record_mut(id, |record| {
            record.options = options.clone();
            record.seal();
        })?;
        Ok(options)
    }

    /// Fields of `id`'s current options that differ from its sealed snapshot.
    pub fn late_modifications(&self, id: ConstructorId) -> Result<Option<BTreeMap<String, OptionValue>>> {
        self.with_record(id, modified_options)
    }
}

/// Collect own fields of `record.options` whose value differs from the sealed
/// snapshot. Keys removed since sealing are not reported.
fn modified_options(record: &ConstructorRecord) -> Option<BTreeMap<String, OptionValue>> {
    let mut modified: Option<BTreeMap<String, OptionValue>> = None;
    for (key, latest) in record.options.snapshot() {
        let unchanged = record
            .sealed_options
            .get(&key)
            .is_some_and(|sealed| sealed.same_as(&latest));
        if !unchanged {
            modified.get_or_insert_with(BTreeMap::new).insert(key, latest);
        }
    }
    modified
}
