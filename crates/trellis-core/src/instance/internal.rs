//! Option setup for child instances created while a parent renders.
//!
//! Such instances skip the full merge: their options are a thin layer over
//! the constructor's resolved options carrying only the per-placement fields.

use std::fmt;
use std::rc::Rc;

use crate::constructor::OptionStore;
use crate::instance::{Instance, VNode};
use crate::kernel::constants::keys;
use crate::kernel::error::Result;
use crate::options::{OptionValue, Options, RenderFn};

/// Placement of a child instance inside its parent's render output.
#[derive(Clone)]
pub struct InternalDescriptor {
    pub parent: Rc<Instance>,
    pub parent_vnode: Rc<VNode>,
    /// Inline render function overriding the constructor's.
    pub render: Option<RenderFn>,
    pub static_render_fns: Option<Rc<[RenderFn]>>,
}

impl InternalDescriptor {
    pub fn new(parent: Rc<Instance>, parent_vnode: Rc<VNode>) -> Self {
        Self {
            parent,
            parent_vnode,
            render: None,
            static_render_fns: None,
        }
    }

    pub fn with_render(mut self, render: RenderFn, static_render_fns: Option<Rc<[RenderFn]>>) -> Self {
        self.render = Some(render);
        self.static_render_fns = static_render_fns;
        self
    }
}

impl fmt::Debug for InternalDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalDescriptor")
            .field("parent", &self.parent.uid())
            .field("parent_vnode", &self.parent_vnode.tag)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// Build the options of an internally created instance.
///
/// Every field not set here is read through to the constructor's resolved
/// options.
pub fn build_internal(store: &OptionStore, vm: &Instance, descriptor: InternalDescriptor) -> Result<Rc<Options>> {
    let options = Options::with_fallback(store.resolve(vm.constructor())?);
    let InternalDescriptor {
        parent,
        parent_vnode,
        render,
        static_render_fns,
    } = descriptor;

    options.set(keys::PARENT, OptionValue::Parent(Rc::downgrade(&parent)));
    if let Some(component) = &parent_vnode.component {
        if let Some(props) = &component.props_data {
            options.set(keys::PROPS_DATA, OptionValue::Value(props.clone()));
        }
        if let Some(listeners) = &component.listeners {
            options.set(keys::PARENT_LISTENERS, OptionValue::Listeners(listeners.clone()));
        }
        options.set(keys::RENDER_CHILDREN, OptionValue::Children(component.children.clone()));
        if let Some(tag) = &component.tag {
            options.set(keys::COMPONENT_TAG, OptionValue::Value(tag.clone().into()));
        }
    }
    options.set(keys::PARENT_VNODE, OptionValue::Vnode(parent_vnode));

    if let Some(render) = render {
        options.set(keys::RENDER, OptionValue::Render(render));
        if let Some(static_render_fns) = static_render_fns {
            options.set(keys::STATIC_RENDER_FNS, OptionValue::StaticRenderFns(static_render_fns));
        }
    }
    Ok(Rc::new(options))
}
