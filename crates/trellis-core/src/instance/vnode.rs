use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::constructor::ConstructorId;
use crate::options::ListenerMap;

/// Minimal virtual node: enough to describe slot content and component
/// placeholders handed to child instances.
#[derive(Debug, Clone, Default)]
pub struct VNode {
    pub tag: Option<String>,
    pub text: Option<String>,
    /// Named slot this node is distributed into.
    pub slot: Option<String>,
    pub children: Vec<VNode>,
    /// Present when the node is a component placeholder.
    pub component: Option<ComponentVNodeOptions>,
}

impl VNode {
    pub fn element(tag: impl Into<String>, children: Vec<VNode>) -> Self {
        Self {
            tag: Some(tag.into()),
            children,
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// A component placeholder node.
    pub fn component(options: ComponentVNodeOptions) -> Self {
        Self {
            tag: options.tag.clone(),
            component: Some(options),
            ..Self::default()
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Whether this is a text node containing only whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.tag.is_none() && self.component.is_none() && self.text.as_deref().is_some_and(|t| t.trim().is_empty())
    }
}

/// Data a parent render attaches to a component placeholder.
#[derive(Clone)]
pub struct ComponentVNodeOptions {
    pub ctor: ConstructorId,
    pub tag: Option<String>,
    pub props_data: Option<Value>,
    pub listeners: Option<ListenerMap>,
    pub children: Rc<[VNode]>,
}

impl ComponentVNodeOptions {
    pub fn new(ctor: ConstructorId) -> Self {
        Self {
            ctor,
            tag: None,
            props_data: None,
            listeners: None,
            children: Rc::from(Vec::new()),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_props(mut self, props: Value) -> Self {
        self.props_data = Some(props);
        self
    }

    pub fn with_listeners(mut self, listeners: ListenerMap) -> Self {
        self.listeners = Some(listeners);
        self
    }

    pub fn with_children(mut self, children: Vec<VNode>) -> Self {
        self.children = Rc::from(children);
        self
    }
}

impl fmt::Debug for ComponentVNodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentVNodeOptions")
            .field("ctor", &self.ctor)
            .field("tag", &self.tag)
            .field("props_data", &self.props_data)
            .field("listeners", &self.listeners.as_ref().map(|l| l.keys().cloned().collect::<Vec<_>>()))
            .field("children", &self.children.len())
            .finish()
    }
}
