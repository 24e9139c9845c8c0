/// Application name
pub const APP_NAME: &str = "Trellis";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display name used for the root instance.
pub const ROOT_DISPLAY_NAME: &str = "<Root>";

/// Display name used for instances without a `name` option.
pub const ANONYMOUS_DISPLAY_NAME: &str = "<Anonymous>";

/// Slot name for children without an explicit slot.
pub const DEFAULT_SLOT: &str = "default";

/// Names that may never be used for a component.
pub const RESERVED_COMPONENT_NAMES: &[&str] = &["slot", "component"];

/// Option keys understood by the merge strategies and the initializer.
pub mod keys {
    pub const NAME: &str = "name";
    pub const EL: &str = "el";
    pub const TEMPLATE: &str = "template";
    pub const DATA: &str = "data";
    pub const PROPS: &str = "props";
    pub const PROPS_DATA: &str = "propsData";
    pub const METHODS: &str = "methods";
    pub const COMPUTED: &str = "computed";
    pub const WATCH: &str = "watch";
    pub const PROVIDE: &str = "provide";
    pub const INJECT: &str = "inject";
    pub const MIXINS: &str = "mixins";
    pub const EXTENDS: &str = "extends";
    pub const ABSTRACT: &str = "abstract";
    pub const COMPONENTS: &str = "components";
    pub const DIRECTIVES: &str = "directives";
    pub const FILTERS: &str = "filters";
    pub const RENDER: &str = "render";
    pub const STATIC_RENDER_FNS: &str = "staticRenderFns";

    /// Marks options produced by a merge (points at the base constructor).
    pub const BASE: &str = "_base";

    // Fields copied by the internal fast path.
    pub const PARENT: &str = "parent";
    pub const PARENT_VNODE: &str = "_parentVnode";
    pub const PARENT_LISTENERS: &str = "_parentListeners";
    pub const RENDER_CHILDREN: &str = "_renderChildren";
    pub const COMPONENT_TAG: &str = "_componentTag";
}
