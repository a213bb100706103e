//! Preconfigured binders and bind functions
//!
//! A binder kind (an `ExtractHook`) plus options yields two configurations,
//! one per source mode, and a bind function for each:
//!
//! | mode      | lookup           | enumeration       |
//! |-----------|------------------|-------------------|
//! | attribute | serialized field | serialized fields |
//! | mapping   | item by key      | keys              |

use serde_json::Value;

use crate::arguments::Kwargs;
use crate::binder::{Binder, BinderOptions, ExtractHook, Plain};
use crate::callable::Callable;
use crate::error::LookupError;
use crate::source::{Accessor, AttrAccess, DictAccess};

/// Constructs binders with a fixed accessor, kind and options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration<A, H = Plain> {
    access: A,
    hook: H,
    options: BinderOptions,
}

pub type AttrConfig<H = Plain> = Configuration<AttrAccess, H>;
pub type DictConfig<H = Plain> = Configuration<DictAccess, H>;

impl<A, H> Configuration<A, H> {
    pub const fn new(access: A, hook: H, options: BinderOptions) -> Self {
        Self {
            access,
            hook,
            options,
        }
    }

    pub fn options(&self) -> BinderOptions {
        self.options
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }
}

impl<A: Clone, H: ExtractHook + Clone> Configuration<A, H> {
    /// Fresh binder for `f` over `source`
    pub fn binder<'a, C, S>(&self, f: &'a C, source: &'a S) -> Binder<'a, C, S, A, H>
    where
        C: Callable + ?Sized,
        S: ?Sized,
        A: Accessor<S>,
    {
        Binder::new(f, source, self.access.clone())
            .with_options(self.options)
            .with_hook(self.hook.clone())
    }
}

/// Builds a fresh binder per call and invokes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindFn<A, H = Plain> {
    config: Configuration<A, H>,
}

impl<A, H> BindFn<A, H> {
    pub const fn new(config: Configuration<A, H>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Configuration<A, H> {
        &self.config
    }
}

impl<A: Clone, H: ExtractHook + Clone> BindFn<A, H> {
    /// Call `f` with `args` and keyword arguments from `source` merged with
    /// `kwargs`. The callable's errors are returned as-is.
    pub fn call<C, S>(
        &self,
        f: &C,
        source: &S,
        args: Vec<Value>,
        kwargs: Kwargs,
    ) -> Result<C::Output, C::Error>
    where
        C: Callable + ?Sized,
        C::Error: From<LookupError>,
        S: ?Sized,
        A: Accessor<S>,
    {
        self.config.binder(f, source).invoke(args, kwargs)
    }
}

/// Attribute-mode and mapping-mode configurations for a binder kind
pub fn build_configurations<H: Clone>(
    hook: H,
    options: BinderOptions,
) -> (AttrConfig<H>, DictConfig<H>) {
    (
        Configuration::new(AttrAccess, hook.clone(), options),
        Configuration::new(DictAccess, hook, options),
    )
}

/// Attribute-mode and mapping-mode bind functions for a binder kind
pub fn build_functions<H: Clone>(
    hook: H,
    options: BinderOptions,
) -> (BindFn<AttrAccess, H>, BindFn<DictAccess, H>) {
    let (attr, dict) = build_configurations(hook, options);
    (BindFn::new(attr), BindFn::new(dict))
}

/// Both configurations and both bind functions
pub fn build_all<H: Clone>(
    hook: H,
    options: BinderOptions,
) -> (
    AttrConfig<H>,
    DictConfig<H>,
    BindFn<AttrAccess, H>,
    BindFn<DictAccess, H>,
) {
    let (attr, dict) = build_configurations(hook, options);
    (
        attr.clone(),
        dict.clone(),
        BindFn::new(attr),
        BindFn::new(dict),
    )
}

// ─────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────

/// Attribute-mode binders with default options
pub const BINDER_ATTR: AttrConfig = Configuration::new(AttrAccess, Plain, BinderOptions::DEFAULT);

/// Mapping-mode binders with default options
pub const BINDER_DICT: DictConfig = Configuration::new(DictAccess, Plain, BinderOptions::DEFAULT);

const BIND_ATTR: BindFn<AttrAccess> = BindFn::new(BINDER_ATTR);
const BIND_DICT: BindFn<DictAccess> = BindFn::new(BINDER_DICT);

/// Call `f` with arguments from the attributes (serialized fields) of `source`
pub fn bind_attr<C, S>(
    f: &C,
    source: &S,
    args: Vec<Value>,
    kwargs: Kwargs,
) -> Result<C::Output, C::Error>
where
    C: Callable + ?Sized,
    C::Error: From<LookupError>,
    S: serde::Serialize + ?Sized,
{
    BIND_ATTR.call(f, source, args, kwargs)
}

/// Call `f` with arguments from the items of the mapping `source`
pub fn bind_dict<C, S>(
    f: &C,
    source: &S,
    args: Vec<Value>,
    kwargs: Kwargs,
) -> Result<C::Output, C::Error>
where
    C: Callable + ?Sized,
    C::Error: From<LookupError>,
    S: crate::source::Mapping + ?Sized,
{
    BIND_DICT.call(f, source, args, kwargs)
}
