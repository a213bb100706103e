//! Binder - call a function with keyword arguments taken from a source
//!
//! Data flow:
//! ```text
//! callable signature ──┐
//!                      ├─ extract_for_signature ─→ extracted kwargs
//! source + accessor ───┘                                │
//!                                 explicit kwargs ──→ merge (options)
//!                                                       │
//!                                       f(positional, merged kwargs)
//! ```
//!
//! Lookup failures for declared parameters are swallowed: the parameter is
//! simply not supplied from the source. Whatever the callable returns,
//! including its errors, is handed back untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::arguments::Kwargs;
use crate::callable::Callable;
use crate::error::{ConfigError, LookupError};
use crate::signature::ParamKind;
use crate::source::{Accessor, FnAccessor};

/// Merge and filtering flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderOptions {
    /// Explicit keywords are defaults that source values override.
    /// When `false`, explicit keywords override source values.
    pub kwargs_as_default: bool,

    /// Never supply `_`-prefixed parameters from the source
    pub skip_private: bool,
}

impl BinderOptions {
    pub const DEFAULT: Self = Self {
        kwargs_as_default: false,
        skip_private: true,
    };

    /// Load options from YAML; missing fields keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Customizes what extraction hands to the merge step.
///
/// The stock kind is [`Plain`]; any `Fn(Kwargs) -> Kwargs` closure is a kind.
pub trait ExtractHook {
    fn after_extract(&self, kwargs: Kwargs) -> Kwargs {
        kwargs
    }
}

/// Extraction results are used as-is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl ExtractHook for Plain {}

impl<F> ExtractHook for F
where
    F: Fn(Kwargs) -> Kwargs,
{
    fn after_extract(&self, kwargs: Kwargs) -> Kwargs {
        self(kwargs)
    }
}

fn is_private(name: &str) -> bool {
    name.starts_with('_')
}

/// Binds a callable to a source of named values.
///
/// Holds no state besides its inputs: every extraction re-walks the
/// callable's signature, and a binder may be invoked any number of times.
#[derive(Debug, Clone)]
pub struct Binder<'a, C: ?Sized, S: ?Sized, A, H = Plain> {
    f: &'a C,
    source: &'a S,
    access: A,
    hook: H,
    options: BinderOptions,
}

impl<'a, C, S, A> Binder<'a, C, S, A, Plain>
where
    C: Callable + ?Sized,
    S: ?Sized,
    A: Accessor<S>,
{
    pub fn new(f: &'a C, source: &'a S, access: A) -> Self {
        Self {
            f,
            source,
            access,
            hook: Plain,
            options: BinderOptions::DEFAULT,
        }
    }
}

impl<'a, C, S, G, L> Binder<'a, C, S, FnAccessor<G, L>, Plain>
where
    C: Callable + ?Sized,
    S: ?Sized,
    G: Fn(&S, &str) -> Result<Value, LookupError>,
    L: Fn(&S) -> Vec<String>,
{
    /// Binder over a lookup closure and an enumeration closure
    pub fn with_strategies(f: &'a C, source: &'a S, get: G, list_names: L) -> Self {
        Self::new(f, source, FnAccessor::new(get, list_names))
    }
}

impl<'a, C, S, A, H> Binder<'a, C, S, A, H>
where
    C: Callable + ?Sized,
    S: ?Sized,
    A: Accessor<S>,
    H: ExtractHook,
{
    pub fn kwargs_as_default(mut self, yes: bool) -> Self {
        self.options.kwargs_as_default = yes;
        self
    }

    pub fn skip_private(mut self, yes: bool) -> Self {
        self.options.skip_private = yes;
        self
    }

    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_hook<K: ExtractHook>(self, hook: K) -> Binder<'a, C, S, A, K> {
        Binder {
            f: self.f,
            source: self.source,
            access: self.access,
            hook,
            options: self.options,
        }
    }

    pub fn options(&self) -> BinderOptions {
        self.options
    }

    /// Every public (non-`_`) name in the source with its value.
    ///
    /// Used for callables taking `**kwargs`. Lookup failures propagate: the
    /// names come from the source itself, so a failure is the source's bug.
    pub fn extract_all_visible(&self) -> Result<Kwargs, LookupError> {
        let mut kwargs = Kwargs::default();
        for name in self.access.names(self.source)? {
            if is_private(&name) {
                continue;
            }
            let value = self.access.get(self.source, &name)?;
            kwargs.insert(name, value);
        }
        Ok(kwargs)
    }

    /// Keyword arguments for the callable, taken from the source.
    ///
    /// Walks the declared parameters in order. A `**kwargs` parameter stops
    /// the walk and yields every visible name instead. Names the source does
    /// not have are left out.
    pub fn extract_for_signature(&self) -> Result<Kwargs, LookupError> {
        let mut kwargs = Kwargs::default();
        for param in self.f.signature().params() {
            if self.options.skip_private && param.is_private() {
                continue;
            }
            match param.kind() {
                ParamKind::VarKeyword => {
                    debug!(
                        param = param.name(),
                        "var-keyword parameter, extracting every visible name"
                    );
                    let all = self.extract_all_visible()?;
                    return Ok(self.hook.after_extract(all));
                }
                ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly => {
                    let name = param.name();
                    match self.access.get(self.source, name) {
                        Ok(value) => {
                            kwargs.insert(name.to_string(), value);
                        }
                        Err(err) => trace!(param = name, %err, "not in source, skipped"),
                    }
                }
                ParamKind::PositionalOnly | ParamKind::VarPositional => {}
            }
        }
        Ok(self.hook.after_extract(kwargs))
    }

    /// Extract, merge with `explicit` and call.
    ///
    /// Errors from the callable come back exactly as it returned them.
    #[instrument(
        level = "debug",
        skip_all,
        fields(positional = args.len(), explicit = explicit.len())
    )]
    pub fn invoke(&self, args: Vec<Value>, explicit: Kwargs) -> Result<C::Output, C::Error>
    where
        C::Error: From<LookupError>,
    {
        let extracted = self.extract_for_signature()?;
        let merged = merge(extracted, explicit, self.options.kwargs_as_default);
        debug!(kwargs = merged.len(), "calling");
        self.f.call(args, merged)
    }
}

/// Later entries win: `explicit` over `extracted`, or the reverse when
/// explicit keywords are only defaults
fn merge(extracted: Kwargs, explicit: Kwargs, kwargs_as_default: bool) -> Kwargs {
    let (mut base, overlay) = if kwargs_as_default {
        (explicit, extracted)
    } else {
        (extracted, explicit)
    };
    base.extend(overlay);
    base
}
