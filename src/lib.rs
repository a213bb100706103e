//! call-args - call functions with keyword arguments taken from a source
//!
//! A callable declares its parameters as a `Signature`. The binder walks
//! that signature, pulls the matching names out of a source (a struct's
//! fields or a map's items) and calls the function with them, merged with
//! any explicit keyword arguments.
//!
//! ```
//! use call_args::{bind_dict, kwargs, CallError, Function, Kwargs, Param, Signature};
//! use serde_json::json;
//!
//! let connect = Function::new(
//!     Signature::new([Param::new("host"), Param::new("port").with_default(80)]).unwrap(),
//!     |args| -> Result<String, CallError> {
//!         Ok(format!("{}:{}", args.value::<String>("host")?, args.value::<u16>("port")?))
//!     },
//! );
//! let config = json!({"host": "example.org", "port": 8080, "debug": true});
//!
//! assert_eq!(bind_dict(&connect, &config, vec![], Kwargs::default()).unwrap(), "example.org:8080");
//! assert_eq!(bind_dict(&connect, &config, vec![], kwargs([("port", 443)])).unwrap(), "example.org:443");
//! ```

pub mod arguments;
pub mod binder;
pub mod callable;
pub mod error;
pub mod interfaces;
mod reflect;
pub mod signature;
pub mod source;

pub use arguments::{kwargs, BoundArguments, Kwargs};
pub use binder::{Binder, BinderOptions, ExtractHook, Plain};
pub use callable::{Callable, Function};
pub use error::{BindError, CallError, ConfigError, FixSuggestion, LookupError};
pub use interfaces::{
    bind_attr, bind_dict, build_all, build_configurations, build_functions, AttrConfig, BindFn,
    Configuration, DictConfig, BINDER_ATTR, BINDER_DICT,
};
pub use signature::{Param, ParamKind, Signature};
pub use source::{Accessor, AttrAccess, DictAccess, FnAccessor, Mapping};
