//! Error types with fix suggestions
//!
//! - `LookupError`: a source has no value for a name
//! - `BindError`: arguments do not fit a callable's signature
//! - `ConfigError`: invalid signature declaration or options document
//! - `CallError`: ready-made error type for `Function` bodies

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// A source could not produce a value for a name.
///
/// Swallowed while extracting a callable's declared parameters, propagated
/// when enumerating every visible name for a `**kwargs` parameter.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("source has no attribute '{name}'")]
    MissingAttribute { name: String },

    #[error("source has no key '{key}'")]
    MissingKey { key: String },

    #[error("source serializes to {found}, expected an object with attributes")]
    NotAnObject { found: &'static str },

    #[error("cannot reflect source attributes: {0}")]
    Reflection(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

/// Host-style argument binding failure.
///
/// Produced by `Signature::bind`, i.e. by the callable itself, never by the
/// binder. Messages mirror what a dynamic language reports on a bad call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("missing a required argument: '{name}'")]
    MissingArgument { name: String },

    #[error("got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { name: String },

    #[error("got multiple values for argument '{name}'")]
    MultipleValues { name: String },

    #[error("takes {expected} positional arguments but {given} were given")]
    TooManyPositional { expected: usize, given: usize },

    #[error("positional-only argument '{name}' passed as keyword argument")]
    PositionalOnlyAsKeyword { name: String },

    #[error("invalid value for argument '{name}': {details}")]
    InvalidArgument { name: String, details: String },
}

/// Invalid declaration of a signature or binder options
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid parameter name '{name}'")]
    InvalidName { name: String },

    #[error("duplicate parameter '{name}'")]
    DuplicateParameter { name: String },

    #[error("{kind} parameter '{name}' cannot follow {after} parameter")]
    ParameterOrder {
        name: String,
        kind: &'static str,
        after: &'static str,
    },

    #[error("more than one {kind} parameter (second is '{name}')")]
    DuplicateVariadic { name: String, kind: &'static str },

    #[error("non-default parameter '{name}' follows default parameter")]
    DefaultOrder { name: String },

    #[error("variadic parameter '{name}' cannot have a default")]
    VariadicDefault { name: String },
}

/// Error type for `Function` bodies that have no error type of their own
#[derive(Error, Debug)]
pub enum CallError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{0}")]
    Failed(String),
}

impl CallError {
    pub fn failed(message: impl Into<String>) -> Self {
        CallError::Failed(message.into())
    }
}

impl FixSuggestion for LookupError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            LookupError::MissingAttribute { .. } => {
                Some("Add the field to the source struct or pass it as an explicit keyword")
            }
            LookupError::MissingKey { .. } => {
                Some("Insert the key into the source map or pass it as an explicit keyword")
            }
            LookupError::NotAnObject { .. } => {
                Some("Use a struct or map source, or switch to mapping mode")
            }
            LookupError::Reflection(_) => Some("Check the source's Serialize implementation"),
            LookupError::Custom(_) => None,
        }
    }
}

impl FixSuggestion for BindError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            BindError::MissingArgument { .. } => {
                Some("Supply it from the source or as an explicit keyword, or declare a default")
            }
            BindError::UnexpectedKeyword { .. } => {
                Some("Remove the keyword or declare a **kwargs parameter to absorb it")
            }
            BindError::MultipleValues { .. } => {
                Some("Pass the argument either positionally or by keyword, not both")
            }
            BindError::TooManyPositional { .. } => {
                Some("Drop extra positional values or declare a *args parameter")
            }
            BindError::PositionalOnlyAsKeyword { .. } => {
                Some("Pass positional-only arguments positionally")
            }
            BindError::InvalidArgument { .. } => Some("Check the type of the bound value"),
        }
    }
}

impl FixSuggestion for ConfigError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ConfigError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            ConfigError::InvalidName { .. } => {
                Some("Parameter names must be non-empty identifiers")
            }
            ConfigError::DuplicateParameter { .. } => Some("Use unique parameter names"),
            ConfigError::ParameterOrder { .. } => {
                Some("Declare parameters in kind order, from positional_only to var_keyword")
            }
            ConfigError::DuplicateVariadic { .. } => {
                Some("Declare at most one var_positional and one var_keyword parameter")
            }
            ConfigError::DefaultOrder { .. } => {
                Some("Give the parameter a default or move it before the defaulted ones")
            }
            ConfigError::VariadicDefault { .. } => {
                Some("Remove the default from the variadic parameter")
            }
        }
    }
}
