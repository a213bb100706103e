//! Declared parameter lists
//!
//! Rust has no runtime parameter reflection, so a callable declares its
//! parameters up front as a `Signature`: an ordered list of named params,
//! each with a kind and an optional default.
//!
//! Signatures can be built in code or declared in YAML:
//! ```yaml
//! params:
//!   - name: a
//!   - name: b
//!     default: 19
//!   - name: options
//!     kind: var_keyword
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::arguments::{BoundArguments, Kwargs};
use crate::error::{BindError, ConfigError};

/// How a parameter accepts its argument.
///
/// Declaration order of the variants is the order parameters must appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    #[default]
    PositionalOrKeyword,
    /// Collects surplus positional values (`*args`)
    VarPositional,
    KeywordOnly,
    /// Collects surplus keyword values (`**kwargs`)
    VarKeyword,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::PositionalOnly => "positional-only",
            ParamKind::PositionalOrKeyword => "positional-or-keyword",
            ParamKind::VarPositional => "var-positional",
            ParamKind::KeywordOnly => "keyword-only",
            ParamKind::VarKeyword => "var-keyword",
        }
    }

    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }

    /// Can be filled from a positional value
    pub fn accepts_positional(self) -> bool {
        matches!(
            self,
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
        )
    }

    /// Can be filled by a keyword of the same name
    pub fn accepts_keyword(self) -> bool {
        matches!(
            self,
            ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly
        )
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    name: String,

    #[serde(default)]
    kind: ParamKind,

    /// `Some(Value::Null)` is a real default; `None` means required
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    default: Option<Value>,
}

/// Keep an explicit `default: null` as `Some(Null)`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Param {
    /// Positional-or-keyword parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::PositionalOrKeyword)
    }

    pub fn positional_only(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::PositionalOnly)
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::KeywordOnly)
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::VarPositional)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::VarKeyword)
    }

    pub fn with_kind(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Names starting with an underscore
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }
}

#[derive(Deserialize)]
struct SignatureDoc {
    #[serde(default)]
    params: Vec<Param>,
}

/// Validated, ordered parameter list of a callable
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Validate and build a signature.
    ///
    /// Rejects invalid or duplicate names, out-of-order kinds, a second
    /// variadic of the same kind, defaults on variadics and a required
    /// positional parameter after a defaulted one.
    pub fn new(params: impl IntoIterator<Item = Param>) -> Result<Self, ConfigError> {
        let params: Vec<Param> = params.into_iter().collect();

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut previous: Option<ParamKind> = None;
        let mut seen_default = false;

        for param in &params {
            if !is_identifier(&param.name) {
                return Err(ConfigError::InvalidName {
                    name: param.name.clone(),
                });
            }
            if !seen.insert(param.name.as_str()) {
                return Err(ConfigError::DuplicateParameter {
                    name: param.name.clone(),
                });
            }
            if let Some(prev) = previous {
                if param.kind < prev {
                    return Err(ConfigError::ParameterOrder {
                        name: param.name.clone(),
                        kind: param.kind.as_str(),
                        after: prev.as_str(),
                    });
                }
                if param.kind == prev && param.kind.is_variadic() {
                    return Err(ConfigError::DuplicateVariadic {
                        name: param.name.clone(),
                        kind: param.kind.as_str(),
                    });
                }
            }
            if param.kind.is_variadic() && param.default.is_some() {
                return Err(ConfigError::VariadicDefault {
                    name: param.name.clone(),
                });
            }
            if param.kind.accepts_positional() {
                if param.default.is_some() {
                    seen_default = true;
                } else if seen_default {
                    return Err(ConfigError::DefaultOrder {
                        name: param.name.clone(),
                    });
                }
            }
            previous = Some(param.kind);
        }

        Ok(Self { params })
    }

    /// Parse a `params:` document and validate it like [`Signature::new`]
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let doc: SignatureDoc = serde_yaml::from_str(yaml)?;
        Self::new(doc.params)
    }

    /// Parameters in declared order
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn has_var_positional(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.kind == ParamKind::VarPositional)
    }

    pub fn has_var_keyword(&self) -> bool {
        self.params.iter().any(|p| p.kind == ParamKind::VarKeyword)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Bind call arguments to parameters.
    ///
    /// 1. Positional values fill positional params in order, surplus goes to
    ///    `*args` or fails.
    /// 2. Keywords (in name order, so errors are deterministic) fill the
    ///    same-named param, surplus goes to `**kwargs` or fails.
    /// 3. Unbound params take their default or fail.
    pub fn bind(&self, args: Vec<Value>, kwargs: Kwargs) -> Result<BoundArguments, BindError> {
        let mut bound = BoundArguments::default();

        let positional: Vec<&Param> = self
            .params
            .iter()
            .filter(|p| p.kind.accepts_positional())
            .collect();
        let given = args.len();
        let mut args = args.into_iter();
        for param in &positional {
            match args.next() {
                Some(value) => bound.insert(&param.name, value),
                None => break,
            }
        }
        let surplus: Vec<Value> = args.collect();
        if !surplus.is_empty() {
            if !self.has_var_positional() {
                return Err(BindError::TooManyPositional {
                    expected: positional.len(),
                    given,
                });
            }
            bound.var_args = surplus;
        }

        let var_keyword = self.has_var_keyword();
        let mut keywords: Vec<(String, Value)> = kwargs.into_iter().collect();
        keywords.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in keywords {
            match self.param(&name) {
                Some(param) if param.kind.accepts_keyword() => {
                    if bound.contains(&name) {
                        return Err(BindError::MultipleValues { name });
                    }
                    bound.insert(&name, value);
                }
                Some(param) if param.kind == ParamKind::PositionalOnly && !var_keyword => {
                    return Err(BindError::PositionalOnlyAsKeyword { name });
                }
                _ if var_keyword => {
                    bound.var_kwargs.insert(name, value);
                }
                _ => return Err(BindError::UnexpectedKeyword { name }),
            }
        }

        for param in self.params.iter().filter(|p| !p.kind.is_variadic()) {
            if bound.contains(&param.name) {
                continue;
            }
            match &param.default {
                Some(default) => bound.insert(&param.name, default.clone()),
                None => {
                    return Err(BindError::MissingArgument {
                        name: param.name.clone(),
                    })
                }
            }
        }

        Ok(bound)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}
