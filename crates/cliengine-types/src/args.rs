//! Typed argument descriptors and their parsed values.

use std::collections::BTreeMap;
use std::fmt;
use std::mem;

use serde::Serialize;

/// The declared type of a command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Signed integer literal (`42`, `-7`, `+3`).
    Integer,
    /// Finite number literal (`1.5`, `.5`, `3`).
    Float,
    /// Any token, taken verbatim.
    String,
    /// `true/false`, `yes/no`, `1/0` and their one-letter forms.
    Boolean,
    /// One of a fixed set of words, matched case-insensitively.
    Choice(Vec<String>),
}

impl ValueType {
    /// Build a choice-set type from a list of words.
    pub fn choice<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(choices.into_iter().map(Into::into).collect())
    }

    /// Short type name used in usage strings and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::Float => "num",
            Self::String => "str",
            Self::Boolean => "bool",
            Self::Choice(_) => "choice",
        }
    }

    /// Whether two types have the same kind, ignoring choice contents.
    pub fn same_kind(&self, other: &ValueType) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// Whether `value` is a legal value of this type.
    pub fn accepts(&self, value: &ArgumentValue) -> bool {
        match (self, value) {
            (Self::Integer, ArgumentValue::Int(_)) => true,
            (Self::Float, ArgumentValue::Float(f)) => f.is_finite(),
            (Self::String, ArgumentValue::Str(_)) => true,
            (Self::Boolean, ArgumentValue::Bool(_)) => true,
            (Self::Choice(choices), ArgumentValue::Str(s)) => {
                choices.iter().any(|c| c.eq_ignore_ascii_case(s))
            },
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice(choices) => f.write_str(&choices.join("|")),
            other => f.write_str(other.name()),
        }
    }
}

/// A parsed argument value. Exactly one case per [`ValueType`] kind;
/// choice-set arguments bind to [`ArgumentValue::Str`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for ArgumentValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ArgumentValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ArgumentValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ArgumentValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Descriptor of one positional command argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Argument name, unique within its command.
    pub name: String,
    /// Declared type.
    pub value_type: ValueType,
    /// Whether a token must be supplied.
    pub required: bool,
    /// Value used when an optional argument is omitted.
    pub default: Option<ArgumentValue>,
}

impl ArgumentSpec {
    /// A required argument.
    pub fn required(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: true,
            default: None,
        }
    }

    /// An optional argument without a default; omitted means absent.
    pub fn optional(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: false,
            default: None,
        }
    }

    /// Set the value used when this argument is omitted.
    pub fn with_default(mut self, default: impl Into<ArgumentValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the declared default (if any) satisfies the declared type.
    pub fn default_is_valid(&self) -> bool {
        self.default
            .as_ref()
            .is_none_or(|d| self.value_type.accepts(d))
    }

    /// Usage fragment: `<name:type>` when required, `[name:type]` otherwise.
    pub fn usage(&self) -> String {
        if self.required {
            format!("<{}:{}>", self.name, self.value_type)
        } else {
            format!("[{}:{}]", self.name, self.value_type)
        }
    }
}

/// Bound arguments of one dispatch, keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Arguments {
    values: BTreeMap<String, ArgumentValue>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            ArgumentValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            ArgumentValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ArgumentValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            ArgumentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, ArgumentValue)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (K, ArgumentValue)>>(iter: T) -> Self {
        let mut args = Arguments::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}
