//! The uniform result object returned by every dispatch.
//!
//! On the wire a result is a flat JSON object with a mandatory `type` string
//! and any number of auxiliary fields:
//!
//! ```json
//! {"type": "unknown_command", "input": "nosuchcmd"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BindError, Result};

/// Conventional `type` values. Hosts may add their own.
pub mod kind {
    pub const EXIT: &str = "exit";
    pub const HELP: &str = "help";
    pub const UNKNOWN_COMMAND: &str = "unknown_command";
    pub const INVALID_ARGUMENT: &str = "invalid_argument";
    pub const SUCCESS: &str = "success";
    pub const FAILED: &str = "failed";
    pub const INTERRUPTED: &str = "interrupted";
    /// Produced for an empty or whitespace-only input line.
    pub const EMPTY: &str = "empty";
}

/// `reason` carried by a `failed` result when a handler faults.
pub const INTERNAL_ERROR: &str = "internal_error";

/// Tagged outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultObject {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ResultObject {
    /// A result of the given type with no auxiliary fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    pub fn exit() -> Self {
        Self::new(kind::EXIT)
    }

    pub fn help(content: impl Into<String>) -> Self {
        Self::new(kind::HELP).with("content", content.into())
    }

    pub fn success() -> Self {
        Self::new(kind::SUCCESS)
    }

    pub fn failed() -> Self {
        Self::new(kind::FAILED)
    }

    pub fn interrupted() -> Self {
        Self::new(kind::INTERRUPTED)
    }

    pub fn empty() -> Self {
        Self::new(kind::EMPTY)
    }

    /// `{type: "unknown_command", input: <command token>}`.
    pub fn unknown_command(input: impl Into<String>) -> Self {
        Self::new(kind::UNKNOWN_COMMAND).with("input", input.into())
    }

    /// `{type: "invalid_argument", command, reason: <BindError>, message}`.
    pub fn invalid_argument(command: impl Into<String>, err: &BindError) -> Self {
        let reason =
            serde_json::to_value(err).unwrap_or_else(|_| Value::String(err.to_string()));
        Self::new(kind::INVALID_ARGUMENT)
            .with("command", command.into())
            .with("reason", reason)
            .with("message", err.to_string())
    }

    /// `{type: "failed", reason: "internal_error", command}`.
    pub fn internal_error(command: impl Into<String>) -> Self {
        Self::failed()
            .with("reason", INTERNAL_ERROR)
            .with("command", command.into())
    }

    /// Attach an auxiliary field. The `type` key is reserved and ignored.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == "type" {
            log::warn!("ignoring auxiliary field named 'type' on '{}' result", self.kind);
            return self;
        }
        self.fields.insert(key, value.into());
        self
    }

    /// The `type` field.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn is_exit(&self) -> bool {
        self.is(kind::EXIT)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A string-valued auxiliary field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialize to a compact JSON record.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_wire_shape() {
        let r = ResultObject::unknown_command("nosuchcmd");
        assert_eq!(
            r.to_json().unwrap(),
            r#"{"type":"unknown_command","input":"nosuchcmd"}"#
        );
    }

    #[test]
    fn internal_error_shape() {
        let r = ResultObject::internal_error("boom");
        assert!(r.is(kind::FAILED));
        assert_eq!(r.get_str("reason"), Some("internal_error"));
        assert_eq!(r.get_str("command"), Some("boom"));
    }

    #[test]
    fn invalid_argument_embeds_bind_error() {
        let err = BindError::InvalidArgument {
            argument: "amount".into(),
            token: "five".into(),
            expected: "int".into(),
        };
        let r = ResultObject::invalid_argument("give", &err);
        assert_eq!(r.kind(), "invalid_argument");
        let reason = r.get("reason").unwrap();
        assert_eq!(reason["kind"], "invalid_argument");
        assert_eq!(reason["token"], "five");
        assert_eq!(r.get_str("message"), Some(err.to_string().as_str()));
    }

    #[test]
    fn type_field_is_reserved() {
        let r = ResultObject::success().with("type", "failed");
        assert_eq!(r.kind(), "success");
        assert!(r.get("type").is_none());
    }

    #[test]
    fn json_roundtrip_keeps_auxiliary_fields() {
        let r = ResultObject::help("Available commands").with("count", 3);
        let back: ResultObject = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.get_str("content"), Some("Available commands"));
    }

    #[test]
    fn host_defined_kinds_are_allowed() {
        let r = ResultObject::new("numerical").with("value", 12);
        assert!(r.is("numerical"));
        assert!(!r.is_exit());
        assert_eq!(r.get("value").and_then(Value::as_i64), Some(12));
    }

    #[test]
    fn missing_type_fails_to_parse() {
        assert!(serde_json::from_str::<ResultObject>(r#"{"content":"x"}"#).is_err());
    }
}
