//! # Message Table
//!
//! Maps `(type, kind)` pairs to message templates, plus the `required` and
//! `default` fallbacks.
//!
//! ## Key Forms
//!
//! The table is stored as a nested mapping (`{ "string": { "min": … } }`).
//! Overrides may use either the nested form or flat dotted keys
//! (`"string.min"`); flat keys are split on `.` before merging, so both
//! forms address the same entry. Lookups accept dotted keys.
//!
//! ## Merge Semantics
//!
//! [`MessageTable::merge`] is a per-key recursive merge: nested mappings
//! merge key by key, any other value overwrites. The last write wins on
//! overlapping keys. Entries are never removed.
//!
//! ## Sharing
//!
//! [`Messages`] wraps a table in `Arc<RwLock<_>>`. Every schema built from
//! the same handle observes merges made after it was created, including
//! merges made after its rules were compiled.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::kind::SchemaType;

/// Key of the generic fallback message.
pub const DEFAULT_KEY: &str = "default";
/// Key of the message used by `required` rules.
pub const REQUIRED_KEY: &str = "required";

/// Built-in templates, in flat-key form.
const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("default", "验证失败"),
    ("required", "必填"),
    ("types.number", "必须为数字"),
    ("types.array", "必须为数组"),
    ("number.integer", "必须为整数"),
    ("number.decimal", "最多保留{0}位小数"),
    ("number.range", "输入范围为 {0} 到 {1}"),
    ("number.min", "最小值为 {0}"),
    ("number.max", "最大值为 {0}"),
    ("number.gt", "必须大于 {0}"),
    ("number.lt", "必须小于 {0}"),
    ("number.equal", "必须等于 {0}"),
    ("number.positive", "必须为正数"),
    ("number.negative", "必须为负数"),
    ("number.nonnegative", "必须为非负数"),
    ("number.nonpositive", "必须为非正数"),
    ("number.port", "端口号格式不正确"),
    ("string.regex", "请输入正确的格式"),
    ("string.range", "字符串长度为 {0} 到 {1}"),
    ("string.min", "字符串长度最小值为 {0}"),
    ("string.max", "字符串长度最大值为 {0}"),
    ("string.equal", "字符串必须等于 {0}"),
    ("string.contain", "字符串必须包含 {0}"),
    ("string.len", "字符串长度必须等于 {0}"),
    ("string.byteLen", "字符串长度为 {0} 到 {1} 个字节"),
    ("string.startsWith", "字符串必须以 {0} 开头"),
    ("string.endsWith", "字符串必须以 {0} 结尾"),
    ("string.uppercase", "字符串必须全部为大写字母"),
    ("string.lowercase", "字符串必须全部为小写字母"),
    ("string.alphanumeric", "字符串必须全部为字母或数字"),
    ("string.phone", "手机号格式不正确"),
    ("string.email", "邮箱格式不正确"),
    ("string.url", "链接格式不正确"),
    ("string.ip", "IP格式不正确"),
    ("string.password", "密码格式不正确"),
    ("array.range", "数组长度为 {0} 到 {1}"),
    ("array.min", "数组长度最小为 {0}"),
    ("array.max", "数组长度最大为 {0}"),
    ("array.len", "数组长度必须等于 {0}"),
    ("array.includes", "数组必须包含 {0}"),
    ("array.excludes", "数组不能包含 {0}"),
    ("array.unique", "数组元素不能重复"),
];

/// A mutable, mergeable mapping from message keys to templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTable {
    entries: Map<String, Value>,
}

impl Default for MessageTable {
    fn default() -> Self {
        Self::defaults()
    }
}

impl MessageTable {
    /// An empty table. Lookups fall through to nothing.
    pub fn empty() -> Self {
        Self { entries: Map::new() }
    }

    /// The built-in table.
    pub fn defaults() -> Self {
        let mut table = Self::empty();
        for (key, template) in DEFAULT_MESSAGES {
            table.insert(key, (*template).to_string());
        }
        table
    }

    /// Parse a partial table from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Parse a partial table from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(value)
    }

    /// Build a partial table from an already-parsed value.
    ///
    /// Dotted keys are normalized into nested form.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        let mut table = Self::empty();
        table.merge(value)?;
        Ok(table)
    }

    /// Insert a single template under a (possibly dotted) key.
    pub fn insert(&mut self, key: &str, template: impl Into<String>) {
        let mut partial = Map::new();
        partial.insert(key.to_string(), Value::String(template.into()));
        merge_into(&mut self.entries, partial);
    }

    /// Deep-merge a partial override into this table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAMapping`] if `partial` is not an object.
    pub fn merge(&mut self, partial: Value) -> Result<(), ConfigError> {
        match partial {
            Value::Object(map) => {
                merge_into(&mut self.entries, map);
                Ok(())
            }
            other => Err(ConfigError::NotAMapping {
                found: json_type_name(&other),
            }),
        }
    }

    /// Deep-merge another table into this one.
    pub fn merge_table(&mut self, other: MessageTable) {
        merge_into(&mut self.entries, other.entries);
    }

    /// Look up a template by dotted key (`"string.min"`, `"required"`).
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut node = self.entries.get(first)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        node.as_str()
    }

    /// Template for a constraint kind, falling back to `default`.
    pub fn lookup(&self, schema: SchemaType, kind: &str) -> String {
        let key = format!("{schema}.{kind}");
        match self.get(&key) {
            Some(template) => template.to_string(),
            None => {
                tracing::debug!(key = %key, "no message for key; using default");
                self.default_message()
            }
        }
    }

    /// Template used by `required` rules, falling back to `default`.
    pub fn required(&self) -> String {
        self.get(REQUIRED_KEY)
            .map(str::to_string)
            .unwrap_or_else(|| self.default_message())
    }

    /// The generic fallback message. Empty if the table has none.
    pub fn default_message(&self) -> String {
        self.get(DEFAULT_KEY).unwrap_or_default().to_string()
    }

    /// All templates in flat dotted-key form, sorted by key.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        flatten_into(&self.entries, "", &mut out);
        out
    }

    /// The table as a nested JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

/// Shared handle to a [`MessageTable`].
///
/// Cloning the handle shares the table; use [`Messages::snapshot`] for an
/// independent copy.
#[derive(Debug, Clone, Default)]
pub struct Messages {
    table: Arc<RwLock<MessageTable>>,
}

impl Messages {
    /// Wrap a table in a new shared handle.
    pub fn new(table: MessageTable) -> Self {
        Self {
            table: Arc::new(RwLock::new(table)),
        }
    }

    /// A fresh handle over the built-in table.
    pub fn defaults() -> Self {
        Self::new(MessageTable::defaults())
    }

    /// Deep-merge a partial override into the shared table.
    pub fn merge(&self, partial: Value) -> Result<(), ConfigError> {
        let mut table = self.table.write();
        table.merge(partial)?;
        tracing::debug!("merged message overrides");
        Ok(())
    }

    /// Deep-merge a partial table into the shared table.
    pub fn merge_table(&self, partial: MessageTable) {
        self.table.write().merge_table(partial);
        tracing::debug!("merged message table");
    }

    /// Load a YAML or JSON file and merge it into the shared table.
    ///
    /// Files ending in `.json` are parsed as JSON; anything else as YAML
    /// (YAML is a superset of JSON).
    pub fn merge_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let partial = if is_json {
            MessageTable::from_json_str(&text)?
        } else {
            MessageTable::from_yaml_str(&text)?
        };
        tracing::debug!(path = %path.display(), "loaded message file");
        self.merge_table(partial);
        Ok(())
    }

    /// Look up a template by dotted key.
    pub fn get(&self, key: &str) -> Option<String> {
        self.table.read().get(key).map(str::to_string)
    }

    /// Template for a constraint kind, falling back to `default`.
    pub fn lookup(&self, schema: SchemaType, kind: &str) -> String {
        self.table.read().lookup(schema, kind)
    }

    /// Template used by `required` rules.
    pub fn required(&self) -> String {
        self.table.read().required()
    }

    /// The generic fallback message.
    pub fn default_message(&self) -> String {
        self.table.read().default_message()
    }

    /// An independent copy of the current table.
    pub fn snapshot(&self) -> MessageTable {
        self.table.read().clone()
    }
}

fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        let mut segments: Vec<&str> = key.split('.').collect();
        // `split` always yields at least one segment.
        let leaf = segments.pop().unwrap_or_default();
        let mut node = &mut *target;
        for segment in segments {
            let slot = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(map) = slot.as_object_mut() else {
                return;
            };
            node = map;
        }
        merge_value(node, leaf, value);
    }
}

fn merge_value(target: &mut Map<String, Value>, key: &str, value: Value) {
    match value {
        Value::Object(incoming) => {
            let slot = target
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Some(existing) = slot.as_object_mut() {
                merge_into(existing, incoming);
            }
        }
        other => {
            target.insert(key.to_string(), other);
        }
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (key, value) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) => flatten_into(inner, &full, out),
            Value::String(s) => {
                out.insert(full, s.clone());
            }
            other => {
                out.insert(full, other.to_string());
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_cover_type_failures() {
        let table = MessageTable::defaults();
        assert_eq!(table.get("types.number"), Some("必须为数字"));
        assert_eq!(table.get("types.array"), Some("必须为数组"));
        assert_eq!(table.required(), "必填");
    }

    #[test]
    fn lookup_falls_back_to_default() {
        let table = MessageTable::defaults();
        assert_eq!(table.lookup(SchemaType::String, "min"), "字符串长度最小值为 {0}");
        assert_eq!(table.lookup(SchemaType::String, "noSuchKind"), "验证失败");
    }

    #[test]
    fn flat_and_nested_keys_address_the_same_entry() {
        let mut table = MessageTable::defaults();
        table.merge(json!({"string.min": "at least {0}"})).unwrap();
        assert_eq!(table.get("string.min"), Some("at least {0}"));

        table.merge(json!({"string": {"min": "min {0}"}})).unwrap();
        assert_eq!(table.get("string.min"), Some("min {0}"));
        // Sibling keys survive a nested merge.
        assert_eq!(table.get("string.max"), Some("字符串长度最大值为 {0}"));
    }

    #[test]
    fn non_object_values_overwrite() {
        let mut table = MessageTable::defaults();
        table.merge(json!({"required": "自定义必填"})).unwrap();
        assert_eq!(table.required(), "自定义必填");
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        let mut table = MessageTable::defaults();
        let err = table.merge(json!(["x"])).unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { found: "array" }));
    }

    #[test]
    fn yaml_partial_tables_merge() {
        let partial = MessageTable::from_yaml_str(
            "required: must fill\nstring:\n  email: bad email\n",
        )
        .unwrap();
        let messages = Messages::defaults();
        messages.merge_table(partial);
        assert_eq!(messages.required(), "must fill");
        assert_eq!(messages.lookup(SchemaType::String, "email"), "bad email");
        assert_eq!(messages.lookup(SchemaType::String, "url"), "链接格式不正确");
    }

    #[test]
    fn handles_share_one_table() {
        let a = Messages::defaults();
        let b = a.clone();
        a.merge(json!({"default": "nope"})).unwrap();
        assert_eq!(b.default_message(), "nope");

        let snapshot = b.snapshot();
        a.merge(json!({"default": "later"})).unwrap();
        assert_eq!(snapshot.default_message(), "nope");
    }

    #[test]
    fn merge_file_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("zh.json");
        std::fs::write(&json_path, r#"{"number": {"min": "≥ {0}"}}"#).unwrap();
        let yaml_path = dir.path().join("en.yaml");
        std::fs::write(&yaml_path, "array.len: \"exactly {0}\"\n").unwrap();

        let messages = Messages::defaults();
        messages.merge_file(&json_path).unwrap();
        messages.merge_file(&yaml_path).unwrap();
        assert_eq!(messages.lookup(SchemaType::Number, "min"), "≥ {0}");
        assert_eq!(messages.lookup(SchemaType::Array, "len"), "exactly {0}");

        let missing = messages.merge_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn flatten_lists_dotted_keys() {
        let flat = MessageTable::defaults().flatten();
        assert_eq!(flat.get("array.max").map(String::as_str), Some("数组长度最大为 {0}"));
        assert!(flat.contains_key("default"));
    }
}
