//! A schema of any type, for heterogeneous field maps.

use serde_json::Value;
use valr_core::{FormRule, SchemaType, Trigger, TriggerRule};

use crate::array::ArraySchema;
use crate::compile::Rule;
use crate::number::NumberSchema;
use crate::runner::Outcome;
use crate::string::StringSchema;

/// One of the three concrete schema types.
#[derive(Debug, Clone)]
pub enum AnySchema {
    /// A string schema.
    String(StringSchema),
    /// A number schema.
    Number(NumberSchema),
    /// An array schema.
    Array(ArraySchema),
}

macro_rules! dispatch {
    ($self:expr, $schema:ident => $body:expr) => {
        match $self {
            AnySchema::String($schema) => $body,
            AnySchema::Number($schema) => $body,
            AnySchema::Array($schema) => $body,
        }
    };
}

impl AnySchema {
    /// Declared type of the wrapped schema.
    pub fn schema_type(&self) -> SchemaType {
        dispatch!(self, schema => schema.schema_type())
    }

    /// Compiled rules. See [`Schema::rules`](crate::Schema::rules).
    pub fn rules(&self) -> Vec<Rule> {
        dispatch!(self, schema => schema.rules())
    }

    /// Shape-A rules.
    pub fn form_rules(&self) -> Vec<FormRule> {
        dispatch!(self, schema => schema.form_rules())
    }

    /// Shape-B rules tagged with `trigger`.
    pub fn trigger_rules(&self, trigger: Option<Trigger>) -> Vec<TriggerRule> {
        dispatch!(self, schema => schema.trigger_rules(trigger))
    }

    /// Run the pipeline over descriptors only, skipping raw rules.
    pub fn evaluate(&self, input: &Value) -> Option<String> {
        dispatch!(self, schema => schema.evaluate(input))
    }

    /// Validate synchronously through the form runner.
    pub fn check(&self, input: &Value) -> Option<String> {
        dispatch!(self, schema => schema.check(input))
    }

    /// Validate through the async shim. Never fails.
    pub async fn validate(&self, input: &Value) -> Outcome {
        dispatch!(self, schema => schema.validate(input).await)
    }

    /// The string schema, if this is one.
    pub fn as_string(&self) -> Option<&StringSchema> {
        match self {
            AnySchema::String(schema) => Some(schema),
            _ => None,
        }
    }
}

impl From<StringSchema> for AnySchema {
    fn from(schema: StringSchema) -> Self {
        AnySchema::String(schema)
    }
}

impl From<NumberSchema> for AnySchema {
    fn from(schema: NumberSchema) -> Self {
        AnySchema::Number(schema)
    }
}

impl From<ArraySchema> for AnySchema {
    fn from(schema: ArraySchema) -> Self {
        AnySchema::Array(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Valr;
    use serde_json::json;

    #[test]
    fn dispatches_to_inner_schema() {
        let valr = Valr::new();
        let schemas: Vec<AnySchema> = vec![
            valr.string().email(None).into(),
            valr.number().positive(None).into(),
            valr.array().unique(None).into(),
        ];
        let types: Vec<_> = schemas.iter().map(AnySchema::schema_type).collect();
        assert_eq!(types, SchemaType::ALL.to_vec());
        assert_eq!(schemas[1].check(&json!(-1)).as_deref(), Some("必须为正数"));
        assert_eq!(schemas[2].evaluate(&json!([1, 1])).as_deref(), Some("数组元素不能重复"));
        assert!(schemas[0].as_string().is_some());
        assert!(schemas[1].as_string().is_none());
    }

    #[tokio::test]
    async fn validates_asynchronously() {
        let schema = AnySchema::from(Valr::new().number().max(3.0, None));
        assert_eq!(schema.validate(&json!(4)).await, Outcome::fail("最大值为 3"));
        assert_eq!(schema.validate(&json!(3)).await, Outcome::pass());
    }
}
