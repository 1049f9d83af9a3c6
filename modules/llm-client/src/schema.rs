use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Types usable as structured model output.
///
/// Automatically implemented for any `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a strict-mode JSON schema for this type.
    ///
    /// OpenAI's json_schema response format requires:
    /// 1. `additionalProperties: false` on every object schema
    /// 2. every property listed in `required`, nullable ones included
    /// 3. no `$ref` indirection (definitions fully inlined)
    ///
    /// Gemini gets the same schema embedded in its prompt, where the
    /// strict form is harmless.
    fn strict_schema() -> Value {
        let mut value = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = match &value {
            Value::Object(map) => map.get("definitions").cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        };
        tighten(&mut value, &definitions);

        if let Value::Object(map) = &mut value {
            map.remove("definitions");
            map.remove("$schema");
        }

        value
    }

    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Single recursive pass: inline `$ref`, unwrap single-element `allOf`
/// wrappers, then enforce strict-object rules before descending.
fn tighten(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(name) {
                        *value = def.clone();
                        tighten(value, definitions);
                        return;
                    }
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if let [single] = all_of.as_slice() {
                    *value = single.clone();
                    tighten(value, definitions);
                    return;
                }
            }

            if map.get("type") == Some(&Value::String("object".to_string())) {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
                if let Some(Value::Object(props)) = map.get("properties") {
                    let keys: Vec<Value> = props
                        .keys()
                        .map(|k| Value::String(k.clone()))
                        .collect();
                    map.insert("required".to_string(), Value::Array(keys));
                }
            }

            for (_, child) in map.iter_mut() {
                tighten(child, definitions);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                tighten(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Citation {
        url: String,
        quote: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Verdict {
        label: String,
        confidence: f64,
        citations: Vec<Citation>,
    }

    #[test]
    fn nullable_fields_are_still_required() {
        let schema = Citation::strict_schema();
        let required = schema["required"].as_array().unwrap();
        let names: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();
        assert!(names.contains(&"url"));
        assert!(names.contains(&"quote"));
    }

    #[test]
    fn nested_definitions_are_inlined() {
        let schema = Verdict::strict_schema();
        let as_text = serde_json::to_string(&schema).unwrap();
        assert!(!as_text.contains("$ref"));
        assert!(!schema.as_object().unwrap().contains_key("definitions"));

        let item_schema = &schema["properties"]["citations"]["items"];
        assert_eq!(item_schema["type"], "object");
        assert_eq!(item_schema["additionalProperties"], false);
    }

    #[test]
    fn objects_reject_additional_properties() {
        let schema = Verdict::strict_schema();
        assert_eq!(schema["additionalProperties"], false);
    }
}
