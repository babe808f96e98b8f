use rmcp::model::JsonObject;
use rmcp::schemars::{self, JsonSchema, generate::SchemaSettings};
use std::sync::Arc;

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// so the `section` enum is rendered inline instead of through a `$ref`. MCP Inspector
/// then shows the sections as a dropdown rather than a raw JSON input field.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::SearchRequest;
    use assert2::check;

    #[test]
    fn section_enum_is_inlined() {
        let schema = inline_schema_for_type::<SearchRequest>();
        let text = serde_json::to_string(&*schema).unwrap();
        check!(!text.contains("$ref"));
        check!(text.contains("enumvalues"));
        check!(text.contains("query"));
    }
}
