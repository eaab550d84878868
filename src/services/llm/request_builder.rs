//! Shapes the `/api/chat` request body.
//!
//! Every body starts from [`build_base`]; the tools and structured routes then
//! add their extension in place. Caller-supplied tool and schema nodes are
//! attached by handle, never copied or edited.

use crate::{
    document::{Document, DocumentError, Kind},
    Message,
};

/// Temperature injected next to an output schema.
pub const STRUCTURED_TEMPERATURE: f64 = 0.0;

/// `{"model", "messages": [{"role", "content"}, ..], "stream": false}`.
///
/// An empty message slice produces an empty `messages` array; the endpoint
/// decides whether that is acceptable.
pub fn build_base(model: &str, messages: &[Message]) -> Document {
    let messages: Document = messages
        .iter()
        .map(|m| {
            Document::from_entries([
                ("role", Document::from(m.role())),
                ("content", Document::from(m.content())),
            ])
        })
        .collect();

    Document::from_entries([
        ("model", Document::from(model)),
        ("messages", messages),
        ("stream", Document::bool(false)),
    ])
}

/// Adds `tools` under the `tools` key, sharing the caller's node.
pub fn attach_tools(body: &mut Document, tools: &Document) -> Result<(), DocumentError> {
    expect_kind(tools, Kind::Array)?;
    body.insert("tools", tools.clone())?;
    Ok(())
}

/// Adds `{"type": "json", "schema": schema}` under `format` and pins
/// `options.temperature` to [`STRUCTURED_TEMPERATURE`].
///
/// Other keys of an existing `options` object are kept.
pub fn attach_format(body: &mut Document, schema: &Document) -> Result<(), DocumentError> {
    expect_kind(schema, Kind::Object)?;
    expect_kind(body, Kind::Object)?;

    let wrapper = Document::from_entries([
        ("type", Document::from("json")),
        ("schema", schema.clone()),
    ]);
    body.insert("format", wrapper)?;

    let mut options = match body.get_typed("options", Kind::Object) {
        Some(existing) => existing.clone(),
        None => Document::object(),
    };
    options.insert("temperature", Document::float(STRUCTURED_TEMPERATURE))?;
    body.insert("options", options)?;
    Ok(())
}

fn expect_kind(doc: &Document, expected: Kind) -> Result<(), DocumentError> {
    match doc.kind() {
        found if found == expected => Ok(()),
        found => Err(DocumentError::KindMismatch { expected, found }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn weather_tools() -> Document {
        Document::from(json!([{
            "type": "function",
            "function": {
                "name": "get_current_weather",
                "description": "Get the current weather for a location",
                "parameters": {
                    "type": "object",
                    "properties": {"location": {"type": "string"}},
                    "required": ["location"]
                }
            }
        }]))
    }

    fn age_schema() -> Document {
        Document::from(json!({
            "type": "object",
            "properties": {"age": {"type": "integer"}, "available": {"type": "boolean"}},
            "required": ["age", "available"]
        }))
    }

    #[test]
    fn base_body_matches_wire_format() {
        let body = build_base("qwen3:8b", &[Message::user("Why is the sky blue?")]);
        assert_eq!(
            body.to_json_string().unwrap(),
            r#"{"model":"qwen3:8b","messages":[{"role":"user","content":"Why is the sky blue?"}],"stream":false}"#
        );
    }

    #[test]
    fn base_body_keeps_message_order() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("hi"),
            Message::assistant(""),
            Message::new("custom", "x").unwrap(),
        ];
        let body = build_base("m", &messages);
        let serialized = body.get("messages").and_then(Document::as_array).unwrap();
        assert_eq!(serialized.len(), messages.len());
        for (node, msg) in serialized.iter().zip(&messages) {
            assert_eq!(node.get("role").and_then(Document::as_str), Some(msg.role()));
            assert_eq!(node.get("content").and_then(Document::as_str), Some(msg.content()));
        }
    }

    #[test]
    fn empty_conversation_is_forwarded() {
        let body = build_base("m", &[]);
        assert_eq!(Value::from(&body), json!({"model": "m", "messages": [], "stream": false}));
    }

    #[test]
    fn tools_are_shared_not_copied() {
        let tools = weather_tools();
        let mut body = build_base("m", &[Message::user("Weather in Paris?")]);
        attach_tools(&mut body, &tools).unwrap();

        assert!(Document::ptr_eq(body.get("tools").unwrap(), &tools));
        assert_eq!(tools.ref_count(), 2);
        assert!(!body.contains_key("format"));
        assert_eq!(body.get("stream").and_then(Document::as_bool), Some(false));

        drop(body);
        assert_eq!(tools.ref_count(), 1);
    }

    #[test]
    fn format_is_wrapped_and_temperature_pinned() {
        let schema = age_schema();
        let before = Value::from(&schema);
        let mut body = build_base("m", &[Message::user("Ollama is 22.")]);
        attach_format(&mut body, &schema).unwrap();

        let format = body.get("format").unwrap();
        assert_eq!(format.get("type").and_then(Document::as_str), Some("json"));
        assert!(Document::ptr_eq(format.get("schema").unwrap(), &schema));
        assert_eq!(
            body.get("options")
                .and_then(|o| o.get("temperature"))
                .and_then(Document::as_f64),
            Some(0.0)
        );
        assert!(!body.contains_key("tools"));
        assert_eq!(body.get("stream").and_then(Document::as_bool), Some(false));
        assert_eq!(Value::from(&schema), before, "caller schema must not change");
    }

    #[test]
    fn format_merges_into_existing_options() {
        let mut body = build_base("m", &[]);
        body.insert(
            "options",
            Document::from_entries([("num_ctx", Document::from(2048i64))]),
        )
        .unwrap();
        attach_format(&mut body, &age_schema()).unwrap();

        let options = body.get("options").unwrap();
        assert_eq!(options.get("num_ctx").and_then(Document::as_i64), Some(2048));
        assert_eq!(options.get("temperature").and_then(Document::as_f64), Some(0.0));
    }

    #[test]
    fn wrong_extension_kinds_are_rejected() {
        let mut body = build_base("m", &[]);
        assert!(attach_tools(&mut body, &Document::object()).is_err());
        assert!(attach_format(&mut body, &Document::array()).is_err());
        assert!(!body.contains_key("tools"));
        assert!(!body.contains_key("format"));
    }
}
