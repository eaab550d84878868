use crate::document::{Document, Kind};

/// Per-call request shape chosen by the caller.
///
/// `None` in place of a context means plain chat.
#[derive(Debug, Clone, PartialEq)]
pub enum Context {
    /// Array of tool schemas, sent under `tools`.
    Tools(Document),
    /// Output schema object, sent under `format`.
    OutputFormat(Document),
}

impl Context {
    /// Key probed by [`Context::from_document`] for tool schemas.
    pub const TOOLS_KEY: &'static str = "tools";
    /// Canonical key probed for an output schema.
    pub const OUTPUT_FORMAT_KEY: &'static str = "outputFormat";
    /// Alias accepted after [`Self::OUTPUT_FORMAT_KEY`].
    pub const FORMAT_ALIAS_KEY: &'static str = "format";

    /// Reads a context out of an untyped object such as
    /// `{"tools": [...]}` or `{"outputFormat": {...}}`.
    ///
    /// `tools` is checked first, so it wins when both are present. Keys
    /// holding the wrong node kind are skipped. Returns `None` when nothing
    /// matches.
    pub fn from_document(doc: &Document) -> Option<Self> {
        if let Some(tools) = doc.get_typed(Self::TOOLS_KEY, Kind::Array) {
            return Some(Context::Tools(tools.clone()));
        }
        [Self::OUTPUT_FORMAT_KEY, Self::FORMAT_ALIAS_KEY]
            .iter()
            .find_map(|key| doc.get_typed(key, Kind::Object))
            .map(|schema| Context::OutputFormat(schema.clone()))
    }
}

/// The request shape a call will use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route<'a> {
    Plain,
    Tools(&'a Document),
    Structured(&'a Document),
}

impl<'a> Route<'a> {
    /// Picks the route for `context`. A variant carrying the wrong node kind
    /// falls back to plain chat.
    pub fn select(context: Option<&'a Context>) -> Self {
        match context {
            Some(Context::Tools(tools)) if tools.is_array() => Route::Tools(tools),
            Some(Context::OutputFormat(schema)) if schema.is_object() => Route::Structured(schema),
            _ => Route::Plain,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Plain => "plain",
            Route::Tools(_) => "tools",
            Route::Structured(_) => "structured",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn no_context_is_plain() {
        assert_eq!(Route::select(None), Route::Plain);
    }

    #[test]
    fn typed_variants_route_by_kind() {
        let tools = Context::Tools(Document::from(json!([{"type": "function"}])));
        assert_eq!(Route::select(Some(&tools)).name(), "tools");

        let format = Context::OutputFormat(Document::from(json!({"type": "object"})));
        assert_eq!(Route::select(Some(&format)).name(), "structured");
    }

    #[test]
    fn wrong_kind_falls_back_to_plain() {
        let tools = Context::Tools(Document::object());
        assert_eq!(Route::select(Some(&tools)), Route::Plain);

        let format = Context::OutputFormat(Document::array());
        assert_eq!(Route::select(Some(&format)), Route::Plain);
    }

    #[test]
    fn untyped_lookup_prefers_tools() {
        let doc = Document::from(json!({
            "format": {"type": "object"},
            "tools": [{"type": "function"}]
        }));
        let ctx = Context::from_document(&doc).unwrap();
        assert!(matches!(ctx, Context::Tools(_)));
        assert_eq!(Route::select(Some(&ctx)).name(), "tools");
    }

    #[test]
    fn untyped_lookup_accepts_both_format_keys() {
        let canonical = Document::from(json!({"outputFormat": {"type": "object"}}));
        assert!(matches!(
            Context::from_document(&canonical),
            Some(Context::OutputFormat(_))
        ));

        let alias = Document::from(json!({"format": {"type": "object"}}));
        assert!(matches!(Context::from_document(&alias), Some(Context::OutputFormat(_))));
    }

    #[test]
    fn untyped_lookup_shares_the_node() {
        let doc = Document::from(json!({"tools": []}));
        let Some(Context::Tools(tools)) = Context::from_document(&doc) else {
            panic!("expected tools context");
        };
        assert!(Document::ptr_eq(&tools, doc.get("tools").unwrap()));
    }

    #[test]
    fn unrecognised_or_mistyped_keys_yield_none() {
        assert!(Context::from_document(&Document::from(json!({"other": 1}))).is_none());
        assert!(Context::from_document(&Document::from(json!({"tools": {}}))).is_none());
        assert!(Context::from_document(&Document::from(json!({"outputFormat": "json"}))).is_none());
        assert!(Context::from_document(&Document::from("tools")).is_none());
    }
}
