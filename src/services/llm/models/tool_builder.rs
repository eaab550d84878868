use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolBuilderError {
    MissingFunctionName,
    MissingFunctionDescription,
    UnknownRequiredProperty(String),
}

impl std::fmt::Display for ToolBuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolBuilderError::MissingFunctionName => write!(f, "Function name is required."),
            ToolBuilderError::MissingFunctionDescription => {
                write!(f, "Function description is required.")
            }
            ToolBuilderError::UnknownRequiredProperty(name) => {
                write!(f, "Required property '{name}' was never added.")
            }
        }
    }
}

impl std::error::Error for ToolBuilderError {}

#[derive(Debug, Clone)]
struct Property {
    name: String,
    property_type: String,
    description: String,
    allowed: Vec<String>,
}

/// Builds the `{"type":"function","function":{...}}` node the tools route
/// sends to the endpoint.
///
/// ```
/// use ollama_chat_rs::ToolSchemaBuilder;
///
/// let weather = ToolSchemaBuilder::new()
///     .function_name("get_current_weather")
///     .function_description("Get the current weather for a location")
///     .add_property("location", "string", "The location, e.g. San Francisco, CA")
///     .add_enum_property("format", "Temperature unit", ["celsius", "fahrenheit"])
///     .add_required_property("location")
///     .add_required_property("format")
///     .build()
///     .unwrap();
///
/// assert_eq!(weather.get("type").and_then(|t| t.as_str()), Some("function"));
/// ```
#[derive(Debug, Default)]
pub struct ToolSchemaBuilder {
    function_name: Option<String>,
    function_description: Option<String>,
    function_properties: Vec<Property>,
    function_required: Vec<String>,
}

impl ToolSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the function for the tool. (Required)
    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    /// Sets the description of the function for the tool. (Required)
    pub fn function_description<T>(mut self, description: T) -> Self
    where
        T: Into<String>,
    {
        self.function_description = Some(description.into());
        self
    }

    /// Adds a property to the function's parameters. Adding a name twice
    /// replaces the earlier definition.
    ///
    /// # parameters
    /// * `name` - The name of the property.
    /// * `property_type` - The JSON schema type of the property (e.g., "string", "number", "boolean").
    /// * `description` - A description of what the property represents.
    pub fn add_property(
        self,
        name: impl Into<String>,
        property_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.push_property(Property {
            name: name.into(),
            property_type: property_type.into(),
            description: description.into(),
            allowed: Vec::new(),
        })
    }

    /// Adds a string property restricted to `values`.
    pub fn add_enum_property<I, S>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_property(Property {
            name: name.into(),
            property_type: "string".into(),
            description: description.into(),
            allowed: values.into_iter().map(Into::into).collect(),
        })
    }

    fn push_property(mut self, property: Property) -> Self {
        self.function_properties.retain(|p| p.name != property.name);
        self.function_properties.push(property);
        self
    }

    /// Marks a property as required for the function.
    /// The property must be added before `build` is called.
    pub fn add_required_property(mut self, name: impl Into<String>) -> Self {
        self.function_required.push(name.into());
        self
    }

    /// Consumes the builder and produces the tool schema node.
    ///
    /// # Errors
    /// Returns a `ToolBuilderError` if required fields are missing or a
    /// required property was never defined.
    pub fn build(self) -> Result<Document, ToolBuilderError> {
        let name = self.function_name.ok_or(ToolBuilderError::MissingFunctionName)?;
        let description = self
            .function_description
            .ok_or(ToolBuilderError::MissingFunctionDescription)?;

        if let Some(missing) = self
            .function_required
            .iter()
            .find(|r| !self.function_properties.iter().any(|p| &p.name == *r))
        {
            return Err(ToolBuilderError::UnknownRequiredProperty(missing.clone()));
        }

        let properties = Document::from_entries(self.function_properties.into_iter().map(|p| {
            let mut fields = vec![
                ("type", Document::string(p.property_type)),
                ("description", Document::string(p.description)),
            ];
            if !p.allowed.is_empty() {
                fields.push(("enum", p.allowed.into_iter().map(Document::string).collect()));
            }
            (p.name, Document::from_entries(fields))
        }));

        let parameters = Document::from_entries([
            ("type", Document::from("object")),
            ("properties", properties),
            (
                "required",
                self.function_required.into_iter().map(Document::string).collect(),
            ),
        ]);

        let function = Document::from_entries([
            ("name", Document::string(name)),
            ("description", Document::string(description)),
            ("parameters", parameters),
        ]);

        Ok(Document::from_entries([
            ("type", Document::from("function")),
            ("function", function),
        ]))
    }
}
