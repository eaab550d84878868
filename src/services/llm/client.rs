use tracing::{debug, field, instrument, Span};

use crate::{
    document::Document,
    services::llm::{
        dispatch::{Context, Route},
        models::{errors::ModelClientError, message::Message},
        request_builder::{attach_format, attach_tools, build_base},
        transport::{HttpTransport, Transport},
    },
    ClientConfig,
};

/// Chat client bound to one model and one endpoint.
///
/// The client holds no per-call state: every call builds its own request
/// body and response buffer, and resolves only once the exchange has
/// finished. Dropping the client releases its configuration.
///
/// ```no_run
/// use ollama_chat_rs::{Message, OllamaClient};
///
/// # async fn run() -> Result<(), ollama_chat_rs::ModelClientError> {
/// let client = OllamaClient::new("qwen3:8b", "http://localhost:11434/api/chat")?;
/// let reply = client.send(&[Message::user("Why is the sky blue?")], None).await?;
/// println!("{reply:#}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OllamaClient<T = HttpTransport> {
    model: String,
    endpoint: String,
    transport: T,
}

impl OllamaClient<HttpTransport> {
    /// Creates a client that talks HTTP to `endpoint`.
    pub fn new(
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ModelClientError> {
        Self::with_transport(model, endpoint, HttpTransport::new())
    }
}

impl<T: Transport> OllamaClient<T> {
    /// Creates a client over a custom [`Transport`].
    pub fn with_transport(
        model: impl Into<String>,
        endpoint: impl Into<String>,
        transport: T,
    ) -> Result<Self, ModelClientError> {
        let model = model.into();
        let endpoint = endpoint.into();
        if model.is_empty() {
            return Err(ModelClientError::Construction("Model name cannot be empty.".into()));
        }
        if endpoint.is_empty() {
            return Err(ModelClientError::Construction("Endpoint URL cannot be empty.".into()));
        }
        Ok(Self {
            model,
            endpoint,
            transport,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `messages` using the request shape picked from `context`.
    ///
    /// Tools win over an output format, and a context whose payload has the
    /// wrong node kind is sent as plain chat. The returned document is the
    /// endpoint's reply, owned by the caller.
    #[instrument(
        name = "ollama.send",
        skip_all,
        fields(model = %self.model, messages = messages.len(), route = field::Empty)
    )]
    pub async fn send(
        &self,
        messages: &[Message],
        context: Option<&Context>,
    ) -> Result<Document, ModelClientError> {
        let route = Route::select(context);
        Span::current().record("route", route.name());
        debug!(route = route.name(), "dispatching chat request");

        match route {
            Route::Plain => self.chat(messages).await,
            Route::Tools(tools) => self.chat_with_tools(messages, tools).await,
            Route::Structured(schema) => self.chat_with_structure(messages, schema).await,
        }
    }

    /// Plain chat: `model`, `messages` and `stream: false` only.
    pub async fn chat(&self, messages: &[Message]) -> Result<Document, ModelClientError> {
        let body = build_base(&self.model, messages);
        self.transport.post(&self.endpoint, body).await
    }

    /// Chat with tool schemas. `tools` must be an array; the caller keeps its
    /// handle and the request shares the node for the duration of the call.
    pub async fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: &Document,
    ) -> Result<Document, ModelClientError> {
        let mut body = build_base(&self.model, messages);
        attach_tools(&mut body, tools)?;
        self.transport.post(&self.endpoint, body).await
    }

    /// Chat constrained to `schema`, which must be an object.
    pub async fn chat_with_structure(
        &self,
        messages: &[Message],
        schema: &Document,
    ) -> Result<Document, ModelClientError> {
        let mut body = build_base(&self.model, messages);
        attach_format(&mut body, schema)?;
        self.transport.post(&self.endpoint, body).await
    }
}

impl TryFrom<ClientConfig> for OllamaClient {
    type Error = ModelClientError;

    fn try_from(cfg: ClientConfig) -> Result<Self, Self::Error> {
        let Some(model) = cfg.model else {
            return Err(ModelClientError::Construction("Model not set.".into()));
        };
        let Some(endpoint) = cfg.endpoint else {
            return Err(ModelClientError::Construction("Endpoint not set.".into()));
        };
        let transport = match cfg.extra_headers {
            Some(headers) => HttpTransport::new().with_headers(&headers)?,
            None => HttpTransport::new(),
        };
        Self::with_transport(model, endpoint, transport)
    }
}
