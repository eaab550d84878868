//! Client for a local Ollama chat endpoint.
//!
//! A call takes a conversation and an optional [`Context`], picks one of three
//! request shapes (plain chat, chat with tool schemas, chat constrained to an
//! output schema), posts the body and hands back the parsed reply as a
//! [`Document`].
//!
//! ```no_run
//! use ollama_chat_rs::{BlockingOllamaClient, Context, Document, Message, ToolSchemaBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BlockingOllamaClient::new("qwen3:8b", "http://localhost:11434/api/chat")?;
//!
//! let weather = ToolSchemaBuilder::new()
//!     .function_name("get_current_weather")
//!     .function_description("Get the current weather for a location")
//!     .add_property("location", "string", "The location, e.g. Paris")
//!     .add_required_property("location")
//!     .build()?;
//! let context = Context::Tools(Document::from(vec![weather]));
//!
//! let reply = client.send(&[Message::user("What's the weather in Paris?")], Some(&context))?;
//! println!("{reply:#}");
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod observability;
pub(crate) mod services;

pub use document::{Document, DocumentError, Kind, Node};
pub use observability::init_default_tracing;
pub use services::llm::request_builder;
pub use services::llm::{
    BlockingOllamaClient, ChatResponse, ClientBuilder, ClientConfig, Context, HttpTransport,
    Message, MessageError, ModelClientError, OllamaClient, ResponseBuffer, ResponseMessage, Role,
    Route, ToolBuilderError, ToolCall, ToolCallFunction, ToolSchemaBuilder, Transport,
    DEFAULT_ENDPOINT,
};
