pub mod blocking;
pub mod client;
pub mod client_config;
pub mod dispatch;
pub mod models;
pub mod request_builder;
pub mod transport;

pub use blocking::BlockingOllamaClient;
pub use client::OllamaClient;
pub use client_config::{ClientBuilder, ClientConfig, DEFAULT_ENDPOINT};
pub use dispatch::{Context, Route};
pub use models::*;
pub use transport::{HttpTransport, ResponseBuffer, Transport};
