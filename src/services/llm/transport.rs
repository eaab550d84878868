use std::{collections::HashMap, future::Future};

use futures::StreamExt;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client,
};
use tracing::{debug, error, instrument, trace, warn};

use crate::{document::Document, services::llm::models::errors::ModelClientError};

/// Response bytes collected chunk by chunk.
///
/// The backing storage always ends in a single NUL byte that is not counted
/// in [`len`](Self::len), so the contents can be handed to C-style consumers
/// at any point between appends.
#[derive(Debug, Clone)]
pub struct ResponseBuffer {
    data: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self { data: vec![0] }
    }

    /// Appends one chunk and re-terminates the buffer.
    pub fn append(&mut self, chunk: &[u8]) {
        self.data.pop();
        self.data.reserve(chunk.len() + 1);
        self.data.extend_from_slice(chunk);
        self.data.push(0);
    }

    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Contents without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Contents including the trailing NUL.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Lossy text form, for logging.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Parses the whole buffer as one JSON document.
    pub fn parse(&self) -> Result<Document, ModelClientError> {
        Document::from_slice(self.as_bytes()).map_err(|e| {
            error!(%e, raw = %self.to_string_lossy(), "deserialization error");
            ModelClientError::Parse(format!(
                "Error decoding response body: {e}. Raw JSON was: '{}'",
                self.to_string_lossy()
            ))
        })
    }
}

impl Default for ResponseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves a request body to an endpoint and brings back the parsed reply.
///
/// The body is taken by value: once `post` returns, on any path, the request
/// is gone.
pub trait Transport {
    fn post(
        &self,
        url: &str,
        body: Document,
    ) -> impl Future<Output = Result<Document, ModelClientError>> + Send;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    headers: HeaderMap,
    error_on_status: bool,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            headers: HeaderMap::new(),
            error_on_status: false,
        }
    }

    /// When enabled, a non-success HTTP status yields
    /// [`ModelClientError::Api`] carrying the raw body. Off by default: the
    /// body is parsed whatever the status, so Ollama's `{"error": ...}`
    /// payloads reach the caller as documents.
    pub fn error_on_status(mut self, enabled: bool) -> Self {
        self.error_on_status = enabled;
        self
    }

    /// Adds headers sent with every request. `Content-Type` is always
    /// `application/json` and cannot be overridden.
    pub fn with_headers(
        mut self,
        headers: &HashMap<String, String>,
    ) -> Result<Self, ModelClientError> {
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ModelClientError::Construction(format!("Invalid header name '{name}': {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ModelClientError::Construction(format!("Invalid value for header '{name}': {e}"))
            })?;
            self.headers.insert(name, value);
        }
        Ok(self)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    #[instrument(name = "ollama.post", skip_all, fields(url = %url))]
    async fn post(&self, url: &str, body: Document) -> Result<Document, ModelClientError> {
        let payload = body
            .to_json_vec()
            .map_err(|e| ModelClientError::Serialization(e.to_string()))?;
        drop(body);
        trace!(bytes = payload.len(), "serialized request body");

        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await;
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                error!(%e, "request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        debug!(%status, "received response");

        let mut buffer = ResponseBuffer::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    error!(%e, "failed to read response body");
                    return Err(e.into());
                }
            };
            trace!(size = chunk.len(), total = buffer.len() + chunk.len(), "response chunk");
            buffer.append(&chunk);
        }

        if !status.is_success() {
            let error_text = buffer.to_string_lossy();
            if self.error_on_status {
                error!(%status, body = %error_text, "request failed");
                return Err(ModelClientError::Api {
                    status: status.as_u16(),
                    body: error_text,
                });
            }
            warn!(%status, body = %error_text, "non-success status, parsing body");
        }

        buffer.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_accumulate_with_terminator() {
        let mut buffer = ResponseBuffer::new();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.as_bytes_with_nul(), b"\0");

        buffer.append(b"ab");
        assert_eq!(buffer.as_bytes_with_nul(), b"ab\0");

        buffer.append(b"cd");
        assert_eq!(buffer.as_bytes(), b"abcd");
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.as_bytes_with_nul().last(), Some(&0));
    }

    #[test]
    fn empty_chunk_keeps_single_terminator() {
        let mut buffer = ResponseBuffer::new();
        buffer.append(b"x");
        buffer.append(b"");
        assert_eq!(buffer.as_bytes_with_nul(), b"x\0");
    }

    #[test]
    fn json_split_across_chunks_parses() {
        let mut buffer = ResponseBuffer::new();
        buffer.append(br#"{"done":"#);
        buffer.append(br#"true}"#);
        let doc = buffer.parse().unwrap();
        assert_eq!(doc.get("done").and_then(Document::as_bool), Some(true));
    }

    #[test]
    fn empty_or_malformed_buffer_is_parse_error() {
        let empty = ResponseBuffer::new();
        assert!(matches!(empty.parse(), Err(ModelClientError::Parse(_))));

        let mut broken = ResponseBuffer::new();
        broken.append(b"<html>502</html>");
        let err = broken.parse().unwrap_err();
        assert!(matches!(err, ModelClientError::Parse(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn invalid_header_is_construction_error() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        assert!(matches!(
            HttpTransport::new().with_headers(&headers),
            Err(ModelClientError::Construction(_))
        ));
    }
}
