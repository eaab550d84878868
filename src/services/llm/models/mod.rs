pub mod base;
pub mod chat;
pub mod errors;
pub mod message;
pub mod tool_builder;

pub use base::*;
pub use chat::*;
pub use errors::*;
pub use message::*;
pub use tool_builder::*;
