use std::fmt;

use super::{base::Role, errors::MessageError};

/// A single conversation turn.
///
/// Roles are free-form strings so endpoints with extra roles still work; the
/// [`Role`] helpers cover the usual ones. Content may be empty but is never
/// absent. Messages cannot be changed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: String,
    content: String,
}

impl Message {
    /// Creates a message, rejecting an empty role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Result<Self, MessageError> {
        let role = role.into();
        if role.is_empty() {
            return Err(MessageError::EmptyRole);
        }
        Ok(Self {
            role,
            content: content.into(),
        })
    }

    fn with_role(role: Role, content: String) -> Self {
        Self {
            role: role.into(),
            content,
        }
    }

    pub fn system<T: Into<String>>(content: T) -> Self {
        Self::with_role(Role::System, content.into())
    }
    pub fn user<T: Into<String>>(content: T) -> Self {
        Self::with_role(Role::User, content.into())
    }
    pub fn assistant<T: Into<String>>(content: T) -> Self {
        Self::with_role(Role::Assistant, content.into())
    }
    pub fn tool<T: Into<String>>(content: T) -> Self {
        Self::with_role(Role::Tool, content.into())
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message{{role='{}', content='{}'}}", self.role, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_role_is_rejected() {
        assert_eq!(Message::new("", "hello").unwrap_err(), MessageError::EmptyRole);
    }

    #[test]
    fn empty_content_is_allowed() {
        let msg = Message::new("user", "").unwrap();
        assert_eq!(msg.role(), "user");
        assert_eq!(msg.content(), "");
    }

    #[test]
    fn role_helpers_use_lowercase_names() {
        assert_eq!(Message::system("s").role(), "system");
        assert_eq!(Message::user("u").role(), "user");
        assert_eq!(Message::assistant("a").role(), "assistant");
        assert_eq!(Message::tool("t").role(), "tool");
    }

    #[test]
    fn display_format() {
        let msg = Message::user("Why is the sky blue?");
        assert_eq!(
            msg.to_string(),
            "Message{role='user', content='Why is the sky blue?'}"
        );
    }
}
