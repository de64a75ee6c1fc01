use crate::element::ElementType;
use thiserror::Error;

/// Errors surfaced while rendering a card or invoking one of its actions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// No alternate and no built-in renderer exists for the element's type.
    #[error("no renderer registered for element type `{element_type}`")]
    UnsupportedElementType { element_type: ElementType },
    /// A submit action's static `data` is neither a JSON object nor absent.
    #[error("invalid action payload: {0}")]
    InvalidActionPayload(String),
}

impl RenderError {
    pub fn unsupported(element_type: ElementType) -> Self {
        RenderError::UnsupportedElementType { element_type }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        RenderError::InvalidActionPayload(message.into())
    }
}
