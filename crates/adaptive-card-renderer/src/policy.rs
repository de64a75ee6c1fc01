use std::env;
use std::fmt;

/// Environment variable consulted by [`UnsupportedElementPolicy::from_env`].
pub const POLICY_ENV: &str = "ADAPTIVE_CARD_UNSUPPORTED_POLICY";

/// What a container does when a child has no renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedElementPolicy {
    /// Fail the whole render with `UnsupportedElementType`.
    #[default]
    Abort,
    /// Drop the child and record an `unsupported_element` warning.
    Skip,
    /// Emit a placeholder node and record an `unsupported_element` warning.
    Placeholder,
}

impl UnsupportedElementPolicy {
    /// Parse a policy string (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" | "error" => Some(Self::Abort),
            "skip" | "drop" => Some(Self::Skip),
            "placeholder" => Some(Self::Placeholder),
            _ => None,
        }
    }

    /// Reads the policy from `ADAPTIVE_CARD_UNSUPPORTED_POLICY`.
    pub fn from_env() -> Self {
        env::var(POLICY_ENV)
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
            Self::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for UnsupportedElementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
