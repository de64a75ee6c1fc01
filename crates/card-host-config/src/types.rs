//! Keyword enums shared by the host config and the card element model.
//!
//! Card JSON spells these keywords with arbitrary casing (`"Large"`, `"large"`,
//! `"extraLarge"`), so they deserialize case-insensitively and serialize in the
//! canonical camelCase spelling.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Canonical spelling used when serializing.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Parse a keyword, ignoring ASCII case and surrounding whitespace.
            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                $(
                    if value.eq_ignore_ascii_case($text) $(|| value.eq_ignore_ascii_case($alias))* {
                        return Some(Self::$variant);
                    }
                )+
                None
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).ok_or_else(|| de::Error::unknown_variant(&raw, &[$($text),+]))
            }
        }

        #[cfg(feature = "schema")]
        impl schemars::JsonSchema for $name {
            fn schema_name() -> std::borrow::Cow<'static, str> {
                stringify!($name).into()
            }

            fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
                schemars::json_schema!({
                    "type": "string",
                    "enum": [$($text),+]
                })
            }
        }
    };
}

keyword_enum! {
    /// Symbolic text size resolved through `HostConfig::font_sizes`.
    pub enum TextSize {
        Small => "small",
        Normal => "normal" | "default",
        Medium => "medium",
        Large => "large",
        ExtraLarge => "extraLarge",
    }
    default = Normal;
}

keyword_enum! {
    pub enum TextWeight {
        Lighter => "lighter",
        Normal => "normal" | "default",
        Bolder => "bolder",
    }
    default = Normal;
}

keyword_enum! {
    /// Semantic color name resolved through `HostConfig::colors`.
    pub enum TextColor {
        Default => "default",
        Dark => "dark",
        Light => "light",
        Accent => "accent",
        Good => "good",
        Warning => "warning",
        Attention => "attention",
    }
    default = Default;
}

keyword_enum! {
    /// Symbolic image size. `Auto` and `Stretch` have no pixel size.
    pub enum ImageSize {
        Auto => "auto",
        Stretch => "stretch",
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
    default = Auto;
}

keyword_enum! {
    pub enum HorizontalAlignment {
        Left => "left",
        Center => "center",
        Right => "right",
        Stretch => "stretch",
    }
    default = Left;
}

keyword_enum! {
    pub enum ActionsOrientation {
        Horizontal => "horizontal",
        Vertical => "vertical",
    }
    default = Horizontal;
}

keyword_enum! {
    /// Whether a ShowCard action expands in place or asks the host for a popup.
    pub enum ShowCardActionMode {
        Inline => "inline",
        Popup => "popup",
    }
    default = Inline;
}

keyword_enum! {
    /// Visual separation between an element and its previous sibling.
    pub enum SeparationStyle {
        None => "none",
        Default => "default",
        Strong => "strong",
    }
    default = Default;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords_case_insensitively() {
        assert_eq!(TextSize::parse("ExtraLarge"), Some(TextSize::ExtraLarge));
        assert_eq!(TextSize::parse(" DEFAULT "), Some(TextSize::Normal));
        assert_eq!(TextColor::parse("Attention"), Some(TextColor::Attention));
        assert_eq!(ImageSize::parse("huge"), None);
    }

    #[test]
    fn serializes_canonical_spelling() {
        let json = serde_json::to_string(&TextSize::ExtraLarge).expect("serialize");
        assert_eq!(json, "\"extraLarge\"");
        let parsed: SeparationStyle = serde_json::from_str("\"Strong\"").expect("deserialize");
        assert_eq!(parsed, SeparationStyle::Strong);
    }

    #[test]
    fn rejects_unknown_keyword() {
        let err = serde_json::from_str::<ShowCardActionMode>("\"modal\"").unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }
}
