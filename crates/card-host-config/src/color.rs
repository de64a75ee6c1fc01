use crate::types::TextColor;
use serde::{Deserialize, Serialize};

/// Factor applied to the leading channel of `normal` when deriving `subtle`.
pub const SUBTLE_FACTOR: f64 = 0.7;

/// Derive a subtle color from a `#AARRGGBB` (or `#RRGGBB`) string.
///
/// The first byte after `#` is scaled by [`SUBTLE_FACTOR`] and truncated
/// towards zero; the remaining characters are copied unchanged. The scaled
/// byte is written as two lowercase hex digits, so `#FF0000FF` becomes
/// `#b20000FF`. Returns `None` when the leading byte is not hex.
pub fn derive_subtle(normal: &str) -> Option<String> {
    let digits = normal.strip_prefix('#')?;
    let lead = u8::from_str_radix(digits.get(..2)?, 16).ok()?;
    let rest = digits.get(2..)?;
    let scaled = (f64::from(lead) * SUBTLE_FACTOR) as u8;
    Some(format!("#{scaled:02x}{rest}"))
}

/// True for `#RRGGBB` and `#AARRGGBB`.
pub fn is_valid_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
struct RawColorOption {
    normal: String,
    #[serde(default)]
    subtle: Option<String>,
}

impl From<RawColorOption> for ColorOption {
    fn from(raw: RawColorOption) -> Self {
        match raw.subtle {
            Some(subtle) => ColorOption::with_subtle(raw.normal, subtle),
            None => ColorOption::new(raw.normal),
        }
    }
}

/// A normal/subtle color pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawColorOption")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ColorOption {
    pub normal: String,
    pub subtle: String,
}

impl ColorOption {
    /// Build a pair whose subtle variant is derived from `normal`.
    ///
    /// A `normal` value without a hex leading byte cannot be scaled; the
    /// subtle variant then repeats `normal` and `HostConfig::validate`
    /// reports the bad value.
    pub fn new(normal: impl Into<String>) -> Self {
        let normal = normal.into();
        let subtle = derive_subtle(&normal).unwrap_or_else(|| {
            tracing::warn!(color = %normal, "cannot derive subtle color, reusing normal");
            normal.clone()
        });
        Self { normal, subtle }
    }

    pub fn with_subtle(normal: impl Into<String>, subtle: impl Into<String>) -> Self {
        Self {
            normal: normal.into(),
            subtle: subtle.into(),
        }
    }

    pub fn pick(&self, is_subtle: bool) -> &str {
        if is_subtle { &self.subtle } else { &self.normal }
    }
}

/// Semantic color palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ColorConfig {
    pub default: ColorOption,
    pub accent: ColorOption,
    pub dark: ColorOption,
    pub light: ColorOption,
    pub good: ColorOption,
    pub warning: ColorOption,
    pub attention: ColorOption,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            default: ColorOption::new("#FF000000"),
            accent: ColorOption::new("#FF0000FF"),
            dark: ColorOption::new("#FF101010"),
            light: ColorOption::new("#FFFFFFFF"),
            good: ColorOption::new("#FF008000"),
            warning: ColorOption::new("#FFFFD700"),
            attention: ColorOption::new("#FF8B0000"),
        }
    }
}

impl ColorConfig {
    pub fn get(&self, color: TextColor) -> &ColorOption {
        match color {
            TextColor::Default => &self.default,
            TextColor::Dark => &self.dark,
            TextColor::Light => &self.light,
            TextColor::Accent => &self.accent,
            TextColor::Good => &self.good,
            TextColor::Warning => &self.warning,
            TextColor::Attention => &self.attention,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&'static str, &ColorOption)> {
        [
            ("colors.default", &self.default),
            ("colors.accent", &self.accent),
            ("colors.dark", &self.dark),
            ("colors.light", &self.light),
            ("colors.good", &self.good),
            ("colors.warning", &self.warning),
            ("colors.attention", &self.attention),
        ]
        .into_iter()
    }
}
