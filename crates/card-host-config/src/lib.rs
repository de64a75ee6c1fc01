//! Host configuration for Adaptive Card rendering.
//!
//! A `HostConfig` is built once per host and stays immutable for the duration
//! of a render pass. Every struct fills missing fields from its defaults, so a
//! host only needs to supply the options it wants to change.

pub mod color;
pub mod types;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use color::{ColorConfig, ColorOption, SUBTLE_FACTOR, derive_subtle, is_valid_color};
pub use types::{
    ActionsOrientation, HorizontalAlignment, ImageSize, SeparationStyle, ShowCardActionMode,
    TextColor, TextSize, TextWeight,
};

pub const ACTION_OPEN_URL: &str = "Action.OpenUrl";
pub const ACTION_SUBMIT: &str = "Action.Submit";
pub const ACTION_HTTP: &str = "Action.Http";
pub const ACTION_SHOW_CARD: &str = "Action.ShowCard";

#[derive(Debug, Error)]
pub enum HostConfigError {
    #[error("host config json invalid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read host config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid color for {field}: {value}")]
    InvalidColor { field: String, value: String },
    #[error("font size {field} must be greater than zero")]
    InvalidFontSize { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct HostConfig {
    /// Font family for the card; may be a comma separated fallback list.
    pub font_family: String,
    pub font_sizes: FontSizeConfig,
    /// When false, inputs and actions are not rendered as interactive.
    pub supports_interactivity: bool,
    /// Action type names that may render as interactive buttons.
    pub supported_action_types: Vec<String>,
    pub image_sizes: ImageSizeConfig,
    pub max_actions: u32,
    pub separation: SeparationConfig,
    pub adaptive_card: CardConfig,
    pub colors: ColorConfig,
    pub image_set: ImageSetConfig,
    pub fact_set: FactSetConfig,
    pub column: ColumnConfig,
    pub actions: ActionsConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            font_family: "Calibri".to_string(),
            font_sizes: FontSizeConfig::default(),
            supports_interactivity: true,
            supported_action_types: vec![
                ACTION_OPEN_URL.to_string(),
                ACTION_SUBMIT.to_string(),
                ACTION_HTTP.to_string(),
                ACTION_SHOW_CARD.to_string(),
            ],
            image_sizes: ImageSizeConfig::default(),
            max_actions: 5,
            separation: SeparationConfig::default(),
            adaptive_card: CardConfig::default(),
            colors: ColorConfig::default(),
            image_set: ImageSetConfig::default(),
            fact_set: FactSetConfig::default(),
            column: ColumnConfig::default(),
            actions: ActionsConfig::default(),
        }
    }
}

impl HostConfig {
    pub fn from_json_str(json: &str) -> Result<Self, HostConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and validate a host config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HostConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| HostConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HostConfigError> {
        for (field, option) in self.colors.iter() {
            check_color(&format!("{field}.normal"), &option.normal)?;
            check_color(&format!("{field}.subtle"), &option.subtle)?;
        }
        check_color("adaptiveCard.backgroundColor", &self.adaptive_card.background_color)?;
        check_color("actions.backgroundColor", &self.actions.background_color)?;
        check_color("actions.borderColor", &self.actions.border_color)?;
        check_color("actions.textColor", &self.actions.text_color)?;
        check_color(
            "actions.showCard.backgroundColor",
            &self.actions.show_card.background_color,
        )?;
        for (field, option) in [
            ("separation.default", &self.separation.default),
            ("separation.strong", &self.separation.strong),
            ("column.separation.default", &self.column.separation.default),
            ("column.separation.strong", &self.column.separation.strong),
        ] {
            if let Some(color) = &option.line_color {
                check_color(&format!("{field}.lineColor"), color)?;
            }
        }
        self.font_sizes.validate()
    }

    pub fn font_size(&self, size: TextSize) -> u32 {
        self.font_sizes.get(size)
    }

    /// Pixel size for a symbolic image size; `None` for `auto` and `stretch`.
    pub fn image_size(&self, size: ImageSize) -> Option<u32> {
        self.image_sizes.get(size)
    }

    pub fn text_color(&self, color: TextColor, is_subtle: bool) -> &str {
        self.colors.get(color).pick(is_subtle)
    }

    /// Separation settings for an element; `None` when it asks for no separation.
    pub fn separation(&self, style: SeparationStyle) -> Option<&SeparationOption> {
        self.separation.get(style)
    }

    pub fn supports_action(&self, action_type: &str) -> bool {
        self.supported_action_types
            .iter()
            .any(|supported| supported == action_type)
    }
}

fn check_color(field: &str, value: &str) -> Result<(), HostConfigError> {
    if is_valid_color(value) {
        Ok(())
    } else {
        Err(HostConfigError::InvalidColor {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct FontSizeConfig {
    pub small: u32,
    pub normal: u32,
    pub medium: u32,
    pub large: u32,
    pub extra_large: u32,
}

impl Default for FontSizeConfig {
    fn default() -> Self {
        Self {
            small: 10,
            normal: 12,
            medium: 14,
            large: 17,
            extra_large: 20,
        }
    }
}

impl FontSizeConfig {
    pub fn get(&self, size: TextSize) -> u32 {
        match size {
            TextSize::Small => self.small,
            TextSize::Normal => self.normal,
            TextSize::Medium => self.medium,
            TextSize::Large => self.large,
            TextSize::ExtraLarge => self.extra_large,
        }
    }

    fn validate(&self) -> Result<(), HostConfigError> {
        for (field, value) in [
            ("fontSizes.small", self.small),
            ("fontSizes.normal", self.normal),
            ("fontSizes.medium", self.medium),
            ("fontSizes.large", self.large),
            ("fontSizes.extraLarge", self.extra_large),
        ] {
            if value == 0 {
                return Err(HostConfigError::InvalidFontSize { field });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ImageSizeConfig {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
}

impl Default for ImageSizeConfig {
    fn default() -> Self {
        Self {
            small: 60,
            medium: 120,
            large: 180,
        }
    }
}

impl ImageSizeConfig {
    pub fn get(&self, size: ImageSize) -> Option<u32> {
        match size {
            ImageSize::Small => Some(self.small),
            ImageSize::Medium => Some(self.medium),
            ImageSize::Large => Some(self.large),
            ImageSize::Auto | ImageSize::Stretch => None,
        }
    }
}

/// Padding or margin around a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct BoundaryConfig {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundaryConfig {
    pub fn uniform(value: u32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SeparationOption {
    /// Space between this element and the previous one.
    pub spacing: u32,
    /// Thickness of the visible line, zero for none.
    pub line_thickness: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SeparationConfig {
    pub default: SeparationOption,
    pub strong: SeparationOption,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            default: SeparationOption {
                spacing: 10,
                line_thickness: 0,
                line_color: None,
            },
            strong: SeparationOption {
                spacing: 20,
                line_thickness: 1,
                line_color: Some("#FF707070".to_string()),
            },
        }
    }
}

impl SeparationConfig {
    pub fn get(&self, style: SeparationStyle) -> Option<&SeparationOption> {
        match style {
            SeparationStyle::None => None,
            SeparationStyle::Default => Some(&self.default),
            SeparationStyle::Strong => Some(&self.strong),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct CardConfig {
    pub padding: BoundaryConfig,
    pub background_color: String,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            padding: BoundaryConfig::uniform(8),
            background_color: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ImageSetConfig {
    pub image_size: ImageSize,
}

impl Default for ImageSetConfig {
    fn default() -> Self {
        Self {
            image_size: ImageSize::Medium,
        }
    }
}

/// Text appearance used for fact titles and values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TextConfig {
    pub size: TextSize,
    pub weight: TextWeight,
    pub color: TextColor,
    pub is_subtle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct FactSetConfig {
    pub title: TextConfig,
    pub value: TextConfig,
    /// Horizontal gap between a fact title and its value.
    pub spacing: u32,
}

impl Default for FactSetConfig {
    fn default() -> Self {
        Self {
            title: TextConfig {
                weight: TextWeight::Bolder,
                ..TextConfig::default()
            },
            value: TextConfig::default(),
            spacing: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ColumnConfig {
    /// Separation between adjacent columns.
    pub separation: SeparationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ShowCardConfig {
    pub action_mode: ShowCardActionMode,
    pub background_color: String,
    /// Inline cards extend their background to the parent card edges.
    pub auto_padding: bool,
}

impl Default for ShowCardConfig {
    fn default() -> Self {
        Self {
            action_mode: ShowCardActionMode::Inline,
            background_color: "#FFF8F8F8".to_string(),
            auto_padding: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ActionsConfig {
    pub show_card: ShowCardConfig,
    pub actions_orientation: ActionsOrientation,
    pub action_alignment: HorizontalAlignment,
    pub background_color: String,
    pub border_color: String,
    pub text_color: String,
    pub border_thickness: u32,
    pub font_weight: u32,
    pub font_size: u32,
    /// Space between buttons.
    pub spacing: u32,
    /// Space between a button title and its edge.
    pub padding: BoundaryConfig,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            show_card: ShowCardConfig::default(),
            actions_orientation: ActionsOrientation::Horizontal,
            action_alignment: HorizontalAlignment::Center,
            background_color: "#FF5098FF".to_string(),
            border_color: "#FF000000".to_string(),
            text_color: "#FFFFFFFF".to_string(),
            border_thickness: 1,
            font_weight: 400,
            font_size: 12,
            spacing: 8,
            padding: BoundaryConfig::uniform(4),
        }
    }
}
