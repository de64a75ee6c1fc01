//! Typed Adaptive Card element tree.
//!
//! Parsing is lenient: every attribute has a default and unknown `type` values
//! become [`CardElement::Custom`] so host renderers can claim them.

use card_host_config::{
    HorizontalAlignment, ImageSize, SeparationStyle, TextColor, TextSize, TextWeight,
};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Dispatch key for an element variant.
///
/// Built-in variants are associated constants; hosts can mint tags for their
/// own element types with [`ElementType::custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ElementType(Cow<'static, str>);

impl ElementType {
    pub const TEXT_BLOCK: Self = Self::builtin("TextBlock");
    pub const IMAGE: Self = Self::builtin("Image");
    pub const CONTAINER: Self = Self::builtin("Container");
    pub const COLUMN_SET: Self = Self::builtin("ColumnSet");
    pub const COLUMN: Self = Self::builtin("Column");
    pub const FACT_SET: Self = Self::builtin("FactSet");
    pub const IMAGE_SET: Self = Self::builtin("ImageSet");
    pub const SUBMIT_ACTION: Self = Self::builtin("Action.Submit");
    pub const OPEN_URL_ACTION: Self = Self::builtin("Action.OpenUrl");
    pub const SHOW_CARD_ACTION: Self = Self::builtin("Action.ShowCard");
    pub const HTTP_ACTION: Self = Self::builtin("Action.Http");
    pub const TEXT_INPUT: Self = Self::builtin("Input.Text");
    pub const NUMBER_INPUT: Self = Self::builtin("Input.Number");
    pub const DATE_INPUT: Self = Self::builtin("Input.Date");
    pub const TIME_INPUT: Self = Self::builtin("Input.Time");
    pub const TOGGLE_INPUT: Self = Self::builtin("Input.Toggle");
    pub const CHOICE_SET_INPUT: Self = Self::builtin("Input.ChoiceSet");

    const fn builtin(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_action(&self) -> bool {
        self.as_str().starts_with("Action.")
    }

    pub fn is_input(&self) -> bool {
        self.as_str().starts_with("Input.")
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn visible() -> bool {
    true
}

/// Attributes shared by body elements and inputs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCommon {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub separation: SeparationStyle,
    #[serde(default = "visible")]
    pub is_visible: bool,
}

impl Default for ElementCommon {
    fn default() -> Self {
        Self {
            id: None,
            separation: SeparationStyle::Default,
            is_visible: true,
        }
    }
}

impl ElementCommon {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Attributes shared by every action.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionCommon {
    pub id: Option<String>,
    pub title: String,
    pub icon_url: Option<String>,
    /// Sentiment: `default`, `positive`, `destructive` or a host-defined name.
    pub style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub text: String,
    pub size: TextSize,
    pub weight: TextWeight,
    pub color: TextColor,
    pub is_subtle: bool,
    pub wrap: bool,
    pub max_lines: Option<u32>,
    pub horizontal_alignment: HorizontalAlignment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageStyle {
    #[default]
    #[serde(alias = "Normal", alias = "default", alias = "Default")]
    Normal,
    #[serde(alias = "Person")]
    Person,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub url: String,
    pub size: ImageSize,
    pub style: ImageStyle,
    pub alt_text: Option<String>,
    pub horizontal_alignment: HorizontalAlignment,
    pub select_action: Option<Box<CardElement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Container {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub items: Vec<CardElement>,
    pub select_action: Option<Box<CardElement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSet {
    #[serde(flatten)]
    pub common: ElementCommon,
    /// Always `CardElement::Column` when parsed from JSON; the `type` key of a
    /// column may be omitted.
    #[serde(deserialize_with = "columns_from_json")]
    pub columns: Vec<CardElement>,
    pub select_action: Option<Box<CardElement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Column {
    #[serde(flatten)]
    pub common: ElementCommon,
    /// Raw size directive: `stretch`, `auto`, a weight, or `<n>px`.
    #[serde(alias = "width", deserialize_with = "size_directive")]
    pub size: Option<String>,
    pub items: Vec<CardElement>,
    pub select_action: Option<Box<CardElement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Fact {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FactSet {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub facts: Vec<Fact>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSet {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub images: Vec<Image>,
    pub image_size: Option<ImageSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitAction {
    #[serde(flatten)]
    pub action: ActionCommon,
    /// Opaque static payload, deep-copied on every invocation.
    pub data: Option<Value>,
    /// Input ids whose values are merged; every registered input when absent.
    pub inputs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenUrlAction {
    #[serde(flatten)]
    pub action: ActionCommon,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowCardAction {
    #[serde(flatten)]
    pub action: ActionCommon,
    pub card: Box<AdaptiveCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpAction {
    #[serde(flatten)]
    pub action: ActionCommon,
    pub method: String,
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<HttpHeader>,
}

impl Default for HttpAction {
    fn default() -> Self {
        Self {
            action: ActionCommon::default(),
            method: "GET".to_string(),
            url: String::new(),
            body: None,
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextInputStyle {
    #[default]
    #[serde(alias = "Text")]
    Text,
    #[serde(alias = "Tel")]
    Tel,
    #[serde(alias = "Url")]
    Url,
    #[serde(alias = "Email")]
    Email,
}

impl TextInputStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextInput {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub placeholder: Option<String>,
    pub value: Option<String>,
    pub is_multiline: bool,
    pub max_length: Option<u32>,
    pub style: TextInputStyle,
    /// Action rendered next to the text box.
    pub inline_action: Option<Box<CardElement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberInput {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub placeholder: Option<String>,
    pub value: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Shape shared by `Input.Date` and `Input.Time`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateTimeInput {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub placeholder: Option<String>,
    pub value: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleInput {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub title: String,
    pub value: Option<String>,
    pub value_on: String,
    pub value_off: String,
}

impl Default for ToggleInput {
    fn default() -> Self {
        Self {
            common: ElementCommon::default(),
            title: String::new(),
            value: None,
            value_on: "true".to_string(),
            value_off: "false".to_string(),
        }
    }
}

impl ToggleInput {
    pub fn is_checked(&self) -> bool {
        self.value.as_deref() == Some(self.value_on.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Choice {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceInputStyle {
    #[default]
    #[serde(alias = "Compact")]
    Compact,
    #[serde(alias = "Expanded")]
    Expanded,
}

impl ChoiceInputStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Expanded => "expanded",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChoiceSetInput {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub choices: Vec<Choice>,
    pub is_multi_select: bool,
    pub style: ChoiceInputStyle,
    pub value: Option<String>,
}

/// An element whose `type` has no built-in model.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomElement {
    pub type_name: String,
    /// The element's JSON object, `type` included.
    pub properties: Value,
}

impl CustomElement {
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardElement {
    TextBlock(TextBlock),
    Image(Image),
    Container(Container),
    ColumnSet(ColumnSet),
    Column(Column),
    FactSet(FactSet),
    ImageSet(ImageSet),
    SubmitAction(SubmitAction),
    OpenUrlAction(OpenUrlAction),
    ShowCardAction(ShowCardAction),
    HttpAction(HttpAction),
    TextInput(TextInput),
    NumberInput(NumberInput),
    DateInput(DateTimeInput),
    TimeInput(DateTimeInput),
    ToggleInput(ToggleInput),
    ChoiceSetInput(ChoiceSetInput),
    Custom(CustomElement),
}

impl CardElement {
    /// Build an element from a JSON object carrying a `type` key.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let type_name = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| <serde_json::Error as de::Error>::missing_field("type"))?
            .to_string();
        let element = match type_name.as_str() {
            "TextBlock" => Self::TextBlock(serde_json::from_value(value)?),
            "Image" => Self::Image(serde_json::from_value(value)?),
            "Container" => Self::Container(serde_json::from_value(value)?),
            "ColumnSet" => Self::ColumnSet(serde_json::from_value(value)?),
            "Column" => Self::Column(serde_json::from_value(value)?),
            "FactSet" => Self::FactSet(serde_json::from_value(value)?),
            "ImageSet" => Self::ImageSet(serde_json::from_value(value)?),
            "Action.Submit" => Self::SubmitAction(serde_json::from_value(value)?),
            "Action.OpenUrl" => Self::OpenUrlAction(serde_json::from_value(value)?),
            "Action.ShowCard" => Self::ShowCardAction(serde_json::from_value(value)?),
            "Action.Http" => Self::HttpAction(serde_json::from_value(value)?),
            "Input.Text" => Self::TextInput(serde_json::from_value(value)?),
            "Input.Number" => Self::NumberInput(serde_json::from_value(value)?),
            "Input.Date" => Self::DateInput(serde_json::from_value(value)?),
            "Input.Time" => Self::TimeInput(serde_json::from_value(value)?),
            "Input.Toggle" => Self::ToggleInput(serde_json::from_value(value)?),
            "Input.ChoiceSet" => Self::ChoiceSetInput(serde_json::from_value(value)?),
            _ => Self::Custom(CustomElement {
                type_name,
                properties: value,
            }),
        };
        Ok(element)
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::TextBlock(_) => ElementType::TEXT_BLOCK,
            Self::Image(_) => ElementType::IMAGE,
            Self::Container(_) => ElementType::CONTAINER,
            Self::ColumnSet(_) => ElementType::COLUMN_SET,
            Self::Column(_) => ElementType::COLUMN,
            Self::FactSet(_) => ElementType::FACT_SET,
            Self::ImageSet(_) => ElementType::IMAGE_SET,
            Self::SubmitAction(_) => ElementType::SUBMIT_ACTION,
            Self::OpenUrlAction(_) => ElementType::OPEN_URL_ACTION,
            Self::ShowCardAction(_) => ElementType::SHOW_CARD_ACTION,
            Self::HttpAction(_) => ElementType::HTTP_ACTION,
            Self::TextInput(_) => ElementType::TEXT_INPUT,
            Self::NumberInput(_) => ElementType::NUMBER_INPUT,
            Self::DateInput(_) => ElementType::DATE_INPUT,
            Self::TimeInput(_) => ElementType::TIME_INPUT,
            Self::ToggleInput(_) => ElementType::TOGGLE_INPUT,
            Self::ChoiceSetInput(_) => ElementType::CHOICE_SET_INPUT,
            Self::Custom(custom) => ElementType::custom(custom.type_name.clone()),
        }
    }

    /// Body and input attributes; `None` for actions and custom elements.
    pub fn common(&self) -> Option<&ElementCommon> {
        match self {
            Self::TextBlock(e) => Some(&e.common),
            Self::Image(e) => Some(&e.common),
            Self::Container(e) => Some(&e.common),
            Self::ColumnSet(e) => Some(&e.common),
            Self::Column(e) => Some(&e.common),
            Self::FactSet(e) => Some(&e.common),
            Self::ImageSet(e) => Some(&e.common),
            Self::TextInput(e) => Some(&e.common),
            Self::NumberInput(e) => Some(&e.common),
            Self::DateInput(e) | Self::TimeInput(e) => Some(&e.common),
            Self::ToggleInput(e) => Some(&e.common),
            Self::ChoiceSetInput(e) => Some(&e.common),
            Self::SubmitAction(_)
            | Self::OpenUrlAction(_)
            | Self::ShowCardAction(_)
            | Self::HttpAction(_)
            | Self::Custom(_) => None,
        }
    }

    pub fn action(&self) -> Option<&ActionCommon> {
        match self {
            Self::SubmitAction(a) => Some(&a.action),
            Self::OpenUrlAction(a) => Some(&a.action),
            Self::ShowCardAction(a) => Some(&a.action),
            Self::HttpAction(a) => Some(&a.action),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        if let Some(common) = self.common() {
            return common.id.as_deref();
        }
        if let Some(action) = self.action() {
            return action.id.as_deref();
        }
        match self {
            Self::Custom(custom) => custom.id(),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.action().map(|action| action.title.as_str())
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Self::Custom(custom) => custom
                .properties
                .get("isVisible")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            other => other.common().is_none_or(|common| common.is_visible),
        }
    }

    pub fn separation(&self) -> SeparationStyle {
        self.common()
            .map(|common| common.separation)
            .unwrap_or_default()
    }

    pub fn select_action(&self) -> Option<&CardElement> {
        match self {
            Self::Image(e) => e.select_action.as_deref(),
            Self::Container(e) => e.select_action.as_deref(),
            Self::ColumnSet(e) => e.select_action.as_deref(),
            Self::Column(e) => e.select_action.as_deref(),
            _ => None,
        }
    }

    /// Size directive of a column; `None` for every other element.
    pub fn column_size(&self) -> Option<&str> {
        match self {
            Self::Column(column) => column.size.as_deref(),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for CardElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        CardElement::from_value(value).map_err(de::Error::custom)
    }
}

fn columns_from_json<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<CardElement>, D::Error> {
    let columns = Vec::<Column>::deserialize(deserializer)?;
    Ok(columns.into_iter().map(CardElement::Column).collect())
}

/// Column sizes arrive as strings (`"auto"`, `"2"`) or bare numbers (`2`).
fn size_directive<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "column size must be a string or number, got {other}"
        ))),
    }
}

/// A remote resource referenced by the card, for hosts that prefetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResource {
    pub url: String,
    pub mime_type: String,
}

impl RemoteResource {
    fn image(url: &str) -> Self {
        Self {
            url: url.to_string(),
            mime_type: "image".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdaptiveCard {
    pub version: Option<String>,
    pub body: Vec<CardElement>,
    pub actions: Vec<CardElement>,
    pub select_action: Option<Box<CardElement>>,
    pub background_image: Option<String>,
    pub speak: Option<String>,
}

impl AdaptiveCard {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every image URL the card references, in document order.
    pub fn resource_information(&self) -> Vec<RemoteResource> {
        let mut resources = Vec::new();
        collect_card_resources(self, &mut resources);
        resources
    }
}

fn collect_card_resources(card: &AdaptiveCard, out: &mut Vec<RemoteResource>) {
    if let Some(url) = card.background_image.as_deref() {
        out.push(RemoteResource::image(url));
    }
    for element in card
        .body
        .iter()
        .chain(card.actions.iter())
        .chain(card.select_action.as_deref())
    {
        collect_element_resources(element, out);
    }
}

fn collect_element_resources(element: &CardElement, out: &mut Vec<RemoteResource>) {
    if let Some(icon) = element.action().and_then(|action| action.icon_url.as_deref()) {
        out.push(RemoteResource::image(icon));
    }
    match element {
        CardElement::Image(image) => out.push(RemoteResource::image(&image.url)),
        CardElement::ImageSet(set) => {
            out.extend(set.images.iter().map(|image| RemoteResource::image(&image.url)));
        }
        CardElement::Container(container) => {
            for item in &container.items {
                collect_element_resources(item, out);
            }
        }
        CardElement::ColumnSet(set) => {
            for column in &set.columns {
                collect_element_resources(column, out);
            }
        }
        CardElement::Column(column) => {
            for item in &column.items {
                collect_element_resources(item, out);
            }
        }
        CardElement::ShowCardAction(show) => collect_card_resources(&show.card, out),
        CardElement::TextInput(input) => {
            if let Some(action) = input.inline_action.as_deref() {
                collect_element_resources(action, out);
            }
        }
        _ => {}
    }
    if let Some(action) = element.select_action() {
        collect_element_resources(action, out);
    }
}
