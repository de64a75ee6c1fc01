use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Property setters a host attaches to a named style.
pub type Style = Map<String, Value>;

/// Named-style lookup supplied by the host.
pub trait StyleLookup {
    /// `None` when the host defines no style with this name.
    fn get_style(&self, name: &str) -> Option<&Style>;
}

/// Style names the built-in renderers ask for.
pub const STANDARD_STYLES: &[&str] = &[
    "Adaptive.Card",
    "Adaptive.TextBlock",
    "Adaptive.Image",
    "Adaptive.Image.Person",
    "Adaptive.Container",
    "Adaptive.ColumnSet",
    "Adaptive.Column",
    "Adaptive.FactSet",
    "Adaptive.Fact.Title",
    "Adaptive.Fact.Value",
    "Adaptive.ImageSet",
    "Adaptive.Separator",
    "Adaptive.SelectAction",
    "Adaptive.Actions",
    "Adaptive.Action",
    "Adaptive.ShowCard",
    "Adaptive.Input.Text",
    "Adaptive.Input.Text.InlineAction",
    "Adaptive.Input.Number",
    "Adaptive.Input.Date",
    "Adaptive.Input.Time",
    "Adaptive.Input.Toggle",
    "Adaptive.Input.ChoiceSet",
    "Adaptive.Placeholder",
];

/// In-memory style dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    styles: BTreeMap<String, Style>,
}

impl StyleSheet {
    /// Every standard style name with no setters.
    ///
    /// Sentiment styles (`Adaptive.Action.Positive`, ...) are left out so the
    /// color fallbacks apply until a host defines them.
    pub fn standard() -> Self {
        let mut sheet = Self::default();
        for name in STANDARD_STYLES {
            sheet.insert(*name, Style::new());
        }
        sheet
    }

    pub fn insert(&mut self, name: impl Into<String>, style: Style) -> Option<Style> {
        self.styles.insert(name.into(), style)
    }

    pub fn remove(&mut self, name: &str) -> Option<Style> {
        self.styles.remove(name)
    }

    pub fn with_style(mut self, name: impl Into<String>, style: Style) -> Self {
        self.insert(name, style);
        self
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl StyleLookup for StyleSheet {
    fn get_style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }
}
