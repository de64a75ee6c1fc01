use crate::actions::ActionInvocation;
use crate::column_set::TrackSize;
use crate::context::{InputCell, InputRegistry};
use crate::errors::RenderError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::rc::Rc;

/// Warning emitted while rendering a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderWarning {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RenderWarning {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: None,
            path: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: Option<&str>) -> Self {
        self.path = path.map(str::to_string);
        self
    }
}

/// Kind of visual node a renderer produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    Card,
    Text,
    Image,
    Panel,
    Grid,
    FactSet,
    Separator,
    Button,
    TouchTarget,
    TextBox,
    NumberBox,
    DatePicker,
    TimePicker,
    Toggle,
    ChoiceSet,
    ShowCard,
    Placeholder,
    /// Host-defined node kind.
    Custom(String),
}

/// Deferred action trigger attached to a rendered node.
#[derive(Clone)]
pub struct ActionHandler(Rc<dyn Fn() -> Result<ActionInvocation, RenderError>>);

impl ActionHandler {
    pub fn new(handler: impl Fn() -> Result<ActionInvocation, RenderError> + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Run the action against the live input values.
    pub fn invoke(&self) -> Result<ActionInvocation, RenderError> {
        (self.0)()
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionHandler(..)")
    }
}

fn serialize_bound<S: Serializer>(
    _handler: &Option<ActionHandler>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(true)
}

/// Opaque visual node handed back to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedElement {
    pub kind: VisualKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Host style applied to the node, if the host defines it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    /// Column tracks of a grid node, one per child column.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tracks: Vec<TrackSize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedElement>,
    #[serde(
        rename = "interactive",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub handler: Option<ActionHandler>,
    #[serde(skip)]
    pub input: Option<InputCell>,
}

impl RenderedElement {
    pub fn new(kind: VisualKind) -> Self {
        Self {
            kind,
            id: None,
            style: None,
            properties: Map::new(),
            tracks: Vec::new(),
            children: Vec::new(),
            handler: None,
            input: None,
        }
    }

    pub fn with_id(mut self, id: Option<&str>) -> Self {
        self.id = id.map(str::to_string);
        self
    }

    pub fn with_style(mut self, style: Option<String>) -> Self {
        self.style = style;
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RenderedElement>) -> Self {
        self.children = children;
        self
    }

    pub fn with_handler(mut self, handler: ActionHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Depth-first search for the first node matching `predicate`.
    pub fn find_by(&self, predicate: &dyn Fn(&RenderedElement) -> bool) -> Option<&RenderedElement> {
        if predicate(self) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_by(predicate))
    }

    pub fn find(&self, id: &str) -> Option<&RenderedElement> {
        self.find_by(&|node| node.id.as_deref() == Some(id))
    }

    /// This node and every descendant, in pre-order.
    pub fn descendants(&self) -> Vec<&RenderedElement> {
        let mut nodes = vec![self];
        for child in &self.children {
            nodes.extend(child.descendants());
        }
        nodes
    }

    /// Fire this node's action; `None` when the node is not interactive.
    pub fn invoke(&self) -> Option<Result<ActionInvocation, RenderError>> {
        self.handler.as_ref().map(ActionHandler::invoke)
    }
}

/// Result of rendering a whole card.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedCard {
    pub root: RenderedElement,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RenderWarning>,
    #[serde(skip)]
    pub inputs: InputRegistry,
}

impl RenderedCard {
    pub fn find(&self, id: &str) -> Option<&RenderedElement> {
        self.root.find(id)
    }

    /// Live value cell of the input rendered with `id`.
    ///
    /// When several inputs share an id the last one rendered is returned,
    /// matching the accessor the input registry kept.
    pub fn input(&self, id: &str) -> Option<&InputCell> {
        self.root
            .descendants()
            .into_iter()
            .rev()
            .filter(|node| node.id.as_deref() == Some(id))
            .find_map(|node| node.input.as_ref())
    }

    /// First interactive node whose id is `action_id`.
    pub fn action(&self, action_id: &str) -> Option<&RenderedElement> {
        self.root
            .find_by(&|node| node.handler.is_some() && node.id.as_deref() == Some(action_id))
    }

    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|warning| warning.code == code)
    }
}
