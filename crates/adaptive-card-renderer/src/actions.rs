//! Action invocation: payload construction and delivery to the host.

use crate::context::InputRegistry;
use crate::element::{CardElement, SubmitAction};
use crate::errors::RenderError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// An action firing: the source action and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInvocation {
    pub action: Rc<CardElement>,
    pub data: Value,
}

impl ActionInvocation {
    pub fn action_id(&self) -> Option<&str> {
        self.action.id()
    }
}

impl Serialize for ActionInvocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActionInvocation", 4)?;
        state.serialize_field("actionType", self.action.element_type().as_str())?;
        state.serialize_field("actionId", &self.action.id())?;
        state.serialize_field("title", &self.action.title())?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

/// Host sink for action invocations.
pub trait ActionDispatcher {
    fn dispatch(&self, invocation: &ActionInvocation);
}

impl<F> ActionDispatcher for F
where
    F: Fn(&ActionInvocation),
{
    fn dispatch(&self, invocation: &ActionInvocation) {
        self(invocation)
    }
}

/// Dispatcher that keeps every invocation it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    invocations: Rc<RefCell<Vec<ActionInvocation>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> Vec<ActionInvocation> {
        self.invocations.borrow().clone()
    }

    pub fn take(&self) -> Vec<ActionInvocation> {
        std::mem::take(&mut *self.invocations.borrow_mut())
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn dispatch(&self, invocation: &ActionInvocation) {
        self.invocations.borrow_mut().push(invocation.clone());
    }
}

/// Deferred capability bound into rendered action handlers.
///
/// Holds the card's input registry rather than input values, so payloads
/// reflect whatever the inputs contain when the action fires.
#[derive(Clone)]
pub struct ActionInvoker {
    inputs: InputRegistry,
    dispatcher: Rc<dyn ActionDispatcher>,
}

impl ActionInvoker {
    pub fn new(inputs: InputRegistry, dispatcher: Rc<dyn ActionDispatcher>) -> Self {
        Self { inputs, dispatcher }
    }

    /// Build the payload for `action`, hand it to the dispatcher and return it.
    ///
    /// Nothing is dispatched when the payload cannot be built.
    pub fn invoke(&self, action: &Rc<CardElement>) -> Result<ActionInvocation, RenderError> {
        let data = self.payload_for(action)?;
        let invocation = ActionInvocation {
            action: Rc::clone(action),
            data,
        };
        debug!(
            action_type = %action.element_type(),
            action_id = ?action.id(),
            "dispatching action"
        );
        self.dispatcher.dispatch(&invocation);
        Ok(invocation)
    }

    fn payload_for(&self, action: &CardElement) -> Result<Value, RenderError> {
        match action {
            CardElement::SubmitAction(submit) => merge_submit_data(submit, &self.inputs),
            CardElement::HttpAction(_) => Ok(Value::Object(input_map(&self.inputs, None))),
            CardElement::OpenUrlAction(open) => Ok(json!({ "url": open.url })),
            _ => Ok(Value::Object(Map::new())),
        }
    }
}

/// Combine a submit action's static data with the live input values.
///
/// The static object is copied, never mutated. Inputs are added under their
/// ids; a static key with the same name keeps its static value. When the
/// action lists `inputs`, only those ids are merged.
pub fn merge_submit_data(
    action: &SubmitAction,
    inputs: &InputRegistry,
) -> Result<Value, RenderError> {
    let mut data = match &action.data {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(object)) => object.clone(),
        Some(other) => {
            return Err(RenderError::invalid_payload(format!(
                "submit data must be a JSON object, found {}",
                json_kind(other)
            )));
        }
    };
    for (id, value) in input_map(inputs, action.inputs.as_deref()) {
        data.entry(id).or_insert(value);
    }
    Ok(Value::Object(data))
}

fn input_map(inputs: &InputRegistry, only: Option<&[String]>) -> Map<String, Value> {
    inputs
        .current_values()
        .into_iter()
        .filter(|(id, _)| only.is_none_or(|ids| ids.iter().any(|wanted| wanted == id)))
        .map(|(id, value)| (id, Value::String(value)))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
