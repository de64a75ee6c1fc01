use crate::actions::{ActionDispatcher, ActionInvoker};
use crate::element::ElementType;
use crate::output::RenderWarning;
use crate::policy::UnsupportedElementPolicy;
use crate::registry::RendererRegistry;
use crate::style::{StyleLookup, StyleSheet};
use card_host_config::HostConfig;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Reads the current value of a rendered input.
pub trait InputValue {
    /// `None` when the input holds no value.
    fn current_value(&self) -> Option<String>;
}

/// Shared, mutable value of a built-in input.
///
/// The rendered node and the input registry hold clones of the same cell, so a
/// value set by the host is what the next action invocation reads.
#[derive(Debug, Clone, Default)]
pub struct InputCell(Rc<RefCell<Option<String>>>);

impl InputCell {
    pub fn new(initial: Option<String>) -> Self {
        Self(Rc::new(RefCell::new(initial)))
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.0.borrow_mut() = Some(value.into());
    }

    pub fn clear(&self) {
        *self.0.borrow_mut() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }
}

impl InputValue for InputCell {
    fn current_value(&self) -> Option<String> {
        self.get()
    }
}

/// Input id to value accessor, shared by every context of one card render.
#[derive(Clone, Default)]
pub struct InputRegistry(Rc<RefCell<BTreeMap<String, Rc<dyn InputValue>>>>);

impl InputRegistry {
    /// Register an accessor; returns `true` when an earlier one was replaced.
    pub fn register(&self, id: impl Into<String>, accessor: Rc<dyn InputValue>) -> bool {
        self.0.borrow_mut().insert(id.into(), accessor).is_some()
    }

    pub fn get(&self, id: &str) -> Option<String> {
        let accessor = self.0.borrow().get(id).cloned();
        accessor.and_then(|accessor| accessor.current_value())
    }

    /// Current values keyed by input id; inputs holding no value are skipped.
    pub fn current_values(&self) -> BTreeMap<String, String> {
        let accessors: Vec<(String, Rc<dyn InputValue>)> = self
            .0
            .borrow()
            .iter()
            .map(|(id, accessor)| (id.clone(), Rc::clone(accessor)))
            .collect();
        accessors
            .into_iter()
            .filter_map(|(id, accessor)| accessor.current_value().map(|value| (id, value)))
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.borrow().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl fmt::Debug for InputRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

/// State threaded through one card render.
///
/// Host config, renderer table and style lookup are read-only snapshots; the
/// input registry and the dispatcher are shared with every action handler the
/// render produces.
pub struct RenderContext {
    host_config: Rc<HostConfig>,
    registry: Rc<RendererRegistry>,
    styles: Rc<dyn StyleLookup>,
    inputs: InputRegistry,
    dispatcher: Rc<dyn ActionDispatcher>,
    policy: UnsupportedElementPolicy,
    warnings: Vec<RenderWarning>,
}

impl RenderContext {
    /// Context with the built-in renderers and the standard style sheet.
    pub fn new(host_config: Rc<HostConfig>, dispatcher: Rc<dyn ActionDispatcher>) -> Self {
        Self {
            host_config,
            registry: Rc::new(RendererRegistry::with_builtins()),
            styles: Rc::new(StyleSheet::standard()),
            inputs: InputRegistry::default(),
            dispatcher,
            policy: UnsupportedElementPolicy::default(),
            warnings: Vec::new(),
        }
    }

    pub fn with_registry(mut self, registry: Rc<RendererRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_styles(mut self, styles: Rc<dyn StyleLookup>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_policy(mut self, policy: UnsupportedElementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Context for a nested card that shares inputs, config and renderers.
    pub fn nested(&self) -> Self {
        Self {
            host_config: Rc::clone(&self.host_config),
            registry: Rc::clone(&self.registry),
            styles: Rc::clone(&self.styles),
            inputs: self.inputs.clone(),
            dispatcher: Rc::clone(&self.dispatcher),
            policy: self.policy,
            warnings: Vec::new(),
        }
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.host_config
    }

    pub fn shared_host_config(&self) -> Rc<HostConfig> {
        Rc::clone(&self.host_config)
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    pub fn policy(&self) -> UnsupportedElementPolicy {
        self.policy
    }

    /// Name of the style to apply, if the host defines one called `name`.
    pub fn style(&self, name: &str) -> Option<String> {
        self.styles.get_style(name).map(|_| name.to_string())
    }

    pub fn inputs(&self) -> &InputRegistry {
        &self.inputs
    }

    /// Register an input accessor. A later registration for the same id wins.
    pub fn register_input(&mut self, id: &str, accessor: Rc<dyn InputValue>) {
        if self.inputs.register(id, accessor) {
            debug!(input_id = id, "input id registered twice, keeping the later input");
        }
    }

    pub fn dispatcher(&self) -> Rc<dyn ActionDispatcher> {
        Rc::clone(&self.dispatcher)
    }

    /// Capability that merges live inputs into action payloads on demand.
    pub fn action_invoker(&self) -> ActionInvoker {
        ActionInvoker::new(self.inputs.clone(), Rc::clone(&self.dispatcher))
    }

    /// Interactivity is on and the host config allow-lists this action type.
    pub fn action_allowed(&self, element_type: &ElementType) -> bool {
        self.host_config.supports_interactivity
            && self.host_config.supports_action(element_type.as_str())
    }

    pub fn warn(&mut self, warning: RenderWarning) {
        debug!(code = %warning.code, path = ?warning.path, "render warning");
        self.warnings.push(warning);
    }

    pub fn extend_warnings(&mut self, warnings: Vec<RenderWarning>) {
        self.warnings.extend(warnings);
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<RenderWarning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionInvocation;

    struct Fixed(&'static str);

    impl InputValue for Fixed {
        fn current_value(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn context() -> RenderContext {
        let dispatcher: Rc<dyn ActionDispatcher> = Rc::new(|_: &ActionInvocation| {});
        RenderContext::new(Rc::new(HostConfig::default()), dispatcher)
    }

    #[test]
    fn later_registration_wins() {
        let mut context = context();
        context.register_input("name", Rc::new(Fixed("first")));
        context.register_input("name", Rc::new(Fixed("second")));
        assert_eq!(context.inputs().get("name").as_deref(), Some("second"));
        assert_eq!(context.inputs().len(), 1);
    }

    #[test]
    fn cells_are_read_at_call_time() {
        let mut context = context();
        let cell = InputCell::new(None);
        context.register_input("email", Rc::new(cell.clone()));
        assert!(context.inputs().current_values().is_empty());
        cell.set("a@example.com");
        assert_eq!(
            context.inputs().get("email").as_deref(),
            Some("a@example.com")
        );
    }

    #[test]
    fn nested_context_shares_inputs() {
        let context = context();
        let mut nested = context.nested();
        nested.register_input("inner", Rc::new(Fixed("x")));
        assert!(context.inputs().contains("inner"));
    }

    #[test]
    fn style_resolves_only_defined_names() {
        let context = context();
        assert_eq!(
            context.style("Adaptive.TextBlock").as_deref(),
            Some("Adaptive.TextBlock")
        );
        assert_eq!(context.style("Adaptive.Action.Positive"), None);
    }
}
