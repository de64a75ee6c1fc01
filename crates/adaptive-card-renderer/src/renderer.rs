use crate::actions::ActionDispatcher;
use crate::builtins::{
    boundary, card_separator, inert_action, render_action_set, separator_for, wrap_select_action,
};
use crate::context::RenderContext;
use crate::element::{AdaptiveCard, CardElement, ElementType};
use crate::errors::RenderError;
use crate::output::{RenderWarning, RenderedCard, RenderedElement, VisualKind};
use crate::policy::UnsupportedElementPolicy;
use crate::registry::{ElementRenderer, RenderResult, RendererRegistry};
use crate::style::{StyleLookup, StyleSheet};
use card_host_config::HostConfig;
use std::rc::Rc;
use tracing::{debug, warn};

/// Render one element through the host's renderer table.
///
/// Actions outside the host allow-list become inert buttons. Otherwise an
/// alternate renderer wins over the built-in, hidden elements render to
/// nothing, and a type with neither fails with `UnsupportedElementType`.
pub fn render_element(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let element_type = element.element_type();
    if element_type.is_action() && !context.action_allowed(&element_type) {
        return Ok(Some(inert_action(element, context)));
    }
    if let Some(alternate) = context.registry().alternate(&element_type) {
        debug!(%element_type, "rendering with alternate renderer");
        return alternate.render(element, context);
    }
    if !element.is_visible() {
        return Ok(None);
    }
    if element_type.is_input() && !context.host_config().supports_interactivity {
        context.warn(
            RenderWarning::new("interactivity_not_supported")
                .with_message(format!("{element_type} dropped, interactivity is off"))
                .with_path(element.id()),
        );
        return Ok(None);
    }
    match context.registry().builtin(&element_type) {
        Some(builtin) => builtin.render(element, context),
        None => Err(RenderError::unsupported(element_type)),
    }
}

/// Render a container child, applying the context's unsupported-element policy.
pub fn render_item(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    match render_element(element, context) {
        Err(RenderError::UnsupportedElementType { element_type }) => {
            handle_unsupported(element_type, element.id(), context)
        }
        other => other,
    }
}

fn handle_unsupported(
    element_type: ElementType,
    id: Option<&str>,
    context: &mut RenderContext,
) -> RenderResult {
    match context.policy() {
        UnsupportedElementPolicy::Abort => Err(RenderError::unsupported(element_type)),
        UnsupportedElementPolicy::Skip => {
            warn!(%element_type, "skipping unsupported element");
            context.warn(
                RenderWarning::new("unsupported_element")
                    .with_message(format!("{element_type} skipped"))
                    .with_path(id),
            );
            Ok(None)
        }
        UnsupportedElementPolicy::Placeholder => {
            warn!(%element_type, "rendering placeholder for unsupported element");
            context.warn(
                RenderWarning::new("unsupported_element")
                    .with_message(format!("{element_type} replaced by a placeholder"))
                    .with_path(id),
            );
            Ok(Some(
                RenderedElement::new(VisualKind::Placeholder)
                    .with_id(id)
                    .with_style(context.style("Adaptive.Placeholder"))
                    .with_property("elementType", element_type.as_str()),
            ))
        }
    }
}

/// Render a sibling list, inserting separators between rendered children.
///
/// The first rendered child never gets a separator, and neither does a child
/// whose separation is `none`.
pub fn render_children(
    items: &[CardElement],
    context: &mut RenderContext,
) -> Result<Vec<RenderedElement>, RenderError> {
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        let Some(node) = render_item(item, context)? else {
            continue;
        };
        if !rendered.is_empty() {
            if let Some(separator) = separator_for(item.separation(), context) {
                rendered.push(separator);
            }
        }
        rendered.push(node);
    }
    Ok(rendered)
}

/// Render a card root: body, action set and card-level select action.
pub fn render_card(card: &AdaptiveCard, context: &mut RenderContext) -> Result<RenderedElement, RenderError> {
    let config = context.shared_host_config();
    let mut root = RenderedElement::new(VisualKind::Card)
        .with_style(context.style("Adaptive.Card"))
        .with_property("fontFamily", config.font_family.as_str())
        .with_property("padding", boundary(&config.adaptive_card.padding))
        .with_property("backgroundColor", config.adaptive_card.background_color.as_str());
    if let Some(version) = &card.version {
        root = root.with_property("version", version.as_str());
    }
    if let Some(image) = &card.background_image {
        root = root.with_property("backgroundImage", image.as_str());
    }
    if let Some(speak) = &card.speak {
        root = root.with_property("speak", speak.as_str());
    }

    let mut children = render_children(&card.body, context)?;
    if let Some(actions) = render_action_set(&card.actions, context)? {
        if !children.is_empty() {
            children.push(card_separator(context));
        }
        children.push(actions);
    }
    root.children = children;
    Ok(wrap_select_action(root, card.select_action.as_deref(), context))
}

/// Renders Adaptive Cards against one host configuration.
///
/// Alternate renderers registered here apply to cards rendered by this
/// instance only.
pub struct AdaptiveCardRenderer {
    host_config: Rc<HostConfig>,
    registry: Rc<RendererRegistry>,
    styles: Rc<dyn StyleLookup>,
    policy: UnsupportedElementPolicy,
}

impl AdaptiveCardRenderer {
    pub fn new(host_config: HostConfig) -> Self {
        Self {
            host_config: Rc::new(host_config),
            registry: Rc::new(RendererRegistry::with_builtins()),
            styles: Rc::new(StyleSheet::standard()),
            policy: UnsupportedElementPolicy::from_env(),
        }
    }

    pub fn with_policy(mut self, policy: UnsupportedElementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_styles(mut self, styles: impl StyleLookup + 'static) -> Self {
        self.styles = Rc::new(styles);
        self
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.host_config
    }

    pub fn set_host_config(&mut self, host_config: HostConfig) {
        self.host_config = Rc::new(host_config);
    }

    pub fn policy(&self) -> UnsupportedElementPolicy {
        self.policy
    }

    /// Register a closure as the renderer for `element_type`.
    pub fn register_alternate<F>(&mut self, element_type: ElementType, renderer: F)
    where
        F: Fn(&CardElement, &mut RenderContext) -> RenderResult + 'static,
    {
        self.register_alternate_renderer(element_type, Rc::new(renderer));
    }

    pub fn register_alternate_renderer(
        &mut self,
        element_type: ElementType,
        renderer: Rc<dyn ElementRenderer>,
    ) {
        debug!(%element_type, "registering alternate renderer");
        Rc::make_mut(&mut self.registry).set_alternate(element_type, renderer);
    }

    /// Drop the alternate for `element_type`; returns whether one existed.
    pub fn unregister_alternate(&mut self, element_type: &ElementType) -> bool {
        Rc::make_mut(&mut self.registry)
            .remove_alternate(element_type)
            .is_some()
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Fresh context over a snapshot of this renderer's state.
    pub fn context(&self, dispatcher: Rc<dyn ActionDispatcher>) -> RenderContext {
        RenderContext::new(Rc::clone(&self.host_config), dispatcher)
            .with_registry(Rc::clone(&self.registry))
            .with_styles(Rc::clone(&self.styles))
            .with_policy(self.policy)
    }

    pub fn render_card(
        &self,
        card: &AdaptiveCard,
        dispatcher: impl ActionDispatcher + 'static,
    ) -> Result<RenderedCard, RenderError> {
        let mut context = self.context(Rc::new(dispatcher));
        let root = render_card(card, &mut context)?;
        let warnings = context.take_warnings();
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "card rendered with warnings");
        }
        Ok(RenderedCard {
            root,
            warnings,
            inputs: context.inputs().clone(),
        })
    }
}
