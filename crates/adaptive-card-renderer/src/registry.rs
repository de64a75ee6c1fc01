use crate::builtins;
use crate::context::RenderContext;
use crate::element::{CardElement, ElementType};
use crate::errors::RenderError;
use crate::output::RenderedElement;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Outcome of rendering one element: a node, or nothing for hidden content.
pub type RenderResult = Result<Option<RenderedElement>, RenderError>;

/// Renders one element variant.
pub trait ElementRenderer {
    fn render(&self, element: &CardElement, context: &mut RenderContext) -> RenderResult;
}

impl<F> ElementRenderer for F
where
    F: Fn(&CardElement, &mut RenderContext) -> RenderResult,
{
    fn render(&self, element: &CardElement, context: &mut RenderContext) -> RenderResult {
        self(element, context)
    }
}

/// Element type to renderer table.
///
/// Alternates registered by the host shadow the built-ins; removing an
/// alternate restores the built-in.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    builtins: HashMap<ElementType, Rc<dyn ElementRenderer>>,
    alternates: HashMap<ElementType, Rc<dyn ElementRenderer>>,
}

impl RendererRegistry {
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        builtins::install(&mut registry);
        registry
    }

    pub(crate) fn set_builtin(&mut self, element_type: ElementType, renderer: Rc<dyn ElementRenderer>) {
        self.builtins.insert(element_type, renderer);
    }

    /// Install `renderer` for `element_type`, returning the alternate it replaced.
    pub fn set_alternate(
        &mut self,
        element_type: ElementType,
        renderer: Rc<dyn ElementRenderer>,
    ) -> Option<Rc<dyn ElementRenderer>> {
        self.alternates.insert(element_type, renderer)
    }

    pub fn remove_alternate(&mut self, element_type: &ElementType) -> Option<Rc<dyn ElementRenderer>> {
        self.alternates.remove(element_type)
    }

    pub fn alternate(&self, element_type: &ElementType) -> Option<Rc<dyn ElementRenderer>> {
        self.alternates.get(element_type).cloned()
    }

    pub fn builtin(&self, element_type: &ElementType) -> Option<Rc<dyn ElementRenderer>> {
        self.builtins.get(element_type).cloned()
    }

    pub fn has_alternate(&self, element_type: &ElementType) -> bool {
        self.alternates.contains_key(element_type)
    }

    /// Alternate if present, otherwise the built-in.
    pub fn resolve(&self, element_type: &ElementType) -> Option<Rc<dyn ElementRenderer>> {
        self.alternate(element_type)
            .or_else(|| self.builtin(element_type))
    }

    pub fn alternate_types(&self) -> Vec<&ElementType> {
        self.alternates.keys().collect()
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builtins: Vec<&str> = self.builtins.keys().map(ElementType::as_str).collect();
        builtins.sort_unstable();
        let mut alternates: Vec<&str> = self.alternates.keys().map(ElementType::as_str).collect();
        alternates.sort_unstable();
        f.debug_struct("RendererRegistry")
            .field("builtins", &builtins)
            .field("alternates", &alternates)
            .finish()
    }
}
