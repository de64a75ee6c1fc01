//! Adaptive Card renderer with a host-overridable renderer table.
//!
//! Cards parse into a [`CardElement`] tree. [`AdaptiveCardRenderer`] walks the
//! tree through [`render_element`], which picks a host alternate renderer when
//! one is registered for the element's type and a built-in otherwise. Inputs
//! register live value accessors while rendering; action handlers read them
//! only when fired.

pub mod actions;
mod builtins;
pub mod column_set;
pub mod context;
pub mod element;
pub mod errors;
pub mod output;
pub mod policy;
pub mod registry;
pub mod renderer;
pub mod style;

pub use actions::{
    ActionDispatcher, ActionInvocation, ActionInvoker, RecordingDispatcher, merge_submit_data,
};
pub use card_host_config::HostConfig;
pub use column_set::{TrackSize, layout_columns, parse_size_directive, resolve_track_widths};
pub use context::{InputCell, InputRegistry, InputValue, RenderContext};
pub use element::{AdaptiveCard, CardElement, ElementType, RemoteResource};
pub use errors::RenderError;
pub use output::{ActionHandler, RenderWarning, RenderedCard, RenderedElement, VisualKind};
pub use policy::UnsupportedElementPolicy;
pub use registry::{ElementRenderer, RenderResult, RendererRegistry};
pub use renderer::{AdaptiveCardRenderer, render_card, render_children, render_element, render_item};
pub use style::{Style, StyleLookup, StyleSheet};
