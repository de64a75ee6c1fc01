//! Built-in renderers for every known element type.

use crate::column_set::{TrackSize, layout_columns};
use crate::context::{InputCell, RenderContext};
use crate::element::{
    CardElement, DateTimeInput, ElementCommon, ElementType, Image, ImageStyle,
};
use crate::errors::RenderError;
use crate::output::{ActionHandler, RenderWarning, RenderedElement, VisualKind};
use crate::registry::{RenderResult, RendererRegistry};
use crate::renderer::{render_card, render_children, render_element, render_item};
use card_host_config::{
    ActionsOrientation, BoundaryConfig, HorizontalAlignment, HostConfig, ImageSize,
    SeparationOption, SeparationStyle, ShowCardActionMode, TextConfig,
};
use serde_json::{Value, json};
use std::rc::Rc;

pub(crate) fn install(registry: &mut RendererRegistry) {
    registry.set_builtin(ElementType::TEXT_BLOCK, Rc::new(render_text_block));
    registry.set_builtin(ElementType::IMAGE, Rc::new(render_image));
    registry.set_builtin(ElementType::CONTAINER, Rc::new(render_container));
    registry.set_builtin(ElementType::COLUMN_SET, Rc::new(render_column_set));
    registry.set_builtin(ElementType::COLUMN, Rc::new(render_column));
    registry.set_builtin(ElementType::FACT_SET, Rc::new(render_fact_set));
    registry.set_builtin(ElementType::IMAGE_SET, Rc::new(render_image_set));
    registry.set_builtin(ElementType::SUBMIT_ACTION, Rc::new(render_action));
    registry.set_builtin(ElementType::OPEN_URL_ACTION, Rc::new(render_action));
    registry.set_builtin(ElementType::HTTP_ACTION, Rc::new(render_action));
    registry.set_builtin(ElementType::SHOW_CARD_ACTION, Rc::new(render_show_card));
    registry.set_builtin(ElementType::TEXT_INPUT, Rc::new(render_text_input));
    registry.set_builtin(ElementType::NUMBER_INPUT, Rc::new(render_number_input));
    registry.set_builtin(ElementType::DATE_INPUT, Rc::new(render_date_input));
    registry.set_builtin(ElementType::TIME_INPUT, Rc::new(render_time_input));
    registry.set_builtin(ElementType::TOGGLE_INPUT, Rc::new(render_toggle_input));
    registry.set_builtin(ElementType::CHOICE_SET_INPUT, Rc::new(render_choice_set_input));
}

fn mismatch(element: &CardElement) -> RenderError {
    RenderError::unsupported(element.element_type())
}

pub(crate) fn boundary(value: &BoundaryConfig) -> Value {
    json!({
        "left": value.left,
        "top": value.top,
        "right": value.right,
        "bottom": value.bottom,
    })
}

fn separator(option: &SeparationOption, context: &RenderContext) -> RenderedElement {
    let mut node = RenderedElement::new(VisualKind::Separator)
        .with_style(context.style("Adaptive.Separator"))
        .with_property("spacing", option.spacing)
        .with_property("lineThickness", option.line_thickness);
    if let Some(color) = &option.line_color {
        node = node.with_property("lineColor", color.as_str());
    }
    node
}

/// Separator placed before a sibling with the given separation.
pub(crate) fn separator_for(style: SeparationStyle, context: &RenderContext) -> Option<RenderedElement> {
    let config = context.host_config();
    config
        .separation
        .get(style)
        .map(|option| separator(option, context))
}

/// Separator between a card body and its action set.
pub(crate) fn card_separator(context: &RenderContext) -> RenderedElement {
    separator(&context.host_config().separation.default, context)
}

fn styled_text(
    text: &str,
    appearance: &TextConfig,
    style: Option<String>,
    context: &RenderContext,
) -> RenderedElement {
    let config = context.host_config();
    RenderedElement::new(VisualKind::Text)
        .with_style(style)
        .with_property("text", text)
        .with_property("fontFamily", config.font_family.as_str())
        .with_property("fontSize", config.font_size(appearance.size))
        .with_property("fontWeight", appearance.weight.as_str())
        .with_property("color", config.text_color(appearance.color, appearance.is_subtle))
}

fn render_text_block(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::TextBlock(block) = element else {
        return Err(mismatch(element));
    };
    let appearance = TextConfig {
        size: block.size,
        weight: block.weight,
        color: block.color,
        is_subtle: block.is_subtle,
    };
    let mut node = styled_text(
        &block.text,
        &appearance,
        context.style("Adaptive.TextBlock"),
        context,
    )
    .with_id(block.common.id.as_deref())
    .with_property("wrap", block.wrap)
    .with_property("horizontalAlignment", block.horizontal_alignment.as_str());
    if let Some(max_lines) = block.max_lines {
        node = node.with_property("maxLines", max_lines);
    }
    Ok(Some(node))
}

fn image_node(image: &Image, context: &RenderContext) -> RenderedElement {
    let style = match image.style {
        ImageStyle::Person => context
            .style("Adaptive.Image.Person")
            .or_else(|| context.style("Adaptive.Image")),
        ImageStyle::Normal => context.style("Adaptive.Image"),
    };
    let mut node = RenderedElement::new(VisualKind::Image)
        .with_id(image.common.id.as_deref())
        .with_style(style)
        .with_property("url", image.url.as_str())
        .with_property("size", image.size.as_str())
        .with_property("horizontalAlignment", image.horizontal_alignment.as_str());
    if let Some(width) = context.host_config().image_size(image.size) {
        node = node.with_property("width", width);
    }
    if image.style == ImageStyle::Person {
        node = node.with_property("shape", "ellipse");
    }
    if let Some(alt_text) = &image.alt_text {
        node = node.with_property("altText", alt_text.as_str());
    }
    node
}

fn render_image(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::Image(image) = element else {
        return Err(mismatch(element));
    };
    let node = image_node(image, context);
    Ok(Some(wrap_select_action(
        node,
        image.select_action.as_deref(),
        context,
    )))
}

fn render_container(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::Container(container) = element else {
        return Err(mismatch(element));
    };
    let children = render_children(&container.items, context)?;
    let node = RenderedElement::new(VisualKind::Panel)
        .with_id(container.common.id.as_deref())
        .with_style(context.style("Adaptive.Container"))
        .with_property("orientation", "vertical")
        .with_children(children);
    Ok(Some(wrap_select_action(
        node,
        container.select_action.as_deref(),
        context,
    )))
}

fn render_column_set(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::ColumnSet(set) = element else {
        return Err(mismatch(element));
    };
    let config = context.shared_host_config();
    let laid_out = layout_columns(&set.columns, context)?;
    let mut grid = RenderedElement::new(VisualKind::Grid)
        .with_id(set.common.id.as_deref())
        .with_style(context.style("Adaptive.ColumnSet"));
    // hidden or skipped columns take no track
    for ((track, content), column) in laid_out.into_iter().zip(&set.columns) {
        let Some(mut content) = content else {
            continue;
        };
        if !grid.tracks.is_empty() {
            if let Some(option) = config.column.separation.get(column.separation()) {
                content = content
                    .with_property("gapBefore", option.spacing)
                    .with_property("gapLineThickness", option.line_thickness);
                if let Some(color) = &option.line_color {
                    content = content.with_property("gapLineColor", color.as_str());
                }
            }
        }
        content = content.with_property("gridColumn", grid.tracks.len());
        grid.tracks.push(track);
        grid.children.push(content);
    }
    Ok(Some(wrap_select_action(
        grid,
        set.select_action.as_deref(),
        context,
    )))
}

fn render_column(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::Column(column) = element else {
        return Err(mismatch(element));
    };
    let children = render_children(&column.items, context)?;
    let node = RenderedElement::new(VisualKind::Panel)
        .with_id(column.common.id.as_deref())
        .with_style(context.style("Adaptive.Column"))
        .with_property("orientation", "vertical")
        .with_children(children);
    Ok(Some(wrap_select_action(
        node,
        column.select_action.as_deref(),
        context,
    )))
}

fn render_fact_set(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::FactSet(set) = element else {
        return Err(mismatch(element));
    };
    let config = context.shared_host_config();
    let mut children = Vec::with_capacity(set.facts.len() * 2);
    for fact in &set.facts {
        children.push(styled_text(
            &fact.title,
            &config.fact_set.title,
            context.style("Adaptive.Fact.Title"),
            context,
        ));
        children.push(
            styled_text(
                &fact.value,
                &config.fact_set.value,
                context.style("Adaptive.Fact.Value"),
                context,
            )
            .with_property("wrap", true),
        );
    }
    let mut node = RenderedElement::new(VisualKind::FactSet)
        .with_id(set.common.id.as_deref())
        .with_style(context.style("Adaptive.FactSet"))
        .with_property("spacing", config.fact_set.spacing)
        .with_children(children);
    node.tracks = vec![TrackSize::Auto, TrackSize::Proportional(1.0)];
    Ok(Some(node))
}

fn render_image_set(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::ImageSet(set) = element else {
        return Err(mismatch(element));
    };
    let size = match set.image_size {
        Some(size) if size != ImageSize::Auto => size,
        _ => context.host_config().image_set.image_size,
    };
    let mut children = Vec::with_capacity(set.images.len());
    for image in &set.images {
        let sized = CardElement::Image(Image {
            size,
            ..image.clone()
        });
        if let Some(node) = render_item(&sized, context)? {
            children.push(node);
        }
    }
    let node = RenderedElement::new(VisualKind::Panel)
        .with_id(set.common.id.as_deref())
        .with_style(context.style("Adaptive.ImageSet"))
        .with_property("orientation", "horizontal")
        .with_property("wrap", true)
        .with_property("imageSize", size.as_str())
        .with_children(children);
    Ok(Some(node))
}

fn input_node(
    kind: VisualKind,
    common: &ElementCommon,
    style: &str,
    initial: Option<String>,
    context: &mut RenderContext,
) -> RenderedElement {
    let cell = InputCell::new(initial);
    match common.id.as_deref() {
        Some(id) => context.register_input(id, Rc::new(cell.clone())),
        None => context.warn(
            RenderWarning::new("input_missing_id")
                .with_message("input has no id, its value will not be submitted"),
        ),
    }
    let mut node = RenderedElement::new(kind)
        .with_id(common.id.as_deref())
        .with_style(context.style(style));
    node.input = Some(cell);
    node
}

fn with_optional(node: RenderedElement, key: &str, value: Option<impl Into<Value>>) -> RenderedElement {
    match value {
        Some(value) => node.with_property(key, value),
        None => node,
    }
}

fn render_text_input(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::TextInput(input) = element else {
        return Err(mismatch(element));
    };
    let mut node = input_node(
        VisualKind::TextBox,
        &input.common,
        "Adaptive.Input.Text",
        input.value.clone(),
        context,
    )
    .with_property("isMultiline", input.is_multiline)
    .with_property("style", input.style.as_str());
    node = with_optional(node, "placeholder", input.placeholder.as_deref());
    node = with_optional(node, "value", input.value.as_deref());
    node = with_optional(node, "maxLength", input.max_length);
    match input.inline_action.as_deref() {
        Some(action) => with_inline_action(node, action, input.is_multiline, context).map(Some),
        None => Ok(Some(node)),
    }
}

/// Lay a text box and its inline action button out side by side.
fn with_inline_action(
    text_box: RenderedElement,
    action: &CardElement,
    is_multiline: bool,
    context: &mut RenderContext,
) -> Result<RenderedElement, RenderError> {
    let element_type = action.element_type();
    if matches!(action, CardElement::ShowCardAction(_)) {
        context.warn(
            RenderWarning::new("inline_show_card_not_supported")
                .with_message("Action.ShowCard is not supported as an inline action")
                .with_path(action.id()),
        );
        return Ok(text_box);
    }
    if !context.action_allowed(&element_type) {
        context.warn(
            RenderWarning::new("action_not_supported")
                .with_message(format!("inline {element_type} dropped"))
                .with_path(action.id()),
        );
        return Ok(text_box);
    }
    let Some(button) = render_element(action, context)? else {
        return Ok(text_box);
    };
    let gap = context.host_config().separation.default.spacing;
    let mut grid = RenderedElement::new(VisualKind::Grid)
        .with_style(context.style("Adaptive.Input.Text.InlineAction"))
        .with_children(vec![
            text_box
                .with_property("gridColumn", 0)
                .with_property("submitOnEnter", !is_multiline),
            button.with_property("gridColumn", 2),
        ]);
    grid.tracks = vec![
        TrackSize::Proportional(1.0),
        TrackSize::Pixel(f64::from(gap)),
        TrackSize::Auto,
    ];
    Ok(grid)
}

fn render_number_input(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::NumberInput(input) = element else {
        return Err(mismatch(element));
    };
    let mut node = input_node(
        VisualKind::NumberBox,
        &input.common,
        "Adaptive.Input.Number",
        input.value.map(|value| value.to_string()),
        context,
    );
    node = with_optional(node, "placeholder", input.placeholder.as_deref());
    node = with_optional(node, "value", input.value);
    node = with_optional(node, "min", input.min);
    node = with_optional(node, "max", input.max);
    Ok(Some(node))
}

fn date_time_node(
    input: &DateTimeInput,
    kind: VisualKind,
    style: &str,
    context: &mut RenderContext,
) -> RenderedElement {
    let mut node = input_node(kind, &input.common, style, input.value.clone(), context);
    node = with_optional(node, "placeholder", input.placeholder.as_deref());
    node = with_optional(node, "value", input.value.as_deref());
    node = with_optional(node, "min", input.min.as_deref());
    with_optional(node, "max", input.max.as_deref())
}

fn render_date_input(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::DateInput(input) = element else {
        return Err(mismatch(element));
    };
    Ok(Some(date_time_node(
        input,
        VisualKind::DatePicker,
        "Adaptive.Input.Date",
        context,
    )))
}

fn render_time_input(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::TimeInput(input) = element else {
        return Err(mismatch(element));
    };
    Ok(Some(date_time_node(
        input,
        VisualKind::TimePicker,
        "Adaptive.Input.Time",
        context,
    )))
}

fn render_toggle_input(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::ToggleInput(input) = element else {
        return Err(mismatch(element));
    };
    let checked = input.is_checked();
    let initial = if checked {
        input.value_on.clone()
    } else {
        input.value_off.clone()
    };
    let node = input_node(
        VisualKind::Toggle,
        &input.common,
        "Adaptive.Input.Toggle",
        Some(initial),
        context,
    )
    .with_property("title", input.title.as_str())
    .with_property("valueOn", input.value_on.as_str())
    .with_property("valueOff", input.value_off.as_str())
    .with_property("isChecked", checked);
    Ok(Some(node))
}

fn render_choice_set_input(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::ChoiceSetInput(input) = element else {
        return Err(mismatch(element));
    };
    let choices: Vec<Value> = input
        .choices
        .iter()
        .map(|choice| json!({ "title": choice.title, "value": choice.value }))
        .collect();
    let node = input_node(
        VisualKind::ChoiceSet,
        &input.common,
        "Adaptive.Input.ChoiceSet",
        input.value.clone(),
        context,
    )
    .with_property("isMultiSelect", input.is_multi_select)
    .with_property("style", input.style.as_str())
    .with_property("choices", choices);
    Ok(Some(with_optional(node, "value", input.value.as_deref())))
}

fn button_margin(config: &HostConfig) -> Value {
    let half = f64::from(config.actions.spacing) / 2.0;
    match config.actions.actions_orientation {
        ActionsOrientation::Horizontal => json!({ "left": half, "top": 0, "right": half, "bottom": 0 }),
        ActionsOrientation::Vertical => json!({ "left": 0, "top": half, "right": 0, "bottom": half }),
    }
}

/// Pick the button style for an action sentiment.
///
/// `positive` and `destructive` fall back to the accent background and the
/// attention text color when the host has no style for them.
fn apply_sentiment(node: RenderedElement, sentiment: Option<&str>, context: &RenderContext) -> RenderedElement {
    let base = || context.style("Adaptive.Action");
    let sentiment = sentiment
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("default"));
    let Some(sentiment) = sentiment else {
        return node.with_style(base());
    };
    let colors = &context.host_config().colors;
    if sentiment.eq_ignore_ascii_case("positive") {
        match context.style("Adaptive.Action.Positive") {
            Some(style) => node.with_style(Some(style)),
            None => node
                .with_style(base())
                .with_property("backgroundColor", colors.accent.normal.as_str()),
        }
    } else if sentiment.eq_ignore_ascii_case("destructive") {
        match context.style("Adaptive.Action.Destructive") {
            Some(style) => node.with_style(Some(style)),
            None => node
                .with_style(base())
                .with_property("textColor", colors.attention.normal.as_str()),
        }
    } else {
        let style = context
            .style(&format!("Adaptive.Action.{sentiment}"))
            .or_else(base);
        node.with_style(style)
    }
}

fn action_button(element: &CardElement, context: &RenderContext) -> RenderedElement {
    let config = context.host_config();
    let actions = &config.actions;
    let action = element.action();
    let mut node = RenderedElement::new(VisualKind::Button)
        .with_id(element.id())
        .with_property("actionType", element.element_type().as_str())
        .with_property("title", element.title().unwrap_or_default())
        .with_property("fontFamily", config.font_family.as_str())
        .with_property("fontSize", actions.font_size)
        .with_property("fontWeight", actions.font_weight)
        .with_property("backgroundColor", actions.background_color.as_str())
        .with_property("borderColor", actions.border_color.as_str())
        .with_property("borderThickness", actions.border_thickness)
        .with_property("textColor", actions.text_color.as_str())
        .with_property("padding", boundary(&actions.padding))
        .with_property("margin", button_margin(config));
    if let Some(icon) = action.and_then(|action| action.icon_url.as_deref()) {
        node = node.with_property("iconUrl", icon);
    }
    apply_sentiment(
        node,
        action.and_then(|action| action.style.as_deref()),
        context,
    )
}

fn bind_action(element: &CardElement, context: &RenderContext) -> ActionHandler {
    let invoker = context.action_invoker();
    let source = Rc::new(element.clone());
    ActionHandler::new(move || invoker.invoke(&source))
}

fn render_action(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    if element.action().is_none() {
        return Err(mismatch(element));
    }
    let handler = bind_action(element, context);
    Ok(Some(action_button(element, context).with_handler(handler)))
}

fn render_show_card(element: &CardElement, context: &mut RenderContext) -> RenderResult {
    let CardElement::ShowCardAction(show) = element else {
        return Err(mismatch(element));
    };
    let config = context.shared_host_config();
    let handler = bind_action(element, context);
    let mut button = action_button(element, context).with_handler(handler);
    match config.actions.show_card.action_mode {
        ShowCardActionMode::Inline => {
            let mut nested = context.nested();
            let card = render_card(&show.card, &mut nested)?;
            context.extend_warnings(nested.take_warnings());
            button.children.push(
                RenderedElement::new(VisualKind::ShowCard)
                    .with_style(context.style("Adaptive.ShowCard"))
                    .with_property("isVisible", false)
                    .with_property(
                        "backgroundColor",
                        config.actions.show_card.background_color.as_str(),
                    )
                    .with_property("autoPadding", config.actions.show_card.auto_padding)
                    .with_children(vec![card]),
            );
        }
        ShowCardActionMode::Popup => {
            button = button.with_property("showCardMode", "popup");
        }
    }
    Ok(Some(button))
}

/// Disabled button for an action the host does not allow.
pub(crate) fn inert_action(element: &CardElement, context: &mut RenderContext) -> RenderedElement {
    let element_type = element.element_type();
    let reason = if context.host_config().supports_interactivity {
        "not in supportedActionTypes"
    } else {
        "interactivity is off"
    };
    context.warn(
        RenderWarning::new("action_not_supported")
            .with_message(format!("{element_type} rendered inert, {reason}"))
            .with_path(element.id()),
    );
    action_button(element, context).with_property("enabled", false)
}

/// Wrap `content` in a touch target that fires `select_action`.
///
/// Returns `content` unchanged, with a warning, when the action cannot be
/// bound: interactivity is off, the action is a ShowCard, or the host does
/// not allow its type.
pub(crate) fn wrap_select_action(
    content: RenderedElement,
    select_action: Option<&CardElement>,
    context: &mut RenderContext,
) -> RenderedElement {
    let Some(action) = select_action else {
        return content;
    };
    let element_type = action.element_type();
    if !context.host_config().supports_interactivity {
        context.warn(
            RenderWarning::new("interactivity_not_supported")
                .with_message("selectAction ignored, interactivity is off")
                .with_path(action.id()),
        );
        return content;
    }
    if matches!(action, CardElement::ShowCardAction(_)) {
        context.warn(
            RenderWarning::new("inline_show_card_not_supported")
                .with_message("Action.ShowCard is not supported as a selectAction")
                .with_path(action.id()),
        );
        return content;
    }
    if !context.action_allowed(&element_type) {
        context.warn(
            RenderWarning::new("action_not_supported")
                .with_message(format!("selectAction {element_type} ignored"))
                .with_path(action.id()),
        );
        return content;
    }
    let handler = bind_action(action, context);
    RenderedElement::new(VisualKind::TouchTarget)
        .with_id(action.id())
        .with_style(context.style("Adaptive.SelectAction"))
        .with_property("actionType", element_type.as_str())
        .with_handler(handler)
        .with_children(vec![content])
}

/// Render the card-level action row.
///
/// At most `maxActions` actions are rendered. A horizontal row aligned to
/// `stretch` becomes a grid with one equal share per button.
pub(crate) fn render_action_set(
    actions: &[CardElement],
    context: &mut RenderContext,
) -> Result<Option<RenderedElement>, RenderError> {
    if actions.is_empty() {
        return Ok(None);
    }
    let config = context.shared_host_config();
    let max = config.max_actions as usize;
    if actions.len() > max {
        context.warn(
            RenderWarning::new("max_actions_exceeded").with_message(format!(
                "{} actions, only the first {max} are rendered",
                actions.len()
            )),
        );
    }
    let mut buttons = Vec::new();
    for action in actions.iter().take(max) {
        if let Some(button) = render_item(action, context)? {
            buttons.push(button);
        }
    }
    if buttons.is_empty() {
        return Ok(None);
    }

    let layout = &config.actions;
    let equal_columns = layout.action_alignment == HorizontalAlignment::Stretch
        && layout.actions_orientation == ActionsOrientation::Horizontal;
    let kind = if equal_columns {
        VisualKind::Grid
    } else {
        VisualKind::Panel
    };
    let mut set = RenderedElement::new(kind)
        .with_style(context.style("Adaptive.Actions"))
        .with_property("orientation", layout.actions_orientation.as_str())
        .with_property("horizontalAlignment", layout.action_alignment.as_str());
    if equal_columns {
        set.tracks = vec![TrackSize::Proportional(1.0); buttons.len()];
        buttons = buttons
            .into_iter()
            .enumerate()
            .map(|(index, button)| button.with_property("gridColumn", index))
            .collect();
    }
    Ok(Some(set.with_children(buttons)))
}
