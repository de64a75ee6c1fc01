use adaptive_card_renderer::{
    AdaptiveCard, AdaptiveCardRenderer, ElementType, HostConfig, RenderContext, RenderError,
    RenderedCard, StyleSheet, TrackSize, UnsupportedElementPolicy, VisualKind, layout_columns,
    resolve_track_widths,
};
use serde_json::{Map, Value, json};
use std::rc::Rc;

fn renderer() -> AdaptiveCardRenderer {
    AdaptiveCardRenderer::new(HostConfig::default()).with_policy(UnsupportedElementPolicy::Abort)
}

fn card(value: Value) -> AdaptiveCard {
    serde_json::from_value(value).expect("card json")
}

fn render(renderer: &AdaptiveCardRenderer, value: Value) -> RenderedCard {
    renderer
        .render_card(&card(value), |_: &adaptive_card_renderer::ActionInvocation| {})
        .expect("render")
}

fn kinds(card: &RenderedCard) -> Vec<VisualKind> {
    card.root
        .children
        .iter()
        .map(|child| child.kind.clone())
        .collect()
}

#[test]
fn text_block_resolves_host_config() {
    let rendered = render(
        &renderer(),
        json!({
            "type": "AdaptiveCard",
            "body": [{
                "type": "TextBlock",
                "id": "title",
                "text": "Hello",
                "size": "large",
                "weight": "bolder",
                "color": "accent",
                "isSubtle": true
            }]
        }),
    );
    insta::assert_json_snapshot!(rendered.root.children[0], @r###"
    {
      "kind": "text",
      "id": "title",
      "style": "Adaptive.TextBlock",
      "properties": {
        "color": "#b20000FF",
        "fontFamily": "Calibri",
        "fontSize": 17,
        "fontWeight": "bolder",
        "horizontalAlignment": "left",
        "text": "Hello",
        "wrap": false
      }
    }
    "###);
}

#[test]
fn separators_go_between_rendered_siblings_only() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [
                { "type": "TextBlock", "text": "hidden", "isVisible": false },
                { "type": "TextBlock", "text": "a" },
                { "type": "TextBlock", "text": "b", "separation": "none" },
                { "type": "TextBlock", "text": "c", "separation": "strong" }
            ]
        }),
    );
    assert_eq!(
        kinds(&rendered),
        vec![
            VisualKind::Text,
            VisualKind::Text,
            VisualKind::Separator,
            VisualKind::Text,
        ]
    );
    let strong = &rendered.root.children[2];
    assert_eq!(strong.property("spacing"), Some(&json!(20)));
    assert_eq!(strong.property("lineThickness"), Some(&json!(1)));
    assert_eq!(strong.property("lineColor"), Some(&json!("#FF707070")));
}

#[test]
fn hidden_elements_render_to_nothing() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [
                { "type": "Input.Text", "id": "secret", "isVisible": false },
                { "type": "Container", "isVisible": false, "items": [
                    { "type": "Input.Text", "id": "nested" }
                ]}
            ]
        }),
    );
    assert!(rendered.root.children.is_empty());
    assert!(rendered.inputs.is_empty());
}

#[test]
fn column_weights_split_space() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [{
                "type": "ColumnSet",
                "columns": [
                    { "type": "Column", "size": "1", "items": [] },
                    { "type": "Column", "size": "3", "items": [] }
                ]
            }]
        }),
    );
    let grid = &rendered.root.children[0];
    assert_eq!(grid.kind, VisualKind::Grid);
    assert_eq!(
        grid.tracks,
        vec![TrackSize::Proportional(1.0), TrackSize::Proportional(3.0)]
    );
    assert_eq!(resolve_track_widths(&grid.tracks, 400.0, &[]), vec![100.0, 300.0]);
    assert_eq!(grid.children[1].property("gridColumn"), Some(&json!(1)));
    assert_eq!(grid.children[1].property("gapBefore"), Some(&json!(10)));
}

#[test]
fn column_keywords_and_fallbacks() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [{
                "type": "ColumnSet",
                "columns": [
                    { "type": "Column" },
                    { "type": "Column", "size": "Stretch" },
                    { "type": "Column", "size": "STRETCH" },
                    { "type": "Column", "size": "banana" },
                    { "type": "Column", "size": "auto" },
                    { "type": "Column", "size": "80px" }
                ]
            }]
        }),
    );
    assert_eq!(
        rendered.root.children[0].tracks,
        vec![
            TrackSize::Proportional(1.0),
            TrackSize::Proportional(1.0),
            TrackSize::Proportional(1.0),
            TrackSize::Auto,
            TrackSize::Auto,
            TrackSize::Pixel(80.0),
        ]
    );
}

#[test]
fn zero_columns_yield_an_empty_layout() {
    let host = Rc::new(HostConfig::default());
    let mut context = RenderContext::new(host, Rc::new(|_: &adaptive_card_renderer::ActionInvocation| {}));
    let layout = layout_columns(&[], &mut context).expect("layout");
    assert!(layout.is_empty());

    let rendered = render(
        &renderer(),
        json!({ "body": [{ "type": "ColumnSet", "columns": [] }] }),
    );
    let grid = &rendered.root.children[0];
    assert!(grid.tracks.is_empty());
    assert!(grid.children.is_empty());
}

#[test]
fn unsupported_element_aborts_by_default() {
    let err = renderer()
        .render_card(
            &card(json!({ "body": [{ "type": "Rating", "max": 5 }] })),
            |_: &adaptive_card_renderer::ActionInvocation| {},
        )
        .unwrap_err();
    assert_eq!(
        err,
        RenderError::UnsupportedElementType {
            element_type: ElementType::custom("Rating")
        }
    );
    assert_eq!(err.to_string(), "no renderer registered for element type `Rating`");
}

#[test]
fn skip_policy_drops_nested_unsupported_elements() {
    let renderer = renderer().with_policy(UnsupportedElementPolicy::Skip);
    let rendered = render(
        &renderer,
        json!({
            "body": [{
                "type": "Container",
                "items": [
                    { "type": "Rating", "id": "stars" },
                    { "type": "TextBlock", "text": "kept" }
                ]
            }]
        }),
    );
    let container = &rendered.root.children[0];
    assert_eq!(container.kind, VisualKind::Panel);
    assert_eq!(container.children.len(), 1);
    assert_eq!(rendered.warnings.len(), 1);
    assert_eq!(rendered.warnings[0].code, "unsupported_element");
    assert_eq!(rendered.warnings[0].path.as_deref(), Some("stars"));
}

#[test]
fn placeholder_policy_marks_the_gap() {
    let renderer = renderer().with_policy(UnsupportedElementPolicy::Placeholder);
    let rendered = render(&renderer, json!({ "body": [{ "type": "Rating" }] }));
    let placeholder = &rendered.root.children[0];
    assert_eq!(placeholder.kind, VisualKind::Placeholder);
    assert_eq!(placeholder.property("elementType"), Some(&json!("Rating")));
    assert!(rendered.has_warning("unsupported_element"));
}

#[test]
fn card_actions_follow_a_body_separator() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [{ "type": "TextBlock", "text": "hi" }],
            "actions": [
                { "type": "Action.Submit", "id": "ok", "title": "OK" },
                { "type": "Action.OpenUrl", "id": "docs", "title": "Docs", "url": "https://example.com" }
            ]
        }),
    );
    assert_eq!(
        kinds(&rendered),
        vec![VisualKind::Text, VisualKind::Separator, VisualKind::Panel]
    );
    let row = &rendered.root.children[2];
    assert_eq!(row.property("orientation"), Some(&json!("horizontal")));
    assert_eq!(row.children.len(), 2);
    let ok = &row.children[0];
    assert_eq!(ok.kind, VisualKind::Button);
    assert!(ok.handler.is_some());
    assert_eq!(ok.style.as_deref(), Some("Adaptive.Action"));
    assert_eq!(
        ok.property("margin"),
        Some(&json!({ "left": 4.0, "top": 0, "right": 4.0, "bottom": 0 }))
    );
}

#[test]
fn actions_beyond_the_maximum_are_dropped() {
    let mut host = HostConfig::default();
    host.max_actions = 2;
    let renderer = AdaptiveCardRenderer::new(host).with_policy(UnsupportedElementPolicy::Abort);
    let actions: Vec<Value> = (0..4)
        .map(|index| json!({ "type": "Action.Submit", "id": format!("a{index}"), "title": "go" }))
        .collect();
    let rendered = render(&renderer, json!({ "actions": actions }));
    assert_eq!(rendered.root.children[0].children.len(), 2);
    assert!(rendered.has_warning("max_actions_exceeded"));
}

#[test]
fn stretch_alignment_gives_equal_tracks() {
    let mut host = HostConfig::default();
    host.actions.action_alignment = card_host_config::HorizontalAlignment::Stretch;
    let renderer = AdaptiveCardRenderer::new(host).with_policy(UnsupportedElementPolicy::Abort);
    let rendered = render(
        &renderer,
        json!({
            "actions": [
                { "type": "Action.Submit", "title": "a" },
                { "type": "Action.Submit", "title": "b" },
                { "type": "Action.Submit", "title": "c" }
            ]
        }),
    );
    let row = &rendered.root.children[0];
    assert_eq!(row.kind, VisualKind::Grid);
    assert_eq!(row.tracks, vec![TrackSize::Proportional(1.0); 3]);
}

#[test]
fn disallowed_actions_render_inert() {
    let mut host = HostConfig::default();
    host.supported_action_types = vec!["Action.Submit".to_string()];
    let renderer = AdaptiveCardRenderer::new(host).with_policy(UnsupportedElementPolicy::Abort);
    let rendered = render(
        &renderer,
        json!({
            "actions": [
                { "type": "Action.OpenUrl", "id": "docs", "title": "Docs", "url": "https://example.com" }
            ]
        }),
    );
    let button = rendered.find("docs").expect("button");
    assert!(button.handler.is_none());
    assert_eq!(button.property("enabled"), Some(&json!(false)));
    assert!(rendered.has_warning("action_not_supported"));
}

#[test]
fn interactivity_off_drops_inputs() {
    let mut host = HostConfig::default();
    host.supports_interactivity = false;
    let renderer = AdaptiveCardRenderer::new(host).with_policy(UnsupportedElementPolicy::Abort);
    let rendered = render(
        &renderer,
        json!({
            "body": [
                { "type": "Input.Text", "id": "name" },
                { "type": "TextBlock", "text": "still here" }
            ],
            "actions": [{ "type": "Action.Submit", "id": "send", "title": "Send" }]
        }),
    );
    assert!(rendered.inputs.is_empty());
    assert!(rendered.has_warning("interactivity_not_supported"));
    assert!(rendered.action("send").is_none());
    assert_eq!(rendered.root.children[0].kind, VisualKind::Text);
}

#[test]
fn select_action_wraps_content_in_a_touch_target() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [{
                "type": "Container",
                "id": "row",
                "selectAction": { "type": "Action.Submit", "id": "pick", "data": { "row": 1 } },
                "items": [{ "type": "TextBlock", "text": "tap me" }]
            }]
        }),
    );
    let target = &rendered.root.children[0];
    assert_eq!(target.kind, VisualKind::TouchTarget);
    assert_eq!(target.id.as_deref(), Some("pick"));
    assert_eq!(target.children[0].id.as_deref(), Some("row"));
    let invocation = target.invoke().expect("bound").expect("invoke");
    assert_eq!(invocation.data, json!({ "row": 1 }));
}

#[test]
fn show_card_select_action_is_refused() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [{
                "type": "Image",
                "url": "https://example.com/a.png",
                "selectAction": { "type": "Action.ShowCard", "card": { "body": [] } }
            }]
        }),
    );
    assert_eq!(rendered.root.children[0].kind, VisualKind::Image);
    assert!(rendered.has_warning("inline_show_card_not_supported"));
}

#[test]
fn sentiment_falls_back_to_palette_colors() {
    let rendered = render(
        &renderer(),
        json!({
            "actions": [
                { "type": "Action.Submit", "id": "yes", "title": "Yes", "style": "positive" },
                { "type": "Action.Submit", "id": "no", "title": "No", "style": "destructive" }
            ]
        }),
    );
    let yes = rendered.find("yes").expect("yes");
    assert_eq!(yes.style.as_deref(), Some("Adaptive.Action"));
    assert_eq!(yes.property("backgroundColor"), Some(&json!("#FF0000FF")));
    let no = rendered.find("no").expect("no");
    assert_eq!(no.property("textColor"), Some(&json!("#FF8B0000")));
}

#[test]
fn host_sentiment_styles_win() {
    let styles = StyleSheet::standard().with_style("Adaptive.Action.Positive", Map::new());
    let renderer = renderer().with_styles(styles);
    let rendered = render(
        &renderer,
        json!({
            "actions": [{ "type": "Action.Submit", "id": "yes", "title": "Yes", "style": "Positive" }]
        }),
    );
    let yes = rendered.find("yes").expect("yes");
    assert_eq!(yes.style.as_deref(), Some("Adaptive.Action.Positive"));
    assert_eq!(yes.property("backgroundColor"), Some(&json!("#FF5098FF")));
}

#[test]
fn inline_show_card_renders_collapsed() {
    let rendered = render(
        &renderer(),
        json!({
            "actions": [{
                "type": "Action.ShowCard",
                "id": "more",
                "title": "More",
                "card": { "body": [{ "type": "Input.Text", "id": "comment" }] }
            }]
        }),
    );
    let button = rendered.find("more").expect("button");
    let panel = &button.children[0];
    assert_eq!(panel.kind, VisualKind::ShowCard);
    assert_eq!(panel.property("isVisible"), Some(&json!(false)));
    assert_eq!(panel.children[0].kind, VisualKind::Card);
    assert!(rendered.inputs.contains("comment"));
}

#[test]
fn popup_show_card_is_left_to_the_host() {
    let mut host = HostConfig::default();
    host.actions.show_card.action_mode = card_host_config::ShowCardActionMode::Popup;
    let renderer = AdaptiveCardRenderer::new(host).with_policy(UnsupportedElementPolicy::Abort);
    let rendered = render(
        &renderer,
        json!({
            "actions": [{
                "type": "Action.ShowCard",
                "id": "more",
                "title": "More",
                "card": { "body": [{ "type": "Input.Text", "id": "comment" }] }
            }]
        }),
    );
    let button = rendered.find("more").expect("button");
    assert!(button.children.is_empty());
    assert_eq!(button.property("showCardMode"), Some(&json!("popup")));
    assert!(!rendered.inputs.contains("comment"));
}

#[test]
fn image_set_applies_the_set_size() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [{
                "type": "ImageSet",
                "imageSize": "small",
                "images": [
                    { "type": "Image", "url": "https://example.com/a.png", "size": "large" },
                    { "type": "Image", "url": "https://example.com/b.png" }
                ]
            }]
        }),
    );
    let set = &rendered.root.children[0];
    assert_eq!(set.children.len(), 2);
    for image in &set.children {
        assert_eq!(image.property("width"), Some(&json!(60)));
    }
}

#[test]
fn fact_set_uses_fact_text_config() {
    let rendered = render(
        &renderer(),
        json!({
            "body": [{
                "type": "FactSet",
                "facts": [{ "title": "Owner", "value": "Ada" }]
            }]
        }),
    );
    let facts = &rendered.root.children[0];
    assert_eq!(facts.kind, VisualKind::FactSet);
    assert_eq!(facts.tracks, vec![TrackSize::Auto, TrackSize::Proportional(1.0)]);
    assert_eq!(facts.children[0].property("fontWeight"), Some(&json!("bolder")));
    assert_eq!(facts.children[1].property("text"), Some(&json!("Ada")));
}
