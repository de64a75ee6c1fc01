use adaptive_card_renderer::{
    AdaptiveCard, AdaptiveCardRenderer, HostConfig, RecordingDispatcher, RenderError,
    RenderedCard, UnsupportedElementPolicy,
};
use serde_json::{Value, json};

fn render(value: Value, dispatcher: &RecordingDispatcher) -> RenderedCard {
    let card: AdaptiveCard = serde_json::from_value(value).expect("card json");
    AdaptiveCardRenderer::new(HostConfig::default())
        .with_policy(UnsupportedElementPolicy::Abort)
        .render_card(&card, dispatcher.clone())
        .expect("render")
}

fn submit_card(data: Value) -> Value {
    json!({
        "body": [{ "type": "Input.Text", "id": "y" }],
        "actions": [{ "type": "Action.Submit", "id": "send", "title": "Send", "data": data }]
    })
}

#[test]
fn live_inputs_merge_into_static_data() {
    let dispatcher = RecordingDispatcher::new();
    let rendered = render(submit_card(json!({ "x": 1 })), &dispatcher);
    rendered.input("y").expect("input").set("hello");
    let invocation = rendered
        .action("send")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(invocation.data, json!({ "x": 1, "y": "hello" }));
    assert_eq!(dispatcher.take(), vec![invocation]);
}

#[test]
fn static_key_wins_on_collision() {
    let dispatcher = RecordingDispatcher::new();
    let card = json!({
        "body": [{ "type": "Input.Text", "id": "x" }],
        "actions": [{ "type": "Action.Submit", "id": "send", "data": { "x": 1 } }]
    });
    let rendered = render(card, &dispatcher);
    rendered.input("x").expect("input").set("override");
    let invocation = rendered
        .action("send")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(invocation.data, json!({ "x": 1 }));
}

#[test]
fn no_data_and_no_inputs_is_an_empty_payload() {
    let dispatcher = RecordingDispatcher::new();
    let rendered = render(
        json!({ "actions": [{ "type": "Action.Submit", "id": "send" }] }),
        &dispatcher,
    );
    let invocation = rendered
        .action("send")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(invocation.data, json!({}));
}

#[test]
fn values_are_read_when_the_action_fires() {
    let dispatcher = RecordingDispatcher::new();
    let rendered = render(submit_card(Value::Null), &dispatcher);
    let send = rendered.action("send").expect("bound");
    let input = rendered.input("y").expect("input");

    let first = send.invoke().expect("bound").expect("invoke");
    assert_eq!(first.data, json!({}));

    input.set("later");
    let second = send.invoke().expect("bound").expect("invoke");
    assert_eq!(second.data, json!({ "y": "later" }));
    assert_eq!(dispatcher.invocations().len(), 2);
}

#[test]
fn duplicate_input_ids_keep_the_later_input() {
    let dispatcher = RecordingDispatcher::new();
    let card = json!({
        "body": [
            { "type": "Input.Text", "id": "name", "value": "first" },
            { "type": "Input.Text", "id": "name", "value": "second" }
        ],
        "actions": [{ "type": "Action.Submit", "id": "send" }]
    });
    let rendered = render(card, &dispatcher);
    let invocation = rendered
        .action("send")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(invocation.data, json!({ "name": "second" }));
    assert_eq!(rendered.input("name").and_then(|cell| cell.get()).as_deref(), Some("second"));
}

#[test]
fn initial_values_of_every_input_kind() {
    let dispatcher = RecordingDispatcher::new();
    let card = json!({
        "body": [
            { "type": "Input.Text", "id": "text", "value": "t" },
            { "type": "Input.Number", "id": "number", "value": 5 },
            { "type": "Input.Date", "id": "date", "value": "2024-01-02" },
            { "type": "Input.Time", "id": "time" },
            { "type": "Input.Toggle", "id": "agree", "title": "Agree" },
            { "type": "Input.ChoiceSet", "id": "color", "value": "red",
              "choices": [{ "title": "Red", "value": "red" }] }
        ],
        "actions": [{ "type": "Action.Submit", "id": "send" }]
    });
    let rendered = render(card, &dispatcher);
    let invocation = rendered
        .action("send")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(
        invocation.data,
        json!({
            "text": "t",
            "number": "5",
            "date": "2024-01-02",
            "agree": "false",
            "color": "red"
        })
    );
}

#[test]
fn non_object_data_fails_without_dispatch() {
    let dispatcher = RecordingDispatcher::new();
    let rendered = render(submit_card(json!("plain text")), &dispatcher);
    let err = rendered
        .action("send")
        .and_then(|node| node.invoke())
        .expect("bound")
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidActionPayload(_)));
    assert!(dispatcher.invocations().is_empty());
}

#[test]
fn open_url_and_http_payloads() {
    let dispatcher = RecordingDispatcher::new();
    let card = json!({
        "body": [{ "type": "Input.Text", "id": "q", "value": "rust" }],
        "actions": [
            { "type": "Action.OpenUrl", "id": "docs", "url": "https://example.com/docs" },
            { "type": "Action.Http", "id": "search", "method": "POST", "url": "https://example.com/search" }
        ]
    });
    let rendered = render(card, &dispatcher);
    let docs = rendered
        .action("docs")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(docs.data, json!({ "url": "https://example.com/docs" }));
    let search = rendered
        .action("search")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(search.data, json!({ "q": "rust" }));
}

#[test]
fn inline_action_on_a_text_input() {
    let dispatcher = RecordingDispatcher::new();
    let card = json!({
        "body": [{
            "type": "Input.Text",
            "id": "reply",
            "inlineAction": { "type": "Action.Submit", "id": "send-reply", "title": "Send" }
        }]
    });
    let rendered = render(card, &dispatcher);
    rendered.input("reply").expect("input").set("thanks");
    let invocation = rendered
        .action("send-reply")
        .and_then(|node| node.invoke())
        .expect("bound")
        .expect("invoke");
    assert_eq!(invocation.data, json!({ "reply": "thanks" }));
    let text_box = rendered.find("reply").expect("text box");
    assert_eq!(text_box.property("submitOnEnter"), Some(&json!(true)));
}
