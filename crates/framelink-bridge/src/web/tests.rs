use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlIFrameElement;

use super::*;
use crate::platform::{
    Document, Element, FrameHandle, FrameLoad, FrameSpec, MessageBus, MountPoint, Scheduler,
    WindowRef,
};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn container() -> web_sys::Element {
    let container = document().create_element("div").unwrap();
    document().body().unwrap().append_child(&container).unwrap();
    container
}

fn spec() -> FrameSpec {
    FrameSpec {
        src: "about:blank".into(),
        allow: "camera; microphone".into(),
        width: "640px".into(),
        height: "480px".into(),
        border: "0px".into(),
    }
}

#[wasm_bindgen_test]
fn mount_point_inserts_configured_iframe() {
    let node = container();
    node.set_inner_html("<p>placeholder</p>");
    let mount = WebMountPoint::new(node.clone().into());
    assert!(mount.is_attachable());

    mount.clear();
    let frame = mount.append_frame(&spec()).unwrap();

    assert_eq!(node.child_element_count(), 1);
    let iframe = node
        .first_element_child()
        .unwrap()
        .dyn_into::<HtmlIFrameElement>()
        .unwrap();
    assert_eq!(iframe.get_attribute("allow").as_deref(), Some("camera; microphone"));
    assert_eq!(iframe.style().get_property_value("width").unwrap(), "640px");
    assert!(frame.is_attached());
    assert!(frame.content_window().is_some());

    frame.detach();
    assert!(!frame.is_attached());
    assert!(frame.content_window().is_none());
    assert_eq!(node.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn text_node_is_not_attachable() {
    let text = document().create_text_node("x");
    assert!(!WebMountPoint::new(text.into()).is_attachable());
}

#[wasm_bindgen_test]
fn frame_window_id_is_stable() {
    let mount = WebMountPoint::new(container().into());
    let frame = mount.append_frame(&spec()).unwrap();
    let first = frame.content_window().unwrap().id();
    let second = frame.content_window().unwrap().id();
    assert_eq!(first, second);

    let own = WebWindow::current().unwrap();
    assert_ne!(WebWindowRef::new(own.raw().clone()).id(), first);
}

#[wasm_bindgen_test]
fn frame_load_listener_sees_error_event() {
    let node = container();
    let frame = WebMountPoint::new(node.clone().into())
        .append_frame(&spec())
        .unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    frame.add_load_listener(Rc::new(move |outcome| sink.borrow_mut().push(outcome)));

    let iframe = node.first_element_child().unwrap();
    iframe
        .dispatch_event(&web_sys::Event::new("error").unwrap())
        .unwrap();
    assert_eq!(seen.borrow().last(), Some(&FrameLoad::Failed));
}

#[wasm_bindgen_test]
fn document_clicks_and_reports_disabled() {
    let button = document().create_element("button").unwrap();
    button.set_id("framelinkTestBtn");
    document().body().unwrap().append_child(&button).unwrap();

    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let doc = WebDocument::new(document());
    let element = doc.element_by_id("framelinkTestBtn").unwrap();
    element.add_click_listener(Rc::new(move || counter.set(counter.get() + 1)));

    element.click();
    assert_eq!(clicks.get(), 1);
    assert!(!element.is_disabled());

    button.set_attribute("disabled", "").unwrap();
    assert!(element.is_disabled());
    assert!(doc.element_by_id("missingBtn").is_none());
}

#[wasm_bindgen_test]
fn listeners_can_be_removed_once() {
    let window = WebWindow::current().unwrap();
    let id = window.add_message_listener(Rc::new(|_| {}));
    assert!(window.remove_message_listener(id));
    assert!(!window.remove_message_listener(id));
}

#[wasm_bindgen_test]
fn posting_json_to_own_window_succeeds() {
    let window = WebWindow::current().unwrap();
    let own = WebWindowRef::new(window.raw().clone());
    own.post_message(&json!({"type": "mirotalk.iframe", "version": 1}), "*")
        .unwrap();
}

#[wasm_bindgen_test]
fn cleared_interval_is_forgotten() {
    let window = WebWindow::current().unwrap();
    let scheduler = WebScheduler::new(window.raw().clone());
    let id = scheduler.set_interval(Duration::from_millis(1_000), Rc::new(|| {}));
    assert_ne!(id.0, 0);
    scheduler.clear_timer(id);
    scheduler.clear_timer(id);
}
