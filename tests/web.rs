#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Object, Promise, Reflect};
use page_fx::config::{BackgroundConfig, InteractionConfig, RevealConfig};
use page_fx::interact::CopyOutcome;
use page_fx::reveal::Transition;
use page_fx::wasm::{self, interact, render, reveal, Listener};
use page_fx::PageConfig;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, EventInit, HtmlElement, Navigator, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> Window {
    web_sys::window().unwrap()
}

fn document() -> Document {
    window().document().unwrap()
}

fn mount(html: &str) -> Element {
    let doc = document();
    let root = doc.create_element("div").unwrap();
    root.set_inner_html(html);
    doc.body().unwrap().append_child(&root).unwrap();
    root
}

fn find(root: &Element, selector: &str) -> Element {
    root.query_selector(selector).unwrap().unwrap()
}

async fn sleep(ms: i32) {
    let done = Promise::new(&mut |resolve, _| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(done).await.unwrap();
}

/// Bubbling, cancelable click. Returns `false` if a handler prevented the
/// default action.
fn click(target: &Element) -> bool {
    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let ev = Event::new_with_event_init_dict("click", &init).unwrap();
    target.dispatch_event(&ev).unwrap()
}

/// Swap `scrollIntoView` on `el` for one that writes its options into
/// `data-scrolled` as `behavior:block`.
fn record_scrolls(el: &Element) {
    let recorder = Function::new_with_args(
        "opts",
        "this.setAttribute('data-scrolled', opts.behavior + ':' + (opts.block || ''));",
    );
    Reflect::set(el, &"scrollIntoView".into(), &recorder).unwrap();
}

fn selected_text() -> String {
    let selection = window().get_selection().unwrap().unwrap();
    String::from(selection.to_string())
}

/// Shadows `navigator.clipboard` with a stub whose `writeText` resolves or
/// rejects. The real one comes back on drop.
struct StubClipboard {
    navigator: Navigator,
}

impl StubClipboard {
    fn accepting() -> Self {
        Self::install("window.__pageFxCopied = text; return Promise.resolve();")
    }

    fn refusing() -> Self {
        Self::install("return Promise.reject(new Error('write permission denied'));")
    }

    fn install(body: &str) -> Self {
        let navigator = window().navigator();
        let clipboard = Object::new();
        Reflect::set(
            &clipboard,
            &"writeText".into(),
            &Function::new_with_args("text", body),
        )
        .unwrap();
        let descriptor = Object::new();
        Reflect::set(&descriptor, &"value".into(), &clipboard).unwrap();
        Reflect::set(&descriptor, &"configurable".into(), &JsValue::TRUE).unwrap();
        Reflect::define_property(&navigator, &"clipboard".into(), &descriptor).unwrap();
        Self { navigator }
    }

    fn written() -> Option<String> {
        Reflect::get(&window(), &"__pageFxCopied".into())
            .unwrap()
            .as_string()
    }
}

impl Drop for StubClipboard {
    fn drop(&mut self) {
        Reflect::delete_property(&self.navigator, &"clipboard".into()).unwrap();
        Reflect::delete_property(&window(), &"__pageFxCopied".into()).unwrap();
    }
}

const MAIL: &str = r#"<div class="mail-wrapper"><span class="mail-address"> me@example.com </span><button class="copy-mail">Copy</button></div>"#;

fn quick_restore(ms: i32) -> InteractionConfig {
    InteractionConfig {
        restore_label_ms: ms,
        ..InteractionConfig::default()
    }
}

fn bar_width(root: &Element) -> String {
    find(root, ".bar div")
        .dyn_into::<HtmlElement>()
        .unwrap()
        .style()
        .get_property_value("width")
        .unwrap()
}

#[wasm_bindgen_test]
fn transitions_toggle_class_and_bars() {
    let root = mount(r#"<section class="reveal"><div class="bar"><div data-value="80%"></div></div></section>"#);
    let section = find(&root, ".reveal");
    let cfg = RevealConfig::default();

    reveal::apply(&section, Transition::Activate, &cfg).unwrap();
    assert!(section.class_list().contains("active"));
    assert_eq!(bar_width(&section), "80%");

    reveal::apply(&section, Transition::Deactivate, &cfg).unwrap();
    assert!(!section.class_list().contains("active"));
    assert_eq!(bar_width(&section), "0px");
    root.remove();
}

#[wasm_bindgen_test]
fn reveal_without_targets_observes_nothing() {
    let cfg = RevealConfig {
        selector: ".nothing-here".into(),
        ..RevealConfig::default()
    };
    assert!(reveal::start(&document(), &cfg).unwrap().is_none());
}

#[wasm_bindgen_test]
async fn observer_activates_only_visible_targets() {
    let root = mount(concat!(
        r#"<section class="reveal-watch" id="watch-in" style="position:fixed;top:0;left:0;width:100px;height:100px">"#,
        r#"<div class="bar"><div data-value="70%"></div></div></section>"#,
        r#"<section class="reveal-watch" id="watch-out" style="position:fixed;top:-5000px;left:0;width:100px;height:100px"></section>"#,
    ));
    let cfg = RevealConfig {
        selector: ".reveal-watch".into(),
        ..RevealConfig::default()
    };
    let watching = reveal::start(&document(), &cfg).unwrap().expect("targets are mounted");
    assert_eq!(watching.watched(), 2);

    let inside = find(&root, "#watch-in");
    let outside = find(&root, "#watch-out");
    for _ in 0..40 {
        if inside.class_list().contains("active") {
            break;
        }
        sleep(50).await;
    }
    assert!(inside.class_list().contains("active"));
    assert_eq!(bar_width(&inside), "70%");
    assert!(!outside.class_list().contains("active"));

    drop(watching);
    root.remove();
}

#[wasm_bindgen_test]
fn anchor_scrolls_only_to_existing_sections() {
    let root = mount(r#"<section id="skills-test">skills</section>"#);
    let section = find(&root, "#skills-test");
    record_scrolls(&section);
    let doc = document();

    assert!(interact::scroll_to_anchor(&doc, "#skills-test"));
    assert_eq!(section.get_attribute("data-scrolled").as_deref(), Some("smooth:center"));
    assert!(!interact::scroll_to_anchor(&doc, "#missing-section"));
    assert!(!interact::scroll_to_anchor(&doc, "#"));
    root.remove();
}

#[wasm_bindgen_test]
fn nav_click_scrolls_instead_of_navigating() {
    wasm::teardown();
    let root = mount(concat!(
        r##"<nav><a id="nav-test" href="#nav-target">go</a><a id="nav-dead" href="#nav-nowhere">x</a></nav>"##,
        r#"<div id="nav-target"></div>"#,
    ));
    let doc = document();
    let target = find(&root, "#nav-target");
    record_scrolls(&target);
    let handlers = interact::start(&window(), &doc, &InteractionConfig::default()).unwrap();

    assert!(!click(&find(&root, "#nav-test")), "default navigation is suppressed");
    assert_eq!(target.get_attribute("data-scrolled").as_deref(), Some("smooth:center"));

    // missing section: still suppressed, nothing scrolls, nothing throws
    target.remove_attribute("data-scrolled").unwrap();
    assert!(!click(&find(&root, "#nav-dead")));
    assert_eq!(target.get_attribute("data-scrolled"), None);

    drop(handlers);
    root.remove();
}

#[wasm_bindgen_test]
fn scroll_hint_scrolls_to_next_section() {
    let root = mount(r#"<button class="hint-test">v</button><section id="hint-target-test"></section>"#);
    let target = find(&root, "#hint-target-test");
    record_scrolls(&target);
    let cfg = InteractionConfig {
        scroll_hint: ".hint-test".into(),
        scroll_target: "#hint-target-test".into(),
        ..InteractionConfig::default()
    };
    let handlers = interact::start(&window(), &document(), &cfg).unwrap();

    click(&find(&root, ".hint-test"));
    assert_eq!(target.get_attribute("data-scrolled").as_deref(), Some("smooth:"));

    drop(handlers);
    root.remove();
}

#[wasm_bindgen_test]
async fn copy_success_restores_label_exactly() {
    let _clipboard = StubClipboard::accepting();
    let root = mount(MAIL);
    let control = find(&root, ".copy-mail");
    let address = find(&root, ".mail-address");

    let outcome = interact::copy_address(&window(), &control, &address, &quick_restore(40)).await;
    assert_eq!(
        outcome,
        CopyOutcome::Copied {
            original_label: "Copy".into()
        }
    );
    assert_eq!(StubClipboard::written().as_deref(), Some("me@example.com"));
    assert_eq!(control.text_content().unwrap(), "Copied!");

    sleep(120).await;
    assert_eq!(control.text_content().unwrap(), "Copy");
    assert_eq!(control.get_attribute(interact::PENDING_LABEL_ATTR), None);
    root.remove();
}

#[wasm_bindgen_test]
async fn copy_refused_selects_address_and_keeps_label() {
    let _clipboard = StubClipboard::refusing();
    let root = mount(MAIL);
    let control = find(&root, ".copy-mail");
    let address = find(&root, ".mail-address");

    let outcome = interact::copy_address(&window(), &control, &address, &quick_restore(40)).await;
    assert_eq!(outcome, CopyOutcome::SelectedForManualCopy);
    assert_eq!(control.text_content().unwrap(), "Copy");
    assert_eq!(selected_text().trim(), "me@example.com");

    sleep(120).await;
    assert_eq!(control.text_content().unwrap(), "Copy");
    root.remove();
}

#[wasm_bindgen_test]
async fn second_copy_during_confirmation_keeps_real_label() {
    let _clipboard = StubClipboard::accepting();
    let root = mount(MAIL);
    let control = find(&root, ".copy-mail");
    let address = find(&root, ".mail-address");
    let cfg = quick_restore(80);

    interact::copy_address(&window(), &control, &address, &cfg).await;
    sleep(30).await;
    let again = interact::copy_address(&window(), &control, &address, &cfg).await;
    assert_eq!(
        again,
        CopyOutcome::Copied {
            original_label: "Copy".into()
        }
    );
    assert_eq!(control.text_content().unwrap(), "Copied!");

    // both timers have fired by now
    sleep(250).await;
    assert_eq!(control.text_content().unwrap(), "Copy");
    root.remove();
}

fn delegated_copy_config() -> InteractionConfig {
    InteractionConfig {
        copy_control: ".copy-test".into(),
        copy_wrapper: ".wrap-test".into(),
        copy_address: ".addr-test".into(),
        ..InteractionConfig::default()
    }
}

/// Counts clicks that bubble all the way to the window.
fn count_window_clicks() -> (Rc<Cell<u32>>, Listener) {
    let seen = Rc::new(Cell::new(0));
    let counter = seen.clone();
    let listener = Listener::new(&window(), "click", move |_| counter.set(counter.get() + 1)).unwrap();
    (seen, listener)
}

#[wasm_bindgen_test]
async fn delegated_copy_resolves_nested_markup() {
    wasm::teardown();
    let _clipboard = StubClipboard::refusing();
    let root = mount(concat!(
        r#"<div class="wrap-test"><span class="addr-test"> you@example.org </span>"#,
        r#"<button class="copy-test"><span class="icon-test">Copy</span></button></div>"#,
    ));
    let handlers = interact::start(&window(), &document(), &delegated_copy_config()).unwrap();
    let (bubbled, _count) = count_window_clicks();

    click(&find(&root, ".icon-test"));
    assert_eq!(bubbled.get(), 0, "handled clicks stop at the document");

    sleep(50).await;
    assert_eq!(selected_text().trim(), "you@example.org");
    assert_eq!(find(&root, ".copy-test").text_content().unwrap(), "Copy");

    drop(handlers);
    root.remove();
}

#[wasm_bindgen_test]
async fn delegated_copy_without_wrapper_does_nothing() {
    wasm::teardown();
    let _clipboard = StubClipboard::accepting();
    let root = mount(r#"<button class="copy-test">Copy</button><p class="elsewhere-test">text</p>"#);
    let handlers = interact::start(&window(), &document(), &delegated_copy_config()).unwrap();
    let (bubbled, _count) = count_window_clicks();

    click(&find(&root, ".copy-test"));
    sleep(50).await;
    assert_eq!(bubbled.get(), 0);
    assert_eq!(find(&root, ".copy-test").text_content().unwrap(), "Copy");
    assert_eq!(StubClipboard::written(), None);

    // unrelated clicks pass through untouched
    click(&find(&root, ".elsewhere-test"));
    assert_eq!(bubbled.get(), 1);

    drop(handlers);
    root.remove();
}

#[wasm_bindgen_test]
fn resize_keeps_shapes() {
    let root = mount(r#"<canvas id="bg-geo-test"></canvas>"#);
    let window = window();
    let cfg = BackgroundConfig {
        canvas_id: "bg-geo-test".into(),
        ..BackgroundConfig::default()
    };
    let bg = render::start(&window, &document(), &cfg).unwrap();
    assert_eq!(bg.shape_count(), 40);

    window.dispatch_event(&Event::new("resize").unwrap()).unwrap();
    let canvas = document()
        .get_element_by_id("bg-geo-test")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    let w = window.inner_width().unwrap().as_f64().unwrap();
    assert_eq!(canvas.width(), w as u32);
    assert_eq!(bg.shape_count(), 40);
    assert_eq!(bg.bounds().width, w);

    drop(bg);
    root.remove();
}

#[wasm_bindgen_test]
fn missing_canvas_is_reported() {
    let cfg = BackgroundConfig {
        canvas_id: "no-such-canvas".into(),
        ..BackgroundConfig::default()
    };
    let err = render::start(&window(), &document(), &cfg).err().unwrap();
    assert!(matches!(err, page_fx::Error::CanvasNotFound(_)));
}

#[wasm_bindgen_test]
fn install_replaces_and_teardown_clears() {
    wasm::install(PageConfig::default()).unwrap();
    assert!(wasm::installed());
    wasm::install(PageConfig::default()).unwrap();
    assert!(wasm::installed());

    wasm::teardown();
    assert!(!wasm::installed());
}
