use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

use super::listener::Listener;
use crate::config::InteractionConfig;
use crate::error::Result;
use crate::interact::{address_text, anchor_target, CopyOutcome};

/// Click handlers for the scroll hint, nav anchors and the copy-mail button.
pub struct Interactions {
    listeners: Vec<Listener>,
}

impl Interactions {
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

pub fn start(window: &Window, document: &Document, cfg: &InteractionConfig) -> Result<Interactions> {
    let mut listeners = Vec::new();

    if let Some(hint) = document.query_selector(&cfg.scroll_hint)? {
        let doc = document.clone();
        let target = cfg.scroll_target.clone();
        listeners.push(Listener::new(&hint, "click", move |_| {
            if let Ok(Some(next)) = doc.query_selector(&target) {
                next.scroll_into_view_with_scroll_into_view_options(&smooth(None));
            }
        })?);
    }

    let anchors = document.query_selector_all(&cfg.nav_anchors)?;
    for i in 0..anchors.length() {
        let Some(anchor) = anchors.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let doc = document.clone();
        let link = anchor.clone();
        listeners.push(Listener::new(&anchor, "click", move |e: Event| {
            e.prevent_default();
            let href = link.get_attribute("href").unwrap_or_default();
            scroll_to_anchor(&doc, &href);
        })?);
    }

    // Delegated so controls added later (popups) are handled too.
    let win = window.clone();
    let copy_cfg = cfg.clone();
    listeners.push(Listener::new(document, "click", move |e: Event| {
        let Some(control) = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&copy_cfg.copy_control).ok().flatten())
        else {
            return;
        };
        e.stop_propagation();
        let Some(address) = control
            .closest(&copy_cfg.copy_wrapper)
            .ok()
            .flatten()
            .and_then(|w| w.query_selector(&copy_cfg.copy_address).ok().flatten())
        else {
            return;
        };
        let (win, cfg) = (win.clone(), copy_cfg.clone());
        wasm_bindgen_futures::spawn_local(async move {
            copy_address(&win, &control, &address, &cfg).await;
        });
    })?);

    Ok(Interactions { listeners })
}

fn smooth(block: Option<ScrollLogicalPosition>) -> ScrollIntoViewOptions {
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    if let Some(block) = block {
        opts.set_block(block);
    }
    opts
}

/// Smooth-scroll the section named by `href` to the middle of the viewport.
/// Returns whether a target was found.
pub fn scroll_to_anchor(document: &Document, href: &str) -> bool {
    let Some(selector) = anchor_target(href) else {
        return false;
    };
    match document.query_selector(selector) {
        Ok(Some(section)) => {
            section.scroll_into_view_with_scroll_into_view_options(&smooth(Some(
                ScrollLogicalPosition::Center,
            )));
            true
        }
        _ => false,
    }
}

/// Holds the control's own label while the confirmation is showing.
pub const PENDING_LABEL_ATTR: &str = "data-copy-label";

/// Copy the address text to the clipboard, flashing the confirmation label
/// on `control`. Falls back to selecting the address in the page.
pub async fn copy_address(
    window: &Window,
    control: &Element,
    address: &Element,
    cfg: &InteractionConfig,
) -> CopyOutcome {
    let text = address.text_content().unwrap_or_default();
    match write_clipboard(window, address_text(&text)).await {
        Ok(()) => {
            // a repeat click during the confirmation must not capture it as the label
            let original_label = match control.get_attribute(PENDING_LABEL_ATTR) {
                Some(label) => label,
                None => {
                    let label = control.text_content().unwrap_or_default();
                    let _ = control.set_attribute(PENDING_LABEL_ATTR, &label);
                    label
                }
            };
            control.set_text_content(Some(&cfg.copied_label));
            restore_label_later(window, control, cfg.restore_label_ms);
            CopyOutcome::Copied { original_label }
        }
        Err(_) => {
            let _ = select_contents(window, address);
            CopyOutcome::SelectedForManualCopy
        }
    }
}

async fn write_clipboard(window: &Window, text: &str) -> std::result::Result<(), JsValue> {
    let navigator = window.navigator();
    // absent outside secure contexts
    let available = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false);
    if !available {
        return Err(JsValue::from_str("clipboard unavailable"));
    }
    JsFuture::from(navigator.clipboard().write_text(text)).await?;
    Ok(())
}

fn restore_label_later(window: &Window, control: &Element, delay_ms: i32) {
    let control = control.clone();
    let restore = Closure::once_into_js(move || {
        // an earlier timer may already have put the label back
        if let Some(label) = control.get_attribute(PENDING_LABEL_ATTR) {
            control.set_text_content(Some(&label));
            let _ = control.remove_attribute(PENDING_LABEL_ATTR);
        }
    });
    let _ = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(restore.unchecked_ref(), delay_ms);
}

fn select_contents(window: &Window, el: &Element) -> std::result::Result<(), JsValue> {
    let document = el
        .owner_document()
        .ok_or_else(|| JsValue::from_str("detached element"))?;
    let range = document.create_range()?;
    range.select_node_contents(el)?;
    if let Some(selection) = window.get_selection()? {
        selection.remove_all_ranges()?;
        selection.add_range(&range)?;
    }
    Ok(())
}
