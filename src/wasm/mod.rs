//! Browser wiring for the three page effects.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::config::PageConfig;
use crate::error::Error;

pub mod interact;
mod listener;
pub mod render;
pub mod reveal;

pub use listener::Listener;

thread_local! {
    static PAGE: RefCell<Option<PageFx>> = const { RefCell::new(None) };
}

/// Everything the effects keep alive: observer, frame loop, listeners.
pub struct PageFx {
    pub reveal: Option<reveal::Reveal>,
    pub background: Option<render::Background>,
    pub interactions: Option<interact::Interactions>,
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    install(PageConfig::default())
}

/// Start every effect with `cfg` and keep it running for the page's
/// lifetime. A previously installed set is torn down first.
pub fn install(cfg: PageConfig) -> Result<(), JsValue> {
    teardown();
    let fx = start(&cfg)?;
    PAGE.with(|page| *page.borrow_mut() = Some(fx));
    Ok(())
}

/// Whether a set of effects is currently installed.
pub fn installed() -> bool {
    PAGE.with(|page| page.borrow().is_some())
}

/// Stop the animation, disconnect the observer and remove all listeners.
#[wasm_bindgen]
pub fn teardown() {
    if PAGE.with(|page| page.borrow_mut().take()).is_some() {
        debug("page_fx: torn down");
    }
}

/// Start each effect independently; one failing leaves the others running.
pub fn start(cfg: &PageConfig) -> Result<PageFx, Error> {
    cfg.validate()?;
    let window = web_sys::window().ok_or(Error::NoWindow)?;
    let document = window.document().ok_or(Error::NoDocument)?;

    let fx = PageFx {
        reveal: enabled("reveal", reveal::start(&document, &cfg.reveal)).flatten(),
        background: enabled(
            "background",
            render::start(&window, &document, &cfg.background),
        ),
        interactions: enabled(
            "interactions",
            interact::start(&window, &document, &cfg.interactions),
        ),
    };
    debug(&format!(
        "page_fx: watching {} reveal targets, {} shapes, {} click handlers",
        fx.reveal.as_ref().map_or(0, |r| r.watched()),
        fx.background.as_ref().map_or(0, |b| b.shape_count()),
        fx.interactions.as_ref().map_or(0, |i| i.len()),
    ));
    Ok(fx)
}

fn enabled<T>(name: &str, res: crate::Result<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            warn(&format!("page_fx: {name} disabled: {e}"));
            None
        }
    }
}

fn debug(msg: &str) {
    web_sys::console::debug_1(&msg.into());
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}
