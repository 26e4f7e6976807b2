use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::config::RevealConfig;
use crate::error::Result;
use crate::reveal::{Hysteresis, RevealTracker, Transition};

/// Live intersection observer over the page's reveal targets.
pub struct Reveal {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
    watched: usize,
}

impl Reveal {
    pub fn watched(&self) -> usize {
        self.watched
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Observe every element matching `cfg.selector`. `Ok(None)` when the page
/// has nothing to reveal.
pub fn start(document: &Document, cfg: &RevealConfig) -> Result<Option<Reveal>> {
    let nodes = document.query_selector_all(&cfg.selector)?;
    let elements: Vec<Element> = (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect();
    if elements.is_empty() {
        return Ok(None);
    }

    let mut tracker = RevealTracker::new(Hysteresis::from(cfg));
    for key in 0..elements.len() {
        tracker.register(key);
    }

    let callback = {
        let elements = elements.clone();
        let cfg = cfg.clone();
        Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(key) = elements.iter().position(|el| *el == target) else {
                    continue;
                };
                let Some(transition) = tracker.pending(&key, entry.intersection_ratio()) else {
                    continue;
                };
                // a failed render stays uncommitted and is retried on the next report
                if apply(&target, transition, &cfg).is_ok() {
                    tracker.commit(&key, transition);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>)
    };

    let init = IntersectionObserverInit::new();
    let thresholds: Array = cfg
        .observer_thresholds
        .iter()
        .map(|&t| JsValue::from_f64(t))
        .collect();
    init.set_threshold(&thresholds);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for el in &elements {
        observer.observe(el);
    }

    Ok(Some(Reveal {
        observer,
        _callback: callback,
        watched: elements.len(),
    }))
}

/// Mirror a state transition onto the element: toggle the active class and
/// drive its progress bars.
pub fn apply(el: &Element, transition: Transition, cfg: &RevealConfig) -> Result<()> {
    let classes = el.class_list();
    match transition {
        Transition::Activate => classes.add_1(&cfg.active_class)?,
        Transition::Deactivate => classes.remove_1(&cfg.active_class)?,
    }

    let bars = el.query_selector_all(&cfg.bar_selector)?;
    for i in 0..bars.length() {
        let Some(bar) = bars.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let Some(declared) = bar.get_attribute(&cfg.bar_value_attr) else {
            continue;
        };
        bar.style()
            .set_property("width", transition.bar_width(&declared))?;
    }
    Ok(())
}
