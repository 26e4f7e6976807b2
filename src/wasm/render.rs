use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use super::listener::Listener;
use crate::config::{BackgroundConfig, Rgb};
use crate::error::{Error, Result};
use crate::shapes::{Bounds, ShapeField};

/// Running background animation. Dropping it stops the frame loop and
/// detaches the resize handler.
pub struct Background {
    field: Rc<RefCell<ShapeField>>,
    frames: Rc<FrameLoop>,
    window: Window,
    _resize: Listener,
}

impl Background {
    pub fn shape_count(&self) -> usize {
        self.field.borrow().shapes().len()
    }

    pub fn bounds(&self) -> Bounds {
        self.field.borrow().bounds()
    }

    pub fn stop(&self) {
        self.frames.running.set(false);
        if let Some(id) = self.frames.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.frames.tick.borrow_mut().take();
    }
}

impl Drop for Background {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Default)]
struct FrameLoop {
    running: Cell<bool>,
    pending: Cell<Option<i32>>,
    // `tick` holds the animation-frame closure so it can keep requesting
    // itself. The closure only sees the loop through a `Weak`.
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameLoop {
    fn schedule(&self, window: &Window) -> std::result::Result<(), JsValue> {
        if let Some(tick) = self.tick.borrow().as_ref() {
            let id = window.request_animation_frame(tick.as_ref().unchecked_ref())?;
            self.pending.set(Some(id));
        }
        Ok(())
    }
}

fn viewport(window: &Window) -> Result<Bounds> {
    let w = window.inner_width()?.as_f64().unwrap_or(0.0);
    let h = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Bounds::new(w, h))
}

fn fit(canvas: &HtmlCanvasElement, bounds: Bounds) {
    canvas.set_width(bounds.width as u32);
    canvas.set_height(bounds.height as u32);
}

/// Size the canvas to the viewport, seed the shape pool and start the
/// per-frame loop.
pub fn start(window: &Window, document: &Document, cfg: &BackgroundConfig) -> Result<Background> {
    let canvas = document
        .get_element_by_id(&cfg.canvas_id)
        .ok_or_else(|| Error::CanvasNotFound(cfg.canvas_id.clone()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::CanvasNotFound(cfg.canvas_id.clone()))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(Error::No2dContext)?
        .dyn_into()
        .map_err(|_| Error::No2dContext)?;

    let bounds = viewport(window)?;
    fit(&canvas, bounds);
    let field = Rc::new(RefCell::new(ShapeField::new(cfg, bounds, js_sys::Math::random)));

    // Resizing the canvas clears it; shapes carry on from where they were.
    let resize = {
        let canvas = canvas.clone();
        let field = field.clone();
        let win = window.clone();
        Listener::new(window, "resize", move |_| {
            if let Ok(bounds) = viewport(&win) {
                fit(&canvas, bounds);
                field.borrow_mut().resize(bounds);
            }
        })?
    };

    let frames = Rc::new(FrameLoop::default());
    let tick = {
        let weak: Weak<FrameLoop> = Rc::downgrade(&frames);
        let field = field.clone();
        let win = window.clone();
        let (color, line_width) = (cfg.color, cfg.line_width);
        Closure::wrap(Box::new(move || {
            let Some(frames) = weak.upgrade() else {
                return;
            };
            frames.pending.set(None);
            if !frames.running.get() {
                return;
            }
            {
                let mut field = field.borrow_mut();
                field.step();
                let _ = draw(&ctx, &field, color, line_width);
            }
            // schedule next
            let _ = frames.schedule(&win);
        }) as Box<dyn FnMut()>)
    };
    *frames.tick.borrow_mut() = Some(tick);
    frames.running.set(true);
    frames.schedule(window)?;

    Ok(Background {
        field,
        frames,
        window: window.clone(),
        _resize: resize,
    })
}

fn draw(
    ctx: &CanvasRenderingContext2d,
    field: &ShapeField,
    color: Rgb,
    line_width: f64,
) -> std::result::Result<(), JsValue> {
    let b = field.bounds();
    ctx.clear_rect(0.0, 0.0, b.width, b.height);
    for shape in field.shapes() {
        ctx.save();
        ctx.translate(shape.x, shape.y)?;
        ctx.rotate(shape.angle)?;

        ctx.begin_path();
        for (x, y) in shape.outline() {
            ctx.line_to(x, y);
        }
        ctx.set_stroke_style_str(&shape.stroke_style(color));
        ctx.set_line_width(line_width);
        ctx.stroke();

        ctx.restore();
    }
    Ok(())
}
