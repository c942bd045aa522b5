use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlImageElement};

use doodlepad_shared::{Color, Paint, PaintTicket, Segment, Surface, SurfaceError};

pub type PaintCallback = Rc<dyn Fn(PaintTicket, Result<(), SurfaceError>)>;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Ticket of the newest paint; older decodes are dropped when they land.
    latest: Rc<Cell<u64>>,
    on_painted: Rc<RefCell<Option<PaintCallback>>>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            latest: Rc::new(Cell::new(0)),
            on_painted: Rc::new(RefCell::new(None)),
        })
    }

    /// Called after each decode this surface started has landed or failed.
    pub fn set_on_painted(&self, callback: PaintCallback) {
        *self.on_painted.borrow_mut() = Some(callback);
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.latest.get() + 1;
        self.latest.set(ticket);
        ticket
    }
}

fn notify(on_painted: &RefCell<Option<PaintCallback>>, ticket: u64, result: Result<(), SurfaceError>) {
    let callback = on_painted.borrow().clone();
    if let Some(callback) = callback {
        callback(PaintTicket(ticket), result);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn fill(&mut self, color: Color) {
        self.next_ticket();
        let (width, height) = self.size();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn stroke_segment(&mut self, segment: &Segment) {
        let ctx = &self.ctx;
        ctx.set_line_width(f64::from(segment.width));
        ctx.set_line_cap("round");
        ctx.set_stroke_style_str(&segment.color.to_css());
        ctx.begin_path();
        ctx.move_to(segment.from.x, segment.from.y);
        ctx.line_to(segment.to.x, segment.to.y);
        ctx.stroke();
        ctx.begin_path();
    }

    fn encode_data_url(&self) -> Result<String, SurfaceError> {
        self.canvas
            .to_data_url()
            .map_err(|err| SurfaceError::Encode(format!("{err:?}")))
    }

    /// Starts decoding; the image is drawn once the browser has loaded it
    /// and the controller is told through the `set_on_painted` callback.
    fn paint_data_url(&mut self, data_url: &str) -> Result<Paint, SurfaceError> {
        if !data_url.trim_start().starts_with("data:image/") {
            return Err(SurfaceError::Decode("not an image data URL".into()));
        }
        let image = HtmlImageElement::new()
            .map_err(|err| SurfaceError::Decode(format!("{err:?}")))?;

        let ticket = self.next_ticket();

        let ctx = self.ctx.clone();
        let image_cb = image.clone();
        let latest = self.latest.clone();
        let on_painted = self.on_painted.clone();
        let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
            if latest.get() != ticket {
                log::debug!("Dropping superseded paint {ticket}");
                return;
            }
            let result = ctx
                .draw_image_with_html_image_element(&image_cb, 0.0, 0.0)
                .map_err(|err| SurfaceError::Decode(format!("{err:?}")));
            notify(&on_painted, ticket, result);
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let latest = self.latest.clone();
        let on_painted = self.on_painted.clone();
        let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
            if latest.get() != ticket {
                return;
            }
            notify(
                &on_painted,
                ticket,
                Err(SurfaceError::Decode("browser could not decode image".into())),
            );
        });
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        image.set_src(data_url);
        Ok(Paint::Pending(PaintTicket(ticket)))
    }
}
