use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlAnchorElement, HtmlCanvasElement, HtmlElement, PointerEvent};

use doodlepad_shared::tool::parse_size;
use doodlepad_shared::{Config, Controller, DismissTarget, EndReason, PaintTicket, SurfaceError};

use crate::dom::{
    canvas_rect, container_size, data_attribute, event_targets, get_element, is_primary_press,
    pointer_input, query_all,
};
use crate::logger;
use crate::palette::{sync_options, sync_prompt};
use crate::persistence::LocalStore;
use crate::render::CanvasSurface;

type App = Rc<RefCell<Controller<CanvasSurface, LocalStore>>>;

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let search = window.location().search().ok().unwrap_or_default();
    logger::init(logger::debug_enabled(&search));
    let started = Rc::new(Cell::new(false));

    if document.ready_state() != "loading" {
        started.set(true);
        return start_app();
    }

    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            web_sys::console::error_1(&err);
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", onload.as_ref().unchecked_ref())?;
    onload.forget();

    Ok(())
}

/// Page config: defaults, overridden by the canvas's `data-config` JSON,
/// with palette and sizes taken from the option elements on the page.
fn read_config(
    canvas: &HtmlCanvasElement,
    colors: &[HtmlElement],
    sizes: &[HtmlElement],
) -> Result<Config, JsValue> {
    let mut config = match canvas.get_attribute("data-config") {
        Some(json) => Config::from_json(&json).map_err(|err| JsValue::from_str(&err.to_string()))?,
        None => Config::default(),
    };
    config.palette = colors
        .iter()
        .map(|element| data_attribute(element, "data-color"))
        .collect::<Result<_, _>>()?;
    config.sizes = sizes
        .iter()
        .map(|element| {
            let value = data_attribute(element, "data-size")?;
            parse_size(&value).map_err(|err| JsValue::from_str(&err.to_string()))
        })
        .collect::<Result<_, _>>()?;
    Ok(config)
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "canvas")?;
    let clear_button: HtmlElement = get_element(&document, "clear")?;
    let save_button: HtmlElement = get_element(&document, "save")?;
    let modal: HtmlElement = get_element(&document, "clearModal")?;
    let confirm_button: HtmlElement = get_element(&document, "confirmClear")?;
    let cancel_button: HtmlElement = get_element(&document, "cancelClear")?;
    let colors = Rc::new(query_all(&document, ".color")?);
    let sizes = Rc::new(query_all(&document, ".size")?);

    let config = read_config(&canvas, &colors, &sizes)?;
    if let Err(err) = canvas.style().set_property("touch-action", "none") {
        log::warn!("Could not disable touch scrolling on the canvas: {err:?}");
    }

    let store = LocalStore::new(&window, &config.storage_key);
    let surface = CanvasSurface::new(canvas.clone())?;
    let controller = Controller::start(surface, store, &config, container_size(&canvas))
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let app: App = Rc::new(RefCell::new(controller));
    {
        let weak = Rc::downgrade(&app);
        app.borrow()
            .surface()
            .set_on_painted(Rc::new(move |ticket: PaintTicket, result: Result<(), SurfaceError>| {
                if let Some(app) = weak.upgrade() {
                    app.borrow_mut().paint_finished(ticket, result);
                }
            }));
    }

    {
        let app = app.borrow();
        sync_options(&colors, app.tools().colors());
        sync_options(&sizes, app.tools().sizes());
        sync_prompt(&modal, app.prompt());
    }

    bind_pointer(&canvas, &app)?;
    bind_tools(&colors, &sizes, &app)?;
    bind_clear(&clear_button, &confirm_button, &cancel_button, &modal, &app)?;
    bind_save(&document, &save_button, &app)?;

    {
        let app = app.clone();
        let canvas = canvas.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().container_resized(container_size(&canvas));
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let app = app.clone();
        let onbeforeunload = Closure::<dyn FnMut(Event)>::new(move |_| {
            app.borrow_mut().unload();
        });
        window.add_event_listener_with_callback(
            "beforeunload",
            onbeforeunload.as_ref().unchecked_ref(),
        )?;
        onbeforeunload.forget();
    }

    log::debug!("Drawing surface wired");
    Ok(())
}

fn bind_pointer(canvas: &HtmlCanvasElement, app: &App) -> Result<(), JsValue> {
    {
        let app = app.clone();
        let canvas_cb = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if !is_primary_press(&event) {
                return;
            }
            let response = app
                .borrow_mut()
                .pointer_down(&pointer_input(&event), &canvas_rect(&canvas_cb));
            if response.prevent_default {
                event.prevent_default();
            }
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let app = app.clone();
        let canvas_cb = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let response = app
                .borrow_mut()
                .pointer_move(&pointer_input(&event), &canvas_rect(&canvas_cb));
            if response.prevent_default {
                event.prevent_default();
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    for (name, reason) in [
        ("pointerup", EndReason::Up),
        ("pointerleave", EndReason::Leave),
        ("pointercancel", EndReason::Cancel),
    ] {
        let app = app.clone();
        let onend = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            app.borrow_mut().pointer_end(event.pointer_id(), reason);
        });
        canvas.add_event_listener_with_callback(name, onend.as_ref().unchecked_ref())?;
        onend.forget();
    }

    Ok(())
}

fn bind_tools(
    colors: &Rc<Vec<HtmlElement>>,
    sizes: &Rc<Vec<HtmlElement>>,
    app: &App,
) -> Result<(), JsValue> {
    for (index, element) in colors.iter().enumerate() {
        let app = app.clone();
        let colors = colors.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut app = app.borrow_mut();
            match app.select_color(index) {
                Ok(color) => log::debug!("Color {}", color.to_css()),
                Err(err) => log::warn!("Color selection rejected: {err}"),
            }
            sync_options(&colors, app.tools().colors());
        });
        element.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    for (index, element) in sizes.iter().enumerate() {
        let app = app.clone();
        let sizes = sizes.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut app = app.borrow_mut();
            match app.select_size(index) {
                Ok(size) => log::debug!("Size {size}"),
                Err(err) => log::warn!("Size selection rejected: {err}"),
            }
            sync_options(&sizes, app.tools().sizes());
        });
        element.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

fn bind_clear(
    clear_button: &HtmlElement,
    confirm_button: &HtmlElement,
    cancel_button: &HtmlElement,
    modal: &HtmlElement,
    app: &App,
) -> Result<(), JsValue> {
    {
        let app = app.clone();
        let modal_cb = modal.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut app = app.borrow_mut();
            app.request_clear();
            sync_prompt(&modal_cb, app.prompt());
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let app = app.clone();
        let modal_cb = modal.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut app = app.borrow_mut();
            app.confirm_clear();
            sync_prompt(&modal_cb, app.prompt());
        });
        confirm_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let app = app.clone();
        let modal_cb = modal.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut app = app.borrow_mut();
            app.cancel_clear();
            sync_prompt(&modal_cb, app.prompt());
        });
        cancel_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let app = app.clone();
        let modal_cb = modal.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let target = if event_targets(&event, &modal_cb) {
                DismissTarget::Backdrop
            } else {
                DismissTarget::Content
            };
            let mut app = app.borrow_mut();
            if app.dismiss_clear(target) {
                sync_prompt(&modal_cb, app.prompt());
            }
        });
        modal.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    Ok(())
}

fn bind_save(document: &Document, save_button: &HtmlElement, app: &App) -> Result<(), JsValue> {
    let app = app.clone();
    let document = document.clone();
    let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
        let export = match app.borrow().export() {
            Ok(export) => export,
            Err(err) => {
                log::error!("Could not export drawing: {err}");
                return;
            }
        };
        if let Ok(element) = document.create_element("a") {
            if let Ok(anchor) = element.dyn_into::<HtmlAnchorElement>() {
                anchor.set_href(&export.data_url);
                anchor.set_download(&export.filename);
                anchor.click();
            }
        }
    });
    save_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}
