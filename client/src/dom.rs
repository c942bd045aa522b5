use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlCanvasElement, HtmlElement, PointerEvent};

use doodlepad_shared::{Point, PointerInput, PointerKind, Rect};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

/// All elements matching `selector`, in document order. An empty match is a
/// page misconfiguration.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    let mut elements = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        if let Some(element) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        {
            elements.push(element);
        }
    }
    if elements.is_empty() {
        return Err(JsValue::from_str(&format!("Missing elements: {selector}")));
    }
    Ok(elements)
}

pub fn data_attribute(element: &Element, name: &str) -> Result<String, JsValue> {
    element
        .get_attribute(name)
        .ok_or_else(|| JsValue::from_str(&format!("Missing {name} on {}", element.class_name())))
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, on) {
        log::warn!("Could not toggle class {class}: {err:?}");
    }
}

pub fn canvas_rect(canvas: &HtmlCanvasElement) -> Rect {
    let rect = canvas.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

pub fn container_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
    (
        canvas.offset_width().max(0) as u32,
        canvas.offset_height().max(0) as u32,
    )
}

pub fn pointer_input(event: &PointerEvent) -> PointerInput {
    PointerInput {
        pointer_id: event.pointer_id(),
        kind: PointerKind::from_pointer_type(&event.pointer_type()),
        client: Some(Point::new(
            event.client_x() as f64,
            event.client_y() as f64,
        )),
    }
}

/// Secondary mouse buttons do not draw.
pub fn is_primary_press(event: &PointerEvent) -> bool {
    event.pointer_type() != "mouse" || event.button() == 0
}

pub fn event_targets(event: &Event, element: &Element) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .is_some_and(|target| &target == element)
}
