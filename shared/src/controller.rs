//! The drawing surface controller: tool state, the stroke capture state
//! machine, the clear prompt, export, resize and snapshot persistence.
//!
//! Every handler runs to completion on the caller's thread; hosts forward
//! platform events one at a time.

use log::{debug, warn};

use crate::config::{Config, ConfigError, PersistPolicy, ResizePolicy, Sizing};
use crate::input::{EndReason, EventResponse, PointerInput};
use crate::storage::SnapshotStore;
use crate::surface::{Paint, PaintTicket, Segment, Surface, SurfaceError};
use crate::tool::{ToolError, ToolState};
use crate::{Color, Point, Rect, BACKGROUND};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeState {
    Idle,
    Drawing { pointer_id: i32, last: Point },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearPrompt {
    Hidden,
    Shown,
}

/// Where a click on the open clear prompt landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissTarget {
    Backdrop,
    Content,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub data_url: String,
}

/// A snapshot the surface is still decoding. Segments drawn meanwhile are
/// replayed on top once it lands, and saves wait for it.
#[derive(Debug)]
struct PendingPaint {
    ticket: PaintTicket,
    data_url: String,
    replay: Vec<Segment>,
    save_held: bool,
}

pub struct Controller<S, P> {
    surface: S,
    pending: Option<PendingPaint>,
    store: P,
    tools: ToolState,
    stroke: StrokeState,
    prompt: ClearPrompt,
    sizing: Sizing,
    persist_policy: PersistPolicy,
    resize_policy: ResizePolicy,
    export_filename: String,
}

/// Raster dimensions for a sizing mode; `container` is the element's
/// current layout size.
pub fn initial_size(sizing: Sizing, container: (u32, u32)) -> (u32, u32) {
    match sizing {
        Sizing::Fixed { width, height } => (width.max(1), height.max(1)),
        Sizing::FillContainer => (container.0.max(1), container.1.max(1)),
    }
}

impl<S: Surface, P: SnapshotStore> Controller<S, P> {
    /// Sizes and paints the raster, restores the saved drawing if one
    /// exists, and selects the first color and size.
    pub fn start(
        mut surface: S,
        store: P,
        config: &Config,
        container: (u32, u32),
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let tools = ToolState::from_config(config)?;

        let (width, height) = initial_size(config.sizing, container);
        if surface.size() != (width, height) {
            surface.resize(width, height);
        }
        surface.fill(BACKGROUND);

        let mut controller = Self {
            surface,
            pending: None,
            store,
            tools,
            stroke: StrokeState::Idle,
            prompt: ClearPrompt::Hidden,
            sizing: config.sizing,
            persist_policy: config.persist,
            resize_policy: config.resize,
            export_filename: config.export_filename.clone(),
        };
        controller.restore();
        debug!("Drawing surface ready at {width}x{height}");
        Ok(controller)
    }

    fn restore(&mut self) {
        let saved = match self.store.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => return,
            Err(err) => {
                warn!("Could not read saved drawing, starting blank: {err}");
                return;
            }
        };
        debug!("Restoring saved drawing ({} bytes)", saved.len());
        self.paint(saved, Vec::new(), false);
    }

    /// Paints a snapshot, then puts `replay` back on top of it. When the
    /// surface decodes later, the replay and any held save wait for
    /// [`Controller::paint_finished`].
    fn paint(&mut self, data_url: String, replay: Vec<Segment>, save_held: bool) {
        match self.surface.paint_data_url(&data_url) {
            Ok(Paint::Done) => self.settle(&replay, save_held),
            Ok(Paint::Pending(ticket)) => {
                for segment in &replay {
                    self.surface.stroke_segment(segment);
                }
                self.pending = Some(PendingPaint {
                    ticket,
                    data_url,
                    replay,
                    save_held,
                });
            }
            Err(err) => {
                warn!("Ignoring unreadable drawing: {err}");
                self.settle(&replay, save_held);
            }
        }
    }

    fn settle(&mut self, replay: &[Segment], save_held: bool) {
        for segment in replay {
            self.surface.stroke_segment(segment);
        }
        if save_held {
            self.persist();
        }
    }

    /// Reports that the surface finished the paint identified by `ticket`.
    /// Tickets superseded by a later paint, clear or resize are ignored.
    pub fn paint_finished(&mut self, ticket: PaintTicket, result: Result<(), SurfaceError>) {
        let pending = match self.pending.take() {
            Some(pending) if pending.ticket == ticket => pending,
            other => {
                self.pending = other;
                debug!("Ignoring superseded paint {ticket:?}");
                return;
            }
        };
        match result {
            Ok(()) => {
                debug!("Drawing painted, replaying {} segments", pending.replay.len());
                self.settle(&pending.replay, pending.save_held);
            }
            // The replayed segments are already on the raster.
            Err(err) => {
                warn!("Ignoring unreadable drawing: {err}");
                self.settle(&[], pending.save_held);
            }
        }
    }

    pub fn is_painting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn into_parts(self) -> (S, P) {
        (self.surface, self.store)
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.stroke
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.stroke, StrokeState::Drawing { .. })
    }

    pub fn prompt(&self) -> ClearPrompt {
        self.prompt
    }

    pub fn pointer_down(&mut self, input: &PointerInput, rect: &Rect) -> EventResponse {
        let response = EventResponse::for_kind(input.kind);
        if self.is_drawing() {
            return response;
        }
        let Some(point) = input.client.and_then(|client| rect.to_local(client)) else {
            return response;
        };
        self.stroke = StrokeState::Drawing {
            pointer_id: input.pointer_id,
            last: point,
        };
        let dot = Segment::dot(point, self.tools.current_color(), self.tools.current_size());
        self.draw(dot);
        if self.persist_policy == PersistPolicy::EverySegment {
            self.persist();
        }
        response
    }

    pub fn pointer_move(&mut self, input: &PointerInput, rect: &Rect) -> EventResponse {
        let StrokeState::Drawing { pointer_id, last } = self.stroke else {
            return EventResponse::default();
        };
        let response = EventResponse::for_kind(input.kind);
        if pointer_id != input.pointer_id {
            return response;
        }
        let Some(point) = input.client.and_then(|client| rect.to_local(client)) else {
            return response;
        };
        let segment = Segment {
            from: last,
            to: point,
            color: self.tools.current_color(),
            width: self.tools.current_size(),
        };
        self.draw(segment);
        self.stroke = StrokeState::Drawing {
            pointer_id,
            last: point,
        };
        if self.persist_policy == PersistPolicy::EverySegment {
            self.persist();
        }
        response
    }

    fn draw(&mut self, segment: Segment) {
        self.surface.stroke_segment(&segment);
        if let Some(pending) = &mut self.pending {
            pending.replay.push(segment);
        }
    }

    /// Ends the gesture of `pointer_id`. Returns whether a stroke was open.
    pub fn pointer_end(&mut self, pointer_id: i32, reason: EndReason) -> bool {
        match self.stroke {
            StrokeState::Drawing {
                pointer_id: active, ..
            } if active == pointer_id => {
                self.stroke = StrokeState::Idle;
                debug!("Stroke ended ({reason:?})");
                if self.persist_policy == PersistPolicy::StrokeEnd {
                    self.persist();
                }
                true
            }
            _ => false,
        }
    }

    pub fn select_color(&mut self, index: usize) -> Result<Color, ToolError> {
        self.tools.select_color(index)
    }

    pub fn select_size(&mut self, index: usize) -> Result<u32, ToolError> {
        self.tools.select_size(index)
    }

    pub fn select_color_value(&mut self, value: &str) -> Result<Color, ToolError> {
        self.tools.select_color_value(value)
    }

    pub fn select_size_value(&mut self, value: &str) -> Result<u32, ToolError> {
        self.tools.select_size_value(value)
    }

    pub fn request_clear(&mut self) {
        self.prompt = ClearPrompt::Shown;
    }

    /// Wipes the raster and forgets the saved drawing. Does nothing unless
    /// the prompt is open.
    pub fn confirm_clear(&mut self) -> bool {
        if self.prompt != ClearPrompt::Shown {
            debug!("Ignoring clear confirmation without an open prompt");
            return false;
        }
        self.pending = None;
        self.surface.fill(BACKGROUND);
        self.prompt = ClearPrompt::Hidden;
        if let Err(err) = self.store.remove() {
            warn!("Could not remove saved drawing: {err}");
        }
        true
    }

    pub fn cancel_clear(&mut self) {
        self.prompt = ClearPrompt::Hidden;
    }

    /// Closes the prompt when the click landed outside its content.
    pub fn dismiss_clear(&mut self, target: DismissTarget) -> bool {
        if self.prompt == ClearPrompt::Shown && target == DismissTarget::Backdrop {
            self.prompt = ClearPrompt::Hidden;
            return true;
        }
        false
    }

    /// Fails with [`SurfaceError::PaintPending`] until a pending paint lands.
    pub fn export(&self) -> Result<Export, SurfaceError> {
        if self.pending.is_some() {
            return Err(SurfaceError::PaintPending);
        }
        Ok(Export {
            filename: self.export_filename.clone(),
            data_url: self.surface.encode_data_url()?,
        })
    }

    /// Follows the container's layout size. Fixed-size rasters ignore it.
    pub fn container_resized(&mut self, container: (u32, u32)) {
        if let Sizing::FillContainer = self.sizing {
            let (width, height) = initial_size(self.sizing, container);
            self.resize(width, height);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.surface.size() == (width, height) {
            return;
        }
        let in_flight = self.pending.take();
        let previous = match (self.resize_policy, in_flight) {
            // The raster does not hold the pending snapshot yet; carry it over.
            (ResizePolicy::Preserve, Some(pending)) => {
                Some((pending.data_url, pending.replay, pending.save_held))
            }
            (ResizePolicy::Preserve, None) => match self.surface.encode_data_url() {
                Ok(previous) => Some((previous, Vec::new(), false)),
                Err(err) => {
                    warn!("Could not keep drawing across resize: {err}");
                    None
                }
            },
            (ResizePolicy::Clear, _) => None,
        };
        self.surface.resize(width, height);
        self.surface.fill(BACKGROUND);
        if let Some((previous, replay, save_held)) = previous {
            self.paint(previous, replay, save_held);
        }
        debug!("Resized drawing surface to {width}x{height}");
    }

    /// Final write before the page goes away. While a paint is pending the
    /// stored snapshot is newer than the raster and is left alone.
    pub fn unload(&mut self) -> bool {
        if self.pending.is_some() {
            warn!("Page closing before the drawing finished loading, keeping the stored copy");
            return false;
        }
        self.persist()
    }

    /// Writes the current raster to the snapshot store. Failures are logged
    /// and never reach the input path. While a paint is pending the write
    /// is held until it lands.
    pub fn persist(&mut self) -> bool {
        if let Some(pending) = &mut self.pending {
            pending.save_held = true;
            return false;
        }
        let data_url = match self.surface.encode_data_url() {
            Ok(data_url) => data_url,
            Err(err) => {
                warn!("Could not encode drawing for saving: {err}");
                return false;
            }
        };
        match self.store.save(&data_url) {
            Ok(()) => true,
            Err(err) => {
                warn!("Could not save drawing: {err}");
                false
            }
        }
    }
}
