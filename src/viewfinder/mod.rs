// SPDX-License-Identifier: MPL-2.0

//! Viewfinder container
//!
//! Owns the camera view, the scan-region overlay and the optional controls,
//! and keeps them in sync with the scan source:
//!
//! - `layout`: control placement
//! - `widget`: iced widget rendering the container
//!
//! All methods run on the UI update loop. The scan source reports from its
//! own threads through the lifecycle channel; the application drains that
//! channel and feeds each event to [`ViewfinderView::handle_event`], which is
//! how background reports reach layout state without locks.

pub mod layout;
pub mod widget;

pub use layout::{ControlKind, ControlVisibility, ViewfinderLayout, compute_layout};

use crate::constants::BORDER_RESET_DELAY;
use crate::errors::{ViewfinderError, ViewfinderResult};
use crate::geometry::{self, CameraDimensions, NormalizedRect};
use crate::orientation::{self, DeviceOrientation, InterfaceOrientations, VideoOrientation};
use crate::overlay::{HighlightState, OverlayColors, ReaderOverlay, ViewfinderOverlay};
use crate::reader::{LifecycleReceiver, ReaderEvent, ScanSource};
use cosmic::iced::{Point, Rectangle, Size};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

/// What happens to a pending highlight reset when a new highlight arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResetPolicy {
    /// Only the most recent highlight's reset reverts the overlay
    #[default]
    ReplacePending,
    /// Every reset reverts the overlay, even if a newer highlight is showing
    Independent,
}

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Pending revert of the overlay to [`HighlightState::Normal`]
///
/// Tickets only apply to the view that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderReset {
    pub view_id: u64,
    pub generation: u64,
    pub delay: Duration,
}

/// Wait out a reset ticket's delay
///
/// The application maps the returned ticket back into
/// [`ViewfinderView::reset_border`] on the UI loop.
pub async fn reset_after(ticket: BorderReset) -> BorderReset {
    tokio::time::sleep(ticket.delay).await;
    ticket
}

/// One-time configuration of a viewfinder
pub struct ViewfinderBuilder {
    pub reader: Option<Arc<dyn ScanSource>>,
    pub rect_of_interest: Option<NormalizedRect>,
    pub show_cancel_button: bool,
    pub show_switch_camera_button: bool,
    pub show_torch_button: bool,
    pub show_overlay_view: bool,
    pub colors: OverlayColors,
    pub reset_delay: Duration,
    pub reset_policy: ResetPolicy,
    pub supported_orientations: InterfaceOrientations,
    /// Custom overlay; a [`ReaderOverlay`] is created when absent
    pub overlay: Option<Box<dyn ViewfinderOverlay>>,
}

impl ViewfinderBuilder {
    pub fn new(reader: Arc<dyn ScanSource>) -> Self {
        Self {
            reader: Some(reader),
            ..Default::default()
        }
    }

    pub fn rect_of_interest(mut self, rect: NormalizedRect) -> Self {
        self.rect_of_interest = Some(rect);
        self
    }

    pub fn show_cancel_button(mut self, show: bool) -> Self {
        self.show_cancel_button = show;
        self
    }

    pub fn show_switch_camera_button(mut self, show: bool) -> Self {
        self.show_switch_camera_button = show;
        self
    }

    pub fn show_torch_button(mut self, show: bool) -> Self {
        self.show_torch_button = show;
        self
    }

    pub fn show_overlay_view(mut self, show: bool) -> Self {
        self.show_overlay_view = show;
        self
    }

    pub fn colors(mut self, colors: OverlayColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    pub fn reset_policy(mut self, policy: ResetPolicy) -> Self {
        self.reset_policy = policy;
        self
    }

    pub fn supported_orientations(mut self, supported: InterfaceOrientations) -> Self {
        self.supported_orientations = supported;
        self
    }

    pub fn overlay(mut self, overlay: Box<dyn ViewfinderOverlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

impl Default for ViewfinderBuilder {
    fn default() -> Self {
        Self {
            reader: None,
            rect_of_interest: None,
            show_cancel_button: true,
            show_switch_camera_button: true,
            show_torch_button: false,
            show_overlay_view: true,
            colors: OverlayColors::default(),
            reset_delay: BORDER_RESET_DELAY,
            reset_policy: ResetPolicy::default(),
            supported_orientations: InterfaceOrientations::default(),
            overlay: None,
        }
    }
}

/// A control button owned by the viewfinder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlButton {
    pub kind: ControlKind,
    pub hidden: bool,
}

/// Subscription state for orientation change notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationObserver {
    #[default]
    Detached,
    Attached,
}

/// The viewfinder container
pub struct ViewfinderView {
    id: u64,
    bounds: Size,
    layout: ViewfinderLayout,
    preview_frame: Option<Rectangle>,
    overlay: Option<Box<dyn ViewfinderOverlay>>,
    cancel_button: Option<ControlButton>,
    switch_camera_button: Option<ControlButton>,
    toggle_torch_button: Option<ControlButton>,
    reader: Option<Weak<dyn ScanSource>>,
    rect_of_interest: Option<NormalizedRect>,
    camera_dimensions: Option<CameraDimensions>,
    device_orientation: DeviceOrientation,
    supported_orientations: InterfaceOrientations,
    orientation_observer: OrientationObserver,
    lifecycle_events: Option<Arc<tokio::sync::Mutex<LifecycleReceiver>>>,
    reset_delay: Duration,
    reset_policy: ResetPolicy,
    reset_generation: u64,
    needs_display: bool,
    configured: bool,
}

impl Default for ViewfinderView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewfinderView {
    /// An unconfigured container; nothing is created until `setup_components`
    pub fn new() -> Self {
        Self {
            id: NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed),
            bounds: Size::ZERO,
            layout: ViewfinderLayout::default(),
            preview_frame: None,
            overlay: None,
            cancel_button: None,
            switch_camera_button: None,
            toggle_torch_button: None,
            reader: None,
            rect_of_interest: None,
            camera_dimensions: None,
            device_orientation: DeviceOrientation::Unknown,
            supported_orientations: InterfaceOrientations::default(),
            orientation_observer: OrientationObserver::Detached,
            lifecycle_events: None,
            reset_delay: BORDER_RESET_DELAY,
            reset_policy: ResetPolicy::default(),
            reset_generation: 0,
            needs_display: false,
            configured: false,
        }
    }

    /// Wire the scan source, create the overlay and controls, and lay them out
    pub fn setup_components(&mut self, builder: ViewfinderBuilder) -> ViewfinderResult<()> {
        if self.configured {
            return Err(ViewfinderError::AlreadyConfigured);
        }
        if let Some(rect) = builder.rect_of_interest {
            rect.validate()?;
        }

        self.reader = builder.reader.as_ref().map(Arc::downgrade);
        self.rect_of_interest = builder.rect_of_interest;
        self.reset_delay = builder.reset_delay;
        self.reset_policy = builder.reset_policy;
        self.supported_orientations = builder.supported_orientations;

        if let Some(reader) = &builder.reader {
            let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
            reader.set_lifecycle_listener(Some(sender));
            self.lifecycle_events = Some(Arc::new(tokio::sync::Mutex::new(receiver)));
        }

        let mut overlay = builder
            .overlay
            .unwrap_or_else(|| Box::new(ReaderOverlay::new(builder.colors)));
        overlay.set_hidden(!builder.show_overlay_view);
        self.overlay = Some(overlay);

        self.cancel_button = Some(ControlButton {
            kind: ControlKind::Cancel,
            hidden: !builder.show_cancel_button,
        });
        self.switch_camera_button = Some(ControlButton {
            kind: ControlKind::SwitchCamera,
            hidden: !builder.show_switch_camera_button,
        });
        self.toggle_torch_button = Some(ControlButton {
            kind: ControlKind::ToggleTorch,
            hidden: !builder.show_torch_button,
        });

        self.orientation_observer = OrientationObserver::Attached;
        self.configured = true;
        self.relayout();

        info!(
            has_reader = builder.reader.is_some(),
            rect_of_interest = ?self.rect_of_interest,
            visibility = ?self.control_visibility(),
            "Viewfinder components set up"
        );

        if builder.reader.is_some() {
            self.refresh_orientation();
        }

        Ok(())
    }

    /// Unregister from the scan source and stop observing orientation
    pub fn detach(&mut self) {
        if let Some(reader) = self.reader.as_ref().and_then(Weak::upgrade) {
            reader.set_lifecycle_listener(None);
        }
        if self.orientation_observer == OrientationObserver::Attached {
            debug!("Viewfinder detached");
        }
        self.reader = None;
        self.lifecycle_events = None;
        self.orientation_observer = OrientationObserver::Detached;
    }

    /// Store new container bounds and relayout
    pub fn set_bounds(&mut self, bounds: Size) {
        if self.bounds == bounds {
            return;
        }
        self.bounds = bounds;
        self.relayout();

        // Keep the preview aspect-filled after a resize
        if let Some(dimensions) = self.camera_dimensions
            && let Err(err) = self.apply_preview_geometry(dimensions)
        {
            warn!(%err, "Failed to refit preview after resize");
        }
    }

    fn relayout(&mut self) {
        self.layout = compute_layout(self.bounds, self.control_visibility());
        self.needs_display = true;
    }

    /// Request a redraw and re-orient the preview connection
    ///
    /// Returns the video orientation that was applied, if any.
    pub fn set_needs_update_orientation(
        &mut self,
        device_orientation: DeviceOrientation,
    ) -> Option<VideoOrientation> {
        self.device_orientation = device_orientation;
        self.refresh_orientation()
    }

    fn refresh_orientation(&mut self) -> Option<VideoOrientation> {
        self.needs_display = true;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_needs_display();
        }

        let reader = self.reader()?;
        let connection = reader.preview_connection()?;
        if !connection.supports_video_orientation || self.supported_orientations.is_empty() {
            return None;
        }

        let orientation = orientation::video_orientation(
            self.device_orientation,
            self.supported_orientations,
            Some(connection.video_orientation),
        );
        if orientation != connection.video_orientation {
            debug!(
                device = ?self.device_orientation,
                from = ?connection.video_orientation,
                to = ?orientation,
                "Updating preview video orientation"
            );
        }
        reader.set_video_orientation(orientation);
        Some(orientation)
    }

    /// Dispatch a scan source event
    ///
    /// Returns a reset ticket when a scan result changed the highlight.
    pub fn handle_event(&mut self, event: ReaderEvent) -> ViewfinderResult<Option<BorderReset>> {
        match event {
            ReaderEvent::DidStartScanning => {
                self.did_start_scanning();
                Ok(None)
            }
            ReaderEvent::DidStopScanning => {
                self.did_stop_scanning();
                Ok(None)
            }
            ReaderEvent::CameraInputDimensions(dimensions) => {
                self.update_camera_input_dimensions(dimensions)?;
                Ok(None)
            }
            ReaderEvent::ScanCompleted(result) => {
                debug!(value = %result.value, valid = result.valid, "Scan result");
                let ticket = if result.valid {
                    self.add_green_border()
                } else {
                    self.add_red_border()
                };
                Ok(Some(ticket))
            }
        }
    }

    pub fn did_start_scanning(&mut self) {
        self.refresh_orientation();
    }

    pub fn did_stop_scanning(&mut self) {}

    /// Refit preview and overlay to a new capture format
    ///
    /// A missing format has no fallback and is reported as unsupported.
    pub fn update_camera_input_dimensions(
        &mut self,
        dimensions: Option<CameraDimensions>,
    ) -> ViewfinderResult<()> {
        let Some(dimensions) = dimensions else {
            warn!("Scan source reported no camera dimensions");
            return Err(ViewfinderError::Unsupported(
                "no fallback when camera dimensions are unavailable".to_string(),
            ));
        };

        // Validate before touching any state
        geometry::aspect_fill_scale(dimensions, self.bounds)?;
        self.camera_dimensions = Some(dimensions);

        if let Some(rect_of_interest) = self.rect_of_interest {
            let adjusted =
                geometry::adjusted_rect_of_interest(rect_of_interest, dimensions, self.bounds);
            if let Some(reader) = self.reader() {
                reader.set_rect_of_interest(adjusted);
            }
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.set_rect_of_interest(adjusted);
            }
        }

        self.apply_preview_geometry(dimensions)
    }

    fn apply_preview_geometry(&mut self, dimensions: CameraDimensions) -> ViewfinderResult<()> {
        let rect = geometry::aspect_fill_rect(dimensions, self.bounds)?;
        self.preview_frame = Some(rect);

        if let Some(reader) = self.reader() {
            reader.set_preview_frame(rect);
        }

        let center = Point::new(self.bounds.width / 2.0, self.bounds.height / 2.0);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_frame(rect.size(), center);
            overlay.draw_overlay();
        }

        debug!(
            camera_width = dimensions.width,
            camera_height = dimensions.height,
            preview_width = rect.width,
            preview_height = rect.height,
            "Preview fitted to container"
        );
        Ok(())
    }

    /// Show the wrong-code highlight
    pub fn add_red_border(&mut self) -> BorderReset {
        self.highlight(HighlightState::Wrong)
    }

    /// Show the valid-code highlight
    pub fn add_green_border(&mut self) -> BorderReset {
        self.highlight(HighlightState::Valid)
    }

    fn highlight(&mut self, state: HighlightState) -> BorderReset {
        let ticket = self.start_timer_for_border_reset();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.set_state(state);
        }
        ticket
    }

    fn start_timer_for_border_reset(&mut self) -> BorderReset {
        self.reset_generation += 1;
        BorderReset {
            view_id: self.id,
            generation: self.reset_generation,
            delay: self.reset_delay,
        }
    }

    /// Revert the highlight once a reset ticket expires
    ///
    /// Returns true if the overlay went back to normal.
    pub fn reset_border(&mut self, ticket: BorderReset) -> bool {
        if ticket.view_id != self.id {
            debug!(
                view = ticket.view_id,
                current = self.id,
                "Ignoring border reset from a replaced viewfinder"
            );
            return false;
        }

        let current = ticket.generation == self.reset_generation;
        if self.reset_policy == ResetPolicy::ReplacePending && !current {
            debug!(
                generation = ticket.generation,
                latest = self.reset_generation,
                "Ignoring superseded border reset"
            );
            return false;
        }

        match self.overlay.as_mut() {
            Some(overlay) => {
                overlay.set_state(HighlightState::Normal);
                true
            }
            None => false,
        }
    }

    /// Cancel button: stop the capture session
    pub fn cancel(&self) -> ViewfinderResult<()> {
        self.live_reader()?.stop_scanning();
        Ok(())
    }

    pub fn switch_camera(&self) -> ViewfinderResult<()> {
        self.live_reader()?.switch_device_input();
        Ok(())
    }

    pub fn toggle_torch(&self) -> ViewfinderResult<()> {
        self.live_reader()?.toggle_torch();
        Ok(())
    }

    fn reader(&self) -> Option<Arc<dyn ScanSource>> {
        self.reader.as_ref().and_then(Weak::upgrade)
    }

    fn live_reader(&self) -> ViewfinderResult<Arc<dyn ScanSource>> {
        if !self.configured {
            return Err(ViewfinderError::NotConfigured);
        }
        self.reader().ok_or(ViewfinderError::ReaderGone)
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn layout(&self) -> &ViewfinderLayout {
        &self.layout
    }

    /// Aspect-filled preview frame inside the camera view
    pub fn preview_frame(&self) -> Option<Rectangle> {
        self.preview_frame
    }

    pub fn camera_dimensions(&self) -> Option<CameraDimensions> {
        self.camera_dimensions
    }

    pub fn overlay(&self) -> Option<&dyn ViewfinderOverlay> {
        self.overlay.as_deref()
    }

    pub fn highlight_state(&self) -> HighlightState {
        self.overlay
            .as_ref()
            .map(|overlay| overlay.state())
            .unwrap_or_default()
    }

    pub fn control(&self, kind: ControlKind) -> Option<ControlButton> {
        match kind {
            ControlKind::Cancel => self.cancel_button,
            ControlKind::SwitchCamera => self.switch_camera_button,
            ControlKind::ToggleTorch => self.toggle_torch_button,
        }
    }

    /// Controls that exist and are not hidden
    pub fn control_visibility(&self) -> ControlVisibility {
        let visible = |button: Option<ControlButton>| button.is_some_and(|b| !b.hidden);
        ControlVisibility {
            cancel_button: visible(self.cancel_button),
            switch_camera_button: visible(self.switch_camera_button),
            torch_button: visible(self.toggle_torch_button),
        }
    }

    pub fn is_observing_orientation(&self) -> bool {
        self.orientation_observer == OrientationObserver::Attached
    }

    pub fn device_orientation(&self) -> DeviceOrientation {
        self.device_orientation
    }

    /// Receiver of scan source events, shared with the subscription draining it
    pub fn lifecycle_events(&self) -> Option<Arc<tokio::sync::Mutex<LifecycleReceiver>>> {
        self.lifecycle_events.clone()
    }

    /// Whether a redraw was requested since the last `take_needs_display`
    ///
    /// iced rebuilds and redraws the view after every update, so the flag
    /// only reports that a redraw was due. The app clears it once per update.
    pub fn take_needs_display(&mut self) -> bool {
        let overlay_dirty = self
            .overlay
            .as_mut()
            .map(|overlay| std::mem::take(&mut overlay.layer_mut().needs_display))
            .unwrap_or(false);
        std::mem::take(&mut self.needs_display) || overlay_dirty
    }
}

impl Drop for ViewfinderView {
    fn drop(&mut self) {
        self.detach();
    }
}
