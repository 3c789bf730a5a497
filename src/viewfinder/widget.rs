// SPDX-License-Identifier: MPL-2.0

//! Viewfinder widget
//!
//! Places the preview element and the control buttons at the frames computed
//! by the container, and paints the overlay stroke between them. The
//! container only learns its bounds through this widget: whenever the laid
//! out size differs from the size the model knows, a resize message is
//! published.

use super::{ControlKind, ViewfinderView, compute_layout};
use crate::constants::ui;
use crate::fl;
use crate::overlay::render;
use crate::overlay::{OverlayLayer, StrokeShape};
use cosmic::iced::advanced::widget::{Operation, Tree};
use cosmic::iced::advanced::{Clipboard, Layout, Shell, Widget, layout, mouse, renderer};
use cosmic::iced::event::Status;
use cosmic::iced::{Background, Color, Element, Event, Length, Rectangle, Size, Vector};
use cosmic::widget;
use cosmic::{Renderer, Theme};

/// Switch camera icon SVG (camera with circular arrows)
const CAMERA_SWITCH_ICON: &[u8] = include_bytes!("../../resources/button_icons/camera-switch.svg");
/// Torch icon SVG (flashlight)
const TORCH_ICON: &[u8] = include_bytes!("../../resources/button_icons/torch.svg");

/// Messages emitted by the viewfinder's controls
#[derive(Debug, Clone)]
pub struct ViewfinderMessages<Message> {
    pub cancel: Message,
    pub switch_camera: Message,
    pub toggle_torch: Message,
    /// Container bounds changed
    pub resized: fn(Size) -> Message,
}

/// Custom widget laying out the viewfinder
pub struct ViewfinderWidget<'a, Message> {
    known_bounds: Size,
    preview_frame: Option<Rectangle>,
    overlay_layer: Option<OverlayLayer>,
    stroke: Option<StrokeShape>,
    on_resize: fn(Size) -> Message,
    /// Preview element first, then one element per visible control
    children: Vec<Element<'a, Message, Theme, Renderer>>,
    controls: Vec<ControlKind>,
    visibility: super::ControlVisibility,
}

impl<'a, Message: Clone + 'a> ViewfinderWidget<'a, Message> {
    /// Create the widget for the current state of `view`
    pub fn new(
        view: &ViewfinderView,
        preview: Element<'a, Message, Theme, Renderer>,
        messages: ViewfinderMessages<Message>,
    ) -> Self {
        let visibility = view.control_visibility();
        let controls: Vec<ControlKind> = ControlKind::ALL
            .into_iter()
            .filter(|kind| visibility.is_visible(*kind))
            .collect();

        let mut children = vec![preview];
        children.extend(
            controls
                .iter()
                .map(|kind| control_button(*kind, &messages)),
        );

        Self {
            known_bounds: view.bounds(),
            preview_frame: view.preview_frame(),
            overlay_layer: view.overlay().map(|overlay| overlay.layer().clone()),
            stroke: view.overlay().map(|overlay| overlay.stroke().clone()),
            on_resize: messages.resized,
            children,
            controls,
            visibility,
        }
    }
}

/// Build a control button filling its frame
fn control_button<'a, Message: Clone + 'a>(
    kind: ControlKind,
    messages: &ViewfinderMessages<Message>,
) -> Element<'a, Message, Theme, Renderer> {
    let (content, message): (Element<'a, Message, Theme, Renderer>, Message) = match kind {
        ControlKind::Cancel => (
            widget::text::body(fl!("cancel")).into(),
            messages.cancel.clone(),
        ),
        ControlKind::SwitchCamera => (
            widget::icon(widget::icon::from_svg_bytes(CAMERA_SWITCH_ICON).symbolic(true))
                .size(ui::CORNER_ICON_SIZE)
                .into(),
            messages.switch_camera.clone(),
        ),
        ControlKind::ToggleTorch => (
            widget::icon(widget::icon::from_svg_bytes(TORCH_ICON).symbolic(true))
                .size(ui::CORNER_ICON_SIZE)
                .into(),
            messages.toggle_torch.clone(),
        ),
    };

    let button = widget::button::custom(widget::container(content).center(Length::Fill))
        .padding(0)
        .width(Length::Fill)
        .height(Length::Fill)
        .class(cosmic::theme::Button::Text)
        .on_press(message);

    let control = widget::container(button)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(overlay_container_style);

    match control_tooltip(kind) {
        Some(label) => widget::tooltip(
            control,
            widget::text::body(label),
            widget::tooltip::Position::Bottom,
        )
        .into(),
        None => control.into(),
    }
}

/// Tooltip naming an icon-only control
fn control_tooltip(kind: ControlKind) -> Option<String> {
    match kind {
        ControlKind::Cancel => None,
        ControlKind::SwitchCamera => Some(fl!("switch-camera")),
        ControlKind::ToggleTorch => Some(fl!("toggle-torch")),
    }
}

/// Semi-transparent themed background so controls stay readable over the preview
pub fn overlay_container_style(theme: &Theme) -> widget::container::Style {
    let mut background: Color = theme.cosmic().bg_color().into();
    background.a = ui::OVERLAY_BACKGROUND_ALPHA;

    widget::container::Style {
        background: Some(Background::Color(background)),
        text_color: Some(theme.cosmic().on_bg_color().into()),
        icon_color: Some(theme.cosmic().on_bg_color().into()),
        border: cosmic::iced::Border {
            radius: theme.cosmic().corner_radii.radius_s.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

impl<'a, Message: Clone + 'a> Widget<Message, Theme, Renderer> for ViewfinderWidget<'a, Message> {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn children(&self) -> Vec<Tree> {
        self.children.iter().map(Tree::new).collect()
    }

    fn diff(&mut self, tree: &mut Tree) {
        tree.diff_children(&mut self.children);
    }

    fn layout(
        &self,
        tree: &mut Tree,
        renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        let size = limits.max();
        let frames = compute_layout(size, self.visibility);

        let mut nodes = Vec::with_capacity(self.children.len());

        // Preview at the top-left of the camera view, aspect-filled once the
        // capture format is known
        let preview_size = self
            .preview_frame
            .map(|frame| frame.size())
            .unwrap_or(frames.camera_view.size());
        let preview_origin = frames.camera_view.position()
            + self
                .preview_frame
                .map(|frame| Vector::new(frame.x, frame.y))
                .unwrap_or(Vector::ZERO);
        let preview_node = self.children[0].as_widget().layout(
            &mut tree.children[0],
            renderer,
            &layout::Limits::new(preview_size, preview_size),
        );
        nodes.push(preview_node.move_to(preview_origin));

        for ((kind, child), child_tree) in self
            .controls
            .iter()
            .zip(self.children.iter().skip(1))
            .zip(tree.children.iter_mut().skip(1))
        {
            let frame = frames.control(*kind).unwrap_or_default();
            let node = child.as_widget().layout(
                child_tree,
                renderer,
                &layout::Limits::new(Size::ZERO, frame.size()),
            );
            nodes.push(node.move_to(frame.position()));
        }

        layout::Node::with_children(size, nodes)
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        style: &renderer::Style,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
    ) {
        use cosmic::iced::advanced::Renderer as _;

        let bounds = layout.bounds();
        let frames = compute_layout(bounds.size(), self.visibility);
        let origin = Vector::new(bounds.x, bounds.y);
        let mut children = layout.children();

        // Preview may overflow the camera view when aspect-filled
        if let Some(preview_layout) = children.next() {
            renderer.with_layer(frames.camera_view + origin, |renderer| {
                self.children[0].as_widget().draw(
                    &tree.children[0],
                    renderer,
                    theme,
                    style,
                    preview_layout,
                    cursor,
                    viewport,
                );
            });
        }

        if let (Some(layer), Some(stroke)) = (&self.overlay_layer, &self.stroke) {
            render::draw_stroke(renderer, layer, stroke, origin, bounds);
        }

        for ((child, child_tree), child_layout) in self
            .children
            .iter()
            .skip(1)
            .zip(tree.children.iter().skip(1))
            .zip(children)
        {
            child.as_widget().draw(
                child_tree,
                renderer,
                theme,
                style,
                child_layout,
                cursor,
                viewport,
            );
        }
    }

    fn on_event(
        &mut self,
        tree: &mut Tree,
        event: Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        renderer: &Renderer,
        clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        viewport: &Rectangle,
    ) -> Status {
        let size = layout.bounds().size();
        if size != self.known_bounds {
            // Publish once per widget instance; the next view carries the new size
            self.known_bounds = size;
            shell.publish((self.on_resize)(size));
        }

        // Controls sit above the preview, so they get the event first
        for ((child, child_tree), child_layout) in self
            .children
            .iter_mut()
            .zip(tree.children.iter_mut())
            .zip(layout.children())
            .rev()
        {
            let status = child.as_widget_mut().on_event(
                child_tree,
                event.clone(),
                child_layout,
                cursor,
                renderer,
                clipboard,
                shell,
                viewport,
            );

            if status == Status::Captured {
                return Status::Captured;
            }
        }

        Status::Ignored
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
        renderer: &Renderer,
    ) -> mouse::Interaction {
        for ((child, child_tree), child_layout) in self
            .children
            .iter()
            .zip(tree.children.iter())
            .zip(layout.children())
            .rev()
        {
            let interaction = child.as_widget().mouse_interaction(
                child_tree,
                child_layout,
                cursor,
                viewport,
                renderer,
            );

            if interaction != mouse::Interaction::default() {
                return interaction;
            }
        }

        mouse::Interaction::default()
    }

    fn operate(
        &self,
        tree: &mut Tree,
        layout: Layout<'_>,
        renderer: &Renderer,
        operation: &mut dyn Operation,
    ) {
        for ((child, child_tree), child_layout) in self
            .children
            .iter()
            .zip(tree.children.iter_mut())
            .zip(layout.children())
        {
            child
                .as_widget()
                .operate(child_tree, child_layout, renderer, operation);
        }
    }
}

impl<'a, Message: Clone + 'a> From<ViewfinderWidget<'a, Message>>
    for Element<'a, Message, Theme, Renderer>
{
    fn from(widget: ViewfinderWidget<'a, Message>) -> Self {
        Element::new(widget)
    }
}

impl ViewfinderView {
    /// Build the viewfinder element around a preview element
    pub fn view<'a, Message: Clone + 'a>(
        &self,
        preview: impl Into<Element<'a, Message, Theme, Renderer>>,
        messages: ViewfinderMessages<Message>,
    ) -> Element<'a, Message, Theme, Renderer> {
        ViewfinderWidget::new(self, preview.into(), messages).into()
    }
}

/// Placeholder preview surface for sources that render elsewhere
pub fn preview_placeholder<'a, Message: 'a>() -> Element<'a, Message, Theme, Renderer> {
    widget::container(widget::Space::new(Length::Fill, Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme: &Theme| widget::container::Style {
            background: Some(Background::Color(Color::from_rgb(0.08, 0.08, 0.08))),
            ..Default::default()
        })
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewfinder::ViewfinderBuilder;

    fn messages() -> ViewfinderMessages<()> {
        ViewfinderMessages {
            cancel: (),
            switch_camera: (),
            toggle_torch: (),
            resized: |_| (),
        }
    }

    #[test]
    fn test_children_follow_visible_controls() {
        let mut view = ViewfinderView::new();
        view.setup_components(
            ViewfinderBuilder::default()
                .show_cancel_button(false)
                .show_torch_button(true),
        )
        .unwrap();

        let widget = ViewfinderWidget::new(&view, preview_placeholder(), messages());
        assert_eq!(
            widget.controls,
            vec![ControlKind::SwitchCamera, ControlKind::ToggleTorch]
        );
        assert_eq!(widget.children.len(), 3);
        assert!(widget.stroke.is_some());
    }

    #[test]
    fn test_icon_controls_have_tooltips() {
        assert_eq!(control_tooltip(ControlKind::Cancel), None);
        assert_eq!(
            control_tooltip(ControlKind::SwitchCamera).as_deref(),
            Some("Switch camera")
        );
        assert_eq!(
            control_tooltip(ControlKind::ToggleTorch).as_deref(),
            Some("Toggle torch")
        );
    }

    #[test]
    fn test_unconfigured_view_has_only_preview() {
        let view = ViewfinderView::new();
        let widget = ViewfinderWidget::new(&view, preview_placeholder(), messages());
        assert!(widget.controls.is_empty());
        assert_eq!(widget.children.len(), 1);
        assert!(widget.overlay_layer.is_none());
        assert_eq!(widget.known_bounds, Size::ZERO);
    }
}
