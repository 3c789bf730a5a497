// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::AppTheme;
use crate::constants::app_info;
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Shows the theme and which viewfinder controls are visible.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = match self.config.app_theme {
            AppTheme::System => 0,
            AppTheme::Dark => 1,
            AppTheme::Light => 2,
        };
        let theme_dropdown = widget::dropdown(
            &self.theme_dropdown_options,
            Some(theme_index),
            Message::SetAppTheme,
        );

        let version_info = if app_info::is_flatpak() {
            format!("Version {} (Flatpak)", app_info::version())
        } else {
            format!("Version {}", app_info::version())
        };

        let settings_column: Element<'_, Message> = widget::column()
            .push(widget::text(fl!("appearance")).size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(toggle_row(fl!("theme"), theme_dropdown))
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("controls")).size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(toggle_row(
                fl!("show-cancel"),
                widget::toggler(self.config.show_cancel_button)
                    .on_toggle(Message::ToggleCancelButton),
            ))
            .push(toggle_row(
                fl!("show-switch-camera"),
                widget::toggler(self.config.show_switch_camera_button)
                    .on_toggle(Message::ToggleSwitchCameraButton),
            ))
            .push(toggle_row(
                fl!("show-torch"),
                widget::toggler(self.config.show_torch_button)
                    .on_toggle(Message::ToggleTorchButton),
            ))
            .push(toggle_row(
                fl!("show-overlay"),
                widget::toggler(self.config.show_overlay_view).on_toggle(Message::ToggleOverlay),
            ))
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(spacing.space_xxs)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}

fn toggle_row<'a>(
    label: String,
    control: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    widget::row()
        .push(widget::text::body(label))
        .push(widget::horizontal_space().width(Length::Fill))
        .push(control)
        .align_y(Alignment::Center)
        .into()
}
