// SPDX-License-Identifier: GPL-3.0-only

//! Main view rendering

use crate::app::state::{AppModel, Message, ScanStatus};
use crate::fl;
use crate::viewfinder::widget::{ViewfinderMessages, preview_placeholder};
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Viewfinder filling the window with a status line beneath it
    pub fn view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let viewfinder = self.viewfinder.view(
            preview_placeholder(),
            ViewfinderMessages {
                cancel: Message::Cancel,
                switch_camera: Message::SwitchCamera,
                toggle_torch: Message::ToggleTorch,
                resized: Message::ContainerResized,
            },
        );

        let status_text = match &self.status {
            ScanStatus::Waiting => fl!("status-waiting"),
            ScanStatus::Scanned(result) if result.valid => {
                fl!("status-valid", value = result.value.clone())
            }
            ScanStatus::Scanned(result) => fl!("status-wrong", value = result.value.clone()),
            ScanStatus::Stopped => fl!("status-stopped"),
        };

        let mut status_row = widget::row()
            .push(widget::text::body(status_text))
            .push(widget::horizontal_space().width(Length::Fill))
            .push(widget::text::caption(fl!(
                "camera-index",
                index = self.reader.device_index() + 1
            )))
            .spacing(spacing.space_s)
            .align_y(Alignment::Center);

        if self.reader.torch_on() {
            status_row = status_row.push(widget::text::caption(fl!("torch-on")));
        }

        if self.status == ScanStatus::Stopped {
            status_row = status_row.push(
                widget::button::suggested(fl!("restart-scanning"))
                    .on_press(Message::RestartScanning),
            );
        }

        widget::column()
            .push(
                widget::container(viewfinder)
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .push(widget::container(status_row).padding([spacing.space_xxs, spacing.space_s]))
            .into()
    }
}
