// SPDX-License-Identifier: MPL-2.0

//! Demo application hosting the viewfinder
//!
//! The viewfinder runs over a simulated scan source so the component can be
//! exercised without camera hardware.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `settings`: Settings drawer UI
//! - `update`: Message handling
//! - `view`: Main view rendering

mod settings;
mod state;
mod update;
mod view;

use crate::config::Config;
use crate::fl;
use crate::reader::{ScanSource, SimulatedReader};
use crate::viewfinder::ViewfinderView;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::{Subscription, event, window};
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message, ScanStatus};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

const REPOSITORY: &str = "https://github.com/cosmic-utils/viewfinder";
const APP_ICON: &[u8] = include_bytes!(
    "../../resources/icons/hicolor/scalable/apps/io.github.cosmic_utils.viewfinder.svg"
);

impl AppModel {
    /// Replace the viewfinder and its scan source with fresh ones built from the config
    ///
    /// Bounds and orientation carry over so the new viewfinder lays out
    /// immediately. Dropping the old pair detaches the viewfinder and stops
    /// the old capture session.
    pub(crate) fn rebuild_viewfinder(&mut self) {
        let reader = Arc::new(SimulatedReader::new(self.config.simulation_settings()));
        let source: Arc<dyn ScanSource> = reader.clone();

        let mut viewfinder = ViewfinderView::new();
        if let Err(err) = viewfinder.setup_components(self.config.builder(source)) {
            error!(%err, "Failed to set up viewfinder");
        }
        viewfinder.set_bounds(self.viewfinder.bounds());
        viewfinder.set_needs_update_orientation(self.viewfinder.device_orientation());

        self.viewfinder = viewfinder;
        self.reader = reader;
        self.session += 1;
        self.status = state::ScanStatus::Waiting;

        info!(session = self.session, "Viewfinder rebuilt");
        self.reader.start_scanning();
    }
}

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic_utils.viewfinder";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        let theme_dropdown_options = vec![fl!("match-desktop"), fl!("dark"), fl!("light")];

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            reader: Arc::new(SimulatedReader::default()),
            viewfinder: ViewfinderView::new(),
            session: 0,
            status: ScanStatus::default(),
            theme_dropdown_options,
        };
        app.rebuild_viewfinder();

        let theme_task = cosmic::command::set_theme(app.config.app_theme.theme());
        (app, theme_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use futures::SinkExt;

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // Marshal scan source events onto the update loop. The id carries the
        // session so a rebuilt viewfinder gets a fresh drain.
        let reader_sub = match self.viewfinder.lifecycle_events() {
            Some(events) => Subscription::run_with_id(
                ("reader-events", self.session),
                cosmic::iced::stream::channel(100, move |mut output| async move {
                    debug!("Reader event subscription started");
                    let mut events = events.lock().await;

                    while let Some(event) = events.recv().await {
                        if output.send(Message::Reader(event)).await.is_err() {
                            warn!("Failed to forward reader event - channel closed");
                            break;
                        }
                    }

                    debug!("Reader event subscription ended");
                }),
            ),
            None => Subscription::none(),
        };

        // Window aspect stands in for device orientation; only observed while
        // the viewfinder is attached
        let orientation_sub = if self.viewfinder.is_observing_orientation() {
            event::listen_with(|event, _status, _window_id| match event {
                event::Event::Window(window::Event::Resized(size)) => {
                    Some(Message::WindowResized(size))
                }
                _ => None,
            })
        } else {
            Subscription::none()
        };

        Subscription::batch([config_sub, reader_sub, orientation_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        let task = self.update(message);
        // The view is redrawn after every update anyway; clear pending requests
        if self.viewfinder.take_needs_display() {
            trace!("Viewfinder redraw requested");
        }
        task
    }
}
