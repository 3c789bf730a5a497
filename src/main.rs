// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use viewfinder::app::AppModel;
use viewfinder::constants::ui;
use viewfinder::i18n;

mod cli;

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Code-scanning camera viewfinder for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print preview and outline geometry for a capture format
    Geometry {
        /// Capture format, e.g. 1280x720
        #[arg(short, long)]
        camera: String,

        /// Container size, e.g. 400x800
        #[arg(short, long)]
        bounds: String,

        /// Scan region as x,y,width,height fractions (default: whole preview)
        #[arg(short, long)]
        roi: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=viewfinder=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Geometry {
            camera,
            bounds,
            roi,
            json,
        }) => cli::print_geometry(&camera, &bounds, roi.as_deref(), json),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(ui::MIN_WINDOW_WIDTH)
            .min_height(ui::MIN_WINDOW_HEIGHT),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
