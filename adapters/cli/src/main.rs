#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Circle Dash experience.

mod config;
mod headless;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};
use circle_dash_rendering::{palette, PlayAreaPresentation, Presentation, RenderingBackend, Scene};
use circle_dash_rendering_macroquad::MacroquadBackend;
use circle_dash_system_controls::Config as ControlsConfig;
use circle_dash_system_layout::Config as LayoutConfig;
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use self::{
    config::{FileConfig, Overrides, Settings},
    session::Session,
};

/// Click the numbered circles in order before their countdowns run out.
#[derive(Debug, Parser)]
#[command(name = "circle-dash", version, about)]
struct CliArgs {
    /// Point count prefilled into the input field (required with --headless).
    #[arg(long, value_name = "N")]
    points: Option<u32>,
    /// Seed for circle placement; a random seed is drawn when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Play area width in pixels.
    #[arg(long)]
    width: Option<f32>,
    /// Play area height in pixels.
    #[arg(long)]
    height: Option<f32>,
    /// Largest point count the input field accepts.
    #[arg(long, value_name = "N")]
    max_points: Option<u32>,
    /// TOML file providing defaults for any of these options.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Auto-play one game without opening a window and print the outcome.
    #[arg(long)]
    headless: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
    /// Log filter directive, e.g. `info` or `circle_dash_world=debug`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            points: self.points,
            seed: self.seed,
            width: self.width,
            height: self.height,
            max_points: self.max_points,
            vsync: self.vsync,
            log_level: self.log_level.clone(),
        }
    }
}

/// Installs the global tracing subscriber, preferring an explicit directive over `RUST_LOG`.
fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::builder()
            .with_default_directive(tracing::Level::INFO.into())
            .from_env_lossy(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Entry point for the Circle Dash command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(args.overrides(), file, rand::random)?;
    init_logging(settings.log_level.as_deref())?;

    if args.headless {
        let outcome = headless::run(&settings)?;
        println!("{outcome}");
        return Ok(());
    }

    info!(
        seed = settings.seed,
        width = settings.play_area.width(),
        height = settings.play_area.height(),
        "opening window"
    );

    let play_area = PlayAreaPresentation::new(
        settings.play_area.width(),
        settings.play_area.height(),
        palette::INK,
    )?;
    let presentation =
        Presentation::new("Circle Dash", palette::BACKGROUND, Scene::new(play_area));
    let mut session = Session::new(ControlsConfig::new(
        settings.play_area,
        settings.max_points,
        LayoutConfig::new(settings.seed),
    ));

    MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_point_text(settings.points.map(|points| points.to_string()).unwrap_or_default())
        .run(presentation, move |dt, input, scene| {
            session.handle_frame(dt, input, scene);
        })
        .context("failed to run macroquad backend")
}
