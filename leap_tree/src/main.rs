//! leap_tree — interactive entry point.

use std::process;

use clap::Parser;

use leap_tree::app::{run, AppConfig, SourceKind};
use tree_scene::{SceneConfig, Smoothing};

#[derive(Parser)]
#[command(name = "leap_tree")]
#[command(about = "Gesture-driven tree of ornaments, candies and photos", long_about = None)]
#[command(version)]
struct Cli {
    /// Landmark source [default: sim with a window, script when headless]
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Number of ornaments
    #[arg(long, default_value_t = SceneConfig::default().ornaments)]
    ornaments: usize,

    /// Number of candy canes
    #[arg(long, default_value_t = SceneConfig::default().candies)]
    candies: usize,

    /// Number of placeholder photos
    #[arg(long, default_value_t = SceneConfig::default().photos)]
    photos: usize,

    /// Number of dust points
    #[arg(long, default_value_t = SceneConfig::default().dust_points)]
    dust: usize,

    /// Scale smoothing by elapsed time, referenced to this refresh rate (Hz)
    #[arg(long, value_name = "HZ")]
    frame_rate_independent: Option<f32>,

    /// Run without a window, logging a status line now and then
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames [default: 900 when headless]
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for layout and focus selection
    #[arg(long)]
    seed: Option<u64>,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let mut cfg = AppConfig {
            scene: SceneConfig {
                ornaments:   self.ornaments,
                candies:     self.candies,
                photos:      self.photos,
                dust_points: self.dust,
            },
            source:   self.source,
            headless: self.headless,
            ticks:    self.ticks.or(self.headless.then_some(900)),
            seed:     self.seed,
            ..AppConfig::default()
        };
        if let Some(reference_hz) = self.frame_rate_independent {
            cfg.motion.smoothing_mode = Smoothing::FrameRateIndependent { reference_hz };
        }
        cfg
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { log::LevelFilter::Warn } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    #[cfg(feature = "leap")]
    log::info!("built with LeapMotion support");

    if let Err(e) = run(cli.into_config()) {
        log::error!("{}", e);
        process::exit(1);
    }
}
