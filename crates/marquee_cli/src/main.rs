//! Marquee simulator
//!
//! Runs a marquee headlessly against a sample headline feed and prints where
//! every slot sits as time passes.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use marquee_core::{Point, Rect};
use marquee_platform::TouchEvent;
use marquee_widget::{Direction, ItemSlot, MarqueeConfig, MarqueeDelegate, MarqueeView};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "marquee-sim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a marquee headlessly and print slot frames", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Marquee config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scroll direction, overriding the config file
    #[arg(short, long, value_enum)]
    direction: Option<DirectionArg>,

    /// Number of items in the sample feed
    #[arg(short = 'n', long, default_value = "6")]
    items: usize,

    /// Simulated time in seconds
    #[arg(short, long, default_value = "10")]
    seconds: f32,

    /// Simulated frame rate
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Widget width
    #[arg(long, default_value = "320")]
    width: f32,

    /// Widget height
    #[arg(long, default_value = "40")]
    height: f32,

    /// Seconds between printed samples
    #[arg(long, default_value = "1")]
    sample: f32,

    /// Tap at `x,y` halfway through the run
    #[arg(long, value_parser = parse_point)]
    tap: Option<Point>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Up,
    Left,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Left => Direction::Left,
        }
    }
}

const TITLES: &[&str] = &[
    "Markets open higher",
    "Storm warning for the coast",
    "Local team wins final",
    "New bridge opens downtown",
    "Rates unchanged",
    "Festival dates announced",
    "Rail strike called off",
    "Museum reopens after renovation",
];

/// Sample feed: headline labels sized by their length
struct Headlines {
    titles: Vec<String>,
    taps: Vec<usize>,
}

impl Headlines {
    fn new(count: usize) -> Self {
        let titles = (0..count)
            .map(|i| format!("{}. {}", i + 1, TITLES[i % TITLES.len()]))
            .collect();
        Self {
            titles,
            taps: Vec::new(),
        }
    }

    fn title(&self, index: usize) -> &str {
        self.titles.get(index).map(String::as_str).unwrap_or("")
    }
}

impl MarqueeDelegate for Headlines {
    fn number_of_items(&self) -> usize {
        self.titles.len()
    }

    fn create_item(&mut self, slot: &mut ItemSlot) {
        slot.surface_mut().set_content(String::new());
    }

    fn update_item(&mut self, slot: &mut ItemSlot, index: usize) {
        let title = self.title(index).to_string();
        match slot.surface_mut().content_mut::<String>() {
            Some(label) => *label = title,
            None => slot.surface_mut().set_content(title),
        }
    }

    fn item_width(&self, index: usize) -> Option<f32> {
        Some(self.title(index).chars().count() as f32 * 8.0 + 16.0)
    }

    fn item_height(&self, index: usize) -> Option<f32> {
        Some(24.0 + (index % 3) as f32 * 8.0)
    }

    fn did_touch_item(&mut self, index: usize) {
        info!("Tapped item {}: {}", index, self.title(index));
        self.taps.push(index);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if cli.fps == 0 {
        anyhow::bail!("--fps must be greater than zero");
    }
    if !cli.seconds.is_finite() || cli.seconds < 0.0 {
        anyhow::bail!("--seconds must be a finite value >= 0");
    }
    if !cli.sample.is_finite() || cli.sample <= 0.0 {
        anyhow::bail!("--sample must be greater than zero");
    }

    let mut config = match &cli.config {
        Some(path) => MarqueeConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => MarqueeConfig::default(),
    };
    if let Some(direction) = cli.direction {
        config.direction = direction.into();
    }

    let feed = Rc::new(RefCell::new(Headlines::new(cli.items)));
    let bounds = Rect::new(0.0, 0.0, cli.width, cli.height);

    info!(
        "Simulating {:?} marquee with {} items in {}x{} for {}s",
        config.direction, cli.items, cli.width, cli.height, cli.seconds
    );

    let mut view = MarqueeView::with_config(bounds, config);
    view.set_delegate(&feed);
    view.reload_data();
    view.start();

    if let Some(fault) = view.fault() {
        warn!("Marquee did not start: {}", fault);
    }

    simulate(&mut view, &cli);

    let taps = feed.borrow().taps.clone();
    if !taps.is_empty() {
        info!("Taps reported: {:?}", taps);
    }
    Ok(())
}

fn simulate(view: &mut MarqueeView, cli: &Cli) {
    let fps = cli.fps as f32;
    let dt = Duration::from_secs_f32(1.0 / fps);
    let frames = (cli.seconds * fps).round() as u64;
    let sample_every = ((cli.sample * fps).round() as u64).max(1);
    let tap_frame = frames / 2;

    for frame in 0..=frames {
        if frame > 0 {
            view.advance(dt);
        }

        if frame == tap_frame {
            if let Some(point) = cli.tap {
                tap(view, point);
            }
        }

        if frame % sample_every == 0 || frame == frames {
            print_sample(view, frame as f32 / fps);
        }
    }
}

fn tap(view: &mut MarqueeView, point: Point) {
    info!("Tap at ({}, {})", point.x, point.y);
    view.handle_touch(&TouchEvent::Started {
        id: 1,
        x: point.x,
        y: point.y,
    });
    view.handle_touch(&TouchEvent::Ended {
        id: 1,
        x: point.x,
        y: point.y,
    });
}

fn print_sample(view: &MarqueeView, time: f32) {
    let state = view.state();
    println!(
        "t={:>6.2}s  index={}  offset={:?}  {:?}",
        time, state.index, state.offset, state.phase
    );
    for slot in view.slots() {
        let frame = slot.frame();
        let label = slot
            .surface()
            .content::<String>()
            .map(String::as_str)
            .unwrap_or("");
        println!(
            "    [{}] x={:>8.2} y={:>8.2} w={:>6.1} h={:>5.1}  {}",
            slot.data_index().map_or("-".to_string(), |i| i.to_string()),
            frame.x(),
            frame.y(),
            frame.width(),
            frame.height(),
            label
        );
    }
}

fn parse_point(value: &str) -> std::result::Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{}`", value))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    Ok(Point::new(x, y))
}
