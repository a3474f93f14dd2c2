#[macro_use]
extern crate tracing;

use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;
use strum::VariantNames;
use tokio::runtime::Builder;
use validator::Validate;

use shimmer::canvas::{Canvas, Pixel};
use shimmer::device::Strip;
use shimmer::effects;
use shimmer::feeds::{self, CheerLightsFeed, QuantumFeed};
use shimmer::models::{Config, DisplayMode};
use shimmer::parade::Parade;
use shimmer::render::{self, RenderOptions};

/// Show various effects on an addressable LED strip.
#[derive(Debug, StructOpt)]
struct Opts {
    /// How the effects are displayed [default: CYCLE]
    #[structopt(
        short = "d",
        long,
        possible_values = DisplayMode::VARIANTS,
        case_insensitive = true
    )]
    parade: Option<DisplayMode>,
    /// How long to display each effect for, in seconds (1-180) [default: 10]
    #[structopt(short = "u", long)]
    duration: Option<u32>,
    /// How many times to run the effects before stopping (1-240) [default: 1]
    #[structopt(short, long)]
    repeat: Option<u32>,
    /// How bright the effects will be (1-10) [default: 8]
    #[structopt(short, long)]
    brightness: Option<u8>,
    /// Change the display orientation
    #[structopt(short, long)]
    invert: bool,
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u32,
    /// List the available effects and exit
    #[structopt(short, long)]
    list: bool,
    /// Configuration file with the strip definition
    #[structopt(short, long = "config")]
    config_path: Option<PathBuf>,
    /// Dump the effective configuration and exit
    #[structopt(long)]
    dump_config: bool,
    /// Effect names to restrict the parade to
    #[structopt(name = "EFFECT")]
    effects: Vec<String>,
}

async fn run(opts: Opts) -> color_eyre::eyre::Result<()> {
    // Load configuration and fold the command line on top
    let mut config = if let Some(config_path) = opts.config_path.as_deref() {
        Config::load_file(config_path).await?
    } else {
        Config::default()
    };

    if let Some(parade) = opts.parade {
        config.settings.parade = parade;
    }
    if let Some(duration) = opts.duration {
        config.settings.duration = duration;
    }
    if let Some(repeat) = opts.repeat {
        config.settings.repeat = repeat;
    }
    if let Some(brightness) = opts.brightness {
        config.settings.brightness = brightness;
    }
    if opts.invert {
        config.settings.invert = true;
    }
    if !opts.effects.is_empty() {
        config.settings.effects = opts.effects.clone();
    }

    config.validate()?;

    if opts.dump_config {
        print!("{}", config.to_string()?);
        return Ok(());
    }

    let settings = config.settings.clone();
    Pixel::set_default_brightness(settings.brightness);

    let client = feeds::http_client()?;
    let mut parade = Parade::new(effects::registry(
        Duration::from_secs(settings.duration as u64),
        Box::new(CheerLightsFeed::new(client.clone())),
        Box::new(QuantumFeed::new(client)),
    ));

    if opts.list {
        println!("Available Effects:");
        for (name, description) in parade.list_all() {
            println!("{} - {}", name, description);
        }
        return Ok(());
    }

    // Reject unknown effect names before any hardware I/O
    let unknown = parade.validate_names(&settings.effects);
    if !unknown.is_empty() {
        color_eyre::eyre::bail!("unknown effect names: {}", unknown.join(", "));
    }
    parade.select(settings.parade, &settings.effects);

    info!(
        parade = %settings.parade,
        duration = settings.duration,
        repeat = settings.repeat,
        brightness = settings.brightness,
        invert = settings.invert,
        effects = %if settings.effects.is_empty() {
            "ALL".to_owned()
        } else {
            settings.effects.join(", ")
        },
        "displaying effects"
    );

    let mut strip = Strip::new(&config.device)?;
    let mut canvas = Canvas::new(strip.led_count())?;
    let options = RenderOptions::from(&settings);

    render::run(&mut parade, &mut canvas, &mut strip, &options).await?;

    Ok(())
}

fn install_tracing(opts: &Opts) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fmt_layer = fmt::layer();

    let filter_layer = EnvFilter::try_from_env("SHIMMER_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match opts.verbose {
            0 => "shimmer=warn,shimmerd=warn",
            1 => "shimmer=info,shimmerd=info",
            2 => "shimmer=debug,shimmerd=debug",
            _ => "shimmer=trace,shimmerd=trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
}

#[paw::main]
fn main(opts: Opts) -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    install_tracing(&opts)?;

    // Create tokio runtime
    let thd_count = match num_cpus::get() {
        1 => 2,
        other => other.min(4),
    };

    let rt = Builder::new_multi_thread()
        .worker_threads(thd_count)
        .enable_all()
        .build()?;
    rt.block_on(run(opts))
}
