//! LED strip animation runner
//!
//! Picks a strip backend and one animation from the command line and plays
//! it, once or on repeat until Ctrl+C.
//!
//! ## Architecture
//! - **Strip**: chosen at startup (`virtual` works anywhere, `matrix` needs
//!   the `hardware` feature and a Raspberry Pi)
//! - **Animation**: runs on the main thread, blocking between frames
//! - **Ctrl+C**: with `--repeat`, `snake` or `random-fade` it flips a shared
//!   flag those loops check; otherwise the default SIGINT exit applies
//!
//! ## Usage
//! ```sh
//! led-strip-animations --leds 60 --preview scanner --color 255,0,0
//! led-strip-animations --record rainbow.png rainbow --delay 0
//! sudo led-strip-animations --backend matrix --repeat meteor
//! ```

use clap::{Parser, Subcommand};
use led_strip_animations::animations::{
    self, AlternatingParams, MeteorParams, ScannerParams, SnakeParams,
};
use led_strip_animations::preview::{TerminalPreview, save_timeline};
use led_strip_animations::{
    Backend, Color, PanelConfig, Strip, StripConfig, VirtualStrip, is_running, open_strip,
    setup_signal_handler,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Play LED strip animations on hardware or in the terminal
#[derive(Parser)]
#[command(name = "led-strip-animations")]
#[command(version)]
struct Args {
    /// Number of LEDs on the strip
    #[arg(long, default_value = "60")]
    leds: usize,

    /// Strip backend: virtual or matrix
    #[arg(long, default_value = "virtual")]
    backend: Backend,

    /// Only publish frames on show instead of after every write
    #[arg(long)]
    no_auto_write: bool,

    /// Rows of the LED matrix panel (matrix backend)
    #[arg(long, default_value = "64")]
    rows: u32,

    /// Columns of the LED matrix panel (matrix backend)
    #[arg(long, default_value = "64")]
    cols: u32,

    /// Draw every frame in the terminal (virtual backend)
    #[arg(long)]
    preview: bool,

    /// Save every shown frame as one row of a PNG (virtual backend)
    #[arg(long)]
    record: Option<PathBuf>,

    /// Pixel size of each LED in the recorded PNG
    #[arg(long, default_value = "4")]
    record_scale: u32,

    /// Replay the animation until Ctrl+C
    #[arg(long)]
    repeat: bool,

    /// Seed for the random animations, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    animation: Animation,
}

#[derive(Subcommand)]
enum Animation {
    /// Fade one color in and out
    Fade {
        #[arg(long, default_value = "255,0,0")]
        color: Color,
        #[arg(long, default_value_t = millis(animations::RGB_FADE_DELAY))]
        delay: u64,
    },
    /// Fade through red, green and red
    RgbFade {
        #[arg(long, default_value_t = millis(animations::RGB_FADE_DELAY))]
        delay: u64,
    },
    /// Flash the whole strip
    Strobe {
        #[arg(long, default_value = "255,255,255")]
        color: Color,
        #[arg(long, default_value = "10")]
        count: usize,
        #[arg(long, default_value_t = millis(animations::STROBE_DELAY))]
        delay: u64,
    },
    /// Bounce a lit block back and forth
    Scanner {
        #[arg(long, default_value = "255,0,0")]
        color: Color,
        #[arg(long, default_value = "4")]
        size: usize,
        #[arg(long, default_value = "10")]
        speed_delay: u64,
        #[arg(long, default_value = "50")]
        return_delay: u64,
    },
    /// Travelling sine wave of brightness
    RunningLights {
        #[arg(long, default_value = "255,0,0")]
        color: Color,
        #[arg(long, default_value_t = millis(animations::RUNNING_LIGHTS_DELAY))]
        delay: u64,
    },
    /// Light pixels one by one
    ColorWipe {
        #[arg(long, default_value = "0,255,0")]
        color: Color,
        #[arg(long, default_value_t = millis(animations::COLOR_WIPE_DELAY))]
        delay: u64,
    },
    /// Rotating rainbow
    Rainbow {
        #[arg(long, default_value_t = millis(animations::RAINBOW_CYCLE_DELAY))]
        delay: u64,
    },
    /// Meteor with a decaying trail
    Meteor {
        #[arg(long, default_value = "255,255,255")]
        color: Color,
        #[arg(long, default_value = "10")]
        size: usize,
        #[arg(long, default_value = "64")]
        decay: u8,
        /// Fade the trail evenly instead of randomly
        #[arg(long)]
        steady_decay: bool,
        #[arg(long, default_value = "30")]
        delay: u64,
    },
    /// Alternating blocks of two colors
    Alternating {
        #[arg(long, default_value = "255,0,0")]
        color_one: Color,
        #[arg(long, default_value = "0,0,255")]
        color_two: Color,
        #[arg(long, default_value = "3")]
        size: usize,
        #[arg(long, default_value = "500")]
        delay: u64,
    },
    /// Random sparkles that fade out
    RandomFade {
        #[arg(long, default_value = "255,255,255")]
        color: Color,
        #[arg(long, default_value = "64")]
        fade_value: u8,
        /// Number of sparkle frames per run
        #[arg(long, default_value = "200")]
        frames: usize,
        #[arg(long, default_value = "50")]
        delay: u64,
    },
    /// Snake game, runs until Ctrl+C
    Snake {
        #[arg(long, default_value = "0,255,0")]
        snake_color: Color,
        #[arg(long, default_value = "255,0,0")]
        food_color: Color,
        #[arg(long, default_value = "50")]
        speed: u64,
    },
}

impl Args {
    /// Whether anything in this run checks the stop flag. Only then is the
    /// Ctrl+C handler installed, so one-shot animations still exit at once.
    fn watches_stop_flag(&self) -> bool {
        self.repeat
            || matches!(
                self.animation,
                Animation::Snake { .. } | Animation::RandomFade { .. }
            )
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn millis(delay: Duration) -> u64 {
    delay.as_millis() as u64
}

fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the terminal preview.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("LED strip animations v{}", env!("CARGO_PKG_VERSION"));

    let running = if args.watches_stop_flag() {
        setup_signal_handler()?
    } else {
        Arc::new(AtomicBool::new(true))
    };
    let config = StripConfig::new(args.leds, !args.no_auto_write);
    let panel = PanelConfig::new(args.rows, args.cols);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match args.backend {
        Backend::Virtual => {
            let mut strip = VirtualStrip::new(config);
            if args.preview {
                strip = strip.with_sink(TerminalPreview::stdout());
            }
            if args.record.is_some() {
                strip = strip.with_history();
            }

            let result = play(&mut strip, &args.animation, args.repeat, &running, &mut rng);
            if args.preview {
                println!();
            }
            // Keep what was recorded even if the animation failed part way.
            if let Some(path) = &args.record {
                save_timeline(strip.history(), args.record_scale, path)?;
            }
            result?;
        }
        backend => {
            if args.preview || args.record.is_some() {
                tracing::warn!("--preview and --record only apply to the virtual backend");
            }
            let mut strip = open_strip(backend, config, panel)?;
            play(&mut *strip, &args.animation, args.repeat, &running, &mut rng)?;
        }
    }

    tracing::info!("Shutting down cleanly.");
    Ok(())
}

/// Run the selected animation once, or until Ctrl+C with `repeat`, then
/// blank the strip.
fn play(
    strip: &mut dyn Strip,
    animation: &Animation,
    repeat: bool,
    running: &AtomicBool,
    rng: &mut StdRng,
) -> led_strip_animations::Result<()> {
    loop {
        play_once(strip, animation, running, rng)?;
        if !repeat || !is_running(running) {
            break;
        }
    }

    strip.fill(Color::BLACK)?;
    strip.show()
}

fn play_once(
    strip: &mut dyn Strip,
    animation: &Animation,
    running: &AtomicBool,
    rng: &mut StdRng,
) -> led_strip_animations::Result<()> {
    match *animation {
        Animation::Fade { color, delay } => animations::fade_in_n_out(strip, color, ms(delay)),
        Animation::RgbFade { delay } => animations::rgb_fade(strip, ms(delay)),
        Animation::Strobe {
            color,
            count,
            delay,
        } => animations::strobe(strip, color, count, ms(delay)),
        Animation::Scanner {
            color,
            size,
            speed_delay,
            return_delay,
        } => animations::scanner(
            strip,
            &ScannerParams {
                color,
                size,
                speed_delay: ms(speed_delay),
                return_delay: ms(return_delay),
            },
        ),
        Animation::RunningLights { color, delay } => {
            animations::running_lights(strip, color, ms(delay))
        }
        Animation::ColorWipe { color, delay } => {
            strip.fill(Color::BLACK)?;
            animations::color_wipe(strip, color, ms(delay))
        }
        Animation::Rainbow { delay } => animations::rainbow_cycle(strip, ms(delay)),
        Animation::Meteor {
            color,
            size,
            decay,
            steady_decay,
            delay,
        } => animations::meteor_rain(
            strip,
            &MeteorParams {
                color,
                size,
                decay,
                random_decay: !steady_decay,
                delay: ms(delay),
            },
            rng,
        ),
        Animation::Alternating {
            color_one,
            color_two,
            size,
            delay,
        } => animations::alternating(
            strip,
            &AlternatingParams {
                color_one,
                color_two,
                size,
                delay: ms(delay),
            },
        ),
        Animation::RandomFade {
            color,
            fade_value,
            frames,
            delay,
        } => {
            for _ in 0..frames {
                if !is_running(running) {
                    break;
                }
                animations::random_fade(strip, color, fade_value, rng)?;
                thread::sleep(ms(delay));
            }
            Ok(())
        }
        Animation::Snake {
            snake_color,
            food_color,
            speed,
        } => animations::snake(
            strip,
            &SnakeParams {
                snake_color,
                food_color,
                snake_speed: ms(speed),
            },
            running,
            rng,
        ),
    }
}
