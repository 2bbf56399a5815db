//! Hand gesture control: replays tracked hand landmarks through the gesture
//! classifier and dispatches the resulting actions.

use anyhow::{Context, Result};
use clap::Parser;
use hand_gesture_control::{
    actions::LogSink,
    app::GestureApp,
    config::Config,
    gesture::ControlMode,
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines landmark file to replay ("-" or omitted reads stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Control mode at startup (mouse, scroll, presentation, custom)
    #[arg(short, long)]
    mode: Option<ControlMode>,

    /// Start a calibration session before the first frame
    #[arg(long, value_name = "LABEL", num_args = 0..=1, default_missing_value = "default")]
    calibrate: Option<String>,

    /// Calibration file, overriding the configured one
    #[arg(long)]
    calibration_file: Option<PathBuf>,

    /// List control modes and exit
    #[arg(long)]
    list_modes: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn init_logging(config: &Config, debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { config.logging.level.as_str() };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::new().default_filter_or(level));

    if let Some(path) = &config.logging.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.list_modes {
        for mode in ControlMode::ALL {
            println!("{mode}");
        }
        return Ok(());
    }

    // Load configuration if provided
    let (mut config, load_error) = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(format!("{}: {e}", path.display()))),
        },
        None => (Config::default(), None),
    };

    if let Some(path) = args.calibration_file {
        config.calibration.file = path;
    }
    if let Some(mode) = args.mode {
        config.default_mode = mode;
    }

    if args.print_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    init_logging(&config, args.debug)?;
    info!("Hand Gesture Control v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        warn!("Failed to load config file {e}. Using defaults.");
    }

    config.validate().context("Invalid configuration")?;

    let mut app = GestureApp::new(config, Box::new(LogSink))?;

    let token = app.cancellation_token();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        warn!("Failed to install Ctrl-C handler: {e}");
    }

    if let Some(label) = &args.calibrate {
        app.start_calibration(label);
    }

    let summary = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => app.run_file(path)?,
        _ => {
            info!("Reading frames from stdin");
            app.run(std::io::stdin().lock())?
        }
    };

    info!("Session statistics:\n{}", summary.session);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
