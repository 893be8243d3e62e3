mod demo;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clinav::core::config::{self, CliOverrides};
use clinav::{CrosstermConsole, FailurePolicy, NavError, Navigator, Presenter};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "clinav", about = "Console menu navigation demo")]
struct Args {
    /// Report status and duration after every command
    #[arg(long, overrides_with = "no_stats")]
    stats: bool,

    /// Turn statistics off even if the config or environment enables them
    #[arg(long, overrides_with = "stats")]
    no_stats: bool,

    /// What a failing command does to the session
    #[arg(long, value_enum)]
    failure_policy: Option<FailurePolicy>,

    /// Write logs here instead of the configured file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        let statistics = match (self.stats, self.no_stats) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CliOverrides {
            statistics,
            failure_policy: self.failure_policy,
            log_file: self.log_file.clone(),
        }
    }
}

/// Runs the demo menus; a session-ending error is shown to the user.
fn run(nav: &mut Navigator) -> Result<(), NavError> {
    nav.start::<demo::MainMenu>(&[]).inspect_err(|e| {
        log::error!("Session ended with error: {}", e);
        if nav.presenter().error_message(&e.to_string()).is_err() {
            eprintln!("Error: {e}");
        }
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Ignoring config file: {e}");
        config::ClinavConfig::default()
    });
    let resolved = config::resolve(&file_config, &args.overrides());

    // Initialize file logger - the terminal belongs to the menus
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!(
        "clinav starting (statistics: {}, failure policy: {:?})",
        resolved.statistics,
        resolved.failure_policy
    );

    let mut nav = Navigator::from_config(
        &resolved,
        Box::new(CrosstermConsole::new()),
        Box::new(CrosstermConsole::new()),
    );
    match run(&mut nav) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
