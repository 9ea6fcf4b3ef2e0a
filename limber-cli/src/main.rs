mod frames;
mod ui;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use limber::config::SessionConfig;
use limber::landmarks::FrameReader;
use limber::logging;
use limber::session::{ExerciseSession, SessionRecorder, SessionSummary};

use crate::frames::FrameStream;

#[derive(Parser, Debug)]
#[command(version, about = "Limber - exercise repetition counter", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count repetitions live on a terminal dashboard
    Run {
        /// JSON-lines landmark stream, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
        #[arg(short, long)]
        fps: Option<u32>,
        #[arg(short, long)]
        reps: Option<u32>,
        /// Write logs here while the dashboard is up
        #[arg(long)]
        log_file: Option<PathBuf>,
        #[arg(short, long)]
        summary: Option<PathBuf>,
    },
    /// Count repetitions in a recorded landmark stream, without a UI
    Replay {
        #[arg(short, long, default_value = "-")]
        input: String,
        #[arg(short, long)]
        reps: Option<u32>,
        #[arg(short, long)]
        summary: Option<PathBuf>,
        /// Trace-level logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// List the exercises and how each one is counted
    Exercises,
}

fn apply_overrides(
    config: &mut SessionConfig,
    reps: Option<u32>,
    fps: Option<u32>,
) -> Result<()> {
    if let Some(reps) = reps {
        config.repetitions_per_exercise = reps;
    }
    if let Some(fps) = fps {
        config.frames_per_second = fps;
    }
    config.validate()?;
    Ok(())
}

fn init_replay_logging(verbose: bool, level: &str) -> Result<()> {
    if verbose {
        logging::set_debug_log_level();
    } else if !logging::set_log_level(level) {
        bail!("Unknown log level {}", level);
    }
    Ok(())
}

fn finish_summary(summary: &SessionSummary, path: Option<PathBuf>) -> Result<()> {
    print!("{}", summary);
    if let Some(path) = path {
        summary
            .write_json(&path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    }
    Ok(())
}

fn replay(input: &str, config: &SessionConfig, summary_path: Option<PathBuf>) -> Result<()> {
    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open landmark input {}", input))?;
        Box::new(BufReader::new(file))
    };

    let mut recorder = SessionRecorder::new(ExerciseSession::from_config(config)?);
    let mut frames = FrameReader::new(reader);

    for frame in frames.by_ref() {
        let snapshot = frame?;
        let exercise = recorder.session().display_name().unwrap_or("-");
        let event = recorder.process(snapshot.as_ref());
        if !event.is_no_change() {
            println!("{}: {}", exercise, event);
        }
        if recorder.session().is_complete() {
            break;
        }
    }

    log::info!("Replay stopped after line {}", frames.line_number());
    finish_summary(&recorder.finish(), summary_path)
}

fn list_exercises(config: &SessionConfig) {
    println!(
        "{} repetitions each, {}s countdown between exercises",
        config.repetitions_per_exercise, config.countdown_secs
    );
    for (idx, kind) in config.exercises.iter().enumerate() {
        let landmarks: Vec<&str> = kind.landmarks().iter().map(|lm| lm.as_str()).collect();
        println!("{}. {}", idx + 1, kind);
        println!("\treads: {}", landmarks.join(", "));
        println!("\tcounts: {}", kind.rule());
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    let mut config = SessionConfig::from_env()?;

    match args.command {
        Commands::Run {
            input,
            fps,
            reps,
            log_file,
            summary,
        } => {
            apply_overrides(&mut config, reps, fps)?;
            if let Some(path) = &log_file {
                let level = logging::parse_level(&config.log_level)
                    .ok_or_else(|| anyhow!("Unknown log level {}", config.log_level))?;
                logging::log_to_file(level, path)?;
            }

            let frames = FrameStream::open(&input).await?;
            let recorder = SessionRecorder::new(ExerciseSession::from_config(&config)?);

            let mut terminal = ratatui::init();
            let result =
                ui::run_dashboard(&mut terminal, frames, recorder, &config, ui::keyboard_quit)
                    .await;
            ratatui::restore();

            finish_summary(&result?, summary)
        }
        Commands::Replay {
            input,
            reps,
            summary,
            verbose,
        } => {
            apply_overrides(&mut config, reps, None)?;
            init_replay_logging(verbose, &config.log_level)?;

            tokio::task::spawn_blocking(move || replay(&input, &config, summary)).await?
        }
        Commands::Exercises => {
            list_exercises(&config);
            Ok(())
        }
    }
}
