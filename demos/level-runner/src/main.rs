//! Headless level runner: load a level, step it at a fixed rate, log where
//! everything ends up.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tilerun::{Camera, DirSource, LevelConfig, LevelError, LevelLoader, RenderBuffer, Timer};

mod entities;

#[derive(Parser)]
#[command(name = "level-runner")]
#[command(author, version, about = "Step a tilerun level without a window")]
struct Cli {
    /// Level name, loaded from <ASSETS>/levels/<LEVEL>.json
    #[arg(default_value = "1-1")]
    level: String,

    /// Asset directory holding levels/ and sprites/
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 5.0)]
    seconds: f32,

    /// Frame time fed to the fixed-step timer, in milliseconds
    #[arg(short, long, default_value_t = 16.7)]
    frame_ms: f32,

    /// Override the level gravity
    #[arg(short, long)]
    gravity: Option<f32>,
}

fn run(cli: &Cli) -> Result<(), LevelError> {
    let mut config = LevelConfig::default();
    if let Some(gravity) = cli.gravity {
        config.gravity = gravity;
    }

    let loader = LevelLoader::new(DirSource::new(&cli.assets), entities::factory()).with_config(config);
    let mut level = loader.load(&cli.level)?;

    let camera = Camera::new(256.0, 240.0);
    let mut buffer = RenderBuffer::new();
    let mut timer = Timer::default();
    // Non-positive frame times would never advance the level.
    let frame_dt = cli.frame_ms.max(1.0) / 1000.0;
    let mut next_report = 1.0;

    while level.total_time < cli.seconds {
        timer.advance(frame_dt, |dt| level.update(dt))?;

        if level.total_time >= next_report {
            next_report += 1.0;
            level.draw(&camera, &mut buffer);
            log::info!(
                "t={:.2}s: {} instances in {} layers",
                level.total_time,
                buffer.instance_count(),
                buffer.batches.len()
            );
            for entity in level.entities() {
                log::info!(
                    "  {:<8} pos=({:7.2}, {:7.2}) vel=({:7.2}, {:7.2})",
                    entity.tag,
                    entity.pos.x,
                    entity.pos.y,
                    entity.vel.x,
                    entity.vel.y
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
