use anyhow::{bail, Context, Result};
use clap::Parser;
use reelsync_core::action::EditorAction;
use reelsync_core::types::VideoSegment;
use reelsync_playback::config::PlaybackConfig;
use reelsync_playback::session::EditorSession;
use reelsync_preview::{MpvBackend, WindowGeometry};
use std::path::PathBuf;
use std::time::Instant;

/// Preview a cut of clips laid end to end in an mpv window
#[derive(Parser, Debug)]
#[command(name = "reelsync-play")]
#[command(version, about, long_about = None)]
struct Args {
    /// Playback tunables as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the timeline export to this file (`-` for stdout)
    #[arg(long)]
    export: Option<String>,

    /// Preview window placement
    #[arg(long, default_value = "960x540+0+0")]
    geometry: WindowGeometry,

    /// Clips in timeline order, as PATH=SECONDS
    #[arg(required = true, value_parser = parse_clip)]
    clips: Vec<Clip>,
}

#[derive(Debug, Clone, PartialEq)]
struct Clip {
    path: String,
    duration: f64,
}

fn parse_clip(arg: &str) -> Result<Clip, String> {
    let (path, seconds) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=SECONDS, got {arg:?}"))?;
    let duration: f64 = seconds
        .parse()
        .map_err(|_| format!("invalid duration in {arg:?}"))?;
    if !(duration.is_finite() && duration > 0.0) {
        return Err(format!("clip duration must be positive: {arg:?}"));
    }
    Ok(Clip {
        path: path.to_string(),
        duration,
    })
}

fn check_dependencies() -> Result<()> {
    let found = std::process::Command::new("mpv")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok();

    if !found {
        eprintln!("\n=== reelsync: Missing required dependencies ===\n");
        eprintln!("  ✗ mpv -- preview playback");
        eprintln!("    Install: sudo apt install mpv\n");
        bail!("mpv not found on PATH");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    check_dependencies()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PlaybackConfig::load_from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => PlaybackConfig::default(),
    };

    let mut session = EditorSession::new(MpvBackend::default(), config.clone());
    session
        .attach(&args.geometry)
        .context("failed to open preview window")?;

    for clip in &args.clips {
        session.dispatch(EditorAction::AddSegment(VideoSegment::new(clip.path.as_str(), clip.duration)));
    }
    tracing::info!(
        segments = session.state().timeline.segments.len(),
        duration = session.state().timeline.duration,
        "timeline ready"
    );

    match args.export.as_deref() {
        Some("-") => println!("{}", serde_json::to_string_pretty(&session.export())?),
        Some(path) => {
            let written = session.export().save_to_file(path)?;
            tracing::info!(path = %written.display(), "timeline exported");
        }
        None => {}
    }

    session.dispatch(EditorAction::Play);

    let mut frames = tokio::time::interval(config.frame_interval());
    let mut polls = tokio::time::interval(config.poll_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                session.on_frame(Instant::now());
            }
            _ = polls.tick() => {
                session.poll_player(Instant::now());
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
        }

        let state = session.state();
        if !state.is_playing && state.current_time == 0.0 && !session.coordinator().has_pending_frame() {
            tracing::info!("playback finished");
            break;
        }
    }

    session.dispose();
    Ok(())
}
