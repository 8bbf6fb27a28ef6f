// wmus - terminal music player
// Browse, search and queue a local music folder without leaving the shell

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use wmus::audio::{AudioConfig, AudioPlayer, MemoryMixer, Mixer, MonotonicClock};
use wmus::ui::App;
use wmus::{AppContext, Config, Player};

#[derive(Parser)]
#[command(name = "wmus", version)]
#[command(about = "Terminal music player for a local music folder")]
struct Args {
    /// Keep stderr attached (audio backend noise included)
    #[arg(long)]
    dev: bool,

    /// Use this config file instead of the per-user one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file, the terminal belongs to the UI
    let file_appender = tracing_appender::rolling::daily(log_dir, "wmus.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,wmus=debug"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

/// Send stderr to /dev/null so ALSA chatter can't scribble over the TUI.
fn redirect_stderr_to_null() -> Result<()> {
    unsafe {
        let null_fd = libc::open(b"/dev/null\0".as_ptr() as *const libc::c_char, libc::O_WRONLY);
        if null_fd == -1 {
            return Err(anyhow::anyhow!("Failed to open /dev/null"));
        }

        if libc::dup2(null_fd, libc::STDERR_FILENO) == -1 {
            libc::close(null_fd);
            return Err(anyhow::anyhow!("Failed to redirect stderr"));
        }
        libc::close(null_fd);
    }
    Ok(())
}

fn open_mixer(config: &Config) -> Box<dyn Mixer> {
    let audio_config = AudioConfig {
        volume: config.volume,
        ..AudioConfig::default()
    };
    match AudioPlayer::new(audio_config) {
        Ok(player) => Box::new(player),
        Err(e) => {
            warn!("No audio output ({}), continuing silent", e);
            Box::new(MemoryMixer::new())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let ctx = AppContext::from_user_dirs(args.config);
    let _log_guard = init_logging(&ctx.log_dir)?;
    info!("wmus {} starting", env!("CARGO_PKG_VERSION"));

    if !args.dev {
        debug!("Redirecting stderr to suppress audio backend output");
        if let Err(e) = redirect_stderr_to_null() {
            warn!("{}", e);
        }
    }

    let config = Config::load_from(&ctx.config_path);
    debug!("Config loaded from {}", ctx.config_path.display());

    let mixer = open_mixer(&config);
    let mut player = Player::new(ctx, config, mixer, Box::new(MonotonicClock::new()));
    let tracks = player.load_library();
    info!("Library ready with {} tracks", tracks);

    let mut app = App::new(player)?;
    app.run().await?;

    info!("wmus shutting down");
    Ok(())
}
