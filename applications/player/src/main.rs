//! Melody Player - plays server-controlled melodies on a buzzer
use clap::{Parser, Subcommand};
use melody_client::MelodyClient;
use melody_player::{shutdown_on, Coordinator, PlayerConfig};
use melody_playback::{ControlIntent, Volume};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "melody-player")]
#[command(about = "Plays melodies from a control server on a buzzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the control server and play what it says
    Run {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Control server URL, overriding the configuration
        #[arg(short, long)]
        server: Option<String>,
    },
    /// Play a song JSON file once, without a server
    PlayFile {
        /// Song file with `frequencies` and `durations` arrays
        path: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Send a control command to the server
    Control {
        #[command(subcommand)]
        command: ControlCommand,

        /// Control server URL, overriding the configuration
        #[arg(short, long, global = true)]
        server: Option<String>,
    },
    /// List the songs the server can serve
    Songs {
        /// Control server URL, overriding the configuration
        #[arg(short, long)]
        server: Option<String>,
    },
}

#[derive(Subcommand)]
enum ControlCommand {
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Restart the song from the first note
    Repeat,
    /// Set the volume (PWM duty, 0-65535)
    Volume { duty: u16 },
    /// Select a song by name
    Song { name: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "melody_player=info,melody_playback=info,melody_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, server } => {
            run(config, server).await?;
        }
        Commands::PlayFile { path, config } => {
            play_file(&path, config).await?;
        }
        Commands::Control { command, server } => {
            control(command, server).await?;
        }
        Commands::Songs { server } => {
            list_songs(server).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>, server: Option<String>) -> anyhow::Result<PlayerConfig> {
    Ok(PlayerConfig::resolve(path.as_deref(), server)?)
}

async fn run(config_path: Option<PathBuf>, server: Option<String>) -> anyhow::Result<()> {
    let config = load_config(config_path, server)?;

    tracing::info!("Starting Melody Player");
    tracing::info!("Server: {}", config.server.url);

    let coordinator = Coordinator::connect(&config)?;
    coordinator.run(shutdown_on(tokio::signal::ctrl_c())).await;
    Ok(())
}

async fn play_file(path: &Path, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path, None)?;
    let cancel = shutdown_on(tokio::signal::ctrl_c());

    if melody_player::play_file(path, &config, &cancel).await? {
        tracing::info!("Done");
    }
    Ok(())
}

async fn control(command: ControlCommand, server: Option<String>) -> anyhow::Result<()> {
    let client = client_for(server)?;

    match command {
        ControlCommand::Play => client.set_action(ControlIntent::Play).await?,
        ControlCommand::Pause => client.set_action(ControlIntent::Pause).await?,
        ControlCommand::Repeat => client.set_action(ControlIntent::Repeat).await?,
        ControlCommand::Volume { duty } => client.set_volume(Volume::new(duty)).await?,
        ControlCommand::Song { name } => client.set_song(&name).await?,
    }

    println!("OK");
    Ok(())
}

async fn list_songs(server: Option<String>) -> anyhow::Result<()> {
    let client = client_for(server)?;
    let songs = client.list_songs().await?;

    if songs.is_empty() {
        println!("No songs on server");
    } else {
        for name in songs {
            println!("{}", name);
        }
    }

    Ok(())
}

fn client_for(server: Option<String>) -> anyhow::Result<MelodyClient> {
    let config = load_config(None, server)?;
    Ok(MelodyClient::new(config.server_config())?)
}
