use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uncover_gateway::Config;
use uncover_gateway::api::ApiServerBuilder;
use uncover_gateway::client::{GatewayClient, InteractionLoop, LineTranscripts, TerminalRenderer};
use uncover_gateway::voice::{
    AudioPlayer, CommandPlayer, CommandSpeech, PlatformSpeech, PrimarySpeech, SpeechOutcome,
    SpeechOutputSelector, SpeechSynthesizer,
};

/// Uncover - Voice-driven self-discovery conversations
#[derive(Parser)]
#[command(name = "uncover", version, about)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the web client (overrides UNCOVER_STATIC_DIR)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Talk to a running gateway from the terminal, one line per utterance
    Chat {
        /// Gateway base URL
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Print replies without speaking them
        #[arg(long)]
        no_audio: bool,
        /// Pause before speaking each reply, in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,
    },
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! What would you like to uncover today?")]
        text: String,
        /// Write the MP3 here instead of playing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 => "info,uncover_gateway=info",
        1 => "info,uncover_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.static_dir {
        config.server.static_dir = dir;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::Chat {
            server,
            no_audio,
            delay_ms,
        } => chat(&server, no_audio, Duration::from_millis(delay_ms)).await,
        Command::TestTts { text, output } => test_tts(&config, &text, output).await,
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        port = config.server.port,
        static_dir = %config.server.static_dir.display(),
        model = %config.llm.model,
        "starting uncover gateway"
    );

    let server = ApiServerBuilder::new(config.server.port, config.orchestrator())
        .speech_synthesizer(config.speech_synthesizer())
        .static_dir(Some(config.server.static_dir.clone()))
        .build();

    server.run().await?;
    Ok(())
}

/// Terminal client against a running gateway
async fn chat(server: &str, no_audio: bool, delay: Duration) -> anyhow::Result<()> {
    let gateway = Arc::new(GatewayClient::new(server));

    let speech = if no_audio {
        SpeechOutputSelector::silent()
    } else {
        let synthesizer: Arc<dyn SpeechSynthesizer> = gateway.clone();
        speech_selector(Some(synthesizer))
    };

    println!("Connected to {}. Type what's on your mind; Ctrl-D to finish.\n", gateway.base_url());

    let mut session = InteractionLoop::new(
        LineTranscripts::stdin(),
        gateway,
        speech,
        Arc::new(TerminalRenderer),
    )
    .speak_delay(delay);

    let turns = session.run().await?;
    println!("\n{turns} turn(s), {} recorded", session.history().len());
    Ok(())
}

/// Test TTS output via ElevenLabs
async fn test_tts(config: &Config, text: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let synthesizer = config.speech_synthesizer().ok_or_else(|| {
        anyhow::anyhow!("TTS not configured; set ELEVENLABS_API_KEY and ELEVENLABS_VOICE_ID")
    })?;

    if let Some(path) = output {
        println!("Synthesizing speech...");
        let mp3_data = synthesizer.synthesize(text).await?;
        tokio::fs::write(&path, &mp3_data).await?;
        println!("Wrote {} bytes to {}", mp3_data.len(), path.display());
        return Ok(());
    }

    match speech_selector(Some(synthesizer)).speak(text).await {
        SpeechOutcome::Primary => println!("Played ElevenLabs audio"),
        SpeechOutcome::Fallback => println!("ElevenLabs audio failed; spoke with platform speech"),
        SpeechOutcome::Silent => anyhow::bail!("no audio could be produced"),
    }

    Ok(())
}

/// Hosted voice through a local player, platform speech behind it
fn speech_selector(synthesizer: Option<Arc<dyn SpeechSynthesizer>>) -> SpeechOutputSelector {
    let player = CommandPlayer::detect().map(|p| Arc::new(p) as Arc<dyn AudioPlayer>);
    if player.is_none() {
        tracing::warn!("no audio player found (mpv, ffplay, afplay, mpg123)");
    }

    let primary = synthesizer
        .zip(player)
        .map(|(synthesizer, player)| PrimarySpeech::new(synthesizer, player));

    let platform = CommandSpeech::detect().map(|s| Arc::new(s) as Arc<dyn PlatformSpeech>);
    if platform.is_none() {
        tracing::debug!("no platform speech command found");
    }

    SpeechOutputSelector::new(primary, platform)
}
