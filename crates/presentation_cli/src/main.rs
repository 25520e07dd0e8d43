//! PepperVox CLI
//!
//! Operator front-end for the robot speech stack: one-shot speech, an
//! interactive REPL, and bridge diagnostics.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::sync::Arc;

use application::{ApplicationError, ProgressStage, SpeakOutcome, StatusPort};
use clap::{Parser, Subcommand};
use domain::Utterance;
use infrastructure::{AppConfig, SpeechStack, build_speech_stack};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// PepperVox CLI
#[derive(Parser)]
#[command(name = "peppervox")]
#[command(author, version, about = "PepperVox robot speech CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the configuration file (default: peppervox.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak one utterance and exit
    Say {
        /// Text to speak
        text: String,

        /// Emotion tag (happy, sad, excited, curious, surprised)
        #[arg(short, long)]
        emotion: Option<String>,

        /// Speaker volume 0-100, set before speaking
        #[arg(long)]
        volume: Option<u8>,
    },

    /// Interactive session: every line is spoken
    ///
    /// Slash commands: /status, /reset, /think, /quit
    Repl,

    /// Check the robot bridge end to end
    Probe,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Status sink printing pipeline progress to the terminal
#[derive(Debug, Default, Clone, Copy)]
struct CliStatus;

impl StatusPort for CliStatus {
    fn on_stage(&self, stage: ProgressStage) {
        match stage {
            ProgressStage::Generating => println!("  generating audio..."),
            ProgressStage::Transferring => println!("  transferring to robot..."),
            ProgressStage::Speaking => println!("  speaking"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(cli.verbose)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;
    let stack = build_speech_stack(&config, Arc::new(CliStatus))
        .map_err(|e| anyhow::anyhow!("failed to assemble speech stack: {e}"))?;

    match cli.command {
        Commands::Say {
            text,
            emotion,
            volume,
        } => {
            if let Some(volume) = volume {
                stack.robot.set_volume(volume).await?;
            }
            speak_or_fallback(&stack, &text, emotion.as_deref()).await?;
        },
        Commands::Repl => repl(&stack).await?,
        Commands::Probe => {
            stack.robot.probe().await?;
            println!("robot bridge is reachable");
        },
    }

    Ok(())
}

/// Speak through the tiered pipeline, degrading to the built-in voice on
/// total failure so the user never gets silence
async fn speak_or_fallback(
    stack: &SpeechStack,
    text: &str,
    emotion: Option<&str>,
) -> anyhow::Result<()> {
    let utterance = Utterance::with_label(text, emotion)?;

    match stack.speech.speak(&utterance).await {
        Ok(SpeakOutcome::Spoken { tier }) => {
            println!("spoken ({tier} tier)");
        },
        Ok(SpeakOutcome::SkippedBusy) => {
            println!("dropped: speakers are busy");
        },
        Err(
            e @ (ApplicationError::SynthesisExhausted
            | ApplicationError::TransportUnavailable(_)
            | ApplicationError::Playback(_)),
        ) => {
            warn!(error = %e, "Speech pipeline failed, degrading to the built-in voice");
            stack.fallback_voice.say(text).await?;
            println!("spoken (built-in voice, degraded)");
        },
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn repl(stack: &SpeechStack) -> anyhow::Result<()> {
    println!("PepperVox REPL - type text to speak it");
    println!("  /status  tier and visual state");
    println!("  /reset   clear rate-limit flags");
    println!("  /think   pulse the thinking indicator for a moment");
    println!("  /quit    exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut thinking = false;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {},
            "/quit" => break,
            "/reset" => {
                stack.speech.reset_rate_limits();
                println!("rate-limit flags cleared");
            },
            "/status" => {
                let tier = stack
                    .speech
                    .last_used_tier()
                    .map_or_else(|| "none yet".to_string(), |t| t.to_string());
                println!("last tier: {tier}");
                println!("visual state: {:?}", stack.presence.state().await);
            },
            "/think" => {
                thinking = !thinking;
                if thinking {
                    stack.presence.enter_thinking().await;
                    println!("thinking indicator on");
                } else {
                    stack.presence.exit_thinking().await;
                    println!("thinking indicator off");
                }
            },
            text => {
                // A held thinking indicator outranks the speaking color, so
                // release it before speaking, like the dialogue layer does
                if thinking {
                    stack.presence.exit_thinking().await;
                    thinking = false;
                }
                speak_or_fallback(stack, text, None).await?;
            },
        }
    }

    Ok(())
}
