mod config;
mod logging;
mod wav_source;

use std::io::Write;

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use radlink_core::logging::{Level, SignalLogger};
use radlink_core::{CancelToken, Receiver};

use crate::logging::{OutputFormat, StructuredLogger};
use crate::wav_source::WavIqSource;

#[derive(Debug, Parser)]
#[command(name = "radlink", about = "Receiver for a RoboMaster-style radar telemetry link")]
struct Cli {
    /// Path to the TOML configuration document.
    #[arg(short, long)]
    config: String,

    /// IQ WAV file to read samples from, overriding `cli.wav_path`.
    #[arg(short, long)]
    wav: Option<String>,

    /// Override the configured log output format.
    #[arg(long, value_enum)]
    log_format: Option<OutputFormat>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let document = config::load(&cli.config)
        .wrap_err_with(|| format!("loading configuration from {}", cli.config))?;
    document
        .channel
        .validate()
        .map_err(|e| eyre!("invalid configuration: {e}"))?;

    let log_format = cli.log_format.unwrap_or(document.cli.log_format);
    let structured = StructuredLogger::new(log_format);

    let wav_path = cli
        .wav
        .or(document.cli.wav_path.clone())
        .ok_or_else(|| eyre!("no WAV source given: pass --wav or set cli.wav_path"))?;

    structured.info("startup", format!("loading IQ samples from {wav_path}"));

    let channel_set = document
        .channel
        .frequencies
        .channel_offsets(&document.channel.game_settings, &document.channel.processing);
    structured.info(
        "startup",
        format!(
            "tuned to {} Hz across {} channel(s)",
            channel_set.center_freq_hz,
            channel_set.slots.len()
        ),
    );

    let signal_logger = SignalLogger::new(Box::new(StderrSink), Level::Warn);
    let mut receiver = Receiver::new(&document.channel, &channel_set, signal_logger);

    let mut source = WavIqSource::new(wav_path, document.channel.processing.buffer_size);

    // A WAV-backed source is finite by construction, so the acquisition
    // loop always ends on its own; cancellation matters once a live
    // hardware source is wired in.
    let cancel = CancelToken::new();

    let decoded = receiver
        .run(&mut source, &cancel)
        .wrap_err("acquisition loop failed")?;

    structured.info("shutdown", format!("decoded {} record(s)", decoded.len()));
    for record in decoded {
        structured.info(
            "decode",
            format!("{:?} cmd={:#06x} {:?}", record.channel_tag, record.cmd_id, record.record),
        );
    }

    Ok(())
}

/// Writes diagnostic lines from the core crate's `SignalLogger` straight to
/// stderr; the CLI's own `StructuredLogger` handles everything user-facing.
struct StderrSink;

impl Write for StderrSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::stderr().write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}

