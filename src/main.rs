//! wavesplice - trim, cut and export recorded audio

use std::path::Path;
use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use wavesplice::audio::{self, AudioBuffer, Recorder};
use wavesplice::config::{Commands, SpliceArgs};
use wavesplice::edit::{self, Region, Selection, SpliceOp};
use wavesplice::{init_logging, Args, Config, ExportFormat, Exporter, FfmpegTranscoder};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::from_args_and_config(&args)?;

    if config.verbose {
        println!("{}", wavesplice::get_library_info());
        println!();
    }

    match &args.command {
        Commands::Info { input } => run_info(input),
        Commands::Trim(splice) => run_splice(&config, SpliceOp::Trim, splice),
        Commands::Remove(splice) => run_splice(&config, SpliceOp::Remove, splice),
        Commands::Split { input, at, output, after_output, format } => {
            run_split(&config, input, *at, output, after_output, format.as_deref())
        }
        Commands::Record { output, seconds, device, format } => {
            run_record(&config, output, *seconds, device.as_deref(), format.as_deref())
        }
        Commands::Export { input, output, format } => {
            let format = ExportFormat::resolve(format.as_deref(), output)?;
            let buffer = load(input)?;
            write_export(&config, &buffer, format, output)
        }
        Commands::InitConfig { path } => {
            Config::create_default_config(path)
                .with_context(|| format!("Cannot create config file {}", path.display()))?;
            println!("Default config written to {}", path.display());
            Ok(())
        }
    }
}

fn load(input: &Path) -> anyhow::Result<AudioBuffer> {
    audio::read_wav(input).with_context(|| format!("Failed to load {}", input.display()))
}

fn run_info(input: &Path) -> anyhow::Result<()> {
    let buffer = load(input)?;

    println!("File: {}", input.display());
    println!("Channels: {}", buffer.num_channels());
    println!("Sample rate: {} Hz", buffer.sample_rate());
    println!("Samples per channel: {}", buffer.length());
    println!("Duration: {:.3}s", buffer.duration());
    if let Ok(region) = edit::default_region(buffer.duration()) {
        println!("Default region: {}", region);
    }
    Ok(())
}

/// The region for a trim/remove: explicit bounds, playhead-to-end when only
/// `--start` is given, otherwise the default region.
fn select_region(splice: &SpliceArgs, duration: f64) -> anyhow::Result<Selection> {
    let mut selection = Selection::new();

    match (splice.start, splice.end) {
        (Some(start), Some(end)) => selection.insert(Region::new(start, end)?),
        (Some(start), None) => selection.insert(edit::split_region(start, duration)?),
        (None, Some(end)) => selection.insert(Region::new(0.0, end)?),
        (None, None) => selection.ensure_default(duration)?,
    }

    Ok(selection)
}

fn run_splice(config: &Config, op: SpliceOp, splice: &SpliceArgs) -> anyhow::Result<()> {
    // Reject unsupported formats before touching the input.
    let format = ExportFormat::resolve(splice.format.as_deref(), &splice.output)?;

    let buffer = load(&splice.input)?;
    let selection = select_region(splice, buffer.duration())?;
    let edited = edit::apply(&buffer, op, selection.active());

    if let Some(region) = selection.active() {
        println!("Region: {}", region);
    }
    println!(
        "{}: {} -> {} samples per channel",
        op, buffer.length(), edited.length()
    );

    write_export(config, &edited, format, &splice.output)
}

fn run_split(
    config: &Config,
    input: &Path,
    at: f64,
    output: &Path,
    after_output: &Path,
    format: Option<&str>,
) -> anyhow::Result<()> {
    let before_format = ExportFormat::resolve(format, output)?;
    let after_format = ExportFormat::resolve(format, after_output)?;

    let buffer = load(input)?;
    let (before, after) = edit::split(&buffer, at)?;

    // Encode both halves first so a transcoder failure writes nothing.
    let exporter = exporter(config);
    let before_bytes = exporter
        .export(&before, before_format)
        .with_context(|| format!("Failed to export {} to {}", before_format, output.display()))?;
    let after_bytes = exporter
        .export(&after, after_format)
        .with_context(|| format!("Failed to export {} to {}", after_format, after_output.display()))?;

    write_output(output, &before_bytes)?;
    if let Err(e) = write_output(after_output, &after_bytes) {
        if let Err(cleanup) = std::fs::remove_file(output) {
            log::warn!("Cannot remove {}: {}", output.display(), cleanup);
        }
        return Err(e);
    }

    println!("Split at {:.3}s", at);
    println!(
        "Before: {} ({}, {} samples, {} bytes)",
        output.display(), before_format.mime_type(), before.length(), before_bytes.len()
    );
    println!(
        "After: {} ({}, {} samples, {} bytes)",
        after_output.display(), after_format.mime_type(), after.length(), after_bytes.len()
    );
    Ok(())
}

fn run_record(
    config: &Config,
    output: &Path,
    seconds: f64,
    device: Option<&str>,
    format: Option<&str>,
) -> anyhow::Result<()> {
    let format = ExportFormat::resolve(format, output)?;
    if !seconds.is_finite() || seconds <= 0.0 {
        anyhow::bail!("Recording length must be a positive number of seconds: {}", seconds);
    }

    let mut recorder = match device {
        Some(name) => Recorder::with_device(name),
        None => Recorder::new(),
    };
    recorder.start()?;
    println!("Recording for {:.3}s...", seconds);
    std::thread::sleep(Duration::from_secs_f64(seconds));
    let buffer = recorder.stop()?;

    println!(
        "Recorded: {} channels, {} Hz, {:.3}s",
        buffer.num_channels(), buffer.sample_rate(), buffer.duration()
    );
    write_export(config, &buffer, format, output)
}

fn exporter(config: &Config) -> Exporter {
    Exporter::new(
        config.layout(),
        Box::new(FfmpegTranscoder::from_config(&config.export)),
    )
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    wavesplice::export::write_output(path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn write_export(config: &Config, buffer: &AudioBuffer, format: ExportFormat, output: &Path) -> anyhow::Result<()> {
    let written = exporter(config)
        .export_to_file(buffer, format, output)
        .with_context(|| format!("Failed to export {} to {}", format, output.display()))?;

    println!("Output: {} ({}, {} bytes)", output.display(), format.mime_type(), written);
    Ok(())
}
