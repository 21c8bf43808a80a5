//! Siren CLI: split a WAV mix into one WAV file per source.
//!
//! # Usage
//!
//! ```bash
//! siren split mix.wav -o stems/ --source drums --source bass
//! siren split mix.wav -o stems/ --source vocals,guitar --parallel --continue-on-error
//! siren info mix.wav
//! siren info mix.wav --json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use siren_format::{
    read_wav, Container, ContainerSummary, SizeFieldPolicy, SourceLabel, WavError, WavWriter,
};
use siren_separate::{create_isolator, FailurePolicy, SeparateError, SplitOptions, Splitter};

// ───────────────────────────── CLI definition ─────────────────────────────

/// Top-level CLI entry point for the `siren` binary.
#[derive(Parser)]
#[command(
    name = "siren",
    about = "Split a WAV mix into per-source WAV files",
    version,
    long_about = "Reads an uncompressed PCM WAV file, runs a source isolator once per\n\
                  requested source and writes each result as {source}.wav."
)]
struct Cli {
    /// Enable verbose (debug-level) logging. `RUST_LOG` takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available sub-commands.
#[derive(Subcommand)]
enum Commands {
    /// Split a WAV file into one WAV file per source.
    Split {
        /// Input .wav file path.
        input: PathBuf,

        /// Existing output directory for the per-source files.
        #[arg(short, long)]
        output: PathBuf,

        /// Sources to isolate (repeatable or comma-separated):
        /// bass, guitar, vocals, drums, synth, brass.
        #[arg(short, long = "source", required = true, value_delimiter = ',')]
        sources: Vec<String>,

        /// Accept source names outside the reference set.
        #[arg(long)]
        allow_custom: bool,

        /// Isolation backend.
        #[arg(long, default_value = "identity")]
        isolator: String,

        /// Keep processing the remaining sources after one fails.
        #[arg(long)]
        continue_on_error: bool,

        /// Process sources in parallel.
        #[arg(long)]
        parallel: bool,

        /// Worker threads for --parallel (defaults to one per core).
        #[arg(long, requires = "parallel")]
        threads: Option<usize>,

        /// Always recompute the RIFF and data size fields instead of
        /// carrying them over from the input.
        #[arg(long)]
        recompute_sizes: bool,
    },

    /// Display format information about a WAV file.
    Info {
        /// Input .wav file path.
        input: PathBuf,

        /// Output file information as JSON.
        #[arg(long)]
        json: bool,
    },
}

// ────────────────────────────── main ──────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set.
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Split {
            input,
            output,
            sources,
            allow_custom,
            isolator,
            continue_on_error,
            parallel,
            threads,
            recompute_sizes,
        } => {
            let options = SplitOptions {
                failure_policy: if continue_on_error {
                    FailurePolicy::Continue
                } else {
                    FailurePolicy::Abort
                },
                parallel,
            };
            let policy = if recompute_sizes {
                SizeFieldPolicy::Recompute
            } else {
                SizeFieldPolicy::Carry
            };
            if let Some(threads) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("Failed to initialize thread pool")?;
            }
            cmd_split(
                &input,
                &output,
                &sources,
                allow_custom,
                &isolator,
                options,
                policy,
            )
        }

        Commands::Info { input, json } => cmd_info(&input, json),
    }
}

// ──────────────────────────── split ──────────────────────────────

/// Decode `input` once, then write `{output}/{source}.wav` for every source.
fn cmd_split(
    input: &Path,
    output: &Path,
    sources: &[String],
    allow_custom: bool,
    isolator_name: &str,
    options: SplitOptions,
    policy: SizeFieldPolicy,
) -> Result<()> {
    check_wav_extension(input)?;
    if !output.is_dir() {
        return Err(WavError::OutputPathInvalid {
            path: output.to_path_buf(),
        })
        .with_context(|| format!("Output must be an existing directory: {}", output.display()));
    }
    let labels = resolve_labels(sources, allow_custom)?;
    let isolator = create_isolator(isolator_name)?;
    tracing::debug!(?labels, isolator = isolator.name(), ?options, ?policy, "Split configured");

    let container = read_wav(input)
        .with_context(|| format!("Failed to read WAV file: {}", input.display()))?;

    println!("\n  Siren Splitter");
    println!("  ============================================");
    println!("  Input:    {}", input.display());
    println!("  Output:   {}", output.display());
    println!(
        "  Sources:  {}",
        labels.iter().map(SourceLabel::as_str).collect::<Vec<_>>().join(", ")
    );
    println!("  Isolator: {}", isolator.name());
    println!("  Format:   {}", describe_format(&container));
    println!("  --------------------------------------------");

    let result = Splitter::new(&*isolator)
        .with_writer(WavWriter::with_policy(policy))
        .with_options(options)
        .split(&container, output, &labels);

    let report = match result {
        Ok(report) => report,
        Err(SeparateError::LabelFailed {
            label,
            source,
            written,
        }) => {
            for path in &written {
                println!("  Wrote:    {}", path.display());
            }
            println!("  Failed:   {} ({})", label, source);
            bail!(
                "Failed to split {}: source '{}' failed, kept {} file(s) already written",
                input.display(),
                label,
                written.len()
            );
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to split {}", input.display()));
        }
    };

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(path) => println!("  Wrote:    {}", path.display()),
            Err(e) => println!("  Failed:   {} ({})", outcome.label, e),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{} of {} source(s) failed", failed, labels.len());
    }

    println!("  --------------------------------------------");
    println!(
        "  Wrote {} file(s) to {}",
        report.written().count(),
        output.display()
    );
    println!("  Done!\n");

    Ok(())
}

// ───────────────────────────── info ───────────────────────────────

/// Everything `siren info --json` prints.
#[derive(Serialize)]
struct FileInfo {
    path: String,
    #[serde(flatten)]
    summary: ContainerSummary,
    data_size_mib: f64,
}

/// Display format information about a WAV file.
fn cmd_info(input: &Path, json: bool) -> Result<()> {
    check_wav_extension(input)?;
    let container = read_wav(input)
        .with_context(|| format!("Failed to read WAV file: {}", input.display()))?;

    let info = FileInfo {
        path: input.display().to_string(),
        summary: container.summary(),
        data_size_mib: container.data_size as f64 / MIB,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let format = &info.summary.format;
    println!("\n  Siren File Information");
    println!("  ============================================");
    println!("  File:        {}", info.path);
    println!(
        "  Format:      {} ({})",
        if format.is_pcm() { "PCM" } else { "non-PCM" },
        format.audio_format()
    );
    println!("  Sample rate: {} Hz", format.sample_rate());
    println!("  Bits:        {}", format.bits_per_sample());
    println!("  Bit rate:    {} bit/s", info.summary.bit_rate);
    println!(
        "  Data size:   {} bytes ({:.2} MiB)",
        info.summary.data_size, info.data_size_mib
    );
    println!("  Frames:      {}", info.summary.frame_count);
    println!("  Channels:    {}", format.channel_count());
    println!("  Duration:    {:.2}s", info.summary.duration_secs);
    println!();

    Ok(())
}

// ──────────────────────── helper functions ─────────────────────────

const MIB: f64 = 1024.0 * 1024.0;

fn check_wav_extension(path: &Path) -> Result<()> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
    if !is_wav {
        bail!("Input must be a .wav file: {}", path.display());
    }
    Ok(())
}

/// Parse source names, rejecting names outside the reference set unless
/// `allow_custom` is set. Duplicates are dropped, first occurrence wins.
fn resolve_labels(sources: &[String], allow_custom: bool) -> Result<Vec<SourceLabel>> {
    let mut labels: Vec<SourceLabel> = Vec::with_capacity(sources.len());
    for name in sources {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        // FromStr for SourceLabel is infallible.
        let label: SourceLabel = name.parse().unwrap_or_else(|e| match e {});
        if !label.is_reference() && !allow_custom {
            let known: Vec<&str> = SourceLabel::REFERENCE.iter().map(SourceLabel::as_str).collect();
            bail!(
                "Unknown source '{}'. Known sources: {} (use --allow-custom to accept others)",
                name,
                known.join(", ")
            );
        }
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    if labels.is_empty() {
        bail!("At least one --source is required");
    }
    Ok(labels)
}

fn describe_format(container: &Container) -> String {
    let format = &container.format;
    format!(
        "{} Hz, {}-bit, {}ch, {} frames, {:.2}s",
        format.sample_rate(),
        format.bits_per_sample(),
        format.channel_count(),
        container.frame_count(),
        container.duration_secs()
    )
}
