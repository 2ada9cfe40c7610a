use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ditwav::pipeline::DEFAULT_MAX_PHRASE_LEN;
use ditwav::{encode_files, read_phrase, EncodeOptions, MorseError, ToneGenerator};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    encode: EncodeArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Generate dot and dash reference tones
    Tones(TonesArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// Reference tone played for a dot
    #[arg(long, value_name = "WAV_FILE", default_value = "dot.wav")]
    dot: PathBuf,

    /// Reference tone played for a dash
    #[arg(long, value_name = "WAV_FILE", default_value = "dash.wav")]
    dash: PathBuf,

    /// Where to write the Morse audio
    #[arg(short, long, value_name = "WAV_FILE", default_value = "morse.wav")]
    output: PathBuf,

    /// Phrase to encode; read from stdin when omitted
    #[arg(short, long)]
    phrase: Option<String>,

    /// Longest phrase accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PHRASE_LEN)]
    max_length: usize,

    /// Fail on characters that have no Morse pattern instead of skipping them
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct TonesArgs {
    #[arg(long, value_name = "WAV_FILE", default_value = "dot.wav")]
    dot: PathBuf,

    #[arg(long, value_name = "WAV_FILE", default_value = "dash.wav")]
    dash: PathBuf,

    #[arg(long, default_value_t = 44100)]
    sample_rate: u32,

    /// Tone frequency in Hz
    #[arg(long, default_value_t = 600.0)]
    frequency: f32,

    /// Words per minute, sets the dot length
    #[arg(long, default_value_t = 20.0)]
    wpm: f32,
}

fn main() -> Result<()> {
    // Set up logging. Use `RUST_LOG=info` or `RUST_LOG=debug` to see output.
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Tones(args)) => generate_tones(args),
        None => encode(cli.encode),
    }
}

fn encode(args: EncodeArgs) -> Result<()> {
    let options = EncodeOptions {
        dot_path: args.dot,
        dash_path: args.dash,
        output_path: args.output,
        max_phrase_len: args.max_length,
        strict: args.strict,
    };

    let phrase = args.phrase;
    let max_len = options.max_phrase_len;
    let encoded = encode_files(&options, || match phrase {
        Some(phrase) => Ok(phrase),
        None => {
            print!("Enter phrase: ");
            io::stdout()
                .flush()
                .map_err(|e| MorseError::io("<stdout>", e))?;
            read_phrase(&mut io::stdin().lock(), max_len)
        }
    })
    .context("Failed to encode phrase")?;

    println!("{}", encoded.morse);
    Ok(())
}

fn generate_tones(args: TonesArgs) -> Result<()> {
    log::info!(
        "Generating {} Hz tones at {} wpm, {} Hz sample rate",
        args.frequency,
        args.wpm,
        args.sample_rate
    );
    ToneGenerator::new(args.sample_rate, args.frequency, args.wpm)
        .write_reference_tones(&args.dot, &args.dash)
        .context("Failed to write reference tones")
}
