use std::{io, process::ExitCode, str};

use bwt::BurrowsWheeler;
use clap::{ArgAction, Parser, Subcommand};
use rle_tools::{
    fixture::{format_byte_notation, parse_byte_notation, split_pairs},
    Direction, Fixture, Mode,
};
use runlength::DigitRunCodec;
use tokio::io::{stdin, stdout, AsyncReadExt, AsyncWriteExt};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct CLI {
    /// More logging, repeat for even more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run-length encode standard input
    Encode {
        #[arg(short, long, default_value_t = Mode::Byte)]
        mode: Mode,
        /// Output fixture notation instead of the raw stream
        #[arg(short, long)]
        notation: bool,
    },
    /// Decode run-length encoded standard input
    Decode {
        #[arg(short, long, default_value_t = Mode::Byte)]
        mode: Mode,
        /// Read fixture notation instead of the raw stream
        #[arg(short, long)]
        notation: bool,
    },
    /// Burrows-Wheeler transform of standard input
    Bwt {
        #[arg(short, long)]
        inverse: bool,
    },
    /// Check that a hand written fixture holds
    Fixture {
        #[arg(short, long)]
        mode: Mode,
        #[arg(short, long)]
        direction: Direction,
        input: String,
        expected_output: String,
    },
}

mod errors {
    use std::str;

    use tokio::io;

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("encode: {0}")]
        Encode(CommandError),
        #[error("decode: {0}")]
        Decode(CommandError),
        #[error("bwt: {0}")]
        Bwt(CommandError),
        #[error("fixture: {0}")]
        Fixture(CommandError),
    }

    #[derive(thiserror::Error, Debug)]
    pub enum CommandError {
        #[error(transparent)]
        Tools(#[from] rle_tools::Error),
        #[error(transparent)]
        Codec(#[from] runlength::Error),
        #[error(transparent)]
        Transform(#[from] bwt::Error),

        #[error("unable to parse as UTF-8: {0}")]
        InvalidUTF8Format(#[from] str::Utf8Error),
        #[error("read input: {0}")]
        ReadInput(io::Error),
        #[error("write output: {0}")]
        WriteOutput(io::Error),
    }
}

use errors::CommandError;

async fn read_input() -> Result<Vec<u8>, CommandError> {
    let mut input = Vec::new();
    stdin()
        .read_to_end(&mut input)
        .await
        .map_err(CommandError::ReadInput)?;
    debug!(len = input.len(), "input read");

    Ok(input)
}

async fn write_output(output: &[u8]) -> Result<(), CommandError> {
    let mut out = stdout();
    out.write_all(output)
        .await
        .map_err(CommandError::WriteOutput)?;
    out.flush().await.map_err(CommandError::WriteOutput)
}

// notation is typed by hand, ignore the final newline
fn trim_newline(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == '\n' || c == '\r')
}

async fn encode(mode: Mode, notation: bool) -> Result<(), CommandError> {
    let input = read_input().await?;
    let encoded = mode.encode(str::from_utf8(&input)?)?;

    let output = match (mode, notation) {
        (_, false) => encoded,
        (Mode::Byte, true) => format_byte_notation(encoded.as_slice())?.into_bytes(),
        (Mode::Digit, true) => split_pairs(str::from_utf8(&encoded)?)?
            .join(" ")
            .into_bytes(),
    };

    write_output(&output).await
}

async fn decode(mode: Mode, notation: bool) -> Result<(), CommandError> {
    let input = read_input().await?;

    let decoded = match (mode, notation) {
        (_, false) => mode.decode(&input)?,
        (Mode::Byte, true) => {
            let encoded = parse_byte_notation(trim_newline(str::from_utf8(&input)?))?;
            mode.decode(&encoded)?
        }
        (Mode::Digit, true) => {
            let pairs = str::from_utf8(&input)?
                .split_whitespace()
                .collect::<Vec<_>>();
            DigitRunCodec::decode_pairs(&pairs)?
        }
    };

    write_output(decoded.as_bytes()).await
}

async fn transform(inverse: bool) -> Result<(), CommandError> {
    let input = read_input().await?;
    let input = str::from_utf8(&input)?;

    let bwt = BurrowsWheeler::new();
    let output = if inverse {
        bwt.inverse(input)?
    } else {
        bwt.transform(input)?
    };

    write_output(output.as_bytes()).await
}

fn fixture(
    mode: Mode,
    direction: Direction,
    input: &str,
    expected_output: &str,
) -> Result<(), CommandError> {
    Fixture::from_notation(mode, direction, input, expected_output)?.verify()?;
    println!("{} {} fixture holds", mode, direction);

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("unable to setup logging: {}", e);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CLI::parse();
    init_logging(cli.verbose);

    let ret: Result<(), errors::Error> = match cli.command {
        Commands::Encode { mode, notation } => encode(mode, notation)
            .await
            .map_err(errors::Error::Encode),
        Commands::Decode { mode, notation } => decode(mode, notation)
            .await
            .map_err(errors::Error::Decode),
        Commands::Bwt { inverse } => transform(inverse).await.map_err(errors::Error::Bwt),
        Commands::Fixture {
            mode,
            direction,
            input,
            expected_output,
        } => fixture(mode, direction, &input, &expected_output).map_err(errors::Error::Fixture),
    };

    if let Err(e) = ret {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
