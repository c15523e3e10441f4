use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use toon_savings::core::{CompactCodec, Storage, StructuredRecord};
use toon_savings::utils::logger;
use toon_savings::{LocalStorage, ToonCodec};

#[derive(Parser)]
#[command(name = "toon_codec")]
#[command(about = "Convert between JSON and TOON")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// JSON file to TOON
    Encode {
        #[arg(short, long)]
        input: String,
        #[arg(short, long, help = "Write to this file instead of stdout")]
        output: Option<String>,
    },
    /// TOON file to pretty-printed JSON
    Decode {
        #[arg(short, long)]
        input: String,
        #[arg(short, long, help = "Write to this file instead of stdout")]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let storage = LocalStorage::current_dir();
    let codec = ToonCodec::default();

    let (text, output) = match args.command {
        Command::Encode { input, output } => {
            let bytes = storage
                .read_file(&input)
                .await
                .with_context(|| format!("Failed to read {}", input))?;
            let record: StructuredRecord = serde_json::from_slice(&bytes)
                .with_context(|| format!("{} is not valid JSON", input))?;
            (codec.encode(&record)?, output)
        }
        Command::Decode { input, output } => {
            let bytes = storage
                .read_file(&input)
                .await
                .with_context(|| format!("Failed to read {}", input))?;
            let text = String::from_utf8(bytes).context("TOON input is not valid UTF-8")?;
            let record = codec.decode(&text)?;
            (serde_json::to_string_pretty(&record)?, output)
        }
    };

    match output {
        Some(path) => {
            storage
                .write_file(&path, text.as_bytes())
                .await
                .with_context(|| format!("Failed to write {}", path))?;
            tracing::info!("✅ Wrote {}", path);
        }
        None => println!("{}", text),
    }

    Ok(())
}
