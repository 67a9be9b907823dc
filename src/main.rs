use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use pixelveil::{OutputFormat, PixelVeil};

/// Pixelveil - chaotic image cipher and keyed steganography
///
/// Scrambles images into noise recoverable only with the right passphrase,
/// or hides text messages inside a carrier image's pixels.
#[derive(Parser)]
#[command(name = "pixelveil")]
#[command(version)]
#[command(about = "Chaotic image cipher and keyed LSB steganography", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scramble an image into visual noise
    Encrypt {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path (.png or .jpg; JPEG destroys recoverability)
        #[arg(short, long)]
        output: PathBuf,

        /// Passphrase keying the transform
        #[arg(short, long)]
        secret: String,

        /// Cap the larger image side before scrambling
        #[arg(long)]
        max_side: Option<u32>,
    },
    /// Recover a scrambled image with the same passphrase
    Decrypt {
        /// Scrambled image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path (.png or .jpg)
        #[arg(short, long)]
        output: PathBuf,

        /// Passphrase used when scrambling
        #[arg(short, long)]
        secret: String,

        /// Cap the larger side of the recovered output
        #[arg(long)]
        max_side: Option<u32>,
    },
    /// Hide a text message inside a carrier image
    Hide {
        /// Carrier image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output stego image path (always written as PNG)
        #[arg(short, long)]
        output: PathBuf,

        /// Message text
        #[arg(short, long, conflicts_with = "file")]
        message: Option<String>,

        /// Read the message from a file instead
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Passphrase keying the embedding positions
        #[arg(short, long)]
        secret: String,

        /// Cap the larger carrier side before embedding
        #[arg(long)]
        max_side: Option<u32>,
    },
    /// Recover a hidden message from a stego image
    Reveal {
        /// Stego image path
        #[arg(short, long)]
        input: PathBuf,

        /// Write the message to a file instead of printing it
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,

        /// Passphrase used when hiding
        #[arg(short, long)]
        secret: String,
    },
    /// Show carrier capacity information
    Info {
        /// Image file path
        #[arg(short, long)]
        image: PathBuf,

        /// Capacity after capping the larger side
        #[arg(long)]
        max_side: Option<u32>,
    },
}

fn format_from_path(path: &Path) -> anyhow::Result<OutputFormat> {
    let ext = path
        .extension()
        .ok_or_else(|| anyhow::anyhow!("output file must have an extension (e.g. .png)"))?
        .to_string_lossy()
        .to_lowercase();
    ext.parse::<OutputFormat>()
        .map_err(|_| anyhow::anyhow!("unsupported output format '.{ext}' (use .png or .jpg)"))
}

/// The stego pipeline always emits PNG; any lossy recompression would
/// destroy the hidden bits, so reject misleading output names outright.
fn validate_stego_output(path: &Path) -> anyhow::Result<()> {
    match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
        Some(ext) if ext == "png" => Ok(()),
        Some(ext) => Err(anyhow::anyhow!(
            "stego output is PNG; rename '{}' to end in .png (got .{ext})",
            path.display()
        )),
        None => Err(anyhow::anyhow!("output file must end in .png")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encrypt {
            input,
            output,
            secret,
            max_side,
        } => {
            let format = format_from_path(&output)?;
            if !format.is_lossless() {
                eprintln!(
                    "[!] Warning: JPEG is lossy; a scrambled image saved as JPEG cannot be recovered"
                );
            }

            println!("[*] Loading image: {}", input.display());
            let bytes = fs::read(&input)?;

            let engine = PixelVeil::new(&secret)?;
            println!("[*] Scrambling...");
            let noise = engine.encrypt_image(&bytes, max_side, format)?;

            fs::write(&output, noise)?;
            println!("[✓] Scrambled image written to {}", output.display());
        }

        Commands::Decrypt {
            input,
            output,
            secret,
            max_side,
        } => {
            let format = format_from_path(&output)?;

            println!("[*] Loading image: {}", input.display());
            let bytes = fs::read(&input)?;

            let engine = PixelVeil::new(&secret)?;
            println!("[*] Recovering...");
            let restored = engine.decrypt_image(&bytes, max_side, format)?;

            fs::write(&output, restored)?;
            println!("[✓] Recovered image written to {}", output.display());
            println!("[!] Note: a wrong passphrase produces noise, not an error");
        }

        Commands::Hide {
            input,
            output,
            message,
            file,
            secret,
            max_side,
        } => {
            validate_stego_output(&output)?;

            let message = if let Some(text) = message {
                text
            } else if let Some(path) = file {
                println!("[*] Reading message from {}", path.display());
                fs::read_to_string(path)?
            } else {
                return Err(anyhow::anyhow!("provide either --message or --file"));
            };

            println!("[*] Loading carrier: {}", input.display());
            let bytes = fs::read(&input)?;

            let capacity = pixelveil::message_capacity(&bytes, max_side)?;
            println!(
                "[*] Message: {} bytes, carrier capacity: {} bytes",
                message.len(),
                capacity
            );

            let engine = PixelVeil::new(&secret)?;
            println!("[*] Embedding...");
            let marked = engine.embed_message(&bytes, &message, max_side)?;

            fs::write(&output, marked)?;
            println!("[✓] Stego image written to {}", output.display());
        }

        Commands::Reveal {
            input,
            output,
            secret,
        } => {
            println!("[*] Loading stego image: {}", input.display());
            let bytes = fs::read(&input)?;

            let engine = PixelVeil::new(&secret)?;
            println!("[*] Extracting...");
            let message = engine.extract_message(&bytes, None)?;
            println!("[✓] Extracted {} bytes", message.len());

            if let Some(path) = output {
                fs::write(&path, &message)?;
                println!("[✓] Message saved to {}", path.display());
            } else {
                println!("--- message ---");
                println!("{message}");
            }
        }

        Commands::Info { image, max_side } => {
            println!("[*] Analyzing {}", image.display());
            let bytes = fs::read(&image)?;
            let capacity = pixelveil::message_capacity(&bytes, max_side)?;

            println!("[✓] Carrier capacity: {capacity} bytes");
            if let Some(bound) = max_side {
                println!("    (with the larger side capped at {bound})");
            }
        }
    }

    Ok(())
}
