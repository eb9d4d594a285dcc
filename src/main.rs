use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
mod auth;
mod telemetry;
use auth::KeyFormat;
use cryptastic::{Cryptastic, Encoding, HashAlgorithm, pbkdf2};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

#[derive(Debug, clap::Args)]
struct PayloadArgs {
    /// Read the payload from a file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Use base64 text framing for the envelope
    #[arg(short, long, default_value_t = false)]
    text: bool,

    /// Treat the payload as a JSON value instead of a plain string
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl PayloadArgs {
    fn encoding(&self) -> Encoding {
        if self.text {
            Encoding::Base64
        } else {
            Encoding::Binary
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match &self.input {
            Some(path) => std::fs::read(path)
                .with_context(|| format!("failed to read input file {}", path.display())),
            None => {
                let mut buf = Vec::new();
                io::stdin()
                    .read_to_end(&mut buf)
                    .context("failed to read payload from stdin")?;
                Ok(buf)
            }
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cryptastic")]
#[command(
    version,
    about = "Authenticated encryption of values and PBKDF2 key derivation."
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "CRYPTASTIC_LOG", default_value = "warn")]
    log_level: String,

    /// Interpret the key as hex instead of raw bytes
    #[arg(long, global = true, default_value_t = false)]
    hex_key: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a value into an envelope
    Encrypt {
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Verifies and decrypts an envelope
    Decrypt {
        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Derives key material with PBKDF2 and prints it as hex
    #[command(arg_required_else_help = true)]
    Derive {
        /// Salt, as UTF-8 text
        #[arg(long)]
        salt: String,

        /// Iteration count (>= 1)
        #[arg(long, default_value_t = 1000)]
        iterations: u32,

        /// Derived key length in bytes
        #[arg(long, default_value_t = 32)]
        length: usize,

        /// HMAC hash algorithm (sha1, sha224, sha256, sha384, sha512)
        #[arg(long, default_value = "sha256")]
        hash: HashAlgorithm,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    telemetry::init(&args.log_level)?;

    let key_format = if args.hex_key {
        KeyFormat::Hex
    } else {
        KeyFormat::Raw
    };
    let key = auth::read_key(key_format)?;
    let cryptastic = Cryptastic::new();

    match args.command {
        Commands::Encrypt { payload } => {
            let data = payload.read()?;
            info!(
                bytes = data.len(),
                text = payload.text,
                cipher = cryptastic.suite().cipher().name(),
                "encrypting payload"
            );

            let sealed = if payload.json {
                let value: serde_json::Value =
                    serde_json::from_slice(&data).context("payload is not valid JSON")?;
                cryptastic.encrypt_as(&value, &key, payload.encoding())
            } else {
                let value = String::from_utf8(data).context("payload is not valid UTF-8")?;
                cryptastic.encrypt_as(&value, &key, payload.encoding())
            };
            let output = sealed.context("encryption failed")?;

            let suite = cryptastic.suite();
            debug!(
                envelope_bytes = output.as_bytes().len(),
                iv_len = suite.iv_len(),
                tag_len = suite.tag_len(),
                "envelope sealed"
            );
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if payload.text {
                writeln!(stdout)?;
            }
        }
        Commands::Decrypt { payload } => {
            let data = payload.read()?;
            info!(bytes = data.len(), text = payload.text, "decrypting envelope");

            let mut stdout = io::stdout().lock();
            if payload.json {
                let value: serde_json::Value = cryptastic
                    .decrypt_as(&data, &key, payload.encoding())
                    .inspect_err(|e| warn!(error = %e, "envelope rejected"))
                    .context("decryption failed")?;
                writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?;
            } else {
                let text = cryptastic
                    .decrypt_as::<String>(&data, &key, payload.encoding())
                    .map(Zeroizing::new)
                    .inspect_err(|e| warn!(error = %e, "envelope rejected"))
                    .context("decryption failed")?;
                stdout.write_all(text.as_bytes())?;
            }
        }
        Commands::Derive {
            salt,
            iterations,
            length,
            hash,
        } => {
            info!(iterations, length, %hash, "deriving key");
            let derived = pbkdf2(&key, salt.as_bytes(), iterations, length, hash)
                .context("key derivation failed")?;
            println!("{}", hex::encode(derived.as_slice()));
        }
    }

    Ok(())
}
