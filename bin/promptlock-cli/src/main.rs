mod config;
mod demo;
mod error;

pub(crate) use error::CliError;

use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use config::Config;
use promptlock::{constants::LAMPORTS_PER_TOKEN, crypto::ServiceKey};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Cli {
    /// Path to the CLI config file
    #[clap(long, default_value = "./dev/local/Cli.toml")]
    pub config: PathBuf,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publish, buy, and open one piece of content on an in-process market
    Demo {
        /// Base64 encoded service key. Overrides the key file in the access
        /// server config.
        #[clap(long)]
        service_key: Option<String>,
        /// File to publish. A sample prompt is used if omitted.
        #[clap(long)]
        content: Option<PathBuf>,
        #[clap(long, default_value = "course_1")]
        content_id: String,
        #[clap(long, default_value = "Course one")]
        title: String,
        /// Price in lamports
        #[clap(long, default_value_t = LAMPORTS_PER_TOKEN)]
        price: u64,
    },
    /// Write a fresh access-server service key to a file
    GenerateServiceKey { output: PathBuf },
}

#[tokio::main]
pub async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Demo {
            service_key,
            content,
            content_id,
            title,
            price,
        } => {
            let service_key = service_key
                .map(|key| STANDARD.decode(key))
                .transpose()
                .map_err(CliError::InvalidServiceKey)?;
            let config = Config::from_file(&cli.config)?;
            let content = match content {
                Some(path) => {
                    std::fs::read(&path).map_err(|e| CliError::FileIo(e, path.clone()))?
                }
                None => demo::SAMPLE_PROMPT.as_bytes().to_vec(),
            };
            demo::run(
                &config,
                service_key,
                demo::Listing {
                    content,
                    content_id,
                    title,
                    price,
                },
            )
            .await
        }
        Command::GenerateServiceKey { output } => {
            let mut bytes = [0; ServiceKey::LENGTH];
            StdRng::from_entropy().fill_bytes(&mut bytes);
            let _ = ServiceKey::from_bytes(&bytes).map_err(promptlock::PromptLockError::from)?;
            std::fs::write(&output, bytes).map_err(|e| CliError::FileIo(e, output.clone()))?;
            println!("Wrote service key to {}", output.display());
            Ok(())
        }
    }
}
