use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mailsub_core::{
    config::Config, provider::ProviderKind, provider_factory::ProviderRegistry,
    record::SubscriberRecord,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "mailsub: add subscribers to hosted mailing lists",
    long_about = None
)]
struct Cli {
    /// Config file (JSON or TOML)
    #[arg(short, long, default_value = "mailsub.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one subscriber to the configured list of a provider
    Add {
        #[arg(long, help = "mailchimp or klaviyo")]
        provider: ProviderKind,
        #[arg(long)]
        email: String,
        /// Custom field as key=value; value parsed as JSON when possible
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// List the providers the config file wires up
    Providers,
}

fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if k.is_empty() {
        return Err(format!("empty field name in '{s}'"));
    }
    let value = serde_json::from_str(v).unwrap_or_else(|_| Value::String(v.to_string()));
    Ok((k.to_string(), value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = Config::from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let reg = ProviderRegistry::from_config(&cfg)?;

    match cli.command {
        Commands::Add {
            provider,
            email,
            fields,
        } => {
            let provider = reg.require(provider)?;
            let record = fields
                .into_iter()
                .fold(SubscriberRecord::new(email), |rec, (k, v)| rec.with_field(k, v));
            let resp = provider.add_subscriber(record).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Commands::Providers => {
            for name in reg.names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
