use anyhow::{Context, Result};
use api_client::{ClientConfig, HttpClient, DEFAULT_BASE_URL};
use clap::Parser;
use serde_json::Value;

/// api - call the backend REST API from the command line
///
/// The reply is printed as pretty JSON. Statuses outside 200-299 exit
/// with an error.
///
/// Examples:
///   api get /gaming
///   api post /user '{"name":"alice"}'
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL prepended to every endpoint
    #[arg(
        long = "base-url",
        env = "API_URL",
        value_name = "URL",
        default_value = DEFAULT_BASE_URL,
        global = true
    )]
    base_url: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a GET request
    Get { endpoint: String },

    /// Send a POST request with a JSON body
    Post { endpoint: String, data: String },

    /// Send a PUT request with a JSON body
    Put { endpoint: String, data: String },

    /// Send a DELETE request
    Delete { endpoint: String },
}

fn parse_data(data: &str) -> Result<Value> {
    serde_json::from_str(data).context("request body is not valid JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = HttpClient::new(ClientConfig::new(&cli.base_url));

    let reply: Value = match &cli.command {
        Commands::Get { endpoint } => client.get(endpoint).await,
        Commands::Post { endpoint, data } => client.post(endpoint, &parse_data(data)?).await,
        Commands::Put { endpoint, data } => client.put(endpoint, &parse_data(data)?).await,
        Commands::Delete { endpoint } => client.delete(endpoint).await,
    }
    .with_context(|| format!("request to {} failed", client.config().base_url()))?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
