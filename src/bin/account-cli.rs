use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use url::Url;

#[derive(Parser)]
#[command(name = "account-cli")]
#[command(about = "Management CLI for the account service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Service health and circuit breaker state
    Health,
    /// List every account
    List,
    /// Show one account, with customer data when available
    Get { id: String },
    /// List the accounts of a customer
    ByCustomer { customer_id: String },
    /// Open an account
    Create {
        customer_id: String,
        account_type: String,
    },
    /// Change an account's type
    Update { id: String, account_type: String },
    /// Delete an account
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = Url::parse(&cli.url)?;

    let request = match cli.command {
        Commands::Health => client.get(endpoint(&base, &["health"])?),
        Commands::List => client.get(endpoint(&base, &["accounts"])?),
        Commands::Get { id } => client.get(endpoint(&base, &["accounts", id.as_str()])?),
        Commands::ByCustomer { customer_id } => {
            client.get(endpoint(&base, &["accounts", "customer", customer_id.as_str()])?)
        }
        Commands::Create {
            customer_id,
            account_type,
        } => client
            .post(endpoint(&base, &["accounts"])?)
            .json(&json!({ "customerId": customer_id, "accountType": account_type })),
        Commands::Update { id, account_type } => client
            .put(endpoint(&base, &["accounts", id.as_str()])?)
            .json(&json!({ "accountType": account_type })),
        Commands::Delete { id } => client.delete(endpoint(&base, &["accounts", id.as_str()])?),
    };

    print_response(request.send().await?).await
}

/// Append `segments` to the base URL, each encoded as one path segment.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("{} cannot be used as a base URL", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: account service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
