use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "assistant-cli")]
#[command(about = "Management CLI for the Assistant Proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token for proxies with inbound auth enabled.
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one chat message to an assistant
    Chat {
        assistant: String,
        message: String,
        /// Override the default model
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Retrieve context snippets for a query
    Search {
        assistant: String,
        query: String,
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },
    /// List all assistants in the project
    Assistants,
    /// Show metadata for one assistant
    Describe { assistant: String },
    /// List files attached to an assistant
    Files { assistant: String },
    /// Delete a file by id
    DeleteFile { assistant: String, file_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(token) = &cli.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
    }

    let body = match cli.command {
        Commands::Chat {
            assistant,
            message,
            model,
        } => {
            let mut data = json!({ "message": message });
            if let Some(model) = model {
                data["model"] = json!(model);
            }
            json!({ "action": "chat", "assistant_name": assistant, "data": data })
        }
        Commands::Search {
            assistant,
            query,
            top_k,
        } => {
            let mut data = json!({ "query": query });
            if let Some(top_k) = top_k {
                data["top_k"] = json!(top_k);
            }
            json!({ "action": "search", "assistant_name": assistant, "data": data })
        }
        Commands::Assistants => json!({ "action": "listAssistants" }),
        Commands::Describe { assistant } => {
            json!({ "action": "describeAssistant", "assistant_name": assistant })
        }
        Commands::Files { assistant } => {
            json!({ "action": "listFiles", "assistant_name": assistant })
        }
        Commands::DeleteFile { assistant, file_id } => json!({
            "action": "deleteFile",
            "assistant_name": assistant,
            "data": { "file_id": file_id }
        }),
    };

    let res = client
        .post(&cli.url)
        .headers(headers)
        .json(&body)
        .send()
        .await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
