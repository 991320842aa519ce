//! Tool relay server
//!
//! Serves the registered tools over an SSE transport and answers
//! conversations through a function-calling model that reaches those tools
//! with a tool client.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /sse`, `POST /messages` | Tool transport |
//! | `POST /chat` | Conversation through the model bridge |
//! | `POST /upload-pdf` | Stamp text onto an uploaded PDF |
//! | `GET /health` | Liveness |

use clap::Parser;
use relay_server::run_server;

/// Command line interface of the tool relay
#[derive(Parser, Debug)]
#[command(name = "relay-server")]
#[command(about = "Tool relay - SSE tool server with a function-calling chat bridge")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Listen port, overriding configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run_server(cli.config.as_deref(), cli.port).await
}
