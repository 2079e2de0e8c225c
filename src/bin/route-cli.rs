use std::path::PathBuf;
use std::process::ExitCode;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use path_router::config::load_config;
use path_router::routing::{Outcome, RequestInfo, RouteTable};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Offline tools for path-router route files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a route file, then list its routes
    Check {
        config: PathBuf,
    },
    /// Route one request against a route file and print the outcome
    Match {
        config: PathBuf,
        method: String,
        /// Request path, optionally with a `?query` string
        path: String,
        /// Extra request header as `name:value`, repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Check { config } => {
            let config = load_config(&config)?;
            let table = RouteTable::from_config(&config.routes)?;
            Ok(json!({
                "valid": true,
                "bind_address": config.listener.bind_address,
                "routes": table.route_names(),
                "patterns": table.cache().len(),
            }))
        }
        Commands::Match {
            config,
            method,
            path,
            headers,
        } => {
            let config = load_config(&config)?;
            let table = RouteTable::from_config(&config.routes)?;

            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let (path, query) = path.split_once('?').unwrap_or((path.as_str(), ""));
            let mut request = RequestInfo::new(method, path).with_query(query);
            for header in &headers {
                let (name, value) = header
                    .split_once(':')
                    .ok_or_else(|| format!("header `{}` is not `name:value`", header))?;
                request = request.with_header(name.trim(), value.trim());
            }

            Ok(match table.route(&request)? {
                Outcome::Matched(response) => json!({
                    "matched": true,
                    "response": response,
                }),
                Outcome::Exhausted => json!({ "matched": false }),
            })
        }
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}
