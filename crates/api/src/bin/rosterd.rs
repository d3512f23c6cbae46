#![forbid(unsafe_code)]

//! Newline-delimited JSON server on stdio: one `{"action": ..., "args": ...}`
//! request per line in, one response envelope per line out.

use rd_api::config::ServerConfig;
use rd_api::{RosterServer, dispatch_action, envelope_error};
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() -> std::process::ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("rosterd=info,rd_api=info,rd_storage=info")
        }))
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env();
    let mut server = match RosterServer::from_config(&config) {
        Ok(server) => server,
        Err(err) => {
            tracing::error!(error = %err, "failed to open store");
            return std::process::ExitCode::FAILURE;
        }
    };
    tracing::info!(storage_dir = %config.storage_dir.display(), "rosterd ready");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::error!(error = %err, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&mut server, &line);
        let mut out = stdout.lock();
        if writeln!(out, "{response}").and_then(|()| out.flush()).is_err() {
            break;
        }
    }
    std::process::ExitCode::SUCCESS
}

fn handle_line(server: &mut RosterServer, line: &str) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => {
            return envelope_error("INVALID_INPUT", &format!("request is not JSON: {err}"));
        }
    };
    let Some(action) = request.get("action").and_then(|v| v.as_str()) else {
        return envelope_error("INVALID_INPUT", "action is required");
    };
    let args = request
        .get("args")
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

    tracing::debug!(action, "dispatching");
    match dispatch_action(server, action, args) {
        Some(response) => response,
        None => envelope_error("UNKNOWN_ACTION", &format!("unknown action: {action}")),
    }
}
