use std::process::ExitCode;

use route_optimizer::app;
use route_optimizer::error::ErrorResponse;

#[tokio::main]
async fn main() -> ExitCode {
    match app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let body = ErrorResponse::from(&e);
            let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| e.to_string());
            eprintln!("{text}");
            ExitCode::FAILURE
        }
    }
}
