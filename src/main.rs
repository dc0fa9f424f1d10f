use app_lib::config::ServerConfig;
use clap::Parser;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let config = ServerConfig::parse();
    match app_lib::run(config).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fanclub: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}
