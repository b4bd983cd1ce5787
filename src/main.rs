use backoffice::commands::Cli;
use backoffice::libs::messages::macros::is_debug_mode;
use backoffice::msg_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if is_debug_mode() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("backoffice=debug"));
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    }

    if let Err(e) = Cli::menu().await {
        msg_error!(format!("{:#}", e).trim_start_matches("❌ "));
        std::process::exit(1);
    }
}
