mod app;
mod config;
mod credentials;
mod error;
mod format;
mod login;
mod paths;
mod table_page;
mod widgets;

use std::fs;
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use log::error;
use log::info;
use roster_lib::auth::MemoryTokenStore;
use roster_lib::auth::TokenStore;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::app::App;
use crate::config::AppConfig;
use crate::credentials::FileTokenStore;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_logging();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("API at {}", config.api_base_url);

    let store: Arc<dyn TokenStore> = match paths::token_file() {
        Some(path) => Arc::new(FileTokenStore::new(path, config.cookie.name.clone())),
        None => Arc::new(MemoryTokenStore::new()),
    };

    let result = match App::new(config, store) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_logging() {
    paths::rotate_logs();
    let file = paths::log_file()
        .and_then(|path| {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).ok()?;
            }
            File::create(path).ok()
        })
        .unwrap_or_else(|| File::create("roster-tui.log").expect("Failed to create log file"));
    WriteLogger::init(LevelFilter::Debug, Config::default(), file)
        .expect("Failed to initialize logger");
}
