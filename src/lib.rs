pub mod config;
pub mod core;
pub mod providers;
pub mod refresh;
pub mod resolve;
pub mod show;
pub mod store;
pub mod ui;

use anyhow::Result;

pub enum AppCommand {
    Refresh,
    Show,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    match command {
        AppCommand::Refresh => refresh::run(config_path).await,
        AppCommand::Show => show::run(config_path).await,
    }
}
