use std::process::ExitCode;

use chrono::Local;

use command_center_lib::services::dashboard;
use command_center_lib::state;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match state::load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let now = Local::now();
    match dashboard::run(&config, now) {
        Ok(snapshot) => {
            for line in dashboard::summary_lines(&snapshot, now) {
                println!("{}", line);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Dashboard run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
