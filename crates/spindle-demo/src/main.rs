use std::process::ExitCode;

use spindle_engine::core::SceneConfig;
use spindle_engine::device::GpuInit;
use spindle_engine::logging::{init_logging, LoggingConfig};
use spindle_engine::window::{Runtime, RuntimeConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());
    log::info!("starting spinning-triangle");

    match Runtime::run(RuntimeConfig::default(), GpuInit::default(), SceneConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
