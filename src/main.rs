use std::process::ExitCode;

use mesh_ngin::{flow, settings::Settings};

fn main() -> ExitCode {
    match flow::run(Settings::default()) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
