use std::env;
use std::process::ExitCode;

use tracing::error;

mod app;

fn main() -> ExitCode {
    let options = match app::parse_args(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            println!("{}", app::usage_text());
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{}", app::usage_text());
            return ExitCode::from(2);
        }
    };

    match app::build_app(options) {
        Ok(wiring) => app::run(wiring),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
