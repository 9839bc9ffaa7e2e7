use std::process::ExitCode;

fn main() -> ExitCode {
    match search_dash::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sdash: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
