#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = swipeup_replay::run_from_env() {
        tracing::error!(message = "replay.failed", error = %error, exit_code = error.exit_code());
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
