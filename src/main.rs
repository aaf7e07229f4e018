use std::process::ExitCode;

fn main() -> ExitCode {
    match condition_engine::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
