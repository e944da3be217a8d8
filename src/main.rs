use std::process::ExitCode;

fn main() -> ExitCode {
    match ocr_synth::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
