use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = ikcms_app::cli::command().get_matches();
    let mut stdout = std::io::stdout().lock();

    match ikcms_app::cli::run(&matches, &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
