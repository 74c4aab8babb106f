use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    lambda_punter::init_logging();
    log::info!("===BEGIN===");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    let result = lambda_punter::driver::run(&mut input, &mut output);

    log::info!("=== END ===");
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
