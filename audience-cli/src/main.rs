//! Entry point for the `audience` command-line interface.
#![forbid(unsafe_code)]

use audience_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    match audience_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("audience: {err}");
            std::process::exit(1);
        }
    }
}
