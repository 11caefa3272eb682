//! dexsprite - Command-line tool for generating game-ready monster sprites

use std::process::ExitCode;

use dexsprite::cli;

fn main() -> ExitCode {
    cli::run()
}
