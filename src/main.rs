//! stickerpack - Command-line tool for validating and exporting sticker packs

use std::process::ExitCode;

use stickerpack::cli;

fn main() -> ExitCode {
    cli::run()
}
