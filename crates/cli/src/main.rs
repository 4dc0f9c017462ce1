// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Spectacle binary entry point.

use std::io::IsTerminal;

use clap::Parser;

use spectacle::app::{execute, exit_codes};
use spectacle::cli::Cli;
use spectacle::output::use_color;
use spectacle::output_diagnostic::{print_error, set_debug};

fn main() {
    let cli = Cli::parse();
    set_debug(cli.debug);

    let stdout = std::io::stdout();
    let color = use_color(stdout.is_terminal());
    let code = match execute(&cli, &mut stdout.lock(), color) {
        Ok(code) => code,
        Err(e) => {
            print_error(e);
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}
