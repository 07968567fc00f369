//! Shell completion scripts for the CLI.

use clap::{Command, ValueEnum};
use clap_complete::{generate, shells};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Write the completion script for `shell` to `out`
pub fn generate_completions(cmd: &mut Command, shell: Shell, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();

    match shell {
        Shell::Bash => generate(shells::Bash, cmd, bin_name, out),
        Shell::Zsh => generate(shells::Zsh, cmd, bin_name, out),
        Shell::Fish => generate(shells::Fish, cmd, bin_name, out),
    }
}
