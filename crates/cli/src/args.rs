// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI surface (§6): `kit [-h|--help] [-v|--version] [-f|--file <path>]
//! [-W] [TASK...]`.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CONFIG_FILE: &str = "tasks.yaml";

/// `<crate version>+<short git hash>`, mirroring `oj-daemon`'s
/// `PROTOCOL_VERSION` pattern (`build.rs` stamps `BUILD_GIT_HASH`).
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

#[derive(Parser, Debug)]
#[command(
    name = "kit",
    version = VERSION,
    disable_version_flag = true,
    about = "kit - bring an application stack up with a single command"
)]
pub struct Cli {
    /// Path to the task specification file.
    #[arg(short = 'f', long = "file", default_value = DEFAULT_CONFIG_FILE, value_name = "PATH")]
    pub file: PathBuf,

    /// Disable the filesystem watcher regardless of the environment.
    #[arg(short = 'W')]
    pub no_watch: bool,

    /// Root task names to bring up; defaults to `up` when omitted.
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,
}

/// Build the `clap::Command`, attaching a custom `-v`/`--version` flag
/// (clap's built-in version flag is `-V`; §6 asks for `-v`).
pub fn cli_command() -> clap::Command {
    use clap::CommandFactory;
    Cli::command().arg(
        clap::Arg::new("version")
            .short('v')
            .long("version")
            .action(clap::ArgAction::Version)
            .help("Print version"),
    )
}
