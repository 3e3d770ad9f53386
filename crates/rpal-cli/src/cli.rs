//! Command definition and argument extraction.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

/// Build the `rpal` command.
pub fn build_cli() -> Command {
    Command::new("rpal")
        .about("Interpreter for the RPAL functional language")
        .override_usage("rpal [-l] [-ast] [-st] <FILE>")
        .arg(
            Arg::new("listing")
                .short('l')
                .action(ArgAction::SetTrue)
                .help("Echo the source before running"),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .action(ArgAction::SetTrue)
                .help("Print the abstract syntax tree and exit"),
        )
        .arg(
            Arg::new("st")
                .long("st")
                .action(ArgAction::SetTrue)
                .help("Print the standardized tree and exit"),
        )
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("RPAL source file"),
        )
}

/// The historical interface spells its long flags with a single dash
/// (`-ast`, `-st`); rewrite those to the conventional form before clap
/// sees them.
pub fn normalize_args(args: impl Iterator<Item = OsString>) -> Vec<OsString> {
    args.map(|arg| match arg.to_str() {
        Some("-ast") => OsString::from("--ast"),
        Some("-st") => OsString::from("--st"),
        _ => arg,
    })
    .collect()
}

/// Extracted run parameters.
pub struct RunParams {
    pub listing: bool,
    pub ast: bool,
    pub st: bool,
    pub file: PathBuf,
}

impl RunParams {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            listing: matches.get_flag("listing"),
            ast: matches.get_flag("ast"),
            st: matches.get_flag("st"),
            file: matches
                .get_one::<PathBuf>("file")
                .expect("FILE is required")
                .clone(),
        }
    }
}
