mod cli;
mod run;


use cli::RunParams;

fn main() {
    let args = cli::normalize_args(std::env::args_os());
    let matches = cli::build_cli().get_matches_from(args);
    let params = RunParams::from_matches(&matches);
    std::process::exit(run::run(&params));
}
