use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Dist(args) => super::dist::run(args),
        Command::Extract(args) => super::extract::run(args),
        Command::Init(args) => super::init::run(args),
        Command::Show(args) => super::show::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
