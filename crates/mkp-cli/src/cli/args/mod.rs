use clap::{Parser, Subcommand};

pub mod dist;
pub mod extract;
pub mod init;
pub mod show;
pub use dist::*;
pub use extract::*;
pub use init::*;
pub use show::*;

#[derive(Parser)]
#[command(
    name = "mkp",
    version,
    about = "Build, inspect and unpack .mkp plugin packages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a package from a source tree into dist/
    Dist(DistArgs),
    /// Unpack a package into a directory
    Extract(ExtractArgs),
    /// Create a package project skeleton in the current directory
    Init(InitArgs),
    /// Print the metadata of a package
    Show(ShowArgs),
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn categories_conflict_with_include_all() {
        let res = Cli::try_parse_from(["mkp", "dist", "--categories", "agents", "--include-all"]);
        assert!(res.is_err());
    }

    #[test]
    fn categories_split_on_commas() {
        let cli = Cli::try_parse_from(["mkp", "dist", "src", "--categories", "agents,checks"]).unwrap();
        match cli.cmd {
            Command::Dist(args) => {
                assert_eq!(args.dir.to_str(), Some("src"));
                assert_eq!(
                    args.categories,
                    Some(vec!["agents".to_string(), "checks".to_string()])
                );
            }
            _ => panic!("expected dist"),
        }
    }

    #[test]
    fn init_accepts_underscore_aliases() {
        let cli = Cli::try_parse_from([
            "mkp",
            "init",
            "--version",
            "1.2.3",
            "--download_url",
            "http://example.org/",
            "--min_required",
            "2.0.0",
        ])
        .unwrap();
        match cli.cmd {
            Command::Init(args) => {
                assert_eq!(args.version, "1.2.3");
                assert_eq!(args.download_url, "http://example.org/");
                assert_eq!(args.min_required, "2.0.0");
                assert_eq!(args.name, "example");
            }
            _ => panic!("expected init"),
        }
    }
}
