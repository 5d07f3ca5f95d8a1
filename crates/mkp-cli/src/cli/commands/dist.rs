use crate::cli::args::DistArgs;
use crate::config;
use crate::exit_codes;
use anyhow::Context;
use mkp_core::{Categories, DistOptions, ExcludePatterns};

pub fn run(args: DistArgs) -> anyhow::Result<i32> {
    let info_path = args.dir.join(&args.info);
    let mut info = config::load_info(&info_path)?;
    tracing::debug!(path = %info_path.display(), keys = info.len(), "loaded package metadata");

    let categories = match (args.include_all, args.categories) {
        (true, _) => Categories::IncludeAll,
        (false, Some(names)) => Categories::Explicit(names),
        (false, None) => Categories::default(),
    };
    let options = DistOptions {
        categories,
        exclude: ExcludePatterns::new(&args.exclude)?,
    };

    let path = mkp_core::dist(&mut info, &args.dir, &options)
        .with_context(|| format!("failed to build package from {}", args.dir.display()))?;

    println!("{}", path.display());
    Ok(exit_codes::SUCCESS)
}
