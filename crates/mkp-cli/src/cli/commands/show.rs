use crate::cli::args::ShowArgs;
use crate::exit_codes;
use anyhow::Context;
use mkp_core::{encode_info, load_file};

pub fn run(args: ShowArgs) -> anyhow::Result<i32> {
    let package = load_file(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&package.info().to_json())?);
        return Ok(exit_codes::SUCCESS);
    }

    let literal = String::from_utf8(encode_info(package.info())?)?;
    println!("{literal}");
    println!();
    for (category, files) in package.files()? {
        println!("{category}: {} file(s)", files.len());
    }
    Ok(exit_codes::SUCCESS)
}
