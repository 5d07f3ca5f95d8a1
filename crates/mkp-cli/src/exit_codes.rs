//! Process exit codes. Part of the CLI contract.

use mkp_core::MkpError;

pub const SUCCESS: i32 = 0;
pub const PACKAGE_ERROR: i32 = 1; // Bad package, parse or filesystem failure
pub const USAGE_ERROR: i32 = 2; // Invalid arguments or configuration

/// Exit code for a failed command.
///
/// Library errors carry their own classification; anything else counts as a
/// package error.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MkpError>())
        .map_or(PACKAGE_ERROR, MkpError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn usage_error_survives_context() {
        let err: anyhow::Result<()> = Err(MkpError::usage("bad category").into());
        let err = err.context("failed to build package").unwrap_err();
        assert_eq!(for_error(&err), USAGE_ERROR);
    }

    #[test]
    fn unknown_errors_are_package_errors() {
        assert_eq!(for_error(&anyhow::anyhow!("boom")), PACKAGE_ERROR);
        assert_eq!(for_error(&MkpError::format("no info").into()), PACKAGE_ERROR);
    }
}
