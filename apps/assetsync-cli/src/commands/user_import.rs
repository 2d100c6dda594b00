//! The `user-import` program.

use std::fs::File;

use assetsync_directory::HttpDirectory;
use assetsync_import::report::{log_banner, log_summary};
use assetsync_import::{RunStats, SummaryPaths, UserImporter};
use tracing::info;

use super::open_input;
use crate::config::UserImportArgs;
use crate::error::CliResult;
use crate::logging::init_logging;

/// Execute the user import. Errors go back to the caller unlogged.
pub async fn execute(args: UserImportArgs) -> CliResult<RunStats> {
    init_logging(args.verbose, args.log_file.as_deref())?;
    let stats = run(&args).await?;
    log_summary(
        &stats,
        &SummaryPaths {
            results: args.output.clone(),
            log: args.log_file.clone(),
        },
        true,
    );
    Ok(stats)
}

pub async fn run(args: &UserImportArgs) -> CliResult<RunStats> {
    log_banner("USER IMPORT STARTED");
    let directory = HttpDirectory::new(args.api.directory_config()?)?;
    let input = open_input(&args.input)?;
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        "Reading user rows"
    );

    let stats = UserImporter::new(&directory)
        .run(input, File::create(&args.output)?)
        .await?;
    Ok(stats)
}
