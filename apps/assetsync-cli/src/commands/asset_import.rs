//! The `asset-import` program.

use std::fs::File;
use std::path::Path;

use assetsync_directory::HttpDirectory;
use assetsync_import::report::{log_banner, log_summary};
use assetsync_import::{AssetImporter, RunStats, SummaryPaths};
use tracing::{error, info};

use super::open_input;
use crate::config::{run_stamp, AssetImportArgs};
use crate::error::CliResult;
use crate::logging::init_logging;

/// Execute the asset import.
///
/// A fatal error is logged and returned; the summary is only logged for a
/// completed run.
pub async fn execute(args: AssetImportArgs) -> CliResult<RunStats> {
    let stamp = run_stamp();
    let log_file = args.log_path(&stamp);
    init_logging(args.verbose, Some(&log_file))?;

    let paths = SummaryPaths {
        results: args.output_path(&stamp),
        log: Some(log_file),
    };

    match run(&args, &paths.results).await {
        Ok(stats) => {
            log_summary(&stats, &paths, false);
            Ok(stats)
        }
        Err(e) => {
            error!("Fatal error: {e}");
            Err(e)
        }
    }
}

/// Read `args.input`, reconcile against the configured API, write `output`.
pub async fn run(args: &AssetImportArgs, output: &Path) -> CliResult<RunStats> {
    log_banner("ASSET IMPORT STARTED");
    let directory = HttpDirectory::new(args.api.directory_config()?)?;
    let input = open_input(&args.input)?;
    info!(
        input = %args.input.display(),
        output = %output.display(),
        api = %directory.base_url(),
        "Reading asset rows"
    );

    let mut importer = AssetImporter::new(&directory);
    if args.cache_lookups {
        importer = importer.with_lookup_cache();
    }
    let stats = importer.run(input, File::create(output)?).await?;

    if let Some(cache) = importer.cache() {
        info!(entries = cache.len(), hits = cache.hits(), "Lookup cache");
    }
    Ok(stats)
}
