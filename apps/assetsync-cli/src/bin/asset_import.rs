//! asset-import: create or reassign hardware assets from a CSV file.

use assetsync_cli::commands::asset_import;
use assetsync_cli::config::AssetImportArgs;
use clap::Parser;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = AssetImportArgs::parse();

    match asset_import::execute(args).await {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}
