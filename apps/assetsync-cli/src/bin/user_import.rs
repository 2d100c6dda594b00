//! user-import: create or update user accounts from a CSV file.

use assetsync_cli::commands::user_import;
use assetsync_cli::config::UserImportArgs;
use clap::Parser;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = UserImportArgs::parse();

    match user_import::execute(args).await {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}
