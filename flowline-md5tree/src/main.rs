//! flowline-md5tree: prints the MD5 digest of every regular file under a
//! directory.

use std::process::ExitCode;

use clap::Parser;
use flowline::Scope;
use tracing::info;

use flowline_md5tree::{init_tracing, md5_all, Args};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    info!(root = %args.root.display(), spread = args.spread, "hashing tree");

    let scope = Scope::new();
    match md5_all(&scope, args.root, args.spread).await {
        Ok(sums) => {
            for (path, digest) in sums {
                println!("{}  {}", hex::encode(digest), path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            scope.cancel();
            println!("got error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
