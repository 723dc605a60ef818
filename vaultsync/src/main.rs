// /////////////////////////////////////////////////////////////////////////////
// Vaultsync
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Binary entry point: parses and validates CLI arguments, installs the
//! `tracing` subscriber, builds the endpoint stack the requested URIs
//! describe, and dispatches to the sync or restore driver. Exit code
//! follows §6's flat 0/1 contract.

use vaultsync::application::{build_endpoint, run_restore, run_sync, Secrets};
use vaultsync_bootstrap::{bootstrap_cli, exit_code::exit_code_for, logger::init_tracing, ValidatedCommand};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let validated_cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  vaultsync [--secrets=<path>] [--storage-class=<class>] sync <source-uri> <target-uri>");
            eprintln!("  vaultsync --secrets=<path> [--restore-request=<json>] restore <target-uri>");
            return std::process::ExitCode::from(1);
        }
    };

    init_tracing(false);

    let result = run(validated_cli).await;

    if let Err(ref e) = result {
        eprintln!("vaultsync: {e}");
    }

    std::process::ExitCode::from(exit_code_for(&result) as u8)
}

async fn run(cli: vaultsync_bootstrap::ValidatedCli) -> Result<(), vaultsync_domain::VaultSyncError> {
    let secrets = Secrets::load(cli.secrets_path.as_deref())?;

    match cli.command {
        ValidatedCommand::Sync { source, target } => {
            let source = build_endpoint(&source, &secrets, &cli.storage_class, &cli.restore_request).await?;
            let target = build_endpoint(&target, &secrets, &cli.storage_class, &cli.restore_request).await?;
            let stats = run_sync(source.as_ref(), target.as_ref()).await?;
            println!("{}", stats.summary_line());
            Ok(())
        }
        ValidatedCommand::Restore { target } => {
            let target = build_endpoint(&target, &secrets, &cli.storage_class, &cli.restore_request).await?;
            let stats = run_restore(target.as_ref()).await?;
            println!(
                "restore requested for {} object(s), {} already in progress",
                stats.requested, stats.already_in_progress
            );
            Ok(())
        }
    }
}
