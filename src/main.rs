use clap::Parser;
use reciperr2trakt::domain::model::ItemsOutcome;
use reciperr2trakt::utils::{logger, validation::Validate};
use reciperr2trakt::{run_sync, CliArgs, FileTokenStore, SyncError};

fn report_failure(e: &SyncError) {
    tracing::error!(
        "❌ Sync failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting reciperr2trakt");

    let config = match args.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Config: {:?}", config);

    let store = FileTokenStore::new(&config.token_storage_path);

    match run_sync(config, store).await {
        Ok(result) => {
            if let ItemsOutcome::Failed { status, .. } = &result.items {
                tracing::warn!(
                    "⚠️ List is in place but movies were not added (status {})",
                    status
                );
            }
            match (result.list_id, result.list_slug.as_deref()) {
                (Some(id), Some(slug)) => println!("✅ Synced list {} ({})", slug, id),
                (Some(id), None) => println!("✅ Synced list {}", id),
                (None, _) => println!("✅ Dry run finished, no list exists yet"),
            }
            println!(
                "📋 {} movies submitted, {} skipped{}",
                result.submitted,
                result.skipped,
                if result.dry_run { " (dry run)" } else { "" }
            );
        }
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    }

    Ok(())
}
