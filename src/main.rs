use spotlight_saver::cli::{AppConfig, Args};
use spotlight_saver::config::UserConfig;
use spotlight_saver::{ensure_directory, list_gallery, logging, FolderSynchronizer, SyncPaths};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let config: AppConfig = args.into();
    logging::init(config.verbose);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_source_missing() => {
            eprintln!("Error: {}", e);
            eprintln!(
                "The lock-screen image cache was not found. Windows Spotlight may be disabled: \
                 choose \"Windows spotlight\" under Settings > Personalization > Lock screen."
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &AppConfig) -> spotlight_saver::Result<()> {
    // Load user configuration
    let mut user_config = config.user_config_or_default(UserConfig::load())?;

    if config.save_config {
        user_config = config.merged_user_config(&user_config);
        user_config.save()?;
        if let Some(path) = UserConfig::config_path() {
            println!("Saved configuration to {}", path.display());
        }
    }

    let paths: SyncPaths = config.sync_paths(&user_config)?;
    ensure_directory(&paths.destination)?;

    let report = FolderSynchronizer::new()
        .sync(&paths.destination, &paths.source)
        .await?;

    println!(
        "Saved {} new wallpaper(s) to {}",
        report.written_count(),
        paths.destination.display()
    );
    for path in &report.written {
        println!("  {}", path.display());
    }

    if config.list {
        let gallery = list_gallery(&paths.destination)?;
        println!("\n{} wallpaper(s) in {}:", gallery.len(), paths.destination.display());
        for entry in gallery {
            println!(
                "  {:<48} {:>10} bytes  {}",
                entry.name,
                entry.size,
                entry.modified_date.format("%Y-%m-%d %H:%M")
            );
        }
    }

    if config.open {
        if let Err(e) = open::that(&paths.destination) {
            tracing::warn!("Failed to open {}: {e}", paths.destination.display());
        }
    }

    Ok(())
}
