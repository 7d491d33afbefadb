//! Init command implementation

use anyhow::Result;
use std::path::Path;
use tracing::info;

use bugdojo::config::Config;
use bugdojo::store::CatalogFile;

use super::{Paths, open_store};

/// Create the database with the built-in badges, import an optional catalog and
/// write a default config file if none exists yet.
pub fn init_command(paths: &Paths, catalog: Option<&Path>) -> Result<()> {
    let config = paths.load_config()?;

    let config_path = paths
        .config
        .clone()
        .unwrap_or_else(Config::global_config_path);
    if !config_path.exists() {
        config.save_to_file(&config_path)?;
        println!("Created: {}", config_path.display());
    }

    let db_path = paths.database_path(&config);
    let store = open_store(&db_path)?;
    let badges = store.ensure_default_badges()?;
    println!("Database: {} ({} built-in badges added)", db_path.display(), badges);

    if let Some(catalog_path) = catalog {
        let catalog = CatalogFile::from_file(catalog_path)?;
        let summary = store.import_catalog(&catalog)?;
        info!(path = %catalog_path.display(), "catalog loaded");
        println!(
            "Imported {} lessons and {} badges from {}",
            summary.lessons_added,
            summary.badges_added,
            catalog_path.display()
        );
    }

    Ok(())
}
