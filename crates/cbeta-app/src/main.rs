use std::path::Path;

use cbeta_core::{JsonFileStore, MissingCharacters};

pub mod config;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = config::load_config()?;
    let store = JsonFileStore::from_config(&config.table);

    let mut missing = MissingCharacters::load(&config, &store)?;
    tracing::info!(
        path = %store.path().display(),
        entries = missing.table().len(),
        "Missing character table ready"
    );

    let Some(source_dir) = config.scan.source_dir.as_deref() else {
        tracing::warn!("CBETA_SOURCE_DIR not set, nothing to scan");
        return Ok(());
    };

    let summary = missing.scan_tree(Path::new(source_dir))?;
    for failure in &summary.failures {
        tracing::warn!("skipped: {failure}");
    }
    if summary.missing_id > 0 {
        tracing::warn!("{} declarations had no xml:id", summary.missing_id);
    }

    missing.rebuild_index();
    missing.save(&store)?;
    tracing::info!(
        documents = summary.documents,
        extracted = summary.extracted,
        entries = missing.table().len(),
        "Table updated"
    );

    Ok(())
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("CBETA_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
