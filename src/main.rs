use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use column_resolver::config::Config;
use column_resolver::context::{Configuration, FixedDefault};
use column_resolver::mask::MaskRegistry;
use column_resolver::metadata::TableMapping;
use column_resolver::report::{format_resolution_report, render_table};
use column_resolver::resolver::HandlerResolver;

fn main() -> Result<()> {
    let config = Config::load();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.clone())
        .init();

    info!("column-resolver v{}", env!("CARGO_PKG_VERSION"));

    let Some(path) = config.mapping.as_ref() else {
        anyhow::bail!("No mapping file given; pass --mapping or set COLUMN_RESOLVER_MAPPING");
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file {}", path.display()))?;
    let table = TableMapping::from_json(&json)
        .and_then(TableMapping::into_descriptor)
        .with_context(|| format!("Invalid mapping in {}", path.display()))?;
    info!("Loaded {} columns for table {}", table.columns().len(), table.table());

    let configuration = Arc::new(Configuration::from_config(&config));
    let resolver = HandlerResolver::new(
        Arc::new(FixedDefault(configuration)),
        Arc::new(MaskRegistry::with_builtin(config.mask_char)),
    );

    let resolved = table
        .resolve_all(&resolver, None)
        .map_err(|e| anyhow::anyhow!("Failed to resolve {}: {}", table.table(), e))?;

    let unresolved = resolved.iter().filter(|r| r.converter.is_none()).count();
    if unresolved > 0 {
        warn!("{} columns use the driver's default conversion", unresolved);
    }

    let (columns, rows) = format_resolution_report(&resolved, config.show_ignored);
    println!("{}", render_table(&columns, &rows));
    Ok(())
}
