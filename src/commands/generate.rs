//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Folio;

/// Generate the whole site
pub fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();

    let stats = Generator::new(folio)?.generate()?;

    tracing::info!(
        "Generated {} pages ({} posts, {} projects, {} assets) in {:.2}s",
        stats.pages,
        stats.posts,
        stats.projects,
        stats.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Watch the content directory and config file, regenerating on change
///
/// Blocks until the watcher channel closes.
pub fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.content_dir);
    }

    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<&DebouncedEvent> =
                    events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Config edits take effect on the next run
                let result = Folio::new(&folio.base_dir).and_then(|folio| run(&folio));
                if let Err(e) = result {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Ignore editor and VCS noise
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}
