use codescout_core::config::ProjectConfig;
use codescout_core::runtime::WorkerPool;
use codescout_core::tree::{ProjectTree, ScanOptions, TreeSnapshot};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

/// Scan a project root and block until the snapshot is ready.
pub(crate) fn scan_project(
    path: PathBuf,
) -> Result<(Arc<TreeSnapshot>, Arc<WorkerPool>), Box<dyn std::error::Error>> {
    let config = ProjectConfig::load(&path)?;
    let pool = Arc::new(WorkerPool::new()?);
    let tree = Arc::new(ProjectTree::new(path, Arc::clone(&pool)));
    let options = ScanOptions::from_config(&config.scan)?;

    let (tx, rx) = mpsc::channel();
    tree.scan(options, move |snapshot| {
        let _ = tx.send(snapshot);
    });
    Ok((rx.recv()?, pool))
}

pub fn run(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let (snapshot, _pool) = scan_project(path)?;

    println!("Indexed {}", snapshot.root().display());
    println!("  files:       {}", snapshot.files_count());
    println!("  directories: {}", snapshot.directories().len());
    for entry in snapshot.head(10) {
        println!("  - {}", entry.path.display());
    }
    if snapshot.files_count() > 10 {
        println!("  ... and {} more", snapshot.files_count() - 10);
    }
    Ok(())
}
