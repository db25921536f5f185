use codescout_core::search::{self, SearchOptions};
use std::path::PathBuf;
use std::sync::mpsc;

pub fn run(
    path: PathBuf,
    query: String,
    case_sensitive: bool,
    word: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (snapshot, pool) = crate::scan::scan_project(path)?;
    let options = SearchOptions {
        case_sensitive,
        whole_word: word,
    };

    let (tx, rx) = mpsc::channel();
    search::find(
        snapshot.files().to_vec(),
        &query,
        &pool,
        options,
        move |result| {
            let _ = tx.send(result);
        },
    );
    let mut result = rx.recv()?;
    // file order is unspecified across tasks; sort for stable output
    result.sort_by(|a, b| a.file.cmp(&b.file));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    let mut total = 0usize;
    for file in &result {
        for m in &file.matches {
            total += 1;
            println!(
                "{}:{}:{}: {}",
                file.file.display(),
                m.position.line + 1,
                m.position.column + 1,
                m.line_text.trim_end()
            );
        }
    }
    tracing::debug!("{} matches in {} files", total, result.len());
    Ok(())
}
