use std::path::PathBuf;

pub fn run(
    path: PathBuf,
    query: String,
    max: usize,
    substring: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (snapshot, _pool) = crate::scan::scan_project(path)?;

    let matches = if substring {
        snapshot.match_tree(&query, max)
    } else {
        snapshot.fuzzy_match_tree(&query, max)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }
    for entry in &matches {
        println!("{}\t{}", entry.name, entry.path.display());
    }
    Ok(())
}
