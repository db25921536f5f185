use codescout_core::config::ProjectConfig;
use codescout_core::model::Document;
use codescout_core::symbols::SymbolCache;
use std::path::PathBuf;

pub fn run(file: PathBuf, line: usize, column: usize) -> Result<(), Box<dyn std::error::Error>> {
    let root = file
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let config = ProjectConfig::load(&root)?;

    let text = std::fs::read_to_string(&file)?;
    let language = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("text")
        .to_string();
    let doc = Document::new(language, text);

    let cursor = doc
        .offset_at(line, column)
        .ok_or_else(|| format!("no such position {line}:{column} in {}", file.display()))?;

    let cache = SymbolCache::new(&config.suggest)?;
    cache.open_document(&doc);
    for suggestion in cache.suggestions(&doc, cursor) {
        println!("{suggestion}");
    }
    Ok(())
}
