use codescout_core::runtime::WorkerPool;
use codescout_core::tree::fuzzy::fuzzy_score;
use codescout_core::tree::{ProjectTree, ScanOptions, TreeSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

fn scan_blocking(root: &Path, options: ScanOptions) -> (Arc<ProjectTree>, Arc<TreeSnapshot>) {
    let pool = Arc::new(WorkerPool::with_workers(2).unwrap());
    let tree = Arc::new(ProjectTree::new(root, pool));
    let (tx, rx) = mpsc::channel();
    tree.scan(options, move |snapshot| {
        let _ = tx.send(snapshot);
    });
    let snapshot = rx.recv().unwrap();
    (tree, snapshot)
}

fn relative_files(snapshot: &TreeSnapshot) -> Vec<PathBuf> {
    let mut rel: Vec<PathBuf> = snapshot
        .files()
        .iter()
        .map(|f| f.strip_prefix(snapshot.root()).unwrap().to_path_buf())
        .collect();
    rel.sort();
    rel
}

#[test]
fn test_scan_with_subtree_ignore_rule() {
    // root: a.txt, sub/b.txt, sub/.hidden, rule `*.hidden` at sub/
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/b.txt"), "b").unwrap();
    fs::write(dir.path().join("sub/.hidden"), "h").unwrap();
    fs::write(dir.path().join("sub/.gitignore"), "*.hidden\n").unwrap();

    let (_, snapshot) = scan_blocking(dir.path(), ScanOptions::default());

    assert_eq!(
        relative_files(&snapshot),
        vec![PathBuf::from("a.txt"), PathBuf::from("sub/b.txt")]
    );
}

#[test]
fn test_names_align_with_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.rs"), "").unwrap();
    fs::create_dir_all(dir.path().join("src/deep")).unwrap();
    fs::write(dir.path().join("src/lib.rs"), "").unwrap();
    fs::write(dir.path().join("src/deep/io.rs"), "").unwrap();

    let (_, snapshot) = scan_blocking(dir.path(), ScanOptions::default());

    assert_eq!(snapshot.files().len(), snapshot.names().len());
    for (file, name) in snapshot.files().iter().zip(snapshot.names()) {
        assert_eq!(file.file_name().unwrap().to_str().unwrap(), name);
    }
}

#[test]
fn test_accepted_patterns_filter_by_basename() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("keep.txt"), "").unwrap();
    fs::write(dir.path().join("drop.log"), "").unwrap();
    fs::write(dir.path().join("Makefile"), "").unwrap();
    fs::write(dir.path().join("libx.so"), "").unwrap();

    let options = ScanOptions::from_config(&codescout_core::config::ScanConfig {
        accepted_patterns: vec![
            "*.txt".to_string(),
            "Makefile".to_string(),
            r"re:^lib.*\.so$".to_string(),
        ],
        ..Default::default()
    })
    .unwrap();
    let (_, snapshot) = scan_blocking(dir.path(), options);

    let mut names: Vec<&str> = snapshot.names().iter().map(String::as_str).collect();
    names.sort();
    assert_eq!(names, vec!["Makefile", "keep.txt", "libx.so"]);
}

#[test]
fn test_hidden_policy_skips_dot_entries() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("visible.rs"), "").unwrap();
    fs::write(dir.path().join(".env"), "").unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".git/config"), "").unwrap();

    let options = ScanOptions {
        ignore_hidden: true,
        ..Default::default()
    };
    let (_, snapshot) = scan_blocking(dir.path(), options);

    assert_eq!(snapshot.names(), ["visible.rs"]);
    assert_eq!(snapshot.directories().len(), 1);
}

#[test]
fn test_subtree_rules_replace_ancestor_rules() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
    fs::write(dir.path().join("root.log"), "").unwrap();
    fs::write(dir.path().join("root.rs"), "").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/.gitignore"), "*.tmp\n").unwrap();
    fs::write(dir.path().join("sub/kept.log"), "").unwrap();
    fs::write(dir.path().join("sub/dropped.tmp"), "").unwrap();

    let (_, snapshot) = scan_blocking(dir.path(), ScanOptions::default());

    // the subtree's own rules take over: *.log no longer applies below sub/
    assert_eq!(
        relative_files(&snapshot),
        vec![PathBuf::from("root.rs"), PathBuf::from("sub/kept.log")]
    );
}

#[test]
fn test_directories_contains_root_and_subdirs() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/b")).unwrap();

    let (tree, snapshot) = scan_blocking(dir.path(), ScanOptions::default());

    assert!(snapshot.is_dir_in_tree(snapshot.root()));
    assert!(tree.is_dir_in_tree(&snapshot.root().join("a")));
    assert!(tree.is_dir_in_tree(&snapshot.root().join("a/b")));
    assert_eq!(snapshot.directories().len(), 3);
}

#[test]
fn test_ready_flag_flips_after_scan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("x.rs"), "").unwrap();

    let pool = Arc::new(WorkerPool::with_workers(2).unwrap());
    let tree = Arc::new(ProjectTree::new(dir.path(), pool));
    assert!(!tree.is_ready());

    let (tx, rx) = mpsc::channel();
    tree.scan(ScanOptions::default(), move |s| {
        let _ = tx.send(s);
    });
    rx.recv().unwrap();
    assert!(tree.is_ready());
    assert!(tree.is_file_in_tree(&tree.root().join("x.rs")));
}

#[test]
fn test_rescan_leaves_held_snapshots_untouched() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.rs"), "").unwrap();

    let (tree, old) = scan_blocking(dir.path(), ScanOptions::default());
    assert_eq!(old.files_count(), 1);

    fs::write(dir.path().join("two.rs"), "").unwrap();
    let (tx, rx) = mpsc::channel();
    tree.scan(ScanOptions::default(), move |s| {
        let _ = tx.send(s);
    });
    let new = rx.recv().unwrap();

    // the held snapshot is immutable; the tree serves the new one
    assert_eq!(old.files_count(), 1);
    assert_eq!(new.files_count(), 2);
    assert_eq!(tree.files_count(), 2);
}

#[test]
fn test_async_lookups_deliver_via_callback() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("parser.rs"), "").unwrap();
    fs::write(dir.path().join("printer.rs"), "").unwrap();

    let (tree, _) = scan_blocking(dir.path(), ScanOptions::default());

    let (tx, rx) = mpsc::channel();
    tree.async_fuzzy_match_tree("parser", 4, move |matches| {
        let _ = tx.send(matches);
    });
    let matches = rx.recv().unwrap();
    assert_eq!(matches[0].name, "parser.rs");

    let (tx, rx) = mpsc::channel();
    tree.async_match_tree("print", 4, move |matches| {
        let _ = tx.send(matches);
    });
    let matches = rx.recv().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "printer.rs");
}

#[test]
fn test_fuzzy_results_bounded_and_score_ordered() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["cfg.rs", "config.rs", "conflagration.rs", "main.rs"] {
        fs::write(dir.path().join(name), "").unwrap();
    }

    let (_, snapshot) = scan_blocking(dir.path(), ScanOptions::default());
    let matches = snapshot.fuzzy_match_tree("cfg", 3);

    assert!(matches.len() <= 3);
    let scores: Vec<i32> = matches
        .iter()
        .map(|m| fuzzy_score(&m.name, "cfg"))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[cfg(unix)]
#[test]
fn test_symlink_to_ancestor_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/file.rs"), "").unwrap();
    std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

    // must terminate, and must not index anything through the cycle
    let (_, snapshot) = scan_blocking(dir.path(), ScanOptions::default());
    assert_eq!(relative_files(&snapshot), vec![PathBuf::from("sub/file.rs")]);
}

#[cfg(unix)]
#[test]
fn test_symlink_to_sibling_directory_is_followed() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    fs::write(dir.path().join("real/inner.rs"), "").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

    let (_, snapshot) = scan_blocking(dir.path(), ScanOptions::default());

    // the alias is recorded as a directory and indexed through both names
    assert!(snapshot.is_dir_in_tree(&snapshot.root().join("alias")));
    assert!(snapshot
        .files()
        .iter()
        .any(|f| f.ends_with("real/inner.rs")));
}

#[test]
fn test_unreadable_root_yields_empty_index() {
    let pool = Arc::new(WorkerPool::with_workers(1).unwrap());
    let tree = Arc::new(ProjectTree::new("/definitely/not/a/path", pool));
    let (tx, rx) = mpsc::channel();
    tree.scan(ScanOptions::default(), move |s| {
        let _ = tx.send(s);
    });
    let snapshot = rx.recv().unwrap();
    assert_eq!(snapshot.files_count(), 0);
    assert!(tree.is_ready());
}
