use statictron::constants::IGNORE_FILE;
use statictron::ignore::{parse_ignore_file, IgnoreFilter};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_parse_ignore_file() {
    let temp_dir = TempDir::new().unwrap();
    let ignore_path = temp_dir.path().join(IGNORE_FILE);

    // Test without ignore file
    assert!(parse_ignore_file(&ignore_path).unwrap().is_empty());

    // Test with ignore file
    let mut file = File::create(&ignore_path).unwrap();
    writeln!(file, "# drafts\n*.draft.ejs\n\n_partials/**").unwrap();

    assert_eq!(
        parse_ignore_file(&ignore_path).unwrap(),
        ["*.draft.ejs", "_partials/**"]
    );
}

#[test]
fn test_for_source_combines_defaults_file_and_patterns() {
    let temp_dir = TempDir::new().unwrap();
    let mut file = File::create(temp_dir.path().join(IGNORE_FILE)).unwrap();
    writeln!(file, "*.draft.ejs").unwrap();

    let filter = IgnoreFilter::for_source(temp_dir.path(), &["_partials/**"]).unwrap();

    assert!(filter.is_match(IGNORE_FILE));
    assert!(filter.is_match("statictron.yml"));
    assert!(filter.is_match("assets/.DS_Store"));
    assert!(filter.is_match("posts/hello.draft.ejs"));
    assert!(filter.is_match("_partials/head.ejs"));
    assert!(!filter.is_match("posts/hello.ejs"));
    assert!(!filter.is_match("index.css"));
}

#[test]
fn test_globs_in_subdirectories() {
    let filter = IgnoreFilter::new(["**/*.css", "assets/*.png"]).unwrap();

    assert!(filter.is_match("index.css"));
    assert!(filter.is_match("styles/site.css"));
    assert!(filter.is_match("assets/logo.png"));
    assert!(!filter.is_match("logo.png"));
}
