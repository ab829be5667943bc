use clap::Parser;
use statictron::cli::{parse_scope_pair, Args};
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("statictron")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./src", "--output", "./dist"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.source, Some(PathBuf::from("./src")));
    assert_eq!(parsed.output, Some(PathBuf::from("./dist")));
    assert!(parsed.ignore.is_empty());
    assert!(parsed.transforms.is_empty());
    assert!(!parsed.no_clean);
    assert!(!parsed.hash);
    assert!(!parsed.verbose);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--loader",
        "ejs",
        "--transform",
        "css",
        "--ignore",
        "_partials/**",
        "--ignore",
        "*.draft.ejs",
        "--scope",
        "title=Hello=World",
        "--no-clean",
        "--hash",
        "--verbose",
        "--config",
        "site.yml",
        "--output=dist",
        "src",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.transforms, ["ejs", "css"]);
    assert_eq!(parsed.ignore, ["_partials/**", "*.draft.ejs"]);
    assert_eq!(
        parsed.scope,
        [("title".to_string(), "Hello=World".to_string())]
    );
    assert!(parsed.no_clean);
    assert!(parsed.hash);
    assert!(parsed.verbose);
    assert_eq!(parsed.config, Some(PathBuf::from("site.yml")));
    assert_eq!(parsed.output, Some(PathBuf::from("dist")));
}

#[test]
fn test_short_flags() {
    let args = make_args(&[
        "-l", "ejs", "-t", "css", "-o", "dist", "-i", "_partials/**", "-s", "abc=123", "-v", "src",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.transforms, ["ejs", "css"]);
    assert_eq!(parsed.output, Some(PathBuf::from("dist")));
    assert_eq!(parsed.scope, [("abc".to_string(), "123".to_string())]);
    assert!(parsed.verbose);
}

#[test]
fn test_source_may_come_from_config() {
    let parsed = Args::try_parse_from(make_args(&[])).unwrap();
    assert_eq!(parsed.source, None);
}

#[test]
fn test_invalid_scope() {
    assert!(parse_scope_pair("novalue").is_err());
    assert!(parse_scope_pair("=value").is_err());
    assert_eq!(
        parse_scope_pair("empty=").unwrap(),
        ("empty".to_string(), String::new())
    );
    assert!(Args::try_parse_from(make_args(&["-s", "broken", "src"])).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./src", "./dist", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
