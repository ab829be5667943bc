use std::io;
use std::path::PathBuf;

use statictron::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::UnknownTransform("sass".to_string());
    assert_eq!(
        err.to_string(),
        "Configuration error: could not find transform named 'sass'."
    );

    let err = Error::read(
        PathBuf::from("src/index.ejs"),
        io::Error::new(io::ErrorKind::NotFound, "not found"),
    );
    assert_eq!(err.to_string(), "Cannot read 'src/index.ejs': not found.");

    let err = Error::UnresolvedVariable {
        entry: "[slug].txt".to_string(),
        variable: "slug".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cannot expand '[slug].txt': 'slug' is not a string or number in scope."
    );
}
