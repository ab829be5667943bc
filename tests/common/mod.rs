#![allow(dead_code)]

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write<P: AsRef<Path>>(root: P, relative: &str, content: &str) {
    let path = root.as_ref().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read<P: AsRef<Path>>(root: P, relative: &str) -> String {
    fs::read_to_string(root.as_ref().join(relative)).unwrap()
}

/// Sorted `/`-separated paths of every file under `root`.
pub fn list_files<P: AsRef<Path>>(root: P) -> Vec<String> {
    let root = root.as_ref();
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

/// A small site: a page with partials, a bundled stylesheet and an image.
pub fn demo_site<P: AsRef<Path>>(root: P) {
    let root = root.as_ref();
    write(
        root,
        "index.ejs",
        r#"<% include "_partials/head.ejs" %>
<body>
<% include "_partials/header.ejs" %>
<h1><%= title | default("Home Page") %></h1>
<p>This is a test</p>
<img src="plane.svg" />
</body>
<% include "_partials/foot.ejs" %>
"#,
    );
    write(
        root,
        "_partials/head.ejs",
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<title>Example Site</title>\n<link rel=\"stylesheet\" href=\"index.css\">\n</head>\n",
    );
    write(root, "_partials/header.ejs", "<header>Example Site</header>\n");
    write(root, "_partials/foot.ejs", "</html>\n");
    write(root, "index.css", "@import \"header.css\";\n");
    write(
        root,
        "header.css",
        "header {\n    background-color: black;\n    color: white;\n}\n",
    );
    write(
        root,
        "plane.svg",
        "<svg xmlns=\"http://www.w3.org/2000/svg\"><path d=\"M0 0h10v10z\"/></svg>\n",
    );
}
