use activities_menu::{load, load_source, load_yaml, ConfigError};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;

/// Serve exactly one HTTP response on a local port and return its URL.
fn serve_once(status: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/yaml\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        // Drain the request head before answering.
        while reader.read_line(&mut line).unwrap_or(0) > 0 && line != "\r\n" {
            line.clear();
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });
    format!("http://{addr}/app_activities.yaml")
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("app_activities.yaml");
    fs::write(&path, body).expect("write config");
    path
}

#[test]
fn loads_records_in_source_order_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
- name: Home
  description: Home page
  url: home.py
- name: Overview
  description: "Data overview: charts & tables"
  url: sub/overview.py
- name: Zeta
  description: Last one
  url: zeta.py
"#,
    );

    let catalog = load(&path).expect("load catalog");
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.names(), vec!["Home", "Overview", "Zeta"]);

    let overview = catalog.get("Overview").unwrap();
    assert_eq!(overview.name, "Overview");
    assert_eq!(overview.description, "Data overview: charts & tables");
    assert_eq!(overview.url, "sub/overview.py");
}

#[test]
fn empty_file_loads_an_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "");
    assert!(load(&path).unwrap().is_empty());
}

#[test]
fn missing_file_is_config_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.yaml");
    let err = load(&path).expect_err("missing file must fail");
    match err {
        ConfigError::ConfigNotFound(reported) => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_yaml_is_config_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "- name: Home\n  description: [unclosed\n");
    let err = load(&path).expect_err("bad yaml must fail");
    assert!(matches!(err, ConfigError::ConfigParseError { .. }), "{err}");
}

#[test]
fn missing_field_fails_without_partial_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "- {name: Home, description: Home page, url: home.py}\n\
         - {name: Overview, url: overview.py}\n",
    );
    let err = load(&path).expect_err("missing description must fail");
    match err {
        ConfigError::ConfigSchemaError { message, .. } => {
            assert!(message.contains("record 1"), "{message}");
            assert!(message.contains("`description`"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_mapping_record_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "- just a string\n");
    let err = load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ConfigSchemaError { .. }));
}

#[test]
fn duplicate_names_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "- {name: Home, description: one, url: a.py}\n\
         - {name: Home, description: two, url: b.py}\n",
    );
    let err = load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateActivity { ref name, .. } if name == "Home"));
}

#[test]
fn load_does_not_modify_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let body = "- {name: Home, description: Home page, url: home.py}\n";
    let path = write_config(&dir, body);
    load(&path).unwrap();
    load(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), body);
}

#[test]
fn load_yaml_returns_the_raw_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "- {name: Home, description: Home page, url: home.py}\n");
    let doc = load_yaml(path.to_str().unwrap()).unwrap();
    assert!(doc.is_sequence());
}

#[test]
fn loads_catalog_from_url() {
    let url = serve_once("200 OK", "- {name: A, description: a page, url: a.py}\n");
    let catalog = load_source(&url).expect("load remote catalog");
    assert_eq!(catalog.names(), vec!["A"]);
    assert_eq!(catalog.get("A").unwrap().url, "a.py");
}

#[test]
fn http_error_status_is_fetch_error() {
    let url = serve_once("404 Not Found", "not here");
    let err = load_source(&url).expect_err("404 must fail");
    match err {
        ConfigError::Fetch { url: reported, message } => {
            assert_eq!(reported, url);
            assert!(message.contains("404"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_remote_body_is_config_parse_error() {
    let url = serve_once("200 OK", "- name: A\n  description: [unclosed\n");
    let err = load_yaml(&url).expect_err("bad remote yaml must fail");
    assert!(matches!(err, ConfigError::ConfigParseError { .. }), "{err}");
}
