use std::process::Command;

use pretty_assertions::assert_eq;

const DIAGRAM: &str = r#"{
    "elements": [
        {"id": "element-0", "type": "entity", "left": "10px", "top": "10px", "width": "200px", "text": "Person"},
        {"id": "element-1", "type": "attribute", "left": "10px", "top": "120px", "text": "ssn", "isPK": true}
    ],
    "lines": [{"startId": "element-0", "endId": "element-1", "cardStart": "", "cardEnd": "", "lineType": ""}]
}"#;

fn ersql() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ersql"))
}

#[test]
fn sql_into_directory_writes_database_sql() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("diagram.json");
    std::fs::write(&input, DIAGRAM).unwrap();

    let status = ersql()
        .arg(&input)
        .args(["-f", "sql", "--column-type", "TEXT", "-o"])
        .arg(dir.path())
        .status()
        .unwrap();
    assert!(status.success());

    let sql = std::fs::read_to_string(dir.path().join("database.sql")).unwrap();
    assert_eq!(
        sql,
        "-- Generated SQL\n\nCREATE TABLE Person (\n    ssn TEXT,\n    PRIMARY KEY (ssn)\n);\n\n"
    );
}

#[test]
fn embed_writes_schema_element() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("diagram.json");
    let embedded = dir.path().join("with-schema.json");
    std::fs::write(&input, DIAGRAM).unwrap();

    let output = ersql()
        .arg(&input)
        .arg("--embed")
        .arg(&embedded)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "<b>Relational schema:</b><br><br><b>Person</b> ( <ins>ssn</ins> )<br>"
    );

    let document = ersql::DiagramDocument::from_json(&std::fs::read_to_string(embedded).unwrap()).unwrap();
    let schema = document.elements.last().unwrap();
    assert_eq!(schema.id, "element-2");
    assert_eq!(schema.kind, "schema");
    assert_eq!(schema.left, "250px");
    assert!(schema.text.contains("<ins>ssn</ins>"));
}

#[test]
fn invalid_input_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.json");
    std::fs::write(&input, "{ not json").unwrap();

    let output = ersql().arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR: invalid diagram document"), "got: {stderr}");
}
