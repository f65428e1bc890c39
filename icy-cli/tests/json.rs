use assert_cmd::Command;
use serde_json::json;
use serde_json::Value;
use std::time::Duration;

fn icy_cli() -> Command {
  assert_cmd::cargo::cargo_bin_cmd!("icy-cli")
}

#[test]
fn json_success_contains_schema_version_and_output() {
  let assert = icy_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .write_stdin("int main() {\n    return 0\nint x\n")
    .assert()
    .success()
    .code(0);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  let value: Value = serde_json::from_str(&stdout).expect("stdout to be valid JSON");
  assert_eq!(value["schema_version"], 1);
  assert_eq!(
    value["output"],
    json!(["int main() {", "    return 0;};", "int x;"])
  );
  assert_eq!(value["diagnostics"], json!([]));
}

#[test]
fn json_error_contains_diagnostics_array() {
  let assert = icy_cli()
    .timeout(Duration::from_secs(5))
    .arg("--json")
    .write_stdin("void f() {\n    x = 1\n")
    .assert()
    .failure()
    .code(1);

  assert!(
    assert.get_output().stderr.is_empty(),
    "expected stderr to be empty, got: {}",
    String::from_utf8_lossy(&assert.get_output().stderr)
  );

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
  let value: Value = serde_json::from_str(&stdout).expect("stdout to be valid JSON");
  assert_eq!(value["schema_version"], 1);
  assert_eq!(value["output"], json!(["void f() {", "    x = 1;"]));

  let diagnostics = value
    .get("diagnostics")
    .and_then(|value| value.as_array())
    .expect("expected diagnostics array");
  assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
  assert_eq!(diagnostics[0]["line"], 1);
  assert_eq!(diagnostics[0]["code"], "IC0006");
  assert_eq!(
    diagnostics[0]["message"],
    "could not find closing parenthesis for: void f() {"
  );
}
