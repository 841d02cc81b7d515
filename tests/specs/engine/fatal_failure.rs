//! A `restartPolicy: never` task that errors blocks its downstream and
//! fails the whole run (§8).

use crate::prelude::*;

#[test]
fn failing_upstream_blocks_downstream_and_exits_nonzero() {
    let project = Project::new(
        r#"
apiVersion: kit/v1
kind: Tasks
metadata:
  name: fatal
spec:
  tasks:
    a:
      sh: "echo about-to-fail && exit 1"
      restartPolicy: never
    b:
      sh: "echo b-should-not-run"
      dependencies: [a]
"#,
    );

    let assert = project.kit().arg("b").assert().failure();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    assert!(stdout.contains("about-to-fail"));
    assert!(!stdout.contains("b-should-not-run"));
}
