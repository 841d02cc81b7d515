//! A linear dependency chain runs leaf-first and exits cleanly (§8).

use crate::prelude::*;

#[test]
fn tasks_run_in_dependency_order_and_process_exits_zero() {
    let project = Project::new(
        r#"
apiVersion: kit/v1
kind: Tasks
metadata:
  name: linear
spec:
  tasks:
    a:
      sh: "echo task-a"
    b:
      sh: "echo task-b"
      dependencies: [a]
    c:
      sh: "echo task-c"
      dependencies: [b]
"#,
    );

    let assert = project.kit().arg("c").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

    let pos_a = stdout.find("task-a").expect("task-a ran");
    let pos_b = stdout.find("task-b").expect("task-b ran");
    let pos_c = stdout.find("task-c").expect("task-c ran");
    assert!(pos_a < pos_b, "a should complete before b starts");
    assert!(pos_b < pos_c, "b should complete before c starts");
}
