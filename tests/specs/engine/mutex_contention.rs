//! Two tasks sharing a `mutex` label never run concurrently (§8).

use crate::prelude::*;

#[test]
fn mutex_holders_never_overlap() {
    let project = Project::new(
        r#"
apiVersion: kit/v1
kind: Tasks
metadata:
  name: contention
spec:
  tasks:
    x:
      sh: "echo start:x >> events.log; sleep 0.3; echo end:x >> events.log"
      mutex: lock
    y:
      sh: "echo start:y >> events.log; sleep 0.3; echo end:y >> events.log"
      mutex: lock
"#,
    );

    project.kit().args(["x", "y"]).assert().success();

    let events = project.read("events.log");
    let lines: Vec<&str> = events.lines().collect();
    assert_eq!(lines.len(), 4, "both tasks should have recorded a start and an end: {lines:?}");

    // Whichever task goes first, its `end` must come before the other's
    // `start` — the two critical sections never interleave.
    let first_task = lines[0].split(':').nth(1).unwrap();
    let other_task = if first_task == "x" { "y" } else { "x" };
    assert_eq!(lines[1], format!("end:{first_task}"));
    assert_eq!(lines[2], format!("start:{other_task}"));
    assert_eq!(lines[3], format!("end:{other_task}"));
}
