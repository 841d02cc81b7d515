//! A task with targets newer than every watched input is skipped; a task
//! whose target is stale runs (§8).

use crate::prelude::*;
use std::thread::sleep;
use std::time::Duration;

#[test]
fn fresh_target_skips_the_run() {
    let project = Project::new(
        r#"
apiVersion: kit/v1
kind: Tasks
metadata:
  name: skip
spec:
  tasks:
    build:
      sh: "echo compiling >> build.log; touch out.o"
      watch: [in.c]
      targets: [out.o]
"#,
    );

    project.file("in.c", "int main() {}");
    sleep(Duration::from_millis(30));
    project.file("out.o", "stale-binary-bytes");

    project.kit().arg("build").assert().success();

    assert!(!project.exists("build.log"), "a fresh target should skip the run entirely");
}

#[test]
fn stale_target_triggers_a_run() {
    let project = Project::new(
        r#"
apiVersion: kit/v1
kind: Tasks
metadata:
  name: rebuild
spec:
  tasks:
    build:
      sh: "echo compiling >> build.log; touch out.o"
      watch: [in.c]
      targets: [out.o]
"#,
    );

    project.file("out.o", "stale-binary-bytes");
    sleep(Duration::from_millis(30));
    project.file("in.c", "int main() {}");

    project.kit().arg("build").assert().success();

    assert!(project.exists("build.log"), "a stale target should trigger the run");
}
