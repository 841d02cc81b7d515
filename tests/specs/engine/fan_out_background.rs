//! A background `Service` upstream releases its dependent once running,
//! and the run terminates once every non-background task is done (§8).

use crate::prelude::*;

#[test]
fn dependent_job_runs_while_background_service_stays_up() {
    let project = Project::new(
        r#"
apiVersion: kit/v1
kind: Tasks
metadata:
  name: fanout
spec:
  tasks:
    db:
      type: service
      sh: "sleep 30"
    api:
      sh: "echo api-ran"
      dependencies: [db]
"#,
    );

    let assert = project.kit().arg("api").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("api-ran"));
}
