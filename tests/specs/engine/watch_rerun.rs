//! Editing a watched path restarts the task that declares it (§8).

use crate::prelude::*;
use std::io::{BufRead, BufReader};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn editing_a_watched_file_triggers_a_rerun() {
    let project = Project::new(
        r#"
apiVersion: kit/v1
kind: Tasks
metadata:
  name: watched
spec:
  tasks:
    server:
      type: service
      sh: "echo run-marker; sleep 30"
      watch: [config.txt]
"#,
    );
    project.file("config.txt", "v1");

    let mut child = project
        .kit_raw_with_watch()
        .arg("server")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn kit");

    let stdout = child.stdout.take().expect("piped stdout");
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let collector = lines.clone();
    std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            collector.lock().unwrap().push(line);
        }
    });

    let run_count = |lines: &Arc<Mutex<Vec<String>>>| {
        lines.lock().unwrap().iter().filter(|l| l.contains("run-marker")).count()
    };

    assert!(
        wait_for(Duration::from_secs(5), || run_count(&lines) >= 1),
        "expected the initial run to start"
    );

    project.file("config.txt", "v2");

    assert!(
        wait_for(Duration::from_secs(5), || run_count(&lines) >= 2),
        "expected editing the watched file to trigger a second run, saw: {:?}",
        lines.lock().unwrap()
    );

    let _ = child.kill();
    let _ = child.wait();
}
