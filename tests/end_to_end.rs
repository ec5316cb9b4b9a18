// tests/end_to_end.rs

//! Full launch + supervise runs with real child processes.

use std::time::Duration;

use jobflow::check;
use jobflow::jobfile::JobSpec;
use jobflow::report::Reporter;
use jobflow::run::{launch_jobs, supervise};
use jobflow::signals::ShutdownFlag;
use jobflow_test_utils::builders::JobSpecBuilder;
use jobflow_test_utils::init_tracing;
use tempfile::TempDir;
use tokio::time::timeout;

/// Validate, launch and supervise `specs`, returning the status lines.
///
/// The timeout turns a hung pipeline (e.g. a leaked pipe descriptor keeping
/// a reader from seeing EOF) into a test failure instead of a hang.
async fn run_jobs(specs: Vec<JobSpec>, shutdown: ShutdownFlag, secs: u64) -> Vec<String> {
    let mut reporter = Reporter::new(Vec::new());
    let jobs = check::check_jobs(specs, &mut reporter).unwrap();
    let launched = launch_jobs(jobs).unwrap();

    timeout(
        Duration::from_secs(secs),
        supervise(launched, shutdown, &mut reporter),
    )
    .await
    .expect("supervisor did not finish in time")
    .unwrap();

    String::from_utf8(reporter.into_inner())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn pipeline_flows_end_to_end_and_sees_eof() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("out.txt");

    // echo hello -> @a -> cat -> @b -> cat -> out.txt
    let specs = vec![
        JobSpecBuilder::new("echo").arg("hello").writes_pipe("a").build(),
        JobSpecBuilder::new("cat").reads_pipe("a").writes_pipe("b").build(),
        JobSpecBuilder::new("cat")
            .reads_pipe("b")
            .writes_file(&out_path)
            .build(),
    ];

    let lines = run_jobs(specs, ShutdownFlag::new(), 10).await;

    assert!(lines.contains(&"Job 1 exited with status 0".to_string()));
    assert!(lines.contains(&"Job 2 exited with status 0".to_string()));
    assert!(lines.contains(&"Job 3 exited with status 0".to_string()));

    assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "hello\n");
}

#[tokio::test]
async fn file_input_and_output_are_wired_through() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let in_path = dir.path().join("in.txt");
    let out_path = dir.path().join("out.txt");
    std::fs::write(&in_path, "line one\nline two\n").unwrap();

    let specs = vec![
        JobSpecBuilder::new("cat")
            .reads_file(&in_path)
            .writes_file(&out_path)
            .build(),
    ];

    let lines = run_jobs(specs, ShutdownFlag::new(), 10).await;

    assert_eq!(lines, vec!["Job 1 exited with status 0".to_string()]);
    assert_eq!(
        std::fs::read_to_string(&out_path).unwrap(),
        "line one\nline two\n"
    );
}

#[tokio::test]
async fn nonzero_exit_status_is_reported_as_is() {
    init_tracing();
    let specs = vec![JobSpecBuilder::new("sh").arg("-c").arg("exit 3").build()];

    let lines = run_jobs(specs, ShutdownFlag::new(), 10).await;
    assert_eq!(lines, vec!["Job 1 exited with status 3".to_string()]);
}

#[tokio::test]
async fn unlaunchable_program_reports_the_reserved_status() {
    init_tracing();
    let specs = vec![
        JobSpecBuilder::new("definitely-not-a-real-program-xyz").build(),
        JobSpecBuilder::new("true").build(),
    ];

    let lines = run_jobs(specs, ShutdownFlag::new(), 10).await;

    assert!(lines.contains(&"Job 1 exited with status 255".to_string()));
    assert!(lines.contains(&"Job 2 exited with status 0".to_string()));
}

#[tokio::test]
async fn disabled_job_does_not_stop_an_unrelated_sibling() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing-input.txt");
    let out_path = dir.path().join("survivor.txt");

    let specs = vec![
        JobSpecBuilder::new("cat").reads_file(&missing).build(),
        JobSpecBuilder::new("echo")
            .arg("ran")
            .writes_file(&out_path)
            .build(),
    ];

    let lines = run_jobs(specs, ShutdownFlag::new(), 10).await;

    // Job 1 never ran, so the only completion line belongs to job 2, which
    // keeps its original index.
    assert_eq!(
        lines,
        vec![
            format!("Unable to open \"{}\" for reading", missing.display()),
            "Job 2 exited with status 0".to_string(),
        ]
    );
    assert_eq!(std::fs::read_to_string(&out_path).unwrap(), "ran\n");
}
