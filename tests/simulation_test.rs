use std::process::{Command, Output};

fn run_simulator(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_traffic_simulator"))
        .args(args)
        .env("RUST_LOG", "warn,traffic_simulator=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Parse the number logged after `label`, skipping the log prefix
fn logged_value<T: std::str::FromStr>(stderr: &str, label: &str) -> T {
    let line = stderr
        .lines()
        .find(|line| line.contains(label))
        .unwrap_or_else(|| panic!("Could not find '{}' line", label));

    let parts: Vec<&str> = line.split(label).collect();
    parts
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| panic!("Could not parse value from line: {}", line))
}

/// Test that the simulation runs headless without crashing
#[test]
fn test_headless_simulation_runs() {
    let output = run_simulator(&["--ticks", "40"]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
}

/// Test that simulation statistics are logged
#[test]
fn test_simulation_statistics_logged() {
    let output = run_simulator(&["--ticks", "40", "--delta", "0.05"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    for label in [
        "Elapsed time:",
        "Total crossings:",
        "Total connections:",
        "Stopped vehicles:",
        "Average speed:",
    ] {
        assert!(stderr.contains(label), "Missing '{}' statistic", label);
    }

    assert_eq!(logged_value::<u64>(&stderr, "Ticks:"), 40);
    assert_eq!(logged_value::<usize>(&stderr, "Vehicles:"), 7);
    assert_eq!(logged_value::<usize>(&stderr, "Total crossings:"), 6);
}

/// Test that vehicle reports are logged at the configured interval
#[test]
fn test_vehicle_reports_logged() {
    let output = run_simulator(&["--ticks", "20", "--delta", "0.1", "--log-interval", "1.0"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let reports = stderr.lines().filter(|line| line.contains("--- t=")).count();
    assert_eq!(reports, 2, "stderr: {}", stderr);
    assert!(stderr.contains("Vehicle "));
}

/// Test that the map is printed on stdout
#[test]
fn test_map_printed() {
    let output = run_simulator(&["--ticks", "5"]);
    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Legend:"));
    assert!(stdout.contains('V'));
}

/// Test that a seeded run is reproducible
#[test]
fn test_seeded_runs_match() {
    let first = run_simulator(&["--ticks", "30", "--seed", "11"]);
    let second = run_simulator(&["--ticks", "30", "--seed", "11"]);
    assert!(first.status.success() && second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

/// Test that a negative interval is refused
#[test]
fn test_negative_delta_rejected() {
    let output = run_simulator(&["--ticks", "5", "--delta=-1"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid time interval"), "stderr: {}", stderr);
}

/// Test that a long tick completes without sleeping
#[test]
fn test_long_delta_completes() {
    let output = run_simulator(&["--ticks", "2", "--delta", "1e6"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        logged_value::<u64>(&String::from_utf8_lossy(&output.stderr), "Ticks:"),
        2
    );
}

/// Test that realtime mode refuses a delta it cannot sleep for
#[test]
fn test_realtime_rejects_unsleepable_delta() {
    let output = run_simulator(&["--ticks", "1", "--delta", "1e300", "--realtime"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--realtime"), "stderr: {}", stderr);
    assert!(!stderr.contains("panicked"), "stderr: {}", stderr);
}
