use std::process::Command;

const NAMES: [&str; 4] = ["Max", "Jameson", "Gabe", "Chaden"];

fn run(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_random-chooser");
    Command::new(bin).args(args).output().unwrap()
}

fn picks(out: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .filter(|l| NAMES.contains(l))
        .map(ToString::to_string)
        .collect()
}

#[test]
fn prints_one_name_per_spin() {
    let out = run(&["--headless", "--spins", "3", "--seed", "7", "--tick-ms", "1"]);
    assert!(out.status.success());
    let names = picks(&out);
    assert_eq!(names.len(), 3);
    // 每轮都停在名单末尾，揭晓时排除末尾那人
    assert!(!names.iter().any(|n| n == "Chaden"));
}

#[test]
fn same_seed_same_picks() {
    let args = ["--headless", "--spins", "4", "--seed", "42", "--tick-ms", "1"];
    let first = run(&args);
    let second = run(&args);
    assert!(first.status.success() && second.status.success());
    assert_eq!(picks(&first), picks(&second));
}

#[test]
fn invalid_override_exits_with_error() {
    let out = run(&["--headless", "--tick-ms", "0"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("tick_interval_ms"));
}
