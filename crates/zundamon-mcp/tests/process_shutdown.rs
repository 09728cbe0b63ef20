//! Signal handling of the real binary.
#![cfg(unix)]

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_sigterm_exits_while_stdin_stays_open() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_zundamon-mcp"))
        .args(["--no-log-file", "--log-level", "info"])
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Keep the write end open and silent for the whole test.
    let _stdin = child.stdin.take().unwrap();

    let mut lines = BufReader::new(child.stderr.take().unwrap()).lines();
    let ready = lines
        .by_ref()
        .map_while(Result::ok)
        .any(|line| line.contains("Waiting for client"));
    assert!(ready, "server never reported it was waiting");
    let drain = thread::spawn(move || lines.map_while(Result::ok).count());

    // Let the session install its signal handlers.
    thread::sleep(Duration::from_millis(300));
    let killed = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() > deadline {
            break None;
        }
        thread::sleep(Duration::from_millis(50));
    };

    let Some(status) = status else {
        let _ = child.kill();
        let _ = child.wait();
        panic!("process still running 5s after SIGTERM");
    };
    assert!(status.success(), "exit status {status}");
    drain.join().unwrap();
}
