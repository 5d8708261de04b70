// Command line behaviour of the runtime binary

use std::process::Command;

#[test]
fn invalid_config_exits_with_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_tankdrive-runtime"))
        .args(["--simulate", "--tick-ms", "0"])
        .output()
        .expect("runtime binary should start");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid configuration"), "stderr: {stderr}");
}
