use std::path::Path;
use std::process::{Command, Output};

/// Run the CLI binary with arguments and an isolated HOME, so the test
/// never touches the developer's real configuration.
pub fn run_cli_with_env(args: &[&str], home: &Path, store_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kartotek"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    // Set the store via environment if the command doesn't name one
    if !args.contains(&"--store") {
        cmd.env("KARTOTEK_STORE", store_url);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI with a custom HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, store_url: &str) -> String {
    let output = run_cli_with_env(args, home, store_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}
