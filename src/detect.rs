use std::process::Command;

/// Asks the installed toolchain for its version. Any failure means no
/// toolchain is installed.
pub fn detect_local_version(go_binary: &str) -> Option<String> {
    let output = match Command::new(go_binary).arg("version").output() {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("Could not run '{} version': {}", go_binary, e);
            return None;
        }
    };

    if !output.status.success() {
        tracing::debug!(
            "'{} version' exited with {:?}",
            go_binary,
            output.status.code()
        );
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = parse_version_output(&stdout);
    if version.is_none() {
        tracing::debug!("Unrecognized version output: {}", stdout.trim());
    }
    version
}

/// `go version go1.21.0 linux/amd64` -> `go1.21.0`
pub fn parse_version_output(output: &str) -> Option<String> {
    output.split_whitespace().nth(2).map(str::to_string)
}
