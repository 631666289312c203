use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// Not every test binary uses every helper
#[allow(dead_code)]
pub struct TestContext {
    pub _temp_dir: TempDir,
    pub config_path: PathBuf,
    pub home_dir: PathBuf,
    pub work_dir: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config").join("config.json");
        let home_dir = temp_dir.path().join("home");
        let work_dir = temp_dir.path().join("work");
        std::fs::create_dir_all(&home_dir).expect("Failed to create home dir");
        std::fs::create_dir_all(&work_dir).expect("Failed to create work dir");

        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_goupdate"));

        Self {
            _temp_dir: temp_dir,
            config_path,
            home_dir,
            work_dir,
            bin_path,
        }
    }

    /// Command isolated from the user's config, home and Go installation.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.current_dir(&self.work_dir);
        cmd.env("GOUPDATE_CONFIG_PATH", &self.config_path);
        cmd.env("GOUPDATE_GO_BINARY", self.work_dir.join("no-such-go"));
        cmd.env("GOUPDATE_DELAY_SECS", "0");
        cmd.env("HOME", &self.home_dir);
        cmd.env("XDG_CONFIG_HOME", self.home_dir.join(".config"));
        cmd.env_remove("GOUPDATE_SOURCE_URL");
        cmd.env_remove("GOUPDATE_INSTALL_ROOT");
        cmd.env_remove("GOUPDATE_GOPROXY");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Installs a fake `go` executable that reports `version`.
    #[cfg(unix)]
    pub fn fake_go(&self, version: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.home_dir.join("fake-go");
        let script = format!(
            "#!/bin/sh\necho \"go version {} linux/amd64\"\n",
            version
        );
        std::fs::write(&path, script).expect("Failed to write fake go");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake go");
        path
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_failure(&self) -> &Self {
        if self.status.success() {
            panic!(
                "Command unexpectedly succeeded\nstdout: {}\nstderr: {}",
                self.stdout, self.stderr
            );
        }
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}

/// Gzipped tarball shaped like a Go release: everything below `go/`.
#[allow(dead_code)]
pub fn go_release_archive(version: &str) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let files: [(&str, Vec<u8>, u32); 3] = [
        ("go/VERSION", format!("{}\n", version).into_bytes(), 0o644),
        (
            "go/bin/go",
            format!("#!/bin/sh\necho \"go version {} linux/amd64\"\n", version).into_bytes(),
            0o755,
        ),
        ("go/src/README.md", b"sources\n".to_vec(), 0o600),
    ];

    for (name, content, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(mode);
        builder
            .append_data(&mut header, name, content.as_slice())
            .expect("Failed to append tar entry");
    }

    builder
        .into_inner()
        .and_then(|gz| gz.finish())
        .expect("Failed to finish archive")
}

#[allow(dead_code)]
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    hex::encode(Sha256::digest(bytes))
}

/// Download page with a single linux/amd64 archive row.
#[allow(dead_code)]
pub fn index_page(version: &str, checksum: &str) -> String {
    format!(
        r#"<html><body><table class="downloadtable">
<tr class="first"><th>File name</th><th>Kind</th><th>SHA256 Checksum</th></tr>
<tr class="highlight">
  <td class="filename"><a class="download" href="/dl/{version}.linux-amd64.tar.gz">{version}.linux-amd64.tar.gz</a></td>
  <td>Archive</td>
  <td><tt>{checksum}</tt></td>
</tr>
</table></body></html>"#
    )
}

#[cfg(unix)]
#[allow(dead_code)]
pub fn file_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .expect("Failed to stat file")
        .permissions()
        .mode()
        & 0o777
}
