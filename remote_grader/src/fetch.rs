//! Remote-copy gateway.
//!
//! The transport is an external collaborator: its exit status is the sole
//! signal, there is no retry, and a hung host blocks the calling thread.

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, info};

use crate::error::{GradingError, Result};

/// Seam for pulling a candidate's submission tree onto local disk.
pub trait Fetcher {
    /// Recursively copies `remote_path` on `host` into `local_dest`,
    /// creating the destination first.
    fn fetch(&self, host: &str, remote_path: &str, local_dest: &Path) -> Result<()>;
}

/// Production fetcher shelling out to `scp -r`.
#[derive(Debug, Clone)]
pub struct ScpFetcher {
    ssh_user: String,
    identity_file: PathBuf,
}

impl ScpFetcher {
    pub fn new(ssh_user: String, identity_file: PathBuf) -> Self {
        Self {
            ssh_user,
            identity_file,
        }
    }

    fn remote_target(&self, host: &str, remote_path: &str) -> String {
        format!("{}@{host}:{remote_path}", self.ssh_user)
    }
}

impl Fetcher for ScpFetcher {
    fn fetch(&self, host: &str, remote_path: &str, local_dest: &Path) -> Result<()> {
        fs::create_dir_all(local_dest)?;
        let remote = self.remote_target(host, remote_path);
        info!("Pulling code from {remote}...");

        let output = Command::new("scp")
            .arg("-i")
            .arg(&self.identity_file)
            .arg("-r")
            .arg(&remote)
            .arg(local_dest)
            .output()
            .map_err(|err| GradingError::Fetch {
                host: host.to_string(),
                reason: format!("unable to run scp: {err}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let reason = if stderr.is_empty() {
                format!("scp exited with {}", output.status)
            } else {
                stderr.to_string()
            };
            return Err(GradingError::Fetch {
                host: host.to_string(),
                reason,
            });
        }
        debug!("fetched {remote} into {}", local_dest.display());
        Ok(())
    }
}
