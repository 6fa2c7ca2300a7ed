use crate::config::credentials::{Credentials, KEY_VAR, USERNAME_VAR};
use crate::core::Publisher;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// 透過 kaggle CLI 建立新的資料集版本
pub struct KaggleCliPublisher {
    credentials: Credentials,
    program: String,
}

impl KaggleCliPublisher {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            program: "kaggle".to_string(),
        }
    }

    /// 指定執行檔路徑，例如虛擬環境中的 kaggle
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self, dir: &Path, version_notes: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("datasets")
            .arg("version")
            .arg("-p")
            .arg(dir)
            .arg("-m")
            .arg(version_notes)
            .env(USERNAME_VAR, &self.credentials.username)
            .env(KEY_VAR, &self.credentials.key);
        cmd
    }
}

#[async_trait]
impl Publisher for KaggleCliPublisher {
    async fn publish(&self, dir: &Path, version_notes: &str) -> Result<()> {
        tracing::info!("🚀 Uploading new dataset version from {}", dir.display());

        let output = self
            .command(dir, version_notes)
            .output()
            .await
            .map_err(|e| EtlError::PublishError {
                message: format!("could not run {}: {}", self.program, e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!("kaggle: {}", line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EtlError::PublishError {
                message: format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            });
        }

        tracing::info!("✅ New dataset version has been published");
        Ok(())
    }
}

/// 只記錄不上傳
pub struct DryRunPublisher;

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, dir: &Path, version_notes: &str) -> Result<()> {
        tracing::info!(
            "📦 Skipping upload of {} (notes: {})",
            dir.display(),
            version_notes
        );
        Ok(())
    }
}
