use super::{BackendError, Invocation, LyricsBackend, RawAttempt, SearchMode};
use crate::config::BackendConfig;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs the `syncedlyrics` command line tool once per invocation.
#[derive(Debug, Clone)]
pub struct SyncedLyricsCli {
    program: String,
    verbose: bool,
    timeout: Option<Duration>,
}

impl SyncedLyricsCli {
    pub fn new(cfg: &BackendConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            verbose: cfg.verbose,
            timeout: cfg.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Arguments for one lookup, program name excluded.
    pub fn args(&self, inv: &Invocation) -> Vec<String> {
        let mut args = Vec::new();
        if self.verbose {
            args.push("-v".to_string());
        }
        args.push(inv.query.clone());
        if let Some(lang) = &inv.language {
            args.push("--lang".to_string());
            args.push(lang.clone());
        }
        for p in &inv.providers {
            args.push("--provider".to_string());
            args.push(p.name().to_string());
        }
        args.push(
            match inv.mode {
                SearchMode::SyncedOnly => "--synced-only",
                SearchMode::PlainOnly => "--plain-only",
            }
            .to_string(),
        );
        if inv.enhanced {
            args.push("--enhanced".to_string());
        }
        args
    }
}

#[async_trait]
impl LyricsBackend for SyncedLyricsCli {
    async fn invoke(&self, inv: &Invocation) -> Result<RawAttempt, BackendError> {
        let args = self.args(inv);
        tracing::debug!("running {} {:?}", self.program, args);

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let output = cmd.output();

        let output = match self.timeout {
            Some(after) => tokio::time::timeout(after, output)
                .await
                .map_err(|_| BackendError::Timeout {
                    program: self.program.clone(),
                    after,
                })?,
            None => output.await,
        }
        .map_err(|source| BackendError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            tracing::warn!("{} exited with {} for '{}'", self.program, output.status, inv.query);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !diagnostics.is_empty() {
            tracing::info!("[{} logs for '{}']:\n{}", self.program, inv.query, diagnostics);
        }

        Ok(RawAttempt { stdout, diagnostics })
    }
}
