//! Replay a recorded generator transcript through the pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tokio::io::AsyncReadExt;

use crate::adapters::{InMemoryFileModel, TracingFileModel};
use crate::artifact::{Artifact, FileNode};
use crate::config::ControllerConfig;
use crate::error::SessionError;
use crate::session::{SessionController, SessionOutcome};
use crate::traits::SessionHandlers;
use crate::transport;

use super::args::ReplayArgs;

/// Handlers that narrate the session through `tracing`.
#[derive(Debug, Default)]
pub struct LoggingHandlers {
    thinking_len: usize,
}

impl SessionHandlers for LoggingHandlers {
    fn on_thinking(&mut self, text: &str) {
        if text.is_empty() && self.thinking_len > 0 {
            tracing::info!(chars = self.thinking_len, "preamble finished");
        }
        self.thinking_len = text.chars().count();
        tracing::trace!(chars = self.thinking_len, "thinking");
    }

    fn on_artifact_start(&mut self) {
        tracing::info!("artifact started");
    }

    fn on_artifact_end(&mut self, artifact: &Artifact) {
        tracing::info!(files = artifact.files.len(), title = ?artifact.title, "artifact finished");
    }

    fn on_file_start(&mut self, file: &FileNode, _artifact: &Artifact) {
        tracing::info!(path = %file.path, "writing file");
    }

    fn on_error(&mut self, error: &SessionError) {
        tracing::error!(category = %error.category(), "{}", error.reason());
    }

    fn on_end(&mut self) {
        tracing::info!("stream finished");
    }
}

async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .wrap_err("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Replay the input and return the final file list held by the model.
pub async fn run_replay(args: &ReplayArgs) -> Result<Vec<FileNode>> {
    let text = read_input(args.input.as_deref()).await?;

    let mut config = ControllerConfig::from_env();
    if let Some(ms) = args.settle_ms {
        config = config.with_settle_window(Duration::from_millis(ms));
    }

    let model = InMemoryFileModel::new();
    let controller = SessionController::with_config(
        config,
        Arc::new(TracingFileModel::new(model.clone())),
    );
    let stream = transport::replay(text, args.chunk_size, Duration::from_millis(args.delay_ms));

    match controller.run(stream, LoggingHandlers::default()).await {
        SessionOutcome::Completed => Ok(model.files()),
        SessionOutcome::Failed(err) => Err(eyre!(err).wrap_err("replay failed")),
        SessionOutcome::Rejected => Err(eyre!("controller already busy")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_replay_file_produces_final_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Planning…<artifact title=\"demo\"><file path=\"a.ts\">const a = 1;</file>\
             <file path=\"b.ts\">export {{}};</file></artifact>"
        )
        .unwrap();

        let args = ReplayArgs {
            input: Some(file.path().to_path_buf()),
            chunk_size: 5,
            delay_ms: 0,
            settle_ms: Some(1),
        };
        let files = run_replay(&args).await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].content, "const a = 1;");
        assert_eq!(files[1].content, "export {};");
        assert!(files.iter().all(FileNode::is_complete));
    }

    #[tokio::test]
    async fn test_replay_reports_structural_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<artifact><file path=\"a.ts\">oops").unwrap();

        let args = ReplayArgs {
            input: Some(file.path().to_path_buf()),
            delay_ms: 0,
            ..ReplayArgs::default()
        };
        let err = run_replay(&args).await.unwrap_err();
        assert!(format!("{:?}", err).contains("a.ts"));
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let args = ReplayArgs {
            input: Some("/definitely/not/here.txt".into()),
            ..ReplayArgs::default()
        };
        assert!(run_replay(&args).await.is_err());
    }
}
