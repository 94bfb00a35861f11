//! Generator backed by an external program.
//!
//! The program runs once per item. It receives the item text on stdin and
//! these environment variables:
//!
//! - `VOXQUEUE_ITEM_ID` - item id
//! - `VOXQUEUE_OUTPUT` - where to write the audio
//! - `VOXQUEUE_ENGINE` - generation engine
//! - `VOXQUEUE_VOICE_MODE` - `predefined` or `clone`
//! - `VOXQUEUE_VOICE` - voice name, clone profile id or reference audio path
//! - `VOXQUEUE_SETTINGS` - settings as a JSON object
//!
//! The last non-empty line on stdout must be the audio duration in seconds.

use crate::config::GeneratorConfig;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use voxqueue_lib::{CloneSource, GeneratedAudio, Generator, QueueItem, VoiceSelection};

const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone)]
pub(crate) struct CommandGenerator {
    program: PathBuf,
    args: Vec<String>,
    output_dir: PathBuf,
    extension: String,
}

impl CommandGenerator {
    pub(crate) fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let Some(program) = config.program.clone() else {
            bail!("No generator program configured. Pass --program or set [generator].program");
        };
        Ok(Self {
            program,
            args: config.args.clone(),
            output_dir: config.output_dir.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
        })
    }

    pub(crate) fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn output_path(&self, item: &QueueItem) -> PathBuf {
        if self.extension.is_empty() {
            self.output_dir.join(item.id.to_string())
        } else {
            self.output_dir.join(format!("{}.{}", item.id, self.extension))
        }
    }

    fn command(&self, item: &QueueItem, output: &Path) -> Result<Command> {
        let voice = match &item.voice {
            VoiceSelection::Predefined { name } => name.clone(),
            VoiceSelection::Clone {
                source: CloneSource::Profile(id),
            } => id.clone(),
            VoiceSelection::Clone {
                source: CloneSource::ReferenceAudio(path),
            } => path.display().to_string(),
        };
        let settings = serde_json::to_string(&item.settings).context("Failed to encode settings")?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env("VOXQUEUE_ITEM_ID", item.id.to_string())
            .env("VOXQUEUE_OUTPUT", output)
            .env("VOXQUEUE_ENGINE", &item.engine)
            .env("VOXQUEUE_VOICE_MODE", item.voice.mode().as_str())
            .env("VOXQUEUE_VOICE", voice)
            .env("VOXQUEUE_SETTINGS", settings)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Ok(command)
    }
}

#[async_trait]
impl Generator for CommandGenerator {
    async fn generate(&self, item: &QueueItem) -> Result<GeneratedAudio> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        let output = self.output_path(item);
        let mut child = self
            .command(item, &output)?
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        let stdin = child.stdin.take();
        let text = item.text.clone();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // The program may exit without reading its input.
                let _ = stdin.write_all(text.as_bytes()).await;
                let _ = stdin.shutdown().await;
            }
        };
        let ((), result) = tokio::join!(feed, child.wait_with_output());
        let result = result.context("Failed to wait for generator program")?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!(
                "generator exited with {}: {}",
                result.status,
                stderr_tail(&stderr, STDERR_TAIL_LINES)
            );
        }

        let stdout = String::from_utf8_lossy(&result.stdout);
        let duration = parse_duration(&stdout)?;
        if !output.is_file() {
            bail!("generator did not write {}", output.display());
        }

        tracing::debug!(item = %item.id, path = %output.display(), duration, "Generator finished");
        Ok(GeneratedAudio::new(output, duration))
    }
}

/// Reads the duration from the last non-empty stdout line.
fn parse_duration(stdout: &str) -> Result<f64> {
    let Some(line) = stdout.lines().rev().map(str::trim).find(|l| !l.is_empty()) else {
        bail!("generator printed no duration");
    };
    let duration: f64 = line
        .parse()
        .with_context(|| format!("generator printed an invalid duration: {line:?}"))?;
    if !duration.is_finite() || duration < 0.0 {
        bail!("generator printed an invalid duration: {line:?}");
    }
    Ok(duration)
}

fn stderr_tail(stderr: &str, lines: usize) -> String {
    let tail: Vec<&str> = stderr
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    let start = tail.len().saturating_sub(lines);
    if tail.is_empty() {
        "no error output".to_string()
    } else {
        tail[start..].join(" | ")
    }
}
