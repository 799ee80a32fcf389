//! Definition generation
//!
//! Generating a definition is slow and may fail, so the repository never does
//! it. Callers ask a [`DefinitionGenerator`] first and hand the resulting text
//! to `add_card`/`update_card`.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use thiserror::Error;

use crate::config::GeneratorConfig;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No definition generator configured")]
    NotConfigured,

    #[error("Failed to run generator: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Generator exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("Generator returned an empty definition")]
    EmptyOutput,

    #[error("Generator timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Generator timeout must be at least one second")]
    InvalidTimeout,
}

pub type Result<T> = std::result::Result<T, GenerationError>;

pub trait DefinitionGenerator {
    fn generate_definition(&self, term: &str) -> Result<String>;
}

/// Runs an external program with the term on stdin and takes its stdout as
/// the definition.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let program = config
            .command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::NotConfigured)?;
        if config.timeout_secs == 0 {
            return Err(GenerationError::InvalidTimeout);
        }
        Ok(Self::new(
            program,
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }

    /// Feed the term to the child and collect everything it prints. Stdin is
    /// written while the output is being read, so neither side can stall the
    /// other on a full pipe.
    async fn exchange(&self, term: &str) -> Result<Output> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take();
        let input = format!("{}\n", term);
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // A generator that ignores stdin may already have exited.
                match stdin.write_all(input.as_bytes()).await {
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        fed?;
        Ok(output?)
    }
}

impl DefinitionGenerator for CommandGenerator {
    /// Blocks on a private current-thread runtime, so this must not be called
    /// from inside another tokio runtime.
    fn generate_definition(&self, term: &str) -> Result<String> {
        log::debug!("Generating definition for \"{}\" with {}", term, self.program);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        // Dropping the exchange on timeout drops the child, which kills it.
        let output = runtime
            .block_on(tokio::time::timeout(self.timeout, self.exchange(term)))
            .map_err(|_| {
                log::warn!("Generator {} timed out for \"{}\"", self.program, term);
                GenerationError::TimedOut(self.timeout)
            })??;

        if !output.status.success() {
            return Err(GenerationError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let definition = stdout.trim();
        if definition.is_empty() {
            return Err(GenerationError::EmptyOutput);
        }
        Ok(definition.to_string())
    }
}
