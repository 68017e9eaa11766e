use super::{BackgroundRemover, CACHE_DIR_ENV, RemovalError, RemovalFuture};
use std::{fmt, io, path::PathBuf, process::Stdio};
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::debug;

/// Runs an external program that reads an image on stdin and writes the
/// background-removed PNG to stdout, e.g. `rembg i - -`.
#[derive(Debug, Clone)]
pub struct CommandRemover {
    program: String,
    args: Vec<String>,
    cache_dir: Option<PathBuf>,
}

impl CommandRemover {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cache_dir: None,
        }
    }

    /// Exports `dir` to the child process as its inference cache directory.
    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }

    async fn run(&self, input: Vec<u8>) -> Result<Vec<u8>, RemovalError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The child dies with the request that started it
            .kill_on_drop(true);
        if let Some(dir) = &self.cache_dir {
            command.env(CACHE_DIR_ENV, dir);
        }

        let mut child = command.spawn().map_err(|source| RemovalError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("remover stdin was not captured"))?;

        // Write stdin while collecting output so a child that writes before it has
        // read everything cannot stall. Dropping stdin sends EOF.
        let write = async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        };
        let (write_result, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(RemovalError::Exited {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(RemovalError::EmptyOutput);
        }
        write_result?;

        debug!("Remover produced {} output bytes", output.stdout.len());

        Ok(output.stdout)
    }
}

impl fmt::Display for CommandRemover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl BackgroundRemover for CommandRemover {
    fn remove(&self, input: Vec<u8>) -> RemovalFuture<'_> {
        Box::pin(self.run(input))
    }
}
