//! External parser process.
//!
//! The parser is any program that reads a cell's source on stdin and prints
//! one JSON object `{source?, tokens, ast}` on stdout (`null` or `[]` for a
//! blank cell). One process runs per request.

use crate::config::{Config, ParserConfig, TokenConfig};
use crate::tree::CellTree;
use crate::zip::{zip_output, ParseOutput, ZipError};
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to spawn parser '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to parser: {0}")]
    Io(#[from] std::io::Error),

    #[error("parser exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },

    #[error("failed to decode parser output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Zip(#[from] ZipError),
}

#[derive(Debug, Clone)]
pub struct ParserProcess {
    parser: ParserConfig,
    tokens: TokenConfig,
}

impl ParserProcess {
    pub fn new(config: &Config) -> Self {
        Self {
            parser: config.parser.clone(),
            tokens: config.tokens.clone(),
        }
    }

    /// Run the parser on `source`. `None` means the parser saw a blank cell.
    ///
    /// Lines are rebased to zero, and `source` is attached when the parser
    /// does not echo it.
    pub async fn parse(&self, source: &str) -> Result<Option<ParseOutput>, BackendError> {
        let program = &self.parser.program;
        log::debug!("spawning parser {program} {:?}", self.parser.args);
        let mut child = Command::new(program)
            .args(&self.parser.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: program.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("parser stdin was not captured"))?;
        let input = source.as_bytes().to_vec();
        let write = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(BackendError::Exit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(mut parsed) = ParseOutput::from_json(&stdout)? else {
            log::debug!("parser reported a blank cell");
            return Ok(None);
        };
        parsed.rebase_lines(self.parser.line_base);
        if parsed.source.is_none() {
            parsed.source = Some(source.to_string());
        }
        log::debug!("parser returned {} token(s)", parsed.tokens.len());
        Ok(Some(parsed))
    }

    /// Parse and zip `source` into a tree.
    pub async fn zip(&self, source: &str) -> Result<CellTree, BackendError> {
        match self.parse(source).await? {
            Some(output) => Ok(zip_output(output, &self.tokens)?),
            None => Ok(CellTree::Empty),
        }
    }
}
