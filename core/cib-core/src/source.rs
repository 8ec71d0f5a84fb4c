//! Where the CIB comes from: a saved file or the live cluster.
//!
//! Either path either yields a whole parsed [`Document`] or a single error;
//! callers never see a partial model.

use fs_err as fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::document::Document;
use crate::error::{CibError, Result};

/// Default location of the Pacemaker CIB query tool.
pub const DEFAULT_CIBADMIN: &str = "/usr/sbin/cibadmin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CibSource {
    /// A file saved with `cibadmin --query > cib.xml`.
    File(PathBuf),
    /// A command whose stdout is the CIB.
    Command { program: PathBuf, args: Vec<String> },
}

impl Default for CibSource {
    fn default() -> Self {
        CibSource::cibadmin()
    }
}

impl CibSource {
    /// `cibadmin --query` at its standard location.
    pub fn cibadmin() -> Self {
        CibSource::Command {
            program: PathBuf::from(DEFAULT_CIBADMIN),
            args: vec!["--query".to_string()],
        }
    }

    /// Obtains and parses the document.
    pub fn load(&self) -> Result<Document> {
        let xml = self.read()?;
        Document::parse(&xml)
    }

    /// Obtains the raw XML text.
    pub fn read(&self) -> Result<String> {
        match self {
            CibSource::File(path) => {
                debug!(path = %path.display(), "Reading CIB from file");
                fs::read_to_string(path).map_err(|source| CibError::Io {
                    context: "reading CIB file".to_string(),
                    source,
                })
            }
            CibSource::Command { program, args } => read_from_command(program, args),
        }
    }

    /// Human-readable description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            CibSource::File(path) => path.display().to_string(),
            CibSource::Command { program, args } => command_line(program, args),
        }
    }
}

fn read_from_command(program: &Path, args: &[String]) -> Result<String> {
    let command = command_line(program, args);
    debug!(command = %command, "Querying CIB");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| CibError::Io {
            context: format!("running {}", command),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CibError::CommandFailed {
            command,
            details: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    if output.stdout.is_empty() {
        return Err(CibError::EmptyOutput { command });
    }

    String::from_utf8(output.stdout).map_err(|err| {
        CibError::MalformedDocument(format!("output of {} is not UTF-8: {}", command, err))
    })
}

fn command_line(program: &Path, args: &[String]) -> String {
    std::iter::once(program.display().to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}
