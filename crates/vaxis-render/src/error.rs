//! Renderer-side error types (§7).

use std::fmt;

/// Failure writing a frame to the terminal, or attempting an operation a
/// capability query found unsupported.
#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    CapabilityMissing(&'static str),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "write failed: {e}"),
            RenderError::CapabilityMissing(name) => write!(f, "terminal does not support {name}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
            RenderError::CapabilityMissing(_) => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}
