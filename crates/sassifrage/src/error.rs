//! Error types for the transform pipeline.

use camino::Utf8PathBuf;

/// A failure reported by the external SASS compiler.
///
/// Carried through to the caller verbatim: downstream tooling (editors,
/// build logs) relies on the compiler's original message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    /// The compiler's own message, unmodified.
    pub message: String,
    /// File the compiler attributes the failure to, when known.
    pub file: Option<Utf8PathBuf>,
    /// 1-based line within `file`, when the compiler reported one.
    pub line: Option<u32>,
    /// 1-based column within `line`, when the compiler reported one.
    pub column: Option<u32>,
}

impl CompileError {
    /// A location-free error with the given message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }
}

/// Errors that can surface from a transform call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No supported compiler implementation could be located. Fatal for the
    /// triggering call; raised before any job is queued.
    #[error(
        "you need to install one of the following packages: {} in order to process SASS files",
        quoted_list(.candidates)
    )]
    MissingDependency {
        /// Candidate names that were tried, in preference order.
        candidates: Vec<String>,
    },

    /// The compiler rejected the input; surfaced unchanged.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_names_every_candidate() {
        let err = Error::MissingDependency {
            candidates: vec!["grass".to_string(), "dart-sass".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("\"grass\", \"dart-sass\""), "{message}");
        assert!(message.contains("install one of the following packages"));
    }

    #[test]
    fn compile_errors_display_the_original_message() {
        let err: Error = CompileError::message("Undefined variable.").into();
        assert_eq!(err.to_string(), "Undefined variable.");
    }
}
