//! Locating an installed compiler implementation.
//!
//! Providers are probed in order of preference; the first one that loads
//! wins and no further candidates are tried.

use std::sync::Arc;

use tracing::debug;

use crate::compiler::SassCompiler;
use crate::error::Error;

/// One way of obtaining a [`SassCompiler`].
pub trait CompilerProvider: Send + Sync {
    /// Candidate name, used in the missing-dependency message.
    fn name(&self) -> &'static str;

    /// Attempt to locate this implementation.
    fn load(&self) -> Option<Arc<dyn SassCompiler>>;
}

/// Resolve the first available compiler from `providers`.
///
/// Fails with [`Error::MissingDependency`] naming every candidate when none
/// of them loads.
pub fn resolve(providers: &[Arc<dyn CompilerProvider>]) -> Result<Arc<dyn SassCompiler>, Error> {
    for provider in providers {
        match provider.load() {
            Some(compiler) => {
                debug!(compiler = provider.name(), "resolved SASS compiler");
                return Ok(compiler);
            }
            None => {
                debug!(candidate = provider.name(), "SASS compiler not available");
            }
        }
    }

    Err(Error::MissingDependency {
        candidates: providers.iter().map(|p| p.name().to_string()).collect(),
    })
}

/// The built-in candidate list, in preference order: in-process grass when
/// the `grass-compiler` feature is on, then an installed dart-sass CLI.
pub fn default_providers() -> Vec<Arc<dyn CompilerProvider>> {
    let mut providers: Vec<Arc<dyn CompilerProvider>> = Vec::new();
    #[cfg(feature = "grass-compiler")]
    providers.push(Arc::new(crate::providers::grass::GrassProvider));
    providers.push(Arc::new(crate::providers::dart_sass::DartSassProvider));
    providers
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable(&'static str);

    impl CompilerProvider for Unavailable {
        fn name(&self) -> &'static str {
            self.0
        }

        fn load(&self) -> Option<Arc<dyn SassCompiler>> {
            None
        }
    }

    #[test]
    fn no_candidates_is_a_missing_dependency() {
        let providers: Vec<Arc<dyn CompilerProvider>> =
            vec![Arc::new(Unavailable("node-sass")), Arc::new(Unavailable("sass"))];
        let err = resolve(&providers).err().unwrap();
        match err {
            Error::MissingDependency { ref candidates } => {
                assert_eq!(candidates, &["node-sass", "sass"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        let message = err.to_string();
        assert!(message.contains("\"node-sass\""), "{message}");
        assert!(message.contains("\"sass\""), "{message}");
    }
}
