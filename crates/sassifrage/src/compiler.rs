//! The compiler seam: what an installed SASS implementation must expose.
//!
//! Compilers are callback-style by contract. [`render`] is the single place
//! that shape is bridged into a future; everything past it is callback-free.

use std::collections::BTreeMap;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tokio::sync::oneshot;

use crate::error::CompileError;

/// A caller-supplied hook that can satisfy an import from somewhere other
/// than the real filesystem.
///
/// Importers are consulted in order, before the filesystem. Returning `None`
/// falls through to the next importer and finally to disk.
pub trait SassImporter: Send + Sync {
    /// Resolve `path` to stylesheet contents, or `None` to fall through.
    fn resolve(&self, path: &Utf8Path) -> Option<String>;
}

/// Options for one render, assembled by the transform bridge.
#[derive(Clone, Default)]
pub struct RenderOptions {
    /// Source file path, used for import resolution and error attribution.
    pub file: Utf8PathBuf,
    /// Full input: the caller's data prefix followed by the file's source.
    pub data: String,
    /// Whether `data` is the whitespace-significant indented dialect.
    pub indented_syntax: bool,
    /// Whether the host asked for a source map.
    pub source_map: bool,
    /// Import-resolution hooks; never absent, empty by default.
    pub importers: Vec<Arc<dyn SassImporter>>,
    /// Remaining caller options, forwarded to the compiler unmodified.
    pub passthrough: BTreeMap<String, String>,
}

/// Output of a successful render.
#[derive(Debug, Clone, Default)]
pub struct RenderResult {
    /// Compiled CSS.
    pub css: String,
    /// Serialized source map, when the compiler produced one.
    pub map: Option<String>,
    /// Every file the compiler read while resolving imports.
    pub included_files: Vec<Utf8PathBuf>,
}

/// Completion callback for [`SassCompiler::render`]. Invoked exactly once.
pub type RenderCallback = Box<dyn FnOnce(Result<RenderResult, CompileError>) + Send + 'static>;

/// An installed SASS implementation.
pub trait SassCompiler: Send + Sync {
    /// Human-readable name, matching the provider that loaded it.
    fn name(&self) -> &'static str;

    /// Compile `options.data` and call `done` with the outcome.
    ///
    /// Must not block the calling thread: implementations offload CPU work
    /// to the blocking pool or a child process before completing. Callers
    /// must be inside a tokio runtime.
    fn render(&self, options: RenderOptions, done: RenderCallback);
}

/// Bridge a callback-style render into an awaitable result.
pub async fn render(
    compiler: &dyn SassCompiler,
    options: RenderOptions,
) -> Result<RenderResult, CompileError> {
    let (tx, rx) = oneshot::channel();
    compiler.render(
        options,
        Box::new(move |outcome| {
            // The caller may have gone away; nothing to do then.
            let _ = tx.send(outcome);
        }),
    );
    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => Err(CompileError::message(
            "compiler dropped the render callback without completing",
        )),
    }
}
