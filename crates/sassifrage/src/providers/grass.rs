//! In-process compilation backed by the `grass` crate.
//!
//! grass has no callback of its own; the render contract is satisfied by
//! running the compile on the blocking pool and completing the callback from
//! there. Included files are captured by wrapping the filesystem grass sees.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use camino::{Utf8Path, Utf8PathBuf};

use crate::compiler::{RenderCallback, RenderOptions, RenderResult, SassCompiler, SassImporter};
use crate::error::CompileError;
use crate::resolver::CompilerProvider;

/// Provider for the in-process grass compiler.
///
/// Always loads when the `grass-compiler` feature is enabled; there is
/// nothing external to probe for.
pub struct GrassProvider;

impl CompilerProvider for GrassProvider {
    fn name(&self) -> &'static str {
        "grass"
    }

    fn load(&self) -> Option<Arc<dyn SassCompiler>> {
        Some(Arc::new(GrassCompiler))
    }
}

/// [`SassCompiler`] backed by grass.
pub struct GrassCompiler;

impl SassCompiler for GrassCompiler {
    fn name(&self) -> &'static str {
        "grass"
    }

    fn render(&self, options: RenderOptions, done: RenderCallback) {
        // grass is synchronous CPU work; keep it off the async runtime.
        tokio::task::spawn_blocking(move || done(compile(options)));
    }
}

fn compile(options: RenderOptions) -> Result<RenderResult, CompileError> {
    let RenderOptions {
        file,
        data,
        indented_syntax,
        importers,
        passthrough,
        ..
    } = options;

    let syntax = if indented_syntax {
        ::grass::InputSyntax::Sass
    } else {
        ::grass::InputSyntax::Scss
    };

    let fs = TrackingFs::new(importers);
    let mut grass_options = ::grass::Options::default().fs(&fs).input_syntax(syntax);
    if let Some(parent) = file.parent().filter(|p| !p.as_str().is_empty()) {
        grass_options = grass_options.load_path(parent.as_std_path());
    }
    match passthrough.get("style").map(String::as_str) {
        Some("compressed") => grass_options = grass_options.style(::grass::OutputStyle::Compressed),
        Some("expanded") => grass_options = grass_options.style(::grass::OutputStyle::Expanded),
        _ => {}
    }

    match ::grass::from_string(data, &grass_options) {
        Ok(css) => Ok(RenderResult {
            css,
            // grass does not produce source maps
            map: None,
            included_files: fs.included(),
        }),
        Err(e) => Err(CompileError {
            message: e.to_string(),
            file: Some(file),
            line: None,
            column: None,
        }),
    }
}

/// Filesystem handed to grass: consults caller importers first, then the
/// real filesystem, recording every path that was actually read.
struct TrackingFs {
    importers: Vec<Arc<dyn SassImporter>>,
    read: Mutex<BTreeSet<Utf8PathBuf>>,
}

impl TrackingFs {
    fn new(importers: Vec<Arc<dyn SassImporter>>) -> Self {
        Self {
            importers,
            read: Mutex::new(BTreeSet::new()),
        }
    }

    fn imported(&self, path: &Path) -> Option<String> {
        let path = Utf8Path::from_path(path)?;
        self.importers.iter().find_map(|i| i.resolve(path))
    }

    fn record(&self, path: &Path) {
        if let Some(path) = Utf8Path::from_path(path) {
            self.read.lock().unwrap().insert(path.to_owned());
        }
    }

    fn included(&self) -> Vec<Utf8PathBuf> {
        self.read.lock().unwrap().iter().cloned().collect()
    }
}

impl std::fmt::Debug for TrackingFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingFs")
            .field("importers", &self.importers.len())
            .field("read", &self.read)
            .finish()
    }
}

impl ::grass::Fs for TrackingFs {
    fn is_dir(&self, path: &Path) -> bool {
        ::grass::StdFs.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.imported(path).is_some() || ::grass::StdFs.is_file(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if let Some(contents) = self.imported(path) {
            self.record(path);
            return Ok(contents.into_bytes());
        }
        let contents = ::grass::StdFs.read(path)?;
        self.record(path);
        Ok(contents)
    }
}
