//! Compilation via an installed dart-sass command-line executable.
//!
//! Loads only when a `sass` binary is found on `PATH`, which makes it a real
//! second candidate behind grass: probing fails cleanly on machines without
//! dart-sass installed.

use std::env;
use std::process::Stdio;
use std::sync::Arc;

use camino::Utf8PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::compiler::{RenderCallback, RenderOptions, RenderResult, SassCompiler};
use crate::error::CompileError;
use crate::resolver::CompilerProvider;

/// Executable name probed for on `PATH`.
#[cfg(target_os = "windows")]
const SASS_BINARY: &str = "sass.bat";
#[cfg(not(target_os = "windows"))]
const SASS_BINARY: &str = "sass";

/// Provider for an externally installed dart-sass CLI.
pub struct DartSassProvider;

impl CompilerProvider for DartSassProvider {
    fn name(&self) -> &'static str {
        "dart-sass"
    }

    fn load(&self) -> Option<Arc<dyn SassCompiler>> {
        let binary = find_in_path(SASS_BINARY)?;
        Some(Arc::new(DartSassCompiler { binary }))
    }
}

/// Locate `name` in the `PATH` environment variable.
fn find_in_path(name: &str) -> Option<Utf8PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .and_then(|found| Utf8PathBuf::from_path_buf(found).ok())
}

/// [`SassCompiler`] that pipes the input through a dart-sass process.
pub struct DartSassCompiler {
    binary: Utf8PathBuf,
}

impl SassCompiler for DartSassCompiler {
    fn name(&self) -> &'static str {
        "dart-sass"
    }

    fn render(&self, options: RenderOptions, done: RenderCallback) {
        let binary = self.binary.clone();
        tokio::spawn(async move { done(compile(binary, options).await) });
    }
}

async fn compile(
    binary: Utf8PathBuf,
    options: RenderOptions,
) -> Result<RenderResult, CompileError> {
    let mut cmd = Command::new(binary.as_std_path());
    cmd.arg("--stdin").arg("--no-source-map");
    if options.indented_syntax {
        cmd.arg("--indented");
    }
    if let Some(parent) = options.file.parent().filter(|p| !p.as_str().is_empty()) {
        cmd.arg("--load-path").arg(parent.as_std_path());
    }
    if let Some(style) = options.passthrough.get("style") {
        cmd.arg(format!("--style={style}"));
    }
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| CompileError::message(format!("failed to spawn {binary}: {e}")))?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| CompileError::message("sass process has no stdin"))?;
    stdin
        .write_all(options.data.as_bytes())
        .await
        .map_err(|e| CompileError::message(format!("failed to write to sass stdin: {e}")))?;
    drop(stdin);

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| CompileError::message(format!("failed to wait for sass: {e}")))?;

    if output.status.success() {
        Ok(RenderResult {
            css: String::from_utf8_lossy(&output.stdout).into_owned(),
            map: None,
            // A single-shot stdin invocation does not report loaded files;
            // the grass provider is preferred and does track includes.
            included_files: Vec::new(),
        })
    } else {
        Err(CompileError {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            file: Some(options.file),
            line: None,
            column: None,
        })
    }
}
