//! The transform bridge: the plugin surface a bundler host calls into.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use tracing::debug;

use crate::compiler::{self, RenderOptions, SassImporter};
use crate::error::Error;
use crate::queue::RenderQueue;
use crate::resolver::{self, CompilerProvider};

/// Files this plugin is responsible for.
static FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(sass|scss)$").unwrap());

/// Option keys the bridge always computes itself; same-named passthrough
/// entries are discarded.
const RESERVED_KEYS: [&str; 5] = ["file", "data", "indented_syntax", "source_map", "importer"];

/// Caller configuration for the plugin.
#[derive(Clone, Default)]
pub struct SassOptions {
    /// Prepended to every file's source before compilation, e.g. shared
    /// variable definitions.
    pub data: String,
    /// Import-resolution hooks, consulted before the filesystem.
    pub importers: Vec<Arc<dyn SassImporter>>,
    /// Remaining options, forwarded to the compiler unmodified.
    pub passthrough: BTreeMap<String, String>,
}

/// Per-file state supplied by the host for one transform call.
pub struct TransformContext {
    /// Source file path; decides the syntax mode and the compiler's `file`.
    pub id: Utf8PathBuf,
    /// Whether the host wants a source map.
    pub source_map: bool,
    /// Files this transform depends on; the host watches these.
    pub dependencies: BTreeSet<Utf8PathBuf>,
}

impl TransformContext {
    pub fn new(id: impl Into<Utf8PathBuf>) -> Self {
        Self {
            id: id.into(),
            source_map: false,
            dependencies: BTreeSet::new(),
        }
    }
}

/// Successful transform payload handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Compiled CSS.
    pub code: String,
    /// Serialized source map, when one was produced.
    pub map: Option<String>,
}

/// SASS/SCSS transform plugin.
pub struct SassPlugin {
    options: SassOptions,
    providers: Vec<Arc<dyn CompilerProvider>>,
    queue: Arc<RenderQueue>,
}

impl SassPlugin {
    /// Plugin name, as registered with the host.
    pub const NAME: &'static str = "sass";

    /// Plugin with the built-in providers and the process-wide queue.
    pub fn new(options: SassOptions) -> Self {
        Self::with_providers(options, resolver::default_providers(), RenderQueue::shared())
    }

    /// Plugin with an explicit provider list and queue, for hosts that
    /// manage their own lifecycles and for tests.
    pub fn with_providers(
        options: SassOptions,
        providers: Vec<Arc<dyn CompilerProvider>>,
        queue: Arc<RenderQueue>,
    ) -> Self {
        Self {
            options,
            providers,
            queue,
        }
    }

    /// Whether `id` is a file this plugin transforms.
    pub fn matches(id: &Utf8Path) -> bool {
        FILE_PATTERN.is_match(id.as_str())
    }

    /// Transform one SASS/SCSS file into CSS.
    ///
    /// Resolves a compiler up front, before anything is queued, so a missing
    /// installation fails fast. The render then waits for a queue slot, and
    /// on success every file the compiler read is recorded into
    /// `ctx.dependencies`. Compiler failures propagate unchanged.
    pub async fn process(
        &self,
        ctx: &mut TransformContext,
        code: &str,
    ) -> Result<TransformOutput, Error> {
        let compiler = resolver::resolve(&self.providers)?;
        let options = assemble_options(&self.options, &ctx.id, ctx.source_map, code);

        debug!(file = %ctx.id, compiler = compiler.name(), "queueing SASS render");
        let result = self
            .queue
            .submit(compiler::render(compiler.as_ref(), options))
            .await?;

        for file in result.included_files {
            ctx.dependencies.insert(file);
        }

        Ok(TransformOutput {
            code: result.css,
            map: result.map,
        })
    }
}

/// Build the compiler options for one job.
///
/// Pure function of its inputs: `data` is the caller prefix followed by the
/// source, the dialect comes from the file extension, and computed values
/// win over same-named passthrough entries.
fn assemble_options(
    options: &SassOptions,
    id: &Utf8Path,
    source_map: bool,
    code: &str,
) -> RenderOptions {
    let mut data = String::with_capacity(options.data.len() + code.len());
    data.push_str(&options.data);
    data.push_str(code);

    let mut passthrough = options.passthrough.clone();
    for key in RESERVED_KEYS {
        passthrough.remove(key);
    }

    RenderOptions {
        file: id.to_owned(),
        data,
        indented_syntax: is_indented(id),
        source_map,
        importers: options.importers.clone(),
        passthrough,
    }
}

/// `.sass` selects the whitespace-significant indented dialect.
fn is_indented(id: &Utf8Path) -> bool {
    id.extension() == Some("sass")
}
