//! SASS/SCSS transform plugin with a bounded render queue.
//!
//! sassifrage adapts an externally installed SASS compiler to an asset
//! pipeline's async transform contract. It resolves a compiler from an
//! ordered candidate list at runtime, caps concurrent renders at
//! `threadpool − 1` so one worker thread stays free for filesystem tasks,
//! and reports every file a render read back to the host for watching.
//!
//! The compilation itself is delegated: by default to the in-process
//! `grass` compiler, falling back to a dart-sass executable found on
//! `PATH`. When neither is available, transforms fail with a message naming
//! the candidates.
//!
//! ```no_run
//! use sassifrage::{SassOptions, SassPlugin, TransformContext};
//!
//! # async fn demo() -> Result<(), sassifrage::Error> {
//! let plugin = SassPlugin::new(SassOptions::default());
//! let mut ctx = TransformContext::new("styles/site.scss");
//! let output = plugin.process(&mut ctx, "a { color: red }").await?;
//! println!("{}", output.code);
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod error;
pub mod providers;
pub mod queue;
pub mod resolver;
pub mod transform;

pub use compiler::{RenderCallback, RenderOptions, RenderResult, SassCompiler, SassImporter};
pub use error::{CompileError, Error};
pub use queue::RenderQueue;
pub use resolver::CompilerProvider;
pub use transform::{SassOptions, SassPlugin, TransformContext, TransformOutput};
