//! End-to-end tests through the in-process grass compiler, including import
//! tracking against a real fixture tree.

#![cfg(feature = "grass-compiler")]

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use sassifrage::providers::grass::GrassProvider;
use sassifrage::{Error, RenderQueue, SassImporter, SassOptions, SassPlugin, TransformContext};

fn grass_plugin(options: SassOptions) -> SassPlugin {
    SassPlugin::with_providers(
        options,
        vec![Arc::new(GrassProvider)],
        Arc::new(RenderQueue::new(2)),
    )
}

#[test_log::test(tokio::test)]
async fn compiles_scss_and_tracks_imports() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dep.scss"), ".dep { color: blue; }").unwrap();
    let id = Utf8PathBuf::from_path_buf(dir.path().join("main.scss")).unwrap();

    let mut ctx = TransformContext::new(id);
    let output = grass_plugin(SassOptions::default())
        .process(&mut ctx, "@import \"dep\";\n.main { color: red; }")
        .await
        .unwrap();

    assert!(output.code.contains(".dep"), "{}", output.code);
    assert!(output.code.contains(".main"), "{}", output.code);
    assert!(
        ctx.dependencies
            .iter()
            .any(|path| path.as_str().ends_with("dep.scss")),
        "dependencies: {:?}",
        ctx.dependencies
    );
}

#[test_log::test(tokio::test)]
async fn indented_dialect_comes_from_the_extension() {
    let mut ctx = TransformContext::new("style.sass");
    let output = grass_plugin(SassOptions::default())
        .process(&mut ctx, "a\n  color: red\n")
        .await
        .unwrap();
    assert!(output.code.contains("color: red"), "{}", output.code);
}

#[test_log::test(tokio::test)]
async fn data_prefix_defines_variables_for_the_source() {
    let options = SassOptions {
        data: "$accent: #ff0000;".to_string(),
        ..Default::default()
    };
    let mut ctx = TransformContext::new("style.scss");
    let output = grass_plugin(options)
        .process(&mut ctx, ".a { color: $accent; }")
        .await
        .unwrap();
    assert!(output.code.contains("ff0000"), "{}", output.code);
}

#[test_log::test(tokio::test)]
async fn importers_override_the_filesystem() {
    struct ThemeImporter;

    impl SassImporter for ThemeImporter {
        fn resolve(&self, path: &Utf8Path) -> Option<String> {
            path.as_str()
                .ends_with("theme.scss")
                .then(|| ".theme { color: green; }".to_string())
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let id = Utf8PathBuf::from_path_buf(dir.path().join("main.scss")).unwrap();
    let options = SassOptions {
        importers: vec![Arc::new(ThemeImporter)],
        ..Default::default()
    };

    let mut ctx = TransformContext::new(id);
    let output = grass_plugin(options)
        .process(&mut ctx, "@import \"theme\";")
        .await
        .unwrap();

    assert!(output.code.contains(".theme"), "{}", output.code);
    assert!(
        ctx.dependencies
            .iter()
            .any(|path| path.as_str().ends_with("theme.scss")),
        "dependencies: {:?}",
        ctx.dependencies
    );
}

#[test_log::test(tokio::test)]
async fn grass_errors_surface_as_compile_errors() {
    let mut ctx = TransformContext::new("style.scss");
    let err = grass_plugin(SassOptions::default())
        .process(&mut ctx, ".a { color: $undefined; }")
        .await
        .unwrap_err();

    match err {
        Error::Compile(e) => {
            assert!(
                e.message.to_lowercase().contains("undefined"),
                "{}",
                e.message
            );
            assert_eq!(e.file.as_deref(), Some(Utf8Path::new("style.scss")));
        }
        other => panic!("expected a compile error, got: {other}"),
    }
}

#[test_log::test(tokio::test)]
async fn passthrough_style_reaches_the_compiler() {
    let options = SassOptions {
        passthrough: [("style".to_string(), "compressed".to_string())]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let mut ctx = TransformContext::new("style.scss");
    let output = grass_plugin(options)
        .process(&mut ctx, ".a {\n  color: red;\n}\n")
        .await
        .unwrap();
    // Compressed output stays on one line.
    assert!(!output.code.trim().contains('\n'), "{}", output.code);
}
