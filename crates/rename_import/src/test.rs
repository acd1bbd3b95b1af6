use std::path::PathBuf;

use logger::VecLogger;
use pretty_assertions::assert_eq;
use swc_utils_print::normalise_src;
use test_tmpdir::{test_tmpdir, TmpDir};

use crate::{Platform, RenameImportError, RenameImportOptions, RenameImportSession};

fn fixture() -> TmpDir {
    test_tmpdir!(
        "src/pages/index.js" => "",
        "src/utils/helper.js" => "",
        "node_modules/some-pkg/package.json" => r#"{ "main": "lib/index.js" }"#,
        "node_modules/some-pkg/lib/index.js" => "",
    )
}

fn options(tmp: &TmpDir) -> RenameImportOptions {
    RenameImportOptions::new(
        tmp.root(),
        tmp.root_join("dist"),
        vec![tmp.root_join("node_modules")],
        Platform::Wechat,
    )
    .unwrap()
    .with_source_path(tmp.root_join("src"))
    .unwrap()
}

fn normalised(expected: &str) -> String {
    normalise_src("expected.js", expected, Default::default())
}

#[test]
fn test_rewrites_module_for_output_layout() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let output = session
        .transform_source(
            &tmp.root_join("src/pages/index.js"),
            r#"
            import { createElement } from 'rax';
            import modal from '@weex-module/modal';
            import helper from '../utils/helper';
            import pkg from 'some-pkg';
            const name = '../utils/helper';
            const loaded = require(name);
            const again = require('some-pkg');
            "#,
        )
        .unwrap();

    assert_eq!(
        output,
        normalised(
            r#"
            import { createElement } from "../npm/jsx2mp-runtime";
            import helper from "../utils/helper.js";
            import pkg from "../npm/some-pkg/lib/index.js";
            const name = '../utils/helper';
            const loaded = null;
            const again = require("../npm/some-pkg/lib/index.js");
            "#
        )
    );
    assert!(session.ledger().is_rewritten("../npm/jsx2mp-runtime"));
    assert!(session
        .ledger()
        .is_rewritten("../npm/some-pkg/lib/index.js"));
    // local rewrites are not recorded
    assert!(!session.ledger().is_rewritten("../utils/helper.js"));
}

#[test]
fn test_unanalyzable_require_warns_once() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);
    let path = tmp.root_join("src/pages/index.js");

    let output = session
        .transform_source(
            &path,
            "import { createElement } from 'rax';\nconst name = '../utils/helper';\nconst loaded = require(name);\n",
        )
        .unwrap();
    drop(session);

    assert!(output.contains("const loaded = null;"));
    assert_eq!(
        logger.get_logs().unwrap(),
        vec![format!(
            "WARN: {}:3:15 :: Critical requirement of \"require(name)\" cannot be resolved statically and has been replaced with null",
            path.display()
        )]
    );
}

#[test]
fn test_unanalyzable_argument_shapes() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let output = session
        .transform_source(
            &tmp.root_join("src/pages/index.js"),
            r#"
            const a = require(`../utils/${name}`);
            const b = require('../utils/' + name);
            const c = require(name);
            "#,
        )
        .unwrap();
    drop(session);

    assert_eq!(
        output,
        normalised(
            r#"
            const a = null;
            const b = null;
            const c = null;
            "#
        )
    );
    assert_eq!(logger.get_logs().unwrap().len(), 3);
}

#[test]
fn test_excluded_modules() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let output = session
        .transform_source(
            &tmp.root_join("src/pages/index.js"),
            r#"
            import modal from '@weex-module/modal';
            export * from '@weex-project/shared';
            export { x } from '@weex-module/x';
            const stream = require('@weex-module/stream');
            call(require('@weex-project/y').z);
            "#,
        )
        .unwrap();
    drop(session);

    assert_eq!(
        output,
        normalised(
            r#"
            const stream = null;
            call(null.z);
            "#
        )
    );
    // excluded requires are not a warning
    assert_eq!(logger.get_logs().unwrap(), Vec::<String>::new());
}

#[test]
fn test_re_exports() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let output = session
        .transform_source(
            &tmp.root_join("src/pages/index.js"),
            r#"
            export * from '../utils/helper';
            export { createElement } from 'rax';
            export { default as pkg } from 'some-pkg';
            export { local };
            "#,
        )
        .unwrap();

    assert_eq!(
        output,
        normalised(
            r#"
            export * from "../utils/helper.js";
            export { createElement } from "../npm/jsx2mp-runtime";
            export { default as pkg } from "../npm/some-pkg/lib/index.js";
            export { local };
            "#
        )
    );
}

#[test]
fn test_untouched_call_shapes() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let src = r#"
        foo('some-pkg');
        const two = require('some-pkg', 'extra');
        const member = module.require('some-pkg');
        const spread = require(...args);
        const lazy = import('some-pkg');
        "#;
    let output = session
        .transform_source(&tmp.root_join("src/pages/index.js"), src)
        .unwrap();
    drop(session);

    assert_eq!(output, normalised(src));
    assert_eq!(logger.get_logs().unwrap(), Vec::<String>::new());
}

#[test]
fn test_nested_requires() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let output = session
        .transform_source(
            &tmp.root_join("src/pages/index.js"),
            r#"
            function load() {
                return cond ? require('rax') : { helper: require(('../utils/helper')) };
            }
            "#,
        )
        .unwrap();

    assert_eq!(
        output,
        normalised(
            r#"
            function load() {
                return cond ? require("../npm/jsx2mp-runtime") : { helper: require("../utils/helper.js") };
            }
            "#
        )
    );
}

#[test]
fn test_copy_disabled() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session =
        RenameImportSession::new(options(&tmp).with_disable_copy_npm(true), &logger);

    let output = session
        .transform_source(
            &tmp.root_join("src/pages/index.js"),
            r#"
            import { createElement } from 'rax';
            import pkg from 'some-pkg';
            import missing from 'not-installed';
            const runtime = require('jsx2mp-runtime');
            "#,
        )
        .unwrap();

    assert_eq!(
        output,
        normalised(
            r#"
            import { createElement } from "jsx2mp-runtime/dist/jsx2mp-runtime.wechat.esm";
            import pkg from 'some-pkg';
            import missing from 'not-installed';
            const runtime = require("jsx2mp-runtime");
            "#
        )
    );
}

#[test]
fn test_missing_package_is_an_error() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let result = session.transform_source(
        &tmp.root_join("src/pages/index.js"),
        r#"
        import pkg from 'not-installed';
        import other from 'some-pkg';
        "#,
    );
    match result {
        Err(RenameImportError::Resolution { specifier, file, .. }) => {
            assert_eq!(specifier, "not-installed");
            assert_eq!(file, tmp.root_join("src/pages/index.js"));
        }
        other => panic!("expected a resolution error, got {:?}", other),
    }
    // nothing after the failure was rewritten
    assert!(session.ledger().is_empty());
}

#[test]
fn test_missing_local_file_is_an_error() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let result = session.transform_source(
        &tmp.root_join("src/pages/index.js"),
        "const x = require('./does-not-exist');",
    );
    assert!(matches!(
        result,
        Err(RenameImportError::Resolution { specifier, .. }) if specifier == "./does-not-exist"
    ));
}

#[test]
fn test_parse_error() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let result = session.transform_source(&tmp.root_join("src/pages/index.js"), "import from;");
    assert!(matches!(result, Err(RenameImportError::Parse { .. })));
}

#[test]
fn test_second_pass_over_requires_is_stable() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);
    let path = tmp.root_join("src/pages/index.js");

    let first = session
        .transform_source(
            &path,
            r#"
            const rax = require('rax');
            const pkg = require('some-pkg');
            const helper = require('../utils/helper');
            "#,
        )
        .unwrap();
    let second = session.transform_source(&path, &first).unwrap();

    assert_eq!(first, second);
}

// The ledger is shared by every file of a session and never cleared, so a
// local require in another file that happens to spell an emitted value is
// skipped rather than resolved.
#[test]
fn test_ledger_entries_are_visible_to_later_files() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    session
        .transform_source(
            &tmp.root_join("src/pages/index.js"),
            "const pkg = require('some-pkg');",
        )
        .unwrap();

    let src = "const pkg = require('../npm/some-pkg/lib/index.js');";
    let output = session
        .transform_source(&tmp.root_join("src/other/index.js"), src)
        .unwrap();
    assert_eq!(output, normalised(src));

    // a fresh session has no such entry and fails to resolve it
    let fresh = RenameImportSession::new(options(&tmp), &logger);
    assert!(matches!(
        fresh.transform_source(&tmp.root_join("src/other/index.js"), src),
        Err(RenameImportError::Resolution { .. })
    ));
}

#[test]
fn test_transform_file_reads_from_disk() {
    let tmp = test_tmpdir!(
        "src/app.js" => "import { createElement } from 'rax';",
    );
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    assert_eq!(
        session.transform_file(&tmp.root_join("src/app.js")).unwrap(),
        normalised(r#"import { createElement } from "./npm/jsx2mp-runtime";"#)
    );
    assert!(matches!(
        session.transform_file(&tmp.root_join("src/missing.js")),
        Err(RenameImportError::Io { .. })
    ));
}

#[test]
fn test_explicit_dist_path() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    // emitted one level deeper than the source layout implies
    let output = session
        .transform_source_to(
            &tmp.root_join("src/pages/index.js"),
            &tmp.root_join("dist/pages/home/index.js"),
            "import pkg from 'some-pkg';",
        )
        .unwrap();
    assert_eq!(
        output,
        normalised(r#"import pkg from "../../npm/some-pkg/lib/index.js";"#)
    );
}

#[test]
fn test_transform_files_in_parallel() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let src = "import pkg from 'some-pkg';";
    let files: Vec<(PathBuf, String)> = ["src/pages/a.js", "src/pages/b.js", "src/c.js"]
        .iter()
        .map(|path| (tmp.root_join(path), src.to_string()))
        .collect();

    let outputs = session.transform_files(files).unwrap();

    assert_eq!(
        outputs,
        vec![
            (
                tmp.root_join("src/pages/a.js"),
                normalised(r#"import pkg from "../npm/some-pkg/lib/index.js";"#)
            ),
            (
                tmp.root_join("src/pages/b.js"),
                normalised(r#"import pkg from "../npm/some-pkg/lib/index.js";"#)
            ),
            (
                tmp.root_join("src/c.js"),
                normalised(r#"import pkg from "./npm/some-pkg/lib/index.js";"#)
            ),
        ]
    );
    assert_eq!(session.ledger().len(), 2);
}

#[test]
fn test_transform_files_reports_failing_file() {
    let tmp = fixture();
    let logger = VecLogger::new();
    let session = RenameImportSession::new(options(&tmp), &logger);

    let files = vec![
        (tmp.root_join("src/ok.js"), "import pkg from 'some-pkg';".to_string()),
        (
            tmp.root_join("src/broken.js"),
            "import pkg from 'not-installed';".to_string(),
        ),
    ];
    let err = session.transform_files(files).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.js"));
}

#[test]
fn test_session_from_json() {
    let tmp = fixture();
    let config = serde_json::json!({
        "nodeModulesPathList": [tmp.root_join("node_modules")],
        "rootContext": tmp.root(),
        "outputPath": tmp.root_join("dist"),
        "sourcePath": tmp.root_join("src"),
        "platform": "bytedance",
        "disableCopyNpm": true,
    });
    let session = RenameImportSession::from_json(&config.to_string()).unwrap();

    assert_eq!(session.options().platform, Platform::Bytedance);
    assert_eq!(
        session
            .transform_source(
                &tmp.root_join("src/pages/index.js"),
                "import { createElement } from 'rax';"
            )
            .unwrap(),
        normalised(
            r#"import { createElement } from "jsx2mp-runtime/dist/jsx2mp-runtime.bytedance.esm";"#
        )
    );
}
