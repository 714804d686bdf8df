//! End-to-end runs over report files on disk

use localizer::binary::{DefinedSymbol, ObjectSymbols};
use localizer::{
    AnalysisConfig, Analyzer, IngestMode, LinkRecorder, LocalizerError, SharedLibraryPolicy,
    Warning,
};
use std::fs;
use std::path::{Path, PathBuf};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn analyzer(config: AnalysisConfig) -> Analyzer {
    Analyzer::new(config).unwrap()
}

#[test]
fn unused_export_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "reports/ld.1.json",
        r#"{"exports": [{"file": "/src/a.c", "name": "foo"}], "imports": [], "global_exports": []}"#,
    );

    let report = analyzer(AnalysisConfig::default())
        .analyze_paths(&[dir.path().join("reports")])
        .unwrap();

    assert_eq!(report.invocations, 1);
    assert_eq!(report.candidate_lines(), vec!["foo (/src/a.c)"]);
}

#[test]
fn import_from_another_link_clears_candidate() {
    let dir = tempfile::tempdir().unwrap();
    let reports = dir.path().join("reports");
    write(
        &reports,
        "ld.1.json",
        r#"{"exports": [{"file": "/src/a.c", "name": "foo"}], "imports": [], "global_exports": []}"#,
    );
    write(
        &reports,
        "ld.2.json",
        r#"{"exports": [], "imports": [{"file": "/src/b.c", "name": "foo"}], "global_exports": []}"#,
    );

    let report = analyzer(AnalysisConfig::default())
        .analyze_paths(&[reports])
        .unwrap();

    assert!(report.candidates.is_empty());
    assert_eq!(
        report.success_line(),
        "No violations found (in 2 linker invocations)"
    );
}

#[test]
fn header_declarations_exempt_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = write(
        dir.path(),
        "ld.1.json",
        r#"{"exports": [
            {"file": "/src/a.c", "name": "api_init"},
            {"file": "/src/a.c", "name": "API_VERSION_VALUE"},
            {"file": "/src/a.c", "name": "helper"}
        ]}"#,
    );
    write(
        dir.path(),
        "include/api.h",
        "#define API_VERSION API_VERSION_VALUE\nint api_init(void);\n",
    );

    let report = analyzer(AnalysisConfig {
        header_roots: vec![dir.path().join("include")],
        ..Default::default()
    })
    .analyze_paths(&[report_path])
    .unwrap();

    assert_eq!(report.candidate_lines(), vec!["helper (/src/a.c)"]);
}

#[test]
fn system_definitions_are_exempt() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = write(
        dir.path(),
        "ld.1.json",
        r#"{"exports": [
            {"file": "/usr/lib/crt1.o", "name": "_start_helper"},
            {"file": "/opt/sdk/lib.o", "name": "sdk_only"}
        ]}"#,
    );

    let report = analyzer(AnalysisConfig::default())
        .analyze_paths(&[report_path.clone()])
        .unwrap();
    assert_eq!(report.candidate_lines(), vec!["sdk_only (/opt/sdk/lib.o)"]);

    let mut config = AnalysisConfig::default();
    config.policy.system_roots.push("/opt/sdk/".to_string());
    let report = analyzer(config).analyze_paths(&[report_path]).unwrap();
    assert!(report.candidates.is_empty());
}

#[test]
fn strict_mode_fails_on_malformed_report() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "ld.1.json",
        r#"{"exports": [{"file": "/src/a.c", "name": "foo"}]}"#,
    );
    write(dir.path(), "ld.2.json", "{ not json");

    let err = analyzer(AnalysisConfig::default())
        .analyze_paths(&[dir.path().to_path_buf()])
        .unwrap_err();
    assert!(matches!(err, LocalizerError::ReportParse { .. }));
}

#[test]
fn best_effort_mode_skips_malformed_report() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "ld.1.json",
        r#"{"exports": [{"file": "/src/a.c", "name": "foo"}]}"#,
    );
    write(dir.path(), "ld.2.json", "{ not json");

    let report = analyzer(AnalysisConfig {
        ingest_mode: IngestMode::BestEffort,
        ..Default::default()
    })
    .analyze_paths(&[dir.path().to_path_buf()])
    .unwrap();

    assert_eq!(report.invocations, 1);
    assert_eq!(report.candidate_lines(), vec!["foo (/src/a.c)"]);
    assert!(matches!(
        report.warnings.as_slice(),
        [Warning::SkippedReport { .. }]
    ));
}

#[test]
fn missing_report_is_fatal_in_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyzer(AnalysisConfig::default())
        .analyze_paths(&[dir.path().join("absent.json")])
        .unwrap_err();
    assert!(matches!(err, LocalizerError::ReportRead { .. }));
}

#[test]
fn duplicate_definitions_warn_without_changing_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = write(
        dir.path(),
        "ld.1.json",
        r#"{"exports": [
            {"file": "/src/a.c", "name": "dup"},
            {"file": "/src/b.c", "name": "dup"},
            {"file": "/src/a.c", "name": "main"},
            {"file": "/src/b.c", "name": "main"}
        ]}"#,
    );

    let report = analyzer(AnalysisConfig::default())
        .analyze_paths(&[report_path])
        .unwrap();

    assert_eq!(
        report.warnings,
        vec![Warning::DuplicateDefinition {
            symbol: "dup".to_string(),
            origins: vec!["/src/a.c".to_string(), "/src/b.c".to_string()],
        }]
    );
    assert_eq!(
        report.candidate_lines(),
        vec!["dup (/src/a.c)", "main (/src/a.c)"]
    );
}

#[test]
fn repeated_analysis_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..8 {
        write(
            dir.path(),
            &format!("ld.{}.json", i),
            &format!(
                r#"{{"exports": [{{"file": "/src/m{i}.c", "name": "sym{i}"}}],
                    "imports": [{{"file": "/src/m{i}.c", "name": "sym{}"}}]}}"#,
                (i + 1) % 5
            ),
        );
    }

    let analyzer = analyzer(AnalysisConfig::default());
    let first = analyzer.analyze_paths(&[dir.path().to_path_buf()]).unwrap();
    let second = analyzer.analyze_paths(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.invocations, 8);
    // each module imports the symbol of module (i + 1) % 5
    assert_eq!(
        first.candidate_lines(),
        vec!["sym5 (/src/m5.c)", "sym6 (/src/m6.c)", "sym7 (/src/m7.c)"]
    );
}

#[test]
fn recorded_shared_link_feeds_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let objects = vec![
        ObjectSymbols {
            path: "/src/lib.o".to_string(),
            defined: vec![
                DefinedSymbol {
                    name: "lib_entry".to_string(),
                    weak: false,
                    exportable: true,
                },
                DefinedSymbol {
                    name: "lib_internal".to_string(),
                    weak: false,
                    exportable: false,
                },
            ],
            undefined: vec!["util".to_string()],
        },
        ObjectSymbols {
            path: "/src/util.o".to_string(),
            defined: vec![DefinedSymbol {
                name: "util".to_string(),
                weak: false,
                exportable: true,
            }],
            undefined: vec![],
        },
    ];

    let recorded = LinkRecorder::new(true).record_objects(&objects);
    let report_path = dir.path().join("ld.1.json");
    recorded.write_to_file(&report_path).unwrap();

    let conservative = analyzer(AnalysisConfig::default())
        .analyze_paths(&[report_path.clone()])
        .unwrap();
    assert_eq!(
        conservative.candidate_lines(),
        vec!["lib_internal (/src/lib.o)"]
    );

    let mut config = AnalysisConfig::default();
    config.policy.shared_library_policy = SharedLibraryPolicy::Separate;
    let separate = analyzer(config).analyze_paths(&[report_path]).unwrap();

    assert_eq!(
        separate.candidate_lines(),
        vec!["lib_internal (/src/lib.o)"]
    );
    let exposed: Vec<String> = separate
        .shared_library_exposed
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(exposed, vec!["lib_entry (/src/lib.o)"]);
}

#[test]
fn non_ascii_symbol_names_are_analyzed() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = write(
        dir.path(),
        "ld.1.json",
        r#"{"exports": [
            {"file": "/src/a.c", "name": "zéro"},
            {"file": "/src/a.c", "name": "café_count"}
        ],
        "imports": [{"file": "/src/b.c", "name": "café_count"}]}"#,
    );

    let report = analyzer(AnalysisConfig::default())
        .analyze_paths(&[report_path])
        .unwrap();

    assert_eq!(report.candidate_lines(), vec!["zéro (/src/a.c)"]);
    assert_eq!(report.candidates[0].canonical_name, "zéro");
}

#[test]
fn template_declared_in_header_exempts_instantiation() {
    let dir = tempfile::tempdir().unwrap();
    let report_path = write(
        dir.path(),
        "ld.1.json",
        r#"{"exports": [
            {"file": "/src/a.cc", "name": "_ZN2ns3bazIiEEvT_"},
            {"file": "/src/a.cc", "name": "_ZN2ns4quuxIiEEvT_"}
        ]}"#,
    );
    write(
        dir.path(),
        "include/ns.hpp",
        "namespace ns {\ntemplate <class T> void baz(T);\n}\n",
    );

    let report = analyzer(AnalysisConfig {
        header_roots: vec![dir.path().join("include")],
        ..Default::default()
    })
    .analyze_paths(&[report_path])
    .unwrap();

    assert_eq!(report.candidate_lines(), vec!["_ZN2ns4quuxIiEEvT_ (/src/a.cc)"]);
    assert_eq!(report.candidates[0].canonical_name, "quux");
}
