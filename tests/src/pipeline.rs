/// End to end compilation of fixture programs.
///
/// These tests verify that:
/// 1. Valid programs compile to the expected sketch, byte for byte
/// 2. Program errors from every worker end up in one report
/// 3. The worst result reached is the one reported
mod pipeline_tests {
    use nepo::{
        report::{CompilationReport, Origin},
        result::ProjectResult,
    };
    use nepo_ast::{info::MessageKey, nodes::PhraseKind};

    use crate::utils::{compile_fixture, read_fixture, uno};

    fn compile_uno(program: &str, workflow: &str) -> CompilationReport {
        compile_fixture(module_path!(), program, "uno.conf.json", &uno(), workflow)
    }

    #[test]
    fn blink_test() {
        let report = compile_uno("blink.json", "compile");
        assert_eq!(report.result, ProjectResult::Success);
        assert_eq!(report.error_count, 0);
        assert_eq!(
            report.source.as_deref(),
            Some(read_fixture(module_path!(), "blink.ino").as_str())
        );
    }

    #[test]
    fn blink_is_deterministic() {
        let first = compile_uno("blink.json", "compile");
        let second = compile_uno("blink.json", "compile");
        assert!(first.source.is_some());
        assert_eq!(first.source, second.source);
    }

    #[test]
    fn drive_test() {
        let report = compile_uno("drive.json", "compile");
        assert!(report.diagnostics.is_empty(), "{report}");
        assert_eq!(
            report.source.as_deref(),
            Some(read_fixture(module_path!(), "drive.ino").as_str())
        );
    }

    #[test]
    fn validate_workflow_stops_before_codegen() {
        let report = compile_uno("drive.json", "validate");
        assert_eq!(report.result, ProjectResult::Success);
        assert!(report.source.is_none());
    }

    #[test]
    fn broken_program_collects_every_diagnostic() {
        let report = compile_uno("broken.json", "compile");

        assert_eq!(report.result, ProjectResult::ProgramInvalidStatements);
        assert_eq!(report.error_count, 3);
        assert!(report.source.is_none());

        let found: Vec<(PhraseKind, MessageKey)> = report
            .diagnostics
            .iter()
            .map(|diagnostic| match &diagnostic.origin {
                Origin::Block { kind, .. } => (*kind, diagnostic.info.message()),
                Origin::Component { name } => panic!("unexpected component diagnostic on {name}"),
            })
            .collect();
        assert_eq!(
            found,
            vec![
                (PhraseKind::VarDeclaration, MessageKey::TypeErrorMismatch),
                (PhraseKind::StmtFlowCon, MessageKey::FlowControlOutsideLoop),
                (
                    PhraseKind::MotorOnAction,
                    MessageKey::ConfigurationErrorActorWrong
                ),
                (PhraseKind::MotorOnAction, MessageKey::MotorPowerOutOfRange),
            ]
        );
        assert!(!report.diagnostics[3].info.is_error());
    }

    #[test]
    fn variable_used_with_wrong_type_blocks_codegen() {
        let report = compile_uno("misused_variable.json", "compile");

        assert_eq!(report.result, ProjectResult::ProgramInvalidStatements);
        assert_eq!(report.error_count, 1);
        assert!(report.source.is_none());
        assert_eq!(report.diagnostics.len(), 1);
        let diagnostic = &report.diagnostics[0];
        assert!(matches!(
            &diagnostic.origin,
            Origin::Block { kind: PhraseKind::Var, block_id: Some(id) } if id == "g1"
        ));
        assert_eq!(diagnostic.info.message(), MessageKey::TypeErrorMismatch);
        assert_eq!(diagnostic.info.param("expected"), Some("STRING"));
    }

    #[test]
    fn broken_program_report_as_json() {
        let report = compile_uno("broken.json", "compile");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["result"], "PROGRAM_INVALID_STATEMENTS");
        assert_eq!(value["diagnostics"][0]["kind"], "VAR_DECLARATION");
        assert_eq!(value["diagnostics"][0]["block_id"], "v1");
        assert_eq!(value["diagnostics"][0]["severity"], "ERROR");
        assert_eq!(value["diagnostics"][2]["message"], "CONFIGURATION_ERROR_ACTOR_WRONG");
        assert!(value.get("source").is_none());
    }
}
