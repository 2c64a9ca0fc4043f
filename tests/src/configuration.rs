/// Pin conflict checks of the Arduino configuration validator.
///
/// These tests verify that:
/// 1. A pin of an exclusive role can be claimed once across all components
/// 2. A component reusing one pin is reported once, whatever the role order
/// 3. Roles that are not exclusive never claim a pin
mod configuration_tests {
    use nepo::{
        report::{CompilationReport, Origin},
        result::ProjectResult,
    };
    use nepo_ast::info::{MessageKey, NepoInfo};

    use crate::utils::{compile_fixture, load_platform, uno};

    fn component_infos(report: &CompilationReport, name: &str) -> Vec<NepoInfo> {
        report
            .diagnostics
            .iter()
            .filter(|d| matches!(&d.origin, Origin::Component { name: n } if n == name))
            .map(|d| d.info.clone())
            .collect()
    }

    #[test]
    fn second_component_loses_shared_pin() {
        let report = compile_fixture(
            module_path!(),
            "empty_program.json",
            "shared_pin.conf.json",
            &load_platform("two_pins.toml"),
            "validate",
        );

        assert_eq!(report.error_count, 1);
        assert_eq!(report.result, ProjectResult::ProgramInvalidStatements);
        assert!(component_infos(&report, "first").is_empty());
        let second = component_infos(&report, "second");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].message(), MessageKey::ConfigurationErrorOverlappingPorts);
    }

    #[test]
    fn one_pin_for_both_motor_inputs() {
        let report = compile_fixture(
            module_path!(),
            "empty_program.json",
            "same_pin_twice.conf.json",
            &uno(),
            "compile",
        );

        assert_eq!(report.error_count, 1);
        assert_eq!(component_infos(&report, "motor").len(), 1);
        assert!(report.source.is_none());
    }

    #[test]
    fn shared_ground_is_fine() {
        let report = compile_fixture(
            module_path!(),
            "empty_program.json",
            "ground_shared.conf.json",
            &load_platform("two_pins.toml"),
            "validate",
        );

        assert_eq!(report.error_count, 0);
        assert_eq!(report.result, ProjectResult::Success);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn loads_platform_from_toml() {
        let platform = load_platform("two_pins.toml");
        assert_eq!(platform.name, "two-pins");
        assert_eq!(platform.free_pins, vec!["A", "B"]);
        assert!(platform.is_overlapping("IN"));
        assert!(!platform.is_overlapping("GND"));
        assert!(platform.workflow("compile").is_err());
    }
}
