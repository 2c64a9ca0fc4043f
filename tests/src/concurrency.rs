/// Independent requests on separate threads.
///
/// Each thread parses its own trees and owns its project. Only the platform
/// is shared.
mod concurrency_tests {
    use std::{sync::Arc, thread};

    use nepo::{compile, parse_configuration, parse_program, result::ProjectResult};

    use crate::utils::{read_fixture, uno};

    const PIPELINE: &str = "nepo_tests::pipeline::pipeline_tests";

    #[test]
    fn parallel_requests_share_one_platform() {
        let platform = uno();
        let program = read_fixture(PIPELINE, "drive.json");
        let configuration = read_fixture(PIPELINE, "uno.conf.json");
        let expected = read_fixture(PIPELINE, "drive.ino");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let platform = Arc::clone(&platform);
                let program = program.clone();
                let configuration = configuration.clone();
                thread::spawn(move || {
                    let report = compile(
                        parse_program(&program).unwrap(),
                        parse_configuration(&configuration).unwrap(),
                        &platform,
                        "compile",
                    )
                    .unwrap();
                    (report.result, report.source)
                })
            })
            .collect();

        for handle in handles {
            let (result, source) = handle.join().unwrap();
            assert_eq!(result, ProjectResult::Success);
            assert_eq!(source.as_deref(), Some(expected.as_str()));
        }
        assert_eq!(Arc::strong_count(&platform), 1);
    }

    #[test]
    fn one_failing_request_does_not_affect_another() {
        let platform = uno();
        let broken = read_fixture(PIPELINE, "broken.json");
        let blink = read_fixture(PIPELINE, "blink.json");
        let configuration = read_fixture(PIPELINE, "uno.conf.json");

        let spawn = |program: String| {
            let platform = Arc::clone(&platform);
            let configuration = configuration.clone();
            thread::spawn(move || {
                compile(
                    parse_program(&program).unwrap(),
                    parse_configuration(&configuration).unwrap(),
                    &platform,
                    "compile",
                )
                .unwrap()
                .result
            })
        };
        let broken = spawn(broken);
        let blink = spawn(blink);

        assert_eq!(
            broken.join().unwrap(),
            ProjectResult::ProgramInvalidStatements
        );
        assert_eq!(blink.join().unwrap(), ProjectResult::Success);
    }
}
