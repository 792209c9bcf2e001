#[cfg(test)]
mod tests {
    use interaction_diff::{
        compare_logs, diff::GroupDiff, diff::InteractionDiff, diff::ResponseDiff, markdown, run,
        AbstractionOptions, Body, InteractionData, InteractionGroup, InteractionLog, RequestData,
        ResponseData, RunConfig, Tag,
    };
    use proptest::prelude::*;
    use std::{fs, path::Path};

    fn interaction(
        method: &str,
        request_body: &str,
        response_body: Option<&str>,
    ) -> InteractionData {
        InteractionData {
            request_data: RequestData {
                method: method.into(),
                path: "/api/things".into(),
                headers: vec![("Accept".to_string(), "application/json".to_string())]
                    .into_iter()
                    .collect(),
                body: request_body.into(),
            },
            response_data: response_body.map(|body| ResponseData {
                status_code: 200,
                headers: Default::default(),
                body: body.into(),
            }),
        }
    }

    fn log(interactions: Vec<InteractionData>) -> InteractionLog {
        InteractionLog {
            groups: vec![InteractionGroup {
                name: Some("test case".into()),
                interactions,
            }],
        }
    }

    fn write(dir: &Path, name: &str, log: &InteractionLog) -> std::path::PathBuf {
        let path = dir.join(name);
        markdown::save_log(&path, log).unwrap();
        path
    }

    fn interaction_diffs(report: &interaction_diff::DiffReport) -> &[InteractionDiff] {
        match &report.groups[0] {
            GroupDiff::Compared { interactions, .. } => interactions,
            other => panic!("the first group should be compared: {:?}", other),
        }
    }

    fn response_body_tag(diff: &InteractionDiff) -> Tag {
        match diff {
            InteractionDiff::Compared {
                response: ResponseDiff::Compared { body, .. },
                ..
            } => {
                if body.is_equal() {
                    Tag::Equal
                } else {
                    Tag::Replace
                }
            }
            other => panic!("expected a compared response: {:?}", other),
        }
    }

    #[test]
    fn get_response_bodies_are_masked_on_request() {
        let old = log(vec![interaction("GET", "1", Some("X"))]);
        let new = log(vec![interaction("GET", "1", Some("Y"))]);
        let mut config = RunConfig::new("old.md", "new.md");

        let unmasked = compare_logs(&old, &new, &config);
        config.set_ignore_get_responses(true);
        let masked = compare_logs(&old, &new, &config);

        assert_eq!(response_body_tag(&interaction_diffs(&unmasked)[0]), Tag::Replace);
        match &interaction_diffs(&unmasked)[0] {
            InteractionDiff::Compared {
                response: ResponseDiff::Compared { body, .. },
                ..
            } => {
                assert_eq!(body.edits.len(), 1);
                assert_eq!(body.edits[0].tag, Tag::Replace);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!masked.has_differences());
    }

    #[test]
    fn get_masking_leaves_other_methods_alone() {
        let old = log(vec![interaction("POST", "1", Some("X"))]);
        let new = log(vec![interaction("POST", "1", Some("Y"))]);
        let mut config = RunConfig::new("old.md", "new.md");
        config.set_ignore_get_responses(true);

        assert!(compare_logs(&old, &new, &config).has_differences());
    }

    #[test]
    fn lowercase_get_recordings_are_not_masked() {
        let dir = tempfile::tempdir().unwrap();
        let old = write(dir.path(), "old.md", &log(vec![interaction("get", "", Some("X"))]));
        let new = write(dir.path(), "new.md", &log(vec![interaction("get", "", Some("Y"))]));
        let mut config = RunConfig::new(&old, &new);
        config.set_ignore_get_responses(true);

        let report = run(&config, Vec::new()).unwrap();

        assert_eq!(report.summary().replaced, 1);
        assert_eq!(response_body_tag(&interaction_diffs(&report)[0]), Tag::Replace);
    }

    #[test]
    fn json_bodies_compare_by_content_only_when_requested() {
        let old = log(vec![interaction("POST", "{\"a\":1,\"b\":2}", Some("{ \"ok\": true }"))]);
        let new = log(vec![interaction("POST", "{\"b\":2,\"a\":1}", Some("{\"ok\":true}"))]);
        let mut config = RunConfig::new("old.md", "new.md");

        assert!(compare_logs(&old, &new, &config).has_differences());

        config.set_json_body(true);
        assert!(!compare_logs(&old, &new, &config).has_differences());
    }

    #[test]
    fn only_requests_hides_every_response_difference() {
        let old = log(vec![
            interaction("GET", "", Some("X")),
            interaction("POST", "", None),
        ]);
        let new = log(vec![
            interaction("GET", "", None),
            interaction("POST", "", Some("created")),
        ]);
        let mut config = RunConfig::new("old.md", "new.md");
        config.set_only_requests(true);

        let report = compare_logs(&old, &new, &config);

        assert!(!report.has_differences());
        for diff in interaction_diffs(&report) {
            assert!(matches!(
                diff,
                InteractionDiff::Compared {
                    response: ResponseDiff::Absent,
                    ..
                }
            ));
        }
    }

    #[test]
    fn a_shorter_log_reports_the_rest_as_deleted() {
        let old = log(vec![
            interaction("GET", "", Some("1")),
            interaction("GET", "", Some("2")),
            interaction("DELETE", "", Some("3")),
        ]);
        let new = log(old.groups[0].interactions[..2].to_vec());

        let report = compare_logs(&old, &new, &RunConfig::new("old.md", "new.md"));
        let tags: Vec<_> = interaction_diffs(&report)
            .iter()
            .map(InteractionDiff::tag)
            .collect();

        assert_eq!(tags, vec![Tag::Equal, Tag::Equal, Tag::Delete]);
        assert_eq!(report.summary().deleted, 1);
    }

    #[test]
    fn volatile_abstractions_hide_generated_values() {
        let old = log(vec![interaction(
            "POST",
            "{\"id\": \"6fa459ea-ee8a-3ca4-894e-db77e160355e\"}",
            Some("created 2023-04-01T10:00:00Z"),
        )]);
        let new = log(vec![interaction(
            "POST",
            "{\"id\": \"16fd2706-8baf-433b-82eb-8c7fada847da\"}",
            Some("created 2023-04-02T11:30:00Z"),
        )]);
        let mut config = RunConfig::new("old.md", "new.md");
        config.set_json_body(true);

        assert!(compare_logs(&old, &new, &config).has_differences());

        config.set_abstraction_options(AbstractionOptions::volatile());
        assert!(!compare_logs(&old, &new, &config).has_differences());
    }

    #[test]
    fn run_reads_both_recordings_and_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let old = write(
            dir.path(),
            "old.md",
            &log(vec![interaction("GET", "", Some("line 1\nline 2\nline 3"))]),
        );
        let new = write(
            dir.path(),
            "new.md",
            &log(vec![
                interaction("GET", "", Some("line 1\nline 2\nline three")),
                interaction("POST", "x", None),
            ]),
        );
        let mut output = Vec::new();

        run(&RunConfig::new(&old, &new), &mut output).unwrap();

        let document: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let interactions = &document["groups"][0]["interactions"];
        assert_eq!(document["tag"], "replace");
        assert_eq!(
            interactions[0]["response"]["body"]["edits"],
            serde_json::json!([
                { "tag": "equal", "collapsed": 2 },
                { "tag": "replace", "old": ["line 3"], "new": ["line three"] },
            ])
        );
        assert_eq!(interactions[1]["tag"], "insert");
        assert_eq!(interactions[1]["interaction"]["response"], serde_json::Value::Null);
    }

    #[test]
    fn show_equal_expands_equal_runs() {
        let dir = tempfile::tempdir().unwrap();
        let recording = log(vec![interaction("GET", "", Some("a\nb"))]);
        let old = write(dir.path(), "old.md", &recording);
        let new = write(dir.path(), "new.md", &recording);
        let mut config = RunConfig::new(&old, &new);
        config.set_show_equal(true);
        let mut output = Vec::new();

        run(&config, &mut output).unwrap();

        let document: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(
            document["groups"][0]["interactions"][0]["response"]["body"]["edits"][0]["lines"],
            serde_json::json!(["a", "b"])
        );
    }

    #[test]
    fn differing_group_counts_pair_by_position() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.md");
        let new = dir.path().join("new.md");
        fs::write(&old, "# one\n\n## Interaction 0: GET /a\n").unwrap();
        fs::write(
            &new,
            "# one\n\n## Interaction 0: GET /a\n\n# two\n\n## Interaction 0: GET /b\n",
        )
        .unwrap();
        let mut output = Vec::new();

        let report = run(&RunConfig::new(&old, &new), &mut output).unwrap();

        assert_eq!(report.groups[0].tag(), Tag::Equal);
        assert_eq!(report.groups[1].tag(), Tag::Insert);
    }

    fn arbitrary_body() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z ]{0,12}(\n[a-z ]{0,12}){0,3}",
            Just(String::from("{\"b\": [1, 2], \"a\": {\"z\": null}}")),
            Just(String::from("{not json")),
        ]
    }

    fn arbitrary_interaction() -> impl Strategy<Value = InteractionData> {
        (
            prop_oneof![Just("GET"), Just("POST"), Just("get")],
            arbitrary_body(),
            proptest::option::of(arbitrary_body()),
        )
            .prop_map(|(method, request_body, response_body)| InteractionData {
                request_data: RequestData {
                    method: method.into(),
                    path: "/p".into(),
                    headers: Default::default(),
                    body: Body::Text(request_body),
                },
                response_data: response_body.map(|body| ResponseData {
                    status_code: 201,
                    headers: Default::default(),
                    body: Body::Text(body),
                }),
            })
    }

    proptest! {
        #[test]
        fn a_log_never_differs_from_itself(
            groups in proptest::collection::vec(
                proptest::collection::vec(arbitrary_interaction(), 0..4),
                0..3,
            ),
            json_body in any::<bool>(),
            only_requests in any::<bool>(),
            ignore_get_responses in any::<bool>(),
            volatile in any::<bool>(),
        ) {
            let log = InteractionLog {
                groups: groups
                    .into_iter()
                    .map(|interactions| InteractionGroup { name: None, interactions })
                    .collect(),
            };
            let mut config = RunConfig::new("a.md", "a.md");
            config.set_json_body(json_body);
            config.set_only_requests(only_requests);
            config.set_ignore_get_responses(ignore_get_responses);
            if volatile {
                config.set_abstraction_options(AbstractionOptions::volatile());
            }

            let report = compare_logs(&log, &log, &config);

            prop_assert!(!report.has_differences());
            prop_assert_eq!(report.summary().equal, log.interaction_count());
        }
    }
}
