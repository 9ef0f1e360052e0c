mod common;

use std::fs;

use tempfile::tempdir;
use NewsSieve::config::{pipeline_config_from_str, presets};
use NewsSieve::data_model::{ExclusionReason, OTHER_GROUP};
use NewsSieve::error::PipelineError;
use NewsSieve::pipeline::categories::{CURATED_TABLE, KNOWLEDGE_TABLE};
use NewsSieve::runner::PipelineRunner;

use common::{read_csv, write_csv};

const INPUT: &str = r#"id,type1,type2,url,first_date_parsed,first_keywords_auto,COVID (add yes/ no)
,Oil,,http://x,2020-01-01,"a,b",no
,Arts,,,2018-12-31,x,yes
,Music,Coronavirus,http://y,2020-05-01,"Masks, Testing",yes
,"School, ASL",corona,http://z,15/04/2020,Schools,no
,Bakery,corona,http://w,2020-01-01,bread,no
,News,Coronavirus,https://www.west-dunbarton.gov.uk/council/newsroom/news/,2020-03-01,local,YES
"#;

fn input_headers() -> Vec<String> {
    INPUT
        .lines()
        .next()
        .unwrap()
        .split(',')
        .map(str::to_string)
        .collect()
}

#[test]
fn test_filter_categories_end_to_end() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path(), "in.csv", INPUT);
    let output = dir.path().join("out.csv");

    let runner = PipelineRunner::from_config(&presets::filter_categories().unwrap()).unwrap();
    let stats = runner.run_files(&input, &output).unwrap();

    assert_eq!(stats.original, 6);
    assert_eq!(stats.excluded(ExclusionReason::ExcludedCategory), 1);
    assert_eq!(stats.final_count, 5);
    assert!(stats.is_consistent());

    let (headers, records) = read_csv(&output);
    assert_eq!(headers, input_headers());
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.get("type1") != Some("Oil")));
    assert_eq!(records[2].get("type1"), Some("School, ASL"));
    assert_eq!(stats.category_tally.get("Arts"), Some(&1));
}

#[test]
fn test_filter_recent_end_to_end() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path(), "in.csv", INPUT);
    let output = dir.path().join("out.csv");

    let runner = PipelineRunner::from_config(&presets::filter_recent().unwrap()).unwrap();
    let stats = runner.run_files(&input, &output).unwrap();

    assert_eq!(stats.excluded(ExclusionReason::ExcludedCategory), 1); // Oil
    assert_eq!(stats.excluded(ExclusionReason::Date), 1); // Arts, 2018-12-31
    assert_eq!(stats.excluded(ExclusionReason::UnmappedCategory), 1); // Bakery
    assert_eq!(stats.excluded(ExclusionReason::ExcludedUrl), 1);
    assert_eq!(stats.final_count, 2);
    assert_eq!(stats.original, stats.final_count + stats.excluded_total());
    assert_eq!(stats.flag.as_ref().map(|f| f.count), Some(1));

    let (headers, records) = read_csv(&output);
    let mut expected = input_headers();
    expected.push("group".to_string());
    assert_eq!(headers, expected);

    let groups = CURATED_TABLE.groups();
    for record in &records {
        let group = record.get_trimmed("group");
        assert_ne!(group, OTHER_GROUP);
        assert!(groups.contains(group), "unexpected group {}", group);
    }
    assert_eq!(records[0].get("group"), Some("Entertainment"));
    assert_eq!(records[1].get("group"), Some("Education"));
}

#[test]
fn test_arts_row_survives_without_cutoff() {
    let yaml = r#"
name: no-cutoff
category_field: type1
steps:
  - type: CategoryExclusion
    field: type1
    exclusion_set: standard
  - type: CategoryMapping
    field: type1
    table: curated
    policy: strict_drop
"#;
    let dir = tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "in.csv",
        "type1,first_date_parsed,first_keywords_auto\nArts,2018-12-31,x\n",
    );
    let output = dir.path().join("out.csv");

    let runner = PipelineRunner::from_config(&pipeline_config_from_str(yaml, "inline").unwrap()).unwrap();
    let stats = runner.run_files(&input, &output).unwrap();
    assert_eq!(stats.final_count, 1);

    let (_, records) = read_csv(&output);
    assert_eq!(records[0].get("group"), Some("Entertainment"));
}

#[test]
fn test_preprocess_end_to_end() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path(), "in.csv", INPUT);
    let output = dir.path().join("out.csv");

    let runner = PipelineRunner::from_config(&presets::preprocess().unwrap()).unwrap();
    let stats = runner.run_files(&input, &output).unwrap();

    assert_eq!(stats.excluded(ExclusionReason::Date), 1);
    assert_eq!(stats.excluded(ExclusionReason::ExcludedUrl), 1);
    assert_eq!(stats.excluded(ExclusionReason::OffTopic), 1);
    assert_eq!(stats.excluded(ExclusionReason::OtherGroup), 1);
    assert_eq!(stats.final_count, 2);
    assert_eq!(stats.ids_generated, Some(2));
    assert!(stats.is_consistent());

    let (headers, records) = read_csv(&output);
    for column in input_headers() {
        assert!(headers.contains(&column), "missing input column {}", column);
    }
    assert_eq!(headers[0], "id");
    assert_eq!(&headers[headers.len() - 2..], &["keywords_processed", "group"]);

    let groups = KNOWLEDGE_TABLE.groups();
    for record in &records {
        assert!(groups.contains(record.get_trimmed("group")));
        assert!(record.get_trimmed("id").starts_with("gen_"));
    }
    assert_eq!(records[0].get("keywords_processed"), Some("masks,testing"));
    assert_eq!(records[1].get("group"), Some("Knowledge"));
}

#[test]
fn test_preprocess_appends_id_keywords_then_group() {
    let dir = tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "in.csv",
        "type1,type2,url,first_date_parsed,first_keywords_auto\n\
         Music,Coronavirus,http://y,2020-05-01,Masks\n",
    );
    let output = dir.path().join("out.csv");

    let runner = PipelineRunner::from_config(&presets::preprocess().unwrap()).unwrap();
    runner.run_files(&input, &output).unwrap();

    let (headers, records) = read_csv(&output);
    assert_eq!(
        headers,
        vec![
            "type1",
            "type2",
            "url",
            "first_date_parsed",
            "first_keywords_auto",
            "id",
            "keywords_processed",
            "group",
        ]
    );
    assert_eq!(records[0].get("keywords_processed"), Some("masks"));
    assert_eq!(records[0].get("group"), Some("Entertainment"));
}

#[test]
fn test_preprocess_fails_when_nothing_survives() {
    let dir = tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "in.csv",
        "type1,type2,url,first_keywords_auto\nArts,Weather,http://x,rain\n",
    );
    let output = dir.path().join("out.csv");

    let runner = PipelineRunner::from_config(&presets::preprocess().unwrap()).unwrap();
    match runner.run_files(&input, &output) {
        Err(PipelineError::EmptyOutput(path)) => assert!(path.ends_with("out.csv")),
        other => panic!("Expected EmptyOutput, got {:?}", other),
    }
    // The header is still there for inspection
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 1);
}

#[test]
fn test_empty_result_is_fine_elsewhere() {
    let dir = tempdir().unwrap();
    let input = write_csv(dir.path(), "in.csv", "type1,url\nOil,a\nTimber,b\n");
    let output = dir.path().join("out.csv");

    let runner = PipelineRunner::from_config(&presets::filter_categories().unwrap()).unwrap();
    let stats = runner.run_files(&input, &output).unwrap();
    assert_eq!(stats.final_count, 0);
    assert_eq!(fs::read_to_string(&output).unwrap().trim_end(), "type1,url");
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = tempdir().unwrap();
    let runner = PipelineRunner::from_config(&presets::filter_recent().unwrap()).unwrap();
    let result = runner.run_files(&dir.path().join("absent.csv"), &dir.path().join("out.csv"));
    assert!(matches!(result, Err(PipelineError::IoError { .. })));
}
