//! Test: Concurrent groups - parallel launch, join and aggregation

use crate::helpers::*;
use pipeline_tool::core::{ConcurrentGroup, Job, Pipeline, Stage, Status};
use std::time::Duration;

/// Group of a fast success and a slow failure
#[tokio::test]
async fn test_group_takes_slowest_duration_and_fails() {
    let yaml = r#"
pipeline:
  concurrent:
    fast:
      run: "sleep 0.1; exit 0"
    slow:
      run: "sleep 0.3; exit 1"
"#;

    let runner = MockRunner::new(vec![
        ("sleep 0.1; exit 0", Script::ok().after(Duration::from_millis(100))),
        ("sleep 0.3; exit 1", Script::fail().after(Duration::from_millis(300))),
    ]);
    let result = run_yaml_with_mock(yaml, &runner).await;

    let group = result.group().outcome();
    assert_status(group, Status::Error);
    assert_duration_near(group.duration, Duration::from_millis(300), Duration::from_millis(150));
    assert_eq!(group.duration, result.job_outcome("slow").duration);

    assert_status(result.job_outcome("fast"), Status::Success);
    assert_status(result.job_outcome("slow"), Status::Error);

    // Parallel, so well under the 400ms a sequential run needs
    assert!(result.wall_time < Duration::from_millis(400), "took {:?}", result.wall_time);
}

/// Group duration is the max, never the sum
#[tokio::test]
async fn test_group_duration_is_max_not_sum() {
    let yaml = r#"
pipeline:
  concurrent:
    a:
      run: "a"
    b:
      run: "b"
    c:
      run: "c"
"#;

    let runner = MockRunner::new(vec![
        ("a", Script::ok().after(Duration::from_millis(50))),
        ("b", Script::ok().after(Duration::from_millis(150))),
        ("c", Script::ok().after(Duration::from_millis(100))),
    ]);
    let result = run_yaml_with_mock(yaml, &runner).await;

    let members = result.group().members();
    let max = members.iter().map(|j| j.outcome().duration).max().unwrap();
    let sum: Duration = members.iter().map(|j| j.outcome().duration).sum();

    assert_eq!(result.group().outcome().duration, max);
    assert!(result.group().outcome().duration < sum);
    assert_status(result.group().outcome(), Status::Success);
}

/// All members launch even when one fails immediately
#[tokio::test]
async fn test_every_member_runs() {
    let yaml = r#"
pipeline:
  concurrent:
    x:
      run: "x"
    y:
      run: "y"
    z:
      run: "z"
"#;

    let runner = MockRunner::new(vec![("x", Script::fail())]);
    let result = run_yaml_with_mock(yaml, &runner).await;

    assert_eq!(runner.call_count(), 3);
    assert_status(result.job_outcome("y"), Status::Success);
    assert_status(result.job_outcome("z"), Status::Success);
    assert_status(result.group().outcome(), Status::Error);
}

/// Members report in declaration order regardless of completion order
#[tokio::test]
async fn test_report_order_is_declaration_order() {
    let yaml = r#"
pipeline:
  concurrent:
    slowest:
      run: "slowest"
    fastest:
      run: "fastest"
    middle:
      run: "middle"
"#;

    let runner = MockRunner::new(vec![
        ("slowest", Script::ok().after(Duration::from_millis(90))),
        ("middle", Script::ok().after(Duration::from_millis(45))),
    ]);
    let result = run_yaml_with_mock(yaml, &runner).await;

    let names: Vec<_> = result.group().members().iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, vec!["slowest", "fastest", "middle"]);
}

/// Launch failure of one member leaves siblings alone
#[tokio::test]
async fn test_unlaunchable_member_does_not_abort_siblings() {
    let yaml = r#"
pipeline:
  concurrent:
    broken:
      run: "broken"
    fine:
      run: "fine"
"#;

    let runner = MockRunner::new(vec![
        ("broken", Script::unlaunchable()),
        ("fine", Script::ok().after(Duration::from_millis(30))),
    ]);
    let result = run_yaml_with_mock(yaml, &runner).await;

    assert_status(result.job_outcome("broken"), Status::Error);
    assert_status(result.job_outcome("fine"), Status::Success);
    assert_status(result.group().outcome(), Status::Error);
}

/// Group-level output is not aggregated
#[tokio::test]
async fn test_group_output_stays_with_members() {
    let mut pipeline = Pipeline::new("output").with_stage(ConcurrentGroup::new(vec![
        Job::new("a", "a"),
        Job::new("b", "b"),
    ]));

    let runner = MockRunner::new(vec![
        ("a", Script::ok().with_output("from a", "")),
        ("b", Script::ok().with_output("from b", "")),
    ]);
    let result = run_pipeline_with_runner(&mut pipeline, runner).await;

    match &result.pipeline.stages()[0] {
        Stage::Concurrent(group) => {
            assert!(group.outcome().stdout.is_empty());
            assert!(group.outcome().stderr.is_empty());
            assert_eq!(group.member("a").unwrap().outcome().stdout, "from a");
            assert_eq!(group.member("b").unwrap().outcome().stdout, "from b");
        }
        other => panic!("Expected concurrent stage, got {:?}", other),
    }
}
