use crate::WeeklogWorld;
use cucumber::{given, then, when};
use weeklog::api::{ClientOptions, RequestContext};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server(world: &WeeklogWorld) -> &MockServer {
    world
        .server
        .as_ref()
        .expect("Step requires `Given a GitHub API stub`")
}

fn issue_json(number: usize, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": number,
        "number": number,
        "title": title,
        "state": "open",
        "html_url": format!("https://github.com/octocat/hello-world/issues/{number}"),
        "repository": {"id": 1, "name": "hello-world", "full_name": "octocat/hello-world"},
        "created_at": "2024-05-01T00:00:00Z",
        "updated_at": "2024-05-02T00:00:00Z"
    })
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[given("a GitHub API stub")]
async fn given_api_stub(world: &mut WeeklogWorld) {
    world.server = Some(MockServer::start().await);
}

#[given(regex = r#"^the issues endpoint returns the titles "(.*)"$"#)]
async fn given_issue_titles(world: &mut WeeklogWorld, titles: String) {
    let issues: Vec<serde_json::Value> = split_list(&titles)
        .iter()
        .enumerate()
        .map(|(i, title)| issue_json(i + 1, title))
        .collect();

    Mock::given(method("GET"))
        .and(path("/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues))
        .mount(server(world))
        .await;
}

#[given(regex = r#"^the issues endpoint only answers when "(\w+)" is "(.*)"$"#)]
async fn given_issue_query(world: &mut WeeklogWorld, key: String, value: String) {
    Mock::given(method("GET"))
        .and(path("/issues"))
        .and(query_param(key.as_str(), value.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([issue_json(
                1,
                "Matched"
            )])),
        )
        .with_priority(1)
        .mount(server(world))
        .await;

    Mock::given(method("GET"))
        .and(path("/issues"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "message": "Validation Failed"
        })))
        .mount(server(world))
        .await;
}

#[given(regex = r#"^the timeline of "([^/]+)/([^#]+)#(\d+)" has the events "(.*)"$"#)]
async fn given_timeline(
    world: &mut WeeklogWorld,
    owner: String,
    repo: String,
    number: u64,
    events: String,
) {
    let events: Vec<serde_json::Value> = split_list(&events)
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            serde_json::json!({
                "event": kind,
                "id": i + 1,
                "created_at": format!("2024-05-0{}T09:00:00Z", i + 1),
                "actor": {"login": "octocat", "id": 1}
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/{owner}/{repo}/issues/{number}/timeline")))
        .respond_with(ResponseTemplate::new(200).set_body_json(events))
        .mount(server(world))
        .await;
}

#[given(regex = r#"^the API responds with status (\d+) and message "(.*)"$"#)]
async fn given_error_status(world: &mut WeeklogWorld, status: u16, message: String) {
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(serde_json::json!({ "message": message })),
        )
        .mount(server(world))
        .await;
}

#[when(regex = r"^I run `weeklog(.*)`$")]
async fn when_run_weeklog(world: &mut WeeklogWorld, arguments: String) {
    let args: Vec<String> = std::iter::once("weeklog")
        .chain(arguments.split_whitespace())
        .map(str::to_string)
        .collect();
    let options = world.server.as_ref().map(|server| ClientOptions {
        host: server.uri(),
        auth_token: Some("acceptance-token".to_string()),
        ..Default::default()
    });

    let mut captured: Vec<u8> = Vec::new();
    let result = weeklog::run::run(
        args,
        Some(&mut captured as &mut dyn std::io::Write),
        &RequestContext::background(),
        options,
    )
    .await;

    world.captured_output = captured;
    world.run_result = Some(result);
}

#[then(regex = r#"^the output should be "(.*)"$"#)]
async fn then_output_should_be(world: &mut WeeklogWorld, expected_output: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert_eq!(
        output.trim_end(),
        expected_output,
        "Expected output '{}', but got:\n---\n{}\n---",
        expected_output,
        output.trim_end()
    );
    assert!(
        world.run_result.as_ref().is_some_and(|r| r.is_ok()),
        "Command failed: {:?}",
        world.run_result
    );
}

#[then(regex = r#"^the output line (\d+) should be "(.*)"$"#)]
async fn then_output_line_should_be(world: &mut WeeklogWorld, line: usize, expected: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    let actual = output.lines().nth(line - 1);
    assert_eq!(
        actual,
        Some(expected.as_str()),
        "Unexpected line {} in output:\n---\n{}\n---",
        line,
        output
    );
}

#[then(regex = r#"^the output should have (\d+) lines?$"#)]
async fn then_output_line_count(world: &mut WeeklogWorld, count: usize) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert_eq!(output.lines().count(), count, "Output was:\n{output}");
}

#[then(regex = r#"^the command should fail with "(.*)"$"#)]
async fn then_command_should_fail(world: &mut WeeklogWorld, expected_error: String) {
    let error = match &world.run_result {
        Some(Err(err)) => format!("{err:#}"),
        other => panic!("Expected command to fail, got {other:?}"),
    };
    assert!(
        error.contains(&expected_error),
        "Expected error containing '{}', got '{}'",
        expected_error,
        error
    );
}
