use std::io::Write;
use std::path::PathBuf;

use collab_manager_cli::{run_cli, Cli};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

struct ActionFixture {
    server: MockServer,
    event: NamedTempFile,
}

impl ActionFixture {
    fn new(payload: Value) -> Self {
        let mut event = NamedTempFile::new().expect("event file");
        write!(event, "{payload}").expect("write event");
        Self {
            server: MockServer::start(),
            event,
        }
    }

    fn cli(&self, event_name: &str) -> Cli {
        Cli {
            token: "test-token".to_string(),
            api_base: self.server.base_url(),
            event_name: event_name.to_string(),
            event_path: PathBuf::from(self.event.path()),
            repository: "octo/admin".to_string(),
            page_size: 50,
            request_timeout_ms: 3_000,
        }
    }
}

fn opened_issue(body: Option<&str>) -> Value {
    json!({
        "action": "opened",
        "issue": { "number": 5, "body": body }
    })
}

#[tokio::test]
async fn integration_add_command_invites_missing_collaborators_and_posts_report() {
    let fixture = ActionFixture::new(opened_issue(Some(
        "## collaborators-manager-action\r\n### add collaborators\r\n- users: alice\r\n- repos: r1, r2",
    )));
    let server = &fixture.server;
    let user = server.mock(|when, then| {
        when.method(GET).path("/users/alice");
        then.status(200).json_body(json!({ "login": "alice", "id": 2 }));
    });
    let r1_collaborators = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/r1/collaborators")
            .query_param("page", "1")
            .query_param("per_page", "50");
        then.status(200).json_body(json!([
            { "id": 1, "login": "octo" },
            { "id": 2, "login": "alice" }
        ]));
    });
    let r2_collaborators = server.mock(|when, then| {
        when.method(GET).path("/repos/octo/r2/collaborators");
        then.status(200).json_body(json!([{ "id": 1, "login": "octo" }]));
    });
    let invite = server.mock(|when, then| {
        when.method(PUT).path("/repos/octo/r2/collaborators/alice");
        then.status(201).json_body(json!({ "id": 77 }));
    });
    let report = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/octo/admin/issues/5/comments")
            .json_body(json!({
                "body": "Invitation collaborators status\r\n\r\n| No | Repository | Status |\r\n|:--:|------------|--------|\r\n|1|[r1](https://github.com/octo/r1)|User `alice` already a collaborator|\r\n|2|[r2](https://github.com/octo/r2)|[Invite sent](https://github.com/octo/r2/invitations), awaiting [alice's](https://github.com/alice) response|\r\n\r\n--\r\n_collaborators-manager-action_"
            }));
        then.status(201).json_body(json!({ "id": 1 }));
    });

    run_cli(fixture.cli("issues")).await.expect("run");

    user.assert();
    r1_collaborators.assert();
    r2_collaborators.assert();
    invite.assert();
    report.assert();
}

#[tokio::test]
async fn integration_missing_repository_posts_error_comment_without_mutations() {
    let fixture = ActionFixture::new(opened_issue(Some(
        "## collaborators-manager-action\r\n### remove collaborators\r\n- users: alice\r\n- repos: r9",
    )));
    let server = &fixture.server;
    server.mock(|when, then| {
        when.method(GET).path("/users/alice");
        then.status(200).json_body(json!({ "login": "alice", "id": 2 }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/r9/collaborators");
        then.status(404).json_body(json!({ "message": "Not Found" }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/r9/invitations");
        then.status(404).json_body(json!({ "message": "Not Found" }));
    });
    let probe = server.mock(|when, then| {
        when.method(GET).path("/repos/octo/r9");
        then.status(404).json_body(json!({ "message": "Not Found" }));
    });
    let removal = server.mock(|when, then| {
        when.method(DELETE);
        then.status(204);
    });
    let error_comment = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/octo/admin/issues/5/comments")
            .json_body(json!({
                "body": "Error: Repository `r9` does not exist!\r\n\r\n--\r\n_collaborators-manager-action_"
            }));
        then.status(201).json_body(json!({ "id": 1 }));
    });

    let error = run_cli(fixture.cli("issues")).await.expect_err("fatal");
    assert_eq!(error.to_string(), "Repository `r9` does not exist!");
    probe.assert();
    removal.assert_hits(0);
    error_comment.assert();
}

#[tokio::test]
async fn integration_body_is_fetched_when_payload_omits_it() {
    let fixture = ActionFixture::new(opened_issue(None));
    let server = &fixture.server;
    let issue = server.mock(|when, then| {
        when.method(GET).path("/repos/octo/admin/issues/5");
        then.status(200).json_body(json!({
            "number": 5,
            "body": "## collaborators-manager-action\r\n### list collaborators\r\n- repos: *"
        }));
    });
    let owned = server.mock(|when, then| {
        when.method(GET)
            .path("/user/repos")
            .query_param("affiliation", "owner");
        then.status(200).json_body(json!([]));
    });
    let report = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/octo/admin/issues/5/comments")
            .body_includes("Here is list of collaborators for each repository");
        then.status(201).json_body(json!({ "id": 1 }));
    });

    run_cli(fixture.cli("issues")).await.expect("run");

    issue.assert();
    owned.assert();
    report.assert();
}

#[tokio::test]
async fn regression_pull_requests_and_other_events_are_ignored_without_comment() {
    let fixture = ActionFixture::new(opened_issue(None));
    let server = &fixture.server;
    server.mock(|when, then| {
        when.method(GET).path("/repos/octo/admin/issues/5");
        then.status(200).json_body(json!({
            "number": 5,
            "body": "## collaborators-manager-action",
            "pull_request": { "url": "https://api.github.com/repos/octo/admin/pulls/5" }
        }));
    });
    let comment = server.mock(|when, then| {
        when.method(POST);
        then.status(201).json_body(json!({ "id": 1 }));
    });

    let pull_request = run_cli(fixture.cli("issues")).await.expect_err("pull request");
    assert_eq!(pull_request.to_string(), "Issue is pull request!");

    let other_event = run_cli(fixture.cli("issue_comment"))
        .await
        .expect_err("unsupported event");
    assert_eq!(
        other_event.to_string(),
        "`collaborators-manager-action` only support issue opened event"
    );
    comment.assert_hits(0);
}
