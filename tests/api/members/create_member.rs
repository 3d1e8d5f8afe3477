use std::time::Duration;

use crate::helpers::{
    get_json_response_body, member_schema, FailingTestApp, MemberApi, TestApp,
};
use member_roster::{
    services::data_stores::MemberStoreCall, ErrorResponse,
};
use serde_json::json;
use test_context::test_context;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, ResponseTemplate,
};

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_an_employee(app: &mut TestApp) {
    let response = app
        .post_member(&json!({
            "name": "Ann",
            "type": "employee",
            "role": "Engineer"
        }))
        .await;

    assert_eq!(
        response.status().as_u16(),
        201,
        "Failed to create member: {:?}",
        response
    );

    let response_body = get_json_response_body(response).await;

    assert!(
        jsonschema::is_valid(&member_schema(), &response_body),
        "response does not match schema: {response_body}"
    );
    assert_eq!(
        response_body,
        json!({"id": 1, "name": "Ann", "type": "employee", "role": "Engineer"}),
        "Employee response should omit the duration"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_a_contractor(app: &mut TestApp) {
    let response = app
        .post_member(&json!({
            "name": "Bo",
            "type": "contractor",
            "duration": 6,
            "tags": ["remote", "backend"]
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);

    let response_body = get_json_response_body(response).await;

    assert!(
        jsonschema::is_valid(&member_schema(), &response_body),
        "response does not match schema: {response_body}"
    );
    assert_eq!(
        response_body,
        json!({
            "id": 1,
            "name": "Bo",
            "type": "contractor",
            "duration": 6,
            "tags": ["remote", "backend"]
        }),
        "Contractor response should omit the role"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_rule_violations(app: &mut TestApp) {
    let test_cases = [
        (
            json!({"name": "Cy", "type": "employee"}),
            "Validation error: Employees must have a role",
        ),
        (
            json!({"type": "employee", "role": "Engineer"}),
            "Validation error: Members must have a name",
        ),
        (
            json!({
                "name": "Cy",
                "type": "employee",
                "role": "QA",
                "duration": 3
            }),
            "Validation error: Employees must not have a duration",
        ),
        (
            json!({"name": "Cy", "type": "contractor", "role": "QA"}),
            "Validation error: Contractors must have a duration",
        ),
        (
            json!({
                "name": "Cy",
                "type": "contractor",
                "role": "QA",
                "duration": 3
            }),
            "Validation error: Contractors must not have a role",
        ),
        (
            json!({"name": "Cy", "type": "Employee", "role": "QA"}),
            "Validation error: Invalid member type, \
             please use 'contractor' or 'employee'",
        ),
    ];

    for (body, expected_error) in test_cases {
        let response = app.post_member(&body).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {body}"
        );
        assert_eq!(
            response
                .json::<ErrorResponse>()
                .await
                .expect("Could not deserialize response body to ErrorResponse")
                .error,
            expected_error,
            "Failed for input: {body}"
        );
    }

    assert!(
        app.member_store.calls().is_empty(),
        "Invalid members should never reach the store"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_malformed_request(app: &mut TestApp) {
    let malformed_bodies = [
        json!({"name": "Bo", "type": "contractor", "duration": "six"}),
        json!({"name": 5, "type": "employee", "role": "QA"}),
        json!("Bo"),
    ];

    for body in malformed_bodies {
        let response = app.post_member(&body).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {body}"
        );
        assert_eq!(
            response
                .json::<ErrorResponse>()
                .await
                .expect("Could not deserialize response body to ErrorResponse")
                .error,
            "Invalid member data"
        );
    }

    let response = app
        .http_client
        .post(format!("{}/members", &app.address))
        .body("name=Bo")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response.status().as_u16(),
        400,
        "Non-JSON bodies should be rejected"
    );
    assert!(app.member_store.calls().is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_store_exactly_the_validated_member(app: &mut TestApp) {
    let response = app
        .post_member(&json!({
            "name": "Bo",
            "type": "contractor",
            "duration": -2,
            "tags": null
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);

    let calls = app.member_store.calls();
    assert_eq!(calls.len(), 1, "Expected a single store call: {calls:?}");
    match &calls[0] {
        MemberStoreCall::AddMember(member) => {
            assert!(!member.id.is_assigned());
            assert_eq!(member.name.as_ref(), "Bo");
            assert_eq!(member.kind.duration(), -2);
            assert_eq!(member.kind.role(), "");
            assert!(member.tags.is_empty());
        }
        call => panic!("Expected AddMember, got {call:?}"),
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_notify_about_new_members(app: &mut TestApp) {
    Mock::given(path("/greet"))
        .and(method("POST"))
        .and(body_json(json!({"name": "Ann"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.notifier_server)
        .await;

    let response = app
        .post_member(&json!({
            "name": "Ann",
            "type": "employee",
            "role": "Engineer"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    assert_eq!(received_notifications(app).await, 1);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_even_if_notification_fails(app: &mut TestApp) {
    Mock::given(path("/greet"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.notifier_server)
        .await;

    let response = app
        .post_member(&json!({
            "name": "Bo",
            "type": "contractor",
            "duration": 6
        }))
        .await;

    assert_eq!(
        response.status().as_u16(),
        201,
        "Notification failures should not fail the create"
    );
    assert_eq!(received_notifications(app).await, 1);

    let response = app.get_member("1").await;
    assert_eq!(response.status().as_u16(), 200, "Member should be stored");
}

#[test_context(FailingTestApp)]
#[tokio::test]
async fn should_return_500_if_storage_fails(app: &mut FailingTestApp) {
    let response = app
        .post_member(&json!({
            "name": "Ann",
            "type": "employee",
            "role": "Engineer"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(
        response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialize response body to ErrorResponse")
            .error,
        "Unexpected error"
    );
}

// Notifications are sent on their own task, so they may land after the
// response.
async fn received_notifications(app: &TestApp) -> usize {
    for _ in 0..50 {
        let received = app
            .notifier_server
            .received_requests()
            .await
            .unwrap_or_default();
        if !received.is_empty() {
            return received.len();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    0
}
