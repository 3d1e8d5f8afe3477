use crate::helpers::{
    add_employee, get_json_response_body, member_schema, FailingTestApp,
    MemberApi, TestApp, EXISTING_MEMBER_ID,
};
use member_roster::{
    domain::MemberId, services::data_stores::MemberStoreCall, ErrorResponse,
};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_200_for_valid_requests(app: &mut TestApp) {
    let member_id = add_employee(app, "Ann").await;

    let response = app
        .put_member(
            &member_id.to_string(),
            &json!({
                "id": 42,
                "name": "Ann",
                "type": "contractor",
                "duration": 3,
                "tags": ["promoted"]
            }),
        )
        .await;

    assert_eq!(
        response.status().as_u16(),
        200,
        "Failed to update member: {}",
        member_id
    );

    let response_body = get_json_response_body(response).await;

    assert!(
        jsonschema::is_valid(&member_schema(), &response_body),
        "response does not match schema: {response_body}"
    );

    let expected_response = json!({
        "id": member_id,
        "name": "Ann",
        "type": "contractor",
        "duration": 3,
        "tags": ["promoted"]
    });
    assert_eq!(response_body, expected_response);

    let stored =
        get_json_response_body(app.get_member(&member_id.to_string()).await)
            .await;
    assert_eq!(stored, expected_response, "Update should be persisted");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_members(app: &mut TestApp) {
    let response = app
        .put_member(
            "999",
            &json!({"name": "Ann", "type": "employee", "role": "Engineer"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialize response body to ErrorResponse")
            .error,
        "Member not found"
    );

    assert_eq!(
        app.member_store.calls(),
        vec![MemberStoreCall::GetMember(MemberId::new(999))],
        "Unknown members should never be updated"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_rule_violations(app: &mut TestApp) {
    let member_id = add_employee(app, "Ann").await;

    let response = app
        .put_member(
            &member_id.to_string(),
            &json!({"name": "Ann", "type": "employee"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialize response body to ErrorResponse")
            .error,
        "Validation error: Employees must have a role"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_id(app: &mut TestApp) {
    let response = app
        .put_member(
            "abc",
            &json!({"name": "Ann", "type": "employee", "role": "Engineer"}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialize response body to ErrorResponse")
            .error,
        "Invalid member ID"
    );
    assert!(app.member_store.calls().is_empty());
}

#[test_context(FailingTestApp)]
#[tokio::test]
async fn should_return_500_if_storage_fails(app: &mut FailingTestApp) {
    let response = app
        .put_member(
            &EXISTING_MEMBER_ID.to_string(),
            &json!({"name": "Ann", "type": "employee", "role": "Lead"}),
        )
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
