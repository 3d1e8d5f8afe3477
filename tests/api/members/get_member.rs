use crate::helpers::{
    add_employee, add_member, existing_member, get_json_response_body,
    member_schema, FailingTestApp, MemberApi, TestApp, EXISTING_MEMBER_ID,
};
use member_roster::{
    domain::MemberId, services::data_stores::MemberStoreCall, ErrorResponse,
};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_200_for_existing_members(app: &mut TestApp) {
    let input = json!({
        "name": "Bo",
        "type": "contractor",
        "duration": 12,
        "tags": ["b", "a", "c"]
    });
    let member_id = add_member(app, input.clone()).await;

    let response = app.get_member(&member_id.to_string()).await;

    assert_eq!(
        response.status().as_u16(),
        200,
        "Failed to get member: {:?}",
        response
    );

    let response_body = get_json_response_body(response).await;

    assert!(
        jsonschema::is_valid(&member_schema(), &response_body),
        "response does not match schema: {response_body}"
    );

    let mut expected = input;
    expected["id"] = json!(member_id);
    assert_eq!(
        response_body, expected,
        "Member should round-trip unchanged apart from its id"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_members(app: &mut TestApp) {
    let _member_id = add_employee(app, "Ann").await;

    let response = app.get_member("999").await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(
        response
            .json::<ErrorResponse>()
            .await
            .expect("Could not deserialize response body to ErrorResponse")
            .error,
        "Member not found"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_id(app: &mut TestApp) {
    for id in ["abc", "1.5", "99999999999"] {
        let response = app.get_member(id).await;

        assert_eq!(response.status().as_u16(), 400, "Failed for id: {id}");
        assert_eq!(
            response
                .json::<ErrorResponse>()
                .await
                .expect("Could not deserialize response body to ErrorResponse")
                .error,
            "Invalid member ID"
        );
    }

    assert!(app.member_store.calls().is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_read_from_the_store_once(app: &mut TestApp) {
    let response = app.get_member("7").await;
    assert_eq!(response.status().as_u16(), 404);

    assert_eq!(
        app.member_store.calls(),
        vec![MemberStoreCall::GetMember(MemberId::new(7))]
    );
}

#[test_context(FailingTestApp)]
#[tokio::test]
async fn should_still_serve_reads_the_store_can_answer(
    app: &mut FailingTestApp,
) {
    let response = app.get_member(&EXISTING_MEMBER_ID.to_string()).await;

    assert_eq!(response.status().as_u16(), 200);
    let response_body = get_json_response_body(response).await;
    assert_eq!(
        response_body["name"],
        existing_member().name.as_ref().as_str()
    );
}
