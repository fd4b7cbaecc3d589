mod common;

use actix_web::test;
use serde_json::json;
use uuid::Uuid;

use common::{create_channel, create_user, send, setup_test_app, API};

#[actix_web::test]
async fn test_one_channel_per_user() {
    let app = setup_test_app().await;
    let user = create_user(&app, "alice").await;

    let req = test::TestRequest::post()
        .uri(&format!("{}/channels", API))
        .set_json(json!({ "name": "Xchan", "userId": user }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["subscribers"], 0);

    let req = test::TestRequest::post()
        .uri(&format!("{}/channels", API))
        .set_json(json!({ "name": "Ychan", "userId": user }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "User already has a channel");
}

#[actix_web::test]
async fn test_name_and_custom_url_are_unique() {
    let app = setup_test_app().await;
    let a = create_user(&app, "alice").await;
    let b = create_user(&app, "bob").await;
    let c = create_user(&app, "carol").await;

    let req = test::TestRequest::post()
        .uri(&format!("{}/channels", API))
        .set_json(json!({ "name": "Tech", "userId": a, "customUrl": "tech" }));
    assert_eq!(send(&app, req).await.0, 201);

    let req = test::TestRequest::post()
        .uri(&format!("{}/channels", API))
        .set_json(json!({ "name": "Tech", "userId": b }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Channel name already taken");

    let req = test::TestRequest::post()
        .uri(&format!("{}/channels", API))
        .set_json(json!({ "name": "Other", "userId": c, "customUrl": "tech" }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Custom URL already taken");
}

#[actix_web::test]
async fn test_non_owner_update_is_forbidden() {
    let app = setup_test_app().await;
    let owner = create_user(&app, "alice").await;
    let channel = create_channel(&app, owner, "Mine").await;

    let (_, before) = send(&app, test::TestRequest::get().uri(&format!("{}/channels/{}", API, channel))).await;

    let req = test::TestRequest::put()
        .uri(&format!("{}/channels/{}", API, channel))
        .set_json(json!({ "userId": Uuid::new_v4(), "description": "hijacked" }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 403);
    assert_eq!(body["message"], "You are not authorized to update this channel");

    let (_, after) = send(&app, test::TestRequest::get().uri(&format!("{}/channels/{}", API, channel))).await;
    assert_eq!(before["data"], after["data"]);
}

#[actix_web::test]
async fn test_owner_update_cannot_touch_counters_or_owner() {
    let app = setup_test_app().await;
    let owner = create_user(&app, "alice").await;
    let channel = create_channel(&app, owner, "Mine").await;

    let req = test::TestRequest::put()
        .uri(&format!("{}/channels/{}", API, channel))
        .set_json(json!({
            "userId": owner,
            "description": "about me",
            "subscribers": 1000,
        }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["description"], "about me");
    assert_eq!(body["data"]["subscribers"], 0);
    assert_eq!(body["data"]["userId"], owner.to_string());
}

#[actix_web::test]
async fn test_lookup_by_user_and_delete() {
    let app = setup_test_app().await;
    let owner = create_user(&app, "alice").await;
    let channel = create_channel(&app, owner, "Mine").await;

    let (status, body) = send(&app, test::TestRequest::get().uri(&format!("{}/channels/user/{}", API, owner))).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], channel.to_string());

    let req = test::TestRequest::delete()
        .uri(&format!("{}/channels/{}", API, channel))
        .set_json(json!({ "userId": Uuid::new_v4() }));
    assert_eq!(send(&app, req).await.0, 403);

    let req = test::TestRequest::delete()
        .uri(&format!("{}/channels/{}", API, channel))
        .set_json(json!({ "userId": owner }));
    assert_eq!(send(&app, req).await.0, 200);

    let (status, body) = send(&app, test::TestRequest::get().uri(&format!("{}/channels/user/{}", API, owner))).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Channel not found for this user");
}

#[actix_web::test]
async fn test_deleting_channel_keeps_its_videos() {
    let app = setup_test_app().await;
    let owner = create_user(&app, "alice").await;
    let channel = create_channel(&app, owner, "Mine").await;
    let video = common::create_video(&app, channel, "Still here", "Music").await;

    let req = test::TestRequest::delete()
        .uri(&format!("{}/channels/{}", API, channel))
        .set_json(json!({ "userId": owner }));
    assert_eq!(send(&app, req).await.0, 200);

    let (status, _) = send(&app, test::TestRequest::get().uri(&format!("{}/videos/{}", API, video))).await;
    assert_eq!(status, 200);
}
