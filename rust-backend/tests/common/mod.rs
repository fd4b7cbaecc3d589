#![allow(dead_code)]

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use uuid::Uuid;

use content_platform_backend::config::Config;
use content_platform_backend::{handlers, services};

pub const API: &str = "/api/v1";

/// Lowest cost bcrypt accepts.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> Config {
    Config {
        bcrypt_cost: TEST_BCRYPT_COST,
        ..Config::default()
    }
}

pub async fn setup_test_app(
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let config = test_config();
    let app_state = web::Data::new(services::init_app_state(&config));

    test::init_service(
        App::new()
            .app_data(app_state)
            .configure(move |cfg| handlers::configure_routes(cfg, &config)),
    )
    .await
}

/// Sends a request and returns the status code and parsed JSON body.
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: test::TestRequest,
) -> (u16, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub fn id_of(body: &Value) -> Uuid {
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn create_user(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> Uuid {
    let req = test::TestRequest::post().uri(&format!("{}/users", API)).set_json(json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "password123",
    }));
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "user creation failed: {}", body);
    id_of(&body)
}

pub async fn create_channel(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user_id: Uuid,
    name: &str,
) -> Uuid {
    let req = test::TestRequest::post()
        .uri(&format!("{}/channels", API))
        .set_json(json!({ "name": name, "userId": user_id }));
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "channel creation failed: {}", body);
    id_of(&body)
}

pub async fn create_video(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    channel_id: Uuid,
    title: &str,
    category: &str,
) -> Uuid {
    let req = test::TestRequest::post().uri(&format!("{}/videos", API)).set_json(json!({
        "title": title,
        "channelId": channel_id,
        "videoUrl": "https://videos.example.com/v.mp4",
        "category": category,
    }));
    let (status, body) = send(app, req).await;
    assert_eq!(status, 201, "video creation failed: {}", body);
    id_of(&body)
}
