use actix_web::{delete, get, patch, post, put, web, HttpRequest, HttpResponse};
use serde_json::json;
use log::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{ApiError, ApiResult};
use crate::models::{
    ActorPatch, ActorRequest, ChannelPatch, CommentPatch, CreateChannelRequest,
    CreateCommentRequest, CreateSubscriptionRequest, CreateUserRequest, CreateVideoRequest,
    NotificationRequest, SubscriptionStatus, UserPatch, VideoFilters, VideoPatch,
};
use crate::response;
use crate::validation::Validate;
use crate::AppState;

type State = web::Data<AppState>;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[post("/users")]
async fn create_user(req: web::Json<CreateUserRequest>, state: State) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;
    let user = state.users.create_user(req)?;
    Ok(response::created("User created successfully", user))
}

#[get("/users")]
async fn get_users(state: State) -> HttpResponse {
    response::ok("Users retrieved successfully", state.users.get_all_users())
}

#[get("/users/{id}")]
async fn get_user(path: web::Path<Uuid>, state: State) -> ApiResult<HttpResponse> {
    let user = state.users.get_user_by_id(path.into_inner())?;
    Ok(response::ok("User retrieved successfully", user))
}

#[put("/users/{id}")]
async fn update_user(
    path: web::Path<Uuid>,
    patch: web::Json<UserPatch>,
    state: State,
) -> ApiResult<HttpResponse> {
    let patch = patch.into_inner();
    patch.validate()?;
    let user = state.users.update_user(path.into_inner(), patch)?;
    Ok(response::ok("User updated successfully", user))
}

#[delete("/users/{id}")]
async fn delete_user(path: web::Path<Uuid>, state: State) -> ApiResult<HttpResponse> {
    state.users.delete_user(path.into_inner())?;
    Ok(response::ok("User deleted successfully", ()))
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

#[post("/channels")]
async fn create_channel(req: web::Json<CreateChannelRequest>, state: State) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;
    let channel = state.channels.create_channel(req)?;
    Ok(response::created("Channel created successfully", channel))
}

#[get("/channels")]
async fn get_channels(state: State) -> HttpResponse {
    response::ok("Channels retrieved successfully", state.channels.get_all_channels())
}

#[get("/channels/user/{user_id}")]
async fn get_channel_by_user(path: web::Path<Uuid>, state: State) -> ApiResult<HttpResponse> {
    let channel = state.channels.get_channel_by_user_id(path.into_inner())?;
    Ok(response::ok("Channel retrieved successfully", channel))
}

#[get("/channels/{id}")]
async fn get_channel(path: web::Path<Uuid>, state: State) -> ApiResult<HttpResponse> {
    let channel = state.channels.get_channel_by_id(path.into_inner())?;
    Ok(response::ok("Channel retrieved successfully", channel))
}

#[put("/channels/{id}")]
async fn update_channel(
    path: web::Path<Uuid>,
    body: web::Json<ActorPatch<ChannelPatch>>,
    state: State,
) -> ApiResult<HttpResponse> {
    let ActorPatch { user_id, patch } = body.into_inner();
    patch.validate()?;
    let channel = state.channels.update_channel(path.into_inner(), user_id, patch)?;
    Ok(response::ok("Channel updated successfully", channel))
}

#[delete("/channels/{id}")]
async fn delete_channel(
    path: web::Path<Uuid>,
    body: web::Json<ActorRequest>,
    state: State,
) -> ApiResult<HttpResponse> {
    state.channels.delete_channel(path.into_inner(), body.user_id)?;
    Ok(response::ok("Channel deleted successfully", ()))
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

#[post("/videos")]
async fn create_video(req: web::Json<CreateVideoRequest>, state: State) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;
    let video = state.videos.create_video(req);
    Ok(response::created("Video created successfully", video))
}

#[get("/videos")]
async fn get_videos(filters: web::Query<VideoFilters>, state: State) -> HttpResponse {
    let videos = state.videos.get_all_videos(&filters);
    response::ok("Videos retrieved successfully", videos)
}

/// Every successful fetch counts as a view.
#[get("/videos/{id}")]
async fn get_video(path: web::Path<Uuid>, state: State) -> ApiResult<HttpResponse> {
    let video = state.videos.view_video(path.into_inner())?;
    Ok(response::ok("Video retrieved successfully", video))
}

#[put("/videos/{id}")]
async fn update_video(
    path: web::Path<Uuid>,
    patch: web::Json<VideoPatch>,
    state: State,
) -> ApiResult<HttpResponse> {
    let patch = patch.into_inner();
    patch.validate()?;
    let video = state.videos.update_video(path.into_inner(), patch)?;
    Ok(response::ok("Video updated successfully", video))
}

#[delete("/videos/{id}")]
async fn delete_video(path: web::Path<Uuid>, state: State) -> ApiResult<HttpResponse> {
    state.videos.delete_video(path.into_inner())?;
    Ok(response::ok("Video deleted successfully", ()))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[post("/comments")]
async fn create_comment(req: web::Json<CreateCommentRequest>, state: State) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;
    let comment = state.comments.create_comment(req);
    Ok(response::created("Comment created successfully", comment))
}

#[get("/comments/video/{video_id}")]
async fn get_video_comments(path: web::Path<Uuid>, state: State) -> HttpResponse {
    let comments = state.comments.get_comments_by_video_id(path.into_inner());
    response::ok("Comments retrieved successfully", comments)
}

#[get("/comments/{id}")]
async fn get_comment(path: web::Path<Uuid>, state: State) -> ApiResult<HttpResponse> {
    let comment = state.comments.get_comment_by_id(path.into_inner())?;
    Ok(response::ok("Comment retrieved successfully", comment))
}

#[get("/comments/{id}/replies")]
async fn get_replies(path: web::Path<Uuid>, state: State) -> HttpResponse {
    let replies = state.comments.get_replies_by_comment_id(path.into_inner());
    response::ok("Replies retrieved successfully", replies)
}

#[put("/comments/{id}")]
async fn update_comment(
    path: web::Path<Uuid>,
    body: web::Json<ActorPatch<CommentPatch>>,
    state: State,
) -> ApiResult<HttpResponse> {
    let ActorPatch { user_id, patch } = body.into_inner();
    patch.validate()?;
    let comment = state.comments.update_comment(path.into_inner(), user_id, patch)?;
    Ok(response::ok("Comment updated successfully", comment))
}

#[delete("/comments/{id}")]
async fn delete_comment(
    path: web::Path<Uuid>,
    body: web::Json<ActorRequest>,
    state: State,
) -> ApiResult<HttpResponse> {
    state.comments.delete_comment(path.into_inner(), body.user_id)?;
    Ok(response::ok("Comment deleted successfully", ()))
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[post("/subscriptions")]
async fn create_subscription(
    req: web::Json<CreateSubscriptionRequest>,
    state: State,
) -> ApiResult<HttpResponse> {
    let subscription = state.subscriptions.create_subscription(req.into_inner())?;
    Ok(response::created("Subscription created successfully", subscription))
}

#[get("/subscriptions/user/{user_id}")]
async fn get_user_subscriptions(path: web::Path<Uuid>, state: State) -> HttpResponse {
    let subscriptions = state.subscriptions.get_subscriptions_by_user_id(path.into_inner());
    response::ok("Subscriptions retrieved successfully", subscriptions)
}

#[get("/subscriptions/channel/{channel_id}")]
async fn get_channel_subscribers(path: web::Path<Uuid>, state: State) -> HttpResponse {
    let subscribers = state.subscriptions.get_subscribers_by_channel_id(path.into_inner());
    response::ok("Subscribers retrieved successfully", subscribers)
}

#[get("/subscriptions/check/{user_id}/{channel_id}")]
async fn check_subscription(path: web::Path<(Uuid, Uuid)>, state: State) -> HttpResponse {
    let (user_id, channel_id) = path.into_inner();
    let status = SubscriptionStatus {
        is_subscribed: state.subscriptions.is_user_subscribed(user_id, channel_id),
    };
    response::ok("Subscription status checked successfully", status)
}

#[patch("/subscriptions/{user_id}/{channel_id}")]
async fn update_subscription_notification(
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<NotificationRequest>,
    state: State,
) -> ApiResult<HttpResponse> {
    let (user_id, channel_id) = path.into_inner();
    let subscription = state.subscriptions.update_subscription_notification(
        user_id,
        channel_id,
        body.notification_enabled,
    )?;
    Ok(response::ok(
        "Subscription notification settings updated successfully",
        subscription,
    ))
}

#[delete("/subscriptions/{user_id}/{channel_id}")]
async fn delete_subscription(path: web::Path<(Uuid, Uuid)>, state: State) -> ApiResult<HttpResponse> {
    let (user_id, channel_id) = path.into_inner();
    state.subscriptions.delete_subscription(user_id, channel_id)?;
    Ok(response::ok("Subscription deleted successfully", ()))
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "API is running"
    }))
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "status": "error",
        "message": format!("Cannot find {} on this server!", req.uri())
    }))
}

/// Extractor settings so malformed input gets the same error envelope as
/// domain failures.
fn extractor_configs(cfg: &mut web::ServiceConfig, json_limit: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(json_limit)
            .error_handler(|err, _req| {
                debug!("Rejected JSON body: {}", err);
                ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
            }),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        debug!("Rejected path parameter: {}", err);
        ApiError::not_found("Resource not found").into()
    }));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &Config) {
    extractor_configs(cfg, config.json_limit_bytes);

    cfg.service(health).service(
        web::scope(&config.api_prefix())
            .service(create_user)
            .service(get_users)
            .service(get_user)
            .service(update_user)
            .service(delete_user)
            .service(create_channel)
            .service(get_channels)
            .service(get_channel_by_user)
            .service(get_channel)
            .service(update_channel)
            .service(delete_channel)
            .service(create_video)
            .service(get_videos)
            .service(get_video)
            .service(update_video)
            .service(delete_video)
            .service(create_comment)
            .service(get_video_comments)
            .service(get_replies)
            .service(get_comment)
            .service(update_comment)
            .service(delete_comment)
            .service(create_subscription)
            .service(get_user_subscriptions)
            .service(get_channel_subscribers)
            .service(check_subscription)
            .service(update_subscription_notification)
            .service(delete_subscription),
    )
    .default_service(web::route().to(not_found));
}
