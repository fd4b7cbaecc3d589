pub mod models;
pub mod store;
pub mod errors;
pub mod config;
pub mod services;
pub mod response;
pub mod validation;
pub mod handlers;
pub mod user_service;
pub mod channel_service;
pub mod video_service;
pub mod comment_service;
pub mod subscription_service;

use crate::channel_service::ChannelService;
use crate::comment_service::CommentService;
use crate::subscription_service::SubscriptionService;
use crate::user_service::UserService;
use crate::video_service::VideoService;

/// Process-wide state shared by every worker. Each service owns its own
/// store lock, so there is no lock around the state itself.
pub struct AppState {
    pub users: UserService,
    pub channels: ChannelService,
    pub videos: VideoService,
    pub comments: CommentService,
    pub subscriptions: SubscriptionService,
}
