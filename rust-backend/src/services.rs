use std::sync::Arc;

use crate::channel_service::ChannelService;
use crate::comment_service::CommentService;
use crate::config::Config;
use crate::models::{Channel, Comment, Subscription, User, Video};
use crate::store::Store;
use crate::subscription_service::SubscriptionService;
use crate::user_service::UserService;
use crate::video_service::VideoService;
use crate::AppState;

/// The five collections, each created empty.
#[derive(Default)]
pub struct Stores {
    pub users: Arc<Store<User>>,
    pub channels: Arc<Store<Channel>>,
    pub videos: Arc<Store<Video>>,
    pub comments: Arc<Store<Comment>>,
    pub subscriptions: Arc<Store<Subscription>>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn init_app_state_with(stores: Stores, config: &Config) -> AppState {
    AppState {
        users: UserService::new(stores.users, config.bcrypt_cost),
        channels: ChannelService::new(stores.channels),
        videos: VideoService::new(stores.videos),
        comments: CommentService::new(stores.comments),
        subscriptions: SubscriptionService::new(stores.subscriptions),
    }
}

/// Builds fresh, empty stores and the services that guard them.
pub fn init_app_state(config: &Config) -> AppState {
    init_app_state_with(Stores::new(), config)
}
