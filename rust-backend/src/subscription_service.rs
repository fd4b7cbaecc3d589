use std::sync::Arc;
use log::{info, warn};
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::models::{next_timestamp, CreateSubscriptionRequest, Subscription};
use crate::store::Store;

/// Rules for user → channel subscription edges; at most one per pair.
pub struct SubscriptionService {
    subscriptions: Arc<Store<Subscription>>,
}

impl SubscriptionService {
    pub fn new(subscriptions: Arc<Store<Subscription>>) -> Self {
        Self { subscriptions }
    }

    pub fn create_subscription(&self, req: CreateSubscriptionRequest) -> ApiResult<Subscription> {
        self.subscriptions.write(|subscriptions| {
            if subscriptions.any(|s| s.links(req.user_id, req.channel_id)) {
                warn!(
                    "Rejected subscription: user {} already subscribed to channel {}",
                    req.user_id, req.channel_id
                );
                return Err(ApiError::conflict("User is already subscribed to this channel"));
            }
            let subscription = Subscription::new(req);
            subscriptions.insert(subscription.clone());
            info!(
                "User {} subscribed to channel {}",
                subscription.user_id, subscription.channel_id
            );
            Ok(subscription)
        })
    }

    pub fn get_subscriptions_by_user_id(&self, user_id: Uuid) -> Vec<Subscription> {
        self.subscriptions.filter(|s| s.user_id == user_id)
    }

    pub fn get_subscribers_by_channel_id(&self, channel_id: Uuid) -> Vec<Subscription> {
        self.subscriptions.filter(|s| s.channel_id == channel_id)
    }

    pub fn is_user_subscribed(&self, user_id: Uuid, channel_id: Uuid) -> bool {
        self.subscriptions
            .read(|subscriptions| subscriptions.any(|s| s.links(user_id, channel_id)))
    }

    pub fn update_subscription_notification(
        &self,
        user_id: Uuid,
        channel_id: Uuid,
        enabled: bool,
    ) -> ApiResult<Subscription> {
        self.subscriptions.write(|subscriptions| {
            let subscription = subscriptions
                .find_mut(|s| s.links(user_id, channel_id))
                .ok_or_else(|| ApiError::not_found("Subscription not found"))?;
            subscription.notification_enabled = enabled;
            subscription.updated_at = next_timestamp(subscription.updated_at);
            info!(
                "Notifications {} for user {} on channel {}",
                if enabled { "enabled" } else { "disabled" },
                user_id,
                channel_id
            );
            Ok(subscription.clone())
        })
    }

    pub fn delete_subscription(&self, user_id: Uuid, channel_id: Uuid) -> ApiResult<()> {
        self.subscriptions
            .write(|subscriptions| subscriptions.remove_where(|s| s.links(user_id, channel_id)))
            .map(|_| info!("User {} unsubscribed from channel {}", user_id, channel_id))
            .ok_or_else(|| ApiError::not_found("Subscription not found"))
    }
}
