use std::sync::Arc;
use log::{info, warn};
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::models::{Channel, ChannelPatch, CreateChannelRequest};
use crate::store::Store;

/// Rules for the channel collection.
///
/// One channel per user; `name` and non-empty `customUrl` are unique across
/// all channels. Every check runs under the same write lock as the commit,
/// so two concurrent creations for one user cannot both pass.
pub struct ChannelService {
    channels: Arc<Store<Channel>>,
}

impl ChannelService {
    pub fn new(channels: Arc<Store<Channel>>) -> Self {
        Self { channels }
    }

    pub fn create_channel(&self, req: CreateChannelRequest) -> ApiResult<Channel> {
        self.channels.write(|channels| {
            if channels.any(|c| c.user_id == req.user_id) {
                warn!("Rejected channel creation: user {} already has a channel", req.user_id);
                return Err(ApiError::conflict("User already has a channel"));
            }
            if channels.any(|c| c.name == req.name) {
                warn!("Rejected channel creation: name {} already taken", req.name);
                return Err(ApiError::conflict("Channel name already taken"));
            }

            let channel = Channel::new(req);
            if let Some(url) = channel.custom_url.as_deref() {
                if channels.any(|c| c.custom_url.as_deref() == Some(url)) {
                    warn!("Rejected channel creation: custom URL {} already taken", url);
                    return Err(ApiError::conflict("Custom URL already taken"));
                }
            }

            info!("Created channel {} for user {}", channel.id, channel.user_id);
            channels.insert(channel.clone());
            Ok(channel)
        })
    }

    pub fn get_all_channels(&self) -> Vec<Channel> {
        self.channels.all()
    }

    pub fn get_channel_by_id(&self, id: Uuid) -> ApiResult<Channel> {
        self.channels
            .get(id)
            .ok_or_else(|| ApiError::not_found("Channel not found"))
    }

    pub fn get_channel_by_user_id(&self, user_id: Uuid) -> ApiResult<Channel> {
        self.channels
            .read(|channels| channels.find(|c| c.user_id == user_id).cloned())
            .ok_or_else(|| ApiError::not_found("Channel not found for this user"))
    }

    pub fn update_channel(&self, id: Uuid, owner_id: Uuid, patch: ChannelPatch) -> ApiResult<Channel> {
        self.channels.write(|channels| {
            let current = channels
                .get(id)
                .ok_or_else(|| ApiError::not_found("Channel not found"))?;

            if current.user_id != owner_id {
                warn!("Rejected update of channel {} by non-owner {}", id, owner_id);
                return Err(ApiError::forbidden("You are not authorized to update this channel"));
            }

            if let Some(name) = patch.name.as_ref().filter(|n| **n != current.name) {
                if channels.any(|c| c.id != id && c.name == *name) {
                    warn!("Rejected update of channel {}: name {} already taken", id, name);
                    return Err(ApiError::conflict("Channel name already taken"));
                }
            }

            if let Some(Some(url)) = patch.requested_custom_url() {
                if current.custom_url.as_deref() != Some(url.as_str())
                    && channels.any(|c| c.id != id && c.custom_url.as_deref() == Some(url.as_str()))
                {
                    warn!("Rejected update of channel {}: custom URL {} already taken", id, url);
                    return Err(ApiError::conflict("Custom URL already taken"));
                }
            }

            let channel = channels
                .get_mut(id)
                .ok_or_else(|| ApiError::not_found("Channel not found"))?;
            patch.apply_to(channel);
            info!("Updated channel {}", id);
            Ok(channel.clone())
        })
    }

    pub fn delete_channel(&self, id: Uuid, owner_id: Uuid) -> ApiResult<()> {
        self.channels.write(|channels| {
            let channel = channels
                .get(id)
                .ok_or_else(|| ApiError::not_found("Channel not found"))?;
            if channel.user_id != owner_id {
                warn!("Rejected deletion of channel {} by non-owner {}", id, owner_id);
                return Err(ApiError::forbidden("You are not authorized to delete this channel"));
            }
            channels.remove(id);
            info!("Deleted channel {}", id);
            Ok(())
        })
    }
}
