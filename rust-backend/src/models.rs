use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::store::Record;

/// Stamp for a mutation that follows `previous`. Always strictly later than
/// `previous`, even if the wall clock has not moved since.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

// Empty strings stand for "no custom URL" on the wire.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Stored user record. Deliberately not `Serialize`: the password hash only
/// leaves the store as a [`UserProfile`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub bio: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(req: CreateUserRequest, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: req.username,
            email: req.email,
            password_hash,
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            avatar: req.avatar.unwrap_or_default(),
            bio: req.bio.unwrap_or_default(),
            country: req.country.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub bio: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            country: user.country.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
}

/// Mutable user fields. Anything else in an update body is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
}

impl UserPatch {
    pub fn apply_to(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(country) = self.country {
            user.country = country;
        }
        user.updated_at = next_timestamp(user.updated_at);
    }
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub description: String,
    pub avatar: String,
    pub banner: String,
    pub custom_url: Option<String>,
    pub subscribers: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    pub fn new(req: CreateChannelRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: req.name,
            user_id: req.user_id,
            description: req.description.unwrap_or_default(),
            avatar: req.avatar.unwrap_or_default(),
            banner: req.banner.unwrap_or_default(),
            custom_url: non_empty(req.custom_url),
            subscribers: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Channel {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelRequest {
    pub name: String,
    pub user_id: Uuid,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub custom_url: Option<String>,
}

/// Mutable channel fields; `userId` and `subscribers` are not among them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    /// `Some("")` clears the custom URL.
    pub custom_url: Option<String>,
}

impl ChannelPatch {
    /// The custom URL this patch would leave on the channel, if it touches it.
    pub fn requested_custom_url(&self) -> Option<Option<String>> {
        self.custom_url.clone().map(|url| non_empty(Some(url)))
    }

    pub fn apply_to(self, channel: &mut Channel) {
        if let Some(custom_url) = self.requested_custom_url() {
            channel.custom_url = custom_url;
        }
        if let Some(name) = self.name {
            channel.name = name;
        }
        if let Some(description) = self.description {
            channel.description = description;
        }
        if let Some(avatar) = self.avatar {
            channel.avatar = avatar;
        }
        if let Some(banner) = self.banner {
            channel.banner = banner;
        }
        channel.updated_at = next_timestamp(channel.updated_at);
    }
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Unlisted => "unlisted",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub channel_id: Uuid,
    pub thumbnail: String,
    pub video_url: String,
    pub duration: u32,
    pub visibility: Visibility,
    pub category: String,
    pub tags: Vec<String>,
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(req: CreateVideoRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description.unwrap_or_default(),
            channel_id: req.channel_id,
            thumbnail: req.thumbnail.unwrap_or_default(),
            video_url: req.video_url,
            duration: req.duration.unwrap_or(0),
            visibility: req.visibility.unwrap_or_default(),
            category: req.category.unwrap_or_default(),
            tags: req.tags.unwrap_or_default(),
            views: 0,
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Video {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub title: String,
    pub channel_id: Uuid,
    pub video_url: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<u32>,
    pub visibility: Option<Visibility>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Mutable video fields. Counters and `channelId` are server-controlled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub video_url: Option<String>,
    pub duration: Option<u32>,
    pub visibility: Option<Visibility>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl VideoPatch {
    pub fn apply_to(self, video: &mut Video) {
        if let Some(title) = self.title {
            video.title = title;
        }
        if let Some(description) = self.description {
            video.description = description;
        }
        if let Some(thumbnail) = self.thumbnail {
            video.thumbnail = thumbnail;
        }
        if let Some(video_url) = self.video_url {
            video.video_url = video_url;
        }
        if let Some(duration) = self.duration {
            video.duration = duration;
        }
        if let Some(visibility) = self.visibility {
            video.visibility = visibility;
        }
        if let Some(category) = self.category {
            video.category = category;
        }
        if let Some(tags) = self.tags {
            video.tags = tags;
        }
        video.updated_at = next_timestamp(video.updated_at);
    }
}

/// Equality predicates for video listing, combined with AND.
///
/// Values are kept as raw query strings. Missing or empty fields do not
/// filter; a value that cannot name any video (a malformed id, an unknown
/// visibility) matches nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFilters {
    pub channel_id: Option<String>,
    pub category: Option<String>,
    pub visibility: Option<String>,
}

fn applied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl VideoFilters {
    pub fn matches(&self, video: &Video) -> bool {
        if let Some(channel_id) = applied(&self.channel_id) {
            match Uuid::parse_str(channel_id) {
                Ok(id) if id == video.channel_id => {}
                _ => return false,
            }
        }
        if let Some(category) = applied(&self.category) {
            if video.category != category {
                return false;
            }
        }
        if let Some(visibility) = applied(&self.visibility) {
            if video.visibility.as_str() != visibility {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
    pub likes: u64,
    pub dislikes: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(req: CreateCommentRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            video_id: req.video_id,
            user_id: req.user_id,
            content: req.content,
            parent_id: req.parent_id,
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Comment {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPatch {
    pub content: Option<String>,
}

impl CommentPatch {
    pub fn apply_to(self, comment: &mut Comment) {
        if let Some(content) = self.content {
            comment.content = content;
        }
        comment.updated_at = next_timestamp(comment.updated_at);
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub channel_id: Uuid,
    pub notification_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(req: CreateSubscriptionRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: req.user_id,
            channel_id: req.channel_id,
            notification_enabled: req.notification_enabled,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn links(&self, user_id: Uuid, channel_id: Uuid) -> bool {
        self.user_id == user_id && self.channel_id == channel_id
    }
}

impl Record for Subscription {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub user_id: Uuid,
    pub channel_id: Uuid,
    #[serde(default)]
    pub notification_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub notification_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
}

// ---------------------------------------------------------------------------
// Actor-bearing bodies
// ---------------------------------------------------------------------------

/// Body of an owner- or author-checked update: the acting user id plus the
/// allow-listed patch fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorPatch<P> {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub patch: P,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRequest {
    pub user_id: Uuid,
}
