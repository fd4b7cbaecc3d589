use std::sync::OnceLock;
use regex::Regex;

use crate::errors::{ApiError, FieldError};
use crate::models::{
    ChannelPatch, CommentPatch, CreateChannelRequest, CreateCommentRequest, CreateUserRequest,
    CreateVideoRequest, UserPatch, VideoPatch,
};

/// Field-shape checks run by the HTTP layer before a payload reaches a
/// service. Every failing field is reported, not just the first.
pub trait Validate {
    fn check(&self, checker: &mut Checker);

    fn validate(&self) -> Result<(), ApiError> {
        let mut checker = Checker::default();
        self.check(&mut checker);
        checker.finish()
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern compiles"))
}

#[derive(Debug, Default)]
pub struct Checker {
    details: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &str, message: String) {
        self.details.push(FieldError::new(field, message));
    }

    pub fn length(&mut self, field: &str, label: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            if min == 1 {
                self.fail(field, format!("{} cannot be empty", label));
            } else {
                self.fail(field, format!("{} must be at least {} characters long", label, min));
            }
        } else if len > max {
            self.fail(field, format!("{} cannot be longer than {} characters", label, max));
        }
    }

    pub fn max_length(&mut self, field: &str, label: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            self.length(field, label, value, 0, max);
        }
    }

    pub fn alphanumeric(&mut self, field: &str, label: &str, value: &str) {
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            self.fail(field, format!("{} must only contain alphanumeric characters", label));
        }
    }

    pub fn email(&mut self, field: &str, label: &str, value: &str) {
        if !email_regex().is_match(value) {
            self.fail(field, format!("{} must be a valid email address", label));
        }
    }

    pub fn uri(&mut self, field: &str, label: &str, value: Option<&str>) {
        if let Some(value) = value {
            if url::Url::parse(value).is_err() {
                self.fail(field, format!("{} must be a valid URI", label));
            }
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.details.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation { details: self.details })
        }
    }
}

fn check_username(c: &mut Checker, username: &str) {
    c.alphanumeric("username", "Username", username);
    c.length("username", "Username", username, 3, 30);
}

fn check_custom_url(c: &mut Checker, custom_url: &str) {
    // An empty value means "no custom URL".
    if !custom_url.is_empty() {
        c.alphanumeric("customUrl", "Custom URL", custom_url);
        c.length("customUrl", "Custom URL", custom_url, 3, 30);
    }
}

impl Validate for CreateUserRequest {
    fn check(&self, c: &mut Checker) {
        check_username(c, &self.username);
        c.email("email", "Email", &self.email);
        c.length("password", "Password", &self.password, 8, usize::MAX);
        c.max_length("firstName", "First name", self.first_name.as_deref(), 50);
        c.max_length("lastName", "Last name", self.last_name.as_deref(), 50);
        c.uri("avatar", "Avatar", self.avatar.as_deref());
        c.max_length("bio", "Bio", self.bio.as_deref(), 1000);
        c.max_length("country", "Country", self.country.as_deref(), 50);
    }
}

impl Validate for UserPatch {
    fn check(&self, c: &mut Checker) {
        if let Some(username) = &self.username {
            check_username(c, username);
        }
        if let Some(email) = &self.email {
            c.email("email", "Email", email);
        }
        c.max_length("firstName", "First name", self.first_name.as_deref(), 50);
        c.max_length("lastName", "Last name", self.last_name.as_deref(), 50);
        c.uri("avatar", "Avatar", self.avatar.as_deref());
        c.max_length("bio", "Bio", self.bio.as_deref(), 1000);
        c.max_length("country", "Country", self.country.as_deref(), 50);
    }
}

impl Validate for CreateChannelRequest {
    fn check(&self, c: &mut Checker) {
        c.length("name", "Channel name", &self.name, 3, 50);
        c.max_length("description", "Description", self.description.as_deref(), 5000);
        c.uri("avatar", "Avatar", self.avatar.as_deref());
        c.uri("banner", "Banner", self.banner.as_deref());
        if let Some(custom_url) = &self.custom_url {
            check_custom_url(c, custom_url);
        }
    }
}

impl Validate for ChannelPatch {
    fn check(&self, c: &mut Checker) {
        if let Some(name) = &self.name {
            c.length("name", "Channel name", name, 3, 50);
        }
        c.max_length("description", "Description", self.description.as_deref(), 5000);
        c.uri("avatar", "Avatar", self.avatar.as_deref());
        c.uri("banner", "Banner", self.banner.as_deref());
        if let Some(custom_url) = &self.custom_url {
            check_custom_url(c, custom_url);
        }
    }
}

impl Validate for CreateVideoRequest {
    fn check(&self, c: &mut Checker) {
        c.length("title", "Title", &self.title, 3, 100);
        c.max_length("description", "Description", self.description.as_deref(), 5000);
        c.uri("thumbnail", "Thumbnail", self.thumbnail.as_deref());
        c.uri("videoUrl", "Video URL", Some(&self.video_url));
    }
}

impl Validate for VideoPatch {
    fn check(&self, c: &mut Checker) {
        if let Some(title) = &self.title {
            c.length("title", "Title", title, 3, 100);
        }
        c.max_length("description", "Description", self.description.as_deref(), 5000);
        c.uri("thumbnail", "Thumbnail", self.thumbnail.as_deref());
        c.uri("videoUrl", "Video URL", self.video_url.as_deref());
    }
}

impl Validate for CreateCommentRequest {
    fn check(&self, c: &mut Checker) {
        c.length("content", "Comment content", &self.content, 1, 1000);
    }
}

impl Validate for CommentPatch {
    fn check(&self, c: &mut Checker) {
        if let Some(content) = &self.content {
            c.length("content", "Comment content", content, 1, 1000);
        }
    }
}
