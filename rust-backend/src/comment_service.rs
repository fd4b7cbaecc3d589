use std::sync::Arc;
use log::{info, warn};
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::models::{Comment, CommentPatch, CreateCommentRequest};
use crate::store::Store;

/// Rules for comments and their reply trees.
///
/// `parentId` is stored as given; it is not checked against existing
/// comments, and deleting a comment leaves its replies in place.
pub struct CommentService {
    comments: Arc<Store<Comment>>,
}

impl CommentService {
    pub fn new(comments: Arc<Store<Comment>>) -> Self {
        Self { comments }
    }

    pub fn create_comment(&self, req: CreateCommentRequest) -> Comment {
        let comment = Comment::new(req);
        self.comments.write(|comments| comments.insert(comment.clone()));
        match comment.parent_id {
            Some(parent) => info!("Created reply {} to comment {}", comment.id, parent),
            None => info!("Created comment {} on video {}", comment.id, comment.video_id),
        }
        comment
    }

    /// Top-level comments and replies alike, in insertion order.
    pub fn get_comments_by_video_id(&self, video_id: Uuid) -> Vec<Comment> {
        self.comments.filter(|c| c.video_id == video_id)
    }

    pub fn get_comment_by_id(&self, id: Uuid) -> ApiResult<Comment> {
        self.comments
            .get(id)
            .ok_or_else(|| ApiError::not_found("Comment not found"))
    }

    pub fn get_replies_by_comment_id(&self, parent_id: Uuid) -> Vec<Comment> {
        self.comments.filter(|c| c.parent_id == Some(parent_id))
    }

    pub fn update_comment(&self, id: Uuid, author_id: Uuid, patch: CommentPatch) -> ApiResult<Comment> {
        self.comments.write(|comments| {
            let comment = comments
                .get_mut(id)
                .ok_or_else(|| ApiError::not_found("Comment not found"))?;
            if comment.user_id != author_id {
                warn!("Rejected update of comment {} by non-author {}", id, author_id);
                return Err(ApiError::forbidden("You are not authorized to update this comment"));
            }
            patch.apply_to(comment);
            info!("Updated comment {}", id);
            Ok(comment.clone())
        })
    }

    pub fn delete_comment(&self, id: Uuid, author_id: Uuid) -> ApiResult<()> {
        self.comments.write(|comments| {
            let comment = comments
                .get(id)
                .ok_or_else(|| ApiError::not_found("Comment not found"))?;
            if comment.user_id != author_id {
                warn!("Rejected deletion of comment {} by non-author {}", id, author_id);
                return Err(ApiError::forbidden("You are not authorized to delete this comment"));
            }
            comments.remove(id);
            info!("Deleted comment {}", id);
            Ok(())
        })
    }
}
