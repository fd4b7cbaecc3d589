use std::sync::Arc;
use log::{debug, info};
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::models::{next_timestamp, CreateVideoRequest, Video, VideoFilters, VideoPatch};
use crate::store::Store;

pub struct VideoService {
    videos: Arc<Store<Video>>,
}

impl VideoService {
    pub fn new(videos: Arc<Store<Video>>) -> Self {
        Self { videos }
    }

    pub fn create_video(&self, req: CreateVideoRequest) -> Video {
        let video = Video::new(req);
        self.videos.write(|videos| videos.insert(video.clone()));
        info!("Created video {} on channel {}", video.id, video.channel_id);
        video
    }

    /// Videos matching every supplied filter, in insertion order.
    pub fn get_all_videos(&self, filters: &VideoFilters) -> Vec<Video> {
        self.videos.filter(|video| filters.matches(video))
    }

    pub fn get_video_by_id(&self, id: Uuid) -> ApiResult<Video> {
        self.videos
            .get(id)
            .ok_or_else(|| ApiError::not_found("Video not found"))
    }

    /// Bumps `views` by one and restamps `updatedAt`.
    pub fn increment_view_count(&self, id: Uuid) -> ApiResult<Video> {
        self.videos.write(|videos| {
            let video = videos
                .get_mut(id)
                .ok_or_else(|| ApiError::not_found("Video not found"))?;
            video.views += 1;
            video.updated_at = next_timestamp(video.updated_at);
            debug!("Video {} now has {} views", id, video.views);
            Ok(video.clone())
        })
    }

    /// A read through the public API: counts as a view and returns the
    /// record as it stands after counting.
    pub fn view_video(&self, id: Uuid) -> ApiResult<Video> {
        self.increment_view_count(id)
    }

    pub fn update_video(&self, id: Uuid, patch: VideoPatch) -> ApiResult<Video> {
        self.videos.write(|videos| {
            let video = videos
                .get_mut(id)
                .ok_or_else(|| ApiError::not_found("Video not found"))?;
            patch.apply_to(video);
            info!("Updated video {}", id);
            Ok(video.clone())
        })
    }

    pub fn delete_video(&self, id: Uuid) -> ApiResult<()> {
        self.videos
            .write(|videos| videos.remove(id))
            .map(|video| info!("Deleted video {}", video.id))
            .ok_or_else(|| ApiError::not_found("Video not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;

    fn service() -> VideoService {
        VideoService::new(Arc::new(Store::new()))
    }

    fn request(channel_id: Uuid, title: &str, category: Option<&str>) -> CreateVideoRequest {
        CreateVideoRequest {
            title: title.to_string(),
            channel_id,
            video_url: "https://x".to_string(),
            description: None,
            thumbnail: None,
            duration: None,
            visibility: None,
            category: category.map(str::to_string),
            tags: None,
        }
    }

    #[test]
    fn viewing_n_times_adds_n_views() {
        let videos = service();
        let video = videos.create_video(request(Uuid::new_v4(), "T", None));
        assert_eq!(video.views, 0);

        let mut last_stamp = video.updated_at;
        for expected in 1..=3 {
            let seen = videos.view_video(video.id).unwrap();
            assert_eq!(seen.views, expected);
            assert!(seen.updated_at > last_stamp);
            last_stamp = seen.updated_at;
        }
        assert_eq!(videos.get_video_by_id(video.id).unwrap().views, 3);
    }

    #[test]
    fn plain_lookup_does_not_count_a_view() {
        let videos = service();
        let video = videos.create_video(request(Uuid::new_v4(), "T", None));
        videos.get_video_by_id(video.id).unwrap();
        assert_eq!(videos.get_video_by_id(video.id).unwrap().views, 0);
    }

    #[test]
    fn viewing_missing_video_is_not_found() {
        let videos = service();
        assert!(matches!(videos.view_video(Uuid::new_v4()), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn filters_select_in_insertion_order() {
        let videos = service();
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let first = videos.create_video(request(x, "one", Some("Technology")));
        videos.create_video(request(x, "two", Some("Music")));
        videos.create_video(request(y, "three", Some("Technology")));
        let fourth = videos.create_video(request(x, "four", Some("Technology")));

        let filters = VideoFilters {
            channel_id: Some(x.to_string()),
            category: Some("Technology".to_string()),
            visibility: None,
        };
        let ids: Vec<_> = videos.get_all_videos(&filters).into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![first.id, fourth.id]);
        assert_eq!(videos.get_all_videos(&VideoFilters::default()).len(), 4);

        let private = VideoFilters {
            visibility: Some("private".to_string()),
            ..Default::default()
        };
        assert!(videos.get_all_videos(&private).is_empty());
    }

    #[test]
    fn update_keeps_counters() {
        let videos = service();
        let video = videos.create_video(request(Uuid::new_v4(), "T", None));
        videos.view_video(video.id).unwrap();
        let updated = videos
            .update_video(
                video.id,
                VideoPatch {
                    title: Some("New".to_string()),
                    visibility: Some(Visibility::Unlisted),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.visibility, Visibility::Unlisted);
        assert_eq!(updated.views, 1);
        assert_eq!(updated.created_at, video.created_at);
    }

    #[test]
    fn delete_then_missing() {
        let videos = service();
        let video = videos.create_video(request(Uuid::new_v4(), "T", None));
        videos.delete_video(video.id).unwrap();
        assert!(matches!(videos.delete_video(video.id), Err(ApiError::NotFound(_))));
        assert!(matches!(
            videos.update_video(video.id, VideoPatch::default()),
            Err(ApiError::NotFound(_))
        ));
    }
}
