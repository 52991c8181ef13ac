pub mod create;
pub mod delete;
pub mod detail;
pub mod groups;
pub mod list;
pub mod progress;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::activities::requests::{ActivityQueryParams, CreateActivityRequest};
use crate::storage::Storage;

pub struct ActivityService {
    storage: Option<Arc<dyn Storage>>,
}

impl ActivityService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 创建活动
    pub async fn create_activity(
        &self,
        request: &HttpRequest,
        activity_data: CreateActivityRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_activity(self, request, activity_data).await
    }

    // 列出教师创建或参与评分的活动
    pub async fn list_activities(
        &self,
        request: &HttpRequest,
        query: ActivityQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_activities(self, request, query).await
    }

    // 活动详情
    pub async fn get_activity(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_activity(self, request, activity_id).await
    }

    // 删除活动（仅创建者）
    pub async fn delete_activity(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_activity(self, request, activity_id).await
    }

    // 活动的小组与成员
    pub async fn list_activity_groups(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        groups::list_activity_groups(self, request, activity_id).await
    }

    // 评分进度报告
    pub async fn get_progress(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        progress::get_progress(self, request, activity_id).await
    }
}
