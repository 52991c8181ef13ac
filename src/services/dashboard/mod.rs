pub mod detail;
pub mod overview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::grading::dashboard::{DashboardView, build_dashboard};
use crate::models::activities::entities::Activity;
use crate::models::grades::entities::GradeFilter;
use crate::models::groups::entities::Group;
use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 单个活动的成绩
    pub async fn get_activity_dashboard(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_activity_dashboard(self, request, activity_id).await
    }

    // 全部活动的成绩概览
    pub async fn get_overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::get_overview(self, request).await
    }
}

/// 组装小组的成绩视图，评分与评语都经过提交状态过滤
async fn load_view(
    storage: &Arc<dyn Storage>,
    activity: &Activity,
    group: &Group,
) -> Result<DashboardView> {
    let filter = GradeFilter::visible_for_group(group.id);
    let criteria = storage.list_criteria(activity.id).await?;
    let entries = storage.get_grade_entries(activity.id, filter).await?;
    let comments = storage.get_comments(activity.id, filter).await?;
    Ok(build_dashboard(activity, group, &criteria, &entries, &comments))
}
