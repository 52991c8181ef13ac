pub mod save;
pub mod submit;
pub mod workspace;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::grading::GraderStatus;
use crate::models::grades::requests::SaveGradesRequest;
use crate::storage::Storage;

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
    lock_after_submit: Option<bool>,
}

impl GradingService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            lock_after_submit: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_lock(lock_after_submit: bool) -> Self {
        Self {
            storage: None,
            lock_after_submit: Some(lock_after_submit),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 提交后是否拒绝继续修改成绩
    pub(crate) fn lock_after_submit(&self) -> bool {
        self.lock_after_submit
            .unwrap_or_else(|| AppConfig::get().grades_locked_after_submit())
    }

    /// 当前评分人的成绩是否已锁定
    pub(crate) fn is_locked(&self, status: &GraderStatus) -> bool {
        self.lock_after_submit() && status.is_submitted()
    }

    // 评分工作台
    pub async fn get_workspace(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        workspace::get_workspace(self, request, activity_id).await
    }

    // 保存评分与评语
    pub async fn save_grades(
        &self,
        request: &HttpRequest,
        activity_id: i64,
        grades_data: SaveGradesRequest,
    ) -> ActixResult<HttpResponse> {
        save::save_grades(self, request, activity_id, grades_data).await
    }

    // 提交评分（draft → submitted）
    pub async fn submit_grades(
        &self,
        request: &HttpRequest,
        activity_id: i64,
    ) -> ActixResult<HttpResponse> {
        submit::submit_grades(self, request, activity_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_lock_requires_submission() {
        let service = GradingService::with_lock(true);
        let mut status = GraderStatus::draft();
        assert!(!service.is_locked(&status));

        status.submit(Utc::now());
        assert!(service.is_locked(&status));

        let unlocked = GradingService::with_lock(false);
        assert!(!unlocked.is_locked(&status));
    }
}
