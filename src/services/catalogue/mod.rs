pub mod activities;
pub mod students;
pub mod teachers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::groups::requests::AvailableStudentsQuery;
use crate::storage::Storage;

/// 只读目录：学生可参与的活动、可邀请的同学、可选评分人
pub struct CatalogueService {
    storage: Option<Arc<dyn Storage>>,
}

impl CatalogueService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_student_activities(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        activities::list_student_activities(self, request).await
    }

    pub async fn list_available_students(
        &self,
        request: &HttpRequest,
        query: AvailableStudentsQuery,
    ) -> ActixResult<HttpResponse> {
        students::list_available_students(self, request, query).await
    }

    pub async fn list_teachers(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teachers::list_teachers(self, request).await
    }
}
