//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod activities;
mod grades;
mod groups;
mod profiles;
mod submission_status;

#[cfg(test)]
pub(crate) mod tests;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{GamsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    /// 串行化小组成员写入，"检查-写入"在同一临界区内完成
    membership_lock: Arc<Mutex<()>>,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url, &config.database).await
    }

    /// 按给定 URL 连接数据库并运行迁移
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GamsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self {
            db,
            membership_lock: Arc::new(Mutex::new(())),
        })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GamsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // 内存数据库每个连接都是独立的库，只能使用单连接且不能回收
        let in_memory = url.contains(":memory:");
        let (opt, pool_options) = if in_memory {
            (
                opt,
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None),
            )
        } else {
            (
                opt.journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .pragma("cache_size", "-64000")
                    .pragma("temp_store", "memory")
                    .pragma("mmap_size", "536870912")
                    .pragma("wal_autocheckpoint", "1000"),
                SqlitePoolOptions::new()
                    .max_connections(config.pool_size)
                    .min_connections(1)
                    .idle_timeout(Duration::from_secs(300)),
            )
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| GamsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(config.pool_size.min(5))
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GamsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GamsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use std::collections::HashMap;

use crate::grading::{GradeScale, GraderStatus};
use crate::models::{
    PaginatedResponse,
    activities::{
        entities::{Activity, Criterion},
        requests::{ActivityListQuery, CreateActivityRequest},
        responses::{ActivityDetail, ActivityListItem, StudentActivityItem},
    },
    grades::entities::{GradeEntry, GradeFilter, GraderComment},
    groups::{
        entities::{Group, GroupedStudent},
        requests::{CreateGroupRequest, UpdateGroupRequest},
    },
    profiles::{
        entities::Profile,
        responses::{StudentSummary, TeacherSummary},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户资料模块
    async fn get_profile_by_user_id(&self, user_id: i64) -> Result<Option<Profile>> {
        self.get_profile_by_user_id_impl(user_id).await
    }

    async fn list_active_teachers(&self) -> Result<Vec<TeacherSummary>> {
        self.list_active_teachers_impl().await
    }

    async fn get_grade_scale(&self) -> Result<GradeScale> {
        self.get_grade_scale_impl().await
    }

    // 活动模块
    async fn create_activity(
        &self,
        creator_teacher_id: i64,
        req: CreateActivityRequest,
    ) -> Result<ActivityDetail> {
        self.create_activity_impl(creator_teacher_id, req).await
    }

    async fn get_activity_by_id(&self, activity_id: i64) -> Result<Option<Activity>> {
        self.get_activity_by_id_impl(activity_id).await
    }

    async fn get_activity_detail(&self, activity_id: i64) -> Result<Option<ActivityDetail>> {
        self.get_activity_detail_impl(activity_id).await
    }

    async fn list_teacher_activities(
        &self,
        query: ActivityListQuery,
    ) -> Result<PaginatedResponse<ActivityListItem>> {
        self.list_teacher_activities_impl(query).await
    }

    async fn list_activities_for_student(
        &self,
        student_id: &str,
        year_level: i32,
    ) -> Result<Vec<StudentActivityItem>> {
        self.list_activities_for_student_impl(student_id, year_level)
            .await
    }

    async fn delete_activity(&self, activity_id: i64) -> Result<bool> {
        self.delete_activity_impl(activity_id).await
    }

    async fn is_activity_grader(&self, activity_id: i64, teacher_id: i64) -> Result<bool> {
        self.is_activity_grader_impl(activity_id, teacher_id).await
    }

    async fn list_activity_graders(&self, activity_id: i64) -> Result<Vec<TeacherSummary>> {
        self.list_activity_graders_impl(activity_id).await
    }

    async fn list_criteria(&self, activity_id: i64) -> Result<Vec<Criterion>> {
        self.list_criteria_impl(activity_id).await
    }

    // 小组模块
    async fn list_activity_groups(&self, activity_id: i64) -> Result<Vec<Group>> {
        self.list_activity_groups_impl(activity_id).await
    }

    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>> {
        self.get_group_by_id_impl(group_id).await
    }

    async fn find_student_group(
        &self,
        activity_id: i64,
        student_id: &str,
    ) -> Result<Option<Group>> {
        self.find_student_group_impl(activity_id, student_id).await
    }

    async fn find_grouped_students(
        &self,
        activity_id: i64,
        student_ids: &[String],
    ) -> Result<Vec<GroupedStudent>> {
        self.find_grouped_students_impl(activity_id, student_ids)
            .await
    }

    async fn create_group(
        &self,
        creator_student_id: &str,
        req: CreateGroupRequest,
    ) -> Result<Group> {
        self.create_group_impl(creator_student_id, req).await
    }

    async fn update_group(
        &self,
        group_id: i64,
        req: UpdateGroupRequest,
    ) -> Result<Option<Group>> {
        self.update_group_impl(group_id, req).await
    }

    async fn replace_group_membership(
        &self,
        group_id: i64,
        student_ids: &[String],
    ) -> Result<()> {
        self.replace_group_membership_impl(group_id, student_ids)
            .await
    }

    async fn delete_group(&self, group_id: i64) -> Result<bool> {
        self.delete_group_impl(group_id).await
    }

    async fn list_student_groups(&self, student_id: &str) -> Result<Vec<Group>> {
        self.list_student_groups_impl(student_id).await
    }

    async fn list_available_students(
        &self,
        activity_id: i64,
        exclude_student_id: &str,
        year_levels: &[i32],
    ) -> Result<Vec<StudentSummary>> {
        self.list_available_students_impl(activity_id, exclude_student_id, year_levels)
            .await
    }

    // 评分模块
    async fn get_grade_entries(
        &self,
        activity_id: i64,
        filter: GradeFilter,
    ) -> Result<Vec<GradeEntry>> {
        self.get_grade_entries_impl(activity_id, filter).await
    }

    async fn upsert_grade_entry(
        &self,
        activity_id: i64,
        group_id: i64,
        teacher_id: i64,
        criteria_id: i64,
        score: &str,
    ) -> Result<()> {
        self.upsert_grade_entry_impl(activity_id, group_id, teacher_id, criteria_id, score)
            .await
    }

    async fn upsert_comment(
        &self,
        activity_id: i64,
        group_id: i64,
        teacher_id: i64,
        comment: &str,
    ) -> Result<()> {
        self.upsert_comment_impl(activity_id, group_id, teacher_id, comment)
            .await
    }

    async fn get_comments(
        &self,
        activity_id: i64,
        filter: GradeFilter,
    ) -> Result<Vec<GraderComment>> {
        self.get_comments_impl(activity_id, filter).await
    }

    // 提交状态模块
    async fn get_submission_statuses(
        &self,
        activity_id: i64,
    ) -> Result<HashMap<i64, GraderStatus>> {
        self.get_submission_statuses_impl(activity_id).await
    }

    async fn get_submission_status(
        &self,
        activity_id: i64,
        teacher_id: i64,
    ) -> Result<Option<GraderStatus>> {
        self.get_submission_status_impl(activity_id, teacher_id)
            .await
    }

    async fn set_submission_status(
        &self,
        activity_id: i64,
        teacher_id: i64,
        status: &GraderStatus,
    ) -> Result<()> {
        self.set_submission_status_impl(activity_id, teacher_id, status)
            .await
    }
}
