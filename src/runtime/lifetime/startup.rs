use crate::cache::{ObjectCache, create_object_cache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 检查等级绩点表，缺失时使用内置标准表
async fn check_grade_scale(storage: &Arc<dyn Storage>) {
    match storage.get_grade_scale().await {
        Ok(scale) => debug!("Grading scale loaded with {} entries", scale.entries().len()),
        Err(e) => warn!("Failed to load grading scale: {}, using standard scale", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 已有进程级 provider 时安装会失败，沿用已有的即可
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider is already installed");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    check_grade_scale(&storage).await;

    let config = AppConfig::get();
    if config.grades_locked_after_submit() {
        info!("Grades are locked once a grader submits");
    }

    // 仅缓存用户资料
    let cache = create_object_cache();
    warn!(
        "Moka cache backend initialized (ttl {}s, capacity {})",
        config.cache.default_ttl, config.cache.memory.max_capacity
    );

    Ok(StartupContext { storage, cache })
}
