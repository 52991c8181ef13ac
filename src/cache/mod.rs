//! 对象缓存
//!
//! 只缓存按 token 解析出的用户资料；评分与提交状态每次都从存储层读取。

pub mod object_cache;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::config::AppConfig;

pub use object_cache::moka::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String);
    async fn remove(&self, key: &str);
}

/// 读取并反序列化；数据损坏时视为未命中并清除该键
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding malformed cache entry {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        CacheResult::NotFound => None,
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key, json).await,
        Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
    }
}

/// 按配置创建对象缓存
pub fn create_object_cache() -> Arc<dyn ObjectCache> {
    let config = AppConfig::get();
    Arc::new(MokaCacheWrapper::new(&config.cache))
}
