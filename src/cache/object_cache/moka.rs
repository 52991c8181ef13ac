use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.memory.max_capacity)
            .time_to_live(std::time::Duration::from_secs(config.default_ttl))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            config.memory.max_capacity, config.default_ttl
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        // 键中含有 token，日志只记录命中情况
        match self.inner.get(key).await {
            Some(value) => {
                debug!("Cache hit ({} bytes)", value.len());
                CacheResult::Found(value)
            }
            None => {
                debug!("Cache miss");
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{get_json, insert_json};
    use crate::config::MemoryConfig;

    fn cache() -> MokaCacheWrapper {
        MokaCacheWrapper::new(&CacheConfig {
            default_ttl: 60,
            memory: MemoryConfig { max_capacity: 100 },
        })
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = cache();

        cache.insert_raw("k".to_string(), "v".to_string()).await;
        assert_eq!(cache.get_raw("k").await, CacheResult::Found("v".to_string()));

        cache.remove("k").await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = cache();

        insert_json(&cache, "nums".to_string(), &vec![1, 2, 3]).await;
        assert_eq!(get_json::<Vec<i32>>(&cache, "nums").await, Some(vec![1, 2, 3]));

        cache.insert_raw("bad".to_string(), "{not json".to_string()).await;
        assert_eq!(get_json::<Vec<i32>>(&cache, "bad").await, None);
        assert_eq!(cache.get_raw("bad").await, CacheResult::NotFound);
    }
}
