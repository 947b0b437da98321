use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// 分析周期内允许的记忆窗口（秒）
pub const MIN_TTL_SECS: u64 = 60;
pub const MAX_TTL_SECS: u64 = 300;
pub const DEFAULT_TTL_SECS: u64 = 300;

/// 把配置 TTL 收敛到允许区间
pub fn clamp_ttl(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_TTL_SECS, MAX_TTL_SECS))
}

/// 显式的请求级记忆缓存：按调用签名缓存取数结果，过期即失效
///
/// 窗口内重复取数返回同一份 `Arc` 结果，不触发第二次上游请求；
/// 手动刷新通过 `clear` 清空。进程重启后不保留。
pub struct TtlCache<K, V> {
    ttl: Duration,
    inner: DashMap<K, (Instant, Arc<V>)>,
}

impl<K: Eq + Hash + Clone, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 命中且未过期时返回缓存值；过期条目顺手移除
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let hit = self
            .inner
            .get(key)
            .map(|entry| (entry.0, Arc::clone(&entry.1)))?;
        if hit.0.elapsed() < self.ttl {
            return Some(hit.1);
        }
        self.inner.remove(key);
        None
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.inner.insert(key, (Instant::now(), Arc::clone(&value)));
        value
    }

    /// 手动刷新：清空全部缓存条目
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// 最近一次写入距今的时长，缓存为空时为 None
    pub fn newest_age(&self) -> Option<Duration> {
        self.inner
            .iter()
            .map(|entry| entry.value().0.elapsed())
            .min()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_ttl, TtlCache};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn repeated_get_returns_same_arc_within_window() {
        let cache: TtlCache<String, Vec<u32>> = TtlCache::new(Duration::from_secs(60));
        let inserted = cache.insert("spot:000858.SZ".to_string(), vec![1, 2, 3]);

        let first = cache.get(&"spot:000858.SZ".to_string()).expect("hit");
        let second = cache.get(&"spot:000858.SZ".to_string()).expect("hit");
        assert!(Arc::ptr_eq(&inserted, &first));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn expired_entries_miss_and_are_evicted() {
        let cache: TtlCache<u8, u8> = TtlCache::new(Duration::from_millis(10));
        cache.insert(1, 42);
        std::thread::sleep(Duration::from_millis(25));

        assert!(cache.get(&1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_forces_refetch() {
        let cache: TtlCache<u8, u8> = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, 42);
        cache.clear();
        assert!(cache.get(&1).is_none());
    }

    #[test]
    fn newest_age_tracks_latest_insert() {
        let cache: TtlCache<u8, u8> = TtlCache::new(Duration::from_secs(60));
        assert!(cache.newest_age().is_none());
        cache.insert(1, 1);
        assert!(cache.newest_age().expect("age") < Duration::from_secs(1));
    }

    #[test]
    fn ttl_clamped_to_allowed_window() {
        assert_eq!(clamp_ttl(10), Duration::from_secs(60));
        assert_eq!(clamp_ttl(120), Duration::from_secs(120));
        assert_eq!(clamp_ttl(3600), Duration::from_secs(300));
    }
}
