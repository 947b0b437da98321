//! 数据访问层：东方财富接口 + 请求级缓存 + 全局限速
//!
//! 页面代码只经由 [`spot`] / [`history`] 取数，两者都带 TTL 缓存，
//! 同一窗口内重复调用返回同一份 `Arc` 数据，不会触发网络请求。

mod cache;
mod eastmoney;
mod rate_limiter;

pub use cache::{clamp_ttl, TtlCache, DEFAULT_TTL_SECS, MAX_TTL_SECS, MIN_TTL_SECS};
pub use rate_limiter::{global_rate_limiter, RateLimiter};

use anyhow::Result;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{info, warn};

use crate::data::{AdjustType, HistoryBars, QuoteRecord, Symbol};

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();
static SPOT_CACHE: OnceLock<TtlCache<String, Vec<QuoteRecord>>> = OnceLock::new();
static HISTORY_CACHE: OnceLock<TtlCache<(Symbol, u16, AdjustType), HistoryBars>> = OnceLock::new();

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// 按配置的 TTL 初始化缓存，重复调用只有第一次生效
pub fn init(ttl_secs: u64) {
    let ttl = clamp_ttl(ttl_secs);
    if ttl.as_secs() != ttl_secs {
        warn!(
            "缓存 TTL {ttl_secs} 秒超出 [{MIN_TTL_SECS}, {MAX_TTL_SECS}] 区间，已取 {} 秒",
            ttl.as_secs()
        );
    }
    let _ = SPOT_CACHE.set(TtlCache::new(ttl));
    let _ = HISTORY_CACHE.set(TtlCache::new(ttl));
    info!("行情缓存初始化完成，TTL {} 秒", ttl.as_secs());
}

pub(crate) fn http() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default()
    })
}

fn spot_cache() -> &'static TtlCache<String, Vec<QuoteRecord>> {
    SPOT_CACHE.get_or_init(|| TtlCache::new(Duration::from_secs(DEFAULT_TTL_SECS)))
}

fn history_cache() -> &'static TtlCache<(Symbol, u16, AdjustType), HistoryBars> {
    HISTORY_CACHE.get_or_init(|| TtlCache::new(Duration::from_secs(DEFAULT_TTL_SECS)))
}

/// 行情快照，按标的列表整体缓存
pub async fn spot(symbols: &[Symbol]) -> Result<Arc<Vec<QuoteRecord>>> {
    if symbols.is_empty() {
        return Ok(Arc::new(Vec::new()));
    }

    let key = symbols
        .iter()
        .map(Symbol::secid)
        .collect::<Vec<_>>()
        .join(",");
    if let Some(cached) = spot_cache().get(&key) {
        return Ok(cached);
    }

    let owned: Vec<Symbol> = symbols.to_vec();
    let records = global_rate_limiter()
        .execute("行情快照", move || {
            let symbols = owned.clone();
            Box::pin(async move { eastmoney::fetch_spot(&symbols).await })
        })
        .await?;
    Ok(spot_cache().insert(key, records))
}

/// 单只标的的日线历史，按（标的, 周期, 复权）缓存
pub async fn history(
    symbol: &Symbol,
    days: u16,
    adjust: AdjustType,
) -> Result<Arc<HistoryBars>> {
    let key = (symbol.clone(), days, adjust);
    if let Some(cached) = history_cache().get(&key) {
        return Ok(cached);
    }

    let owned = symbol.clone();
    let bars = global_rate_limiter()
        .execute("历史行情", move || {
            let symbol = owned.clone();
            Box::pin(async move { eastmoney::fetch_history(&symbol, days, adjust).await })
        })
        .await?;
    Ok(history_cache().insert(key, bars))
}

/// 手动刷新：清空全部缓存，下一次取数必然打到上游
pub fn clear_caches() {
    spot_cache().clear();
    history_cache().clear();
    info!("已清空行情缓存");
}

/// 最近一次快照入缓存以来经过的时间，用于状态栏展示数据新鲜度
pub fn snapshot_age() -> Option<Duration> {
    spot_cache().newest_age()
}

/// 生效中的缓存 TTL
pub fn snapshot_ttl() -> Duration {
    spot_cache().ttl()
}
