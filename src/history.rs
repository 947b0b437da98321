use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use bevy_ecs::system::CommandQueue;
use tokio::sync::mpsc::UnboundedSender;

use crate::data::{AdjustType, HistoryBars, Symbol};

pub static HISTORY: std::sync::LazyLock<HistoryStore> =
    std::sync::LazyLock::new(HistoryStore::new);

type StoreKey = (Symbol, u16, AdjustType);

/// 日线历史的页面侧缓存
///
/// 渲染线程每帧读取，未命中时在后台补抓，抓到后通过命令通道触发重绘。
/// 与数据层的 TTL 缓存相互独立：这里只管"有没有"，过期由数据层判断。
#[derive(Debug)]
pub struct HistoryStore {
    inner: RwLock<HashMap<StoreKey, Arc<HistoryBars>>>,
    pending: RwLock<HashSet<StoreKey>>,
}

impl HistoryStore {
    fn new() -> Self {
        Self {
            inner: RwLock::default(),
            pending: RwLock::default(),
        }
    }

    /// 取某标的最近 `days` 天的日线；无数据时发起后台抓取并返回 `None`
    pub fn window(
        &self,
        symbol: &Symbol,
        days: u16,
        adjust: AdjustType,
        tx: UnboundedSender<CommandQueue>,
    ) -> Option<Arc<HistoryBars>> {
        let key = (symbol.clone(), days, adjust);
        if let Some(bars) = self.inner.read().expect("poison").get(&key) {
            return Some(bars.clone());
        }

        // 先拿运行时句柄再标记在途，否则该键会永远挂在 pending 里
        let Some(rt) = crate::app::RT.get() else {
            return None;
        };
        {
            let mut pending = self.pending.write().expect("poison");
            if !pending.insert(key.clone()) {
                // 已有抓取任务在途
                return None;
            }
        }

        rt.spawn(Self::request(key, tx));
        None
    }

    /// 手动刷新：清空本地缓存，下一帧自动重新抓取
    pub fn clear(&self) {
        self.inner.write().expect("poison").clear();
    }

    async fn request(key: StoreKey, tx: UnboundedSender<CommandQueue>) {
        let (symbol, days, adjust) = key.clone();
        tracing::info!("请求历史数据：标的={symbol}，周期={days} 天，复权={adjust:?}");

        let result = crate::provider::history(&symbol, days, adjust).await;

        HISTORY.pending.write().expect("poison").remove(&key);

        match result {
            Ok(bars) => {
                tracing::info!("成功获取历史数据：标的={symbol}，共 {} 条", bars.len());
                if bars.is_empty() {
                    crate::notice::warn(format!("{symbol} 无历史数据，可能停牌或代码有误"));
                }
                HISTORY.inner.write().expect("poison").insert(key, bars);
                // 空命令队列只为唤醒渲染循环
                _ = tx.send(CommandQueue::default());
            }
            Err(e) => {
                tracing::error!("获取历史数据失败：标的={symbol}，错误={e}");
                crate::notice::warn(format!("获取 {symbol} 历史数据失败，已跳过"));
                // 失败也写入空表，避免每帧重试；手动刷新后重抓
                HISTORY
                    .inner
                    .write()
                    .expect("poison")
                    .insert(key, Arc::new(HistoryBars::new()));
                _ = tx.send(CommandQueue::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryStore;
    use crate::data::AdjustType;
    use tokio::sync::mpsc;

    #[test]
    fn window_without_runtime_leaves_no_pending_mark() {
        let store = HistoryStore::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let bars = store.window(
            &"000858.SZ".into(),
            90,
            AdjustType::ForwardAdjust,
            tx,
        );

        assert!(bars.is_none());
        assert!(store.pending.read().expect("poison").is_empty());
    }
}
