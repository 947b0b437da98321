//! 非阻塞提示：接口失败、数据缺失等不终止程序，只在页面上提醒

use std::sync::RwLock;
use std::time::Instant;

pub static NOTICE_STORE: std::sync::LazyLock<RwLock<NoticeStore>> =
    std::sync::LazyLock::new(|| RwLock::new(NoticeStore::default()));

/// 提示在状态栏保留的秒数
const NOTICE_TTL_SECS: u64 = 15;
/// 最多保留的历史提示条数
const MAX_NOTICES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Clone, Debug)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    created_at: Instant,
}

impl Notice {
    fn is_fresh(&self) -> bool {
        self.created_at.elapsed().as_secs() < NOTICE_TTL_SECS
    }
}

#[derive(Debug, Default)]
pub struct NoticeStore {
    entries: Vec<Notice>,
}

impl NoticeStore {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        // 同文案的重复提示只保留最新一条
        self.entries.retain(|n| n.message != message);
        self.entries.push(Notice {
            level,
            message,
            created_at: Instant::now(),
        });
        if self.entries.len() > MAX_NOTICES {
            let overflow = self.entries.len() - MAX_NOTICES;
            self.entries.drain(..overflow);
        }
    }

    /// 最新的一条未过期提示
    pub fn latest(&self) -> Option<&Notice> {
        self.entries.iter().rev().find(|n| n.is_fresh())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// 记录一条警告提示并写日志
pub fn warn(message: impl Into<String>) {
    let message = message.into();
    tracing::warn!("{message}");
    if let Ok(mut store) = NOTICE_STORE.write() {
        store.push(NoticeLevel::Warning, message);
    }
}

/// 记录一条信息提示
pub fn info(message: impl Into<String>) {
    let message = message.into();
    if let Ok(mut store) = NOTICE_STORE.write() {
        store.push(NoticeLevel::Info, message);
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeLevel, NoticeStore};

    #[test]
    fn latest_returns_most_recent() {
        let mut store = NoticeStore::default();
        store.push(NoticeLevel::Info, "第一条");
        store.push(NoticeLevel::Warning, "第二条");
        assert_eq!(store.latest().map(|n| n.message.as_str()), Some("第二条"));
    }

    #[test]
    fn duplicate_messages_collapse() {
        let mut store = NoticeStore::default();
        store.push(NoticeLevel::Warning, "接口超时");
        store.push(NoticeLevel::Warning, "接口超时");
        assert_eq!(store.entries.len(), 1);
    }

    #[test]
    fn capacity_is_bounded() {
        let mut store = NoticeStore::default();
        for i in 0..40 {
            store.push(NoticeLevel::Info, format!("提示 {i}"));
        }
        assert!(store.entries.len() <= super::MAX_NOTICES);
        assert_eq!(
            store.latest().map(|n| n.message.as_str()),
            Some("提示 39")
        );
    }
}
