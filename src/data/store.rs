use dashmap::DashMap;
use std::sync::Arc;

use super::{QuoteRecord, Symbol};

/// 全局行情快照缓存
pub static QUOTES: std::sync::LazyLock<QuoteStore> = std::sync::LazyLock::new(QuoteStore::new);

/// 行情快照存储，按标的覆盖写入，读取方只拿快照副本
pub struct QuoteStore {
    inner: DashMap<Symbol, Arc<QuoteRecord>>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Arc<QuoteRecord>> {
        self.inner.get(symbol).map(|r| Arc::clone(r.value()))
    }

    /// 批量读取，保持与入参相同的顺序
    pub fn mget(&self, symbols: &[Symbol]) -> Vec<Option<Arc<QuoteRecord>>> {
        symbols.iter().map(|s| self.get(s)).collect()
    }

    pub fn insert(&self, record: QuoteRecord) {
        let symbol = record.symbol.clone();
        self.inner.insert(symbol, Arc::new(record));
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for QuoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::QuoteStore;
    use crate::data::QuoteRecord;

    #[test]
    fn mget_preserves_order_and_misses() {
        let store = QuoteStore::new();
        store.insert(QuoteRecord {
            symbol: "000858.SZ".into(),
            name: "五粮液".to_string(),
            ..QuoteRecord::default()
        });

        let results = store.mget(&["600519.SH".into(), "000858.SZ".into()]);
        assert!(results[0].is_none());
        assert_eq!(results[1].as_ref().map(|q| q.name.clone()).unwrap(), "五粮液");
    }

    #[test]
    fn insert_overwrites_and_clear_empties() {
        let store = QuoteStore::new();
        store.insert(QuoteRecord {
            symbol: "000858.SZ".into(),
            name: "五粮液".to_string(),
            ..QuoteRecord::default()
        });
        store.insert(QuoteRecord {
            symbol: "000858.SZ".into(),
            name: "五粮液A".to_string(),
            ..QuoteRecord::default()
        });
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&"000858.SZ".into()).map(|q| q.name.clone()),
            Some("五粮液A".to_string())
        );

        store.clear();
        assert!(store.is_empty());
    }
}
