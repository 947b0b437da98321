use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Symbol;

/// 分析周期允许范围（天）
pub const MIN_PERIOD_DAYS: u16 = 30;
pub const MAX_PERIOD_DAYS: u16 = 365;
pub const DEFAULT_PERIOD_DAYS: u16 = 90;
/// 周期加减步长（天）
const PERIOD_STEP: u16 = 15;

/// 侧边栏筛选状态：自选列表的勾选、分析周期与展示开关
/// 每帧渲染是该状态与缓存内容的纯函数，不反向写入数据模型
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Selection {
    symbols: Vec<Symbol>,
    checked: HashSet<Symbol>,
    period_days: u16,
    pub show_chart: bool,
    pub show_detail: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            checked: HashSet::new(),
            period_days: DEFAULT_PERIOD_DAYS,
            show_chart: true,
            show_detail: true,
        }
    }
}

impl Selection {
    /// 以观察列表初始化，默认勾选沿用配置给出的标的
    pub fn new(symbols: Vec<Symbol>, default_checked: &[Symbol]) -> Self {
        let checked = default_checked
            .iter()
            .filter(|s| symbols.contains(s))
            .cloned()
            .collect();
        Self {
            symbols,
            checked,
            ..Self::default()
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn is_checked(&self, symbol: &Symbol) -> bool {
        self.checked.contains(symbol)
    }

    /// 勾选中的标的，保持观察列表顺序
    pub fn checked_symbols(&self) -> Vec<Symbol> {
        self.symbols
            .iter()
            .filter(|s| self.checked.contains(*s))
            .cloned()
            .collect()
    }

    pub fn toggle(&mut self, index: usize) {
        let Some(symbol) = self.symbols.get(index) else {
            return;
        };
        if !self.checked.remove(symbol) {
            self.checked.insert(symbol.clone());
        }
    }

    pub fn period_days(&self) -> u16 {
        self.period_days
    }

    pub fn set_period_days(&mut self, days: u16) {
        self.period_days = days.clamp(MIN_PERIOD_DAYS, MAX_PERIOD_DAYS);
    }

    pub fn widen_period(&mut self) {
        self.period_days = (self.period_days + PERIOD_STEP).min(MAX_PERIOD_DAYS);
    }

    pub fn narrow_period(&mut self) {
        self.period_days = self
            .period_days
            .saturating_sub(PERIOD_STEP)
            .max(MIN_PERIOD_DAYS);
    }
}

#[cfg(test)]
mod tests {
    use super::{Selection, DEFAULT_PERIOD_DAYS, MAX_PERIOD_DAYS, MIN_PERIOD_DAYS};
    use crate::data::Symbol;

    fn symbols() -> Vec<Symbol> {
        vec!["000858.SZ".into(), "000568.SZ".into(), "600519.SH".into()]
    }

    #[test]
    fn default_checked_respects_watch_order() {
        let selection = Selection::new(symbols(), &["600519.SH".into(), "000858.SZ".into()]);
        let checked = selection.checked_symbols();
        assert_eq!(checked, vec!["000858.SZ".into(), "600519.SH".into()]);
    }

    #[test]
    fn default_checked_ignores_unknown_symbols() {
        let selection = Selection::new(symbols(), &["999999.SZ".into()]);
        assert!(selection.checked_symbols().is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::new(symbols(), &[]);
        selection.toggle(1);
        assert!(selection.is_checked(&"000568.SZ".into()));
        selection.toggle(1);
        assert!(!selection.is_checked(&"000568.SZ".into()));
    }

    #[test]
    fn toggle_out_of_range_is_noop() {
        let mut selection = Selection::new(symbols(), &[]);
        selection.toggle(99);
        assert!(selection.checked_symbols().is_empty());
    }

    #[test]
    fn period_clamped_to_slider_range() {
        let mut selection = Selection::new(symbols(), &[]);
        assert_eq!(selection.period_days(), DEFAULT_PERIOD_DAYS);

        for _ in 0..50 {
            selection.widen_period();
        }
        assert_eq!(selection.period_days(), MAX_PERIOD_DAYS);

        for _ in 0..50 {
            selection.narrow_period();
        }
        assert_eq!(selection.period_days(), MIN_PERIOD_DAYS);
    }
}
