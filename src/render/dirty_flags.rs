use bitflags::bitflags;

bitflags! {
    /// 标记哪些界面组件需要重绘
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u32 {
        /// 无需重绘
        const NONE = 0;
        /// 实时行情表（快照数据变化、勾选变化）
        const MARKET = 0b0000_0001;
        /// 走势图与历史表（历史数据到达、周期调整）
        const CHART = 0b0000_0010;
        /// 持仓监控页
        const HOLDINGS = 0b0000_0100;
        /// 交易记录页
        const TRADES = 0b0000_1000;
        /// 快捷键帮助弹窗
        const POPUP_HELP = 0b0001_0000;
        /// 加载页
        const LOADING = 0b0010_0000;
        /// 错误页
        const ERROR = 0b0100_0000;
        /// 状态栏（数据新鲜度、提示信息）
        const STATUS_BAR = 0b1000_0000;
        /// 全量重绘
        const ALL = 0xFFFF_FFFF;
    }
}

impl DirtyFlags {
    #[inline]
    pub fn needs_render(self) -> bool {
        !self.is_empty()
    }
}

/// 固定帧率循环里的重绘调度状态
#[derive(Debug)]
pub struct RenderState {
    dirty: DirtyFlags,
    render_count: u64,
    skip_count: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            dirty: DirtyFlags::NONE,
            render_count: 0,
            skip_count: 0,
        }
    }

    #[inline]
    pub fn needs_render(&self) -> bool {
        self.dirty.needs_render()
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty.insert(flags);
    }

    #[inline]
    pub fn mark_all_dirty(&mut self) {
        self.dirty = DirtyFlags::ALL;
    }

    /// 渲染完成后清空标记
    #[inline]
    pub fn clear(&mut self) {
        self.dirty = DirtyFlags::NONE;
        self.render_count += 1;
    }

    #[inline]
    pub fn skip(&mut self) {
        self.skip_count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency(&self) -> f64 {
        let total = self.render_count + self.skip_count;
        if total == 0 {
            0.0
        } else {
            (self.skip_count as f64 / total as f64) * 100.0
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "渲染次数: {}, 跳过次数: {}, 跳过率: {:.1}%",
            self.render_count,
            self.skip_count,
            self.efficiency()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{DirtyFlags, RenderState};

    #[test]
    fn test_dirty_flags() {
        let flags = DirtyFlags::NONE;
        assert!(!flags.needs_render());

        let flags = DirtyFlags::MARKET | DirtyFlags::CHART;
        assert!(flags.needs_render());
        assert!(flags.contains(DirtyFlags::MARKET));
        assert!(flags.contains(DirtyFlags::CHART));
        assert!(!flags.contains(DirtyFlags::HOLDINGS));
    }

    #[test]
    fn test_render_state() {
        let mut state = RenderState::new();
        assert!(!state.needs_render());

        state.mark_dirty(DirtyFlags::MARKET);
        assert!(state.needs_render());

        state.clear();
        assert!(!state.needs_render());
        assert_eq!(state.render_count, 1);
    }

    #[test]
    fn test_efficiency_calculation() {
        let mut state = RenderState::new();

        for _ in 0..3 {
            state.mark_dirty(DirtyFlags::MARKET);
            state.clear();
        }
        for _ in 0..7 {
            state.skip();
        }

        assert_eq!(state.render_count, 3);
        assert_eq!(state.skip_count, 7);
        assert!((state.efficiency() - 70.0).abs() < f64::EPSILON);
        assert_eq!(state.stats(), "渲染次数: 3, 跳过次数: 7, 跳过率: 70.0%");
    }
}
