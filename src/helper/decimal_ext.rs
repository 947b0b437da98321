use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal 展示扩展
pub trait DecimalExt {
    /// A 股价格展示：两位小数
    fn format_price(&self) -> String;
    /// 百分比展示：入参已是百分值（0.90 → "0.90%"），带正号
    fn format_signed_percent(&self) -> String;
}

// 行情惯例是四舍五入，round_dp 默认的银行家舍入会把 -2.345 收成 -2.34
fn round_half_away(value: &Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl DecimalExt for Decimal {
    fn format_price(&self) -> String {
        format!("{:.2}", round_half_away(self))
    }

    fn format_signed_percent(&self) -> String {
        let sign = if self.is_sign_positive() && !self.is_zero() {
            "+"
        } else {
            ""
        };
        format!("{sign}{:.2}%", round_half_away(self))
    }
}
