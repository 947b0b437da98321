use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub trait Sign {
    fn positive(&self) -> bool;
    fn negative(&self) -> bool;
    fn zero(&self) -> bool;
    fn sign(&self) -> Ordering;
}

impl Sign for str {
    fn positive(&self) -> bool {
        !(self.negative() || self.zero())
    }

    fn negative(&self) -> bool {
        self.starts_with('-')
    }

    fn zero(&self) -> bool {
        self.chars().all(|c| matches!(c, '0' | '.' | '+' | '-'))
    }

    fn sign(&self) -> Ordering {
        if self.negative() {
            Ordering::Less
        } else if self.zero() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }
}

impl Sign for Decimal {
    fn positive(&self) -> bool {
        self.is_sign_positive() && !self.is_zero()
    }

    fn negative(&self) -> bool {
        self.is_sign_negative()
    }

    fn zero(&self) -> bool {
        self.is_zero()
    }

    fn sign(&self) -> Ordering {
        if self.is_sign_negative() {
            Ordering::Less
        } else if self.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Greater
        }
    }
}

/// 成交量（手）换算为万手，保留一位小数
/// 例：1_234_567 手 → 123.5 万手
pub fn volume_wan_shou(volume: u64) -> Decimal {
    (Decimal::from(volume) / dec!(10000)).round_dp(1)
}

/// 金额（元）短格式展示，万/亿 分级
/// 例：1_234_567_890 → "12.35亿"
pub fn format_amount(amount: Decimal) -> String {
    if amount.is_zero() {
        return "--".to_string();
    }
    // {:.2} 补齐末尾的零，round_dp 直接进 format 会把 5320.00 打成 5320
    let scaled = |divisor: Decimal| {
        (amount / divisor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };
    if amount >= dec!(1e12) {
        format!("{:.2}万亿", scaled(dec!(1e12)))
    } else if amount >= dec!(1e8) {
        format!("{:.2}亿", scaled(dec!(1e8)))
    } else if amount >= dec!(1e4) {
        format!("{:.2}万", scaled(dec!(1e4)))
    } else {
        format!("{:.2}", scaled(Decimal::ONE))
    }
}

#[cfg(test)]
mod tests {
    use super::{format_amount, volume_wan_shou, Sign};
    use rust_decimal_macros::dec;
    use std::cmp::Ordering;

    #[test]
    fn volume_divides_by_ten_thousand_one_decimal() {
        assert_eq!(volume_wan_shou(10_000), dec!(1.0));
        assert_eq!(volume_wan_shou(1_234_567), dec!(123.5));
        assert_eq!(volume_wan_shou(0), dec!(0.0));
        // 四舍五入到一位小数
        assert_eq!(volume_wan_shou(15_000), dec!(1.5));
        assert_eq!(volume_wan_shou(14_999), dec!(1.5));
        assert_eq!(volume_wan_shou(14_949), dec!(1.5));
    }

    #[test]
    fn formats_amount_with_units() {
        assert_eq!(format_amount(dec!(0)), "--");
        assert_eq!(format_amount(dec!(5320)), "5320.00");
        assert_eq!(format_amount(dec!(123000)), "12.30万");
        assert_eq!(format_amount(dec!(1234567890)), "12.35亿");
        assert_eq!(format_amount(dec!(9876543210000)), "9.88万亿");
    }

    #[test]
    fn sign_of_strings_and_decimals() {
        assert_eq!("-1.2".sign(), Ordering::Less);
        assert_eq!("0.00".sign(), Ordering::Equal);
        assert_eq!("3.4".sign(), Ordering::Greater);
        assert_eq!(dec!(-0.5).sign(), Ordering::Less);
        assert_eq!(dec!(0).sign(), Ordering::Equal);
        assert_eq!(dec!(7).sign(), Ordering::Greater);
    }
}
