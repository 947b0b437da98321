use unicode_width::UnicodeWidthChar;

/// 右对齐，CJK 字符按双宽度计入
pub fn align_right(text: &str, width: usize) -> String {
    let extra: usize = text
        .chars()
        .filter_map(|c| c.width_cjk().and_then(|w| w.checked_sub(1)))
        .sum();
    format!(
        "{text:>width$}",
        width = width.checked_sub(extra).unwrap_or(width)
    )
}

#[cfg(test)]
mod tests {
    use super::align_right;

    #[test]
    fn pads_ascii_text() {
        assert_eq!(align_right("text", 3), "text");
        assert_eq!(align_right("text", 10), "      text");
    }

    #[test]
    fn accounts_for_cjk_width() {
        assert_eq!(align_right("五粮液", 3), "五粮液");
        assert_eq!(align_right("五粮液", 10), "    五粮液");
    }
}
