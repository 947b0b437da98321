//! 东方财富行情接口适配
//!
//! 上游返回按中文语义的紧凑字段（f2/f3/…）与逗号拼接的 K 线行，
//! 这里只做两件事：字段改名成 [`QuoteRecord`] / [`HistoryBar`]，
//! 以及单位、日期的归一化。接口失败一律转换为错误由调用方降级。

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use time::macros::{format_description, offset};
use time::{Date, Duration, OffsetDateTime};

use crate::data::{AdjustType, HistoryBar, HistoryBars, QuoteRecord, Symbol};

const SPOT_URL: &str = "https://push2.eastmoney.com/api/qt/ulist.np/get";
const KLINE_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";

/// 快照接口返回的字段集
/// f12 代码 f13 市场 f14 名称 f2 最新价 f3 涨跌幅 f4 涨跌额
/// f5 成交量(手) f6 成交额 f8 换手率 f15 最高 f16 最低 f17 今开 f18 昨收
const SPOT_FIELDS: &str = "f2,f3,f4,f5,f6,f8,f12,f13,f14,f15,f16,f17,f18";

/// K 线接口 fields2 对应的行内顺序：
/// 日期,开盘,收盘,最高,最低,成交量,成交额,振幅,涨跌幅,涨跌额,换手率
const KLINE_FIELDS: &str = "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61";

/// 抓取观察列表的行情快照
///
/// 上游未返回的标的直接缺席结果集（停牌、代码错误等），由调用方提示。
pub async fn fetch_spot(symbols: &[Symbol]) -> Result<Vec<QuoteRecord>> {
    if symbols.is_empty() {
        return Ok(Vec::new());
    }

    let secids = symbols
        .iter()
        .map(Symbol::secid)
        .collect::<Vec<_>>()
        .join(",");

    let body: Value = super::http()
        .get(SPOT_URL)
        .query(&[
            ("secids", secids.as_str()),
            ("fields", SPOT_FIELDS),
            ("fltt", "2"),
            ("invt", "2"),
        ])
        .send()
        .await
        .context("请求行情快照失败")?
        .error_for_status()
        .context("行情快照接口返回错误状态")?
        .json()
        .await
        .context("行情快照响应不是合法 JSON")?;

    parse_spot_body(&body)
}

/// 抓取单只标的最近 `days` 个自然日的日线
pub async fn fetch_history(symbol: &Symbol, days: u16, adjust: AdjustType) -> Result<HistoryBars> {
    let beg = begin_date(days)?;
    let secid = symbol.secid();
    let fqt = adjust.fqt().to_string();

    let body: Value = super::http()
        .get(KLINE_URL)
        .query(&[
            ("secid", secid.as_str()),
            ("klt", "101"), // 日线
            ("fqt", fqt.as_str()),
            ("beg", beg.as_str()),
            ("end", "20500101"),
            ("fields1", "f1,f2,f3,f4,f5,f6"),
            ("fields2", KLINE_FIELDS),
        ])
        .send()
        .await
        .with_context(|| format!("请求 {symbol} 历史数据失败"))?
        .error_for_status()
        .with_context(|| format!("{symbol} 历史数据接口返回错误状态"))?
        .json()
        .await
        .with_context(|| format!("{symbol} 历史数据响应不是合法 JSON"))?;

    parse_kline_body(&body)
}

/// 北京时间今天往前推 `days` 天，格式化为接口要求的 YYYYMMDD
fn begin_date(days: u16) -> Result<String> {
    let today = OffsetDateTime::now_utc().to_offset(offset!(+8)).date();
    let begin = today
        .checked_sub(Duration::days(i64::from(days)))
        .ok_or_else(|| anyhow!("分析周期超出日期范围：{days} 天"))?;
    let format = format_description!("[year][month][day]");
    Ok(begin.format(&format)?)
}

/// 解析快照响应体 `data.diff`
fn parse_spot_body(body: &Value) -> Result<Vec<QuoteRecord>> {
    let diff = &body["data"]["diff"];
    // diff 可能是数组，也可能是下标字典，取决于接口版本
    let rows: Vec<&Value> = if let Some(list) = diff.as_array() {
        list.iter().collect()
    } else if let Some(map) = diff.as_object() {
        map.values().collect()
    } else if body["data"].is_null() {
        return Ok(Vec::new());
    } else {
        return Err(anyhow!("快照响应缺少 data.diff"));
    };

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(code) = row["f12"].as_str() else {
            continue;
        };
        let suffix = match row["f13"].as_u64() {
            Some(1) => "SH",
            _ => "SZ",
        };
        records.push(QuoteRecord {
            symbol: Symbol::new(&format!("{code}.{suffix}")),
            name: row["f14"].as_str().unwrap_or_default().to_string(),
            latest_price: decimal_field(&row["f2"]),
            change_percent: decimal_field(&row["f3"]),
            change_amount: decimal_field(&row["f4"]),
            volume: unsigned_field(&row["f5"]),
            amount: decimal_field(&row["f6"]).unwrap_or(Decimal::ZERO),
            turnover_rate: decimal_field(&row["f8"]),
            high: decimal_field(&row["f15"]),
            low: decimal_field(&row["f16"]),
            open: decimal_field(&row["f17"]),
            prev_close: decimal_field(&row["f18"]),
        });
    }
    Ok(records)
}

/// 解析 K 线响应体 `data.klines`，保持日期升序
fn parse_kline_body(body: &Value) -> Result<HistoryBars> {
    let Some(rows) = body["data"]["klines"].as_array() else {
        // 停牌或代码不存在时 data 为 null，按空表处理
        return Ok(HistoryBars::new());
    };

    let mut bars = Vec::with_capacity(rows.len());
    for row in rows {
        let line = row.as_str().ok_or_else(|| anyhow!("K 线行不是字符串"))?;
        bars.push(parse_kline_row(line)?);
    }
    bars.sort_by_key(|bar| bar.date);
    Ok(bars)
}

/// 解析单条 K 线行
/// 形如 `2024-01-15,28.10,28.50,28.61,27.98,123456,345678901.0,2.24,1.42,0.40,0.65`
fn parse_kline_row(line: &str) -> Result<HistoryBar> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 11 {
        return Err(anyhow!("K 线行字段不足 11 个：{line}"));
    }

    let date_format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(fields[0], &date_format)
        .with_context(|| format!("K 线日期无法解析：{}", fields[0]))?;

    let dec = |idx: usize| -> Result<Decimal> {
        Decimal::from_str(fields[idx])
            .with_context(|| format!("K 线字段 {idx} 无法解析为数值：{}", fields[idx]))
    };

    Ok(HistoryBar {
        date,
        open: dec(1)?,
        close: dec(2)?,
        high: dec(3)?,
        low: dec(4)?,
        volume: fields[5]
            .parse::<f64>()
            .map(|v| if v.is_sign_negative() { 0 } else { v as u64 })
            .with_context(|| format!("K 线成交量无法解析：{}", fields[5]))?,
        amount: dec(6)?,
        // fields[7] 为振幅，表格展示不需要
        pct_change: dec(8)?,
        change: dec(9)?,
        turnover: dec(10)?,
    })
}

/// 数值字段：停牌时上游返回 "-"，按缺失处理
fn decimal_field(value: &Value) -> Option<Decimal> {
    if let Some(n) = value.as_f64() {
        return Decimal::try_from(n).ok();
    }
    match value.as_str() {
        Some("-") | None => None,
        Some(s) => Decimal::from_str(s).ok(),
    }
}

fn unsigned_field(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map_or(0, |n| n as u64)
}

#[cfg(test)]
mod tests {
    use super::{parse_kline_body, parse_kline_row, parse_spot_body};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use time::macros::date;

    #[test]
    fn parses_kline_row_in_upstream_order() {
        let bar = parse_kline_row(
            "2024-01-15,28.10,28.50,28.61,27.98,123456,345678901.0,2.24,1.42,0.40,0.65",
        )
        .expect("parse");

        assert_eq!(bar.date, date!(2024 - 01 - 15));
        assert_eq!(bar.open, dec!(28.10));
        assert_eq!(bar.close, dec!(28.50));
        assert_eq!(bar.high, dec!(28.61));
        assert_eq!(bar.low, dec!(27.98));
        assert_eq!(bar.volume, 123_456);
        assert_eq!(bar.amount, dec!(345678901.0));
        assert_eq!(bar.pct_change, dec!(1.42));
        assert_eq!(bar.change, dec!(0.40));
        assert_eq!(bar.turnover, dec!(0.65));
    }

    #[test]
    fn rejects_short_kline_row() {
        assert!(parse_kline_row("2024-01-15,28.10,28.50").is_err());
    }

    #[test]
    fn kline_body_sorted_ascending() {
        let body = json!({
            "data": {
                "klines": [
                    "2024-01-16,28.50,28.90,29.00,28.40,100000,2890000.0,2.10,1.40,0.40,0.52",
                    "2024-01-15,28.10,28.50,28.61,27.98,123456,3456789.0,2.24,1.42,0.40,0.65",
                ]
            }
        });
        let bars = parse_kline_body(&body).expect("parse");
        assert_eq!(bars.len(), 2);
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn null_kline_data_is_empty_table() {
        let body = json!({ "data": null });
        assert!(parse_kline_body(&body).expect("parse").is_empty());
    }

    #[test]
    fn parses_spot_diff_array() {
        let body = json!({
            "data": {
                "diff": [
                    {
                        "f2": 105.95, "f3": 0.90, "f4": 0.95, "f5": 187000,
                        "f6": 1978650000.0, "f8": 0.48,
                        "f12": "000858", "f13": 0, "f14": "五粮液",
                        "f15": 106.80, "f16": 104.90, "f17": 105.10, "f18": 105.00
                    }
                ]
            }
        });
        let records = parse_spot_body(&body).expect("parse");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.symbol.as_str(), "000858.SZ");
        assert_eq!(record.name, "五粮液");
        assert_eq!(record.latest_price, Some(dec!(105.95)));
        assert_eq!(record.volume, 187_000);
        assert_eq!(record.prev_close, Some(dec!(105.00)));
    }

    #[test]
    fn suspended_stock_fields_become_none() {
        let body = json!({
            "data": {
                "diff": {
                    "0": {
                        "f2": "-", "f3": "-", "f4": "-", "f5": 0, "f6": "-", "f8": "-",
                        "f12": "600519", "f13": 1, "f14": "贵州茅台",
                        "f15": "-", "f16": "-", "f17": "-", "f18": 1718.00
                    }
                }
            }
        });
        let records = parse_spot_body(&body).expect("parse");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.symbol.as_str(), "600519.SH");
        assert_eq!(record.latest_price, None);
        assert_eq!(record.prev_close, Some(dec!(1718.00)));
    }

    #[test]
    fn missing_data_yields_empty_snapshot() {
        let body = json!({ "data": null });
        assert!(parse_spot_body(&body).expect("parse").is_empty());
    }
}
