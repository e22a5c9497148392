//! Display helpers for terminal output

use chrono::{DateTime, Utc};

use crate::domain::TierGroup;

/// `$1.23B`, `$4.56M`, `$7.8K`, `$9.99`
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

/// Signed percentage with two decimals
pub fn format_percent(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}

/// `just now`, `Nm ago`, `Nh ago`, `Nd ago`
pub fn format_relative_time(timestamp_ms: i64, now: DateTime<Utc>) -> String {
    let diff = now.timestamp_millis() - timestamp_ms;
    let minutes = diff.div_euclid(60_000);
    let hours = diff.div_euclid(3_600_000);
    let days = diff.div_euclid(86_400_000);

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", days)
    }
}

/// Cut to `max_len` characters, ending in `...` when shortened
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Plain-text table of every tier and its tokens
pub fn render_tiers(groups: &[TierGroup], now: DateTime<Utc>) -> String {
    let mut out = String::new();

    for group in groups {
        out.push_str(&format!(
            "\n== {} ({} tokens) ==\n",
            group.tier.label,
            group.tokens.len()
        ));
        if group.tokens.is_empty() {
            out.push_str("   (none)\n");
            continue;
        }

        out.push_str(&format!(
            "   {:<10} {:<20} {:>10} {:>10} {:>10} {:>9} {:>10}\n",
            "SYMBOL", "NAME", "MCAP", "LIQ", "VOL 24H", "24H", "AGE"
        ));
        for token in &group.tokens {
            out.push_str(&format!(
                "   {:<10} {:<20} {:>10} {:>10} {:>10} {:>9} {:>10}\n",
                truncate(&token.symbol, 10),
                truncate(&token.name, 20),
                format_currency(token.market_cap),
                format_currency(token.liquidity),
                format_currency(token.volume_24h),
                format_percent(token.price_change_24h),
                format_relative_time(token.pair_created_at, now),
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::fixtures::token;
    use crate::domain::TierTable;
    use chrono::TimeZone;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_234_000_000.0), "$1.23B");
        assert_eq!(format_currency(4_560_000.0), "$4.56M");
        assert_eq!(format_currency(7_800.0), "$7.8K");
        assert_eq!(format_currency(999_999.0), "$1000.0K");
        assert_eq!(format_currency(9.99), "$9.99");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.346), "+12.35%");
        assert_eq!(format_percent(0.0), "+0.00%");
        assert_eq!(format_percent(-4.2), "-4.20%");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
        let ms = |secs: i64| now.timestamp_millis() - secs * 1000;

        assert_eq!(format_relative_time(ms(30), now), "just now");
        assert_eq!(format_relative_time(ms(-600), now), "just now");
        assert_eq!(format_relative_time(ms(5 * 60), now), "5m ago");
        assert_eq!(format_relative_time(ms(59 * 60 + 59), now), "59m ago");
        assert_eq!(format_relative_time(ms(3 * 3600), now), "3h ago");
        assert_eq!(format_relative_time(ms(2 * 86_400 + 5), now), "2d ago");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("A Very Long Token Name", 10), "A Very ...");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("abcdef", 2), "...");
    }

    #[test]
    fn test_render_tiers_lists_every_tier() {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
        let groups = TierTable::default().group(&[token("Mint1", "WOOF", 1_500_000.0)]);
        let text = render_tiers(&groups, now);

        assert!(text.contains("== $1M+ (1 tokens) =="));
        assert!(text.contains("WOOF"));
        assert!(text.contains("$1.50M"));
        assert_eq!(text.matches("(none)").count(), 3);
    }
}
