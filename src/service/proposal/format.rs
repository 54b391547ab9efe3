use chrono::{Datelike, NaiveDate};

const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

/// Rupiah: `Rp 1.234.567` (点分千位, 无小数)
pub fn format_rupiah(amount: f64) -> String {
    if !amount.is_finite() {
        return "Rp -".to_string();
    }
    format!("Rp {}", group(amount, 0, '.', ','))
}

/// 技术数值: `1,234.56` (逗号分千位, 点为小数点)
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    group(value, decimals, ',', '.')
}

/// 印尼日期, 如 `18 Oktober 2026`
pub fn format_date_id(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS_ID[date.month0() as usize], date.year())
}

fn group(value: f64, decimals: usize, thousands: char, decimal: char) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    // -0.4 取整后为 "0", 不输出负号
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(thousands);
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(decimal);
        out.push_str(frac);
    }
    out
}

/// 转为 Latin-1 可表示的文本, 其余字符替换为 `?` (有损)
pub fn sanitize_latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupiah_uses_dot_grouping() {
        assert_eq!(format_rupiah(1_000_000.0), "Rp 1.000.000");
        assert_eq!(format_rupiah(89_001_298.6), "Rp 89.001.299");
        assert_eq!(format_rupiah(999.0), "Rp 999");
        assert_eq!(format_rupiah(0.0), "Rp 0");
        assert_eq!(format_rupiah(-1234.0), "Rp -1.234");
        assert_eq!(format_rupiah(f64::NAN), "Rp -");
    }

    #[test]
    fn numbers_use_comma_grouping() {
        assert_eq!(format_number(588.397_7, 2), "588.40");
        assert_eq!(format_number(1400.0, 1), "1,400.0");
        assert_eq!(format_number(1_234_567.891_23, 4), "1,234,567.8912");
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn indonesian_month_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(format_date_id(date), "18 Oktober 2026");
    }

    #[test]
    fn sanitize_replaces_outside_latin1() {
        assert_eq!(sanitize_latin1("Bapak Ahmad"), "Bapak Ahmad");
        assert_eq!(sanitize_latin1("Zoë Müller"), "Zoë Müller");
        assert_eq!(sanitize_latin1("Сергей"), "??????");
        assert_eq!(sanitize_latin1("PLTS ☀"), "PLTS ?");
    }
}
