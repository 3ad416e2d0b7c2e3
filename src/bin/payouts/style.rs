//! Terminal styling utilities

pub fn style_cyan(s: &str) -> String {
    format!("\x1b[36m{}\x1b[0m", s)
}

pub fn style_green(s: &str) -> String {
    format!("\x1b[32m{}\x1b[0m", s)
}

pub fn style_red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}

pub fn style_yellow(s: &str) -> String {
    format!("\x1b[33m{}\x1b[0m", s)
}

pub fn style_dim(s: &str) -> String {
    format!("\x1b[2m{}\x1b[0m", s)
}

pub fn style_bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Severity names colored by tier; unknown tiers stay plain.
pub fn style_severity(severity: &str) -> String {
    match severity {
        "critical" | "high" => style_red(severity),
        "medium" => style_yellow(severity),
        _ => severity.to_string(),
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", style_green("✓"), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", style_red("✗"), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", style_yellow("⚠"), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", style_cyan("ℹ"), msg);
}

pub fn print_header(title: &str) {
    println!();
    println!("{}", style_bold(title));
    println!("{}", "─".repeat(title.len()));
}

/// Mask a session cookie for display, keeping the cookie name and the
/// first few characters of its value.
pub fn mask_cookie(cookie: &str) -> String {
    match cookie.split_once('=') {
        Some((name, value)) if value.len() > 8 => {
            format!("{}={}...", name, &value[..8])
        }
        Some((name, _)) => format!("{}=...", name),
        None => "<set>".to_string(),
    }
}

/// Format a dollar amount with thousands separators, e.g. `$1,234,567.80`.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let dollars = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_groups_thousands() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(500.0), "$500.00");
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
    }

    #[test]
    fn test_format_usd_negative() {
        assert_eq!(format_usd(-1234.5), "-$1,234.50");
    }

    #[test]
    fn test_format_usd_rounds_to_cents() {
        assert_eq!(format_usd(111.111), "$111.11");
        assert_eq!(format_usd(111.116), "$111.12");
    }

    #[test]
    fn test_mask_cookie() {
        assert_eq!(
            mask_cookie("auth_token=eyJhbGciOiJIUzI1NiJ9"),
            "auth_token=eyJhbGci..."
        );
        assert_eq!(mask_cookie("auth_token=abc"), "auth_token=...");
        assert_eq!(mask_cookie("garbage"), "<set>");
    }
}
