//! Cell formatters of the employee table.

use chrono::Datelike;
use chrono::NaiveDate;
use roster_grid::CellStyle;
use roster_grid::Formatted;
use roster_grid::RendererRegistry;
use roster_grid::style::Rgb;
use roster_grid::style::palette;
use roster_lib::model::Value;

const LINK: Rgb = Rgb::new(0x00, 0x7b, 0xff);
const BADGE_BG: Rgb = Rgb::new(0x3a, 0x3f, 0x47);
const GRAY: Rgb = Rgb::new(0x99, 0x99, 0x99);
const DARK: Rgb = Rgb::new(0x21, 0x25, 0x29);

// Pastel backgrounds need a dark foreground.
fn pastel(hex: &str) -> CellStyle {
    let style = CellStyle::new().fg(DARK);
    match Rgb::from_hex(hex) {
        Some(bg) => style.bg(bg),
        None => style,
    }
}

/// `5000000` → `5,000,000`.
pub fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `2020-01-15` → `2020. 1. 15.`
pub fn korean_date(date: NaiveDate) -> String {
    format!("{}. {}. {}.", date.year(), date.month(), date.day())
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.as_str()?, "%Y-%m-%d").ok()
}

/// Whole years between `hired` and `today`, 365-day years.
pub fn tenure_years(hired: NaiveDate, today: NaiveDate) -> i64 {
    (today - hired).num_days() / 365
}

pub fn department_style(department: &str) -> CellStyle {
    match department {
        "개발팀" => pastel("#e3f2fd"),
        "디자인팀" => pastel("#f3e5f5"),
        "마케팅팀" => pastel("#e8f5e8"),
        "인사팀" => pastel("#fff3e0"),
        _ => CellStyle::new(),
    }
}

pub fn age_style(age: f64) -> CellStyle {
    let style = if age >= 50.0 {
        pastel("#fff3cd")
    } else if age >= 40.0 {
        pastel("#d1ecf1")
    } else if age >= 30.0 {
        pastel("#e8f5e8")
    } else {
        CellStyle::new().fg(LINK)
    };
    style.bold()
}

pub fn tenure_style(years: i64) -> CellStyle {
    if years >= 5 {
        pastel("#fff3cd").bold()
    } else if years >= 3 {
        pastel("#d1ecf1")
    } else {
        CellStyle::new()
    }
}

/// Renderers for the columns of the employee listing.
pub fn employee_renderers(today: NaiveDate) -> RendererRegistry {
    RendererRegistry::new()
        .with(
            "name",
            Formatted::new()
                .style(|_, _| CellStyle::new().fg(LINK).bold())
                .tooltip(|v, _| Some(format!("{} 클릭하여 상세보기", v))),
        )
        .with(
            "email",
            Formatted::new()
                .style(|_, _| CellStyle::new().fg(LINK).underline())
                .tooltip(|v, _| Some(format!("{}로 이메일 보내기", v))),
        )
        .with(
            "department",
            Formatted::new().style(|v, _| v.as_str().map_or_else(CellStyle::new, department_style)),
        )
        .with(
            "position",
            Formatted::new()
                .format(|v, _| match v {
                    Value::Null => "-".to_string(),
                    other => format!("[{}]", other),
                })
                .style(|_, _| CellStyle::new().bg(BADGE_BG)),
        )
        .with(
            "age",
            Formatted::new()
                .format(|v, _| match v {
                    Value::Null => "-".to_string(),
                    other => format!("{}세", other),
                })
                .style(|v, _| v.as_f64().map_or_else(CellStyle::new, age_style)),
        )
        .with("location", Formatted::new().style(|_, _| CellStyle::new().fg(GRAY)))
        .with(
            "salary",
            Formatted::new().format(|v, _| match v {
                Value::Int(n) => format!("{}원", thousands(*n)),
                Value::Float(n) => format!("{}원", thousands(n.round() as i64)),
                Value::Null => "-".to_string(),
                other => other.to_string(),
            }),
        )
        .with(
            "hireDate",
            Formatted::new()
                .format(|v, _| match parse_date(v) {
                    Some(date) => korean_date(date),
                    None => v.to_match_string(),
                })
                .style(move |v, _| {
                    parse_date(v).map_or_else(CellStyle::new, |d| tenure_style(tenure_years(d, today)))
                }),
        )
        .with(
            "status",
            Formatted::new().style(|v, _| {
                let bg = if v.as_str() == Some("재직중") {
                    palette::SUCCESS
                } else {
                    palette::ERROR
                };
                CellStyle::new().fg(Rgb::new(255, 255, 255)).bg(bg).bold()
            }),
        )
}
