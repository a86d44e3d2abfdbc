//! Employee directory columns

use super::Align;
use super::ColumnDescriptor;
use super::FilterDescriptor;
use super::HeaderOptions;
use super::SelectOption;
use super::ValueType;

pub const DEPARTMENTS: [&str; 4] = ["개발팀", "디자인팀", "마케팅팀", "인사팀"];

pub const LOCATIONS: [&str; 8] = ["서울", "부산", "대구", "인천", "광주", "대전", "울산", "경기"];

pub const STATUSES: [&str; 2] = ["재직중", "퇴사"];

fn header(tooltip: &str, icon: &str) -> HeaderOptions {
    HeaderOptions {
        align: Align::Center,
        tooltip: Some(tooltip.to_string()),
        icon: Some(icon.to_string()),
    }
}

fn options(values: &[&str]) -> Vec<SelectOption> {
    values.iter().map(|v| SelectOption::same(*v)).collect()
}

/// The columns of the employee listing, in display order.
///
/// Served by the column metadata endpoint and used by clients as the
/// fallback layout before metadata arrives.
pub fn default_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "이름")
            .width(10)
            .header(header("직원의 이름", "👤"))
            .align(Align::Center)
            .filter(FilterDescriptor::text("name").with_placeholder("이름으로 검색")),
        ColumnDescriptor::new("email", "이메일")
            .width(20)
            .header(HeaderOptions {
                align: Align::Left,
                ..header("직원의 이메일 주소", "📧")
            })
            .filter(FilterDescriptor::text("email").with_placeholder("이메일로 검색")),
        ColumnDescriptor::new("department", "부서")
            .value_type(ValueType::Select)
            .width(10)
            .header(header("소속 부서", "🏢"))
            .align(Align::Center)
            .filter(FilterDescriptor::select("department", options(&DEPARTMENTS))),
        ColumnDescriptor::new("position", "직급")
            .width(16)
            .header(header("직원의 직급", "🎯"))
            .align(Align::Center)
            .filter(FilterDescriptor::text("position").with_placeholder("직급으로 검색")),
        ColumnDescriptor::new("age", "나이")
            .value_type(ValueType::Number)
            .width(8)
            .header(header("직원의 나이", "🎂"))
            .align(Align::Center)
            .filter(
                FilterDescriptor::number("age")
                    .with_placeholder("나이 이상")
                    .with_bounds(Some(0.0), Some(100.0)),
            ),
        ColumnDescriptor::new("location", "지역")
            .value_type(ValueType::Select)
            .width(8)
            .header(header("직원의 근무 지역", "📍"))
            .align(Align::Center)
            .filter(
                FilterDescriptor::select("location", options(&LOCATIONS))
                    .with_placeholder("지역 선택"),
            ),
        ColumnDescriptor::new("salary", "급여")
            .value_type(ValueType::Number)
            .width(14)
            .align(Align::Right)
            .filter(
                FilterDescriptor::number("salary")
                    .with_placeholder("최소 급여")
                    .with_bounds(Some(0.0), None),
            ),
        ColumnDescriptor::new("hireDate", "입사일")
            .value_type(ValueType::Date)
            .width(13)
            .header(header("입사 날짜", "📅"))
            .align(Align::Center)
            .filter(FilterDescriptor::date("hireDate").with_placeholder("YYYY-MM-DD")),
        ColumnDescriptor::new("status", "상태")
            .value_type(ValueType::Select)
            .width(8)
            .header(header("재직 상태", "📊"))
            .align(Align::Center)
            .filter(FilterDescriptor::select("status", options(&STATUSES))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterKind;

    #[test]
    fn test_column_keys_are_unique() {
        let columns = default_columns();
        let mut keys: Vec<_> = columns.iter().map(|c| c.key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), columns.len());
    }

    #[test]
    fn test_numeric_columns_use_number_filters() {
        let columns = default_columns();
        for key in ["age", "salary"] {
            let column = columns.iter().find(|c| c.key == key).unwrap();
            assert_eq!(column.filters[0].kind, FilterKind::Number);
        }
    }

    #[test]
    fn test_column_metadata_serializes_camel_case() {
        let columns = default_columns();
        let json = serde_json::to_value(&columns).unwrap();
        let hire = &json[7];
        assert_eq!(hire["key"], "hireDate");
        assert_eq!(hire["valueType"], "date");
        assert_eq!(hire["filters"][0]["type"], "date");

        let back: Vec<ColumnDescriptor> = serde_json::from_value(json).unwrap();
        assert_eq!(back, columns);
    }
}
