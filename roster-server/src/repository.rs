//! Employee repository

use async_trait::async_trait;
use roster_lib::api::Listing;
use roster_lib::filter::FilterSchema;
use roster_lib::filter::FilterState;
use roster_lib::filter::apply;
use roster_lib::model::ColumnDescriptor;
use roster_lib::model::Row;
use roster_lib::model::default_columns;

/// Source of the listing served by the API.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Column descriptors in display order.
    async fn columns(&self) -> Vec<ColumnDescriptor>;

    /// Rows matching every active entry of `filters`, with their count.
    async fn list(&self, filters: &FilterState) -> Listing;

    /// How query parameters are read into filter values.
    fn schema(&self) -> &FilterSchema;
}

/// Repository over a fixed row set.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    rows: Vec<Row>,
    columns: Vec<ColumnDescriptor>,
    schema: FilterSchema,
}

impl InMemoryRepository {
    pub fn new(rows: Vec<Row>, columns: Vec<ColumnDescriptor>) -> Self {
        let schema = FilterSchema::from_columns(&columns);
        Self {
            rows,
            columns,
            schema,
        }
    }

    /// The eight sample employees with the default columns.
    pub fn sample() -> Self {
        Self::new(sample_employees(), default_columns())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryRepository {
    async fn columns(&self) -> Vec<ColumnDescriptor> {
        self.columns.clone()
    }

    async fn list(&self, filters: &FilterState) -> Listing {
        Listing::new(apply(&self.rows, filters, &self.schema))
    }

    fn schema(&self) -> &FilterSchema {
        &self.schema
    }
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: i64,
    name: &str,
    email: &str,
    department: &str,
    position: &str,
    age: i64,
    location: &str,
    salary: i64,
    hire_date: &str,
    status: &str,
) -> Row {
    Row::new(id)
        .with("name", name)
        .with("email", email)
        .with("department", department)
        .with("position", position)
        .with("age", age)
        .with("location", location)
        .with("salary", salary)
        .with("hireDate", hire_date)
        .with("status", status)
}

/// The sample record set.
pub fn sample_employees() -> Vec<Row> {
    vec![
        employee(1, "김철수", "kim@example.com", "개발팀", "시니어 개발자", 32, "서울", 5_000_000, "2020-01-15", "재직중"),
        employee(2, "이영희", "lee@example.com", "디자인팀", "UI/UX 디자이너", 28, "경기", 4_000_000, "2021-03-20", "재직중"),
        employee(3, "박민수", "park@example.com", "마케팅팀", "마케팅 매니저", 35, "부산", 4_500_000, "2019-07-10", "재직중"),
        employee(4, "정수진", "jung@example.com", "개발팀", "주니어 개발자", 25, "인천", 3_500_000, "2022-02-28", "재직중"),
        employee(5, "최동욱", "choi@example.com", "인사팀", "인사 담당자", 42, "대구", 3_800_000, "2020-11-05", "퇴사"),
        employee(6, "한미영", "han@example.com", "디자인팀", "그래픽 디자이너", 29, "광주", 3_200_000, "2021-09-12", "재직중"),
        employee(7, "송태호", "song@example.com", "개발팀", "백엔드 개발자", 38, "대전", 4_800_000, "2018-12-03", "재직중"),
        employee(8, "윤지은", "yoon@example.com", "마케팅팀", "콘텐츠 매니저", 31, "울산", 4_200_000, "2020-06-18", "재직중"),
    ]
}
