//! Job search query builder.
//!
//! Every user-supplied value is bound as a parameter. The only fragments rendered into the SQL
//! text are the sort column and direction, and both come from closed enums, so an unknown
//! `sort_by` or `order` silently degrades to the default rather than reaching the query.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

const BASE_QUERY: &str = "SELECT j.*, rp.company_name, rp.company_description \
     FROM jobs j \
     JOIN recruiter_profiles rp ON j.recruiter_id = rp.user_id \
     WHERE j.is_active = 1";

/// Raw query-string parameters. Values are kept as text and parsed leniently: a number that
/// does not parse is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_mode: Option<String>,
    pub salary_min: Option<String>,
    pub skills: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    PostedAt,
    Salary,
    Title,
}

impl SortField {
    /// Anything outside the allow-list falls back to `posted_at`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("salary") => SortField::Salary,
            Some("title") => SortField::Title,
            _ => SortField::PostedAt,
        }
    }

    const fn column(self) -> &'static str {
        match self {
            SortField::PostedAt => "j.posted_at",
            SortField::Salary => "j.salary",
            SortField::Title => "j.title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Case-insensitive; anything else falls back to descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()) {
            Some(value) if value == "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    const fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Page window. `number` is at least 1 and `per_page` is clamped into `1..=MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(number: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            number: number.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Optional filters, ANDed together. Empty strings and a non-positive `salary_min` count as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub work_mode: Option<String>,
    pub salary_min: Option<i64>,
    pub skills: Option<String>,
}

/// A fully normalized search, ready to be rendered into SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSearch {
    pub filters: SearchFilters,
    pub sort: SortField,
    pub order: SortOrder,
    pub page: Page,
}

impl JobSearch {
    pub fn from_params(params: &SearchParams) -> Self {
        let filters = SearchFilters {
            keyword: present(&params.keyword),
            location: present(&params.location),
            job_type: present(&params.job_type),
            work_mode: present(&params.work_mode),
            salary_min: integer(&params.salary_min).filter(|min| *min > 0),
            skills: present(&params.skills),
        };

        Self {
            filters,
            sort: SortField::parse(params.sort_by.as_deref()),
            order: SortOrder::parse(params.order.as_deref()),
            page: Page::new(integer(&params.page), integer(&params.per_page)),
        }
    }

    pub fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut query = QueryBuilder::new(BASE_QUERY);
        let filters = &self.filters;

        if let Some(keyword) = &filters.keyword {
            let pattern = contains_pattern(keyword);
            query
                .push(" AND (j.title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR j.description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        if let Some(location) = &filters.location {
            query
                .push(" AND j.location LIKE ")
                .push_bind(contains_pattern(location))
                .push(" ESCAPE '\\'");
        }
        if let Some(job_type) = &filters.job_type {
            query.push(" AND j.job_type = ").push_bind(job_type.clone());
        }
        if let Some(work_mode) = &filters.work_mode {
            query.push(" AND j.work_mode = ").push_bind(work_mode.clone());
        }
        if let Some(salary_min) = filters.salary_min {
            query.push(" AND j.salary >= ").push_bind(salary_min);
        }
        if let Some(skills) = &filters.skills {
            query
                .push(" AND j.skills_required LIKE ")
                .push_bind(contains_pattern(skills))
                .push(" ESCAPE '\\'");
        }

        let direction = self.order.keyword();
        query
            .push(" ORDER BY ")
            .push(self.sort.column())
            .push(" ")
            .push(direction)
            .push(", j.id ")
            .push(direction);
        query
            .push(" LIMIT ")
            .push_bind(self.page.limit())
            .push(" OFFSET ")
            .push_bind(self.page.offset());

        query
    }

    /// The SQL text the search renders to, placeholders included.
    pub fn sql(&self) -> String {
        self.build().sql().to_string()
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

fn integer(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|raw| raw.trim().parse().ok())
}

/// Unanchored LIKE pattern with `%`, `_` and the escape character matched literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
