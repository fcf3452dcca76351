//! Sort order for link listings.
//!
//! Column and direction are parsed against a closed allow-list. The SQL
//! fragments returned by [`SortColumn::as_sql`] and [`SortDirection::as_sql`]
//! are static strings, so user input never reaches an `ORDER BY` clause.

/// Columns a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Title,
    ShortCode,
    TargetUrl,
    Clicks,
    CreatedAt,
}

impl SortColumn {
    /// Parses a column name. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "short_code" => Some(Self::ShortCode),
            "target_url" => Some(Self::TargetUrl),
            "clicks" => Some(Self::Clicks),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ShortCode => "short_code",
            Self::TargetUrl => "target_url",
            Self::Clicks => "clicks",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses `asc`/`desc` case-insensitively, defaulting to descending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A validated listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for LinkOrder {
    fn default() -> Self {
        Self {
            column: SortColumn::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl LinkOrder {
    /// Builds an order from raw request values.
    ///
    /// An unknown or missing column falls back to `created_at DESC` whatever
    /// direction was requested.
    pub fn from_params(order_by: Option<&str>, direction: Option<&str>) -> Self {
        match order_by.and_then(SortColumn::parse) {
            Some(column) => Self {
                column,
                direction: direction
                    .map(SortDirection::parse)
                    .unwrap_or(SortDirection::Desc),
            },
            None => Self::default(),
        }
    }
}
