//! Listing parameters: filters, ordering and pagination.
//!
//! Raw query strings arrive as optional text and are parsed here so that a
//! malformed value becomes a 400 instead of being silently ignored.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::access::OrderScope;
use crate::domain::OrderStatus;
use crate::error::DomainError;

/// Sortable menu item fields and the columns behind them.
pub const MENU_ITEM_ORDERING: &[(&str, &str)] = &[
    ("id", "m.id"),
    ("title", "m.title"),
    ("price", "m.price"),
    ("featured", "m.featured"),
    ("category", "m.category_id"),
    ("category_id", "m.category_id"),
    ("category__title", "c.title"),
];

/// Sortable order fields and the columns behind them.
pub const ORDER_ORDERING: &[(&str, &str)] = &[
    ("id", "o.id"),
    ("user", "o.user_id"),
    ("user_id", "o.user_id"),
    ("delivery_crew", "o.delivery_crew_id"),
    ("delivery_crew_id", "o.delivery_crew_id"),
    ("status", "o.status"),
    ("total", "o.total"),
    ("date", "o.date"),
];

/// Page size bounds taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: lemon_shared::constants::DEFAULT_PAGE_SIZE,
            max_per_page: lemon_shared::constants::MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: u32,
}

impl PageRequest {
    pub fn parse(
        page: Option<&str>,
        per_page: Option<&str>,
        limits: PageLimits,
    ) -> Result<Self, DomainError> {
        let page = match non_empty(page) {
            Some(raw) => parse_number::<i64>("page", raw)?,
            None => 1,
        };
        let per_page = match non_empty(per_page) {
            Some(raw) => {
                let value = parse_number::<i64>("perpage", raw)?;
                if value < 1 {
                    return Err(DomainError::InvalidQuery {
                        name: "perpage",
                        value: raw.to_string(),
                    });
                }
                value.min(i64::from(limits.max_per_page)) as u32
            }
            None => limits.default_per_page.min(limits.max_per_page),
        };
        Ok(Self { page, per_page })
    }

    /// `(limit, offset)` for the requested page, or `None` when the page
    /// number is below 1 and the result is empty by definition.
    pub fn window(&self) -> Option<(i64, i64)> {
        if self.page < 1 {
            return None;
        }
        let limit = i64::from(self.per_page);
        Some((limit, (self.page - 1).saturating_mul(limit)))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: lemon_shared::constants::DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub descending: bool,
}

/// Parsed `ordering` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordering {
    keys: Vec<SortKey>,
}

impl Ordering {
    /// Comma separated field names, `-` prefix for descending.
    pub fn parse(raw: Option<&str>, allowed: &[(&str, &'static str)]) -> Result<Self, DomainError> {
        let raw = match non_empty(raw) {
            Some(raw) => raw,
            None => return Ok(Self::default()),
        };

        let mut keys = Vec::new();
        for segment in raw.split(',') {
            let segment = segment.trim();
            let (name, descending) = match segment.strip_prefix('-') {
                Some(name) => (name, true),
                None => (segment, false),
            };
            let column = allowed
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, column)| *column)
                .ok_or_else(|| DomainError::InvalidOrdering(segment.to_string()))?;
            keys.push(SortKey { column, descending });
        }
        Ok(Self { keys })
    }

    /// `ORDER BY` body. `tie_breaker` keeps paging stable across equal keys.
    pub fn to_sql(&self, tie_breaker: &str) -> String {
        let mut parts: Vec<String> = self
            .keys
            .iter()
            .map(|key| {
                format!(
                    "{} {}",
                    key.column,
                    if key.descending { "DESC" } else { "ASC" }
                )
            })
            .collect();
        if !self.keys.iter().any(|key| key.column == tie_breaker) {
            parts.push(format!("{} ASC", tie_breaker));
        }
        parts.join(", ")
    }
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Raw `/menu-items` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemParams {
    pub category: Option<String>,
    pub to_price: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub perpage: Option<String>,
    pub page: Option<String>,
}

/// Raw `/orders` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderParams {
    pub status: Option<String>,
    pub delivery_crew: Option<String>,
    pub ordering: Option<String>,
    pub perpage: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuItemQuery {
    pub category: Option<String>,
    pub to_price: Option<Decimal>,
    pub search: Option<String>,
    pub ordering: Ordering,
    pub page: PageRequest,
}

impl MenuItemQuery {
    pub fn parse(params: &MenuItemParams, limits: PageLimits) -> Result<Self, DomainError> {
        let to_price = match non_empty(params.to_price.as_deref()) {
            Some(raw) => Some(Decimal::from_str(raw).map_err(|_| DomainError::InvalidQuery {
                name: "to_price",
                value: raw.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            category: non_empty(params.category.as_deref()).map(str::to_string),
            to_price,
            search: non_empty(params.search.as_deref()).map(str::to_string),
            ordering: Ordering::parse(params.ordering.as_deref(), MENU_ITEM_ORDERING)?,
            page: PageRequest::parse(params.page.as_deref(), params.perpage.as_deref(), limits)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuery {
    pub scope: OrderScope,
    pub status: Option<OrderStatus>,
    pub delivery_crew: Option<String>,
    pub ordering: Ordering,
    pub page: PageRequest,
}

impl OrderQuery {
    pub fn parse(scope: OrderScope, params: &OrderParams, limits: PageLimits) -> Result<Self, DomainError> {
        let status = match non_empty(params.status.as_deref()) {
            Some(raw) => Some(OrderStatus::parse(raw).ok_or_else(|| DomainError::InvalidQuery {
                name: "status",
                value: raw.to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            scope,
            status,
            delivery_crew: non_empty(params.delivery_crew.as_deref()).map(str::to_string),
            ordering: Ordering::parse(params.ordering.as_deref(), ORDER_ORDERING)?,
            page: PageRequest::parse(params.page.as_deref(), params.perpage.as_deref(), limits)?,
        })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_number<T: FromStr>(name: &'static str, raw: &str) -> Result<T, DomainError> {
    raw.parse::<T>().map_err(|_| DomainError::InvalidQuery {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> PageLimits {
        PageLimits::default()
    }

    #[test]
    fn test_page_defaults() {
        let page = PageRequest::parse(None, None, limits()).unwrap();
        assert_eq!(page, PageRequest { page: 1, per_page: 4 });
        assert_eq!(page.window(), Some((4, 0)));
    }

    #[test]
    fn test_page_window_offsets() {
        let page = PageRequest::parse(Some("3"), Some("10"), limits()).unwrap();
        assert_eq!(page.window(), Some((10, 20)));
    }

    #[test]
    fn test_page_below_one_is_empty() {
        assert_eq!(PageRequest::parse(Some("0"), None, limits()).unwrap().window(), None);
        assert_eq!(PageRequest::parse(Some("-2"), None, limits()).unwrap().window(), None);
    }

    #[test]
    fn test_per_page_clamped_to_max() {
        let page = PageRequest::parse(None, Some("5000"), limits()).unwrap();
        assert_eq!(page.per_page, 100);
    }

    #[test]
    fn test_bad_page_values_rejected() {
        assert!(matches!(
            PageRequest::parse(Some("two"), None, limits()),
            Err(DomainError::InvalidQuery { name: "page", .. })
        ));
        assert!(matches!(
            PageRequest::parse(None, Some("0"), limits()),
            Err(DomainError::InvalidQuery { name: "perpage", .. })
        ));
    }

    #[test]
    fn test_ordering_parse_and_sql() {
        let ordering = Ordering::parse(Some("-price, title"), MENU_ITEM_ORDERING).unwrap();
        assert_eq!(ordering.to_sql("m.id"), "m.price DESC, m.title ASC, m.id ASC");

        let by_id = Ordering::parse(Some("-id"), MENU_ITEM_ORDERING).unwrap();
        assert_eq!(by_id.to_sql("m.id"), "m.id DESC");

        assert_eq!(Ordering::default().to_sql("o.id"), "o.id ASC");
    }

    #[test]
    fn test_ordering_rejects_unknown_fields() {
        match Ordering::parse(Some("price,password"), MENU_ITEM_ORDERING) {
            Err(DomainError::InvalidOrdering(field)) => assert_eq!(field, "password"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(Ordering::parse(Some("price,"), MENU_ITEM_ORDERING).is_err());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("lemon"), "%lemon%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_menu_item_query_parse() {
        let params = MenuItemParams {
            category: Some("Dess".to_string()),
            to_price: Some("5.50".to_string()),
            search: Some("  ".to_string()),
            ..Default::default()
        };
        let query = MenuItemQuery::parse(&params, limits()).unwrap();
        assert_eq!(query.category.as_deref(), Some("Dess"));
        assert_eq!(query.to_price, Some(Decimal::new(550, 2)));
        assert!(query.search.is_none());

        let bad = MenuItemParams {
            to_price: Some("cheap".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            MenuItemQuery::parse(&bad, limits()),
            Err(DomainError::InvalidQuery { name: "to_price", .. })
        ));
    }

    #[test]
    fn test_order_query_status_filter() {
        let params = OrderParams {
            status: Some("delivered".to_string()),
            ..Default::default()
        };
        let query = OrderQuery::parse(OrderScope::All, &params, limits()).unwrap();
        assert_eq!(query.status, Some(OrderStatus::Delivered));

        let bad = OrderParams {
            status: Some("maybe".to_string()),
            ..Default::default()
        };
        assert!(OrderQuery::parse(OrderScope::All, &bad, limits()).is_err());
    }
}
