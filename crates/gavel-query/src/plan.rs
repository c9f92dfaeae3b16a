//! Query plan assembly.
//!
//! Predicates are appended in a fixed order (category, date_from, date_to,
//! min_price, max_price) with a running placeholder counter and a parallel
//! bind list, so placeholder `$i` always corresponds to `binds[i - 1]`.

use crate::error::FilterError;
use crate::filter::ItemFilter;
use chrono::NaiveDate;

/// Columns returned for item listings, in the order agents expect them.
const ITEM_COLUMNS: &str = "unique_id, model, category, auctiondate, icn, hammer, \
     contract_price, seller_service_fee, lot_fee, power_washing, decal_removal, total_fees";

/// One bound value of a query plan.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Date(NaiveDate),
    Number(f64),
    Int(i64),
}

/// Parameterized query text paired with its ordered bound values.
///
/// Invariant: `sql` contains placeholders `$1..$n` where `n == binds.len()`,
/// and the value for `$i` is `binds[i - 1]`. No caller-supplied value ever
/// appears in `sql` itself.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Append one predicate per present filter field, in fixed order.
fn push_predicates(
    filter: &ItemFilter,
    predicates: &mut Vec<String>,
    binds: &mut Vec<BindValue>,
    next_placeholder: &mut usize,
) {
    let mut push = |clause: &str, value: BindValue| {
        predicates.push(format!("{clause} ${}", next_placeholder));
        binds.push(value);
        *next_placeholder += 1;
    };

    if let Some(category) = &filter.category {
        push("category =", BindValue::Text(category.clone()));
    }
    if let Some(date_from) = filter.date_from {
        push("auctiondate >=", BindValue::Date(date_from));
    }
    if let Some(date_to) = filter.date_to {
        push("auctiondate <=", BindValue::Date(date_to));
    }
    if let Some(min_price) = filter.min_price {
        push("hammer >=", BindValue::Number(min_price));
    }
    if let Some(max_price) = filter.max_price {
        push("hammer <=", BindValue::Number(max_price));
    }
}

/// Build the paginated item listing plan.
pub fn build_items_query(filter: &ItemFilter) -> Result<QueryPlan, FilterError> {
    filter.validate()?;

    let mut predicates = Vec::new();
    let mut binds = Vec::new();
    let mut next_placeholder = 1usize;
    push_predicates(filter, &mut predicates, &mut binds, &mut next_placeholder);

    let mut sql = format!("SELECT {ITEM_COLUMNS} FROM items");
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    sql.push_str(" ORDER BY auctiondate DESC");

    sql.push_str(&format!(
        " LIMIT ${} OFFSET ${}",
        next_placeholder,
        next_placeholder + 1
    ));
    binds.push(BindValue::Int(filter.effective_limit()));
    binds.push(BindValue::Int(filter.effective_offset()));

    Ok(QueryPlan { sql, binds })
}

/// Build the matching row-count plan: same predicates, no ordering or
/// pagination.
pub fn build_items_count(filter: &ItemFilter) -> Result<QueryPlan, FilterError> {
    filter.validate()?;

    let mut predicates = Vec::new();
    let mut binds = Vec::new();
    let mut next_placeholder = 1usize;
    push_predicates(filter, &mut predicates, &mut binds, &mut next_placeholder);

    let mut sql = "SELECT count(*) FROM items".to_string();
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }

    Ok(QueryPlan { sql, binds })
}
