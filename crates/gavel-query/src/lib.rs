//! Filter specification and parameterized query plans for auction items.
//!
//! [`ItemFilter`] is the structured, optional-field description of a read
//! query. [`plan::build_items_query`] and [`plan::build_items_count`] turn
//! it into a [`QueryPlan`]: SQL text with positional placeholders plus the
//! ordered bound values. No caller-supplied value is ever inlined into the
//! text; the placeholder numbering always matches the bind order.

pub mod error;
pub mod filter;
pub mod plan;

pub use error::FilterError;
pub use filter::ItemFilter;
pub use plan::{BindValue, QueryPlan, build_items_count, build_items_query};
