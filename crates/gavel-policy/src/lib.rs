//! Gavel access policy enforcement.
//!
//! This crate decides whether a caller-supplied SQL statement may be
//! forwarded to the upstream database. Two checks apply:
//!
//! 1. **Read-only check** - statements containing a mutating keyword as a
//!    whole word are rejected outright.
//! 2. **Allowlist check** - every table referenced via `FROM`/`JOIN` must
//!    be in the fixed [`AccessPolicy`] set.
//!
//! Both checks are lexical, not grammar-based. The policy is immutable for
//! the process lifetime and safe to share across concurrent callers.

pub mod allowlist;
pub mod error;
pub mod validator;

pub use allowlist::AccessPolicy;
pub use error::PolicyViolation;
pub use validator::{StatementValidator, Verdict, extract_table_references};
