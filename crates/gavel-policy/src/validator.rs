//! Lexical read-only statement validation.
//!
//! The validator scans raw SQL text with word-boundary regexes rather than
//! a real parser. That boundary is deliberate and load-bearing: keywords
//! inside string literals are (falsely) flagged, and table references that
//! do not appear after `FROM`/`JOIN` (CTE names, some subquery positions)
//! are not seen. Comments are stripped before the table-reference scan but
//! not before the keyword scan.

use crate::allowlist::AccessPolicy;
use crate::error::PolicyViolation;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Mutating keywords that mark a statement as a write. Checked in this
/// order; the first one present is the one reported.
const WRITE_KEYWORDS: [&str; 10] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "GRANT", "REVOKE", "COPY",
];

static WRITE_KEYWORD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    WRITE_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"\b{kw}\b")).unwrap())
        .collect()
});

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)--.*$").unwrap());

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// `FROM x`, `JOIN x`, `FROM schema.x` - identifier may be dot-qualified.
static TABLE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:from|join)\s+([a-z_][a-z0-9_]*(?:\.[a-z_][a-z0-9_]*)*)").unwrap()
});

/// Outcome of validating one statement. Exactly one verdict per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The statement may be forwarded verbatim.
    Accepted,
    /// The statement must not run; the violation says why.
    Rejected(PolicyViolation),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// Convert into a `Result` for `?`-style propagation.
    pub fn into_result(self) -> Result<(), PolicyViolation> {
        match self {
            Verdict::Accepted => Ok(()),
            Verdict::Rejected(violation) => Err(violation),
        }
    }
}

/// Extract the table names referenced in `FROM`/`JOIN` clauses.
///
/// Comments are stripped first so comment-embedded text cannot add or hide
/// references. Schema-qualified names keep only the final segment. The
/// returned set is deduplicated and sorted.
pub fn extract_table_references(sql: &str) -> BTreeSet<String> {
    let lowered = sql.to_lowercase();
    let without_line = LINE_COMMENT.replace_all(&lowered, "");
    let cleaned = BLOCK_COMMENT.replace_all(&without_line, "");

    TABLE_REF
        .captures_iter(&cleaned)
        .filter_map(|caps| {
            let ident = caps.get(1)?.as_str();
            ident.rsplit('.').next().map(String::from)
        })
        .collect()
}

/// Validates raw statements against the access policy.
///
/// Pure function of the statement text and the policy; no I/O, bounded time
/// linear in the input length.
pub struct StatementValidator<'a> {
    policy: &'a AccessPolicy,
}

impl<'a> StatementValidator<'a> {
    /// Create a validator over the given policy.
    pub fn new(policy: &'a AccessPolicy) -> Self {
        Self { policy }
    }

    /// Validate a statement, returning exactly one verdict.
    pub fn validate(&self, sql: &str) -> Verdict {
        // Keyword scan runs against the raw text (uppercased); comments are
        // not stripped here, so a keyword hidden in a comment still rejects.
        let upper = sql.to_uppercase();
        for (keyword, pattern) in WRITE_KEYWORDS.iter().zip(WRITE_KEYWORD_PATTERNS.iter()) {
            if pattern.is_match(&upper) {
                tracing::debug!(keyword, "rejected statement: write keyword");
                return Verdict::Rejected(PolicyViolation::WriteOperation {
                    keyword: (*keyword).to_string(),
                });
            }
        }

        let referenced = extract_table_references(sql);

        // Nothing to authorize (e.g. SELECT 1, SELECT current_date).
        if referenced.is_empty() {
            return Verdict::Accepted;
        }

        let unauthorized: Vec<String> = referenced
            .into_iter()
            .filter(|table| !self.policy.is_allowed(table))
            .collect();

        if !unauthorized.is_empty() {
            tracing::debug!(tables = ?unauthorized, "rejected statement: unauthorized tables");
            return Verdict::Rejected(PolicyViolation::UnauthorizedTables {
                tables: unauthorized,
                allowed: self.policy.tables_owned(),
            });
        }

        Verdict::Accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(["items", "weekly_metrics_summary", "weekly_metrics_by_region"])
    }

    fn validate(sql: &str) -> Verdict {
        let policy = policy();
        StatementValidator::new(&policy).validate(sql)
    }

    #[test]
    fn accepts_plain_select() {
        assert!(validate("SELECT * FROM items").is_accepted());
    }

    #[test]
    fn accepts_select_without_from() {
        assert!(validate("SELECT 1").is_accepted());
        assert!(validate("select current_date").is_accepted());
    }

    #[test]
    fn rejects_drop() {
        let verdict = validate("DROP TABLE items");
        assert_eq!(
            verdict,
            Verdict::Rejected(PolicyViolation::WriteOperation {
                keyword: "DROP".to_string()
            })
        );
    }

    #[test]
    fn keyword_scan_is_case_insensitive() {
        for sql in ["insert into items values (1)", "InSeRt INTO items VALUES (1)"] {
            assert_eq!(
                validate(sql),
                Verdict::Rejected(PolicyViolation::WriteOperation {
                    keyword: "INSERT".to_string()
                })
            );
        }
    }

    #[test]
    fn keyword_must_be_whole_word() {
        // created_at / updated_at / deleted_flag contain keywords as
        // substrings but are legitimate identifiers.
        assert!(validate("SELECT created_at, updated_at FROM items").is_accepted());
        assert!(validate("SELECT deleted_flag FROM items").is_accepted());
    }

    #[test]
    fn keyword_inside_comment_still_rejects() {
        // Comments are not stripped before the keyword scan.
        let verdict = validate("SELECT * FROM items -- drop table items");
        assert_eq!(
            verdict,
            Verdict::Rejected(PolicyViolation::WriteOperation {
                keyword: "DROP".to_string()
            })
        );
    }

    #[test]
    fn first_listed_keyword_wins() {
        // Both UPDATE and DELETE appear; UPDATE comes first in the list.
        let verdict = validate("delete from items; update items set x = 1");
        assert_eq!(
            verdict,
            Verdict::Rejected(PolicyViolation::WriteOperation {
                keyword: "UPDATE".to_string()
            })
        );
    }

    #[test]
    fn rejects_unauthorized_join() {
        let verdict =
            validate("SELECT * FROM items JOIN secret_table ON items.id = secret_table.id");
        match verdict {
            Verdict::Rejected(PolicyViolation::UnauthorizedTables { tables, allowed }) => {
                assert_eq!(tables, vec!["secret_table".to_string()]);
                assert!(allowed.contains(&"items".to_string()));
            }
            other => panic!("expected unauthorized rejection, got {other:?}"),
        }
    }

    #[test]
    fn unauthorized_tables_are_sorted_and_deduplicated() {
        let verdict = validate(
            "SELECT * FROM zzz_hidden JOIN aaa_hidden ON 1=1 JOIN zzz_hidden z2 ON 1=1",
        );
        match verdict {
            Verdict::Rejected(PolicyViolation::UnauthorizedTables { tables, .. }) => {
                assert_eq!(
                    tables,
                    vec!["aaa_hidden".to_string(), "zzz_hidden".to_string()]
                );
            }
            other => panic!("expected unauthorized rejection, got {other:?}"),
        }
    }

    #[test]
    fn schema_qualified_references_use_final_segment() {
        assert!(validate("SELECT * FROM public.items").is_accepted());
        let verdict = validate("SELECT * FROM public.secret_table");
        match verdict {
            Verdict::Rejected(PolicyViolation::UnauthorizedTables { tables, .. }) => {
                assert_eq!(tables, vec!["secret_table".to_string()]);
            }
            other => panic!("expected unauthorized rejection, got {other:?}"),
        }
    }

    #[test]
    fn table_reference_in_comment_is_ignored() {
        // The reference scan strips comments, so a commented-out FROM does
        // not count against the allowlist.
        assert!(validate("SELECT 1 -- from secret_table").is_accepted());
        assert!(validate("SELECT 1 /* from secret_table */").is_accepted());
    }

    #[test]
    fn multiline_comment_spanning_lines_is_stripped() {
        let sql = "SELECT 1 /* from\nsecret_table\njoin other */";
        assert!(validate(sql).is_accepted());
    }

    #[test]
    fn mixed_case_table_reference_is_allowed() {
        assert!(validate("SELECT * FROM Items JOIN WEEKLY_METRICS_SUMMARY ON 1=1").is_accepted());
    }

    #[test]
    fn extract_references_handles_joins_and_qualification() {
        let refs = extract_table_references(
            "SELECT * FROM public.items i JOIN weekly_metrics_summary w ON i.id = w.id",
        );
        let expected: BTreeSet<String> = ["items", "weekly_metrics_summary"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(refs, expected);
    }

    #[test]
    fn extract_references_empty_for_bare_select() {
        assert!(extract_table_references("SELECT 1 + 1").is_empty());
    }

    #[test]
    fn verdict_into_result() {
        assert!(validate("SELECT * FROM items").into_result().is_ok());
        assert!(validate("TRUNCATE items").into_result().is_err());
    }

    #[test]
    fn determinism() {
        let sql = "SELECT * FROM items JOIN nope ON 1=1";
        assert_eq!(validate(sql), validate(sql));
    }
}
