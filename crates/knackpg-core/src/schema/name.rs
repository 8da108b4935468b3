use serde::Serialize;
use std::fmt;

/// Words that cannot be used as bare identifiers.
///
/// PostgreSQL's reserved key words, plus a few words the source application
/// commonly uses as labels that read poorly as column names.
const RESERVED: &[&str] = &[
    "all",
    "analyse",
    "analyze",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "asymmetric",
    "authorization",
    "binary",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "collation",
    "column",
    "concurrently",
    "constraint",
    "create",
    "cross",
    "current_catalog",
    "current_date",
    "current_role",
    "current_schema",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "fetch",
    "for",
    "foreign",
    "freeze",
    "from",
    "full",
    "grant",
    "group",
    "having",
    "ilike",
    "in",
    "initially",
    "inner",
    "intersect",
    "into",
    "is",
    "isnull",
    "join",
    "lateral",
    "leading",
    "left",
    "like",
    "limit",
    "localtime",
    "localtimestamp",
    "natural",
    "not",
    "notnull",
    "null",
    "number",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "outer",
    "overlaps",
    "placing",
    "primary",
    "references",
    "returning",
    "right",
    "select",
    "session_user",
    "similar",
    "some",
    "symmetric",
    "system_user",
    "table",
    "tablesample",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "verbose",
    "view",
    "when",
    "where",
    "window",
    "with",
];

/// A SQL identifier derived from a human label.
///
/// Sanitizing is lossy: `2-A` and `2$A` both become `_2_a`. Callers that need
/// unique names check for collisions themselves.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Name {
    /// The sanitized identifier, matching `[a-z_][a-z0-9_]*`
    pub ident: String,

    /// The label the identifier was derived from
    pub label: String,
}

impl Name {
    pub fn new(label: &str) -> Self {
        Self {
            ident: sanitize(label),
            label: label.to_string(),
        }
    }

    /// A name whose identifier is already valid, used for synthetic columns.
    pub(crate) fn synthetic(ident: &str) -> Self {
        debug_assert_eq!(sanitize(ident), ident);
        Self {
            ident: ident.to_string(),
            label: ident.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.ident
    }

    pub fn is_reserved(ident: &str) -> bool {
        RESERVED.contains(&ident)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ident)
    }
}

fn sanitize(label: &str) -> String {
    let mut ident: String = label
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();

    match ident.chars().next() {
        None => ident.push('_'),
        Some(c) if c.is_ascii_digit() => ident.insert(0, '_'),
        _ => {}
    }

    if Name::is_reserved(&ident) {
        ident.insert(0, '_');
    }

    ident
}
