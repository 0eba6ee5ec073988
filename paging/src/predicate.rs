//! Typed filter predicates and the relational expression parser

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::sort::SortSpec;
use crate::value::{parse_datetime, Value};

/// Characters that open a relational expression or a range operator.
pub const OPERATOR_LEADERS: [char; 3] = ['>', '<', '='];

/// Whether `c` opens a comparison operator.
pub fn is_operator_leader(c: char) -> bool {
    OPERATOR_LEADERS.contains(&c)
}

/// Comparison operator of a relational predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

// Longest tokens first so `>=` is not read as `>` followed by `=`.
const OPERATOR_TOKENS: [(&str, CompareOp); 8] = [
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    ("<>", CompareOp::Ne),
    ("!=", CompareOp::Ne),
    ("==", CompareOp::Eq),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
    ("=", CompareOp::Eq),
];

impl CompareOp {
    /// Parse an operator token such as `>=` or `<`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        OPERATOR_TOKENS
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, op)| *op)
    }

    /// Split a leading operator off `expr`, returning the operator and the rest.
    pub fn split_leading(expr: &str) -> Option<(Self, &str)> {
        let expr = expr.trim_start();
        OPERATOR_TOKENS
            .iter()
            .find(|(t, _)| expr.starts_with(t))
            .map(|(t, op)| (*op, &expr[t.len()..]))
    }

    /// Canonical token
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }

    /// Evaluate the operator against the outcome of [`Value::compare`].
    ///
    /// Incomparable operands only satisfy `!=`.
    pub fn matches(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (CompareOp::Eq, Some(o)) => o == Ordering::Equal,
            (CompareOp::Ne, Some(o)) => o != Ordering::Equal,
            (CompareOp::Ne, None) => true,
            (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
            (CompareOp::Ge, Some(o)) => o != Ordering::Less,
            (CompareOp::Lt, Some(o)) => o == Ordering::Less,
            (CompareOp::Le, Some(o)) => o != Ordering::Greater,
            (_, None) => false,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case handling for string set membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

/// A predicate produced by the filter compiler and bound by a deferred query.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPredicate {
    /// `property op value`
    Compare {
        property: String,
        op: CompareOp,
        value: Value,
    },
    /// The lowercased string form of `property` contains `needle`.
    ///
    /// `needle` is already lowercased.
    ContainsText { property: String, needle: String },
    /// `property` equals one of `values`
    In {
        property: String,
        values: Vec<Value>,
        case: CaseSensitivity,
    },
}

impl FilterPredicate {
    /// The property the predicate reads.
    pub fn property(&self) -> &str {
        match self {
            FilterPredicate::Compare { property, .. }
            | FilterPredicate::ContainsText { property, .. }
            | FilterPredicate::In { property, .. } => property,
        }
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterPredicate::Compare {
                property,
                op,
                value,
            } => write!(f, "{property} {op} {value}"),
            FilterPredicate::ContainsText { property, needle } => {
                write!(f, "{property} contains \"{needle}\"")
            }
            FilterPredicate::In {
                property, values, ..
            } => {
                let items = values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{property} in [{items}]")
            }
        }
    }
}

/// Ordering applied to a deferred query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderClause {
    /// A constant key: well defined but arbitrary, in practice source order.
    Constant,
    /// Order by the given properties.
    By(SortSpec),
}

/// Parse a relational expression such as `>=5000` bound to `property`.
///
/// The expression is an operator token followed by one literal: a number,
/// a quoted string, `true`, `false`, `null` or a bare ISO-8601 date-time.
pub fn parse_relational(property: &str, expr: &str) -> Result<FilterPredicate, QueryError> {
    let (op, rest) = CompareOp::split_leading(expr).ok_or_else(|| {
        QueryError::PredicateParse(format!("expected comparison operator in '{property} {expr}'"))
    })?;
    let value = parse_literal(rest.trim()).map_err(|reason| {
        QueryError::PredicateParse(format!("{reason} in '{property} {expr}'"))
    })?;
    Ok(FilterPredicate::Compare {
        property: property.to_string(),
        op,
        value,
    })
}

fn parse_literal(token: &str) -> Result<Value, String> {
    if token.is_empty() {
        return Err("missing operand".into());
    }

    for quote in ['"', '\''] {
        if token.starts_with(quote) {
            if token.len() < 2 || !token.ends_with(quote) {
                return Err(format!("unterminated string literal {token}"));
            }
            let inner = &token[1..token.len() - 1];
            return Ok(Value::String(inner.replace(&format!("\\{quote}"), &quote.to_string())));
        }
    }

    if token.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }
    if token.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    if let Ok(i) = token.parse::<i64>() {
        return Ok(Value::I64(i));
    }
    if let Ok(u) = token.parse::<u64>() {
        return Ok(Value::U64(u));
    }
    if let Ok(d) = Decimal::from_str(token) {
        return Ok(Value::Decimal(d));
    }
    if let Ok(f) = token.parse::<f64>() {
        return Ok(Value::F64(f));
    }
    if let Some(dt) = parse_datetime(token) {
        return Ok(Value::DateTime(dt.with_timezone(&Utc)));
    }

    Err(format!("unrecognized literal '{token}'"))
}
