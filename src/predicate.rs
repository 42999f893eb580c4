use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::record::Record;
use crate::value::{parse_number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A single comparison parsed from a filter value such as `>=20`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub op: Op,
    pub val: String,
}

fn comparator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(<=|>=|!=|==|=|<|>)?\s*(.*?)\s*$").expect("static pattern")
    })
}

impl Predicate {
    /// Parse `OP VALUE`; without an operator the predicate is an equality test
    pub fn parse(s: &str) -> Self {
        let (op, val) = match comparator_regex().captures(s) {
            Some(caps) => {
                let op = match caps.get(1).map(|m| m.as_str()) {
                    Some("!=") => Op::Ne,
                    Some("<") => Op::Lt,
                    Some("<=") => Op::Le,
                    Some(">") => Op::Gt,
                    Some(">=") => Op::Ge,
                    _ => Op::Eq,
                };
                (op, caps.get(2).map(|m| m.as_str()).unwrap_or_default())
            }
            None => (Op::Eq, s),
        };

        Self { op, val: val.to_string() }
    }

    pub fn evaluate(&self, other: &Value) -> bool {
        if other.is_null() {
            return false;
        }

        let numeric = match other {
            Value::Text(_) => None,
            _ => other.as_number().zip(parse_number(&self.val).filter(|_| !self.val.trim().is_empty())),
        };

        match numeric {
            Some((lhs, rhs)) => match self.op {
                Op::Eq => lhs == rhs,
                Op::Ne => lhs != rhs,
                Op::Lt => lhs < rhs,
                Op::Le => lhs <= rhs,
                Op::Gt => lhs > rhs,
                Op::Ge => lhs >= rhs,
            },
            None => {
                let lhs = other.to_string();
                let rhs = self.val.as_str();
                match self.op {
                    Op::Eq => lhs == rhs,
                    Op::Ne => lhs != rhs,
                    Op::Lt => lhs.as_str() < rhs,
                    Op::Le => lhs.as_str() <= rhs,
                    Op::Gt => lhs.as_str() > rhs,
                    Op::Ge => lhs.as_str() >= rhs,
                }
            }
        }
    }
}

/// Named filter predicates usable from documents and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinFilter {
    Compare,
    Equals,
    Contains,
    Regex,
}

impl BuiltinFilter {
    /// Evaluate the active values against one field of the record.
    /// Values OR-compose: the record passes if any value matches.
    pub fn evaluate(&self, data_index: &str, values: &[String], record: &Record) -> bool {
        let field = record.get(data_index);
        if field.is_null() {
            return false;
        }

        match self {
            BuiltinFilter::Compare => values.iter().any(|v| Predicate::parse(v).evaluate(field)),
            BuiltinFilter::Equals => {
                let text = field.to_string();
                values.iter().any(|v| *v == text)
            }
            BuiltinFilter::Contains => {
                let text = field.to_string().to_lowercase();
                values.iter().any(|v| text.contains(&v.to_lowercase()))
            }
            BuiltinFilter::Regex => {
                let text = field.to_string();
                values.iter().any(|v| match Regex::new(v) {
                    Ok(re) => re.is_match(&text),
                    Err(_) => false,
                })
            }
        }
    }
}
