use super::{Comma, Formatter, ToSql};

use crate::stmt::Value;

use knackpg_core::schema::db::DefaultValue;

/// A single-quoted string literal
pub(super) struct Literal<'a>(pub(super) &'a str);

impl ToSql for Literal<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push('\'');
        for ch in self.0.chars() {
            if ch == '\'' {
                f.dst.push('\'');
            }
            f.dst.push(ch);
        }
        f.dst.push('\'');
    }
}

fn boolean(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

impl ToSql for &Value {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Value::Null => fmt!(f, "NULL"),
            Value::Bool(value) => fmt!(f, boolean(*value)),
            Value::Text(value) => fmt!(f, Literal(value)),
            Value::TextArray(values) if values.is_empty() => fmt!(f, "ARRAY[]::TEXT[]"),
            Value::TextArray(values) => {
                let items = Comma(values.iter().map(|value| Literal(value)));
                fmt!(f, "ARRAY[" items "]")
            }
        }
    }
}

impl ToSql for &DefaultValue {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            DefaultValue::Bool(value) => fmt!(f, boolean(*value)),
            DefaultValue::Number(value) => fmt!(f, value),
            DefaultValue::Text(value) => fmt!(f, Literal(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: impl ToSql) -> String {
        let mut dst = String::new();
        value.to_sql(&mut Formatter { dst: &mut dst });
        dst
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(render(Literal("O'Brien")), "'O''Brien'");
    }

    #[test]
    fn arrays() {
        let options = Value::TextArray(vec!["Open".into(), "Closed".into()]);
        assert_eq!(render(&options), "ARRAY['Open', 'Closed']");
        assert_eq!(render(&Value::TextArray(vec![])), "ARRAY[]::TEXT[]");
    }

    #[test]
    fn defaults() {
        assert_eq!(render(&DefaultValue::Bool(false)), "FALSE");
        assert_eq!(render(&DefaultValue::Number("2.50".into())), "2.50");
        assert_eq!(render(&DefaultValue::Text("new".into())), "'new'");
    }
}
