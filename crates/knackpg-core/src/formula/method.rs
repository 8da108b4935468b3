use super::CompiledExpr;
use crate::{Error, Result};

use std::fmt;

/// The string functions available in text formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Trim,
    TrimLeft,
    TrimRight,
    Length,
    Lower,
    Upper,
    Capitalize,
    Random,
    NumberToWords,
    GetDateDayOfWeekName,
    GetDateMonthOfYearName,
    Left,
    Right,
    Mid,
    RegexReplace,
    ExtractRegex,
    Replace,
}

/// How a call is written in SQL.
enum Rendering {
    /// `NAME(args...)`
    Call(&'static str),

    /// `to_char(arg, 'format')`
    DateFormat(&'static str),

    /// `REPLACE(a, b, '')`, removing every match
    Remove,

    /// `SUBSTRING(a FROM b)`, the first regex match
    SubstringFrom,

    /// No SQL equivalent
    Unsupported,
}

const FUNCTIONS: &[Function] = &[
    Function::Trim,
    Function::TrimLeft,
    Function::TrimRight,
    Function::Length,
    Function::Lower,
    Function::Upper,
    Function::Capitalize,
    Function::Random,
    Function::NumberToWords,
    Function::GetDateDayOfWeekName,
    Function::GetDateMonthOfYearName,
    Function::Left,
    Function::Right,
    Function::Mid,
    Function::RegexReplace,
    Function::ExtractRegex,
    Function::Replace,
];

impl Function {
    pub fn all() -> &'static [Function] {
        FUNCTIONS
    }

    pub fn from_name(name: &str) -> Option<Function> {
        FUNCTIONS.iter().copied().find(|func| func.name() == name)
    }

    /// The name used in formulas.
    pub fn name(self) -> &'static str {
        match self {
            Function::Trim => "trim",
            Function::TrimLeft => "trimLeft",
            Function::TrimRight => "trimRight",
            Function::Length => "length",
            Function::Lower => "lower",
            Function::Upper => "upper",
            Function::Capitalize => "capitalize",
            Function::Random => "random",
            Function::NumberToWords => "numberToWords",
            Function::GetDateDayOfWeekName => "getDateDayOfWeekName",
            Function::GetDateMonthOfYearName => "getDateMonthOfYearName",
            Function::Left => "left",
            Function::Right => "right",
            Function::Mid => "mid",
            Function::RegexReplace => "regexReplace",
            Function::ExtractRegex => "extractRegex",
            Function::Replace => "replace",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Function::Left
            | Function::Right
            | Function::Mid
            | Function::RegexReplace
            | Function::ExtractRegex
            | Function::Replace => 2,
            _ => 1,
        }
    }

    /// True if the second argument is a character count or position.
    pub fn takes_count(self) -> bool {
        matches!(self, Function::Left | Function::Right | Function::Mid)
    }

    pub fn is_supported(self) -> bool {
        !matches!(self.rendering(), Rendering::Unsupported)
    }

    fn rendering(self) -> Rendering {
        match self {
            Function::Trim => Rendering::Call("TRIM"),
            Function::TrimLeft => Rendering::Call("LTRIM"),
            Function::TrimRight => Rendering::Call("RTRIM"),
            Function::Length => Rendering::Call("CHAR_LENGTH"),
            Function::Lower => Rendering::Call("LOWER"),
            Function::Upper => Rendering::Call("UPPER"),
            Function::Capitalize => Rendering::Call("INITCAP"),
            Function::Left => Rendering::Call("LEFT"),
            Function::Right => Rendering::Call("RIGHT"),
            Function::Mid => Rendering::Call("SUBSTRING"),
            Function::GetDateDayOfWeekName => Rendering::DateFormat("Day"),
            Function::GetDateMonthOfYearName => Rendering::DateFormat("Month"),
            Function::Replace => Rendering::Remove,
            Function::ExtractRegex => Rendering::SubstringFrom,
            Function::Random | Function::NumberToWords | Function::RegexReplace => {
                Rendering::Unsupported
            }
        }
    }

    /// Writes a call given already compiled arguments.
    pub(crate) fn render(self, args: &[CompiledExpr]) -> Result<CompiledExpr> {
        debug_assert_eq!(args.len(), self.arity());

        let sql = match self.rendering() {
            Rendering::Call(name) => {
                let args: Vec<_> = args.iter().map(CompiledExpr::as_sql).collect();
                format!("{name}({})", args.join(", "))
            }
            Rendering::DateFormat(format) => format!("to_char({}, '{format}')", args[0]),
            Rendering::Remove => format!("REPLACE({}, {}, '')", args[0], args[1]),
            Rendering::SubstringFrom => format!("SUBSTRING({} FROM {})", args[0], args[1]),
            Rendering::Unsupported => return Err(Error::unsupported_function(self.name())),
        };

        Ok(CompiledExpr::new(sql))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(func: Function, args: &[&str]) -> Result<String> {
        let args: Vec<_> = args.iter().map(|arg| CompiledExpr::new(*arg)).collect();
        func.render(&args).map(CompiledExpr::into_sql)
    }

    #[test]
    fn names_round_trip() {
        for func in Function::all() {
            assert_eq!(Function::from_name(func.name()), Some(*func));
        }
        assert_eq!(Function::from_name("concat"), None);
    }

    #[test]
    fn plain_calls() {
        assert_eq!(render(Function::Trim, &["a.b"]).unwrap(), "TRIM(a.b)");
        assert_eq!(render(Function::Capitalize, &["a.b"]).unwrap(), "INITCAP(a.b)");
        assert_eq!(render(Function::Length, &["a.b"]).unwrap(), "CHAR_LENGTH(a.b)");
        assert_eq!(render(Function::Mid, &["a.b", "2"]).unwrap(), "SUBSTRING(a.b, 2)");
    }

    #[test]
    fn special_renderings() {
        assert_eq!(
            render(Function::GetDateDayOfWeekName, &["t.d"]).unwrap(),
            "to_char(t.d, 'Day')"
        );
        assert_eq!(
            render(Function::GetDateMonthOfYearName, &["t.d"]).unwrap(),
            "to_char(t.d, 'Month')"
        );
        assert_eq!(
            render(Function::Replace, &["t.a", "'-'"]).unwrap(),
            "REPLACE(t.a, '-', '')"
        );
        assert_eq!(
            render(Function::ExtractRegex, &["t.a", "'[0-9]+'"]).unwrap(),
            "SUBSTRING(t.a FROM '[0-9]+')"
        );
    }

    #[test]
    fn unsupported() {
        for func in [Function::Random, Function::NumberToWords] {
            let err = render(func, &["x"]).unwrap_err();
            assert!(err.is_unsupported_function());
            assert!(!func.is_supported());
        }

        let err = render(Function::RegexReplace, &["x", "y"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported function: `regexReplace` has no SQL equivalent"
        );
    }
}
