use std::fmt;

/// A numeric summary over the records reachable through a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub method: AggregateMethod,

    /// Key of the connection field to aggregate over
    pub connection: String,

    /// Key of the field on the connected table. `count` does not need one.
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateMethod {
    Count,
    Sum,
    Min,
    Max,
    Average,
}

/// A text formula built from literal text, field tokens and string functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concatenation {
    pub equation: String,
}

impl AggregateMethod {
    pub fn from_source(source_type: &str) -> Option<AggregateMethod> {
        Some(match source_type {
            "count" => AggregateMethod::Count,
            "sum" => AggregateMethod::Sum,
            "min" => AggregateMethod::Min,
            "max" => AggregateMethod::Max,
            "average" => AggregateMethod::Average,
            _ => return None,
        })
    }

    /// The field type naming this method in source metadata.
    pub fn source_name(self) -> &'static str {
        match self {
            AggregateMethod::Count => "count",
            AggregateMethod::Sum => "sum",
            AggregateMethod::Min => "min",
            AggregateMethod::Max => "max",
            AggregateMethod::Average => "average",
        }
    }

    pub fn sql_name(self) -> &'static str {
        match self {
            AggregateMethod::Count => "COUNT",
            AggregateMethod::Sum => "SUM",
            AggregateMethod::Min => "MIN",
            AggregateMethod::Max => "MAX",
            AggregateMethod::Average => "AVG",
        }
    }

    pub fn is_count(self) -> bool {
        matches!(self, AggregateMethod::Count)
    }
}

impl fmt::Display for AggregateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}
