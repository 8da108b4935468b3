//! Parsed text formulas. Produced once by the parser and only read after.

use super::Function;

/// A formula body: literal text, field tokens and calls, concatenated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub pieces: Vec<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Text(String),
    Field(FieldRef),
    Method(Method),
}

/// `{field_N}` or `{field_N.field_M}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// The referenced field. For a traversal, a field of the connected table.
    pub field: String,

    /// The connection traversed to reach `field`
    pub via: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub func: Function,
    pub args: Vec<Arg>,

    /// Byte offset of the function name in the formula
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub content: Vec<Piece>,
}

impl Formula {
    /// Every field token, including those nested in calls, in source order.
    pub fn field_refs(&self) -> Vec<&FieldRef> {
        let mut refs = vec![];
        collect_refs(&self.pieces, &mut refs);
        refs
    }
}

impl Piece {
    pub fn text(text: impl Into<String>) -> Piece {
        Piece::Text(text.into())
    }

    pub fn field(field: impl Into<String>) -> Piece {
        Piece::Field(FieldRef {
            field: field.into(),
            via: None,
        })
    }

    pub fn traversal(via: impl Into<String>, field: impl Into<String>) -> Piece {
        Piece::Field(FieldRef {
            field: field.into(),
            via: Some(via.into()),
        })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Piece::Text(text) => Some(text),
            _ => None,
        }
    }
}

fn collect_refs<'a>(pieces: &'a [Piece], refs: &mut Vec<&'a FieldRef>) {
    for piece in pieces {
        match piece {
            Piece::Text(_) => {}
            Piece::Field(field) => refs.push(field),
            Piece::Method(method) => {
                for arg in &method.args {
                    collect_refs(&arg.content, refs);
                }
            }
        }
    }
}
