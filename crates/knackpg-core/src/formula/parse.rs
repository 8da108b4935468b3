use super::ast::{Arg, FieldRef, Formula, Method, Piece};
use super::Function;
use crate::{Error, Result};

/// Parses the body of a text formula.
///
/// `field` is the key of the formula field, used in error messages.
pub fn parse(field: &str, src: &str) -> Result<Formula> {
    let mut parser = Parser { field, src, pos: 0 };
    let pieces = parser.pieces(Until::End)?;
    Ok(Formula { pieces })
}

struct Parser<'a> {
    field: &'a str,
    src: &'a str,

    /// Byte offset of the next unread character
    pos: usize,
}

/// What ends the sequence of pieces being parsed.
#[derive(Debug, Clone, Copy)]
enum Until {
    End,

    /// A top-level `,`, closing a first argument
    Comma(Function),

    /// A top-level `)`, closing a last argument
    Close(Function),
}

impl Parser<'_> {
    fn pieces(&mut self, until: Until) -> Result<Vec<Piece>> {
        let mut pieces = vec![];
        let mut text = String::new();

        loop {
            let Some(c) = self.peek() else {
                match until {
                    Until::End => break,
                    Until::Comma(func) => {
                        return Err(self.error(self.pos, arity_message(func)));
                    }
                    Until::Close(func) => {
                        return Err(self.error(
                            self.pos,
                            format!("missing `)` to close `{}`", func.name()),
                        ));
                    }
                }
            };

            match (until, c) {
                (Until::Comma(_), ',') | (Until::Close(_), ')') => break,
                (Until::Comma(func), ')') | (Until::Close(func), ',') => {
                    return Err(self.error(self.pos, arity_message(func)));
                }
                _ => {}
            }

            if let Some((func, len)) = self.method_name() {
                flush(&mut text, &mut pieces);
                let method = self.method(func, len)?;
                pieces.push(Piece::Method(method));
                continue;
            }

            if let Some((field_ref, len)) = field_token(&self.src[self.pos..]) {
                flush(&mut text, &mut pieces);
                pieces.push(Piece::Field(field_ref));
                self.pos += len;
                continue;
            }

            text.push(c);
            self.pos += c.len_utf8();
        }

        flush(&mut text, &mut pieces);
        Ok(pieces)
    }

    fn method(&mut self, func: Function, len: usize) -> Result<Method> {
        let offset = self.pos;

        // name and `(`
        self.pos += len + 1;

        let arity = func.arity();
        let mut args = Vec::with_capacity(arity);

        for i in 0..arity {
            let until = if i + 1 < arity {
                Until::Comma(func)
            } else {
                Until::Close(func)
            };

            let start = self.pos;
            let content = trim(self.pieces(until)?);

            if content.is_empty() {
                return Err(self.error(
                    start,
                    format!("argument {} of `{}` is empty", i + 1, func.name()),
                ));
            }

            args.push(Arg { content });

            // `,` or `)`
            self.pos += 1;
        }

        Ok(Method { func, args, offset })
    }

    /// A known function name starting at a word boundary and directly followed
    /// by `(`.
    fn method_name(&self) -> Option<(Function, usize)> {
        let rest = &self.src[self.pos..];

        if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }

        let at_boundary = self.src[..self.pos]
            .chars()
            .next_back()
            .map(|c| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(true);

        if !at_boundary {
            return None;
        }

        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());

        if !rest[len..].starts_with('(') {
            return None;
        }

        Function::from_name(&rest[..len]).map(|func| (func, len))
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::malformed_formula(self.field, offset, message)
    }
}

fn arity_message(func: Function) -> String {
    match func.arity() {
        1 => format!("`{}` takes 1 argument", func.name()),
        n => format!("`{}` takes {n} arguments", func.name()),
    }
}

fn flush(text: &mut String, pieces: &mut Vec<Piece>) {
    if !text.is_empty() {
        pieces.push(Piece::Text(std::mem::take(text)));
    }
}

/// Drops whitespace around an argument.
fn trim(mut content: Vec<Piece>) -> Vec<Piece> {
    if let Some(Piece::Text(text)) = content.first_mut() {
        *text = text.trim_start().to_string();
    }

    if let Some(Piece::Text(text)) = content.last_mut() {
        *text = text.trim_end().to_string();
    }

    content.retain(|piece| piece.as_text() != Some(""));
    content
}

/// Matches `{field_N}` or `{field_N.field_M}` at the start of `src`.
fn field_token(src: &str) -> Option<(FieldRef, usize)> {
    let inner = src.strip_prefix('{')?;
    let end = inner.find('}')?;
    let body = &inner[..end];

    let field_ref = match body.split_once('.') {
        Some((via, field)) if is_field_key(via) && is_field_key(field) => FieldRef {
            field: field.to_string(),
            via: Some(via.to_string()),
        },
        None if is_field_key(body) => FieldRef {
            field: body.to_string(),
            via: None,
        },
        _ => return None,
    };

    // braces
    Some((field_ref, end + 2))
}

fn is_field_key(s: &str) -> bool {
    s.strip_prefix("field_")
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(src: &str) -> Vec<Piece> {
        parse("field_1", src).unwrap().pieces
    }

    fn method(func: Function, args: Vec<Vec<Piece>>, offset: usize) -> Piece {
        Piece::Method(Method {
            func,
            args: args.into_iter().map(|content| Arg { content }).collect(),
            offset,
        })
    }

    fn error(src: &str) -> String {
        let err = parse("field_1", src).unwrap_err();
        assert!(err.is_malformed_formula(), "{err}");
        err.to_string()
    }

    #[test]
    fn text_and_fields() {
        assert_eq!(
            pieces("Hello {field_12}!"),
            [Piece::text("Hello "), Piece::field("field_12"), Piece::text("!")]
        );
    }

    #[test]
    fn traversal() {
        assert_eq!(
            pieces("{field_3.field_40} ({field_4})"),
            [
                Piece::traversal("field_3", "field_40"),
                Piece::text(" ("),
                Piece::field("field_4"),
                Piece::text(")"),
            ]
        );
    }

    #[test]
    fn other_braces_are_text() {
        assert_eq!(
            pieces("{name} {field_} {field_1.name}"),
            [Piece::text("{name} {field_} {field_1.name}")]
        );
    }

    #[test]
    fn nested_calls() {
        assert_eq!(
            pieces("#upper(left({field_1}, 3))"),
            [
                Piece::text("#"),
                method(
                    Function::Upper,
                    vec![vec![method(
                        Function::Left,
                        vec![vec![Piece::field("field_1")], vec![Piece::text("3")]],
                        7,
                    )]],
                    1,
                ),
            ]
        );
    }

    #[test]
    fn argument_mixes_text_and_fields() {
        assert_eq!(
            pieces("trim( {field_1} - {field_2} )"),
            [method(
                Function::Trim,
                vec![vec![
                    Piece::field("field_1"),
                    Piece::text(" - "),
                    Piece::field("field_2"),
                ]],
                0,
            )]
        );
    }

    #[test]
    fn names_need_boundary_and_paren() {
        assert_eq!(
            pieces("subtrim(x) trim x foo(y)"),
            [Piece::text("subtrim(x) trim x foo(y)")]
        );
        assert_eq!(pieces("Trim(x)"), [Piece::text("Trim(x)")]);
    }

    #[test]
    fn stray_parens_at_top_level_are_text() {
        assert_eq!(
            pieces("lower(A)) b, c"),
            [
                method(Function::Lower, vec![vec![Piece::text("A")]], 0),
                Piece::text(") b, c"),
            ]
        );
    }

    #[test]
    fn missing_close_paren() {
        assert_eq!(
            error("trim({field_1}"),
            "malformed formula in field `field_1` at offset 14: missing `)` to close `trim`"
        );
    }

    #[test]
    fn too_few_arguments() {
        assert_eq!(
            error("left({field_1})"),
            "malformed formula in field `field_1` at offset 14: `left` takes 2 arguments"
        );
        assert_eq!(
            error("left({field_1}"),
            "malformed formula in field `field_1` at offset 14: `left` takes 2 arguments"
        );
    }

    #[test]
    fn too_many_arguments() {
        assert_eq!(
            error("x trim(a, b)"),
            "malformed formula in field `field_1` at offset 8: `trim` takes 1 argument"
        );
        assert_eq!(
            error("mid(a, 1, 2)"),
            "malformed formula in field `field_1` at offset 8: `mid` takes 2 arguments"
        );
    }

    #[test]
    fn empty_argument() {
        assert_eq!(
            error("left(, 3)"),
            "malformed formula in field `field_1` at offset 5: argument 1 of `left` is empty"
        );
        assert_eq!(
            error("upper(  )"),
            "malformed formula in field `field_1` at offset 6: argument 1 of `upper` is empty"
        );
    }

    #[test]
    fn field_refs_include_nested() {
        let formula = parse("field_1", "{field_2} lower({field_3.field_4})").unwrap();
        let refs: Vec<_> = formula.field_refs().into_iter().map(|r| r.field.as_str()).collect();
        assert_eq!(refs, ["field_2", "field_4"]);
    }
}
