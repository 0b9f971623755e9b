//! Parser for the textual type-expression syntax used in class definitions.
//!
//! ```text
//! type     := primary ("[]")*
//! primary  := "?" (("extends" | "super") type)?
//!           | ident ("<" type ("," type)* ">")?
//! ```
//!
//! Identifiers that name a type parameter of the enclosing declaration become
//! [`TypeExpr::Variable`]; every other identifier must name a registered type.

use std::collections::HashMap;

use crate::expr::{TypeExpr, TypeHandle, TypeVar};

/// A malformed or unresolvable type expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {offset} in `{input}`")]
pub struct ParseError {
    pub input: String,
    pub offset: usize,
    pub message: String,
}

/// Name resolution context for one parse.
pub(crate) struct Scope<'a> {
    pub names: &'a HashMap<String, TypeHandle>,
    /// Number of type parameters, indexed by handle.
    pub arities: &'a [usize],
    /// The generic declaration whose type parameters are in scope.
    pub owner: Option<(TypeHandle, &'a [String])>,
    pub object: TypeHandle,
}

pub(crate) fn parse(input: &str, scope: &Scope<'_>) -> Result<TypeExpr, ParseError> {
    let mut parser = Parser {
        input,
        pos: 0,
        scope,
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'s, 'c> {
    input: &'s str,
    pos: usize,
    scope: &'c Scope<'c>,
}

impl<'s> Parser<'s, '_> {
    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let mut ty = self.parse_primary()?;
        loop {
            self.skip_ws();
            if !self.eat('[') {
                break;
            }
            self.skip_ws();
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            if matches!(ty, TypeExpr::Wildcard { .. }) {
                return Err(self.error("wildcard cannot be an array component"));
            }
            ty = TypeExpr::array_of(ty);
        }
        Ok(ty)
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, ParseError> {
        self.skip_ws();
        if self.eat('?') {
            return self.parse_wildcard();
        }

        let start = self.pos;
        let ident = self.ident();
        if ident.is_empty() {
            return Err(self.error("expected a type name"));
        }

        if let Some((owner, params)) = self.scope.owner {
            if let Some(index) = params.iter().position(|p| p == ident) {
                self.skip_ws();
                if self.peek() == Some('<') {
                    return Err(self.error("type variables take no arguments"));
                }
                return Ok(TypeExpr::Variable(TypeVar { owner, index }));
            }
        }

        let Some(&handle) = self.scope.names.get(ident) else {
            return Err(ParseError {
                input: self.input.to_string(),
                offset: start,
                message: format!("unknown type `{}`", ident),
            });
        };

        self.skip_ws();
        if !self.eat('<') {
            // Raw use of a generic type is allowed.
            return Ok(TypeExpr::class(handle));
        }

        let mut args = vec![self.parse_type()?];
        loop {
            self.skip_ws();
            if self.eat(',') {
                args.push(self.parse_type()?);
            } else if self.eat('>') {
                break;
            } else {
                return Err(self.error("expected `,` or `>`"));
            }
        }

        let arity = self.scope.arities[handle.index()];
        if arity != args.len() {
            return Err(ParseError {
                input: self.input.to_string(),
                offset: start,
                message: format!(
                    "`{}` takes {} type argument(s) but {} were supplied",
                    ident,
                    arity,
                    args.len()
                ),
            });
        }

        Ok(TypeExpr::Parameterized { raw: handle, args })
    }

    fn parse_wildcard(&mut self) -> Result<TypeExpr, ParseError> {
        let object = TypeExpr::class(self.scope.object);
        self.skip_ws();
        let checkpoint = self.pos;
        match self.ident() {
            "extends" => Ok(TypeExpr::Wildcard {
                lower: Vec::new(),
                upper: vec![self.parse_type()?],
            }),
            "super" => Ok(TypeExpr::Wildcard {
                lower: vec![self.parse_type()?],
                upper: vec![object],
            }),
            "" => Ok(TypeExpr::Wildcard {
                lower: Vec::new(),
                upper: vec![object],
            }),
            _ => {
                self.pos = checkpoint;
                Err(self.error("expected `extends` or `super` after `?`"))
            }
        }
    }

    fn ident(&mut self) -> &'s str {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | ':') {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &input[start..self.pos]
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError {
            input: self.input.to_string(),
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::RawType;

    fn names() -> (HashMap<String, TypeHandle>, Vec<usize>) {
        let mut names = HashMap::new();
        names.insert("Object".to_string(), TypeHandle(0));
        names.insert("String".to_string(), TypeHandle(1));
        names.insert("Map".to_string(), TypeHandle(2));
        names.insert("List".to_string(), TypeHandle(3));
        (names, vec![0, 0, 2, 1])
    }

    fn scope<'a>(
        names: &'a HashMap<String, TypeHandle>,
        arities: &'a [usize],
        params: &'a [String],
    ) -> Scope<'a> {
        Scope {
            names,
            arities,
            owner: Some((TypeHandle(9), params)),
            object: TypeHandle(0),
        }
    }

    #[test]
    fn test_parse_nested_generics_with_spacing() {
        let (names, arities) = names();
        let params = vec!["K".to_string()];
        let ty = parse(
            "Map < K , List<? extends String> >",
            &scope(&names, &arities, &params),
        )
        .unwrap();

        assert_eq!(
            ty,
            TypeExpr::Parameterized {
                raw: TypeHandle(2),
                args: vec![
                    TypeExpr::Variable(TypeVar {
                        owner: TypeHandle(9),
                        index: 0
                    }),
                    TypeExpr::Parameterized {
                        raw: TypeHandle(3),
                        args: vec![TypeExpr::Wildcard {
                            lower: vec![],
                            upper: vec![TypeExpr::class(TypeHandle(1))],
                        }],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_parse_arrays() {
        let (names, arities) = names();
        let params = vec!["T".to_string()];
        let scope = scope(&names, &arities, &params);

        assert_eq!(
            parse("String[][]", &scope).unwrap(),
            TypeExpr::Concrete(RawType::array_of(RawType::array_of(RawType::Class(
                TypeHandle(1)
            ))))
        );
        assert!(matches!(parse("T[]", &scope).unwrap(), TypeExpr::Array(_)));
    }

    #[test]
    fn test_parse_super_wildcard_has_object_upper_bound() {
        let (names, arities) = names();
        let ty = parse("? super String", &scope(&names, &arities, &[])).unwrap();
        assert_eq!(
            ty,
            TypeExpr::Wildcard {
                lower: vec![TypeExpr::class(TypeHandle(1))],
                upper: vec![TypeExpr::class(TypeHandle(0))],
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        let (names, arities) = names();
        let scope = scope(&names, &arities, &[]);

        let err = parse("Nope", &scope).unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.message.contains("unknown type"));

        let err = parse("Map<String>", &scope).unwrap_err();
        assert!(err.message.contains("takes 2 type argument(s)"));

        assert!(parse("List<String", &scope).is_err());
        assert!(parse("String String", &scope).is_err());
        assert!(parse("? extends", &scope).is_err());
    }
}
