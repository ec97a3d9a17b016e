//! Recursive-descent JSON parser built from a chain of recognizers
//!
//! Every recognizer answers two questions about the text at the current
//! position: does it claim the text (`matches`), and what value does it build
//! from it (`build`). Leaf recognizers use anchored patterns, so they never look
//! past the current position. Object and array recognizers recurse back into
//! the chain for their elements.

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ParseError, ParseResult};
use super::value::{Map, Value};

/// Maximum nesting of objects and arrays
pub const MAX_DEPTH: usize = 256;

/// Parses a complete JSON document with the default recognizer chain.
pub fn parse(input: &str) -> ParseResult<Value> {
    Parser::new().parse(input)
}

/// Position bookkeeping shared by all recognizers during one parse
struct Context {
    source_len: usize,
}

impl Context {
    /// Byte offset of `rest` within the source; `rest` is always a suffix of it.
    fn offset(&self, rest: &str) -> usize {
        self.source_len - rest.len()
    }
}

/// Outcome of one recognizer: the value and the trimmed text left over.
struct Built<'a> {
    value: Value,
    rest: &'a str,
}

trait Recognizer: Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, input: &str) -> ParseResult<bool>;

    fn build<'a>(
        &self,
        input: &'a str,
        parser: &Parser,
        ctx: &Context,
        depth: usize,
    ) -> ParseResult<Built<'a>>;
}

/// JSON parser holding the priority-ordered recognizer chain.
pub struct Parser {
    chain: Vec<&'static dyn Recognizer>,
}

impl Parser {
    /// Creates a parser with the standard chain.
    ///
    /// Order matters: Double must precede Int, otherwise `1.5` would be read
    /// as the integer `1` followed by garbage.
    pub fn new() -> Self {
        let chain: [&'static dyn Recognizer; 7] = [
            &NULL,
            &ObjectRecognizer,
            &ArrayRecognizer,
            &DOUBLE,
            &INT,
            &STRING,
            &BOOLEAN,
        ];
        Self {
            chain: chain.to_vec(),
        }
    }

    /// Names of the recognizers in the order they are tried
    pub fn recognizer_order(&self) -> Vec<&'static str> {
        self.chain.iter().map(|r| r.name()).collect()
    }

    /// Parses a complete document.
    ///
    /// # Errors
    ///
    /// Fails on empty or whitespace-only input, on text no recognizer claims,
    /// on missing structural tokens, and on non-whitespace after the value.
    pub fn parse(&self, input: &str) -> ParseResult<Value> {
        let start = input.trim_start();
        if start.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let ctx = Context {
            source_len: input.len(),
        };
        let built = self.build(start, &ctx, 0)?;

        if !built.rest.is_empty() {
            return Err(ParseError::TrailingInput {
                offset: ctx.offset(built.rest),
            });
        }
        Ok(built.value)
    }

    fn build<'a>(&self, input: &'a str, ctx: &Context, depth: usize) -> ParseResult<Built<'a>> {
        for recognizer in &self.chain {
            if recognizer.matches(input)? {
                return recognizer.build(input, self, ctx, depth);
            }
        }
        Err(ParseError::NoRecognizer {
            offset: ctx.offset(input),
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Leaf recognizers
// =============================================================================

type Decoder = fn(&str, usize) -> ParseResult<Value>;

/// Lazily compiled pattern; a compile error is kept and reported on every use
type PatternCell = OnceLock<Result<Regex, regex::Error>>;

fn compiled<'r>(
    cell: &'r PatternCell,
    name: &'static str,
    pattern: &str,
) -> ParseResult<&'r Regex> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ParseError::InvalidPattern {
            name,
            reason: e.to_string(),
        })
}

/// Recognizer for a scalar matched by an anchored pattern
struct LeafRecognizer {
    name: &'static str,
    pattern: &'static str,
    compiled: PatternCell,
    decode: Decoder,
}

impl LeafRecognizer {
    const fn new(name: &'static str, pattern: &'static str, decode: Decoder) -> Self {
        Self {
            name,
            pattern,
            compiled: OnceLock::new(),
            decode,
        }
    }

    fn regex(&self) -> ParseResult<&Regex> {
        compiled(&self.compiled, self.name, self.pattern)
    }

    fn literal<'a>(&self, input: &'a str) -> ParseResult<Option<&'a str>> {
        Ok(self.regex()?.find(input).map(|m| m.as_str()))
    }
}

impl Recognizer for LeafRecognizer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, input: &str) -> ParseResult<bool> {
        Ok(self.regex()?.is_match(input))
    }

    fn build<'a>(
        &self,
        input: &'a str,
        _parser: &Parser,
        ctx: &Context,
        _depth: usize,
    ) -> ParseResult<Built<'a>> {
        let offset = ctx.offset(input);
        let literal = self
            .literal(input)?
            .ok_or(ParseError::NoRecognizer { offset })?;
        let value = (self.decode)(literal, offset)?;
        let rest = input[literal.len()..].trim_start();
        Ok(Built { value, rest })
    }
}

static NULL: LeafRecognizer = LeafRecognizer::new("null", r"^null", |_, _| Ok(Value::Null));

static DOUBLE: LeafRecognizer = LeafRecognizer::new("double", r"^-?\d+\.\d+", |literal, offset| {
    literal
        .parse::<f64>()
        .map(Value::Double)
        .map_err(|_| ParseError::NoRecognizer { offset })
});

static INT: LeafRecognizer = LeafRecognizer::new("int", r"^-?\d+\b", |literal, offset| {
    literal
        .parse::<i32>()
        .map(Value::Int)
        .map_err(|_| ParseError::IntegerOutOfRange {
            literal: literal.to_string(),
            offset,
        })
});

static STRING: LeafRecognizer = LeafRecognizer::new("string", r#"^"[^"]*""#, |literal, _| {
    Ok(Value::String(literal[1..literal.len() - 1].to_string()))
});

static BOOLEAN: LeafRecognizer =
    LeafRecognizer::new("boolean", r"^(?:true|false)", |literal, _| {
        Ok(Value::Bool(literal == "true"))
    });

static PROPERTY_NAME: PatternCell = OnceLock::new();

// =============================================================================
// Composite recognizers
// =============================================================================

struct ObjectRecognizer;

impl ObjectRecognizer {
    /// Reads a quoted, non-empty property name; returns it and the text after it.
    fn property_name<'a>(input: &'a str, ctx: &Context) -> ParseResult<(&'a str, &'a str)> {
        let regex = compiled(&PROPERTY_NAME, "property name", r#"^"[^"]+""#)?;
        let quoted = regex
            .find(input)
            .ok_or(ParseError::InvalidPropertyName {
                offset: ctx.offset(input),
            })?
            .as_str();
        Ok((&quoted[1..quoted.len() - 1], &input[quoted.len()..]))
    }
}

impl Recognizer for ObjectRecognizer {
    fn name(&self) -> &'static str {
        "object"
    }

    fn matches(&self, input: &str) -> ParseResult<bool> {
        Ok(input.starts_with('{'))
    }

    fn build<'a>(
        &self,
        input: &'a str,
        parser: &Parser,
        ctx: &Context,
        depth: usize,
    ) -> ParseResult<Built<'a>> {
        if depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }

        let mut map = Map::new();
        let mut rest = input[1..].trim_start();

        loop {
            match rest.as_bytes().first() {
                None => {
                    return Err(ParseError::Unterminated {
                        kind: "object",
                        offset: ctx.offset(input),
                    })
                }
                Some(b'}') => {
                    rest = rest[1..].trim_start();
                    break;
                }
                Some(b',') => {
                    rest = rest[1..].trim_start();
                }
                Some(_) => {
                    let (key, after_key) = Self::property_name(rest, ctx)?;
                    let after_key = after_key.trim_start();
                    if !after_key.starts_with(':') {
                        return Err(ParseError::Expected {
                            token: ':',
                            offset: ctx.offset(after_key),
                        });
                    }
                    let element = parser.build(after_key[1..].trim_start(), ctx, depth + 1)?;
                    map.insert(key, element.value);
                    rest = element.rest;
                }
            }
        }

        Ok(Built {
            value: Value::Object(map),
            rest,
        })
    }
}

struct ArrayRecognizer;

impl Recognizer for ArrayRecognizer {
    fn name(&self) -> &'static str {
        "array"
    }

    fn matches(&self, input: &str) -> ParseResult<bool> {
        Ok(input.starts_with('['))
    }

    fn build<'a>(
        &self,
        input: &'a str,
        parser: &Parser,
        ctx: &Context,
        depth: usize,
    ) -> ParseResult<Built<'a>> {
        if depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }

        let mut items = Vec::new();
        let mut rest = input[1..].trim_start();

        loop {
            match rest.as_bytes().first() {
                None => {
                    return Err(ParseError::Unterminated {
                        kind: "array",
                        offset: ctx.offset(input),
                    })
                }
                Some(b']') => {
                    rest = rest[1..].trim_start();
                    break;
                }
                Some(b',') => {
                    rest = rest[1..].trim_start();
                }
                Some(_) => {
                    let element = parser.build(rest, ctx, depth + 1)?;
                    items.push(element.value);
                    rest = element.rest;
                }
            }
        }

        Ok(Built {
            value: Value::Array(items),
            rest,
        })
    }
}
