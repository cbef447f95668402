use crate::ast::{RawBlock, Value};
use crate::error::ParserError;
use crate::utils::context_snippet;
use miette::NamedSource;
use std::sync::Arc;

const URL_PREFIX: &str = "%url ";

/// Collapses raw configuration text into the stream the parser walks.
///
/// Every line is left-trimmed. Directive lines (starting with `%`) keep their
/// inner spacing, lose all quote characters and end with a newline. Every
/// other line loses all of its whitespace, which also strips spaces inside
/// quoted values.
pub fn preprocess(raw_config: &str) -> String {
    let mut text = String::with_capacity(raw_config.len());
    for line in raw_config.split('\n') {
        let line = line.trim_start();
        if line.starts_with('%') {
            text.extend(line.chars().filter(|c| *c != '"'));
            text.push('\n');
        } else {
            text.extend(line.split_whitespace());
        }
    }
    text
}

/// A recursive descent parser over the preprocessed stream, driven by a
/// single byte cursor.
///
/// ```text
/// config     ::= { block | directive }
/// block      ::= NAME "{" { stanza | block } "}"
/// stanza     ::= key "=" value ";"
/// directive  ::= "%url " text "\n"
/// ```
#[derive(Debug)]
pub struct Parser {
    source: Arc<NamedSource<String>>,
    text: String,
    pos: usize,
}

impl Parser {
    pub fn new(raw_config: &str) -> Self {
        Self::new_with_name(raw_config, "ganesha.conf".to_string())
    }

    pub fn new_with_name(raw_config: &str, name: String) -> Self {
        let text = preprocess(raw_config);
        let source = Arc::new(NamedSource::new(name, text.clone()));
        Self {
            source,
            text,
            pos: 0,
        }
    }

    // === Main Parsing Methods ===

    /// Parses every top level block and directive in order.
    pub fn parse(&mut self) -> Result<Vec<RawBlock>, ParserError> {
        let mut blocks = Vec::new();
        while !self.stream().is_empty() {
            blocks.push(self.parse_block_or_section()?);
        }
        log::debug!(
            "parsed {} top level block(s) from {}",
            blocks.len(),
            self.source.name()
        );
        Ok(blocks)
    }

    fn parse_block_or_section(&mut self) -> Result<RawBlock, ParserError> {
        if self.stream().starts_with(URL_PREFIX) {
            self.pos += URL_PREFIX.len();
            let value = match self.stream().find('\n') {
                Some(idx) => {
                    let value = self.stream()[..idx].to_string();
                    self.pos += idx + 1;
                    value
                }
                None => {
                    let value = self.stream().to_string();
                    self.pos += value.len();
                    value
                }
            };
            return Ok(RawBlock::url(value));
        }

        let mut block = RawBlock::new(self.parse_block_name()?.to_uppercase());
        self.parse_block_body(&mut block)?;
        if !self.stream().starts_with('}') {
            return Err(self.err(|context, src, span| ParserError::MissingClosingBracket {
                context,
                src,
                span,
            }));
        }
        self.pos += 1;
        Ok(block)
    }

    fn parse_block_name(&mut self) -> Result<String, ParserError> {
        let Some(idx) = self.stream().find('{') else {
            return Err(self.err(|context, src, span| ParserError::MissingBlockName {
                context,
                src,
                span,
            }));
        };
        let name = self.stream()[..idx].to_string();
        self.pos += idx + 1;
        Ok(name)
    }

    fn parse_block_body(&mut self, block: &mut RawBlock) -> Result<(), ParserError> {
        loop {
            if self.stream().starts_with('}') {
                return Ok(());
            }
            if self.stream().starts_with(URL_PREFIX) {
                return Err(self.err(|context, src, span| ParserError::NestedDirective {
                    context,
                    src,
                    span,
                }));
            }

            let last_pos = self.pos;
            let semicolon = self.stream().find(';');
            let lbracket = self.stream().find('{');

            match (semicolon, lbracket) {
                (Some(s), Some(b)) if s < b => self.parse_stanza(block)?,
                (Some(_), None) => self.parse_stanza(block)?,
                (_, Some(_)) => {
                    let child = self.parse_block_or_section()?;
                    block.blocks.push(child);
                }
                (None, None) => {
                    return Err(self.err(|context, src, span| ParserError::MissingSemicolon {
                        context,
                        src,
                        span,
                    }))
                }
            }

            if last_pos == self.pos {
                return Err(self.err(|context, src, span| ParserError::NoProgress {
                    context,
                    src,
                    span,
                }));
            }
        }
    }

    /// Stanza ::= key "=" value ";"
    fn parse_stanza(&mut self, block: &mut RawBlock) -> Result<(), ParserError> {
        let stream = self.stream();
        let semicolon_idx = stream.find(';').unwrap_or(stream.len());
        let Some(equal_idx) = stream[..semicolon_idx].find('=') else {
            return Err(self.err(|context, src, span| ParserError::MissingEqualSign {
                context,
                src,
                span,
            }));
        };
        let key = stream[..equal_idx].to_lowercase();
        let raw_value = &stream[equal_idx + 1..semicolon_idx];
        let value = parse_parameter_value(raw_value);
        log::trace!("{}: {key} = {value:?}", block.block_name);
        block.values.insert(key, value);
        self.pos += semicolon_idx + 1;
        Ok(())
    }

    // === Helper Methods ===

    fn stream(&self) -> &str {
        &self.text[self.pos..]
    }

    fn err(
        &self,
        build: impl FnOnce(String, NamedSource<String>, miette::SourceSpan) -> ParserError,
    ) -> ParserError {
        let context = context_snippet(&self.text, self.pos);
        build(
            context,
            (*self.source).clone(),
            (self.pos, self.stream().chars().next().map_or(0, char::len_utf8)).into(),
        )
    }
}

/// Types the raw text between `=` and `;`.
///
/// Comma separated text becomes a list of recursively typed elements. A
/// scalar is an integer if it parses as one, a boolean for the exact words
/// `true`/`false`, the inner text of a double-quoted string, or the bare
/// token otherwise.
pub fn parse_parameter_value(raw_value: &str) -> Value {
    if raw_value.contains(',') {
        return Value::List(
            raw_value
                .split(',')
                .map(|v| parse_parameter_value(v.trim()))
                .collect(),
        );
    }
    if let Ok(i) = raw_value.parse::<i64>() {
        return Value::Int(i);
    }
    match raw_value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        quoted if quoted.starts_with('"') => {
            let rest = quoted.strip_prefix('"').unwrap_or(quoted);
            // drops the closing quote, or whatever character stands in for it
            let inner = rest.char_indices().next_back().map_or("", |(i, _)| &rest[..i]);
            Value::Str(inner.to_string())
        }
        bare => Value::Str(bare.to_string()),
    }
}

/// Parses configuration text into its top level blocks.
pub fn parse(raw_config: &str) -> Result<Vec<RawBlock>, ParserError> {
    Parser::new(raw_config).parse()
}
