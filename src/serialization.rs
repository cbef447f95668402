use crate::ast::{RawBlock, Value};
use crate::error::SerializeError;

const INDENT_SIZE: usize = 4;

fn indentation(depth: usize) -> String {
    " ".repeat(depth * INDENT_SIZE)
}

/// Formats a stanza value. Lists are comma joined, booleans and integers are
/// bare, and so are the addresses of a `CLIENT` block. Everything else is
/// double-quoted.
pub fn format_value(block_name: &str, key: &str, value: &Value) -> String {
    match value {
        Value::List(items) => items
            .iter()
            .map(|v| format_value(block_name, key, v))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Str(s) if block_name == "CLIENT" && key == "clients" => s.clone(),
        Value::Str(s) => format!("\"{s}\""),
    }
}

fn format_block_body(block: &RawBlock, depth: usize) -> Result<String, SerializeError> {
    let mut conf = String::new();
    for child in &block.blocks {
        if child.is_url() {
            return Err(SerializeError::NestedDirective {
                url: child.url_value().unwrap_or_default().to_string(),
                parent: block.block_name.clone(),
            });
        }
        conf.push_str(&format_nested(child, depth)?);
    }
    for (key, value) in &block.values {
        conf.push_str(&indentation(depth));
        conf.push_str(&format!(
            "{key} = {};\n",
            format_value(&block.block_name, key, value)
        ));
    }
    Ok(conf)
}

fn format_nested(block: &RawBlock, depth: usize) -> Result<String, SerializeError> {
    let mut conf = indentation(depth);
    conf.push_str(&block.block_name);
    conf.push_str(" {\n");
    conf.push_str(&format_block_body(block, depth + 1)?);
    conf.push_str(&indentation(depth));
    conf.push_str("}\n");
    Ok(conf)
}

/// Formats a top level block (or `%url` directive) as Ganesha configuration
/// text.
pub fn format_block(block: &RawBlock) -> Result<String, SerializeError> {
    if block.is_url() {
        return Ok(format!(
            "%url \"{}\"\n\n",
            block.url_value().unwrap_or_default()
        ));
    }
    format_nested(block, 0)
}

/// Formats a sequence of top level blocks, in order.
pub fn format_blocks(blocks: &[RawBlock]) -> Result<String, SerializeError> {
    blocks.iter().map(format_block).collect()
}
