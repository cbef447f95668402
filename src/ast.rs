use indexmap::IndexMap;
use std::fmt;

/// Name of the one-line top-level directive that pulls in another config object.
pub const URL_DIRECTIVE: &str = "%url";

/// A parameter value as it appears on the right hand side of a stanza.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar text form. Bare integers and booleans are accepted where the
    /// model expects a string, since unquoted tokens are coerced on parse.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::List(_) => None,
        }
    }

    /// Treats a scalar as a one-element list. A single empty string is what an
    /// empty list renders to, so it maps back to no elements.
    pub fn to_list(&self) -> Vec<Value> {
        match self {
            Value::List(items) => items.clone(),
            Value::Str(s) if s.is_empty() => Vec::new(),
            other => vec![other.clone()],
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// A generic configuration block: `NAME { key = value; CHILD { ... } }`.
///
/// Child order is insertion order. Values keep insertion order so a rendered
/// block lists its stanzas in the order they were set.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct RawBlock {
    pub block_name: String,
    pub blocks: Vec<RawBlock>,
    pub values: IndexMap<String, Value>,
}

impl RawBlock {
    pub fn new(block_name: impl Into<String>) -> Self {
        Self {
            block_name: block_name.into(),
            blocks: Vec::new(),
            values: IndexMap::new(),
        }
    }

    /// Builds a `%url` directive pointing at another configuration object.
    pub fn url(url: impl Into<String>) -> Self {
        let mut block = Self::new(URL_DIRECTIVE);
        block.values.insert("value".to_string(), Value::Str(url.into()));
        block
    }

    pub fn is_url(&self) -> bool {
        self.block_name == URL_DIRECTIVE
    }

    /// The target of a `%url` directive.
    pub fn url_value(&self) -> Option<&str> {
        if !self.is_url() {
            return None;
        }
        self.values.get("value").and_then(Value::as_str)
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_block(mut self, block: RawBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Child blocks with the given (upper case) name, in order.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawBlock> + 'a {
        self.blocks.iter().filter(move |b| b.block_name == name)
    }
}
