use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum GaneshaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),
}

/// Grammar errors. Every variant carries a short excerpt of the whitespace
/// stripped stream around the cursor, with `<here>` marking the position.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Cannot find block name at {context}")]
    #[diagnostic(
        code(parser::missing_block_name),
        help("A block starts with its name followed by '{{'.")
    )]
    MissingBlockName {
        context: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a block name here")]
        span: SourceSpan,
    },

    #[error("No closing bracket '}}' found at the end of block at {context}")]
    #[diagnostic(code(parser::missing_closing_bracket))]
    MissingClosingBracket {
        context: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("block should end here")]
        span: SourceSpan,
    },

    #[error("Malformed stanza: no semicolon found at {context}")]
    #[diagnostic(
        code(parser::missing_semicolon),
        help("Every stanza has the form `key = value;`.")
    )]
    MissingSemicolon {
        context: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a stanza or a nested block")]
        span: SourceSpan,
    },

    #[error("Malformed stanza: no equal symbol found at {context}")]
    #[diagnostic(
        code(parser::missing_equal_sign),
        help("Every stanza has the form `key = value;`.")
    )]
    MissingEqualSign {
        context: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("stanza without '='")]
        span: SourceSpan,
    },

    #[error("Infinite loop while parsing block content at {context}")]
    #[diagnostic(code(parser::no_progress))]
    NoProgress {
        context: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parser stopped advancing here")]
        span: SourceSpan,
    },

    #[error("The %url directive is only allowed at the top level, found at {context}")]
    #[diagnostic(code(parser::nested_directive))]
    NestedDirective {
        context: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("nested directive")]
        span: SourceSpan,
    },
}

impl ParserError {
    /// The `...before<here>after` excerpt attached to the error.
    pub fn context(&self) -> &str {
        match self {
            ParserError::MissingBlockName { context, .. }
            | ParserError::MissingClosingBracket { context, .. }
            | ParserError::MissingSemicolon { context, .. }
            | ParserError::MissingEqualSign { context, .. }
            | ParserError::NoProgress { context, .. }
            | ParserError::NestedDirective { context, .. } => context,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum SerializeError {
    #[error("%url directive '{url}' cannot be nested inside block {parent}")]
    #[diagnostic(
        code(serialize::nested_directive),
        help("Only top level blocks may be %url directives.")
    )]
    NestedDirective { url: String, parent: String },
}

/// Errors raised while building or validating the export model.
///
/// `InvalidOperation` and `FsNotFound` are the two conventions callers
/// surface verbatim; the remaining variants are more specific forms of an
/// invalid operation.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{message}")]
    #[diagnostic(code(validation::invalid_operation))]
    InvalidOperation { message: String },

    #[error("filesystem {} not found", fs_name_or_none(.fs_name))]
    #[diagnostic(
        code(validation::fs_not_found),
        help("CephFS exports need the name of an existing filesystem.")
    )]
    FsNotFound { fs_name: Option<String> },

    #[error("{block} is missing required field '{field}'")]
    #[diagnostic(code(validation::missing_field))]
    MissingField { block: String, field: String },

    #[error("Unknown FSAL {name}")]
    #[diagnostic(code(validation::unknown_fsal), help("Supported FSALs are CEPH and RGW."))]
    UnknownFsal { name: String },

    #[error("Invalid bandwidth value. {reason}")]
    #[diagnostic(code(validation::invalid_bandwidth))]
    InvalidBandwidth { value: String, reason: String },

    #[error("{}", qos_requirement_message(.qos_type, .combined, .required))]
    #[diagnostic(code(validation::qos_requirement))]
    QosRequirement {
        qos_type: String,
        combined: bool,
        required: Vec<String>,
    },
}

impl ValidationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationError::InvalidOperation {
            message: message.into(),
        }
    }

    pub fn missing(block: &str, field: &str) -> Self {
        ValidationError::MissingField {
            block: block.to_string(),
            field: field.to_string(),
        }
    }
}

fn fs_name_or_none(fs_name: &Option<String>) -> &str {
    fs_name.as_deref().unwrap_or("None")
}

fn qos_requirement_message(qos_type: &str, combined: &bool, required: &[String]) -> String {
    format!(
        "When combined_rw_bw is {} and qos_type is {qos_type}, only the following parameters are required: {}.",
        if *combined { "enabled" } else { "disabled" },
        required.join(",")
    )
}
