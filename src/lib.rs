pub mod ast;
pub mod error;
pub mod parser;
pub mod utils;
pub mod validate;
pub mod fsal;
pub mod client;
pub mod qos;
pub mod export;
pub mod api;
pub mod serialization;
mod fields;

pub use api::{
    format_path, make_rados_url, parse_config, parse_export, render_export, GaneshaConfig,
};
pub use ast::{RawBlock, Value};
pub use error::{GaneshaError, ParserError, SerializeError, ValidationError};
pub use export::Export;
pub use validate::FsChecker;
