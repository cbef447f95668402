use crate::ast::RawBlock;
use crate::error::{GaneshaError, ValidationError};
use crate::export::{Export, EXPORT_BLOCK};
use crate::parser::Parser;
use crate::qos::{Qos, CLUSTER_QOS_BLOCK};
use crate::serialization::{format_block, format_blocks};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::json;

/// A parsed Ganesha configuration document: `%url` directives and top level
/// blocks, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaneshaConfig {
    pub cluster_id: String,
    pub blocks: Vec<RawBlock>,
}

impl Serialize for GaneshaConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let qos = self.cluster_qos().map_err(S::Error::custom)?;
        let exports = self.exports().map_err(S::Error::custom)?;
        json!({
            "cluster_id": self.cluster_id,
            "urls": self.urls(),
            "qos": qos.map(|q| q.to_dict()),
            "exports": exports.iter().map(Export::to_dict).collect::<Vec<_>>(),
        })
        .serialize(serializer)
    }
}

impl GaneshaConfig {
    pub fn new(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            blocks: Vec::new(),
        }
    }

    /// Targets of the `%url` directives, in order.
    #[must_use]
    pub fn urls(&self) -> Vec<&str> {
        self.blocks.iter().filter_map(RawBlock::url_value).collect()
    }

    /// Adds a `%url` directive after the existing ones. Returns `false` if the
    /// document already includes `url`.
    pub fn add_url(&mut self, url: &str) -> bool {
        if self.urls().contains(&url) {
            return false;
        }
        let at = self
            .blocks
            .iter()
            .rposition(RawBlock::is_url)
            .map_or(0, |i| i + 1);
        self.blocks.insert(at, RawBlock::url(url));
        log::debug!("added %url {url}");
        true
    }

    /// Removes the `%url` directive for `url`. Returns `false` if there was none.
    pub fn remove_url(&mut self, url: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.url_value() != Some(url));
        before != self.blocks.len()
    }

    /// The cluster wide QoS defaults, if the document has a
    /// `QOS_DEFAULT_CONFIG` block.
    pub fn cluster_qos(&self) -> Result<Option<Qos>, ValidationError> {
        self.blocks
            .iter()
            .find(|b| b.block_name == CLUSTER_QOS_BLOCK)
            .map(|b| Qos::from_qos_block(b, true))
            .transpose()
    }

    /// Replaces the cluster QoS defaults, or appends them if absent.
    pub fn set_cluster_qos(&mut self, qos: &Qos) -> Result<(), ValidationError> {
        if !qos.cluster_op {
            return Err(ValidationError::invalid(
                "only cluster scoped QOS settings belong at the top level",
            ));
        }
        let block = qos.to_qos_block();
        match self.blocks.iter_mut().find(|b| b.block_name == CLUSTER_QOS_BLOCK) {
            Some(existing) => *existing = block,
            None => self.blocks.push(block),
        }
        Ok(())
    }

    pub fn exports(&self) -> Result<Vec<Export>, ValidationError> {
        self.blocks
            .iter()
            .filter(|b| b.block_name == EXPORT_BLOCK)
            .map(|b| Export::from_export_block(b, &self.cluster_id))
            .collect()
    }

    /// Renders the document back to configuration text.
    pub fn to_text(&self) -> Result<String, GaneshaError> {
        Ok(format_blocks(&self.blocks)?)
    }

    /// # Errors
    /// Fails if a QoS or export block does not convert to the model.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// # Errors
    /// Fails if a QoS or export block does not convert to the model.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Parses a whole configuration document.
///
/// # Arguments
///
/// * `source` - The configuration text.
/// * `file_name` - Name used to label diagnostics.
/// * `cluster_id` - The cluster the exports in this document belong to.
///
/// # Errors
///
/// Returns a `GaneshaError` if the text does not follow the block grammar.
pub fn parse_config(
    source: &str,
    file_name: &str,
    cluster_id: &str,
) -> Result<GaneshaConfig, GaneshaError> {
    let blocks = Parser::new_with_name(source, file_name.to_string()).parse()?;
    Ok(GaneshaConfig {
        cluster_id: cluster_id.to_string(),
        blocks,
    })
}

/// Parses the text of a single export object, as stored for one export.
///
/// # Errors
///
/// Returns a `GaneshaError` on a grammar error, when the text has no
/// `EXPORT` block, or when the block does not convert to an `Export`.
///
/// # Examples
///
/// ```
/// let export = ganesha_conf::parse_export(
///     r#"EXPORT { export_id = 1; path = "/"; pseudo = "/p"; FSAL { name = "RGW"; } }"#,
///     "c1",
/// )?;
/// assert_eq!(export.pseudo, "/p");
/// # Ok::<(), ganesha_conf::GaneshaError>(())
/// ```
pub fn parse_export(source: &str, cluster_id: &str) -> Result<Export, GaneshaError> {
    let blocks = Parser::new(source).parse()?;
    let block = blocks
        .iter()
        .find(|b| b.block_name == EXPORT_BLOCK)
        .ok_or_else(|| ValidationError::invalid("no EXPORT block found"))?;
    Ok(Export::from_export_block(block, cluster_id)?)
}

/// Renders one export as configuration text.
pub fn render_export(export: &Export) -> Result<String, GaneshaError> {
    Ok(format_block(&export.to_export_block())?)
}

/// Builds the `rados://` url of a configuration object.
#[must_use]
pub fn make_rados_url(pool: &str, namespace: Option<&str>, object: &str) -> String {
    match namespace.filter(|ns| !ns.is_empty()) {
        Some(ns) => format!("rados://{pool}/{ns}/{object}"),
        None => format!("rados://{pool}/{object}"),
    }
}

/// Normalizes an export path: surrounding whitespace is trimmed, `.` and
/// `..` components and repeated slashes are collapsed. An empty path stays
/// empty.
#[must_use]
pub fn format_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
