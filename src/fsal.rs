use crate::ast::RawBlock;
use crate::error::ValidationError;
use crate::fields::{as_dict, block_text, dict_str, Dict};
use crate::validate::FsChecker;
use serde_json::{json, Value as Json};

pub const CEPH_FSAL: &str = "CEPH";
pub const RGW_FSAL: &str = "RGW";
pub const SUPPORTED_FSALS: [&str; 2] = [CEPH_FSAL, RGW_FSAL];

/// The backend an export is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fsal {
    CephFs(CephFsFsal),
    Rgw(RgwFsal),
}

/// CephFS backend. The same options and `cmount_path` across exports let
/// Ganesha share one CephFS client between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CephFsFsal {
    pub user_id: Option<String>,
    pub fs_name: Option<String>,
    pub sec_label_xattr: Option<String>,
    pub cephx_key: Option<String>,
    pub cmount_path: Option<String>,
}

impl Default for CephFsFsal {
    fn default() -> Self {
        Self {
            user_id: None,
            fs_name: None,
            sec_label_xattr: None,
            cephx_key: None,
            cmount_path: Some("/".to_string()),
        }
    }
}

/// RGW backend, identified by the RGW user and its S3 credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RgwFsal {
    pub user_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl Fsal {
    pub fn name(&self) -> &'static str {
        match self {
            Fsal::CephFs(_) => CEPH_FSAL,
            Fsal::Rgw(_) => RGW_FSAL,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Fsal::CephFs(fs) => fs.user_id.as_deref(),
            Fsal::Rgw(rgw) => rgw.user_id.as_deref(),
        }
    }

    pub fn from_fsal_block(block: &RawBlock) -> Result<Self, ValidationError> {
        match block_text(block, "name")?.as_deref() {
            Some(CEPH_FSAL) => Ok(Fsal::CephFs(CephFsFsal {
                user_id: block_text(block, "user_id")?,
                fs_name: block_text(block, "filesystem")?,
                sec_label_xattr: block_text(block, "sec_label_xattr")?,
                cephx_key: block_text(block, "secret_access_key")?,
                cmount_path: block_text(block, "cmount_path")?,
            })),
            Some(RGW_FSAL) => Ok(Fsal::Rgw(RgwFsal {
                user_id: block_text(block, "user_id")?,
                access_key_id: block_text(block, "access_key_id")?,
                secret_access_key: block_text(block, "secret_access_key")?,
            })),
            other => Err(ValidationError::UnknownFsal {
                name: other.unwrap_or("None").to_string(),
            }),
        }
    }

    pub fn to_fsal_block(&self) -> RawBlock {
        let mut block = RawBlock::new("FSAL").with_value("name", self.name());
        let fields: Vec<(&str, Option<&str>)> = match self {
            Fsal::CephFs(fs) => vec![
                ("user_id", non_empty(&fs.user_id)),
                ("filesystem", non_empty(&fs.fs_name)),
                ("sec_label_xattr", non_empty(&fs.sec_label_xattr)),
                ("secret_access_key", non_empty(&fs.cephx_key)),
                ("cmount_path", non_empty(&fs.cmount_path)),
            ],
            Fsal::Rgw(rgw) => vec![
                ("user_id", non_empty(&rgw.user_id)),
                ("access_key_id", non_empty(&rgw.access_key_id)),
                ("secret_access_key", non_empty(&rgw.secret_access_key)),
            ],
        };
        for (key, value) in fields {
            if let Some(value) = value {
                block = block.with_value(key, value);
            }
        }
        block
    }

    pub fn from_dict(value: &Json) -> Result<Self, ValidationError> {
        let dict = as_dict(value, "fsal")?;
        match dict_str(dict, "name")?.as_deref() {
            Some(CEPH_FSAL) => Ok(Fsal::CephFs(CephFsFsal {
                user_id: dict_str(dict, "user_id")?,
                fs_name: dict_str(dict, "fs_name")?,
                sec_label_xattr: dict_str(dict, "sec_label_xattr")?,
                cephx_key: dict_str(dict, "cephx_key")?,
                cmount_path: dict_str(dict, "cmount_path")?,
            })),
            Some(RGW_FSAL) => Ok(Fsal::Rgw(RgwFsal {
                user_id: dict_str(dict, "user_id")?,
                access_key_id: dict_str(dict, "access_key_id")?,
                secret_access_key: dict_str(dict, "secret_access_key")?,
            })),
            other => Err(ValidationError::UnknownFsal {
                name: other.unwrap_or("None").to_string(),
            }),
        }
    }

    /// The API form. The CephX key is never exposed.
    pub fn to_dict(&self) -> Json {
        let mut dict = Dict::new();
        dict.insert("name".to_string(), json!(self.name()));
        let fields: Vec<(&str, Option<&str>)> = match self {
            Fsal::CephFs(fs) => vec![
                ("user_id", non_empty(&fs.user_id)),
                ("fs_name", non_empty(&fs.fs_name)),
                ("sec_label_xattr", non_empty(&fs.sec_label_xattr)),
                ("cmount_path", non_empty(&fs.cmount_path)),
            ],
            Fsal::Rgw(rgw) => vec![
                ("user_id", non_empty(&rgw.user_id)),
                ("access_key_id", non_empty(&rgw.access_key_id)),
                ("secret_access_key", non_empty(&rgw.secret_access_key)),
            ],
        };
        for (key, value) in fields {
            if let Some(value) = value {
                dict.insert(key.to_string(), json!(value));
            }
        }
        Json::Object(dict)
    }

    /// CephFS exports must name a filesystem the checker knows about. RGW
    /// has nothing to check structurally.
    pub fn validate(&self, fs_checker: &impl FsChecker) -> Result<(), ValidationError> {
        match self {
            Fsal::CephFs(fs) => match non_empty(&fs.fs_name) {
                Some(name) if fs_checker.fs_exists(name) => Ok(()),
                _ => Err(ValidationError::FsNotFound {
                    fs_name: fs.fs_name.clone(),
                }),
            },
            Fsal::Rgw(_) => Ok(()),
        }
    }
}
