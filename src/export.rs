use crate::ast::RawBlock;
use crate::client::Client;
use crate::error::ValidationError;
use crate::fields::{
    as_dict, block_bool, block_int, block_int_list, block_text, block_text_list, dict_bool,
    dict_int, dict_int_list, dict_str, dict_str_list, Dict,
};
use crate::fsal::Fsal;
use crate::qos::{Qos, EXPORT_QOS_BLOCK};
use crate::validate::{
    validate_protocols, validate_pseudo, validate_transports, AccessType, FsChecker, SecType,
    Squash,
};
use serde::{Serialize, Serializer};
use serde_json::{json, Value as Json};

pub const EXPORT_BLOCK: &str = "EXPORT";

/// An NFS export: one FSAL backend, optional per-client overrides and
/// optional QoS limits.
#[derive(Debug, Clone)]
pub struct Export {
    pub export_id: u32,
    pub path: String,
    pub cluster_id: String,
    pub pseudo: String,
    pub access_type: AccessType,
    pub squash: Squash,
    pub security_label: bool,
    pub protocols: Vec<i64>,
    pub transports: Vec<String>,
    pub fsal: Fsal,
    pub clients: Vec<Client>,
    pub sectype: Option<Vec<SecType>>,
    pub qos_block: Option<Qos>,
}

fn parse_export_id(id: i64) -> Result<u32, ValidationError> {
    u32::try_from(id).map_err(|_| {
        ValidationError::invalid(format!(
            "export_id {id} is out of range, it must be between 0 and {}",
            u32::MAX
        ))
    })
}

fn parse_sectypes(items: Vec<String>) -> Result<Vec<SecType>, ValidationError> {
    items.iter().map(|s| s.parse::<SecType>()).collect()
}

impl Export {
    /// Builds an export from a parsed `EXPORT` block. The cluster id is not
    /// part of the configuration text and comes from the caller.
    pub fn from_export_block(block: &RawBlock, cluster_id: &str) -> Result<Self, ValidationError> {
        let export_id = block_int(block, "export_id")?
            .ok_or_else(|| ValidationError::missing(EXPORT_BLOCK, "export_id"))?;
        let path =
            block_text(block, "path")?.ok_or_else(|| ValidationError::missing(EXPORT_BLOCK, "path"))?;
        let pseudo = block_text(block, "pseudo")?
            .ok_or_else(|| ValidationError::missing(EXPORT_BLOCK, "pseudo"))?;

        let mut fsal_blocks = block.children("FSAL");
        let fsal = match (fsal_blocks.next(), fsal_blocks.next()) {
            (Some(fsal), None) => Fsal::from_fsal_block(fsal)?,
            (None, _) => return Err(ValidationError::missing(EXPORT_BLOCK, "FSAL")),
            (Some(_), Some(_)) => {
                return Err(ValidationError::invalid("an export takes exactly one FSAL block"))
            }
        };

        let sectype = if block.get("sectype").is_some() {
            block_text_list(block, "sectype")?
        } else if block.get("SecType").is_some() {
            log::warn!("export {export_id}: reading camel case SecType as sectype");
            block_text_list(block, "SecType")?
        } else {
            None
        };

        let export = Self {
            export_id: parse_export_id(export_id)?,
            path,
            cluster_id: cluster_id.to_string(),
            pseudo,
            access_type: block_text(block, "access_type")?
                .map(|s| s.parse::<AccessType>())
                .transpose()?
                .unwrap_or(AccessType::None),
            squash: block_text(block, "squash")?
                .map(|s| s.parse::<Squash>())
                .transpose()?
                .unwrap_or(Squash::NoRootSquash),
            security_label: block_bool(block, "security_label")?.unwrap_or(true),
            protocols: block_int_list(block, "protocols")?.unwrap_or_default(),
            transports: block_text_list(block, "transports")?.unwrap_or_default(),
            fsal,
            clients: block
                .children("CLIENT")
                .map(Client::from_client_block)
                .collect::<Result<_, _>>()?,
            sectype: sectype.map(parse_sectypes).transpose()?,
            qos_block: block
                .children(EXPORT_QOS_BLOCK)
                .next()
                .map(|qos| Qos::from_qos_block(qos, false))
                .transpose()?,
        };
        log::debug!(
            "read export {} ({}) with {} client block(s)",
            export.export_id,
            export.pseudo,
            export.clients.len()
        );
        Ok(export)
    }

    pub fn to_export_block(&self) -> RawBlock {
        let mut block = RawBlock::new(EXPORT_BLOCK)
            .with_value("export_id", self.export_id)
            .with_value("path", self.path.as_str())
            .with_value("pseudo", self.pseudo.as_str())
            .with_value("access_type", self.access_type.as_str())
            .with_value("squash", self.squash.as_str())
            .with_value("attr_expiration_time", 0i64)
            .with_value("security_label", self.security_label)
            .with_value("protocols", self.protocols.clone())
            .with_value("transports", self.transports.clone());
        if let Some(sectype) = &self.sectype {
            let names: Vec<&str> = sectype.iter().map(SecType::as_str).collect();
            block = block.with_value("sectype", names);
        }

        block = block.with_block(self.fsal.to_fsal_block());
        for client in &self.clients {
            block = block.with_block(client.to_client_block());
        }
        if let Some(qos) = &self.qos_block {
            block = block.with_block(qos.to_qos_block());
        }
        block
    }

    /// Builds an export from an API dict carrying its own `export_id`.
    pub fn from_dict(value: &Json) -> Result<Self, ValidationError> {
        let dict = as_dict(value, "export")?;
        let export_id = dict_int(dict, "export_id")?
            .ok_or_else(|| ValidationError::missing(EXPORT_BLOCK, "export_id"))?;
        Self::from_dict_with_id(parse_export_id(export_id)?, value)
    }

    /// Builds an export from an API dict under an id assigned by the caller.
    /// Omitted options take the defaults of a newly created export.
    pub fn from_dict_with_id(export_id: u32, value: &Json) -> Result<Self, ValidationError> {
        let dict = as_dict(value, "export")?;
        let fsal = dict
            .get("fsal")
            .filter(|v| !v.is_null())
            .ok_or_else(|| ValidationError::missing(EXPORT_BLOCK, "fsal"))?;
        let clients = match dict.get("clients") {
            None | Some(Json::Null) => Vec::new(),
            Some(Json::Array(items)) => items.iter().map(Client::from_dict).collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(ValidationError::invalid(format!(
                    "clients must be a list, got {other}"
                )))
            }
        };

        let export = Self {
            export_id,
            path: dict_str(dict, "path")?.unwrap_or_else(|| "/".to_string()),
            cluster_id: dict_str(dict, "cluster_id")?
                .ok_or_else(|| ValidationError::missing(EXPORT_BLOCK, "cluster_id"))?,
            pseudo: dict_str(dict, "pseudo")?
                .ok_or_else(|| ValidationError::missing(EXPORT_BLOCK, "pseudo"))?,
            access_type: dict_str(dict, "access_type")?
                .map(|s| s.parse::<AccessType>())
                .transpose()?
                .unwrap_or(AccessType::Ro),
            squash: dict_str(dict, "squash")?
                .map(|s| s.parse::<Squash>())
                .transpose()?
                .unwrap_or(Squash::NoRootSquash),
            security_label: dict_bool(dict, "security_label")?.unwrap_or(true),
            protocols: dict_int_list(dict, "protocols")?.unwrap_or_else(|| vec![3, 4]),
            transports: dict_str_list(dict, "transports")?.unwrap_or_else(|| vec!["TCP".to_string()]),
            fsal: Fsal::from_dict(fsal)?,
            clients,
            sectype: dict_str_list(dict, "sectype")?
                .map(parse_sectypes)
                .transpose()?,
            qos_block: dict
                .get("qos_block")
                .filter(|v| !v.is_null())
                .map(|qos| Qos::from_dict(qos, false))
                .transpose()?,
        };
        log::debug!("built export {} from dict", export.export_id);
        Ok(export)
    }

    pub fn to_dict(&self) -> Json {
        let mut protocols = self.protocols.clone();
        protocols.sort_unstable();
        let mut transports = self.transports.clone();
        transports.sort();

        let mut dict = Dict::new();
        dict.insert("export_id".to_string(), json!(self.export_id));
        dict.insert("path".to_string(), json!(self.path));
        dict.insert("cluster_id".to_string(), json!(self.cluster_id));
        dict.insert("pseudo".to_string(), json!(self.pseudo));
        dict.insert("access_type".to_string(), json!(self.access_type.as_str()));
        dict.insert("squash".to_string(), json!(self.squash.as_str()));
        dict.insert("security_label".to_string(), json!(self.security_label));
        dict.insert("protocols".to_string(), json!(protocols));
        dict.insert("transports".to_string(), json!(transports));
        dict.insert("fsal".to_string(), self.fsal.to_dict());
        dict.insert(
            "clients".to_string(),
            Json::Array(self.clients.iter().map(Client::to_dict).collect()),
        );
        if let Some(sectype) = &self.sectype {
            let names: Vec<&str> = sectype.iter().map(SecType::as_str).collect();
            dict.insert("sectype".to_string(), json!(names));
        }
        if let Some(qos) = &self.qos_block {
            dict.insert("qos_block".to_string(), qos.to_dict());
        }
        Json::Object(dict)
    }

    /// Checks the options that are kept as given rather than typed on
    /// construction, then the FSAL against the filesystem checker.
    pub fn validate(&self, fs_checker: &impl FsChecker) -> Result<(), ValidationError> {
        validate_pseudo(&self.pseudo)?;
        validate_protocols(&self.protocols)?;
        validate_transports(&self.transports)?;
        self.fsal.validate(fs_checker)
    }

    /// Pretty-printed JSON of the API form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

impl PartialEq for Export {
    fn eq(&self, other: &Self) -> bool {
        self.to_dict() == other.to_dict()
    }
}

impl Eq for Export {}

impl Serialize for Export {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_dict().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;
    use crate::fsal::{CephFsFsal, RgwFsal};
    use crate::parser::parse;
    use crate::qos::Bandwidths;
    use crate::serialization::format_block;

    const EXAMPLE: &str = r#"EXPORT { export_id = 1; path = "/"; pseudo = "/cephfs"; access_type = "RW"; squash = "no_root_squash"; protocols = 4; transports = "TCP"; FSAL { name = "CEPH"; user_id = "u"; filesystem = "a"; } }"#;

    fn fs_a(name: &str) -> bool {
        name == "a"
    }

    fn sample() -> Export {
        Export {
            export_id: 7,
            path: "/volumes/_nogroup/sub".into(),
            cluster_id: "nfs1".into(),
            pseudo: "/sub".into(),
            access_type: AccessType::Rw,
            squash: Squash::RootSquash,
            security_label: true,
            protocols: vec![4, 3],
            transports: vec!["UDP".into(), "TCP".into()],
            fsal: Fsal::CephFs(CephFsFsal {
                user_id: Some("nfs.nfs1.7".into()),
                fs_name: Some("a".into()),
                cephx_key: Some("AQBkey==".into()),
                ..Default::default()
            }),
            clients: vec![Client::new(
                vec!["192.168.0.0/16".into(), "10.0.0.1".into()],
                Some(AccessType::Ro),
                None,
            )
            .unwrap()],
            sectype: Some(vec![SecType::Krb5, SecType::Sys]),
            qos_block: Some(
                Qos::new(
                    false,
                    true,
                    true,
                    false,
                    None,
                    Bandwidths::from_human(["10MB", "20MB", "0", "0", "0", "0"]).unwrap(),
                )
                .unwrap(),
            ),
        }
    }

    #[test]
    fn test_example_export() {
        let blocks = parse(EXAMPLE).unwrap();
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.get("protocols"), Some(&Value::Int(4)));
        assert_eq!(block.get("transports"), Some(&Value::from("TCP")));

        let export = Export::from_export_block(block, "c1").unwrap();
        assert_eq!(export.export_id, 1);
        assert_eq!(export.protocols, vec![4]);
        assert_eq!(export.transports, vec!["TCP".to_string()]);
        assert_eq!(
            export.to_dict()["fsal"],
            json!({"name": "CEPH", "user_id": "u", "fs_name": "a"})
        );
        export.validate(&fs_a).unwrap();
    }

    #[test]
    fn test_block_round_trip_through_text() {
        let export = sample();
        let text = format_block(&export.to_export_block()).unwrap();
        let blocks = parse(&text).unwrap();
        let back = Export::from_export_block(&blocks[0], "nfs1").unwrap();
        assert_eq!(back.to_dict(), export.to_dict());
        assert_eq!(back, export);
    }

    #[test]
    fn test_dict_round_trip() {
        let export = sample();
        let back = Export::from_dict(&export.to_dict()).unwrap();
        assert_eq!(back.to_dict(), export.to_dict());
    }

    #[test]
    fn test_block_layout() {
        let block = sample().to_export_block();
        let keys: Vec<&str> = block.values.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "export_id",
                "path",
                "pseudo",
                "access_type",
                "squash",
                "attr_expiration_time",
                "security_label",
                "protocols",
                "transports",
                "sectype"
            ]
        );
        let children: Vec<&str> = block.blocks.iter().map(|b| b.block_name.as_str()).collect();
        assert_eq!(children, ["FSAL", "CLIENT", "QOS_BLOCK"]);
    }

    #[test]
    fn test_read_defaults() {
        let block = RawBlock::new("EXPORT")
            .with_value("export_id", 2i64)
            .with_value("path", "/")
            .with_value("pseudo", "/rgw")
            .with_block(RawBlock::new("FSAL").with_value("name", "RGW"));
        let export = Export::from_export_block(&block, "c").unwrap();
        assert_eq!(export.access_type, AccessType::None);
        assert_eq!(export.squash, Squash::NoRootSquash);
        assert!(export.security_label);
        assert!(export.protocols.is_empty());
        assert_eq!(export.fsal, Fsal::Rgw(RgwFsal::default()));
    }

    #[test]
    fn test_write_defaults() {
        let dict = json!({
            "cluster_id": "c",
            "pseudo": "/x",
            "fsal": {"name": "CEPH", "fs_name": "a"}
        });
        let export = Export::from_dict_with_id(3, &dict).unwrap();
        assert_eq!(export.path, "/");
        assert_eq!(export.access_type, AccessType::Ro);
        assert_eq!(export.protocols, vec![3, 4]);
        assert_eq!(export.transports, vec!["TCP".to_string()]);
        assert!(Export::from_dict(&dict).is_err());
    }

    #[test]
    fn test_largest_export_id_round_trips() {
        let mut export = sample();
        export.export_id = u32::MAX;
        let text = format_block(&export.to_export_block()).unwrap();
        assert!(text.contains("    export_id = 4294967295;\n"));
        let back = Export::from_export_block(&parse(&text).unwrap()[0], "nfs1").unwrap();
        assert_eq!(back.export_id, u32::MAX);
        assert_eq!(Export::from_dict(&export.to_dict()).unwrap().export_id, u32::MAX);
    }

    #[test]
    fn test_out_of_range_export_id_rejected() {
        for id in [-1i64, i64::from(u32::MAX) + 1, i64::MAX] {
            let block = RawBlock::new("EXPORT")
                .with_value("export_id", id)
                .with_value("path", "/")
                .with_value("pseudo", "/p")
                .with_block(RawBlock::new("FSAL").with_value("name", "RGW"));
            let err = Export::from_export_block(&block, "c").unwrap_err();
            assert!(err.to_string().contains("is out of range"), "{id}: {err}");
        }

        let mut dict = sample().to_dict();
        dict["export_id"] = json!(u64::MAX);
        assert!(Export::from_dict(&dict).is_err());
        dict["export_id"] = json!(i64::from(u32::MAX) + 1);
        let err = Export::from_dict(&dict).unwrap_err();
        assert!(err.to_string().contains("is out of range"));
    }

    #[test]
    fn test_missing_required_fields() {
        let block = RawBlock::new("EXPORT").with_value("path", "/");
        assert_eq!(
            Export::from_export_block(&block, "c").unwrap_err(),
            ValidationError::missing("EXPORT", "export_id")
        );
        let block = RawBlock::new("EXPORT")
            .with_value("export_id", 1i64)
            .with_value("path", "/")
            .with_value("pseudo", "/p");
        assert_eq!(
            Export::from_export_block(&block, "c").unwrap_err(),
            ValidationError::missing("EXPORT", "FSAL")
        );
    }

    #[test]
    fn test_camel_case_sectype() {
        let block = parse(
            r#"EXPORT { export_id = 1; path = "/"; pseudo = "/p"; SecType = "krb5p", "sys"; FSAL { name = "RGW"; } }"#,
        )
        .unwrap();
        let export = Export::from_export_block(&block[0], "c").unwrap();
        assert_eq!(export.sectype, Some(vec![SecType::Krb5p, SecType::Sys]));

        let programmatic = RawBlock::new("EXPORT")
            .with_value("export_id", 1i64)
            .with_value("path", "/")
            .with_value("pseudo", "/p")
            .with_value("SecType", "krb5")
            .with_block(RawBlock::new("FSAL").with_value("name", "RGW"));
        let export = Export::from_export_block(&programmatic, "c").unwrap();
        assert_eq!(export.sectype, Some(vec![SecType::Krb5]));
    }

    #[test]
    fn test_validation() {
        let mut export = sample();
        export.transports = vec!["tcp".into()];
        export.protocols = vec![3, 4];
        export.validate(&fs_a).unwrap();

        export.pseudo = "relative".into();
        assert!(export.validate(&fs_a).is_err());
        export.pseudo = "/".into();
        assert!(export.validate(&fs_a).is_err());

        let mut export = sample();
        export.protocols = vec![2];
        assert!(export.validate(&fs_a).is_err());

        let export = sample();
        assert_eq!(
            export.validate(&|_: &str| false).unwrap_err(),
            ValidationError::FsNotFound { fs_name: Some("a".into()) }
        );
    }

    #[test]
    fn test_invalid_enum_fails_on_read() {
        let dict = json!({
            "export_id": 1,
            "cluster_id": "c",
            "pseudo": "/x",
            "squash": "everyone",
            "fsal": {"name": "RGW"}
        });
        assert!(Export::from_dict(&dict).is_err());
    }

    #[test]
    fn test_json_hides_cephx_key() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"pseudo\": \"/sub\""));
        assert!(!json.contains("AQBkey=="));
        let yaml = sample().to_yaml().unwrap();
        assert!(yaml.contains("max_export_read_bw: 20MB"));
    }
}
