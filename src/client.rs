use crate::ast::RawBlock;
use crate::error::ValidationError;
use crate::fields::{as_dict, block_text, block_text_list, dict_str, dict_str_list, Dict};
use crate::validate::{AccessType, Squash};
use serde_json::{json, Value as Json};

/// Per-client overrides of an export's access type and squash policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub addresses: Vec<String>,
    pub access_type: Option<AccessType>,
    pub squash: Option<Squash>,
}

impl Client {
    pub fn new(
        addresses: Vec<String>,
        access_type: Option<AccessType>,
        squash: Option<Squash>,
    ) -> Result<Self, ValidationError> {
        if addresses.is_empty() {
            return Err(ValidationError::invalid(
                "a client entry needs at least one address",
            ));
        }
        Ok(Self {
            addresses,
            access_type,
            squash,
        })
    }

    pub fn from_client_block(block: &RawBlock) -> Result<Self, ValidationError> {
        let addresses = block_text_list(block, "clients")?.unwrap_or_default();
        let access_type = block_text(block, "access_type")?
            .map(|s| s.parse::<AccessType>())
            .transpose()?;
        let squash = block_text(block, "squash")?
            .map(|s| s.parse::<Squash>())
            .transpose()?;
        Self::new(addresses, access_type, squash)
    }

    pub fn to_client_block(&self) -> RawBlock {
        let mut block = RawBlock::new("CLIENT").with_value("clients", self.addresses.clone());
        if let Some(access_type) = self.access_type {
            block = block.with_value("access_type", access_type.as_str());
        }
        if let Some(squash) = self.squash {
            block = block.with_value("squash", squash.as_str());
        }
        block
    }

    pub fn from_dict(value: &Json) -> Result<Self, ValidationError> {
        let dict = as_dict(value, "client")?;
        let addresses = dict_str_list(dict, "addresses")?.unwrap_or_default();
        let access_type = dict_str(dict, "access_type")?
            .map(|s| s.parse::<AccessType>())
            .transpose()?;
        let squash = dict_str(dict, "squash")?
            .map(|s| s.parse::<Squash>())
            .transpose()?;
        Self::new(addresses, access_type, squash)
    }

    pub fn to_dict(&self) -> Json {
        let mut dict = Dict::new();
        dict.insert("addresses".to_string(), json!(self.addresses));
        if let Some(access_type) = self.access_type {
            dict.insert("access_type".to_string(), json!(access_type.as_str()));
        }
        if let Some(squash) = self.squash {
            dict.insert("squash".to_string(), json!(squash.as_str()));
        }
        Json::Object(dict)
    }
}
