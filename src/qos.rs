use crate::ast::{RawBlock, Value};
use crate::error::ValidationError;
use crate::fields::{as_dict, block_bool, dict_bool, dict_str, Dict};
use crate::utils::{bytes_to_human, with_units_to_int};
use serde_json::{json, Value as Json};
use std::fmt;
use std::str::FromStr;

/// Block name of the cluster wide defaults.
pub const CLUSTER_QOS_BLOCK: &str = "QOS_DEFAULT_CONFIG";
/// Block name of the per-export settings, nested in `EXPORT`.
pub const EXPORT_QOS_BLOCK: &str = "QOS_BLOCK";

pub const MIN_QOS_BW: u64 = 1_000_000;
pub const MAX_QOS_BW: u64 = 2_000_000_000;

const ENABLE_QOS: &str = "enable_qos";
const ENABLE_BW_CTRL: &str = "enable_bw_control";
const COMBINED_BW_CTRL: &str = "combined_rw_bw_control";
const QOS_TYPE: &str = "qos_type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QosType {
    PerShare,
    PerClient,
    PerSharePerClient,
}

impl QosType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QosType::PerShare => "PerShare",
            QosType::PerClient => "PerClient",
            QosType::PerSharePerClient => "PerShare_PerClient",
        }
    }

    /// The numeric form used in configuration text.
    pub fn block_id(&self) -> i64 {
        match self {
            QosType::PerShare => 1,
            QosType::PerClient => 2,
            QosType::PerSharePerClient => 3,
        }
    }

    pub fn from_block_id(id: i64) -> Result<Self, ValidationError> {
        match id {
            1 => Ok(QosType::PerShare),
            2 => Ok(QosType::PerClient),
            3 => Ok(QosType::PerSharePerClient),
            _ => Err(ValidationError::invalid(format!(
                "qos_type {id} is invalid, valid values are 1, 2 and 3"
            ))),
        }
    }
}

impl FromStr for QosType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PerShare" => Ok(QosType::PerShare),
            "PerClient" => Ok(QosType::PerClient),
            "PerShare_PerClient" => Ok(QosType::PerSharePerClient),
            _ => Err(ValidationError::invalid(format!(
                "qos_type {s} is invalid, valid types are [\"PerShare\", \"PerClient\", \"PerShare_PerClient\"]"
            ))),
        }
    }
}

impl fmt::Display for QosType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the six bandwidth limits, named by its configuration parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandwidthField {
    ExportWrite,
    ExportRead,
    ClientWrite,
    ClientRead,
    ExportCombined,
    ClientCombined,
}

impl BandwidthField {
    pub const ALL: [BandwidthField; 6] = [
        BandwidthField::ExportWrite,
        BandwidthField::ExportRead,
        BandwidthField::ClientWrite,
        BandwidthField::ClientRead,
        BandwidthField::ExportCombined,
        BandwidthField::ClientCombined,
    ];

    pub fn param_name(&self) -> &'static str {
        match self {
            BandwidthField::ExportWrite => "max_export_write_bw",
            BandwidthField::ExportRead => "max_export_read_bw",
            BandwidthField::ClientWrite => "max_client_write_bw",
            BandwidthField::ClientRead => "max_client_read_bw",
            BandwidthField::ExportCombined => "max_export_combined_bw",
            BandwidthField::ClientCombined => "max_client_combined_bw",
        }
    }

    fn from_param_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.param_name() == name)
    }
}

/// Bandwidth limits in bytes per second. Zero means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bandwidths {
    pub export_writebw: u32,
    pub export_readbw: u32,
    pub client_writebw: u32,
    pub client_readbw: u32,
    pub export_rw_bw: u32,
    pub client_rw_bw: u32,
}

impl Bandwidths {
    pub fn get(&self, field: BandwidthField) -> u32 {
        match field {
            BandwidthField::ExportWrite => self.export_writebw,
            BandwidthField::ExportRead => self.export_readbw,
            BandwidthField::ClientWrite => self.client_writebw,
            BandwidthField::ClientRead => self.client_readbw,
            BandwidthField::ExportCombined => self.export_rw_bw,
            BandwidthField::ClientCombined => self.client_rw_bw,
        }
    }

    fn slot(&mut self, field: BandwidthField) -> &mut u32 {
        match field {
            BandwidthField::ExportWrite => &mut self.export_writebw,
            BandwidthField::ExportRead => &mut self.export_readbw,
            BandwidthField::ClientWrite => &mut self.client_writebw,
            BandwidthField::ClientRead => &mut self.client_readbw,
            BandwidthField::ExportCombined => &mut self.export_rw_bw,
            BandwidthField::ClientCombined => &mut self.client_rw_bw,
        }
    }

    /// Parses human readable values (`"10MB"`, `"0"`) into validated byte counts.
    pub fn from_human(values: [&str; 6]) -> Result<Self, ValidationError> {
        let mut bandwidths = Bandwidths::default();
        for (field, raw) in BandwidthField::ALL.into_iter().zip(values) {
            *bandwidths.slot(field) = parse_bw(raw)?;
        }
        Ok(bandwidths)
    }

    /// Reads the bandwidth parameters of an API dict. Missing parameters are
    /// zero; keys that are not bandwidth parameters are ignored.
    pub fn from_dict(dict: &Dict) -> Result<Self, ValidationError> {
        let mut bandwidths = Bandwidths::default();
        for field in BandwidthField::ALL {
            let bytes = match dict.get(field.param_name()) {
                None | Some(Json::Null) => 0,
                Some(Json::String(s)) => parse_bw(s)?,
                Some(Json::Number(n)) => match n.as_u64() {
                    Some(bytes) => check_bw_range(bytes, &n.to_string())?,
                    None => return Err(bandwidth_type_error(field, &n.to_string())),
                },
                Some(other) => return Err(bandwidth_type_error(field, &other.to_string())),
            };
            *bandwidths.slot(field) = bytes;
        }
        Ok(bandwidths)
    }

    fn from_block(block: &RawBlock) -> Result<Self, ValidationError> {
        let mut bandwidths = Bandwidths::default();
        for field in BandwidthField::ALL {
            let bytes = match block.get(field.param_name()) {
                None => 0,
                Some(Value::Int(i)) => match u64::try_from(*i) {
                    Ok(bytes) => check_bw_range(bytes, &i.to_string())?,
                    Err(_) => return Err(bandwidth_type_error(field, &i.to_string())),
                },
                Some(Value::Str(s)) => parse_bw(s)?,
                Some(other) => return Err(bandwidth_type_error(field, &other.to_string())),
            };
            *bandwidths.slot(field) = bytes;
        }
        Ok(bandwidths)
    }

    fn validated(self) -> Result<Self, ValidationError> {
        for field in BandwidthField::ALL {
            let bytes = u64::from(self.get(field));
            check_bw_range(bytes, &bytes.to_string())?;
        }
        Ok(self)
    }

    fn set_fields(&self) -> impl Iterator<Item = (BandwidthField, u32)> + '_ {
        BandwidthField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, bytes)| *bytes != 0)
    }
}

fn bandwidth_type_error(field: BandwidthField, value: &str) -> ValidationError {
    ValidationError::InvalidBandwidth {
        value: value.to_string(),
        reason: format!("{} must be a size, got {value}", field.param_name()),
    }
}

/// A valid limit fits in `u32` since `MAX_QOS_BW` does.
fn check_bw_range(bytes: u64, raw: &str) -> Result<u32, ValidationError> {
    let out_of_range = || ValidationError::InvalidBandwidth {
        value: raw.to_string(),
        reason: format!(
            "Provided bandwidth value is not in range, Please enter a value between {MIN_QOS_BW} and {MAX_QOS_BW} bytes"
        ),
    };
    if bytes != 0 && !(MIN_QOS_BW..=MAX_QOS_BW).contains(&bytes) {
        return Err(out_of_range());
    }
    u32::try_from(bytes).map_err(|_| out_of_range())
}

fn parse_bw(bandwidth: &str) -> Result<u32, ValidationError> {
    check_bw_range(with_units_to_int(bandwidth)?, bandwidth)
}

/// Converts a human readable bandwidth into bytes. The result must be zero
/// (unset) or lie within `[MIN_QOS_BW, MAX_QOS_BW]`.
pub fn validate_qos_bw(bandwidth: &str) -> Result<u64, ValidationError> {
    parse_bw(bandwidth).map(u64::from)
}

/// The bandwidth parameters a QoS type needs, depending on whether read and
/// write limits are combined.
pub fn required_bandwidths(qos_type: QosType, combined_bw_ctrl: bool) -> &'static [BandwidthField] {
    use BandwidthField::*;
    match (combined_bw_ctrl, qos_type) {
        (false, QosType::PerShare) => &[ExportWrite, ExportRead],
        (false, QosType::PerClient) => &[ClientWrite, ClientRead],
        (false, QosType::PerSharePerClient) => &[ExportWrite, ExportRead, ClientWrite, ClientRead],
        (true, QosType::PerShare) => &[ExportCombined],
        (true, QosType::PerClient) => &[ClientCombined],
        (true, QosType::PerSharePerClient) => &[ExportCombined, ClientCombined],
    }
}

/// Every required bandwidth must be set and every other one must be zero.
pub fn qos_bandwidth_checks(
    qos_type: QosType,
    combined_bw_ctrl: bool,
    bandwidths: &Bandwidths,
) -> Result<(), ValidationError> {
    let required = required_bandwidths(qos_type, combined_bw_ctrl);
    let mismatch = BandwidthField::ALL
        .into_iter()
        .any(|field| required.contains(&field) == (bandwidths.get(field) == 0));
    if mismatch {
        return Err(ValidationError::QosRequirement {
            qos_type: qos_type.as_str().to_string(),
            combined: combined_bw_ctrl,
            required: required.iter().map(|f| f.param_name().to_string()).collect(),
        });
    }
    Ok(())
}

/// QoS settings, either the cluster wide defaults (`cluster_op`) or the
/// settings of one export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Qos {
    pub cluster_op: bool,
    pub enable_qos: bool,
    pub enable_bw_ctrl: bool,
    pub combined_bw_ctrl: bool,
    /// Only meaningful at cluster scope.
    pub qos_type: Option<QosType>,
    bandwidths: Bandwidths,
}

impl Qos {
    pub fn new(
        cluster_op: bool,
        enable_qos: bool,
        enable_bw_ctrl: bool,
        combined_bw_ctrl: bool,
        qos_type: Option<QosType>,
        bandwidths: Bandwidths,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            cluster_op,
            enable_qos,
            enable_bw_ctrl,
            combined_bw_ctrl,
            qos_type,
            bandwidths: bandwidths.validated()?,
        })
    }

    pub fn bandwidths(&self) -> &Bandwidths {
        &self.bandwidths
    }

    /// Replaces all six limits at once; nothing changes if any is out of range.
    pub fn update_bandwidths(&mut self, bandwidths: Bandwidths) -> Result<(), ValidationError> {
        self.bandwidths = bandwidths.validated()?;
        Ok(())
    }

    pub fn block_name(&self) -> &'static str {
        if self.cluster_op {
            CLUSTER_QOS_BLOCK
        } else {
            EXPORT_QOS_BLOCK
        }
    }

    pub fn from_qos_block(block: &RawBlock, cluster_op: bool) -> Result<Self, ValidationError> {
        let qos_type = if cluster_op {
            match block.get(QOS_TYPE) {
                None => None,
                Some(Value::Int(id)) => Some(QosType::from_block_id(*id)?),
                Some(Value::Str(name)) => Some(name.parse()?),
                Some(other) => {
                    return Err(ValidationError::invalid(format!(
                        "qos_type {other} is invalid"
                    )))
                }
            }
        } else {
            None
        };
        let qos = Self::new(
            cluster_op,
            block_bool(block, ENABLE_QOS)?.unwrap_or(false),
            block_bool(block, ENABLE_BW_CTRL)?.unwrap_or(false),
            block_bool(block, COMBINED_BW_CTRL)?.unwrap_or(false),
            qos_type,
            Bandwidths::from_block(block)?,
        )?;
        log::debug!("read {} block: {qos:?}", block.block_name);
        Ok(qos)
    }

    /// Configuration form: the QoS type as its number, bandwidths as bytes.
    pub fn to_qos_block(&self) -> RawBlock {
        let mut block = RawBlock::new(self.block_name())
            .with_value(ENABLE_QOS, self.enable_qos)
            .with_value(ENABLE_BW_CTRL, self.enable_bw_ctrl)
            .with_value(COMBINED_BW_CTRL, self.combined_bw_ctrl);
        if self.cluster_op {
            if let Some(qos_type) = self.qos_type {
                block = block.with_value(QOS_TYPE, qos_type.block_id());
            }
        }
        for (field, bytes) in self.bandwidths.set_fields() {
            block = block.with_value(field.param_name(), bytes);
        }
        block
    }

    pub fn from_dict(value: &Json, cluster_op: bool) -> Result<Self, ValidationError> {
        let dict = as_dict(value, "qos_block")?;
        let qos_type = if cluster_op {
            dict_str(dict, QOS_TYPE)?
                .map(|s| s.parse::<QosType>())
                .transpose()?
        } else {
            None
        };
        Self::new(
            cluster_op,
            dict_bool(dict, ENABLE_QOS)?.unwrap_or(false),
            dict_bool(dict, ENABLE_BW_CTRL)?.unwrap_or(false),
            dict_bool(dict, COMBINED_BW_CTRL)?.unwrap_or(false),
            qos_type,
            Bandwidths::from_dict(dict)?,
        )
    }

    /// API form: the QoS type by name, bandwidths human readable.
    pub fn to_dict(&self) -> Json {
        let mut dict = Dict::new();
        dict.insert(ENABLE_QOS.to_string(), json!(self.enable_qos));
        dict.insert(ENABLE_BW_CTRL.to_string(), json!(self.enable_bw_ctrl));
        dict.insert(COMBINED_BW_CTRL.to_string(), json!(self.combined_bw_ctrl));
        if self.cluster_op {
            if let Some(qos_type) = self.qos_type {
                dict.insert(QOS_TYPE.to_string(), json!(qos_type.as_str()));
            }
        }
        for (field, bytes) in self.bandwidths.set_fields() {
            dict.insert(field.param_name().to_string(), json!(bytes_to_human(u64::from(bytes))));
        }
        Json::Object(dict)
    }
}

/// Checks that export level bandwidth control may be enabled under the
/// cluster's QoS defaults, and that the limits fit the cluster's QoS type.
pub fn check_export_qos(
    cluster_qos: Option<&Qos>,
    combined_bw_ctrl: bool,
    bandwidths: &Bandwidths,
) -> Result<(), ValidationError> {
    let Some(cluster_qos) = cluster_qos.filter(|q| q.enable_qos) else {
        return Err(ValidationError::invalid(
            "To configure bandwidth control for export, you must first enable bandwidth control at the cluster level.",
        ));
    };
    match cluster_qos.qos_type {
        Some(QosType::PerClient) => Err(ValidationError::invalid(
            "Export-level QoS bandwidth control cannot be enabled if the QoS type at the cluster level is set to PerClient.",
        )),
        Some(qos_type) => qos_bandwidth_checks(qos_type, combined_bw_ctrl, bandwidths),
        None => Ok(()),
    }
}

/// Validates the `qos_block` of an export request before it is applied.
pub fn check_export_qos_request(
    request: &Json,
    cluster_qos: Option<&Qos>,
) -> Result<(), ValidationError> {
    let dict = as_dict(request, "qos_block")?;
    let (Some(enable_qos), Some(enable_bw_ctrl)) =
        (dict_bool(dict, ENABLE_QOS)?, dict_bool(dict, ENABLE_BW_CTRL)?)
    else {
        return Err(ValidationError::invalid(
            "The QOS block requires at least the enable_qos and enable_bw_control parameters",
        ));
    };
    let combined_bw_ctrl = dict_bool(dict, COMBINED_BW_CTRL)?.unwrap_or(false);

    let mut has_bandwidths = false;
    for key in dict.keys() {
        if matches!(key.as_str(), ENABLE_QOS | ENABLE_BW_CTRL | COMBINED_BW_CTRL) {
            continue;
        }
        if BandwidthField::from_param_name(key).is_none() {
            return Err(ValidationError::invalid(format!("Unknown QOS parameter {key}")));
        }
        has_bandwidths = true;
    }

    if enable_qos ^ enable_bw_ctrl {
        return Err(ValidationError::invalid(
            "Invalid values for the qos_enable, enable_bw_ctrl and combined_bw_ctrl parameters.",
        ));
    }
    if !enable_qos && has_bandwidths {
        return Err(ValidationError::invalid(
            "Bandwidths should not be passed when qos_enable is false.",
        ));
    }
    if enable_qos && !has_bandwidths {
        return Err(ValidationError::invalid(
            "Bandwidths should be set when qos_enable is true.",
        ));
    }
    check_export_qos(cluster_qos, combined_bw_ctrl, &Bandwidths::from_dict(dict)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB10: u32 = 10 * 1024 * 1024;

    #[test]
    fn test_validate_qos_bw_bounds() {
        assert!(validate_qos_bw("500KB").is_err());
        assert_eq!(validate_qos_bw("0").unwrap(), 0);
        assert_eq!(validate_qos_bw("10MB").unwrap(), u64::from(MB10));
        assert!(validate_qos_bw("5GB").is_err());
        assert_eq!(validate_qos_bw("1000000").unwrap(), MIN_QOS_BW);
        assert_eq!(validate_qos_bw("2000000000").unwrap(), MAX_QOS_BW);
        assert!(validate_qos_bw("999999").is_err());
    }

    #[test]
    fn test_range_error_message() {
        let err = validate_qos_bw("5GB").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid bandwidth value. Provided bandwidth value is not in range, Please enter a value between 1000000 and 2000000000 bytes"
        );
    }

    #[test]
    fn test_per_share_requirements() {
        let ok = Bandwidths::from_human(["10MB", "10MB", "0", "0", "0", "0"]).unwrap();
        assert!(qos_bandwidth_checks(QosType::PerShare, false, &ok).is_ok());

        let extra = Bandwidths::from_human(["10MB", "10MB", "10MB", "0", "0", "0"]).unwrap();
        let err = qos_bandwidth_checks(QosType::PerShare, false, &extra).unwrap_err();
        assert_eq!(
            err,
            ValidationError::QosRequirement {
                qos_type: "PerShare".into(),
                combined: false,
                required: vec!["max_export_write_bw".into(), "max_export_read_bw".into()],
            }
        );
        assert!(err
            .to_string()
            .contains("only the following parameters are required: max_export_write_bw,max_export_read_bw"));
    }

    #[test]
    fn test_missing_required_bandwidth() {
        let partial = Bandwidths::from_human(["10MB", "0", "0", "0", "0", "0"]).unwrap();
        assert!(qos_bandwidth_checks(QosType::PerShare, false, &partial).is_err());
    }

    #[test]
    fn test_combined_requirements() {
        let bw = Bandwidths {
            export_rw_bw: MB10,
            client_rw_bw: MB10,
            ..Default::default()
        };
        assert!(qos_bandwidth_checks(QosType::PerSharePerClient, true, &bw).is_ok());
        assert!(qos_bandwidth_checks(QosType::PerShare, true, &bw).is_err());
        assert!(qos_bandwidth_checks(QosType::PerSharePerClient, false, &bw).is_err());
    }

    #[test]
    fn test_cluster_block_round_trip() {
        let qos = Qos::new(
            true,
            true,
            true,
            false,
            Some(QosType::PerSharePerClient),
            Bandwidths::from_human(["10MB", "20MB", "2MB", "4MB", "0", "0"]).unwrap(),
        )
        .unwrap();
        let block = qos.to_qos_block();
        assert_eq!(block.block_name, CLUSTER_QOS_BLOCK);
        assert_eq!(block.get(QOS_TYPE), Some(&Value::Int(3)));
        assert_eq!(block.get("max_export_write_bw"), Some(&Value::Int(i64::from(MB10))));
        assert_eq!(block.get("max_export_combined_bw"), None);
        assert_eq!(Qos::from_qos_block(&block, true).unwrap(), qos);
    }

    #[test]
    fn test_export_scope_drops_type() {
        let block = RawBlock::new(EXPORT_QOS_BLOCK)
            .with_value(ENABLE_QOS, true)
            .with_value(QOS_TYPE, 1i64);
        let qos = Qos::from_qos_block(&block, false).unwrap();
        assert_eq!(qos.qos_type, None);
        assert_eq!(qos.to_qos_block().get(QOS_TYPE), None);
        assert_eq!(qos.to_dict().get(QOS_TYPE), None);
    }

    #[test]
    fn test_dict_round_trip() {
        let dict = json!({
            "enable_qos": true,
            "enable_bw_control": true,
            "combined_rw_bw_control": false,
            "qos_type": "PerShare",
            "max_export_write_bw": "10MB",
            "max_export_read_bw": "1.5GB"
        });
        let qos = Qos::from_dict(&dict, true).unwrap();
        assert_eq!(qos.bandwidths().export_readbw, 1_610_612_736);
        let out = qos.to_dict();
        assert_eq!(out["max_export_read_bw"], json!("1536MB"));
        assert_eq!(Qos::from_dict(&out, true).unwrap(), qos);
    }

    #[test]
    fn test_out_of_range_rejected_at_construction() {
        let dict = json!({"enable_qos": true, "max_client_read_bw": "100KB"});
        assert!(Qos::from_dict(&dict, false).is_err());
        let block = RawBlock::new(EXPORT_QOS_BLOCK).with_value("max_export_read_bw", 5i64);
        assert!(Qos::from_qos_block(&block, false).is_err());
    }

    #[test]
    fn test_update_bandwidths() {
        let mut qos = Qos::default();
        let bw = Bandwidths {
            export_writebw: MB10,
            ..Default::default()
        };
        qos.update_bandwidths(bw).unwrap();
        assert_eq!(qos.bandwidths().export_writebw, MB10);

        let bad = Bandwidths {
            client_readbw: 10,
            ..Default::default()
        };
        assert!(qos.update_bandwidths(bad).is_err());
        assert_eq!(qos.bandwidths().export_writebw, MB10);
    }

    fn cluster(qos_type: Option<QosType>, enable_qos: bool) -> Qos {
        Qos::new(true, enable_qos, enable_qos, false, qos_type, Bandwidths::default()).unwrap()
    }

    #[test]
    fn test_check_export_qos() {
        let bw = Bandwidths::from_human(["10MB", "10MB", "0", "0", "0", "0"]).unwrap();
        assert!(check_export_qos(None, false, &bw).is_err());
        assert!(check_export_qos(Some(&cluster(None, false)), false, &bw).is_err());
        assert!(check_export_qos(Some(&cluster(Some(QosType::PerClient), true)), false, &bw).is_err());
        assert!(check_export_qos(Some(&cluster(Some(QosType::PerShare), true)), false, &bw).is_ok());
        assert!(check_export_qos(Some(&cluster(None, true)), false, &bw).is_ok());
    }

    #[test]
    fn test_check_export_qos_request() {
        let cluster_qos = cluster(Some(QosType::PerShare), true);
        let ok = json!({
            "enable_qos": true,
            "enable_bw_control": true,
            "max_export_write_bw": "10MB",
            "max_export_read_bw": "10MB"
        });
        assert!(check_export_qos_request(&ok, Some(&cluster_qos)).is_ok());

        let missing = json!({"enable_qos": true});
        assert!(check_export_qos_request(&missing, Some(&cluster_qos)).is_err());

        let xor = json!({"enable_qos": true, "enable_bw_control": false, "max_export_write_bw": "10MB"});
        assert!(check_export_qos_request(&xor, Some(&cluster_qos)).is_err());

        let disabled_with_bw =
            json!({"enable_qos": false, "enable_bw_control": false, "max_export_write_bw": "10MB"});
        assert!(check_export_qos_request(&disabled_with_bw, Some(&cluster_qos)).is_err());

        let enabled_without_bw = json!({"enable_qos": true, "enable_bw_control": true});
        assert!(check_export_qos_request(&enabled_without_bw, Some(&cluster_qos)).is_err());

        let unknown = json!({"enable_qos": true, "enable_bw_control": true, "max_bw": "10MB"});
        assert!(check_export_qos_request(&unknown, Some(&cluster_qos)).is_err());
    }
}
