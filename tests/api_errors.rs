// API error path tests
// These test error handling, conversions, and edge cases in the API layer

use ganesha_conf::export::Export;
use ganesha_conf::qos::{check_export_qos_request, Bandwidths, Qos, QosType};
use ganesha_conf::{parse_config, parse_export, GaneshaError, ValidationError};
use miette::Diagnostic;
use serde_json::json;

fn request() -> serde_json::Value {
    json!({
        "export_id": 1,
        "cluster_id": "c1",
        "pseudo": "/p",
        "fsal": {"name": "CEPH", "fs_name": "a"}
    })
}

#[test]
fn test_api_parse_error() {
    let result = parse_config("EXPORT { invalid syntax", "test.conf", "c1");
    assert!(matches!(result, Err(GaneshaError::Parser(_))));
}

#[test]
fn test_api_validation_error() {
    let result = parse_export("EXPORT { export_id = 1; path = \"/\"; }", "c1");
    assert!(matches!(
        result,
        Err(GaneshaError::Validation(ValidationError::MissingField { .. }))
    ));
}

#[test]
fn test_api_errors_are_diagnostics() {
    let err = parse_config("EXPORT { a }", "test.conf", "c1").unwrap_err();
    assert!(err.code().is_some());
    let err = parse_export("EXPORT { export_id = 1; }", "c1").unwrap_err();
    assert!(err.code().is_some());
}

#[test]
fn test_pseudo_validation() {
    let fs = |name: &str| name == "a";
    for pseudo in ["relative", "/"] {
        let mut dict = request();
        dict["pseudo"] = json!(pseudo);
        let export = Export::from_dict(&dict).unwrap();
        assert!(export.validate(&fs).is_err(), "{pseudo} should be rejected");
    }

    let mut dict = request();
    dict["pseudo"] = json!("/abs");
    dict["access_type"] = json!("RW");
    dict["squash"] = json!("root_squash");
    dict["protocols"] = json!([3, 4]);
    dict["transports"] = json!(["tcp"]);
    Export::from_dict(&dict).unwrap().validate(&fs).unwrap();
}

#[test]
fn test_fs_not_found() {
    let export = Export::from_dict(&request()).unwrap();
    let err = export.validate(&|_: &str| false).unwrap_err();
    assert_eq!(err.to_string(), "filesystem a not found");

    let mut dict = request();
    dict["fsal"] = json!({"name": "CEPH"});
    let err = Export::from_dict(&dict).unwrap().validate(&|_: &str| true).unwrap_err();
    assert_eq!(err, ValidationError::FsNotFound { fs_name: None });
}

#[test]
fn test_invalid_transport_and_protocol() {
    let mut dict = request();
    dict["transports"] = json!(["RDMA"]);
    let err = Export::from_dict(&dict).unwrap().validate(&|_: &str| true).unwrap_err();
    assert_eq!(err.to_string(), "RDMA is not a valid transport protocol");

    let mut dict = request();
    dict["protocols"] = json!([4, 5]);
    let err = Export::from_dict(&dict).unwrap().validate(&|_: &str| true).unwrap_err();
    assert_eq!(err.to_string(), "Invalid protocol 5");
}

#[test]
fn test_invalid_sectype_and_client_override() {
    let mut dict = request();
    dict["sectype"] = json!(["krb5", "kerberos"]);
    assert!(Export::from_dict(&dict).is_err());

    let mut dict = request();
    dict["clients"] = json!([{"addresses": ["h"], "access_type": "write"}]);
    let err = Export::from_dict(&dict).unwrap_err();
    assert!(err.to_string().starts_with("write is invalid, valid access type are"));
}

#[test]
fn test_qos_matrix_rejects_extra_bandwidth() {
    let cluster = Qos::new(true, true, true, false, Some(QosType::PerShare), Bandwidths::default()).unwrap();
    let request = json!({
        "enable_qos": true,
        "enable_bw_control": true,
        "max_export_write_bw": "10MB",
        "max_export_read_bw": "10MB",
        "max_client_write_bw": "10MB"
    });
    let err = check_export_qos_request(&request, Some(&cluster)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "When combined_rw_bw is disabled and qos_type is PerShare, only the following parameters are required: max_export_write_bw,max_export_read_bw."
    );
}

#[test]
fn test_qos_out_of_range() {
    let mut dict = request();
    dict["qos_block"] = json!({
        "enable_qos": true,
        "enable_bw_control": true,
        "max_export_write_bw": "5GB"
    });
    let err = Export::from_dict(&dict).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidBandwidth { .. }));
}
