/// Integration tests for resource identifiers through the public API

use opentox_client::{OpenToxType, OtClass, Vri};
use std::collections::HashSet;

#[test]
fn test_build_prediction_request_uri() {
    let mut vri = Vri::new("https://host:8443/model/12").unwrap();
    vri.add_url_parameter("dataset_uri", "http://host/dataset/1?max=5")
        .add_url_parameter("tokenid", "AQIC5wM2LY4S");

    assert_eq!(
        vri.to_string(),
        "https://host:8443/model/12?dataset_uri=http%3A%2F%2Fhost%2Fdataset%2F1%3Fmax%3D5&tokenid=AQIC5wM2LY4S"
    );
    assert_eq!(
        vri.url_parameter("dataset_uri").as_deref(),
        Some("http://host/dataset/1?max=5")
    );

    vri.clear_token();
    assert_eq!(vri.url_parameter("tokenid"), None);
    assert_eq!(vri.port(), Some(8443));
    assert_eq!(vri.opentox_type(), Some(OpenToxType::Model));
    assert_eq!(vri.ontological_class(), Some(OtClass::Model));
}

#[test]
fn test_reparsed_display_is_stable() {
    let original = Vri::new("http://host/dataset/1?feature_uris[]=a%20b&page=2").unwrap();
    let reparsed = Vri::new(&original.to_string()).unwrap();
    assert_eq!(original.to_string(), reparsed.to_string());
    assert_eq!(original.url_parameters(), reparsed.url_parameters());
}

#[test]
fn test_clone_is_independent() {
    let original = Vri::new("http://host/algorithm/mlr").unwrap();
    let mut copy = original.clone();
    copy.add_url_parameter("x", 1).augment(&["sub"]).unwrap();

    assert_eq!(original.to_string(), "http://host/algorithm/mlr");
    assert_eq!(copy.to_string(), "http://host/algorithm/mlr/sub?x=1");
}

#[test]
fn test_identity_ignores_query() {
    let mut uris = HashSet::new();
    uris.insert(Vri::new("http://host/dataset/1").unwrap());
    uris.insert(Vri::new("http://host/dataset/1?page=2").unwrap());
    uris.insert(Vri::new("http://host/dataset/2").unwrap());
    assert_eq!(uris.len(), 2);
}

#[test]
fn test_service_base_and_id() {
    let vri = Vri::new("http://host/ambit2/dataset/7/feature/3").unwrap();
    assert_eq!(vri.service_base_uri(), "http://host/ambit2");
    assert_eq!(vri.opentox_type(), Some(OpenToxType::Feature));
    assert_eq!(vri.id(), None);

    let vri: Vri = "host/ambit2/compound/7".parse().unwrap();
    assert_eq!(vri.protocol(), "http");
    assert_eq!(vri.opentox_type(), Some(OpenToxType::Compound));
}
