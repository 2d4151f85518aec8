//! Unit tests for JSON document loading and Foggfile parsing

use fogg::config::Foggfile;
use fogg::config::json::{load_json, to_property_map};
use fogg::error::FoggError;
use fogg::system::MockSystem;
use serde_json::json;
use std::path::Path;

#[test]
fn test_load_valid_json() {
    let system = MockSystem::new()
        .with_file("/deploy/config.json", br#"{"VMs": []}"#)
        .unwrap();

    let value = load_json(&system, Path::new("/deploy/config.json")).unwrap();
    assert_eq!(value, json!({"VMs": []}));
}

#[test]
fn test_load_invalid_json_is_parse_error() {
    let system = MockSystem::new()
        .with_file("/deploy/config.json", b"{ not json")
        .unwrap();

    let err = load_json(&system, Path::new("/deploy/config.json")).unwrap_err();
    let fogg_err = err.downcast_ref::<FoggError>().unwrap();
    assert!(matches!(fogg_err, FoggError::Parse { .. }));
    assert!(err.to_string().contains("/deploy/config.json"));
}

#[test]
fn test_load_missing_file_is_parse_error() {
    let system = MockSystem::new();

    let err = load_json(&system, Path::new("/nope.json")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FoggError>(),
        Some(FoggError::Parse { .. })
    ));
}

#[test]
fn test_property_map_keeps_keys_and_renders_values() {
    let value = json!({"web": "10.0.1.0/24", "db": "10.0.2.0/24", "count": 3});
    let map = to_property_map(Some(&value));

    assert_eq!(map.len(), 3);
    assert_eq!(map["web"], "10.0.1.0/24");
    assert_eq!(map["db"], "10.0.2.0/24");
    assert_eq!(map["count"], "3");
}

#[test]
fn test_property_map_of_nothing_is_empty() {
    assert!(to_property_map(None).is_empty());
    assert!(to_property_map(Some(&json!(null))).is_empty());
    assert!(to_property_map(Some(&json!("web"))).is_empty());
}

#[test]
fn test_load_foggfile() {
    let system = MockSystem::new()
        .with_file(
            "/deploy/Foggfile",
            br#"{
                "ResourceGroupName": "Shop-RG",
                "Location": "westeurope",
                "VNetAddress": "10.0.0.0/16",
                "ConfigPath": "./configs/dev.json",
                "SubnetAddresses": { "web": "10.0.1.0/24" }
            }"#,
        )
        .unwrap();

    let foggfile = Foggfile::load(&system, Path::new("/deploy/Foggfile")).unwrap();
    assert_eq!(foggfile.resource_group_name.as_deref(), Some("Shop-RG"));
    assert_eq!(foggfile.location.as_deref(), Some("westeurope"));
    assert_eq!(foggfile.vnet_address.as_deref(), Some("10.0.0.0/16"));
    assert_eq!(foggfile.config_path.as_deref(), Some("./configs/dev.json"));
    assert!(foggfile.subscription_name.is_none());
    assert_eq!(foggfile.subnet_map()["web"], "10.0.1.0/24");
}

#[test]
fn test_foggfile_schema_rejects_wrong_types() {
    let system = MockSystem::new()
        .with_file(
            "/deploy/Foggfile",
            br#"{ "ResourceGroupName": 42, "SubnetAddresses": { "web": 1 } }"#,
        )
        .unwrap();

    let err = Foggfile::load(&system, Path::new("/deploy/Foggfile")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FoggError>(),
        Some(FoggError::Parse { .. })
    ));
    assert!(err.to_string().contains("does not match the expected structure"));
}

#[test]
fn test_foggfile_must_be_an_object() {
    let system = MockSystem::new()
        .with_file("/deploy/Foggfile", b"[1, 2, 3]")
        .unwrap();

    assert!(Foggfile::load(&system, Path::new("/deploy/Foggfile")).is_err());
}
