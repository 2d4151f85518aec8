//! Unit tests for the section validators

use fogg::config::environment::{OsSection, VmSection};
use fogg::config::validation::{
    SUBSCRIPTION_PROMPT, validate_dsc_paths, validate_os, validate_parameters, validate_vms,
};
use fogg::config::Deployment;
use fogg::error::FoggError;
use fogg::system::{MockSystem, System};
use serde_json::json;
use std::io;
use std::path::{Path, PathBuf};

fn deployment() -> Deployment {
    let mut deployment = Deployment::default();
    deployment.resource_group_name = "shop-rg".to_string();
    deployment.short_resource_group_name = "shop".to_string();
    deployment.location = "westus".to_string();
    deployment.subscription_name = "Production".to_string();
    deployment.vnet_address = Some("10.0.0.0/16".to_string());
    deployment
        .subnet_addresses
        .insert("web".to_string(), "10.0.1.0/24".to_string());
    deployment.config_path = PathBuf::from("/deploy/config.json");
    deployment.config_parent = PathBuf::from("/deploy");
    deployment
}

fn os() -> OsSection {
    OsSection {
        size: Some("Standard_DS1_v2".to_string()),
        publisher: Some("Canonical".to_string()),
        offer: Some("UbuntuServer".to_string()),
        sku: Some("18.04-LTS".to_string()),
        os_type: Some("Linux".to_string()),
    }
}

fn vm(count: i64, off: Option<i64>, port: Option<&str>) -> VmSection {
    VmSection {
        tag: Some("web".to_string()),
        count: Some(json!(count)),
        off: off.map(|o| json!(o)),
        port: port.map(|p| json!(p)),
        ..VmSection::default()
    }
}

fn error_of<T: std::fmt::Debug>(result: anyhow::Result<T>) -> FoggError {
    let err = result.unwrap_err();
    match err.downcast::<FoggError>() {
        Ok(fogg_err) => fogg_err,
        Err(other) => panic!("expected a FoggError, got: {other}"),
    }
}

// ==================== VM sections ====================

#[test]
fn test_valid_load_balanced_vm() {
    let vms = vec![vm(2, Some(1), Some("80"))];
    assert_eq!(validate_vms(&vms, &deployment(), Some(&os())).unwrap(), 1);
}

#[test]
fn test_returns_number_of_sections() {
    let mut deployment = deployment();
    deployment
        .subnet_addresses
        .insert("db".to_string(), "10.0.2.0/24".to_string());

    let mut db = vm(1, None, None);
    db.tag = Some("db".to_string());
    let vms = vec![vm(1, None, None), db];

    assert_eq!(validate_vms(&vms, &deployment, Some(&os())).unwrap(), 2);
}

#[test]
fn test_no_vms() {
    let err = error_of(validate_vms(&[], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::MissingField { .. }));
}

#[test]
fn test_missing_tag() {
    let mut section = vm(1, None, None);
    section.tag = Some("  ".to_string());

    let err = error_of(validate_vms(&[section], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::MissingField { .. }));
}

#[test]
fn test_tag_without_subnet() {
    let mut section = vm(1, None, None);
    section.tag = Some("cache".to_string());

    let err = error_of(validate_vms(&[section], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::ReferentialIntegrity { .. }));
    assert!(err.to_string().contains("cache"));
}

#[test]
fn test_missing_count() {
    let mut section = vm(1, None, None);
    section.count = None;

    let err = error_of(validate_vms(&[section], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::MissingField { .. }));
}

#[test]
fn test_count_must_be_positive() {
    for count in [0, -1] {
        let err = error_of(validate_vms(&[vm(count, None, None)], &deployment(), Some(&os())));
        assert!(matches!(err, FoggError::Range { .. }), "count {count}");
    }
}

#[test]
fn test_off_count_bounds() {
    for off in [0, -2, 3] {
        let err = error_of(validate_vms(
            &[vm(2, Some(off), Some("80"))],
            &deployment(),
            Some(&os()),
        ));
        assert!(matches!(err, FoggError::Range { .. }), "off {off}");
    }

    for off in [1, 2] {
        assert!(
            validate_vms(&[vm(2, Some(off), Some("80"))], &deployment(), Some(&os())).is_ok(),
            "off {off}"
        );
    }
}

#[test]
fn test_port_required_when_load_balanced() {
    let err = error_of(validate_vms(&[vm(2, None, None)], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::MissingField { .. }));
    assert!(err.to_string().contains("port"));

    assert!(validate_vms(&[vm(1, None, None)], &deployment(), Some(&os())).is_ok());
    assert!(validate_vms(&[vm(2, None, Some("443"))], &deployment(), Some(&os())).is_ok());
}

#[test]
fn test_numeric_port_is_present() {
    let mut section = vm(3, None, None);
    section.port = Some(json!(8080));

    assert!(validate_vms(&[section], &deployment(), Some(&os())).is_ok());
}

#[test]
fn test_os_required_without_global_os() {
    let err = error_of(validate_vms(&[vm(1, None, None)], &deployment(), None));
    assert!(matches!(err, FoggError::MissingField { .. }));

    let mut section = vm(1, None, None);
    section.os = Some(json!({"size": "Standard_A1"}));
    assert!(validate_vms(&[section], &deployment(), None).is_ok());
}

#[test]
fn test_count_must_be_whole_number() {
    for count in [json!("2"), json!(1.5), json!(true)] {
        let mut section = vm(1, None, None);
        section.count = Some(count.clone());

        let err = error_of(validate_vms(&[section], &deployment(), Some(&os())));
        assert!(matches!(err, FoggError::Range { .. }), "count {count}");
        assert!(err.to_string().contains("web"), "count {count}");
    }
}

#[test]
fn test_null_count_is_missing() {
    let mut section = vm(1, None, None);
    section.count = Some(json!(null));

    let err = error_of(validate_vms(&[section], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::MissingField { .. }));
}

#[test]
fn test_off_count_must_be_whole_number() {
    let mut section = vm(2, None, Some("80"));
    section.off = Some(json!("1"));

    let err = error_of(validate_vms(&[section], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::Range { .. }));
    assert!(err.to_string().contains("off-count"));
}

#[test]
fn test_os_must_be_an_object() {
    let mut section = vm(1, None, None);
    section.os = Some(json!("windows"));

    let err = error_of(validate_vms(&[section.clone()], &deployment(), Some(&os())));
    assert!(matches!(err, FoggError::InvalidEnum { .. }));
    assert!(err.to_string().contains("web"));

    let err = error_of(validate_vms(&[section], &deployment(), None));
    assert!(matches!(err, FoggError::InvalidEnum { .. }));
}

#[test]
fn test_first_violation_wins() {
    // Unknown tag is reported before the bad count
    let section = VmSection {
        tag: Some("cache".to_string()),
        count: Some(json!(0)),
        ..VmSection::default()
    };

    let err = error_of(validate_vms(&[section], &deployment(), None));
    assert!(matches!(err, FoggError::ReferentialIntegrity { .. }));
}

// ==================== OS sections ====================

#[test]
fn test_absent_os_is_accepted() {
    assert!(validate_os("web", None).is_ok());
}

#[test]
fn test_valid_os_types() {
    for os_type in ["windows", "Windows", "LINUX"] {
        let mut section = os();
        section.os_type = Some(os_type.to_string());
        assert!(validate_os("web", Some(&section)).is_ok(), "{os_type}");
    }
}

#[test]
fn test_invalid_os_type() {
    let mut section = os();
    section.os_type = Some("Mac".to_string());

    let err = error_of(validate_os("web", Some(&section)));
    assert!(matches!(err, FoggError::InvalidEnum { .. }));
    assert!(err.to_string().contains("Mac"));
}

#[test]
fn test_each_os_field_is_required() {
    let fields = ["size", "publisher", "offer", "sku", "type"];

    for field in fields {
        let mut section = os();
        match field {
            "size" => section.size = None,
            "publisher" => section.publisher = Some(String::new()),
            "offer" => section.offer = None,
            "sku" => section.sku = Some(" ".to_string()),
            _ => section.os_type = None,
        }

        let err = error_of(validate_os("web", Some(&section)));
        assert!(matches!(err, FoggError::MissingField { .. }), "{field}");
        assert!(err.to_string().contains(field), "{field}");
    }
}

// ==================== DSC paths ====================

#[test]
fn test_no_dsc_paths() {
    let system = MockSystem::new();
    let mut deployment = deployment();
    deployment.has_dsc_scripts = true;

    validate_dsc_paths(&system, &mut deployment, None).unwrap();
    assert!(!deployment.has_dsc_scripts);

    validate_dsc_paths(&system, &mut deployment, Some(&json!({}))).unwrap();
    assert!(!deployment.has_dsc_scripts);
    assert!(deployment.dsc_scripts.is_empty());
}

#[test]
fn test_dsc_paths_become_absolute() {
    let system = MockSystem::new()
        .with_file("/deploy/dsc/web.ps1", b"Configuration Web {}")
        .unwrap()
        .with_file("/shared/db.ps1", b"Configuration Db {}")
        .unwrap();
    let mut deployment = deployment();
    let paths = json!({"web": "./dsc/web.ps1", "db": "../shared/db.ps1"});

    validate_dsc_paths(&system, &mut deployment, Some(&paths)).unwrap();

    assert!(deployment.has_dsc_scripts);
    assert_eq!(
        deployment.dsc_scripts["web"],
        Path::new("/deploy/dsc/web.ps1")
    );
    assert_eq!(deployment.dsc_scripts["db"], Path::new("/shared/db.ps1"));
}

#[test]
fn test_missing_dsc_script() {
    let system = MockSystem::new();
    let mut deployment = deployment();
    let paths = json!({"web": "./dsc/missing.ps1"});

    let err = error_of(validate_dsc_paths(&system, &mut deployment, Some(&paths)));
    assert!(matches!(err, FoggError::PathNotFound { .. }));
    assert!(err.to_string().contains("./dsc/missing.ps1"));
}

#[test]
fn test_dsc_path_to_directory() {
    let system = MockSystem::new().with_dir("/deploy/dsc").unwrap();
    let mut deployment = deployment();
    let paths = json!({"web": "./dsc"});

    let err = error_of(validate_dsc_paths(&system, &mut deployment, Some(&paths)));
    assert!(matches!(err, FoggError::PathNotFound { .. }));
}

/// Filesystem whose every lookup fails
struct UnreadableDisk;

impl System for UnreadableDisk {
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(PathBuf::from("/deploy"))
    }

    fn read_to_string(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn is_file(&self, _path: &Path) -> io::Result<bool> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn prompt(&self, _label: &str) -> io::Result<String> {
        Err(io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

#[test]
fn test_dsc_lookup_failure_is_not_path_not_found() {
    let mut deployment = deployment();
    let paths = json!({"web": "./dsc/web.ps1"});

    let err = validate_dsc_paths(&UnreadableDisk, &mut deployment, Some(&paths)).unwrap_err();
    assert!(err.downcast_ref::<FoggError>().is_none());
    assert!(err.downcast_ref::<io::Error>().is_some());
    assert!(format!("{err:#}").contains("Failed to check path"));
}

// ==================== Top-level parameters ====================

fn system_with_config() -> MockSystem {
    MockSystem::new()
        .with_file("/deploy/config.json", b"{}")
        .unwrap()
}

#[test]
fn test_valid_parameters() {
    let system = system_with_config();
    let mut deployment = deployment();

    validate_parameters(&system, &mut deployment).unwrap();
    assert!(system.prompts_asked().unwrap().is_empty());
}

#[test]
fn test_missing_resource_group_name() {
    let mut deployment = deployment();
    deployment.resource_group_name = String::new();

    let err = error_of(validate_parameters(&system_with_config(), &mut deployment));
    assert!(matches!(err, FoggError::MissingField { .. }));
    assert!(err.to_string().contains("resource group"));
}

#[test]
fn test_missing_location() {
    let mut deployment = deployment();
    deployment.location = " ".to_string();

    let err = error_of(validate_parameters(&system_with_config(), &mut deployment));
    assert!(err.to_string().contains("location"));
}

#[test]
fn test_vnet_address_not_needed_for_existing_vnet() {
    let mut deployment = deployment();
    deployment.vnet_address = None;

    let err = error_of(validate_parameters(&system_with_config(), &mut deployment));
    assert!(matches!(err, FoggError::MissingField { .. }));

    deployment.vnet_resource_group_name = Some("network-rg".to_string());
    deployment.vnet_name = Some("core-vnet".to_string());
    deployment.use_existing_vnet = true;
    assert!(validate_parameters(&system_with_config(), &mut deployment).is_ok());
}

#[test]
fn test_missing_subnets() {
    let mut deployment = deployment();
    deployment.subnet_addresses.clear();

    let err = error_of(validate_parameters(&system_with_config(), &mut deployment));
    assert!(err.to_string().contains("subnet"));
}

#[test]
fn test_config_path_must_exist() {
    let mut deployment = deployment();

    let err = error_of(validate_parameters(&MockSystem::new(), &mut deployment));
    assert!(matches!(err, FoggError::PathNotFound { .. }));

    deployment.config_path = PathBuf::new();
    let err = error_of(validate_parameters(&MockSystem::new(), &mut deployment));
    assert!(matches!(err, FoggError::MissingField { .. }));
}

#[test]
fn test_subscription_name_is_prompted() {
    let system = system_with_config()
        .with_prompt_response("  Dev Subscription ")
        .unwrap();
    let mut deployment = deployment();
    deployment.subscription_name = String::new();

    validate_parameters(&system, &mut deployment).unwrap();

    assert_eq!(deployment.subscription_name, "Dev Subscription");
    assert_eq!(system.prompts_asked().unwrap(), vec![SUBSCRIPTION_PROMPT]);
}

#[test]
fn test_blank_prompt_answer() {
    let system = system_with_config().with_prompt_response("").unwrap();
    let mut deployment = deployment();
    deployment.subscription_name = String::new();

    let err = error_of(validate_parameters(&system, &mut deployment));
    assert!(matches!(err, FoggError::MissingField { .. }));
}
