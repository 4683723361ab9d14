//! Component Integration Tests
//!
//! Runs whole workflows through the bridge facade against the fake engine
//! library: configuration setup, record loading, lookups, exports, and the
//! component lifecycle.

mod common;

use erbridge::{BridgeError, ConfigHandle, EntryShape};
use serde_json::Value;

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("response is JSON")
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_initialize_and_destroy_all() {
    common::reset();
    let bridge = common::fake_bridge();
    bridge.initialize_all().unwrap();

    assert!(bridge.engine().stats().unwrap().is_success());

    bridge.destroy_all().unwrap();
    assert!(bridge.engine().is_destroyed());
    assert!(bridge.product().is_destroyed());

    let err = bridge.engine().stats().unwrap_err();
    assert_eq!(err.to_string(), "engine.stats called after destroy");

    // Destroying again skips components that are already down
    bridge.destroy_all().unwrap();

    // And a fresh initialization brings everything back
    bridge.initialize_all().unwrap();
    assert!(!bridge.engine().is_destroyed());
    assert!(bridge.engine().stats().unwrap().is_success());
}

#[test]
fn test_initialize_with_invalid_settings_reports_native_error() {
    common::reset();
    let mut config = erbridge::BridgeConfig::default();
    config.engine.settings = "not json".to_string();
    let bridge = erbridge::Bridge::from_library(
        std::sync::Arc::new(common::fake_library()),
        erbridge::Resizer::system(),
        config,
    );

    let err = bridge.initialize_all().unwrap_err();
    match err {
        BridgeError::Native {
            component,
            exception_code,
            message,
            ..
        } => {
            assert_eq!(component, "product");
            assert_eq!(exception_code, 42);
            assert_eq!(message, "0042E|Invalid ini parameters");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_probe_reports_fake_coverage() {
    let bridge = common::fake_bridge();
    let report = bridge.probe();
    assert!(!report.is_complete());
    assert_eq!(report.total(), erbridge::entry_points().len());

    let resolved: Vec<&str> = report.resolved.iter().map(|e| e.symbol).collect();
    assert!(resolved.contains(&"G2_stats"));
    assert!(resolved.contains(&"G2Config_create"));
    assert!(resolved.contains(&"G2Product_version"));

    assert!(report
        .missing
        .iter()
        .any(|e| e.symbol == "G2_whyEntities" && e.shape == EntryShape::Growable));
}

// ============================================================================
// Configuration workflow
// ============================================================================

#[test]
fn test_register_data_source_and_make_default() {
    common::reset();
    let bridge = common::fake_bridge();
    bridge.initialize_all().unwrap();

    let config = bridge.configuration();
    let handle = config.check("create", config.create().unwrap()).unwrap();
    assert_ne!(handle, ConfigHandle::from_raw(0));

    let added = config
        .check(
            "add_data_source",
            config
                .add_data_source(handle, r#"{"DSRC_CODE":"CUSTOMERS"}"#)
                .unwrap(),
        )
        .unwrap();
    assert_eq!(parse(&added.to_string_lossy())["DSRC_ID"], 3);

    let document = config.check("save", config.save(handle).unwrap()).unwrap();
    config.core().check_status("close", config.close(handle).unwrap()).unwrap();

    let manager = bridge.config_manager();
    let config_id = manager
        .check(
            "add_config",
            manager
                .add_config(&document.to_string_lossy(), "integration test")
                .unwrap(),
        )
        .unwrap();
    manager
        .core()
        .check_status("set_default_config_id", manager.set_default_config_id(config_id).unwrap())
        .unwrap();

    let default_id = manager.get_default_config_id().unwrap().into_result().unwrap();
    assert_eq!(default_id, config_id);

    // Reload the stored document and list what it holds
    let stored = manager.check("get_config", manager.get_config(config_id).unwrap()).unwrap();
    let reloaded = config
        .check("load", config.load(&stored.to_string_lossy()).unwrap())
        .unwrap();
    let listed = config
        .check("list_data_sources", config.list_data_sources(reloaded).unwrap())
        .unwrap();
    let codes: Vec<String> = parse(&listed.to_string_lossy())["DATA_SOURCES"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["DSRC_CODE"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["TEST", "SEARCH", "CUSTOMERS"]);
    assert!(config.close(reloaded).unwrap().is_success());
}

#[test]
fn test_replace_default_config_id_is_compare_and_swap() {
    common::reset();
    let bridge = common::fake_bridge();
    let manager = bridge.config_manager();

    assert!(manager.set_default_config_id(10).unwrap().is_success());
    assert!(manager.replace_default_config_id(10, 11).unwrap().is_success());

    let stale = manager.replace_default_config_id(10, 12).unwrap();
    assert!(!stale.is_success());
    assert_eq!(manager.last_exception_code().unwrap(), 7245);
    assert_eq!(manager.get_default_config_id().unwrap().payload, 11);
}

#[test]
fn test_closed_config_handle_is_rejected_by_library() {
    common::reset();
    let bridge = common::fake_bridge();
    let config = bridge.configuration();
    let handle = config.create().unwrap().payload;
    assert!(config.close(handle).unwrap().is_success());

    // The bridge forwards stale handles untouched; the library decides
    let status = config.close(handle).unwrap();
    assert_eq!(status.code(), -2);
    assert_eq!(config.last_exception().unwrap(), "0048E|Invalid config handle");
}

// ============================================================================
// Records and entities
// ============================================================================

#[test]
fn test_add_record_then_look_it_up() {
    common::reset();
    let bridge = common::fake_bridge();
    let engine = bridge.engine();

    let info = engine
        .add_record_with_info("TEST", "1001", r#"{"NAME_FULL":"Robert Smith"}"#, "load-1", 0)
        .unwrap();
    let info = parse(&engine.check("add_record_with_info", info).unwrap().to_string_lossy());
    assert_eq!(info["AFFECTED_ENTITIES"][0]["ENTITY_ID"], 1);

    let entity = engine.get_entity_by_record_id("TEST", "1001").unwrap();
    let entity = parse(&engine.check("get_entity_by_record_id", entity).unwrap().to_string_lossy());
    assert_eq!(entity["RESOLVED_ENTITY"]["ENTITY_ID"], 1);

    let same = engine.get_entity_by_entity_id(1).unwrap();
    assert_eq!(
        parse(&same.payload.to_string_lossy()),
        entity,
        "lookup by entity ID returns the same entity"
    );

    let stats = parse(&engine.stats().unwrap().payload.to_string_lossy());
    assert_eq!(stats["workload"]["loadedRecords"], 1);
}

#[test]
fn test_unknown_record_surfaces_exception() {
    common::reset();
    let bridge = common::fake_bridge();
    let engine = bridge.engine();

    let result = engine.get_entity_by_record_id("TEST", "missing").unwrap();
    assert!(!result.is_success());

    let err = engine.check("get_entity_by_record_id", result).unwrap_err();
    assert_eq!(
        err.to_string(),
        "engine.get_entity_by_record_id failed with status -2 (exception 33): \
         0033E|Unknown record: dsrc[TEST], record[missing]"
    );
    // Reported once, then cleared
    assert_eq!(engine.last_exception_code().unwrap(), 0);
}

#[test]
fn test_unknown_data_source_rejected() {
    common::reset();
    let bridge = common::fake_bridge();
    let engine = bridge.engine();

    let status = engine.add_record("NOPE", "1", "{}", "load").unwrap();
    assert_eq!(status.code(), -2);
    assert_eq!(engine.last_exception().unwrap(), "0023E|Unknown DATA_SOURCE value 'NOPE'");
    assert_eq!(engine.last_exception_code().unwrap(), 23);
    engine.clear_last_exception().unwrap();
    assert_eq!(engine.last_exception().unwrap(), "");
}

#[test]
fn test_returned_record_id_fills_fixed_buffer() {
    common::reset();
    let bridge = common::fake_bridge();
    let engine = bridge.engine();

    let result = engine
        .add_record_with_returned_record_id("TEST", r#"{"NAME_FULL":"Jane Doe"}"#, "load")
        .unwrap();
    let record_id = engine.check("add_record_with_returned_record_id", result).unwrap();
    assert_eq!(record_id.capacity(), erbridge::RECORD_ID_CAPACITY);
    assert_eq!(record_id.len(), 40);
    assert_eq!(record_id.to_string_lossy(), format!("{:040X}", 1));

    let entity = engine.get_entity_by_record_id("TEST", &record_id.to_string_lossy()).unwrap();
    assert!(entity.is_success());
}

#[test]
fn test_export_config_with_id() {
    common::reset();
    let bridge = common::fake_bridge();
    bridge.config_manager().set_default_config_id(77).unwrap();

    let result = bridge.engine().export_config_and_config_id().unwrap();
    assert!(result.is_success());
    assert_eq!(result.payload.config_id, 77);
    let document = parse(&result.payload.config.to_string_lossy());
    assert_eq!(document["G2_CONFIG"]["CFG_DSRC"][1]["DSRC_CODE"], "SEARCH");

    let active = bridge.engine().get_active_config_id().unwrap();
    assert_eq!(active.into_result(), Ok(77));
}

// ============================================================================
// Exports and entity lists
// ============================================================================

#[test]
fn test_export_streams_every_entity_and_closes() {
    common::reset();
    let bridge = common::fake_bridge();
    let engine = bridge.engine();
    for rid in ["1", "2", "3"] {
        assert!(engine.add_record("TEST", rid, "{}", "load").unwrap().is_success());
    }

    let pages: Vec<String> = engine
        .export_json(0)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(pages.len(), 3);
    for (index, page) in pages.iter().enumerate() {
        assert!(page.ends_with('\n'));
        assert_eq!(parse(page)["RESOLVED_ENTITY"]["ENTITY_ID"], index as i64 + 1);
    }
    assert_eq!(common::closed_cursors(), 1);
}

#[test]
fn test_export_abandoned_early_still_closes() {
    common::reset();
    let bridge = common::fake_bridge();
    let engine = bridge.engine();
    for rid in ["a", "b"] {
        engine.add_record("SEARCH", rid, "{}", "load").unwrap();
    }

    let first = engine.export_json(0).unwrap().next();
    assert!(first.unwrap().is_ok());
    assert_eq!(common::closed_cursors(), 1);
}

#[test]
fn test_entity_list_by_size() {
    common::reset();
    let bridge = common::fake_bridge();
    bridge.engine().add_record("TEST", "x", "{}", "load").unwrap();
    bridge.engine().add_record("TEST", "y", "{}", "load").unwrap();

    let diagnostic = bridge.diagnostic();
    let handle = diagnostic
        .check("get_entity_list_by_size", diagnostic.get_entity_list_by_size(1).unwrap())
        .unwrap();

    let mut sizes = Vec::new();
    loop {
        let page = diagnostic.fetch_next_entity_by_size(handle).unwrap();
        assert!(!page.status.is_negative());
        if page.payload.is_empty() {
            break;
        }
        sizes.push(parse(&page.payload.to_string_lossy())["ENTITY_SIZE"].as_i64().unwrap());
    }
    assert_eq!(sizes, vec![1, 1]);
    assert!(diagnostic.close_entity_list_by_size(handle).unwrap().is_success());
}

// ============================================================================
// Scalar calls and product information
// ============================================================================

#[test]
fn test_host_information() {
    let bridge = common::fake_bridge();
    assert_eq!(bridge.diagnostic().get_logical_cores().unwrap(), 8);
    assert_eq!(bridge.diagnostic().get_total_system_memory().unwrap(), 17_179_869_184);
    assert_eq!(bridge.engine().count_redo_records().unwrap(), 0);
}

#[test]
fn test_product_strings_are_copied() {
    let bridge = common::fake_bridge();
    let version = parse(&bridge.product().version().unwrap());
    assert_eq!(version["VERSION"], "3.8.0");
    let license = parse(&bridge.product().license().unwrap());
    assert_eq!(license["licenseType"], "EVAL");
}

#[test]
fn test_missing_entry_point_is_local_error() {
    let bridge = common::fake_bridge();
    let err = bridge.product().validate_license_file("/tmp/g2.lic").unwrap_err();
    assert!(matches!(err, BridgeError::SymbolNotFound(_)));
    assert!(err.to_string().contains("G2Product_validateLicenseFile"));
}
