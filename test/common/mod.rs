//! Fake engine library shared by the integration tests.
//!
//! A handful of entry points per component, backed by a small in-memory
//! record store. State is thread-local: every test runs on its own thread
//! and the stubs are called synchronously on that thread.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::ffi::{c_void, CStr};
use std::os::raw::{c_char, c_int, c_longlong};
use std::ptr;
use std::sync::Arc;

use erbridge::{Bridge, BridgeConfig, NativeLibrary, ResizeFn, Resizer};
use serde_json::{json, Value};

const FIRST_CONFIG_HANDLE: usize = 0x1000;
const FIRST_EXPORT_HANDLE: usize = 0x2000;

#[derive(Default)]
struct FakeEngine {
    exception: Option<(String, c_int)>,
    data_sources: Vec<String>,
    records: Vec<((String, String), Value)>,
    generated_ids: u32,
    configs: HashMap<usize, Vec<String>>,
    next_config_handle: usize,
    stored_configs: BTreeMap<i64, String>,
    default_config_id: i64,
    cursors: HashMap<usize, Vec<String>>,
    next_cursor_handle: usize,
    closed_cursors: usize,
}

impl FakeEngine {
    fn new() -> Self {
        Self {
            data_sources: vec!["TEST".to_string(), "SEARCH".to_string()],
            next_config_handle: FIRST_CONFIG_HANDLE,
            next_cursor_handle: FIRST_EXPORT_HANDLE,
            ..Default::default()
        }
    }

    /// Entity IDs follow record insertion order.
    fn entity_id(&self, key: &(String, String)) -> Option<i64> {
        self.records
            .iter()
            .position(|(k, _)| k == key)
            .map(|index| index as i64 + 1)
    }

    fn upsert(&mut self, key: (String, String), value: Value) -> i64 {
        match self.entity_id(&key) {
            Some(id) => {
                self.records[(id - 1) as usize].1 = value;
                id
            }
            None => {
                self.records.push((key, value));
                self.records.len() as i64
            }
        }
    }

    fn entity_json(&self, entity_id: i64) -> Option<Value> {
        let index: usize = (entity_id - 1).try_into().ok()?;
        let ((ds, rid), _) = self.records.get(index)?;
        Some(json!({
            "RESOLVED_ENTITY": {
                "ENTITY_ID": entity_id,
                "RECORDS": [{"DATA_SOURCE": ds, "RECORD_ID": rid}]
            }
        }))
    }
}

thread_local! {
    static ENGINE: RefCell<FakeEngine> = RefCell::new(FakeEngine::new());
}

fn with_engine<T>(f: impl FnOnce(&mut FakeEngine) -> T) -> T {
    ENGINE.with(|engine| f(&mut engine.borrow_mut()))
}

/// Reset the calling thread's fake engine.
pub fn reset() {
    ENGINE.with(|engine| *engine.borrow_mut() = FakeEngine::new());
}

/// Number of export and entity-list cursors closed on this thread.
pub fn closed_cursors() -> usize {
    with_engine(|engine| engine.closed_cursors)
}

fn raise(message: String, code: c_int) -> c_int {
    with_engine(|engine| engine.exception = Some((message, code)));
    -2
}

unsafe fn arg(ptr: *const c_char) -> String {
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

unsafe fn write_growable(
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
    text: &str,
) -> c_int {
    let needed = text.len() + 1;
    if *size < needed {
        let block = resize(*buf as *mut c_void, needed);
        if block.is_null() {
            return -1;
        }
        *buf = block as *mut c_char;
        *size = needed;
    }
    ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, *buf, text.len());
    *(*buf).add(text.len()) = 0;
    0
}

unsafe fn write_fixed(buf: *mut c_char, capacity: usize, text: &str) -> c_int {
    if capacity == 0 {
        return -1;
    }
    let n = text.len().min(capacity - 1);
    ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, buf, n);
    *buf.add(n) = 0;
    n as c_int
}

// ============================================================================
// Lifecycle and exceptions (shared by every component)
// ============================================================================

unsafe extern "C" fn init(_module: *const c_char, ini: *const c_char, _verbose: c_int) -> c_int {
    if serde_json::from_str::<Value>(&arg(ini)).is_err() {
        return raise("0042E|Invalid ini parameters".to_string(), 42);
    }
    0
}

unsafe extern "C" fn init_with_config_id(
    module: *const c_char,
    ini: *const c_char,
    _config_id: c_longlong,
    verbose: c_int,
) -> c_int {
    init(module, ini, verbose)
}

unsafe extern "C" fn destroy() -> c_int {
    0
}

unsafe extern "C" fn get_last_exception(buf: *mut c_char, capacity: usize) -> c_int {
    let text = with_engine(|e| e.exception.as_ref().map(|(m, _)| m.clone()).unwrap_or_default());
    write_fixed(buf, capacity, &text)
}

unsafe extern "C" fn get_last_exception_code() -> c_int {
    with_engine(|e| e.exception.as_ref().map_or(0, |(_, code)| *code))
}

unsafe extern "C" fn clear_last_exception() {
    with_engine(|e| e.exception = None);
}

// ============================================================================
// Engine
// ============================================================================

fn store_record(ds: String, rid: String, json_data: &str) -> Result<i64, c_int> {
    let Ok(value) = serde_json::from_str::<Value>(json_data) else {
        return Err(raise("0002E|Invalid JSON".to_string(), 2));
    };
    let known = with_engine(|e| e.data_sources.contains(&ds));
    if !known {
        return Err(raise(format!("0023E|Unknown DATA_SOURCE value '{}'", ds), 23));
    }
    Ok(with_engine(|e| e.upsert((ds, rid), value)))
}

unsafe extern "C" fn add_record(
    ds: *const c_char,
    rid: *const c_char,
    json_data: *const c_char,
    _load_id: *const c_char,
) -> c_int {
    match store_record(arg(ds), arg(rid), &arg(json_data)) {
        Ok(_) => 0,
        Err(status) => status,
    }
}

unsafe extern "C" fn add_record_with_info(
    ds: *const c_char,
    rid: *const c_char,
    json_data: *const c_char,
    _load_id: *const c_char,
    _flags: c_longlong,
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
) -> c_int {
    let (ds, rid) = (arg(ds), arg(rid));
    match store_record(ds.clone(), rid.clone(), &arg(json_data)) {
        Ok(entity_id) => {
            let info = json!({
                "DATA_SOURCE": ds,
                "RECORD_ID": rid,
                "AFFECTED_ENTITIES": [{"ENTITY_ID": entity_id}]
            });
            write_growable(buf, size, resize, &info.to_string())
        }
        Err(status) => status,
    }
}

unsafe extern "C" fn add_record_with_returned_record_id(
    ds: *const c_char,
    json_data: *const c_char,
    _load_id: *const c_char,
    buf: *mut c_char,
    capacity: usize,
) -> c_int {
    let generated = with_engine(|e| {
        e.generated_ids += 1;
        format!("{:040X}", e.generated_ids)
    });
    match store_record(arg(ds), generated.clone(), &arg(json_data)) {
        Ok(_) => {
            write_fixed(buf, capacity, &generated);
            0
        }
        Err(status) => status,
    }
}

unsafe extern "C" fn delete_record(
    ds: *const c_char,
    rid: *const c_char,
    _load_id: *const c_char,
) -> c_int {
    let key = (arg(ds), arg(rid));
    with_engine(|e| e.records.retain(|(k, _)| *k != key));
    0
}

unsafe extern "C" fn get_entity_by_record_id(
    ds: *const c_char,
    rid: *const c_char,
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
) -> c_int {
    let key = (arg(ds), arg(rid));
    let entity = with_engine(|e| e.entity_id(&key).and_then(|id| e.entity_json(id)));
    match entity {
        Some(entity) => write_growable(buf, size, resize, &entity.to_string()),
        None => raise(
            format!("0033E|Unknown record: dsrc[{}], record[{}]", key.0, key.1),
            33,
        ),
    }
}

unsafe extern "C" fn get_entity_by_entity_id(
    entity_id: c_longlong,
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
) -> c_int {
    let entity = with_engine(|e| e.entity_json(entity_id));
    match entity {
        Some(entity) => write_growable(buf, size, resize, &entity.to_string()),
        None => raise(
            format!("0037E|Unknown resolved entity value '{}'", entity_id),
            37,
        ),
    }
}

unsafe extern "C" fn stats(buf: *mut *mut c_char, size: *mut usize, resize: ResizeFn) -> c_int {
    let loaded = with_engine(|e| e.records.len());
    let text = json!({"workload": {"loadedRecords": loaded}}).to_string();
    write_growable(buf, size, resize, &text)
}

unsafe extern "C" fn count_redo_records() -> c_longlong {
    0
}

unsafe extern "C" fn get_active_config_id(config_id: *mut c_longlong) -> c_int {
    *config_id = with_engine(|e| e.default_config_id);
    0
}

unsafe extern "C" fn export_config_and_config_id(
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
    config_id: *mut c_longlong,
) -> c_int {
    let (id, sources) = with_engine(|e| (e.default_config_id, e.data_sources.clone()));
    *config_id = id;
    write_growable(buf, size, resize, &config_document(&sources))
}

unsafe extern "C" fn export_json_entity_report(_flags: c_longlong, handle: *mut *mut c_void) -> c_int {
    let cursor = with_engine(|e| {
        let lines: Vec<String> = (1..=e.records.len() as i64)
            .filter_map(|id| e.entity_json(id))
            .map(|entity| format!("{}\n", entity))
            .collect();
        let cursor = e.next_cursor_handle;
        e.next_cursor_handle += 1;
        e.cursors.insert(cursor, lines);
        cursor
    });
    *handle = cursor as *mut c_void;
    0
}

unsafe extern "C" fn fetch_next(handle: *mut c_void, buf: *mut c_char, capacity: usize) -> c_int {
    let page = with_engine(|e| {
        e.cursors.get_mut(&(handle as usize)).map(|lines| {
            if lines.is_empty() {
                String::new()
            } else {
                lines.remove(0)
            }
        })
    });
    match page {
        Some(page) => write_fixed(buf, capacity, &page),
        None => raise(format!("0024E|Invalid export handle {:#x}", handle as usize), 24),
    }
}

unsafe extern "C" fn close_cursor(handle: *mut c_void) -> c_int {
    let closed = with_engine(|e| {
        let closed = e.cursors.remove(&(handle as usize)).is_some();
        if closed {
            e.closed_cursors += 1;
        }
        closed
    });
    if closed {
        0
    } else {
        raise(format!("0024E|Invalid handle {:#x}", handle as usize), 24)
    }
}

// ============================================================================
// Configuration
// ============================================================================

fn config_document(sources: &[String]) -> String {
    let dsrc: Vec<Value> = sources
        .iter()
        .enumerate()
        .map(|(i, code)| json!({"DSRC_ID": i + 1, "DSRC_CODE": code}))
        .collect();
    json!({"G2_CONFIG": {"CFG_DSRC": dsrc}}).to_string()
}

fn open_config(sources: Vec<String>) -> usize {
    with_engine(|e| {
        let handle = e.next_config_handle;
        e.next_config_handle += 1;
        e.configs.insert(handle, sources);
        handle
    })
}

unsafe extern "C" fn config_create(handle: *mut *mut c_void) -> c_int {
    let sources = with_engine(|e| e.data_sources.clone());
    *handle = open_config(sources) as *mut c_void;
    0
}

unsafe extern "C" fn config_load(json_config: *const c_char, handle: *mut *mut c_void) -> c_int {
    let Ok(document) = serde_json::from_str::<Value>(&arg(json_config)) else {
        return raise("0002E|Invalid JSON".to_string(), 2);
    };
    let sources = document["G2_CONFIG"]["CFG_DSRC"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|d| d["DSRC_CODE"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    *handle = open_config(sources) as *mut c_void;
    0
}

unsafe extern "C" fn config_save(
    handle: *mut c_void,
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
) -> c_int {
    match with_engine(|e| e.configs.get(&(handle as usize)).cloned()) {
        Some(sources) => write_growable(buf, size, resize, &config_document(&sources)),
        None => raise("0048E|Invalid config handle".to_string(), 48),
    }
}

unsafe extern "C" fn config_close(handle: *mut c_void) -> c_int {
    match with_engine(|e| e.configs.remove(&(handle as usize))) {
        Some(_) => 0,
        None => raise("0048E|Invalid config handle".to_string(), 48),
    }
}

unsafe extern "C" fn config_add_data_source(
    handle: *mut c_void,
    input_json: *const c_char,
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
) -> c_int {
    let Ok(input) = serde_json::from_str::<Value>(&arg(input_json)) else {
        return raise("0002E|Invalid JSON".to_string(), 2);
    };
    let Some(code) = input["DSRC_CODE"].as_str().map(str::to_string) else {
        return raise("0050E|Missing DSRC_CODE".to_string(), 50);
    };
    let added = with_engine(|e| {
        e.configs.get_mut(&(handle as usize)).map(|sources| {
            sources.push(code);
            sources.len()
        })
    });
    match added {
        Some(id) => write_growable(buf, size, resize, &json!({"DSRC_ID": id}).to_string()),
        None => raise("0048E|Invalid config handle".to_string(), 48),
    }
}

unsafe extern "C" fn config_list_data_sources(
    handle: *mut c_void,
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
) -> c_int {
    match with_engine(|e| e.configs.get(&(handle as usize)).cloned()) {
        Some(sources) => {
            let list: Vec<Value> = sources
                .iter()
                .enumerate()
                .map(|(i, code)| json!({"DSRC_ID": i + 1, "DSRC_CODE": code}))
                .collect();
            write_growable(buf, size, resize, &json!({"DATA_SOURCES": list}).to_string())
        }
        None => raise("0048E|Invalid config handle".to_string(), 48),
    }
}

// ============================================================================
// Configuration manager
// ============================================================================

unsafe extern "C" fn add_config(
    config: *const c_char,
    _comments: *const c_char,
    config_id: *mut c_longlong,
) -> c_int {
    let config = arg(config);
    if serde_json::from_str::<Value>(&config).is_err() {
        return raise("0002E|Invalid JSON".to_string(), 2);
    }
    *config_id = with_engine(|e| {
        let id = 1000 + e.stored_configs.len() as i64;
        e.stored_configs.insert(id, config);
        id
    });
    0
}

unsafe extern "C" fn get_config(
    config_id: c_longlong,
    buf: *mut *mut c_char,
    size: *mut usize,
    resize: ResizeFn,
) -> c_int {
    match with_engine(|e| e.stored_configs.get(&config_id).cloned()) {
        Some(config) => write_growable(buf, size, resize, &config),
        None => raise(format!("0062E|Unknown config ID {}", config_id), 62),
    }
}

unsafe extern "C" fn get_default_config_id(config_id: *mut c_longlong) -> c_int {
    *config_id = with_engine(|e| e.default_config_id);
    0
}

unsafe extern "C" fn set_default_config_id(config_id: c_longlong) -> c_int {
    with_engine(|e| e.default_config_id = config_id);
    0
}

unsafe extern "C" fn replace_default_config_id(old: c_longlong, new: c_longlong) -> c_int {
    let swapped = with_engine(|e| {
        if e.default_config_id == old {
            e.default_config_id = new;
            true
        } else {
            false
        }
    });
    if swapped {
        0
    } else {
        raise("7245E|Default config ID changed".to_string(), 7245)
    }
}

// ============================================================================
// Diagnostic and product
// ============================================================================

unsafe extern "C" fn get_logical_cores() -> c_int {
    8
}

unsafe extern "C" fn get_total_system_memory() -> c_longlong {
    17_179_869_184
}

unsafe extern "C" fn get_entity_list_by_size(entity_size: usize, handle: *mut *mut c_void) -> c_int {
    let cursor = with_engine(|e| {
        // Every fake entity holds exactly one record
        let lines: Vec<String> = if entity_size == 1 {
            (1..=e.records.len())
                .map(|id| format!("{}\n", json!({"ENTITY_ID": id, "ENTITY_SIZE": 1})))
                .collect()
        } else {
            Vec::new()
        };
        let cursor = e.next_cursor_handle;
        e.next_cursor_handle += 1;
        e.cursors.insert(cursor, lines);
        cursor
    });
    *handle = cursor as *mut c_void;
    0
}

unsafe extern "C" fn product_version() -> *const c_char {
    b"{\"PRODUCT_NAME\":\"Fake Engine\",\"VERSION\":\"3.8.0\"}\0".as_ptr() as *const c_char
}

unsafe extern "C" fn product_license() -> *const c_char {
    b"{\"customer\":\"integration tests\",\"licenseType\":\"EVAL\"}\0".as_ptr() as *const c_char
}

// ============================================================================
// Library assembly
// ============================================================================

/// In-process library exporting every fake entry point.
pub fn fake_library() -> NativeLibrary {
    let mut symbols: Vec<(String, usize)> = Vec::new();
    for prefix in ["G2", "G2Config", "G2ConfigMgr", "G2Diagnostic", "G2Product"] {
        symbols.push((format!("{}_init", prefix), init as usize));
        symbols.push((format!("{}_initWithConfigID", prefix), init_with_config_id as usize));
        symbols.push((format!("{}_destroy", prefix), destroy as usize));
        symbols.push((format!("{}_getLastException", prefix), get_last_exception as usize));
        symbols.push((format!("{}_getLastExceptionCode", prefix), get_last_exception_code as usize));
        symbols.push((format!("{}_clearLastException", prefix), clear_last_exception as usize));
    }

    let entries: [(&str, usize); 29] = [
        ("G2_addRecord", add_record as usize),
        ("G2_addRecordWithInfo", add_record_with_info as usize),
        ("G2_addRecordWithReturnedRecordID", add_record_with_returned_record_id as usize),
        ("G2_deleteRecord", delete_record as usize),
        ("G2_getEntityByRecordID", get_entity_by_record_id as usize),
        ("G2_getEntityByEntityID", get_entity_by_entity_id as usize),
        ("G2_stats", stats as usize),
        ("G2_countRedoRecords", count_redo_records as usize),
        ("G2_getActiveConfigID", get_active_config_id as usize),
        ("G2_exportConfigAndConfigID", export_config_and_config_id as usize),
        ("G2_exportJSONEntityReport", export_json_entity_report as usize),
        ("G2_fetchNext", fetch_next as usize),
        ("G2_closeExport", close_cursor as usize),
        ("G2Config_create", config_create as usize),
        ("G2Config_load", config_load as usize),
        ("G2Config_save", config_save as usize),
        ("G2Config_close", config_close as usize),
        ("G2Config_addDataSource", config_add_data_source as usize),
        ("G2Config_listDataSources", config_list_data_sources as usize),
        ("G2ConfigMgr_addConfig", add_config as usize),
        ("G2ConfigMgr_getConfig", get_config as usize),
        ("G2ConfigMgr_getDefaultConfigID", get_default_config_id as usize),
        ("G2ConfigMgr_setDefaultConfigID", set_default_config_id as usize),
        ("G2ConfigMgr_replaceDefaultConfigID", replace_default_config_id as usize),
        ("G2Diagnostic_getLogicalCores", get_logical_cores as usize),
        ("G2Diagnostic_getTotalSystemMemory", get_total_system_memory as usize),
        ("G2Diagnostic_getEntityListBySize", get_entity_list_by_size as usize),
        ("G2Diagnostic_fetchNextEntityBySize", fetch_next as usize),
        ("G2Diagnostic_closeEntityListBySize", close_cursor as usize),
    ];
    symbols.extend(entries.iter().map(|(name, addr)| (name.to_string(), *addr)));
    symbols.push(("G2Product_version".to_string(), product_version as usize));
    symbols.push(("G2Product_license".to_string(), product_license as usize));

    NativeLibrary::in_process("fake-engine", symbols)
}

/// Bridge over the fake library with default configuration.
pub fn fake_bridge() -> Bridge {
    Bridge::from_library(
        Arc::new(fake_library()),
        Resizer::system(),
        BridgeConfig::default(),
    )
}
