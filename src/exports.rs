//! Inbound C Surface
//!
//! Fixed-signature `extern "C"` functions over one process-wide [`Bridge`].
//! Every function takes plain scalars and returns a `#[repr(C)]` aggregate
//! of payload and status, so a foreign caller never sees a resize callback
//! or an out-parameter.
//!
//! # Ownership
//!
//! String payloads are heap blocks owned by the caller. Release them with
//! [`erbridge_free`]. Handles are integers; pass them back unchanged.
//!
//! # Failures
//!
//! Native statuses are forwarded verbatim. Failures that happen before the
//! native call (bridge not open, null or non-UTF-8 argument, missing entry
//! point) report [`ERBRIDGE_LOCAL_FAILURE`] and leave a message readable
//! through [`erbridge_last_error`] on the calling thread.

use std::cell::RefCell;
use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;

use once_cell::sync::OnceCell;

use crate::bridge::Bridge;
use crate::buffer::{FixedBuffer, ResponseBuffer};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::handle::{ConfigHandle, EntityListHandle, ExportHandle, Handle};
use crate::status::{CallResult, StatusCode};

/// Status reported when a call fails before reaching the native library.
pub const ERBRIDGE_LOCAL_FAILURE: i64 = i64::MIN;

static BRIDGE: OnceCell<Bridge> = OnceCell::new();

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

/// Install `bridge` as the process-wide bridge behind the C surface.
pub fn install(bridge: Bridge) -> Result<&'static Bridge, BridgeError> {
    BRIDGE.set(bridge).map_err(|_| BridgeError::AlreadyOpen)?;
    BRIDGE.get().ok_or(BridgeError::NotOpen)
}

/// The process-wide bridge, if one has been installed.
pub fn installed() -> Option<&'static Bridge> {
    BRIDGE.get()
}

fn with_bridge<T, F>(call: F) -> Result<T, BridgeError>
where
    F: FnOnce(&'static Bridge) -> Result<T, BridgeError>,
{
    let bridge = BRIDGE.get().ok_or(BridgeError::NotOpen)?;
    call(bridge)
}

fn record_failure(error: BridgeError) -> i64 {
    tracing::debug!(error = %error, "local failure");
    let message = CString::new(error.to_string().replace('\0', " ")).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
    ERBRIDGE_LOCAL_FAILURE
}

/// Borrow a string argument.
///
/// # Safety
///
/// `ptr` must be null or a valid NUL-terminated string that outlives the
/// returned slice.
unsafe fn c_arg<'a>(name: &'static str, ptr: *const c_char) -> Result<&'a str, BridgeError> {
    if ptr.is_null() {
        return Err(BridgeError::InvalidString {
            name,
            reason: "null pointer".to_string(),
        });
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|e| BridgeError::InvalidString {
            name,
            reason: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
        })
}

/// Copy `text` into a `malloc` block releasable with [`erbridge_free`].
fn copy_to_c_block(text: &str) -> *mut c_char {
    let bytes = text.as_bytes();
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    // SAFETY: len + 1 bytes are allocated before anything is written.
    unsafe {
        let block = libc::malloc(len + 1) as *mut c_char;
        if block.is_null() {
            return block;
        }
        ptr::copy_nonoverlapping(bytes.as_ptr() as *const c_char, block, len);
        *block.add(len) = 0;
        block
    }
}

// =============================================================================
// Result aggregates
// =============================================================================

/// String payload and status.
#[repr(C)]
#[derive(Debug)]
pub struct ResponseResult {
    pub response: *mut c_char,
    pub return_code: i64,
}

/// Handle payload and status.
#[repr(C)]
#[derive(Debug)]
pub struct HandleResult {
    pub handle: usize,
    pub return_code: i64,
}

/// 64-bit identifier payload and status.
#[repr(C)]
#[derive(Debug)]
pub struct IdResult {
    pub id: i64,
    pub return_code: i64,
}

/// Engine-assigned record ID, with-info response, and status.
#[repr(C)]
#[derive(Debug)]
pub struct RecordIdWithInfoResult {
    pub record_id: *mut c_char,
    pub with_info: *mut c_char,
    pub return_code: i64,
}

/// Configuration ID, configuration text, and status.
#[repr(C)]
#[derive(Debug)]
pub struct ConfigWithIdResult {
    pub config_id: i64,
    pub config: *mut c_char,
    pub return_code: i64,
}

/// Response, with-info response, and status.
#[repr(C)]
#[derive(Debug)]
pub struct ResponseWithInfoResult {
    pub response: *mut c_char,
    pub with_info: *mut c_char,
    pub return_code: i64,
}

impl ResponseResult {
    fn failed(error: BridgeError) -> Self {
        Self {
            response: ptr::null_mut(),
            return_code: record_failure(error),
        }
    }
}

impl From<Result<CallResult<ResponseBuffer>, BridgeError>> for ResponseResult {
    fn from(result: Result<CallResult<ResponseBuffer>, BridgeError>) -> Self {
        match result {
            Ok(CallResult { status, payload }) => Self {
                response: payload.into_raw(),
                return_code: status.code(),
            },
            Err(e) => Self::failed(e),
        }
    }
}

impl From<Result<CallResult<FixedBuffer>, BridgeError>> for ResponseResult {
    fn from(result: Result<CallResult<FixedBuffer>, BridgeError>) -> Self {
        match result {
            Ok(CallResult { status, payload }) => Self {
                response: payload.into_raw(),
                return_code: status.code(),
            },
            Err(e) => Self::failed(e),
        }
    }
}

impl From<Result<String, BridgeError>> for ResponseResult {
    fn from(result: Result<String, BridgeError>) -> Self {
        match result {
            Ok(text) => Self {
                response: copy_to_c_block(&text),
                return_code: StatusCode::SUCCESS.code(),
            },
            Err(e) => Self::failed(e),
        }
    }
}

impl<K> From<Result<CallResult<Handle<K>>, BridgeError>> for HandleResult {
    fn from(result: Result<CallResult<Handle<K>>, BridgeError>) -> Self {
        match result {
            Ok(CallResult { status, payload }) => Self {
                handle: payload.into_raw(),
                return_code: status.code(),
            },
            Err(e) => Self {
                handle: 0,
                return_code: record_failure(e),
            },
        }
    }
}

impl From<Result<CallResult<i64>, BridgeError>> for IdResult {
    fn from(result: Result<CallResult<i64>, BridgeError>) -> Self {
        match result {
            Ok(CallResult { status, payload }) => Self {
                id: payload,
                return_code: status.code(),
            },
            Err(e) => Self {
                id: 0,
                return_code: record_failure(e),
            },
        }
    }
}

impl From<Result<CallResult<crate::api::RecordIdWithInfo>, BridgeError>> for RecordIdWithInfoResult {
    fn from(result: Result<CallResult<crate::api::RecordIdWithInfo>, BridgeError>) -> Self {
        match result {
            Ok(CallResult { status, payload }) => Self {
                record_id: payload.record_id.into_raw(),
                with_info: payload.with_info.into_raw(),
                return_code: status.code(),
            },
            Err(e) => Self {
                record_id: ptr::null_mut(),
                with_info: ptr::null_mut(),
                return_code: record_failure(e),
            },
        }
    }
}

impl From<Result<CallResult<crate::api::ConfigWithId>, BridgeError>> for ConfigWithIdResult {
    fn from(result: Result<CallResult<crate::api::ConfigWithId>, BridgeError>) -> Self {
        match result {
            Ok(CallResult { status, payload }) => Self {
                config_id: payload.config_id,
                config: payload.config.into_raw(),
                return_code: status.code(),
            },
            Err(e) => Self {
                config_id: 0,
                config: ptr::null_mut(),
                return_code: record_failure(e),
            },
        }
    }
}

impl From<Result<CallResult<crate::api::RedoWithInfo>, BridgeError>> for ResponseWithInfoResult {
    fn from(result: Result<CallResult<crate::api::RedoWithInfo>, BridgeError>) -> Self {
        match result {
            Ok(CallResult { status, payload }) => Self {
                response: payload.response.into_raw(),
                with_info: payload.with_info.into_raw(),
                return_code: status.code(),
            },
            Err(e) => Self {
                response: ptr::null_mut(),
                with_info: ptr::null_mut(),
                return_code: record_failure(e),
            },
        }
    }
}

fn status_code(result: Result<StatusCode, BridgeError>) -> i64 {
    match result {
        Ok(status) => status.code(),
        Err(e) => record_failure(e),
    }
}

fn scalar(result: Result<i64, BridgeError>) -> i64 {
    result.unwrap_or_else(record_failure)
}

// =============================================================================
// Bridge lifecycle
// =============================================================================

/// Open the native library and install the process-wide bridge.
///
/// `config_path` names an `erbridge.toml`; null discovers one from the
/// current directory. Returns 0 on success.
///
/// # Safety
///
/// `config_path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn erbridge_open(config_path: *const c_char) -> i64 {
    let opened = (|| {
        if BRIDGE.get().is_some() {
            return Err(BridgeError::AlreadyOpen);
        }
        let path = if config_path.is_null() {
            None
        } else {
            Some(c_arg("config_path", config_path)?)
        };
        let config = BridgeConfig::resolve(path.map(Path::new))?;
        match crate::logging::init_logging(&config.logging) {
            Ok(()) => {}
            Err(BridgeError::SubscriberExists) => {
                tracing::debug!("keeping the host's log subscriber");
            }
            Err(e) => return Err(e),
        }
        install(Bridge::open(&config)?).map(|_| ())
    })();
    match opened {
        Ok(()) => 0,
        Err(e) => record_failure(e),
    }
}

/// Initialize every component from the configured `[engine]` settings.
#[no_mangle]
pub extern "C" fn erbridge_initialize_all() -> i64 {
    match with_bridge(|bridge| bridge.initialize_all()) {
        Ok(()) => 0,
        Err(e) => record_failure(e),
    }
}

/// Destroy every live component.
#[no_mangle]
pub extern "C" fn erbridge_destroy_all() -> i64 {
    match with_bridge(|bridge| bridge.destroy_all()) {
        Ok(()) => 0,
        Err(e) => record_failure(e),
    }
}

/// Release a string payload returned by any `erbridge_*` function.
///
/// # Safety
///
/// `block` must be null or a payload returned by this library that has not
/// been released yet.
#[no_mangle]
pub unsafe extern "C" fn erbridge_free(block: *mut c_char) {
    crate::buffer::release_string_buffer(block as *mut c_void);
}

/// Message of the last local failure on this thread, or null.
///
/// The pointer stays valid until the next local failure on this thread.
#[no_mangle]
pub extern "C" fn erbridge_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}

#[no_mangle]
pub extern "C" fn erbridge_clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Crate version as a static C string.
#[no_mangle]
pub extern "C" fn erbridge_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// =============================================================================
// Engine
// =============================================================================

/// # Safety
///
/// String arguments must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_add_record(
    data_source_code: *const c_char,
    record_id: *const c_char,
    json_data: *const c_char,
    load_id: *const c_char,
) -> i64 {
    status_code(with_bridge(|bridge| {
        bridge.engine().add_record(
            c_arg("data_source_code", data_source_code)?,
            c_arg("record_id", record_id)?,
            c_arg("json_data", json_data)?,
            c_arg("load_id", load_id)?,
        )
    }))
}

/// # Safety
///
/// String arguments must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_add_record_with_info(
    data_source_code: *const c_char,
    record_id: *const c_char,
    json_data: *const c_char,
    load_id: *const c_char,
    flags: i64,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge.engine().add_record_with_info(
            c_arg("data_source_code", data_source_code)?,
            c_arg("record_id", record_id)?,
            c_arg("json_data", json_data)?,
            c_arg("load_id", load_id)?,
            flags,
        )
    })
    .into()
}

/// # Safety
///
/// String arguments must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_add_record_with_returned_record_id(
    data_source_code: *const c_char,
    json_data: *const c_char,
    load_id: *const c_char,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge.engine().add_record_with_returned_record_id(
            c_arg("data_source_code", data_source_code)?,
            c_arg("json_data", json_data)?,
            c_arg("load_id", load_id)?,
        )
    })
    .into()
}

/// # Safety
///
/// String arguments must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_add_record_with_info_with_returned_record_id(
    data_source_code: *const c_char,
    json_data: *const c_char,
    load_id: *const c_char,
    flags: i64,
) -> RecordIdWithInfoResult {
    with_bridge(|bridge| {
        bridge.engine().add_record_with_info_with_returned_record_id(
            c_arg("data_source_code", data_source_code)?,
            c_arg("json_data", json_data)?,
            c_arg("load_id", load_id)?,
            flags,
        )
    })
    .into()
}

/// # Safety
///
/// String arguments must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_delete_record_with_info(
    data_source_code: *const c_char,
    record_id: *const c_char,
    load_id: *const c_char,
    flags: i64,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge.engine().delete_record_with_info(
            c_arg("data_source_code", data_source_code)?,
            c_arg("record_id", record_id)?,
            c_arg("load_id", load_id)?,
            flags,
        )
    })
    .into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_get_entity_by_entity_id(entity_id: i64) -> ResponseResult {
    with_bridge(|bridge| bridge.engine().get_entity_by_entity_id(entity_id)).into()
}

/// # Safety
///
/// String arguments must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_get_entity_by_record_id(
    data_source_code: *const c_char,
    record_id: *const c_char,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge.engine().get_entity_by_record_id(
            c_arg("data_source_code", data_source_code)?,
            c_arg("record_id", record_id)?,
        )
    })
    .into()
}

/// # Safety
///
/// `json_data` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_search_by_attributes_v2(
    json_data: *const c_char,
    flags: i64,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge
            .engine()
            .search_by_attributes_v2(c_arg("json_data", json_data)?, flags)
    })
    .into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_find_path_by_entity_id(
    entity_id_1: i64,
    entity_id_2: i64,
    max_degree: i32,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge
            .engine()
            .find_path_by_entity_id(entity_id_1, entity_id_2, max_degree)
    })
    .into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_why_entities(entity_id_1: i64, entity_id_2: i64) -> ResponseResult {
    with_bridge(|bridge| bridge.engine().why_entities(entity_id_1, entity_id_2)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_process_redo_record_with_info(flags: i64) -> ResponseWithInfoResult {
    with_bridge(|bridge| bridge.engine().process_redo_record_with_info(flags)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_count_redo_records() -> i64 {
    scalar(with_bridge(|bridge| bridge.engine().count_redo_records()))
}

#[no_mangle]
pub extern "C" fn erbridge_engine_stats() -> ResponseResult {
    with_bridge(|bridge| bridge.engine().stats()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_export_config() -> ResponseResult {
    with_bridge(|bridge| bridge.engine().export_config()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_export_config_and_config_id() -> ConfigWithIdResult {
    with_bridge(|bridge| bridge.engine().export_config_and_config_id()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_get_active_config_id() -> IdResult {
    with_bridge(|bridge| bridge.engine().get_active_config_id()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_export_json_entity_report(flags: i64) -> HandleResult {
    with_bridge(|bridge| bridge.engine().export_json_entity_report(flags)).into()
}

/// # Safety
///
/// `csv_column_list` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn erbridge_engine_export_csv_entity_report(
    csv_column_list: *const c_char,
    flags: i64,
) -> HandleResult {
    with_bridge(|bridge| {
        bridge
            .engine()
            .export_csv_entity_report(c_arg("csv_column_list", csv_column_list)?, flags)
    })
    .into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_fetch_next(export_handle: usize) -> ResponseResult {
    let handle = ExportHandle::from_raw(export_handle);
    with_bridge(|bridge| bridge.engine().fetch_next(handle)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_close_export(export_handle: usize) -> i64 {
    let handle = ExportHandle::from_raw(export_handle);
    status_code(with_bridge(|bridge| bridge.engine().close_export(handle)))
}

#[no_mangle]
pub extern "C" fn erbridge_engine_get_last_exception() -> ResponseResult {
    with_bridge(|bridge| bridge.engine().core().last_exception_buffer()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_engine_get_last_exception_code() -> i64 {
    scalar(with_bridge(|bridge| bridge.engine().last_exception_code()))
}

// =============================================================================
// Configuration
// =============================================================================

#[no_mangle]
pub extern "C" fn erbridge_config_create() -> HandleResult {
    with_bridge(|bridge| bridge.configuration().create()).into()
}

/// [`erbridge_config_create`] with the handle printed before and after.
#[no_mangle]
pub extern "C" fn erbridge_config_create_debug() -> HandleResult {
    with_bridge(|bridge| bridge.configuration().create_debug()).into()
}

/// # Safety
///
/// `json_config` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn erbridge_config_load(json_config: *const c_char) -> HandleResult {
    with_bridge(|bridge| {
        bridge
            .configuration()
            .load(c_arg("json_config", json_config)?)
    })
    .into()
}

#[no_mangle]
pub extern "C" fn erbridge_config_save(config_handle: usize) -> ResponseResult {
    let handle = ConfigHandle::from_raw(config_handle);
    with_bridge(|bridge| bridge.configuration().save(handle)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_config_close(config_handle: usize) -> i64 {
    let handle = ConfigHandle::from_raw(config_handle);
    status_code(with_bridge(|bridge| bridge.configuration().close(handle)))
}

/// [`erbridge_config_close`] with the handle and status printed.
#[no_mangle]
pub extern "C" fn erbridge_config_close_debug(config_handle: usize) -> i64 {
    let handle = ConfigHandle::from_raw(config_handle);
    status_code(with_bridge(|bridge| bridge.configuration().close_debug(handle)))
}

/// # Safety
///
/// `input_json` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn erbridge_config_add_data_source(
    config_handle: usize,
    input_json: *const c_char,
) -> ResponseResult {
    let handle = ConfigHandle::from_raw(config_handle);
    with_bridge(|bridge| {
        bridge
            .configuration()
            .add_data_source(handle, c_arg("input_json", input_json)?)
    })
    .into()
}

/// # Safety
///
/// `input_json` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn erbridge_config_delete_data_source(
    config_handle: usize,
    input_json: *const c_char,
) -> i64 {
    let handle = ConfigHandle::from_raw(config_handle);
    status_code(with_bridge(|bridge| {
        bridge
            .configuration()
            .delete_data_source(handle, c_arg("input_json", input_json)?)
    }))
}

#[no_mangle]
pub extern "C" fn erbridge_config_list_data_sources(config_handle: usize) -> ResponseResult {
    let handle = ConfigHandle::from_raw(config_handle);
    with_bridge(|bridge| bridge.configuration().list_data_sources(handle)).into()
}

// =============================================================================
// Configuration manager
// =============================================================================

/// # Safety
///
/// String arguments must be valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn erbridge_config_manager_add_config(
    config_str: *const c_char,
    config_comments: *const c_char,
) -> IdResult {
    with_bridge(|bridge| {
        bridge.config_manager().add_config(
            c_arg("config_str", config_str)?,
            c_arg("config_comments", config_comments)?,
        )
    })
    .into()
}

#[no_mangle]
pub extern "C" fn erbridge_config_manager_get_config(config_id: i64) -> ResponseResult {
    with_bridge(|bridge| bridge.config_manager().get_config(config_id)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_config_manager_get_config_list() -> ResponseResult {
    with_bridge(|bridge| bridge.config_manager().get_config_list()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_config_manager_get_default_config_id() -> IdResult {
    with_bridge(|bridge| bridge.config_manager().get_default_config_id()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_config_manager_set_default_config_id(config_id: i64) -> i64 {
    status_code(with_bridge(|bridge| {
        bridge.config_manager().set_default_config_id(config_id)
    }))
}

#[no_mangle]
pub extern "C" fn erbridge_config_manager_replace_default_config_id(
    old_config_id: i64,
    new_config_id: i64,
) -> i64 {
    status_code(with_bridge(|bridge| {
        bridge
            .config_manager()
            .replace_default_config_id(old_config_id, new_config_id)
    }))
}

// =============================================================================
// Diagnostic
// =============================================================================

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_check_db_perf(seconds_to_run: i32) -> ResponseResult {
    with_bridge(|bridge| bridge.diagnostic().check_db_perf(seconds_to_run)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_get_db_info() -> ResponseResult {
    with_bridge(|bridge| bridge.diagnostic().get_db_info()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_get_entity_details(
    entity_id: i64,
    include_internal_features: i32,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge
            .diagnostic()
            .get_entity_details(entity_id, include_internal_features)
    })
    .into()
}

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_get_entity_list_by_size(entity_size: usize) -> HandleResult {
    with_bridge(|bridge| bridge.diagnostic().get_entity_list_by_size(entity_size)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_fetch_next_entity_by_size(entity_list_handle: usize) -> ResponseResult {
    let handle = EntityListHandle::from_raw(entity_list_handle);
    with_bridge(|bridge| bridge.diagnostic().fetch_next_entity_by_size(handle)).into()
}

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_close_entity_list_by_size(entity_list_handle: usize) -> i64 {
    let handle = EntityListHandle::from_raw(entity_list_handle);
    status_code(with_bridge(|bridge| {
        bridge.diagnostic().close_entity_list_by_size(handle)
    }))
}

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_get_logical_cores() -> i64 {
    scalar(with_bridge(|bridge| bridge.diagnostic().get_logical_cores()))
}

#[no_mangle]
pub extern "C" fn erbridge_diagnostic_get_total_system_memory() -> i64 {
    scalar(with_bridge(|bridge| bridge.diagnostic().get_total_system_memory()))
}

// =============================================================================
// Product
// =============================================================================

#[no_mangle]
pub extern "C" fn erbridge_product_version() -> ResponseResult {
    with_bridge(|bridge| bridge.product().version()).into()
}

#[no_mangle]
pub extern "C" fn erbridge_product_license() -> ResponseResult {
    with_bridge(|bridge| bridge.product().license()).into()
}

/// # Safety
///
/// `license_file_path` must be a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn erbridge_product_validate_license_file(
    license_file_path: *const c_char,
) -> ResponseResult {
    with_bridge(|bridge| {
        bridge
            .product()
            .validate_license_file(c_arg("license_file_path", license_file_path)?)
    })
    .into()
}
