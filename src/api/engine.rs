//! Engine Component (`G2_*`)

use std::os::raw::{c_char, c_int, c_longlong};

use crate::buffer::{call_status, FixedBuffer, ResizeFn, ResponseBuffer};
use crate::error::BridgeError;
use crate::handle::ExportHandle;
use crate::status::{CallResult, StatusCode};

use super::to_c_string;

native_component! {
    /// Record ingestion, entity lookup, search, path finding, redo
    /// processing and export.
    pub struct Engine {
        component: "engine",
        prefix: "G2",
        extra: [
            "initWithConfigID" => status,
            "reinit" => status,
            "addRecordWithInfoWithReturnedRecordID" => composite,
            "exportConfigAndConfigID" => composite,
            "processRedoRecordWithInfo" => composite,
        ],
    }

    // Records

    status add_record("addRecord", data_source_code: text, record_id: text, json_data: text, load_id: text);
    /// Add a record and return the entities it affected.
    growable add_record_with_info("addRecordWithInfo", data_source_code: text, record_id: text, json_data: text, load_id: text, flags: int64);
    /// Add a record whose ID the engine assigns; the ID comes back in a
    /// fixed record-ID buffer.
    fixed(record_id) add_record_with_returned_record_id("addRecordWithReturnedRecordID", data_source_code: text, json_data: text, load_id: text);
    status replace_record("replaceRecord", data_source_code: text, record_id: text, json_data: text, load_id: text);
    growable replace_record_with_info("replaceRecordWithInfo", data_source_code: text, record_id: text, json_data: text, load_id: text, flags: int64);
    status delete_record("deleteRecord", data_source_code: text, record_id: text, load_id: text);
    growable delete_record_with_info("deleteRecordWithInfo", data_source_code: text, record_id: text, load_id: text, flags: int64);
    status reevaluate_entity("reevaluateEntity", entity_id: int64, flags: int64);
    growable reevaluate_entity_with_info("reevaluateEntityWithInfo", entity_id: int64, flags: int64);
    status reevaluate_record("reevaluateRecord", data_source_code: text, record_id: text, flags: int64);
    growable reevaluate_record_with_info("reevaluateRecordWithInfo", data_source_code: text, record_id: text, flags: int64);
    growable check_record("checkRecord", record: text, record_query_list: text);
    growable get_record("getRecord", data_source_code: text, record_id: text);
    growable get_record_v2("getRecord_V2", data_source_code: text, record_id: text, flags: int64);

    // Processing

    status process("process", record: text);
    growable process_with_info("processWithInfo", record: text, flags: int64);
    /// Bounded response written into one export-page sized buffer.
    fixed(export_page) process_with_response("processWithResponse", record: text);
    growable process_with_response_resize("processWithResponseResize", record: text);

    // Redo

    growable get_redo_record("getRedoRecord");
    growable process_redo_record("processRedoRecord");
    /// Pending redo records. The native call returns the count directly,
    /// negative on failure.
    count count_redo_records("countRedoRecords");

    // Entities

    growable get_entity_by_entity_id("getEntityByEntityID", entity_id: int64);
    growable get_entity_by_entity_id_v2("getEntityByEntityID_V2", entity_id: int64, flags: int64);
    growable get_entity_by_record_id("getEntityByRecordID", data_source_code: text, record_id: text);
    growable get_entity_by_record_id_v2("getEntityByRecordID_V2", data_source_code: text, record_id: text, flags: int64);
    growable get_virtual_entity_by_record_id("getVirtualEntityByRecordID", record_list: text);
    growable get_virtual_entity_by_record_id_v2("getVirtualEntityByRecordID_V2", record_list: text, flags: int64);
    growable search_by_attributes("searchByAttributes", json_data: text);
    growable search_by_attributes_v2("searchByAttributes_V2", json_data: text, flags: int64);

    // Paths and networks

    growable find_path_by_entity_id("findPathByEntityID", entity_id_1: int64, entity_id_2: int64, max_degree: int);
    growable find_path_by_entity_id_v2("findPathByEntityID_V2", entity_id_1: int64, entity_id_2: int64, max_degree: int, flags: int64);
    growable find_path_by_record_id("findPathByRecordID", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text, max_degree: int);
    growable find_path_by_record_id_v2("findPathByRecordID_V2", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text, max_degree: int, flags: int64);
    growable find_path_excluding_by_entity_id("findPathExcludingByEntityID", entity_id_1: int64, entity_id_2: int64, max_degree: int, excluded_entities: text);
    growable find_path_excluding_by_entity_id_v2("findPathExcludingByEntityID_V2", entity_id_1: int64, entity_id_2: int64, max_degree: int, excluded_entities: text, flags: int64);
    growable find_path_excluding_by_record_id("findPathExcludingByRecordID", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text, max_degree: int, excluded_records: text);
    growable find_path_excluding_by_record_id_v2("findPathExcludingByRecordID_V2", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text, max_degree: int, excluded_records: text, flags: int64);
    growable find_path_including_source_by_entity_id("findPathIncludingSourceByEntityID", entity_id_1: int64, entity_id_2: int64, max_degree: int, excluded_entities: text, required_data_sources: text);
    growable find_path_including_source_by_entity_id_v2("findPathIncludingSourceByEntityID_V2", entity_id_1: int64, entity_id_2: int64, max_degree: int, excluded_entities: text, required_data_sources: text, flags: int64);
    growable find_path_including_source_by_record_id("findPathIncludingSourceByRecordID", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text, max_degree: int, excluded_records: text, required_data_sources: text);
    growable find_path_including_source_by_record_id_v2("findPathIncludingSourceByRecordID_V2", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text, max_degree: int, excluded_records: text, required_data_sources: text, flags: int64);
    growable find_network_by_entity_id("findNetworkByEntityID", entity_list: text, max_degree: int, build_out_degree: int, max_entities: int);
    growable find_network_by_entity_id_v2("findNetworkByEntityID_V2", entity_list: text, max_degree: int, build_out_degree: int, max_entities: int, flags: int64);
    growable find_network_by_record_id("findNetworkByRecordID", record_list: text, max_degree: int, build_out_degree: int, max_entities: int);
    growable find_network_by_record_id_v2("findNetworkByRecordID_V2", record_list: text, max_degree: int, build_out_degree: int, max_entities: int, flags: int64);
    growable find_interesting_entities_by_entity_id("findInterestingEntitiesByEntityID", entity_id: int64, flags: int64);
    growable find_interesting_entities_by_record_id("findInterestingEntitiesByRecordID", data_source_code: text, record_id: text, flags: int64);

    // Explanations

    growable why_entities("whyEntities", entity_id_1: int64, entity_id_2: int64);
    growable why_entities_v2("whyEntities_V2", entity_id_1: int64, entity_id_2: int64, flags: int64);
    growable why_entity_by_entity_id("whyEntityByEntityID", entity_id: int64);
    growable why_entity_by_entity_id_v2("whyEntityByEntityID_V2", entity_id: int64, flags: int64);
    growable why_entity_by_record_id("whyEntityByRecordID", data_source_code: text, record_id: text);
    growable why_entity_by_record_id_v2("whyEntityByRecordID_V2", data_source_code: text, record_id: text, flags: int64);
    growable why_records("whyRecords", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text);
    growable why_records_v2("whyRecords_V2", data_source_code_1: text, record_id_1: text, data_source_code_2: text, record_id_2: text, flags: int64);
    growable how_entity_by_entity_id("howEntityByEntityID", entity_id: int64);
    growable how_entity_by_entity_id_v2("howEntityByEntityID_V2", entity_id: int64, flags: int64);

    // Repository

    growable stats("stats");
    growable export_config("exportConfig");
    id get_active_config_id("getActiveConfigID");
    id get_repository_last_modified_time("getRepositoryLastModifiedTime");
    status prime_engine("primeEngine");
    status purge_repository("purgeRepository");

    // Export

    handle(ExportHandle) export_json_entity_report("exportJSONEntityReport", flags: int64);
    handle(ExportHandle) export_csv_entity_report("exportCSVEntityReport", csv_column_list: text, flags: int64);
    /// Next page of an export. An empty page marks the end.
    fixed(export_page) fetch_next("fetchNext", response_handle: export);
    status close_export("closeExport", response_handle: export);
}

/// Engine-assigned record ID plus the with-info response.
#[derive(Debug)]
pub struct RecordIdWithInfo {
    pub record_id: FixedBuffer,
    pub with_info: ResponseBuffer,
}

/// Exported configuration plus the ID it is registered under.
#[derive(Debug)]
pub struct ConfigWithId {
    pub config: ResponseBuffer,
    pub config_id: i64,
}

/// Processed redo record plus the with-info response.
#[derive(Debug)]
pub struct RedoWithInfo {
    pub response: ResponseBuffer,
    pub with_info: ResponseBuffer,
}

impl Engine {
    /// Initialize against a specific configuration.
    pub fn init_with_config_id(
        &self,
        module_name: &str,
        ini_params: &str,
        config_id: i64,
        verbose_logging: bool,
    ) -> Result<StatusCode, BridgeError> {
        self.core
            .init_with_config_id(module_name, ini_params, config_id, verbose_logging)
    }

    /// Switch the running engine to another configuration.
    pub fn reinit(&self, config_id: i64) -> Result<StatusCode, BridgeError> {
        self.core.reinit(config_id)
    }

    /// `G2_addRecordWithInfoWithReturnedRecordID`: a fixed record-ID buffer
    /// and a growable with-info buffer in one call.
    pub fn add_record_with_info_with_returned_record_id(
        &self,
        data_source_code: &str,
        json_data: &str,
        load_id: &str,
        flags: i64,
    ) -> Result<CallResult<RecordIdWithInfo>, BridgeError> {
        self.core
            .ensure_active("add_record_with_info_with_returned_record_id")?;
        let data_source_code = to_c_string("data_source_code", data_source_code)?;
        let json_data = to_c_string("json_data", json_data)?;
        let load_id = to_c_string("load_id", load_id)?;
        let symbol = "G2_addRecordWithInfoWithReturnedRecordID";

        type Native = unsafe extern "C" fn(
            *const c_char,
            *const c_char,
            *const c_char,
            c_longlong,
            *mut c_char,
            usize,
            *mut *mut c_char,
            *mut usize,
            ResizeFn,
        ) -> c_int;
        // SAFETY: prototype above.
        let native = unsafe { self.core.entry::<Native>(symbol)? };

        let mut record_id = FixedBuffer::with_capacity(self.core.buffers().record_id);
        let mut with_info = ResponseBuffer::new(*self.core.resizer());
        let (info_buf, info_size) = with_info.slots();
        let record_id_buf = record_id.as_mut_ptr();
        let record_id_capacity = record_id.capacity();
        let resize = self.core.resizer().resize_fn();

        let status = call_status(|| unsafe {
            native(
                data_source_code.as_ptr(),
                json_data.as_ptr(),
                load_id.as_ptr(),
                flags,
                record_id_buf,
                record_id_capacity,
                info_buf,
                info_size,
                resize,
            )
        });
        self.core.finish_call(symbol, status);

        Ok(CallResult::new(
            status,
            RecordIdWithInfo {
                record_id,
                with_info,
            },
        ))
    }

    /// `G2_exportConfigAndConfigID`: growable config text, then the ID.
    pub fn export_config_and_config_id(&self) -> Result<CallResult<ConfigWithId>, BridgeError> {
        self.core.ensure_active("export_config_and_config_id")?;
        let symbol = "G2_exportConfigAndConfigID";

        type Native =
            unsafe extern "C" fn(*mut *mut c_char, *mut usize, ResizeFn, *mut c_longlong) -> c_int;
        // SAFETY: prototype above.
        let native = unsafe { self.core.entry::<Native>(symbol)? };

        let mut config = ResponseBuffer::new(*self.core.resizer());
        let mut config_id: c_longlong = 0;
        let (buf, size) = config.slots();
        let resize = self.core.resizer().resize_fn();

        let status = call_status(|| unsafe { native(buf, size, resize, &mut config_id) });
        self.core.finish_call(symbol, status);

        Ok(CallResult::new(status, ConfigWithId { config, config_id }))
    }

    /// `G2_processRedoRecordWithInfo`: two growable buffers sharing one
    /// resize callback.
    pub fn process_redo_record_with_info(
        &self,
        flags: i64,
    ) -> Result<CallResult<RedoWithInfo>, BridgeError> {
        self.core.ensure_active("process_redo_record_with_info")?;
        let symbol = "G2_processRedoRecordWithInfo";

        type Native = unsafe extern "C" fn(
            c_longlong,
            *mut *mut c_char,
            *mut usize,
            *mut *mut c_char,
            *mut usize,
            ResizeFn,
        ) -> c_int;
        // SAFETY: prototype above.
        let native = unsafe { self.core.entry::<Native>(symbol)? };

        let mut response = ResponseBuffer::new(*self.core.resizer());
        let mut with_info = ResponseBuffer::new(*self.core.resizer());
        let (response_buf, response_size) = response.slots();
        let (info_buf, info_size) = with_info.slots();
        let resize = self.core.resizer().resize_fn();

        let status = call_status(|| unsafe {
            native(
                flags,
                response_buf,
                response_size,
                info_buf,
                info_size,
                resize,
            )
        });
        self.core.finish_call(symbol, status);

        Ok(CallResult::new(
            status,
            RedoWithInfo {
                response,
                with_info,
            },
        ))
    }
}
