//! Diagnostic Component (`G2Diagnostic_*`)

use crate::error::BridgeError;
use crate::handle::EntityListHandle;
use crate::status::StatusCode;

native_component! {
    /// Repository statistics, entity internals and host information.
    pub struct Diagnostic {
        component: "diagnostic",
        prefix: "G2Diagnostic",
        extra: [
            "initWithConfigID" => status,
            "reinit" => status,
        ],
    }

    growable check_db_perf("checkDBPerf", seconds_to_run: int);
    growable get_db_info("getDBInfo");
    growable get_data_source_counts("getDataSourceCounts");
    growable get_entity_details("getEntityDetails", entity_id: int64, include_internal_features: int);
    growable get_entity_resume("getEntityResume", entity_id: int64);
    growable get_entity_size_breakdown("getEntitySizeBreakdown", minimum_entity_size: size, include_internal_features: int);
    growable get_feature("getFeature", lib_feat_id: int64);
    growable get_generic_features("getGenericFeatures", feature_type: text, maximum_estimated_count: size);
    growable get_mapping_statistics("getMappingStatistics", include_internal_features: int);
    growable get_relationship_details("getRelationshipDetails", relationship_id: int64, include_internal_features: int);
    growable get_resolution_statistics("getResolutionStatistics");
    growable find_entities_by_feature_ids("findEntitiesByFeatureIDs", features: text);

    /// Iterator over entities of exactly `entity_size` records.
    handle(EntityListHandle) get_entity_list_by_size("getEntityListBySize", entity_size: size);
    /// Next page of an entity list. An empty page marks the end.
    fixed(entity_page) fetch_next_entity_by_size("fetchNextEntityBySize", entity_list_handle: entity_list);
    status close_entity_list_by_size("closeEntityListBySize", entity_list_handle: entity_list);

    code get_logical_cores("getLogicalCores");
    code get_physical_cores("getPhysicalCores");
    count get_available_memory("getAvailableMemory");
    count get_total_system_memory("getTotalSystemMemory");
}

impl Diagnostic {
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

    pub fn reinit(&self, config_id: i64) -> Result<StatusCode, BridgeError> {
        self.core.reinit(config_id)
    }
}
