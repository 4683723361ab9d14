//! Configuration Manager Component (`G2ConfigMgr_*`)

native_component! {
    /// Persisted configurations and the repository's default configuration.
    pub struct ConfigManager {
        component: "config_manager",
        prefix: "G2ConfigMgr",
        extra: [],
    }

    /// Store a configuration document; returns its new ID.
    id add_config("addConfig", config_str: text, config_comments: text);
    growable get_config("getConfig", config_id: int64);
    growable get_config_list("getConfigList");
    id get_default_config_id("getDefaultConfigID");
    status set_default_config_id("setDefaultConfigID", config_id: int64);
    /// Compare-and-swap of the default configuration ID.
    status replace_default_config_id("replaceDefaultConfigID", old_config_id: int64, new_config_id: int64);
}
