//! Configuration Component (`G2Config_*`)

use std::io::Write;

use crate::error::BridgeError;
use crate::handle::ConfigHandle;
use crate::status::{CallResult, StatusCode};

native_component! {
    /// In-memory configuration documents, addressed by handle.
    pub struct Configuration {
        component: "config",
        prefix: "G2Config",
        extra: [],
    }

    /// New configuration from the built-in template.
    handle(ConfigHandle) create("create");
    /// Configuration parsed from JSON.
    handle(ConfigHandle) load("load", json_config: text);
    growable save("save", config_handle: config);
    status close("close", config_handle: config);
    growable add_data_source("addDataSource", config_handle: config, input_json: text);
    status delete_data_source("deleteDataSource", config_handle: config, input_json: text);
    growable list_data_sources("listDataSources", config_handle: config);
}

impl Configuration {
    /// [`Configuration::create`], printing the handle slot before and the
    /// resulting handle after the call to standard output.
    pub fn create_debug(&self) -> Result<CallResult<ConfigHandle>, BridgeError> {
        self.create_debug_to(&mut std::io::stdout().lock())
    }

    /// [`Configuration::create_debug`], writing to `out`.
    pub fn create_debug_to<W: Write>(&self, out: &mut W) -> Result<CallResult<ConfigHandle>, BridgeError> {
        debug_line(out, format_args!("G2Config_create: handle before call: {}", ConfigHandle::from_raw(0)));
        let result = self.create()?;
        debug_line(
            out,
            format_args!(
                "G2Config_create: handle after call: {}, return code: {}",
                result.payload, result.status
            ),
        );
        Ok(result)
    }

    /// [`Configuration::close`], printing the handle before and the status
    /// after the call to standard output.
    pub fn close_debug(&self, config_handle: ConfigHandle) -> Result<StatusCode, BridgeError> {
        self.close_debug_to(config_handle, &mut std::io::stdout().lock())
    }

    /// [`Configuration::close_debug`], writing to `out`.
    pub fn close_debug_to<W: Write>(
        &self,
        config_handle: ConfigHandle,
        out: &mut W,
    ) -> Result<StatusCode, BridgeError> {
        debug_line(out, format_args!("G2Config_close: closing handle {}", config_handle));
        let status = self.close(config_handle)?;
        debug_line(
            out,
            format_args!("G2Config_close: closed handle {}, return code: {}", config_handle, status),
        );
        Ok(status)
    }
}

/// Debug output never fails the call it describes.
fn debug_line<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{}", line) {
        tracing::debug!(error = %e, "debug output dropped");
    }
}
