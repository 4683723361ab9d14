//! Export Report Iteration

use crate::error::BridgeError;
use crate::handle::ExportHandle;
use crate::status::StatusCode;

use super::Engine;

/// Pages of an entity export.
///
/// Yields one page per [`Engine::fetch_next`] call until the engine returns
/// an empty page or an error. The export handle is closed exactly once,
/// either explicitly through [`ExportReport::close`] or on drop.
pub struct ExportReport<'a> {
    engine: &'a Engine,
    handle: Option<ExportHandle>,
    finished: bool,
}

impl<'a> ExportReport<'a> {
    /// Take ownership of an open export handle.
    pub fn new(engine: &'a Engine, handle: ExportHandle) -> Self {
        Self {
            engine,
            handle: Some(handle),
            finished: false,
        }
    }

    pub fn handle(&self) -> Option<ExportHandle> {
        self.handle
    }

    /// Close the export now and report the native status.
    pub fn close(mut self) -> Result<StatusCode, BridgeError> {
        match self.handle.take() {
            Some(handle) => self.engine.close_export(handle),
            None => Ok(StatusCode::SUCCESS),
        }
    }
}

impl Iterator for ExportReport<'_> {
    type Item = Result<String, BridgeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let handle = self.handle?;

        let result = match self.engine.fetch_next(handle) {
            Ok(result) => result,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        // fetchNext reports errors as negative values
        let page = match self.engine.core().check_nonnegative("fetch_next", result) {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        };

        if page.is_empty() {
            self.finished = true;
            return None;
        }
        Some(Ok(page.to_string_lossy().into_owned()))
    }
}

impl Drop for ExportReport<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            match self.engine.close_export(handle) {
                Ok(status) if status.is_success() => {}
                Ok(status) => {
                    tracing::warn!(%handle, status = status.code(), "closing export failed")
                }
                Err(e) => tracing::warn!(%handle, error = %e, "closing export failed"),
            }
        }
    }
}

impl Engine {
    /// Start a JSON entity export.
    pub fn export_json(&self, flags: i64) -> Result<ExportReport<'_>, BridgeError> {
        let result = self.export_json_entity_report(flags)?;
        let handle = self.check("export_json_entity_report", result)?;
        Ok(ExportReport::new(self, handle))
    }

    /// Start a CSV entity export with the given column list.
    pub fn export_csv(
        &self,
        csv_column_list: &str,
        flags: i64,
    ) -> Result<ExportReport<'_>, BridgeError> {
        let result = self.export_csv_entity_report(csv_column_list, flags)?;
        let handle = self.check("export_csv_entity_report", result)?;
        Ok(ExportReport::new(self, handle))
    }
}
