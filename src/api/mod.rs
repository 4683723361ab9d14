//! Native Components
//!
//! One struct per native component (engine, configuration, configuration
//! manager, diagnostic, product). Each is generated from a declaration
//! table by [`native_component!`]: every row names a Rust method, the native
//! symbol suffix, the calling shape, and the scalar arguments.
//!
//! # Argument kinds
//!
//! | kind          | Rust type          | native type     |
//! |---------------|--------------------|-----------------|
//! | `text`        | `&str`             | `const char *`  |
//! | `int64`       | `i64`              | `long long`     |
//! | `int`         | `i32`              | `int`           |
//! | `size`        | `usize`            | `size_t`        |
//! | `config`      | `ConfigHandle`     | `void *`        |
//! | `export`      | `ExportHandle`     | `void *`        |
//! | `entity_list` | `EntityListHandle` | `void *`        |
//!
//! # Shapes
//!
//! Raw methods forward the native status verbatim inside a
//! [`CallResult`]; they only fail locally (symbol missing, interior NUL,
//! component destroyed). Use [`Component::check`] to turn a non-success
//! status into [`BridgeError::Native`].

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_longlong};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::buffer::{call_fixed, call_status, FixedBuffer, Resizer};
use crate::config::BufferConfig;
use crate::error::BridgeError;
use crate::ffi::{EntryPointRegistry, NativeLibrary};
use crate::status::{CallResult, StatusCode};

macro_rules! arg_type {
    (text) => { &str };
    (int64) => { i64 };
    (int) => { i32 };
    (size) => { usize };
    (config) => { $crate::handle::ConfigHandle };
    (export) => { $crate::handle::ExportHandle };
    (entity_list) => { $crate::handle::EntityListHandle };
}

macro_rules! native_type {
    (text) => { *const ::std::os::raw::c_char };
    (int64) => { ::std::os::raw::c_longlong };
    (int) => { ::std::os::raw::c_int };
    (size) => { usize };
    (config) => { *mut ::std::ffi::c_void };
    (export) => { *mut ::std::ffi::c_void };
    (entity_list) => { *mut ::std::ffi::c_void };
}

/// Convert an argument into something that outlives the native call.
macro_rules! hold_arg {
    (text, $name:ident) => {
        let $name = $crate::api::to_c_string(stringify!($name), $name)?;
    };
    ($kind:ident, $name:ident) => {};
}

macro_rules! pass_arg {
    (text, $name:ident) => { $name.as_ptr() };
    (int64, $name:ident) => { $name };
    (int, $name:ident) => { $name };
    (size, $name:ident) => { $name };
    ($handle:ident, $name:ident) => { $name.as_ptr() };
}

macro_rules! entry_shape {
    (status) => { $crate::ffi::EntryShape::Status };
    (code) => { $crate::ffi::EntryShape::Code };
    (count) => { $crate::ffi::EntryShape::Count };
    (void) => { $crate::ffi::EntryShape::Void };
    (growable) => { $crate::ffi::EntryShape::Growable };
    (fixed) => { $crate::ffi::EntryShape::Fixed };
    (handle) => { $crate::ffi::EntryShape::Handle };
    (id) => { $crate::ffi::EntryShape::Id };
    (text) => { $crate::ffi::EntryShape::Text };
    (composite) => { $crate::ffi::EntryShape::Composite };
}

/// One generated method per calling shape.
macro_rules! entry_method {
    ($(#[$meta:meta])* status $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<$crate::status::StatusCode, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn($(native_type!($kind)),*) -> ::std::os::raw::c_int>($symbol)?
            };
            let status = $crate::buffer::call_status(|| unsafe { native($(pass_arg!($kind, $arg)),*) });
            self.core.finish_call($symbol, status);
            Ok(status)
        }
    };

    ($(#[$meta:meta])* code $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<i64, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn($(native_type!($kind)),*) -> ::std::os::raw::c_int>($symbol)?
            };
            let value = unsafe { native($(pass_arg!($kind, $arg)),*) };
            self.core.finish_call($symbol, $crate::status::StatusCode::from(value));
            Ok(i64::from(value))
        }
    };

    ($(#[$meta:meta])* count $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<i64, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn($(native_type!($kind)),*) -> ::std::os::raw::c_longlong>($symbol)?
            };
            let value = unsafe { native($(pass_arg!($kind, $arg)),*) };
            self.core.finish_call($symbol, $crate::status::StatusCode::new(value));
            Ok(value)
        }
    };

    ($(#[$meta:meta])* text $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<String, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn($(native_type!($kind)),*) -> *const ::std::os::raw::c_char>($symbol)?
            };
            // SAFETY: the library keeps the returned string alive; it is
            // copied before anything else is called.
            let text = unsafe { $crate::api::copy_library_string(native($(pass_arg!($kind, $arg)),*)) };
            self.core.finish_call($symbol, $crate::status::StatusCode::SUCCESS);
            Ok(text)
        }
    };

    ($(#[$meta:meta])* growable $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<$crate::status::CallResult<$crate::buffer::ResponseBuffer>, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn(
                    $(native_type!($kind),)*
                    *mut *mut ::std::os::raw::c_char,
                    *mut usize,
                    $crate::buffer::ResizeFn,
                ) -> ::std::os::raw::c_int>($symbol)?
            };
            let result = $crate::buffer::call_growable(self.core.resizer(), |buf, size, resize| unsafe {
                native($(pass_arg!($kind, $arg),)* buf, size, resize)
            });
            self.core.finish_call($symbol, result.status);
            Ok(result)
        }
    };

    ($(#[$meta:meta])* fixed($capacity:ident) $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<$crate::status::CallResult<$crate::buffer::FixedBuffer>, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn(
                    $(native_type!($kind),)*
                    *mut ::std::os::raw::c_char,
                    usize,
                ) -> ::std::os::raw::c_int>($symbol)?
            };
            let result = $crate::buffer::call_fixed(self.core.buffers().$capacity, |buf, capacity| unsafe {
                native($(pass_arg!($kind, $arg),)* buf, capacity)
            });
            self.core.finish_call($symbol, result.status);
            Ok(result)
        }
    };

    ($(#[$meta:meta])* handle($handle:ident) $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<$crate::status::CallResult<$handle>, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn(
                    $(native_type!($kind),)*
                    *mut *mut ::std::ffi::c_void,
                ) -> ::std::os::raw::c_int>($symbol)?
            };
            let result: $crate::status::CallResult<$handle> = $crate::buffer::call_handle(|slot| unsafe {
                native($(pass_arg!($kind, $arg),)* slot)
            });
            self.core.finish_call($symbol, result.status);
            Ok(result)
        }
    };

    ($(#[$meta:meta])* id $method:ident($symbol:expr $(, $arg:ident : $kind:ident)*)) => {
        $(#[$meta])*
        pub fn $method(&self $(, $arg: arg_type!($kind))*)
            -> Result<$crate::status::CallResult<i64>, $crate::error::BridgeError>
        {
            self.core.ensure_active(stringify!($method))?;
            $( hold_arg!($kind, $arg); )*
            // SAFETY: prototype fixed by the declaration table.
            let native = unsafe {
                self.core.entry::<unsafe extern "C" fn(
                    $(native_type!($kind),)*
                    *mut ::std::os::raw::c_longlong,
                ) -> ::std::os::raw::c_int>($symbol)?
            };
            let result = $crate::buffer::call_id(|id| unsafe {
                native($(pass_arg!($kind, $arg),)* id)
            });
            self.core.finish_call($symbol, result.status);
            Ok(result)
        }
    };
}

/// Generate a component struct, its entry point table, and one method per
/// declared entry point.
///
/// ```ignore
/// native_component! {
///     /// Product information.
///     pub struct Product {
///         component: "product",
///         prefix: "G2Product",
///         extra: [],
///     }
///
///     /// Library version JSON.
///     text version("version");
///     growable validate_license_file("validateLicenseFile", license_file_path: text);
/// }
/// ```
macro_rules! native_component {
    (
        $(#[$struct_meta:meta])*
        pub struct $name:ident {
            component: $component:literal,
            prefix: $prefix:literal,
            extra: [ $( $extra_symbol:literal => $extra_shape:ident ),* $(,)? ],
        }

        $(
            $(#[$meta:meta])*
            $shape:ident $(($param:ident))? $method:ident ( $symbol:literal $(, $arg:ident : $kind:ident)* $(,)? );
        )*
    ) => {
        $(#[$struct_meta])*
        pub struct $name {
            core: $crate::api::Component,
        }

        impl $name {
            /// Component name used in errors and logs.
            pub const COMPONENT: &'static str = $component;

            /// Symbol prefix of this component's entry points.
            pub const PREFIX: &'static str = $prefix;

            /// Every entry point this component calls.
            pub const ENTRY_POINTS: &'static [$crate::ffi::EntryPoint] = &[
                $crate::ffi::EntryPoint::new($component, concat!($prefix, "_init"), $crate::ffi::EntryShape::Status),
                $crate::ffi::EntryPoint::new($component, concat!($prefix, "_destroy"), $crate::ffi::EntryShape::Status),
                $crate::ffi::EntryPoint::new($component, concat!($prefix, "_getLastException"), $crate::ffi::EntryShape::Fixed),
                $crate::ffi::EntryPoint::new($component, concat!($prefix, "_getLastExceptionCode"), $crate::ffi::EntryShape::Code),
                $crate::ffi::EntryPoint::new($component, concat!($prefix, "_clearLastException"), $crate::ffi::EntryShape::Void),
                $( $crate::ffi::EntryPoint::new($component, concat!($prefix, "_", $extra_symbol), entry_shape!($extra_shape)), )*
                $( $crate::ffi::EntryPoint::new($component, concat!($prefix, "_", $symbol), entry_shape!($shape)), )*
            ];

            pub fn new(
                library: ::std::sync::Arc<$crate::ffi::NativeLibrary>,
                resizer: $crate::buffer::Resizer,
                buffers: $crate::config::BufferConfig,
            ) -> Self {
                Self {
                    core: $crate::api::Component::new($component, $prefix, library, resizer, buffers),
                }
            }

            /// Shared lifecycle and exception handling.
            pub fn core(&self) -> &$crate::api::Component {
                &self.core
            }

            /// Initialize the native component.
            pub fn init(
                &self,
                module_name: &str,
                ini_params: &str,
                verbose_logging: bool,
            ) -> Result<$crate::status::StatusCode, $crate::error::BridgeError> {
                self.core.init(module_name, ini_params, verbose_logging)
            }

            /// Release the native component. Later calls fail locally.
            pub fn destroy(&self) -> Result<$crate::status::StatusCode, $crate::error::BridgeError> {
                self.core.destroy()
            }

            pub fn is_destroyed(&self) -> bool {
                self.core.is_destroyed()
            }

            /// Text of the last native exception.
            pub fn last_exception(&self) -> Result<String, $crate::error::BridgeError> {
                self.core.last_exception()
            }

            pub fn last_exception_code(&self) -> Result<i64, $crate::error::BridgeError> {
                self.core.last_exception_code()
            }

            pub fn clear_last_exception(&self) -> Result<(), $crate::error::BridgeError> {
                self.core.clear_last_exception()
            }

            /// Report every later native call of this component to
            /// `observer`. Returns false if its ID is already registered.
            pub fn register_observer(
                &self,
                observer: ::std::sync::Arc<dyn $crate::api::Observer>,
            ) -> bool {
                self.core.observers().register(observer)
            }

            pub fn unregister_observer(&self, observer_id: &str) -> bool {
                self.core.observers().unregister(observer_id)
            }

            /// Tag later notifications with `origin`.
            pub fn set_observer_origin(&self, origin: &str) {
                self.core.observers().set_origin(origin)
            }

            pub fn observer_origin(&self) -> Option<String> {
                self.core.observers().origin()
            }

            /// Payload of a successful call, or the native failure with its
            /// exception text.
            pub fn check<T>(
                &self,
                operation: &'static str,
                result: $crate::status::CallResult<T>,
            ) -> Result<T, $crate::error::BridgeError> {
                self.core.check(operation, result)
            }

            $(
                entry_method! {
                    $(#[$meta])*
                    $shape $(($param))? $method(concat!($prefix, "_", $symbol) $(, $arg: $kind)*)
                }
            )*
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("library", &self.core.library().label())
                    .field("destroyed", &self.core.is_destroyed())
                    .finish()
            }
        }
    };
}

mod config_manager;
mod configuration;
mod diagnostic;
mod engine;
mod export;
mod observer;
mod product;

pub use config_manager::ConfigManager;
pub use configuration::Configuration;
pub use diagnostic::Diagnostic;
pub use engine::{ConfigWithId, Engine, RecordIdWithInfo, RedoWithInfo};
pub use export::ExportReport;
pub use observer::{Notification, Observer, ObserverRegistry};
pub use product::Product;

/// Registry of every entry point the components call.
pub fn entry_points() -> EntryPointRegistry {
    let mut registry = EntryPointRegistry::new();
    registry.register_all(Engine::ENTRY_POINTS);
    registry.register_all(Configuration::ENTRY_POINTS);
    registry.register_all(ConfigManager::ENTRY_POINTS);
    registry.register_all(Diagnostic::ENTRY_POINTS);
    registry.register_all(Product::ENTRY_POINTS);
    registry
}

/// Copy a string argument for the native call.
pub(crate) fn to_c_string(name: &'static str, value: &str) -> Result<CString, BridgeError> {
    CString::new(value).map_err(|e| BridgeError::InvalidString {
        name,
        reason: format!("interior NUL at byte {}", e.nul_position()),
    })
}

/// Copy a library-owned C string. Null reads as empty.
///
/// # Safety
///
/// `ptr` must be null or a valid NUL-terminated string.
pub(crate) unsafe fn copy_library_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// State shared by every component: the library, the resize capability,
/// fixed buffer capacities, observers, and the destroyed flag.
pub struct Component {
    name: &'static str,
    prefix: &'static str,
    library: Arc<NativeLibrary>,
    resizer: Resizer,
    buffers: BufferConfig,
    observers: ObserverRegistry,
    destroyed: AtomicBool,
}

impl Component {
    pub fn new(
        name: &'static str,
        prefix: &'static str,
        library: Arc<NativeLibrary>,
        resizer: Resizer,
        buffers: BufferConfig,
    ) -> Self {
        Self {
            name,
            prefix,
            library,
            resizer,
            buffers,
            observers: ObserverRegistry::new(),
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn library(&self) -> &Arc<NativeLibrary> {
        &self.library
    }

    pub fn resizer(&self) -> &Resizer {
        &self.resizer
    }

    pub fn buffers(&self) -> &BufferConfig {
        &self.buffers
    }

    /// Full symbol name for an operation of this component.
    pub fn symbol(&self, operation: &str) -> String {
        format!("{}_{}", self.prefix, operation)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Fail locally once the component has been destroyed.
    pub fn ensure_active(&self, operation: &'static str) -> Result<(), BridgeError> {
        if self.is_destroyed() {
            return Err(BridgeError::Destroyed {
                component: self.name,
                operation,
            });
        }
        Ok(())
    }

    /// Resolve an entry point as a typed function pointer.
    ///
    /// # Safety
    ///
    /// `F` must match the native prototype of `symbol`.
    pub unsafe fn entry<F: Copy>(&self, symbol: &str) -> Result<F, BridgeError> {
        self.library.entry(symbol)
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub(crate) fn trace(&self, symbol: &str, status: StatusCode) {
        tracing::trace!(component = self.name, symbol, status = status.code(), "native call");
    }

    /// Trace a completed call and notify observers.
    ///
    /// Exception reads and clears are traced only; they are bookkeeping for
    /// the call that failed.
    pub(crate) fn finish_call(&self, symbol: &str, status: StatusCode) {
        self.trace(symbol, status);
        self.observers.notify(self.name, symbol, status);
    }

    /// `{prefix}_init(moduleName, iniParams, verboseLogging)`
    pub fn init(
        &self,
        module_name: &str,
        ini_params: &str,
        verbose_logging: bool,
    ) -> Result<StatusCode, BridgeError> {
        let module_name = to_c_string("module_name", module_name)?;
        let ini_params = to_c_string("ini_params", ini_params)?;
        let symbol = self.symbol("init");
        // SAFETY: int init(const char *, const char *, const int)
        let native = unsafe {
            self.entry::<unsafe extern "C" fn(*const c_char, *const c_char, c_int) -> c_int>(&symbol)?
        };
        let status = call_status(|| unsafe {
            native(
                module_name.as_ptr(),
                ini_params.as_ptr(),
                c_int::from(verbose_logging),
            )
        });
        self.after_init(&symbol, status);
        Ok(status)
    }

    /// `{prefix}_initWithConfigID(moduleName, iniParams, initConfigID, verboseLogging)`
    pub fn init_with_config_id(
        &self,
        module_name: &str,
        ini_params: &str,
        config_id: i64,
        verbose_logging: bool,
    ) -> Result<StatusCode, BridgeError> {
        let module_name = to_c_string("module_name", module_name)?;
        let ini_params = to_c_string("ini_params", ini_params)?;
        let symbol = self.symbol("initWithConfigID");
        // SAFETY: int initWithConfigID(const char *, const char *, const long long, const int)
        let native = unsafe {
            self.entry::<unsafe extern "C" fn(*const c_char, *const c_char, c_longlong, c_int) -> c_int>(
                &symbol,
            )?
        };
        let status = call_status(|| unsafe {
            native(
                module_name.as_ptr(),
                ini_params.as_ptr(),
                config_id,
                c_int::from(verbose_logging),
            )
        });
        self.after_init(&symbol, status);
        Ok(status)
    }

    fn after_init(&self, symbol: &str, status: StatusCode) {
        self.finish_call(symbol, status);
        if status.is_success() {
            self.destroyed.store(false, Ordering::Release);
            tracing::debug!(component = self.name, "initialized");
        }
    }

    /// `{prefix}_reinit(initConfigID)`
    pub fn reinit(&self, config_id: i64) -> Result<StatusCode, BridgeError> {
        self.ensure_active("reinit")?;
        let symbol = self.symbol("reinit");
        // SAFETY: int reinit(const long long)
        let native = unsafe { self.entry::<unsafe extern "C" fn(c_longlong) -> c_int>(&symbol)? };
        let status = call_status(|| unsafe { native(config_id) });
        self.finish_call(&symbol, status);
        Ok(status)
    }

    /// `{prefix}_destroy()`. A successful destroy marks the component
    /// destroyed until the next successful init.
    pub fn destroy(&self) -> Result<StatusCode, BridgeError> {
        self.ensure_active("destroy")?;
        let symbol = self.symbol("destroy");
        // SAFETY: int destroy()
        let native = unsafe { self.entry::<unsafe extern "C" fn() -> c_int>(&symbol)? };
        let status = call_status(|| unsafe { native() });
        self.finish_call(&symbol, status);
        if status.is_success() {
            self.destroyed.store(true, Ordering::Release);
            tracing::debug!(component = self.name, "destroyed");
        }
        Ok(status)
    }

    /// `{prefix}_getLastException(buffer, bufSize)` into a fixed buffer.
    pub fn last_exception_buffer(&self) -> Result<CallResult<FixedBuffer>, BridgeError> {
        let symbol = self.symbol("getLastException");
        // SAFETY: int getLastException(char *, const size_t)
        let native =
            unsafe { self.entry::<unsafe extern "C" fn(*mut c_char, usize) -> c_int>(&symbol)? };
        let result = call_fixed(self.buffers.last_exception, |buf, capacity| unsafe {
            native(buf, capacity)
        });
        self.trace(&symbol, result.status);
        Ok(result)
    }

    /// Text of the last native exception.
    ///
    /// The native call reports the text length rather than a status, so
    /// only the buffer contents are returned.
    pub fn last_exception(&self) -> Result<String, BridgeError> {
        let result = self.last_exception_buffer()?;
        Ok(result.payload.to_string_lossy().into_owned())
    }

    /// `{prefix}_getLastExceptionCode()`
    pub fn last_exception_code(&self) -> Result<i64, BridgeError> {
        let symbol = self.symbol("getLastExceptionCode");
        // SAFETY: int getLastExceptionCode()
        let native = unsafe { self.entry::<unsafe extern "C" fn() -> c_int>(&symbol)? };
        let code = unsafe { native() };
        self.trace(&symbol, StatusCode::from(code));
        Ok(i64::from(code))
    }

    /// `{prefix}_clearLastException()`
    pub fn clear_last_exception(&self) -> Result<(), BridgeError> {
        let symbol = self.symbol("clearLastException");
        // SAFETY: void clearLastException()
        let native = unsafe { self.entry::<unsafe extern "C" fn()>(&symbol)? };
        unsafe { native() };
        self.trace(&symbol, StatusCode::SUCCESS);
        Ok(())
    }

    /// Payload of a successful call; otherwise [`BridgeError::Native`]
    /// carrying the last exception, which is then cleared.
    pub fn check<T>(&self, operation: &'static str, result: CallResult<T>) -> Result<T, BridgeError> {
        let (status, payload) = result.into_parts();
        if status.is_success() {
            return Ok(payload);
        }
        Err(self.native_error(operation, status))
    }

    /// [`Component::check`] for calls that return a bare status.
    pub fn check_status(&self, operation: &'static str, status: StatusCode) -> Result<(), BridgeError> {
        self.check(operation, CallResult::new(status, ()))
    }

    /// Like [`Component::check`], but only negative statuses are failures.
    pub fn check_nonnegative<T>(
        &self,
        operation: &'static str,
        result: CallResult<T>,
    ) -> Result<T, BridgeError> {
        let (status, payload) = result.into_parts();
        if !status.is_negative() {
            return Ok(payload);
        }
        Err(self.native_error(operation, status))
    }

    /// Build the native failure for `status`, consuming the last exception.
    pub fn native_error(&self, operation: &'static str, status: StatusCode) -> BridgeError {
        // Exception entry points may be missing from stripped-down
        // libraries; the status alone is still reported.
        let message = self.last_exception().unwrap_or_default();
        let exception_code = self.last_exception_code().unwrap_or(0);
        let _ = self.clear_last_exception();

        tracing::warn!(
            component = self.name,
            operation,
            status = status.code(),
            exception_code,
            %message,
            "native call failed"
        );

        BridgeError::Native {
            component: self.name,
            operation,
            status,
            exception_code,
            message,
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("library", &self.library.label())
            .field("observers", &self.observers.len())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
