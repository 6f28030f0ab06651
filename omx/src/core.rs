// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! OpenMAX IL core lifetime and component creation.
//!
//! This module provides [`OmxCore`], the entry point for talking to a loaded
//! core library. The core is initialised once per loaded library and
//! deinitialised when the last [`OmxCore`] clone and the last
//! [`Component`] created from it are gone.

use std::{
    collections::HashMap,
    ffi::{CStr, CString},
    os::raw::c_char,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock, Mutex, Weak},
};

use omx_sys::{OMX_ERRORTYPE, OMX_HANDLETYPE};

use crate::{
    Component, Error, EventHandler, Result,
    api::{OmxApiHandle, load_api},
    component::HandleOwner,
    event::CallbackContext,
};

/// Something that can create components by name.
///
/// Implemented by [`OmxCore`] for real cores and by
/// [`crate::emulated::EmulatedComponent`] for the in-process component.
pub trait ComponentLoader: Send + Sync {
    /// Creates the component `name`, delivering its events to `handler`.
    fn load(&self, name: &str, handler: Arc<dyn EventHandler>) -> Result<Component>;
}

/// Shared state of an initialised core.
///
/// Calls `OMX_Deinit` when the last reference is dropped.
pub(crate) struct CoreContext {
    api: OmxApiHandle,
}

impl Drop for CoreContext {
    fn drop(&mut self) {
        let code = unsafe { self.api.deinit() };
        if let Err(error) = Error::from_omx(code) {
            tracing::warn!(%error, "OMX_Deinit failed");
        }
    }
}

impl HandleOwner for CoreContext {
    unsafe fn free_handle(&self, handle: OMX_HANDLETYPE) -> OMX_ERRORTYPE {
        unsafe { self.api.free_handle(handle) }
    }
}

/// Cores opened through [`OmxCore::open`], keyed by library path.
static OPEN_CORES: LazyLock<Mutex<HashMap<PathBuf, Weak<CoreContext>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// An initialised OpenMAX IL core.
///
/// Cheap to clone; all clones share one `OMX_Init`/`OMX_Deinit` pair.
///
/// # Examples
///
/// ```no_run
/// use omx::{OmxCore, config::default_core_library};
///
/// # fn main() -> Result<(), omx::Error> {
/// let core = OmxCore::open(default_core_library())?;
/// for name in core.component_names()? {
///     println!("{name}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OmxCore {
    context: Arc<CoreContext>,
}

impl OmxCore {
    /// Initialises the core behind `api`.
    ///
    /// # Errors
    ///
    /// Returns the error `OMX_Init` reported.
    pub fn new(api: OmxApiHandle) -> Result<Self> {
        Error::from_omx(unsafe { api.init() })?;
        tracing::debug!("OpenMAX IL core initialised");
        Ok(OmxCore {
            context: Arc::new(CoreContext { api }),
        })
    }

    /// Loads and initialises the core library at `path`, or reuses the
    /// core already opened from that path in this process.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut cores = OPEN_CORES
            .lock()
            .map_err(|_| Error::Other("core registry poisoned".to_string()))?;
        if let Some(context) = cores.get(path).and_then(Weak::upgrade) {
            return Ok(OmxCore { context });
        }
        let core = OmxCore::new(load_api(path)?)?;
        cores.retain(|_, context| context.strong_count() > 0);
        cores.insert(path.to_path_buf(), Arc::downgrade(&core.context));
        Ok(core)
    }

    /// Names of every component the core offers.
    pub fn component_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut buffer = [0 as c_char; omx_sys::OMX_MAX_STRINGNAME_SIZE];
        for index in 0.. {
            let code = unsafe {
                self.context.api.component_name_enum(
                    buffer.as_mut_ptr(),
                    buffer.len() as u32,
                    index,
                )
            };
            if code == omx_sys::OMX_ErrorNoMore {
                break;
            }
            Error::from_omx(code)?;
            let name = unsafe { CStr::from_ptr(buffer.as_ptr()) };
            names.push(name.to_string_lossy().into_owned());
        }
        Ok(names)
    }

    /// Creates the component `name` with `OMX_GetHandle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ComponentNotFound`] (or whatever the core reports)
    /// when the component cannot be created.
    pub fn get_component(&self, name: &str, handler: Arc<dyn EventHandler>) -> Result<Component> {
        let c_name = CString::new(name)?;
        let mut callbacks = CallbackContext::new(handler);
        let app_data = callbacks.app_data();
        let table = callbacks.table();
        let mut handle: OMX_HANDLETYPE = std::ptr::null_mut();
        Error::from_omx(unsafe {
            self.context
                .api
                .get_handle(&mut handle, c_name.as_ptr(), app_data, table)
        })?;
        if handle.is_null() {
            return Err(Error::InvalidComponent);
        }
        tracing::debug!(component = name, "component handle created");
        Ok(Component::new(
            handle,
            name.to_string(),
            self.context.clone(),
            callbacks,
        ))
    }
}

impl ComponentLoader for OmxCore {
    fn load(&self, name: &str, handler: Arc<dyn EventHandler>) -> Result<Component> {
        self.get_component(name, handler)
    }
}
