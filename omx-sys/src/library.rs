// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Entry points of an OpenMAX IL core library, resolved at load time.

use std::os::raw::c_char;

use crate::component::OMX_CALLBACKTYPE;
use crate::types::*;

/// A loaded OpenMAX IL core library.
///
/// Every symbol is required: loading fails if any of them is missing.
pub struct OmxCoreLibrary {
    __library: ::libloading::Library,
    pub init: unsafe extern "C" fn() -> OMX_ERRORTYPE,
    pub deinit: unsafe extern "C" fn() -> OMX_ERRORTYPE,
    pub component_name_enum: unsafe extern "C" fn(
        cComponentName: OMX_STRING,
        nNameLength: OMX_U32,
        nIndex: OMX_U32,
    ) -> OMX_ERRORTYPE,
    pub get_handle: unsafe extern "C" fn(
        pHandle: *mut OMX_HANDLETYPE,
        cComponentName: *const c_char,
        pAppData: OMX_PTR,
        pCallBacks: *mut OMX_CALLBACKTYPE,
    ) -> OMX_ERRORTYPE,
    pub free_handle: unsafe extern "C" fn(hComponent: OMX_HANDLETYPE) -> OMX_ERRORTYPE,
}

impl OmxCoreLibrary {
    pub unsafe fn new<P>(path: P) -> Result<Self, ::libloading::Error>
    where
        P: AsRef<::std::ffi::OsStr>,
    {
        let library = unsafe { ::libloading::Library::new(path)? };
        unsafe { Self::from_library(library) }
    }

    pub unsafe fn from_library<L>(library: L) -> Result<Self, ::libloading::Error>
    where
        L: Into<::libloading::Library>,
    {
        let __library = library.into();
        let init = unsafe { __library.get(b"OMX_Init\0").map(|sym| *sym)? };
        let deinit = unsafe { __library.get(b"OMX_Deinit\0").map(|sym| *sym)? };
        let component_name_enum =
            unsafe { __library.get(b"OMX_ComponentNameEnum\0").map(|sym| *sym)? };
        let get_handle = unsafe { __library.get(b"OMX_GetHandle\0").map(|sym| *sym)? };
        let free_handle = unsafe { __library.get(b"OMX_FreeHandle\0").map(|sym| *sym)? };
        Ok(OmxCoreLibrary {
            __library,
            init,
            deinit,
            component_name_enum,
            get_handle,
            free_handle,
        })
    }

    pub unsafe fn init(&self) -> OMX_ERRORTYPE {
        unsafe { (self.init)() }
    }

    pub unsafe fn deinit(&self) -> OMX_ERRORTYPE {
        unsafe { (self.deinit)() }
    }

    pub unsafe fn component_name_enum(
        &self,
        cComponentName: OMX_STRING,
        nNameLength: OMX_U32,
        nIndex: OMX_U32,
    ) -> OMX_ERRORTYPE {
        unsafe { (self.component_name_enum)(cComponentName, nNameLength, nIndex) }
    }

    pub unsafe fn get_handle(
        &self,
        pHandle: *mut OMX_HANDLETYPE,
        cComponentName: *const c_char,
        pAppData: OMX_PTR,
        pCallBacks: *mut OMX_CALLBACKTYPE,
    ) -> OMX_ERRORTYPE {
        unsafe { (self.get_handle)(pHandle, cComponentName, pAppData, pCallBacks) }
    }

    pub unsafe fn free_handle(&self, hComponent: OMX_HANDLETYPE) -> OMX_ERRORTYPE {
        unsafe { (self.free_handle)(hComponent) }
    }
}
