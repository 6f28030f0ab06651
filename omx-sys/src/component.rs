// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Buffer header, callbacks and the component vtable (`OMX_Core.h`,
//! `OMX_Component.h`).

use crate::types::*;

/// `OMX_BUFFERHEADERTYPE`
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OMX_BUFFERHEADERTYPE {
    pub nSize: OMX_U32,
    pub nVersion: OMX_VERSIONTYPE,
    pub pBuffer: *mut OMX_U8,
    pub nAllocLen: OMX_U32,
    pub nFilledLen: OMX_U32,
    pub nOffset: OMX_U32,
    pub pAppPrivate: OMX_PTR,
    pub pPlatformPrivate: OMX_PTR,
    pub pInputPortPrivate: OMX_PTR,
    pub pOutputPortPrivate: OMX_PTR,
    pub hMarkTargetComponent: OMX_HANDLETYPE,
    pub pMarkData: OMX_PTR,
    pub nTickCount: OMX_U32,
    pub nTimeStamp: OMX_TICKS,
    pub nFlags: OMX_U32,
    pub nOutputPortIndex: OMX_U32,
    pub nInputPortIndex: OMX_U32,
}

impl Default for OMX_BUFFERHEADERTYPE {
    fn default() -> Self {
        OMX_BUFFERHEADERTYPE {
            nSize: 0,
            nVersion: OMX_VERSIONTYPE::default(),
            pBuffer: std::ptr::null_mut(),
            nAllocLen: 0,
            nFilledLen: 0,
            nOffset: 0,
            pAppPrivate: std::ptr::null_mut(),
            pPlatformPrivate: std::ptr::null_mut(),
            pInputPortPrivate: std::ptr::null_mut(),
            pOutputPortPrivate: std::ptr::null_mut(),
            hMarkTargetComponent: std::ptr::null_mut(),
            pMarkData: std::ptr::null_mut(),
            nTickCount: 0,
            nTimeStamp: 0,
            nFlags: 0,
            nOutputPortIndex: 0,
            nInputPortIndex: 0,
        }
    }
}

/// `OMX_TUNNELSETUPTYPE`
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct OMX_TUNNELSETUPTYPE {
    pub nTunnelFlags: OMX_U32,
    pub eSupplier: u32,
}

pub type OMX_EventHandlerFn = unsafe extern "C" fn(
    hComponent: OMX_HANDLETYPE,
    pAppData: OMX_PTR,
    eEvent: OMX_EVENTTYPE,
    nData1: OMX_U32,
    nData2: OMX_U32,
    pEventData: OMX_PTR,
) -> OMX_ERRORTYPE;

pub type OMX_BufferDoneFn = unsafe extern "C" fn(
    hComponent: OMX_HANDLETYPE,
    pAppData: OMX_PTR,
    pBuffer: *mut OMX_BUFFERHEADERTYPE,
) -> OMX_ERRORTYPE;

/// Callbacks a client hands to `OMX_GetHandle`.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct OMX_CALLBACKTYPE {
    pub EventHandler: Option<OMX_EventHandlerFn>,
    pub EmptyBufferDone: Option<OMX_BufferDoneFn>,
    pub FillBufferDone: Option<OMX_BufferDoneFn>,
}

/// Component vtable. A component handle (`OMX_HANDLETYPE`) points at one of
/// these.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OMX_COMPONENTTYPE {
    pub nSize: OMX_U32,
    pub nVersion: OMX_VERSIONTYPE,
    pub pComponentPrivate: OMX_PTR,
    pub pApplicationPrivate: OMX_PTR,
    pub GetComponentVersion: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            pComponentName: OMX_STRING,
            pComponentVersion: *mut OMX_VERSIONTYPE,
            pSpecVersion: *mut OMX_VERSIONTYPE,
            pComponentUUID: *mut OMX_UUIDTYPE,
        ) -> OMX_ERRORTYPE,
    >,
    pub SendCommand: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            Cmd: OMX_COMMANDTYPE,
            nParam1: OMX_U32,
            pCmdData: OMX_PTR,
        ) -> OMX_ERRORTYPE,
    >,
    pub GetParameter: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            nParamIndex: OMX_INDEXTYPE,
            pComponentParameterStructure: OMX_PTR,
        ) -> OMX_ERRORTYPE,
    >,
    pub SetParameter: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            nIndex: OMX_INDEXTYPE,
            pComponentParameterStructure: OMX_PTR,
        ) -> OMX_ERRORTYPE,
    >,
    pub GetConfig: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            nIndex: OMX_INDEXTYPE,
            pComponentConfigStructure: OMX_PTR,
        ) -> OMX_ERRORTYPE,
    >,
    pub SetConfig: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            nIndex: OMX_INDEXTYPE,
            pComponentConfigStructure: OMX_PTR,
        ) -> OMX_ERRORTYPE,
    >,
    pub GetExtensionIndex: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            cParameterName: OMX_STRING,
            pIndexType: *mut OMX_INDEXTYPE,
        ) -> OMX_ERRORTYPE,
    >,
    pub GetState: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            pState: *mut OMX_STATETYPE,
        ) -> OMX_ERRORTYPE,
    >,
    pub ComponentTunnelRequest: Option<
        unsafe extern "C" fn(
            hComp: OMX_HANDLETYPE,
            nPort: OMX_U32,
            hTunneledComp: OMX_HANDLETYPE,
            nTunneledPort: OMX_U32,
            pTunnelSetup: *mut OMX_TUNNELSETUPTYPE,
        ) -> OMX_ERRORTYPE,
    >,
    pub UseBuffer: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            ppBufferHdr: *mut *mut OMX_BUFFERHEADERTYPE,
            nPortIndex: OMX_U32,
            pAppPrivate: OMX_PTR,
            nSizeBytes: OMX_U32,
            pBuffer: *mut OMX_U8,
        ) -> OMX_ERRORTYPE,
    >,
    pub AllocateBuffer: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            ppBuffer: *mut *mut OMX_BUFFERHEADERTYPE,
            nPortIndex: OMX_U32,
            pAppPrivate: OMX_PTR,
            nSizeBytes: OMX_U32,
        ) -> OMX_ERRORTYPE,
    >,
    pub FreeBuffer: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            nPortIndex: OMX_U32,
            pBuffer: *mut OMX_BUFFERHEADERTYPE,
        ) -> OMX_ERRORTYPE,
    >,
    pub EmptyThisBuffer: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            pBuffer: *mut OMX_BUFFERHEADERTYPE,
        ) -> OMX_ERRORTYPE,
    >,
    pub FillThisBuffer: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            pBuffer: *mut OMX_BUFFERHEADERTYPE,
        ) -> OMX_ERRORTYPE,
    >,
    pub SetCallbacks: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            pCallbacks: *mut OMX_CALLBACKTYPE,
            pAppData: OMX_PTR,
        ) -> OMX_ERRORTYPE,
    >,
    pub ComponentDeInit: Option<unsafe extern "C" fn(hComponent: OMX_HANDLETYPE) -> OMX_ERRORTYPE>,
    pub UseEGLImage: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            ppBufferHdr: *mut *mut OMX_BUFFERHEADERTYPE,
            nPortIndex: OMX_U32,
            pAppPrivate: OMX_PTR,
            eglImage: *mut std::os::raw::c_void,
        ) -> OMX_ERRORTYPE,
    >,
    pub ComponentRoleEnum: Option<
        unsafe extern "C" fn(
            hComponent: OMX_HANDLETYPE,
            cRole: *mut OMX_U8,
            nIndex: OMX_U32,
        ) -> OMX_ERRORTYPE,
    >,
}

impl Default for OMX_COMPONENTTYPE {
    fn default() -> Self {
        OMX_COMPONENTTYPE {
            nSize: 0,
            nVersion: OMX_VERSIONTYPE::default(),
            pComponentPrivate: std::ptr::null_mut(),
            pApplicationPrivate: std::ptr::null_mut(),
            GetComponentVersion: None,
            SendCommand: None,
            GetParameter: None,
            SetParameter: None,
            GetConfig: None,
            SetConfig: None,
            GetExtensionIndex: None,
            GetState: None,
            ComponentTunnelRequest: None,
            UseBuffer: None,
            AllocateBuffer: None,
            FreeBuffer: None,
            EmptyThisBuffer: None,
            FillThisBuffer: None,
            SetCallbacks: None,
            ComponentDeInit: None,
            UseEGLImage: None,
            ComponentRoleEnum: None,
        }
    }
}
