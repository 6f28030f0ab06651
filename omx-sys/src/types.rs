// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Scalar typedefs, the version union and the core enumerants (`OMX_Types.h`,
//! `OMX_Core.h`, `OMX_Index.h`).

use std::os::raw::{c_char, c_void};

pub type OMX_U8 = u8;
pub type OMX_S8 = i8;
pub type OMX_U16 = u16;
pub type OMX_S16 = i16;
pub type OMX_U32 = u32;
pub type OMX_S32 = i32;
pub type OMX_U64 = u64;
pub type OMX_S64 = i64;
pub type OMX_TICKS = OMX_S64;

pub type OMX_BOOL = u32;
pub const OMX_FALSE: OMX_BOOL = 0;
pub const OMX_TRUE: OMX_BOOL = 1;

pub type OMX_PTR = *mut c_void;
pub type OMX_STRING = *mut c_char;
pub type OMX_HANDLETYPE = *mut c_void;
pub type OMX_NATIVE_DEVICETYPE = *mut c_void;
pub type OMX_NATIVE_WINDOWTYPE = *mut c_void;
pub type OMX_UUIDTYPE = [u8; 128];

/// Byte-wise view of [`OMX_VERSIONTYPE`].
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct OMX_VERSIONTYPE_PARTS {
    pub nVersionMajor: OMX_U8,
    pub nVersionMinor: OMX_U8,
    pub nRevision: OMX_U8,
    pub nStep: OMX_U8,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union OMX_VERSIONTYPE {
    pub s: OMX_VERSIONTYPE_PARTS,
    pub nVersion: OMX_U32,
}

impl Default for OMX_VERSIONTYPE {
    fn default() -> Self {
        OMX_VERSIONTYPE { nVersion: 0 }
    }
}

impl std::fmt::Debug for OMX_VERSIONTYPE {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Both members are plain integers covering the same four bytes.
        let s = unsafe { self.s };
        write!(
            f,
            "OMX_VERSIONTYPE({}.{}.{}.{})",
            s.nVersionMajor, s.nVersionMinor, s.nRevision, s.nStep
        )
    }
}

pub type OMX_ERRORTYPE = u32;
pub const OMX_ErrorNone: OMX_ERRORTYPE = 0;
pub const OMX_ErrorInsufficientResources: OMX_ERRORTYPE = 0x8000_1000;
pub const OMX_ErrorUndefined: OMX_ERRORTYPE = 0x8000_1001;
pub const OMX_ErrorInvalidComponentName: OMX_ERRORTYPE = 0x8000_1002;
pub const OMX_ErrorComponentNotFound: OMX_ERRORTYPE = 0x8000_1003;
pub const OMX_ErrorInvalidComponent: OMX_ERRORTYPE = 0x8000_1004;
pub const OMX_ErrorBadParameter: OMX_ERRORTYPE = 0x8000_1005;
pub const OMX_ErrorNotImplemented: OMX_ERRORTYPE = 0x8000_1006;
pub const OMX_ErrorUnderflow: OMX_ERRORTYPE = 0x8000_1007;
pub const OMX_ErrorOverflow: OMX_ERRORTYPE = 0x8000_1008;
pub const OMX_ErrorHardware: OMX_ERRORTYPE = 0x8000_1009;
pub const OMX_ErrorInvalidState: OMX_ERRORTYPE = 0x8000_100A;
pub const OMX_ErrorStreamCorrupt: OMX_ERRORTYPE = 0x8000_100B;
pub const OMX_ErrorPortsNotCompatible: OMX_ERRORTYPE = 0x8000_100C;
pub const OMX_ErrorResourcesLost: OMX_ERRORTYPE = 0x8000_100D;
pub const OMX_ErrorNoMore: OMX_ERRORTYPE = 0x8000_100E;
pub const OMX_ErrorVersionMismatch: OMX_ERRORTYPE = 0x8000_100F;
pub const OMX_ErrorNotReady: OMX_ERRORTYPE = 0x8000_1010;
pub const OMX_ErrorTimeout: OMX_ERRORTYPE = 0x8000_1011;
pub const OMX_ErrorSameState: OMX_ERRORTYPE = 0x8000_1012;
pub const OMX_ErrorResourcesPreempted: OMX_ERRORTYPE = 0x8000_1013;
pub const OMX_ErrorPortUnresponsiveDuringAllocation: OMX_ERRORTYPE = 0x8000_1014;
pub const OMX_ErrorPortUnresponsiveDuringDeallocation: OMX_ERRORTYPE = 0x8000_1015;
pub const OMX_ErrorPortUnresponsiveDuringStop: OMX_ERRORTYPE = 0x8000_1016;
pub const OMX_ErrorIncorrectStateTransition: OMX_ERRORTYPE = 0x8000_1017;
pub const OMX_ErrorIncorrectStateOperation: OMX_ERRORTYPE = 0x8000_1018;
pub const OMX_ErrorUnsupportedSetting: OMX_ERRORTYPE = 0x8000_1019;
pub const OMX_ErrorUnsupportedIndex: OMX_ERRORTYPE = 0x8000_101A;
pub const OMX_ErrorBadPortIndex: OMX_ERRORTYPE = 0x8000_101B;
pub const OMX_ErrorPortUnpopulated: OMX_ERRORTYPE = 0x8000_101C;
pub const OMX_ErrorComponentSuspended: OMX_ERRORTYPE = 0x8000_101D;
pub const OMX_ErrorDynamicResourcesUnavailable: OMX_ERRORTYPE = 0x8000_101E;
pub const OMX_ErrorMbErrorsInFrame: OMX_ERRORTYPE = 0x8000_101F;
pub const OMX_ErrorFormatNotDetected: OMX_ERRORTYPE = 0x8000_1020;

pub type OMX_STATETYPE = u32;
pub const OMX_StateInvalid: OMX_STATETYPE = 0;
pub const OMX_StateLoaded: OMX_STATETYPE = 1;
pub const OMX_StateIdle: OMX_STATETYPE = 2;
pub const OMX_StateExecuting: OMX_STATETYPE = 3;
pub const OMX_StatePause: OMX_STATETYPE = 4;
pub const OMX_StateWaitForResources: OMX_STATETYPE = 5;

pub type OMX_COMMANDTYPE = u32;
pub const OMX_CommandStateSet: OMX_COMMANDTYPE = 0;
pub const OMX_CommandFlush: OMX_COMMANDTYPE = 1;
pub const OMX_CommandPortDisable: OMX_COMMANDTYPE = 2;
pub const OMX_CommandPortEnable: OMX_COMMANDTYPE = 3;
pub const OMX_CommandMarkBuffer: OMX_COMMANDTYPE = 4;

/// Port index meaning "every port" in flush and port enable/disable commands.
pub const OMX_ALL: OMX_U32 = 0xFFFF_FFFF;

pub type OMX_EVENTTYPE = u32;
pub const OMX_EventCmdComplete: OMX_EVENTTYPE = 0;
pub const OMX_EventError: OMX_EVENTTYPE = 1;
pub const OMX_EventMark: OMX_EVENTTYPE = 2;
pub const OMX_EventPortSettingsChanged: OMX_EVENTTYPE = 3;
pub const OMX_EventBufferFlag: OMX_EVENTTYPE = 4;
pub const OMX_EventResourcesAcquired: OMX_EVENTTYPE = 5;
pub const OMX_EventComponentResumed: OMX_EVENTTYPE = 6;
pub const OMX_EventDynamicResourcesAvailable: OMX_EVENTTYPE = 7;
pub const OMX_EventPortFormatDetected: OMX_EVENTTYPE = 8;

pub type OMX_DIRTYPE = u32;
pub const OMX_DirInput: OMX_DIRTYPE = 0;
pub const OMX_DirOutput: OMX_DIRTYPE = 1;

pub type OMX_PORTDOMAINTYPE = u32;
pub const OMX_PortDomainAudio: OMX_PORTDOMAINTYPE = 0;
pub const OMX_PortDomainVideo: OMX_PORTDOMAINTYPE = 1;
pub const OMX_PortDomainImage: OMX_PORTDOMAINTYPE = 2;
pub const OMX_PortDomainOther: OMX_PORTDOMAINTYPE = 3;

pub type OMX_INDEXTYPE = u32;
pub const OMX_IndexComponentStartUnused: OMX_INDEXTYPE = 0x0100_0000;
pub const OMX_IndexParamPriorityMgmt: OMX_INDEXTYPE = 0x0100_0001;
pub const OMX_IndexParamAudioInit: OMX_INDEXTYPE = 0x0100_0002;
pub const OMX_IndexParamImageInit: OMX_INDEXTYPE = 0x0100_0003;
pub const OMX_IndexParamVideoInit: OMX_INDEXTYPE = 0x0100_0004;
pub const OMX_IndexParamOtherInit: OMX_INDEXTYPE = 0x0100_0005;
pub const OMX_IndexPortStartUnused: OMX_INDEXTYPE = 0x0200_0000;
pub const OMX_IndexParamPortDefinition: OMX_INDEXTYPE = 0x0200_0001;
pub const OMX_IndexParamCompBufferSupplier: OMX_INDEXTYPE = 0x0200_0002;
pub const OMX_IndexAudioStartUnused: OMX_INDEXTYPE = 0x0400_0000;
pub const OMX_IndexParamAudioPortFormat: OMX_INDEXTYPE = 0x0400_0001;
pub const OMX_IndexParamAudioPcm: OMX_INDEXTYPE = 0x0400_0002;
pub const OMX_IndexParamAudioAac: OMX_INDEXTYPE = 0x0400_0003;
pub const OMX_IndexParamAudioRa: OMX_INDEXTYPE = 0x0400_0004;
pub const OMX_IndexParamAudioMp3: OMX_INDEXTYPE = 0x0400_0005;
pub const OMX_IndexParamAudioAdpcm: OMX_INDEXTYPE = 0x0400_0006;
pub const OMX_IndexParamAudioG723: OMX_INDEXTYPE = 0x0400_0007;
pub const OMX_IndexParamAudioG729: OMX_INDEXTYPE = 0x0400_0008;
pub const OMX_IndexParamAudioAmr: OMX_INDEXTYPE = 0x0400_0009;
pub const OMX_IndexVideoStartUnused: OMX_INDEXTYPE = 0x0600_0000;
pub const OMX_IndexParamVideoPortFormat: OMX_INDEXTYPE = 0x0600_0001;

/// Buffer header flags (`nFlags`).
pub const OMX_BUFFERFLAG_EOS: OMX_U32 = 0x0000_0001;
pub const OMX_BUFFERFLAG_STARTTIME: OMX_U32 = 0x0000_0002;
pub const OMX_BUFFERFLAG_DECODEONLY: OMX_U32 = 0x0000_0004;
pub const OMX_BUFFERFLAG_DATACORRUPT: OMX_U32 = 0x0000_0008;
pub const OMX_BUFFERFLAG_ENDOFFRAME: OMX_U32 = 0x0000_0010;
pub const OMX_BUFFERFLAG_SYNCFRAME: OMX_U32 = 0x0000_0020;
pub const OMX_BUFFERFLAG_EXTRADATA: OMX_U32 = 0x0000_0040;
pub const OMX_BUFFERFLAG_CODECCONFIG: OMX_U32 = 0x0000_0080;
