// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Port definition (`OMX_Component.h`).

use crate::audio::OMX_AUDIO_PORTDEFINITIONTYPE;
use crate::types::*;
use crate::video::{
    OMX_IMAGE_PORTDEFINITIONTYPE, OMX_OTHER_PORTDEFINITIONTYPE, OMX_VIDEO_PORTDEFINITIONTYPE,
};

/// Domain specific part of a port definition, selected by `eDomain`.
#[repr(C)]
#[derive(Copy, Clone)]
pub union OMX_PARAM_PORTDEFINITIONTYPE_format {
    pub audio: OMX_AUDIO_PORTDEFINITIONTYPE,
    pub video: OMX_VIDEO_PORTDEFINITIONTYPE,
    pub image: OMX_IMAGE_PORTDEFINITIONTYPE,
    pub other: OMX_OTHER_PORTDEFINITIONTYPE,
}

impl Default for OMX_PARAM_PORTDEFINITIONTYPE_format {
    fn default() -> Self {
        // The video member is the largest one, so this zeroes the whole union.
        OMX_PARAM_PORTDEFINITIONTYPE_format {
            video: OMX_VIDEO_PORTDEFINITIONTYPE::default(),
        }
    }
}

impl std::fmt::Debug for OMX_PARAM_PORTDEFINITIONTYPE_format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OMX_PARAM_PORTDEFINITIONTYPE_format { .. }")
    }
}

/// `OMX_IndexParamPortDefinition`
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct OMX_PARAM_PORTDEFINITIONTYPE {
    pub nSize: OMX_U32,
    pub nVersion: OMX_VERSIONTYPE,
    pub nPortIndex: OMX_U32,
    pub eDir: OMX_DIRTYPE,
    pub nBufferCountActual: OMX_U32,
    pub nBufferCountMin: OMX_U32,
    pub nBufferSize: OMX_U32,
    pub bEnabled: OMX_BOOL,
    pub bPopulated: OMX_BOOL,
    pub eDomain: OMX_PORTDOMAINTYPE,
    pub format: OMX_PARAM_PORTDEFINITIONTYPE_format,
    pub bBuffersContiguous: OMX_BOOL,
    pub nBufferAlignment: OMX_U32,
}
