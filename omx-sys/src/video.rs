// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Video and image domain definitions (`OMX_IVCommon.h`, `OMX_Video.h`,
//! `OMX_Image.h`).

use std::os::raw::c_char;

use crate::types::*;

pub type OMX_COLOR_FORMATTYPE = u32;
pub const OMX_COLOR_FormatUnused: OMX_COLOR_FORMATTYPE = 0;
pub const OMX_COLOR_FormatMonochrome: OMX_COLOR_FORMATTYPE = 1;
pub const OMX_COLOR_Format8bitRGB332: OMX_COLOR_FORMATTYPE = 2;
pub const OMX_COLOR_Format12bitRGB444: OMX_COLOR_FORMATTYPE = 3;
pub const OMX_COLOR_Format16bitARGB4444: OMX_COLOR_FORMATTYPE = 4;
pub const OMX_COLOR_Format16bitARGB1555: OMX_COLOR_FORMATTYPE = 5;
pub const OMX_COLOR_Format16bitRGB565: OMX_COLOR_FORMATTYPE = 6;
pub const OMX_COLOR_Format16bitBGR565: OMX_COLOR_FORMATTYPE = 7;
pub const OMX_COLOR_Format18bitRGB666: OMX_COLOR_FORMATTYPE = 8;
pub const OMX_COLOR_Format18bitARGB1665: OMX_COLOR_FORMATTYPE = 9;
pub const OMX_COLOR_Format19bitARGB1666: OMX_COLOR_FORMATTYPE = 10;
pub const OMX_COLOR_Format24bitRGB888: OMX_COLOR_FORMATTYPE = 11;
pub const OMX_COLOR_Format24bitBGR888: OMX_COLOR_FORMATTYPE = 12;
pub const OMX_COLOR_Format24bitARGB1887: OMX_COLOR_FORMATTYPE = 13;
pub const OMX_COLOR_Format25bitARGB1888: OMX_COLOR_FORMATTYPE = 14;
pub const OMX_COLOR_Format32bitBGRA8888: OMX_COLOR_FORMATTYPE = 15;
pub const OMX_COLOR_Format32bitARGB8888: OMX_COLOR_FORMATTYPE = 16;
pub const OMX_COLOR_FormatYUV411Planar: OMX_COLOR_FORMATTYPE = 17;
pub const OMX_COLOR_FormatYUV411PackedPlanar: OMX_COLOR_FORMATTYPE = 18;
pub const OMX_COLOR_FormatYUV420Planar: OMX_COLOR_FORMATTYPE = 19;
pub const OMX_COLOR_FormatYUV420PackedPlanar: OMX_COLOR_FORMATTYPE = 20;
pub const OMX_COLOR_FormatYUV420SemiPlanar: OMX_COLOR_FORMATTYPE = 21;
pub const OMX_COLOR_FormatYUV422Planar: OMX_COLOR_FORMATTYPE = 22;
pub const OMX_COLOR_FormatYUV422PackedPlanar: OMX_COLOR_FORMATTYPE = 23;
pub const OMX_COLOR_FormatYUV422SemiPlanar: OMX_COLOR_FORMATTYPE = 24;
pub const OMX_COLOR_FormatYCbYCr: OMX_COLOR_FORMATTYPE = 25;
pub const OMX_COLOR_FormatYCrYCb: OMX_COLOR_FORMATTYPE = 26;
pub const OMX_COLOR_FormatCbYCrY: OMX_COLOR_FORMATTYPE = 27;
pub const OMX_COLOR_FormatCrYCbY: OMX_COLOR_FORMATTYPE = 28;

pub type OMX_VIDEO_CODINGTYPE = u32;
pub const OMX_VIDEO_CodingUnused: OMX_VIDEO_CODINGTYPE = 0;
pub const OMX_VIDEO_CodingAutoDetect: OMX_VIDEO_CODINGTYPE = 1;
pub const OMX_VIDEO_CodingMPEG2: OMX_VIDEO_CODINGTYPE = 2;
pub const OMX_VIDEO_CodingH263: OMX_VIDEO_CODINGTYPE = 3;
pub const OMX_VIDEO_CodingMPEG4: OMX_VIDEO_CODINGTYPE = 4;
pub const OMX_VIDEO_CodingWMV: OMX_VIDEO_CODINGTYPE = 5;
pub const OMX_VIDEO_CodingRV: OMX_VIDEO_CODINGTYPE = 6;
pub const OMX_VIDEO_CodingAVC: OMX_VIDEO_CODINGTYPE = 7;
pub const OMX_VIDEO_CodingMJPEG: OMX_VIDEO_CODINGTYPE = 8;

pub type OMX_IMAGE_CODINGTYPE = u32;
pub const OMX_IMAGE_CodingUnused: OMX_IMAGE_CODINGTYPE = 0;
pub const OMX_IMAGE_CodingAutoDetect: OMX_IMAGE_CODINGTYPE = 1;
pub const OMX_IMAGE_CodingJPEG: OMX_IMAGE_CODINGTYPE = 2;

pub type OMX_OTHER_FORMATTYPE = u32;
pub const OMX_OTHER_FormatTime: OMX_OTHER_FORMATTYPE = 0;
pub const OMX_OTHER_FormatPower: OMX_OTHER_FORMATTYPE = 1;
pub const OMX_OTHER_FormatStats: OMX_OTHER_FORMATTYPE = 2;
pub const OMX_OTHER_FormatBinary: OMX_OTHER_FORMATTYPE = 3;

/// Video member of the port definition format union.
///
/// `xFramerate` is Q16 fixed point per the standard; some components expect
/// plain integer frames per second instead.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OMX_VIDEO_PORTDEFINITIONTYPE {
    pub cMIMEType: *mut c_char,
    pub pNativeRender: OMX_NATIVE_DEVICETYPE,
    pub nFrameWidth: OMX_U32,
    pub nFrameHeight: OMX_U32,
    pub nStride: OMX_S32,
    pub nSliceHeight: OMX_U32,
    pub nBitrate: OMX_U32,
    pub xFramerate: OMX_U32,
    pub bFlagErrorConcealment: OMX_BOOL,
    pub eCompressionFormat: OMX_VIDEO_CODINGTYPE,
    pub eColorFormat: OMX_COLOR_FORMATTYPE,
    pub pNativeWindow: OMX_NATIVE_WINDOWTYPE,
}

impl Default for OMX_VIDEO_PORTDEFINITIONTYPE {
    fn default() -> Self {
        OMX_VIDEO_PORTDEFINITIONTYPE {
            cMIMEType: std::ptr::null_mut(),
            pNativeRender: std::ptr::null_mut(),
            nFrameWidth: 0,
            nFrameHeight: 0,
            nStride: 0,
            nSliceHeight: 0,
            nBitrate: 0,
            xFramerate: 0,
            bFlagErrorConcealment: OMX_FALSE,
            eCompressionFormat: OMX_VIDEO_CodingUnused,
            eColorFormat: OMX_COLOR_FormatUnused,
            pNativeWindow: std::ptr::null_mut(),
        }
    }
}

/// Image member of the port definition format union.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OMX_IMAGE_PORTDEFINITIONTYPE {
    pub cMIMEType: *mut c_char,
    pub pNativeRender: OMX_NATIVE_DEVICETYPE,
    pub nFrameWidth: OMX_U32,
    pub nFrameHeight: OMX_U32,
    pub nStride: OMX_S32,
    pub nSliceHeight: OMX_U32,
    pub bFlagErrorConcealment: OMX_BOOL,
    pub eCompressionFormat: OMX_IMAGE_CODINGTYPE,
    pub eColorFormat: OMX_COLOR_FORMATTYPE,
    pub pNativeWindow: OMX_NATIVE_WINDOWTYPE,
}

impl Default for OMX_IMAGE_PORTDEFINITIONTYPE {
    fn default() -> Self {
        OMX_IMAGE_PORTDEFINITIONTYPE {
            cMIMEType: std::ptr::null_mut(),
            pNativeRender: std::ptr::null_mut(),
            nFrameWidth: 0,
            nFrameHeight: 0,
            nStride: 0,
            nSliceHeight: 0,
            bFlagErrorConcealment: OMX_FALSE,
            eCompressionFormat: OMX_IMAGE_CodingUnused,
            eColorFormat: OMX_COLOR_FormatUnused,
            pNativeWindow: std::ptr::null_mut(),
        }
    }
}

/// Member of the port definition format union for the "other" domain.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct OMX_OTHER_PORTDEFINITIONTYPE {
    pub eFormat: OMX_OTHER_FORMATTYPE,
}
