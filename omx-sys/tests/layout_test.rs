// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Smoke tests for the hand-written OpenMAX IL structure layouts.

use std::mem::{offset_of, size_of};

use omx_sys::*;

/// Fixed-size parameter blocks do not depend on the pointer width.
#[test]
fn audio_parameter_blocks_have_abi_sizes() {
    assert_eq!(size_of::<OMX_VERSIONTYPE>(), 4);
    assert_eq!(size_of::<OMX_AUDIO_PARAM_PCMMODETYPE>(), 104);
    assert_eq!(size_of::<OMX_AUDIO_PARAM_AMRTYPE>(), 32);
    assert_eq!(size_of::<OMX_AUDIO_PARAM_ADPCMTYPE>(), 24);

    assert_eq!(offset_of!(OMX_AUDIO_PARAM_PCMMODETYPE, nSamplingRate), 32);
    assert_eq!(offset_of!(OMX_AUDIO_PARAM_PCMMODETYPE, eChannelMapping), 40);
    assert_eq!(offset_of!(OMX_AUDIO_PARAM_AMRTYPE, nChannels), 12);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn pointer_carrying_structures_have_lp64_layout() {
    assert_eq!(offset_of!(OMX_PARAM_PORTDEFINITIONTYPE, format), 40);
    assert_eq!(size_of::<OMX_PARAM_PORTDEFINITIONTYPE_format>(), 64);
    assert_eq!(size_of::<OMX_PARAM_PORTDEFINITIONTYPE>(), 112);

    assert_eq!(offset_of!(OMX_VIDEO_PORTDEFINITIONTYPE, nFrameWidth), 16);
    assert_eq!(offset_of!(OMX_VIDEO_PORTDEFINITIONTYPE, xFramerate), 36);
    assert_eq!(offset_of!(OMX_VIDEO_PORTDEFINITIONTYPE, eColorFormat), 48);

    assert_eq!(offset_of!(OMX_BUFFERHEADERTYPE, pBuffer), 8);
    assert_eq!(offset_of!(OMX_BUFFERHEADERTYPE, nTimeStamp), 88);
    assert_eq!(size_of::<OMX_BUFFERHEADERTYPE>(), 112);

    assert_eq!(size_of::<OMX_CALLBACKTYPE>(), 24);
    assert_eq!(offset_of!(OMX_COMPONENTTYPE, GetComponentVersion), 24);
    assert_eq!(size_of::<OMX_COMPONENTTYPE>(), 24 + 18 * 8);
}

#[test]
fn default_values_are_zeroed() {
    let def = OMX_PARAM_PORTDEFINITIONTYPE::default();
    assert_eq!(def.nSize, 0);
    assert_eq!(unsafe { def.nVersion.nVersion }, 0);
    assert_eq!(unsafe { def.format.video.eColorFormat }, OMX_COLOR_FormatUnused);

    let version = OMX_VERSIONTYPE {
        s: OMX_VERSIONTYPE_PARTS {
            nVersionMajor: OMX_VERSION_MAJOR,
            nVersionMinor: OMX_VERSION_MINOR,
            ..Default::default()
        },
    };
    println!("version: {version:?}");
    assert_eq!(unsafe { version.nVersion }.to_ne_bytes(), [1, 1, 0, 0]);
}
