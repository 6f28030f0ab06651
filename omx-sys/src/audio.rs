// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Audio domain definitions (`OMX_Audio.h`).

use std::os::raw::c_char;

use crate::types::*;

pub type OMX_AUDIO_CODINGTYPE = u32;
pub const OMX_AUDIO_CodingUnused: OMX_AUDIO_CODINGTYPE = 0;
pub const OMX_AUDIO_CodingAutoDetect: OMX_AUDIO_CODINGTYPE = 1;
pub const OMX_AUDIO_CodingPCM: OMX_AUDIO_CODINGTYPE = 2;
pub const OMX_AUDIO_CodingADPCM: OMX_AUDIO_CODINGTYPE = 3;
pub const OMX_AUDIO_CodingAMR: OMX_AUDIO_CODINGTYPE = 4;
pub const OMX_AUDIO_CodingGSMFR: OMX_AUDIO_CODINGTYPE = 5;
pub const OMX_AUDIO_CodingGSMEFR: OMX_AUDIO_CODINGTYPE = 6;
pub const OMX_AUDIO_CodingGSMHR: OMX_AUDIO_CODINGTYPE = 7;
pub const OMX_AUDIO_CodingPDCFR: OMX_AUDIO_CODINGTYPE = 8;
pub const OMX_AUDIO_CodingPDCEFR: OMX_AUDIO_CODINGTYPE = 9;
pub const OMX_AUDIO_CodingPDCHR: OMX_AUDIO_CODINGTYPE = 10;
pub const OMX_AUDIO_CodingTDMAFR: OMX_AUDIO_CODINGTYPE = 11;
pub const OMX_AUDIO_CodingTDMAEFR: OMX_AUDIO_CODINGTYPE = 12;
pub const OMX_AUDIO_CodingQCELP8: OMX_AUDIO_CODINGTYPE = 13;
pub const OMX_AUDIO_CodingQCELP13: OMX_AUDIO_CODINGTYPE = 14;
pub const OMX_AUDIO_CodingEVRC: OMX_AUDIO_CODINGTYPE = 15;
pub const OMX_AUDIO_CodingSMV: OMX_AUDIO_CODINGTYPE = 16;
pub const OMX_AUDIO_CodingG711: OMX_AUDIO_CODINGTYPE = 17;
pub const OMX_AUDIO_CodingG723: OMX_AUDIO_CODINGTYPE = 18;
pub const OMX_AUDIO_CodingG726: OMX_AUDIO_CODINGTYPE = 19;
pub const OMX_AUDIO_CodingG729: OMX_AUDIO_CODINGTYPE = 20;
pub const OMX_AUDIO_CodingAAC: OMX_AUDIO_CODINGTYPE = 21;
pub const OMX_AUDIO_CodingMP3: OMX_AUDIO_CODINGTYPE = 22;

pub type OMX_NUMERICALDATATYPE = u32;
pub const OMX_NumericalDataSigned: OMX_NUMERICALDATATYPE = 0;
pub const OMX_NumericalDataUnsigned: OMX_NUMERICALDATATYPE = 1;

pub type OMX_ENDIANTYPE = u32;
pub const OMX_EndianBig: OMX_ENDIANTYPE = 0;
pub const OMX_EndianLittle: OMX_ENDIANTYPE = 1;

pub type OMX_AUDIO_PCMMODETYPE = u32;
pub const OMX_AUDIO_PCMModeLinear: OMX_AUDIO_PCMMODETYPE = 0;
pub const OMX_AUDIO_PCMModeALaw: OMX_AUDIO_PCMMODETYPE = 1;
pub const OMX_AUDIO_PCMModeMULaw: OMX_AUDIO_PCMMODETYPE = 2;

pub type OMX_AUDIO_CHANNELTYPE = u32;
pub const OMX_AUDIO_ChannelNone: OMX_AUDIO_CHANNELTYPE = 0;
pub const OMX_AUDIO_ChannelLF: OMX_AUDIO_CHANNELTYPE = 1;
pub const OMX_AUDIO_ChannelRF: OMX_AUDIO_CHANNELTYPE = 2;
pub const OMX_AUDIO_ChannelCF: OMX_AUDIO_CHANNELTYPE = 3;
pub const OMX_AUDIO_ChannelLS: OMX_AUDIO_CHANNELTYPE = 4;
pub const OMX_AUDIO_ChannelRS: OMX_AUDIO_CHANNELTYPE = 5;
pub const OMX_AUDIO_ChannelLFE: OMX_AUDIO_CHANNELTYPE = 6;
pub const OMX_AUDIO_ChannelCS: OMX_AUDIO_CHANNELTYPE = 7;
pub const OMX_AUDIO_ChannelLR: OMX_AUDIO_CHANNELTYPE = 8;
pub const OMX_AUDIO_ChannelRR: OMX_AUDIO_CHANNELTYPE = 9;

pub const OMX_AUDIO_MAXCHANNELS: usize = 16;

pub type OMX_AUDIO_AMRBANDMODETYPE = u32;
pub const OMX_AUDIO_AMRBandModeUnused: OMX_AUDIO_AMRBANDMODETYPE = 0;
pub const OMX_AUDIO_AMRBandModeNB0: OMX_AUDIO_AMRBANDMODETYPE = 1;
pub const OMX_AUDIO_AMRBandModeNB7: OMX_AUDIO_AMRBANDMODETYPE = 8;
pub const OMX_AUDIO_AMRBandModeWB0: OMX_AUDIO_AMRBANDMODETYPE = 9;
pub const OMX_AUDIO_AMRBandModeWB1: OMX_AUDIO_AMRBANDMODETYPE = 10;
pub const OMX_AUDIO_AMRBandModeWB2: OMX_AUDIO_AMRBANDMODETYPE = 11;
pub const OMX_AUDIO_AMRBandModeWB3: OMX_AUDIO_AMRBANDMODETYPE = 12;
pub const OMX_AUDIO_AMRBandModeWB4: OMX_AUDIO_AMRBANDMODETYPE = 13;
pub const OMX_AUDIO_AMRBandModeWB5: OMX_AUDIO_AMRBANDMODETYPE = 14;
pub const OMX_AUDIO_AMRBandModeWB6: OMX_AUDIO_AMRBANDMODETYPE = 15;
pub const OMX_AUDIO_AMRBandModeWB7: OMX_AUDIO_AMRBANDMODETYPE = 16;
pub const OMX_AUDIO_AMRBandModeWB8: OMX_AUDIO_AMRBANDMODETYPE = 17;

pub type OMX_AUDIO_AMRDTXMODETYPE = u32;
pub const OMX_AUDIO_AMRDTXModeOff: OMX_AUDIO_AMRDTXMODETYPE = 0;
pub const OMX_AUDIO_AMRDTXModeOnVAD1: OMX_AUDIO_AMRDTXMODETYPE = 1;
pub const OMX_AUDIO_AMRDTXModeOnVAD2: OMX_AUDIO_AMRDTXMODETYPE = 2;
pub const OMX_AUDIO_AMRDTXModeOnAuto: OMX_AUDIO_AMRDTXMODETYPE = 3;
pub const OMX_AUDIO_AMRDTXasEFR: OMX_AUDIO_AMRDTXMODETYPE = 4;

pub type OMX_AUDIO_AMRFRAMEFORMATTYPE = u32;
pub const OMX_AUDIO_AMRFrameFormatConformance: OMX_AUDIO_AMRFRAMEFORMATTYPE = 0;
pub const OMX_AUDIO_AMRFrameFormatIF1: OMX_AUDIO_AMRFRAMEFORMATTYPE = 1;
pub const OMX_AUDIO_AMRFrameFormatIF2: OMX_AUDIO_AMRFRAMEFORMATTYPE = 2;
pub const OMX_AUDIO_AMRFrameFormatFSF: OMX_AUDIO_AMRFRAMEFORMATTYPE = 3;
pub const OMX_AUDIO_AMRFrameFormatRTPPayload: OMX_AUDIO_AMRFRAMEFORMATTYPE = 4;
pub const OMX_AUDIO_AMRFrameFormatITU: OMX_AUDIO_AMRFRAMEFORMATTYPE = 5;

/// `OMX_IndexParamAudioPcm`
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct OMX_AUDIO_PARAM_PCMMODETYPE {
    pub nSize: OMX_U32,
    pub nVersion: OMX_VERSIONTYPE,
    pub nPortIndex: OMX_U32,
    pub nChannels: OMX_U32,
    pub eNumData: OMX_NUMERICALDATATYPE,
    pub eEndian: OMX_ENDIANTYPE,
    pub bInterleaved: OMX_BOOL,
    pub nBitPerSample: OMX_U32,
    pub nSamplingRate: OMX_U32,
    pub ePCMMode: OMX_AUDIO_PCMMODETYPE,
    pub eChannelMapping: [OMX_AUDIO_CHANNELTYPE; OMX_AUDIO_MAXCHANNELS],
}

/// `OMX_IndexParamAudioAdpcm`
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct OMX_AUDIO_PARAM_ADPCMTYPE {
    pub nSize: OMX_U32,
    pub nVersion: OMX_VERSIONTYPE,
    pub nPortIndex: OMX_U32,
    pub nChannels: OMX_U32,
    pub nBitsPerSample: OMX_U32,
    pub nSampleRate: OMX_U32,
}

/// `OMX_IndexParamAudioAmr`
#[repr(C)]
#[derive(Debug, Default, Copy, Clone)]
pub struct OMX_AUDIO_PARAM_AMRTYPE {
    pub nSize: OMX_U32,
    pub nVersion: OMX_VERSIONTYPE,
    pub nPortIndex: OMX_U32,
    pub nChannels: OMX_U32,
    pub nBitRate: OMX_U32,
    pub eAMRBandMode: OMX_AUDIO_AMRBANDMODETYPE,
    pub eAMRDTXMode: OMX_AUDIO_AMRDTXMODETYPE,
    pub eAMRFrameFormat: OMX_AUDIO_AMRFRAMEFORMATTYPE,
}

/// Audio member of the port definition format union.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct OMX_AUDIO_PORTDEFINITIONTYPE {
    pub cMIMEType: *mut c_char,
    pub pNativeRender: OMX_NATIVE_DEVICETYPE,
    pub bFlagErrorConcealment: OMX_BOOL,
    pub eEncoding: OMX_AUDIO_CODINGTYPE,
}

impl Default for OMX_AUDIO_PORTDEFINITIONTYPE {
    fn default() -> Self {
        OMX_AUDIO_PORTDEFINITIONTYPE {
            cMIMEType: std::ptr::null_mut(),
            pNativeRender: std::ptr::null_mut(),
            bFlagErrorConcealment: OMX_FALSE,
            eEncoding: OMX_AUDIO_CodingUnused,
        }
    }
}
