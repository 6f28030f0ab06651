// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Typed, versioned parameter blocks.
//!
//! Every OpenMAX IL parameter structure starts with `nSize`, `nVersion` and
//! `nPortIndex`. A component checks the first two before touching the rest,
//! so a block built for one structure must never be passed with the index of
//! another. The types in this module tie each structure to its index and
//! only come into existence through [`Parameter::new`], which stamps the
//! exact size and the 1.1 version.

use std::mem::size_of;

use omx_sys::{
    OMX_AUDIO_PARAM_AMRTYPE, OMX_AUDIO_PARAM_PCMMODETYPE, OMX_COLOR_FORMATTYPE, OMX_INDEXTYPE,
    OMX_PARAM_PORTDEFINITIONTYPE, OMX_VERSIONTYPE, OMX_VERSIONTYPE_PARTS,
    OMX_VIDEO_CODINGTYPE, OMX_VIDEO_PORTDEFINITIONTYPE,
};

/// The OpenMAX IL version this crate speaks.
pub fn spec_version() -> OMX_VERSIONTYPE {
    OMX_VERSIONTYPE {
        s: OMX_VERSIONTYPE_PARTS {
            nVersionMajor: omx_sys::OMX_VERSION_MAJOR,
            nVersionMinor: omx_sys::OMX_VERSION_MINOR,
            nRevision: omx_sys::OMX_VERSION_REVISION,
            nStep: omx_sys::OMX_VERSION_STEP,
        },
    }
}

/// A parameter structure bound to its `OMX_INDEXTYPE`.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` or `#[repr(transparent)]` over an
/// OpenMAX IL structure that starts with `nSize`, `nVersion` and
/// `nPortIndex`, and [`Parameter::INDEX`] must be the index that structure
/// belongs to. The crate hands `&mut Self` to components as that structure.
pub unsafe trait Parameter: Copy + std::fmt::Debug {
    /// Index passed to `GetParameter`/`SetParameter`.
    const INDEX: OMX_INDEXTYPE;

    /// A zeroed block for `port` with `nSize` and `nVersion` set.
    fn new(port: u32) -> Self;

    /// Port the block addresses.
    fn port(&self) -> u32;
}

macro_rules! parameter {
    ($(#[$meta:meta])* $name:ident, $raw:ty, $index:expr) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy)]
        pub struct $name($raw);

        unsafe impl Parameter for $name {
            const INDEX: OMX_INDEXTYPE = $index;

            fn new(port: u32) -> Self {
                $name(<$raw>::default())
                    .with_header(size_of::<$raw>() as u32, spec_version(), port)
            }

            fn port(&self) -> u32 {
                self.0.nPortIndex
            }
        }

        impl $name {
            fn with_header(mut self, size: u32, version: OMX_VERSIONTYPE, port: u32) -> Self {
                self.0.nSize = size;
                self.0.nVersion = version;
                self.0.nPortIndex = port;
                self
            }

            /// The underlying structure.
            pub fn as_raw(&self) -> &$raw {
                &self.0
            }

            /// Mutable access to the underlying structure.
            ///
            /// # Safety
            ///
            /// `nSize`, `nVersion` and `nPortIndex` must stay as
            /// [`Parameter::new`] set them when the block is later passed
            /// to a component.
            pub unsafe fn as_raw_mut(&mut self) -> &mut $raw {
                &mut self.0
            }
        }
    };
}

parameter!(
    /// `OMX_AUDIO_PARAM_PCMMODETYPE` (`OMX_IndexParamAudioPcm`).
    PcmModeParam,
    OMX_AUDIO_PARAM_PCMMODETYPE,
    omx_sys::OMX_IndexParamAudioPcm
);

parameter!(
    /// `OMX_AUDIO_PARAM_AMRTYPE` (`OMX_IndexParamAudioAmr`).
    AmrParam,
    OMX_AUDIO_PARAM_AMRTYPE,
    omx_sys::OMX_IndexParamAudioAmr
);

parameter!(
    /// `OMX_PARAM_PORTDEFINITIONTYPE` (`OMX_IndexParamPortDefinition`).
    ///
    /// The video accessors read and write the video member of the format
    /// union regardless of `eDomain`; check [`PortDefinitionParam::domain`]
    /// first when the port kind is not known.
    PortDefinitionParam,
    OMX_PARAM_PORTDEFINITIONTYPE,
    omx_sys::OMX_IndexParamPortDefinition
);

impl PcmModeParam {
    pub fn channels(&self) -> u32 {
        self.0.nChannels
    }

    pub fn set_channels(&mut self, channels: u32) {
        self.0.nChannels = channels;
    }

    pub fn sampling_rate(&self) -> u32 {
        self.0.nSamplingRate
    }

    pub fn set_sampling_rate(&mut self, rate: u32) {
        self.0.nSamplingRate = rate;
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.0.nBitPerSample
    }

    pub fn set_bits_per_sample(&mut self, bits: u32) {
        self.0.nBitPerSample = bits;
    }

    pub fn is_interleaved(&self) -> bool {
        self.0.bInterleaved != omx_sys::OMX_FALSE
    }
}

impl AmrParam {
    pub fn channels(&self) -> u32 {
        self.0.nChannels
    }

    pub fn set_channels(&mut self, channels: u32) {
        self.0.nChannels = channels;
    }

    pub fn bit_rate(&self) -> u32 {
        self.0.nBitRate
    }

    pub fn set_bit_rate(&mut self, bit_rate: u32) {
        self.0.nBitRate = bit_rate;
    }

    pub fn band_mode(&self) -> u32 {
        self.0.eAMRBandMode
    }

    pub fn set_band_mode(&mut self, band_mode: u32) {
        self.0.eAMRBandMode = band_mode;
    }
}

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Kind of data a port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Audio,
    Video,
    Image,
    Other,
}

impl PortDefinitionParam {
    pub fn direction(&self) -> Direction {
        match self.0.eDir {
            omx_sys::OMX_DirInput => Direction::Input,
            _ => Direction::Output,
        }
    }

    pub fn domain(&self) -> Domain {
        match self.0.eDomain {
            omx_sys::OMX_PortDomainAudio => Domain::Audio,
            omx_sys::OMX_PortDomainVideo => Domain::Video,
            omx_sys::OMX_PortDomainImage => Domain::Image,
            _ => Domain::Other,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.0.bEnabled != omx_sys::OMX_FALSE
    }

    pub fn buffer_count_actual(&self) -> u32 {
        self.0.nBufferCountActual
    }

    pub fn set_buffer_count_actual(&mut self, count: u32) {
        self.0.nBufferCountActual = count;
    }

    pub fn buffer_count_min(&self) -> u32 {
        self.0.nBufferCountMin
    }

    /// Size in bytes of every buffer on the port.
    ///
    /// Read-only per the standard; see [`crate::Quirk::OverrideBufferSize`].
    pub fn buffer_size(&self) -> u32 {
        self.0.nBufferSize
    }

    pub fn set_buffer_size(&mut self, size: u32) {
        self.0.nBufferSize = size;
    }

    fn video(&self) -> &OMX_VIDEO_PORTDEFINITIONTYPE {
        // Every member of the union is plain old data, so any bit pattern is
        // a valid video member.
        unsafe { &self.0.format.video }
    }

    fn video_mut(&mut self) -> &mut OMX_VIDEO_PORTDEFINITIONTYPE {
        unsafe { &mut self.0.format.video }
    }

    pub fn frame_width(&self) -> u32 {
        self.video().nFrameWidth
    }

    pub fn set_frame_width(&mut self, width: u32) {
        self.video_mut().nFrameWidth = width;
    }

    pub fn frame_height(&self) -> u32 {
        self.video().nFrameHeight
    }

    pub fn set_frame_height(&mut self, height: u32) {
        self.video_mut().nFrameHeight = height;
    }

    /// Raw `xFramerate`, Q16 or integer depending on the component.
    pub fn framerate(&self) -> u32 {
        self.video().xFramerate
    }

    pub fn set_framerate(&mut self, framerate: u32) {
        self.video_mut().xFramerate = framerate;
    }

    pub fn bitrate(&self) -> u32 {
        self.video().nBitrate
    }

    pub fn set_bitrate(&mut self, bitrate: u32) {
        self.video_mut().nBitrate = bitrate;
    }

    pub fn compression_format(&self) -> OMX_VIDEO_CODINGTYPE {
        self.video().eCompressionFormat
    }

    pub fn set_compression_format(&mut self, format: OMX_VIDEO_CODINGTYPE) {
        self.video_mut().eCompressionFormat = format;
    }

    pub fn color_format(&self) -> OMX_COLOR_FORMATTYPE {
        self.video().eColorFormat
    }

    pub fn set_color_format(&mut self, format: OMX_COLOR_FORMATTYPE) {
        self.video_mut().eColorFormat = format;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_blocks_carry_size_version_and_port() {
        let pcm = PcmModeParam::new(1);
        assert_eq!(pcm.as_raw().nSize as usize, size_of::<OMX_AUDIO_PARAM_PCMMODETYPE>());
        assert_eq!(unsafe { pcm.as_raw().nVersion.s.nVersionMajor }, 1);
        assert_eq!(unsafe { pcm.as_raw().nVersion.s.nVersionMinor }, 1);
        assert_eq!(pcm.port(), 1);

        let def = PortDefinitionParam::new(0);
        assert_eq!(def.as_raw().nSize as usize, size_of::<OMX_PARAM_PORTDEFINITIONTYPE>());
        assert_eq!(def.port(), 0);

        let amr = AmrParam::new(1);
        assert_eq!(amr.as_raw().nSize as usize, size_of::<OMX_AUDIO_PARAM_AMRTYPE>());
    }

    #[test]
    fn video_accessors_use_the_video_member() {
        let mut def = PortDefinitionParam::new(0);
        def.set_frame_width(320);
        def.set_frame_height(240);
        def.set_color_format(omx_sys::OMX_COLOR_FormatCbYCrY);
        let video = unsafe { def.as_raw().format.video };
        assert_eq!(video.nFrameWidth, 320);
        assert_eq!(video.nFrameHeight, 240);
        assert_eq!(video.eColorFormat, omx_sys::OMX_COLOR_FormatCbYCrY);
    }
}
