//! OpenMAX IL Base Video Encoder
//!
//! Abstract element shared by the video encoders. It accepts raw I420, YUY2
//! or UYVY video and configures the component from the negotiated caps:
//!
//! - **sink caps**: width, height, framerate and color format go to the input
//!   port definition
//! - **setup**: compression format and bitrate go to the output port
//!   definition, then the component's quirks are applied
//!
//! Subclasses pick the compression format with
//! [`OmxBaseVideoEncExt::set_compression_format`] and publish their src caps
//! from [`OmxBaseVideoEncExt::video_input`].
//!
//! ## Properties
//! - `bitrate`: target bitrate in bit/s (default 500000)

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gstreamer as gst;
use gstreamer_video as gst_video;

use crate::omxbasefilter::{OmxBaseFilter, OmxBaseFilterImpl};

mod imp;

glib::wrapper! {
    pub struct OmxBaseVideoEnc(ObjectSubclass<imp::OmxBaseVideoEnc>)
        @extends OmxBaseFilter, gst::Element, gst::Object;
}

/// Raw video accepted on the sink pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInput {
    pub width: u32,
    pub height: u32,
    pub framerate: gst::Fraction,
    pub color_format: omx::OMX_COLOR_FORMATTYPE,
}

impl VideoInput {
    /// Copies size and framerate into the first structure of `caps`.
    pub fn describe(&self, caps: &mut gst::Caps) {
        if let Some(s) = caps.make_mut().structure_mut(0) {
            s.set("width", self.width as i32);
            s.set("height", self.height as i32);
            s.set("framerate", self.framerate);
        }
    }
}

/// OpenMAX IL color format of a raw video format, `None` for formats the
/// encoders do not take.
pub fn color_format(format: gst_video::VideoFormat) -> Option<omx::OMX_COLOR_FORMATTYPE> {
    match format {
        gst_video::VideoFormat::I420 => Some(omx::OMX_COLOR_FormatYUV420Planar),
        gst_video::VideoFormat::Yuy2 => Some(omx::OMX_COLOR_FormatYCbYCr),
        gst_video::VideoFormat::Uyvy => Some(omx::OMX_COLOR_FormatCbYCrY),
        _ => None,
    }
}

/// Sink pad template shared by the video encoders.
pub(crate) fn sink_pad_template() -> Result<gst::PadTemplate, glib::BoolError> {
    let caps = gst_video::VideoCapsBuilder::new()
        .format_list([
            gst_video::VideoFormat::I420,
            gst_video::VideoFormat::Yuy2,
            gst_video::VideoFormat::Uyvy,
        ])
        .width_range(16..=4096)
        .height_range(16..=4096)
        .framerate_range(gst::Fraction::new(0, 1)..=gst::Fraction::new(30, 1))
        .build();
    gst::PadTemplate::new(
        "sink",
        gst::PadDirection::Sink,
        gst::PadPresence::Always,
        &caps,
    )
}

/// Trait containing extension methods for `OmxBaseVideoEnc`.
pub trait OmxBaseVideoEncExt: IsA<OmxBaseVideoEnc> + 'static {
    /// Sets the `eCompressionFormat` written to the output port at setup.
    fn set_compression_format(&self, format: omx::OMX_VIDEO_CODINGTYPE) {
        self.upcast_ref::<OmxBaseVideoEnc>()
            .imp()
            .set_compression_format(format)
    }

    /// The input negotiated by the last accepted sink caps.
    fn video_input(&self) -> Option<VideoInput> {
        self.upcast_ref::<OmxBaseVideoEnc>().imp().video_input()
    }
}

impl<O: IsA<OmxBaseVideoEnc>> OmxBaseVideoEncExt for O {}

/// Trait to implement in `OmxBaseVideoEnc` subclasses.
pub trait OmxBaseVideoEncImpl:
    OmxBaseFilterImpl + ObjectSubclass<Type: IsA<OmxBaseVideoEnc>>
{
}

unsafe impl<T: OmxBaseVideoEncImpl> IsSubclassable<T> for OmxBaseVideoEnc {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_formats_map_to_color_formats() {
        assert_eq!(
            color_format(gst_video::VideoFormat::I420),
            Some(omx::OMX_COLOR_FormatYUV420Planar)
        );
        assert_eq!(
            color_format(gst_video::VideoFormat::Yuy2),
            Some(omx::OMX_COLOR_FormatYCbYCr)
        );
        assert_eq!(
            color_format(gst_video::VideoFormat::Uyvy),
            Some(omx::OMX_COLOR_FormatCbYCrY)
        );
        assert_eq!(color_format(gst_video::VideoFormat::Nv12), None);
    }

    #[test]
    fn input_fills_src_caps() {
        gst::init().unwrap();

        let input = VideoInput {
            width: 320,
            height: 240,
            framerate: gst::Fraction::new(25, 1),
            color_format: omx::OMX_COLOR_FormatYUV420Planar,
        };
        let mut caps = gst::Caps::builder("video/x-h264").build();
        input.describe(&mut caps);

        let s = caps.structure(0).unwrap();
        assert_eq!(s.get::<i32>("width").unwrap(), 320);
        assert_eq!(s.get::<i32>("height").unwrap(), 240);
        assert_eq!(
            s.get::<gst::Fraction>("framerate").unwrap(),
            gst::Fraction::new(25, 1)
        );
    }
}
