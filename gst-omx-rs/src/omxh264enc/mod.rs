//! OpenMAX IL H.264 Encoder
//!
//! `omxh264enc` encodes raw video into an H.264 byte-stream, one access unit
//! per buffer, with `OMX.st.video_encoder.avc`.
//!
//! ## Example Pipeline
//! ```bash
//! gst-launch-1.0 videotestsrc num-buffers=100 ! video/x-raw,format=I420 ! \
//!     omxh264enc ! h264parse ! matroskamux ! filesink location=out.mkv
//! ```

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use gst::glib;
use gst::prelude::*;
use gstreamer as gst;

use crate::omxbasefilter::OmxBaseFilter;
use crate::omxbasevideoenc::OmxBaseVideoEnc;

mod imp;

glib::wrapper! {
    pub struct OmxH264Enc(ObjectSubclass<imp::OmxH264Enc>)
        @extends OmxBaseVideoEnc, OmxBaseFilter, gst::Element, gst::Object;
}

/// Registers the omxh264enc element with GStreamer.
pub fn register(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    gst::Element::register(
        Some(plugin),
        "omxh264enc",
        gst::Rank::NONE,
        OmxH264Enc::static_type(),
    )
}
