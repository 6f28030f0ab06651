//! OpenMAX IL ADPCM Decoder
//!
//! `omxadpcmdec` decodes mono IMA/DVI ADPCM into native-endian 16 bit PCM
//! with `OMX.st.audio_decoder.adpcm`. The sample rate of the sink caps is
//! written to the component's output PCM block and offered downstream.
//!
//! ## Example Pipeline
//! ```bash
//! gst-launch-1.0 filesrc location=in.wav ! wavparse ! omxadpcmdec ! \
//!     audioconvert ! autoaudiosink
//! ```

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use gst::glib;
use gst::prelude::*;
use gstreamer as gst;

use crate::omxbasefilter::OmxBaseFilter;

mod imp;

glib::wrapper! {
    pub struct OmxAdpcmDec(ObjectSubclass<imp::OmxAdpcmDec>)
        @extends OmxBaseFilter, gst::Element, gst::Object;
}

/// Registers the omxadpcmdec element with GStreamer.
pub fn register(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    gst::Element::register(
        Some(plugin),
        "omxadpcmdec",
        gst::Rank::NONE,
        OmxAdpcmDec::static_type(),
    )
}
