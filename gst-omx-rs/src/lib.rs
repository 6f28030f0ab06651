//! GStreamer Plugin for OpenMAX IL
//!
//! This crate implements a GStreamer plugin whose elements hand encoding and
//! decoding to OpenMAX IL components loaded from a vendor core library:
//!
//! - **omxadpcmdec**: IMA/DVI ADPCM to 16 bit PCM
//! - **omxamrwbenc**: 16 kHz mono PCM to AMR-WB
//! - **omxmpeg4enc**: raw video to MPEG-4 part 2
//! - **omxh264enc**: raw video to H.264 byte-stream
//!
//! All of them derive from [`omxbasefilter::OmxBaseFilter`], which owns the
//! component and moves buffers between the pads and the component ports. The
//! video encoders share [`omxbasevideoenc::OmxBaseVideoEnc`].
//!
//! Component and library names default to the table in [`config`] and can be
//! overridden per element with the `component-name` and `library-name`
//! properties.
//!
//! ## Example Pipeline
//! ```bash
//! gst-launch-1.0 filesrc location=in.wav ! wavparse ! omxadpcmdec ! \
//!     audioconvert ! autoaudiosink
//! ```

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

#![allow(clippy::non_send_fields_in_send_ty, unused_doc_comments)]

use gst::glib;
use gstreamer as gst;

/// Per-element defaults and the `GST_OMX_CONFIG` override file
pub mod config;

/// Abstract element owning an OpenMAX IL component
pub mod omxbasefilter;

/// Abstract element shared by the video encoders
pub mod omxbasevideoenc;

/// ADPCM decoder
pub mod omxadpcmdec;

/// AMR-WB encoder
pub mod omxamrwbenc;

/// H.264 encoder
pub mod omxh264enc;

/// MPEG-4 encoder
pub mod omxmpeg4enc;

/// Registers every element of the plugin.
fn plugin_init(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    omxadpcmdec::register(plugin)?;
    omxamrwbenc::register(plugin)?;
    omxmpeg4enc::register(plugin)?;
    omxh264enc::register(plugin)?;

    Ok(())
}

gst::plugin_define!(
    omx,
    env!("CARGO_PKG_DESCRIPTION"),
    plugin_init,
    concat!(env!("CARGO_PKG_VERSION"), "-", env!("COMMIT_ID")),
    "Apache-2.0",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_REPOSITORY"),
    env!("BUILD_REL_DATE")
);
