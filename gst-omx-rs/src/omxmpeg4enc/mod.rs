//! OpenMAX IL MPEG-4 Encoder
//!
//! `omxmpeg4enc` encodes raw video into MPEG-4 part 2 elementary streams
//! with `OMX.st.video_encoder.mpeg4`.
//!
//! ## Example Pipeline
//! ```bash
//! gst-launch-1.0 videotestsrc num-buffers=100 ! video/x-raw,format=I420 ! \
//!     omxmpeg4enc bitrate=1000000 ! filesink location=out.m4v
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
    pub struct OmxMpeg4Enc(ObjectSubclass<imp::OmxMpeg4Enc>)
        @extends OmxBaseVideoEnc, OmxBaseFilter, gst::Element, gst::Object;
}

/// Registers the omxmpeg4enc element with GStreamer.
pub fn register(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    gst::Element::register(
        Some(plugin),
        "omxmpeg4enc",
        gst::Rank::NONE,
        OmxMpeg4Enc::static_type(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gst::prelude::*;
    use gst::subclass::prelude::*;
    use omx::PortDefinitionParam;
    use omx::emulated::EmulatedComponent;

    use super::*;
    use crate::omxbasefilter::{OmxBaseFilterExt, OmxBaseFilterImpl};

    const COMPONENT: &str = "OMX.st.video_encoder.mpeg4";

    fn raw(format: &str) -> gst::Structure {
        gst::Structure::builder("video/x-raw")
            .field("format", format)
            .field("width", 320i32)
            .field("height", 240i32)
            .field("framerate", gst::Fraction::new(25, 1))
            .build()
    }

    fn loaded(loader: &EmulatedComponent) -> OmxMpeg4Enc {
        gst::init().unwrap();

        let enc = glib::Object::builder::<OmxMpeg4Enc>()
            .property("component-name", COMPONENT)
            .build();
        enc.set_component_loader(Some(Arc::new(loader.clone())));
        enc.set_state(gst::State::Ready).unwrap();
        enc
    }

    #[test]
    fn unmapped_formats_leave_the_input_port_alone() {
        let loader = EmulatedComponent::video(COMPONENT);
        let enc = loaded(&loader);

        for format in ["RGB", "NV12"] {
            let caps = gst::Caps::builder_full().structure(raw(format)).build();
            assert!(enc.imp().sink_setcaps(&caps).is_err(), "{format}");
        }
        let def = loader.parameter::<PortDefinitionParam>(0).unwrap();
        assert_eq!(def.frame_width(), 176);
        assert_eq!(def.color_format(), omx::OMX_COLOR_FormatYUV420Planar);

        enc.set_state(gst::State::Null).unwrap();
    }

    #[test]
    fn caps_with_several_structures_are_rejected() {
        let loader = EmulatedComponent::video(COMPONENT);
        let enc = loaded(&loader);

        let caps = gst::Caps::builder_full()
            .structure(raw("I420"))
            .structure(raw("YUY2"))
            .build();
        assert!(enc.imp().sink_setcaps(&caps).is_err());
        assert_eq!(
            loader.parameter::<PortDefinitionParam>(0).unwrap().frame_width(),
            176
        );

        enc.set_state(gst::State::Null).unwrap();
    }
}
