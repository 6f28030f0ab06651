//! OpenMAX IL AMR-WB Encoder
//!
//! `omxamrwbenc` encodes 16 kHz mono PCM into AMR-WB with
//! `OMX.st.audio_encoder.amrwb`. Src caps are published once the component
//! reports the output port settings.
//!
//! ## Properties
//! - `bitrate`: target bitrate in bit/s (default 64000)
//!
//! ## Example Pipeline
//! ```bash
//! gst-launch-1.0 audiotestsrc ! audio/x-raw,rate=16000,channels=1 ! \
//!     omxamrwbenc ! filesink location=out.amr
//! ```

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use gst::glib;
use gst::prelude::*;
use gstreamer as gst;

use crate::omxbasefilter::OmxBaseFilter;

mod imp;

glib::wrapper! {
    pub struct OmxAmrWbEnc(ObjectSubclass<imp::OmxAmrWbEnc>)
        @extends OmxBaseFilter, gst::Element, gst::Object;
}

/// Registers the omxamrwbenc element with GStreamer.
pub fn register(plugin: &gst::Plugin) -> Result<(), glib::BoolError> {
    gst::Element::register(
        Some(plugin),
        "omxamrwbenc",
        gst::Rank::NONE,
        OmxAmrWbEnc::static_type(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gst::prelude::*;
    use gst::subclass::prelude::*;
    use omx::PcmModeParam;
    use omx::emulated::EmulatedComponent;

    use super::*;
    use crate::omxbasefilter::{OmxBaseFilterExt, OmxBaseFilterImpl};

    const COMPONENT: &str = "OMX.st.audio_encoder.amrwb";

    fn pcm(rate: i32) -> gst::Structure {
        gst::Structure::builder("audio/x-raw")
            .field("format", "S16LE")
            .field("layout", "interleaved")
            .field("rate", rate)
            .field("channels", 1i32)
            .build()
    }

    #[test]
    fn caps_with_several_structures_are_rejected() {
        gst::init().unwrap();

        let loader = EmulatedComponent::audio(COMPONENT);
        let enc = glib::Object::builder::<OmxAmrWbEnc>()
            .property("component-name", COMPONENT)
            .build();
        enc.set_component_loader(Some(Arc::new(loader.clone())));
        enc.set_state(gst::State::Ready).unwrap();

        let mut caps = gst::Caps::new_empty();
        {
            let caps = caps.get_mut().unwrap();
            caps.append_structure(pcm(16000));
            caps.append_structure(pcm(8000));
        }
        assert!(enc.imp().sink_setcaps(&caps).is_err());
        assert_eq!(
            loader.parameter::<PcmModeParam>(0).unwrap().sampling_rate(),
            8000
        );

        let single = gst::Caps::builder_full().structure(pcm(16000)).build();
        assert!(enc.imp().sink_setcaps(&single).is_ok());
        assert_eq!(
            loader.parameter::<PcmModeParam>(0).unwrap().sampling_rate(),
            16000
        );

        enc.set_state(gst::State::Null).unwrap();
    }
}
