// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::LazyLock;

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gstreamer as gst;

use crate::omxbasefilter::{OmxBaseFilterExt, OmxBaseFilterImpl, OmxBaseFilterImplExt};
use crate::omxbasevideoenc::{OmxBaseVideoEnc, OmxBaseVideoEncExt, OmxBaseVideoEncImpl};

pub(crate) static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "omxh264enc",
        gst::DebugColorFlags::empty(),
        Some("OpenMAX IL H.264 encoder"),
    )
});

fn h264_caps() -> gst::Caps {
    gst::Caps::builder("video/x-h264")
        .field("stream-format", "byte-stream")
        .field("alignment", "au")
        .build()
}

#[derive(Default)]
pub struct OmxH264Enc;

#[glib::object_subclass]
impl ObjectSubclass for OmxH264Enc {
    const NAME: &'static str = "GstOmxH264Enc";
    type Type = super::OmxH264Enc;
    type ParentType = OmxBaseVideoEnc;
}

impl ObjectImpl for OmxH264Enc {
    fn constructed(&self) {
        self.parent_constructed();

        self.obj().set_compression_format(omx::OMX_VIDEO_CodingAVC);
    }
}

impl GstObjectImpl for OmxH264Enc {}

impl ElementImpl for OmxH264Enc {
    fn metadata() -> Option<&'static gst::subclass::ElementMetadata> {
        static ELEMENT_METADATA: LazyLock<gst::subclass::ElementMetadata> = LazyLock::new(|| {
            gst::subclass::ElementMetadata::new(
                "OpenMAX IL H.264 video encoder",
                "Codec/Encoder/Video",
                "Encodes video in H.264 format with OpenMAX IL",
                "Contributors to the gst-omx-rs project",
            )
        });

        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gst::PadTemplate] {
        static PAD_TEMPLATES: LazyLock<Result<Vec<gst::PadTemplate>, glib::BoolError>> =
            LazyLock::new(|| {
                let sink_pad_template = crate::omxbasevideoenc::sink_pad_template()?;
                let src_pad_template = gst::PadTemplate::new(
                    "src",
                    gst::PadDirection::Src,
                    gst::PadPresence::Always,
                    &h264_caps(),
                )?;

                Ok(vec![sink_pad_template, src_pad_template])
            });

        match PAD_TEMPLATES.as_ref() {
            Ok(templates) => templates,
            Err(err) => {
                tracing::trace!("Failed to create pad templates: {:?}", err);
                &[]
            }
        }
    }
}

impl OmxBaseFilterImpl for OmxH264Enc {
    fn sink_setcaps(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        self.parent_sink_setcaps(caps)?;

        let obj = self.obj();
        let Some(input) = obj.video_input() else {
            return Err(gst::loggable_error!(CAT, "No input negotiated"));
        };
        let mut src_caps = h264_caps();
        input.describe(&mut src_caps);
        gst::debug!(CAT, imp = self, "Publishing {}", src_caps);

        if !obj.set_src_caps(&src_caps) {
            gst::warning!(CAT, imp = self, "Downstream refused {}", src_caps);
        }
        Ok(())
    }
}

impl OmxBaseVideoEncImpl for OmxH264Enc {}
