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
        "omxmpeg4enc",
        gst::DebugColorFlags::empty(),
        Some("OpenMAX IL MPEG-4 encoder"),
    )
});

fn mpeg4_caps() -> gst::Caps {
    gst::Caps::builder("video/mpeg")
        .field("mpegversion", 4)
        .field("systemstream", false)
        .build()
}

#[derive(Default)]
pub struct OmxMpeg4Enc;

#[glib::object_subclass]
impl ObjectSubclass for OmxMpeg4Enc {
    const NAME: &'static str = "GstOmxMpeg4Enc";
    type Type = super::OmxMpeg4Enc;
    type ParentType = OmxBaseVideoEnc;
}

impl ObjectImpl for OmxMpeg4Enc {
    fn constructed(&self) {
        self.parent_constructed();

        self.obj()
            .set_compression_format(omx::OMX_VIDEO_CodingMPEG4);
    }
}

impl GstObjectImpl for OmxMpeg4Enc {}

impl ElementImpl for OmxMpeg4Enc {
    fn metadata() -> Option<&'static gst::subclass::ElementMetadata> {
        static ELEMENT_METADATA: LazyLock<gst::subclass::ElementMetadata> = LazyLock::new(|| {
            gst::subclass::ElementMetadata::new(
                "OpenMAX IL MPEG-4 video encoder",
                "Codec/Encoder/Video",
                "Encodes video in MPEG-4 format with OpenMAX IL",
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
                    &mpeg4_caps(),
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

impl OmxBaseFilterImpl for OmxMpeg4Enc {
    fn sink_setcaps(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        self.parent_sink_setcaps(caps)?;

        let obj = self.obj();
        let input = obj
            .video_input()
            .ok_or_else(|| gst::loggable_error!(CAT, "No input negotiated"))?;
        let mut src_caps = mpeg4_caps();
        input.describe(&mut src_caps);

        if !obj.set_src_caps(&src_caps) {
            gst::warning!(CAT, imp = self, "Downstream refused {}", src_caps);
        }
        Ok(())
    }
}

impl OmxBaseVideoEncImpl for OmxMpeg4Enc {}
