// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::LazyLock;

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gstreamer as gst;
use gstreamer_audio as gst_audio;

use crate::omxbasefilter::{OUTPUT_PORT, OmxBaseFilter, OmxBaseFilterExt, OmxBaseFilterImpl};

pub(crate) static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "omxadpcmdec",
        gst::DebugColorFlags::empty(),
        Some("OpenMAX IL ADPCM decoder"),
    )
});

const MIN_RATE: i32 = 8000;
const MAX_RATE: i32 = 96000;

#[derive(Default)]
pub struct OmxAdpcmDec;

#[glib::object_subclass]
impl ObjectSubclass for OmxAdpcmDec {
    const NAME: &'static str = "GstOmxAdpcmDec";
    type Type = super::OmxAdpcmDec;
    type ParentType = OmxBaseFilter;
}

impl ObjectImpl for OmxAdpcmDec {}

impl GstObjectImpl for OmxAdpcmDec {}

impl ElementImpl for OmxAdpcmDec {
    fn metadata() -> Option<&'static gst::subclass::ElementMetadata> {
        static ELEMENT_METADATA: LazyLock<gst::subclass::ElementMetadata> = LazyLock::new(|| {
            gst::subclass::ElementMetadata::new(
                "OpenMAX IL ADPCM audio decoder",
                "Codec/Decoder/Audio",
                "Decodes audio in ADPCM format with OpenMAX IL",
                "Contributors to the gst-omx-rs project",
            )
        });

        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gst::PadTemplate] {
        static PAD_TEMPLATES: LazyLock<Result<Vec<gst::PadTemplate>, glib::BoolError>> =
            LazyLock::new(|| {
                let sink_caps = gst::Caps::builder("audio/x-adpcm")
                    .field("layout", "dvi")
                    .field("rate", gst::IntRange::new(MIN_RATE, MAX_RATE))
                    .field("channels", 1)
                    .build();
                let sink_pad_template = gst::PadTemplate::new(
                    "sink",
                    gst::PadDirection::Sink,
                    gst::PadPresence::Always,
                    &sink_caps,
                )?;

                let src_caps = gst_audio::AudioCapsBuilder::new_interleaved()
                    .format(gst_audio::AUDIO_FORMAT_S16)
                    .rate_range(MIN_RATE..=MAX_RATE)
                    .channels(1)
                    .build();
                let src_pad_template = gst::PadTemplate::new(
                    "src",
                    gst::PadDirection::Src,
                    gst::PadPresence::Always,
                    &src_caps,
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

impl OmxBaseFilterImpl for OmxAdpcmDec {
    fn sink_setcaps(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        let structure = caps
            .structure(0)
            .ok_or_else(|| gst::loggable_error!(CAT, "Empty caps"))?;
        let rate = structure
            .get::<i32>("rate")
            .map_err(|_| gst::loggable_error!(CAT, "No rate in {}", caps))?;

        let obj = self.obj();
        let component = obj
            .component()
            .ok_or_else(|| gst::loggable_error!(CAT, "No component loaded"))?;
        component
            .update_parameter::<omx::PcmModeParam>(OUTPUT_PORT, |pcm| {
                pcm.set_sampling_rate(rate as u32)
            })
            .map_err(|err| gst::loggable_error!(CAT, "Failed to set output rate: {}", err))?;
        gst::debug!(CAT, imp = self, "Output rate set to {}", rate);

        let src_pad = obj.src_pad();
        let mut src_caps = src_pad
            .allowed_caps()
            .unwrap_or_else(|| src_pad.pad_template_caps());
        if src_caps.is_empty() {
            return Err(gst::loggable_error!(CAT, "Downstream accepts no PCM"));
        }
        src_caps.truncate();
        if let Some(s) = src_caps.make_mut().structure_mut(0) {
            s.fixate_field_nearest_int("rate", rate);
        }
        src_caps.fixate();

        if src_caps.is_fixed() {
            obj.set_src_caps(&src_caps);
        }
        Ok(())
    }
}
