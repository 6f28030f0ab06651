// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::{LazyLock, Mutex};

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gstreamer as gst;
use gstreamer_audio as gst_audio;

use crate::omxbasefilter::{
    INPUT_PORT, OUTPUT_PORT, OmxBaseFilter, OmxBaseFilterExt, OmxBaseFilterImpl,
};

pub(crate) static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "omxamrwbenc",
        gst::DebugColorFlags::empty(),
        Some("OpenMAX IL AMR-WB encoder"),
    )
});

const DEFAULT_BITRATE: u32 = 64000;

/// AMR-WB always runs at 16 kHz.
const RATE: i32 = 16000;

#[derive(Debug, Clone)]
struct Settings {
    bitrate: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bitrate: DEFAULT_BITRATE,
        }
    }
}

#[derive(Default)]
pub struct OmxAmrWbEnc {
    // TODO: write the bitrate into the output AMR block from omx_setup.
    settings: Mutex<Settings>,
}

#[glib::object_subclass]
impl ObjectSubclass for OmxAmrWbEnc {
    const NAME: &'static str = "GstOmxAmrWbEnc";
    type Type = super::OmxAmrWbEnc;
    type ParentType = OmxBaseFilter;
}

impl ObjectImpl for OmxAmrWbEnc {
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES: LazyLock<Vec<glib::ParamSpec>> = LazyLock::new(|| {
            vec![
                glib::ParamSpecUInt::builder("bitrate")
                    .nick("Bitrate")
                    .blurb("Encoding bit-rate")
                    .default_value(DEFAULT_BITRATE)
                    .mutable_ready()
                    .build(),
            ]
        });

        PROPERTIES.as_ref()
    }

    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        if let Ok(mut settings) = self.settings.lock() {
            match pspec.name() {
                "bitrate" => {
                    if let Ok(bitrate) = value.get::<u32>() {
                        gst::info!(
                            CAT,
                            imp = self,
                            "Changing bitrate from {} to {}",
                            settings.bitrate,
                            bitrate
                        );
                        settings.bitrate = bitrate;
                    } else {
                        gst::error!(CAT, imp = self, "Invalid type for bitrate property");
                    }
                }
                other => {
                    gst::error!(CAT, imp = self, "Unknown property '{}'", other);
                }
            }
        } else {
            gst::error!(CAT, imp = self, "Settings mutex poisoned, property change ignored");
        }
    }

    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        if let Ok(settings) = self.settings.lock() {
            match pspec.name() {
                "bitrate" => settings.bitrate.to_value(),
                _ => {
                    gst::error!(CAT, imp = self, "Unknown property {}", pspec.name());
                    DEFAULT_BITRATE.to_value()
                }
            }
        } else {
            gst::error!(CAT, imp = self, "Settings mutex poisoned");
            DEFAULT_BITRATE.to_value()
        }
    }
}

impl GstObjectImpl for OmxAmrWbEnc {}

impl ElementImpl for OmxAmrWbEnc {
    fn metadata() -> Option<&'static gst::subclass::ElementMetadata> {
        static ELEMENT_METADATA: LazyLock<gst::subclass::ElementMetadata> = LazyLock::new(|| {
            gst::subclass::ElementMetadata::new(
                "OpenMAX IL AMR-WB audio encoder",
                "Codec/Encoder/Audio",
                "Encodes audio in AMR-WB format with OpenMAX IL",
                "Contributors to the gst-omx-rs project",
            )
        });

        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gst::PadTemplate] {
        static PAD_TEMPLATES: LazyLock<Result<Vec<gst::PadTemplate>, glib::BoolError>> =
            LazyLock::new(|| {
                let sink_caps = gst_audio::AudioCapsBuilder::new_interleaved()
                    .format(gst_audio::AUDIO_FORMAT_S16)
                    .rate(RATE)
                    .channels(1)
                    .build();
                let sink_pad_template = gst::PadTemplate::new(
                    "sink",
                    gst::PadDirection::Sink,
                    gst::PadPresence::Always,
                    &sink_caps,
                )?;

                let src_pad_template = gst::PadTemplate::new(
                    "src",
                    gst::PadDirection::Src,
                    gst::PadPresence::Always,
                    &amr_wb_caps(1),
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

fn amr_wb_caps(channels: i32) -> gst::Caps {
    gst::Caps::builder("audio/AMR-WB")
        .field("channels", channels)
        .field("rate", RATE)
        .build()
}

impl OmxBaseFilterImpl for OmxAmrWbEnc {
    fn sink_setcaps(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        if caps.size() != 1 {
            return Err(gst::loggable_error!(
                CAT,
                "Expected exactly one structure in {}",
                caps
            ));
        }
        let Some(structure) = caps.structure(0) else {
            return Err(gst::loggable_error!(CAT, "Empty caps"));
        };
        let rate = structure
            .get::<i32>("rate")
            .map_err(|_| gst::loggable_error!(CAT, "No rate in {}", caps))?;
        let channels = structure
            .get::<i32>("channels")
            .map_err(|_| gst::loggable_error!(CAT, "No channels in {}", caps))?;

        let component = self
            .obj()
            .component()
            .ok_or_else(|| gst::loggable_error!(CAT, "No component loaded"))?;
        component
            .update_parameter::<omx::PcmModeParam>(INPUT_PORT, |pcm| {
                pcm.set_sampling_rate(rate as u32);
                pcm.set_channels(channels as u32);
            })
            .map_err(|err| gst::loggable_error!(CAT, "Failed to configure input: {}", err))?;

        gst::debug!(
            CAT,
            imp = self,
            "Input configured for {} Hz, {} channels",
            rate,
            channels
        );
        Ok(())
    }

    fn settings_changed(&self, component: &omx::Component) -> Result<(), gst::LoggableError> {
        let amr = component
            .get_parameter::<omx::AmrParam>(OUTPUT_PORT)
            .map_err(|err| gst::loggable_error!(CAT, "Failed to read output: {}", err))?;

        let caps = amr_wb_caps(amr.channels() as i32);
        gst::info!(CAT, imp = self, "Output settings changed, src caps {}", caps);
        if !self.obj().set_src_caps(&caps) {
            gst::warning!(CAT, imp = self, "Downstream refused {}", caps);
        }
        Ok(())
    }
}
