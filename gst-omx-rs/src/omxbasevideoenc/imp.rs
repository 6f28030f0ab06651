// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{LazyLock, Mutex};

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gstreamer as gst;
use gstreamer_video as gst_video;

use super::VideoInput;
use crate::omxbasefilter::{
    INPUT_PORT, OUTPUT_PORT, OmxBaseFilter, OmxBaseFilterExt, OmxBaseFilterImpl,
    OmxBaseFilterImplExt,
};

pub(crate) static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "omxbasevideoenc",
        gst::DebugColorFlags::empty(),
        Some("OpenMAX IL base video encoder"),
    )
});

const DEFAULT_BITRATE: u32 = 500000;

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
pub struct OmxBaseVideoEnc {
    settings: Mutex<Settings>,
    compression_format: AtomicU32,
    input: Mutex<Option<VideoInput>>,
}

impl OmxBaseVideoEnc {
    pub(super) fn set_compression_format(&self, format: omx::OMX_VIDEO_CODINGTYPE) {
        gst::debug!(CAT, imp = self, "Compression format {}", format);
        self.compression_format.store(format, Ordering::Relaxed);
    }

    pub(super) fn video_input(&self) -> Option<VideoInput> {
        self.input.lock().ok().and_then(|input| *input)
    }

    fn bitrate(&self) -> u32 {
        self.settings
            .lock()
            .map(|settings| settings.bitrate)
            .unwrap_or(DEFAULT_BITRATE)
    }
}

#[glib::object_subclass]
impl ObjectSubclass for OmxBaseVideoEnc {
    const NAME: &'static str = "GstOmxBaseVideoEnc";
    const ABSTRACT: bool = true;
    type Type = super::OmxBaseVideoEnc;
    type ParentType = OmxBaseFilter;
}

impl ObjectImpl for OmxBaseVideoEnc {
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

    fn constructed(&self) {
        self.parent_constructed();

        self.obj().set_share_output_buffer(false);
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
        match pspec.name() {
            "bitrate" => self.bitrate().to_value(),
            other => {
                gst::error!(CAT, imp = self, "Unknown property {}", other);
                DEFAULT_BITRATE.to_value()
            }
        }
    }
}

impl GstObjectImpl for OmxBaseVideoEnc {}

impl ElementImpl for OmxBaseVideoEnc {
    fn pad_templates() -> &'static [gst::PadTemplate] {
        static PAD_TEMPLATES: LazyLock<Result<Vec<gst::PadTemplate>, glib::BoolError>> =
            LazyLock::new(|| Ok(vec![super::sink_pad_template()?]));

        match PAD_TEMPLATES.as_ref() {
            Ok(templates) => templates,
            Err(err) => {
                tracing::trace!("Failed to create pad templates: {:?}", err);
                &[]
            }
        }
    }
}

impl OmxBaseFilterImpl for OmxBaseVideoEnc {
    fn sink_setcaps(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        if caps.size() != 1 {
            return Err(gst::loggable_error!(
                CAT,
                "Expected exactly one structure in {}",
                caps
            ));
        }
        let info = gst_video::VideoInfo::from_caps(caps)
            .map_err(|_| gst::loggable_error!(CAT, "Invalid video caps {}", caps))?;
        let color_format = super::color_format(info.format()).ok_or_else(|| {
            gst::loggable_error!(CAT, "Unsupported video format {}", info.format())
        })?;

        let obj = self.obj();
        let component = obj
            .component()
            .ok_or_else(|| gst::loggable_error!(CAT, "No component loaded"))?;
        let quirks = obj.quirks();
        let fps = info.fps();
        let input = VideoInput {
            width: info.width(),
            height: info.height(),
            framerate: fps,
            color_format,
        };

        component
            .update_parameter::<omx::PortDefinitionParam>(INPUT_PORT, |def| {
                def.set_frame_width(input.width);
                def.set_frame_height(input.height);
                def.set_framerate(quirks.encode_framerate(fps.numer(), fps.denom()));
                def.set_color_format(color_format);
            })
            .map_err(|err| gst::loggable_error!(CAT, "Failed to configure input: {}", err))?;

        gst::debug!(CAT, imp = self, "Input configured as {:?}", input);
        if let Ok(mut remembered) = self.input.lock() {
            *remembered = Some(input);
        }
        Ok(())
    }

    fn omx_setup(&self, component: &omx::Component) -> Result<(), gst::LoggableError> {
        let format = self.compression_format.load(Ordering::Relaxed);
        let bitrate = self.bitrate();
        component
            .update_parameter::<omx::PortDefinitionParam>(OUTPUT_PORT, |def| {
                def.set_compression_format(format);
                def.set_bitrate(bitrate);
            })
            .map_err(|err| gst::loggable_error!(CAT, "Failed to configure output: {}", err))?;

        self.obj()
            .quirks()
            .apply_to_video_encoder(component, INPUT_PORT, OUTPUT_PORT)
            .map_err(|err| gst::loggable_error!(CAT, "Failed to apply quirks: {}", err))?;

        self.parent_omx_setup(component)
    }
}
