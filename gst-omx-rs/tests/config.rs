// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Element defaults overridden through `GST_OMX_CONFIG`.
//!
//! Runs as its own test binary: the configuration is read once per process.

use std::sync::Arc;

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_check as gst_check;

use gstomx::omxbasefilter::{OmxBaseFilter, OmxBaseFilterExt};
use omx::PortDefinitionParam;
use omx::emulated::EmulatedComponent;

const CONFIG: &str = r#"{
    "omxh264enc": {
        "component-name": "OMX.vendor.video_encoder.avc",
        "library-name": "libOMX_Vendor.so",
        "quirks": []
    }
}"#;

fn init() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let path = std::env::temp_dir().join(format!("gst-omx-config-{}.json", std::process::id()));
        std::fs::write(&path, CONFIG).unwrap();
        // Set before the first element reads the configuration.
        unsafe { std::env::set_var(gstomx::config::CONFIG_ENV, &path) };

        gst::init().unwrap();
        gstomx::plugin_register_static().expect("Failed to register omx plugin");
    });
}

#[test]
fn overrides_replace_builtin_names() {
    init();

    let element = gst::ElementFactory::make("omxh264enc").build().unwrap();
    assert_eq!(
        element.property::<String>("component-name"),
        "OMX.vendor.video_encoder.avc"
    );
    assert_eq!(element.property::<String>("library-name"), "libOMX_Vendor.so");
    assert!(
        element
            .downcast_ref::<OmxBaseFilter>()
            .unwrap()
            .quirks()
            .iter()
            .next()
            .is_none()
    );

    let mpeg4 = gst::ElementFactory::make("omxmpeg4enc").build().unwrap();
    assert_eq!(
        mpeg4.property::<String>("component-name"),
        "OMX.st.video_encoder.mpeg4"
    );
}

#[test]
fn without_quirks_buffer_sizes_stay_untouched() {
    init();

    let loader = EmulatedComponent::video("OMX.vendor.video_encoder.avc");
    let element = gst::ElementFactory::make("omxh264enc").build().unwrap();
    element
        .downcast_ref::<OmxBaseFilter>()
        .unwrap()
        .set_component_loader(Some(Arc::new(loader.clone())));
    let mut h = gst_check::Harness::with_element(&element, Some("sink"), Some("src"));
    h.set_src_caps_str(
        "video/x-raw, format=(string)YUY2, width=(int)320, height=(int)240, framerate=(fraction)30/1",
    );

    let before_input = loader.parameter::<PortDefinitionParam>(0).unwrap();
    let before_output = loader.parameter::<PortDefinitionParam>(1).unwrap();
    assert_eq!(before_input.framerate(), 30 << 16);

    let mut buffer = gst::Buffer::from_mut_slice(vec![0u8; 320 * 240 * 2]);
    buffer
        .get_mut()
        .unwrap()
        .set_pts(gst::ClockTime::ZERO);
    h.push(buffer).unwrap();

    let input = loader.parameter::<PortDefinitionParam>(0).unwrap();
    let output = loader.parameter::<PortDefinitionParam>(1).unwrap();
    assert_eq!(input.buffer_size(), before_input.buffer_size());
    assert_eq!(output.buffer_size(), before_output.buffer_size());
    assert_eq!(output.compression_format(), omx::OMX_VIDEO_CodingAVC);
}
