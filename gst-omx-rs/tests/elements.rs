// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Element tests running against the emulated component.
//!
//! The emulated component copies input payloads to output headers, so the
//! data path can be checked end to end while the component's parameter
//! blocks show what each element configured.

use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use gst::prelude::*;
use gstreamer as gst;
use gstreamer_audio as gst_audio;
use gstreamer_check as gst_check;

use gstomx::omxbasefilter::{OmxBaseFilter, OmxBaseFilterExt};
use omx::emulated::EmulatedComponent;
use omx::{AmrParam, PcmModeParam, PortDefinitionParam};

const TIMEOUT: Duration = Duration::from_secs(5);

fn init() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        gst::init().unwrap();
        gstomx::plugin_register_static().expect("Failed to register omx plugin");
    });
}

/// Creates `factory` backed by `loader` and wraps it into a harness.
fn harness(factory: &str, loader: &EmulatedComponent) -> gst_check::Harness {
    init();

    let element = gst::ElementFactory::make(factory).build().unwrap();
    element
        .downcast_ref::<OmxBaseFilter>()
        .unwrap()
        .set_component_loader(Some(Arc::new(loader.clone())));
    gst_check::Harness::with_element(&element, Some("sink"), Some("src"))
}

fn src_caps(h: &gst_check::Harness) -> Option<gst::Caps> {
    h.element()
        .unwrap()
        .static_pad("src")
        .unwrap()
        .current_caps()
}

fn buffer(data: Vec<u8>, pts: gst::ClockTime) -> gst::Buffer {
    let mut buffer = gst::Buffer::from_mut_slice(data);
    buffer.get_mut().unwrap().set_pts(pts);
    buffer
}

/// Pushes `caps` the way an upstream element would and returns whether the
/// element accepted them.
fn push_caps(h: &mut gst_check::Harness, caps: &gst::Caps) -> bool {
    h.push_event(gst::event::StreamStart::new("caps"));
    h.push_event(gst::event::Caps::new(caps))
}

fn pull_eos(h: &mut gst_check::Harness) {
    loop {
        let event = h.pull_event().unwrap();
        if event.type_() == gst::EventType::Eos {
            return;
        }
    }
}

fn adpcm() -> (EmulatedComponent, gst_check::Harness) {
    let loader = EmulatedComponent::audio("OMX.st.audio_decoder.adpcm");
    let mut h = harness("omxadpcmdec", &loader);
    h.set_src_caps_str("audio/x-adpcm, layout=(string)dvi, rate=(int)44100, channels=(int)1");
    (loader, h)
}

#[test]
fn adpcm_rate_reaches_output_port_and_src_caps() {
    let (loader, h) = adpcm();

    let pcm = loader.parameter::<PcmModeParam>(1).unwrap();
    assert_eq!(pcm.sampling_rate(), 44100);
    assert_eq!(pcm.channels(), 1);

    let caps = src_caps(&h).expect("src caps set during negotiation");
    assert!(caps.is_fixed());
    let s = caps.structure(0).unwrap();
    assert_eq!(s.name(), "audio/x-raw");
    assert_eq!(s.get::<i32>("rate").unwrap(), 44100);
    assert_eq!(s.get::<i32>("channels").unwrap(), 1);
}

#[test]
fn buffers_pass_through_with_pts_and_eos() {
    let (_loader, mut h) = adpcm();

    let payload: Vec<u8> = (0..200u8).collect();
    h.push(buffer(payload.clone(), gst::ClockTime::from_seconds(1)))
        .unwrap();

    let out = h.pull().unwrap();
    assert_eq!(out.pts(), Some(gst::ClockTime::from_seconds(1)));
    assert_eq!(out.map_readable().unwrap().as_slice(), payload.as_slice());
    drop(out);

    assert!(h.push_event(gst::event::Eos::new()));
    pull_eos(&mut h);
    assert_eq!(
        h.push(buffer(vec![1, 2, 3], gst::ClockTime::from_seconds(2))),
        Err(gst::FlowError::Eos)
    );
}

#[test]
fn large_buffers_are_split_over_input_headers() {
    let (_loader, mut h) = adpcm();

    let payload: Vec<u8> = (0..10000u32).map(|i| (i % 251) as u8).collect();
    let pts = gst::ClockTime::from_mseconds(40);
    h.push(buffer(payload.clone(), pts)).unwrap();

    let mut received = Vec::new();
    let mut sizes = Vec::new();
    while received.len() < payload.len() {
        let out = h.pull().unwrap();
        assert_eq!(out.pts(), Some(pts));
        let map = out.map_readable().unwrap();
        sizes.push(map.len());
        received.extend_from_slice(map.as_slice());
    }
    assert_eq!(sizes, [4096, 4096, 1808]);
    assert_eq!(received, payload);
}

#[test]
fn flushing_restarts_the_data_path() {
    let (_loader, mut h) = adpcm();

    h.push(buffer(vec![1; 64], gst::ClockTime::ZERO)).unwrap();
    drop(h.pull().unwrap());

    assert!(h.push_event(gst::event::FlushStart::new()));
    assert!(h.push_event(gst::event::FlushStop::new(true)));
    assert!(h.push_event(gst::event::Segment::new(
        &gst::FormattedSegment::<gst::ClockTime>::new()
    )));

    h.push(buffer(vec![2; 64], gst::ClockTime::from_mseconds(20)))
        .unwrap();
    let out = h.pull().unwrap();
    assert_eq!(out.pts(), Some(gst::ClockTime::from_mseconds(20)));
    assert_eq!(out.map_readable().unwrap().as_slice(), &[2; 64]);
}

fn amr_wb_with(loader: &EmulatedComponent) -> gst_check::Harness {
    let mut h = harness("omxamrwbenc", loader);
    h.set_src_caps(
        gst_audio::AudioCapsBuilder::new_interleaved()
            .format(gst_audio::AUDIO_FORMAT_S16)
            .rate(16000)
            .channels(1)
            .build(),
    );
    h
}

fn amr_wb() -> (EmulatedComponent, gst_check::Harness) {
    let loader = EmulatedComponent::audio("OMX.st.audio_encoder.amrwb");
    let h = amr_wb_with(&loader);
    (loader, h)
}

#[test]
fn amr_wb_input_is_configured_from_caps() {
    let (loader, h) = amr_wb();

    let pcm = loader.parameter::<PcmModeParam>(0).unwrap();
    assert_eq!(pcm.sampling_rate(), 16000);
    assert_eq!(pcm.channels(), 1);
    assert!(src_caps(&h).is_none());
}

#[test]
fn amr_wb_settings_change_publishes_src_caps() {
    let (loader, h) = amr_wb();

    let mut amr = loader.parameter::<AmrParam>(1).unwrap();
    amr.set_channels(1);
    loader.set_parameter(amr).unwrap();
    loader.port_settings_changed(1).unwrap();

    let deadline = Instant::now() + TIMEOUT;
    let caps = loop {
        if let Some(caps) = src_caps(&h) {
            break caps;
        }
        assert!(Instant::now() < deadline, "no src caps after settings change");
        std::thread::sleep(Duration::from_millis(10));
    };

    let s = caps.structure(0).unwrap();
    assert_eq!(s.name(), "audio/AMR-WB");
    assert_eq!(s.get::<i32>("channels").unwrap(), 1);
    assert_eq!(s.get::<i32>("rate").unwrap(), 16000);
}

#[test]
fn amr_wb_settings_change_raised_while_configuring_input() {
    let loader =
        EmulatedComponent::audio("OMX.st.audio_encoder.amrwb").with_inline_settings_changes();

    // Negotiate on another thread so a hang turns into a timeout.
    let (sender, receiver) = mpsc::channel();
    let negotiation = std::thread::spawn(move || {
        let h = amr_wb_with(&loader);
        let _ = sender.send(src_caps(&h));
    });
    let caps = receiver
        .recv_timeout(TIMEOUT)
        .expect("negotiation did not finish")
        .expect("src caps published while negotiating");
    negotiation.join().unwrap();

    let s = caps.structure(0).unwrap();
    assert_eq!(s.name(), "audio/AMR-WB");
    assert_eq!(s.get::<i32>("channels").unwrap(), 1);
    assert_eq!(s.get::<i32>("rate").unwrap(), 16000);
}

#[test]
fn amr_wb_rejects_caps_without_channels() {
    let loader = EmulatedComponent::audio("OMX.st.audio_encoder.amrwb");
    let mut h = harness("omxamrwbenc", &loader);

    let caps = gst::Caps::builder("audio/x-raw")
        .field("format", gst_audio::AUDIO_FORMAT_S16.to_str())
        .field("layout", "interleaved")
        .field("rate", 16000i32)
        .build();
    assert!(!push_caps(&mut h, &caps));

    let pcm = loader.parameter::<PcmModeParam>(0).unwrap();
    assert_eq!(pcm.sampling_rate(), 8000);
    assert!(src_caps(&h).is_none());
}

#[test]
fn amr_wb_bitrate_property() {
    init();

    let element = gst::ElementFactory::make("omxamrwbenc").build().unwrap();
    assert_eq!(element.property::<u32>("bitrate"), 64000);
    element.set_property("bitrate", 12650u32);
    assert_eq!(element.property::<u32>("bitrate"), 12650);

    let pspec = element.find_property("bitrate").unwrap();
    assert_eq!(pspec.blurb(), Some("Encoding bit-rate"));
    assert!(pspec.flags().contains(gst::PARAM_FLAG_MUTABLE_READY));
}

fn mpeg4(format: &str) -> (EmulatedComponent, gst_check::Harness) {
    let loader = EmulatedComponent::video("OMX.st.video_encoder.mpeg4");
    let mut h = harness("omxmpeg4enc", &loader);
    h.set_src_caps_str(&format!(
        "video/x-raw, format=(string){format}, width=(int)320, height=(int)240, framerate=(fraction)25/1"
    ));
    (loader, h)
}

#[test]
fn video_formats_map_to_color_formats() {
    for (format, color) in [
        ("I420", omx::OMX_COLOR_FormatYUV420Planar),
        ("YUY2", omx::OMX_COLOR_FormatYCbYCr),
        ("UYVY", omx::OMX_COLOR_FormatCbYCrY),
    ] {
        let (loader, _h) = mpeg4(format);
        let def = loader.parameter::<PortDefinitionParam>(0).unwrap();
        assert_eq!(def.color_format(), color, "{format}");
        assert_eq!(def.frame_width(), 320);
        assert_eq!(def.frame_height(), 240);
        // The ST components take integer framerates.
        assert_eq!(def.framerate(), 25);
    }
}

#[test]
fn video_rejects_unmapped_formats() {
    let loader = EmulatedComponent::video("OMX.st.video_encoder.mpeg4");
    let mut h = harness("omxmpeg4enc", &loader);

    let caps = gst::Caps::builder("video/x-raw")
        .field("format", "RGB")
        .field("width", 320i32)
        .field("height", 240i32)
        .field("framerate", gst::Fraction::new(25, 1))
        .build();
    assert!(!push_caps(&mut h, &caps));

    let def = loader.parameter::<PortDefinitionParam>(0).unwrap();
    assert_eq!(def.color_format(), omx::OMX_COLOR_FormatYUV420Planar);
    assert_eq!(def.frame_width(), 176);
    assert_eq!(def.frame_height(), 144);
    assert!(src_caps(&h).is_none());
}

#[test]
fn mpeg4_publishes_src_caps_with_input_geometry() {
    let (_loader, h) = mpeg4("I420");

    let caps = src_caps(&h).expect("src caps set during negotiation");
    let s = caps.structure(0).unwrap();
    assert_eq!(s.name(), "video/mpeg");
    assert_eq!(s.get::<i32>("mpegversion").unwrap(), 4);
    assert!(!s.get::<bool>("systemstream").unwrap());
    assert_eq!(s.get::<i32>("width").unwrap(), 320);
    assert_eq!(s.get::<i32>("height").unwrap(), 240);
    assert_eq!(
        s.get::<gst::Fraction>("framerate").unwrap(),
        gst::Fraction::new(25, 1)
    );
}

#[test]
fn video_setup_applies_compression_bitrate_and_buffer_sizes() {
    let (loader, mut h) = mpeg4("YUY2");
    let (width, height) = (320u32, 240u32);

    h.push(buffer(
        vec![0x80; (width * height * 2) as usize],
        gst::ClockTime::ZERO,
    ))
    .unwrap();

    let input = loader.parameter::<PortDefinitionParam>(0).unwrap();
    assert_eq!(input.buffer_size(), width * height * 2);

    let output = loader.parameter::<PortDefinitionParam>(1).unwrap();
    assert_eq!(output.compression_format(), omx::OMX_VIDEO_CodingMPEG4);
    assert_eq!(output.bitrate(), 500000);
    assert_eq!(output.buffer_size(), width * height / 2);
    assert_eq!(output.frame_width(), width);
    assert_eq!(output.frame_height(), height);

    let out = h.pull().unwrap();
    assert_eq!(out.size(), (width * height / 2) as usize);
}

#[test]
fn h264_uses_avc_and_the_configured_bitrate() {
    init();

    let loader = EmulatedComponent::video("OMX.st.video_encoder.avc");
    let element = gst::ElementFactory::make("omxh264enc")
        .property("bitrate", 1_000_000u32)
        .build()
        .unwrap();
    element
        .downcast_ref::<OmxBaseFilter>()
        .unwrap()
        .set_component_loader(Some(Arc::new(loader.clone())));
    let mut h = gst_check::Harness::with_element(&element, Some("sink"), Some("src"));
    h.set_src_caps_str(
        "video/x-raw, format=(string)I420, width=(int)176, height=(int)144, framerate=(fraction)15/1",
    );

    let caps = src_caps(&h).expect("src caps set during negotiation");
    let s = caps.structure(0).unwrap();
    assert_eq!(s.name(), "video/x-h264");
    assert_eq!(s.get::<&str>("stream-format").unwrap(), "byte-stream");
    assert_eq!(s.get::<&str>("alignment").unwrap(), "au");

    h.push(buffer(vec![0x10; 176 * 144 * 3 / 2], gst::ClockTime::ZERO))
        .unwrap();
    let output = loader.parameter::<PortDefinitionParam>(1).unwrap();
    assert_eq!(output.compression_format(), omx::OMX_VIDEO_CodingAVC);
    assert_eq!(output.bitrate(), 1_000_000);
    assert_eq!(
        loader.parameter::<PortDefinitionParam>(0).unwrap().buffer_size(),
        176 * 144 * 3 / 2
    );
}

#[test]
fn components_without_quirks_keep_q16_framerates_and_buffer_sizes() {
    init();

    let loader = EmulatedComponent::video("OMX.broadcom.video_encode");
    let element = gst::ElementFactory::make("omxmpeg4enc")
        .property("component-name", "OMX.broadcom.video_encode")
        .build()
        .unwrap();
    element
        .downcast_ref::<OmxBaseFilter>()
        .unwrap()
        .set_component_loader(Some(Arc::new(loader.clone())));
    let mut h = gst_check::Harness::with_element(&element, Some("sink"), Some("src"));
    h.set_src_caps_str(
        "video/x-raw, format=(string)I420, width=(int)320, height=(int)240, framerate=(fraction)25/1",
    );
    assert_eq!(
        loader.parameter::<PortDefinitionParam>(0).unwrap().framerate(),
        25 << 16
    );

    h.push(buffer(vec![0x10; 320 * 240 * 3 / 2], gst::ClockTime::ZERO))
        .unwrap();
    let input = loader.parameter::<PortDefinitionParam>(0).unwrap();
    let output = loader.parameter::<PortDefinitionParam>(1).unwrap();
    assert_eq!(input.buffer_size(), 176 * 144 * 3 / 2);
    assert_eq!(output.buffer_size(), 65536);
    assert_eq!(output.compression_format(), omx::OMX_VIDEO_CodingMPEG4);
}

#[test]
fn unknown_component_fails_to_start() {
    init();

    let loader = EmulatedComponent::audio("OMX.st.audio_decoder.adpcm");
    let element = gst::ElementFactory::make("omxadpcmdec")
        .property("component-name", "OMX.vendor.missing")
        .build()
        .unwrap();
    element
        .downcast_ref::<OmxBaseFilter>()
        .unwrap()
        .set_component_loader(Some(Arc::new(loader)));

    assert!(element.set_state(gst::State::Ready).is_err());
    let _ = element.set_state(gst::State::Null);
}

#[test]
fn component_and_library_names_resolve_from_defaults() {
    init();

    let element = gst::ElementFactory::make("omxmpeg4enc").build().unwrap();
    assert_eq!(
        element.property::<String>("component-name"),
        "OMX.st.video_encoder.mpeg4"
    );
    assert_eq!(element.property::<String>("library-name"), "libOMX_Core.so");

    element.set_property("component-name", "OMX.vendor.mpeg4");
    assert_eq!(
        element.property::<String>("component-name"),
        "OMX.vendor.mpeg4"
    );
}

#[test]
fn plugin_names_its_origin() {
    init();

    assert!(!env!("CARGO_PKG_REPOSITORY").is_empty());
    assert!(gst::Registry::get().find_plugin("omx").is_some());
}
