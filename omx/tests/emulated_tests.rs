// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests driving the emulated component through the safe wrapper.
//!
//! These tests exercise the same paths a vendor component goes through:
//! parameter round-trips, the command/state machine, buffer exchange and
//! asynchronous events.

use std::{
    sync::{Arc, mpsc},
    time::Duration,
};

use omx::{
    AmrParam, BufferHeader, Command, Component, ComponentLoader, Error, Event, EventHandler,
    Parameter, PcmModeParam, PortDefinitionParam, State, emulated::EmulatedComponent,
};

const TIMEOUT: Duration = Duration::from_secs(5);
const AUDIO: &str = "OMX.test.audio_decoder";

/// Ensures logging is initialized only once across all tests.
static LOG_ONCE: std::sync::Once = std::sync::Once::new();

/// Forwards everything the component reports to channels.
struct Recorder {
    events: mpsc::Sender<Event>,
    emptied: mpsc::Sender<BufferHeader>,
    filled: mpsc::Sender<BufferHeader>,
}

impl EventHandler for Recorder {
    fn event(&self, event: Event) {
        let _ = self.events.send(event);
    }

    fn empty_buffer_done(&self, header: BufferHeader) {
        let _ = self.emptied.send(header);
    }

    fn fill_buffer_done(&self, header: BufferHeader) {
        let _ = self.filled.send(header);
    }
}

struct Harness {
    loader: EmulatedComponent,
    component: Component,
    events: mpsc::Receiver<Event>,
    emptied: mpsc::Receiver<BufferHeader>,
    filled: mpsc::Receiver<BufferHeader>,
}

impl Harness {
    fn new(loader: EmulatedComponent) -> Self {
        LOG_ONCE.call_once(|| {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::builder()
                        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                        .from_env_lossy(),
                )
                .init();
        });

        let (events_tx, events) = mpsc::channel();
        let (emptied_tx, emptied) = mpsc::channel();
        let (filled_tx, filled) = mpsc::channel();
        let recorder = Arc::new(Recorder {
            events: events_tx,
            emptied: emptied_tx,
            filled: filled_tx,
        });
        let component = loader.load(loader.name(), recorder).unwrap();
        Harness {
            loader,
            component,
            events,
            emptied,
            filled,
        }
    }

    /// Waits for the next event that is not a buffer flag.
    fn next_event(&self) -> Event {
        loop {
            match self.events.recv_timeout(TIMEOUT).unwrap() {
                Event::BufferFlag { .. } => continue,
                event => return event,
            }
        }
    }

    fn set_state(&self, state: State) {
        self.component.send_command(Command::StateSet(state)).unwrap();
        assert_eq!(
            self.next_event(),
            Event::CommandComplete(Command::StateSet(state))
        );
    }
}

#[test]
fn audio_parameters_round_trip() {
    let harness = Harness::new(EmulatedComponent::audio(AUDIO));
    let component = &harness.component;

    let pcm = component
        .update_parameter::<PcmModeParam>(1, |pcm| pcm.set_sampling_rate(44100))
        .unwrap();
    assert_eq!(pcm.sampling_rate(), 44100);
    assert_eq!(pcm.channels(), 1);

    let read_back = component.get_parameter::<PcmModeParam>(1).unwrap();
    assert_eq!(read_back.sampling_rate(), 44100);
    assert_eq!(read_back.bits_per_sample(), 16);
    assert!(read_back.is_interleaved());

    let def = component.get_parameter::<PortDefinitionParam>(0).unwrap();
    assert_eq!(def.direction(), omx::Direction::Input);
    assert_eq!(def.domain(), omx::Domain::Audio);
    assert_eq!(def.buffer_count_actual(), 2);
}

#[test]
fn malformed_blocks_are_rejected() {
    let harness = Harness::new(EmulatedComponent::audio(AUDIO));
    let component = &harness.component;

    let mut short = PcmModeParam::new(1);
    unsafe { short.as_raw_mut().nSize = 16 };
    assert_eq!(component.set_parameter(&short), Err(Error::BadParameter));

    let mut old = AmrParam::new(1);
    unsafe { old.as_raw_mut().nVersion.s.nVersionMinor = 0 };
    assert_eq!(component.set_parameter(&old), Err(Error::VersionMismatch));

    // The stored blocks are untouched.
    let pcm = harness.loader.parameter::<PcmModeParam>(1).unwrap();
    assert_eq!(pcm.sampling_rate(), 8000);
    assert_eq!(pcm.as_raw().nSize as usize, size_of::<omx_sys::OMX_AUDIO_PARAM_PCMMODETYPE>());
}

#[test]
fn state_changes_complete_asynchronously() {
    let harness = Harness::new(EmulatedComponent::audio(AUDIO));
    assert_eq!(harness.component.state().unwrap(), State::Loaded);

    harness
        .component
        .send_command(Command::StateSet(State::Executing))
        .unwrap();
    assert_eq!(
        harness.next_event(),
        Event::Error(Error::IncorrectStateTransition)
    );

    harness.set_state(State::Idle);
    harness.set_state(State::Executing);
    assert_eq!(harness.component.state().unwrap(), State::Executing);

    let pcm = PcmModeParam::new(0);
    assert_eq!(
        harness.component.set_parameter(&pcm),
        Err(Error::IncorrectStateOperation)
    );

    harness.set_state(State::Idle);
    harness.set_state(State::Loaded);
}

#[test]
fn buffers_pass_through_with_timestamps_and_eos() {
    let harness = Harness::new(EmulatedComponent::audio(AUDIO));
    let component = &harness.component;

    component
        .send_command(Command::StateSet(State::Idle))
        .unwrap();
    let input = component.allocate_buffer(0, 4096).unwrap();
    let outputs = [
        component.allocate_buffer(1, 4096).unwrap(),
        component.allocate_buffer(1, 4096).unwrap(),
    ];
    assert_eq!(
        harness.next_event(),
        Event::CommandComplete(Command::StateSet(State::Idle))
    );
    harness.set_state(State::Executing);

    for output in outputs {
        component.fill_this_buffer(output).unwrap();
    }

    let mut input = input;
    assert_eq!(input.fill_from(b"payload"), 7);
    input.set_timestamp(40_000);
    component.empty_this_buffer(input).unwrap();

    let output = harness.filled.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(output.filled(), b"payload");
    assert_eq!(output.timestamp(), 40_000);
    assert!(!output.is_eos());

    let mut input = harness.emptied.recv_timeout(TIMEOUT).unwrap();
    input.clear();
    input.set_flags(omx_sys::OMX_BUFFERFLAG_EOS);
    input.set_timestamp(80_000);
    component.empty_this_buffer(input).unwrap();

    let last = harness.filled.recv_timeout(TIMEOUT).unwrap();
    assert!(last.is_eos());
    assert!(last.filled().is_empty());
    assert_eq!(last.timestamp(), 80_000);
    assert_eq!(
        harness.events.recv_timeout(TIMEOUT).unwrap(),
        Event::BufferFlag {
            port: 1,
            flags: omx_sys::OMX_BUFFERFLAG_EOS
        }
    );
    let input = harness.emptied.recv_timeout(TIMEOUT).unwrap();

    harness.set_state(State::Idle);
    component.send_command(Command::StateSet(State::Loaded)).unwrap();
    for header in [input, output, last] {
        component.free_buffer(header).unwrap();
    }
    assert_eq!(
        harness.next_event(),
        Event::CommandComplete(Command::StateSet(State::Loaded))
    );
}

#[test]
fn large_inputs_are_spread_over_outputs() {
    let harness = Harness::new(EmulatedComponent::audio(AUDIO));
    let component = &harness.component;

    component
        .send_command(Command::StateSet(State::Idle))
        .unwrap();
    let mut input = component.allocate_buffer(0, 10_000).unwrap();
    let outputs: Vec<_> = (0..3)
        .map(|_| component.allocate_buffer(1, 4096).unwrap())
        .collect();
    harness.next_event();
    harness.set_state(State::Executing);

    for output in outputs {
        component.fill_this_buffer(output).unwrap();
    }
    let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    assert_eq!(input.fill_from(&payload), 10_000);
    input.set_timestamp(7);
    component.empty_this_buffer(input).unwrap();

    let mut received = Vec::new();
    let mut sizes = Vec::new();
    let mut returned = Vec::new();
    for _ in 0..3 {
        let output = harness.filled.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(output.timestamp(), 7);
        sizes.push(output.filled().len());
        received.extend_from_slice(output.filled());
        returned.push(output);
    }
    assert_eq!(sizes, [4096, 4096, 1808]);
    assert_eq!(received, payload);
    returned.push(harness.emptied.recv_timeout(TIMEOUT).unwrap());

    harness.set_state(State::Idle);
    for header in returned {
        component.free_buffer(header).unwrap();
    }
}

#[test]
fn port_settings_changes_are_reported() {
    let harness = Harness::new(EmulatedComponent::audio(AUDIO));

    let mut amr = AmrParam::new(1);
    amr.set_channels(2);
    harness.loader.set_parameter(amr).unwrap();
    harness.loader.port_settings_changed(1).unwrap();

    assert_eq!(harness.next_event(), Event::PortSettingsChanged { port: 1 });
    let amr = harness.component.get_parameter::<AmrParam>(1).unwrap();
    assert_eq!(amr.channels(), 2);
}

#[test]
fn video_ports_describe_raw_input() {
    let harness = Harness::new(EmulatedComponent::video("OMX.test.video_encoder"));
    let input = harness
        .component
        .get_parameter::<PortDefinitionParam>(0)
        .unwrap();
    assert_eq!(input.domain(), omx::Domain::Video);
    assert_eq!(input.frame_width(), 176);
    assert_eq!(input.frame_height(), 144);
    assert_eq!(input.color_format(), omx_sys::OMX_COLOR_FormatYUV420Planar);
    assert_eq!(input.buffer_size(), 176 * 144 * 3 / 2);

    let output = harness
        .component
        .get_parameter::<PortDefinitionParam>(1)
        .unwrap();
    assert_eq!(output.direction(), omx::Direction::Output);
    assert_eq!(output.compression_format(), omx_sys::OMX_VIDEO_CodingUnused);
}
