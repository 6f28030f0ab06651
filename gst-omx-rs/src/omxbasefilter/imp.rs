//! OpenMAX IL Base Filter Implementation
//!
//! Pads, state changes and the two data paths:
//!
//! - **input**: `sink_chain` copies each buffer into input headers taken from
//!   the input queue and hands them to `EmptyThisBuffer`
//! - **output**: the src pad task takes filled headers from the output queue,
//!   pushes them downstream and returns them with `FillThisBuffer`
//!
//! Component callbacks only ever touch [`Shared`], never the element state.

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gstreamer as gst;

use omx::{BufferHeader, Command, Component, ComponentLoader, Event, EventHandler};

use super::queue::{CapsLock, LentBuffer, Shared, lock};
use super::state::{Settings, State};
use super::{INPUT_PORT, OUTPUT_PORT};
use crate::config::{self, ElementConfig};

/// GStreamer debug category of the base filter.
///
/// Set GST_DEBUG=omxbasefilter:5 to see the buffer flow.
pub(crate) static CAT: LazyLock<gst::DebugCategory> = LazyLock::new(|| {
    gst::DebugCategory::new(
        "omxbasefilter",
        gst::DebugColorFlags::empty(),
        Some("OpenMAX IL base filter"),
    )
});

/// Receives the component callbacks.
///
/// Holds the element weakly: the component (and with it this handler) may
/// outlive the element while downstream still holds lent output buffers.
struct Callbacks {
    shared: Arc<Shared>,
    element: glib::WeakRef<super::OmxBaseFilter>,
}

impl EventHandler for Callbacks {
    fn event(&self, event: Event) {
        match event {
            Event::CommandComplete(command) => {
                tracing::trace!(?command, "command complete");
                self.shared.commands.complete(command);
            }
            Event::Error(error) => {
                self.shared.commands.fail(error.clone());
                if let Some(element) = self.element.upgrade() {
                    gst::element_error!(
                        element,
                        gst::LibraryError::Failed,
                        ["OpenMAX IL component error: {}", error]
                    );
                }
            }
            Event::PortSettingsChanged { port } => {
                if let Some(element) = self.element.upgrade() {
                    element.imp().port_settings_changed(port);
                }
            }
            event @ (Event::BufferFlag { .. } | Event::Other { .. }) => {
                tracing::trace!(?event, "ignoring component event");
            }
        }
    }

    fn empty_buffer_done(&self, header: BufferHeader) {
        self.shared.input.push(header);
    }

    fn fill_buffer_done(&self, header: BufferHeader) {
        self.shared.output.push(header);
    }
}

pub struct OmxBaseFilter {
    sinkpad: gst::Pad,
    srcpad: gst::Pad,

    /// Property values and installed component loader
    settings: Mutex<Settings>,

    /// Loaded component, `None` in NULL
    state: Mutex<Option<State>>,

    /// Serializes `sink_setcaps` and `settings_changed`, reentrant for
    /// events the component raises from inside `sink_setcaps`
    caps_lock: CapsLock,
}

impl OmxBaseFilter {
    fn settings_lock(&self) -> MutexGuard<'_, Settings> {
        lock(&self.settings)
    }

    fn state_lock(&self) -> MutexGuard<'_, Option<State>> {
        lock(&self.state)
    }

    /// Configuration of this element's factory.
    fn element_config(&self) -> ElementConfig {
        self.obj()
            .factory()
            .map(|factory| config::element_config(factory.name().as_str()))
            .unwrap_or_default()
    }

    /// The component and its queues, if loaded.
    fn streaming(&self) -> Option<(Arc<Component>, Arc<Shared>)> {
        self.state_lock()
            .as_ref()
            .map(|state| (state.component.clone(), state.shared.clone()))
    }

    pub(super) fn component(&self) -> Option<Arc<Component>> {
        self.state_lock()
            .as_ref()
            .map(|state| state.component.clone())
    }

    pub(super) fn sink_pad(&self) -> &gst::Pad {
        &self.sinkpad
    }

    pub(super) fn src_pad(&self) -> &gst::Pad {
        &self.srcpad
    }

    pub(super) fn set_component_loader(&self, loader: Option<Arc<dyn ComponentLoader>>) {
        self.settings_lock().loader = loader;
    }

    pub(super) fn set_share_output_buffer(&self, share: bool) {
        gst::debug!(CAT, imp = self, "Sharing output buffers: {}", share);
        self.settings_lock().share_output_buffer = share;
    }

    pub(super) fn quirks(&self) -> omx::Quirks {
        let config = self.element_config();
        config.quirks().unwrap_or_else(|| {
            let name = self.settings_lock().component_name(&config);
            omx::Quirks::for_component(&name)
        })
    }

    pub(super) fn set_src_caps(&self, caps: &gst::Caps) -> bool {
        gst::debug!(CAT, imp = self, "Setting src caps {}", caps);
        let ret = self.srcpad.push_event(gst::event::Caps::new(caps));

        let segment = self
            .state_lock()
            .as_mut()
            .and_then(|state| state.pending_segment.take());
        if let Some(segment) = segment {
            self.srcpad.push_event(segment);
        }
        ret
    }

    fn sink_setcaps_default(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        gst::debug!(CAT, imp = self, "Accepting caps {} unchanged", caps);
        Ok(())
    }

    fn omx_setup_default(&self, _component: &Component) -> Result<(), gst::LoggableError> {
        Ok(())
    }

    fn settings_changed_default(&self, component: &Component) -> Result<(), gst::LoggableError> {
        gst::debug!(
            CAT,
            imp = self,
            "Ignoring settings change of {}",
            component.name()
        );
        Ok(())
    }

    /// Runs the subclass `settings_changed` on the callback thread.
    fn port_settings_changed(&self, port: u32) {
        gst::debug!(CAT, imp = self, "Settings changed on port {}", port);
        let Some(component) = self.component() else {
            return;
        };

        let _caps = self.caps_lock.acquire();
        let obj = self.obj();
        if let Err(err) = (obj.class().as_ref().settings_changed)(&obj, &component) {
            err.log_with_imp(self);
        }
    }

    /// Loads the component when going from NULL to READY.
    fn load(&self) -> Result<(), gst::ErrorMessage> {
        let config = self.element_config();
        let settings = self.settings_lock().clone();
        let name = settings.component_name(&config);
        if name.is_empty() {
            return Err(gst::error_msg!(
                gst::LibraryError::Settings,
                ["No component-name configured"]
            ));
        }

        let loader: Arc<dyn ComponentLoader> = match settings.loader {
            Some(loader) => loader,
            None => {
                let library = settings.library_name(&config);
                let core = omx::OmxCore::open(&library).map_err(|err| {
                    gst::error_msg!(
                        gst::LibraryError::Init,
                        ["Failed to load OpenMAX IL core {}: {}", library, err]
                    )
                })?;
                Arc::new(core)
            }
        };

        let shared = Arc::new(Shared::default());
        let handler = Arc::new(Callbacks {
            shared: shared.clone(),
            element: self.obj().downgrade(),
        });
        let component = loader.load(&name, handler).map_err(|err| {
            gst::error_msg!(
                gst::LibraryError::Init,
                ["Failed to load component {}: {}", name, err]
            )
        })?;

        gst::info!(CAT, imp = self, "Loaded component {}", name);
        *self.state_lock() = Some(State::new(Arc::new(component), shared));
        Ok(())
    }

    /// Drops the component when going from READY to NULL.
    fn unload(&self) {
        let state = self.state_lock().take();
        if let Some(state) = state {
            gst::info!(CAT, imp = self, "Unloading {}", state.component.name());
        }
    }

    fn set_flushing(&self, flushing: bool) {
        if let Some((_, shared)) = self.streaming() {
            shared.input.set_flushing(flushing);
            shared.output.set_flushing(flushing);
        }
    }

    /// Configures the component and moves it to Executing, once per stream.
    fn start_streaming(&self) -> Result<(), gst::FlowError> {
        let (component, shared) = {
            let state = self.state_lock();
            match state.as_ref() {
                Some(state) if state.started => return Ok(()),
                Some(state) => (state.component.clone(), state.shared.clone()),
                None => return Err(gst::FlowError::Flushing),
            }
        };

        let obj = self.obj();
        (obj.class().as_ref().omx_setup)(&obj, &component).map_err(|err| {
            err.log_with_imp(self);
            gst::element_imp_error!(
                self,
                gst::LibraryError::Settings,
                ["Failed to configure {}", component.name()]
            );
            gst::FlowError::NotNegotiated
        })?;

        self.allocate_and_execute(&component, &shared)
            .map_err(|err| {
                gst::element_imp_error!(
                    self,
                    gst::LibraryError::Init,
                    ["Failed to start {}: {}", component.name(), err]
                );
                gst::FlowError::Error
            })?;

        if let Some(state) = self.state_lock().as_mut() {
            state.started = true;
        }
        self.start_task()
    }

    fn allocate_and_execute(&self, component: &Component, shared: &Shared) -> omx::Result<()> {
        let input = component.get_parameter::<omx::PortDefinitionParam>(INPUT_PORT)?;
        let output = component.get_parameter::<omx::PortDefinitionParam>(OUTPUT_PORT)?;
        gst::debug!(
            CAT,
            imp = self,
            "Allocating {} x {} input and {} x {} output bytes",
            input.buffer_count_actual(),
            input.buffer_size(),
            output.buffer_count_actual(),
            output.buffer_size()
        );

        let idle = Command::StateSet(omx::State::Idle);
        shared.commands.send(component, idle)?;
        for _ in 0..input.buffer_count_actual() {
            shared
                .input
                .push(component.allocate_buffer(INPUT_PORT, input.buffer_size())?);
        }
        for _ in 0..output.buffer_count_actual() {
            shared
                .output
                .push(component.allocate_buffer(OUTPUT_PORT, output.buffer_size())?);
        }
        shared.commands.wait(idle)?;

        shared
            .commands
            .run(component, Command::StateSet(omx::State::Executing))?;
        for header in shared.output.drain() {
            component.fill_this_buffer(header)?;
        }
        Ok(())
    }

    /// Returns the component to Loaded and frees every header it handed back.
    fn stop_streaming(&self) {
        let Some((component, shared)) = self.streaming() else {
            return;
        };
        if let Some(state) = self.state_lock().as_mut() {
            state.started = false;
            state.reset_stream();
        }

        if matches!(
            component.state(),
            Ok(omx::State::Executing | omx::State::Pause)
        ) && let Err(err) = shared
            .commands
            .run(&component, Command::StateSet(omx::State::Idle))
        {
            gst::warning!(CAT, imp = self, "Failed to reach Idle: {}", err);
        }

        let headers: Vec<_> = shared
            .input
            .release()
            .into_iter()
            .chain(shared.output.release())
            .collect();
        let idle = matches!(component.state(), Ok(omx::State::Idle));
        let loaded = Command::StateSet(omx::State::Loaded);
        if idle && let Err(err) = shared.commands.send(&component, loaded) {
            gst::warning!(CAT, imp = self, "Failed to request Loaded: {}", err);
        }

        gst::debug!(CAT, imp = self, "Freeing {} buffers", headers.len());
        for header in headers {
            if let Err(err) = component.free_buffer(header) {
                gst::warning!(CAT, imp = self, "Failed to free buffer: {}", err);
            }
        }

        if idle && let Err(err) = shared.commands.wait(loaded) {
            gst::warning!(CAT, imp = self, "Failed to reach Loaded: {}", err);
        }
    }

    fn start_task(&self) -> Result<(), gst::FlowError> {
        let imp = self.ref_counted();
        self.srcpad
            .start_task(move || imp.src_loop())
            .map_err(|err| {
                gst::error!(CAT, imp = self, "Failed to start src task: {}", err);
                gst::FlowError::Error
            })
    }

    fn sink_chain(
        &self,
        _pad: &gst::Pad,
        buffer: gst::Buffer,
    ) -> Result<gst::FlowSuccess, gst::FlowError> {
        self.start_streaming()?;

        let (component, shared) = {
            let state = self.state_lock();
            let Some(state) = state.as_ref() else {
                return Err(gst::FlowError::Flushing);
            };
            if state.eos {
                return Err(gst::FlowError::Eos);
            }
            state.flow?;
            (state.component.clone(), state.shared.clone())
        };

        let map = buffer.map_readable().map_err(|_| {
            gst::element_imp_error!(self, gst::CoreError::Failed, ["Failed to map input buffer"]);
            gst::FlowError::Error
        })?;
        let timestamp = buffer
            .pts()
            .map(|pts| pts.useconds() as i64)
            .unwrap_or(0);

        let mut data = map.as_slice();
        while !data.is_empty() {
            let mut header = shared.input.pop().ok_or(gst::FlowError::Flushing)?;
            let written = header.fill_from(data);
            if written == 0 {
                gst::element_imp_error!(
                    self,
                    gst::ResourceError::NoSpaceLeft,
                    ["Input buffer header has no room"]
                );
                shared.input.push(header);
                return Err(gst::FlowError::Error);
            }
            header.set_timestamp(timestamp);
            header.set_flags(0);
            data = &data[written..];

            gst::trace!(CAT, imp = self, "Sending {} bytes at {}us", written, timestamp);
            component.empty_this_buffer(header).map_err(|err| {
                gst::element_imp_error!(
                    self,
                    gst::StreamError::Failed,
                    ["EmptyThisBuffer failed: {}", err]
                );
                gst::FlowError::Error
            })?;
        }

        Ok(gst::FlowSuccess::Ok)
    }

    fn sink_event(&self, pad: &gst::Pad, event: gst::Event) -> bool {
        use gst::EventView;

        gst::log!(CAT, obj = pad, "Handling event {:?}", event);
        match event.view() {
            EventView::Caps(caps) => {
                let caps = caps.caps_owned();
                self.handle_sink_caps(&caps)
            }
            EventView::Segment(_) => {
                if self.srcpad.current_caps().is_some() {
                    return self.srcpad.push_event(event);
                }
                gst::debug!(CAT, imp = self, "Holding segment until src caps are set");
                if let Some(state) = self.state_lock().as_mut() {
                    state.pending_segment = Some(event);
                }
                true
            }
            EventView::Eos(_) => self.handle_eos(event),
            EventView::FlushStart(_) => {
                self.set_flushing(true);
                let ret = self.srcpad.push_event(event);
                let _ = self.srcpad.pause_task();
                ret
            }
            EventView::FlushStop(_) => self.handle_flush_stop(event),
            _ => gst::Pad::event_default(pad, Some(&*self.obj()), event),
        }
    }

    fn handle_sink_caps(&self, caps: &gst::Caps) -> bool {
        gst::info!(CAT, imp = self, "setcaps (sink): {}", caps);

        let _caps = self.caps_lock.acquire();
        let obj = self.obj();
        match (obj.class().as_ref().sink_setcaps)(&obj, caps) {
            Ok(()) => true,
            Err(err) => {
                err.log_with_imp(self);
                false
            }
        }
    }

    /// Sends an empty EOS header; the src task forwards EOS once the
    /// component returns it.
    fn handle_eos(&self, event: gst::Event) -> bool {
        let draining = {
            let mut state = self.state_lock();
            match state.as_mut() {
                Some(state) if state.eos => return true,
                Some(state) if state.started => {
                    state.eos = true;
                    Some((state.component.clone(), state.shared.clone()))
                }
                _ => None,
            }
        };
        let Some((component, shared)) = draining else {
            return self.srcpad.push_event(event);
        };

        let Some(mut header) = shared.input.pop() else {
            return false;
        };
        header.clear();
        header.mark_eos();
        gst::debug!(CAT, imp = self, "Draining {}", component.name());
        match component.empty_this_buffer(header) {
            Ok(()) => true,
            Err(err) => {
                gst::warning!(CAT, imp = self, "Failed to send EOS header: {}", err);
                self.srcpad.push_event(event)
            }
        }
    }

    /// Takes back every header the component holds and restarts output.
    fn handle_flush_stop(&self, event: gst::Event) -> bool {
        let streaming = {
            let mut state = self.state_lock();
            state.as_mut().map(|state| {
                state.reset_stream();
                (state.started, state.component.clone(), state.shared.clone())
            })
        };

        let mut restart = false;
        if let Some((started, component, shared)) = streaming {
            if started {
                for port in [INPUT_PORT, OUTPUT_PORT] {
                    if let Err(err) = shared.commands.run(&component, Command::Flush(port)) {
                        gst::warning!(CAT, imp = self, "Failed to flush port {}: {}", port, err);
                    }
                }
            }
            shared.input.reset();
            shared.output.reset();
            if started {
                for header in shared.output.drain() {
                    shared.output.recycle(&component, header);
                }
                restart = true;
            }
        }

        let ret = self.srcpad.push_event(event);
        if restart && self.start_task().is_err() {
            return false;
        }
        ret
    }

    /// Negotiates src caps from downstream when the subclass set none.
    fn ensure_src_caps(&self) -> Result<(), gst::FlowError> {
        let _caps = self.caps_lock.acquire();
        if self.srcpad.current_caps().is_some() {
            return Ok(());
        }

        let mut caps = self
            .srcpad
            .allowed_caps()
            .unwrap_or_else(|| self.srcpad.pad_template_caps());
        if caps.is_empty() {
            gst::error!(CAT, imp = self, "Downstream accepts no caps");
            return Err(gst::FlowError::NotNegotiated);
        }
        caps.truncate();
        caps.fixate();
        if !caps.is_fixed() || !self.set_src_caps(&caps) {
            gst::error!(CAT, imp = self, "Failed to negotiate {}", caps);
            return Err(gst::FlowError::NotNegotiated);
        }
        Ok(())
    }

    fn push_output(
        &self,
        component: &Arc<Component>,
        shared: &Arc<Shared>,
        header: BufferHeader,
    ) -> Result<gst::FlowSuccess, gst::FlowError> {
        if let Err(err) = self.ensure_src_caps() {
            shared.output.recycle(component, header);
            return Err(err);
        }

        let timestamp = header.timestamp();
        let share = self.settings_lock().share_output_buffer;
        let mut buffer = if share {
            gst::Buffer::from_slice(LentBuffer::new(header, component.clone(), shared.clone()))
        } else {
            let buffer = gst::Buffer::from_mut_slice(header.filled().to_vec());
            shared.output.recycle(component, header);
            buffer
        };
        if let Some(buffer) = buffer.get_mut()
            && timestamp >= 0
        {
            buffer.set_pts(gst::ClockTime::from_useconds(timestamp as u64));
        }

        gst::trace!(CAT, imp = self, "Pushing {:?}", buffer);
        self.srcpad.push(buffer)
    }

    fn src_loop(&self) {
        let Some((component, shared)) = self.streaming() else {
            let _ = self.srcpad.pause_task();
            return;
        };
        let Some(header) = shared.output.pop() else {
            gst::debug!(CAT, imp = self, "Flushing, pausing task");
            let _ = self.srcpad.pause_task();
            return;
        };

        let eos = header.is_eos();
        let result = if header.filled().is_empty() {
            shared.output.recycle(&component, header);
            Ok(gst::FlowSuccess::Ok)
        } else {
            self.push_output(&component, &shared, header)
        };

        match result {
            Ok(_) if eos => {
                gst::debug!(CAT, imp = self, "Component drained, forwarding EOS");
                self.srcpad.push_event(gst::event::Eos::new());
                let _ = self.srcpad.pause_task();
            }
            Ok(_) => {}
            Err(err) => self.pause_on_flow_error(err),
        }
    }

    fn pause_on_flow_error(&self, err: gst::FlowError) {
        if let Some(state) = self.state_lock().as_mut() {
            state.flow = Err(err);
        }
        match err {
            gst::FlowError::Flushing => {
                gst::debug!(CAT, imp = self, "Flushing, pausing task");
            }
            gst::FlowError::Eos => {
                gst::debug!(CAT, imp = self, "Downstream is EOS, pausing task");
                self.srcpad.push_event(gst::event::Eos::new());
            }
            _ => {
                gst::element_imp_error!(
                    self,
                    gst::StreamError::Failed,
                    ["Streaming stopped, reason {:?}", err]
                );
                self.srcpad.push_event(gst::event::Eos::new());
            }
        }
        let _ = self.srcpad.pause_task();
    }
}

#[glib::object_subclass]
impl ObjectSubclass for OmxBaseFilter {
    const NAME: &'static str = "GstOmxBaseFilter";
    const ABSTRACT: bool = true;
    type Type = super::OmxBaseFilter;
    type ParentType = gst::Element;
    type Class = super::Class;

    fn class_init(klass: &mut Self::Class) {
        klass.sink_setcaps = |obj, caps| obj.imp().sink_setcaps_default(caps);
        klass.omx_setup = |obj, component| obj.imp().omx_setup_default(component);
        klass.settings_changed = |obj, component| obj.imp().settings_changed_default(component);
    }

    fn with_class(klass: &Self::Class) -> Self {
        let sinkpad = match klass.pad_template("sink") {
            Some(templ) => gst::Pad::builder_from_template(&templ),
            None => gst::Pad::builder(gst::PadDirection::Sink).name("sink"),
        }
        .chain_function(|pad, parent, buffer| {
            OmxBaseFilter::catch_panic_pad_function(
                parent,
                || Err(gst::FlowError::Error),
                |imp| imp.sink_chain(pad, buffer),
            )
        })
        .event_function(|pad, parent, event| {
            OmxBaseFilter::catch_panic_pad_function(
                parent,
                || false,
                |imp| imp.sink_event(pad, event),
            )
        })
        .build();

        let srcpad = match klass.pad_template("src") {
            Some(templ) => gst::Pad::builder_from_template(&templ),
            None => gst::Pad::builder(gst::PadDirection::Src).name("src"),
        }
        .flags(gst::PadFlags::FIXED_CAPS)
        .build();

        OmxBaseFilter {
            sinkpad,
            srcpad,
            settings: Mutex::new(Settings::new()),
            state: Mutex::new(None),
            caps_lock: CapsLock::default(),
        }
    }
}

impl ObjectImpl for OmxBaseFilter {
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES: LazyLock<Vec<glib::ParamSpec>> = LazyLock::new(|| {
            vec![
                glib::ParamSpecString::builder("component-name")
                    .nick("Component name")
                    .blurb("Name of the OpenMAX IL component to use")
                    .mutable_ready()
                    .build(),
                glib::ParamSpecString::builder("library-name")
                    .nick("Library name")
                    .blurb("Name of the OpenMAX IL implementation library to use")
                    .mutable_ready()
                    .build(),
            ]
        });

        PROPERTIES.as_ref()
    }

    fn constructed(&self) {
        #[cfg(feature = "tracing")]
        {
            use tracing_subscriber::filter::LevelFilter;
            use tracing_subscriber::util::SubscriberInitExt;

            let _ = tracing_subscriber::fmt()
                .compact()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(false)
                .with_max_level(LevelFilter::TRACE)
                .with_ansi(true)
                .finish()
                .try_init();
        }

        self.parent_constructed();

        let obj = self.obj();
        for pad in [&self.sinkpad, &self.srcpad] {
            if let Err(err) = obj.add_pad(pad) {
                gst::error!(CAT, imp = self, "Failed to add pad {}: {}", pad.name(), err);
            }
        }
    }

    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        let mut settings = self.settings_lock();
        match pspec.name() {
            "component-name" => match value.get::<Option<String>>() {
                Ok(name) => {
                    gst::info!(CAT, imp = self, "Changing component-name to {:?}", name);
                    settings.component_name = name;
                }
                Err(_) => gst::error!(CAT, imp = self, "Invalid type for component-name property"),
            },
            "library-name" => match value.get::<Option<String>>() {
                Ok(name) => {
                    gst::info!(CAT, imp = self, "Changing library-name to {:?}", name);
                    settings.library_name = name;
                }
                Err(_) => gst::error!(CAT, imp = self, "Invalid type for library-name property"),
            },
            other => gst::error!(CAT, imp = self, "Unknown property '{}'", other),
        }
    }

    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        let config = self.element_config();
        let settings = self.settings_lock();
        match pspec.name() {
            "component-name" => settings.component_name(&config).to_value(),
            "library-name" => settings.library_name(&config).to_value(),
            other => {
                gst::error!(CAT, imp = self, "Unknown property {}", other);
                glib::Value::from(&"")
            }
        }
    }
}

impl GstObjectImpl for OmxBaseFilter {}

impl ElementImpl for OmxBaseFilter {
    fn change_state(
        &self,
        transition: gst::StateChange,
    ) -> Result<gst::StateChangeSuccess, gst::StateChangeError> {
        gst::trace!(CAT, imp = self, "Changing state {:?}", transition);

        match transition {
            gst::StateChange::NullToReady => {
                if let Err(err) = self.load() {
                    self.post_error_message(err);
                    return Err(gst::StateChangeError);
                }
            }
            gst::StateChange::ReadyToPaused => {
                if let Some(state) = self.state_lock().as_mut() {
                    state.shared.input.reset();
                    state.shared.output.reset();
                    state.reset_stream();
                }
            }
            gst::StateChange::PausedToReady => {
                self.set_flushing(true);
                let _ = self.srcpad.stop_task();
            }
            _ => {}
        }

        let success = self.parent_change_state(transition)?;

        match transition {
            gst::StateChange::PausedToReady => self.stop_streaming(),
            gst::StateChange::ReadyToNull => self.unload(),
            _ => {}
        }

        Ok(success)
    }
}
