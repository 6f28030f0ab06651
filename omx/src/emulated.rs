// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! An OpenMAX IL component implemented in Rust.
//!
//! [`EmulatedComponent`] builds a real `OMX_COMPONENTTYPE` vtable backed by
//! in-process state, so everything above it (the safe [`Component`] wrapper
//! and the GStreamer elements) runs the same code paths as against a vendor
//! core. The component:
//!
//! - stores one parameter block per `(index, port)` and rejects blocks whose
//!   `nSize` or version do not match the structure of the index
//! - executes state, flush and port commands on a worker thread and reports
//!   completion through the event callback
//! - allocates buffers and copies input payloads to output buffers
//!   unchanged, keeping timestamps and the EOS flag
//!
//! Port 0 is the input port and port 1 the output port.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    mem::size_of,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
};

use omx_sys::{
    OMX_AUDIO_PARAM_ADPCMTYPE, OMX_AUDIO_PARAM_AMRTYPE, OMX_AUDIO_PARAM_PCMMODETYPE,
    OMX_BUFFERHEADERTYPE, OMX_CALLBACKTYPE, OMX_COMMANDTYPE, OMX_COMPONENTTYPE, OMX_ERRORTYPE,
    OMX_EVENTTYPE, OMX_HANDLETYPE, OMX_INDEXTYPE, OMX_PARAM_PORTDEFINITIONTYPE, OMX_PTR,
    OMX_STATETYPE, OMX_STRING, OMX_U8, OMX_U32, OMX_UUIDTYPE, OMX_VERSIONTYPE,
};

use crate::{
    AmrParam, Command, Component, ComponentLoader, Error, EventHandler, Parameter, PcmModeParam,
    PortDefinitionParam, Result, State, component::HandleOwner, event::CallbackContext,
    param::spec_version,
};

const INPUT_PORT: u32 = 0;
const OUTPUT_PORT: u32 = 1;

const AUDIO_BUFFER_SIZE: u32 = 4096;
const VIDEO_WIDTH: u32 = 176;
const VIDEO_HEIGHT: u32 = 144;
const VIDEO_OUTPUT_BUFFER_SIZE: u32 = 65536;

/// Size of the structure an index expects, for the indices the emulated
/// component knows.
fn block_size(index: OMX_INDEXTYPE) -> Option<usize> {
    match index {
        omx_sys::OMX_IndexParamPortDefinition => Some(size_of::<OMX_PARAM_PORTDEFINITIONTYPE>()),
        omx_sys::OMX_IndexParamAudioPcm => Some(size_of::<OMX_AUDIO_PARAM_PCMMODETYPE>()),
        omx_sys::OMX_IndexParamAudioAdpcm => Some(size_of::<OMX_AUDIO_PARAM_ADPCMTYPE>()),
        omx_sys::OMX_IndexParamAudioAmr => Some(size_of::<OMX_AUDIO_PARAM_AMRTYPE>()),
        _ => None,
    }
}

fn bytes_of<P: Parameter>(param: &P) -> Vec<u8> {
    let ptr = param as *const P as *const u8;
    unsafe { std::slice::from_raw_parts(ptr, size_of::<P>()) }.to_vec()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Blocks = HashMap<(OMX_INDEXTYPE, u32), Vec<u8>>;

/// Loader for an in-process component.
///
/// Clones share the most recently loaded instance, which the runtime
/// controls ([`EmulatedComponent::port_settings_changed`],
/// [`EmulatedComponent::parameter`], ...) act on.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use omx::{ComponentLoader, Event, EventHandler, BufferHeader, PcmModeParam};
/// use omx::emulated::EmulatedComponent;
///
/// struct Ignore;
/// impl EventHandler for Ignore {
///     fn event(&self, _event: Event) {}
///     fn empty_buffer_done(&self, _header: BufferHeader) {}
///     fn fill_buffer_done(&self, _header: BufferHeader) {}
/// }
///
/// # fn main() -> Result<(), omx::Error> {
/// let loader = EmulatedComponent::audio("OMX.emulated.audio");
/// let component = loader.load("OMX.emulated.audio", Arc::new(Ignore))?;
/// let pcm = component.update_parameter::<PcmModeParam>(1, |pcm| pcm.set_sampling_rate(44100))?;
/// assert_eq!(pcm.sampling_rate(), 44100);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EmulatedComponent {
    name: String,
    defaults: Blocks,
    inline_settings_changes: bool,
    live: Arc<Mutex<Weak<Shared>>>,
}

impl std::fmt::Debug for EmulatedComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmulatedComponent")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn port_definition(port: u32, domain: u32, count: u32, size: u32) -> PortDefinitionParam {
    let mut def = PortDefinitionParam::new(port);
    // Only the body is touched, the header stays as `new` set it.
    let raw = unsafe { def.as_raw_mut() };
    raw.eDir = if port == INPUT_PORT {
        omx_sys::OMX_DirInput
    } else {
        omx_sys::OMX_DirOutput
    };
    raw.eDomain = domain;
    raw.nBufferCountActual = count;
    raw.nBufferCountMin = 1;
    raw.nBufferSize = size;
    raw.bEnabled = omx_sys::OMX_TRUE;
    def
}

fn pcm_mode(port: u32) -> PcmModeParam {
    let mut pcm = PcmModeParam::new(port);
    let raw = unsafe { pcm.as_raw_mut() };
    raw.nChannels = 1;
    raw.eNumData = omx_sys::OMX_NumericalDataSigned;
    raw.eEndian = omx_sys::OMX_EndianLittle;
    raw.bInterleaved = omx_sys::OMX_TRUE;
    raw.nBitPerSample = 16;
    raw.nSamplingRate = 8000;
    raw.ePCMMode = omx_sys::OMX_AUDIO_PCMModeLinear;
    raw.eChannelMapping[0] = omx_sys::OMX_AUDIO_ChannelCF;
    pcm
}

impl EmulatedComponent {
    fn new(name: &str) -> Self {
        EmulatedComponent {
            name: name.to_string(),
            defaults: Blocks::new(),
            inline_settings_changes: false,
            live: Arc::new(Mutex::new(Weak::new())),
        }
    }

    /// An audio component: PCM blocks on both ports, an AMR block on the
    /// output port, mono 8 kHz 16 bit defaults.
    pub fn audio(name: &str) -> Self {
        let mut amr = AmrParam::new(OUTPUT_PORT);
        amr.set_channels(1);
        amr.set_bit_rate(23850);
        amr.set_band_mode(omx_sys::OMX_AUDIO_AMRBandModeWB8);

        EmulatedComponent::new(name)
            .with_parameter(port_definition(
                INPUT_PORT,
                omx_sys::OMX_PortDomainAudio,
                2,
                AUDIO_BUFFER_SIZE,
            ))
            .with_parameter(port_definition(
                OUTPUT_PORT,
                omx_sys::OMX_PortDomainAudio,
                2,
                AUDIO_BUFFER_SIZE,
            ))
            .with_parameter(pcm_mode(INPUT_PORT))
            .with_parameter(pcm_mode(OUTPUT_PORT))
            .with_parameter(amr)
    }

    /// A video component with a 176x144 I420 input port and an output port
    /// waiting for its compression format.
    pub fn video(name: &str) -> Self {
        let mut input = port_definition(
            INPUT_PORT,
            omx_sys::OMX_PortDomainVideo,
            2,
            VIDEO_WIDTH * VIDEO_HEIGHT * 3 / 2,
        );
        input.set_frame_width(VIDEO_WIDTH);
        input.set_frame_height(VIDEO_HEIGHT);
        input.set_framerate(15 << 16);
        input.set_color_format(omx_sys::OMX_COLOR_FormatYUV420Planar);

        let mut output = port_definition(
            OUTPUT_PORT,
            omx_sys::OMX_PortDomainVideo,
            2,
            VIDEO_OUTPUT_BUFFER_SIZE,
        );
        output.set_frame_width(VIDEO_WIDTH);
        output.set_frame_height(VIDEO_HEIGHT);

        EmulatedComponent::new(name)
            .with_parameter(input)
            .with_parameter(output)
    }

    /// Adds or replaces the initial block for `param`'s index and port.
    pub fn with_parameter<P: Parameter>(mut self, param: P) -> Self {
        self.defaults
            .insert((P::INDEX, param.port()), bytes_of(&param));
        self
    }

    /// Raises `PortSettingsChanged` for the output port from inside
    /// `SetParameter` calls on the input port, on the caller's thread.
    pub fn with_inline_settings_changes(mut self) -> Self {
        self.inline_settings_changes = true;
        self
    }

    /// Name the component answers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn live(&self) -> Result<Arc<Shared>> {
        lock(&self.live)
            .upgrade()
            .ok_or_else(|| Error::Other(format!("{} is not loaded", self.name)))
    }

    /// Raises `OMX_EventPortSettingsChanged` for `port` on the live instance.
    pub fn port_settings_changed(&self, port: u32) -> Result<()> {
        self.live()?.post(Message::PortSettingsChanged(port))
    }

    /// Reads a block of the live instance without going through the
    /// component interface.
    pub fn parameter<P: Parameter>(&self, port: u32) -> Result<P> {
        let shared = self.live()?;
        let blocks = lock(&shared.blocks);
        let bytes = blocks
            .get(&(P::INDEX, port))
            .ok_or(Error::UnsupportedIndex)?;
        let mut param = P::new(port);
        let len = bytes.len().min(size_of::<P>());
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), &mut param as *mut P as *mut u8, len)
        };
        Ok(param)
    }

    /// Replaces a block of the live instance, the way a component updates
    /// its own settings before raising `PortSettingsChanged`.
    pub fn set_parameter<P: Parameter>(&self, param: P) -> Result<()> {
        let shared = self.live()?;
        lock(&shared.blocks).insert((P::INDEX, param.port()), bytes_of(&param));
        Ok(())
    }

    /// Current state of the live instance.
    pub fn state(&self) -> Result<State> {
        let shared = self.live()?;
        let state = *lock(&shared.state);
        State::from_raw(state).ok_or(Error::InvalidState)
    }
}

impl ComponentLoader for EmulatedComponent {
    fn load(&self, name: &str, handler: Arc<dyn EventHandler>) -> Result<Component> {
        if name != self.name {
            return Err(Error::ComponentNotFound);
        }

        let (sender, receiver) = mpsc::channel();
        let shared = Arc::new(Shared {
            name: self.name.clone(),
            blocks: Mutex::new(self.defaults.clone()),
            state: Mutex::new(omx_sys::OMX_StateLoaded),
            callbacks: Mutex::new(None),
            handle: AtomicUsize::new(0),
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(None),
            allocations: Mutex::new(HashSet::new()),
            inline_settings_changes: self.inline_settings_changes,
        });

        let worker_shared = shared.clone();
        let worker = thread::Builder::new()
            .name(format!("omx-emulated-{}", self.name))
            .spawn(move || worker_shared.run(receiver))
            .map_err(|error| Error::Other(format!("spawning worker: {error}")))?;
        *lock(&shared.worker) = Some(worker);

        let vtable = Box::new(OMX_COMPONENTTYPE {
            nSize: size_of::<OMX_COMPONENTTYPE>() as u32,
            nVersion: spec_version(),
            pComponentPrivate: Arc::into_raw(shared.clone()) as OMX_PTR,
            GetComponentVersion: Some(get_component_version),
            SendCommand: Some(send_command),
            GetParameter: Some(get_parameter),
            SetParameter: Some(set_parameter),
            GetState: Some(get_state),
            AllocateBuffer: Some(allocate_buffer),
            FreeBuffer: Some(free_buffer),
            EmptyThisBuffer: Some(empty_this_buffer),
            FillThisBuffer: Some(fill_this_buffer),
            SetCallbacks: Some(set_callbacks),
            ComponentDeInit: Some(component_deinit),
            ..Default::default()
        });
        let handle = Box::into_raw(vtable) as OMX_HANDLETYPE;
        shared.handle.store(handle as usize, Ordering::Release);
        *lock(&self.live) = Arc::downgrade(&shared);

        let mut callbacks = CallbackContext::new(handler);
        let app_data = callbacks.app_data();
        let table = callbacks.table();
        let component = Component::new(
            handle,
            name.to_string(),
            Arc::new(EmulatedOwner),
            callbacks,
        );
        Error::from_omx(unsafe { set_callbacks(handle, table, app_data) })?;
        tracing::debug!(component = name, "emulated component loaded");
        Ok(component)
    }
}

/// Releases handles created by [`EmulatedComponent::load`].
struct EmulatedOwner;

impl HandleOwner for EmulatedOwner {
    unsafe fn free_handle(&self, handle: OMX_HANDLETYPE) -> OMX_ERRORTYPE {
        let component = handle as *mut OMX_COMPONENTTYPE;
        if component.is_null() {
            return omx_sys::OMX_ErrorBadParameter;
        }
        unsafe {
            if let Some(deinit) = (*component).ComponentDeInit {
                deinit(handle);
            }
            let component = Box::from_raw(component);
            drop(Arc::from_raw(component.pComponentPrivate as *const Shared));
        }
        omx_sys::OMX_ErrorNone
    }
}

enum Message {
    Command(OMX_COMMANDTYPE, OMX_U32),
    Empty(usize),
    Fill(usize),
    PortSettingsChanged(u32),
    Shutdown,
}

/// Callback table and application data registered with `SetCallbacks`.
#[derive(Clone, Copy)]
struct Callbacks {
    table: OMX_CALLBACKTYPE,
    app_data: usize,
}

/// State shared between the vtable entry points and the worker thread.
///
/// Header pointers are kept as addresses so the state stays `Send`.
struct Shared {
    name: String,
    blocks: Mutex<Blocks>,
    state: Mutex<OMX_STATETYPE>,
    callbacks: Mutex<Option<Callbacks>>,
    handle: AtomicUsize,
    sender: Mutex<Option<mpsc::Sender<Message>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    allocations: Mutex<HashSet<usize>>,
    inline_settings_changes: bool,
}

impl Shared {
    fn post(&self, message: Message) -> Result<()> {
        lock(&self.sender)
            .as_ref()
            .ok_or(Error::InvalidState)?
            .send(message)
            .map_err(|_| Error::InvalidState)
    }

    fn handle(&self) -> OMX_HANDLETYPE {
        self.handle.load(Ordering::Acquire) as OMX_HANDLETYPE
    }

    fn emit(&self, event: OMX_EVENTTYPE, data1: u32, data2: u32) {
        let Some(callbacks) = *lock(&self.callbacks) else {
            return;
        };
        if let Some(handler) = callbacks.table.EventHandler {
            unsafe {
                handler(
                    self.handle(),
                    callbacks.app_data as OMX_PTR,
                    event,
                    data1,
                    data2,
                    std::ptr::null_mut(),
                )
            };
        }
    }

    fn return_input(&self, header: usize) {
        let Some(callbacks) = *lock(&self.callbacks) else {
            return;
        };
        if let Some(done) = callbacks.table.EmptyBufferDone {
            unsafe {
                done(
                    self.handle(),
                    callbacks.app_data as OMX_PTR,
                    header as *mut OMX_BUFFERHEADERTYPE,
                )
            };
        }
    }

    fn return_output(&self, header: usize) {
        let Some(callbacks) = *lock(&self.callbacks) else {
            return;
        };
        if let Some(done) = callbacks.table.FillBufferDone {
            unsafe {
                done(
                    self.handle(),
                    callbacks.app_data as OMX_PTR,
                    header as *mut OMX_BUFFERHEADERTYPE,
                )
            };
        }
    }

    fn error(&self, error: Error) {
        tracing::warn!(component = self.name.as_str(), %error, "emulated component error");
        self.emit(omx_sys::OMX_EventError, error.code(), 0);
    }

    fn run(&self, receiver: mpsc::Receiver<Message>) {
        let mut inputs = VecDeque::new();
        let mut outputs = VecDeque::new();
        while let Ok(message) = receiver.recv() {
            match message {
                Message::Command(command, param) => {
                    self.execute(command, param, &mut inputs, &mut outputs)
                }
                Message::Empty(header) => inputs.push_back(header),
                Message::Fill(header) => outputs.push_back(header),
                Message::PortSettingsChanged(port) => {
                    self.emit(omx_sys::OMX_EventPortSettingsChanged, port, 0)
                }
                Message::Shutdown => break,
            }
            if *lock(&self.state) == omx_sys::OMX_StateExecuting {
                self.process(&mut inputs, &mut outputs);
            }
        }
        self.release_allocations();
        tracing::trace!(component = self.name.as_str(), "emulated worker finished");
    }

    fn execute(
        &self,
        command: OMX_COMMANDTYPE,
        param: OMX_U32,
        inputs: &mut VecDeque<usize>,
        outputs: &mut VecDeque<usize>,
    ) {
        match Command::from_raw(command, param) {
            Some(Command::StateSet(target)) => {
                let current = *lock(&self.state);
                let Some(current) = State::from_raw(current) else {
                    return self.error(Error::InvalidState);
                };
                if current == target {
                    return self.error(Error::SameState);
                }
                let allowed = matches!(
                    (current, target),
                    (_, State::Invalid)
                        | (State::Loaded, State::Idle)
                        | (State::Loaded, State::WaitForResources)
                        | (State::WaitForResources, State::Loaded)
                        | (State::WaitForResources, State::Idle)
                        | (State::Idle, State::Loaded)
                        | (State::Idle, State::Executing)
                        | (State::Idle, State::Pause)
                        | (State::Executing, State::Idle)
                        | (State::Executing, State::Pause)
                        | (State::Pause, State::Idle)
                        | (State::Pause, State::Executing)
                );
                if !allowed {
                    return self.error(Error::IncorrectStateTransition);
                }
                if target == State::Idle {
                    self.flush(omx_sys::OMX_ALL, inputs, outputs);
                }
                *lock(&self.state) = target.as_raw();
                tracing::debug!(component = self.name.as_str(), ?current, ?target, "state changed");
                self.emit(
                    omx_sys::OMX_EventCmdComplete,
                    omx_sys::OMX_CommandStateSet,
                    target.as_raw(),
                );
            }
            Some(Command::Flush(port)) => {
                self.flush(port, inputs, outputs);
                for port in ports(port) {
                    self.emit(omx_sys::OMX_EventCmdComplete, omx_sys::OMX_CommandFlush, port);
                }
            }
            Some(Command::PortDisable(port)) | Some(Command::PortEnable(port)) => {
                let enabled = command == omx_sys::OMX_CommandPortEnable;
                for port in ports(port) {
                    self.set_port_enabled(port, enabled);
                    self.emit(omx_sys::OMX_EventCmdComplete, command, port);
                }
            }
            None => self.error(Error::BadParameter),
        }
    }

    fn set_port_enabled(&self, port: u32, enabled: bool) {
        let mut blocks = lock(&self.blocks);
        if let Some(bytes) = blocks.get_mut(&(omx_sys::OMX_IndexParamPortDefinition, port)) {
            let def = bytes.as_mut_ptr() as *mut OMX_PARAM_PORTDEFINITIONTYPE;
            unsafe {
                let mut value = def.read_unaligned();
                value.bEnabled = if enabled {
                    omx_sys::OMX_TRUE
                } else {
                    omx_sys::OMX_FALSE
                };
                def.write_unaligned(value);
            }
        }
    }

    /// Hands every queued header of `port` back to the client.
    fn flush(&self, port: u32, inputs: &mut VecDeque<usize>, outputs: &mut VecDeque<usize>) {
        if port == INPUT_PORT || port == omx_sys::OMX_ALL {
            while let Some(header) = inputs.pop_front() {
                self.return_input(header);
            }
        }
        if port == OUTPUT_PORT || port == omx_sys::OMX_ALL {
            while let Some(header) = outputs.pop_front() {
                unsafe {
                    let raw = &mut *(header as *mut OMX_BUFFERHEADERTYPE);
                    raw.nFilledLen = 0;
                    raw.nOffset = 0;
                    raw.nFlags = 0;
                }
                self.return_output(header);
            }
        }
    }

    /// Copies queued input payloads to queued output buffers.
    ///
    /// An input larger than the output buffers is spread over several
    /// outputs that all carry its timestamp; only the last one carries
    /// its flags.
    fn process(&self, inputs: &mut VecDeque<usize>, outputs: &mut VecDeque<usize>) {
        while let (Some(&input), Some(&output)) = (inputs.front(), outputs.front()) {
            let (input_done, output_flags) = unsafe {
                let src = &mut *(input as *mut OMX_BUFFERHEADERTYPE);
                let dst = &mut *(output as *mut OMX_BUFFERHEADERTYPE);

                if src.nFilledLen == 0 && src.nFlags & omx_sys::OMX_BUFFERFLAG_EOS == 0 {
                    (true, None)
                } else {
                    let len = src.nFilledLen.min(dst.nAllocLen);
                    if len > 0 {
                        std::ptr::copy_nonoverlapping(
                            src.pBuffer.add(src.nOffset as usize),
                            dst.pBuffer,
                            len as usize,
                        );
                    }
                    src.nOffset += len;
                    src.nFilledLen -= len;
                    let last = src.nFilledLen == 0;

                    dst.nOffset = 0;
                    dst.nFilledLen = len;
                    dst.nTimeStamp = src.nTimeStamp;
                    dst.nFlags = if last {
                        src.nFlags
                    } else {
                        src.nFlags & !omx_sys::OMX_BUFFERFLAG_EOS
                    };
                    if last {
                        src.nOffset = 0;
                    }
                    (last, Some(dst.nFlags))
                }
            };

            if let Some(flags) = output_flags {
                outputs.pop_front();
                self.return_output(output);
                if flags & omx_sys::OMX_BUFFERFLAG_EOS != 0 {
                    self.emit(omx_sys::OMX_EventBufferFlag, OUTPUT_PORT, flags);
                }
            }
            if input_done {
                inputs.pop_front();
                self.return_input(input);
            }
        }
    }

    fn allocate(&self, port: u32, app_private: OMX_PTR, size: u32) -> Result<usize> {
        if port != INPUT_PORT && port != OUTPUT_PORT {
            return Err(Error::BadPortIndex);
        }
        if size == 0 {
            return Err(Error::BadParameter);
        }
        let data = Box::into_raw(vec![0u8; size as usize].into_boxed_slice()) as *mut OMX_U8;
        let header = Box::new(OMX_BUFFERHEADERTYPE {
            nSize: size_of::<OMX_BUFFERHEADERTYPE>() as u32,
            nVersion: spec_version(),
            pBuffer: data,
            nAllocLen: size,
            pAppPrivate: app_private,
            nInputPortIndex: if port == INPUT_PORT { port } else { omx_sys::OMX_ALL },
            nOutputPortIndex: if port == OUTPUT_PORT { port } else { omx_sys::OMX_ALL },
            ..Default::default()
        });
        let header = Box::into_raw(header) as usize;
        lock(&self.allocations).insert(header);
        Ok(header)
    }

    fn release(&self, header: usize) -> Result<()> {
        if !lock(&self.allocations).remove(&header) {
            return Err(Error::BadParameter);
        }
        unsafe { release_header(header) };
        Ok(())
    }

    fn release_allocations(&self) {
        let headers: Vec<usize> = lock(&self.allocations).drain().collect();
        for header in headers {
            unsafe { release_header(header) };
        }
    }

    fn shutdown(&self) {
        *lock(&self.callbacks) = None;
        if let Some(sender) = lock(&self.sender).take() {
            let _ = sender.send(Message::Shutdown);
        }
        let worker = lock(&self.worker).take();
        if let Some(worker) = worker {
            // Released from inside a callback: the worker exits by itself
            // once the callback returns.
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
    }

    fn check_block(&self, index: OMX_INDEXTYPE, block: OMX_PTR) -> Result<(usize, u32)> {
        let expected = block_size(index).ok_or(Error::UnsupportedIndex)?;
        if block.is_null() {
            return Err(Error::BadParameter);
        }
        let bytes = block as *const u8;
        let (size, major, minor, port) = unsafe {
            (
                (bytes as *const u32).read_unaligned(),
                *bytes.add(4),
                *bytes.add(5),
                (bytes.add(8) as *const u32).read_unaligned(),
            )
        };
        if size as usize != expected {
            tracing::warn!(
                component = self.name.as_str(),
                index,
                size,
                expected,
                "rejecting parameter block with wrong size"
            );
            return Err(Error::BadParameter);
        }
        if major != omx_sys::OMX_VERSION_MAJOR || minor != omx_sys::OMX_VERSION_MINOR {
            tracing::warn!(
                component = self.name.as_str(),
                index,
                major,
                minor,
                "rejecting parameter block with wrong version"
            );
            return Err(Error::VersionMismatch);
        }
        Ok((expected, port))
    }

    fn get_parameter(&self, index: OMX_INDEXTYPE, block: OMX_PTR) -> Result<()> {
        let (size, port) = self.check_block(index, block)?;
        let blocks = lock(&self.blocks);
        let stored = blocks.get(&(index, port)).ok_or_else(|| missing(port))?;
        let len = size.min(stored.len());
        unsafe { std::ptr::copy_nonoverlapping(stored.as_ptr(), block as *mut u8, len) };
        Ok(())
    }

    fn set_parameter(&self, index: OMX_INDEXTYPE, block: OMX_PTR) -> Result<()> {
        let (size, port) = self.check_block(index, block)?;
        if *lock(&self.state) != omx_sys::OMX_StateLoaded {
            return Err(Error::IncorrectStateOperation);
        }
        {
            let mut blocks = lock(&self.blocks);
            let stored = blocks.get_mut(&(index, port)).ok_or_else(|| missing(port))?;
            let source = unsafe { std::slice::from_raw_parts(block as *const u8, size) };
            stored.clear();
            stored.extend_from_slice(source);
        }
        if self.inline_settings_changes && port == INPUT_PORT {
            self.emit(omx_sys::OMX_EventPortSettingsChanged, OUTPUT_PORT, 0);
        }
        Ok(())
    }

    fn queue(&self, header: *mut OMX_BUFFERHEADERTYPE, input: bool) -> Result<()> {
        let state = *lock(&self.state);
        if !matches!(
            state,
            omx_sys::OMX_StateIdle | omx_sys::OMX_StateExecuting | omx_sys::OMX_StatePause
        ) {
            return Err(Error::IncorrectStateOperation);
        }
        let header = header as usize;
        if !lock(&self.allocations).contains(&header) {
            return Err(Error::BadParameter);
        }
        self.post(if input {
            Message::Empty(header)
        } else {
            Message::Fill(header)
        })
    }
}

fn missing(port: u32) -> Error {
    if port == INPUT_PORT || port == OUTPUT_PORT {
        Error::UnsupportedIndex
    } else {
        Error::BadPortIndex
    }
}

fn ports(port: u32) -> Vec<u32> {
    if port == omx_sys::OMX_ALL {
        vec![INPUT_PORT, OUTPUT_PORT]
    } else {
        vec![port]
    }
}

/// # Safety
///
/// `header` must come from [`Shared::allocate`] and not be used afterwards.
unsafe fn release_header(header: usize) {
    unsafe {
        let header = Box::from_raw(header as *mut OMX_BUFFERHEADERTYPE);
        if !header.pBuffer.is_null() {
            drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                header.pBuffer,
                header.nAllocLen as usize,
            )));
        }
    }
}

unsafe fn shared<'a>(handle: OMX_HANDLETYPE) -> Option<&'a Shared> {
    unsafe {
        let component = (handle as *const OMX_COMPONENTTYPE).as_ref()?;
        (component.pComponentPrivate as *const Shared).as_ref()
    }
}

fn to_code(result: Result<()>) -> OMX_ERRORTYPE {
    match result {
        Ok(()) => omx_sys::OMX_ErrorNone,
        Err(error) => error.code(),
    }
}

unsafe extern "C" fn get_component_version(
    handle: OMX_HANDLETYPE,
    name: OMX_STRING,
    component_version: *mut OMX_VERSIONTYPE,
    spec: *mut OMX_VERSIONTYPE,
    _uuid: *mut OMX_UUIDTYPE,
) -> OMX_ERRORTYPE {
    let Some(shared) = (unsafe { shared(handle) }) else {
        return omx_sys::OMX_ErrorInvalidComponent;
    };
    unsafe {
        if !name.is_null() {
            let bytes = shared.name.as_bytes();
            let len = bytes.len().min(omx_sys::OMX_MAX_STRINGNAME_SIZE - 1);
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), name as *mut u8, len);
            *name.add(len) = 0;
        }
        if let Some(version) = component_version.as_mut() {
            *version = spec_version();
        }
        if let Some(version) = spec.as_mut() {
            *version = spec_version();
        }
    }
    omx_sys::OMX_ErrorNone
}

unsafe extern "C" fn send_command(
    handle: OMX_HANDLETYPE,
    command: OMX_COMMANDTYPE,
    param: OMX_U32,
    _data: OMX_PTR,
) -> OMX_ERRORTYPE {
    let Some(shared) = (unsafe { shared(handle) }) else {
        return omx_sys::OMX_ErrorInvalidComponent;
    };
    let result = match Command::from_raw(command, param) {
        None => Err(Error::BadParameter),
        Some(Command::Flush(port) | Command::PortDisable(port) | Command::PortEnable(port))
            if port != INPUT_PORT && port != OUTPUT_PORT && port != omx_sys::OMX_ALL =>
        {
            Err(Error::BadPortIndex)
        }
        Some(_) => shared.post(Message::Command(command, param)),
    };
    to_code(result)
}

unsafe extern "C" fn get_parameter(
    handle: OMX_HANDLETYPE,
    index: OMX_INDEXTYPE,
    block: OMX_PTR,
) -> OMX_ERRORTYPE {
    match unsafe { shared(handle) } {
        Some(shared) => to_code(shared.get_parameter(index, block)),
        None => omx_sys::OMX_ErrorInvalidComponent,
    }
}

unsafe extern "C" fn set_parameter(
    handle: OMX_HANDLETYPE,
    index: OMX_INDEXTYPE,
    block: OMX_PTR,
) -> OMX_ERRORTYPE {
    match unsafe { shared(handle) } {
        Some(shared) => to_code(shared.set_parameter(index, block)),
        None => omx_sys::OMX_ErrorInvalidComponent,
    }
}

unsafe extern "C" fn get_state(handle: OMX_HANDLETYPE, state: *mut OMX_STATETYPE) -> OMX_ERRORTYPE {
    let Some(shared) = (unsafe { shared(handle) }) else {
        return omx_sys::OMX_ErrorInvalidComponent;
    };
    match unsafe { state.as_mut() } {
        Some(state) => {
            *state = *lock(&shared.state);
            omx_sys::OMX_ErrorNone
        }
        None => omx_sys::OMX_ErrorBadParameter,
    }
}

unsafe extern "C" fn allocate_buffer(
    handle: OMX_HANDLETYPE,
    header: *mut *mut OMX_BUFFERHEADERTYPE,
    port: OMX_U32,
    app_private: OMX_PTR,
    size: OMX_U32,
) -> OMX_ERRORTYPE {
    let Some(shared) = (unsafe { shared(handle) }) else {
        return omx_sys::OMX_ErrorInvalidComponent;
    };
    if header.is_null() {
        return omx_sys::OMX_ErrorBadParameter;
    }
    match shared.allocate(port, app_private, size) {
        Ok(allocated) => {
            unsafe { *header = allocated as *mut OMX_BUFFERHEADERTYPE };
            omx_sys::OMX_ErrorNone
        }
        Err(error) => error.code(),
    }
}

unsafe extern "C" fn free_buffer(
    handle: OMX_HANDLETYPE,
    _port: OMX_U32,
    header: *mut OMX_BUFFERHEADERTYPE,
) -> OMX_ERRORTYPE {
    match unsafe { shared(handle) } {
        Some(shared) => to_code(shared.release(header as usize)),
        None => omx_sys::OMX_ErrorInvalidComponent,
    }
}

unsafe extern "C" fn empty_this_buffer(
    handle: OMX_HANDLETYPE,
    header: *mut OMX_BUFFERHEADERTYPE,
) -> OMX_ERRORTYPE {
    match unsafe { shared(handle) } {
        Some(shared) => to_code(shared.queue(header, true)),
        None => omx_sys::OMX_ErrorInvalidComponent,
    }
}

unsafe extern "C" fn fill_this_buffer(
    handle: OMX_HANDLETYPE,
    header: *mut OMX_BUFFERHEADERTYPE,
) -> OMX_ERRORTYPE {
    match unsafe { shared(handle) } {
        Some(shared) => to_code(shared.queue(header, false)),
        None => omx_sys::OMX_ErrorInvalidComponent,
    }
}

unsafe extern "C" fn set_callbacks(
    handle: OMX_HANDLETYPE,
    callbacks: *mut OMX_CALLBACKTYPE,
    app_data: OMX_PTR,
) -> OMX_ERRORTYPE {
    let Some(shared) = (unsafe { shared(handle) }) else {
        return omx_sys::OMX_ErrorInvalidComponent;
    };
    let Some(table) = (unsafe { callbacks.as_ref() }) else {
        return omx_sys::OMX_ErrorBadParameter;
    };
    *lock(&shared.callbacks) = Some(Callbacks {
        table: *table,
        app_data: app_data as usize,
    });
    omx_sys::OMX_ErrorNone
}

unsafe extern "C" fn component_deinit(handle: OMX_HANDLETYPE) -> OMX_ERRORTYPE {
    match unsafe { shared(handle) } {
        Some(shared) => {
            shared.shutdown();
            omx_sys::OMX_ErrorNone
        }
        None => omx_sys::OMX_ErrorInvalidComponent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferHeader, Event};
    use tracing_test::traced_test;

    struct Ignore;

    impl EventHandler for Ignore {
        fn event(&self, _event: Event) {}
        fn empty_buffer_done(&self, _header: BufferHeader) {}
        fn fill_buffer_done(&self, _header: BufferHeader) {}
    }

    #[traced_test]
    #[test]
    fn wrong_size_is_rejected_and_logged() {
        let loader = EmulatedComponent::audio("OMX.test.audio");
        let component = loader.load("OMX.test.audio", Arc::new(Ignore)).unwrap();

        let mut pcm = PcmModeParam::new(1);
        unsafe { pcm.as_raw_mut().nSize -= 4 };
        assert_eq!(component.set_parameter(&pcm), Err(Error::BadParameter));
        assert!(logs_contain("rejecting parameter block with wrong size"));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let loader = EmulatedComponent::video("OMX.test.video");
        let error = loader.load("OMX.other", Arc::new(Ignore)).unwrap_err();
        assert_eq!(error, Error::ComponentNotFound);
    }

    #[test]
    fn blocks_are_stored_per_port() {
        let loader = EmulatedComponent::audio("OMX.test.audio");
        let component = loader.load("OMX.test.audio", Arc::new(Ignore)).unwrap();

        component
            .update_parameter::<PcmModeParam>(0, |pcm| pcm.set_sampling_rate(16000))
            .unwrap();
        assert_eq!(loader.parameter::<PcmModeParam>(0).unwrap().sampling_rate(), 16000);
        assert_eq!(loader.parameter::<PcmModeParam>(1).unwrap().sampling_rate(), 8000);
        assert_eq!(
            component.get_parameter::<PcmModeParam>(7).unwrap_err(),
            Error::BadPortIndex
        );
    }

    #[derive(Default)]
    struct Record(Mutex<Vec<Event>>);

    impl EventHandler for Record {
        fn event(&self, event: Event) {
            lock(&self.0).push(event);
        }
        fn empty_buffer_done(&self, _header: BufferHeader) {}
        fn fill_buffer_done(&self, _header: BufferHeader) {}
    }

    #[test]
    fn inline_settings_changes_arrive_before_set_parameter_returns() {
        let loader =
            EmulatedComponent::audio("OMX.test.audio").with_inline_settings_changes();
        let record = Arc::new(Record::default());
        let component = loader.load("OMX.test.audio", record.clone()).unwrap();

        component
            .update_parameter::<PcmModeParam>(1, |pcm| pcm.set_sampling_rate(16000))
            .unwrap();
        assert!(lock(&record.0).is_empty());

        component
            .update_parameter::<PcmModeParam>(0, |pcm| pcm.set_sampling_rate(16000))
            .unwrap();
        assert_eq!(
            *lock(&record.0),
            vec![Event::PortSettingsChanged { port: 1 }]
        );
    }
}
