// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Safe handle to an OpenMAX IL component.

use std::sync::Arc;

use omx_sys::{OMX_BUFFERHEADERTYPE, OMX_COMPONENTTYPE, OMX_ERRORTYPE, OMX_HANDLETYPE, OMX_PTR};

use crate::{BufferHeader, Command, Error, Parameter, Result, State, event::CallbackContext};

/// Whatever created a component handle and knows how to release it.
pub(crate) trait HandleOwner: Send + Sync {
    /// Releases `handle`.
    ///
    /// # Safety
    ///
    /// `handle` must have been created by this owner and not be used again.
    unsafe fn free_handle(&self, handle: OMX_HANDLETYPE) -> OMX_ERRORTYPE;
}

/// A live component.
///
/// The handle is released when the value is dropped; the core (or emulated
/// component) that created it stays alive until then.
pub struct Component {
    handle: OMX_HANDLETYPE,
    name: String,
    owner: Arc<dyn HandleOwner>,
    // Must outlive the handle.
    _callbacks: Box<CallbackContext>,
}

// Safety: OpenMAX IL components accept calls from any thread, and the
// callback context only hands out shared references to a `Send + Sync`
// handler.
unsafe impl Send for Component {}
unsafe impl Sync for Component {}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}

impl Component {
    pub(crate) fn new(
        handle: OMX_HANDLETYPE,
        name: String,
        owner: Arc<dyn HandleOwner>,
        callbacks: Box<CallbackContext>,
    ) -> Self {
        Component {
            handle,
            name,
            owner,
            _callbacks: callbacks,
        }
    }

    fn vtable(&self) -> &OMX_COMPONENTTYPE {
        unsafe { &*(self.handle as *const OMX_COMPONENTTYPE) }
    }

    /// Name the component was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the block `P` for `port`.
    pub fn get_parameter<P: Parameter>(&self, port: u32) -> Result<P> {
        let get = self.vtable().GetParameter.ok_or(Error::NotImplemented)?;
        let mut param = P::new(port);
        let code = unsafe { get(self.handle, P::INDEX, &mut param as *mut P as OMX_PTR) };
        Error::from_omx(code).inspect_err(|error| {
            tracing::warn!(
                component = self.name.as_str(),
                index = P::INDEX,
                port,
                %error,
                "GetParameter failed"
            )
        })?;
        Ok(param)
    }

    /// Writes `param` to the port it addresses.
    pub fn set_parameter<P: Parameter>(&self, param: &P) -> Result<()> {
        let set = self.vtable().SetParameter.ok_or(Error::NotImplemented)?;
        let mut param = *param;
        let code = unsafe { set(self.handle, P::INDEX, &mut param as *mut P as OMX_PTR) };
        Error::from_omx(code).inspect_err(|error| {
            tracing::warn!(
                component = self.name.as_str(),
                index = P::INDEX,
                port = param.port(),
                %error,
                "SetParameter failed"
            )
        })
    }

    /// Reads the block `P` for `port`, lets `update` modify it and writes it
    /// back. Returns the block as written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn configure(component: &omx::Component) -> Result<(), omx::Error> {
    /// use omx::PcmModeParam;
    ///
    /// component.update_parameter::<PcmModeParam>(1, |pcm| pcm.set_sampling_rate(44100))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn update_parameter<P: Parameter>(
        &self,
        port: u32,
        update: impl FnOnce(&mut P),
    ) -> Result<P> {
        let mut param = self.get_parameter::<P>(port)?;
        update(&mut param);
        self.set_parameter(&param)?;
        Ok(param)
    }

    /// Sends `command`. Completion is reported through
    /// [`crate::Event::CommandComplete`].
    pub fn send_command(&self, command: Command) -> Result<()> {
        let send = self.vtable().SendCommand.ok_or(Error::NotImplemented)?;
        let (kind, param) = command.as_raw();
        tracing::debug!(component = self.name.as_str(), ?command, "sending command");
        Error::from_omx(unsafe { send(self.handle, kind, param, std::ptr::null_mut()) })
    }

    /// Current state of the component.
    pub fn state(&self) -> Result<State> {
        let get = self.vtable().GetState.ok_or(Error::NotImplemented)?;
        let mut state = omx_sys::OMX_StateInvalid;
        Error::from_omx(unsafe { get(self.handle, &mut state) })?;
        State::from_raw(state).ok_or_else(|| Error::Other(format!("unknown state {state}")))
    }

    /// Lets the component allocate a buffer of `size` bytes on `port`.
    pub fn allocate_buffer(&self, port: u32, size: u32) -> Result<BufferHeader> {
        let allocate = self.vtable().AllocateBuffer.ok_or(Error::NotImplemented)?;
        let mut header: *mut OMX_BUFFERHEADERTYPE = std::ptr::null_mut();
        Error::from_omx(unsafe {
            allocate(self.handle, &mut header, port, std::ptr::null_mut(), size)
        })?;
        unsafe { BufferHeader::from_raw(header, port) }.ok_or(Error::InsufficientResources)
    }

    /// Returns `header` to the component for good.
    pub fn free_buffer(&self, header: BufferHeader) -> Result<()> {
        let free = self.vtable().FreeBuffer.ok_or(Error::NotImplemented)?;
        let port = header.port();
        Error::from_omx(unsafe { free(self.handle, port, header.into_raw()) })
    }

    /// Hands a filled input header to the component.
    pub fn empty_this_buffer(&self, header: BufferHeader) -> Result<()> {
        let empty = self.vtable().EmptyThisBuffer.ok_or(Error::NotImplemented)?;
        Error::from_omx(unsafe { empty(self.handle, header.into_raw()) })
    }

    /// Hands an output header to the component to be filled.
    pub fn fill_this_buffer(&self, header: BufferHeader) -> Result<()> {
        let fill = self.vtable().FillThisBuffer.ok_or(Error::NotImplemented)?;
        Error::from_omx(unsafe { fill(self.handle, header.into_raw()) })
    }
}

impl Drop for Component {
    fn drop(&mut self) {
        tracing::debug!(component = self.name.as_str(), "releasing component handle");
        let code = unsafe { self.owner.free_handle(self.handle) };
        if let Err(error) = Error::from_omx(code) {
            tracing::warn!(
                component = self.name.as_str(),
                %error,
                "releasing component handle failed"
            );
        }
    }
}
