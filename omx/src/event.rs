// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Component events and the callback trampolines delivering them.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use omx_sys::{
    OMX_BUFFERHEADERTYPE, OMX_CALLBACKTYPE, OMX_ERRORTYPE, OMX_EVENTTYPE, OMX_HANDLETYPE, OMX_PTR,
    OMX_U32,
};

use crate::{BufferHeader, Command, Error};

/// An event raised by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A command sent with [`crate::Component::send_command`] finished.
    CommandComplete(Command),
    /// The component hit an error, possibly while executing a command.
    Error(Error),
    /// The component changed the definition of a port on its own.
    PortSettingsChanged { port: u32 },
    /// A buffer carrying `flags` (typically EOS) left `port`.
    BufferFlag { port: u32, flags: u32 },
    /// Any other event, kept raw.
    Other {
        event: OMX_EVENTTYPE,
        data1: u32,
        data2: u32,
    },
}

impl Event {
    /// Decodes the arguments of an `EventHandler` callback.
    pub fn from_raw(event: OMX_EVENTTYPE, data1: OMX_U32, data2: OMX_U32) -> Self {
        match event {
            omx_sys::OMX_EventCmdComplete => match Command::from_raw(data1, data2) {
                Some(command) => Event::CommandComplete(command),
                None => Event::Other { event, data1, data2 },
            },
            omx_sys::OMX_EventError => match Error::from_omx(data1) {
                Err(error) => Event::Error(error),
                Ok(()) => Event::Other { event, data1, data2 },
            },
            omx_sys::OMX_EventPortSettingsChanged => Event::PortSettingsChanged { port: data1 },
            omx_sys::OMX_EventBufferFlag => Event::BufferFlag {
                port: data1,
                flags: data2,
            },
            _ => Event::Other { event, data1, data2 },
        }
    }
}

/// Receiver of everything a component reports back.
///
/// Methods are called from the component's own threads and must not block
/// on work that waits for the component.
pub trait EventHandler: Send + Sync {
    /// A component event.
    fn event(&self, event: Event);

    /// The component consumed an input header and hands it back.
    fn empty_buffer_done(&self, header: BufferHeader);

    /// The component filled an output header and hands it back.
    fn fill_buffer_done(&self, header: BufferHeader);
}

/// Callback table plus the handler it dispatches to.
///
/// Boxed so that the table and the application data pointer keep a stable
/// address for as long as the component handle lives.
pub(crate) struct CallbackContext {
    table: OMX_CALLBACKTYPE,
    handler: Arc<dyn EventHandler>,
}

impl CallbackContext {
    pub(crate) fn new(handler: Arc<dyn EventHandler>) -> Box<Self> {
        Box::new(CallbackContext {
            table: OMX_CALLBACKTYPE {
                EventHandler: Some(event_handler),
                EmptyBufferDone: Some(empty_buffer_done),
                FillBufferDone: Some(fill_buffer_done),
            },
            handler,
        })
    }

    pub(crate) fn table(&mut self) -> *mut OMX_CALLBACKTYPE {
        &mut self.table
    }

    pub(crate) fn app_data(&self) -> OMX_PTR {
        self as *const Self as OMX_PTR
    }
}

unsafe fn context<'a>(app_data: OMX_PTR) -> Option<&'a CallbackContext> {
    unsafe { (app_data as *const CallbackContext).as_ref() }
}

unsafe extern "C" fn event_handler(
    _component: OMX_HANDLETYPE,
    app_data: OMX_PTR,
    event: OMX_EVENTTYPE,
    data1: OMX_U32,
    data2: OMX_U32,
    _event_data: OMX_PTR,
) -> OMX_ERRORTYPE {
    let Some(context) = (unsafe { context(app_data) }) else {
        return omx_sys::OMX_ErrorBadParameter;
    };
    let event = Event::from_raw(event, data1, data2);
    tracing::trace!(?event, "component event");
    if catch_unwind(AssertUnwindSafe(|| context.handler.event(event))).is_err() {
        tracing::error!("event handler panicked");
    }
    omx_sys::OMX_ErrorNone
}

unsafe extern "C" fn empty_buffer_done(
    _component: OMX_HANDLETYPE,
    app_data: OMX_PTR,
    header: *mut OMX_BUFFERHEADERTYPE,
) -> OMX_ERRORTYPE {
    let Some(context) = (unsafe { context(app_data) }) else {
        return omx_sys::OMX_ErrorBadParameter;
    };
    let Some(header) = (unsafe {
        let port = header.as_ref().map(|h| h.nInputPortIndex).unwrap_or_default();
        BufferHeader::from_raw(header, port)
    }) else {
        return omx_sys::OMX_ErrorBadParameter;
    };
    if catch_unwind(AssertUnwindSafe(|| context.handler.empty_buffer_done(header))).is_err() {
        tracing::error!("empty-buffer-done handler panicked");
    }
    omx_sys::OMX_ErrorNone
}

unsafe extern "C" fn fill_buffer_done(
    _component: OMX_HANDLETYPE,
    app_data: OMX_PTR,
    header: *mut OMX_BUFFERHEADERTYPE,
) -> OMX_ERRORTYPE {
    let Some(context) = (unsafe { context(app_data) }) else {
        return omx_sys::OMX_ErrorBadParameter;
    };
    let Some(header) = (unsafe {
        let port = header.as_ref().map(|h| h.nOutputPortIndex).unwrap_or_default();
        BufferHeader::from_raw(header, port)
    }) else {
        return omx_sys::OMX_ErrorBadParameter;
    };
    if catch_unwind(AssertUnwindSafe(|| context.handler.fill_buffer_done(header))).is_err() {
        tracing::error!("fill-buffer-done handler panicked");
    }
    omx_sys::OMX_ErrorNone
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;

    #[test]
    fn raw_events_are_decoded() {
        assert_eq!(
            Event::from_raw(omx_sys::OMX_EventCmdComplete, omx_sys::OMX_CommandStateSet, 2),
            Event::CommandComplete(Command::StateSet(State::Idle))
        );
        assert_eq!(
            Event::from_raw(omx_sys::OMX_EventError, omx_sys::OMX_ErrorHardware, 0),
            Event::Error(Error::Hardware)
        );
        assert_eq!(
            Event::from_raw(omx_sys::OMX_EventPortSettingsChanged, 1, 0),
            Event::PortSettingsChanged { port: 1 }
        );
        assert_eq!(
            Event::from_raw(omx_sys::OMX_EventBufferFlag, 1, omx_sys::OMX_BUFFERFLAG_EOS),
            Event::BufferFlag {
                port: 1,
                flags: omx_sys::OMX_BUFFERFLAG_EOS
            }
        );
        assert!(matches!(
            Event::from_raw(omx_sys::OMX_EventMark, 0, 0),
            Event::Other { .. }
        ));
    }
}
