// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Component states and the commands that drive them.

use omx_sys::{OMX_COMMANDTYPE, OMX_STATETYPE, OMX_U32};

/// State of an OpenMAX IL component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Invalid,
    Loaded,
    Idle,
    Executing,
    Pause,
    WaitForResources,
}

impl State {
    /// Converts a raw `OMX_STATETYPE`, returning `None` for vendor states.
    pub fn from_raw(state: OMX_STATETYPE) -> Option<Self> {
        match state {
            omx_sys::OMX_StateInvalid => Some(State::Invalid),
            omx_sys::OMX_StateLoaded => Some(State::Loaded),
            omx_sys::OMX_StateIdle => Some(State::Idle),
            omx_sys::OMX_StateExecuting => Some(State::Executing),
            omx_sys::OMX_StatePause => Some(State::Pause),
            omx_sys::OMX_StateWaitForResources => Some(State::WaitForResources),
            _ => None,
        }
    }

    pub fn as_raw(self) -> OMX_STATETYPE {
        match self {
            State::Invalid => omx_sys::OMX_StateInvalid,
            State::Loaded => omx_sys::OMX_StateLoaded,
            State::Idle => omx_sys::OMX_StateIdle,
            State::Executing => omx_sys::OMX_StateExecuting,
            State::Pause => omx_sys::OMX_StatePause,
            State::WaitForResources => omx_sys::OMX_StateWaitForResources,
        }
    }
}

/// A command sent with `SendCommand`.
///
/// Port carrying variants accept [`omx_sys::OMX_ALL`] to address every port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    StateSet(State),
    Flush(OMX_U32),
    PortDisable(OMX_U32),
    PortEnable(OMX_U32),
}

impl Command {
    /// Rebuilds a command from its raw type and parameter, as found in
    /// `SendCommand` arguments and command-complete events.
    pub fn from_raw(command: OMX_COMMANDTYPE, param: OMX_U32) -> Option<Self> {
        match command {
            omx_sys::OMX_CommandStateSet => State::from_raw(param).map(Command::StateSet),
            omx_sys::OMX_CommandFlush => Some(Command::Flush(param)),
            omx_sys::OMX_CommandPortDisable => Some(Command::PortDisable(param)),
            omx_sys::OMX_CommandPortEnable => Some(Command::PortEnable(param)),
            _ => None,
        }
    }

    /// Splits the command into its raw type and parameter.
    pub fn as_raw(self) -> (OMX_COMMANDTYPE, OMX_U32) {
        match self {
            Command::StateSet(state) => (omx_sys::OMX_CommandStateSet, state.as_raw()),
            Command::Flush(port) => (omx_sys::OMX_CommandFlush, port),
            Command::PortDisable(port) => (omx_sys::OMX_CommandPortDisable, port),
            Command::PortEnable(port) => (omx_sys::OMX_CommandPortEnable, port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_survive_raw_conversion() {
        for command in [
            Command::StateSet(State::Idle),
            Command::StateSet(State::Executing),
            Command::Flush(omx_sys::OMX_ALL),
            Command::PortEnable(1),
        ] {
            let (kind, param) = command.as_raw();
            assert_eq!(Command::from_raw(kind, param), Some(command));
        }
        assert_eq!(Command::from_raw(omx_sys::OMX_CommandStateSet, 42), None);
        assert_eq!(Command::from_raw(omx_sys::OMX_CommandMarkBuffer, 0), None);
    }
}
