// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for OpenMAX IL operations.
//!
//! This module maps the `OMX_ERRORTYPE` codes returned by cores and
//! components to an idiomatic Rust error enum.

use omx_sys::OMX_ERRORTYPE;

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur when using an OpenMAX IL core or component.
///
/// Codes the workspace does not single out are kept verbatim in
/// [`Error::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An `OMX_ERRORTYPE` without a dedicated variant.
    #[error("Unknown error: {0:#x}")]
    Unknown(OMX_ERRORTYPE),

    #[error("Insufficient resources")]
    InsufficientResources,

    #[error("Undefined error")]
    Undefined,

    #[error("Invalid component name")]
    InvalidComponentName,

    /// The core does not know a component with the requested name.
    #[error("Component not found")]
    ComponentNotFound,

    #[error("Invalid component")]
    InvalidComponent,

    /// A parameter block was malformed, typically a wrong `nSize`.
    #[error("Bad parameter")]
    BadParameter,

    /// The component does not implement the requested entry point.
    #[error("Not implemented")]
    NotImplemented,

    #[error("Hardware error")]
    Hardware,

    #[error("Invalid state")]
    InvalidState,

    /// A parameter block carried a version the component does not speak.
    #[error("Version mismatch")]
    VersionMismatch,

    #[error("Not ready")]
    NotReady,

    /// A component timed out, or a wait for a component event expired.
    #[error("Timeout")]
    Timeout,

    #[error("Component is already in the requested state")]
    SameState,

    #[error("Incorrect state transition")]
    IncorrectStateTransition,

    #[error("Operation not allowed in the current state")]
    IncorrectStateOperation,

    #[error("Unsupported setting")]
    UnsupportedSetting,

    #[error("Unsupported index")]
    UnsupportedIndex,

    #[error("Bad port index")]
    BadPortIndex,

    /// Rust-level failures not mapped to an OpenMAX IL code.
    #[error("Other error: {0}")]
    Other(String),

    /// A Rust string could not be converted to a C string.
    #[error("Null string: {0}")]
    NulString(#[from] std::ffi::NulError),

    /// The core library could not be loaded or lacks a symbol.
    #[error("Loading library: {0}")]
    LibLoading(String),
}

impl From<libloading::Error> for Error {
    fn from(error: libloading::Error) -> Self {
        Error::LibLoading(error.to_string())
    }
}

impl Error {
    /// Converts an `OMX_ERRORTYPE` to a Rust [`Result`].
    ///
    /// # Examples
    ///
    /// ```
    /// use omx::Error;
    ///
    /// assert!(Error::from_omx(omx_sys::OMX_ErrorNone).is_ok());
    /// assert_eq!(
    ///     Error::from_omx(omx_sys::OMX_ErrorBadPortIndex),
    ///     Err(Error::BadPortIndex)
    /// );
    /// ```
    pub fn from_omx(code: OMX_ERRORTYPE) -> Result<()> {
        match code {
            omx_sys::OMX_ErrorNone => Ok(()),
            omx_sys::OMX_ErrorInsufficientResources => Err(Error::InsufficientResources),
            omx_sys::OMX_ErrorUndefined => Err(Error::Undefined),
            omx_sys::OMX_ErrorInvalidComponentName => Err(Error::InvalidComponentName),
            omx_sys::OMX_ErrorComponentNotFound => Err(Error::ComponentNotFound),
            omx_sys::OMX_ErrorInvalidComponent => Err(Error::InvalidComponent),
            omx_sys::OMX_ErrorBadParameter => Err(Error::BadParameter),
            omx_sys::OMX_ErrorNotImplemented => Err(Error::NotImplemented),
            omx_sys::OMX_ErrorHardware => Err(Error::Hardware),
            omx_sys::OMX_ErrorInvalidState => Err(Error::InvalidState),
            omx_sys::OMX_ErrorVersionMismatch => Err(Error::VersionMismatch),
            omx_sys::OMX_ErrorNotReady => Err(Error::NotReady),
            omx_sys::OMX_ErrorTimeout => Err(Error::Timeout),
            omx_sys::OMX_ErrorSameState => Err(Error::SameState),
            omx_sys::OMX_ErrorIncorrectStateTransition => Err(Error::IncorrectStateTransition),
            omx_sys::OMX_ErrorIncorrectStateOperation => Err(Error::IncorrectStateOperation),
            omx_sys::OMX_ErrorUnsupportedSetting => Err(Error::UnsupportedSetting),
            omx_sys::OMX_ErrorUnsupportedIndex => Err(Error::UnsupportedIndex),
            omx_sys::OMX_ErrorBadPortIndex => Err(Error::BadPortIndex),
            other => Err(Error::Unknown(other)),
        }
    }

    /// The `OMX_ERRORTYPE` this error stands for.
    ///
    /// Rust-level failures map to `OMX_ErrorUndefined`.
    pub fn code(&self) -> OMX_ERRORTYPE {
        match self {
            Error::Unknown(code) => *code,
            Error::InsufficientResources => omx_sys::OMX_ErrorInsufficientResources,
            Error::Undefined => omx_sys::OMX_ErrorUndefined,
            Error::InvalidComponentName => omx_sys::OMX_ErrorInvalidComponentName,
            Error::ComponentNotFound => omx_sys::OMX_ErrorComponentNotFound,
            Error::InvalidComponent => omx_sys::OMX_ErrorInvalidComponent,
            Error::BadParameter => omx_sys::OMX_ErrorBadParameter,
            Error::NotImplemented => omx_sys::OMX_ErrorNotImplemented,
            Error::Hardware => omx_sys::OMX_ErrorHardware,
            Error::InvalidState => omx_sys::OMX_ErrorInvalidState,
            Error::VersionMismatch => omx_sys::OMX_ErrorVersionMismatch,
            Error::NotReady => omx_sys::OMX_ErrorNotReady,
            Error::Timeout => omx_sys::OMX_ErrorTimeout,
            Error::SameState => omx_sys::OMX_ErrorSameState,
            Error::IncorrectStateTransition => omx_sys::OMX_ErrorIncorrectStateTransition,
            Error::IncorrectStateOperation => omx_sys::OMX_ErrorIncorrectStateOperation,
            Error::UnsupportedSetting => omx_sys::OMX_ErrorUnsupportedSetting,
            Error::UnsupportedIndex => omx_sys::OMX_ErrorUnsupportedIndex,
            Error::BadPortIndex => omx_sys::OMX_ErrorBadPortIndex,
            Error::Other(_) | Error::NulString(_) | Error::LibLoading(_) => {
                omx_sys::OMX_ErrorUndefined
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_back_to_themselves() {
        for code in [
            omx_sys::OMX_ErrorBadParameter,
            omx_sys::OMX_ErrorVersionMismatch,
            omx_sys::OMX_ErrorIncorrectStateTransition,
            omx_sys::OMX_ErrorUnsupportedIndex,
            omx_sys::OMX_ErrorStreamCorrupt,
        ] {
            let error = Error::from_omx(code).unwrap_err();
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn unmapped_codes_are_kept() {
        assert_eq!(
            Error::from_omx(omx_sys::OMX_ErrorFormatNotDetected),
            Err(Error::Unknown(omx_sys::OMX_ErrorFormatNotDetected))
        );
        assert_eq!(
            Error::Other("x".into()).code(),
            omx_sys::OMX_ErrorUndefined
        );
    }
}
