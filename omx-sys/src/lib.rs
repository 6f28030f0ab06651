// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! # omx-sys: Raw OpenMAX IL 1.1 ABI
//!
//! This crate provides low-level, unsafe Rust definitions of the OpenMAX IL
//! 1.1 component ABI: the scalar typedefs, enumerants, parameter structures,
//! buffer header, component vtable and the entry points of an OpenMAX IL
//! core library, which is loaded at runtime through `libloading`.
//!
//! ## Overview
//!
//! `omx-sys` exposes:
//! - Scalar types (`OMX_U32`, `OMX_BOOL`, `OMX_HANDLETYPE`, ...)
//! - Enumerants as integer constants, named exactly as in the C headers
//!   (`OMX_ErrorNone`, `OMX_IndexParamAudioPcm`, `OMX_COLOR_FormatYUV420Planar`, ...)
//! - `#[repr(C)]` parameter structures (`OMX_AUDIO_PARAM_PCMMODETYPE`,
//!   `OMX_AUDIO_PARAM_AMRTYPE`, `OMX_PARAM_PORTDEFINITIONTYPE`, ...)
//! - The component vtable ([`OMX_COMPONENTTYPE`]) and callback table
//!   ([`OMX_CALLBACKTYPE`])
//! - [`OmxCoreLibrary`], the dynamically loaded core entry points
//!
//! ## Usage
//!
//! **Most users should NOT use this crate directly.** Use the safe [`omx`]
//! wrapper crate instead, which provides:
//! - RAII handles for cores and components
//! - Versioned, correctly sized parameter blocks
//! - Rust-idiomatic error handling with `Result`
//!
//! ## Safety
//!
//! Everything reachable through a raw handle is `unsafe` and requires the
//! caller to uphold OpenMAX IL's invariants:
//! - `OMX_Init` must succeed before any other core call
//! - Every parameter block passed to `GetParameter`/`SetParameter` must carry
//!   `nSize == size_of::<T>()` and a 1.1 version
//! - Buffer headers belong to either the client or the component, never both
//!
//! [`omx`]: https://docs.rs/omx

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::missing_safety_doc)]

extern crate libloading;

mod audio;
mod component;
mod library;
mod port;
mod types;
mod video;

pub use audio::*;
pub use component::*;
pub use library::*;
pub use port::*;
pub use types::*;
pub use video::*;

/// Major version of the OpenMAX IL specification these definitions follow.
pub const OMX_VERSION_MAJOR: OMX_U8 = 1;
/// Minor version of the OpenMAX IL specification these definitions follow.
pub const OMX_VERSION_MINOR: OMX_U8 = 1;
/// Revision of the OpenMAX IL specification these definitions follow.
pub const OMX_VERSION_REVISION: OMX_U8 = 0;
/// Step of the OpenMAX IL specification these definitions follow.
pub const OMX_VERSION_STEP: OMX_U8 = 0;

/// Upper bound on the length of component names, including the terminator.
pub const OMX_MAX_STRINGNAME_SIZE: usize = 128;
