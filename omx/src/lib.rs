// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! # OMX - OpenMAX IL for Rust
//!
//! Safe, idiomatic Rust bindings for OpenMAX IL 1.1 cores and components.
//!
//! ## Overview
//!
//! An OpenMAX IL core is a native library exporting a handful of entry
//! points; the codecs it offers are components driven through a vtable of
//! function pointers and reporting back through callbacks. This crate wraps
//! the raw ABI ([`omx_sys`]) with RAII handles, typed parameter blocks and
//! Rust error handling.
//!
//! ### Key Concepts
//!
//! - **Core**: a loaded and initialised core library ([`OmxCore`])
//! - **Component**: a codec instance created by a core ([`Component`])
//! - **Port**: an input or output connection of a component, configured
//!   through parameter blocks ([`PortDefinitionParam`], [`PcmModeParam`], ...)
//! - **Buffer header**: a unit of payload exchanged with a port ([`BufferHeader`])
//! - **Event handler**: the receiver of component callbacks ([`EventHandler`])
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐  load   ┌───────────┐ get/set_parameter ┌──────────────┐
//! │ OmxCore │ ──────► │ Component │ ◄───────────────► │ param blocks │
//! └─────────┘         └─────┬─────┘                   └──────────────┘
//!                           │ empty/fill_this_buffer
//!                           ▼
//!                    ┌──────────────┐   callbacks   ┌──────────────┐
//!                    │ BufferHeader │ ◄──────────── │ EventHandler │
//!                    └──────────────┘               └──────────────┘
//! ```
//!
//! ## Examples
//!
//! ### Configuring the output port of a decoder
//!
//! ```no_run
//! use std::sync::Arc;
//! use omx::{BufferHeader, Event, EventHandler, OmxCore, PcmModeParam};
//!
//! struct Printer;
//!
//! impl EventHandler for Printer {
//!     fn event(&self, event: Event) {
//!         println!("{event:?}");
//!     }
//!     fn empty_buffer_done(&self, _header: BufferHeader) {}
//!     fn fill_buffer_done(&self, _header: BufferHeader) {}
//! }
//!
//! # fn main() -> Result<(), omx::Error> {
//! let core = OmxCore::open(omx::config::default_core_library())?;
//! let component = core.get_component("OMX.st.audio_decoder.adpcm", Arc::new(Printer))?;
//! component.update_parameter::<PcmModeParam>(1, |pcm| pcm.set_sampling_rate(44100))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! - [`OmxCore`] and [`Component`] are `Send + Sync`
//! - [`EventHandler`] methods run on threads owned by the component
//! - [`BufferHeader`] is `Send` and owned by one side at a time

mod api;
mod buffer;
mod command;
mod component;
mod core;
mod error;
mod event;
mod param;
mod quirks;

pub mod config;
pub mod emulated;

pub use api::{OmxApi, OmxApiHandle, load_api};
pub use buffer::BufferHeader;
pub use command::{Command, State};
pub use component::Component;
pub use self::core::{ComponentLoader, OmxCore};
pub use error::{Error, Result};
pub use omx_sys::{
    OMX_COLOR_FORMATTYPE, OMX_COLOR_FormatCbYCrY, OMX_COLOR_FormatYCbYCr,
    OMX_COLOR_FormatYUV420Planar, OMX_VIDEO_CODINGTYPE, OMX_VIDEO_CodingAVC,
    OMX_VIDEO_CodingMPEG4,
};
pub use event::{Event, EventHandler};
pub use param::{
    AmrParam, Direction, Domain, Parameter, PcmModeParam, PortDefinitionParam, spec_version,
};
pub use quirks::{Quirk, Quirks, input_buffer_size, output_buffer_size};
