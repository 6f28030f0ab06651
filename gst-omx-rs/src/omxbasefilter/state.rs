//! State Management for the Base Filter
//!
//! - [`Settings`]: property values, `None` until set so the element
//!   configuration can supply defaults
//! - [`State`]: the loaded component and whether it is streaming

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use gstreamer as gst;

use super::queue::Shared;
use crate::config::ElementConfig;

/// User-configurable settings.
#[derive(Default, Clone)]
pub(crate) struct Settings {
    /// Explicit `component-name`
    pub component_name: Option<String>,

    /// Explicit `library-name`
    pub library_name: Option<String>,

    /// Replaces library loading, see `OmxBaseFilterExt::set_component_loader`
    pub loader: Option<Arc<dyn omx::ComponentLoader>>,

    /// Push output headers downstream without copying
    pub share_output_buffer: bool,
}

impl Settings {
    pub(crate) fn new() -> Self {
        Settings {
            share_output_buffer: true,
            ..Default::default()
        }
    }

    /// `component-name`, falling back to the element configuration.
    pub(crate) fn component_name(&self, config: &ElementConfig) -> String {
        self.component_name
            .clone()
            .or_else(|| config.component_name.clone())
            .unwrap_or_default()
    }

    /// `library-name`, falling back to the element configuration and then
    /// the core library default.
    pub(crate) fn library_name(&self, config: &ElementConfig) -> String {
        self.library_name
            .clone()
            .or_else(|| config.library_name.clone())
            .unwrap_or_else(|| {
                omx::config::default_core_library()
                    .to_string_lossy()
                    .into_owned()
            })
    }
}

/// Runtime state, present from READY on.
pub(crate) struct State {
    /// The loaded component, shared with output buffers lent downstream
    pub component: Arc<omx::Component>,

    /// Queues and command waiter fed by the component callbacks
    pub shared: Arc<Shared>,

    /// Buffers allocated and component in Executing
    pub started: bool,

    /// An EOS header was sent; further input is refused
    pub eos: bool,

    /// Segment received before any src caps were set
    pub pending_segment: Option<gst::Event>,

    /// Last result of pushing downstream, returned to upstream by `chain`
    pub flow: Result<gst::FlowSuccess, gst::FlowError>,
}

impl State {
    pub(crate) fn new(component: Arc<omx::Component>, shared: Arc<Shared>) -> Self {
        State {
            component,
            shared,
            started: false,
            eos: false,
            pending_segment: None,
            flow: Ok(gst::FlowSuccess::Ok),
        }
    }

    /// Forgets everything tied to the current stream.
    pub(crate) fn reset_stream(&mut self) {
        self.eos = false;
        self.pending_segment = None;
        self.flow = Ok(gst::FlowSuccess::Ok);
    }
}
