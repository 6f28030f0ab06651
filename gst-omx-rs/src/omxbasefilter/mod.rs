//! OpenMAX IL Base Filter
//!
//! Abstract element every OpenMAX IL element in this plugin derives from. It
//! owns the component for the element's lifetime and moves data between the
//! GStreamer pads and the component's two ports:
//!
//! - **NULL → READY**: loads `component-name` from `library-name` (or from a
//!   loader installed with [`OmxBaseFilterExt::set_component_loader`])
//! - **caps on the sink pad**: handed to [`OmxBaseFilterImpl::sink_setcaps`]
//! - **first buffer**: runs [`OmxBaseFilterImpl::omx_setup`], allocates the
//!   port buffers, moves the component to Executing and starts the src pad task
//! - **PAUSED → READY**: returns the component to Loaded and frees its buffers
//!
//! Input buffers are copied into input headers, split over several headers
//! when larger than one. Output headers are pushed downstream by the src pad
//! task, either wrapped without copying (returned to the component once
//! downstream drops them) or copied, see
//! [`OmxBaseFilterExt::set_share_output_buffer`].
//!
//! `OMX_EventPortSettingsChanged` is handed to
//! [`OmxBaseFilterImpl::settings_changed`] on the component's callback thread.
//! It and `sink_setcaps` run under the same caps lock.
//!
//! ## Properties
//! - `component-name`: OpenMAX IL component to load
//! - `library-name`: OpenMAX IL core library providing it

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use gst::glib;
use gst::prelude::*;
use gst::subclass::prelude::*;
use gstreamer as gst;

/// Core implementation (pads, state changes, streaming)
mod imp;

/// Header queues, command completion and lent output buffers
mod queue;

/// Settings and runtime state
mod state;

/// Index of the component's input port.
pub const INPUT_PORT: u32 = 0;

/// Index of the component's output port.
pub const OUTPUT_PORT: u32 = 1;

glib::wrapper! {
    pub struct OmxBaseFilter(ObjectSubclass<imp::OmxBaseFilter>)
        @extends gst::Element, gst::Object;
}

/// Trait containing extension methods for `OmxBaseFilter`.
pub trait OmxBaseFilterExt: IsA<OmxBaseFilter> + 'static {
    /// The loaded component. `None` outside READY and higher states.
    fn component(&self) -> Option<Arc<omx::Component>> {
        self.upcast_ref::<OmxBaseFilter>().imp().component()
    }

    /// Returns a reference to the sink pad.
    fn sink_pad(&self) -> &gst::Pad {
        self.upcast_ref::<OmxBaseFilter>().imp().sink_pad()
    }

    /// Returns a reference to the src pad.
    fn src_pad(&self) -> &gst::Pad {
        self.upcast_ref::<OmxBaseFilter>().imp().src_pad()
    }

    /// Sends a caps event downstream, followed by a segment that arrived
    /// before any caps were known.
    fn set_src_caps(&self, caps: &gst::Caps) -> bool {
        self.upcast_ref::<OmxBaseFilter>().imp().set_src_caps(caps)
    }

    /// Loads components through `loader` instead of the core library named by
    /// `library-name`. Takes effect at the next NULL → READY transition.
    fn set_component_loader(&self, loader: Option<Arc<dyn omx::ComponentLoader>>) {
        self.upcast_ref::<OmxBaseFilter>()
            .imp()
            .set_component_loader(loader)
    }

    /// Whether output headers are pushed downstream without copying. Defaults
    /// to `true`.
    fn set_share_output_buffer(&self, share: bool) {
        self.upcast_ref::<OmxBaseFilter>()
            .imp()
            .set_share_output_buffer(share)
    }

    /// Quirks of the configured component: the element configuration if it
    /// names any, else the built-in table.
    fn quirks(&self) -> omx::Quirks {
        self.upcast_ref::<OmxBaseFilter>().imp().quirks()
    }
}

impl<O: IsA<OmxBaseFilter>> OmxBaseFilterExt for O {}

/// Trait to implement in `OmxBaseFilter` subclasses.
pub trait OmxBaseFilterImpl: ElementImpl + ObjectSubclass<Type: IsA<OmxBaseFilter>> {
    /// Called with the caps received on the sink pad while the component is
    /// in Loaded state.
    ///
    /// Translates the caps into component parameters and may publish src
    /// caps. An error refuses the caps.
    fn sink_setcaps(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        self.parent_sink_setcaps(caps)
    }

    /// Called once before the component leaves Loaded state, after caps
    /// negotiation.
    fn omx_setup(&self, component: &omx::Component) -> Result<(), gst::LoggableError> {
        self.parent_omx_setup(component)
    }

    /// Called when the component reports `OMX_EventPortSettingsChanged`.
    ///
    /// Runs on the component's callback thread.
    fn settings_changed(&self, component: &omx::Component) -> Result<(), gst::LoggableError> {
        self.parent_settings_changed(component)
    }
}

/// Trait containing extension methods for `OmxBaseFilterImpl`, specifically
/// methods for chaining up to the parent implementation of virtual methods.
pub trait OmxBaseFilterImplExt: OmxBaseFilterImpl {
    fn parent_sink_setcaps(&self, caps: &gst::Caps) -> Result<(), gst::LoggableError> {
        unsafe {
            let data = Self::type_data();
            let parent_class = &*(data.as_ref().parent_class() as *mut Class);
            (parent_class.sink_setcaps)(self.obj().unsafe_cast_ref(), caps)
        }
    }

    fn parent_omx_setup(&self, component: &omx::Component) -> Result<(), gst::LoggableError> {
        unsafe {
            let data = Self::type_data();
            let parent_class = &*(data.as_ref().parent_class() as *mut Class);
            (parent_class.omx_setup)(self.obj().unsafe_cast_ref(), component)
        }
    }

    fn parent_settings_changed(
        &self,
        component: &omx::Component,
    ) -> Result<(), gst::LoggableError> {
        unsafe {
            let data = Self::type_data();
            let parent_class = &*(data.as_ref().parent_class() as *mut Class);
            (parent_class.settings_changed)(self.obj().unsafe_cast_ref(), component)
        }
    }
}

impl<T: OmxBaseFilterImpl> OmxBaseFilterImplExt for T {}

/// Class struct for `OmxBaseFilter`.
#[repr(C)]
pub struct Class {
    parent: gst::ffi::GstElementClass,

    sink_setcaps: fn(&OmxBaseFilter, caps: &gst::Caps) -> Result<(), gst::LoggableError>,
    omx_setup: fn(&OmxBaseFilter, component: &omx::Component) -> Result<(), gst::LoggableError>,
    settings_changed:
        fn(&OmxBaseFilter, component: &omx::Component) -> Result<(), gst::LoggableError>,
}

unsafe impl ClassStruct for Class {
    type Type = imp::OmxBaseFilter;
}

impl std::ops::Deref for Class {
    type Target = glib::Class<<<Self as ClassStruct>::Type as ObjectSubclass>::ParentType>;

    fn deref(&self) -> &Self::Target {
        unsafe { &*(&self.parent as *const _ as *const _) }
    }
}

unsafe impl<T: OmxBaseFilterImpl> IsSubclassable<T> for OmxBaseFilter {
    fn class_init(class: &mut glib::Class<Self>) {
        Self::parent_class_init::<T>(class);

        let class = class.as_mut();

        class.sink_setcaps = |obj, caps| unsafe {
            let imp = obj.unsafe_cast_ref::<T::Type>().imp();
            imp.sink_setcaps(caps)
        };

        class.omx_setup = |obj, component| unsafe {
            let imp = obj.unsafe_cast_ref::<T::Type>().imp();
            imp.omx_setup(component)
        };

        class.settings_changed = |obj, component| unsafe {
            let imp = obj.unsafe_cast_ref::<T::Type>().imp();
            imp.settings_changed(component)
        };
    }
}
