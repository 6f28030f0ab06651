// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

//! Buffer headers exchanged with a component.

use std::ptr::NonNull;

use omx_sys::OMX_BUFFERHEADERTYPE;

/// A buffer header currently owned by the client.
///
/// Headers are created by [`crate::Component::allocate_buffer`], move into
/// the component with [`crate::Component::empty_this_buffer`] or
/// [`crate::Component::fill_this_buffer`], and come back through
/// [`crate::EventHandler::empty_buffer_done`] and
/// [`crate::EventHandler::fill_buffer_done`]. A header must eventually be
/// handed to [`crate::Component::free_buffer`]; dropping it leaves the
/// memory to the component, which reclaims it when its handle is freed.
#[derive(Debug)]
pub struct BufferHeader {
    ptr: NonNull<OMX_BUFFERHEADERTYPE>,
    port: u32,
}

// Safety: the header is owned by exactly one side at a time and this value
// represents client ownership.
unsafe impl Send for BufferHeader {}

impl BufferHeader {
    /// Wraps a header pointer handed over by a component.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a valid header the component no longer uses.
    pub(crate) unsafe fn from_raw(ptr: *mut OMX_BUFFERHEADERTYPE, port: u32) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| BufferHeader { ptr, port })
    }

    /// Gives up client ownership, returning the raw header.
    pub(crate) fn into_raw(self) -> *mut OMX_BUFFERHEADERTYPE {
        self.ptr.as_ptr()
    }

    fn raw(&self) -> &OMX_BUFFERHEADERTYPE {
        unsafe { self.ptr.as_ref() }
    }

    fn raw_mut(&mut self) -> &mut OMX_BUFFERHEADERTYPE {
        unsafe { self.ptr.as_mut() }
    }

    /// Port this header was allocated on.
    pub fn port(&self) -> u32 {
        self.port
    }

    /// Stable identity of the header, usable as a map key.
    pub fn id(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Size of the payload memory.
    pub fn alloc_len(&self) -> usize {
        self.raw().nAllocLen as usize
    }

    /// The valid part of the payload (`nOffset..nOffset + nFilledLen`).
    pub fn filled(&self) -> &[u8] {
        let raw = self.raw();
        if raw.pBuffer.is_null() {
            return &[];
        }
        let end = (raw.nOffset as usize + raw.nFilledLen as usize).min(raw.nAllocLen as usize);
        let start = (raw.nOffset as usize).min(end);
        unsafe { std::slice::from_raw_parts(raw.pBuffer.add(start), end - start) }
    }

    /// Copies as much of `data` as fits into the header, starting at offset
    /// zero, and returns the number of bytes copied.
    pub fn fill_from(&mut self, data: &[u8]) -> usize {
        let raw = self.raw_mut();
        if raw.pBuffer.is_null() {
            return 0;
        }
        let len = data.len().min(raw.nAllocLen as usize);
        unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), raw.pBuffer, len) };
        raw.nOffset = 0;
        raw.nFilledLen = len as u32;
        len
    }

    /// Marks the header as carrying no payload.
    pub fn clear(&mut self) {
        let raw = self.raw_mut();
        raw.nOffset = 0;
        raw.nFilledLen = 0;
        raw.nFlags = 0;
    }

    /// Presentation timestamp in microseconds.
    pub fn timestamp(&self) -> i64 {
        self.raw().nTimeStamp
    }

    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.raw_mut().nTimeStamp = timestamp;
    }

    pub fn flags(&self) -> u32 {
        self.raw().nFlags
    }

    pub fn set_flags(&mut self, flags: u32) {
        self.raw_mut().nFlags = flags;
    }

    /// Whether the component flagged this header as the end of the stream.
    pub fn is_eos(&self) -> bool {
        self.flags() & omx_sys::OMX_BUFFERFLAG_EOS != 0
    }

    /// Flags the header as the last one of the stream.
    pub fn mark_eos(&mut self) {
        self.raw_mut().nFlags |= omx_sys::OMX_BUFFERFLAG_EOS;
    }
}
