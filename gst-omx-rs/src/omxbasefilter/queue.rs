//! Synchronisation between the pads and the component
//!
//! Buffer headers travel between three owners: the component, the element's
//! queues and (for shared output buffers) downstream elements. Component
//! callbacks push returned headers into a [`PortQueue`], the streaming
//! thread and the src pad task pop them. Command completion events are
//! collected by a [`CommandWaiter`].

// SPDX-FileCopyrightText: 2025 Contributors to the gst-omx-rs project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use omx::{BufferHeader, Command, Component};

/// How long a state, flush or port command may take to complete.
pub(crate) const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct QueueState {
    headers: VecDeque<BufferHeader>,
    /// Wakes waiters without a header.
    flushing: bool,
    /// The component is leaving Idle; returning headers are freed.
    released: bool,
}

/// Headers of one port currently owned by the element.
#[derive(Default)]
pub(crate) struct PortQueue {
    state: Mutex<QueueState>,
    cond: Condvar,
}

impl PortQueue {
    pub(crate) fn push(&self, header: BufferHeader) {
        lock(&self.state).headers.push_back(header);
        self.cond.notify_one();
    }

    /// Blocks until a header is available. Returns `None` once flushing.
    pub(crate) fn pop(&self) -> Option<BufferHeader> {
        let mut state = lock(&self.state);
        loop {
            if state.flushing {
                return None;
            }
            if let Some(header) = state.headers.pop_front() {
                return Some(header);
            }
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn set_flushing(&self, flushing: bool) {
        lock(&self.state).flushing = flushing;
        self.cond.notify_all();
    }

    pub(crate) fn is_flushing(&self) -> bool {
        lock(&self.state).flushing
    }

    /// Takes every queued header.
    pub(crate) fn drain(&self) -> Vec<BufferHeader> {
        lock(&self.state).headers.drain(..).collect()
    }

    /// Takes every queued header and marks the port released: headers
    /// coming back later have to be freed by whoever returns them.
    pub(crate) fn release(&self) -> Vec<BufferHeader> {
        let mut state = lock(&self.state);
        state.released = true;
        state.headers.drain(..).collect()
    }

    /// Prepares the queue for a new allocation round.
    pub(crate) fn reset(&self) {
        let mut state = lock(&self.state);
        state.flushing = false;
        state.released = false;
    }

    /// Hands an output header back after downstream is done with it.
    ///
    /// The header goes back to the component while streaming, into the
    /// queue while flushing and is freed once the port is released.
    pub(crate) fn recycle(&self, component: &Component, mut header: BufferHeader) {
        header.clear();
        {
            let mut state = lock(&self.state);
            if state.released {
                drop(state);
                if let Err(err) = component.free_buffer(header) {
                    tracing::warn!(
                        component = component.name(),
                        %err,
                        "freeing returned output buffer failed"
                    );
                }
                return;
            }
            if state.flushing {
                state.headers.push_back(header);
                return;
            }
        }

        let id = header.id();
        if let Err(err) = component.fill_this_buffer(header) {
            tracing::warn!(
                component = component.name(),
                id,
                %err,
                "requeueing output buffer failed"
            );
        }
    }
}

#[derive(Default)]
struct WaiterState {
    completed: Vec<Command>,
    error: Option<omx::Error>,
}

/// Collects `CommandComplete` and `Error` events for threads waiting on a
/// command.
#[derive(Default)]
pub(crate) struct CommandWaiter {
    state: Mutex<WaiterState>,
    cond: Condvar,
}

impl CommandWaiter {
    pub(crate) fn complete(&self, command: Command) {
        lock(&self.state).completed.push(command);
        self.cond.notify_all();
    }

    pub(crate) fn fail(&self, error: omx::Error) {
        lock(&self.state).error = Some(error);
        self.cond.notify_all();
    }

    /// Sends `command` and waits until the component reports it complete.
    pub(crate) fn run(&self, component: &Component, command: Command) -> omx::Result<()> {
        self.send(component, command)?;
        self.wait(command)
    }

    /// Sends `command` after forgetting stale completions of it.
    pub(crate) fn send(&self, component: &Component, command: Command) -> omx::Result<()> {
        {
            let mut state = lock(&self.state);
            state.completed.retain(|completed| *completed != command);
            state.error = None;
        }
        component.send_command(command)
    }

    /// Waits for the completion of a command sent with [`Self::send`].
    pub(crate) fn wait(&self, command: Command) -> omx::Result<()> {
        let deadline = Instant::now() + COMMAND_TIMEOUT;
        let mut state = lock(&self.state);
        loop {
            if let Some(pos) = state.completed.iter().position(|c| *c == command) {
                state.completed.swap_remove(pos);
                return Ok(());
            }
            if let Some(error) = state.error.take() {
                return Err(error);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(omx::Error::Timeout);
            }
            state = self
                .cond
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// State shared between the element and its component callbacks.
#[derive(Default)]
pub(crate) struct Shared {
    /// Input headers ready to be filled.
    pub(crate) input: PortQueue,
    /// Output headers filled by the component.
    pub(crate) output: PortQueue,
    pub(crate) commands: CommandWaiter,
}

/// Output header wrapped into a `gst::Buffer` without copying.
///
/// The component stays alive as long as downstream holds the buffer.
pub(crate) struct LentBuffer {
    header: Option<BufferHeader>,
    component: Arc<Component>,
    shared: Arc<Shared>,
}

impl LentBuffer {
    pub(crate) fn new(
        header: BufferHeader,
        component: Arc<Component>,
        shared: Arc<Shared>,
    ) -> Self {
        LentBuffer {
            header: Some(header),
            component,
            shared,
        }
    }
}

impl AsRef<[u8]> for LentBuffer {
    fn as_ref(&self) -> &[u8] {
        self.header.as_ref().map(BufferHeader::filled).unwrap_or(&[])
    }
}

impl Drop for LentBuffer {
    fn drop(&mut self) {
        if let Some(header) = self.header.take() {
            self.shared.output.recycle(&self.component, header);
        }
    }
}

/// Serialises caps changes between the streaming thread and component
/// callbacks.
///
/// The holding thread may acquire it again: components are allowed to raise
/// events from inside `SetParameter` and friends.
#[derive(Default)]
pub(crate) struct CapsLock {
    owner: Mutex<Option<ThreadId>>,
    cond: Condvar,
}

impl CapsLock {
    pub(crate) fn acquire(&self) -> CapsGuard<'_> {
        let current = thread::current().id();
        let mut owner = lock(&self.owner);
        loop {
            match *owner {
                None => {
                    *owner = Some(current);
                    return CapsGuard { lock: Some(self) };
                }
                Some(holder) if holder == current => return CapsGuard { lock: None },
                Some(_) => {
                    owner = self
                        .cond
                        .wait(owner)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }
}

/// Releases a [`CapsLock`] on drop. Nested guards release nothing.
pub(crate) struct CapsGuard<'a> {
    lock: Option<&'a CapsLock>,
}

impl Drop for CapsGuard<'_> {
    fn drop(&mut self) {
        if let Some(caps) = self.lock {
            *lock(&caps.owner) = None;
            caps.cond.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn flushing_wakes_waiters() {
        let queue = Arc::new(PortQueue::default());
        let waiter = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop().is_none())
        };
        thread::sleep(Duration::from_millis(20));
        queue.set_flushing(true);
        assert!(waiter.join().unwrap());
        assert!(queue.is_flushing());

        queue.reset();
        assert!(!queue.is_flushing());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn completions_are_matched_by_command() {
        let waiter = CommandWaiter::default();
        waiter.complete(Command::Flush(1));
        waiter.complete(Command::Flush(0));
        assert_eq!(waiter.wait(Command::Flush(0)), Ok(()));
        assert_eq!(waiter.wait(Command::Flush(1)), Ok(()));

        waiter.fail(omx::Error::Hardware);
        assert_eq!(
            waiter.wait(Command::StateSet(omx::State::Idle)),
            Err(omx::Error::Hardware)
        );
    }

    #[test]
    fn caps_lock_is_reentrant_on_the_holding_thread() {
        let caps = CapsLock::default();
        let outer = caps.acquire();
        let inner = caps.acquire();
        drop(inner);
        assert_eq!(*lock(&caps.owner), Some(thread::current().id()));
        drop(outer);
        assert_eq!(*lock(&caps.owner), None);
    }

    #[test]
    fn caps_lock_blocks_other_threads() {
        let caps = Arc::new(CapsLock::default());
        let guard = caps.acquire();

        let (sender, receiver) = mpsc::channel();
        let other = {
            let caps = caps.clone();
            thread::spawn(move || {
                let _guard = caps.acquire();
                sender.send(()).unwrap();
            })
        };
        assert!(receiver.recv_timeout(Duration::from_millis(50)).is_err());

        drop(guard);
        assert!(receiver.recv_timeout(Duration::from_secs(5)).is_ok());
        other.join().unwrap();
    }
}
