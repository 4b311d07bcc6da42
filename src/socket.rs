//! Blocking CAN 2.0B / CAN-FD socket wrapper.
//!
//! Mirrors `controller/src/can/manager.rs`'s `connect`/`send_frame`/
//! `receive_frame` shape, re-expressed as synchronous calls on the caller's
//! own thread: the core never spawns a runtime or a background task.

use std::cell::Cell;
use std::os::fd::BorrowedFd;
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use anyhow::Context as _;
use nix::poll::{poll, PollFd, PollFlags};
use socketcan::{CanFdFrame as SockFdFrame, CanFrame as SockFrame, CanSocket, CanFdSocket, Frame, Socket};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{CanFdFrame, CanFrame};

/// Folds an `anyhow` context chain into the crate's typed socket error,
/// matching `can/manager.rs`'s `.with_context(...)` style while keeping the
/// public error surface a closed, matchable enum rather than `anyhow::Error`.
fn fold_context(interface: &str, err: anyhow::Error) -> Error {
    Error::socket(interface, std::io::Error::other(err.to_string()))
}

enum Inner {
    Classic(CanSocket),
    Fd(CanFdSocket),
}

/// A single CAN interface, opened either in classic or FD mode.
///
/// Construction binds the socket immediately; `close` releases it. All
/// operations run on the calling thread and block for up to the configured
/// receive timeout.
pub struct CanBus {
    inner: Option<Inner>,
    interface: String,
    fd: bool,
    recv_timeout: Cell<Duration>,
}

impl CanBus {
    /// Opens `interface`. When `enable_fd` is set, frames up to 64 bytes are
    /// supported and `write`/`read` on a classic frame are transparently
    /// widened/narrowed; `recv_timeout` bounds every `read`/`read_fd` call.
    pub fn open(interface: &str, enable_fd: bool, recv_timeout: Duration) -> Result<Self> {
        info!(interface, enable_fd, "opening CAN interface");

        let inner = if enable_fd {
            let socket = CanFdSocket::open(interface)
                .with_context(|| format!("failed to open CAN-FD interface {interface}"))
                .map_err(|e| fold_context(interface, e))?;
            socket
                .set_read_timeout(recv_timeout)
                .with_context(|| format!("failed to set receive timeout on {interface}"))
                .map_err(|e| fold_context(interface, e))?;
            Inner::Fd(socket)
        } else {
            let socket = CanSocket::open(interface)
                .with_context(|| format!("failed to open CAN interface {interface}"))
                .map_err(|e| fold_context(interface, e))?;
            socket
                .set_read_timeout(recv_timeout)
                .with_context(|| format!("failed to set receive timeout on {interface}"))
                .map_err(|e| fold_context(interface, e))?;
            Inner::Classic(socket)
        };

        info!(interface, "CAN interface open");
        Ok(Self {
            inner: Some(inner),
            interface: interface.to_string(),
            fd: enable_fd,
            recv_timeout: Cell::new(recv_timeout),
        })
    }

    /// Whether the socket is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Closes the underlying socket. Idempotent.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            info!(interface = %self.interface, "closed CAN interface");
        }
    }

    /// Re-opens a previously closed bus on the same interface and mode.
    pub fn initialize(&mut self, recv_timeout: Duration) -> Result<()> {
        if self.inner.is_some() {
            return Ok(());
        }
        *self = Self::open(&self.interface, self.fd, recv_timeout)?;
        Ok(())
    }

    /// Updates the receive timeout on an already-open socket.
    pub fn set_recv_timeout(&self, timeout: Duration) -> Result<()> {
        match self.socket_ref()? {
            Inner::Classic(s) => s.set_read_timeout(timeout),
            Inner::Fd(s) => s.set_read_timeout(timeout),
        }
        .map_err(|e| Error::socket(&self.interface, e))?;
        self.recv_timeout.set(timeout);
        Ok(())
    }

    /// The receive timeout currently applied to `read`/`read_fd`.
    #[must_use]
    pub fn recv_timeout(&self) -> Duration {
        self.recv_timeout.get()
    }

    /// Runs `f` with the receive timeout temporarily overridden, restoring
    /// the previous value (even on error) before returning. Used by
    /// [`crate::device::DeviceCollection::recv_all`] for a per-call
    /// `timeout_us` override (spec.md §4.4) without leaking the override
    /// into later reads.
    pub fn with_recv_timeout<T>(&self, timeout: Option<Duration>, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let Some(timeout) = timeout else {
            return f();
        };
        let previous = self.recv_timeout();
        self.set_recv_timeout(timeout)?;
        let result = f();
        self.set_recv_timeout(previous)?;
        result
    }

    /// Writes a classic frame. On an FD-enabled socket the frame is widened
    /// transparently.
    pub fn write(&self, frame: &CanFrame) -> Result<()> {
        debug!(can_id = frame.can_id, len = frame.data.len(), "writing frame");
        let sock_frame =
            SockFrame::new(frame.can_id, &frame.data).ok_or_else(|| Error::config("invalid classic frame"))?;

        match self.socket_ref()? {
            Inner::Classic(s) => s.write_frame(&sock_frame),
            Inner::Fd(s) => s.write_frame(&SockFdFrame::from(sock_frame)),
        }
        .with_context(|| format!("failed to send frame 0x{:X} on {}", frame.can_id, self.interface))
        .map_err(|e| fold_context(&self.interface, e))
    }

    /// Writes an FD frame. Requires the bus to have been opened with
    /// `enable_fd = true`.
    pub fn write_fd(&self, frame: &CanFdFrame) -> Result<()> {
        debug!(can_id = frame.can_id, len = frame.data.len(), "writing FD frame");
        let sock_frame =
            SockFdFrame::new(frame.can_id, &frame.data).ok_or_else(|| Error::config("invalid FD frame"))?;

        match self.socket_ref()? {
            Inner::Fd(s) => s.write_frame(&sock_frame),
            Inner::Classic(_) => {
                return Err(Error::config("bus not opened in FD mode"));
            }
        }
        .with_context(|| format!("failed to send FD frame 0x{:X} on {}", frame.can_id, self.interface))
        .map_err(|e| fold_context(&self.interface, e))
    }

    /// Blocks for up to the configured receive timeout, then fails with
    /// [`Error::Timeout`].
    pub fn read(&self) -> Result<CanFrame> {
        match self.socket_ref()? {
            Inner::Classic(s) => match s.read_frame() {
                Ok(f) => Ok(CanFrame::new(f.raw_id(), f.data())),
                Err(e) if is_timeout(&e) => Err(Error::timeout(&self.interface)),
                Err(e) => Err(Error::socket(&self.interface, e)),
            },
            Inner::Fd(s) => match s.read_frame() {
                Ok(f) => Ok(CanFrame::new(f.raw_id(), f.data())),
                Err(e) if is_timeout(&e) => Err(Error::timeout(&self.interface)),
                Err(e) => Err(Error::socket(&self.interface, e)),
            },
        }
    }

    /// FD variant of [`CanBus::read`].
    pub fn read_fd(&self) -> Result<CanFdFrame> {
        match self.socket_ref()? {
            Inner::Fd(s) => match s.read_frame() {
                Ok(f) => Ok(CanFdFrame::new(f.raw_id(), f.data())),
                Err(e) if is_timeout(&e) => Err(Error::timeout(&self.interface)),
                Err(e) => Err(Error::socket(&self.interface, e)),
            },
            Inner::Classic(_) => Err(Error::config("bus not opened in FD mode")),
        }
    }

    /// Polls readability for up to `timeout` without consuming a frame.
    pub fn is_data_available(&self, timeout: Duration) -> Result<bool> {
        let raw_fd = match self.socket_ref()? {
            Inner::Classic(s) => s.as_raw_fd(),
            Inner::Fd(s) => s.as_raw_fd(),
        };

        let borrowed = unsafe { BorrowedFd::borrow_raw(raw_fd) };
        let mut fds = [PollFd::new(borrowed, PollFlags::POLLIN)];
        let millis: i32 = timeout.as_millis().try_into().unwrap_or(i32::MAX);
        let n = poll(&mut fds, millis).map_err(|e| Error::socket(&self.interface, std::io::Error::from(e)))?;
        Ok(n > 0)
    }

    fn socket_ref(&self) -> Result<&Inner> {
        self.inner.as_ref().ok_or_else(|| Error::config("bus is closed"))
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}
