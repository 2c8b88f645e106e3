//! Transport interface the framebuffer backends flush through.
//!
//! Modeled on a Linux-style message bus: a transfer is a slice of addressed
//! messages moved in one transaction, bounded by a caller-supplied timeout.
//! The concrete driver lives outside this crate; the backends only depend on
//! this trait plus its status codes.

use std::fmt;
use std::time::Duration;

/// Read transfer (device to host). Write is the default; write-only
/// transports reject transfers carrying this flag.
pub const FLAG_READ: u16 = 0x0001;

/// One addressed message within a transfer.
#[derive(Debug, Clone, Copy)]
pub struct Message<'a> {
    /// 7-bit device address.
    pub addr: u8,
    pub flags: u16,
    pub buf: &'a [u8],
}

impl<'a> Message<'a> {
    pub fn write(addr: u8, buf: &'a [u8]) -> Self {
        Self {
            addr,
            flags: 0,
            buf,
        }
    }
}

/// Status codes a transport can fail with. Any of these leaves the
/// framebuffer store dirty; the backends never retry on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    Timeout,
    /// Device did not acknowledge (protocol error).
    Nack,
    Busy,
    Io,
    InvalidArgument,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TransportError::Timeout => "transfer timed out",
            TransportError::Nack => "device did not acknowledge",
            TransportError::Busy => "bus busy",
            TransportError::Io => "i/o error",
            TransportError::InvalidArgument => "invalid argument",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for TransportError {}

/// Blocking message transport. All calls are synchronous; a stalled bus
/// blocks the caller until the timeout elapses.
pub trait Transport {
    fn transfer(&mut self, msgs: &[Message<'_>], timeout: Duration) -> Result<(), TransportError>;

    /// Probe for a device, retrying up to `trials` times.
    fn is_device_ready(
        &mut self,
        addr: u8,
        trials: u32,
        timeout: Duration,
    ) -> Result<(), TransportError>;

    /// Attempt to unwedge a stuck bus.
    fn recover_bus(&mut self) -> Result<(), TransportError>;
}
