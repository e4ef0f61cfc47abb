//! `/dev/uinput` control handle.
//!
//! The ioctl request numbers are built the same way `<linux/ioctl.h>` builds
//! them, so they can be checked against the values the kernel headers give.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use powermate_core::EVENT_SIZE;
use tracing::debug;

use super::{UinputControl, VirtualDeviceError};

const UINPUT_IOCTL_TYPE: u8 = b'U';
const UI_NR_DEV_CREATE: u8 = 1;
const UI_NR_DEV_DESTROY: u8 = 2;
const UI_NR_SET_EVBIT: u8 = 100;
const UI_NR_SET_KEYBIT: u8 = 101;
const UI_NR_SET_RELBIT: u8 = 102;

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;
const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;
const IOC_NONE: u32 = 0;
const IOC_WRITE: u32 = 1;

const fn ioctl_code(direction: u32, kind: u8, nr: u8, size: usize) -> libc::c_ulong {
    ((direction << IOC_DIRSHIFT)
        | ((kind as u32) << IOC_TYPESHIFT)
        | ((nr as u32) << IOC_NRSHIFT)
        | ((size as u32) << IOC_SIZESHIFT)) as libc::c_ulong
}

const fn io_none(kind: u8, nr: u8) -> libc::c_ulong {
    ioctl_code(IOC_NONE, kind, nr, 0)
}

const fn io_write<T>(kind: u8, nr: u8) -> libc::c_ulong {
    ioctl_code(IOC_WRITE, kind, nr, std::mem::size_of::<T>())
}

const UI_DEV_CREATE: libc::c_ulong = io_none(UINPUT_IOCTL_TYPE, UI_NR_DEV_CREATE);
const UI_DEV_DESTROY: libc::c_ulong = io_none(UINPUT_IOCTL_TYPE, UI_NR_DEV_DESTROY);
const UI_SET_EVBIT: libc::c_ulong = io_write::<libc::c_int>(UINPUT_IOCTL_TYPE, UI_NR_SET_EVBIT);
const UI_SET_KEYBIT: libc::c_ulong = io_write::<libc::c_int>(UINPUT_IOCTL_TYPE, UI_NR_SET_KEYBIT);
const UI_SET_RELBIT: libc::c_ulong = io_write::<libc::c_int>(UINPUT_IOCTL_TYPE, UI_NR_SET_RELBIT);

/// An open `/dev/uinput` file, write-only and non-blocking.
#[derive(Debug)]
pub struct LinuxUinput {
    file: File,
}

impl LinuxUinput {
    /// Opens the uinput control node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualDeviceError::Open`] if the node is missing or the
    /// process lacks permission to write it.
    pub fn open(path: &Path) -> Result<Self, VirtualDeviceError> {
        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|source| VirtualDeviceError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("opened {}", path.display());
        Ok(Self { file })
    }

    fn ioctl_arg(&self, request: libc::c_ulong, arg: u16) -> io::Result<()> {
        // SAFETY: the fd is owned by `self.file` and stays open for the call;
        // the UI_SET_*BIT requests take their argument by value.
        let result = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                request as _,
                libc::c_int::from(arg),
            )
        };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn ioctl_none(&self, request: libc::c_ulong) -> io::Result<()> {
        // SAFETY: the fd is owned by `self.file`; UI_DEV_CREATE and
        // UI_DEV_DESTROY take no argument.
        let result = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _) };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl UinputControl for LinuxUinput {
    fn set_ev_bit(&mut self, event_type: u16) -> io::Result<()> {
        self.ioctl_arg(UI_SET_EVBIT, event_type)
    }

    fn set_rel_bit(&mut self, code: u16) -> io::Result<()> {
        self.ioctl_arg(UI_SET_RELBIT, code)
    }

    fn set_key_bit(&mut self, code: u16) -> io::Result<()> {
        self.ioctl_arg(UI_SET_KEYBIT, code)
    }

    fn write_descriptor(&mut self, descriptor: &[u8]) -> io::Result<()> {
        self.file.write_all(descriptor)
    }

    fn create(&mut self) -> io::Result<()> {
        self.ioctl_none(UI_DEV_CREATE)
    }

    fn destroy(&mut self) -> io::Result<()> {
        self.ioctl_none(UI_DEV_DESTROY)
    }

    fn write_event(&mut self, record: &[u8; EVENT_SIZE]) -> io::Result<()> {
        self.file.write_all(record)
    }
}
