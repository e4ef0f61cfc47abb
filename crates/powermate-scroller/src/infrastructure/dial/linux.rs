//! evdev-backed implementation of [`DialOpener`] and [`DialDevice`].

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use powermate_core::{encode_event, indicator_reset, EVENT_SIZE};
use tracing::debug;

use crate::application::connection::{DialDevice, DialOpener};
use crate::application::device_error::{DeviceError, DeviceOp};

/// Opens the dial's evdev node at a fixed path.
#[derive(Debug, Clone)]
pub struct EvdevDialOpener {
    path: PathBuf,
}

impl EvdevDialOpener {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DialOpener for EvdevDialOpener {
    type Device = EvdevDial;

    /// Opens the node read-write so the indicator can be reset.
    fn open(&mut self) -> Result<EvdevDial, DeviceError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| DeviceError::from_io(DeviceOp::Open, e))?;
        debug!("opened {}", self.path.display());
        Ok(EvdevDial { file })
    }
}

/// An open dial.  Closed when dropped.
#[derive(Debug)]
pub struct EvdevDial {
    file: File,
}

impl DialDevice for EvdevDial {
    fn read_record(&mut self, buf: &mut [u8; EVENT_SIZE]) -> Result<usize, DeviceError> {
        self.file
            .read(buf)
            .map_err(|e| DeviceError::from_io(DeviceOp::Read, e))
    }

    fn reset_indicator(&mut self) -> Result<(), DeviceError> {
        let record = encode_event(&indicator_reset());
        self.file
            .write_all(&record)
            .map_err(|e| DeviceError::from_io(DeviceOp::WriteIndicator, e))
    }
}
