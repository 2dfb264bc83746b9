// SPDX-License-Identifier: Apache-2.0
//! Scoped handle to the driver endpoint.
//!
//! The driver's request model assumes one request per open file: every public
//! operation acquires a fresh channel, performs its request(s) and releases
//! the handle before returning. Channels are torn down by `Drop`, so every
//! exit path — including early error returns — closes the device.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::AsRawFd;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{QosError, Result};
use crate::task::TaskId;

/// A single-use handle to the quantum device node.
#[derive(Debug)]
pub(crate) struct DeviceChannel {
    file: File,
}

impl DeviceChannel {
    /// Open the device read-write. Failure means the driver is absent or the
    /// caller lacks permission on the node.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|cause| QosError::DeviceUnavailable {
                path: path.display().to_string(),
                cause,
            })?;
        trace!(path = %path.display(), fd = file.as_raw_fd(), "opened device channel");
        Ok(Self { file })
    }

    /// Write the full submission buffer in a single write call.
    ///
    /// The driver cannot accept partial submissions, so a short write is a
    /// failure, not a retry.
    pub(crate) fn write_submission(&mut self, buf: &[u8]) -> Result<()> {
        let written = self
            .file
            .write(buf)
            .map_err(|e| QosError::SubmissionFailed(format!("write: {e}")))?;
        if written != buf.len() {
            return Err(QosError::SubmissionFailed(format!(
                "short write: {written} of {} bytes accepted",
                buf.len()
            )));
        }
        Ok(())
    }

    /// Read back the driver-assigned identifier: the synchronous 4-byte
    /// acknowledgment that follows a submission write.
    pub(crate) fn read_assigned_id(&mut self) -> Result<TaskId> {
        let mut raw = [0u8; 4];
        self.file
            .read_exact(&mut raw)
            .map_err(|e| QosError::SubmissionFailed(format!("qid read-back: {e}")))?;
        let qid = i32::from_ne_bytes(raw);
        TaskId::new(qid).ok_or_else(|| {
            QosError::SubmissionFailed(format!("driver returned non-positive qid {qid}"))
        })
    }

    /// Issue one ioctl request. Returns the driver's non-negative return
    /// value, or the errno as an `io::Error` for the caller to classify.
    pub(crate) fn request<T>(&self, code: libc::c_ulong, arg: &mut T) -> io::Result<i32> {
        let ret = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                code,
                arg as *mut T as *mut libc::c_void,
            )
        };
        if ret < 0 {
            let err = io::Error::last_os_error();
            debug!(code, %err, "device request failed");
            return Err(err);
        }
        Ok(ret)
    }
}

impl Drop for DeviceChannel {
    fn drop(&mut self) {
        trace!(fd = self.file.as_raw_fd(), "released device channel");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::path::PathBuf;

    #[test]
    fn test_open_missing_device_is_unavailable() {
        let err = DeviceChannel::open(&PathBuf::from("/nonexistent/quantum")).unwrap_err();
        assert!(matches!(err, QosError::DeviceUnavailable { .. }));
    }

    #[test]
    fn test_read_assigned_id_from_regular_file() {
        // A regular file stands in for the device: the read path only needs
        // 4 bytes of little-or-big native-endian integer.
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&7i32.to_ne_bytes()).unwrap();
        tmp.flush().unwrap();

        let mut ch = DeviceChannel::open(tmp.path()).unwrap();
        let id = ch.read_assigned_id().unwrap();
        assert_eq!(id.raw(), 7);
    }

    #[test]
    fn test_non_positive_qid_rejected() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&(-2i32).to_ne_bytes()).unwrap();
        tmp.flush().unwrap();

        let mut ch = DeviceChannel::open(tmp.path()).unwrap();
        let err = ch.read_assigned_id().unwrap_err();
        assert!(matches!(err, QosError::SubmissionFailed(_)));
    }

    #[test]
    fn test_truncated_qid_rejected() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[1u8, 2]).unwrap();
        tmp.flush().unwrap();

        let mut ch = DeviceChannel::open(tmp.path()).unwrap();
        assert!(ch.read_assigned_id().is_err());
    }
}
