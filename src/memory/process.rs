// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, MemoryWriter};

/// Live memory of another process.
///
/// Linux only: reads and writes go through `process_vm_readv` /
/// `process_vm_writev`, which need ptrace access to the target.
pub struct ProcessMemory {
    pid: i32,
}

impl ProcessMemory {
    pub fn attach(pid: i32) -> Result<Self, MemoryError> {
        if !std::path::Path::new(&format!("/proc/{}", pid)).exists() {
            return Err(MemoryError::ProcessNotFound(format!("pid {}", pid)));
        }
        log::info!("attached to process {}", pid);
        Ok(Self { pid })
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }
}

#[cfg(target_os = "linux")]
fn translate_errno(pid: i32, addr: Address, len: usize) -> MemoryError {
    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::EFAULT) | Some(libc::EIO) => MemoryError::out_of_bounds(addr.as_u64(), len),
        Some(libc::ESRCH) => MemoryError::ProcessNotFound(format!("pid {}", pid)),
        Some(libc::EPERM) => {
            MemoryError::PermissionDenied(format!("ptrace access to pid {} denied", pid))
        }
        _ => MemoryError::Io(err),
    }
}

#[cfg(target_os = "linux")]
impl MemoryReader for ProcessMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let mut buffer = vec![0u8; len];
        if len == 0 {
            return Ok(buffer);
        }
        let local = libc::iovec {
            iov_base: buffer.as_mut_ptr() as *mut libc::c_void,
            iov_len: len,
        };
        let remote = libc::iovec {
            iov_base: addr.as_u64() as usize as *mut libc::c_void,
            iov_len: len,
        };
        let read = unsafe { libc::process_vm_readv(self.pid, &local, 1, &remote, 1, 0) };
        if read < 0 {
            return Err(translate_errno(self.pid, addr, len));
        }
        if read as usize != len {
            return Err(MemoryError::out_of_bounds(addr.as_u64(), len));
        }
        Ok(buffer)
    }

    fn name(&self) -> &str {
        "process"
    }
}

#[cfg(target_os = "linux")]
impl MemoryWriter for ProcessMemory {
    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        if data.is_empty() {
            return Ok(());
        }
        let local = libc::iovec {
            iov_base: data.as_ptr() as *mut libc::c_void,
            iov_len: data.len(),
        };
        let remote = libc::iovec {
            iov_base: addr.as_u64() as usize as *mut libc::c_void,
            iov_len: data.len(),
        };
        let written = unsafe { libc::process_vm_writev(self.pid, &local, 1, &remote, 1, 0) };
        if written < 0 {
            return Err(translate_errno(self.pid, addr, data.len()));
        }
        if written as usize != data.len() {
            return Err(MemoryError::WriteFailed(addr.as_u64()));
        }
        Ok(())
    }
}

#[cfg(not(target_os = "linux"))]
impl MemoryReader for ProcessMemory {
    fn read_bytes(&self, _addr: Address, _len: usize) -> Result<Vec<u8>, MemoryError> {
        Err(MemoryError::NotSupported("live process reads need Linux".to_string()))
    }

    fn name(&self) -> &str {
        "process"
    }
}

#[cfg(not(target_os = "linux"))]
impl MemoryWriter for ProcessMemory {
    fn write_bytes(&self, _addr: Address, _data: &[u8]) -> Result<(), MemoryError> {
        Err(MemoryError::NotSupported("live process writes need Linux".to_string()))
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;

    #[test]
    fn test_read_own_process() {
        let value: u64 = 0x1122_3344_5566_7788;
        let addr = Address::new(&value as *const u64 as u64);
        let mem = ProcessMemory::attach(std::process::id() as i32).unwrap();
        match mem.read_bytes(addr, 8) {
            Ok(read) => assert_eq!(read, value.to_ne_bytes()),
            // Hardened kernels may deny even self-access.
            Err(MemoryError::PermissionDenied(_)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_missing_process() {
        assert!(matches!(
            ProcessMemory::attach(i32::MAX),
            Err(MemoryError::ProcessNotFound(_))
        ));
    }
}
