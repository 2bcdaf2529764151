//! Audible alert facility.

use crate::error::Result;

/// Plays a tone of `frequency_hz` for `duration_ms`.
#[cfg(windows)]
pub fn beep(frequency_hz: u32, duration_ms: u32) -> Result<()> {
    use crate::error::SysPulseError;

    let ok = unsafe { winapi::um::utilapiset::Beep(frequency_hz, duration_ms) };
    if ok == 0 {
        return Err(SysPulseError::Io(std::io::Error::last_os_error()));
    }
    Ok(())
}

/// Rings the terminal bell. Terminals have no tone control, so the
/// frequency and duration are ignored.
#[cfg(not(windows))]
pub fn beep(_frequency_hz: u32, _duration_ms: u32) -> Result<()> {
    use std::io::Write;

    let mut stderr = std::io::stderr();
    stderr.write_all(b"\x07")?;
    stderr.flush()?;
    Ok(())
}
