use std::io;

use nix::sys::signal::{Signal, kill, killpg};
use nix::unistd::{Pid, getpgid};

/// Sends `signal` to the process group of `pid`, or to `pid` alone if its
/// group cannot be resolved.
pub(super) fn signal_group(pid: u32, signal: Signal) -> io::Result<()> {
    let pid = Pid::from_raw(pid as i32);
    let res = match getpgid(Some(pid)) {
        Ok(pgid) => killpg(pgid, signal),
        Err(_) => kill(pid, signal),
    };
    res.map_err(io::Error::from)
}
