//! Process-based terminal implementation.
//!
//! POSIX: termios raw mode plus `poll(2)` for bounded reads.
//! Windows: the CRT console functions `_getch`/`_kbhit`, which are already
//! unbuffered and unechoed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
#[cfg(unix)]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(unix)]
use std::sync::Arc;
use std::time::Duration;

use crate::config::EnvConfig;
use crate::core::terminal::{ByteRead, Terminal};

#[cfg(unix)]
use libc::{self, c_int};

#[cfg(unix)]
fn wait_writable(fd: c_int) -> std::io::Result<()> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    loop {
        let result = unsafe { libc::poll(&mut fds, 1, -1) };
        if result < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            continue;
        }
        if (fds.revents & libc::POLLOUT) != 0 {
            return Ok(());
        }

        return Err(std::io::Error::other(format!(
            "poll(POLLOUT) returned revents=0x{:x}",
            fds.revents
        )));
    }
}

/// Write every byte of `data`, retrying on EINTR and waiting out EAGAIN.
#[cfg(unix)]
fn write_fd(fd: c_int, data: &str) -> std::io::Result<()> {
    let mut rest = data.as_bytes();
    while !rest.is_empty() {
        let result = unsafe { libc::write(fd, rest.as_ptr() as *const libc::c_void, rest.len()) };
        if result > 0 {
            rest = &rest[(result as usize).min(rest.len())..];
            continue;
        }
        if result == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "terminal accepted no bytes",
            ));
        }
        let err = std::io::Error::last_os_error();
        match err.kind() {
            std::io::ErrorKind::Interrupted => {}
            std::io::ErrorKind::WouldBlock => wait_writable(fd)?,
            _ => return Err(err),
        }
    }
    Ok(())
}

#[cfg(unix)]
fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

/// Wait up to `timeout_ms` (negative: forever) for `fd` to become readable.
#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> std::io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    if result < 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    if result > 0 && (fds.revents & libc::POLLNVAL) != 0 {
        return Err(std::io::Error::from_raw_os_error(libc::EBADF));
    }
    // POLLHUP without POLLIN still means a read will return EOF.
    Ok(result > 0 && (fds.revents & (libc::POLLIN | libc::POLLHUP)) != 0)
}

#[cfg(unix)]
fn read_one(fd: c_int) -> std::io::Result<ByteRead> {
    let mut byte = 0u8;
    loop {
        let result = unsafe { libc::read(fd, &mut byte as *mut u8 as *mut libc::c_void, 1) };
        if result == 1 {
            return Ok(ByteRead::Byte(byte));
        }
        if result == 0 {
            return Ok(ByteRead::Eof);
        }
        let err = std::io::Error::last_os_error();
        match err.kind() {
            std::io::ErrorKind::Interrupted => continue,
            std::io::ErrorKind::WouldBlock => return Ok(ByteRead::Timeout),
            _ => return Err(err),
        }
    }
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> std::io::Result<libc::termios> {
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> std::io::Result<()> {
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
fn timeout_to_ms(timeout: Option<Duration>) -> i32 {
    timeout.map_or(-1, |timeout| timeout.as_millis().min(i32::MAX as u128) as i32)
}

/// Appends every byte written to the terminal to a file, for debugging redraws.
#[derive(Debug)]
struct WriteLog {
    path: PathBuf,
    failed: bool,
}

impl WriteLog {
    fn append(&mut self, data: &str) {
        if self.failed {
            return;
        }
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(data.as_bytes()));
        if let Err(err) = result {
            tracing::warn!(path = %self.path.display(), error = %err, "write log disabled");
            self.failed = true;
        }
    }
}

#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: Option<libc::termios>,
    raw: bool,
    write_log: Option<WriteLog>,
    signals: Option<SignalFlagGuard>,
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            original_termios: None,
            raw: false,
            write_log: None,
            signals: None,
        }
    }

    /// Terminal configured from the environment, with SIGINT/SIGTERM captured
    /// into the interrupt flag.
    pub fn from_config(config: &EnvConfig) -> std::io::Result<Self> {
        let mut terminal = Self::new();
        terminal.write_log = config.write_log.clone().map(|path| WriteLog {
            path: PathBuf::from(path),
            failed: false,
        });
        terminal.signals = Some(install_signal_flag()?);
        Ok(terminal)
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn enable_raw_mode(&mut self) -> std::io::Result<()> {
        if self.raw {
            return Ok(());
        }
        let original = match self.original_termios {
            Some(original) => original,
            None => {
                let original = get_termios(self.stdin_fd)?;
                self.original_termios = Some(original);
                original
            }
        };
        let mut raw = original;
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        // Keep output post-processing so "\n" still returns the carriage.
        raw.c_oflag |= libc::OPOST;
        set_termios(self.stdin_fd, &raw)?;
        self.raw = true;
        Ok(())
    }

    fn restore_mode(&mut self) -> std::io::Result<()> {
        if !self.raw {
            return Ok(());
        }
        if let Some(original) = self.original_termios.as_ref() {
            set_termios(self.stdin_fd, original)?;
        }
        self.raw = false;
        Ok(())
    }

    fn read_byte(&mut self, timeout: Option<Duration>) -> std::io::Result<ByteRead> {
        if !poll_readable(self.stdin_fd, timeout_to_ms(timeout))? {
            return Ok(ByteRead::Timeout);
        }
        read_one(self.stdin_fd)
    }

    fn write(&mut self, data: &str) -> std::io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        write_fd(self.stdout_fd, data)?;
        if let Some(log) = self.write_log.as_mut() {
            log.append(data);
        }
        Ok(())
    }

    fn columns(&self) -> u16 {
        read_winsize(self.stdout_fd)
            .map(|(cols, _)| cols)
            .unwrap_or(80)
    }

    fn interrupted(&self) -> bool {
        self.signals.as_ref().is_some_and(SignalFlagGuard::raised)
    }
}

#[cfg(unix)]
impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        let _ = self.restore_mode();
    }
}

/// SIGINT/SIGTERM registration that sets a shared flag instead of killing the
/// process. Unregisters on drop.
#[cfg(unix)]
pub struct SignalFlagGuard {
    flag: Arc<AtomicBool>,
    ids: Vec<signal_hook::SigId>,
}

#[cfg(unix)]
impl SignalFlagGuard {
    pub fn raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(unix)]
impl Drop for SignalFlagGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/// Install SIGINT/SIGTERM handlers that raise a flag.
#[cfg(unix)]
pub fn install_signal_flag() -> std::io::Result<SignalFlagGuard> {
    let flag = Arc::new(AtomicBool::new(false));
    let mut ids = Vec::with_capacity(2);
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        ids.push(signal_hook::flag::register(signal, Arc::clone(&flag))?);
    }
    Ok(SignalFlagGuard { flag, ids })
}

#[cfg(windows)]
extern "C" {
    fn _getch() -> i32;
    fn _kbhit() -> i32;
}

#[cfg(windows)]
pub struct ProcessTerminal {
    write_log: Option<WriteLog>,
}

#[cfg(windows)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self { write_log: None }
    }

    pub fn from_config(config: &EnvConfig) -> std::io::Result<Self> {
        let mut terminal = Self::new();
        terminal.write_log = config.write_log.clone().map(|path| WriteLog {
            path: PathBuf::from(path),
            failed: false,
        });
        Ok(terminal)
    }
}

#[cfg(windows)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
impl Terminal for ProcessTerminal {
    fn enable_raw_mode(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn restore_mode(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn read_byte(&mut self, timeout: Option<Duration>) -> std::io::Result<ByteRead> {
        if let Some(timeout) = timeout {
            let deadline = std::time::Instant::now() + timeout;
            while unsafe { _kbhit() } == 0 {
                if std::time::Instant::now() >= deadline {
                    return Ok(ByteRead::Timeout);
                }
                std::thread::sleep(Duration::from_millis(1));
            }
        }
        let code = unsafe { _getch() };
        Ok(ByteRead::Byte((code & 0xff) as u8))
    }

    fn write(&mut self, data: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(data.as_bytes())?;
        stdout.flush()?;
        if let Some(log) = self.write_log.as_mut() {
            log.append(data);
        }
        Ok(())
    }

    fn columns(&self) -> u16 {
        80
    }

    fn input_flavor(&self) -> crate::core::terminal::InputFlavor {
        crate::core::terminal::InputFlavor::WindowsConsole
    }
}
