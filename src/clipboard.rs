use anyhow::Result;
#[cfg(not(target_os = "linux"))]
use arboard::Clipboard;

/// Hidden argument that turns the binary into a short-lived clipboard owner.
pub const CLIPBOARD_DAEMON_FLAG: &str = "__dirpick_clipboard_daemon";

/// X11 and Wayland drop clipboard contents when the owning process exits, so
/// on Linux a detached copy of this binary keeps serving them.
#[cfg(target_os = "linux")]
fn serve_clipboard_until_replaced() -> Result<()> {
    use arboard::{Clipboard, SetExtLinux};

    let text = std::io::read_to_string(std::io::stdin())?;
    let mut clipboard = Clipboard::new()?;
    // `wait` blocks until another program takes ownership of the clipboard.
    clipboard.set().wait().text(text)?;
    Ok(())
}

/// Returns `Ok(true)` if this process was started as the clipboard daemon and
/// has finished serving.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if !std::env::args().any(|a| a == CLIPBOARD_DAEMON_FLAG) {
        return Ok(false);
    }
    #[cfg(target_os = "linux")]
    serve_clipboard_until_replaced()?;
    #[cfg(not(target_os = "linux"))]
    tracing::warn!("{} is only used on Linux; ignoring", CLIPBOARD_DAEMON_FLAG);
    Ok(true)
}

pub fn copy_text_to_clipboard(text: String) -> Result<()> {
    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
    }

    #[cfg(target_os = "linux")]
    {
        use anyhow::Context;
        use std::io::Write;
        use std::process::{Command, Stdio};

        let mut child = Command::new(std::env::current_exe()?)
            .arg(CLIPBOARD_DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()
            .context("cannot start clipboard daemon")?;

        let mut stdin = child
            .stdin
            .take()
            .context("clipboard daemon has no stdin")?;
        stdin.write_all(text.as_bytes())?;
        stdin.flush()?;
    }
    Ok(())
}
