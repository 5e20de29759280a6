use crate::backend::WindowGeometry;
use crate::error::{PreviewError, Result};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

const SOCKET_WAIT_ATTEMPTS: u32 = 50;
const SOCKET_WAIT_STEP: Duration = Duration::from_millis(100);
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

pub struct MpvController {
    process: Option<Child>,
    socket_path: PathBuf,
}

impl Default for MpvController {
    fn default() -> Self {
        Self::new()
    }
}

impl MpvController {
    pub fn new() -> Self {
        let socket_path =
            std::env::temp_dir().join(format!("reelsync-mpv-{}", std::process::id()));
        Self::with_socket(socket_path)
    }

    pub fn with_socket(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            process: None,
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Start mpv idle and paused as a borderless window at `geometry`.
    pub fn start_at(&mut self, geometry: &WindowGeometry) -> Result<()> {
        self.stop();

        let log_path =
            std::env::temp_dir().join(format!("reelsync-mpv-{}.log", std::process::id()));
        let log_file = std::fs::File::create(&log_path).ok();
        tracing::info!(%geometry, log = %log_path.display(), "starting mpv");

        let child = Command::new("mpv")
            .args([
                "--idle=yes",
                "--keep-open=yes",
                "--pause",
                "--osc=no",
                "--osd-level=0",
                "--no-border",
                "--ontop",
                "--no-focus-on-open",
                "--title=reelsync-preview",
                &format!("--geometry={geometry}"),
                &format!("--input-ipc-server={}", self.socket_path.display()),
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(log_file.map(Stdio::from).unwrap_or(Stdio::null()))
            .spawn()
            .map_err(PreviewError::Spawn)?;

        self.process = Some(child);

        for _ in 0..SOCKET_WAIT_ATTEMPTS {
            if self.socket_path.exists() {
                return Ok(());
            }
            std::thread::sleep(SOCKET_WAIT_STEP);
        }
        self.stop();
        Err(PreviewError::SocketTimeout(self.socket_path.clone()))
    }

    /// Send one IPC command and wait for its reply.
    ///
    /// mpv may interleave event lines on the same connection; those are
    /// skipped until a line carrying an `error` field arrives.
    pub fn send_command(&self, command: Value) -> Result<Value> {
        let mut stream = UnixStream::connect(&self.socket_path)?;
        stream.set_read_timeout(Some(REPLY_TIMEOUT))?;
        stream.write_all(format!("{command}\n").as_bytes())?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(PreviewError::Ipc("connection closed before reply".into()));
            }
            if let Some(reply) = parse_reply(&line)? {
                return reply;
            }
        }
    }

    pub fn load_file(&self, path: &str) -> Result<()> {
        self.send_command(json!({ "command": ["loadfile", path] }))?;
        Ok(())
    }

    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.send_command(json!({ "command": ["seek", seconds, "absolute"] }))?;
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        self.send_command(json!({ "command": ["set_property", "pause", true] }))?;
        Ok(())
    }

    pub fn resume(&self) -> Result<()> {
        self.send_command(json!({ "command": ["set_property", "pause", false] }))?;
        Ok(())
    }

    /// `None` while the property is unavailable (e.g. nothing loaded yet).
    pub fn get_property(&self, name: &str) -> Result<Option<Value>> {
        match self.send_command(json!({ "command": ["get_property", name] })) {
            Ok(data) => Ok(Some(data)),
            Err(PreviewError::Ipc(msg)) if msg == "property unavailable" => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn get_position(&self) -> Result<Option<f64>> {
        Ok(self.get_property("time-pos")?.and_then(|v| v.as_f64()))
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!("mpv stopped");
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

impl Drop for MpvController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Interpret one line from the IPC socket. `Ok(None)` for event lines.
fn parse_reply(line: &str) -> Result<Option<Result<Value>>> {
    let msg: Value = serde_json::from_str(line.trim())?;
    let Some(status) = msg.get("error").and_then(Value::as_str) else {
        return Ok(None);
    };
    if status == "success" {
        Ok(Some(Ok(msg.get("data").cloned().unwrap_or(Value::Null))))
    } else {
        Ok(Some(Err(PreviewError::Ipc(status.to_string()))))
    }
}
