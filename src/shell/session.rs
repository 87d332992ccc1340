//! Session management for a sqlite3 child process.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};

use super::decode::{decode, DecodeMode, QueryOutput};
use super::error::{SessionError, SessionResult};
use super::frame::{FrameBuffer, SENTINEL};

/// Database identifier for an in-memory instance.
pub const MEMORY: &str = ":memory:";

const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const READ_CHUNK_SIZE: usize = 4096;

/// Configuration for opening a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The sqlite3 executable to spawn. Resolved on the search path when not
    /// an absolute path.
    pub binary: PathBuf,
    /// How long to wait for a response before giving up on a command.
    pub timeout: Duration,
    /// Engine-side busy timeout, issued at bootstrap when set.
    pub busy_timeout: Option<Duration>,
    /// Emit per-command diagnostics.
    pub debug: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("sqlite3"),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            busy_timeout: None,
            debug: false,
        }
    }
}

impl SessionConfig {
    /// Set the sqlite3 executable.
    pub fn binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the response timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the engine busy timeout.
    pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = Some(busy_timeout);
        self
    }

    /// Enable per-command diagnostics.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Bytes arriving from the child's streams, forwarded by the reader tasks.
enum StreamEvent {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Closed,
}

/// One live connection to one database file or in-memory instance.
///
/// The protocol is strictly request/response with a single command in flight;
/// `&mut self` on every operation makes pipelining unrepresentable. Callers
/// that share a session across tasks must serialize access themselves.
#[derive(Debug)]
pub struct Session {
    stdin: Option<BufWriter<ChildStdin>>,
    events: mpsc::UnboundedReceiver<StreamEvent>,
    child: Option<Child>,
    config: SessionConfig,
    database: String,
    state: State,
}

impl Session {
    /// Spawn a sqlite3 process bound to `database` and bootstrap it.
    ///
    /// The database path (or `:memory:`) is passed as the sole positional
    /// argument. A failure to start the executable is detected here and
    /// surfaced as [`SessionError::SpawnFailed`], never as a later hang.
    /// Before returning, the output mode is fixed to JSON and the engine
    /// busy timeout applied when configured.
    pub async fn open(database: impl Into<String>, config: SessionConfig) -> SessionResult<Session> {
        let database = database.into();

        let mut child = Command::new(&config.binary)
            .arg(&database)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(SessionError::SpawnFailed)?;

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");
        let stderr = child.stderr.take().expect("stderr not captured");

        let (tx, events) = mpsc::unbounded_channel();
        spawn_stdout_reader(stdout, tx.clone());
        spawn_stderr_reader(stderr, tx);

        let mut session = Session {
            stdin: Some(BufWriter::new(stdin)),
            events,
            child: Some(child),
            config,
            database,
            state: State::Open,
        };

        // Bootstrap through the framed protocol, before any caller traffic.
        session.execute_raw(".mode json").await?;
        if let Some(busy) = session.config.busy_timeout {
            let command = format!(".timeout {}", busy.as_millis());
            session.execute_raw(&command).await?;
        }

        Ok(session)
    }

    /// Open a session on an in-memory database.
    pub async fn in_memory(config: SessionConfig) -> SessionResult<Session> {
        Self::open(MEMORY, config).await
    }

    /// Send a graceful exit and release the process.
    ///
    /// The child handle is passed to a detached reaper task, so `close()`
    /// returns without waiting for the process to actually terminate.
    pub async fn close(&mut self) -> SessionResult<()> {
        match self.state {
            State::Closed => Err(SessionError::AlreadyClosed),
            State::Open => {
                if let Some(mut stdin) = self.stdin.take() {
                    // The engine exits on .quit; a write failure here means it
                    // is already gone, which is fine for close.
                    let _ = stdin.write_all(b".quit\n").await;
                    let _ = stdin.flush().await;
                }
                if let Some(mut child) = self.child.take() {
                    tokio::spawn(async move {
                        let _ = child.wait().await;
                    });
                }
                self.state = State::Closed;
                if self.config.debug {
                    tracing::debug!(database = %self.database, "session closed");
                }
                Ok(())
            }
        }
    }

    /// Run one command through the framed protocol, returning the raw
    /// response with the sentinel stripped and whitespace trimmed.
    ///
    /// This is the protocol itself: accumulators reset, command plus sentinel
    /// print written, readiness awaited under the deadline, error stream
    /// checked before the output is trusted.
    pub async fn execute_raw(&mut self, command: &str) -> SessionResult<String> {
        self.ensure_open()?;

        // Discard anything still queued from a previous command so the
        // accumulators start empty.
        loop {
            match self.events.try_recv() {
                Ok(StreamEvent::Closed) => return Err(SessionError::EngineExited),
                Ok(_) => continue,
                Err(_) => break,
            }
        }

        if self.config.debug {
            tracing::debug!(command, "issuing command");
        }

        let stdin = self.stdin.as_mut().ok_or(SessionError::NotConnected)?;
        stdin
            .write_all(command.as_bytes())
            .await
            .map_err(SessionError::WriteFailed)?;
        stdin
            .write_all(b"\n")
            .await
            .map_err(SessionError::WriteFailed)?;
        stdin
            .write_all(format!(".print {SENTINEL}\n").as_bytes())
            .await
            .map_err(SessionError::WriteFailed)?;
        stdin.flush().await.map_err(SessionError::WriteFailed)?;

        let deadline = Instant::now() + self.config.timeout;
        let mut frame = FrameBuffer::new();

        while !frame.is_ready() {
            let event = match timeout_at(deadline, self.events.recv()).await {
                Ok(Some(event)) => event,
                Ok(None) => return Err(SessionError::EngineExited),
                Err(_) => {
                    return Err(SessionError::QueryTimeout {
                        command: command.to_string(),
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    })
                }
            };
            match event {
                StreamEvent::Stdout(chunk) => frame.push_stdout(&chunk),
                StreamEvent::Stderr(chunk) => frame.push_stderr(&chunk),
                StreamEvent::Closed => return Err(SessionError::EngineExited),
            }
        }

        // The engine writes its diagnostics before executing the sentinel
        // print, but stderr is a separate pipe; give its reader a turn to
        // deliver before judging the command.
        tokio::task::yield_now().await;
        while let Ok(event) = self.events.try_recv() {
            match event {
                StreamEvent::Stdout(chunk) => frame.push_stdout(&chunk),
                StreamEvent::Stderr(chunk) => frame.push_stderr(&chunk),
                StreamEvent::Closed => {}
            }
        }

        if frame.has_stderr() {
            return Err(SessionError::engine(command, frame.stderr_text()));
        }

        let response = frame.response();
        if self.config.debug {
            tracing::debug!(bytes = response.len(), "response complete");
        }
        Ok(response)
    }

    /// Run a command and decode the response in the requested mode.
    pub async fn execute(
        &mut self,
        command: &str,
        mode: DecodeMode,
    ) -> SessionResult<QueryOutput> {
        let raw = self.execute_raw(command).await?;
        decode(&raw, mode)
    }

    /// Run a SQL statement, appending the terminator when missing, and decode
    /// the response as structured rows.
    pub async fn sql(&mut self, command: &str) -> SessionResult<QueryOutput> {
        let command = command.trim();
        if command.ends_with(';') {
            self.execute(command, DecodeMode::Structured).await
        } else {
            let terminated = format!("{command};");
            self.execute(&terminated, DecodeMode::Structured).await
        }
    }

    /// The database path or `:memory:` this session is bound to.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Whether the session is open.
    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// The configured response timeout.
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    fn ensure_open(&self) -> SessionResult<()> {
        match self.state {
            State::Open => Ok(()),
            State::Closed => Err(SessionError::NotConnected),
        }
    }
}

fn spawn_stdout_reader(mut stdout: ChildStdout, tx: mpsc::UnboundedSender<StreamEvent>) {
    tokio::spawn(async move {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop {
            match stdout.read(&mut buf).await {
                Ok(0) | Err(_) => {
                    let _ = tx.send(StreamEvent::Closed);
                    break;
                }
                Ok(n) => {
                    if tx.send(StreamEvent::Stdout(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

fn spawn_stderr_reader(mut stderr: ChildStderr, tx: mpsc::UnboundedSender<StreamEvent>) {
    tokio::spawn(async move {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        loop {
            match stderr.read(&mut buf).await {
                // stderr closing alone does not end the session; stdout EOF
                // is the authoritative signal.
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(StreamEvent::Stderr(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
            }
        }
    });
}
