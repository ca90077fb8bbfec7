//! Phase-server client plumbing.
//!
//! A phase server is an external binary launched once per distinct resolved
//! path. The exchange is line-delimited JSON over the child's stdio: one
//! request line out, one response line back. The driver owns nothing beyond
//! this boundary; what the server does with a request is its own business.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoint::Phase;
use crate::errors::DriverError;

/// One RPC request to a phase server.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseRequest {
    pub phase: Phase,
    pub payload: Value,
}

/// A phase server's answer: a result, or a descriptive failure from the
/// phase itself. Both absent is treated as a transport error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhaseResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The seam between the executor and the wire. Production code talks to a
/// [`PhaseClient`]; tests substitute in-process fakes.
pub trait PhaseInvoker {
    fn invoke(&self, request: &PhaseRequest) -> Result<PhaseResponse, DriverError>;
}

struct ClientPipes {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Handle to one launched phase-server process.
///
/// Invocation takes `&self` behind a mutex so a single `Arc<PhaseClient>`
/// can back multiple phases, per the deduplication rule in
/// [`EndpointPaths::resolve`](crate::endpoint::EndpointPaths::resolve).
pub struct PhaseClient {
    path: String,
    pipes: Mutex<ClientPipes>,
}

impl PhaseClient {
    /// Launches the server binary at `path` with piped stdio.
    pub fn from_path(path: &str) -> Result<Self, DriverError> {
        let launch_err = |source| DriverError::Launch {
            path: path.to_string(),
            source,
        };
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(launch_err)?;
        let stdin = child.stdin.take().ok_or_else(|| {
            launch_err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "no stdin pipe",
            ))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            launch_err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "no stdout pipe",
            ))
        })?;
        Ok(Self {
            path: path.to_string(),
            pipes: Mutex::new(ClientPipes {
                child,
                stdin,
                stdout: BufReader::new(stdout),
            }),
        })
    }

    /// The binary path this client was launched from.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl PhaseInvoker for PhaseClient {
    fn invoke(&self, request: &PhaseRequest) -> Result<PhaseResponse, DriverError> {
        let transport = |message: String| DriverError::Transport {
            phase: request.phase,
            message,
        };
        let line = serde_json::to_string(request)
            .map_err(|e| transport(format!("encode request: {}", e)))?;

        let mut pipes = self
            .pipes
            .lock()
            .map_err(|_| transport("client mutex poisoned".to_string()))?;
        pipes
            .stdin
            .write_all(line.as_bytes())
            .and_then(|_| pipes.stdin.write_all(b"\n"))
            .and_then(|_| pipes.stdin.flush())
            .map_err(|e| transport(format!("write to '{}': {}", self.path, e)))?;

        read_response(&mut pipes.stdout, request.phase, &self.path)
    }
}

/// Reads and decodes one response line. EOF means the server went away.
fn read_response(
    reader: &mut impl BufRead,
    phase: Phase,
    path: &str,
) -> Result<PhaseResponse, DriverError> {
    let transport = |message: String| DriverError::Transport { phase, message };
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .map_err(|e| transport(format!("read from '{}': {}", path, e)))?;
    if n == 0 {
        return Err(transport(format!("server '{}' closed its stdout", path)));
    }
    serde_json::from_str(&line)
        .map_err(|e| transport(format!("decode response from '{}': {}", path, e)))
}

impl Drop for PhaseClient {
    fn drop(&mut self) {
        if let Ok(pipes) = self.pipes.get_mut() {
            let _ = pipes.child.kill();
            let _ = pipes.child.wait();
        }
    }
}
