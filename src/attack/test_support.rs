use std::fmt::Write as _;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

/// Canned response served to every request.
#[derive(Debug, Clone)]
pub(super) struct Reply {
    pub(super) status: &'static str,
    pub(super) headers: Vec<(&'static str, String)>,
    pub(super) body: Vec<u8>,
    pub(super) delay: Duration,
    /// Bytes of `body` actually written; `Content-Length` still announces all of it.
    pub(super) truncate_at: Option<usize>,
}

impl Reply {
    pub(super) fn ok(body: &[u8]) -> Self {
        Self {
            status: "200 OK",
            headers: Vec::new(),
            body: body.to_vec(),
            delay: Duration::ZERO,
            truncate_at: None,
        }
    }

    pub(super) fn with_status(mut self, status: &'static str) -> Self {
        self.status = status;
        self
    }

    pub(super) fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_owned()));
        self
    }

    pub(super) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(super) const fn with_truncated_body(mut self, sent: usize) -> Self {
        self.truncate_at = Some(sent);
        self
    }
}

#[derive(Debug, Default)]
pub(super) struct ServerStats {
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ServerStats {
    pub(super) fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub(super) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub(super) struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    pub(super) stats: Arc<ServerStats>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawns a thread-per-connection HTTP/1.1 server answering with `reply`.
pub(super) fn spawn_http_server(reply: Reply) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let stats = Arc::new(ServerStats::default());
    let server_stats = Arc::clone(&stats);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let reply = reply.clone();
                    let stats = Arc::clone(&server_stats);
                    thread::spawn(move || handle_client(stream, &reply, &stats));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            stats,
        },
    ))
}

/// Address nothing listens on.
pub(super) fn unreachable_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind probe failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("probe addr failed: {}", err))?;
    drop(listener);
    Ok(format!("http://{}/", addr))
}

fn handle_client(mut stream: TcpStream, reply: &Reply, stats: &ServerStats) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    if let Ok(mut requests) = stats.requests.lock() {
        requests.push(request);
    }

    let current = stats.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
    stats.peak.fetch_max(current, Ordering::SeqCst);
    thread::sleep(reply.delay);

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.body.len()
    );
    for (name, value) in &reply.headers {
        if write!(response, "{}: {}\r\n", name, value).is_err() {
            return;
        }
    }
    response.push_str("\r\n");
    let mut bytes = response.into_bytes();
    let sent = reply
        .truncate_at
        .and_then(|len| reply.body.get(..len))
        .unwrap_or(&reply.body);
    bytes.extend_from_slice(sent);

    let written = stream.write_all(&bytes).and_then(|()| stream.flush());
    stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    if written.is_ok() {
        drop(stream.shutdown(Shutdown::Both));
    }
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            break;
        }
        data.extend_from_slice(buffer.get(..read)?);
        if let Some(end) = header_end(&data) {
            let head = String::from_utf8_lossy(data.get(..end)?).into_owned();
            let wanted = end.saturating_add(content_length(&head));
            if data.len() >= wanted {
                break;
            }
        }
    }
    Some(String::from_utf8_lossy(&data).into_owned())
}

fn header_end(data: &[u8]) -> Option<usize> {
    data.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos.saturating_add(4))
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
