//! One-shot loopback stand-in for the monit HTTP interface

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use monitview_core::ConnectionParams;
use secrecy::SecretString;

/// Status body used by the end-to-end tests
pub const SCENARIO_BODY: &str = "<MONIT><SERVER><UPTIME>3661</UPTIME></SERVER>\
    <SERVICE><NAME>sshd</NAME><MONITOR>1</MONITOR><STATUS>0</STATUS></SERVICE>\
    <SERVICE><NAME>httpd</NAME><MONITOR>1</MONITOR><STATUS>32</STATUS></SERVICE></MONIT>";

/// What the daemon sends back after reading the request
pub struct Reply {
    /// Bytes written immediately
    pub head: Vec<u8>,
    /// Pause before closing the connection
    pub stall: Option<Duration>,
}

impl Reply {
    /// `200 OK` with the given body, then close
    pub fn ok(body: &str) -> Self {
        Self::raw(format!(
            "HTTP/1.0 200 OK\r\nServer: monit 5.33.0\r\nContent-Type: text/xml\r\n\r\n{body}"
        ))
    }

    /// Arbitrary bytes, then close
    pub fn raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            head: bytes.into(),
            stall: None,
        }
    }

    /// Keeps the connection open for `pause` after writing
    pub fn stalled(mut self, pause: Duration) -> Self {
        self.stall = Some(pause);
        self
    }
}

/// A bound listener serving exactly one connection
pub struct FakeDaemon {
    /// Port the daemon listens on
    pub port: u16,
    handle: JoinHandle<String>,
}

impl FakeDaemon {
    /// Binds to an ephemeral loopback port and serves `reply` once
    pub fn serve(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(&stream);
            let mut request = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                request.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }

            let mut writer = &stream;
            writer.write_all(&reply.head).unwrap();
            writer.flush().unwrap();
            if let Some(pause) = reply.stall {
                thread::sleep(pause);
            }
            request
        });

        Self { port, handle }
    }

    /// Parameters pointing at this daemon
    pub fn params(&self) -> ConnectionParams {
        ConnectionParams::new("127.0.0.1", self.port)
            .unwrap()
            .with_credentials("admin", SecretString::from("monit".to_string()))
            .with_timeout(Duration::from_secs(2))
            .unwrap()
    }

    /// Waits for the connection to finish and returns the request text
    pub fn request(self) -> String {
        self.handle.join().unwrap()
    }
}

/// A port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
