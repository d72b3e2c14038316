/*
 * notify/push.rs
 *
 * POST the notification as plain text to one URL. ntfy.sh, a self-hosted
 * gotify bridge, a webhook relay - anything that takes a text body.
 *
 * Hard 5s timeout. A slow push server must not hold the shell prompt hostage.
 */

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use super::Notification;

/// Give up on the push after this long.
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum PushError {
    #[error("creating HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("posting to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("push to {url} returned {status}")]
    Status { url: String, status: StatusCode },
}

/// One push endpoint.
#[derive(Debug, Clone)]
pub struct PushClient {
    url: String,
    timeout: Duration,
}

impl PushClient {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: PUSH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `<title> — <body>\n<subtitle>`
    #[must_use]
    pub fn payload(notification: &Notification) -> String {
        format!(
            "{} — {}\n{}",
            notification.title, notification.body, notification.subtitle
        )
    }

    /// POST the payload. Anything but a 2xx/1xx final status is an error.
    /// An empty URL means push is off and always succeeds.
    pub fn send(&self, notification: &Notification) -> Result<(), PushError> {
        if self.url.is_empty() {
            return Ok(());
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(PushError::Client)?;

        let response = client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(Self::payload(notification))
            .send()
            .map_err(|source| PushError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(PushError::Status {
                url: self.url.clone(),
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /* one-shot HTTP server: returns the raw request it saw */
    fn serve_once(status_line: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/topic", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            let mut stream = stream;
            write!(stream, "{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").unwrap();
            head + &String::from_utf8(body).unwrap()
        });
        (url, handle)
    }

    #[test]
    fn test_payload_format() {
        let n = Notification::new("Task finished", "succeeded in 15s", "sleep 15");
        assert_eq!(
            PushClient::payload(&n),
            "Task finished — succeeded in 15s\nsleep 15"
        );
    }

    #[test]
    fn test_empty_url_is_noop() {
        let client = PushClient::new("");
        assert!(client.send(&Notification::new("t", "b", "s")).is_ok());
    }

    #[test]
    fn test_posts_plain_text() {
        let (url, server) = serve_once("HTTP/1.1 200 OK");
        let n = Notification::new("Task finished", "failed (exit 1) in 2s", "false");
        PushClient::new(url).send(&n).unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /topic HTTP/1.1\r\n"), "{request}");
        assert!(
            request.to_ascii_lowercase().contains("content-type: text/plain\r\n"),
            "{request}"
        );
        assert!(request.ends_with("\r\n\r\nTask finished — failed (exit 1) in 2s\nfalse"));
    }

    #[test]
    fn test_error_status_is_failure() {
        let (url, server) = serve_once("HTTP/1.1 500 Internal Server Error");
        let err = PushClient::new(url.clone())
            .send(&Notification::new("t", "b", "s"))
            .unwrap_err();
        server.join().unwrap();

        match &err {
            PushError::Status { status, .. } => assert_eq!(status.as_u16(), 500),
            other => panic!("expected Status, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            format!("push to {url} returned 500 Internal Server Error")
        );
    }

    #[test]
    fn test_unreachable_is_failure() {
        /* bind then drop: nothing listens on that port anymore */
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}/");
        let err = PushClient::new(url.clone())
            .with_timeout(Duration::from_secs(1))
            .send(&Notification::new("t", "b", "s"))
            .unwrap_err();
        assert!(matches!(err, PushError::Request { .. }));
        assert!(err.to_string().starts_with(&format!("posting to {url}: ")));
    }

    #[test]
    fn test_timeout_is_bounded() {
        /* accepts, never answers */
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let _server = thread::spawn(move || {
            let conn = listener.accept();
            thread::sleep(Duration::from_secs(3));
            drop(conn);
        });

        let start = std::time::Instant::now();
        let err = PushClient::new(url)
            .with_timeout(Duration::from_millis(300))
            .send(&Notification::new("t", "b", "s"))
            .unwrap_err();
        assert!(matches!(err, PushError::Request { .. }));
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
