// src/roster_client.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::punch_records::Employee;

pub const DEFAULT_ROSTER_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const DEFAULT_ROSTER_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

// --- Error Type ---

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Roster payload is not a list of employees: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Roster API error: Status={status}, Message='{message}'")]
    ApiError { status: StatusCode, message: String },
    #[error("Roster unavailable after {attempts} attempts; last error: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Anything that can supply the day's employee roster.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, RosterError>;
}

#[derive(Clone, Debug)]
pub struct RosterClientConfig {
    pub url: String,
    pub attempts: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for RosterClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ROSTER_URL.to_string(),
            attempts: DEFAULT_ROSTER_ATTEMPTS,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// HTTP roster client. Retries every failure with a fixed delay between
/// attempts.
#[derive(Clone)]
pub struct RosterClient {
    config: RosterClientConfig,
    http_client: Client,
}

impl RosterClient {
    pub fn new(config: RosterClientConfig) -> Result<Self, RosterError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()?; // Maps to RosterError::Request
        Ok(Self {
            config,
            http_client,
        })
    }

    async fn fetch_once(&self) -> Result<Vec<Employee>, RosterError> {
        let response = self.http_client.get(&self.config.url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RosterError::ApiError {
                status,
                message: body,
            });
        }

        Ok(serde_json::from_str::<Vec<Employee>>(&body)?)
    }
}

#[async_trait]
impl RosterSource for RosterClient {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, RosterError> {
        let attempts = self.config.attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            info!(
                "Connecting to roster API: {} (attempt {}/{})",
                self.config.url, attempt, attempts
            );
            match self.fetch_once().await {
                Ok(employees) => {
                    info!("Roster received: {} employees found.", employees.len());
                    return Ok(employees);
                }
                Err(e) => {
                    warn!("Roster attempt {} failed: {}", attempt, e);
                    last_error = e.to_string();
                    if attempt < attempts {
                        debug!("Retrying roster fetch in {:?}", self.config.retry_delay);
                        sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        error!("Could not reach the roster API after {} attempts.", attempts);
        Err(RosterError::Exhausted {
            attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod roster_client_tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    // Serves the given (status line, body) pairs, one connection each.
    fn serve(responses: Vec<(&'static str, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for (status_line, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                // Drain request headers.
                loop {
                    line.clear();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        });
        format!("http://{}/users", addr)
    }

    fn client_for(url: String, attempts: u32) -> RosterClient {
        RosterClient::new(RosterClientConfig {
            url,
            attempts,
            retry_delay: Duration::from_millis(10),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_roster_and_ignores_extra_fields() {
        let url = serve(vec![(
            "200 OK",
            r#"[{"id": 1, "name": "Ana", "email": "ana@example.com"}, {"id": 2, "name": "Luis"}]"#,
        )]);
        let employees = client_for(url, 1).fetch_employees().await.unwrap();

        assert_eq!(employees, vec![Employee::new(1, "Ana"), Employee::new(2, "Luis")]);
    }

    #[tokio::test]
    async fn retries_after_server_error() {
        let url = serve(vec![
            ("500 Internal Server Error", r#"{"error": "boom"}"#),
            ("200 OK", r#"[{"id": 5, "name": "Elena"}]"#),
        ]);
        let employees = client_for(url, 3).fetch_employees().await.unwrap();

        assert_eq!(employees, vec![Employee::new(5, "Elena")]);
    }

    #[tokio::test]
    async fn gives_up_after_configured_attempts() {
        let url = serve(vec![
            ("503 Service Unavailable", "down"),
            ("503 Service Unavailable", "still down"),
        ]);
        let err = client_for(url, 2).fetch_employees().await.unwrap_err();

        match err {
            RosterError::Exhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 2);
                assert!(last_error.contains("still down"), "{}", last_error);
            }
            other => panic!("Wrong error type returned: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let url = serve(vec![("200 OK", r#"{"users": []}"#)]);
        let err = client_for(url, 1).fetch_employees().await.unwrap_err();

        match err {
            RosterError::Exhausted { last_error, .. } => {
                assert!(last_error.contains("not a list of employees"), "{}", last_error)
            }
            other => panic!("Wrong error type returned: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = client_for(format!("http://127.0.0.1:{}/users", port), 2)
            .fetch_employees()
            .await
            .unwrap_err();

        assert!(matches!(err, RosterError::Exhausted { attempts: 2, .. }));
    }
}
