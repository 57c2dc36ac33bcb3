//! Remote access to the feeder backend.
//!
//! One call per endpoint, one round trip per call: no retries, no timeouts
//! beyond the HTTP client's defaults, and no caching between calls.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Pet, Rfid, Schedule, Silo, UnknownRfidEntry},
    error::{ApiException, ErrorCode},
    protocol::{Ack, EmptyBody, HealthStatus},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Result of a dismiss request. Dismissal never fails the caller; it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DismissOutcome {
    Dismissed,
    Rejected { status: u16 },
    Unreachable { reason: String },
}

impl DismissOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Dismissed)
    }
}

#[async_trait]
pub trait FeederGateway: Send + Sync {
    async fn list_silos(&self) -> GatewayResult<Vec<Silo>>;
    async fn list_pets(&self) -> GatewayResult<Vec<Pet>>;
    async fn list_unknown_tags(&self) -> GatewayResult<Vec<UnknownRfidEntry>>;
    async fn list_schedules(&self) -> GatewayResult<Vec<Schedule>>;
    async fn get_pet(&self, rfid: &Rfid) -> GatewayResult<Pet>;
    async fn submit_schedule(&self, schedule: &Schedule) -> GatewayResult<Ack>;
    async fn register_pet(&self, pet: &Pet) -> GatewayResult<Ack>;
    async fn dismiss_tag(&self, rfid: &Rfid) -> DismissOutcome;
    async fn health(&self) -> GatewayResult<HealthStatus>;
}

#[derive(Debug, Clone, Copy)]
enum RequestKind<'a> {
    Read,
    Lookup(&'a Rfid),
    Write,
}

pub struct HttpGateway {
    http: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> GatewayResult<Self> {
        let parsed = Url::parse(base_url).map_err(|err| GatewayError::Endpoint {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(GatewayError::Endpoint {
                url: base_url.to_string(),
                message: "url cannot carry a path".into(),
            });
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Endpoint {
                url: self.base_url.to_string(),
                message: "url cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(
        &self,
        operation: &'static str,
        kind: RequestKind<'_>,
        request: RequestBuilder,
    ) -> GatewayResult<Response> {
        let res = request
            .send()
            .await
            .map_err(|err| GatewayError::Transport {
                operation,
                status: None,
                message: err.to_string(),
            })?;

        let status = res.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "gateway request ok");
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let exception = ApiException::from_body(status.as_u16(), &body);
        warn!(
            operation,
            status = exception.status,
            "gateway request failed: {}",
            exception.message
        );

        Err(match (kind, exception.code) {
            (RequestKind::Lookup(rfid), ErrorCode::NotFound) => {
                GatewayError::NotFound { rfid: rfid.clone() }
            }
            (RequestKind::Write, ErrorCode::NotFound | ErrorCode::Validation) => {
                GatewayError::Validation {
                    operation,
                    status: exception.status,
                    message: exception.message,
                }
            }
            _ => GatewayError::Transport {
                operation,
                status: Some(exception.status),
                message: exception.message,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        res: Response,
    ) -> GatewayResult<T> {
        res.json::<T>().await.map_err(|err| GatewayError::Decode {
            operation,
            message: err.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        kind: RequestKind<'_>,
        segments: &[&str],
    ) -> GatewayResult<T> {
        let url = self.endpoint(segments)?;
        let res = self.execute(operation, kind, self.http.get(url)).await?;
        Self::decode(operation, res).await
    }

    async fn post_json<B, T>(
        &self,
        operation: &'static str,
        segments: &[&str],
        body: &B,
    ) -> GatewayResult<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let res = self
            .execute(operation, RequestKind::Write, self.http.post(url).json(body))
            .await?;
        Self::decode(operation, res).await
    }
}

#[async_trait]
impl FeederGateway for HttpGateway {
    async fn list_silos(&self) -> GatewayResult<Vec<Silo>> {
        self.get_json("list_silos", RequestKind::Read, &["silo", "list"])
            .await
    }

    async fn list_pets(&self) -> GatewayResult<Vec<Pet>> {
        self.get_json("list_pets", RequestKind::Read, &["pet", "list"])
            .await
    }

    async fn list_unknown_tags(&self) -> GatewayResult<Vec<UnknownRfidEntry>> {
        self.get_json(
            "list_unknown_tags",
            RequestKind::Read,
            &["dashboard", "unknown-rfids"],
        )
        .await
    }

    async fn list_schedules(&self) -> GatewayResult<Vec<Schedule>> {
        self.get_json("list_schedules", RequestKind::Read, &["schedule", "list"])
            .await
    }

    async fn get_pet(&self, rfid: &Rfid) -> GatewayResult<Pet> {
        self.get_json("get_pet", RequestKind::Lookup(rfid), &["pet", "get", rfid.as_str()])
            .await
    }

    async fn submit_schedule(&self, schedule: &Schedule) -> GatewayResult<Ack> {
        let ack: Ack = self
            .post_json("submit_schedule", &["schedule", "update"], schedule)
            .await?;
        info!(rfid = %schedule.rfid, "schedule submitted");
        Ok(ack)
    }

    async fn register_pet(&self, pet: &Pet) -> GatewayResult<Ack> {
        let ack: Ack = self
            .post_json("register_pet", &["dashboard", "register-pet"], pet)
            .await?;
        info!(rfid = %pet.rfid, name = %pet.name, "pet registered");
        Ok(ack)
    }

    async fn dismiss_tag(&self, rfid: &Rfid) -> DismissOutcome {
        let url = match self.endpoint(&["dashboard", "unknown-rfids", "dismiss", rfid.as_str()]) {
            Ok(url) => url,
            Err(err) => {
                return DismissOutcome::Unreachable {
                    reason: err.to_string(),
                }
            }
        };

        // Response body is ignored; only the status decides.
        match self.http.post(url).json(&EmptyBody {}).send().await {
            Ok(res) if res.status().is_success() => {
                info!(%rfid, "unknown rfid dismissed");
                DismissOutcome::Dismissed
            }
            Ok(res) => {
                let status = res.status().as_u16();
                warn!(%rfid, status, "dismiss rejected by backend");
                DismissOutcome::Rejected { status }
            }
            Err(err) => {
                warn!(%rfid, "dismiss request failed: {err}");
                DismissOutcome::Unreachable {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn health(&self) -> GatewayResult<HealthStatus> {
        self.get_json("health", RequestKind::Read, &["backend", "health"])
            .await
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
