use std::sync::Arc;
use std::time::Duration;

use console_core::{
    ConsoleError, DashboardSnapshot, DeletionTarget, LeaderboardPair, ListResult, PageRequest,
    Record, ResourcePayload, ResourceRequest, TargetKind,
};
use console_logging::{console_debug, console_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{CredentialProvider, EngineError};

/// Paths of the admin API, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub dashboard: String,
    pub users: String,
    pub jobs: String,
    pub top_workers: String,
    pub top_customers: String,
    /// Field named in the users filter pair.
    pub users_filter_field: String,
    /// Field named in the jobs filter pair.
    pub jobs_filter_field: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            dashboard: "/admin/dashboard".to_string(),
            users: "/admin/users".to_string(),
            jobs: "/admin/jobs".to_string(),
            top_workers: "/admin/leaderboard/workers".to_string(),
            top_customers: "/admin/leaderboard/customers".to_string(),
            users_filter_field: "name".to_string(),
            jobs_filter_field: "title".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub endpoints: Endpoints,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            endpoints: Endpoints::default(),
        }
    }
}

/// One request/response exchange per call; no retries.
#[async_trait::async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, resource: &ResourceRequest) -> Result<ResourcePayload, ConsoleError>;

    async fn delete(&self, target: &DeletionTarget, message: &str) -> Result<(), ConsoleError>;
}

pub struct ReqwestFetcher {
    settings: FetchSettings,
    base_url: Url,
    client: reqwest::Client,
    credential: Arc<dyn CredentialProvider>,
}

#[derive(Serialize)]
struct FilterPair<'a> {
    field: &'a str,
    value: &'a str,
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    total: Option<u64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    message: &'a str,
}

impl ReqwestFetcher {
    pub fn new(
        settings: FetchSettings,
        credential: Arc<dyn CredentialProvider>,
    ) -> Result<Self, EngineError> {
        let base_url = Url::parse(&settings.base_url).map_err(|err| EngineError::BaseUrl {
            url: settings.base_url.clone(),
            reason: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::BaseUrl {
                url: settings.base_url.clone(),
                reason: "cannot be a base".to_string(),
            });
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::HttpClient(err.to_string()))?;
        Ok(Self {
            settings,
            base_url,
            client,
            credential,
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}/{}", path.trim_start_matches('/')));
        url
    }

    fn list_url(&self, path: &str, filter_field: &str, request: &PageRequest) -> Url {
        let mut url = self.endpoint(path);
        url.query_pairs_mut()
            .append_pair("page", &request.page.to_string())
            .append_pair("perPage", &request.per_page.to_string())
            .append_pair("sortOption", &request.sort_key)
            .append_pair("filter", &filter_param(filter_field, &request.filter));
        url
    }

    fn record_url(&self, target: &DeletionTarget) -> Result<Url, ConsoleError> {
        let path = match target.kind {
            TargetKind::User => &self.settings.endpoints.users,
            TargetKind::Job => &self.settings.endpoints.jobs,
        };
        let mut url = self.endpoint(path);
        url.path_segments_mut()
            .map_err(|()| ConsoleError::network(format!("cannot address {}", target.id)))?
            .pop_if_empty()
            .push(target.id.as_str());
        Ok(url)
    }

    fn bearer(&self) -> Result<String, ConsoleError> {
        self.credential
            .bearer()
            .ok_or_else(|| ConsoleError::network("no bearer credential available"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ConsoleError> {
        let token = self.bearer()?;
        console_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let (status, body) = read_success(response).await?;
        serde_json::from_slice(&body).map_err(|err| {
            ConsoleError::server(status.as_u16(), format!("undecodable response: {err}"))
        })
    }

    async fn get_list(&self, url: Url) -> Result<ListResult, ConsoleError> {
        let envelope: ListEnvelope = self.get_json(url).await?;
        let received = envelope.items.len();
        let items: Vec<Record> = envelope
            .items
            .into_iter()
            .filter_map(Record::from_value)
            .collect();
        if items.len() < received {
            console_warn!(
                "dropped {} list items without an identifier",
                received - items.len()
            );
        }
        Ok(ListResult::new(items, envelope.total))
    }
}

#[async_trait::async_trait]
impl ResourceFetcher for ReqwestFetcher {
    async fn fetch(&self, resource: &ResourceRequest) -> Result<ResourcePayload, ConsoleError> {
        let endpoints = &self.settings.endpoints;
        match resource {
            ResourceRequest::Dashboard => {
                let snapshot: DashboardSnapshot =
                    self.get_json(self.endpoint(&endpoints.dashboard)).await?;
                Ok(ResourcePayload::Dashboard(snapshot))
            }
            ResourceRequest::Users(request) => {
                let url = self.list_url(&endpoints.users, &endpoints.users_filter_field, request);
                Ok(ResourcePayload::List(self.get_list(url).await?))
            }
            ResourceRequest::Jobs(request) => {
                let url = self.list_url(&endpoints.jobs, &endpoints.jobs_filter_field, request);
                Ok(ResourcePayload::List(self.get_list(url).await?))
            }
            ResourceRequest::Leaderboards => {
                let (workers, customers) = futures_util::future::try_join(
                    self.get_list(self.endpoint(&endpoints.top_workers)),
                    self.get_list(self.endpoint(&endpoints.top_customers)),
                )
                .await?;
                Ok(ResourcePayload::Leaderboards(LeaderboardPair {
                    top_workers: workers.items,
                    top_customers: customers.items,
                }))
            }
        }
    }

    async fn delete(&self, target: &DeletionTarget, message: &str) -> Result<(), ConsoleError> {
        let token = self.bearer()?;
        let url = self.record_url(target)?;
        let body = serde_json::to_vec(&DeleteBody { message })
            .map_err(|err| ConsoleError::network(err.to_string()))?;
        console_debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_success(response).await.map(|_| ())
    }
}

/// Serialised filter: `[]` when empty, otherwise a single `{field, value}` pair.
pub fn filter_param(field: &str, filter: &str) -> String {
    let filter = filter.trim();
    let pairs = if filter.is_empty() {
        Vec::new()
    } else {
        vec![FilterPair {
            field,
            value: filter,
        }]
    };
    serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".to_string())
}

async fn read_success(response: reqwest::Response) -> Result<(StatusCode, Vec<u8>), ConsoleError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if status.is_success() {
        return Ok((status, body.to_vec()));
    }
    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_default();
    Err(ConsoleError::server(status.as_u16(), message))
}

fn map_reqwest_error(err: reqwest::Error) -> ConsoleError {
    if err.is_timeout() {
        return ConsoleError::network(format!("timeout: {err}"));
    }
    ConsoleError::network(err.to_string())
}
