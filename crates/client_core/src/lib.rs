use assistant::{validate_remote_reply, AssistantError, CommandInterpreter};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{ColorCluster, Correction, DesignAnalysisSnapshot, DesignId, InventoryAvailability},
    error::{ApiError, ApiException, ErrorCode},
    protocol::{
        ApplyCorrectionRequest, ApplyCorrectionResponse, CommitDesignRequest, CreateDesignRequest,
        DesignResponse, InterpretRequest, InventoryResponse, ParseCommandRequest,
        ParseCommandResponse, ProjectDesignRequest, UpsertInventoryRequest,
    },
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {error}")]
    Api {
        status: u16,
        error: ApiException,
    },
}

impl ClientError {
    pub fn api_error(&self) -> Option<&ApiException> {
        match self {
            ClientError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Command interpreter backed by an external text-understanding service.
///
/// Replies are untrusted and go through the same shape checks as any other
/// remote correction before reaching the applicator.
#[derive(Debug, Clone)]
pub struct RemoteInterpreter {
    http: Client,
    endpoint: Url,
}

impl RemoteInterpreter {
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        Ok(Self::with_client(Client::new(), Url::parse(endpoint)?))
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_reply(&self, command: &str, current: &[ColorCluster]) -> anyhow::Result<Value> {
        let reply = self
            .http
            .post(self.endpoint.clone())
            .json(&InterpretRequest {
                command: command.to_string(),
                current_clusters: current.to_vec(),
            })
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(reply)
    }
}

#[async_trait]
impl CommandInterpreter for RemoteInterpreter {
    async fn interpret(
        &self,
        command: &str,
        current: &[ColorCluster],
    ) -> Result<Correction, AssistantError> {
        let reply = self.fetch_reply(command, current).await.map_err(|source| {
            warn!(endpoint = %self.endpoint, error = %source, "remote interpreter call failed");
            AssistantError::InterpreterUnavailable { source }
        })?;
        debug!(%command, "remote interpreter replied");
        validate_remote_reply(&reply)
    }
}

/// HTTP client for the design server routes.
#[derive(Debug, Clone)]
pub struct DesignClient {
    http: Client,
    base: Url,
}

impl DesignClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(server_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let url = self.url("healthz")?;
        let res = self.http.get(url).send().await?;
        check(res).await.map(|_| ())
    }

    pub async fn parse_command(&self, text: &str) -> Result<Correction, ClientError> {
        let body: ParseCommandResponse = self
            .post_json(
                "commands/parse",
                &ParseCommandRequest {
                    text: text.to_string(),
                },
            )
            .await?;
        Ok(body.correction)
    }

    pub async fn apply_correction(
        &self,
        correction: &Correction,
        clusters: &[ColorCluster],
    ) -> Result<ApplyCorrectionResponse, ClientError> {
        self.post_json(
            "corrections/apply",
            &ApplyCorrectionRequest {
                correction: correction.clone(),
                clusters: clusters.to_vec(),
            },
        )
        .await
    }

    pub async fn project_design(
        &self,
        total_clusters: u32,
        colors: &[String],
    ) -> Result<DesignAnalysisSnapshot, ClientError> {
        self.post_json(
            "designs/project",
            &ProjectDesignRequest {
                total_clusters,
                colors: colors.to_vec(),
            },
        )
        .await
    }

    pub async fn create_design(
        &self,
        total_clusters: u32,
        colors: &[String],
    ) -> Result<DesignResponse, ClientError> {
        self.post_json(
            "designs",
            &CreateDesignRequest {
                total_clusters,
                colors: colors.to_vec(),
            },
        )
        .await
    }

    pub async fn get_design(&self, design_id: DesignId) -> Result<DesignResponse, ClientError> {
        let url = self.url(&format!("designs/{}", design_id.0))?;
        let res = self.http.get(url).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn commit_design(
        &self,
        design_id: DesignId,
        clusters: Vec<ColorCluster>,
    ) -> Result<DesignResponse, ClientError> {
        let url = self.url(&format!("designs/{}", design_id.0))?;
        let res = self
            .http
            .put(url)
            .json(&CommitDesignRequest { clusters })
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn check_inventory(&self, color: &str) -> Result<InventoryAvailability, ClientError> {
        let mut url = self.url("inventory")?;
        url.query_pairs_mut().append_pair("color", color);
        let res = self.http.get(url).send().await?;
        let body: InventoryResponse = check(res).await?.json().await?;
        Ok(body.availability)
    }

    pub async fn upsert_inventory(&self, req: &UpsertInventoryRequest) -> Result<(), ClientError> {
        let url = self.url("inventory")?;
        let res = self.http.put(url).json(req).send().await?;
        check(res).await.map(|_| ())
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let res = self.http.post(url).json(body).send().await?;
        Ok(check(res).await?.json().await?)
    }
}

async fn check(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let bytes = res.bytes().await?;
    let error = serde_json::from_slice::<ApiError>(&bytes)
        .map(ApiException::from)
        .unwrap_or_else(|_| {
            ApiException::new(ErrorCode::Internal, String::from_utf8_lossy(&bytes))
        });
    Err(ClientError::Api {
        status: status.as_u16(),
        error,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
