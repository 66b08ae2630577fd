use crate::adapters::http::TraktClient;
use crate::core::{ConfigProvider, TokenStore};
use crate::domain::model::{Credential, DeviceCode, PollOutcome};
use crate::utils::error::{Result, SyncError};
use reqwest::StatusCode;
use std::time::Duration;

enum AuthState {
    Start,
    Unvalidated(Credential),
    NeedsAuth,
    Polling(DeviceCode),
    Valid(Credential),
    Failed(SyncError),
}

/// Loads, validates and, when needed, re-acquires the Trakt access token
/// through the device-code flow.
pub struct TokenManager<S: TokenStore> {
    store: S,
    client: TraktClient,
    max_polls: Option<u32>,
}

impl<S: TokenStore> TokenManager<S> {
    pub fn new(store: S, client: TraktClient) -> Self {
        Self {
            store,
            client,
            max_polls: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(store: S, client: TraktClient, config: &C) -> Self {
        Self {
            store,
            client,
            max_polls: config.max_polls(),
        }
    }

    /// Caps the number of token polls. Unbounded unless set.
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    pub async fn obtain_credential(&self) -> Result<Credential> {
        let mut state = AuthState::Start;

        loop {
            state = match state {
                AuthState::Start => match self.store.load().await? {
                    Some(credential) => AuthState::Unvalidated(credential),
                    None => {
                        tracing::info!("No stored access token. Requesting a new one...");
                        AuthState::NeedsAuth
                    }
                },
                AuthState::Unvalidated(credential) => {
                    let status = self.client.probe_identity(&credential).await?;
                    if status == StatusCode::OK {
                        tracing::debug!("Stored access token is valid");
                        AuthState::Valid(credential.mark_valid())
                    } else {
                        let rejected = credential.mark_invalid();
                        tracing::info!(
                            "Access token is invalid or expired (status {}). Requesting a new one...",
                            status
                        );
                        tracing::debug!("Discarding {:?}", rejected);
                        AuthState::NeedsAuth
                    }
                }
                AuthState::NeedsAuth => {
                    let code = self.client.request_device_code().await?;
                    tracing::info!(
                        "Please go to {} and enter the code: {}",
                        code.verification_url,
                        code.user_code
                    );
                    AuthState::Polling(code)
                }
                AuthState::Polling(code) => match self.poll_for_token(&code).await {
                    Ok(credential) => {
                        self.store.save(&credential).await?;
                        AuthState::Valid(credential)
                    }
                    Err(e) => AuthState::Failed(e),
                },
                AuthState::Valid(credential) => return Ok(credential),
                AuthState::Failed(e) => {
                    tracing::error!("Failed to obtain access token: {}", e);
                    return Err(e);
                }
            };
        }
    }

    async fn poll_for_token(&self, code: &DeviceCode) -> Result<Credential> {
        let interval = Duration::from_secs(code.interval);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match self.client.poll_device_token(&code.device_code).await? {
                PollOutcome::Granted(token) => {
                    tracing::info!("Authorization granted after {} polls", attempts);
                    return Ok(Credential::new(token).mark_valid());
                }
                PollOutcome::Pending => {
                    tracing::info!("Waiting for user to authorize the app...");
                }
                PollOutcome::Malformed(body) => {
                    tracing::error!("Failed to decode JSON from token response");
                    tracing::debug!("Response content: {}", body);
                }
                PollOutcome::Rejected {
                    status,
                    description,
                } => {
                    tracing::error!("Error: {} (status {})", description, status);
                    return Err(SyncError::AuthorizationFailed {
                        status,
                        description,
                    });
                }
            }

            if self.max_polls.is_some_and(|max| attempts >= max) {
                return Err(SyncError::PollLimitReached { attempts });
            }
            tokio::time::sleep(interval).await;
        }
    }
}
