use ai_ox_common::{AuthMethod, RequestConfig};
use strum::EnumString;

use crate::{CodexError, host::ProviderHost, options::CompletionOptions};

/// Environment variable consulted by the credential capability
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Header carrying the optional organization id in bearer mode
pub const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

/// Header carrying the key in `api-key` mode
pub const API_KEY_HEADER: &str = "api-key";

/// How the provider authenticates against the endpoint, from `auth_type`
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum AuthMode {
    /// `Authorization: Bearer <key>`, plus the organization header if one is configured
    #[strum(serialize = "bearer")]
    Bearer,
    /// `api-key: <key>`
    #[strum(serialize = "api-key")]
    ApiKey,
    /// Anything else: no authentication header is sent
    #[strum(default)]
    Other(String),
}

impl AuthMode {
    pub fn parse(mode: &str) -> Self {
        mode.parse()
            .unwrap_or_else(|_| Self::Other(mode.to_string()))
    }

    /// Add this mode's headers to `config`, loading the credential through
    /// `host` when the mode needs one.
    pub(crate) fn apply(
        &self,
        config: RequestConfig,
        host: &dyn ProviderHost,
        options: &CompletionOptions,
    ) -> Result<RequestConfig, CodexError> {
        match self {
            Self::Bearer => {
                let credential = ApiCredential::load(host, options)?;
                let config = config.with_auth(AuthMethod::Bearer(credential.api_key));
                Ok(match credential.organization {
                    Some(org) => config.with_header(ORGANIZATION_HEADER, org),
                    None => config,
                })
            }
            Self::ApiKey => {
                let credential = ApiCredential::load(host, options)?;
                Ok(config.with_auth(AuthMethod::ApiKey {
                    header_name: API_KEY_HEADER.to_string(),
                    key: credential.api_key,
                }))
            }
            Self::Other(mode) => {
                log::debug!("auth_type {mode:?} is not recognized, sending no auth header");
                Ok(config)
            }
        }
    }
}

/// Credential parsed from the raw `key[,organization]` string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredential {
    pub api_key: String,
    pub organization: Option<String>,
}

impl ApiCredential {
    pub fn parse(raw: &str) -> Self {
        let mut segments = raw.trim().split(',');
        let api_key = segments.next().unwrap_or_default().trim().to_string();
        let organization = segments
            .next()
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .map(ToString::to_string);

        Self {
            api_key,
            organization,
        }
    }

    fn load(host: &dyn ProviderHost, options: &CompletionOptions) -> Result<Self, CodexError> {
        let raw = host.load_api_key(API_KEY_ENV, &options.token_file_path, &options.token_load_fn)?;
        Ok(Self::parse(&raw))
    }
}
