use std::{fmt, str::FromStr, sync::Arc};

use ai_ox_common::{BoxStream, CommonRequestError, Endpoint, RequestBuilder, RequestConfig};
use async_stream::try_stream;
use futures_util::{StreamExt, TryStreamExt, future};
use strum::{Display, EnumString};

use crate::{
    CodexError,
    host::ProviderHost,
    message::Message,
    options::{CompletionOptions, RawOptions, merge_options},
    prompt::compile_prompt,
    request::CompletionRequest,
    response::{CompletionResponse, ImageChunk, OutputChunk},
};

/// Client identifier sent as `User-Agent`
pub const USER_AGENT: &str = "VimAI";

/// The kind of operation a provider instance is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CommandType {
    Chat,
    Complete,
    Edit,
    Image,
}

impl CommandType {
    /// Whether the completions endpoint can serve this command
    pub fn is_completion(self) -> bool {
        matches!(self, Self::Complete | Self::Edit)
    }
}

/// Provider that drives the legacy OpenAI completions endpoint with a
/// chat-style message sequence.
#[derive(Clone)]
pub struct OpenAICodex {
    command_type: CommandType,
    options: CompletionOptions,
    host: Arc<dyn ProviderHost>,
    client: reqwest::Client,
}

impl fmt::Debug for OpenAICodex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAICodex")
            .field("command_type", &self.command_type)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl OpenAICodex {
    /// Create a provider for `command_type`, merging `raw_options` over the
    /// host's defaults for that command.
    ///
    /// # Errors
    ///
    /// [`CodexError::Capability`] for any command other than `complete` and
    /// `edit`, a configuration error if an option does not normalize, or
    /// [`CodexError::Transport`] if the HTTP client cannot be built.
    /// No network access happens here.
    pub fn new(
        command_type: &str,
        raw_options: RawOptions,
        host: Arc<dyn ProviderHost>,
    ) -> Result<Self, CodexError> {
        let command_type = CommandType::from_str(command_type)
            .ok()
            .filter(|command| command.is_completion())
            .ok_or_else(|| {
                CodexError::Capability(format!(
                    "OpenAI Codex provider supports only complete and edit commands, got '{command_type}'"
                ))
            })?;

        let merged = merge_options(host.default_options(command_type), raw_options);
        let options = CompletionOptions::from_raw(merged)?;

        // `request_timeout` bounds each socket read, not the whole stream.
        let timeout = options.timeout();
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(CommonRequestError::from)?;

        Ok(Self {
            command_type,
            options,
            host,
            client,
        })
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    /// Complete `messages`, yielding assistant text as it arrives.
    ///
    /// Nothing is sent until the stream is first polled. Dropping the stream
    /// closes the connection. The first error ends the stream.
    pub fn request(&self, messages: &[Message]) -> BoxStream<'static, Result<OutputChunk, CodexError>> {
        let request = CompletionRequest::from_options(&self.options, compile_prompt(messages));
        self.host.print_debug(format_args!(
            "openai-codex: [{}] request: {}",
            self.command_type,
            serde_json::to_string(&request).unwrap_or_default()
        ));

        let host = Arc::clone(&self.host);
        let command_type = self.command_type;

        self.completion_events(request)
            .try_filter_map(move |event| {
                host.print_debug(format_args!(
                    "openai-codex: [{command_type}] response: {}",
                    serde_json::to_string(&event).unwrap_or_default()
                ));
                future::ready(Ok(event.to_chunk()))
            })
            .boxed()
    }

    /// Image generation is not available on the completions endpoint.
    ///
    /// # Errors
    ///
    /// Always [`CodexError::Capability`].
    pub fn request_image(&self, _prompt: &str) -> Result<Vec<ImageChunk>, CodexError> {
        Err(CodexError::Capability(
            "OpenAI Codex provider does not support image generation".to_string(),
        ))
    }

    /// POST `request` and decode the response: one event for a plain JSON
    /// body, one per `data: ` line for a streamed one.
    pub fn completion_events(
        &self,
        request: CompletionRequest,
    ) -> BoxStream<'static, Result<CompletionResponse, CodexError>> {
        let host = Arc::clone(&self.host);
        let options = self.options.clone();
        let client = self.client.clone();

        Box::pin(try_stream! {
            let mut config = RequestConfig::new(options.endpoint_url.clone()).with_user_agent(USER_AGENT);
            if !request.is_stream() {
                config = config.with_timeout(options.timeout());
            }
            let config = options.auth_type.apply(config, &*host, &options)?;

            let request_builder = RequestBuilder::new(client, config);
            let endpoint = Endpoint::new("");

            if request.is_stream() {
                let mut events = request_builder.stream::<CompletionResponse, _>(&endpoint, &request);
                while let Some(event) = events.next().await {
                    yield event?;
                }
            } else {
                let event: CompletionResponse = request_builder.request_json(&endpoint, &request).await?;
                yield event;
            }
        })
    }
}
