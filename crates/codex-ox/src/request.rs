use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::{CompletionOptions, is_set};

/// Request body for the legacy completions endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct CompletionRequest {
    /// The compiled prompt
    #[builder(into)]
    pub prompt: String,

    /// The model to use for completion
    #[builder(into)]
    pub model: String,

    /// Text that comes after the completion (insert mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub suffix: Option<String>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Top-p sampling parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Number of completions to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<i64>,

    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// Number of log probabilities to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<i64>,

    /// Stop sequence(s), passed through as configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Value>,

    /// Presence penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    /// Frequency penalty (-2.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    /// Server-side candidates to pick the best one from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_of: Option<i64>,

    /// Token id to bias map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<Value>,
}

impl CompletionRequest {
    /// Assemble the payload from normalized options.
    ///
    /// Unset values are left out. `max_tokens`, `logprobs`, `best_of` and `n`
    /// use `0` for "unset" as well; every other numeric field sends `0` as is.
    pub fn from_options(options: &CompletionOptions, prompt: impl Into<String>) -> Self {
        Self::builder()
            .prompt(prompt)
            .model(options.model.clone())
            .maybe_suffix(options.suffix.clone().filter(|suffix| !suffix.is_empty()))
            .maybe_max_tokens(nonzero(options.max_tokens))
            .maybe_temperature(options.temperature)
            .maybe_top_p(options.top_p)
            .maybe_n(nonzero(options.n))
            .maybe_stream(options.stream)
            .maybe_logprobs(nonzero(options.logprobs))
            .maybe_stop(options.stop.clone().filter(is_set))
            .maybe_presence_penalty(options.presence_penalty)
            .maybe_frequency_penalty(options.frequency_penalty)
            .maybe_best_of(nonzero(options.best_of))
            .maybe_logit_bias(options.logit_bias.clone().filter(is_set))
            .build()
    }

    /// Whether the response arrives as a `data: ` event stream
    pub fn is_stream(&self) -> bool {
        self.stream == Some(true)
    }
}

fn nonzero(count: Option<i64>) -> Option<i64> {
    count.filter(|&n| n != 0)
}
