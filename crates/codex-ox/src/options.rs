//! Normalization of loosely typed provider options.
//!
//! Hosts hand over options as a JSON object whose values may be strings (as
//! read from an editor configuration) or already typed. [`CompletionOptions`]
//! is the only place where those values are coerced.

use std::time::Duration;

use serde_json::{Map, Value, json};

use crate::{CodexError, auth::AuthMode};

/// Raw option mapping as supplied by the host
pub type RawOptions = Map<String, Value>;

/// Timeout used when `request_timeout` is absent, empty or zero
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Built-in defaults for the `complete` and `edit` commands
pub fn builtin_defaults() -> RawOptions {
    let defaults = json!({
        "model": "code-davinci-002",
        "endpoint_url": "https://api.openai.com/v1/completions",
        "suffix": "",
        "max_tokens": 256,
        "temperature": 0.2,
        "top_p": "",
        "n": 1,
        "stream": 1,
        "logprobs": 0,
        "stop": "",
        "presence_penalty": 0,
        "frequency_penalty": 0,
        "best_of": 1,
        "logit_bias": "",
        "request_timeout": 20,
        "auth_type": "bearer",
        "token_file_path": "",
        "token_load_fn": "",
    });

    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Overlay `raw` on top of `defaults`, key by key
pub fn merge_options(mut defaults: RawOptions, raw: RawOptions) -> RawOptions {
    defaults.extend(raw);
    defaults
}

/// Typed provider options.
///
/// Tuning fields are `None` when the raw value was absent, `null` or `""`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub endpoint_url: String,
    pub auth_type: AuthMode,
    pub token_file_path: String,
    pub token_load_fn: String,
    /// Seconds
    pub request_timeout: Option<f64>,
    pub suffix: Option<String>,
    pub max_tokens: Option<i64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub n: Option<i64>,
    pub stream: Option<bool>,
    pub logprobs: Option<i64>,
    pub stop: Option<Value>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub best_of: Option<i64>,
    pub logit_bias: Option<Value>,
    /// Keys this provider does not recognize, untouched
    pub extra: RawOptions,
}

impl CompletionOptions {
    /// Coerce every recognized key to its declared type.
    ///
    /// # Errors
    ///
    /// [`CodexError::InvalidOption`] naming the first key whose value does not
    /// coerce, or [`CodexError::MissingOption`] when `model` or
    /// `endpoint_url` is absent.
    pub fn from_raw(mut raw: RawOptions) -> Result<Self, CodexError> {
        let request_timeout = coerce::<f64>(&mut raw, "request_timeout")?;
        if let Some(timeout) = request_timeout {
            if !timeout.is_finite() || timeout < 0.0 {
                return Err(CodexError::InvalidOption {
                    key: "request_timeout".to_string(),
                    value: timeout.to_string(),
                    reason: "expected a non-negative number of seconds".to_string(),
                });
            }
        }

        let temperature = coerce(&mut raw, "temperature")?;
        let max_tokens = coerce(&mut raw, "max_tokens")?;
        let top_p = coerce(&mut raw, "top_p")?;
        let presence_penalty = coerce(&mut raw, "presence_penalty")?;
        let frequency_penalty = coerce(&mut raw, "frequency_penalty")?;
        let best_of = coerce(&mut raw, "best_of")?;
        let n = coerce(&mut raw, "n")?;
        let stream = coerce(&mut raw, "stream")?;
        let logprobs = coerce(&mut raw, "logprobs")?;
        let suffix = coerce(&mut raw, "suffix")?;
        let stop = coerce::<Value>(&mut raw, "stop")?.filter(is_set);
        let logit_bias = coerce::<Value>(&mut raw, "logit_bias")?.filter(is_set);

        let model = required_string(&mut raw, "model")?;
        let endpoint_url = required_string(&mut raw, "endpoint_url")?;
        let auth_type = coerce::<String>(&mut raw, "auth_type")?
            .map_or(AuthMode::Bearer, |mode| AuthMode::parse(&mode));
        let token_file_path = coerce::<String>(&mut raw, "token_file_path")?.unwrap_or_default();
        let token_load_fn = coerce::<String>(&mut raw, "token_load_fn")?.unwrap_or_default();

        Ok(Self {
            model,
            endpoint_url,
            auth_type,
            token_file_path,
            token_load_fn,
            request_timeout,
            suffix,
            max_tokens,
            temperature,
            top_p,
            n,
            stream,
            logprobs,
            stop,
            presence_penalty,
            frequency_penalty,
            best_of,
            logit_bias,
            extra: raw,
        })
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.request_timeout
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Conversion rules for a single option type: one for string input, one
/// for input that already carries a JSON type. Typed input is accepted when
/// it converts without loss.
trait Coerce: Sized {
    fn from_text(text: &str) -> Result<Self, String>;
    fn from_json(value: &Value) -> Result<Self, String>;
}

impl Coerce for f64 {
    fn from_text(text: &str) -> Result<Self, String> {
        text.trim().parse().map_err(|e| format!("{e}"))
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        value.as_f64().ok_or_else(|| "expected a number".to_string())
    }
}

impl Coerce for i64 {
    fn from_text(text: &str) -> Result<Self, String> {
        text.trim().parse().map_err(|e| format!("{e}"))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_json(value: &Value) -> Result<Self, String> {
        value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|n| n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0)
                    .map(|n| n as i64)
            })
            .ok_or_else(|| "expected an integer".to_string())
    }
}

/// Booleans are written as integers: any nonzero value is `true`.
impl Coerce for bool {
    fn from_text(text: &str) -> Result<Self, String> {
        i64::from_text(text).map(|n| n != 0)
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(flag) => Ok(*flag),
            Value::Number(n) => n
                .as_f64()
                .map(|n| n != 0.0)
                .ok_or_else(|| "expected a number".to_string()),
            _ => Err("expected a boolean or an integer".to_string()),
        }
    }
}

impl Coerce for String {
    fn from_text(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            _ => Err("expected a string".to_string()),
        }
    }
}

impl Coerce for Value {
    fn from_text(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    fn from_json(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

/// Remove `key` from `raw` and coerce it. `null` and `""` mean "not set".
fn coerce<T: Coerce>(raw: &mut RawOptions, key: &str) -> Result<Option<T>, CodexError> {
    let Some(value) = raw.remove(key) else {
        return Ok(None);
    };

    let coerced = match &value {
        Value::Null => return Ok(None),
        Value::String(text) if text.is_empty() => return Ok(None),
        Value::String(text) => T::from_text(text),
        other => T::from_json(other),
    };

    coerced.map(Some).map_err(|reason| CodexError::InvalidOption {
        key: key.to_string(),
        value: match value {
            Value::String(text) => text,
            other => other.to_string(),
        },
        reason,
    })
}

fn required_string(raw: &mut RawOptions, key: &str) -> Result<String, CodexError> {
    coerce::<String>(raw, key)?.ok_or_else(|| CodexError::MissingOption(key.to_string()))
}

/// Whether a decoded JSON option carries a value worth sending
pub(crate) fn is_set(value: &Value) -> bool {
    !matches!(value, Value::Null) && value.as_str() != Some("")
}
