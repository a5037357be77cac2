//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use llm::{GatewayConfig, DEFAULT_GATEWAY_URL, DEFAULT_MODEL};
use nodes::Mode;
use pipeline::{ChatError, ModelName};

/// Recipe chat service: streams a Director/Writer/Reviewer pipeline over SSE.
#[derive(Debug, Parser)]
#[command(name = "sous-chef", version, about)]
pub struct Args {
    /// Address to listen on.
    #[arg(long, env = "SOUS_CHEF_BIND", default_value = "0.0.0.0:8787")]
    pub bind: SocketAddr,

    /// Bearer credential for the completion endpoint.
    #[arg(long, env = "AI_GATEWAY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenAI-compatible chat-completions endpoint.
    #[arg(long, env = "AI_GATEWAY_URL", default_value = DEFAULT_GATEWAY_URL)]
    pub gateway_url: String,

    /// Model name sent with every completion request.
    #[arg(long, env = "AI_GATEWAY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Per-call deadline for the completion endpoint, in seconds.
    #[arg(
        long,
        env = "AI_GATEWAY_TIMEOUT_SECS",
        default_value_t = 45,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub call_timeout_secs: u64,

    /// Which pipeline each chat request runs.
    #[arg(long, env = "SOUS_CHEF_MODE", value_enum, default_value_t = ModeArg::MultiAgent)]
    pub mode: ModeArg,

    /// Log line format.
    #[arg(long, env = "SOUS_CHEF_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// OTLP/gRPC collector endpoint; spans are exported only when set.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    MultiAgent,
    SingleAgent,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::MultiAgent => Mode::MultiAgent,
            ModeArg::SingleAgent => Mode::SingleAgent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl Args {
    /// Validated gateway settings.
    ///
    /// # Errors
    ///
    /// [`ChatError::Configuration`] if the API key or the model name is
    /// missing or blank.
    pub fn gateway_config(&self) -> Result<GatewayConfig, ChatError> {
        let model = ModelName::new(self.model.as_str())
            .ok_or_else(|| ChatError::configuration("AI gateway model name must not be blank"))?;
        let config = GatewayConfig::new(self.api_key.clone().unwrap_or_default(), model)?
            .with_url(self.gateway_url.as_str())
            .with_call_timeout(Duration::from_secs(self.call_timeout_secs));
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sous-chef").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_build_gateway_config() {
        let args = parse(&[
            "--api-key",
            "sk-test",
            "--gateway-url",
            "http://127.0.0.1:9/v1/chat/completions",
            "--model",
            "test/model",
            "--call-timeout-secs",
            "5",
            "--mode",
            "single-agent",
        ]);
        assert_eq!(Mode::from(args.mode), Mode::SingleAgent);

        let config = args.gateway_config().unwrap();
        assert_eq!(config.url(), "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(config.model().as_str(), "test/model");
        assert_eq!(config.call_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_blank_api_key_is_a_configuration_error() {
        let args = parse(&["--api-key", "  "]);
        assert!(matches!(
            args.gateway_config(),
            Err(ChatError::Configuration { .. })
        ));
    }

    #[test]
    fn test_blank_model_is_a_configuration_error() {
        let args = parse(&["--api-key", "sk-test", "--model", ""]);
        assert!(matches!(
            args.gateway_config(),
            Err(ChatError::Configuration { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_timeout_and_unknown_mode() {
        let base = ["sous-chef", "--api-key", "sk-test"];
        assert!(Args::try_parse_from(base.iter().copied().chain(["--call-timeout-secs", "0"])).is_err());
        assert!(Args::try_parse_from(base.iter().copied().chain(["--mode", "swarm"])).is_err());
    }
}
