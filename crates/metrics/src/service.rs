use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tower_auth_models::{AuthError, Platform};

pub struct MetricsService {
    registry: Registry,
    tokens_issued_total: IntCounterVec,
    token_rejections_total: IntCounter,
    characters_created_total: IntCounter,
    request_errors_total: IntCounterVec,
}

fn internal(e: prometheus::Error) -> AuthError {
    AuthError::InternalError { reason: e.to_string() }
}

impl MetricsService {
    pub fn new() -> Result<Self, AuthError> {
        let registry = Registry::new();

        let tokens_issued_total = IntCounterVec::new(
            Opts::new("tower_auth_tokens_issued_total", "Total number of tokens issued"),
            &["platform"],
        )
        .map_err(internal)?;

        let token_rejections_total = IntCounter::new(
            "tower_auth_token_rejections_total",
            "Total number of requests carrying an unusable token",
        )
        .map_err(internal)?;

        let characters_created_total = IntCounter::new(
            "tower_auth_characters_created_total",
            "Total number of characters created",
        )
        .map_err(internal)?;

        let request_errors_total = IntCounterVec::new(
            Opts::new("tower_auth_request_errors_total", "Total number of failed requests"),
            &["status"],
        )
        .map_err(internal)?;

        registry.register(Box::new(tokens_issued_total.clone())).map_err(internal)?;
        registry.register(Box::new(token_rejections_total.clone())).map_err(internal)?;
        registry.register(Box::new(characters_created_total.clone())).map_err(internal)?;
        registry.register(Box::new(request_errors_total.clone())).map_err(internal)?;

        Ok(Self {
            registry,
            tokens_issued_total,
            token_rejections_total,
            characters_created_total,
            request_errors_total,
        })
    }

    pub fn record_token_issued(&self, platform: Platform) {
        self.tokens_issued_total.with_label_values(&[platform.as_str()]).inc();
    }

    pub fn record_token_rejected(&self) {
        self.token_rejections_total.inc();
    }

    pub fn record_character_created(&self) {
        self.characters_created_total.inc();
    }

    pub fn record_request_error(&self, status: u16) {
        self.request_errors_total.with_label_values(&[&status.to_string()]).inc();
    }

    pub fn tokens_issued(&self, platform: Platform) -> u64 {
        self.tokens_issued_total.with_label_values(&[platform.as_str()]).get()
    }

    pub fn get_prometheus_metrics(&self) -> Result<String, AuthError> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();

        encoder.encode(&metric_families, &mut buffer).map_err(internal)?;

        String::from_utf8(buffer).map_err(|e| AuthError::InternalError { reason: e.to_string() })
    }
}
