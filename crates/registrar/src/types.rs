/// Shared application state
use crate::config::{ConfigError, ServiceConfig};
use crate::report::{ReportCache, ReportFormatter};
use crate::session::SessionStore;
use chrono::{DateTime, Utc};

/// State shared by every request handler.
pub struct AppState {
    pub config: ServiceConfig,
    pub formatter: ReportFormatter,
    /// HTML template used for grade change reports
    pub template: String,
    pub sessions: SessionStore,
    pub reports: ReportCache,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Builds the state from a validated configuration.
    pub fn from_config(config: ServiceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let template = config.load_template()?;

        Ok(Self {
            formatter: ReportFormatter::new(
                config.organization_name.clone(),
                config.timestamp_format.clone(),
            ),
            template,
            sessions: SessionStore::new(config.session_ttl()),
            reports: ReportCache::new(config.report_ttl()),
            started_at: Utc::now(),
            config,
        })
    }

    /// Drops expired sessions and reports.
    pub fn cleanup_expired(&self) {
        self.sessions.cleanup_expired();
        self.reports.cleanup_expired();
    }
}
