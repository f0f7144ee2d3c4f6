use chrono::NaiveDate;
use hostel_admin::config::AppConfig;
use hostel_admin::hostel::{HostelAdmin, HostelRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Service facade over `repository`, paged as configured.
pub(crate) fn hostel_admin<R>(repository: Arc<R>, config: &AppConfig) -> Arc<HostelAdmin<R>>
where
    R: HostelRepository + 'static,
{
    Arc::new(HostelAdmin::new(repository).with_list_per_page(config.admin.list_per_page))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
