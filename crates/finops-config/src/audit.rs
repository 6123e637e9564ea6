//! Audit log filtering.

use chrono::{DateTime, NaiveDate, Utc};

use finops_core::AppError;

use crate::types::AuditEntry;

/// Criteria for [`crate::ConfigStore::audit_log`]. Empty filter returns
/// the whole log.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Exact match on the entry's profile name.
    pub profile: Option<String>,
    /// Exact match on the action tag (e.g. `set_value`).
    pub action: Option<String>,
    /// Inclusive `START:END` timestamp range; each side is RFC 3339 or
    /// `YYYY-MM-DD`.
    pub time_period: Option<String>,
}

/// Apply `filter` to `entries`, returning matching entries in order.
pub fn filter_entries(
    entries: &[AuditEntry],
    filter: &AuditFilter,
) -> Result<Vec<AuditEntry>, AppError> {
    let range = match &filter.time_period {
        Some(period) => Some(parse_time_period(period)?),
        None => None,
    };

    Ok(entries
        .iter()
        .filter(|entry| {
            if let Some(profile) = &filter.profile {
                if entry.profile.as_deref() != Some(profile.as_str()) {
                    return false;
                }
            }
            if let Some(action) = &filter.action {
                if entry.action != *action {
                    return false;
                }
            }
            if let Some((start, end)) = range {
                if entry.timestamp < start || entry.timestamp > end {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect())
}

/// Parse a `START:END` period into an inclusive UTC range.
///
/// RFC 3339 timestamps themselves contain `:`, so the split point is the
/// first `:` at which both sides parse.
fn parse_time_period(period: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    for (idx, _) in period.match_indices(':') {
        let (start_raw, end_raw) = (&period[..idx], &period[idx + 1..]);
        if let (Some(start), Some(end)) = (parse_instant(start_raw), parse_instant(end_raw)) {
            return Ok((start, end));
        }
    }
    Err(AppError::InvalidTimePeriod(period.to_string()))
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}
