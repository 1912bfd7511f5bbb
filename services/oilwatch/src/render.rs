//! Render surface: pure derivations from the view state to summary counts,
//! cards and the dashboard page

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::reading::BuoyView;
use crate::state::DashboardState;

/// Counts shown above the card grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub oil_detected: usize,
    pub safe: usize,
}

impl Summary {
    pub fn from_buoys(buoys: &[BuoyView]) -> Self {
        let oil_detected = buoys.iter().filter(|b| b.oil_detected).count();
        Self {
            total: buoys.len(),
            oil_detected,
            safe: buoys.len() - oil_detected,
        }
    }
}

/// Two-state status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    OilDetected,
    Clear,
}

impl StatusBadge {
    pub fn for_buoy(buoy: &BuoyView) -> Self {
        if buoy.oil_detected {
            StatusBadge::OilDetected
        } else {
            StatusBadge::Clear
        }
    }

    /// (text color, background color)
    fn colors(self) -> (&'static str, &'static str) {
        match self {
            StatusBadge::OilDetected => ("#721c24", "#f8d7da"),
            StatusBadge::Clear => ("#155724", "#d4edda"),
        }
    }

    fn status_text(self) -> &'static str {
        match self {
            StatusBadge::OilDetected => "Oil Spill Detected",
            StatusBadge::Clear => "No Oil Detected",
        }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusBadge::OilDetected => write!(f, "OIL DETECTED"),
            StatusBadge::Clear => write!(f, "CLEAR"),
        }
    }
}

/// Display-ready card for one buoy
#[derive(Debug, Clone, PartialEq)]
pub struct BuoyCard {
    pub id: String,
    pub badge: StatusBadge,
    pub latitude: String,
    pub longitude: String,
    pub timestamp: String,
    pub reading: Option<String>,
    pub emphasized: bool,
}

impl BuoyCard {
    pub fn from_view(view: &BuoyView) -> Self {
        Self {
            id: view.buoy_id.clone().unwrap_or_else(|| "unknown".to_string()),
            badge: StatusBadge::for_buoy(view),
            latitude: format_coordinate(view.latitude),
            longitude: format_coordinate(view.longitude),
            timestamp: format_timestamp(view.last_updated.as_deref()),
            reading: view.reading.map(|r| r.to_string()),
            emphasized: view.oil_detected,
        }
    }
}

/// Degrees to 4 decimal places
pub fn format_coordinate(degrees: f64) -> String {
    format!("{:.4}°", degrees)
}

/// Human-readable timestamp, or "Just now" when absent.
///
/// Offset-aware timestamps are shown in UTC, naive ones as given, and
/// anything unparsable verbatim.
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Just now".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%Y-%m-%d %H:%M:%S").to_string();
        }
    }

    raw.to_string()
}

/// Escape text for inclusion in HTML element content and attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_card(card: &BuoyCard) -> String {
    let (color, bg) = card.badge.colors();
    let border = if card.emphasized { color } else { "#dee2e6" };
    let icon = if card.emphasized { "⚠️" } else { "✓" };
    let pulse = if card.emphasized {
        r#"<div class="danger-pulse" style="margin-top: 0.5rem; height: 4px; border-radius: 2px; background-color: #dc3545;"></div>"#
    } else {
        ""
    };
    let reading = card
        .reading
        .as_ref()
        .map(|r| {
            format!(
                r#"<div class="detail"><span class="detail-label">Reading</span> <span class="detail-value">{}</span></div>"#,
                escape_html(r)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="buoy-card" data-buoy-id="{id}" style="border: 2px solid {border}; border-radius: 0.5rem; padding: 1rem;">
            <div class="buoy-header" style="display: flex; justify-content: space-between;">
                <span class="buoy-id" style="font-weight: 600;">{id}</span>
                <span class="status-badge" style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {color}; background-color: {bg};">{badge}</span>
            </div>
            <div class="buoy-status" style="margin: 0.5rem 0;">{icon} {status}</div>
            <div class="buoy-details">
                <div class="detail"><span class="detail-label">Latitude</span> <span class="detail-value">{lat}</span></div>
                <div class="detail"><span class="detail-label">Longitude</span> <span class="detail-value">{lon}</span></div>
                {reading}
            </div>
            <div class="buoy-footer" style="font-size: 0.85em; color: #6c757d;">📡 {timestamp}</div>
            {pulse}
        </div>"#,
        id = escape_html(&card.id),
        border = border,
        color = color,
        bg = bg,
        badge = card.badge,
        icon = icon,
        status = card.badge.status_text(),
        lat = card.latitude,
        lon = card.longitude,
        reading = reading,
        timestamp = escape_html(&card.timestamp),
        pulse = pulse,
    )
}

/// Render the whole dashboard page.
///
/// The page reloads itself every `reload_interval_ms`.
pub fn render_page(state: &DashboardState, reload_interval_ms: u64) -> String {
    let summary = state.summary();

    let last_updated = state
        .last_refreshed
        .map(|t| {
            format!(
                r#"<span class="last-updated">Last updated: {}</span>"#,
                t.format("%H:%M:%S UTC")
            )
        })
        .unwrap_or_default();

    let (button_label, button_disabled) = if state.loading {
        ("⟳ Refreshing...", " disabled")
    } else {
        ("⟳ Refresh", "")
    };

    let error_banner = state
        .error
        .as_ref()
        .map(|e| {
            format!(
                r#"<div class="error-banner" style="padding: 0.75rem 1rem; margin: 1rem 0; border-radius: 0.25rem; color: #856404; background-color: #fff3cd;">⚠️ {}</div>"#,
                escape_html(e)
            )
        })
        .unwrap_or_default();

    let cards: String = state
        .buoys
        .iter()
        .map(|b| render_card(&BuoyCard::from_view(b)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Oil Detection Dashboard</title>
    <script>
        function refreshNow() {{
            const button = document.getElementById('refresh-btn');
            button.disabled = true;
            button.textContent = '⟳ Refreshing...';
            fetch('/api/refresh', {{ method: 'POST' }}).finally(() => location.reload());
        }}
        setInterval(() => location.reload(), {reload_interval_ms});
    </script>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <header class="header" style="display: flex; justify-content: space-between; align-items: center;">
        <h1>🛢️ Oil Detection</h1>
        <div class="header-info">
            {last_updated}
            <button id="refresh-btn" class="refresh-btn" onclick="refreshNow()"{button_disabled}>{button_label}</button>
        </div>
    </header>
    <section class="summary" style="display: flex; gap: 1rem;">
        <div class="summary-card total"><span class="summary-number" id="summary-total">{total}</span> <span class="summary-label">Total Buoys</span></div>
        <div class="summary-card danger"><span class="summary-number" id="summary-oil">{oil}</span> <span class="summary-label">Oil Detected</span></div>
        <div class="summary-card safe"><span class="summary-number" id="summary-safe">{safe}</span> <span class="summary-label">All Clear</span></div>
    </section>
    {error_banner}
    <main class="buoy-grid" style="display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; margin-top: 1rem;">{cards}</main>
    <footer class="footer" style="margin-top: 2rem; color: #6c757d;">
        <p>Oil Detection Monitoring System • Real-time Sensor Data</p>
    </footer>
</body>
</html>"#,
        reload_interval_ms = reload_interval_ms,
        last_updated = last_updated,
        button_disabled = button_disabled,
        button_label = button_label,
        total = summary.total,
        oil = summary.oil_detected,
        safe = summary.safe,
        error_banner = error_banner,
        cards = cards,
    )
}
