use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Histogram: inventory-sheet query latency in seconds.
pub const SHEET_QUERY_DURATION_SECONDS: &str = "roomboard_sheet_query_duration_seconds";

/// Histogram: booking-board query latency in seconds.
pub const BOARD_QUERY_DURATION_SECONDS: &str = "roomboard_board_query_duration_seconds";

/// Counter: stays recorded.
pub const STAYS_RECORDED_TOTAL: &str = "roomboard_stays_recorded_total";

/// Counter: upstream records rejected at ingestion.
pub const STAYS_REJECTED_TOTAL: &str = "roomboard_stays_rejected_total";

/// Counter: nights where active stays exceeded a room type's total count.
pub const OVERBOOKED_NIGHTS_TOTAL: &str = "roomboard_overbooked_nights_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: room types held by an engine.
pub const ROOM_TYPES_ACTIVE: &str = "roomboard_room_types_active";

/// Gauge: properties with a loaded engine.
pub const PROPERTIES_ACTIVE: &str = "roomboard_properties_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
