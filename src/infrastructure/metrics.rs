// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use crate::domain::models::ticket::{TicketPriority, TicketStatus};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

const TICKETS_CREATED: &str = "helpdesk_tickets_created_total";
const TICKETS_UNASSIGNED: &str = "helpdesk_tickets_unassigned_total";
const STATUS_CHANGES: &str = "helpdesk_status_changes_total";
const REOPEN_STEPS: &str = "helpdesk_reopen_total";

/// 初始化指标系统
///
/// 未启用时不安装导出器，计数调用落到空记录器上。
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}",
                settings.listen_addr, e
            );
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    describe_counter!(TICKETS_CREATED, "Tickets created, labelled by priority");
    describe_counter!(
        TICKETS_UNASSIGNED,
        "Tickets created without an eligible agent"
    );
    describe_counter!(STATUS_CHANGES, "Status changes, labelled by target status");
    describe_counter!(REOPEN_STEPS, "Reopen handshake steps, labelled by step");

    info!("Metrics exporter listening on {}", addr);
}

pub fn record_ticket_created(priority: TicketPriority, assigned: bool) {
    counter!(TICKETS_CREATED, "priority" => priority.to_string()).increment(1);
    if !assigned {
        counter!(TICKETS_UNASSIGNED).increment(1);
    }
}

pub fn record_status_change(status: TicketStatus) {
    counter!(STATUS_CHANGES, "status" => status.to_string()).increment(1);
}

/// `step` 为 `requested` 或 `accepted`
pub fn record_reopen(step: &'static str) {
    counter!(REOPEN_STEPS, "step" => step).increment(1);
}
