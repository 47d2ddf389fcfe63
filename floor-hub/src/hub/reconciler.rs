//! 断线清理 (DisconnectReconciler)
//!
//! Undoes everything a session left on the floor: its devices are detached
//! from every table, freed tables drop their orders, and the session leaves
//! the registry. A device another live session also attached stays put, so a
//! late close from a replaced socket cannot free a table the new one holds.

use shared::models::{DeviceId, OrderId, TableNumber};

use super::floor::Floor;
use crate::sessions::ConnectionRegistry;

/// What a disconnect changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub detached: Vec<(TableNumber, DeviceId)>,
    pub freed_tables: Vec<TableNumber>,
    pub retired_orders: Vec<OrderId>,
    /// Devices left attached because another session holds them
    pub kept: Vec<DeviceId>,
}

pub struct DisconnectReconciler;

impl DisconnectReconciler {
    /// Clean up after `session_id`
    ///
    /// Returns `None` when the session is unknown, which makes a repeated
    /// disconnect a no-op. The session id itself is treated as one of its
    /// devices since that is the default device for table selection.
    /// Devices still tracked by a remaining session are skipped.
    pub fn reconcile(
        floor: &mut Floor,
        sessions: &mut ConnectionRegistry,
        session_id: &str,
    ) -> Option<ReconcileReport> {
        let session = sessions.remove(session_id)?;

        let mut devices: Vec<DeviceId> = session.devices.into_iter().collect();
        if !devices.iter().any(|d| d == session_id) {
            devices.push(session_id.to_string());
        }

        let mut report = ReconcileReport::default();
        for device in &devices {
            if sessions.is_tracked(device) {
                tracing::debug!(session_id = %session_id, device = %device, "Device held by another session, kept");
                report.kept.push(device.clone());
                continue;
            }
            for table in floor.tables.tables_with_device(device) {
                let active_before = floor.active_order_of(table).cloned();
                let state = match floor.detach_device(table, device) {
                    Ok(state) => state,
                    Err(e) => {
                        tracing::warn!(table, device = %device, error = %e, "Detach during disconnect failed");
                        continue;
                    }
                };
                report.detached.push((table, device.clone()));
                if !state.occupied {
                    report.freed_tables.push(table);
                    report.retired_orders.extend(active_before);
                }
            }
        }

        tracing::info!(
            session_id = %session_id,
            detached = report.detached.len(),
            freed = report.freed_tables.len(),
            kept = report.kept.len(),
            "Session disconnected and reconciled"
        );
        Some(report)
    }
}
