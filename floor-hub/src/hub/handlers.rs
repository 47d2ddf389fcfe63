//! Per-event handlers
//!
//! Each handler either fails without touching state or mutates and returns
//! the dispatches that describe the change.

use serde_json::Value;
use shared::error::AppResult;
use shared::message::{
    AddOrderItemRequest, ClientEvent, CreateOrderRequest, Identified, OrderStatusChange,
    OrdersByStatus, OrdersByStatusQuery, RoomAck, ServerEvent, TableDevice, TableDeviceChange,
    TableOrderCreated, UpdateOrderStatusRequest,
};
use shared::models::{Role, TableState};
use shared::PROTOCOL_VERSION;

use super::{Dispatch, Hub};
use crate::orders::StatusNotice;

impl Hub {
    pub(super) fn apply(&mut self, session_id: &str, event: ClientEvent) -> AppResult<Vec<Dispatch>> {
        match event {
            ClientEvent::Identify(profile) => Ok(self.identify(session_id, profile)),
            ClientEvent::SetRole(role) => Ok(self.set_role(session_id, role)),
            ClientEvent::JoinRoom(room) => Ok(self.join_room(session_id, room)),
            ClientEvent::LeaveRoom(room) => Ok(self.leave_room(session_id, room)),
            ClientEvent::GetTableStates => Ok(vec![Dispatch::reply(
                session_id,
                ServerEvent::TableStates(self.floor.tables.snapshot_all()),
            )]),
            ClientEvent::SelectTable(req) => self.select_table(session_id, req),
            ClientEvent::ReleaseTable(req) => self.release_table(session_id, req),
            ClientEvent::CreateOrder(req) => self.create_order(session_id, req),
            ClientEvent::UpdateOrderStatus(req) => self.update_order_status(req),
            ClientEvent::AddOrderItem(req) => self.add_order_item(req),
            ClientEvent::GetOrdersByStatus(query) => Ok(self.orders_by_status(session_id, query)),
            ClientEvent::WaiterSubmitOrder(payload) => Ok(self.waiter_submit_order(session_id, payload)),
            ClientEvent::CashierReply(payload) => Ok(self.cashier_reply(session_id, payload)),
            ClientEvent::SpecialOrderNew(payload) => Ok(vec![Dispatch::all_except(
                session_id,
                ServerEvent::SpecialOrderNew(payload),
            )]),
            ClientEvent::PaymentMade(payload) => Ok(vec![Dispatch::all_except(
                session_id,
                ServerEvent::PaymentMade(payload),
            )]),
            ClientEvent::SpecialOrderCancelled(payload) => Ok(vec![Dispatch::all_except(
                session_id,
                ServerEvent::SpecialOrderCancelled(payload),
            )]),
        }
    }

    // ========== Session ==========

    fn identify(&mut self, session_id: &str, profile: Value) -> Vec<Dispatch> {
        self.sessions.identify(session_id, profile.clone());
        tracing::info!(
            session_id = %session_id,
            identified = self.sessions.identified_count(),
            "Session identified"
        );
        vec![
            Dispatch::reply(
                session_id,
                ServerEvent::Identified(Identified {
                    success: true,
                    message: "Session identified".to_string(),
                    profile,
                    protocol_version: PROTOCOL_VERSION,
                }),
            ),
            Dispatch::reply(session_id, ServerEvent::ServerStatus(self.status())),
        ]
    }

    fn set_role(&mut self, session_id: &str, role: Option<Role>) -> Vec<Dispatch> {
        tracing::info!(
            session_id = %session_id,
            role = role.as_ref().map(Role::as_str).unwrap_or("none"),
            "Role set"
        );
        self.sessions.set_role(session_id, role);
        Vec::new()
    }

    fn join_room(&mut self, session_id: &str, room: String) -> Vec<Dispatch> {
        self.sessions.join(session_id, &room);
        vec![Dispatch::reply(
            session_id,
            ServerEvent::JoinedRoom(RoomAck { room, success: true }),
        )]
    }

    fn leave_room(&mut self, session_id: &str, room: String) -> Vec<Dispatch> {
        self.sessions.leave(session_id, &room);
        vec![Dispatch::reply(
            session_id,
            ServerEvent::LeftRoom(RoomAck { room, success: true }),
        )]
    }

    // ========== Tables ==========

    /// Change dispatches shared by select and release
    fn table_change(
        &self,
        state: TableState,
        device: String,
        wrap: fn(TableDeviceChange) -> ServerEvent,
    ) -> Vec<Dispatch> {
        let snapshot = self.floor.tables.snapshot_all();
        let status = ServerEvent::TableStatusChanged((&state).into());
        vec![
            Dispatch::global(wrap(TableDeviceChange {
                table: state.number,
                device,
                state,
            })),
            Dispatch::global(status),
            Dispatch::global(ServerEvent::TableStates(snapshot.clone())),
            Dispatch::global(ServerEvent::TableStatesUpdated(snapshot)),
        ]
    }

    fn select_table(&mut self, session_id: &str, req: TableDevice) -> AppResult<Vec<Dispatch>> {
        let device = req.device.unwrap_or_else(|| session_id.to_string());
        let state = self.floor.tables.attach_device(req.table, &device)?;
        self.sessions.track_device(session_id, &device);
        tracing::info!(table = req.table, device = %device, "Table selected");
        Ok(self.table_change(state, device, ServerEvent::TableSelected))
    }

    fn release_table(&mut self, session_id: &str, req: TableDevice) -> AppResult<Vec<Dispatch>> {
        let device = req.device.unwrap_or_else(|| session_id.to_string());
        let state = self.floor.detach_device(req.table, &device)?;
        self.sessions.untrack_device(session_id, &device);
        tracing::info!(table = req.table, device = %device, occupied = state.occupied, "Table released");
        Ok(self.table_change(state, device, ServerEvent::TableReleased))
    }

    // ========== Orders ==========

    fn create_order(&mut self, session_id: &str, req: CreateOrderRequest) -> AppResult<Vec<Dispatch>> {
        let device = req.device.unwrap_or_else(|| session_id.to_string());
        let (order, table) = self.floor.open_order(req.table, req.items, req.total, device)?;
        tracing::info!(order_id = %order.id, table = order.table, total = order.total, "Order created");
        Ok(vec![
            Dispatch::global(ServerEvent::TableOrderCreated(TableOrderCreated {
                order: order.clone(),
                table,
            })),
            Dispatch::global(ServerEvent::OrderCreated(order)),
            Dispatch::global(ServerEvent::TableStatesUpdated(
                self.floor.tables.snapshot_all(),
            )),
        ])
    }

    fn update_order_status(&mut self, req: UpdateOrderStatusRequest) -> AppResult<Vec<Dispatch>> {
        let transition = self.floor.orders.transition(&req.order_id, req.status)?;
        let order = transition.order;
        tracing::info!(
            order_id = %order.id,
            from = %transition.previous,
            to = %order.status,
            "Order status changed"
        );

        let mut dispatches = vec![
            Dispatch::global(ServerEvent::OrderStatusChanged(OrderStatusChange {
                order_id: order.id.clone(),
                new_status: order.status,
                previous_status: transition.previous,
                order: order.clone(),
            })),
            Dispatch::global(ServerEvent::OrderUpdated(order.clone())),
        ];
        match transition.notice {
            Some(StatusNotice::SentToKitchen) => {
                dispatches.push(Dispatch::global(ServerEvent::KitchenNewOrder(order)))
            }
            Some(StatusNotice::ReadyForPayment) => {
                dispatches.push(Dispatch::global(ServerEvent::OrderReadyForPayment(order)))
            }
            None => {}
        }
        Ok(dispatches)
    }

    fn add_order_item(&mut self, req: AddOrderItemRequest) -> AppResult<Vec<Dispatch>> {
        let order = self.floor.orders.add_item(&req.order_id, req.item)?;
        tracing::debug!(order_id = %order.id, total = order.total, "Order item added");
        Ok(vec![Dispatch::global(ServerEvent::OrderUpdated(order))])
    }

    fn orders_by_status(&self, session_id: &str, query: OrdersByStatusQuery) -> Vec<Dispatch> {
        let orders = self.floor.orders.query_by_status(query.status);
        vec![Dispatch::reply(
            session_id,
            ServerEvent::OrdersByStatus(OrdersByStatus {
                status: query.status,
                orders,
            }),
        )]
    }

    // ========== Relays ==========

    /// Cashier room when the sender is a waiter, everyone else regardless
    fn waiter_submit_order(&self, session_id: &str, payload: Value) -> Vec<Dispatch> {
        let mut dispatches = Vec::with_capacity(2);
        if self.sessions.role(session_id) == Some(&Role::Waiter) {
            dispatches.push(Dispatch::room(
                Role::Cashier.room(),
                ServerEvent::WaiterSubmitOrder(payload.clone()),
            ));
        }
        dispatches.push(Dispatch::all_except(
            session_id,
            ServerEvent::WaiterSubmitOrder(payload),
        ));
        dispatches
    }

    /// Waiter room, only from cashiers; anything else is dropped
    fn cashier_reply(&self, session_id: &str, payload: Value) -> Vec<Dispatch> {
        if self.sessions.role(session_id) != Some(&Role::Cashier) {
            tracing::debug!(session_id = %session_id, "cashier-reply from non-cashier dropped");
            return Vec::new();
        }
        vec![Dispatch::room(
            Role::Waiter.room(),
            ServerEvent::CashierReply(payload),
        )]
    }
}
