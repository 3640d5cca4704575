use crate::application::poller::{self, TrainMatch};
use crate::domain::order::{Input, Order, OrderStatus};
use crate::domain::passenger::encode_passengers;
use crate::domain::ports::{
    AvailabilityQuery, BookingClientBox, ConfirmRequest, DraftOrder, StatusSinkBox,
};
use crate::error::{GrabError, Result};
use std::time::Instant;
use tokio::sync::{Notify, RwLock};
use tracing::{error, info};

/// Drives one purchase attempt end to end: polls availability until a
/// ranked (train, seat) pair matches, then carries the submission protocol
/// through validation and confirmation.
///
/// The engine is the single writer of the [`Order`]; every transition and
/// field update is published to the status sink as a clone snapshot.
/// Exactly one run may be active at a time: `start` is rejected unless the
/// attempt is currently `stop`.
pub struct AcquisitionEngine {
    client: BookingClientBox,
    sink: StatusSinkBox,
    input: Input,
    order: RwLock<Order>,
    stop_notify: Notify,
}

impl AcquisitionEngine {
    pub fn new(client: BookingClientBox, sink: StatusSinkBox, input: Input) -> Self {
        Self {
            client,
            sink,
            input,
            order: RwLock::new(Order::default()),
            stop_notify: Notify::new(),
        }
    }

    /// Snapshot of the current order state.
    pub async fn order(&self) -> Order {
        self.order.read().await.clone()
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    /// Starts the acquisition loop and runs it to its end.
    ///
    /// Returns `InvalidState` if an attempt is already active. The loop
    /// ends when the attempt reaches `stop`, `success` or `fail`, or when
    /// a tick drove a submission attempt (including the `read-checkcode`
    /// pause, which waits for [`Self::supply_verification_code`]).
    pub async fn start(&self) -> Result<()> {
        {
            let mut order = self.order.write().await;
            if order.status != OrderStatus::Stop {
                return Err(GrabError::InvalidState(format!(
                    "cannot start a run while the current attempt is {}",
                    order.status
                )));
            }
            order.status = OrderStatus::Query;
            let snapshot = order.clone();
            drop(order);
            self.sink.publish(snapshot).await;
        }

        loop {
            match self.tick().await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(err) => {
                    error!(error = %err, "acquisition attempt failed");
                    self.publish_update(|order| order.status = OrderStatus::Fail)
                        .await;
                    return Err(err);
                }
            }
            // Cancellable delay: a stop request wakes the loop instead of
            // waiting out the full interval.
            tokio::select! {
                _ = tokio::time::sleep(self.input.poll_interval) => {}
                _ = self.stop_notify.notified() => {}
            }
        }
    }

    /// Cooperative cancellation; observed by the loop at its next check.
    pub async fn stop(&self) {
        info!("stop query");
        self.publish_update(|order| order.status = OrderStatus::Stop)
            .await;
        self.stop_notify.notify_one();
    }

    /// Accepts the human-supplied verification code and immediately runs
    /// the confirmation call with it.
    ///
    /// Rejected with `InvalidState` unless the attempt is currently
    /// waiting in `read-checkcode`.
    pub async fn supply_verification_code(&self, code: &str) -> Result<()> {
        {
            let mut order = self.order.write().await;
            if order.status != OrderStatus::ReadCheckCode {
                return Err(GrabError::InvalidState(format!(
                    "verification code supplied while the attempt is {}",
                    order.status
                )));
            }
            order.verification_code = Some(code.to_string());
            let snapshot = order.clone();
            drop(order);
            self.sink.publish(snapshot).await;
        }

        match self.confirm().await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!(error = %err, "confirmation failed");
                self.publish_update(|order| order.status = OrderStatus::Fail)
                    .await;
                Err(err)
            }
        }
    }

    /// One loop iteration. `Ok(true)` halts the loop.
    async fn tick(&self) -> Result<bool> {
        if self.order.read().await.status.is_loop_terminal() {
            return Ok(true);
        }

        let query_endpoint = self.client.get_query_endpoint().await?;

        let (Some(origin), Some(destination), Some(date)) = (
            self.input.origin.as_ref(),
            self.input.destination.as_ref(),
            self.input.date,
        ) else {
            // Not an error: the route is completed externally, so the
            // loop just stalls until then.
            info!("origin, destination and travel date must be set before polling");
            return Ok(false);
        };

        let fare = if self.input.student_fare {
            "student"
        } else {
            "adult"
        };
        info!("{} querying {} fares..", date.format("%m-%d"), fare);

        let query = AvailabilityQuery {
            query_endpoint,
            origin_code: origin.code.clone(),
            dest_code: destination.code.clone(),
            date: date.format("%Y-%m-%d").to_string(),
        };
        let Some(found) =
            poller::poll_once(self.client.as_ref(), query, &self.input.acceptable, date).await
        else {
            return Ok(false);
        };

        info!(train = %found.train.name, seat = %found.seat.code, "match found, submitting order");
        self.publish_update(|order| {
            order.train = Some(found.train.clone());
            order.seat = Some(found.seat.clone());
            order.status = OrderStatus::Submit;
            order.started_at = Some(Instant::now());
        })
        .await;

        self.prepare_submit(&found).await?;
        Ok(true)
    }

    /// The submission path: notify, init session, encode, validate, then
    /// either confirm immediately or pause for the verification code.
    /// Step order is part of the protocol and must not change.
    async fn prepare_submit(&self, found: &TrainMatch) -> Result<()> {
        let tour_flag = self.order.read().await.tour_flag.clone();

        self.client
            .submit_order_request(&found.train, &tour_flag, self.input.student_fare)
            .await?;
        let session = self.client.init_submission().await?;

        if self.input.passengers.is_empty() {
            info!("no passengers selected, stopping the attempt");
            self.publish_update(|order| order.status = OrderStatus::Stop)
                .await;
            return Ok(());
        }

        let strings = encode_passengers(&found.seat, &self.input.passengers);
        info!(manifest = %strings.manifest, registry = %strings.registry, "encoded passengers");

        let validation = self
            .client
            .validate_draft_order(DraftOrder {
                submit_token: session.submit_token.clone(),
                tour_flag,
                passenger_manifest: strings.manifest.clone(),
                passenger_registry: strings.registry.clone(),
            })
            .await?;

        self.publish_update(|order| {
            order.submit_token = Some(session.submit_token.clone());
            order.key_change = Some(session.key_change.clone());
            order.passenger_strings = Some(strings.clone());
        })
        .await;

        if validation.verification_required {
            info!("verification code required; supply it to finish the order");
            self.publish_update(|order| order.status = OrderStatus::ReadCheckCode)
                .await;
        } else {
            info!("no verification code required, confirming order..");
            self.confirm().await?;
        }
        Ok(())
    }

    /// Confirms the draft with the stored session tokens and whatever
    /// verification code the order carries (empty when none was demanded).
    async fn confirm(&self) -> Result<()> {
        let (request, started_at) = {
            let order = self.order.read().await;
            let strings = order.passenger_strings.clone().ok_or_else(|| {
                GrabError::InvalidState("no encoded passengers to confirm with".into())
            })?;
            let request = ConfirmRequest {
                verification_code: order.verification_code.clone().unwrap_or_default(),
                train: order.train.clone().ok_or_else(|| {
                    GrabError::InvalidState("no matched train to confirm".into())
                })?,
                submit_token: order.submit_token.clone().ok_or_else(|| {
                    GrabError::InvalidState("no submission session to confirm with".into())
                })?,
                key_change: order.key_change.clone().unwrap_or_default(),
                passenger_manifest: strings.manifest,
                passenger_registry: strings.registry,
            };
            (request, order.started_at)
        };

        self.client.confirm_submission(request).await?;

        self.publish_update(|order| order.status = OrderStatus::Success)
            .await;
        let elapsed = started_at.map(|t| t.elapsed().as_secs_f64()).unwrap_or(0.0);
        info!("order submitted in {elapsed:.1}s; complete payment on the booking site");
        Ok(())
    }

    /// Applies a mutation under the write lock, then publishes the
    /// resulting snapshot (lock released first; the sink never runs while
    /// the order is held).
    async fn publish_update<F: FnOnce(&mut Order)>(&self, apply: F) {
        let snapshot = {
            let mut order = self.order.write().await;
            apply(&mut order);
            order.clone()
        };
        self.sink.publish(snapshot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::MemoryStatusSink;
    use crate::infrastructure::scripted::ScriptedBookingClient;

    fn engine_with_empty_input() -> AcquisitionEngine {
        AcquisitionEngine::new(
            Box::new(ScriptedBookingClient::new()),
            Box::new(MemoryStatusSink::new()),
            Input::default(),
        )
    }

    #[tokio::test]
    async fn test_verification_code_rejected_while_stopped() {
        let engine = engine_with_empty_input();
        let result = engine.supply_verification_code("1234").await;
        assert!(matches!(result, Err(GrabError::InvalidState(_))));
        assert_eq!(engine.order().await.status, OrderStatus::Stop);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let engine = engine_with_empty_input();
        engine.stop().await;
        engine.stop().await;
        assert_eq!(engine.order().await.status, OrderStatus::Stop);
    }

    #[tokio::test]
    async fn test_snapshot_is_a_copy() {
        let engine = engine_with_empty_input();
        let mut snapshot = engine.order().await;
        snapshot.status = OrderStatus::Fail;
        assert_eq!(engine.order().await.status, OrderStatus::Stop);
    }
}
