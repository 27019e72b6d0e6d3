//! Reservation expiry background job.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use domain::services::BookingService;

use super::scheduler::{Job, JobFrequency};

/// Periodic sweep that completes reservations whose window has ended and
/// returns their devices to the available pool.
pub struct ExpireReservationsJob {
    service: Arc<BookingService>,
    frequency: JobFrequency,
}

impl ExpireReservationsJob {
    pub fn new(service: Arc<BookingService>, sweep_secs: u64) -> Self {
        Self {
            service,
            frequency: JobFrequency::Seconds(sweep_secs),
        }
    }
}

#[async_trait::async_trait]
impl Job for ExpireReservationsJob {
    fn name(&self) -> &'static str {
        "expire_reservations"
    }

    fn frequency(&self) -> JobFrequency {
        self.frequency
    }

    async fn execute(&self) -> Result<(), String> {
        let completed = self
            .service
            .expire(Utc::now())
            .await
            .map_err(|e| format!("Expiry sweep failed: {}", e))?;

        if !completed.is_empty() {
            info!(completed = completed.len(), "Reservations expired");
        }

        Ok(())
    }
}
