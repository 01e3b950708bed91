use crate::repo::bookings_repo::BookingsRepo;
use crate::repo::refresh_tokens_repo::RefreshTokensRepo;
use anyhow::Result;
use chrono::Utc;

/// Background sweep moving pending_payment bookings past their payment_due
/// deadline to expired. Expired rows stop blocking their slot on the next
/// conflict scan; the engine itself never writes this status. The same
/// loop drops stale refresh-token rows.
#[derive(Clone)]
pub struct ExpirySweep {
    pub bookings_repo: BookingsRepo,
    pub refresh_tokens_repo: RefreshTokensRepo,
    pub interval: std::time::Duration,
}

impl ExpirySweep {
    pub async fn run(self) {
        loop {
            if let Err(err) = self.tick().await {
                tracing::error!("expiry sweep error: {}", err);
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    async fn tick(&self) -> Result<()> {
        let now = Utc::now();

        let expired = self.bookings_repo.expire_overdue(now).await?;
        if expired > 0 {
            tracing::info!(count = expired, "expired overdue pending bookings");
        }

        self.refresh_tokens_repo.purge_expired(now).await?;
        Ok(())
    }
}
