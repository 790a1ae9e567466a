//! Launch-list signups.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use thiserror::Error;
use tracing::info;

use crate::domain::{
    error::DomainError,
    subscribers::{EmailAddress, SubscriberRecord},
};

#[derive(Debug, Error)]
pub enum SubscriberLogError {
    #[error("failed to append subscriber record: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] DomainError),
}

/// Durable, append-only destination for signups.
#[async_trait]
pub trait SubscriberLog: Send + Sync {
    async fn append(&self, record: &SubscriberRecord) -> Result<(), SubscriberLogError>;
}

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error(transparent)]
    Storage(#[from] SubscriberLogError),
}

#[derive(Clone)]
pub struct SubscriptionService {
    log: Arc<dyn SubscriberLog>,
}

impl SubscriptionService {
    pub fn new(log: Arc<dyn SubscriberLog>) -> Self {
        Self { log }
    }

    /// Validate presence of an email and append one record. Duplicates are
    /// accepted.
    pub async fn subscribe(&self, email: Option<&str>) -> Result<SubscriberRecord, SubscribeError> {
        let email = EmailAddress::parse(email)?;
        let record = SubscriberRecord::now(email);
        self.log.append(&record).await?;

        counter!("linksly_subscriptions_total").increment(1);
        info!(target = "linksly::subscribe", "subscriber recorded");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryLog {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SubscriberLog for MemoryLog {
        async fn append(&self, record: &SubscriberRecord) -> Result<(), SubscriberLogError> {
            self.lines.lock().await.push(record.to_log_line()?);
            Ok(())
        }
    }

    struct BrokenLog;

    #[async_trait]
    impl SubscriberLog for BrokenLog {
        async fn append(&self, _record: &SubscriberRecord) -> Result<(), SubscriberLogError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[tokio::test]
    async fn appends_one_line_per_signup_including_duplicates() {
        let log = Arc::new(MemoryLog::default());
        let service = SubscriptionService::new(log.clone());

        service.subscribe(Some("a@example.com")).await.expect("first");
        service.subscribe(Some("a@example.com")).await.expect("duplicate");

        let lines = log.lines.lock().await;
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.ends_with(",a@example.com\n")));
    }

    #[tokio::test]
    async fn missing_email_appends_nothing() {
        let log = Arc::new(MemoryLog::default());
        let service = SubscriptionService::new(log.clone());

        let err = service.subscribe(None).await.expect_err("missing");
        assert!(matches!(
            err,
            SubscribeError::Invalid(DomainError::Missing { field: "email" })
        ));
        assert!(log.lines.lock().await.is_empty());
    }

    #[tokio::test]
    async fn storage_failures_surface() {
        let service = SubscriptionService::new(Arc::new(BrokenLog));
        let err = service
            .subscribe(Some("a@example.com"))
            .await
            .expect_err("storage");
        assert!(matches!(err, SubscribeError::Storage(_)));
    }
}
