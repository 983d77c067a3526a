use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;

use crate::config::KafkaConfig;
use crate::domain::identity::events::DomainEvent;
use crate::identity::errors::EventNotifierError;
use crate::identity::ports::EventNotifier;

/// Kafka backed event notifier with single-attempt delivery.
pub struct KafkaEventNotifier {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaEventNotifier {
    /// Create a new Kafka event notifier.
    ///
    /// # Arguments
    /// * `config` - Kafka section of the application configuration
    ///
    /// # Notes:
    /// - `retries=0`: A failed dispatch is not retried
    /// - `message.timeout.ms`: Bounded by the dispatch timeout
    /// - `acks=1`: Leader acknowledgement is enough for best-effort events
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            topic = %config.session_results_topic,
            "Initializing Kafka producer for session migration events"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", config.dispatch_timeout_ms.to_string())
            .set("acks", "1")
            .set("retries", "0")
            .create()?;

        tracing::info!("Kafka producer initialized successfully");

        Ok(Self {
            producer,
            timeout: config.dispatch_timeout(),
        })
    }
}

#[async_trait]
impl EventNotifier for KafkaEventNotifier {
    async fn dispatch(&self, event: &DomainEvent) -> Result<(), EventNotifierError> {
        tracing::debug!(topic = %event.destination, "Publishing event");

        let record: FutureRecord<'_, (), Vec<u8>> =
            FutureRecord::to(&event.destination).payload(&event.payload);

        let delivery = self.producer.send(record, Timeout::After(self.timeout));

        match tokio::time::timeout(self.timeout, delivery).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err((err, _))) => Err(EventNotifierError::PublishFailed(err.to_string())),
            Err(_) => Err(EventNotifierError::Timeout(format!(
                "no delivery report within {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
