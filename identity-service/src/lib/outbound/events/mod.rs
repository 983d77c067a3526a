pub mod producer;

pub use producer::KafkaEventNotifier;
