pub mod context;
pub mod detection;
pub mod dispatcher;
pub mod notifications;
pub mod timers;

// Re-exports for convenience
pub use context::{AppConfig, AppConfigExt, ConfigError};
pub use detection::{DetectionEngine, DetectionError, DetectionEvent, Scorer, Template};
pub use dispatcher::{
    DispatchError, Dispatcher, DispatcherHandle, DisplaySink, RegistrySnapshot, TimerStatus,
    VisualState,
};
pub use notifications::{Delivery, DeliveryError, LogDelivery, NotificationSink};
pub use timers::{CountdownTimer, TimerError, TimerRegistry, TimerState, TimerSummary};
