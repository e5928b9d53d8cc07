//! Text-to-speech delivery for alerts
//!
//! Linux runs an external program (`espeak` by default) to completion per
//! alert. Windows and macOS speak through the system engine via `tts`, waiting
//! for each utterance to finish. Either way alerts never overlap.

use std::process::Command;

use respawn_core::context::NotificationSettings;
use respawn_core::{Delivery, DeliveryError, LogDelivery, NotificationSink};

/// Sink speaking through the platform's backend, or logging only when speech
/// is off or the engine cannot start.
pub fn spawn_sink(settings: &NotificationSettings, speak: bool) -> NotificationSink {
    if !speak || !settings.enabled {
        return NotificationSink::spawn(LogDelivery);
    }
    spawn_speech_sink(settings)
}

#[cfg(target_os = "linux")]
fn spawn_speech_sink(settings: &NotificationSettings) -> NotificationSink {
    NotificationSink::spawn(CommandDelivery::from_settings(settings))
}

#[cfg(not(target_os = "linux"))]
fn spawn_speech_sink(_settings: &NotificationSettings) -> NotificationSink {
    match TtsDelivery::start() {
        Ok(delivery) => NotificationSink::spawn(delivery),
        Err(e) => {
            tracing::warn!(error = %e, "TTS unavailable, alerts will only be logged");
            NotificationSink::spawn(LogDelivery)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandDelivery {
    program: String,
    args: Vec<String>,
}

impl CommandDelivery {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_settings(settings: &NotificationSettings) -> Self {
        Self::new(settings.speech_command.clone(), settings.speech_args.clone())
    }
}

impl Delivery for CommandDelivery {
    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .output()
            .map_err(|source| DeliveryError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DeliveryError::Failed {
                reason: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(not(target_os = "linux"))]
pub use system::TtsDelivery;

#[cfg(not(target_os = "linux"))]
mod system {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use respawn_core::{Delivery, DeliveryError};

    const SPEAKING_POLL: Duration = Duration::from_millis(50);

    type Reply = mpsc::Sender<Result<(), DeliveryError>>;

    /// Speaks through the system engine.
    ///
    /// The engine lives on its own thread; `deliver` hands it the text and
    /// blocks until the utterance has finished playing.
    pub struct TtsDelivery {
        requests: mpsc::Sender<(String, Reply)>,
    }

    impl TtsDelivery {
        pub fn start() -> Result<Self, DeliveryError> {
            let (requests, rx) = mpsc::channel::<(String, Reply)>();
            let (ready_tx, ready_rx) = mpsc::channel();

            thread::Builder::new()
                .name("respawn-tts".to_string())
                .spawn(move || {
                    let mut engine = match tts::Tts::default() {
                        Ok(mut engine) => {
                            let rate = engine.normal_rate();
                            let _ = engine.set_rate(rate);
                            let _ = ready_tx.send(Ok(()));
                            engine
                        }
                        Err(e) => {
                            let _ = ready_tx.send(Err(engine_error(e)));
                            return;
                        }
                    };
                    for (text, reply) in rx {
                        let _ = reply.send(speak(&mut engine, &text));
                    }
                })
                .map_err(|source| DeliveryError::Spawn {
                    program: "respawn-tts".to_string(),
                    source,
                })?;

            ready_rx.recv().map_err(|_| DeliveryError::Failed {
                reason: "TTS thread exited during startup".to_string(),
            })??;

            Ok(Self { requests })
        }
    }

    fn speak(engine: &mut tts::Tts, text: &str) -> Result<(), DeliveryError> {
        engine.speak(text, false).map_err(engine_error)?;
        // Give the backend a moment to report the utterance as started
        thread::sleep(SPEAKING_POLL);
        while engine.is_speaking().map_err(engine_error)? {
            thread::sleep(SPEAKING_POLL);
        }
        Ok(())
    }

    fn engine_error(e: tts::Error) -> DeliveryError {
        DeliveryError::Failed {
            reason: format!("tts: {e}"),
        }
    }

    impl Delivery for TtsDelivery {
        fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
            let (reply, done) = mpsc::channel();
            self.requests
                .send((text.to_string(), reply))
                .map_err(|_| DeliveryError::Failed {
                    reason: "TTS thread stopped".to_string(),
                })?;
            done.recv().map_err(|_| DeliveryError::Failed {
                reason: "TTS thread stopped".to_string(),
            })?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let delivery = CommandDelivery::new("respawn-no-such-speech-program", Vec::new());
        assert!(matches!(
            delivery.deliver("Naga"),
            Err(DeliveryError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_a_failure() {
        let delivery = CommandDelivery::new("false", Vec::new());
        assert!(matches!(
            delivery.deliver("Naga"),
            Err(DeliveryError::Failed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn text_is_passed_as_last_argument() {
        let delivery = CommandDelivery::new("test", vec!["Naga".to_string(), "=".to_string()]);
        assert!(delivery.deliver("Naga").is_ok());
        assert!(delivery.deliver("Orc").is_err());
    }

    #[tokio::test]
    async fn disabled_speech_only_logs() {
        let mut settings = NotificationSettings::default();
        settings.speech_command = "respawn-no-such-speech-program".to_string();
        settings.enabled = false;

        let sink = spawn_sink(&settings, true);
        sink.enqueue("Naga");
        sink.shutdown().await;

        settings.enabled = true;
        let sink = spawn_sink(&settings, false);
        sink.enqueue("Orc");
        sink.shutdown().await;
    }
}
