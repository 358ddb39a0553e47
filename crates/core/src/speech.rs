use anyhow::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Error code the capability reports when it heard nothing for a while.
/// Capture continues through it.
pub const NO_SPEECH: &str = "no-speech";

// The `SpeechCapability` trait is the seam between the capture state machine
// and whatever continuous recognition the platform provides. The runtime
// calls `start`/`stop` through the engine and feeds the capability's events
// back in through `SpeechCaptureEngine::handle_event`, so tests can drive
// the whole machine with a `MockSpeechCapability` and hand-built events.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SpeechCapability {
    async fn start(&mut self) -> Result<()>;
    async fn stop(&mut self) -> Result<()>;
}

/// A recognized piece of speech. Final segments will not be revised by the
/// capability; interim segments are provisional and replaced wholesale on
/// each result event.
#[derive(Debug, Clone)]
pub struct RecognizedSegment {
    pub text: String,
    pub is_final: bool,
}

impl RecognizedSegment {
    pub fn final_segment(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Events the capability delivers while a session is live. Within one
/// session they arrive in delivery order and `Ended` is always last.
#[derive(Debug)]
pub enum SpeechEvent {
    Started,
    Result(Vec<RecognizedSegment>),
    Error(String),
    Ended,
}

#[derive(Debug, PartialEq)]
enum CaptureState {
    Idle,
    Listening,
}

/// Transcript state for one start→stop cycle. A new `start()` discards any
/// previous session; the stop flag lives here, on the session itself, so
/// event handlers always read the current user intent.
#[derive(Debug, Default)]
struct RecordingSession {
    final_text: String,
    interim_text: String,
    intentionally_stopped: bool,
}

/// Wraps a continuous, possibly spontaneously-terminating recognition
/// capability into a clean start/stop state machine that yields exactly one
/// finalized transcript per user-intended recording session.
///
/// Constructed without a capability the engine reports itself unsupported
/// and `start`/`stop` become no-ops; voice input is disabled but nothing
/// else is affected.
pub struct SpeechCaptureEngine {
    capability: Option<Box<dyn SpeechCapability + Send>>,
    session: Option<RecordingSession>,
    state: CaptureState,
}

impl SpeechCaptureEngine {
    pub fn new(capability: Option<Box<dyn SpeechCapability + Send>>) -> Self {
        if capability.is_none() {
            tracing::warn!("speech capability unavailable; voice input disabled");
        }
        Self {
            capability,
            session: None,
            state: CaptureState::Idle,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.capability.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.intentionally_stopped)
    }

    /// The transcript shown while listening: accumulated finals plus the
    /// volatile interim buffer, trimmed.
    pub fn live_transcript(&self) -> String {
        match &self.session {
            Some(session) => format!("{}{}", session.final_text, session.interim_text)
                .trim()
                .to_string(),
            None => String::new(),
        }
    }

    /// Begins a new recording session. A no-op while already listening, and
    /// a start failure is logged and leaves the engine idle.
    pub async fn start(&mut self) {
        let Some(capability) = self.capability.as_mut() else {
            return;
        };
        if self.state == CaptureState::Listening {
            return;
        }
        self.session = Some(RecordingSession::default());
        self.state = CaptureState::Listening;
        if let Err(e) = capability.start().await {
            tracing::warn!("failed to start speech capture: {e:?}");
            self.session = None;
            self.state = CaptureState::Idle;
        }
    }

    /// Requests the end of the current session. The transcript is not
    /// flushed here: the capability may still deliver a final segment
    /// before its terminal end event, which carries the emission.
    pub async fn stop(&mut self) {
        let Some(capability) = self.capability.as_mut() else {
            return;
        };
        if self.state != CaptureState::Listening {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.intentionally_stopped = true;
        }
        if let Err(e) = capability.stop().await {
            tracing::warn!("failed to stop speech capture: {e:?}");
        }
    }

    /// Feeds one capability event through the state machine. Returns the
    /// finalized transcript on the terminal flush of an intentionally
    /// stopped session, `None` in every other case. Internal failures are
    /// logged here and never propagated.
    pub async fn handle_event(&mut self, event: SpeechEvent) -> Option<String> {
        match event {
            SpeechEvent::Started => {
                tracing::debug!("speech capture started");
                None
            }
            SpeechEvent::Result(segments) => {
                self.on_result(segments);
                None
            }
            SpeechEvent::Error(code) => {
                self.on_error(&code);
                None
            }
            SpeechEvent::Ended => self.on_ended().await,
        }
    }

    fn on_result(&mut self, segments: Vec<RecognizedSegment>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        // Finals accumulate across events (and across spontaneous
        // restarts); the interim buffer is rebuilt on every event.
        let mut interim = String::new();
        for segment in segments {
            if segment.is_final {
                session.final_text.push_str(&segment.text);
                session.final_text.push(' ');
            } else {
                interim.push_str(&segment.text);
            }
        }
        session.interim_text = interim;
    }

    fn on_error(&mut self, code: &str) {
        if code == NO_SPEECH {
            tracing::debug!("capability reported no-speech; capture continues");
            return;
        }
        tracing::warn!("speech capture error: {code}; aborting session");
        self.session = None;
        self.state = CaptureState::Idle;
    }

    async fn on_ended(&mut self) -> Option<String> {
        let intentional = match self.session.as_ref() {
            Some(session) => session.intentionally_stopped,
            // A trailing end after an aborted session carries nothing.
            None => return None,
        };

        if intentional {
            let session = self.session.take()?;
            self.state = CaptureState::Idle;
            let transcript = session.final_text.trim().to_string();
            if transcript.is_empty() {
                tracing::debug!("recording ended with an empty transcript");
                return None;
            }
            tracing::info!("recording finished ({} chars)", transcript.len());
            return Some(transcript);
        }

        // The capability ended on its own, e.g. after a silence timeout.
        // Restart it and keep the accumulated finals.
        tracing::debug!("speech capability ended spontaneously; restarting");
        if let Some(capability) = self.capability.as_mut() {
            if let Err(e) = capability.start().await {
                tracing::warn!("failed to restart speech capture: {e:?}; aborting session");
                self.session = None;
                self.state = CaptureState::Idle;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(mock: MockSpeechCapability) -> SpeechCaptureEngine {
        SpeechCaptureEngine::new(Some(Box::new(mock)))
    }

    fn capability_starting(times: usize) -> MockSpeechCapability {
        let mut mock = MockSpeechCapability::new();
        mock.expect_start()
            .times(times)
            .returning(|| Box::pin(async { Ok(()) }));
        mock
    }

    #[tokio::test]
    async fn live_transcript_combines_finals_and_interim() {
        let mut engine = engine_with(capability_starting(1));
        engine.start().await;

        engine
            .handle_event(SpeechEvent::Result(vec![
                RecognizedSegment::final_segment("hello"),
                RecognizedSegment::interim("wor"),
            ]))
            .await;
        assert_eq!(engine.live_transcript(), "hello wor");

        // The next event re-delivers the revised piece as final; the old
        // interim text must not survive.
        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::final_segment(
                "world",
            )]))
            .await;
        assert_eq!(engine.live_transcript(), "hello world");
    }

    #[tokio::test]
    async fn finals_survive_a_spontaneous_restart_without_duplication() {
        // One start from the user, one silent restart after the capability
        // gives up on its own.
        let mut mock = capability_starting(2);
        mock.expect_stop()
            .times(1)
            .returning(|| Box::pin(async { Ok(()) }));
        let mut engine = engine_with(mock);

        engine.start().await;
        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::final_segment(
                "hello",
            )]))
            .await;

        // Spontaneous end: no emission, accumulator intact.
        let flushed = engine.handle_event(SpeechEvent::Ended).await;
        assert_eq!(flushed, None);
        assert!(engine.is_recording());
        assert_eq!(engine.live_transcript(), "hello");

        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::final_segment(
                "world",
            )]))
            .await;

        engine.stop().await;
        let flushed = engine.handle_event(SpeechEvent::Ended).await;
        assert_eq!(flushed.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn exactly_one_completion_per_stop_cycle() {
        let mut mock = capability_starting(1);
        mock.expect_stop()
            .times(1)
            .returning(|| Box::pin(async { Ok(()) }));
        let mut engine = engine_with(mock);

        engine.start().await;
        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::final_segment(
                "explain this",
            )]))
            .await;
        engine.stop().await;
        assert!(!engine.is_recording());

        let first = engine.handle_event(SpeechEvent::Ended).await;
        assert_eq!(first.as_deref(), Some("explain this"));

        // A stray second end event must not emit again.
        let second = engine.handle_event(SpeechEvent::Ended).await;
        assert_eq!(second, None);
    }

    #[tokio::test]
    async fn empty_transcript_emits_nothing() {
        let mut mock = capability_starting(1);
        mock.expect_stop()
            .times(1)
            .returning(|| Box::pin(async { Ok(()) }));
        let mut engine = engine_with(mock);

        engine.start().await;
        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::interim("um")]))
            .await;
        engine.stop().await;

        // Only interim text was ever heard; nothing final to flush.
        assert_eq!(engine.handle_event(SpeechEvent::Ended).await, None);
        assert_eq!(engine.live_transcript(), "");
    }

    #[tokio::test]
    async fn no_speech_error_is_swallowed() {
        let mut engine = engine_with(capability_starting(1));
        engine.start().await;
        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::final_segment(
                "hello",
            )]))
            .await;

        engine
            .handle_event(SpeechEvent::Error(NO_SPEECH.to_string()))
            .await;
        assert!(engine.is_recording());
        assert_eq!(engine.live_transcript(), "hello");
    }

    #[tokio::test]
    async fn capture_error_aborts_the_session() {
        let mut engine = engine_with(capability_starting(1));
        engine.start().await;
        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::final_segment(
                "hello",
            )]))
            .await;

        engine
            .handle_event(SpeechEvent::Error("network".to_string()))
            .await;
        assert!(!engine.is_recording());
        assert_eq!(engine.live_transcript(), "");

        // The capability still fires its end event afterwards; it must not
        // emit a transcript or restart anything.
        assert_eq!(engine.handle_event(SpeechEvent::Ended).await, None);
    }

    #[tokio::test]
    async fn start_is_idempotent_while_listening() {
        // A second start while listening must not reach the capability.
        let mut engine = engine_with(capability_starting(1));
        engine.start().await;
        engine
            .handle_event(SpeechEvent::Result(vec![RecognizedSegment::final_segment(
                "hello",
            )]))
            .await;
        engine.start().await;
        assert_eq!(engine.live_transcript(), "hello");
    }

    #[tokio::test]
    async fn start_failure_leaves_the_engine_idle() {
        let mut mock = MockSpeechCapability::new();
        mock.expect_start()
            .times(1)
            .returning(|| Box::pin(async { Err(anyhow::anyhow!("not permitted")) }));
        let mut engine = engine_with(mock);

        engine.start().await;
        assert!(!engine.is_recording());
        assert_eq!(engine.handle_event(SpeechEvent::Ended).await, None);
    }

    #[tokio::test]
    async fn missing_capability_disables_voice_input() {
        let mut engine = SpeechCaptureEngine::new(None);
        assert!(!engine.is_supported());

        engine.start().await;
        assert!(!engine.is_recording());
        engine.stop().await;
        assert_eq!(engine.handle_event(SpeechEvent::Ended).await, None);
    }
}
