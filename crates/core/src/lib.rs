//! Core logic for the slide companion viewer: slide navigation, the
//! continuous speech-capture state machine, best-effort slide-change
//! notifications, and the turn-based feedback exchange with the simulated
//! student backend.
//!
//! Remote collaborators (feedback service, slide-change sink, speech
//! capability) are abstracted behind traits so the state machines can be
//! driven with deterministic fakes in tests.

pub mod chat;
pub mod feedback;
pub mod notify;
pub mod profile;
pub mod slides;
pub mod speech;
pub mod viewer;

pub use chat::{ChatMessage, Sender};
pub use feedback::{FeedbackExchange, FeedbackReply, FeedbackService, HttpFeedbackClient};
pub use notify::{HttpSlideChangeSink, NotificationChannel, SlideChangeSink};
pub use profile::StudentProfile;
pub use slides::{Slide, SlideContext, SlideDescriptor};
pub use speech::{RecognizedSegment, SpeechCapability, SpeechCaptureEngine, SpeechEvent};
pub use viewer::{ViewerController, ViewerUIState};
