use std::sync::Arc;

use crate::chat::ChatMessage;
use crate::feedback::{FeedbackExchange, FeedbackService};
use crate::notify::NotificationChannel;
use crate::slides::{Slide, SlideContext};
use crate::speech::{SpeechCaptureEngine, SpeechEvent};

/// Read-only snapshot of the state the UI renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerUIState {
    pub current_slide_index: usize,
    pub is_recording: bool,
    pub is_assistant_loading: bool,
    pub is_chat_panel_open: bool,
}

/// Composition root of the viewer: routes navigation intents into the
/// slide context, finalized transcripts and typed chat into the feedback
/// exchange, and slide transitions into the notification channel. Holds no
/// invariants of its own beyond forwarding calls.
pub struct ViewerController<S> {
    slides: SlideContext,
    engine: SpeechCaptureEngine,
    exchange: FeedbackExchange,
    notifier: NotificationChannel,
    service: Arc<S>,
    chat_panel_open: bool,
}

impl<S> ViewerController<S>
where
    S: FeedbackService + Send + Sync,
{
    pub fn new(
        slides: SlideContext,
        engine: SpeechCaptureEngine,
        notifier: NotificationChannel,
        service: Arc<S>,
    ) -> Self {
        let controller = Self {
            slides,
            engine,
            exchange: FeedbackExchange::new(),
            notifier,
            service,
            chat_panel_open: false,
        };
        // The initial settle counts as a transition.
        controller.notify_current();
        controller
    }

    fn notify_current(&self) {
        if let Some(slide) = self.slides.current() {
            self.notifier
                .slide_changed(self.slides.current_index(), slide);
        }
    }

    pub fn next_slide(&mut self) {
        if self.slides.next() {
            self.notify_current();
        }
    }

    pub fn previous_slide(&mut self) {
        if self.slides.previous() {
            self.notify_current();
        }
    }

    /// Entry point for typed chat input.
    pub async fn send_chat(&mut self, text: &str) {
        self.submit(text).await;
    }

    async fn submit(&mut self, text: &str) {
        let slide_index = self.slides.current_index();
        let remote_id = self
            .slides
            .current()
            .and_then(|slide| slide.remote_url.clone());
        if self.exchange.submit(text, slide_index, remote_id) {
            self.exchange.process_pending(self.service.as_ref()).await;
        }
    }

    pub async fn start_recording(&mut self) {
        self.engine.start().await;
    }

    pub async fn stop_recording(&mut self) {
        self.engine.stop().await;
    }

    /// Routes a capability event through the engine; a finalized transcript
    /// becomes a feedback turn exactly like typed input.
    pub async fn handle_speech_event(&mut self, event: SpeechEvent) {
        if let Some(transcript) = self.engine.handle_event(event).await {
            self.submit(&transcript).await;
        }
    }

    pub fn toggle_chat_panel(&mut self) {
        self.chat_panel_open = !self.chat_panel_open;
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.current()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn chat_log(&self) -> &[ChatMessage] {
        self.exchange.messages()
    }

    pub fn live_transcript(&self) -> String {
        self.engine.live_transcript()
    }

    pub fn voice_input_supported(&self) -> bool {
        self.engine.is_supported()
    }

    pub fn ui_state(&self) -> ViewerUIState {
        ViewerUIState {
            current_slide_index: self.slides.current_index(),
            is_recording: self.engine.is_recording(),
            is_assistant_loading: self.exchange.is_loading(),
            is_chat_panel_open: self.chat_panel_open,
        }
    }
}
