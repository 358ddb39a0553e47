use anyhow::Result;
use async_trait::async_trait;
use companion_core::SpeechCapability;

/// Terminal stand-in for a platform recognition capability. Start and stop
/// succeed immediately; the REPL synthesizes the result and end events
/// from typed lines while dictation is active.
pub struct LoopbackDictation;

#[async_trait]
impl SpeechCapability for LoopbackDictation {
    async fn start(&mut self) -> Result<()> {
        tracing::debug!("loopback dictation started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        tracing::debug!("loopback dictation stop requested");
        Ok(())
    }
}
