//! Provider abstraction for the recommendation orchestrator.

use super::AdvisorError;

/// A black-box text-completion provider (allows mocking in tests).
///
/// Both provider kinds — content generation and JSON structuring — speak this
/// interface; they differ only in endpoint tuning and in the prompt they are
/// given. Calls block until the provider answers or times out.
pub trait CompletionClient {
    /// Send one prompt, get the completion text back.
    fn complete(&self, prompt: &str) -> Result<String, AdvisorError>;

    /// Short label used in logs and error messages.
    fn name(&self) -> &str;
}

/// Shared handles count as clients, so a caller can keep a reference to a
/// provider (e.g. a call-counting mock) after handing it to the orchestrator.
impl<T: CompletionClient + ?Sized> CompletionClient for std::sync::Arc<T> {
    fn complete(&self, prompt: &str) -> Result<String, AdvisorError> {
        (**self).complete(prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
