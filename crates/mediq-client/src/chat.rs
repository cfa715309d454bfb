//! `POST /chat/message`.

use mediq_core::entities::{ChatRequest, ChatResponse};

use crate::http::check_response;
use crate::{AuthStyle, BackendClient, ClientError, SessionContext};

impl BackendClient {
    /// Send one chat turn, cookie auth.
    ///
    /// A resumed turn carries the `interrupt_id` and `resume_value` from the
    /// request untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failure, a non-success status, or
    /// a body that is not a chat response.
    pub async fn send_chat(
        &self,
        ctx: &SessionContext,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ClientError> {
        tracing::debug!(resume = request.is_resume(), "sending chat turn");
        let builder = self.authorized(
            self.http.post(self.url("/chat/message")).json(request),
            ctx,
            AuthStyle::Cookie,
        );
        let resp = check_response(builder.send().await?).await?;
        Ok(resp.json().await?)
    }
}
