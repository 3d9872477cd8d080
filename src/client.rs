use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use log::{debug, error, info};
use serde::Serialize;
use tokio::sync::watch;

use crate::error::{Error, UNEXPECTED_MESSAGE};
use crate::providers::ChatCompletion;

/// State of one conversational turn, as a UI binds to it.
///
/// `response` and `error` are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationState
{   pub response: Option<String>
  , pub is_pending: bool
  , pub error: Option<String>
}

impl ConversationState
{   /// Nothing shown, nothing in flight
    pub fn cleared() -> Self
    {   ConversationState::default()
    }

    /// A request was issued; previous outcome is dropped
    pub fn begin(self) -> Self
    {   ConversationState
        {   response: None
          , is_pending: true
          , error: None
        }
    }

    /// The request settled with (possibly no) content
    pub fn succeed(self, response: Option<String>) -> Self
    {   ConversationState
        {   response
          , is_pending: false
          , error: None
        }
    }

    /// The request settled with a failure message
    pub fn fail(self, message: String) -> Self
    {   ConversationState
        {   response: None
          , is_pending: false
          , error: Some(message)
        }
    }

    /// Leave the outcome alone, only drop the pending flag
    pub fn settle(self) -> Self
    {   self.with_pending(false)
    }

    /// Keep the outcome, set the pending flag explicitly
    pub fn with_pending(self, is_pending: bool) -> Self
    {   ConversationState
        {   is_pending
          , ..self
        }
    }
}

/// Counts one outstanding turn. Dropping it unfinished (caller
/// dropped the future) clears the pending flag unless another turn
/// is still outstanding.
struct PendingGuard<'a>
{   state: &'a watch::Sender<ConversationState>
  , in_flight: &'a AtomicUsize
  , armed: bool
}

impl<'a> PendingGuard<'a>
{   fn enter(
      state: &'a watch::Sender<ConversationState>
    , in_flight: &'a AtomicUsize
    ) -> Self
    {   in_flight.fetch_add(1, Ordering::SeqCst);
        PendingGuard
        {   state
          , in_flight
          , armed: true
        }
    }

    /// Turns still outstanding once this one is done
    fn leave(&self) -> usize
    {   self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1
    }

    /// Mark the turn settled; returns the number of other turns
    /// still outstanding.
    fn finish(mut self) -> usize
    {   self.armed = false;
        self.leave()
    }
}

impl Drop for PendingGuard<'_>
{   fn drop(&mut self)
    {   if self.armed
        {   let others = self.leave();
            debug!("Turn abandoned before settling, {} still out", others);
            if others == 0
            {   transition(self.state, ConversationState::settle);
            }
        }
    }
}

fn transition(
  state: &watch::Sender<ConversationState>
, f: impl FnOnce(ConversationState) -> ConversationState
)
{   state.send_modify(|s| *s = f(std::mem::take(s)));
}

/// Single-turn conversation over a `ChatCompletion` client.
///
/// Each `send_message` is a fresh one-message exchange; no history
/// is kept. Concurrent turns are not serialised: whichever settles
/// last wins the response or error. `is_pending` stays true while
/// any turn is outstanding, except right after `reset`.
pub struct ConversationController<C>
{   client: C
  , state: watch::Sender<ConversationState>
  , in_flight: AtomicUsize
}

impl<C: ChatCompletion> ConversationController<C>
{   pub fn new(client: C) -> Self
    {   debug!("Creating ConversationController");
        let (state, _) = watch::channel(ConversationState::cleared());
        ConversationController
        {   client
          , state
          , in_flight: AtomicUsize::new(0)
        }
    }

    pub fn client(&self) -> &C
    {   &self.client
    }

    /// Receiver that observes every state transition
    pub fn subscribe(&self) -> watch::Receiver<ConversationState>
    {   self.state.subscribe()
    }

    pub fn snapshot(&self) -> ConversationState
    {   self.state.borrow().clone()
    }

    pub fn response(&self) -> Option<String>
    {   self.state.borrow().response.clone()
    }

    pub fn error(&self) -> Option<String>
    {   self.state.borrow().error.clone()
    }

    pub fn is_pending(&self) -> bool
    {   self.state.borrow().is_pending
    }

    /// Send `text` as a single user message and publish the outcome.
    ///
    /// Blank input is not rejected here; callers are expected to skip
    /// it. Never fails: every failure ends up in `error`.
    pub async fn send_message(&self, text: &str)
    {   debug!("send_message: {} chars", text.len());
        transition(&self.state, ConversationState::begin);
        let guard = PendingGuard::enter(&self.state, &self.in_flight);

        let messages = vec![crate::Message::user(text)];
        let outcome = AssertUnwindSafe(self.client.call(messages))
          .catch_unwind()
          .await
          .unwrap_or_else(|_| {
            error!("Chat client panicked");
            Err(Error::unexpected(UNEXPECTED_MESSAGE))
          });

        match outcome
        {   Ok(response) => {
              let content = response.first_content().map(str::to_string);
              if content.is_none()
              {   info!("Response carried no content");
              }
              let others = guard.finish();
              transition(&self.state, |s| {
                s.succeed(content).with_pending(others > 0)
              });
            }
          , Err(e) => {
              error!("Chat call failed: {}", e);
              let message = e.message().to_string();
              let others = guard.finish();
              transition(&self.state, |s| {
                s.fail(message).with_pending(others > 0)
              });
            }
        }
    }

    /// Forget response, error and pending. Does not cancel an
    /// in-flight call; its result still lands when it settles.
    pub fn reset(&self)
    {   debug!("Resetting conversation state");
        transition(&self.state, |_| ConversationState::cleared());
    }
}
