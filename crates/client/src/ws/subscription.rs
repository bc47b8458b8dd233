//! One relay connection per (topic, user), using tokio-tungstenite.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use greenworld_shared::{CableCommand, InboundFrame};
use tokio::sync::{oneshot, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::topic::Topic;

/// Connection state of a subscription
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Closed,
    Failed { reason: String },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    /// The connection task has ended.
    pub fn is_finished(&self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Failed { .. })
    }
}

type Handler<E> = Box<dyn FnMut(E) + Send>;
type HandlerSlot<E> = Arc<Mutex<Option<Handler<E>>>>;

/// A live subscription to one relay topic for one user.
///
/// Dropping it closes the connection. After [`Subscription::close`] returns
/// the handler is never called again. Do not call `close` from inside the
/// handler.
///
/// The handler runs on the connection task while holding the delivery lock,
/// and `close` waits on that lock. Handlers must not block or do slow work:
/// hand the event off (push into a store, send on a channel) and return.
///
/// There is no reconnect: once the connection drops, the subscription stays
/// closed until the owner activates a new one.
pub struct Subscription<T: Topic> {
    subject: u64,
    handler: HandlerSlot<T::Event>,
    shutdown: Option<oneshot::Sender<()>>,
    state: watch::Receiver<ConnectionState>,
    _topic: PhantomData<T>,
}

impl<T: Topic> Subscription<T> {
    /// Open a connection to `url` and subscribe to `T::CHANNEL` for `subject`.
    ///
    /// Returns `None` without connecting when there is no valid subject.
    /// Must be called from within a tokio runtime.
    pub fn activate(
        url: impl Into<String>,
        subject: Option<u64>,
        handler: impl FnMut(T::Event) + Send + 'static,
    ) -> Option<Self> {
        let subject = subject.filter(|id| *id != 0)?;
        let url = url.into();

        let handler: Handler<T::Event> = Box::new(handler);
        let handler: HandlerSlot<T::Event> = Arc::new(Mutex::new(Some(handler)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        tokio::spawn(run_connection::<T>(
            url,
            subject,
            handler.clone(),
            shutdown_rx,
            state_tx,
        ));

        Some(Self {
            subject,
            handler,
            shutdown: Some(shutdown_tx),
            state: state_rx,
            _topic: PhantomData,
        })
    }

    pub fn channel(&self) -> &'static str {
        T::CHANNEL
    }

    pub fn subject(&self) -> u64 {
        self.subject
    }

    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_none()
    }

    /// Close the connection. Safe to call more than once; only the first call
    /// does anything.
    pub fn close(&mut self) {
        let Some(shutdown) = self.shutdown.take() else {
            return;
        };

        // Waits for an in-flight handler call to finish.
        self.handler
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let _ = shutdown.send(());
        tracing::debug!(channel = T::CHANNEL, subject = self.subject, "subscription closing");
    }
}

impl<T: Topic> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Topic> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &T::CHANNEL)
            .field("subject", &self.subject)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

/// Connection task: connect, subscribe, then route frames until closed.
async fn run_connection<T: Topic>(
    url: String,
    subject: u64,
    handler: HandlerSlot<T::Event>,
    mut shutdown: oneshot::Receiver<()>,
    state: watch::Sender<ConnectionState>,
) {
    let connected = tokio::select! {
        _ = &mut shutdown => {
            state.send_replace(ConnectionState::Closed);
            return;
        }
        result = connect_async(url.as_str()) => result,
    };

    let ws_stream = match connected {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            tracing::error!(channel = T::CHANNEL, %url, error = %e, "relay connection failed");
            state.send_replace(ConnectionState::Failed {
                reason: e.to_string(),
            });
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    let frame = match CableCommand::subscribe(T::CHANNEL, subject).and_then(|c| c.to_frame()) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(channel = T::CHANNEL, error = %e, "could not encode subscribe command");
            state.send_replace(ConnectionState::Failed {
                reason: e.to_string(),
            });
            return;
        }
    };

    if let Err(e) = write.send(Message::Text(frame.into())).await {
        tracing::error!(channel = T::CHANNEL, error = %e, "subscribe send failed");
        state.send_replace(ConnectionState::Failed {
            reason: e.to_string(),
        });
        return;
    }

    state.send_replace(ConnectionState::Connected);
    tracing::info!(channel = T::CHANNEL, subject, "connected to relay");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = write.close().await {
                    tracing::debug!(channel = T::CHANNEL, error = %e, "close handshake failed");
                }
                break;
            }
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => route::<T>(text.as_str(), &handler),
                Some(Ok(Message::Close(_))) => {
                    tracing::warn!(channel = T::CHANNEL, "relay closed the connection");
                    break;
                }
                Some(Ok(_)) => {
                    // Ping/pong are answered by tungstenite; binary is not part of the protocol.
                }
                Some(Err(e)) => {
                    tracing::error!(channel = T::CHANNEL, error = %e, "relay read error");
                    break;
                }
                None => {
                    tracing::warn!(channel = T::CHANNEL, "relay stream ended");
                    break;
                }
            }
        }
    }

    state.send_replace(ConnectionState::Closed);
    tracing::info!(channel = T::CHANNEL, subject, "disconnected from relay");
}

/// Decode one text frame and hand topic data to the handler.
fn route<T: Topic>(text: &str, handler: &HandlerSlot<T::Event>) {
    let frame = match InboundFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(channel = T::CHANNEL, error = %e, "discarding malformed frame");
            return;
        }
    };

    match frame {
        InboundFrame::Keepalive => {}
        InboundFrame::SubscriptionAck => {
            tracing::debug!(channel = T::CHANNEL, "subscription confirmed");
        }
        InboundFrame::Control(kind) if kind == "reject_subscription" => {
            tracing::warn!(channel = T::CHANNEL, "subscription rejected by relay");
        }
        InboundFrame::Control(kind) => {
            tracing::debug!(channel = T::CHANNEL, %kind, "control frame");
        }
        InboundFrame::Data(message) => {
            let Some(event) = T::decode(message) else {
                tracing::debug!(channel = T::CHANNEL, "discarding payload of unexpected shape");
                return;
            };
            let mut slot = handler
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(handler) = slot.as_mut() {
                handler(event);
            }
        }
    }
}
