//! Event notifier: fire-and-forget notifications for the front-end.
//!
//! Callbacks run on one dedicated dispatch thread fed by a channel, so a
//! slow or misbehaving subscriber can delay other subscribers but never the
//! catalog, the ingestion pipeline or the streaming loop. The core does not
//! wait for acknowledgement.

#[cfg(test)]
mod tests;

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::playback::PlaybackState;

#[derive(Debug, Clone)]
pub enum Event {
    /// The set of catalog names changed (a track was recorded, or the
    /// catalog was cleared).
    CatalogChanged,
    /// The playback engine moved between states.
    PlaybackStateChanged {
        old: PlaybackState,
        new: PlaybackState,
    },
    /// A playback failure: a session that could not start, or a stream
    /// that died mid-track.
    PlaybackError { message: String },
}

type Callback = Box<dyn Fn(&Event) + Send + 'static>;

enum DispatchMsg {
    Deliver(Event),
    Shutdown,
}

pub struct Notifier {
    tx: Sender<DispatchMsg>,
    callbacks: Arc<Mutex<Vec<Callback>>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<DispatchMsg>();
        let callbacks: Arc<Mutex<Vec<Callback>>> = Arc::new(Mutex::new(Vec::new()));

        let cbs = callbacks.clone();
        let join = thread::spawn(move || {
            for msg in rx {
                match msg {
                    DispatchMsg::Deliver(event) => {
                        if let Ok(cbs) = cbs.lock() {
                            for cb in cbs.iter() {
                                cb(&event);
                            }
                        }
                    }
                    DispatchMsg::Shutdown => break,
                }
            }
        });

        Self {
            tx,
            callbacks,
            join: Mutex::new(Some(join)),
        }
    }

    /// Register a callback for every future event.
    pub fn subscribe(&self, callback: impl Fn(&Event) + Send + 'static) {
        if let Ok(mut cbs) = self.callbacks.lock() {
            cbs.push(Box::new(callback));
        }
    }

    /// Queue an event for delivery. Never blocks on subscribers.
    pub(crate) fn emit(&self, event: Event) {
        let _ = self.tx.send(DispatchMsg::Deliver(event));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        let _ = self.tx.send(DispatchMsg::Shutdown);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }
}
