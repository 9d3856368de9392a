use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use thiserror::Error;

use crate::engine::Snapshot;

/// Failure reported by a [`Listener`]. The engine logs it and carries on.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("receiver disconnected")]
    Disconnected,
}

/// Change-notification sink invoked after every state-affecting operation.
pub trait Listener {
    fn on_change(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError>;
}

impl<F> Listener for F
where
    F: FnMut(&Snapshot) -> Result<(), ListenerError>,
{
    fn on_change(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        self(snapshot)
    }
}

impl Listener for Sender<Snapshot> {
    fn on_change(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        self.send(snapshot.clone())
            .map_err(|_| ListenerError::Disconnected)
    }
}

impl<L: Listener> Listener for Option<L> {
    fn on_change(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        match self {
            Some(listener) => listener.on_change(snapshot),
            None => Ok(()),
        }
    }
}

/// Shares one listener between successive engines (e.g. across a resize).
impl<L: Listener> Listener for Rc<RefCell<L>> {
    fn on_change(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        self.borrow_mut().on_change(snapshot)
    }
}

/// Fans one snapshot out to two listeners; both always run and the first
/// error wins.
impl<A: Listener, B: Listener> Listener for (A, B) {
    fn on_change(&mut self, snapshot: &Snapshot) -> Result<(), ListenerError> {
        let first = self.0.on_change(snapshot);
        let second = self.1.on_change(snapshot);
        first.and(second)
    }
}

/// Listener that ignores every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Listener for Silent {
    fn on_change(&mut self, _snapshot: &Snapshot) -> Result<(), ListenerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crate::engine::Snapshot;

    use super::{Listener, ListenerError, Silent};

    fn sample() -> Snapshot {
        Snapshot::placeholder()
    }

    #[test]
    fn sender_forwards_copies() {
        let (tx, rx) = mpsc::channel();
        let mut listener = tx;

        listener.on_change(&sample()).expect("receiver is alive");

        assert_eq!(rx.try_recv().ok(), Some(sample()));
    }

    #[test]
    fn sender_reports_dropped_receiver() {
        let (tx, rx) = mpsc::channel::<Snapshot>();
        drop(rx);
        let mut listener = tx;

        assert!(matches!(
            listener.on_change(&sample()),
            Err(ListenerError::Disconnected)
        ));
    }

    #[test]
    fn pair_runs_both_even_when_first_fails() {
        let mut seen = 0;
        {
            let failing = |_: &Snapshot| -> Result<(), ListenerError> {
                Err(ListenerError::Disconnected)
            };
            let counting = |_: &Snapshot| -> Result<(), ListenerError> {
                seen += 1;
                Ok(())
            };
            let mut pair = (failing, counting);

            assert!(pair.on_change(&sample()).is_err());
        }

        assert_eq!(seen, 1);
    }

    #[test]
    fn absent_and_silent_listeners_succeed() {
        let mut absent: Option<Silent> = None;

        assert!(absent.on_change(&sample()).is_ok());
        assert!(Silent.on_change(&sample()).is_ok());
    }
}
