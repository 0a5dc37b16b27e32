use log::trace;
use popuptip_core::surface::SurfaceProvider;
use popuptip_core::PopupTip;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How a run of messages is laid out on screen.
#[derive(Debug, Clone)]
pub struct TipSequence<'a, O> {
    pub owner: &'a O,
    pub messages: &'a [String],
    pub x: i32,
    pub y: i32,
    pub duration_ms: u64,
    pub interval_ms: u64,
}

/// Shows each message in turn, each replacing the previous tip, and returns
/// once the last one has closed.
pub fn run_sequence<P: SurfaceProvider>(tip: &PopupTip<P>, sequence: &TipSequence<'_, P::Owner>) {
    let Some((last, earlier)) = sequence.messages.split_last() else {
        return;
    };

    for message in earlier {
        tip.show(
            sequence.owner,
            message,
            sequence.x,
            sequence.y,
            sequence.duration_ms,
        );
        thread::sleep(Duration::from_millis(sequence.interval_ms));
    }

    // Registered only now so an earlier tip timing out cannot consume it
    let (closed_tx, closed_rx) = mpsc::channel();
    tip.set_next_close_listener(move || {
        let _ = closed_tx.send(());
    });
    tip.show(
        sequence.owner,
        last,
        sequence.x,
        sequence.y,
        sequence.duration_ms,
    );

    // A timeout from the previous tip may still slip in between registering
    // and showing; whatever it queued says nothing about the last tip.
    while closed_rx.try_recv().is_ok() {
        trace!("Discarding close from a superseded tip");
    }

    loop {
        match closed_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(()) => break,
            Err(_) if !tip.is_showing() => break,
            Err(mpsc::RecvTimeoutError::Disconnected) => thread::sleep(Duration::from_millis(50)),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popuptip_core::surface::mock::MockSurfaceProvider;
    use std::time::Instant;

    fn messages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_waits_for_last_tip_to_time_out() {
        let tip = PopupTip::new(MockSurfaceProvider::new()).unwrap();
        let owner = "terminal".to_string();
        let messages = messages(&["first", "second"]);
        let sequence = TipSequence {
            owner: &owner,
            messages: &messages,
            x: 0,
            y: 0,
            duration_ms: 20,
            interval_ms: 100,
        };

        let start = Instant::now();
        run_sequence(&tip, &sequence);

        // The first tip closed by timeout during the interval; returning must
        // still wait for the second one.
        assert!(start.elapsed() >= Duration::from_millis(120));
        assert!(!tip.is_showing());
        let surfaces = tip.provider().surfaces();
        assert_eq!(surfaces.len(), 2);
        assert!(surfaces.iter().all(|s| !s.visible && s.hide_count == 1));
    }

    #[test]
    fn test_replaced_tips_do_not_end_sequence() {
        let tip = PopupTip::new(MockSurfaceProvider::new()).unwrap();
        let owner = "terminal".to_string();
        let messages = messages(&["a", "b", "c"]);
        let sequence = TipSequence {
            owner: &owner,
            messages: &messages,
            x: 5,
            y: 6,
            duration_ms: 10_000,
            interval_ms: 10,
        };

        let waiter = thread::scope(|scope| {
            let handle = scope.spawn(|| run_sequence(&tip, &sequence));
            thread::sleep(Duration::from_millis(150));
            assert!(!handle.is_finished());
            assert_eq!(tip.current_text().as_deref(), Some("c"));
            tip.hide();
            handle.join()
        });

        assert!(waiter.is_ok());
        assert!(tip.provider().visible().is_empty());
    }

    #[test]
    fn test_empty_sequence_returns() {
        let tip = PopupTip::new(MockSurfaceProvider::new()).unwrap();
        let owner = "terminal".to_string();
        let sequence = TipSequence {
            owner: &owner,
            messages: &[],
            x: 0,
            y: 0,
            duration_ms: 100,
            interval_ms: 100,
        };
        run_sequence(&tip, &sequence);
        assert!(tip.provider().events().is_empty());
    }
}
