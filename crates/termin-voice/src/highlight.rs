//! Pulse animation drawing attention to an element.
//!
//! One worker task owns every animation. Requests are queued over an mpsc
//! channel and run strictly one after another: the next element is only
//! touched after the previous one has had its original style restored.

use crate::error::VoiceError;
use crate::page::{ElementHandle, ElementStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

const HIGHLIGHT_SHADOW: &str =
    "0 0 0 4px rgba(76, 217, 100, 0.8), 0 0 30px rgba(76, 217, 100, 0.5)";
const PULSE_SHADOW: &str = "0 0 0 8px rgba(76, 217, 100, 0.4), 0 0 40px rgba(76, 217, 100, 0.3)";
const HIGHLIGHT_TRANSITION: &str = "all 0.3s ease";
const HIGHLIGHT_Z_INDEX: &str = "10000";

/// Queue depth before callers start waiting to enqueue.
const QUEUE_CAPACITY: usize = 16;

/// Timing of the highlight sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightTiming {
    /// Wait after scrolling before the style is applied.
    pub settle: Duration,
    /// Length of each half of a pulse.
    pub pulse_half: Duration,
    pub pulses: u32,
    /// How long the highlight stays after the last pulse.
    pub hold: Duration,
}

impl Default for HighlightTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            pulse_half: Duration::from_millis(300),
            pulses: 3,
            hold: Duration::from_millis(3000),
        }
    }
}

impl HighlightTiming {
    /// Time from the start of a sequence until the style is restored.
    pub fn total(&self) -> Duration {
        self.settle + self.pulse_half * (self.pulses * 2) + self.hold
    }
}

struct HighlightJob {
    handle: Arc<dyn ElementHandle>,
    pulsed: oneshot::Sender<()>,
}

impl std::fmt::Debug for HighlightJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightJob")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Handle to the highlight worker. Cloning shares the same queue.
#[derive(Debug, Clone)]
pub struct Highlighter {
    tx: mpsc::Sender<HighlightJob>,
}

impl Highlighter {
    /// Starts the worker on the current tokio runtime. It exits once every
    /// `Highlighter` clone is dropped and the queue has drained.
    pub fn spawn(timing: HighlightTiming) -> Self {
        let (tx, mut rx) = mpsc::channel::<HighlightJob>(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                run(&job.handle, timing, job.pulsed).await;
            }
            tracing::debug!("highlight worker stopped");
        });

        Self { tx }
    }

    /// Queues a highlight and waits until its pulses have finished. The
    /// original style is restored later by the worker.
    pub async fn highlight(&self, handle: Arc<dyn ElementHandle>) -> Result<(), VoiceError> {
        let (pulsed, done) = oneshot::channel();
        self.tx
            .send(HighlightJob { handle, pulsed })
            .await
            .map_err(|_| VoiceError::Highlight("highlight worker is not running".to_string()))?;
        done.await
            .map_err(|_| VoiceError::Highlight("highlight was dropped".to_string()))
    }
}

async fn run(handle: &Arc<dyn ElementHandle>, timing: HighlightTiming, pulsed: oneshot::Sender<()>) {
    handle.scroll_into_view();
    sleep(timing.settle).await;

    let original = handle.style();
    let highlighted = ElementStyle {
        box_shadow: HIGHLIGHT_SHADOW.to_string(),
        transition: HIGHLIGHT_TRANSITION.to_string(),
        z_index: HIGHLIGHT_Z_INDEX.to_string(),
    };
    let pulse = ElementStyle {
        box_shadow: PULSE_SHADOW.to_string(),
        ..highlighted.clone()
    };

    handle.set_style(&highlighted);
    for _ in 0..timing.pulses {
        sleep(timing.pulse_half).await;
        handle.set_style(&pulse);
        sleep(timing.pulse_half).await;
        handle.set_style(&highlighted);
    }

    // The caller may have stopped waiting; the restore still happens.
    let _ = pulsed.send(());

    sleep(timing.hold).await;
    handle.set_style(&original);
    tracing::debug!(element = ?handle, "highlight restored");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementEvent, TracedElement};
    use tokio::time::Instant;

    #[test]
    fn default_timing_total() {
        assert_eq!(HighlightTiming::default().total(), Duration::from_millis(5300));
    }

    #[tokio::test(start_paused = true)]
    async fn sequence_pulses_then_restores() {
        let element = TracedElement::new("search");
        let original = ElementStyle {
            box_shadow: "none".to_string(),
            ..Default::default()
        };
        element.set_style(&original);

        let highlighter = Highlighter::spawn(HighlightTiming::default());
        let started = Instant::now();
        highlighter.highlight(element.clone()).await.unwrap();
        // settle + 3 * (300 + 300)
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(2350), "{elapsed:?}");
        assert_eq!(element.style().box_shadow, HIGHLIGHT_SHADOW);

        sleep(Duration::from_millis(3001)).await;
        assert_eq!(element.style(), original);

        let events = element.events();
        assert_eq!(events[1], ElementEvent::Scrolled);
        let pulses = events
            .iter()
            .filter(|e| matches!(e, ElementEvent::Styled(s) if s.box_shadow == PULSE_SHADOW))
            .count();
        assert_eq!(pulses, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn requests_are_serialized() {
        let first = TracedElement::new("first");
        let second = TracedElement::new("second");
        let highlighter = Highlighter::spawn(HighlightTiming::default());

        let started = Instant::now();
        let h1 = highlighter.clone();
        let f1 = first.clone();
        let a = tokio::spawn(async move { h1.highlight(f1).await });
        let h2 = highlighter.clone();
        let s2 = second.clone();
        let b = tokio::spawn(async move { h2.highlight(s2).await });

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // The second sequence starts after the first restore (5300 ms).
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(5300 + 2300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(5300 + 2400), "{elapsed:?}");
        let first_restored = first.events().last().cloned();
        assert_eq!(first_restored, Some(ElementEvent::Styled(ElementStyle::default())));
    }
}
