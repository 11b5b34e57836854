//! Integration tests for the turn pipeline (chunking -> synthesis -> playback)
//!
//! These exercise the completion barrier, cancellation, failure
//! swallowing, and the end-to-end single-fragment scenario.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use tokio::time::timeout;

use voice_assistant_core::{AudioFragment, Error, PlaybackSink, Result, SynthesisEngine};
use voice_assistant_llm::{DeltaStream, GenerationEvent, LlmBackend, LlmError};
use voice_assistant_pipeline::TurnPipeline;

const SAMPLE_RATE: u32 = 16000;
const SAMPLES_PER_CHAR: usize = 10;

/// Synthesizer producing silence proportional to the text length.
struct CountingSynth {
    calls: Arc<AtomicUsize>,
}

impl SynthesisEngine for CountingSynth {
    fn synthesize(&self, text: &str) -> Result<AudioFragment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let samples = vec![0.0f32; text.chars().count() * SAMPLES_PER_CHAR];
        Ok(AudioFragment::new(samples, SAMPLE_RATE))
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
}

/// Synthesizer that fails on every fragment.
struct FailingSynth {
    calls: Arc<AtomicUsize>,
}

impl SynthesisEngine for FailingSynth {
    fn synthesize(&self, _text: &str) -> Result<AudioFragment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Synthesis("engine exploded".to_string()))
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
}

/// Synthesizer that blocks inside the engine call until released.
struct GatedSynth {
    calls: Arc<AtomicUsize>,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl SynthesisEngine for GatedSynth {
    fn synthesize(&self, text: &str) -> Result<AudioFragment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (lock, cvar) = &*self.gate;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
        Ok(AudioFragment::new(
            vec![0.0f32; text.chars().count() * SAMPLES_PER_CHAR],
            SAMPLE_RATE,
        ))
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }
}

fn open_gate(gate: &Arc<(Mutex<bool>, Condvar)>) {
    let (lock, cvar) = &**gate;
    *lock.lock().unwrap() = true;
    cvar.notify_all();
}

/// Sink recording the sample count of every played fragment.
struct RecordingSink {
    played: Arc<Mutex<Vec<usize>>>,
}

impl PlaybackSink for RecordingSink {
    fn play(&self, fragment: &AudioFragment) -> Result<()> {
        self.played.lock().unwrap().push(fragment.len());
        Ok(())
    }
}

/// Sink that holds each fragment for a fixed wall-clock time, counting
/// playback onsets as they start.
struct SlowSink {
    played: Arc<Mutex<Vec<usize>>>,
    onsets: Arc<AtomicUsize>,
    delay: Duration,
}

impl PlaybackSink for SlowSink {
    fn play(&self, fragment: &AudioFragment) -> Result<()> {
        self.onsets.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.played.lock().unwrap().push(fragment.len());
        Ok(())
    }
}

/// Backend replaying a fixed list of deltas, then finishing.
struct ScriptedBackend {
    deltas: Vec<&'static str>,
}

#[async_trait::async_trait]
impl LlmBackend for ScriptedBackend {
    async fn begin_stream(&self, _utterance: &str) -> std::result::Result<DeltaStream, LlmError> {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        let deltas: Vec<String> = self.deltas.iter().map(|d| d.to_string()).collect();
        tokio::spawn(async move {
            for delta in deltas {
                if tx.send(GenerationEvent::Delta(delta)).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(GenerationEvent::Finished).await;
        });
        Ok(rx)
    }
}

/// Backend whose stream dies mid-reply without a finish marker.
struct BrokenBackend;

#[async_trait::async_trait]
impl LlmBackend for BrokenBackend {
    async fn begin_stream(&self, _utterance: &str) -> std::result::Result<DeltaStream, LlmError> {
        let (tx, rx) = tokio::sync::mpsc::channel(16);
        tokio::spawn(async move {
            let _ = tx.send(GenerationEvent::Delta("Сейчас расскажу. А".to_string())).await;
            // Channel closes here: transport broke
        });
        Ok(rx)
    }
}

#[tokio::test]
async fn test_end_to_end_weather_turn() {
    let synth_calls = Arc::new(AtomicUsize::new(0));
    let played = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TurnPipeline::spawn(
        CountingSynth {
            calls: synth_calls.clone(),
        },
        RecordingSink {
            played: played.clone(),
        },
        200,
    );

    let llm = ScriptedBackend {
        deltas: vec!["Сегодня ", "солнечно. "],
    };
    pipeline.accept_utterance(&llm, "какая погода").await.unwrap();

    timeout(Duration::from_secs(1), pipeline.wait_for_turn_complete())
        .await
        .expect("turn must complete");

    // Exactly one fragment through both stages, counter back at zero
    assert_eq!(synth_calls.load(Ordering::SeqCst), 1);
    let played = played.lock().unwrap().clone();
    assert_eq!(played, vec!["Сегодня солнечно.".chars().count() * SAMPLES_PER_CHAR]);
    assert_eq!(pipeline.in_flight(), 0);

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_greetings_play_in_order() {
    let played = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TurnPipeline::spawn(
        CountingSynth {
            calls: Arc::new(AtomicUsize::new(0)),
        },
        RecordingSink {
            played: played.clone(),
        },
        200,
    );

    pipeline.enqueue_spoken_message("ab");
    pipeline.enqueue_spoken_message("abcd");
    pipeline.enqueue_spoken_message("abcdef");

    timeout(Duration::from_secs(1), pipeline.wait_for_turn_complete())
        .await
        .expect("greetings must finish");

    let played = played.lock().unwrap().clone();
    assert_eq!(
        played,
        vec![2 * SAMPLES_PER_CHAR, 4 * SAMPLES_PER_CHAR, 6 * SAMPLES_PER_CHAR]
    );

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_synthesis_failure_does_not_hang_the_barrier() {
    let synth_calls = Arc::new(AtomicUsize::new(0));
    let played = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TurnPipeline::spawn(
        FailingSynth {
            calls: synth_calls.clone(),
        },
        RecordingSink {
            played: played.clone(),
        },
        200,
    );

    pipeline.enqueue_spoken_message("раз");
    pipeline.enqueue_spoken_message("два");

    timeout(Duration::from_secs(1), pipeline.wait_for_turn_complete())
        .await
        .expect("dropped fragments must still clear the barrier");

    assert_eq!(synth_calls.load(Ordering::SeqCst), 2);
    assert!(played.lock().unwrap().is_empty());

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_cancel_discards_queued_fragments() {
    let synth_calls = Arc::new(AtomicUsize::new(0));
    let gate = Arc::new((Mutex::new(false), Condvar::new()));
    let played = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TurnPipeline::spawn(
        GatedSynth {
            calls: synth_calls.clone(),
            gate: gate.clone(),
        },
        RecordingSink {
            played: played.clone(),
        },
        200,
    );

    pipeline.enqueue_spoken_message("первый");
    pipeline.enqueue_spoken_message("второй");
    pipeline.enqueue_spoken_message("третий");

    // Wait for the worker to take the first fragment into the engine
    while synth_calls.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    pipeline.cancel_turn();
    assert_eq!(pipeline.in_flight(), 0);

    // The fragment already inside the engine finishes; the two queued
    // ones never reach it.
    open_gate(&gate);
    pipeline.shutdown().await;
    assert_eq!(synth_calls.load(Ordering::SeqCst), 1);
    assert!(played.lock().unwrap().len() <= 1);
}

#[tokio::test]
async fn test_preemption_barrier_waits_for_new_turn_speech() {
    let onsets = Arc::new(AtomicUsize::new(0));
    let played = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TurnPipeline::spawn(
        CountingSynth {
            calls: Arc::new(AtomicUsize::new(0)),
        },
        SlowSink {
            played: played.clone(),
            onsets: onsets.clone(),
            delay: Duration::from_millis(300),
        },
        200,
    );

    let first = ScriptedBackend {
        deltas: vec!["Первый ответ. "],
    };
    pipeline.accept_utterance(&first, "раз").await.unwrap();

    // Let the first fragment reach the device
    while onsets.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Pre-empt while it is still mid-playback
    let second = ScriptedBackend {
        deltas: vec!["Второй. "],
    };
    pipeline.accept_utterance(&second, "два").await.unwrap();

    timeout(Duration::from_secs(2), pipeline.wait_for_turn_complete())
        .await
        .expect("new turn must complete");

    // The pre-empted fragment finished on the device, but its late
    // completion must not have opened the barrier: by the time the
    // wait returns, the new turn's fragment has played as well.
    assert_eq!(played.lock().unwrap().len(), 2);
    assert_eq!(pipeline.in_flight(), 0);

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_broken_stream_aborts_but_partial_reply_plays() {
    let played = Arc::new(Mutex::new(Vec::new()));
    let pipeline = TurnPipeline::spawn(
        CountingSynth {
            calls: Arc::new(AtomicUsize::new(0)),
        },
        RecordingSink {
            played: played.clone(),
        },
        200,
    );

    let result = pipeline.accept_utterance(&BrokenBackend, "вопрос").await;
    assert!(result.is_err());

    // "Сейчас расскажу." was complete before the transport broke and
    // still plays; the dangling "А" is flushed as the tail fragment.
    timeout(Duration::from_secs(1), pipeline.wait_for_turn_complete())
        .await
        .expect("partial reply must still complete");
    assert_eq!(played.lock().unwrap().len(), 2);

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_terminates_workers() {
    let pipeline = TurnPipeline::spawn(
        CountingSynth {
            calls: Arc::new(AtomicUsize::new(0)),
        },
        RecordingSink {
            played: Arc::new(Mutex::new(Vec::new())),
        },
        200,
    );

    timeout(Duration::from_secs(1), pipeline.shutdown())
        .await
        .expect("shutdown must join both workers");
}
