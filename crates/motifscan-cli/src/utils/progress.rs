use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use motifscan::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Terminal state shared by every clone of the handler's callback.
struct ScanDisplay {
    bar: ProgressBar,
    phase: &'static str,
    motifs_started: usize,
}

impl ScanDisplay {
    fn begin_phase(&mut self, name: &'static str) {
        self.phase = name;
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_prefix("");
        self.bar.set_style(spinner_style());
        self.bar.set_message(name);
        self.bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    }

    fn begin_pairs(&mut self, total: u64) {
        self.bar.disable_steady_tick();
        self.bar.reset();
        self.bar.set_length(total);
        self.bar.set_style(pairs_style());
        self.bar.set_message(self.phase);
    }

    fn enter_motif(&mut self, motif_id: String) {
        self.motifs_started += 1;
        self.bar.set_prefix(motif_id);
    }

    fn complete_pairs(&self) {
        if let Some(length) = self.bar.length() {
            self.bar.set_position(length);
        }
        self.bar.finish();
    }

    fn complete_phase(&self) {
        self.bar.disable_steady_tick();
        let summary = match self.motifs_started {
            0 => format!("✓ {}", self.phase),
            n => format!("✓ {} ({} motif(s))", self.phase, n),
        };
        self.bar.finish_with_message(summary);
    }

    fn note(&self, text: String) {
        if self.bar.is_finished() {
            self.bar.set_message(text);
        } else {
            self.bar.println(format!("  {}", text));
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("spinner template is valid")
}

fn pairs_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg} {prefix:>10.bold} [{bar:36.cyan/blue}] {pos}/{len} pairs ({elapsed}, {remaining})",
    )
    .expect("pairs template is valid")
    .with_key(
        "remaining",
        |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "~{}s left", state.eta().as_secs());
        },
    )
    .progress_chars("=> ")
}

/// Renders scan progress events on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    display: Arc<Mutex<ScanDisplay>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(spinner_style());
        bar.finish_and_clear();

        Self {
            display: Arc::new(Mutex::new(ScanDisplay {
                bar,
                phase: "",
                motifs_started: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let display = Arc::clone(&self.display);

        Box::new(move |event: Progress| {
            let Ok(mut display) = display.lock() else {
                warn!("Progress display lock is poisoned; dropping event.");
                return;
            };
            match event {
                Progress::PhaseStart { name } => display.begin_phase(name),
                Progress::TaskStart { total_steps } => display.begin_pairs(total_steps),
                Progress::MotifStart { motif_id } => display.enter_motif(motif_id),
                Progress::TaskIncrement => display.bar.inc(1),
                Progress::TaskFinish => display.complete_pairs(),
                Progress::PhaseFinish => display.complete_phase(),
                Progress::Message(text) => display.note(text),
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
