//! Training workflow: worker-thread launch, result hand-off, replay ticks.

use super::*;

impl EguiController {
    /// Launch one training run on a worker thread.
    ///
    /// The trigger is disabled while a run is in flight, so a second launch
    /// is refused rather than queued.
    pub fn start_training(&mut self) {
        if self.runtime.training_in_flight() {
            self.set_status("Training already running", StatusTone::Info);
            return;
        }
        let Some(dataset) = self.ui.training.dataset_path.clone() else {
            self.set_status("Select a dataset file first", StatusTone::Error);
            return;
        };
        let bridge = match self.ensure_bridge() {
            Ok(bridge) => bridge,
            Err(err) => {
                self.set_status(format!("Engine unavailable: {err}"), StatusTone::Error);
                return;
            }
        };
        self.persist_settings();

        let epochs = self.ui.training.epochs;
        self.runtime.begin_training();
        self.ui.training.in_flight = true;
        self.set_status(
            format!(
                "Training on {} for {epochs} epochs…",
                self.ui.training.dataset_label
            ),
            StatusTone::Busy,
        );

        let tx = self.runtime.message_sender();
        std::thread::spawn(move || {
            let started = Instant::now();
            let result = bridge.run_training(&dataset, epochs);
            let _ = tx.send(JobMessage::TrainingFinished {
                result,
                elapsed: started.elapsed(),
            });
        });
    }

    /// Drain finished jobs from the worker channel. Called once per frame.
    pub fn poll_background_jobs(&mut self) {
        while let Ok(message) = self.runtime.try_recv_message() {
            match message {
                JobMessage::TrainingFinished { result, elapsed } => {
                    self.runtime.finish_training();
                    self.ui.training.in_flight = false;
                    tracing::info!("Training call finished in {elapsed:.2?}");
                    self.apply_training_outcome(result, Instant::now());
                }
            }
        }
    }

    /// Adopt a finished training call and start (or skip) the replay.
    ///
    /// The successful path performs the buffer swap and the playback start
    /// as one transition: the previous replay is stopped first, so no tick
    /// can observe a half-replaced series.
    pub fn apply_training_outcome(
        &mut self,
        result: Result<TrainingRun, TrainingError>,
        now: Instant,
    ) {
        match result {
            Ok(run) => match self.apply_training_run(run, now) {
                Ok(0) => self.set_status("Training returned no epochs", StatusTone::Warning),
                Ok(len) => {
                    self.set_status(format!("Training complete: replaying {len} epochs"), StatusTone::Info);
                }
                Err(err) => {
                    tracing::warn!("Discarding inconsistent training result: {err}");
                    self.set_status("Engine returned inconsistent metrics; run discarded", StatusTone::Error);
                }
            },
            Err(err) => self.set_status(format!("{err}"), StatusTone::Error),
        }
    }

    fn apply_training_run(&mut self, run: TrainingRun, now: Instant) -> Result<usize, SeriesError> {
        self.clock.stop();
        self.playback = Playback::new();
        self.series.replace(run.accuracy, run.loss)?;
        self.final_accuracy = run.final_accuracy;
        self.accuracy_range = auto_range(self.series.series(SeriesKind::Accuracy))
            .unwrap_or(DEFAULT_ACCURACY_RANGE);
        self.loss_range =
            auto_range(self.series.series(SeriesKind::Loss)).unwrap_or(DEFAULT_LOSS_RANGE);

        let len = self.series.len();
        self.ui.training.progress = 0.0;
        self.ui.training.epoch_label = format!("Epoch: 0/{len}");
        self.playback.start(len);
        if self.playback.is_running() {
            self.clock.start(now);
        } else {
            self.finish_replay();
        }
        Ok(len)
    }

    /// Advance the replay by however many ticks are due at `now`.
    pub fn advance_playback(&mut self, now: Instant) {
        if !self.playback.is_running() {
            return;
        }
        let due = self.clock.due_ticks(now);
        for _ in 0..due {
            let Some(index) = self.playback.tick() else {
                break;
            };
            let accuracy = self
                .series
                .series(SeriesKind::Accuracy)
                .get(index)
                .copied()
                .unwrap_or_default();
            let visible = index + 1;
            self.ui.training.accuracy_readout =
                format!("Current Accuracy: {:.2}%", accuracy * 100.0);
            self.ui.training.epoch_label = format!("Epoch: {visible}/{}", self.playback.len());
            self.ui.training.progress = visible as f32 / self.playback.len().max(1) as f32;
        }
        if self.playback.phase() == Phase::Finished {
            self.clock.stop();
            self.finish_replay();
        }
    }

    /// Switch the readout to the final model accuracy, which may differ
    /// from the last per-epoch sample.
    fn finish_replay(&mut self) {
        self.ui.training.accuracy_readout =
            format!("Final Accuracy: {:.2}%", self.final_accuracy * 100.0);
    }
}
