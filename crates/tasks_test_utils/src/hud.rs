//! A [`Hud`] implementation that records every call for assertions.

use tasks_core::notify::{AudioCue, Hud, MessageKind};

/// Records messages, cues and refresh calls instead of rendering them.
#[derive(Debug, Default)]
pub struct RecordingHud {
    /// Messages shown, in order.
    pub messages: Vec<(String, MessageKind)>,
    /// Audio cues played, in order.
    pub cues: Vec<AudioCue>,
    /// Task panel refresh count.
    pub task_panel_refreshes: usize,
    /// In-progress panel refresh count.
    pub in_progress_refreshes: usize,
    /// Population display refresh count.
    pub population_refreshes: usize,
}

impl RecordingHud {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether any error message was shown.
    #[must_use]
    pub fn saw_error(&self) -> bool {
        self.messages
            .iter()
            .any(|(_, kind)| *kind == MessageKind::Error)
    }
}

impl Hud for RecordingHud {
    fn show_message(&mut self, text: &str, kind: MessageKind) {
        self.messages.push((text.to_string(), kind));
    }

    fn play_audio(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    fn refresh_task_panel(&mut self) {
        self.task_panel_refreshes += 1;
    }

    fn refresh_in_progress_panel(&mut self) {
        self.in_progress_refreshes += 1;
    }

    fn update_population_display(&mut self) {
        self.population_refreshes += 1;
    }
}
