//! Notification surface for player-facing feedback.
//!
//! The command core never talks to UI widgets or the audio engine; it calls
//! through the [`Hud`] trait, which the composing application implements
//! and injects. The seam keeps validation logic testable without a host.

/// Severity of a player-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Informational message.
    Info,
    /// A command was rejected or an action is unavailable.
    Error,
}

/// Audio cues the command layer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// A task was rejected by the validation gate.
    TaskDeclined,
    /// A task was accepted and enqueued.
    TaskLaunched,
}

/// What the command layer needs from the host's UI and audio.
///
/// All calls are fire-and-forget; implementations decide what refreshing a
/// panel or playing a cue actually means.
pub trait Hud {
    /// Show a player-facing message.
    fn show_message(&mut self, text: &str, kind: MessageKind);

    /// Play an audio cue.
    fn play_audio(&mut self, cue: AudioCue);

    /// Redraw the task panel for the current selection.
    fn refresh_task_panel(&mut self);

    /// Redraw the in-progress task display.
    fn refresh_in_progress_panel(&mut self);

    /// Redraw the population counter.
    fn update_population_display(&mut self);
}

/// A [`Hud`] that ignores everything.
///
/// Used by autonomous callers and headless tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHud;

impl Hud for NullHud {
    fn show_message(&mut self, _text: &str, _kind: MessageKind) {}
    fn play_audio(&mut self, _cue: AudioCue) {}
    fn refresh_task_panel(&mut self) {}
    fn refresh_in_progress_panel(&mut self) {}
    fn update_population_display(&mut self) {}
}
