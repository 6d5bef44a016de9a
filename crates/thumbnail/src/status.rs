//! Elapsed-time status messages shown while a thumbnail request runs.

use docusearch_api_client::ThumbnailAction;

/// Status text after `elapsed` whole seconds of `action`.
pub fn status_text(action: ThumbnailAction, elapsed: u64) -> &'static str {
    match action {
        ThumbnailAction::Upload => match elapsed {
            16.. => "Almost Complete...",
            9.. => "Optimizing Image...",
            4.. => "Processing Image...",
            _ => "Uploading Thumbnail",
        },
        ThumbnailAction::Generate => match elapsed {
            61.. => "This is taking longer than expected...",
            31.. => "Almost there...",
            11.. => "Still working on it...",
            _ => "Thumbnail Generation in Progress",
        },
        ThumbnailAction::Reset => match elapsed {
            16.. => "Almost done...",
            6.. => "Generating default thumbnail...",
            _ => "Resetting thumbnail...",
        },
    }
}

/// Status text once `action` succeeded.
pub fn success_text(action: ThumbnailAction) -> &'static str {
    match action {
        ThumbnailAction::Upload => "Thumbnail Successfully Uploaded!",
        ThumbnailAction::Generate => "Thumbnail Successfully Generated!",
        ThumbnailAction::Reset => "Thumbnail Successfully Reset!",
    }
}

/// Error shown when the server gives no message of its own.
pub fn failure_fallback(action: ThumbnailAction) -> &'static str {
    match action {
        ThumbnailAction::Upload => "Failed to upload thumbnail",
        ThumbnailAction::Generate => "Failed to generate thumbnail",
        ThumbnailAction::Reset => "Failed to reset thumbnail",
    }
}

/// Counts seconds for one running action and reports status changes.
#[derive(Debug, Clone)]
pub struct StatusTicker {
    action: ThumbnailAction,
    elapsed: u64,
}

impl StatusTicker {
    pub fn new(action: ThumbnailAction) -> Self {
        Self { action, elapsed: 0 }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn current(&self) -> &'static str {
        status_text(self.action, self.elapsed)
    }

    /// Advances one second. Returns the new text only when it changed.
    pub fn tick(&mut self) -> Option<&'static str> {
        let before = self.current();
        self.elapsed += 1;
        let after = self.current();
        (after != before).then_some(after)
    }
}
