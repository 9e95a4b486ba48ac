use pairmatch_runtime::FeedbackService;
use std::io::Write;

/// Rings the terminal bell on a mismatch when enabled.
#[derive(Copy, Clone, Debug)]
pub struct TerminalFeedback {
    pub bell: bool,
}

impl FeedbackService for TerminalFeedback {
    fn on_match(&self) {
        log::debug!("feedback: match");
    }

    fn on_mismatch(&self) {
        log::debug!("feedback: mismatch");
        if self.bell {
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(b"\x07").and_then(|()| stderr.flush());
        }
    }
}
