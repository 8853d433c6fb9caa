use serde::Serialize;

/// Named stages shown while `POST /generate` is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preparing,
    RetrievingBestPractices,
    Generating,
    Finalizing,
    Complete,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Preparing => "Preparing request",
            Stage::RetrievingBestPractices => "Retrieving best practices",
            Stage::Generating => "Generating ad variants",
            Stage::Finalizing => "Finalizing results",
            Stage::Complete => "Complete",
        }
    }

    pub fn percent(self) -> u8 {
        match self {
            Stage::Preparing => 10,
            Stage::RetrievingBestPractices => 30,
            Stage::Generating => 60,
            Stage::Finalizing => 90,
            Stage::Complete => 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Progress {
    pub stage: Option<Stage>,
    pub label: Option<&'static str>,
    pub percent: u8,
    pub error: Option<String>,
}

impl Progress {
    /// Starts a new run at the first stage.
    pub fn start(&mut self) {
        *self = Progress::default();
        self.set(Stage::Preparing);
    }

    /// Moves forward to `stage`. Never moves backwards within a run.
    pub fn advance(&mut self, stage: Stage) {
        if self.stage.map_or(true, |current| stage > current) {
            self.set(stage);
        }
    }

    /// Aborts the run: progress drops to zero and the error is kept for display.
    pub fn fail(&mut self, message: impl Into<String>) {
        *self = Progress {
            error: Some(message.into()),
            ..Progress::default()
        };
    }

    fn set(&mut self, stage: Stage) {
        self.stage = Some(stage);
        self.label = Some(stage.label());
        self.percent = stage.percent();
    }
}
