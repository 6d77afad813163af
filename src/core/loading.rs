/// Highest value `advance` may report; only `finish` reaches 1.0
pub const UNFINISHED_CAP: f32 = 0.99;

/// Monotone setup progress in [0, 1] for the loading bar
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadingProgress {
    value: f32,
    finished: bool,
}

impl LoadingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move forward to `fraction`; never goes back and never completes
    pub fn advance(&mut self, fraction: f32) {
        if self.finished || fraction.is_nan() {
            return;
        }
        self.value = self.value.max(fraction.clamp(0.0, UNFINISHED_CAP));
    }

    pub fn finish(&mut self) {
        self.value = 1.0;
        self.finished = true;
    }

    pub fn fraction(&self) -> f32 {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn percent(&self) -> u32 {
        (self.value * 100.0).round() as u32
    }
}

/// Setup steps, run one per displayed frame so the loading bar can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// Offscreen target, depth buffers, uniform buffers
    Targets,
    /// Meshes, instance buffers, pipelines
    Scene,
    /// Debug panels and the first camera update
    Interface,
    Done,
}

impl SetupStage {
    pub fn first() -> Self {
        SetupStage::Targets
    }

    pub fn next(self) -> Self {
        match self {
            SetupStage::Targets => SetupStage::Scene,
            SetupStage::Scene => SetupStage::Interface,
            SetupStage::Interface | SetupStage::Done => SetupStage::Done,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SetupStage::Targets => "Creating render targets",
            SetupStage::Scene => "Building scene",
            SetupStage::Interface => "Preparing interface",
            SetupStage::Done => "Ready",
        }
    }

    /// Record this stage as completed
    pub fn complete(self, progress: &mut LoadingProgress) {
        match self {
            SetupStage::Targets => progress.advance(0.1),
            SetupStage::Scene => progress.advance(0.5),
            SetupStage::Interface | SetupStage::Done => progress.finish(),
        }
    }
}
