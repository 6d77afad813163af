/// Where a pass writes its color output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTarget {
    /// Offscreen texture the refractive material samples
    Environment,
    /// The window surface (through the MSAA buffer when enabled)
    Screen,
}

/// One render pass of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPlan {
    pub target: PassTarget,
    pub draw_backdrop: bool,
    pub draw_refractive: bool,
    /// Upload the current IOR values before this pass
    pub upload_refraction: bool,
}

/// The two passes of every frame, in submission order
///
/// The environment pass renders the scene with the refractive mesh hidden,
/// the screen pass renders it again with the mesh shown so it can sample
/// what the first pass produced.
pub fn plan_frame() -> [PassPlan; 2] {
    [
        PassPlan {
            target: PassTarget::Environment,
            draw_backdrop: true,
            draw_refractive: false,
            upload_refraction: false,
        },
        PassPlan {
            target: PassTarget::Screen,
            draw_backdrop: true,
            draw_refractive: true,
            upload_refraction: true,
        },
    ]
}

/// What a pass actually drew
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub target: PassTarget,
    pub backdrop_instances: u32,
    pub refractive_drawn: bool,
}

/// Record of one rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub passes: Vec<PassReport>,
    /// IOR values written before the screen pass
    pub iors: Option<[f32; 3]>,
}

impl FrameReport {
    pub fn new() -> Self {
        Self {
            passes: Vec::with_capacity(2),
            iors: None,
        }
    }

    /// Number of passes that drew the refractive mesh
    pub fn refractive_draws(&self) -> usize {
        self.passes.iter().filter(|p| p.refractive_drawn).count()
    }

    pub fn pass(&self, target: PassTarget) -> Option<&PassReport> {
        self.passes.iter().find(|p| p.target == target)
    }
}

impl Default for FrameReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_pass_comes_first_without_the_mesh() {
        let [env, screen] = plan_frame();
        assert_eq!(env.target, PassTarget::Environment);
        assert!(!env.draw_refractive);
        assert!(env.draw_backdrop);

        assert_eq!(screen.target, PassTarget::Screen);
        assert!(screen.draw_refractive);
        assert!(screen.upload_refraction);
    }

    #[test]
    fn refractive_mesh_in_exactly_one_pass() {
        let drawn = plan_frame().iter().filter(|p| p.draw_refractive).count();
        assert_eq!(drawn, 1);
    }

    #[test]
    fn report_lookup_by_target() {
        let mut report = FrameReport::new();
        report.passes.push(PassReport {
            target: PassTarget::Screen,
            backdrop_instances: 49,
            refractive_drawn: true,
        });
        assert_eq!(report.refractive_draws(), 1);
        assert!(report.pass(PassTarget::Environment).is_none());
        assert_eq!(report.pass(PassTarget::Screen).map(|p| p.backdrop_instances), Some(49));
    }
}
