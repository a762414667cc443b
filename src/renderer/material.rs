use super::context::{ProgramId, RenderArgs};

/// Shader/GPU state bundle shared by a run of draw commands.
///
/// The canvas calls `on_begin_render` when a run of commands using this
/// material starts and `on_end_render` once when the run ends, however many
/// commands the run contains.
pub trait Material {
    fn on_begin_render(&self, args: &mut RenderArgs<'_>);
    fn on_end_render(&self, args: &mut RenderArgs<'_>);
}

/// A material that only selects a program.
#[derive(Debug, Clone)]
pub struct ProgramMaterial {
    program: ProgramId,
    label: &'static str,
}

impl ProgramMaterial {
    pub fn new(program: ProgramId) -> Self {
        Self {
            program,
            label: "program",
        }
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }
}

impl Material for ProgramMaterial {
    fn on_begin_render(&self, args: &mut RenderArgs<'_>) {
        log::trace!("Begin material run: {} ({:?})", self.label, self.program);
        args.context.use_program(self.program);
    }

    fn on_end_render(&self, _args: &mut RenderArgs<'_>) {
        log::trace!("End material run: {}", self.label);
    }
}
