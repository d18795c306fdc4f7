use std::collections::HashMap;

use crate::asm::Reg;

/// A stack of lexically-scoped variable-to-register frames, per §9's
/// explicit recommendation ("prefer a lexically-scoped push/pop discipline
/// rather than a flat map keyed by label"). A lookup only ever consults the
/// innermost frame — matching the original's flat-map lookup behavior
/// exactly, which never walked outward either — so this is a pure
/// representation change, not a semantic one.
#[derive(Debug, Default)]
pub struct Scope {
    frames: Vec<HashMap<String, Reg>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn bind(&mut self, name: String, reg: Reg) {
        self.frames
            .last_mut()
            .expect("root frame is never popped")
            .insert(name, reg);
    }

    pub fn lookup(&self, name: &str) -> Option<Reg> {
        self.frames.last().and_then(|frame| frame.get(name).copied())
    }
}
