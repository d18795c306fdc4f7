use std::fmt::Display;

/// The step a `for` loop applies to its induction register each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Inc,
    Dec,
}

impl Display for Update {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Update::Inc => "++",
            Update::Dec => "--",
        })
    }
}
