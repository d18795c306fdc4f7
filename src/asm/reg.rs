use std::fmt::Display;

/// The x86-64 general-purpose registers this compiler ever names directly.
/// `Rbx` is the one with a cross-cutting contract (§9): it is the induction
/// register for every `for` loop, kept live across the body on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Rax,
    Rdi,
    Rsi,
    Rdx,
    Rbx,
}

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Reg::Rax => "rax",
            Reg::Rdi => "rdi",
            Reg::Rsi => "rsi",
            Reg::Rdx => "rdx",
            Reg::Rbx => "rbx",
        })
    }
}
