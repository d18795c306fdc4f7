use super::{Call, ForLoop, FunctionDef, IfStatement};

/// A top-level or nested statement. Every node is owned exclusively by its
/// parent — the top-level forest owns roots, `ForLoop`/`IfStatement`/
/// `FunctionDef` bodies own their children — so the AST is a pure tree with
/// no sharing and no cycles (§3 invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Call(Call),
    ForLoop(ForLoop),
    If(IfStatement),
    FnDef(FunctionDef),
}
