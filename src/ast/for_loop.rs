use super::{Comparison, Node, Update};

/// `for <start> (as <var_name>)? ; <condition> <end> ; <update> { <body> }`.
///
/// An empty body is dropped at parse time (§4.2), so every `ForLoop` that
/// reaches the code generator has a non-empty `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForLoop {
    pub var_name: Option<String>,
    pub start: u64,
    pub condition: Comparison,
    pub end: u64,
    pub update: Update,
    pub body: Vec<Node>,
}
