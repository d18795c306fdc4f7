use super::Node;

/// `fn <name> ( ) { <body> }`. No parameters, no return type (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub body: Vec<Node>,
}
