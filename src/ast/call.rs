use super::Argument;

/// A call to a built-in (`print`, `println`, `exit`) or a user-defined
/// function: `name(arg, arg, ...);`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    pub arguments: Vec<Argument>,
}
