/// The kind of value a name in scope is bound to. Root is the original outer
/// sequence element, the only value that carries a document identity.
/// Transparent bindings are the synthetic objects query-syntax `let` and
/// multi-`from` clauses compile into; they carry prior bindings forward by
/// name.
#[derive(PartialEq, Debug, Clone)]
pub enum Binding {
    Root,
    Plain,
    Transparent(Vec<(String, Binding)>),
}

impl Binding {
    /// Resolves a member of this binding, which only transparent bindings
    /// have.
    pub fn member(&self, name: &str) -> Option<&Binding> {
        match self {
            Binding::Transparent(fields) => {
                fields.iter().find(|(n, _)| n == name).map(|(_, b)| b)
            }
            _ => None,
        }
    }
}

/// An explicit stack of the bindings visible at a tree position. Passed
/// through the tree walk rather than held as ambient state; innermost
/// bindings win on lookup.
#[derive(Default, Debug)]
pub struct Scope {
    bindings: Vec<(String, Binding)>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b)
    }

    pub fn push(&mut self, name: String, binding: Binding) {
        self.bindings.push((name, binding));
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn truncate(&mut self, len: usize) {
        self.bindings.truncate(len);
    }
}
