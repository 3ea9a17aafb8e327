//! Persistent, chained variable bindings shared by the template and
//! expression engines.
//!
//! A [`Scope`] is never mutated after creation — `push` returns a new scope
//! whose parent is the old one. That makes it impossible for a `for_each`
//! iteration's binding to leak into the frame that pushed it: popping back
//! out is simply "use the old `Scope` value again", not an undo operation
//! that can be forgotten.

use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug)]
struct Frame {
    vars: BTreeMap<String, String>,
    parent: Option<Scope>,
}

/// A cheaply-clonable handle to an immutable chain of variable frames.
#[derive(Debug, Clone)]
pub struct Scope(Rc<Frame>);

impl Scope {
    /// An empty root scope with no bindings and no parent.
    #[must_use]
    pub fn root() -> Self {
        Self(Rc::new(Frame {
            vars: BTreeMap::new(),
            parent: None,
        }))
    }

    /// Build a root scope from an initial set of bindings (e.g. resolved
    /// inputs).
    #[must_use]
    pub fn from_vars(vars: BTreeMap<String, String>) -> Self {
        Self(Rc::new(Frame { vars, parent: None }))
    }

    /// Push a new frame of bindings in front of this scope. Keys in `vars`
    /// shadow any binding of the same name visible through `self`.
    #[must_use]
    pub fn push(&self, vars: BTreeMap<String, String>) -> Self {
        Self(Rc::new(Frame {
            vars,
            parent: Some(self.clone()),
        }))
    }

    /// Push a single binding — convenience wrapper around [`Scope::push`].
    #[must_use]
    pub fn push_one(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(name.into(), value.into());
        self.push(vars)
    }

    /// Walk the chain from innermost to outermost, returning the first
    /// binding found.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        let mut frame = &self.0;
        loop {
            if let Some(v) = frame.vars.get(name) {
                return Some(v.as_str());
            }
            match &frame.parent {
                Some(p) => frame = &p.0,
                None => return None,
            }
        }
    }

    /// Flatten the whole chain into a single map, inner bindings shadowing
    /// outer ones.
    #[must_use]
    pub fn all(&self) -> BTreeMap<String, String> {
        let mut chain = Vec::new();
        let mut frame = &self.0;
        loop {
            chain.push(frame);
            match &frame.parent {
                Some(p) => frame = &p.0,
                None => break,
            }
        }
        let mut out = BTreeMap::new();
        for frame in chain.into_iter().rev() {
            out.extend(frame.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_shadows_outer() {
        let root = Scope::root().push_one("name", "outer");
        let inner = root.push_one("name", "inner");
        assert_eq!(inner.lookup("name"), Some("inner"));
        assert_eq!(root.lookup("name"), Some("outer"));
    }

    #[test]
    fn all_flattens_with_shadowing() {
        let root = Scope::root().push_one("a", "1").push_one("b", "2");
        let all = root.all();
        assert_eq!(all.get("a").map(String::as_str), Some("1"));
        assert_eq!(all.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn popping_restores_outer_scope_unchanged() {
        let outer = Scope::root().push_one("x", "outer-value");
        let _inner = outer.push_one("x", "inner-value");
        assert_eq!(outer.lookup("x"), Some("outer-value"));
    }
}
