//! Copy-on-extend variable bindings.
//!
//! An [`Environment`] is a shared handle to one scope. Scopes do not link to a
//! parent: [`Environment::extend`] copies the current bindings into a fresh scope
//! and overlays the new ones. The copy is a persistent `im::HashMap`, so it shares
//! structure with the original and costs O(1) to take.
//!
//! ```
//! use sdscheme::{Environment, Value};
//!
//! let outer = Environment::new();
//! outer.define("x".to_string(), Value::Number(1.0));
//!
//! let inner = outer.extend([("y".to_string(), Value::Number(2.0))]);
//! inner.define("x".to_string(), Value::Number(10.0));
//!
//! assert_eq!(inner.get("x"), Some(Value::Number(10.0)));
//! assert_eq!(outer.get("x"), Some(Value::Number(1.0)));
//! assert_eq!(outer.get("y"), None);
//! ```

use crate::Error;
use crate::ast::Value;
use im::HashMap as ImHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A handle to one scope of variable bindings.
///
/// Cloning the handle shares the scope; mutations through any clone are seen by
/// all of them. Use [`Environment::extend`] to get an independent child scope.
#[derive(Clone, Default)]
pub struct Environment {
    bindings: Rc<RefCell<ImHashMap<String, Value>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: Rc::new(RefCell::new(ImHashMap::new())),
        }
    }

    /// Create a new scope holding a copy of these bindings overlaid with `bindings`
    pub fn extend<I>(&self, bindings: I) -> Environment
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut copy = self.snapshot();
        for (name, value) in bindings {
            copy.insert(name, value);
        }
        Environment {
            bindings: Rc::new(RefCell::new(copy)),
        }
    }

    /// Bind `name` in this scope, replacing any existing binding
    pub fn define(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Rebind an existing name in this scope
    pub fn set(&self, name: &str, value: Value) -> Result<(), Error> {
        let mut bindings = self.bindings.borrow_mut();
        match bindings.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::UnboundVariable(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Read-only copy of the current bindings
    pub fn snapshot(&self) -> ImHashMap<String, Value> {
        self.bindings.borrow().clone()
    }

    /// Bound names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }
}

// Bindings routinely contain closures that capture this same environment.
impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("bindings", &self.len())
            .finish()
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bindings, &other.bindings)
    }
}
