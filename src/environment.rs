use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::tokens::Literal;

pub(crate) struct Environment {
    enclosing: Option<EnvRef>,
    values: HashMap<String, Literal>,
}

// Shared handle to a frame of bindings. Closures and block frames alias the
// same environment, so mutation in one is visible through the others.
#[derive(Clone)]
pub(crate) struct EnvRef(Rc<RefCell<Environment>>);

impl EnvRef {
    pub fn new() -> EnvRef {
        EnvRef(Rc::new(RefCell::new(Environment {
            enclosing: None,
            values: HashMap::new(),
        })))
    }

    pub fn with_enclosing(enclosing: EnvRef) -> EnvRef {
        EnvRef(Rc::new(RefCell::new(Environment {
            enclosing: Some(enclosing),
            values: HashMap::new(),
        })))
    }

    pub fn define(&self, name: &str, value: Literal) {
        self.0.borrow_mut().values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Literal> {
        let env = self.0.borrow();
        match env.values.get(name) {
            Some(value) => Some(value.clone()),
            None => match &env.enclosing {
                Some(enclosing) => enclosing.get(name),
                None => None,
            },
        }
    }

    pub fn assign(&self, name: &str, value: Literal) -> Result<(), String> {
        let mut env = self.0.borrow_mut();
        match env.values.contains_key(name) {
            true => {
                env.values.insert(name.to_string(), value);
                Ok(())
            }
            false => match &env.enclosing {
                Some(enclosing) => enclosing.assign(name, value),
                None => Err(format!("Undefined variable '{}'.", name)),
            },
        }
    }

    // The resolver's distances are exact: these address ancestor(d) only and
    // never fall through to an enclosing frame.
    pub fn get_at_distance(&self, distance: usize, name: &str) -> Option<Literal> {
        self.ancestor(distance)?.0.borrow().values.get(name).cloned()
    }

    pub fn assign_at_distance(
        &self,
        distance: usize,
        name: &str,
        value: Literal,
    ) -> Result<(), String> {
        match self.ancestor(distance) {
            Some(env) => {
                env.0.borrow_mut().values.insert(name.to_string(), value);
                Ok(())
            }
            None => Err(format!("Undefined variable '{}'.", name)),
        }
    }

    fn ancestor(&self, distance: usize) -> Option<EnvRef> {
        let mut env = self.clone();

        for _ in 0..distance {
            let enclosing = env.0.borrow().enclosing.clone();
            env = enclosing?;
        }

        Some(env)
    }
}

// Environment chains are cyclic through closures; keep Debug shallow.
impl fmt::Debug for EnvRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<environment>")
    }
}
