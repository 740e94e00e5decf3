use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use super::{Callable, Class, Literal, LoxCallable};

// Clones alias the field map, so a property write is visible through every
// reference to the instance.
#[derive(Clone)]
pub(crate) struct LoxInstance {
    class: Class,
    fields: Rc<RefCell<HashMap<String, Literal>>>,
}

impl LoxInstance {
    pub(crate) fn new(class: Class) -> LoxInstance {
        LoxInstance {
            class,
            fields: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    // Fields shadow methods; method hits come back bound to this instance.
    pub(crate) fn get(&self, name: &str) -> Result<Literal, String> {
        if let Some(value) = self.fields.borrow().get(name) {
            return Ok(value.clone());
        }

        match self.class.find_method(name) {
            Some(method) => {
                let bound = method.bind(self.clone());
                Ok(Literal::Callable(Rc::new(LoxCallable::new(
                    name.to_string(),
                    Callable::Function(bound),
                ))))
            }
            None => Err(format!("Undefined property '{}'.", name)),
        }
    }

    pub(crate) fn set(&self, name: &str, value: Literal) {
        self.fields.borrow_mut().insert(name.to_string(), value);
    }

    pub(crate) fn is(&self, other: &LoxInstance) -> bool {
        Rc::ptr_eq(&self.fields, &other.fields)
    }
}

impl Display for LoxInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{} instance", self.class.name))
    }
}

// Fields may refer back to the instance itself; keep Debug shallow.
impl fmt::Debug for LoxInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("LoxInstance({})", self.class.name))
    }
}
