use std::collections::BTreeMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::environment::EnvRef;
use crate::stmt::Stmt;

use super::{Literal, LoxInstance, Token};

pub(crate) type Native = fn() -> Literal;

#[derive(Clone, Debug)]
pub(crate) enum Callable {
    Native(Native),
    Function(Function),
    Class(Class),
}

#[derive(Clone, Debug)]
pub(crate) struct LoxCallable {
    pub name: String,
    pub callable: Callable,
}

impl LoxCallable {
    pub fn new(name: String, callable: Callable) -> LoxCallable {
        LoxCallable { callable, name }
    }

    pub fn arity(&self) -> usize {
        match &self.callable {
            Callable::Native(_) => 0,
            Callable::Function(f) => f.params.len(),
            Callable::Class(c) => c.find_method("init").map_or(0, |init| init.params.len()),
        }
    }
}

impl Display for LoxCallable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.callable {
            Callable::Class(c) => f.write_str(&c.name),
            _ => f.write_fmt(format_args!("<fn {}>", self.name)),
        }
    }
}

// A user-defined function or method. The body is shared, not copied: binding
// a method produces a new Function pointing at the same declaration.
#[derive(Clone, Debug)]
pub(crate) struct Function {
    pub params: Vec<Token>,
    pub body: Rc<Vec<Stmt>>,
    pub env: EnvRef,
    pub is_initializer: bool,
}

impl Function {
    pub fn new(params: Vec<Token>, body: Rc<Vec<Stmt>>, env: EnvRef) -> Function {
        Function {
            params,
            body,
            env,
            is_initializer: false,
        }
    }

    pub fn new_initializer(params: Vec<Token>, body: Rc<Vec<Stmt>>, env: EnvRef) -> Function {
        Function {
            params,
            body,
            env,
            is_initializer: true,
        }
    }

    // The bound function's closure is a fresh frame that encloses the
    // original closure and defines 'this'.
    pub fn bind(&self, instance: LoxInstance) -> Function {
        let env = EnvRef::with_enclosing(self.env.clone());
        env.define("this", Literal::ClassInstance(instance));

        Function {
            params: self.params.clone(),
            body: self.body.clone(),
            env,
            is_initializer: self.is_initializer,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Class {
    pub name: String,
    pub superclass: Option<Box<Class>>,
    pub methods: BTreeMap<String, Function>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Box<Class>>,
        methods: BTreeMap<String, Function>,
    ) -> Class {
        Class {
            name,
            superclass,
            methods,
        }
    }

    pub fn find_method(&self, name: &str) -> Option<&Function> {
        match self.methods.get(name) {
            Some(method) => Some(method),
            None => match &self.superclass {
                Some(superclass) => superclass.find_method(name),
                None => None,
            },
        }
    }
}
