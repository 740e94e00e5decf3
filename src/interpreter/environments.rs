use std::cell::RefCell;

use crate::environment::EnvRef;
use crate::expr::{AssignExpr, SuperExpr, ThisExpr, VariableExpr};
use crate::resolver::Locals;
use crate::tokens::{Callable, Class, Literal, LoxInstance, Token};

use super::RuntimeError;

// The environment stack for the executing program plus the resolver's
// side-table. The bottom frame is the globals; block and call frames are
// pushed above it and popped on every exit path.
pub(crate) struct Environments {
    globals: EnvRef,
    locals: Locals,
    stack: RefCell<Vec<EnvRef>>,
}

impl Environments {
    pub fn new(globals: EnvRef, locals: Locals) -> Environments {
        Environments {
            globals: globals.clone(),
            locals,
            stack: RefCell::new(vec![globals]),
        }
    }

    pub fn push_scope(&self, scope: EnvRef) {
        self.stack.borrow_mut().push(scope)
    }

    pub fn pop_scope(&self) {
        self.stack.borrow_mut().pop();
    }

    pub(crate) fn peek(&self) -> EnvRef {
        match self.stack.borrow().last() {
            Some(env) => env.clone(),
            None => self.globals.clone(),
        }
    }

    pub(crate) fn look_up_variable(&self, expr: &VariableExpr) -> Result<Literal, RuntimeError> {
        self.look_up(expr.id, &expr.name)
    }

    pub(crate) fn look_up_this(&self, expr: &ThisExpr) -> Result<Literal, RuntimeError> {
        self.look_up(expr.id, &expr.keyword)
    }

    // A resolved occurrence reads from the frame at its exact distance;
    // anything else reads from the globals.
    fn look_up(&self, id: usize, name: &Token) -> Result<Literal, RuntimeError> {
        let value = match self.locals.get(id) {
            Some(distance) => self.peek().get_at_distance(distance, &name.lexeme),
            None => self.globals.get(&name.lexeme),
        };

        match value {
            Some(literal) => Ok(literal),
            None => Err(RuntimeError::new(
                format!("Undefined variable '{}'.", name.lexeme),
                name.line_number,
            )),
        }
    }

    // Same rule for writes: exactly one of the resolved frame or the globals.
    pub(crate) fn assign_expression(
        &self,
        expr: &AssignExpr,
        value: Literal,
    ) -> Result<(), RuntimeError> {
        let name = &expr.name;
        let result = match self.locals.get(expr.id) {
            Some(distance) => self
                .peek()
                .assign_at_distance(distance, &name.lexeme, value),
            None => self.globals.assign(&name.lexeme, value),
        };

        result.map_err(|message| RuntimeError::new(message, name.line_number))
    }

    pub(crate) fn assign(&self, name: &Token, value: Literal) -> Result<(), RuntimeError> {
        self.peek()
            .assign(&name.lexeme, value)
            .map_err(|message| RuntimeError::new(message, name.line_number))
    }

    // 'super' lives one frame outside the implicit 'this' frame, so the
    // instance is found one hop nearer than the superclass.
    pub(crate) fn look_up_super_and_object(
        &self,
        expr: &SuperExpr,
    ) -> Result<(Class, LoxInstance), RuntimeError> {
        let keyword = &expr.keyword;
        let distance = match self.locals.get(expr.id) {
            Some(distance) => distance,
            None => {
                return Err(RuntimeError::new(
                    format!("Undefined variable '{}'.", keyword.lexeme),
                    keyword.line_number,
                ))
            }
        };

        let superclass = self.peek().get_at_distance(distance, "super");
        let object = self.peek().get_at_distance(distance - 1, "this");

        match (superclass, object) {
            (Some(Literal::Callable(callable)), Some(Literal::ClassInstance(object))) => {
                match &callable.callable {
                    Callable::Class(class) => Ok((class.clone(), object)),
                    _ => Err(RuntimeError::new(
                        "Could not resolve 'super' when looking up the superclass.".to_string(),
                        keyword.line_number,
                    )),
                }
            }
            (Some(_), _) => Err(RuntimeError::new(
                "Could not resolve 'this' when looking up the superclass.".to_string(),
                keyword.line_number,
            )),
            _ => Err(RuntimeError::new(
                "Could not resolve 'super' when looking up the superclass.".to_string(),
                keyword.line_number,
            )),
        }
    }
}
