use std::{cell::RefCell, collections::HashMap, slice::Iter};

use crate::{
    expr::{self, *},
    stmt::{self, *},
    tokens::Token,
};

struct SingleError(String);

fn error(token: &Token, message: &str) -> SingleError {
    SingleError(format!(
        "[line {}] Error at '{}': {}",
        token.line_number, token.lexeme, message
    ))
}

// The bool tracks declared (false) vs defined (true); a variable read while
// still false is being read inside its own initializer. The global scope is
// not represented here.
#[derive(Debug)]
pub(crate) struct Scopes(Vec<HashMap<String, bool>>);

impl Scopes {
    fn new() -> Scopes {
        Scopes(Vec::new())
    }

    fn begin_scope(&mut self) {
        self.0.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.0.pop();
    }

    fn declare(&mut self, name: String) {
        match self.0.last_mut() {
            None => (),
            Some(scope) => {
                scope.insert(name, false);
            }
        };
    }

    fn define(&mut self, name: String) {
        match self.0.last_mut() {
            None => (),
            Some(scope) => {
                scope.insert(name, true);
            }
        }
    }

    fn top_contains(&self, name: &str) -> bool {
        match self.0.last() {
            None => false,
            Some(map) => map.contains_key(name),
        }
    }

    fn get(&self, name: &str) -> Option<bool> {
        match self.0.last() {
            None => None,
            Some(map) => map.get(name).cloned(),
        }
    }

    fn iter(&self) -> Iter<HashMap<String, bool>> {
        self.0.iter()
    }
}

// Side-table from expression id to the number of scopes between the use and
// the declaration. Globals are represented by absence.
#[derive(Clone, Debug)]
pub(crate) struct Locals(HashMap<usize, usize>);

impl Locals {
    fn new() -> Locals {
        Locals(HashMap::new())
    }

    pub(crate) fn get(&self, id: usize) -> Option<usize> {
        self.0.get(&id).copied()
    }

    fn resolve(&mut self, id: usize, depth: usize) {
        self.0.insert(id, depth);
    }
}

pub(crate) fn resolve_locals(statements: &Vec<Stmt>) -> Result<Locals, Vec<String>> {
    let resolver = Resolver::new();
    resolver.resolve(statements).map_err(|e| vec![e.0])?;
    Ok(resolver.locals.into_inner())
}

enum FunctionType {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy)]
enum ClassType {
    None,
    Class,
    Subclass,
}

struct Resolver {
    locals: RefCell<Locals>,
    scopes: RefCell<Scopes>,
    current_function: RefCell<FunctionType>,
    current_class: RefCell<ClassType>,
}

impl Resolver {
    fn new() -> Resolver {
        Resolver {
            locals: RefCell::new(Locals::new()),
            scopes: RefCell::new(Scopes::new()),
            current_function: RefCell::new(FunctionType::None),
            current_class: RefCell::new(ClassType::None),
        }
    }

    fn begin_scope(&self) {
        self.scopes.borrow_mut().begin_scope()
    }

    fn end_scope(&self) {
        self.scopes.borrow_mut().end_scope()
    }

    fn declare(&self, name: &Token) -> Result<(), SingleError> {
        let mut scope = self.scopes.borrow_mut();

        if scope.top_contains(&name.lexeme) {
            return Err(error(
                name,
                "Already a variable with this name in this scope.",
            ));
        }

        scope.declare(name.lexeme.to_string());
        Ok(())
    }

    fn define(&self, name: &str) {
        self.scopes.borrow_mut().define(name.to_string())
    }

    fn resolve(&self, statements: &Vec<Stmt>) -> Result<(), SingleError> {
        for statement in statements {
            self.resolve_statement(statement)?;
        }

        Ok(())
    }

    fn resolve_expression(&self, expression: &Expr) -> Result<(), SingleError> {
        walk_expr(self, expression)
    }

    fn resolve_function(
        &self,
        stmt: &FunctionStmt,
        function_type: FunctionType,
    ) -> Result<(), SingleError> {
        let enclosing_function = self.current_function.replace(function_type);
        self.begin_scope();

        for param in stmt.params.iter() {
            self.declare(param)?;
            self.define(&param.lexeme);
        }

        self.resolve(&stmt.body)?;
        self.end_scope();
        self.current_function.replace(enclosing_function);
        Ok(())
    }

    fn resolve_local(&self, id: usize, name: &str) {
        let scopes = self.scopes.borrow();

        for (i, scope) in scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.borrow_mut().resolve(id, i);
                return;
            }
        }
    }

    fn resolve_statement(&self, statement: &Stmt) -> Result<(), SingleError> {
        walk_stmt(self, statement)
    }
}

impl stmt::Visitor<Result<(), SingleError>> for Resolver {
    fn visit_block(&self, stmt: &BlockStmt) -> Result<(), SingleError> {
        self.begin_scope();
        self.resolve(&stmt.statements)?;
        self.end_scope();

        Ok(())
    }

    fn visit_class(&self, stmt: &ClassStmt) -> Result<(), SingleError> {
        self.declare(&stmt.name)?;
        self.define(&stmt.name.lexeme);

        let enclosing_class = self.current_class.replace(ClassType::Class);

        if let Some(superclass) = &stmt.superclass {
            if stmt.name.lexeme == superclass.name.lexeme {
                return Err(error(
                    &superclass.name,
                    "A class can't inherit from itself.",
                ));
            }

            self.current_class.replace(ClassType::Subclass);
            self.visit_variable(superclass)?;
            self.begin_scope();
            self.define("super");
        }

        self.begin_scope();
        self.define("this");

        for method in stmt.methods.iter() {
            let function_type = match method.name.lexeme.as_str() {
                "init" => FunctionType::Initializer,
                _ => FunctionType::Method,
            };
            self.resolve_function(method, function_type)?;
        }

        self.end_scope();
        if stmt.superclass.is_some() {
            self.end_scope()
        }

        self.current_class.replace(enclosing_class);

        Ok(())
    }

    fn visit_expression(&self, stmt: &ExpressionStmt) -> Result<(), SingleError> {
        self.resolve_expression(&stmt.expression)
    }

    fn visit_function(&self, stmt: &FunctionStmt) -> Result<(), SingleError> {
        self.declare(&stmt.name)?;
        self.define(&stmt.name.lexeme);

        self.resolve_function(stmt, FunctionType::Function)
    }

    fn visit_if(&self, stmt: &IfStmt) -> Result<(), SingleError> {
        self.resolve_expression(&stmt.condition)?;
        self.resolve_statement(&stmt.then_branch)?;
        self.resolve_statement(&stmt.else_branch)?;

        Ok(())
    }

    fn visit_print(&self, stmt: &PrintStmt) -> Result<(), SingleError> {
        self.resolve_expression(&stmt.expression)
    }

    fn visit_return(&self, stmt: &ReturnStmt) -> Result<(), SingleError> {
        if let FunctionType::None = *self.current_function.borrow() {
            return Err(error(&stmt.keyword, "Can't return from top-level code."));
        }

        match &stmt.value {
            None => Ok(()),
            Some(value) => {
                if let FunctionType::Initializer = *self.current_function.borrow() {
                    return Err(error(
                        &stmt.keyword,
                        "Can't return a value from an initializer.",
                    ));
                }

                self.resolve_expression(value)
            }
        }
    }

    fn visit_var(&self, stmt: &VarStmt) -> Result<(), SingleError> {
        self.declare(&stmt.name)?;

        if let Some(initializer) = &stmt.initializer {
            self.resolve_expression(initializer)?;
        }

        self.define(&stmt.name.lexeme);

        Ok(())
    }

    fn visit_while(&self, stmt: &WhileStmt) -> Result<(), SingleError> {
        self.resolve_expression(&stmt.condition)?;
        self.resolve_statement(&stmt.body)?;

        Ok(())
    }
}

impl expr::Visitor<Result<(), SingleError>> for Resolver {
    fn visit_assign(&self, expr: &AssignExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.value)?;
        self.resolve_local(expr.id, &expr.name.lexeme);

        Ok(())
    }

    fn visit_binary(&self, expr: &BinaryExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.left)?;
        self.resolve_expression(&expr.right)?;

        Ok(())
    }

    fn visit_call(&self, expr: &CallExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.callee)?;

        for arg in expr.arguments.iter() {
            self.resolve_expression(arg)?;
        }

        Ok(())
    }

    fn visit_get(&self, expr: &GetExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.object)
    }

    fn visit_grouping(&self, expr: &GroupingExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.expression)
    }

    fn visit_literal(&self, _expr: &LiteralExpr) -> Result<(), SingleError> {
        Ok(())
    }

    fn visit_logical(&self, expr: &LogicalExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.left)?;
        self.resolve_expression(&expr.right)?;

        Ok(())
    }

    fn visit_set(&self, expr: &SetExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.value)?;
        self.resolve_expression(&expr.object)?;

        Ok(())
    }

    fn visit_super(&self, expr: &SuperExpr) -> Result<(), SingleError> {
        match *self.current_class.borrow() {
            ClassType::None => Err(error(
                &expr.keyword,
                "Can't use 'super' outside of a class.",
            )),
            ClassType::Class => Err(error(
                &expr.keyword,
                "Can't use 'super' in a class with no superclass.",
            )),
            ClassType::Subclass => {
                self.resolve_local(expr.id, &expr.keyword.lexeme);
                Ok(())
            }
        }
    }

    fn visit_this(&self, expr: &ThisExpr) -> Result<(), SingleError> {
        if let ClassType::None = *self.current_class.borrow() {
            return Err(error(
                &expr.keyword,
                "Can't use 'this' outside of a class.",
            ));
        }

        self.resolve_local(expr.id, &expr.keyword.lexeme);
        Ok(())
    }

    fn visit_unary(&self, expr: &UnaryExpr) -> Result<(), SingleError> {
        self.resolve_expression(&expr.right)
    }

    fn visit_variable(&self, expr: &VariableExpr) -> Result<(), SingleError> {
        let name = &expr.name.lexeme;
        if let Some(false) = self.scopes.borrow().get(name) {
            return Err(error(
                &expr.name,
                "Can't read local variable in its own initializer.",
            ));
        }

        self.resolve_local(expr.id, name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::tokens::Tokens;

    fn resolve_source(source: &str) -> Result<Locals, Vec<String>> {
        let statements = parser::parse(source.parse::<Tokens>().unwrap()).unwrap();
        resolve_locals(&statements)
    }

    #[test]
    fn globals_are_absent_from_the_table() {
        let statements = parser::parse("var a = 1; print a;".parse::<Tokens>().unwrap()).unwrap();
        let locals = resolve_locals(&statements).unwrap();

        let id = match &statements[1] {
            Stmt::Print(print) => match &print.expression {
                Expr::Variable(v) => v.id,
                other => panic!("expected a variable, got {:?}", other),
            },
            other => panic!("expected a print statement, got {:?}", other),
        };
        assert_eq!(locals.get(id), None);
    }

    #[test]
    fn closed_over_variables_resolve_to_their_distance() {
        let source = "{ var a = 1; fun f() { print a; } }";
        let statements = parser::parse(source.parse::<Tokens>().unwrap()).unwrap();
        let locals = resolve_locals(&statements).unwrap();

        let function = match &statements[0] {
            Stmt::Block(block) => match &block.statements[1] {
                Stmt::Function(f) => f,
                other => panic!("expected a function, got {:?}", other),
            },
            other => panic!("expected a block, got {:?}", other),
        };
        let id = match &function.body[0] {
            Stmt::Print(print) => match &print.expression {
                Expr::Variable(v) => v.id,
                other => panic!("expected a variable, got {:?}", other),
            },
            other => panic!("expected a print statement, got {:?}", other),
        };

        // one hop: out of the function scope into the block
        assert_eq!(locals.get(id), Some(1));
    }

    #[test]
    fn reading_a_local_in_its_own_initializer_is_an_error() {
        let errors = resolve_source("{ var a = a; }").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn duplicate_declaration_in_the_same_scope_is_an_error() {
        let errors = resolve_source("{ var a = 1; var a = 2; }").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn duplicate_parameters_are_an_error() {
        let errors = resolve_source("fun f(a, a) {}").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn shadowing_in_a_nested_scope_is_allowed() {
        assert!(resolve_source("{ var a = 1; { var a = 2; } }").is_ok());
    }

    #[test]
    fn return_outside_a_function_is_an_error() {
        let errors = resolve_source("return 1;").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
    }

    #[test]
    fn returning_a_value_from_an_initializer_is_an_error() {
        let errors = resolve_source("class Foo { init() { return 1; } }").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
    }

    #[test]
    fn bare_return_in_an_initializer_is_allowed() {
        assert!(resolve_source("class Foo { init() { return; } }").is_ok());
    }

    #[test]
    fn this_outside_a_class_is_an_error() {
        let errors = resolve_source("print this;").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
    }

    #[test]
    fn super_outside_a_class_is_an_error() {
        let errors = resolve_source("super.m;").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
    }

    #[test]
    fn super_without_a_superclass_is_an_error() {
        let errors = resolve_source("class Foo { m() { super.m(); } }").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn a_class_cannot_inherit_from_itself() {
        let errors = resolve_source("class Foo < Foo {}").unwrap_err();

        assert_eq!(
            errors,
            vec!["[line 1] Error at 'Foo': A class can't inherit from itself."]
        );
    }
}
