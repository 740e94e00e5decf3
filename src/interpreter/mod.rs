mod environments;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::environment::EnvRef;
use crate::expr::{self, *};
use crate::resolver::Locals;
use crate::stmt::{self, *};
use crate::tokens::{Callable, Class, Function, Literal, LoxCallable, LoxInstance, Token, TokenType};

use environments::Environments;

use thiserror::Error as ThisError;

use Literal as L;
use TokenType as TT;

#[derive(Debug, ThisError)]
#[error("{message}\n[line {line}]")]
pub(crate) struct RuntimeError {
    message: String,
    line: usize,
}

impl RuntimeError {
    pub(crate) fn new(message: String, line: usize) -> RuntimeError {
        RuntimeError { message, line }
    }
}

// 'return' unwinds through block frames on the same channel as runtime
// faults, but it is control flow, not an error; it is caught at the
// enclosing call boundary.
#[derive(Debug)]
enum Error {
    ReturnValue(Literal),
    Runtime(RuntimeError),
}

use Error::ReturnValue;
use Error::Runtime;

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Error::Runtime(e)
    }
}

fn error(token: &Token, message: &str) -> Error {
    Runtime(RuntimeError::new(message.to_string(), token.line_number))
}

pub(crate) fn interpret(
    globals: EnvRef,
    locals: Locals,
    statements: &Vec<Stmt>,
) -> Result<(), RuntimeError> {
    Interpreter::new(globals, locals).interpret(statements)
}

pub(crate) struct Interpreter {
    environments: Environments,
    out: RefCell<Box<dyn Write>>,
}

impl Interpreter {
    fn new(globals: EnvRef, locals: Locals) -> Interpreter {
        Interpreter::with_output(globals, locals, Box::new(io::stdout()))
    }

    pub(crate) fn with_output(
        globals: EnvRef,
        locals: Locals,
        out: Box<dyn Write>,
    ) -> Interpreter {
        Interpreter {
            environments: Environments::new(globals, locals),
            out: RefCell::new(out),
        }
    }

    pub(crate) fn interpret(&self, statements: &Vec<Stmt>) -> Result<(), RuntimeError> {
        for statement in statements.iter() {
            match self.execute(statement) {
                Ok(_) => (),
                Err(ReturnValue(value)) => {
                    return Err(RuntimeError::new(
                        format!("Unexpected return value: {}", value),
                        0,
                    ))
                }
                Err(Runtime(e)) => return Err(e),
            }
        }

        Ok(())
    }

    fn execute(&self, statement: &Stmt) -> Result<(), Error> {
        walk_stmt(self, statement)
    }

    fn evaluate(&self, expression: &Expr) -> Result<Literal, Error> {
        walk_expr(self, expression)
    }

    fn execute_block(&self, statements: &Vec<Stmt>) -> Result<(), Error> {
        for statement in statements {
            self.execute(statement)?;
        }

        Ok(())
    }

    fn call(
        &self,
        callable: &LoxCallable,
        arguments: Vec<Literal>,
        paren: &Token,
    ) -> Result<Literal, Error> {
        if callable.arity() != arguments.len() {
            return Err(Runtime(RuntimeError::new(
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    arguments.len()
                ),
                paren.line_number,
            )));
        }

        match &callable.callable {
            Callable::Class(class) => {
                let instance = LoxInstance::new(class.clone());

                if let Some(initializer) = class.find_method("init") {
                    let function = initializer.bind(instance.clone());
                    self.call_function(&function, arguments, paren)?;
                }

                Ok(Literal::ClassInstance(instance))
            }
            Callable::Function(function) => self.call_function(function, arguments, paren),
            Callable::Native(native) => Ok(native()),
        }
    }

    fn call_function(
        &self,
        function: &Function,
        arguments: Vec<Literal>,
        paren: &Token,
    ) -> Result<Literal, Error> {
        let env = EnvRef::with_enclosing(function.env.clone());

        for (param, argument) in function.params.iter().zip(arguments) {
            env.define(&param.lexeme, argument);
        }

        self.environments.push_scope(env);

        // the previous scope is restored on every exit path, unwinds included
        let result = match self.execute_block(&function.body) {
            Ok(_) if function.is_initializer => self.this_of(function, paren),
            Ok(_) => Ok(Literal::Nil),
            Err(ReturnValue(_)) if function.is_initializer => self.this_of(function, paren),
            Err(ReturnValue(value)) => Ok(value),
            Err(e) => Err(e),
        };

        self.environments.pop_scope();
        result
    }

    // An initializer's value is always the instance, read from the bound
    // closure where 'this' sits at distance zero.
    fn this_of(&self, function: &Function, paren: &Token) -> Result<Literal, Error> {
        match function.env.get_at_distance(0, "this") {
            Some(this) => Ok(this),
            None => Err(error(paren, "Could not resolve 'this' for an initializer.")),
        }
    }
}

impl expr::Visitor<Result<Literal, Error>> for Interpreter {
    fn visit_assign(&self, expr: &AssignExpr) -> Result<Literal, Error> {
        let value = self.evaluate(&expr.value)?;

        self.environments.assign_expression(expr, value.clone())?;

        Ok(value)
    }

    fn visit_binary(&self, expr: &BinaryExpr) -> Result<Literal, Error> {
        let left = self.evaluate(&expr.left)?;
        let right = self.evaluate(&expr.right)?;

        let operator = expr.operator.token_type;

        match (left, operator, right) {
            // Math; division by zero follows IEEE-754 to infinity or NaN
            (L::Number(l), TT::Plus, L::Number(r)) => Ok(L::Number(l + r)),
            (L::Number(l), TT::Minus, L::Number(r)) => Ok(L::Number(l - r)),
            (L::Number(l), TT::Slash, L::Number(r)) => Ok(L::Number(l / r)),
            (L::Number(l), TT::Star, L::Number(r)) => Ok(L::Number(l * r)),

            // String concatenation
            (L::String(l), TT::Plus, L::String(r)) => Ok(L::String(format!("{}{}", l, r))),

            // Comparison operators
            (L::Number(l), TT::Greater, L::Number(r)) => Ok(L::Boolean(l > r)),
            (L::Number(l), TT::GreaterEqual, L::Number(r)) => Ok(L::Boolean(l >= r)),
            (L::Number(l), TT::Less, L::Number(r)) => Ok(L::Boolean(l < r)),
            (L::Number(l), TT::LessEqual, L::Number(r)) => Ok(L::Boolean(l <= r)),

            // Equality operators never fault
            (l, TT::EqualEqual, r) => Ok(L::Boolean(l == r)),
            (l, TT::BangEqual, r) => Ok(L::Boolean(l != r)),

            (_, TT::Plus, _) => Err(error(
                &expr.operator,
                "Operands must be two numbers or two strings.",
            )),
            _ => Err(error(&expr.operator, "Operands must be numbers.")),
        }
    }

    fn visit_call(&self, expr: &CallExpr) -> Result<Literal, Error> {
        let callee = self.evaluate(&expr.callee)?;

        let mut arguments: Vec<Literal> = Vec::new();
        for argument in &expr.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        match callee {
            L::Callable(callable) => self.call(&callable, arguments, &expr.paren),
            _ => Err(error(&expr.paren, "Can only call functions and classes.")),
        }
    }

    fn visit_get(&self, expr: &GetExpr) -> Result<Literal, Error> {
        match self.evaluate(&expr.object)? {
            L::ClassInstance(instance) => instance
                .get(&expr.name.lexeme)
                .map_err(|message| Runtime(RuntimeError::new(message, expr.name.line_number))),
            _ => Err(error(&expr.name, "Only instances have properties.")),
        }
    }

    fn visit_grouping(&self, expr: &GroupingExpr) -> Result<Literal, Error> {
        self.evaluate(&expr.expression)
    }

    fn visit_literal(&self, expr: &LiteralExpr) -> Result<Literal, Error> {
        Ok(expr.value.clone())
    }

    // Short-circuits and yields the deciding operand itself, not a coerced
    // boolean.
    fn visit_logical(&self, expr: &LogicalExpr) -> Result<Literal, Error> {
        let left = self.evaluate(&expr.left)?;

        match (evaluate_truthy(&left), expr.operator.token_type) {
            (true, TT::And) => self.evaluate(&expr.right),
            (false, TT::And) => Ok(left),
            (true, TT::Or) => Ok(left),
            (false, TT::Or) => self.evaluate(&expr.right),
            _ => Err(error(&expr.operator, "Logical operator must be 'and' or 'or'.")),
        }
    }

    fn visit_set(&self, expr: &SetExpr) -> Result<Literal, Error> {
        let object = match self.evaluate(&expr.object)? {
            L::ClassInstance(object) => object,
            _ => return Err(error(&expr.name, "Only instances have fields.")),
        };

        let value = self.evaluate(&expr.value)?;
        object.set(&expr.name.lexeme, value.clone());
        Ok(value)
    }

    fn visit_super(&self, expr: &SuperExpr) -> Result<Literal, Error> {
        let (superclass, object) = self.environments.look_up_super_and_object(expr)?;

        match superclass.find_method(&expr.method.lexeme) {
            Some(method) => {
                let bound = method.bind(object);
                Ok(L::Callable(Rc::new(LoxCallable::new(
                    expr.method.lexeme.clone(),
                    Callable::Function(bound),
                ))))
            }
            None => Err(error(
                &expr.method,
                &format!("Undefined property '{}'.", expr.method.lexeme),
            )),
        }
    }

    fn visit_this(&self, expr: &ThisExpr) -> Result<Literal, Error> {
        Ok(self.environments.look_up_this(expr)?)
    }

    fn visit_unary(&self, expr: &UnaryExpr) -> Result<Literal, Error> {
        let right = self.evaluate(&expr.right)?;

        match (expr.operator.token_type, right) {
            (TT::Bang, value) => Ok(L::Boolean(!evaluate_truthy(&value))),
            (TT::Minus, L::Number(n)) => Ok(L::Number(-n)),
            (TT::Minus, _) => Err(error(&expr.operator, "Operand must be a number.")),
            _ => Err(error(&expr.operator, "Unsupported unary operator.")),
        }
    }

    fn visit_variable(&self, expr: &VariableExpr) -> Result<Literal, Error> {
        Ok(self.environments.look_up_variable(expr)?)
    }
}

impl stmt::Visitor<Result<(), Error>> for Interpreter {
    fn visit_block(&self, stmt: &BlockStmt) -> Result<(), Error> {
        let scope = EnvRef::with_enclosing(self.environments.peek());

        self.environments.push_scope(scope);
        let result = self.execute_block(&stmt.statements);
        self.environments.pop_scope();
        result
    }

    // Two-stage binding: the name is defined as nil before the methods are
    // built, so they can refer to the class, then assigned the finished
    // class. Methods close over the frame that holds 'super' when inheriting.
    fn visit_class(&self, stmt: &ClassStmt) -> Result<(), Error> {
        let superclass: Option<Class> = match &stmt.superclass {
            None => None,
            Some(expression) => match self.visit_variable(expression)? {
                L::Callable(callable) => match &callable.callable {
                    Callable::Class(class) => Some(class.clone()),
                    _ => return Err(error(&expression.name, "Superclass must be a class.")),
                },
                _ => return Err(error(&expression.name, "Superclass must be a class.")),
            },
        };

        let name = stmt.name.lexeme.clone();
        self.environments.peek().define(&name, L::Nil);

        if let Some(superclass) = &superclass {
            let env = EnvRef::with_enclosing(self.environments.peek());
            env.define(
                "super",
                L::Callable(Rc::new(LoxCallable::new(
                    superclass.name.clone(),
                    Callable::Class(superclass.clone()),
                ))),
            );
            self.environments.push_scope(env);
        }

        let mut methods: BTreeMap<String, Function> = BTreeMap::new();

        for method in stmt.methods.iter() {
            let body = Rc::new(method.body.clone());
            let params = method.params.clone();

            let function = match method.name.lexeme.as_str() {
                "init" => Function::new_initializer(params, body, self.environments.peek()),
                _ => Function::new(params, body, self.environments.peek()),
            };
            methods.insert(method.name.lexeme.clone(), function);
        }

        let class = LoxCallable::new(
            name.clone(),
            Callable::Class(Class::new(name, superclass.map(Box::new), methods)),
        );

        if stmt.superclass.is_some() {
            self.environments.pop_scope();
        }

        self.environments
            .assign(&stmt.name, L::Callable(Rc::new(class)))?;
        Ok(())
    }

    fn visit_expression(&self, stmt: &ExpressionStmt) -> Result<(), Error> {
        self.evaluate(&stmt.expression).map(|_| ())
    }

    fn visit_function(&self, stmt: &FunctionStmt) -> Result<(), Error> {
        let env = self.environments.peek();

        let function = LoxCallable::new(
            stmt.name.lexeme.clone(),
            Callable::Function(Function::new(
                stmt.params.clone(),
                Rc::new(stmt.body.clone()),
                env.clone(),
            )),
        );

        env.define(&stmt.name.lexeme, Literal::Callable(Rc::new(function)));

        Ok(())
    }

    fn visit_if(&self, stmt: &IfStmt) -> Result<(), Error> {
        let condition_result = self.evaluate(&stmt.condition)?;

        match evaluate_truthy(&condition_result) {
            true => self.execute(&stmt.then_branch),
            false => self.execute(&stmt.else_branch),
        }
    }

    fn visit_print(&self, stmt: &PrintStmt) -> Result<(), Error> {
        let value = self.evaluate(&stmt.expression)?;

        writeln!(self.out.borrow_mut(), "{}", value)
            .map_err(|e| Runtime(RuntimeError::new(format!("Could not write output: {}", e), 0)))
    }

    fn visit_return(&self, stmt: &ReturnStmt) -> Result<(), Error> {
        let value = match &stmt.value {
            Some(value) => self.evaluate(value)?,
            None => Literal::Nil,
        };

        Err(ReturnValue(value))
    }

    fn visit_var(&self, stmt: &VarStmt) -> Result<(), Error> {
        let env = self.environments.peek();

        let value = match &stmt.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Literal::Nil,
        };

        env.define(&stmt.name.lexeme, value);
        Ok(())
    }

    fn visit_while(&self, stmt: &WhileStmt) -> Result<(), Error> {
        loop {
            let condition_result = self.evaluate(&stmt.condition)?;

            if !evaluate_truthy(&condition_result) {
                return Ok(());
            }

            self.execute(&stmt.body)?;
        }
    }
}

fn evaluate_truthy(v: &Literal) -> bool {
    match v {
        Literal::Nil => false,
        Literal::Boolean(b) => *b,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native;
    use crate::parser;
    use crate::resolver;
    use crate::tokens::Tokens;

    struct SharedWriter(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_with(globals: &EnvRef, source: &str) -> Result<String, RuntimeError> {
        let statements = parser::parse(source.parse::<Tokens>().unwrap()).unwrap();
        let locals = resolver::resolve_locals(&statements).unwrap();

        let buffer = Rc::new(RefCell::new(Vec::new()));
        let interpreter = Interpreter::with_output(
            globals.clone(),
            locals,
            Box::new(SharedWriter(buffer.clone())),
        );
        interpreter.interpret(&statements)?;

        let bytes = buffer.borrow().clone();
        Ok(String::from_utf8(bytes).unwrap())
    }

    fn run(source: &str) -> Result<String, RuntimeError> {
        let globals = EnvRef::new();
        native::define_native_functions(globals.clone());

        run_with(&globals, source)
    }

    fn output(source: &str) -> String {
        run(source).unwrap()
    }

    fn error_message(source: &str) -> String {
        run(source).unwrap_err().to_string()
    }

    #[test]
    fn arithmetic_respects_precedence() {
        assert_eq!(output("print 1 + 2 * 3;"), "7\n");
    }

    #[test]
    fn integral_numbers_print_without_a_fraction() {
        assert_eq!(output("print 2.5 + 0.5;"), "3\n");
        assert_eq!(output("print 2.5 + 0.25;"), "2.75\n");
    }

    #[test]
    fn division_by_zero_is_infinity() {
        assert_eq!(output("print 1 / 0;"), "inf\n");
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(output("print \"foo\" + \"bar\";"), "foobar\n");
    }

    #[test]
    fn closures_see_the_scope_where_they_were_declared() {
        let source = "var a = \"global\";
                      {
                        fun show() { print a; }
                        show();
                        var a = \"local\";
                        show();
                      }";

        assert_eq!(output(source), "global\nglobal\n");
    }

    #[test]
    fn super_dispatches_to_the_superclass_method() {
        let source = "class A { m() { print \"A\"; } }
                      class B < A { m() { super.m(); print \"B\"; } }
                      B().m();";

        assert_eq!(output(source), "A\nB\n");
    }

    #[test]
    fn counter_closure_keeps_its_own_state() {
        let source = "fun makeCounter() {
                        var i = 0;
                        fun count() { i = i + 1; print i; }
                        return count;
                      }
                      var c = makeCounter();
                      c(); c(); c();";

        assert_eq!(output(source), "1\n2\n3\n");
    }

    #[test]
    fn early_return_in_an_initializer_still_yields_the_instance() {
        let source = "class Foo { init(x) { this.x = x; return; } }
                      print Foo(7).x;";

        assert_eq!(output(source), "7\n");
    }

    #[test]
    fn for_loops_count() {
        assert_eq!(output("for (var i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
    }

    #[test]
    fn while_loops_run_until_the_condition_is_false() {
        assert_eq!(
            output("var i = 0; while (i < 2) { print i; i = i + 1; }"),
            "0\n1\n"
        );
    }

    #[test]
    fn zero_and_the_empty_string_are_truthy() {
        assert_eq!(output("if (0) print \"number\"; if (\"\") print \"string\";"), "number\nstring\n");
        assert_eq!(output("print !nil; print !false; print !0;"), "true\ntrue\nfalse\n");
    }

    #[test]
    fn logical_operators_yield_the_operand_value() {
        assert_eq!(output("print \"hi\" or 2;"), "hi\n");
        assert_eq!(output("print nil or \"yes\";"), "yes\n");
        assert_eq!(output("print nil and \"no\";"), "nil\n");
        assert_eq!(output("print true and 3;"), "3\n");
    }

    #[test]
    fn logical_operators_short_circuit_side_effects() {
        let source = "var a = 1;
                      fun bump() { a = a + 1; return true; }
                      false and bump();
                      true or bump();
                      print a;";

        assert_eq!(output(source), "1\n");
    }

    #[test]
    fn equality_rules() {
        assert_eq!(output("print nil == nil;"), "true\n");
        assert_eq!(output("print nil == false;"), "false\n");
        assert_eq!(output("print \"1\" == 1;"), "false\n");
        assert_eq!(output("print 1 == 1;"), "true\n");
        assert_eq!(output("print \"a\" != \"b\";"), "true\n");
    }

    #[test]
    fn functions_and_instances_compare_by_identity() {
        assert_eq!(output("fun f() {} print f == f;"), "true\n");
        assert_eq!(
            output("class Foo {} var a = Foo(); var b = Foo(); print a == b; print a == a;"),
            "false\ntrue\n"
        );
    }

    #[test]
    fn closures_capture_variables_by_reference() {
        let source = "var f;
                      {
                        var a = 1;
                        fun g() { print a; }
                        f = g;
                        a = 2;
                      }
                      f();";

        assert_eq!(output(source), "2\n");
    }

    #[test]
    fn block_shadowing_restores_the_outer_binding() {
        let source = "var a = \"outer\";
                      { var a = \"inner\"; print a; }
                      print a;";

        assert_eq!(output(source), "inner\nouter\n");
    }

    #[test]
    fn blocks_do_not_leak_into_enclosing_scopes() {
        let globals = EnvRef::new();
        native::define_native_functions(globals.clone());

        run_with(&globals, "var a = 1; { var hidden = 2; }").unwrap();

        assert_eq!(run_with(&globals, "print a;").unwrap(), "1\n");
        assert_eq!(
            run_with(&globals, "print hidden;").unwrap_err().to_string(),
            "Undefined variable 'hidden'.\n[line 1]"
        );
    }

    #[test]
    fn globals_survive_a_runtime_error_in_a_nested_scope() {
        let globals = EnvRef::new();
        native::define_native_functions(globals.clone());

        run_with(&globals, "var a = \"kept\";").unwrap();
        run_with(&globals, "{ var a = \"shadow\"; missing; }").unwrap_err();

        assert_eq!(run_with(&globals, "print a;").unwrap(), "kept\n");
    }

    #[test]
    fn return_unwinds_through_nested_blocks() {
        let source = "fun f() {
                        { { return \"deep\"; } }
                      }
                      print f();";

        assert_eq!(output(source), "deep\n");
    }

    #[test]
    fn function_without_a_return_yields_nil() {
        assert_eq!(output("fun f() {} print f();"), "nil\n");
    }

    #[test]
    fn arguments_evaluate_left_to_right() {
        let source = "fun show(a, b) { print a; print b; }
                      show(1, 2);";

        assert_eq!(output(source), "1\n2\n");
    }

    #[test]
    fn recursion() {
        let source = "fun count(n) {
                        if (n > 0) { count(n - 1); }
                        print n;
                      }
                      count(2);";

        assert_eq!(output(source), "0\n1\n2\n");
    }

    #[test]
    fn instances_alias_their_fields() {
        let source = "class Box {}
                      var a = Box();
                      var b = a;
                      b.value = 3;
                      print a.value;";

        assert_eq!(output(source), "3\n");
    }

    #[test]
    fn fields_shadow_methods() {
        let source = "class Foo { m() { return \"method\"; } }
                      var foo = Foo();
                      print foo.m();
                      foo.m = \"field\";
                      print foo.m;";

        assert_eq!(output(source), "method\nfield\n");
    }

    #[test]
    fn bound_methods_remember_their_instance() {
        let source = "class Person {
                        init(name) { this.name = name; }
                        greet() { print this.name; }
                      }
                      var greet = Person(\"maria\").greet;
                      greet();";

        assert_eq!(output(source), "maria\n");
    }

    #[test]
    fn methods_are_inherited_through_the_superclass_chain() {
        let source = "class A { hello() { print \"hello\"; } }
                      class B < A {}
                      class C < B {}
                      C().hello();";

        assert_eq!(output(source), "hello\n");
    }

    #[test]
    fn callables_display_by_kind() {
        assert_eq!(output("print clock;"), "<fn clock>\n");
        assert_eq!(output("fun f() {} print f;"), "<fn f>\n");
        assert_eq!(output("class Foo {} print Foo;"), "Foo\n");
        assert_eq!(output("class Foo {} print Foo();"), "Foo instance\n");
    }

    #[test]
    fn clock_returns_seconds_since_the_epoch() {
        assert_eq!(output("print clock() > 0;"), "true\n");
    }

    #[test]
    fn undefined_variable_is_a_runtime_error() {
        assert_eq!(
            error_message("print missing;"),
            "Undefined variable 'missing'.\n[line 1]"
        );
    }

    #[test]
    fn assigning_an_undefined_global_is_a_runtime_error() {
        assert_eq!(
            error_message("missing = 1;"),
            "Undefined variable 'missing'.\n[line 1]"
        );
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        assert_eq!(
            error_message("\"totally not a function\"();"),
            "Can only call functions and classes.\n[line 1]"
        );
    }

    #[test]
    fn arity_mismatches_are_runtime_errors() {
        assert_eq!(
            error_message("fun f(a, b) {}\nf(1);"),
            "Expected 2 arguments but got 1.\n[line 2]"
        );
        assert_eq!(
            error_message("class Foo { init(x) {} }\nFoo();"),
            "Expected 1 arguments but got 0.\n[line 2]"
        );
    }

    #[test]
    fn type_errors_name_the_offending_operator_line() {
        assert_eq!(
            error_message("print 1 + \"one\";"),
            "Operands must be two numbers or two strings.\n[line 1]"
        );
        assert_eq!(
            error_message("print 1 < \"one\";"),
            "Operands must be numbers.\n[line 1]"
        );
        assert_eq!(
            error_message("print -\"muffin\";"),
            "Operand must be a number.\n[line 1]"
        );
    }

    #[test]
    fn property_access_requires_an_instance() {
        assert_eq!(
            error_message("print 4.foo;"),
            "Only instances have properties.\n[line 1]"
        );
        assert_eq!(
            error_message("4.foo = 5;"),
            "Only instances have fields.\n[line 1]"
        );
    }

    #[test]
    fn undefined_property_is_a_runtime_error() {
        assert_eq!(
            error_message("class Foo {}\nprint Foo().bar;"),
            "Undefined property 'bar'.\n[line 2]"
        );
    }

    #[test]
    fn superclass_must_be_a_class() {
        assert_eq!(
            error_message("var NotClass = 1;\nclass Sub < NotClass {}"),
            "Superclass must be a class.\n[line 2]"
        );
    }
}
