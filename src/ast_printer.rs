use crate::expr::*;

pub(crate) fn print(expression: &Expr) -> String {
    walk_expr(&AstPrinter, expression)
}

struct AstPrinter;

impl AstPrinter {
    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut builder = String::new();

        builder.push('(');
        builder.push_str(name);

        for expr in exprs.iter() {
            builder.push(' ');
            builder.push_str(&walk_expr(self, expr))
        }
        builder.push(')');

        return builder;
    }
}

impl Visitor<String> for AstPrinter {
    fn visit_assign(&self, expr: &AssignExpr) -> String {
        format!("(= {} {})", expr.name.lexeme, walk_expr(self, &expr.value))
    }

    fn visit_binary(&self, expr: &BinaryExpr) -> String {
        self.parenthesize(&expr.operator.lexeme, &[&expr.left, &expr.right])
    }

    fn visit_call(&self, expr: &CallExpr) -> String {
        let mut parts: Vec<&Expr> = vec![&*expr.callee];
        parts.extend(expr.arguments.iter());

        self.parenthesize("call", &parts)
    }

    fn visit_get(&self, expr: &GetExpr) -> String {
        format!(
            "(. {} {})",
            walk_expr(self, &expr.object),
            expr.name.lexeme
        )
    }

    fn visit_grouping(&self, expr: &GroupingExpr) -> String {
        self.parenthesize("group", &[&expr.expression])
    }

    fn visit_literal(&self, expr: &LiteralExpr) -> String {
        format!("{}", expr.value)
    }

    fn visit_logical(&self, expr: &LogicalExpr) -> String {
        self.parenthesize(&expr.operator.lexeme, &[&expr.left, &expr.right])
    }

    fn visit_set(&self, expr: &SetExpr) -> String {
        format!(
            "(= (. {} {}) {})",
            walk_expr(self, &expr.object),
            expr.name.lexeme,
            walk_expr(self, &expr.value)
        )
    }

    fn visit_super(&self, expr: &SuperExpr) -> String {
        format!("(super {})", expr.method.lexeme)
    }

    fn visit_this(&self, _expr: &ThisExpr) -> String {
        "this".to_string()
    }

    fn visit_unary(&self, expr: &UnaryExpr) -> String {
        self.parenthesize(&expr.operator.lexeme, &[&expr.right])
    }

    fn visit_variable(&self, expr: &VariableExpr) -> String {
        expr.name.lexeme.clone()
    }
}
