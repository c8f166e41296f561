use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// Operator token recognized by the grammar
pub trait Operator: Copy + 'static {
    /// Reserved token text of this operator
    fn symbol(self) -> &'static str;
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    /// Addition operator (+)
    Add,
    /// Subtraction operator (-)
    Sub,
    /// Multiplication operator (*)
    Mul,
    /// Floor division operator (/)
    Div,
}

/// Relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelOp {
    /// Less than operator (<)
    Lt,
    /// Less than or equal operator (<=)
    Le,
    /// Greater than operator (>)
    Gt,
    /// Greater than or equal operator (>=)
    Ge,
    /// Equality operator (=)
    Eq,
    /// Inequality operator (!=)
    Ne,
}

/// Binary logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    /// Logical AND operator
    And,
    /// Logical OR operator
    Or,
}

impl ArithOp {
    /// All arithmetic operators
    pub const ALL: [ArithOp; 4] = [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div];
}

impl RelOp {
    /// All relational operators, in the order the grammar tries them
    pub const ALL: [RelOp; 6] = [RelOp::Lt, RelOp::Le, RelOp::Gt, RelOp::Ge, RelOp::Eq, RelOp::Ne];
}

impl Operator for ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

impl Operator for RelOp {
    fn symbol(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
            RelOp::Eq => "=",
            RelOp::Ne => "!=",
        }
    }
}

impl Operator for LogicOp {
    fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "and",
            LogicOp::Or => "or",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Arithmetic expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aexp {
    /// Integer constant: 42
    Int(i64),
    /// Variable reference: x
    Var(String),
    /// Binary operation: x + 42
    BinOp {
        /// Operator
        op: ArithOp,
        /// Left operand
        left: Box<Aexp>,
        /// Right operand
        right: Box<Aexp>,
    },
}

impl Aexp {
    /// Builds a binary operation node
    pub fn binop(op: ArithOp, left: Aexp, right: Aexp) -> Self {
        Aexp::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds a variable reference node
    pub fn var(name: impl Into<String>) -> Self {
        Aexp::Var(name.into())
    }
}

/// Boolean expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bexp {
    /// Comparison of two arithmetic expressions: x < 10
    Relop {
        /// Comparison operator
        op: RelOp,
        /// Left operand
        left: Aexp,
        /// Right operand
        right: Aexp,
    },
    /// Conjunction; both sides are always evaluated
    And(Box<Bexp>, Box<Bexp>),
    /// Disjunction; both sides are always evaluated
    Or(Box<Bexp>, Box<Bexp>),
    /// Negation
    Not(Box<Bexp>),
}

impl Bexp {
    /// Builds a relational comparison node
    pub fn relop(op: RelOp, left: Aexp, right: Aexp) -> Self {
        Bexp::Relop { op, left, right }
    }

    /// Builds an AND or OR node
    pub fn logic(op: LogicOp, left: Bexp, right: Bexp) -> Self {
        match op {
            LogicOp::And => Bexp::And(Box::new(left), Box::new(right)),
            LogicOp::Or => Bexp::Or(Box::new(left), Box::new(right)),
        }
    }

    /// Builds a negation node
    pub fn negate(exp: Bexp) -> Self {
        Bexp::Not(Box::new(exp))
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Variable assignment: x := expr
    Assign {
        /// Name of the variable to assign to
        name: String,
        /// Expression value to assign
        value: Aexp,
    },

    /// Sequence: first ; second
    Compound {
        /// Statement executed first
        first: Box<Statement>,
        /// Statement executed second
        second: Box<Statement>,
    },

    /// If statement
    If {
        /// Condition expression to evaluate
        condition: Bexp,
        /// Statement to execute if condition is true
        then_branch: Box<Statement>,
        /// Optional statement to execute if condition is false
        else_branch: Option<Box<Statement>>,
    },

    /// While loop
    While {
        /// Loop condition expression
        condition: Bexp,
        /// Statement to execute in loop body
        body: Box<Statement>,
    },
}

impl Statement {
    /// Builds an assignment node
    pub fn assign(name: impl Into<String>, value: Aexp) -> Self {
        Statement::Assign {
            name: name.into(),
            value,
        }
    }

    /// Builds a sequence node
    pub fn compound(first: Statement, second: Statement) -> Self {
        Statement::Compound {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    /// Builds a conditional node
    pub fn if_then(
        condition: Bexp,
        then_branch: Statement,
        else_branch: Option<Statement>,
    ) -> Self {
        Statement::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    /// Builds a loop node
    pub fn while_do(condition: Bexp, body: Statement) -> Self {
        Statement::While {
            condition,
            body: Box::new(body),
        }
    }
}

// Long programs build trees thousands of nodes deep. Nested children are
// detached onto a work list so dropping a tree never recurses per level.

impl Drop for Aexp {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut exp) = pending.pop() {
            exp.detach_children(&mut pending);
        }
    }
}

impl Aexp {
    fn detach_children(&mut self, pending: &mut Vec<Aexp>) {
        if let Aexp::BinOp { left, right, .. } = self {
            for child in [left, right] {
                if matches!(**child, Aexp::BinOp { .. }) {
                    pending.push(mem::replace(&mut **child, Aexp::Int(0)));
                }
            }
        }
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut stmt) = pending.pop() {
            stmt.detach_children(&mut pending);
        }
    }
}

impl Statement {
    fn detach_children(&mut self, pending: &mut Vec<Statement>) {
        let mut detach = |child: &mut Box<Statement>| {
            if !matches!(**child, Statement::Assign { .. }) {
                let empty = Statement::Assign {
                    name: String::new(),
                    value: Aexp::Int(0),
                };
                pending.push(mem::replace(&mut **child, empty));
            }
        };
        match self {
            Statement::Assign { .. } => {}
            Statement::Compound { first, second } => {
                detach(first);
                detach(second);
            }
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                detach(then_branch);
                if let Some(else_branch) = else_branch {
                    detach(else_branch);
                }
            }
            Statement::While { body, .. } => detach(body),
        }
    }
}

// Display renders source text that scans and parses back to the same tree.
// Binary operations are always parenthesized, so no precedence is needed.

impl fmt::Display for Aexp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Aexp::Int(n) => write!(f, "{}", n),
            Aexp::Var(name) => write!(f, "{}", name),
            Aexp::BinOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

impl fmt::Display for Bexp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bexp::Relop { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Bexp::And(left, right) => write!(f, "({} and {})", left, right),
            Bexp::Or(left, right) => write!(f, "({} or {})", left, right),
            Bexp::Not(exp) => write!(f, "not {}", exp),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Assign { name, value } => write!(f, "{} := {}", name, value),
            Statement::Compound { first, second } => write!(f, "{} ; {}", first, second),
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if {} then {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", else_branch)?;
                }
                write!(f, " end")
            }
            Statement::While { condition, body } => {
                write!(f, "while {} do {} end", condition, body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_symbols() {
        let arith: Vec<_> = ArithOp::ALL.iter().map(|op| op.symbol()).collect();
        assert_eq!(arith, vec!["+", "-", "*", "/"]);
        assert_eq!(RelOp::Ne.to_string(), "!=");
        assert_eq!(LogicOp::And.to_string(), "and");
    }

    #[test]
    fn test_display_parenthesizes_binops() {
        let exp = Aexp::binop(
            ArithOp::Mul,
            Aexp::binop(ArithOp::Add, Aexp::Int(2), Aexp::Int(3)),
            Aexp::var("x"),
        );
        assert_eq!(exp.to_string(), "((2 + 3) * x)");
    }

    #[test]
    fn test_display_boolean() {
        let cond = Bexp::logic(
            LogicOp::Or,
            Bexp::negate(Bexp::relop(RelOp::Lt, Aexp::var("x"), Aexp::Int(0))),
            Bexp::relop(RelOp::Eq, Aexp::var("y"), Aexp::Int(1)),
        );
        assert_eq!(cond.to_string(), "(not x < 0 or y = 1)");
    }

    #[test]
    fn test_display_statements() {
        let body = Statement::assign(
            "x",
            Aexp::binop(ArithOp::Add, Aexp::var("x"), Aexp::Int(1)),
        );
        let cond = Bexp::relop(RelOp::Lt, Aexp::var("x"), Aexp::Int(3));
        let program = Statement::compound(
            Statement::assign("x", Aexp::Int(0)),
            Statement::while_do(cond.clone(), body.clone()),
        );
        assert_eq!(
            program.to_string(),
            "x := 0 ; while x < 3 do x := (x + 1) end"
        );

        let branch = Statement::if_then(cond, body, Some(Statement::assign("y", Aexp::Int(2))));
        assert_eq!(
            branch.to_string(),
            "if x < 3 then x := (x + 1) else y := 2 end"
        );
    }

    #[test]
    fn test_drop_deeply_nested_trees() {
        let mut sum = Aexp::Int(0);
        for n in 0..100_000 {
            sum = Aexp::binop(ArithOp::Add, sum, Aexp::Int(n));
        }

        let mut program = Statement::assign("x", sum);
        for _ in 0..100_000 {
            let cond = Bexp::relop(RelOp::Lt, Aexp::var("x"), Aexp::Int(1));
            let body = Statement::while_do(cond, Statement::assign("x", Aexp::Int(1)));
            program = Statement::compound(program, body);
        }
        drop(program);
    }
}
