use crate::error::{Error, Result};
use crate::parser::{Aexp, ArithOp, Bexp, LogicOp, RelOp, Statement};
use crate::runtime::Environment;

impl ArithOp {
    /// Applies the operator; `/` rounds toward negative infinity
    pub fn apply(self, left: i64, right: i64) -> Result<i64> {
        let overflow = Error::ArithmeticOverflow { op: self };
        match self {
            ArithOp::Add => left.checked_add(right).ok_or(overflow),
            ArithOp::Sub => left.checked_sub(right).ok_or(overflow),
            ArithOp::Mul => left.checked_mul(right).ok_or(overflow),
            ArithOp::Div => {
                if right == 0 {
                    return Err(Error::DivisionByZero);
                }
                let quotient = left.checked_div(right).ok_or(overflow)?;
                if left % right != 0 && (left < 0) != (right < 0) {
                    Ok(quotient - 1)
                } else {
                    Ok(quotient)
                }
            }
        }
    }
}

impl RelOp {
    /// Compares two integers
    pub fn compare(self, left: i64, right: i64) -> bool {
        match self {
            RelOp::Lt => left < right,
            RelOp::Le => left <= right,
            RelOp::Gt => left > right,
            RelOp::Ge => left >= right,
            RelOp::Eq => left == right,
            RelOp::Ne => left != right,
        }
    }
}

impl LogicOp {
    /// Combines two already-evaluated operands
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicOp::And => left && right,
            LogicOp::Or => left || right,
        }
    }
}

impl Aexp {
    /// Evaluates the expression, reading variables from `env`
    ///
    /// The left operand of a binary operation is evaluated before the right.
    pub fn eval(&self, env: &Environment) -> Result<i64> {
        // Chains like `1 + 2 + 3` nest to the left; fold along that spine
        // instead of recursing once per operator.
        let mut spine = Vec::new();
        let mut current = self;
        let mut value = loop {
            match current {
                Aexp::Int(n) => break *n,
                Aexp::Var(name) => break env.get(name),
                Aexp::BinOp { op, left, right } => {
                    spine.push((*op, &**right));
                    current = &**left;
                }
            }
        };

        for (op, right) in spine.into_iter().rev() {
            value = op.apply(value, right.eval(env)?)?;
        }
        Ok(value)
    }
}

impl Bexp {
    /// Evaluates the condition
    ///
    /// `and`/`or` always evaluate both operands; there is no short-circuit.
    pub fn eval(&self, env: &Environment) -> Result<bool> {
        match self {
            Bexp::Relop { op, left, right } => {
                let left_value = left.eval(env)?;
                let right_value = right.eval(env)?;
                Ok(op.compare(left_value, right_value))
            }
            Bexp::And(left, right) => Self::eval_logic(LogicOp::And, left, right, env),
            Bexp::Or(left, right) => Self::eval_logic(LogicOp::Or, left, right, env),
            Bexp::Not(exp) => Ok(!exp.eval(env)?),
        }
    }

    fn eval_logic(op: LogicOp, left: &Bexp, right: &Bexp, env: &Environment) -> Result<bool> {
        let left_value = left.eval(env)?;
        let right_value = right.eval(env)?;
        Ok(op.apply(left_value, right_value))
    }
}

impl Statement {
    /// Executes the statement against `env` with no iteration limit
    pub fn eval(&self, env: &mut Environment) -> Result<()> {
        Evaluator::new(env).exec(self)
    }
}

/// Evaluator settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalConfig {
    /// Upper bound on the iterations of any single `while` execution;
    /// `None` lets loops run forever
    pub max_loop_iterations: Option<u64>,
}

/// Tree-walking evaluator for Imp statements
pub struct Evaluator<'e> {
    /// Variables mutated by assignments
    env: &'e mut Environment,
    config: EvalConfig,
}

impl<'e> Evaluator<'e> {
    /// Creates an evaluator with the default (unbounded) configuration
    pub fn new(env: &'e mut Environment) -> Self {
        Self::with_config(env, EvalConfig::default())
    }

    /// Creates an evaluator with custom settings
    pub fn with_config(env: &'e mut Environment, config: EvalConfig) -> Self {
        Evaluator { env, config }
    }

    /// Executes a whole program
    pub fn execute(&mut self, program: &Statement) -> Result<()> {
        tracing::debug!(config = ?self.config, "executing program");
        self.exec(program)?;
        tracing::debug!("program finished with {} variables", self.env.len());
        Ok(())
    }

    /// Executes a single statement
    pub fn exec(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::Assign { name, value } => {
                let value = value.eval(self.env)?;
                tracing::trace!("{} := {}", name, value);
                self.env.set(name, value);
            }

            Statement::Compound { .. } => {
                // Statement lists nest to the left; walk the spine in a loop.
                let mut rest = Vec::new();
                let mut current = stmt;
                while let Statement::Compound { first, second } = current {
                    rest.push(&**second);
                    current = &**first;
                }
                self.exec(current)?;
                for next in rest.into_iter().rev() {
                    self.exec(next)?;
                }
            }

            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if condition.eval(self.env)? {
                    self.exec(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch)?;
                }
            }

            Statement::While { condition, body } => {
                let mut iterations: u64 = 0;
                while condition.eval(self.env)? {
                    if let Some(limit) = self.config.max_loop_iterations {
                        if iterations >= limit {
                            return Err(Error::TooManyIterations { limit });
                        }
                    }
                    iterations += 1;
                    self.exec(body)?;
                }
                tracing::trace!("while loop ran {} iterations", iterations);
            }
        }
        Ok(())
    }
}

/// Runs `program` starting from `env` and returns the final bindings
pub fn evaluate(program: &Statement, mut env: Environment) -> Result<Environment> {
    Evaluator::new(&mut env).execute(program)?;
    Ok(env)
}
