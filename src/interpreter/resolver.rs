//! Fixed-point resolution of the variable table.
//!
//! Declarations may reference each other in any textual order. After the
//! static checks (self-reference, undefined names, cycles) every effective
//! declaration is evaluated pass after pass until the table stops changing.
//! A reference whose target has not been computed in the current pass is
//! evaluated on demand, so a DAG settles in the first pass and the second
//! pass only confirms it.

use indexmap::IndexMap;

use super::builtins::{self, CallContext};
use super::capabilities::Capabilities;
use super::environment::Environment;
use super::error::JustcError;
use super::evaluator::{evaluate_binary, evaluate_unary, inequality, takes_then_branch};
use super::graph::DependencyGraph;
use super::result::LogBook;
use crate::ast::{Declaration, Expr, ExprKind};
use crate::config::ParseOptions;
use crate::value::Value;

/// Results of expression-level calls, keyed by call-site offset and
/// argument values. Shared by every resolver of one run so a call with the
/// same arguments is dispatched once.
#[derive(Debug, Clone, Default)]
pub struct CallCache {
    entries: Vec<(usize, Vec<Value>, Value)>,
}

impl CallCache {
    pub fn get(&self, offset: usize, args: &[Value]) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(at, key, _)| *at == offset && key.as_slice() == args)
            .map(|(_, _, value)| value)
    }

    pub fn insert(&mut self, offset: usize, args: Vec<Value>, value: Value) {
        self.entries.push((offset, args, value));
    }
}

pub struct Resolver<'p> {
    declarations: &'p [Declaration],
    /// Name to index of its last declaration.
    effective: IndexMap<String, usize>,
    table: Environment,
    in_progress: Vec<String>,
    /// Unknown names evaluate to `Unknown` instead of failing.
    lenient: bool,
    options: &'p ParseOptions,
    capabilities: &'p dyn Capabilities,
    logbook: &'p mut LogBook,
    calls: &'p mut CallCache,
}

impl<'p> Resolver<'p> {
    pub fn new(
        declarations: &'p [Declaration],
        options: &'p ParseOptions,
        capabilities: &'p dyn Capabilities,
        logbook: &'p mut LogBook,
        calls: &'p mut CallCache,
    ) -> Self {
        let mut effective = IndexMap::new();
        for (index, decl) in declarations.iter().enumerate() {
            effective.insert(decl.name.clone(), index);
        }
        let table = Environment::with_names(effective.keys());

        Self {
            declarations,
            effective,
            table,
            in_progress: Vec::new(),
            lenient: false,
            options,
            capabilities,
            logbook,
            calls,
        }
    }

    /// Resolver for eager evaluation while parsing is still under way.
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    pub fn resolve(mut self) -> Result<Environment, JustcError> {
        self.check_graph()?;
        self.run_to_fixed_point()?;
        Ok(self.table)
    }

    fn check_graph(&self) -> Result<(), JustcError> {
        let declarations = self.declarations;
        let graph = DependencyGraph::from_declarations(self.effective.values().map(|&i| &declarations[i]));

        if let Some(name) = graph.self_reference() {
            return Err(JustcError::SelfReference {
                name: name.to_string(),
                offset: self.declaration_offset(name),
            });
        }
        if let Some((missing, referenced_by)) = graph.undefined_reference() {
            let offset = self
                .effective
                .get(referenced_by)
                .and_then(|&i| reference_offset(&declarations[i].expr, missing))
                .unwrap_or_else(|| self.declaration_offset(referenced_by));
            return Err(JustcError::UndefinedVariable {
                name: missing.to_string(),
                offset,
            });
        }
        if let Some(cycle) = graph.find_cycle() {
            return Err(JustcError::CircularDependency { cycle });
        }
        Ok(())
    }

    fn run_to_fixed_point(&mut self) -> Result<(), JustcError> {
        let order: Vec<(String, usize)> = self
            .effective
            .iter()
            .map(|(name, &index)| (name.clone(), index))
            .collect();
        let max_passes = self.options.max_passes;

        for pass in 1..=max_passes {
            let before = self.table.clone();
            for (name, index) in &order {
                let value = self.evaluate_declaration(*index)?;
                self.table.set(name.clone(), value);
            }

            if self.table == before {
                return match self.table.first_unresolved() {
                    Some(_) => Err(JustcError::UnresolvedDependency { passes: pass }),
                    None => Ok(()),
                };
            }
        }

        Err(JustcError::UnresolvedDependency { passes: max_passes })
    }

    fn declaration_offset(&self, name: &str) -> usize {
        self.effective
            .get(name)
            .map(|&i| self.declarations[i].offset)
            .unwrap_or(0)
    }

    fn evaluate_declaration(&mut self, index: usize) -> Result<Value, JustcError> {
        let declarations = self.declarations;
        let decl = &declarations[index];
        if let Some(start) = self.in_progress.iter().position(|name| *name == decl.name) {
            if start + 1 == self.in_progress.len() {
                return Err(JustcError::SelfReference {
                    name: decl.name.clone(),
                    offset: decl.offset,
                });
            }
            let mut cycle = self.in_progress[start..].to_vec();
            cycle.push(decl.name.clone());
            return Err(JustcError::CircularDependency { cycle });
        }

        self.in_progress.push(decl.name.clone());
        let result = self.evaluate(&decl.expr);
        self.in_progress.pop();
        result
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, JustcError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Reference(name) => self.resolve_reference(name, expr.span.start),
            ExprKind::Binary { left, op, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(evaluate_binary(&left, *op, &right))
            }
            ExprKind::Unary { op, expr: inner } => {
                let value = self.evaluate(inner)?;
                Ok(evaluate_unary(*op, &value))
            }
            ExprKind::Inequality(inner) => {
                let value = self.evaluate(inner)?;
                Ok(inequality(&value))
            }
            ExprKind::Conditional {
                condition,
                negate_condition,
                then_branch,
                else_branch,
                invert_else,
            } => {
                let condition = self.evaluate(condition)?;
                match takes_then_branch(&condition, *negate_condition) {
                    None => Ok(Value::Unknown),
                    Some(true) => self.evaluate(then_branch),
                    Some(false) => {
                        let value = self.evaluate(else_branch)?;
                        Ok(if *invert_else { inequality(&value) } else { value })
                    }
                }
            }
            ExprKind::Call { name, args } => self.evaluate_call(name, args, expr.span.start),
        }
    }

    fn evaluate_call(&mut self, name: &str, args: &[Expr], offset: usize) -> Result<Value, JustcError> {
        let by_name = name == "VALUE";

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = match &arg.kind {
                ExprKind::Reference(target) if by_name => Value::Variable(target.clone()),
                _ => self.evaluate(arg)?,
            };
            if value.is_unknown() {
                return Ok(Value::Unknown);
            }
            values.push(value);
        }

        if !by_name {
            if let Some(hit) = self.calls.get(offset, &values) {
                return Ok(hit.clone());
            }
        }

        let result = builtins::dispatch(self, name, &values, offset)?;
        if !by_name && !result.is_unknown() {
            self.calls.insert(offset, values, result.clone());
        }
        Ok(result)
    }

    pub fn resolve_reference(&mut self, name: &str, offset: usize) -> Result<Value, JustcError> {
        if let Some(value) = self.table.resolved(name) {
            return Ok(value.clone());
        }

        match self.effective.get(name).copied() {
            Some(index) => {
                let value = self.evaluate_declaration(index)?;
                if !value.is_unknown() {
                    self.table.set(name, value.clone());
                }
                Ok(value)
            }
            None if self.lenient => Ok(Value::Unknown),
            None => Err(JustcError::UndefinedVariable {
                name: name.to_string(),
                offset,
            }),
        }
    }
}

impl CallContext for Resolver<'_> {
    fn options(&self) -> &ParseOptions {
        self.options
    }

    fn capabilities(&self) -> &dyn Capabilities {
        self.capabilities
    }

    fn log(&mut self, kind: &str, message: String, offset: usize) {
        self.logbook.push(kind, message, offset);
    }

    fn lookup(&mut self, name: &str, offset: usize) -> Result<Value, JustcError> {
        self.resolve_reference(name, offset)
    }
}

fn reference_offset(expr: &Expr, name: &str) -> Option<usize> {
    match &expr.kind {
        ExprKind::Literal(_) => None,
        ExprKind::Reference(target) => (target == name).then_some(expr.span.start),
        ExprKind::Binary { left, right, .. } => {
            reference_offset(left, name).or_else(|| reference_offset(right, name))
        }
        ExprKind::Unary { expr: inner, .. } | ExprKind::Inequality(inner) => reference_offset(inner, name),
        ExprKind::Conditional {
            condition,
            then_branch,
            else_branch,
            ..
        } => reference_offset(condition, name)
            .or_else(|| reference_offset(then_branch, name))
            .or_else(|| reference_offset(else_branch, name)),
        ExprKind::Call { args, .. } => args.iter().find_map(|arg| reference_offset(arg, name)),
    }
}
