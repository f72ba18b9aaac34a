use crate::{
    ast::{Expression, LambdaExpr, LiteralValue},
    translator::{FlattenStage, Stage, UnaryStage},
};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

#[cfg(test)]
mod test;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("cannot emit '{0}' as an identifier")]
    InvalidIdentifier(String),
}

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// The separator between pipeline stages: a line break plus one indentation
/// unit. Fixed so emitted definitions compare byte-for-byte.
const STAGE_SEPARATOR: &str = "\n\t";

/// Serializes a stage list into pipeline-call text rooted in `root_token`.
/// Emission is deterministic: identical stage lists always yield identical
/// bytes, across repeated and concurrent calls.
pub fn generate_pipeline(root_token: &str, stages: &[Stage]) -> Result<String> {
    let mut out = identifier(root_token)?;
    for stage in stages {
        out.push_str(STAGE_SEPARATOR);
        out.push_str(&codegen_stage(stage)?);
    }
    Ok(out)
}

fn codegen_stage(stage: &Stage) -> Result<String> {
    match stage {
        Stage::Unary(UnaryStage {
            operator,
            param,
            body,
        }) => Ok(format!(
            ".{}({} => {})",
            identifier(operator)?,
            identifier(param)?,
            codegen_expression(body)?
        )),
        Stage::Flatten(FlattenStage {
            operator,
            param,
            collection,
            result_params,
            result_body,
        }) => Ok(format!(
            ".{}({} => {}, ({}, {}) => {})",
            identifier(operator)?,
            identifier(param)?,
            codegen_expression(collection)?,
            identifier(&result_params.0)?,
            identifier(&result_params.1)?,
            codegen_expression(result_body)?
        )),
    }
}

fn codegen_expression(expr: &Expression) -> Result<String> {
    match expr {
        Expression::Parameter(p) => identifier(p),
        Expression::MemberAccess(m) => Ok(format!(
            "{}.{}",
            codegen_expression(&m.target)?,
            identifier(&m.name)?
        )),
        Expression::MethodCall(c) => Ok(format!(
            "{}.{}({})",
            codegen_expression(&c.receiver)?,
            identifier(&c.method)?,
            c.args
                .iter()
                .map(|a| codegen_expression(a))
                .collect::<Result<Vec<_>>>()?
                .iter()
                .join(", ")
        )),
        Expression::Lambda(LambdaExpr { params, body }) => {
            let params = params
                .iter()
                .map(|p| identifier(p))
                .collect::<Result<Vec<_>>>()?;
            let head = if params.len() == 1 {
                params[0].clone()
            } else {
                format!("({})", params.iter().join(", "))
            };
            Ok(format!("{} => {}", head, codegen_expression(body)?))
        }
        Expression::NewObject(fields) => {
            // Members render in declared order, never sorted.
            let members = fields
                .iter()
                .map(|f| {
                    Ok(format!(
                        "{} = {}",
                        identifier(&f.name)?,
                        codegen_expression(&f.value)?
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("new {{{}}}", members.iter().join(", ")))
        }
        Expression::ArrayLiteral(elements) => Ok(format!(
            "new []{{{}}}",
            elements
                .iter()
                .map(codegen_expression)
                .collect::<Result<Vec<_>>>()?
                .iter()
                .join(", ")
        )),
        Expression::Constant(v) => Ok(codegen_literal(v)),
    }
}

fn codegen_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Null => "null".to_string(),
        LiteralValue::Boolean(b) => b.to_string(),
        LiteralValue::Integer(i) => i.to_string(),
        LiteralValue::Long(l) => format!("{l}L"),
        LiteralValue::Double(s) => s.clone(),
        LiteralValue::String(s) => {
            format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
        }
    }
}

fn identifier(name: &str) -> Result<String> {
    if IDENTIFIER.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}
