//! Literal values, declared types and bind slots.

use serde::{Deserialize, Serialize};

/// A literal value carried by the expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Null,
}

/// Declared semantic type of a bind value or CAST target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Integer,
    Double,
    Numeric,
    Varchar,
    Boolean,
}

impl Value {
    /// The type a value would be declared with when none is given.
    pub fn natural_type(&self) -> SqlType {
        match self {
            Value::Int(_) => SqlType::Integer,
            Value::Float(_) => SqlType::Double,
            Value::Bool(_) => SqlType::Boolean,
            Value::String(_) | Value::Null => SqlType::Varchar,
        }
    }
}

/// A literal node.
///
/// Bound literals render as a placeholder and occupy a bind slot.
/// Inline literals render as SQL text and occupy none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: Value,
    pub ty: SqlType,
    #[serde(default)]
    pub inline: bool,
}

impl Literal {
    pub fn bound(value: Value, ty: SqlType) -> Self {
        Self {
            value,
            ty,
            inline: false,
        }
    }

    pub fn inline(value: Value) -> Self {
        let ty = value.natural_type();
        Self {
            value,
            ty,
            inline: true,
        }
    }
}

/// One entry of the rendered bind list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindValue {
    pub value: Value,
    pub ty: SqlType,
}

impl From<&Literal> for BindValue {
    fn from(lit: &Literal) -> Self {
        Self {
            value: lit.value.clone(),
            ty: lit.ty,
        }
    }
}
