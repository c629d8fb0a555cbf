pub mod ast;
pub mod catalog;
pub mod evaluator;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod plan;
pub mod record;
pub mod runner;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Assignment, BinOp, ColumnSpec, Expression, Statement, Token, UnOp};
pub use catalog::{AssignmentError, PropertyCatalog, PropertyDef, PropertyKind};
pub use evaluator::{as_condition, EvalError, Evaluator};
pub use lexer::{LexError, Lexer, Position};
pub use options::ExecutionOptions;
pub use parser::{parse, ParseError, Parser};
pub use plan::{CompileError, ExecutionPlan, RowAction};
pub use record::{
    CommitError, MemoryRecord, OpenError, RecordProvider, TagField, TagRecord,
};
pub use runner::{FileError, FileRemover, RemoveError, Reporter, RunOutcome, Runner};
pub use value::Value;
