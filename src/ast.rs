//! # tagsql - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the tagsql
//! statement language, a small SQL dialect for bulk reading, updating, and
//! deleting tag metadata across a set of audio files.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (property references, literals, operations)
//! - **[operators]** - Unary and binary operators
//! - **[statements]** - The three statement forms (SELECT, UPDATE SET, DELETE)
//!
//! ## Statement Forms
//!
//! ```text
//! SELECT (* | id (, id)*) [WHERE expr]
//! UPDATE SET id = expr (, id = expr)* [WHERE expr]
//! DELETE [WHERE expr]
//! ```
//!
//! Keywords are case-insensitive; property identifiers are case-sensitive.
//! String literals are single-quoted with `''` standing for a literal quote.
//! Numbers are arbitrary-precision decimals.
//!
//! ## Examples
//!
//! ### Projection
//!
//! ```text
//! SELECT Title, Album WHERE Year > 2000
//! ```
//!
//! ### Bulk update
//!
//! ```text
//! UPDATE SET Genres = 'Rock;Pop' WHERE Album = 'Legacy'
//! ```
//!
//! ### Deletion with membership test
//!
//! ```text
//! DELETE WHERE Track NOT IN (1, 2, 3)
//! ```
//!
//! ## Canonical Form
//!
//! Every AST node implements `Display` with a fully parenthesized canonical
//! rendering; re-parsing that rendering yields a structurally equal AST.

pub mod expressions;
pub mod operators;
pub mod statements;
pub mod tokens;

pub use expressions::Expression;
pub use operators::{BinOp, UnOp};
pub use statements::{Assignment, ColumnSpec, Statement};
pub use tokens::Token;
