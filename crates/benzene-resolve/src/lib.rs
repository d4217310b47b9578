#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![forbid(unsafe_code)]

mod resolver;
pub mod symbols;


pub use resolver::{resolve, Resolver, ScopeGuard};
pub use symbols::{DeclareError, ScopeKind, Symbol, SymbolData, SymbolKind, SymbolTable};
