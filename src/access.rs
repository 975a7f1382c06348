// src/access.rs

//! O motor de escopo: quem vê e quem altera o quê na hierarquia.
//!
//! `resolver` consulta a árvore; o resto são funções puras sobre
//! `RequestScope` e `ScopePath`.

pub mod eligibility;
pub mod mutation;
pub mod query;
pub mod resolver;
pub mod visibility;

#[cfg(test)]
pub mod testing;
