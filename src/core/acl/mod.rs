// src/core/acl/mod.rs

//! Access control: path rules, their evaluation, and users.

pub mod enforcer;
pub mod parsed_rules;
pub mod rules;
pub mod user;
