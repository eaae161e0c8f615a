//! `SeaORM` entity definitions.

pub mod resources;
