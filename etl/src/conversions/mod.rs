//! Coercion of loosely-typed upstream payloads into strict internal types.

pub mod record;
