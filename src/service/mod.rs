//! Service layer: the execution wrapper around cleaned inputs.

mod interaction;

pub use interaction::{Interaction, InvalidInteraction, Outcome};
