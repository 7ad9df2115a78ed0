pub mod engine;
pub mod modifiers;
pub mod settings;
pub mod skin;
pub mod stats;
