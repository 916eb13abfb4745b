pub mod detect;
pub mod edit;
pub mod info;
pub mod next;
pub mod points;
pub mod progress;
pub mod propagate;
pub mod swap;
pub mod validate;
