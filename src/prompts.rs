mod system;

pub use system::{SYSTEM_PROMPT, system};
