mod builder;
mod instruction;
mod op;
mod reader;

pub use builder::BytecodeBuilder;
pub use instruction::Instruction;
pub use op::Op;
pub use reader::{DecodeError, Reader, decode_at};
