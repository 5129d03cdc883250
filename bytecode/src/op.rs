/// Bytecode opcodes.
///
/// Every instruction is encoded in a fixed two-byte cell: the opcode byte
/// followed by a single operand byte. Opcodes that take no operand leave
/// the operand byte zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Op {
    /// Push the caller-supplied argument at the operand index onto the
    /// operand stack.
    /// Operands: `index:u8`
    Arg = 0x00,

    /// Pop two values (right first, then left) and push `left add right`,
    /// dispatched on the left operand's kind. Operand byte unused.
    Add,

    /// Pop one value and write its rendering to the output stream,
    /// dispatched on the value's kind. Pushes nothing. Operand byte unused.
    Print,

    /// Stop execution. The only non-error way a unit ends. Operand byte
    /// unused.
    Halt,
}

impl Op {
    pub const COUNT: usize = Op::Halt as usize + 1;

    /// Whether this opcode's operand byte carries meaning.
    pub const fn has_operand(self) -> bool {
        matches!(self, Op::Arg)
    }
}

impl TryFrom<u8> for Op {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        if byte < Self::COUNT as u8 {
            // SAFETY: Op is repr(u8) with contiguous variants starting at 0.
            Ok(unsafe { core::mem::transmute::<u8, Op>(byte) })
        } else {
            Err(byte)
        }
    }
}
