use bytecode::{BytecodeBuilder, Instruction, Op};

use crate::cache::CacheCell;

/// An immutable instruction sequence plus its mutable cache cells.
///
/// One cell is allocated empty per instruction offset when the unit is
/// built. The cells belong to this unit alone: reusing a unit across
/// interpreter invocations is what lets a site's cache survive between
/// calls, and taking the unit by `&mut` during execution is what keeps
/// that mutable state exclusive. The cells are not designed for concurrent
/// mutation.
pub struct CodeUnit {
    code: Vec<u8>,
    cells: Option<Box<[CacheCell]>>,
}

impl CodeUnit {
    /// Wrap encoded bytecode, allocating one empty cell per instruction.
    pub fn new(code: Vec<u8>) -> Self {
        let count = code.len() / Instruction::WIDTH;
        Self {
            code,
            cells: Some(vec![CacheCell::empty(); count].into_boxed_slice()),
        }
    }

    /// A unit with no cache cells at all: every dispatch resolves through
    /// the method table. Exists for measuring the cache and for checking
    /// that caching never changes observable behaviour.
    pub fn without_cache(code: Vec<u8>) -> Self {
        Self { code, cells: None }
    }

    /// Build a unit from ordered `(opcode, operand)` pairs.
    pub fn from_pairs(pairs: &[(Op, u8)]) -> Self {
        let mut code = Vec::with_capacity(pairs.len() * Instruction::WIDTH);
        for &(op, operand) in pairs {
            code.push(op as u8);
            code.push(operand);
        }
        Self::new(code)
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn instruction_count(&self) -> usize {
        self.code.len() / Instruction::WIDTH
    }

    /// The cache cell of the instruction at `site` (an instruction index,
    /// not a byte offset). `None` for cache-less units.
    pub fn cell(&self, site: usize) -> Option<&CacheCell> {
        self.cells.as_ref().and_then(|cells| cells.get(site))
    }

    pub(crate) fn cell_mut(&mut self, site: usize) -> Option<&mut CacheCell> {
        self.cells.as_mut().and_then(|cells| cells.get_mut(site))
    }

    /// Force every cell back to empty, keeping the bytecode.
    pub fn reset_cache(&mut self) {
        if let Some(cells) = self.cells.as_mut() {
            for cell in cells.iter_mut() {
                cell.reset();
            }
        }
    }
}

impl From<BytecodeBuilder> for CodeUnit {
    fn from(builder: BytecodeBuilder) -> Self {
        Self::new(builder.into_bytes())
    }
}
