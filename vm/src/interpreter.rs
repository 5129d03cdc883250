use std::io::{self, Write};

use bytecode::{DecodeError, Instruction, decode_at};
use log::{debug, trace};
use object::{Kind, Selector, Value};

use crate::cache::DispatchOutcome;
use crate::registry::{MethodTable, NativeFn};
use crate::unit::CodeUnit;

/// Operand stack capacity reserved up front. Well-formed units for this
/// instruction set stay far below it; exceeding it is a precondition
/// violation of the unit, caught by a `debug_assert!`, not a recoverable
/// condition.
pub const STACK_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// An opcode byte outside the known set: the unit is corrupt or built
    /// for a different instruction set.
    UnknownOpcode { byte: u8, offset: usize },
    /// The unit ended inside an instruction cell, or execution ran past
    /// its end without reaching `Halt`.
    TruncatedUnit { offset: usize },
    /// `Arg` asked for an argument the caller did not supply. There is no
    /// safe default to continue with.
    ArgOutOfBounds { index: u8, provided: usize },
    /// The method table has no entry for a (kind, selector) pair the unit
    /// needs: the table was assembled incompletely.
    MissingMethod { kind: Kind, selector: Selector },
    TypeError { expected: &'static str, got: Value },
    IntegerOverflow { left: i64, right: i64 },
    Io { message: String },
}

impl From<DecodeError> for RuntimeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownOpcode { byte, offset } => {
                Self::UnknownOpcode { byte, offset }
            }
            DecodeError::Truncated { offset } => Self::TruncatedUnit { offset },
        }
    }
}

/// Execute `unit` against `args`, writing `Print` output to stdout.
pub fn run(
    methods: &MethodTable,
    unit: &mut CodeUnit,
    args: &[Value],
) -> Result<Option<Value>, RuntimeError> {
    let mut stdout = io::stdout();
    run_with_output(methods, unit, args, &mut stdout)
}

/// Execute `unit` against `args`, writing `Print` output to `out`.
///
/// Returns the top of the operand stack once `Halt` is reached (`None`
/// when the stack is empty). Any error aborts the run at the instruction
/// that detected it; the unit's cache cells keep whatever state they had
/// reached by then.
///
/// The bytecode unit must be well formed: balanced pushes and pops, and a
/// reachable `Halt`. Operand-stack underflow on a malformed unit panics
/// rather than being silently tolerated.
pub fn run_with_output(
    methods: &MethodTable,
    unit: &mut CodeUnit,
    args: &[Value],
    out: &mut dyn Write,
) -> Result<Option<Value>, RuntimeError> {
    let mut stack: Vec<Value> = Vec::with_capacity(STACK_CAPACITY);
    let mut pc = 0;

    loop {
        let instruction = decode_at(unit.code(), pc)?;
        trace!("{pc:04}  {instruction}");

        match instruction {
            Instruction::Arg { index } => {
                let value = args.get(index as usize).cloned().ok_or(
                    RuntimeError::ArgOutOfBounds {
                        index,
                        provided: args.len(),
                    },
                )?;
                debug_assert!(stack.len() < STACK_CAPACITY, "operand stack overflow");
                stack.push(value);
            }
            Instruction::Add => {
                let right = stack.pop().expect("operand stack should not underflow");
                let left = stack.pop().expect("operand stack should not underflow");
                let method =
                    resolve_cached(methods, unit, pc, left.kind(), Selector::Add)?;
                if let Some(result) = method(&left, std::slice::from_ref(&right), out)? {
                    stack.push(result);
                }
            }
            Instruction::Print => {
                let value = stack.pop().expect("operand stack should not underflow");
                let method =
                    resolve_cached(methods, unit, pc, value.kind(), Selector::Print)?;
                if let Some(result) = method(&value, &[], out)? {
                    stack.push(result);
                }
            }
            Instruction::Halt => return Ok(stack.pop()),
        }

        pc += Instruction::WIDTH;
    }
}

/// The caching protocol around a registry lookup.
///
/// Probes the cell belonging to the instruction at `pc`; a matching entry
/// skips the table walk entirely, anything else resolves through `methods`
/// and overwrites the cell. Cache-less units go straight to the table.
/// Either way the operation handed back is exactly what
/// `methods.resolve(kind, selector)` yields for the receiver's kind.
fn resolve_cached(
    methods: &MethodTable,
    unit: &mut CodeUnit,
    pc: usize,
    kind: Kind,
    selector: Selector,
) -> Result<NativeFn, RuntimeError> {
    let resolve = |kind: Kind| {
        methods
            .resolve(kind, selector)
            .ok_or(RuntimeError::MissingMethod { kind, selector })
    };

    let site = pc / Instruction::WIDTH;
    let Some(cell) = unit.cell_mut(site) else {
        return resolve(kind);
    };

    let (method, outcome) = cell.dispatch(kind, resolve)?;
    match outcome {
        DispatchOutcome::Hit => {
            trace!("site {site}: {} hit for {}", selector.name(), kind.name());
        }
        DispatchOutcome::Filled => {
            debug!("site {site}: {} cell filled for {}", selector.name(), kind.name());
        }
        DispatchOutcome::Invalidated => {
            debug!(
                "site {site}: {} cell invalidated, now {}",
                selector.name(),
                kind.name()
            );
        }
    }
    Ok(method)
}
