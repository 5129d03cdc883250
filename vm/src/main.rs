use std::process;

use clap::Parser as ClapParser;

use bytecode::{BytecodeBuilder, Instruction, Reader, decode_at};
use object::Value;
use vm::{CodeUnit, MethodTable, RuntimeError, run};

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Operands folded left to right with Add, then printed
    #[arg(required = false, help = "Integer or text operands for the program")]
    operands: Vec<String>,

    #[arg(long, help = "Treat every operand as text")]
    text: bool,

    #[arg(long, help = "Dump bytecode instead of executing")]
    dump_bytecode: bool,

    #[arg(long, help = "Print per-site cache statistics after the run")]
    cache_stats: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let methods = MethodTable::with_defaults();

    if cli.operands.is_empty() {
        run_demo(&methods, &cli);
        return;
    }

    if cli.operands.len() > u8::MAX as usize + 1 {
        eprintln!("Error: at most {} operands supported", u8::MAX as usize + 1);
        process::exit(1);
    }

    let args: Vec<Value> = cli
        .operands
        .iter()
        .map(|raw| parse_operand(raw, cli.text))
        .collect();
    let mut unit = fold_unit(args.len());

    if cli.dump_bytecode {
        dump_unit(&unit);
        return;
    }

    execute(&methods, &mut unit, &args);

    if cli.cache_stats {
        print_cache_stats(&unit);
    }
}

/// With no operands: run one shared unit first with integer arguments,
/// then with text arguments. The second call reuses the cells the first
/// one filled, so the `Add` and `Print` sites flip from integer to text
/// entries between the calls (visible with `--cache-stats`).
fn run_demo(methods: &MethodTable, cli: &Cli) {
    let mut unit = fold_unit(2);

    if cli.dump_bytecode {
        dump_unit(&unit);
        return;
    }

    execute(methods, &mut unit, &[Value::from_i64(3), Value::from_i64(4)]);
    execute(
        methods,
        &mut unit,
        &[Value::from_text("foo"), Value::from_text("bar")],
    );

    if cli.cache_stats {
        print_cache_stats(&unit);
    }
}

/// `Arg 0 (Arg k, Add)* Print Halt` — fold all operands, print the result.
fn fold_unit(argc: usize) -> CodeUnit {
    let mut b = BytecodeBuilder::new();
    b.arg(0);
    for index in 1..argc {
        b.arg(index as u8);
        b.add();
    }
    b.print();
    b.halt();
    CodeUnit::from(b)
}

fn parse_operand(raw: &str, force_text: bool) -> Value {
    if force_text {
        return Value::from_text(raw);
    }
    match raw.parse::<i64>() {
        Ok(n) => Value::from_i64(n),
        Err(_) => Value::from_text(raw),
    }
}

fn execute(methods: &MethodTable, unit: &mut CodeUnit, args: &[Value]) {
    if let Err(err) = run(methods, unit, args) {
        eprintln!("Error executing program: {}", format_runtime_error(&err));
        process::exit(1);
    }
}

fn dump_unit(unit: &CodeUnit) {
    let mut reader = Reader::new(unit.code());
    loop {
        let offset = reader.offset();
        match reader.decode_next() {
            None => break,
            Some(Ok(instruction)) => println!("{offset:04}  {instruction}"),
            Some(Err(err)) => {
                eprintln!("Error decoding at offset {offset}: {err:?}");
                process::exit(1);
            }
        }
    }
}

fn print_cache_stats(unit: &CodeUnit) {
    println!("== cache sites ==");
    for site in 0..unit.instruction_count() {
        let Some(cell) = unit.cell(site) else { continue };
        if cell.hits() == 0 && cell.misses() == 0 {
            continue;
        }
        let Ok(instruction) = decode_at(unit.code(), site * Instruction::WIDTH) else {
            continue;
        };
        let kind = cell.cached_kind().map(|k| k.name()).unwrap_or("-");
        println!(
            "site {site:3}  {:<8} hits {:>6}  misses {:>3}  kind {kind}",
            instruction.to_string(),
            cell.hits(),
            cell.misses(),
        );
    }
}

fn format_runtime_error(err: &RuntimeError) -> String {
    match err {
        RuntimeError::UnknownOpcode { byte, offset } => {
            format!("unknown opcode 0x{byte:02x} at offset {offset}")
        }
        RuntimeError::TruncatedUnit { offset } => {
            format!("bytecode unit truncated at offset {offset}")
        }
        RuntimeError::ArgOutOfBounds { index, provided } => {
            format!("argument index {index} out of bounds ({provided} provided)")
        }
        RuntimeError::MissingMethod { kind, selector } => {
            format!(
                "method table has no {} entry for {}",
                selector.name(),
                kind.name()
            )
        }
        RuntimeError::TypeError { expected, got } => {
            format!("type error: expected {expected}, got {got:?}")
        }
        RuntimeError::IntegerOverflow { left, right } => {
            format!("integer overflow adding {left} and {right}")
        }
        RuntimeError::Io { message } => format!("write failed: {message}"),
    }
}
