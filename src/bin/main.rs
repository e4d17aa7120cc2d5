use monkey::{Interpreter, Parser, Scanner};
use std::{
    env,
    io::{self, BufRead, Write},
};

const USAGE: &str = "Usage: monkey [--max-call-depth N] [script]";

fn main() -> io::Result<()> {
    init_tracing();

    let mut stdout = io::stdout();
    let stderr = io::stderr();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match Options::parse(&args) {
        Some(options) => options,
        None => {
            writeln!(stdout, "{}", USAGE)?;
            std::process::exit(64);
        },
    };

    let interpreter = Interpreter::new().max_call_depth(options.max_call_depth);
    let mut monkey = Monkey::new(interpreter, io::stdout(), stderr);
    let stdin = io::stdin();
    match options.script {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            if !monkey.run(&contents)? {
                std::process::exit(65);
            }
        },
        None => run_prompt(&mut monkey, stdin.lock(), &mut stdout)?,
    }

    Ok(())
}

/// Installs a stderr subscriber, but only when `RUST_LOG` asks for one.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

#[derive(Debug, PartialEq)]
struct Options {
    max_call_depth: usize,
    script: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Option<Options> {
        let mut max_call_depth = monkey::interpreter::DEFAULT_MAX_CALL_DEPTH;
        let mut script = None;

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--max-call-depth" => {
                    max_call_depth = args.next()?.parse().ok()?;
                },
                flag if flag.starts_with("--") => return None,
                path if script.is_none() => script = Some(path.to_string()),
                _ => return None,
            }
        }

        Some(Options { max_call_depth, script })
    }
}

/// Reads lines until end of input, running each one against the same global
/// environment.
fn run_prompt<Out: Write, ErrOut: Write, In: BufRead>(
    monkey: &mut Monkey<Out, ErrOut>,
    mut input: In,
    prompt_out: &mut impl Write,
) -> io::Result<()> {
    let mut buffer = String::new();

    loop {
        write!(prompt_out, ">> ")?;
        prompt_out.flush()?;

        buffer.clear();

        let num_bytes = input.read_line(&mut buffer)?;
        if num_bytes == 0 { break };

        monkey.run(buffer.as_str())?;
    }

    Ok(())
}

struct Monkey<Out, ErrOut> {
    interpreter: Interpreter,
    out: Out,
    err_out: ErrOut,
}

impl <Out: Write, ErrOut: Write> Monkey<Out, ErrOut> {
    fn new(interpreter: Interpreter, out: Out, err_out: ErrOut) -> Self {
        Self { interpreter, out, err_out }
    }

    /// Parses and evaluates `source`, printing the result. Returns `false`
    /// without evaluating anything if the source has syntax errors.
    fn run(&mut self, source: &str) -> io::Result<bool> {
        let mut parser = Parser::new(Scanner::new(source));

        let program = match parser.parse_program() {
            Ok(program) if parser.errors().is_empty() => program,
            result => {
                for e in parser.errors() {
                    writeln!(self.err_out, "{}", e)?;
                }
                if let Err(e) = result {
                    writeln!(self.err_out, "{}", e)?;
                }
                return Ok(false);
            },
        };

        let value = self.interpreter.interpret(&program);
        writeln!(self.out, "{}", value.inspect())?;
        Ok(true)
    }
}
