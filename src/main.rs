// Standard Imports
use clap::Parser;

use goianinha_compiler::compiler::{
    Compiler,
    CompilerError,
    GoianinhaSemanticAnalyser,
    MipsCodeGenerator,
    PestGoianinhaParser,
};

// Basic Compiler Configuration
type PARSER = PestGoianinhaParser;
type ANALYSER = GoianinhaSemanticAnalyser;
type GENERATOR = MipsCodeGenerator;

/// Command Line interface struct
/// Describes possible arguments using the clap library
#[derive(Parser)]
struct CompilerCLIOptions {
    /// Path of the Goianinha source file to compile
    #[clap(parse(from_os_str))]
    path: std::path::PathBuf,

    /// Path to the output file, default is output.asm in the working directory
    #[clap(short, long, parse(from_os_str))]
    output: Option<std::path::PathBuf>,

    // Flags

    /// Write the generated assembly to stdout instead of the output file
    #[clap(long, action)]
    stdout: bool,
}

impl CompilerCLIOptions {
    /// Derives default values for empty arguments that cannot be set to
    /// constants.
    /// @return: Returns CompilerCLIOptions with modified empty arguments
    fn derive_defaults(mut self) -> Self {
        if self.output.is_none() {
            self.output = Some(std::path::PathBuf::from("output.asm"))
        }

        return self;
    }
}

fn main() {
    // Parse Command line arguments
    let cli_args = CompilerCLIOptions::parse().derive_defaults();

    let compiler: Compiler<PARSER, ANALYSER, GENERATOR> = Compiler::default();
    let source_path = cli_args.path.as_path();

    // Check if output should be to stdout
    let result = if cli_args.stdout {
        compiler.compile(source_path).map(|assembly| {
            print!("{}", assembly);
        })
    } else {
        let dest_path = cli_args.output.unwrap(); // Can unwrap as output will always be derived
        compiler.compile_and_save(source_path, dest_path.as_path())
    };

    // Check result
    match result {
        Ok(_) => {
            if !cli_args.stdout {
                // Don't pollute stdout if it has been selected
                println!("Compile success!");
            }
            std::process::exit(exitcode::OK);
        }
        Err(why) => {
            eprintln!("{}", why);
            let code = match why {
                CompilerError::Io(_) => exitcode::IOERR,
                _ => exitcode::DATAERR,
            };
            std::process::exit(code);
        }
    };
}
