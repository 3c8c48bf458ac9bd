//! ffiabi - native ABI classifier
//!
//! Usage: ffiabi [OPTIONS] <ANNOTATION>
//!        ffiabi [OPTIONS] --file <PATH>
//!        ffiabi [OPTIONS] --intrinsic

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use native_abi::frontend::FrontendConfig;
use native_abi::target::{Arch, TargetConfig};
use native_abi::Pipeline;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Target architecture
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Target {
    /// 32-bit x86
    Ia32,
    /// x86-64
    X64,
    /// 32-bit ARM
    Arm,
    /// AArch64
    Arm64,
    /// The architecture this tool was built for
    #[default]
    Host,
}

impl Target {
    fn resolve(self) -> TargetConfig {
        match self {
            Target::Ia32 => TargetConfig::new(Arch::Ia32),
            Target::X64 => TargetConfig::new(Arch::X64),
            Target::Arm => TargetConfig::new(Arch::Arm),
            Target::Arm64 => TargetConfig::new(Arch::Arm64),
            Target::Host => TargetConfig::default(),
        }
    }
}

#[derive(ClapParser, Debug)]
#[command(name = "ffiabi")]
#[command(author = "ffiabi developers")]
#[command(version)]
#[command(about = "Classify foreign-function types for a native ABI", long_about = None)]
struct Args {
    /// Annotation to classify, e.g. "Int32 Function(Pointer<Uint8>, Double)"
    annotation: Option<String>,

    /// Read annotations from a file, one per line
    #[arg(short, long, conflicts_with = "annotation")]
    file: Option<PathBuf>,

    /// Target architecture
    #[arg(short, long, value_enum, default_value = "host")]
    arch: Target,

    /// Print the intrinsic register contract and prologue/epilogue
    #[arg(long)]
    intrinsic: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let target = args.arch.resolve();

    if args.verbose {
        eprintln!("Target architecture: {}", target.arch);
    }

    if args.intrinsic {
        print_intrinsic(target.arch)?;
        if args.annotation.is_none() && args.file.is_none() {
            return Ok(());
        }
    }

    let frontend_config = FrontendConfig {
        dump_tokens: args.dump_tokens,
        verbose: args.verbose,
    };
    let mut pipeline = Pipeline::new(target, frontend_config);

    match (&args.annotation, &args.file) {
        (Some(annotation), _) => {
            let classified = pipeline
                .classify("<command line>", annotation)
                .context("failed to classify annotation")?;
            print!("{}", pipeline.report(&classified));
        }
        (None, Some(path)) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let filename = path.display().to_string();
            let mut failures = 0;
            for (line_no, line) in source.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() || line.starts_with("//") {
                    continue;
                }
                let name = format!("{}:{}", filename, line_no + 1);
                match pipeline.classify(&name, line) {
                    Ok(classified) => println!("{}", pipeline.report(&classified)),
                    Err(_) => failures += 1,
                }
            }
            if failures > 0 {
                bail!("{} annotation(s) in {} could not be classified", failures, filename);
            }
        }
        (None, None) => bail!("nothing to do: pass an annotation, --file or --intrinsic"),
    }

    Ok(())
}

fn print_intrinsic(arch: Arch) -> Result<()> {
    arch.verify_intrinsic_contract()
        .with_context(|| format!("intrinsic register contract broken on {}", arch))?;
    let listing = arch.intrinsic_listing();
    println!("{}", arch.intrinsic_contract());
    println!();
    print!("{}", listing.prologue);
    println!("    ...");
    print!("{}", listing.epilogue);
    Ok(())
}
