use anyhow::{bail, Context};
use qgen::config::{AppConfig, ConfigManager};
use qgen::engines::generation::{random_genomes, DerivationEngine, Genome};
use qgen::grammar::{parse_bnf, Grammar, GroverGrammar};
use qgen::phenotype::{Phenotype, PhenotypeValidator, Renderer};
use std::env;
use std::sync::Arc;

const USAGE: &str = "\
usage: qgen [options] <command>

commands:
  decode <c1,c2,...>   decode one genome
  random <count>       decode <count> random genomes
  grammar              print the grammar in BNF

options:
  --config <file>      TOML configuration (QGEN_* variables override it)
  --grammar <file>     BNF grammar instead of the built-in Grover grammar
  --oracle <file>      substitute these instruction lines into oracle regions
  --check              validate decoded circuits
  --json               print phenotypes as JSON (tokens and derivation stats)";

struct Options {
    config: Option<String>,
    grammar: Option<String>,
    oracle: Option<String>,
    check: bool,
    json: bool,
    command: Vec<String>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options {
        config: None,
        grammar: None,
        oracle: None,
        check: false,
        json: false,
        command: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                options.config = Some(iter.next().context("--config needs a path")?.clone())
            }
            "--grammar" => {
                options.grammar = Some(iter.next().context("--grammar needs a path")?.clone())
            }
            "--oracle" => {
                options.oracle = Some(iter.next().context("--oracle needs a path")?.clone())
            }
            "--check" => options.check = true,
            "--json" => options.json = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => options.command.push(arg.clone()),
        }
    }
    Ok(options)
}

fn parse_genome(text: &str) -> anyhow::Result<Genome> {
    text.split(',')
        .map(|c| {
            c.trim()
                .parse::<u32>()
                .with_context(|| format!("'{}' is not a codon", c.trim()))
        })
        .collect()
}

fn load_grammar(options: &Options, config: &AppConfig) -> anyhow::Result<Grammar> {
    match &options.grammar {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read grammar {}", path))?;
            Ok(parse_bnf(&text)?)
        }
        None => Ok(GroverGrammar::new(&config.grover)?),
    }
}

fn load_oracle(options: &Options) -> anyhow::Result<Option<Vec<String>>> {
    let Some(path) = &options.oracle else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read oracle {}", path))?;
    Ok(Some(text.lines().map(str::to_string).collect()))
}

fn emit(
    phenotype: &Phenotype,
    oracle: Option<&[String]>,
    validator: Option<&PhenotypeValidator>,
    json: bool,
) -> anyhow::Result<()> {
    let phenotype = match oracle {
        Some(lines) => phenotype.substitute_oracle(lines)?,
        None => phenotype.clone(),
    };
    let text = Renderer::render(&phenotype);
    if let Some(validator) = validator {
        validator.validate(&text)?;
    }
    if json {
        println!("{}", serde_json::to_string(&phenotype)?);
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let manager = ConfigManager::new();
    if let Some(path) = &options.config {
        manager.load_from_file(path)?;
    }
    let config = manager.get();

    let grammar = Arc::new(load_grammar(&options, &config)?);
    let oracle = load_oracle(&options)?;
    let validator = options
        .check
        .then(|| PhenotypeValidator::new(config.grover.num_qubits));

    let engine = DerivationEngine::new(Arc::clone(&grammar), config.decoder.clone());

    match options.command.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["decode", genome] => {
            let genome = parse_genome(genome)?;
            let phenotype = engine.decode(&genome)?;
            emit(&phenotype, oracle.as_deref(), validator.as_ref(), options.json)?;
            log::info!(
                "{} codons used, {} wraps",
                phenotype.stats().codons_consumed,
                phenotype.stats().wraps
            );
        }
        ["random", count] => {
            let count: usize = count.parse().context("count must be a number")?;
            let genomes = random_genomes(&config.genome, count);
            let mut overflows = 0;
            for (i, result) in engine.decode_batch(&genomes).into_iter().enumerate() {
                println!("# genome {}: {:?}", i + 1, genomes[i]);
                match result {
                    Ok(phenotype) => {
                        emit(&phenotype, oracle.as_deref(), validator.as_ref(), options.json)?
                    }
                    Err(e) if e.is_overflow() => {
                        overflows += 1;
                        println!("# {}", e);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            log::info!("{}/{} genomes overflowed", overflows, count);
        }
        ["grammar"] => print!("{}", grammar),
        _ => bail!("{}", USAGE),
    }

    Ok(())
}
