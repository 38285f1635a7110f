use std::{fs, process};

use clap::Parser;
use isocheck_cli::{render_cycle, App, CheckArgs, Command, Variant};
use isocheck_core::history::types::{History, Op};
use isocheck_core::{IsolationLevel, Report, WriteLog};
use isocheck_testgen::generator::GeneratedHistory;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = App::parse();
    match &app.command {
        Command::Check(args) => check(args),
        Command::Generate(args) => generate(args),
        Command::Schema => schema(),
    }
}

fn read_history(args: &CheckArgs) -> History<String> {
    let content = fs::read_to_string(&args.input).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {e}", args.input.display());
        process::exit(2);
    });

    // a bare operation array, or the envelope `generate` writes
    serde_json::from_str::<Vec<Op<String>>>(&content)
        .or_else(|_| serde_json::from_str::<GeneratedHistory>(&content).map(GeneratedHistory::into_data))
        .unwrap_or_else(|e| {
            eprintln!("Failed to parse {}: {e}", args.input.display());
            process::exit(2);
        })
}

fn read_write_log(args: &CheckArgs) -> WriteLog<String> {
    let Some(path) = &args.write_log else {
        eprintln!("--variant rw-register requires --write-log");
        process::exit(2);
    };
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {e}", path.display());
        process::exit(2);
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {e}", path.display());
        process::exit(2);
    })
}

fn check(args: &CheckArgs) {
    let history = read_history(args);
    let level = IsolationLevel::from(args.level);
    let strategy = args.strategy();

    let result = match args.variant {
        Variant::ListAppend => isocheck_core::check_list_append(history, level, strategy),
        Variant::RwRegister => {
            let write_log = read_write_log(args);
            isocheck_core::check_rw_register(history, &write_log, level, strategy)
        }
    };

    let report = result.unwrap_or_else(|e| {
        eprintln!("History violates checker preconditions: {e:?}");
        process::exit(2);
    });

    if args.json {
        print_json(args, level, &report);
    } else {
        print_text(level, &report);
    }

    if !report.is_valid || report.g1a || report.g1b {
        process::exit(1);
    }
}

fn print_text(level: IsolationLevel, report: &Report<String>) {
    if report.g1a {
        println!("G1a: aborted read detected");
    }
    if report.g1b {
        println!("G1b: intermediate read detected");
    }
    if report.is_valid {
        println!("{level}: PASS");
    } else {
        println!("{level}: FAIL");
        if let Some(witness) = &report.witness {
            println!("witness: {}", render_cycle(witness));
        }
    }
}

fn print_json(args: &CheckArgs, level: IsolationLevel, report: &Report<String>) {
    let value = serde_json::json!({
        "input": args.input.display().to_string(),
        "level": level.to_string(),
        "is_valid": report.is_valid,
        "g1a": report.g1a,
        "g1b": report.g1b,
        "witness": report.witness.as_ref().map(|w| render_cycle(w)),
    });
    println!("{value}");
}

fn generate(args: &isocheck_cli::GenerateArgs) {
    fs::create_dir_all(&args.output_dir).unwrap_or_else(|e| {
        eprintln!("Failed to create output directory: {e}");
        process::exit(1);
    });

    let histories = isocheck_testgen::generator::generate_mult_histories(
        args.n_hist,
        args.n_txn,
        args.n_key,
        args.n_evt,
        args.seed,
    );

    for history in &histories {
        let path = args.output_dir.join(format!("{}.json", history.get_id()));
        let file = fs::File::create(&path).unwrap_or_else(|e| {
            eprintln!("Failed to create {}: {e}", path.display());
            process::exit(1);
        });
        serde_json::to_writer_pretty(file, history).unwrap_or_else(|e| {
            eprintln!("Failed to write {}: {e}", path.display());
            process::exit(1);
        });
    }

    println!(
        "Generated {} histories to {}",
        histories.len(),
        args.output_dir.display()
    );
}

fn schema() {
    let schema = schemars::schema_for!(Vec<Op<String>>);
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).expect("schema serializes")
    );
}
